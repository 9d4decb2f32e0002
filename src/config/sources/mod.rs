//! Configuration file sources, in increasing precedence.

pub mod global_file;
pub mod project_file;
