//! Integration tests for the Curio content engine

mod cli;
mod page_lifecycle;
mod visibility;

pub use test_utils::{content, gallery, png_bytes, text, TestProject};
