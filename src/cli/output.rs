//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::NotFound(msg) => format!("not found: {}", msg),
        ApiError::PermissionDenied(msg) => format!("permission denied: {}", msg),
        ApiError::InvalidRequest(msg) => format!("invalid request: {}", msg),
        ApiError::ConfigError(msg) => format!("configuration error: {}", msg),
        ApiError::StorageError(err) => format!("storage error: {}", err),
    }
}

/// Process exit code per error category
pub fn exit_code(e: &ApiError) -> i32 {
    match e {
        ApiError::NotFound(_) => 3,
        ApiError::PermissionDenied(_) => 4,
        ApiError::InvalidRequest(_) => 2,
        ApiError::ConfigError(_) | ApiError::StorageError(_) => 1,
    }
}
