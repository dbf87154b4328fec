//! Base error type.
//!
//! Raised when a primitive fails to parse from text, such as an alliance
//! name in a roster row.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `ms-core`.
pub type CoreResult<T> = Result<T, CoreError>;
