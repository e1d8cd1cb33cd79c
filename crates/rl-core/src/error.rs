//! Foundation error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors raised while validating core inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("vehicle name {0:?} is not configured")]
    UnknownVehicleName(String),
}

/// Shorthand result type for `rl-core`.
pub type CoreResult<T> = Result<T, CoreError>;
