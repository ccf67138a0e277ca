// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StippleError {
    #[error("Insufficient points for operation: expected at least {expected}, got {actual}")]
    InsufficientPoints { expected: usize, actual: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Triangulation failed: {reason}")]
    TriangulationFailed { reason: String },

    #[error("Invalid density field: {message}")]
    InvalidDensity { message: String },
}

pub type StippleResult<T> = Result<T, StippleError>;
