//! Centralized error handling for aeolus
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! keeps the failure category (shape, lookup, ...) visible to callers.

use thiserror::Error;

/// Main error type for aeolus operations
#[derive(Error, Debug)]
pub enum AeolusError {
    /// Empty extraction, mismatched shapes or wrong dimensionality
    #[error("Shape error: {message}")]
    Shape { message: String },

    /// A value or named item could not be looked up
    #[error("Lookup error: {message}")]
    Lookup { message: String },

    /// The field has no coordinate with the requested role or name
    #[error("Coordinate '{coord}' not found in field '{field}'")]
    CoordinateNotFound { field: String, coord: String },

    /// Malformed region box specification
    #[error("Invalid region: {message}")]
    InvalidRegion { message: String },

    /// Region boundaries in the wrong order
    #[error("Boundary error: {message}")]
    Boundary { message: String },

    /// Argument outside of the accepted domain
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Constants or data could not be loaded
    #[error("Load error: {message}")]
    Load { message: String },

    /// NetCDF file operation errors
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),

    /// I/O operation errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Array shape errors raised by ndarray
    #[error("Array error: {0}")]
    Array(#[from] ndarray::ShapeError),

    /// Malformed JSON constant files
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Thread pool configuration error
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl AeolusError {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }

    pub(crate) fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type alias for aeolus operations
pub type Result<T> = std::result::Result<T, AeolusError>;
