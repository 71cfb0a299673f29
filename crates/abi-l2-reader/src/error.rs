//! Error types for ABI L2 reading operations.

use thiserror::Error;

/// Result type for reader operations.
pub type ReaderResult<T> = Result<T, ReaderError>;

/// Error types for ABI L2 reading.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Variable not present in the dataset
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// Required attribute not present on a variable
    #[error("Missing attribute '{attribute}' on '{variable}'")]
    MissingAttribute { variable: String, attribute: String },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Neither a fixed-grid nor a lat/lon projection variable was found
    #[error("Unsupported projection: dataset has no goes_imager_projection or goes_lat_lon_projection variable")]
    UnsupportedProjection,

    /// The projection variable exists but is missing required metadata
    #[error("Malformed projection metadata: '{variable}' lacks '{attribute}'")]
    MalformedProjection { variable: String, attribute: String },

    /// Unparseable time attribute or filename timestamp
    #[error("Invalid time '{value}': {message}")]
    InvalidTime { value: String, message: String },

    /// Invalid reader configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Manifest or config (de)serialization error
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Error reported by the NetCDF library
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),
}

impl ReaderError {
    /// Create a MissingAttribute error.
    pub fn missing_attribute(variable: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            variable: variable.into(),
            attribute: attribute.into(),
        }
    }

    /// Create a MalformedProjection error.
    pub fn malformed_projection(
        variable: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self::MalformedProjection {
            variable: variable.into(),
            attribute: attribute.into(),
        }
    }

    /// Create an InvalidTime error.
    pub fn invalid_time(value: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidTime {
            value: value.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReaderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Manifest(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ReaderError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Manifest(format!("YAML error: {}", err))
    }
}
