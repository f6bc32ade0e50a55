//! Error types for wheel configuration and picker data.
//!
//! Interactive operations (scrolling, selecting, cascading) never fail; bad
//! indices are clamped or wrapped and missing data halts a cascade quietly.
//! Errors are reserved for setup: loading configuration and validating the
//! tables handed to a picker.

use std::path::PathBuf;

/// Result type alias for wheel setup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring wheels and pickers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// TOML parse error.
    #[error("Failed to parse wheel configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("Failed to serialize wheel configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// File I/O error.
    #[error("Failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is outside its valid range.
    #[error("Invalid value for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// A dependency table does not line up with its upstream lane.
    #[error("Table for lane {lane} has no entry for upstream selection {upstream:?}")]
    MissingDependencyData { lane: usize, upstream: Vec<usize> },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration value error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a missing dependency data error.
    pub fn missing_dependency(lane: usize, upstream: &[usize]) -> Self {
        Self::MissingDependencyData {
            lane,
            upstream: upstream.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::invalid_config("item_height", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'item_height': must be positive"
        );

        let err = Error::missing_dependency(2, &[1, 0]);
        assert_eq!(
            err.to_string(),
            "Table for lane 2 has no entry for upstream selection [1, 0]"
        );
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error as _;

        let err = Error::io(
            "wheel.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("wheel.toml"));
        assert!(err.source().is_some());
    }
}
