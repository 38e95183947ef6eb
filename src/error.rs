//! Error types and handling for tariff-check
//!
//! Every fallible operation in the crate returns [`TariffError`]. The loop
//! driver inspects the variant to decide whether a failure is fatal
//! ([`TariffError::is_fatal_fetch`]) or only worth a log line.

use thiserror::Error;

/// Result type alias for tariff-check operations
pub type Result<T> = std::result::Result<T, TariffError>;

/// Main error type for tariff-check
#[derive(Debug, Error)]
pub enum TariffError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Transport failures (connect, timeout, broken body stream)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Response body could not be decoded into the expected shape
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Remote API answered with a non-success status
    #[error("API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Requested forecast hour is not present in the series
    #[error("Forecast index {index} out of range (series has {len} points)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },
}

impl TariffError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new API status error
    pub fn api<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new out-of-range error
    pub const fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error, raised while fetching the forecast, stops the
    /// process under the default fail-fast policy
    pub const fn is_fatal_fetch(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

impl From<std::io::Error> for TariffError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for TariffError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TariffError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TariffError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TariffError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for TariffError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}
