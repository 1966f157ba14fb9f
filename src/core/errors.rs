//! Custom error types for translation operations

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// API request failed
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP or service status code
        status: u16,
        /// Error details from the service
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        /// Underlying transport error
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        /// What was wrong with the response
        message: String,
    },

    /// Request timeout
    #[error("Request timeout")]
    TimeoutError,

    /// Placeholder markers were dropped or repeated by the translation service
    #[error("Placeholder markers lost in translation: {markers:?}")]
    PlaceholderLoss {
        /// Markers that could not be mapped back to a specifier
        markers: Vec<String>,
    },

    /// File operation error
    #[error("File error: {path} - {message}")]
    FileError {
        /// File or directory involved
        path: String,
        /// Underlying error
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Which setting is wrong
        message: String,
    },

    /// Invalid file format
    #[error("Invalid file format: {format}")]
    InvalidFormat {
        /// Description of the problem
        format: String,
    },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField {
        /// Field name
        field: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl TranslationError {
    /// Whether this error came from a single translation call rather than
    /// from input or configuration.
    pub fn is_per_call(&self) -> bool {
        matches!(
            self,
            TranslationError::ApiError { .. }
                | TranslationError::NetworkError { .. }
                | TranslationError::InvalidResponseError { .. }
                | TranslationError::TimeoutError
                | TranslationError::PlaceholderLoss { .. }
                | TranslationError::MissingField { .. }
                | TranslationError::HttpError(_)
        )
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
