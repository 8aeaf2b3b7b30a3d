//! Error types for breedview
//!
//! One error enum for fetching, decoding, configuration and the terminal.

use thiserror::Error;

/// Main error type for breedview operations
#[derive(Error, Debug)]
pub enum BreedViewError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Page {page} request returned status {status}")]
    UnexpectedStatus { page: u32, status: u16 },

    #[error("Failed to decode page {page}: {reason}")]
    Decode { page: u32, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid rating value {0}: expected a finite, non-negative number")]
    InvalidRating(f64),

    #[error("Failed to read config '{0}': {1}")]
    ConfigRead(String, std::io::Error),

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Viewer was torn down before page {0} completed")]
    TornDown(u32),
}

/// Result type alias for breedview operations
pub type Result<T> = std::result::Result<T, BreedViewError>;

impl BreedViewError {
    /// Create a decode error for a page from any displayable reason
    pub fn decode(page: u32, reason: impl std::fmt::Display) -> Self {
        BreedViewError::Decode {
            page,
            reason: reason.to_string(),
        }
    }

    /// Check if this error only aborts a single page fetch (the session can continue)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BreedViewError::Http(_)
                | BreedViewError::UnexpectedStatus { .. }
                | BreedViewError::Decode { .. }
                | BreedViewError::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_failures_are_recoverable() {
        assert!(BreedViewError::UnexpectedStatus { page: 2, status: 503 }.is_recoverable());
        assert!(BreedViewError::decode(1, "expected an array").is_recoverable());
        assert!(!BreedViewError::InvalidRating(f64::NAN).is_recoverable());
        assert!(!BreedViewError::TornDown(3).is_recoverable());
    }

    #[test]
    fn decode_message_names_the_page() {
        let err = BreedViewError::decode(4, "expected an array");
        assert_eq!(err.to_string(), "Failed to decode page 4: expected an array");
    }
}
