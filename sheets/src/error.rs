//! Error types for the Sheets client

use slot_booking_core::store::StoreError;
use thiserror::Error;

/// Errors that can occur when talking to the Sheets API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SheetsError {
    /// The API base URL cannot carry path segments
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Credentials rejected
    #[error("Unauthorized - credentials rejected")]
    Unauthorized,

    /// API returned an error
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error body from API
        message: String,
    },

    /// No sheet with the requested title
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),
}

impl From<SheetsError> for StoreError {
    fn from(error: SheetsError) -> Self {
        match error {
            SheetsError::InvalidUrl(message) | SheetsError::RequestFailed(message) => {
                Self::Request(message)
            }
            SheetsError::ResponseParseFailed(message) => Self::Malformed(message),
            SheetsError::RateLimited => Self::Status {
                status: 429,
                message: "rate limited".to_string(),
            },
            SheetsError::Unauthorized => Self::Status {
                status: 401,
                message: "credentials rejected".to_string(),
            },
            SheetsError::ApiError { status, message } => Self::Status { status, message },
            SheetsError::SheetNotFound(title) => Self::SheetNotFound(title),
        }
    }
}
