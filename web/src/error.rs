//! Error types for web handlers.
//!
//! [`AppError`] turns booking errors into the JSON error envelope:
//!
//! ```json
//! { "success": false, "code": "SLOT_FULL", "error": "Slot 17 has no seats left" }
//! ```
//!
//! Server errors carry a `details` string and are logged; validation errors
//! also list every violated rule under `errors`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use slot_booking_core::error::BookingError;
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> Result<ApiResponse<Vec<SlotView>>, AppError> {
///     let slots = state.booking.catalog().list_slots(false).await?;
///     Ok(ApiResponse::ok(slots))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: &'static str,
    /// Extra detail for server errors
    details: Option<String>,
    /// Individual validation failures
    errors: Vec<String>,
    /// Internal error (for logging)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            code,
            details: None,
            errors: Vec::new(),
            source: None,
        }
    }

    /// Attach the underlying error; its text becomes `details`.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.details = Some(source.to_string());
        self.source = Some(source);
        self
    }

    /// Attach individual validation failures.
    #[must_use]
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", "UNAUTHORIZED")
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            "INTERNAL_SERVER_ERROR",
        )
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    code: &'static str,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = self.code,
                message = %self.message,
                details = self.details.as_deref().unwrap_or(""),
                "Internal server error"
            );
        } else {
            tracing::debug!(status = %self.status, code = self.code, message = %self.message, "Request rejected");
        }

        let body = ErrorResponse {
            success: false,
            code: self.code,
            error: self.message,
            details: self.details,
            errors: self.errors,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(errors) => {
                Self::new(StatusCode::BAD_REQUEST, errors.join(", "), "VALIDATION_ERROR")
                    .with_errors(errors)
            }
            BookingError::InvalidInput(message) => {
                Self::new(StatusCode::BAD_REQUEST, message, "INVALID_INPUT")
            }
            BookingError::DuplicateEmail => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), "DUPLICATE_EMAIL")
            }
            BookingError::SlotFull(_) => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), "SLOT_FULL")
            }
            BookingError::Unauthorized => Self::unauthorized(),
            BookingError::SlotNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, err.to_string(), "SLOT_NOT_FOUND")
            }
            BookingError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, err.to_string(), "NOT_FOUND")
            }
            BookingError::StoreMetadata(_) => Self::internal("Internal server error")
                .with_source(anyhow::Error::new(err))
                .with_code("STORE_METADATA_ERROR"),
            BookingError::StoreIo(_) => Self::internal("Internal server error")
                .with_source(anyhow::Error::new(err))
                .with_code("STORE_ERROR"),
        }
    }
}

impl AppError {
    fn with_code(mut self, code: &'static str) -> Self {
        self.code = code;
        self
    }
}

/// Malformed JSON bodies get the same envelope as every other error.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slot_booking_core::store::StoreError;
    use slot_booking_core::types::SlotId;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_booking_error_statuses() {
        let cases = [
            (BookingError::Validation(vec!["x".into()]), StatusCode::BAD_REQUEST),
            (BookingError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (BookingError::DuplicateEmail, StatusCode::BAD_REQUEST),
            (BookingError::SlotFull(SlotId(1)), StatusCode::BAD_REQUEST),
            (BookingError::Unauthorized, StatusCode::UNAUTHORIZED),
            (BookingError::SlotNotFound(SlotId(1)), StatusCode::NOT_FOUND),
            (
                BookingError::NotFound {
                    resource: "Slot",
                    id: 1,
                },
                StatusCode::NOT_FOUND,
            ),
            (
                BookingError::StoreIo(StoreError::Request("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                BookingError::StoreMetadata(StoreError::SheetNotFound("Slots".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(AppError::from(error.clone()).status(), status, "{error}");
        }
    }

    #[test]
    fn test_store_errors_carry_details() {
        let err = AppError::from(BookingError::StoreIo(StoreError::Request("down".into())));
        assert_eq!(err.code(), "STORE_ERROR");
        assert_eq!(err.details.as_deref(), Some("Store I/O error: Request failed: down"));
    }
}
