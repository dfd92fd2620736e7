use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Client-side error taxonomy surfaced to the presentation layer.
///
/// Every kind is recovered locally and turned into visible state; none of them
/// is ever propagated as an unhandled failure.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The start time could not be parsed.
    InvalidFormat,
    /// The start time falls on a blacked-out calendar day.
    BlackoutDay,
    /// The start time is outside business hours.
    OutOfHours,
    /// A required field is absent at submit time.
    MissingField,
    /// An end time is present and not strictly after the start time.
    EndBeforeStart,
    /// The backend refused a create or update.
    BackendRejected,
    /// A status update failed and the board was reloaded from the backend.
    ReconciliationRequired,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFormat => "INVALID_FORMAT",
            ErrorKind::BlackoutDay => "BLACKOUT_DAY",
            ErrorKind::OutOfHours => "OUT_OF_HOURS",
            ErrorKind::MissingField => "MISSING_FIELD",
            ErrorKind::EndBeforeStart => "END_BEFORE_START",
            ErrorKind::BackendRejected => "BACKEND_REJECTED",
            ErrorKind::ReconciliationRequired => "RECONCILIATION_REQUIRED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the booking REST backend collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The request never produced a response (connection, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Backend rejected the request ({status}): {message}")]
    Rejected {
        status: u16,
        /// Wire name of the offending field, when the backend names one.
        field: Option<String>,
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

/// The base error type at the HTTP boundary of the Revolution services.
///
/// Crate-specific errors convert into this one so handlers can return it directly.
#[derive(Error, Debug)]
pub enum RevolutionError {
    /// Error occurred while parsing request data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The booking backend failed or refused the call
    #[error("Backend error: {0}")]
    BackendError(#[from] BackendError),

    /// Error occurred due to a conflict (e.g., resource already exists)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for RevolutionError {
    fn status_code(&self) -> u16 {
        match self {
            RevolutionError::ParseError(_) => 400,
            RevolutionError::ConfigError(_) => 500,
            RevolutionError::ValidationError(_) => 422,
            RevolutionError::BackendError(BackendError::Rejected { status, .. })
                if (400..500).contains(status) =>
            {
                *status
            }
            RevolutionError::BackendError(_) => 502,
            RevolutionError::ConflictError(_) => 409,
            RevolutionError::NotFoundError(_) => 404,
        }
    }
}

impl From<serde_json::Error> for RevolutionError {
    fn from(err: serde_json::Error) -> Self {
        RevolutionError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> RevolutionError {
    RevolutionError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> RevolutionError {
    RevolutionError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> RevolutionError {
    RevolutionError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> RevolutionError {
    RevolutionError::ConflictError(message.to_string())
}
