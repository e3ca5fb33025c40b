use crate::models::RecordId;
use axum::http::StatusCode;
use std::fmt;
use thiserror::Error;

/// Why a draft was rejected before commit.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationReason {
    Required,
    OutOfRange { min: f64, max: f64 },
    InvalidDateTime,
    EndBeforeStart,
    WrongLength { expected: usize, actual: usize },
    InvalidFormat,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::Required => write!(f, "is required"),
            ValidationReason::OutOfRange { min, max } => {
                write!(f, "must be between {min} and {max}")
            }
            ValidationReason::InvalidDateTime => write!(f, "is not a valid date and time"),
            ValidationReason::EndBeforeStart => write!(f, "must not be before the start"),
            ValidationReason::WrongLength { expected, actual } => {
                write!(f, "must have {expected} entries, got {actual}")
            }
            ValidationReason::InvalidFormat => write!(f, "has an invalid format"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

/// Errors reported to the caller of a store operation. Nothing was mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error("no entry {index} on {bucket}")]
    EntryNotFound { bucket: String, index: usize },
    #[error("record id {0} appears more than once")]
    DuplicateId(RecordId),
}

/// Failure of the persistence medium. Never rolls back an in-memory mutation.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("storage rejected write for '{key}': {reason}")]
    Rejected { key: String, reason: String },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::Validation(_) | StoreError::DuplicateId(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::NotFound(_) | StoreError::EntryNotFound { .. } => StatusCode::NOT_FOUND,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
