use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::{ErrorCode, ErrorResponse};
use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy of the accounts domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountErrorKind {
    EmailAlreadyTaken,
    InvalidInput,
    NotFound,
    WriteFailed,
    Internal,
}

impl AccountErrorKind {
    /// Wire tag reported to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmailAlreadyTaken => "EMAIL_ALREADY_TAKEN",
            Self::InvalidInput => "INVALID_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::WriteFailed => "WRITE_FAILED",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::EmailAlreadyTaken => StatusCode::CONFLICT,
            Self::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::WriteFailed | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmailAlreadyTaken => ErrorCode::Conflict,
            Self::InvalidInput => ErrorCode::UnprocessableEntity,
            Self::NotFound => ErrorCode::NotFound,
            Self::WriteFailed => ErrorCode::WriteFailed,
            Self::Internal => ErrorCode::InternalError,
        }
    }
}

/// The taxonomy kinds a business rule can raise.
///
/// Not-found and write failures are outcomes, not raised errors, so they
/// have no counterpart here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmailAlreadyTaken,
    InvalidInput,
}

impl From<Rejection> for AccountErrorKind {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::EmailAlreadyTaken => AccountErrorKind::EmailAlreadyTaken,
            Rejection::InvalidInput => AccountErrorKind::InvalidInput,
        }
    }
}

impl std::fmt::Display for AccountErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    EmailAlreadyTaken(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Account not found: {0}")]
    NotFound(Uuid),

    #[error("Account write did not complete")]
    WriteFailed,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AccountResult<T> = Result<T, AccountError>;

impl AccountError {
    /// Raise a business-rule violation tagged with its kind.
    pub fn new(kind: Rejection, message: impl Into<String>) -> Self {
        match kind {
            Rejection::EmailAlreadyTaken => Self::EmailAlreadyTaken(message.into()),
            Rejection::InvalidInput => Self::InvalidInput(message.into()),
        }
    }

    pub fn kind(&self) -> AccountErrorKind {
        match self {
            Self::EmailAlreadyTaken(_) => AccountErrorKind::EmailAlreadyTaken,
            Self::InvalidInput(_) => AccountErrorKind::InvalidInput,
            Self::NotFound(_) => AccountErrorKind::NotFound,
            Self::WriteFailed => AccountErrorKind::WriteFailed,
            Self::PasswordHash(_) | Self::Storage(_) | Self::Internal(_) => {
                AccountErrorKind::Internal
            }
        }
    }

    /// Message safe to show to clients.
    fn public_message(&self) -> String {
        match self.kind() {
            AccountErrorKind::Internal => ErrorCode::InternalError.default_message().to_string(),
            AccountErrorKind::WriteFailed => ErrorCode::WriteFailed.default_message().to_string(),
            _ => self.to_string(),
        }
    }
}

/// Errors raised by the storage collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// A unique constraint rejected the write (the email is owned by another account).
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let kind = self.kind();

        match kind {
            AccountErrorKind::Internal | AccountErrorKind::WriteFailed => {
                tracing::error!(error_code = kind.error_code().code(), error = %self, "Account operation failed");
            }
            _ => {
                tracing::info!(error_code = kind.error_code().code(), error = %self, "Account request rejected");
            }
        }

        ErrorResponse::tagged(kind.error_code(), kind.as_str(), self.public_message())
            .into_response_with(kind.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_tags_kind() {
        for (rejection, message) in [
            (Rejection::EmailAlreadyTaken, "Email got taken"),
            (Rejection::InvalidInput, "Passwords do not match"),
        ] {
            let err = AccountError::new(rejection, message);
            assert_eq!(err.kind(), AccountErrorKind::from(rejection));
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let err: AccountError = StorageError::Backend("connection reset".to_string()).into();
        assert_eq!(err.kind(), AccountErrorKind::Internal);
        assert_eq!(
            err.public_message(),
            ErrorCode::InternalError.default_message()
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AccountError::EmailAlreadyTaken(String::new()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AccountError::InvalidInput(String::new()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AccountError::NotFound(Uuid::nil()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AccountError::WriteFailed.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
