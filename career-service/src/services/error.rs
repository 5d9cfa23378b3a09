use service_core::error::AppError;
use thiserror::Error;

use super::providers::ProviderError;
use super::store::StoreError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No refresh token provided")]
    MissingToken,

    #[error("Invalid refresh token")]
    InvalidToken,

    /// Request carried no access token at all.
    #[error("Not authorized to access this route")]
    Unauthenticated,

    /// Access token rejected, or its user no longer exists.
    #[error("Not authorized to access this route")]
    Unauthorized,

    /// Access token expired while the client still holds a refresh token.
    #[error("Token expired")]
    AccessExpired,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            ServiceError::DuplicateEmail => {
                AppError::BadRequest(anyhow::anyhow!("User already exists"))
            }
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::MissingToken => {
                AppError::Unauthorized(anyhow::anyhow!("No refresh token provided"))
            }
            ServiceError::InvalidToken => {
                AppError::Unauthorized(anyhow::anyhow!("Invalid refresh token"))
            }
            ServiceError::Unauthenticated | ServiceError::Unauthorized => {
                AppError::Unauthorized(anyhow::anyhow!("Not authorized to access this route"))
            }
            ServiceError::AccessExpired => AppError::TokenExpired,
            ServiceError::NotFound(what) => AppError::NotFound(anyhow::anyhow!("{} not found", what)),
            ServiceError::Store(StoreError::Database(e)) => AppError::DatabaseError(e.into()),
            ServiceError::Store(e) => AppError::DatabaseError(anyhow::anyhow!(e)),
            ServiceError::Provider(e) => AppError::InternalError(anyhow::anyhow!(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::DuplicateEmail, StatusCode::BAD_REQUEST),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ServiceError::MissingToken, StatusCode::UNAUTHORIZED),
            (ServiceError::InvalidToken, StatusCode::UNAUTHORIZED),
            (ServiceError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ServiceError::AccessExpired, StatusCode::UNAUTHORIZED),
            (ServiceError::NotFound("Career profile"), StatusCode::NOT_FOUND),
            (
                ServiceError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::Store(StoreError::Other(anyhow::anyhow!("down"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_access_expired_is_flagged() {
        assert!(matches!(
            AppError::from(ServiceError::AccessExpired),
            AppError::TokenExpired
        ));
    }
}
