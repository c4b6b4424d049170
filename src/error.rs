use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures raised by the credential store and product persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    AlreadyExists,
    #[error("user not found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing error: {0}")]
    Hash(argon2::password_hash::Error),
    #[error("storage error: {0}")]
    Storage(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(inner: sqlx::Error) -> Self {
        if let Some(db_err) = inner.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::AlreadyExists;
            }
        }
        StoreError::Storage(inner)
    }
}

impl From<argon2::password_hash::Error> for StoreError {
    fn from(inner: argon2::password_hash::Error) -> Self {
        StoreError::Hash(inner)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing secret is missing or empty")]
    Config,
    #[error("invalid token")]
    InvalidToken,
    #[error("token encoding error: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid {0}")]
    InvalidInput(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} is invalid: {1}")]
    Invalid(&'static str, String),
}

/// The outcomes visible at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadInput(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid username or password")]
    Unauthorized,
    #[error("internal server error")]
    Internal,
}

impl From<QueryError> for ApiError {
    fn from(inner: QueryError) -> Self {
        ApiError::BadInput(inner.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(inner: TokenError) -> Self {
        match inner {
            TokenError::InvalidToken => ApiError::Unauthorized,
            e => {
                tracing::error!("Token error: {}", e);
                ApiError::Internal
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(inner: StoreError) -> Self {
        match inner {
            StoreError::AlreadyExists => ApiError::Conflict("user already exists".to_string()),
            // Unknown user and wrong password must look the same to callers.
            StoreError::NotFound | StoreError::InvalidCredentials => ApiError::Unauthorized,
            e => {
                tracing::error!("Store error: {}", e);
                ApiError::Internal
            }
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_wrong_password_are_indistinguishable() {
        let a = ApiError::from(StoreError::NotFound);
        let b = ApiError::from(StoreError::InvalidCredentials);
        assert_eq!(a.status(), b.status());
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::from(StoreError::Storage(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "internal server error");
    }

    #[test]
    fn query_errors_are_bad_input() {
        let err = ApiError::from(QueryError::InvalidInput("minPrice"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "invalid minPrice");
    }

    #[test]
    fn invalid_token_is_unauthorized() {
        let err = ApiError::from(TokenError::InvalidToken);
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
