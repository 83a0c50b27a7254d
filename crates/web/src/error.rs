use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized,
    Forbidden(String),
    NotFound(String),
    InternalServerError(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(StorageError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Storage(StorageError::Forbidden(_)) => StatusCode::FORBIDDEN,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::Storage(StorageError::NotFound) => {
                json!({
                    "error": "Resource not found"
                })
            }
            Self::Storage(StorageError::ConstraintViolation(msg))
            | Self::Storage(StorageError::Validation(msg))
            | Self::Storage(StorageError::Forbidden(msg)) => {
                json!({
                    "error": msg
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) | Self::Forbidden(msg) | Self::NotFound(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::Unauthorized => {
                json!({
                    "error": "Unauthorized"
                })
            }
            Self::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                json!({
                    "error": "An internal error occurred"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::InvalidFields(errors) => Self::Validation(errors),
            other => Self::Storage(other),
        }
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

/// Malformed query strings, path segments and JSON bodies answer with the usual error body.
impl From<QueryRejection> for WebError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for WebError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_client_statuses() {
        let cases = [
            (WebError::from(StorageError::NotFound), StatusCode::NOT_FOUND),
            (
                WebError::from(StorageError::validation("Minimum 1 athlete required")),
                StatusCode::BAD_REQUEST,
            ),
            (
                WebError::from(StorageError::forbidden("Forbidden")),
                StatusCode::FORBIDDEN,
            ),
            (
                WebError::from(StorageError::ConstraintViolation("Username already exists".into())),
                StatusCode::CONFLICT,
            ),
            (
                WebError::from(StorageError::Database(sqlx::Error::PoolTimedOut)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                WebError::from(StorageError::from(validator::ValidationErrors::new())),
                StatusCode::BAD_REQUEST,
            ),
            (WebError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{}", error);
        }
    }

    #[tokio::test]
    async fn test_internal_error_body_is_generic() {
        use http_body_util::BodyExt;

        let response =
            WebError::from(StorageError::Database(sqlx::Error::PoolTimedOut)).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "An internal error occurred");
    }
}
