//! HTTP error mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use epoch_core::errors::CoreError;
use epoch_core::responses::ApiErrorBody;
use epoch_db::error::DatabaseError;
use thiserror::Error;

/// Every error a handler can return. Rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// A store failure. Only `message` reaches the client.
    #[error("{message}: {detail}")]
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    /// Map a store error for an operation that cannot miss.
    pub fn store(failure: &'static str) -> impl FnOnce(DatabaseError) -> Self {
        move |err| Self::from_db(err, None, failure)
    }

    /// Map a store error where `NoResult` means the addressed entity is unknown.
    pub fn lookup(not_found: &'static str, failure: &'static str) -> impl FnOnce(DatabaseError) -> Self {
        move |err| Self::from_db(err, Some(not_found), failure)
    }

    fn from_db(err: DatabaseError, not_found: Option<&'static str>, failure: &'static str) -> Self {
        match err {
            DatabaseError::NoResult => not_found.map_or_else(
                || Self::Internal {
                    message: failure,
                    detail: DatabaseError::NoResult.to_string(),
                },
                |message| Self::NotFound(message.to_string()),
            ),
            DatabaseError::Core(core) => Self::from_core(core, failure),
            other => Self::Internal {
                message: failure,
                detail: other.to_string(),
            },
        }
    }

    fn from_core(err: CoreError, failure: &'static str) -> Self {
        match err {
            CoreError::NotFound { entity_type, .. } => Self::NotFound(format!("{entity_type} not found")),
            CoreError::InvalidParameter { .. } | CoreError::Validation(_) => {
                Self::BadRequest(err.to_string())
            }
            CoreError::Other(source) => Self::Internal {
                message: failure,
                detail: format!("{source:#}"),
            },
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::from_core(err, "Internal server error")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(message) | Self::NotFound(message) => message,
            Self::Internal { message, detail } => {
                tracing::error!(%detail, "{message}");
                message.to_string()
            }
        };
        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_result_is_not_found_for_lookups() {
        let err = ApiError::lookup("Company not found", "Failed to fetch company")(DatabaseError::NoResult);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Company not found");
    }

    #[test]
    fn no_result_is_internal_outside_lookups() {
        let err = ApiError::store("Failed to fetch companies")(DatabaseError::NoResult);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_is_bad_request() {
        let err = ApiError::store("Failed to create company")(DatabaseError::Core(CoreError::Validation(
            "name is required".into(),
        )));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn query_failures_keep_fixed_message() {
        let err = ApiError::store("Failed to fetch timeline data")(DatabaseError::Query("disk I/O".into()));
        let ApiError::Internal { message, detail } = err else {
            panic!("expected internal error");
        };
        assert_eq!(message, "Failed to fetch timeline data");
        assert!(detail.contains("disk I/O"));
    }

    #[test]
    fn invalid_parameter_is_bad_request() {
        let err: ApiError = CoreError::invalid_parameter("limit", "must be a positive integer").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("limit"));
    }
}
