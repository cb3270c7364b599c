//! API error handling
//!
//! Every failure leaves the API as `{"_type": "Error", "errorIdentifier",
//! "message"}`. Server-side failures are logged and reported with a generic
//! message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use staff_auth::JwtError;
use staff_core::error::{StaffError, ValidationErrors};
use staff_core::traits::Id;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str, id: String },
    Validation(ValidationErrors),
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Conflict(String),
    Internal {
        detail: String,
        context: FailureContext,
    },
}

/// Operation and entity ids a server-side failure happened under
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureContext {
    pub operation: Option<&'static str>,
    pub ids: Vec<(&'static str, Id)>,
}

impl FailureContext {
    fn ids_field(&self) -> String {
        self.ids
            .iter()
            .map(|(name, id)| format!("{name}={id}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::Internal {
            detail: detail.into(),
            context: FailureContext::default(),
        }
    }

    /// Record where a server-side failure happened; client errors pass through
    pub fn in_operation(self, operation: &'static str, ids: &[(&'static str, Id)]) -> Self {
        match self {
            ApiError::Internal { detail, .. } => ApiError::Internal {
                detail,
                context: FailureContext {
                    operation: Some(operation),
                    ids: ids.to_vec(),
                },
            },
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn identifier(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "urn:staffing-rs:errors:NotFound",
            ApiError::Validation(_) => "urn:staffing-rs:errors:PropertyConstraintViolation",
            ApiError::Unauthorized(_) => "urn:staffing-rs:errors:Unauthenticated",
            ApiError::Forbidden(_) => "urn:staffing-rs:errors:MissingPermission",
            ApiError::BadRequest(_) => "urn:staffing-rs:errors:InvalidRequestBody",
            ApiError::Conflict(_) => "urn:staffing-rs:errors:Conflict",
            ApiError::Internal { .. } => "urn:staffing-rs:errors:InternalError",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::NotFound { resource, id } => format!("{resource} with id {id} not found"),
            ApiError::Validation(errors) => errors.full_messages().join(", "),
            ApiError::Internal { .. } => INTERNAL_MESSAGE.to_string(),
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg) => msg.clone(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "_type")]
    type_name: &'static str,
    #[serde(rename = "errorIdentifier")]
    error_identifier: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal {
            ref detail,
            ref context,
        } = self
        {
            tracing::error!(
                operation = context.operation.unwrap_or("unknown"),
                ids = %context.ids_field(),
                error = %detail,
                "request failed"
            );
        }

        let body = ErrorBody {
            type_name: "Error",
            error_identifier: self.identifier(),
            message: self.message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<StaffError> for ApiError {
    fn from(err: StaffError) -> Self {
        match err {
            StaffError::NotFound { entity, value, .. } => ApiError::NotFound {
                resource: entity,
                id: value,
            },
            StaffError::Validation(errors) => ApiError::Validation(errors),
            StaffError::Unauthorized { message } => ApiError::Unauthorized(message),
            StaffError::Forbidden { message } => ApiError::Forbidden(message),
            StaffError::Conflict { message } => ApiError::Conflict(message),
            other @ (StaffError::Database(_) | StaffError::Internal(_) | StaffError::Config(_)) => {
                ApiError::internal(other.to_string())
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::unauthorized("Token is expired"),
            JwtError::Missing => ApiError::unauthorized("Authentication required"),
            JwtError::Invalid(_) | JwtError::EncodingFailed(_) => {
                ApiError::unauthorized("Invalid token")
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Attach operation context to any error convertible into [`ApiError`]
pub trait OperationContext<T> {
    fn in_operation(self, operation: &'static str, ids: &[(&'static str, Id)]) -> ApiResult<T>;
}

impl<T, E: Into<ApiError>> OperationContext<T> for Result<T, E> {
    fn in_operation(self, operation: &'static str, ids: &[(&'static str, Id)]) -> ApiResult<T> {
        self.map_err(|e| e.into().in_operation(operation, ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_of(StaffError::not_found("Resource", 7).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["_type"], "Error");
        assert_eq!(body["errorIdentifier"], "urn:staffing-rs:errors:NotFound");
        assert_eq!(body["message"], "Resource with id 7 not found");
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let (status, body) =
            body_of(StaffError::validation("Invalid date format. Use YYYY-MM-DD").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid date format. Use YYYY-MM-DD");
    }

    #[tokio::test]
    async fn test_database_error_is_not_leaked() {
        let err: ApiError = StaffError::Database("connection refused on 10.0.0.5".into()).into();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], INTERNAL_MESSAGE);
    }

    #[test]
    fn test_internal_failure_carries_operation() {
        let result: Result<(), StaffError> = Err(StaffError::Database("pool timed out".into()));
        let err = result
            .in_operation("approve_user", &[("user_id", 3)])
            .unwrap_err();

        match err {
            ApiError::Internal { context, .. } => {
                assert_eq!(context.operation, Some("approve_user"));
                assert_eq!(context.ids, vec![("user_id", 3)]);
                assert_eq!(context.ids_field(), "user_id=3");
            }
            other => panic!("expected internal error, got {other:?}"),
        }
    }

    #[test]
    fn test_client_errors_ignore_operation() {
        let err = ApiError::from(StaffError::not_found("Resource", 9))
            .in_operation("get_resource", &[("resource_id", 9)]);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn test_status_mapping() {
        let conflict: ApiError = StaffError::conflict("already assigned").into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        let forbidden: ApiError = StaffError::forbidden("no").into();
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        let expired: ApiError = JwtError::Expired.into();
        assert_eq!(expired.status_code(), StatusCode::UNAUTHORIZED);
    }
}
