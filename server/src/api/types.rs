//! Shared API types
//!
//! Error envelope and the pagination wrapper shared by every search surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::DataError;
use crate::data::types::PageResult;
use crate::domain::search::{Page, ValidationError, ValidationIssue};

/// Envelope code for rejected query parameters
pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    Validation {
        message: String,
        issues: Vec<ValidationIssue>,
    },
    NotFound { code: String, message: String },
    Unauthorized { code: String, message: String },
    Forbidden { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Forbidden {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_data(e: DataError) -> Self {
        tracing::error!(error = %e, "Data error");
        if e.is_transient() {
            return Self::ServiceUnavailable {
                message: "Database temporarily unavailable".to_string(),
            };
        }
        Self::Internal {
            message: "Database operation failed".to_string(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation {
            message: e.to_string(),
            issues: e.issues,
        }
    }
}

/// Error body as documented in the OpenAPI schema
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: &'static str,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<ValidationIssue>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation { message, issues } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "bad_request",
                    code: VALIDATION_FAILED.to_string(),
                    message,
                    issues: Some(issues),
                },
            ),
            Self::NotFound { code, message } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "not_found",
                    code,
                    message,
                    issues: None,
                },
            ),
            Self::Unauthorized { code, message } => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "unauthorized",
                    code,
                    message,
                    issues: None,
                },
            ),
            Self::Forbidden { code, message } => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    error: "forbidden",
                    code,
                    message,
                    issues: None,
                },
            ),
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    error: "service_unavailable",
                    code: "SERVICE_UNAVAILABLE".to_string(),
                    message,
                    issues: None,
                },
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "internal_error",
                    code: "INTERNAL_ERROR".to_string(),
                    message,
                    issues: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Pagination metadata in response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: &Page, total: u64) -> Self {
        Self {
            page: page.index,
            limit: page.size,
            total,
            total_pages: page.total_pages(total),
        }
    }
}

/// Generic paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(result: PageResult<T>, page: &Page) -> Self {
        Self {
            pagination: PaginationMeta::new(page, result.total),
            items: result.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::PageLimits;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_envelope() {
        let err: ApiError = ValidationError::single("age", "INVALID_NUMBER", "age must be a number").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["message"], "age must be a number");
        assert_eq!(body["issues"][0]["code"], "INVALID_NUMBER");
    }

    #[tokio::test]
    async fn test_internal_hides_details() {
        let err = ApiError::from_data(DataError::Config("secret path".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(body.get("issues").is_none());
        assert!(!body["message"].as_str().unwrap().contains("secret"));
    }

    #[test]
    fn test_transient_maps_to_unavailable() {
        let err = ApiError::from_data(DataError::Sqlite(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, ApiError::ServiceUnavailable { .. }));
    }

    #[test]
    fn test_paginated_response_shape() {
        let page = Page::new(999, 20, &PageLimits::default());
        let response = PaginatedResponse::new(PageResult::<u8>::new(vec![], 5), &page);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["pagination"]["page"], 999);
        assert_eq!(json["pagination"]["limit"], 20);
        assert_eq!(json["pagination"]["total"], 5);
        assert_eq!(json["pagination"]["totalPages"], 1);
    }
}
