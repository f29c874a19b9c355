use crate::db::StoreError;
use crate::service::ServiceError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// 接口层错误及其 HTTP 状态码
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    /// `public` 返回给客户端, `detail` 只写日志
    #[error("{public}: {detail}")]
    Internal { public: &'static str, detail: String },
}

impl ApiError {
    pub fn internal(public: &'static str, err: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            public,
            detail: err.to_string(),
        }
    }

    /// 业务错误映射: 校验类为 400, 其余为 500
    pub fn from_service(public: &'static str, err: ServiceError) -> Self {
        match err {
            ServiceError::NoFiles => ApiError::BadRequest("No files uploaded.".into()),
            ServiceError::Store(StoreError::NoFieldsToUpdate) => {
                ApiError::BadRequest("No fields to update.".into())
            }
            ServiceError::Store(StoreError::InvalidMonth { month, year }) => {
                ApiError::BadRequest(format!("Invalid month {month}/{year}."))
            }
            other => ApiError::internal(public, other),
        }
    }
}

impl From<MultipartError> for ApiError {
    /// 超过 DefaultBodyLimit 为 413, 其余 multipart 错误为 400
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(format!("Upload too large: {}", err.body_text()))
        } else {
            ApiError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::PayloadTooLarge(detail) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", detail)
            }
            ApiError::Internal { public, detail } => {
                tracing::error!("{}: {}", public, detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", public.to_string())
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractionError;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn no_files_returns_400() {
        let response = ApiError::from_service("Error processing document.", ServiceError::NoFiles)
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn empty_update_returns_400() {
        let err = ServiceError::Store(StoreError::NoFieldsToUpdate);
        let response = ApiError::from_service("Error updating receipt.", err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn payload_too_large_returns_413() {
        let response = ApiError::PayloadTooLarge("Upload too large".into()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Receipt not found.".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn upstream_failure_hides_details() {
        let err = ServiceError::Extraction {
            file: "a.jpg".into(),
            source: ExtractionError::Upstream {
                status: 403,
                body: "PERMISSION_DENIED on projects/secret".into(),
            },
        };
        let response = ApiError::from_service("Error processing document.", err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Error processing document.");
        assert!(!json.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn database_failure_returns_500() {
        let err = ServiceError::Store(StoreError::Database(sqlx::Error::PoolTimedOut));
        let response = ApiError::from_service("Error fetching receipts.", err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
