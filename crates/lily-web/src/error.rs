//! API 에러 처리.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lily_core::error::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// API 에러
#[derive(Debug, Error)]
pub enum ApiError {
    /// 잘못된 요청 (필드 누락, 잘못된 base64/이미지, 잘못된 JSON)
    #[error("잘못된 요청: {0}")]
    BadRequest(String),

    /// 호스트 자원 일시 사용 불가 (클립보드 점유 등)
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),

    /// 내부 서버 오류 (알림 표시 실패 등)
    #[error("내부 서버 오류: {0}")]
    Internal(String),
}

/// 에러 응답 본문
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 에러 메시지
    pub error: String,
    /// HTTP 상태 코드
    pub status: u16,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::Internal(msg) => msg,
        };

        let body = ErrorResponse {
            error: message,
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { .. } | CoreError::Decode(_) => {
                ApiError::BadRequest(err.to_string())
            }
            CoreError::ClipboardUnavailable(_) => {
                warn!("{err}");
                ApiError::ServiceUnavailable(err.to_string())
            }
            other => {
                warn!("{other}");
                ApiError::Internal(other.to_string())
            }
        }
    }
}
