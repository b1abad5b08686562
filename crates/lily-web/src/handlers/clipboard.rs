//! 클립보드 조회 핸들러.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lily_core::models::clipboard::ClipboardContent;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::ApiError, AppState};

/// 클립보드 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct ClipboardResponse {
    /// MIME 타입 (`image/png` 또는 `text/plain; charset=utf-8`)
    pub mime: String,
    /// 텍스트 또는 base64 인코딩된 PNG
    pub data: String,
}

impl ClipboardResponse {
    /// 클립보드 내용 변환 (`Empty`면 `None`)
    pub fn from_content(content: ClipboardContent) -> Option<Self> {
        let mime = content.mime_type()?.to_string();
        let data = match content {
            ClipboardContent::Image { png } => STANDARD.encode(png),
            ClipboardContent::Text(text) => text,
            ClipboardContent::Empty => return None,
        };
        Some(Self { mime, data })
    }
}

/// GET /clipboard
///
/// 비어 있으면 본문 없이 204를 반환한다.
pub async fn get_clipboard(State(state): State<AppState>) -> Result<Response, ApiError> {
    let clipboard = state.clipboard.clone();
    let content = tokio::task::spawn_blocking(move || clipboard.read())
        .await
        .map_err(|e| ApiError::Internal(format!("클립보드 조회 작업 실패: {e}")))??;

    debug!("클립보드 조회: {:?}", content.kind());
    match ClipboardResponse::from_content(content) {
        Some(body) => Ok(Json(body).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
