//! 상태 확인 핸들러.

use axum::Json;
use serde::{Deserialize, Serialize};

/// 상태 확인 메시지
pub const SERVICE_MESSAGE: &str = "Clipboard API with Zstd & rich interactive notifications";

/// `GET /` 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub message: String,
}

/// GET /
pub async fn index() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: SERVICE_MESSAGE.to_string(),
    })
}
