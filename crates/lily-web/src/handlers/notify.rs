//! 알림 요청 핸들러.
//!
//! 본문 검증 → 이미지 디코딩 → 세션 실행 → 결과 직렬화 순서로 처리한다.
//! 검증/디코딩 실패는 세션에 도달하기 전에 400으로 끝난다.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lily_core::error::CoreError;
use lily_core::models::notification::{
    validate_category_fields, ImageAsset, NotificationCategory, NotificationOutcome,
    NotificationRequest, NotificationSpec,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::ApiError, AppState};

// ============================================================
// DTO
// ============================================================

/// `POST /notify` 요청 본문
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NotifyPayload {
    /// `calls` | `messages` | `notifs`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// 앱 로고 (base64)
    #[serde(default)]
    pub logo: Option<String>,
    /// 히어로 이미지 (base64)
    #[serde(default)]
    pub image: Option<String>,
    /// 본문
    #[serde(default)]
    pub content: Option<String>,
    /// 발신자 이름 (`calls`)
    #[serde(default)]
    pub name: Option<String>,
    /// 발신자 번호 (`calls`)
    #[serde(default)]
    pub number: Option<String>,
}

impl NotifyPayload {
    /// 필드 검증 후 이미지를 디코딩해 요청으로 변환.
    ///
    /// 필수 필드 검증이 이미지 디코딩보다 먼저 수행된다.
    pub fn validate(self) -> Result<NotificationRequest, CoreError> {
        let category = self
            .kind
            .as_deref()
            .and_then(NotificationCategory::from_wire)
            .ok_or_else(|| CoreError::validation("type", "invalid notification type"))?;

        validate_category_fields(category, self.name.as_deref(), self.number.as_deref())?;

        Ok(NotificationRequest {
            category,
            logo_image: decode_image("logo", self.logo.as_deref())?,
            hero_image: decode_image("image", self.image.as_deref())?,
            text: self.content.unwrap_or_default(),
            caller_name: self.name,
            caller_number: self.number,
        })
    }
}

/// base64 이미지 필드 디코딩. 빈 문자열은 이미지 없음으로 본다.
///
/// 76자마다 줄바꿈된 base64(MIME 스타일)도 받아들인다.
fn decode_image(field: &str, encoded: Option<&str>) -> Result<Option<ImageAsset>, CoreError> {
    let Some(encoded) = encoded.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    // `data:image/png;base64,...` 형태 허용
    let encoded = encoded
        .split_once("base64,")
        .map_or(encoded, |(_, data)| data);

    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| CoreError::Decode(format!("'{field}' base64 디코딩 실패: {e}")))?;
    ImageAsset::from_bytes(bytes)
        .map(Some)
        .map_err(|e| CoreError::Decode(format!("'{field}': {e}")))
}

/// `POST /notify` 응답 본문
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyResponse {
    /// `action` | `timeout` | `shown`
    pub status: String,
    /// 선택된 액션 토큰 (`status == "action"`일 때만)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub action: Option<String>,
}

impl From<NotificationOutcome> for NotifyResponse {
    fn from(outcome: NotificationOutcome) -> Self {
        match outcome {
            NotificationOutcome::Resolved { action } => Self {
                status: "action".to_string(),
                action: Some(action),
            },
            NotificationOutcome::TimedOut => Self {
                status: "timeout".to_string(),
                action: None,
            },
            NotificationOutcome::Shown => Self {
                status: "shown".to_string(),
                action: None,
            },
        }
    }
}

// ============================================================
// 핸들러
// ============================================================

/// POST /notify
///
/// Content-Type과 무관하게 본문을 JSON으로 해석한다.
/// 버튼이 있는 알림은 사용자 선택 또는 마감 시간까지 응답을 보류한다.
pub async fn post_notify(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<NotifyResponse>, ApiError> {
    let payload: NotifyPayload = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("잘못된 JSON 본문: {e}")))?;

    let request = payload.validate()?;
    let spec = NotificationSpec::from_request(request)?;
    debug!(
        "알림 요청: {} (버튼 {}개)",
        spec.category().as_wire(),
        spec.actions().len()
    );

    let outcome = state.session().run(spec).await?;
    Ok(Json(outcome.into()))
}
