//! 알림 요청/명세/결과 모델.
//!
//! `NotificationRequest`(검증된 입력) → `NotificationSpec`(불변 표시 명세)
//! → `NotificationOutcome`(단 한 번 확정되는 최종 결과) 순서로 흐른다.

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 알림 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationCategory {
    /// 수신 전화 (응답/거절)
    Call,
    /// 메시지 (답장/읽음 표시)
    Message,
    /// 단순 알림 (버튼 없음)
    Alert,
}

impl NotificationCategory {
    /// 와이어 표기(`calls`/`messages`/`notifs`)에서 변환
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "calls" => Some(Self::Call),
            "messages" => Some(Self::Message),
            "notifs" => Some(Self::Alert),
            _ => None,
        }
    }

    /// 와이어 표기
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Call => "calls",
            Self::Message => "messages",
            Self::Alert => "notifs",
        }
    }
}

/// 디코딩된 알림 이미지
///
/// 포맷을 인식할 수 있는 바이트만 생성된다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl ImageAsset {
    /// 원시 바이트에서 이미지 포맷을 판별해 생성
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CoreError> {
        if bytes.is_empty() {
            return Err(CoreError::Decode("빈 이미지 데이터".to_string()));
        }
        let format = image::guess_format(&bytes)
            .map_err(|e| CoreError::Decode(format!("이미지 포맷 판별 실패: {e}")))?;
        Ok(Self { bytes, format })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// 임시 파일 확장자 (점 제외)
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}

/// 검증 전 단계의 알림 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// 카테고리
    pub category: NotificationCategory,
    /// 앱 로고 이미지
    pub logo_image: Option<ImageAsset>,
    /// 히어로(대형) 이미지
    pub hero_image: Option<ImageAsset>,
    /// 본문 (`Message`/`Alert`)
    pub text: String,
    /// 발신자 이름 (`Call` 필수)
    pub caller_name: Option<String>,
    /// 발신자 번호 (`Call` 필수)
    pub caller_number: Option<String>,
}

impl NotificationRequest {
    /// 카테고리별 필수 필드 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_category_fields(
            self.category,
            self.caller_name.as_deref(),
            self.caller_number.as_deref(),
        )
    }
}

/// 카테고리별 필수 필드 검증.
///
/// 이미지 디코딩 전에 호출할 수 있도록 원시 필드만 받는다.
pub fn validate_category_fields(
    category: NotificationCategory,
    caller_name: Option<&str>,
    caller_number: Option<&str>,
) -> Result<(), CoreError> {
    if category != NotificationCategory::Call {
        return Ok(());
    }
    if caller_name.map_or(true, str::is_empty) {
        return Err(CoreError::validation(
            "name",
            "'name' and 'number' required for calls",
        ));
    }
    if caller_number.map_or(true, str::is_empty) {
        return Err(CoreError::validation(
            "number",
            "'name' and 'number' required for calls",
        ));
    }
    Ok(())
}

/// 알림 버튼 (라벨 + 불투명 액션 토큰)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    pub token: String,
}

impl NotificationAction {
    fn new(label: &str, token: &str) -> Self {
        Self {
            label: label.to_string(),
            token: token.to_string(),
        }
    }
}

/// 요청마다 한 번 만들어지는 불변 표시 명세
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSpec {
    category: NotificationCategory,
    lines: Vec<String>,
    actions: Vec<NotificationAction>,
    icon: Option<ImageAsset>,
    hero: Option<ImageAsset>,
}

impl NotificationSpec {
    /// 요청을 검증하고 카테고리 규칙에 따라 표시 줄과 버튼을 결정한다.
    ///
    /// | 카테고리 | 줄 | 버튼 |
    /// |---|---|---|
    /// | Call | `Incoming call from {name}`, `{number}` | Answer, Decline |
    /// | Message | `{text}` | Reply, Mark as Read |
    /// | Alert | `{text}` | 없음 |
    pub fn from_request(request: NotificationRequest) -> Result<Self, CoreError> {
        request.validate()?;

        let NotificationRequest {
            category,
            logo_image,
            hero_image,
            text,
            caller_name,
            caller_number,
        } = request;

        let (lines, actions) = match category {
            NotificationCategory::Call => (
                vec![
                    format!("Incoming call from {}", caller_name.unwrap_or_default()),
                    caller_number.unwrap_or_default(),
                ],
                vec![
                    NotificationAction::new("Answer", "action=answer"),
                    NotificationAction::new("Decline", "action=decline"),
                ],
            ),
            NotificationCategory::Message => (
                vec![text],
                vec![
                    NotificationAction::new("Reply", "action=reply"),
                    NotificationAction::new("Mark as Read", "action=markread"),
                ],
            ),
            NotificationCategory::Alert => (vec![text], Vec::new()),
        };

        Ok(Self {
            category,
            lines,
            actions,
            icon: logo_image,
            hero: hero_image,
        })
    }

    pub fn category(&self) -> NotificationCategory {
        self.category
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn actions(&self) -> &[NotificationAction] {
        &self.actions
    }

    pub fn icon(&self) -> Option<&ImageAsset> {
        self.icon.as_ref()
    }

    pub fn hero(&self) -> Option<&ImageAsset> {
        self.hero.as_ref()
    }

    /// 사용자 응답을 기다려야 하는지 여부
    pub fn is_interactive(&self) -> bool {
        !self.actions.is_empty()
    }
}

/// 알림 최종 결과. 세션당 정확히 한 번 확정된다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationOutcome {
    /// 사용자가 버튼을 눌렀음 (토큰은 그대로 호출자에게 전달)
    Resolved { action: String },
    /// 마감 시간 안에 응답 없음
    TimedOut,
    /// 버튼이 없어 표시만 하고 종료
    Shown,
}
