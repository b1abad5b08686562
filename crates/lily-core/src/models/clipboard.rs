//! 클립보드 내용 모델.
//!
//! 매 조회마다 새로 만들어지며 한 요청 안에서만 살아있다.

use serde::{Deserialize, Serialize};

/// 이미지 클립보드 MIME (원본 포맷과 무관하게 PNG로 정규화)
pub const MIME_IMAGE_PNG: &str = "image/png";

/// 텍스트 클립보드 MIME
pub const MIME_TEXT_UTF8: &str = "text/plain; charset=utf-8";

/// 클립보드 내용 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipboardContentKind {
    /// 이미지 (PNG)
    Image,
    /// 유니코드 텍스트
    Text,
    /// 내용 없음
    Empty,
}

/// 클립보드 조회 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardContent {
    /// PNG로 재인코딩된 이미지 바이트
    Image { png: Vec<u8> },
    /// 유니코드 텍스트
    Text(String),
    /// 복사된 내용 없음
    Empty,
}

impl ClipboardContent {
    /// 내용 유형
    pub fn kind(&self) -> ClipboardContentKind {
        match self {
            Self::Image { .. } => ClipboardContentKind::Image,
            Self::Text(_) => ClipboardContentKind::Text,
            Self::Empty => ClipboardContentKind::Empty,
        }
    }

    /// MIME 타입 (`Empty`면 없음)
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            Self::Image { .. } => Some(MIME_IMAGE_PNG),
            Self::Text(_) => Some(MIME_TEXT_UTF8),
            Self::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
