//! Lily 핵심 에러 타입.
//!
//! 어댑터 crate와 웹 계층은 이 타입을 그대로 전파하거나 자체 에러로 매핑한다.

use thiserror::Error;

/// 코어 레이어 에러.
///
/// 클라이언트 잘못(`Validation`, `Decode`)과 호스트 자원 장애
/// (`ClipboardUnavailable`, `PresentationFailed`)를 구분한다.
/// 알림 타임아웃은 에러가 아니라 정상 결과(`NotificationOutcome::TimedOut`)다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 요청 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// base64/이미지 페이로드 디코딩 실패
    #[error("디코딩 실패: {0}")]
    Decode(String),

    /// 클립보드 접근 불가 (다른 프로세스가 점유 중 등)
    #[error("클립보드 접근 불가: {0}")]
    ClipboardUnavailable(String),

    /// 알림 표시 실패 (이미지 손상, 알림 서브시스템 부재 등)
    #[error("알림 표시 실패: {0}")]
    PresentationFailed(String),

    /// 응답 압축 실패
    #[error("압축 실패: {0}")]
    Compression(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 필드 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 호출자 입력 때문에 발생한 에러인지 여부
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Decode(_))
    }
}
