//! 라우터 테스트용 가짜 호스트 어댑터.

use async_trait::async_trait;
use lily_core::error::CoreError;
use lily_core::models::clipboard::ClipboardContent;
use lily_core::ports::clipboard::ClipboardSource;
use lily_core::ports::notifier::{NotificationPresenter, Presentation};
use lily_core::session::ActionCallback;
use parking_lot::Mutex;
use std::time::Duration;

/// 1x1 PNG
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0xF8, 0xCF, 0xC0, 0xF0,
    0x1F, 0x00, 0x05, 0x00, 0x01, 0xFF, 0x89, 0x99, 0x3D, 0x1D, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// 고정 내용을 돌려주는 클립보드 (`None`이면 접근 불가)
pub struct FakeClipboard(pub Option<ClipboardContent>);

impl ClipboardSource for FakeClipboard {
    fn read(&self) -> Result<ClipboardContent, CoreError> {
        self.0
            .clone()
            .ok_or_else(|| CoreError::ClipboardUnavailable("locked by another process".into()))
    }
}

/// 표시 내용을 기록하고 지정된 토큰으로 응답하는 표시기
#[derive(Default)]
pub struct FakePresenter {
    reply: Option<(String, Duration)>,
    fail: bool,
    pub seen: Mutex<Vec<Presentation>>,
}

impl FakePresenter {
    /// 버튼을 누르지 않는 사용자
    pub fn silent() -> Self {
        Self::default()
    }

    /// `after` 뒤에 `token` 버튼을 누르는 사용자
    pub fn clicking(token: &str, after: Duration) -> Self {
        Self {
            reply: Some((token.to_string(), after)),
            ..Default::default()
        }
    }

    /// 알림 서브시스템 장애
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl NotificationPresenter for FakePresenter {
    async fn present(
        &self,
        presentation: &Presentation,
        on_action: ActionCallback,
    ) -> Result<(), CoreError> {
        if self.fail {
            return Err(CoreError::PresentationFailed("no notification daemon".into()));
        }
        self.seen.lock().push(presentation.clone());
        if let Some((token, after)) = self.reply.clone() {
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                on_action.fire(token);
            });
        }
        Ok(())
    }
}
