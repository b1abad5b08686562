//! 데스크톱 알림 표시 포트.
//!
//! 구현: `lily-host` crate (notify-rust)

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::CoreError;
use crate::models::notification::NotificationAction;
use crate::session::ActionCallback;

/// 표시 계층에 넘기는 알림 내용.
///
/// 이미지는 세션이 임시 파일로 풀어둔 경로로 전달된다.
/// 경로는 `present` 호출 동안과 세션이 끝날 때까지 유효하다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
    /// 표시 줄 (첫 줄은 제목)
    pub lines: Vec<String>,
    /// 버튼 목록
    pub actions: Vec<NotificationAction>,
    /// 앱 로고 위치 이미지
    pub icon_path: Option<PathBuf>,
    /// 히어로 위치 이미지
    pub hero_path: Option<PathBuf>,
}

/// 데스크톱 알림 인터페이스
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    /// 알림을 화면에 띄운다.
    ///
    /// 반환 시점에 알림은 표시된 상태여야 한다. 사용자가 버튼을 누르면
    /// 구현체는 나중에(다른 스레드에서라도) `on_action.fire(token)`을 호출한다.
    /// 버튼을 보고할 수 없는 플랫폼은 `on_action`을 그냥 버려도 된다.
    async fn present(
        &self,
        presentation: &Presentation,
        on_action: ActionCallback,
    ) -> Result<(), CoreError>;
}
