//! 데스크톱 알림 어댑터.
//!
//! `NotificationPresenter` 포트 구현. notify-rust 기반.
//!
//! XDG(Linux/BSD) 알림 서버에서는 버튼 클릭을 `wait_for_action`으로 받아
//! 세션의 `ActionCallback`에 전달한다. Windows에서는 WinRT 토스트
//! ([`crate::toast`])의 `Activated` 이벤트로 받는다. macOS에서는 버튼을
//! 표시만 하고 클릭을 보고하지 못하므로 대화형 알림은 마감 시간까지 기다린다.

use async_trait::async_trait;
use lily_core::error::CoreError;
use lily_core::ports::notifier::{NotificationPresenter, Presentation};
use lily_core::session::ActionCallback;
use notify_rust::{Notification, Timeout};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// 알림이 버튼 없이 닫혔을 때 notify-rust가 전달하는 액션 이름
#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
const CLOSED_ACTION: &str = "__closed";

/// 데스크톱 알림 어댑터: `NotificationPresenter` 포트 구현
pub struct HostNotifier {
    app_name: String,
    action_timeout: Duration,
    /// 동시 요청의 표시 호출을 한 번에 하나씩 처리 (대기는 직렬화하지 않음)
    presentation_lock: Option<Mutex<()>>,
}

impl HostNotifier {
    /// 새 알림 어댑터 생성
    pub fn new(app_name: impl Into<String>, action_timeout: Duration) -> Self {
        Self {
            app_name: app_name.into(),
            action_timeout,
            presentation_lock: None,
        }
    }

    /// 표시 호출 직렬화 여부 설정
    pub fn with_serialized_presentation(mut self, enabled: bool) -> Self {
        self.presentation_lock = enabled.then(|| Mutex::new(()));
        self
    }

    /// notify-rust 알림 구성
    #[cfg_attr(windows, allow(dead_code))]
    fn build(&self, presentation: &Presentation) -> Notification {
        let mut notification = Notification::new();
        notification.appname(&self.app_name);

        let mut lines = presentation.lines.iter();
        let summary = lines.next().map(String::as_str).unwrap_or(&self.app_name);
        notification.summary(summary);
        let body = lines.map(String::as_str).collect::<Vec<_>>().join("\n");
        if !body.is_empty() {
            notification.body(&body);
        }

        if let Some(icon) = &presentation.icon_path {
            notification.icon(&icon.to_string_lossy());
        }
        if let Some(hero) = &presentation.hero_path {
            attach_hero(&mut notification, hero);
        }

        for action in &presentation.actions {
            notification.action(&action.token, &action.label);
        }
        if !presentation.actions.is_empty() {
            // 세션 마감과 함께 알림도 사라지도록 맞춘다.
            let millis = u32::try_from(self.action_timeout.as_millis()).unwrap_or(u32::MAX);
            notification.timeout(Timeout::Milliseconds(millis));
        }

        notification
    }
}

#[async_trait]
impl NotificationPresenter for HostNotifier {
    async fn present(
        &self,
        presentation: &Presentation,
        on_action: ActionCallback,
    ) -> Result<(), CoreError> {
        let _guard = match &self.presentation_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let tokens: Vec<String> = presentation
            .actions
            .iter()
            .map(|a| a.token.clone())
            .collect();
        debug!(
            "알림 표시: {:?} (버튼 {}개)",
            presentation.lines.first(),
            tokens.len()
        );

        self.deliver(presentation, tokens, on_action).await
    }
}

impl HostNotifier {
    #[cfg(not(windows))]
    async fn deliver(
        &self,
        presentation: &Presentation,
        tokens: Vec<String>,
        on_action: ActionCallback,
    ) -> Result<(), CoreError> {
        let notification = self.build(presentation);
        tokio::task::spawn_blocking(move || show(notification, tokens, on_action))
            .await
            .map_err(|e| CoreError::PresentationFailed(format!("알림 표시 작업 실패: {e}")))?
    }

    #[cfg(windows)]
    async fn deliver(
        &self,
        presentation: &Presentation,
        tokens: Vec<String>,
        on_action: ActionCallback,
    ) -> Result<(), CoreError> {
        let xml = crate::toast::toast_xml(&self.app_name, presentation);
        let toast = tokio::task::spawn_blocking(move || crate::toast::show(&xml, tokens, on_action))
            .await
            .map_err(|e| CoreError::PresentationFailed(format!("알림 표시 작업 실패: {e}")))??;

        // 토스트 객체를 놓으면 Activated 이벤트도 끊기므로 마감까지 붙잡아 둔다.
        let hold = self.action_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(hold).await;
            drop(toast);
        });
        Ok(())
    }
}

/// 알림 서버가 돌려준 액션이 이 알림의 버튼인지 여부.
///
/// 본문 클릭(`default`)이나 닫힘(`__closed`)은 버튼 선택이 아니다.
pub(crate) fn is_button_action(action: &str, tokens: &[String]) -> bool {
    tokens.iter().any(|t| t == action)
}

#[cfg_attr(windows, allow(dead_code))]
fn presentation_failed(error: notify_rust::error::Error) -> CoreError {
    CoreError::PresentationFailed(error.to_string())
}

#[cfg(all(unix, not(target_os = "macos")))]
fn attach_hero(notification: &mut Notification, path: &Path) {
    notification.image_path(&path.to_string_lossy());
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn attach_hero(_notification: &mut Notification, path: &Path) {
    debug!("히어로 이미지는 이 플랫폼에서 표시되지 않음: {}", path.display());
}

#[cfg(all(unix, not(target_os = "macos")))]
fn show(
    notification: Notification,
    tokens: Vec<String>,
    on_action: ActionCallback,
) -> Result<(), CoreError> {
    let handle = notification.show().map_err(presentation_failed)?;
    if tokens.is_empty() {
        return Ok(());
    }

    // 알림이 닫히거나 버튼이 눌릴 때까지 블로킹되므로 별도 스레드에서 기다린다.
    std::thread::Builder::new()
        .name("lily-notify-action".to_string())
        .spawn(move || {
            handle.wait_for_action(|action| {
                if action == CLOSED_ACTION {
                    debug!("알림 닫힘 (버튼 선택 없음)");
                } else if is_button_action(action, &tokens) {
                    on_action.fire(action);
                } else {
                    debug!("버튼이 아닌 알림 액션 무시: {action}");
                }
            });
        })
        .map_err(|e| CoreError::PresentationFailed(format!("액션 대기 스레드 생성 실패: {e}")))?;

    Ok(())
}

#[cfg(all(not(windows), not(all(unix, not(target_os = "macos")))))]
fn show(
    notification: Notification,
    tokens: Vec<String>,
    _on_action: ActionCallback,
) -> Result<(), CoreError> {
    notification.show().map(|_| ()).map_err(presentation_failed)?;
    if !tokens.is_empty() {
        debug!("이 플랫폼은 버튼 콜백을 지원하지 않음, 마감까지 대기");
    }
    Ok(())
}
