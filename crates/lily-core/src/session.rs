//! 알림 세션.
//!
//! 한 알림의 생명주기를 관리한다:
//! `Building → Presented → {Resolved | TimedOut | Shown}`.
//!
//! 사용자 액션 콜백과 마감 시간은 서로 경쟁한다. 결과는 단일 쓰기 슬롯
//! ([`OutcomeSlot`])에 기록되며 먼저 쓴 쪽만 반영된다. 늦게 도착한 쪽은
//! 조용히 무시된다.

use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::models::notification::{ImageAsset, NotificationOutcome, NotificationSpec};
use crate::ports::notifier::{NotificationPresenter, Presentation};

/// 사용자 응답 대기 기본 마감 시간
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(8);

/// 임시 이미지 파일 접두사
const TEMP_IMAGE_PREFIX: &str = "lily-";

// ============================================================
// 단일 쓰기 결과 슬롯
// ============================================================

#[derive(Debug, Default)]
struct SlotInner {
    outcome: Mutex<Option<NotificationOutcome>>,
    finalized: Notify,
}

/// 최대 한 번만 기록되는 결과 슬롯.
///
/// 두 번째 기록은 에러가 아니라 no-op이다.
#[derive(Debug, Clone, Default)]
pub struct OutcomeSlot {
    inner: Arc<SlotInner>,
}

impl OutcomeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 결과 기록 시도. 이 호출이 최초 기록이면 `true`.
    pub fn try_finalize(&self, outcome: NotificationOutcome) -> bool {
        {
            let mut slot = self.inner.outcome.lock();
            if slot.is_some() {
                return false;
            }
            *slot = Some(outcome);
        }
        self.inner.finalized.notify_waiters();
        true
    }

    /// 확정된 결과 (없으면 `None`)
    pub fn get(&self) -> Option<NotificationOutcome> {
        self.inner.outcome.lock().clone()
    }

    pub fn is_finalized(&self) -> bool {
        self.inner.outcome.lock().is_some()
    }

    /// 표시 계층에 넘길 액션 콜백 생성
    pub fn callback(&self) -> ActionCallback {
        ActionCallback { slot: self.clone() }
    }

    /// 결과가 확정되거나 `deadline`이 지날 때까지 대기.
    ///
    /// 콜백이 먼저 오면 즉시 깨어난다. 마감이 먼저 오면 `TimedOut`을
    /// 기록하려 시도하는데, 그 사이 콜백이 이겼다면 콜백 결과를 돌려준다.
    /// 어느 경우든 반환값은 슬롯에 기록된 값과 같다.
    pub async fn wait(&self, deadline: Duration) -> NotificationOutcome {
        let notified = self.inner.finalized.notified();
        tokio::pin!(notified);
        // 확인 전에 대기자로 등록해야 확인과 대기 사이의 기록을 놓치지 않는다.
        notified.as_mut().enable();

        if let Some(outcome) = self.get() {
            return outcome;
        }

        if tokio::time::timeout(deadline, notified).await.is_err() {
            self.try_finalize(NotificationOutcome::TimedOut);
        }

        self.get().unwrap_or(NotificationOutcome::TimedOut)
    }
}

/// 사용자 액션 콜백.
///
/// 표시 계층이 보관하다가 버튼이 눌리면 `fire`를 호출한다.
/// 복제해서 여러 곳에서 호출해도 최초 한 번만 반영된다.
#[derive(Debug, Clone)]
pub struct ActionCallback {
    slot: OutcomeSlot,
}

impl ActionCallback {
    /// 액션 토큰 전달. 결과를 확정했으면 `true`, 이미 확정돼 있었으면 `false`.
    pub fn fire(&self, token: impl Into<String>) -> bool {
        let token = token.into();
        let won = self.slot.try_finalize(NotificationOutcome::Resolved {
            action: token.clone(),
        });
        if !won {
            debug!("이미 확정된 알림의 늦은 액션 무시: {token}");
        }
        won
    }
}

// ============================================================
// 임시 이미지
// ============================================================

/// 세션이 소유하는 임시 이미지 파일들. drop 시 삭제된다.
#[derive(Debug, Default)]
struct StagedImages {
    icon: Option<NamedTempFile>,
    hero: Option<NamedTempFile>,
}

impl StagedImages {
    fn stage(spec: &NotificationSpec, dir: Option<&Path>) -> Result<Self, CoreError> {
        let icon = spec.icon().map(|a| stage_image(a, dir)).transpose()?;
        // icon이 이미 만들어졌다면 hero 실패 시 drop으로 정리된다.
        let hero = spec.hero().map(|a| stage_image(a, dir)).transpose()?;
        Ok(Self { icon, hero })
    }

    fn icon_path(&self) -> Option<PathBuf> {
        self.icon.as_ref().map(|f| f.path().to_path_buf())
    }

    fn hero_path(&self) -> Option<PathBuf> {
        self.hero.as_ref().map(|f| f.path().to_path_buf())
    }
}

fn stage_image(asset: &ImageAsset, dir: Option<&Path>) -> Result<NamedTempFile, CoreError> {
    let suffix = format!(".{}", asset.extension());
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_IMAGE_PREFIX).suffix(&suffix);

    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| CoreError::PresentationFailed(format!("임시 이미지 생성 실패: {e}")))?;

    file.write_all(asset.bytes())
        .and_then(|_| file.flush())
        .map_err(|e| CoreError::PresentationFailed(format!("임시 이미지 쓰기 실패: {e}")))?;

    Ok(file)
}

// ============================================================
// 세션
// ============================================================

/// 알림 하나의 표시와 결과 확정을 담당하는 세션.
///
/// 요청마다 새로 만들고 [`run`](Self::run)으로 소비한다.
/// 동시에 여러 세션이 있어도 서로 상태를 공유하지 않는다.
pub struct NotificationSession {
    presenter: Arc<dyn NotificationPresenter>,
    action_timeout: Duration,
    temp_dir: Option<PathBuf>,
}

impl NotificationSession {
    /// 새 세션 생성
    pub fn new(presenter: Arc<dyn NotificationPresenter>, action_timeout: Duration) -> Self {
        Self {
            presenter,
            action_timeout,
            temp_dir: None,
        }
    }

    /// 임시 이미지 디렉토리 지정 (기본: OS 임시 디렉토리)
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// 알림을 표시하고 결과가 확정될 때까지 기다린다.
    ///
    /// - 버튼이 없으면 대기 없이 `Shown`
    /// - 버튼이 있으면 콜백 또는 마감 중 먼저 온 쪽으로 확정
    /// - 표시 실패는 `PresentationFailed`, 대기는 시도하지 않음
    ///
    /// 임시 이미지는 결과와 무관하게 반환 전에 삭제된다.
    pub async fn run(self, spec: NotificationSpec) -> Result<NotificationOutcome, CoreError> {
        let staged = StagedImages::stage(&spec, self.temp_dir.as_deref())?;

        let presentation = Presentation {
            lines: spec.lines().to_vec(),
            actions: spec.actions().to_vec(),
            icon_path: staged.icon_path(),
            hero_path: staged.hero_path(),
        };

        let slot = OutcomeSlot::new();
        if let Err(e) = self.presenter.present(&presentation, slot.callback()).await {
            warn!("알림 표시 실패 ({}): {e}", spec.category().as_wire());
            return Err(match e {
                CoreError::PresentationFailed(_) => e,
                other => CoreError::PresentationFailed(other.to_string()),
            });
        }
        debug!("알림 표시됨 ({}), 결과 대기", spec.category().as_wire());

        let outcome = if spec.is_interactive() {
            slot.wait(self.action_timeout).await
        } else {
            // 이후 도착하는 콜백은 모두 무시된다.
            slot.try_finalize(NotificationOutcome::Shown);
            NotificationOutcome::Shown
        };

        info!(
            "알림 결과 ({}): {:?}",
            spec.category().as_wire(),
            outcome
        );
        drop(staged);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::{NotificationCategory, NotificationRequest};
    use async_trait::async_trait;
    use tokio::time::Instant;

    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    /// 표시 시점의 이미지 경로를 기록하고 지정된 방식으로 응답하는 가짜 표시기
    #[derive(Default)]
    struct FakePresenter {
        reply: Option<(String, Option<Duration>)>,
        fail: bool,
        seen: Mutex<Vec<(Presentation, bool)>>,
    }

    impl FakePresenter {
        fn clicking(token: &str, after: Option<Duration>) -> Self {
            Self {
                reply: Some((token.to_string(), after)),
                ..Default::default()
            }
        }

        fn failing() -> Self {
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
            let images_exist = presentation
                .icon_path
                .iter()
                .chain(presentation.hero_path.iter())
                .all(|p| p.exists());
            self.seen.lock().push((presentation.clone(), images_exist));

            if self.fail {
                return Err(CoreError::PresentationFailed("알림 서비스 없음".into()));
            }
            match &self.reply {
                Some((token, None)) => {
                    on_action.fire(token.clone());
                }
                Some((token, Some(delay))) => {
                    let token = token.clone();
                    let delay = *delay;
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        on_action.fire(token);
                    });
                }
                None => {}
            }
            Ok(())
        }
    }

    fn spec(category: NotificationCategory, with_images: bool) -> NotificationSpec {
        let image = || with_images.then(|| ImageAsset::from_bytes(PNG_MAGIC.to_vec()).unwrap());
        NotificationSpec::from_request(NotificationRequest {
            category,
            logo_image: image(),
            hero_image: image(),
            text: "본문".to_string(),
            caller_name: Some("Alex".to_string()),
            caller_number: Some("555-1212".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn slot_is_single_write() {
        let slot = OutcomeSlot::new();
        assert!(!slot.is_finalized());
        assert!(slot.try_finalize(NotificationOutcome::TimedOut));
        assert!(!slot.try_finalize(NotificationOutcome::Resolved {
            action: "action=answer".into()
        }));
        assert_eq!(slot.get(), Some(NotificationOutcome::TimedOut));
    }

    #[test]
    fn late_callback_is_discarded() {
        let slot = OutcomeSlot::new();
        let callback = slot.callback();
        assert!(callback.fire("action=reply"));
        assert!(!callback.clone().fire("action=markread"));
        assert_eq!(
            slot.get(),
            Some(NotificationOutcome::Resolved {
                action: "action=reply".into()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out_at_deadline() {
        let slot = OutcomeSlot::new();
        let started = Instant::now();
        let outcome = slot.wait(Duration::from_secs(8)).await;
        let elapsed = started.elapsed();

        assert_eq!(outcome, NotificationOutcome::TimedOut);
        assert!(elapsed >= Duration::from_secs(8));
        assert!(elapsed < Duration::from_secs(9));
        assert!(!slot.callback().fire("action=answer"));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_wakes_early_on_callback() {
        let slot = OutcomeSlot::new();
        let callback = slot.callback();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            callback.fire("action=decline");
        });

        let started = Instant::now();
        let outcome = slot.wait(Duration::from_secs(8)).await;
        assert_eq!(
            outcome,
            NotificationOutcome::Resolved {
                action: "action=decline".into()
            }
        );
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn wait_returns_already_finalized_outcome() {
        let slot = OutcomeSlot::new();
        slot.callback().fire("action=answer");
        let outcome = slot.wait(Duration::from_millis(1)).await;
        assert_eq!(
            outcome,
            NotificationOutcome::Resolved {
                action: "action=answer".into()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn simultaneous_callback_and_deadline_pick_one_winner() {
        let slot = OutcomeSlot::new();
        let callback = slot.callback();
        let firing = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            callback.fire("action=answer")
        });

        let outcome = slot.wait(Duration::from_secs(1)).await;
        let callback_won = firing.await.unwrap();

        assert_eq!(slot.get(), Some(outcome.clone()));
        match outcome {
            NotificationOutcome::Resolved { action } => {
                assert!(callback_won);
                assert_eq!(action, "action=answer");
            }
            NotificationOutcome::TimedOut => assert!(!callback_won),
            NotificationOutcome::Shown => panic!("대화형 알림은 Shown이 될 수 없음"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_threads_never_produce_two_outcomes() {
        for _ in 0..200 {
            let slot = OutcomeSlot::new();
            let callback = slot.callback();
            let firing = std::thread::spawn(move || {
                std::thread::sleep(Duration::from_micros(500));
                callback.fire("action=reply")
            });

            let outcome = slot.wait(Duration::from_micros(500)).await;
            let callback_won = firing.join().unwrap();

            assert_eq!(slot.get(), Some(outcome.clone()));
            assert_eq!(
                callback_won,
                matches!(outcome, NotificationOutcome::Resolved { .. })
            );
        }
    }

    #[tokio::test]
    async fn alert_is_shown_without_waiting() {
        let presenter = Arc::new(FakePresenter::clicking("action=answer", None));
        let session = NotificationSession::new(presenter.clone(), Duration::from_secs(3600));

        let outcome = session
            .run(spec(NotificationCategory::Alert, false))
            .await
            .unwrap();
        assert_eq!(outcome, NotificationOutcome::Shown);

        let seen = presenter.seen.lock();
        assert!(seen[0].0.actions.is_empty());
    }

    #[tokio::test]
    async fn immediate_click_resolves() {
        let presenter = Arc::new(FakePresenter::clicking("action=answer", None));
        let outcome = NotificationSession::new(presenter, DEFAULT_ACTION_TIMEOUT)
            .run(spec(NotificationCategory::Call, false))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            NotificationOutcome::Resolved {
                action: "action=answer".into()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_click_resolves_before_deadline() {
        let presenter = Arc::new(FakePresenter::clicking(
            "action=markread",
            Some(Duration::from_secs(3)),
        ));
        let outcome = NotificationSession::new(presenter, DEFAULT_ACTION_TIMEOUT)
            .run(spec(NotificationCategory::Message, false))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            NotificationOutcome::Resolved {
                action: "action=markread".into()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn no_click_times_out() {
        let presenter = Arc::new(FakePresenter::default());
        let outcome = NotificationSession::new(presenter, DEFAULT_ACTION_TIMEOUT)
            .run(spec(NotificationCategory::Message, false))
            .await
            .unwrap();
        assert_eq!(outcome, NotificationOutcome::TimedOut);
    }

    #[tokio::test]
    async fn temp_images_exist_while_presented_and_removed_after() {
        let dir = tempfile::TempDir::new().unwrap();
        let presenter = Arc::new(FakePresenter::clicking("action=reply", None));
        let outcome = NotificationSession::new(presenter.clone(), DEFAULT_ACTION_TIMEOUT)
            .with_temp_dir(dir.path())
            .run(spec(NotificationCategory::Message, true))
            .await
            .unwrap();
        assert!(matches!(outcome, NotificationOutcome::Resolved { .. }));

        let seen = presenter.seen.lock();
        let (presentation, images_existed) = &seen[0];
        assert!(images_existed);
        let icon = presentation.icon_path.as_ref().unwrap();
        assert_eq!(icon.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(!icon.exists());
        assert!(!presentation.hero_path.as_ref().unwrap().exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn presentation_failure_cleans_up_and_skips_wait() {
        let dir = tempfile::TempDir::new().unwrap();
        let presenter = Arc::new(FakePresenter::failing());
        let started = std::time::Instant::now();
        let result = NotificationSession::new(presenter, Duration::from_secs(3600))
            .with_temp_dir(dir.path())
            .run(spec(NotificationCategory::Call, true))
            .await;

        assert!(matches!(result, Err(CoreError::PresentationFailed(_))));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
