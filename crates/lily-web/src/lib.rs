//! # lily-web
//!
//! 로컬 HTTP 요청 디스패처.
//! Axum 기반으로 호스트 클립보드와 데스크톱 알림을 원격 호출자에게 노출한다.
//!
//! ## 라우트
//! - `GET /` 상태 확인
//! - `GET /clipboard` 현재 클립보드 내용 (텍스트 또는 base64 PNG)
//! - `POST /notify` 대화형 알림 표시 후 사용자 선택 반환
//!
//! 성공한 JSON 응답은 호출자가 `Accept-Encoding: zstd`를 보내면 압축된다.

pub mod error;
pub mod handlers;
pub mod negotiation;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

use lily_core::config::ServerConfig;
use lily_core::ports::clipboard::ClipboardSource;
use lily_core::ports::compressor::PayloadCodec;
use lily_core::ports::notifier::NotificationPresenter;
use lily_core::session::{NotificationSession, DEFAULT_ACTION_TIMEOUT};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

pub use routes::build_router;

/// 디스패처 공유 상태.
///
/// 요청 간에 공유되는 것은 무상태 코덱과 호스트 어댑터뿐이다.
#[derive(Clone)]
pub struct AppState {
    /// 클립보드 리더
    pub clipboard: Arc<dyn ClipboardSource>,
    /// 알림 표시기
    pub presenter: Arc<dyn NotificationPresenter>,
    /// 응답 압축 코덱 (없으면 압축 협상 비활성화)
    pub codec: Option<Arc<dyn PayloadCodec>>,
    /// 버튼 응답 대기 시간
    pub action_timeout: Duration,
    /// 임시 이미지 디렉토리 (없으면 시스템 기본)
    pub temp_dir: Option<PathBuf>,
}

impl AppState {
    /// 새 상태 생성 (압축 비활성화, 기본 대기 시간)
    pub fn new(
        clipboard: Arc<dyn ClipboardSource>,
        presenter: Arc<dyn NotificationPresenter>,
    ) -> Self {
        Self {
            clipboard,
            presenter,
            codec: None,
            action_timeout: DEFAULT_ACTION_TIMEOUT,
            temp_dir: None,
        }
    }

    /// 응답 압축 코덱 설정
    pub fn with_codec(mut self, codec: Arc<dyn PayloadCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// 버튼 응답 대기 시간 설정
    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    /// 임시 이미지 디렉토리 설정
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// 요청 하나를 위한 새 알림 세션
    pub fn session(&self) -> NotificationSession {
        let session = NotificationSession::new(self.presenter.clone(), self.action_timeout);
        match &self.temp_dir {
            Some(dir) => session.with_temp_dir(dir.clone()),
            None => session,
        }
    }
}

/// 로컬 HTTP 서버
pub struct WebServer {
    config: ServerConfig,
    state: AppState,
}

impl WebServer {
    /// 새 서버 생성
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// 서버 실행
    ///
    /// 설정된 포트에만 바인드한다. 포트가 사용 중이면 에러를 반환한다.
    ///
    /// # Arguments
    /// * `shutdown_rx` - 종료 신호 수신 채널
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let addr: SocketAddr = format!("{}:{}", self.config.host(), self.config.port)
            .parse()
            .map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("잘못된 주소 {}:{}: {e}", self.config.host(), self.config.port),
                )
            })?;

        let listener = TcpListener::bind(addr).await?;
        info!("HTTP 서버 시작: http://{}", listener.local_addr()?);

        let app = build_router(self.state);

        // 진행 중인 알림 세션은 마감 시간 안에 끝나므로 기다렸다가 종료한다.
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("HTTP 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("HTTP 서버 종료");
        Ok(())
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}
