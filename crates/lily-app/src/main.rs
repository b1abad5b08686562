//! # lily-app
//!
//! Lily 바이너리 진입점.
//! 설정 로드, 호스트 어댑터 생성, HTTP 서버 실행, 종료 시그널 처리.

use anyhow::{Context, Result};
use clap::Parser;
use lily_codec::ZstdCodec;
use lily_core::config::AppConfig;
use lily_core::config_manager::ConfigManager;
use lily_host::{HostClipboard, HostNotifier};
use lily_web::{AppState, WebServer};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 로그 필터를 적용할 crate 목록
const LOG_TARGETS: &[&str] = &[
    "lily",
    "lily_app",
    "lily_core",
    "lily_codec",
    "lily_host",
    "lily_web",
    "tower_http",
];

/// Lily 클립보드/알림 브리지
///
/// 원격 호출자에게 호스트 클립보드와 대화형 데스크톱 알림을 HTTP로 노출한다.
#[derive(Parser, Debug)]
#[command(name = "lily")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 리스닝 포트 (설정 파일 값 대체)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 127.0.0.1에만 바인드
    #[arg(long)]
    local_only: bool,

    /// 알림 버튼 응답 대기 시간 (초)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

impl Args {
    /// CLI 인자를 설정에 덮어쓴다
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.local_only {
            config.server.allow_external = false;
        }
        if let Some(secs) = self.timeout_secs {
            config.notification.action_timeout_secs = secs;
        }
    }
}

fn log_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// 설정에 따라 디스패처 상태 구성
fn build_state(config: &AppConfig) -> AppState {
    let notifier = HostNotifier::new(
        config.notification.app_name.clone(),
        config.action_timeout(),
    )
    .with_serialized_presentation(config.notification.serialize_presentation);

    let state = AppState::new(Arc::new(HostClipboard::new()), Arc::new(notifier))
        .with_action_timeout(config.action_timeout());

    if config.compression.enabled {
        state.with_codec(Arc::new(ZstdCodec::new(config.compression.level)))
    } else {
        state
    }
}

/// 종료 시그널 핸들러를 등록하고, 시그널이 오면 완료되는 future를 돌려준다.
///
/// 등록 실패는 서버 시작 전에 에러로 드러난다.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt()).context("SIGINT 핸들러 등록 실패")?;
    let mut sigterm = signal(SignalKind::terminate()).context("SIGTERM 핸들러 등록 실패")?;
    Ok(async move {
        tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl+C 대기 실패, 프로세스 종료로만 중단 가능: {e}");
            std::future::pending::<()>().await;
        }
        "Ctrl+C"
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(&args.log_level))),
        )
        .init();

    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;
    info!("설정 파일: {}", manager.config_path().display());

    let mut config = manager.get();
    args.apply_to(&mut config);
    config.validate().context("잘못된 설정")?;

    if config.server.allow_external {
        warn!("모든 인터페이스에 바인드 (인증 없음): 신뢰할 수 있는 네트워크에서만 사용");
    }
    info!(
        "알림 대기 시간 {}초, 응답 압축 {}",
        config.notification.action_timeout_secs,
        if config.compression.enabled {
            format!("zstd 레벨 {}", config.compression.level)
        } else {
            "비활성화".to_string()
        }
    );

    let server = WebServer::new(config.server.clone(), build_state(&config));
    info!("Lily 시작: {}", server.url());

    // 서버는 진행 중인 알림 세션이 끝난 뒤 종료하므로 임시 이미지도 정리된다.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal = shutdown_signal()?;
    tokio::spawn(async move {
        let name = signal.await;
        info!("{name} 수신, 종료 시작");
        let _ = shutdown_tx.send(true);
    });

    server
        .run(shutdown_rx)
        .await
        .with_context(|| format!("HTTP 서버 실행 실패 (포트 {})", config.server.port))?;

    info!("Lily 종료");
    Ok(())
}
