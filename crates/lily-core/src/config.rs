//! 애플리케이션 설정 구조체.
//!
//! 서버 바인딩, 알림 대기 시간, 응답 압축 설정을 정의한다.
//! `ConfigManager`를 통해 JSON 파일에서 로드하고 CLI 인자로 오버라이드한다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;
use crate::session::DEFAULT_ACTION_TIMEOUT;

/// zstd 최대 압축 레벨
pub const MAX_COMPRESSION_LEVEL: i32 = 22;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 알림 설정
    #[serde(default)]
    pub notification: NotificationConfig,
    /// 응답 압축 설정
    #[serde(default)]
    pub compression: CompressionConfig,
}

impl AppConfig {
    /// 기본 설정
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 알림 응답 대기 시간
    pub fn action_timeout(&self) -> Duration {
        Duration::from_secs(self.notification.action_timeout_secs)
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.server.port == 0 {
            return Err(CoreError::Config("server.port는 0일 수 없습니다".to_string()));
        }
        if self.notification.action_timeout_secs == 0 {
            return Err(CoreError::Config(
                "notification.action_timeout_secs는 1 이상이어야 합니다".to_string(),
            ));
        }
        if !(1..=MAX_COMPRESSION_LEVEL).contains(&self.compression.level) {
            return Err(CoreError::Config(format!(
                "compression.level은 1..={MAX_COMPRESSION_LEVEL} 범위여야 합니다 (현재 {})",
                self.compression.level
            )));
        }
        Ok(())
    }
}

// ============================================================
// 서버 설정
// ============================================================

/// HTTP 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 포트 (기본: 5000)
    #[serde(default = "default_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (true: 0.0.0.0, false: 127.0.0.1 only)
    ///
    /// 인증이 없으므로 신뢰할 수 있는 LAN에서만 켠다.
    #[serde(default = "default_true")]
    pub allow_external: bool,
}

impl ServerConfig {
    /// 바인드 호스트
    pub fn host(&self) -> &'static str {
        if self.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allow_external: true,
        }
    }
}

fn default_port() -> u16 {
    5000
}

// ============================================================
// 알림 설정
// ============================================================

/// 알림 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// 알림에 표시되는 앱 이름
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// 버튼 응답 대기 시간 (초)
    #[serde(default = "default_action_timeout_secs")]
    pub action_timeout_secs: u64,
    /// 알림 표시 호출 직렬화 (동시 `/notify` 요청 간 표시 순서 보장)
    #[serde(default = "default_true")]
    pub serialize_presentation: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            action_timeout_secs: default_action_timeout_secs(),
            serialize_presentation: true,
        }
    }
}

fn default_app_name() -> String {
    "Lily".to_string()
}

fn default_action_timeout_secs() -> u64 {
    DEFAULT_ACTION_TIMEOUT.as_secs()
}

// ============================================================
// 압축 설정
// ============================================================

/// 응답 압축 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// 협상 기반 응답 압축 활성화
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// zstd 레벨 (1-22, 응답이 작고 드물어 압축률 우선)
    #[serde(default = "default_compression_level")]
    pub level: i32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_compression_level(),
        }
    }
}

fn default_compression_level() -> i32 {
    MAX_COMPRESSION_LEVEL
}

fn default_true() -> bool {
    true
}
