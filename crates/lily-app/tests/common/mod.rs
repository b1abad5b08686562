//! 통합 테스트 공용 가짜 어댑터.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use lily_codec::ZstdCodec;
use lily_core::error::CoreError;
use lily_core::models::clipboard::ClipboardContent;
use lily_core::ports::clipboard::ClipboardSource;
use lily_core::ports::notifier::{NotificationPresenter, Presentation};
use lily_core::session::ActionCallback;
use lily_web::{build_router, AppState};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 1x1 PNG
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0xF8, 0xCF, 0xC0, 0xF0,
    0x1F, 0x00, 0x05, 0x00, 0x01, 0xFF, 0x89, 0x99, 0x3D, 0x1D, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// 고정 내용 클립보드 (`None`이면 점유됨)
pub struct StaticClipboard(pub Option<ClipboardContent>);

impl ClipboardSource for StaticClipboard {
    fn read(&self) -> Result<ClipboardContent, CoreError> {
        self.0
            .clone()
            .ok_or_else(|| CoreError::ClipboardUnavailable("clipboard is locked".into()))
    }
}

/// 사용자 역할을 흉내내는 표시기
#[derive(Default)]
pub struct ScriptedUser {
    /// (토큰, 지연). 없으면 아무 버튼도 누르지 않는다.
    pub click: Option<(String, Duration)>,
    /// 마감 이후에도 누르는 늦은 클릭
    pub late_click: Option<(String, Duration)>,
    pub presented: Mutex<Vec<Presentation>>,
    /// 실행된 클릭과 `fire()` 결과 (결과를 확정했으면 `true`)
    pub fired: Arc<Mutex<Vec<(String, bool)>>>,
}

impl ScriptedUser {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn clicks(token: &str, after: Duration) -> Self {
        Self {
            click: Some((token.to_string(), after)),
            ..Default::default()
        }
    }

    pub fn clicks_late(token: &str, after: Duration) -> Self {
        Self {
            late_click: Some((token.to_string(), after)),
            ..Default::default()
        }
    }
}

#[async_trait]
impl NotificationPresenter for ScriptedUser {
    async fn present(
        &self,
        presentation: &Presentation,
        on_action: ActionCallback,
    ) -> Result<(), CoreError> {
        self.presented.lock().unwrap().push(presentation.clone());
        for (token, after) in [self.click.clone(), self.late_click.clone()]
            .into_iter()
            .flatten()
        {
            let callback = on_action.clone();
            let fired = self.fired.clone();
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                let won = callback.fire(token.clone());
                fired.lock().unwrap().push((token, won));
            });
        }
        Ok(())
    }
}

/// zstd 협상이 켜진 라우터
pub fn router(clipboard: Option<ClipboardContent>, user: Arc<ScriptedUser>) -> Router {
    let state = AppState::new(Arc::new(StaticClipboard(clipboard)), user)
        .with_codec(Arc::new(ZstdCodec::default()));
    build_router(state)
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
