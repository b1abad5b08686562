//! 라우트 정의.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::negotiation;
use crate::AppState;

/// 전체 라우터 생성
pub fn build_router(state: AppState) -> Router {
    // CORS 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::info::index))
        .route("/clipboard", get(handlers::clipboard::get_clipboard))
        .route("/notify", post(handlers::notify::post_notify))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            negotiation::compress_response,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
