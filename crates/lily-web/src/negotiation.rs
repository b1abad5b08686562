//! 응답 압축 협상 미들웨어.
//!
//! 요청의 `Accept-Encoding`이 코덱 토큰(예: `zstd`)을 허용하고 응답이
//! 성공(200) JSON이면 본문을 압축하고 `Content-Encoding`/`Content-Length`를
//! 갱신한다. 그 외 응답은 손대지 않는다.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, VARY};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::AppState;

/// 압축 대상 Content-Type 접두사
const JSON_CONTENT_TYPE: &str = "application/json";

/// 요청 헤더가 `encoding`을 허용하는지 판단.
///
/// `Accept-Encoding: gzip, zstd;q=0.8` 형식을 해석하며 `q=0`은 거부로 본다.
/// 와일드카드(`*`)는 코덱을 명시적으로 허용한 것으로 보지 않는다.
pub fn accepts_encoding(headers: &HeaderMap, encoding: &str) -> bool {
    headers
        .get_all(ACCEPT_ENCODING)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|item| {
            let mut parts = item.split(';');
            let name = parts.next().unwrap_or_default().trim();
            if !name.eq_ignore_ascii_case(encoding) {
                return false;
            }
            let quality = parts
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            quality > 0.0
        })
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.starts_with(JSON_CONTENT_TYPE))
}

/// 응답 압축 미들웨어
pub async fn compress_response(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let codec = state
        .codec
        .clone()
        .filter(|codec| accepts_encoding(request.headers(), codec.encoding()));

    let response = next.run(request).await;

    let Some(codec) = codec else {
        return response;
    };
    if response.status() != StatusCode::OK
        || !is_json(response.headers())
        || response.headers().contains_key(CONTENT_ENCODING)
    {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let raw = match to_bytes(body, usize::MAX).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("응답 본문 읽기 실패: {e}");
            return ApiError::Internal(format!("응답 본문 읽기 실패: {e}")).into_response();
        }
    };

    let encoding = codec.encoding();
    let input = raw.clone();
    let compressed = match tokio::task::spawn_blocking(move || codec.compress(&input)).await {
        Ok(Ok(compressed)) => compressed,
        Ok(Err(e)) => {
            warn!("응답 압축 실패, 원본 전송: {e}");
            return Response::from_parts(parts, Body::from(raw));
        }
        Err(e) => {
            warn!("응답 압축 작업 실패, 원본 전송: {e}");
            return Response::from_parts(parts, Body::from(raw));
        }
    };

    debug!("응답 압축 ({encoding}): {} → {} bytes", raw.len(), compressed.len());
    parts
        .headers
        .insert(CONTENT_ENCODING, HeaderValue::from_static(encoding));
    parts
        .headers
        .insert(CONTENT_LENGTH, HeaderValue::from(compressed.len()));
    parts
        .headers
        .append(VARY, HeaderValue::from_static("accept-encoding"));

    Response::from_parts(parts, Body::from(compressed))
}
