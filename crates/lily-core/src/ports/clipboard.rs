//! 호스트 클립보드 조회 포트.
//!
//! 구현: `lily-host` crate (arboard)

use crate::error::CoreError;
use crate::models::clipboard::ClipboardContent;

/// 클립보드 조회 인터페이스.
///
/// 블로킹 호출이다. 캐시 없이 매번 실제 클립보드를 다시 조회한다.
/// 클립보드가 비어 있으면 `Ok(ClipboardContent::Empty)`,
/// 접근 자체가 불가능하면 `Err(CoreError::ClipboardUnavailable)`.
pub trait ClipboardSource: Send + Sync {
    fn read(&self) -> Result<ClipboardContent, CoreError>;
}
