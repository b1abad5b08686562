//! 응답 페이로드 압축 포트.
//!
//! 구현: `lily-codec` crate (zstd)

use crate::error::CoreError;

/// 응답 본문 압축 인터페이스.
///
/// 순수 함수여야 한다: 같은 입력에 같은 출력, 부수효과 없음.
/// 서버는 압축된 요청을 받지 않으므로 해제는 포트에 포함하지 않는다.
pub trait PayloadCodec: Send + Sync {
    /// `Accept-Encoding`/`Content-Encoding`에 쓰이는 토큰 (예: `zstd`)
    fn encoding(&self) -> &'static str;

    /// 데이터 압축
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CoreError>;
}
