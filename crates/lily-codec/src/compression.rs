//! zstd 응답 압축 어댑터.
//!
//! `PayloadCodec` 포트 구현. 상태가 없어 여러 요청에서 동시에 써도 된다.

use lily_core::config::MAX_COMPRESSION_LEVEL;
use lily_core::error::CoreError;
use lily_core::ports::compressor::PayloadCodec;
use tracing::trace;

/// `Content-Encoding` 토큰
pub const ZSTD_ENCODING: &str = "zstd";

/// zstd 압축기: `PayloadCodec` 포트 구현
#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec {
    level: i32,
}

impl ZstdCodec {
    /// 지정 레벨로 생성 (1..=22 범위로 보정)
    pub fn new(level: i32) -> Self {
        Self {
            level: level.clamp(1, MAX_COMPRESSION_LEVEL),
        }
    }

    /// 최대 압축률 (레벨 22)
    pub fn max_ratio() -> Self {
        Self::new(MAX_COMPRESSION_LEVEL)
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// 압축 해제 (테스트와 클라이언트 검증용)
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CoreError> {
        zstd::decode_all(data).map_err(|e| CoreError::Compression(format!("zstd 해제 실패: {e}")))
    }
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self::max_ratio()
    }
}

impl PayloadCodec for ZstdCodec {
    fn encoding(&self) -> &'static str {
        ZSTD_ENCODING
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CoreError> {
        let compressed = zstd::encode_all(data, self.level)
            .map_err(|e| CoreError::Compression(format!("zstd 압축 실패: {e}")))?;
        trace!(
            "zstd 압축: {} → {} bytes (level {})",
            data.len(),
            compressed.len(),
            self.level
        );
        Ok(compressed)
    }
}
