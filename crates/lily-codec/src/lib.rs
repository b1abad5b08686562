//! # lily-codec
//!
//! `PayloadCodec` 포트의 zstd 구현.
//! 프로세스 시작 시 고정 레벨로 한 번 만들어 모든 요청이 공유한다.

pub mod compression;

pub use compression::ZstdCodec;
