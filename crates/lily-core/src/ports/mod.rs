//! 포트 인터페이스 (trait).
//!
//! 호스트 자원(클립보드, 알림)과 압축기는 외부 협력자로 취급한다.
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `lily-app`에서 `Arc<dyn T>`로 와이어링한다. 테스트는 가짜 구현을 주입한다.

pub mod clipboard;
pub mod compressor;
pub mod notifier;
