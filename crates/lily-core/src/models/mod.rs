//! 도메인 모델.

pub mod clipboard;
pub mod notification;
