//! HTTP 핸들러 모듈.

pub mod clipboard;
pub mod info;
pub mod notify;
