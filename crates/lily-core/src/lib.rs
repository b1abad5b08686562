//! # lily-core
//!
//! Lily 도메인 모델, 포트(trait) 정의, 알림 세션, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 클립보드 내용, 알림 요청/명세/결과
//! - [`ports`]: 외부 협력자 인터페이스 (압축기, 클립보드, 알림 표시기)
//! - [`session`]: 알림 세션과 단일 쓰기 결과 슬롯
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
pub mod session;
