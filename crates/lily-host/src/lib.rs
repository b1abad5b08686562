//! # lily-host
//!
//! 호스트 머신 자원 어댑터.
//!
//! - [`clipboard`]: `ClipboardSource` 구현 (arboard, 이미지는 PNG로 정규화)
//! - [`notifier`]: `NotificationPresenter` 구현 (notify-rust, 버튼 콜백)
//! - [`toast`]: Windows WinRT 토스트 (버튼 클릭 보고)

pub mod clipboard;
pub mod notifier;
pub mod toast;

pub use clipboard::HostClipboard;
pub use notifier::HostNotifier;
