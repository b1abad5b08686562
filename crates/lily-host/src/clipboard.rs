//! 호스트 클립보드 어댑터.
//!
//! 이미지를 먼저 조회하고, 없으면 유니코드 텍스트를 조회한다.
//! 이미지는 원본 포맷과 무관하게 PNG로 재인코딩한다.

use arboard::Clipboard;
use image::{DynamicImage, ImageFormat, RgbaImage};
use lily_core::error::CoreError;
use lily_core::models::clipboard::ClipboardContent;
use lily_core::ports::clipboard::ClipboardSource;
use std::io::Cursor;
use tracing::debug;

/// 호스트 클립보드: `ClipboardSource` 포트 구현
///
/// 호출마다 클립보드 핸들을 새로 연다. 캐시는 두지 않는다.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostClipboard;

impl HostClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSource for HostClipboard {
    fn read(&self) -> Result<ClipboardContent, CoreError> {
        let mut clipboard = Clipboard::new().map_err(|e| unavailable(&e))?;

        match clipboard.get_image() {
            Ok(image) => {
                debug!("클립보드 이미지 {}x{}", image.width, image.height);
                let png = encode_png(image.width, image.height, image.bytes.into_owned())?;
                return Ok(ClipboardContent::Image { png });
            }
            Err(e) => check_absent(e)?,
        }

        match clipboard.get_text() {
            Ok(text) => Ok(ClipboardContent::Text(text)),
            Err(e) => check_absent(e).map(|_| ClipboardContent::Empty),
        }
    }
}

/// 해당 형식이 없을 뿐이면 `Ok`, 클립보드 자체에 접근할 수 없으면 `Err`.
fn check_absent(error: arboard::Error) -> Result<(), CoreError> {
    match error {
        arboard::Error::ContentNotAvailable | arboard::Error::ConversionFailure => Ok(()),
        other => Err(unavailable(&other)),
    }
}

fn unavailable(error: &arboard::Error) -> CoreError {
    CoreError::ClipboardUnavailable(error.to_string())
}

/// RGBA 버퍼를 PNG로 인코딩
pub fn encode_png(width: usize, height: usize, rgba: Vec<u8>) -> Result<Vec<u8>, CoreError> {
    let width = u32::try_from(width)
        .map_err(|_| CoreError::Internal(format!("이미지 너비 범위 초과: {width}")))?;
    let height = u32::try_from(height)
        .map_err(|_| CoreError::Internal(format!("이미지 높이 범위 초과: {height}")))?;
    let buffer = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        CoreError::Internal(format!("이미지 버퍼 크기 불일치 ({width}x{height})"))
    })?;

    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(buffer)
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| CoreError::Internal(format!("PNG 인코딩 실패: {e}")))?;
    Ok(png.into_inner())
}
