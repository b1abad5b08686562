//! Windows 토스트 알림.
//!
//! notify-rust의 Windows 백엔드는 버튼 클릭을 돌려주지 않으므로
//! WinRT `ToastNotification`을 직접 만들고 `Activated` 이벤트에서
//! 버튼 인자(액션 토큰)를 받아 세션에 전달한다.

#![cfg_attr(not(windows), allow(dead_code))]

use lily_core::ports::notifier::Presentation;

/// 등록되지 않은 데스크톱 앱이 토스트를 띄울 때 빌려 쓰는 AUMID (PowerShell)
pub const FALLBACK_AUMID: &str =
    "{1AC14E77-02E7-4E5D-B744-2EB1AE5198B7}\\WindowsPowerShell\\v1.0\\powershell.exe";

/// XML 특수문자 이스케이프
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// 토스트 XML 생성.
///
/// 줄은 `<text>`로, 로고는 `appLogoOverride`, 히어로는 `hero` 위치에 둔다.
/// 버튼의 `arguments`가 곧 액션 토큰이다.
pub fn toast_xml(app_name: &str, presentation: &Presentation) -> String {
    let mut xml = String::from("<toast activationType=\"foreground\"><visual><binding template=\"ToastGeneric\">");

    for line in &presentation.lines {
        xml.push_str(&format!("<text>{}</text>", escape(line)));
    }
    xml.push_str(&format!(
        "<text placement=\"attribution\">{}</text>",
        escape(app_name)
    ));
    if let Some(icon) = &presentation.icon_path {
        xml.push_str(&format!(
            "<image placement=\"appLogoOverride\" src=\"{}\"/>",
            escape(&icon.to_string_lossy())
        ));
    }
    if let Some(hero) = &presentation.hero_path {
        xml.push_str(&format!(
            "<image placement=\"hero\" src=\"{}\"/>",
            escape(&hero.to_string_lossy())
        ));
    }
    xml.push_str("</binding></visual>");

    if !presentation.actions.is_empty() {
        xml.push_str("<actions>");
        for action in &presentation.actions {
            xml.push_str(&format!(
                "<action content=\"{}\" arguments=\"{}\" activationType=\"foreground\"/>",
                escape(&action.label),
                escape(&action.token)
            ));
        }
        xml.push_str("</actions>");
    }

    xml.push_str("</toast>");
    xml
}

#[cfg(windows)]
pub use platform::show;

#[cfg(windows)]
mod platform {
    use lily_core::error::CoreError;
    use lily_core::session::ActionCallback;
    use tracing::debug;
    use windows::core::{IInspectable, Interface, HSTRING};
    use windows::Data::Xml::Dom::XmlDocument;
    use windows::Foundation::TypedEventHandler;
    use windows::UI::Notifications::{
        ToastActivatedEventArgs, ToastNotification, ToastNotificationManager,
    };

    use super::FALLBACK_AUMID;
    use crate::notifier::is_button_action;

    fn presentation_failed(error: windows::core::Error) -> CoreError {
        CoreError::PresentationFailed(format!("토스트 표시 실패: {error}"))
    }

    /// 토스트를 띄우고 버튼 클릭 시 `on_action`을 호출하도록 등록한다.
    ///
    /// 반환된 토스트 객체가 살아있는 동안에만 `Activated` 이벤트가 전달된다.
    pub fn show(
        xml: &str,
        tokens: Vec<String>,
        on_action: ActionCallback,
    ) -> Result<ToastNotification, CoreError> {
        let document = XmlDocument::new().map_err(presentation_failed)?;
        document
            .LoadXml(&HSTRING::from(xml))
            .map_err(presentation_failed)?;
        let toast =
            ToastNotification::CreateToastNotification(&document).map_err(presentation_failed)?;

        if !tokens.is_empty() {
            let handler = TypedEventHandler::<ToastNotification, IInspectable>::new(
                move |_sender, args: &Option<IInspectable>| {
                    let Some(args) = args else {
                        return Ok(());
                    };
                    let arguments = args.cast::<ToastActivatedEventArgs>()?.Arguments()?;
                    let action = arguments.to_string();
                    if is_button_action(&action, &tokens) {
                        on_action.fire(action);
                    } else {
                        debug!("버튼이 아닌 토스트 활성화 무시: {action:?}");
                    }
                    Ok(())
                },
            );
            toast.Activated(&handler).map_err(presentation_failed)?;
        }

        ToastNotificationManager::CreateToastNotifierWithId(&HSTRING::from(FALLBACK_AUMID))
            .and_then(|notifier| notifier.Show(&toast))
            .map_err(presentation_failed)?;

        Ok(toast)
    }
}
