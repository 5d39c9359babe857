/// Browser-side primitives: the JS bridge, fetch, timers, clipboard and window

use crate::error::ShortenError;
use crate::shortener::{check_status, parse_short_url};
use crate::tab_data::{active_tab_url, LongUrl, ShortUrl, TabInfo};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlDocument, HtmlInputElement, Response};

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getActiveTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn writeClipboardText(text: &str) -> Result<(), JsValue>;
}

/// Ask the extension API for the active tab of the current window
pub async fn query_active_tab_url() -> Result<LongUrl, ShortenError> {
    let tabs_js = getActiveTabs().await.map_err(|e| {
        log::warn!("Tab query failed: {:?}", e);
        ShortenError::NoActiveTab
    })?;

    let tabs: Vec<TabInfo> = serde_wasm_bindgen::from_value(tabs_js).map_err(|e| {
        log::warn!("Failed to parse tabs: {:?}", e);
        ShortenError::NoActiveTab
    })?;

    active_tab_url(&tabs)
}

/// GET the shortening service and read the plain-text body
pub async fn fetch_short_url(request_url: &str) -> Result<ShortUrl, ShortenError> {
    let window = web_sys::window()
        .ok_or_else(|| ShortenError::RequestFailed("no window".to_string()))?;

    let response_js = JsFuture::from(window.fetch_with_str(request_url))
        .await
        .map_err(|e| ShortenError::RequestFailed(format!("{:?}", e)))?;

    let response: Response = response_js
        .dyn_into()
        .map_err(|_| ShortenError::InvalidResponse("fetch did not yield a Response".to_string()))?;

    check_status(response.status())?;

    let text_promise = response
        .text()
        .map_err(|e| ShortenError::InvalidResponse(format!("{:?}", e)))?;
    let body = JsFuture::from(text_promise)
        .await
        .map_err(|e| ShortenError::InvalidResponse(format!("{:?}", e)))?
        .as_string()
        .ok_or_else(|| ShortenError::InvalidResponse("body is not text".to_string()))?;

    parse_short_url(body)
}

/// Write through `navigator.clipboard`. The error is the rejection reason.
pub async fn write_clipboard(text: &str) -> Result<(), String> {
    writeClipboardText(text)
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Legacy copy: select a hidden input holding `text` and run `execCommand("copy")`.
/// The input is removed again whatever the outcome.
pub fn copy_with_hidden_input(text: &str) -> Result<bool, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let input: HtmlInputElement = document
        .create_element("input")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("created element is not an input"))?;
    input.set_value(text);
    input.set_attribute("aria-hidden", "true")?;
    input.set_attribute("style", "position: fixed; top: -1000px; opacity: 0;")?;

    body.append_child(&input)?;
    input.select();

    let copied = match document.dyn_ref::<HtmlDocument>() {
        Some(html_document) => html_document.exec_command("copy"),
        None => Err(JsValue::from_str("document does not support execCommand")),
    };

    input.remove();
    copied
}

/// Resolve after `ms` milliseconds via `setTimeout`
pub async fn sleep_ms(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        match web_sys::window() {
            Some(window) => {
                let delay = i32::try_from(ms).unwrap_or(i32::MAX);
                if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay) {
                    log::warn!("setTimeout failed: {:?}", e);
                }
            }
            None => log::warn!("No window, timer will never fire"),
        }
    });

    let _ = JsFuture::from(promise).await;
}

pub fn close_window() {
    match web_sys::window() {
        Some(window) => {
            if let Err(e) = window.close() {
                log::warn!("Failed to close window: {:?}", e);
            }
        }
        None => log::warn!("No window to close"),
    }
}
