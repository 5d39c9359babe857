/// Tab Shortener - Chrome Extension that shortens the current tab's URL
/// Built with Rust + WASM + Yew

pub mod browser;
pub mod config;
pub mod error;
pub mod runtime;
pub mod shortener;
pub mod tab_data;
pub mod ui;
pub mod workflow;

use crate::config::WorkflowConfig;
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export request construction for JavaScript access
#[wasm_bindgen]
pub fn shorten_request_url(long_url: &str) -> Result<String, JsValue> {
    let long_url = tab_data::LongUrl::new(long_url).map_err(|e| JsValue::from_str(&e.to_string()))?;
    shortener::build_request_url(config::DEFAULT_SERVICE_BASE_URL, &long_url)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

// Start the Yew app for the popup with the default delays and messages
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the popup with overrides, e.g. `start_popup_with_config({ autoCloseDelayMs: 5000 })`
#[wasm_bindgen]
pub fn start_popup_with_config(config: JsValue) -> Result<(), JsValue> {
    let config = WorkflowConfig::from_js(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::info!("Starting popup with {:?}", config);
    yew::Renderer::<ui::popup::App>::with_props(ui::popup::AppProps { config }).render();
    Ok(())
}
