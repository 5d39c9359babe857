/// Delays, messages and the service endpoint used by the workflow
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

pub const DEFAULT_SERVICE_BASE_URL: &str = "https://tinyurl.com/api-create.php";

/// Configuration handed to the workflow at construction.
///
/// Every field has a default, so JavaScript callers only need to pass the
/// values they want to change, e.g. `{ autoCloseDelayMs: 5000 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowConfig {
    /// How long the "preparing" toast stays up before the request goes out
    pub preparing_delay_ms: u32,
    /// Lifetime of the success and failure toasts
    pub done_delay_ms: u32,
    /// Delay between showing the short link and closing the popup
    pub auto_close_delay_ms: u32,
    pub preparing_heading: String,
    pub preparing_message: String,
    pub success_message: String,
    pub service_base_url: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfig {
            preparing_delay_ms: 1500,
            done_delay_ms: 2500,
            auto_close_delay_ms: 2500,
            preparing_heading: "\u{1F680} Preparing your short link ...".to_string(),
            preparing_message: "Shortening with tinyurl ...".to_string(),
            success_message: "URL copied to clipboard!".to_string(),
            service_base_url: DEFAULT_SERVICE_BASE_URL.to_string(),
        }
    }
}

impl WorkflowConfig {
    /// Build a config from a JS object, falling back to defaults for absent keys.
    /// `undefined` and `null` yield the default config.
    pub fn from_js(value: JsValue) -> Result<Self, ConfigError> {
        if value.is_undefined() || value.is_null() {
            return Ok(WorkflowConfig::default());
        }

        let config: WorkflowConfig = serde_wasm_bindgen::from_value(value)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The service URL must be an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.service_base_url).map_err(|e| {
            ConfigError::InvalidServiceUrl {
                url: self.service_base_url.clone(),
                reason: e.to_string(),
            }
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidServiceUrl {
                url: self.service_base_url.clone(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        Ok(())
    }
}
