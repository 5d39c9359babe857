/// Data structures for the shorten-and-present workflow
use crate::error::ShortenError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Information about a browser tab, as reported by `chrome.tabs.query`.
///
/// Chrome leaves out `url` and `title` when the extension lacks permission,
/// so everything is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabInfo {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// URL of the active tab, captured once at workflow start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongUrl(String);

impl LongUrl {
    pub fn new(url: impl Into<String>) -> Result<LongUrl, ShortenError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ShortenError::NoActiveTab);
        }
        Ok(LongUrl(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LongUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short link returned by the shortening service, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrl(String);

impl ShortUrl {
    pub fn new(url: impl Into<String>) -> ShortUrl {
        ShortUrl(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the URL of the active tab out of a tab query result
pub fn active_tab_url(tabs: &[TabInfo]) -> Result<LongUrl, ShortenError> {
    tabs.first()
        .and_then(|tab| tab.url.as_deref())
        .ok_or(ShortenError::NoActiveTab)
        .and_then(LongUrl::new)
}
