/// Request construction and response parsing for the shortening service
use crate::error::ShortenError;
use crate::tab_data::{LongUrl, ShortUrl};
use url::Url;

/// Name of the query parameter carrying the long URL
const URL_PARAM: &str = "url";

/// Build `<base>?url=<long_url>` with the long URL percent-encoded.
///
/// Query pairs already present on the base URL are preserved.
pub fn build_request_url(base: &str, long_url: &LongUrl) -> Result<String, ShortenError> {
    let mut request = Url::parse(base)
        .map_err(|e| ShortenError::RequestFailed(format!("Invalid service URL {:?}: {}", base, e)))?;

    request
        .query_pairs_mut()
        .append_pair(URL_PARAM, long_url.as_str());

    Ok(request.into())
}

/// Turn a successful response body into the short link.
///
/// The service answers with the short URL as the whole plain-text body, so
/// the body is used as-is. An empty or whitespace-only body is rejected.
pub fn parse_short_url(body: String) -> Result<ShortUrl, ShortenError> {
    if body.trim().is_empty() {
        return Err(ShortenError::InvalidResponse("empty response body".to_string()));
    }
    Ok(ShortUrl::new(body))
}

/// Map an HTTP status to an error for anything outside 2xx
pub fn check_status(status: u16) -> Result<(), ShortenError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ShortenError::RequestFailed(format!("HTTP {}", status)))
    }
}
