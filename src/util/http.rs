//! Shared HTTP client and auth headers.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{Result, SpeechGateError};

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// Per-request deadlines are applied by the caller; the client-level timeout
/// is only a backstop.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            })
    })
}

/// Build headers for the OpenSpeech API.
///
/// OpenSpeech expects `Bearer;<token>` with a semicolon and no space, not the
/// RFC 6750 form. A token that cannot be sent as a header value is a
/// configuration error.
pub fn openspeech_headers(access_token: &str) -> Result<HeaderMap> {
    let auth = HeaderValue::from_str(&format!("Bearer;{access_token}")).map_err(|_| {
        SpeechGateError::Configuration("access_token is not a valid header value".to_string())
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, auth);
    Ok(headers)
}
