//! Blocking HTTP plumbing shared by the hosted gateways.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::provider::LlmConfig;
use crate::error::{AlchemistError, Result};

/// Client honouring the configured timeout.
pub(crate) fn client(config: &LlmConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AlchemistError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Read an API key, treating a blank value as unset.
pub(crate) fn key_from_env(var: &str) -> Result<String> {
    std::env::var(var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AlchemistError::Config(format!("{} environment variable not set", var)))
}

/// JSON content type plus the key under `key_header`, plus any fixed extras.
pub(crate) fn json_headers(
    key_header: &'static str,
    api_key: &str,
    extra: &[(&'static str, &'static str)],
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let key = HeaderValue::from_str(api_key)
        .map_err(|e| AlchemistError::Config(format!("Invalid API key: {}", e)))?;
    headers.insert(HeaderName::from_static(key_header), key);

    for &(name, value) in extra {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    Ok(headers)
}

/// POST a JSON body and decode the JSON reply. Non-2xx statuses become
/// `Llm` errors carrying the response text.
pub(crate) fn post_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    headers: HeaderMap,
    body: &Value,
) -> Result<T> {
    let response = client
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .map_err(|e| AlchemistError::Llm(format!("API request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().unwrap_or_default();
        return Err(AlchemistError::Llm(format!("API error ({}): {}", status, detail)));
    }

    response
        .json()
        .map_err(|e| AlchemistError::Llm(format!("Failed to parse API response: {}", e)))
}
