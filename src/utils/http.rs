// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result, TransportError};
use crate::models::ApiConfig;

/// Header names are matched case-insensitively; `from_static` wants lowercase.
pub const API_KEY_HEADER: &str = "x-rapidapi-key";
pub const API_HOST_HEADER: &str = "x-rapidapi-host";

/// One GET request against the flight API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Path below the base URL, e.g. `/api/v1/flights/searchAirport`
    pub path: &'static str,
    pub query: Vec<(String, String)>,
    /// Deadline for the whole request
    pub timeout: Duration,
}

impl ApiRequest {
    pub fn new(path: &'static str, timeout: Duration) -> Self {
        Self {
            path,
            query: Vec::new(),
            timeout,
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn params(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Anything that can answer an `ApiRequest` with a JSON document.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request and decode the body.
    ///
    /// An empty success body decodes to `Value::Null`.
    async fn get_json(&self, request: ApiRequest) -> std::result::Result<Value, TransportError>;
}

/// Create a configured asynchronous HTTP client with API headers.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    let pairs = [
        (API_KEY_HEADER, config.api_key.as_deref()),
        (API_HOST_HEADER, config.api_host.as_deref()),
    ];
    for (name, value) in pairs {
        if let Some(value) = value {
            let value = HeaderValue::from_str(value)
                .map_err(|e| AppError::config(format!("invalid {name} header: {e}")))?;
            headers.insert(HeaderName::from_static(name), value);
        }
    }

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    /// Validated base URL without a trailing slash
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self {
            client: create_async_client(config)?,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Append `path` to the base URL, keeping any path prefix it carries.
    fn endpoint(&self, path: &str) -> std::result::Result<Url, TransportError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| TransportError::Network(format!("bad endpoint {path}: {e}")))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_json(&self, request: ApiRequest) -> std::result::Result<Value, TransportError> {
        let url = self.endpoint(request.path)?;
        log::debug!("GET {} {:?}", url, request.query);

        let response = self
            .client
            .get(url)
            .query(&request.query)
            .timeout(request.timeout)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).ok();
            log::error!("{} returned {}: {}", request.path, status, text);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        decode_body(&text)
    }
}

/// Decode a success body; blank bodies are `null`.
pub fn decode_body(text: &str) -> std::result::Result<Value, TransportError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| TransportError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_collects_params() {
        let request = ApiRequest::new("/api/v1/flights/searchAirport", Duration::from_secs(15))
            .param("query", "london");
        assert_eq!(request.query_value("query"), Some("london"));
        assert_eq!(request.query_value("missing"), None);
    }

    #[test]
    fn decode_blank_body_is_null() {
        assert_eq!(decode_body("").unwrap(), Value::Null);
        assert_eq!(decode_body("  \n").unwrap(), Value::Null);
        assert!(matches!(
            decode_body("<html>"),
            Err(TransportError::Decode(_))
        ));
        assert_eq!(decode_body("{\"status\":true}").unwrap()["status"], true);
    }

    #[test]
    fn client_builds_with_credentials() {
        let config = ApiConfig {
            api_key: Some("key".into()),
            api_host: Some("sky-scrapper.p.rapidapi.com".into()),
            ..ApiConfig::default()
        };
        assert!(create_async_client(&config).is_ok());
        assert!(ReqwestTransport::new(&config).is_ok());
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let endpoint = |base: &str| {
            let config = ApiConfig {
                base_url: base.into(),
                ..ApiConfig::default()
            };
            ReqwestTransport::new(&config)
                .unwrap()
                .endpoint("/api/v1/flights/searchAirport")
                .unwrap()
                .to_string()
        };

        assert_eq!(
            endpoint("https://proxy.example/flights-proxy"),
            "https://proxy.example/flights-proxy/api/v1/flights/searchAirport"
        );
        assert_eq!(
            endpoint("https://proxy.example/flights-proxy/"),
            "https://proxy.example/flights-proxy/api/v1/flights/searchAirport"
        );
        assert_eq!(
            endpoint("https://sky-scrapper.p.rapidapi.com"),
            "https://sky-scrapper.p.rapidapi.com/api/v1/flights/searchAirport"
        );
    }

    #[test]
    fn client_rejects_bad_header_value() {
        let config = ApiConfig {
            api_key: Some("bad\nkey".into()),
            ..ApiConfig::default()
        };
        assert!(matches!(
            create_async_client(&config),
            Err(AppError::Config(_))
        ));
    }
}
