//! The HTTP boundary. The client never does networking itself; it hands a
//! fully built [`HttpRequest`] to a [`Transport`] and classifies whatever
//! [`HttpResponse`] comes back.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

/// Failure of the transport itself (DNS, connect, TLS, timeout, abort).
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: &'static str,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase, when the transport knows one
    pub status_text: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: None,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = Some(status_text.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// 200 through 399 inclusive.
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Sends one request and returns the response, whatever its status.
///
/// Only failures to obtain a response belong in the error; a 4xx or 5xx is
/// a normal `Ok` response. Timeouts, retries and cancellation, if wanted,
/// live in the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{HttpRequest, HttpResponse, Transport, TransportError};

    /// Transport backed by a shared [`reqwest::Client`].
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(timeout: Option<Duration>, user_agent: &str) -> Result<Self, reqwest::Error> {
            let mut builder = reqwest::Client::builder().user_agent(user_agent);
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }

            Ok(Self {
                client: builder.build()?,
            })
        }

        /// Reuse an existing client, e.g. one with custom TLS or proxy settings.
        pub fn from_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let method = reqwest::Method::from_bytes(request.method.as_bytes())?;

            let mut builder = self.client.request(method, request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let response = builder.body(request.body).send().await?;
            let status = response.status();

            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();

            // An unreadable error body still leaves the status to classify
            let body = if status.is_success() || status.is_redirection() {
                response.text().await?
            } else {
                response.text().await.unwrap_or_default()
            };

            Ok(HttpResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().map(str::to_string),
                headers,
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(201, "").is_success());
        assert!(HttpResponse::new(399, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(400, "").is_success());
        assert!(!HttpResponse::new(503, "").is_success());
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let response = HttpResponse::new(200, "").with_header("Content-Type", "application/ejson");
        assert_eq!(response.header("content-type"), Some("application/ejson"));
        assert_eq!(response.header("accept"), None);
    }

    #[test]
    fn test_json_reader() {
        let response = HttpResponse::new(400, r#"{"error": "bad filter"}"#);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["error"], "bad filter");
        assert!(HttpResponse::new(400, "oops").json::<serde_json::Value>().is_err());
    }
}
