use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use docfetch_core::auth::{is_valid_header_name, is_valid_header_value};
use docfetch_core::config::default_user_agent;
use docfetch_core::{Auth, Config, ConfigError};
use url::Url;

use crate::transport::Transport;

/// Everything needed to build a [`ConnectionContext`].
pub struct ClientOptions {
    endpoint: String,
    data_source: String,
    auth: Auth,
    transport: Option<Arc<dyn Transport>>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    user_agent: String,
}

impl ClientOptions {
    pub fn new(endpoint: impl Into<String>, data_source: impl Into<String>, auth: Auth) -> Self {
        Self {
            endpoint: endpoint.into(),
            data_source: data_source.into(),
            auth,
            transport: None,
            headers: Vec::new(),
            timeout: None,
            user_agent: default_user_agent(),
        }
    }

    /// Use this transport instead of the bundled one.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Extra header sent with every request. Auth headers take precedence.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Request timeout for the bundled transport. Ignored with a custom transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// User agent for the bundled transport. Ignored with a custom transport.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl TryFrom<&Config> for ClientOptions {
    type Error = ConfigError;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        let auth = Auth::try_from(config.auth.clone())?;

        let mut options = ClientOptions::new(&config.endpoint, &config.data_source, auth)
            .with_user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout() {
            options = options.with_timeout(timeout);
        }
        for (name, value) in &config.headers {
            options = options.with_header(name, value);
        }

        Ok(options)
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("endpoint", &self.endpoint)
            .field("data_source", &self.data_source)
            .field("auth", &self.auth)
            .field("custom_transport", &self.transport.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Resolved, immutable connection settings shared by every scope of a client.
pub struct ConnectionContext {
    root: Url,
    data_source: String,
    auth_kind: &'static str,
    /// Extra headers overlaid with auth headers
    headers: Vec<(String, String)>,
    transport: Arc<dyn Transport>,
}

impl ConnectionContext {
    /// Resolve options. Fails on a bad endpoint, unusable auth or headers,
    /// or when no transport is available. Performs no network activity.
    pub fn new(options: ClientOptions) -> Result<Self, ConfigError> {
        let ClientOptions {
            endpoint,
            data_source,
            auth,
            transport,
            headers: extra_headers,
            timeout,
            user_agent,
        } = options;

        let root = parse_endpoint(&endpoint)?;

        if data_source.is_empty() {
            return Err(ConfigError::MissingSetting("data_source"));
        }

        let mut headers = Vec::new();
        for (name, value) in extra_headers {
            if !is_valid_header_name(&name) || !is_valid_header_value(&value) {
                return Err(ConfigError::InvalidHeader(name));
            }
            set_header(&mut headers, name, value);
        }
        for (name, value) in auth.headers()? {
            set_header(&mut headers, name, value);
        }

        let transport = match transport {
            Some(transport) => transport,
            None => default_transport(timeout, &user_agent)?,
        };

        tracing::debug!(
            endpoint = %root,
            data_source = %data_source,
            auth = auth.kind(),
            "Connection context resolved"
        );

        Ok(Self {
            root,
            data_source,
            auth_kind: auth.kind(),
            headers,
            transport,
        })
    }

    /// Endpoint root, always ending in `/`.
    pub fn root(&self) -> &Url {
        &self.root
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn auth_kind(&self) -> &'static str {
        self.auth_kind
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// `<root>/action/<action>`
    pub fn action_url(&self, action: &str) -> Result<Url, url::ParseError> {
        self.root.join(&format!("action/{action}"))
    }
}

impl fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("ConnectionContext")
            .field("root", &self.root.as_str())
            .field("data_source", &self.data_source)
            .field("auth", &self.auth_kind)
            .field("headers", &header_names)
            .finish_non_exhaustive()
    }
}

/// Insert or replace a header, comparing names case-insensitively.
pub(crate) fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
        Some(slot) => *slot = (name, value),
        None => headers.push((name, value)),
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let mut url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }

    // Url::join replaces the last segment unless the path ends in '/'
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(feature = "reqwest")]
fn default_transport(
    timeout: Option<Duration>,
    user_agent: &str,
) -> Result<Arc<dyn Transport>, ConfigError> {
    let transport = crate::transport::ReqwestTransport::new(timeout, user_agent).map_err(|e| {
        ConfigError::InvalidSetting {
            name: "transport",
            reason: e.to_string(),
        }
    })?;
    Ok(Arc::new(transport))
}

#[cfg(not(feature = "reqwest"))]
fn default_transport(
    _timeout: Option<Duration>,
    _user_agent: &str,
) -> Result<Arc<dyn Transport>, ConfigError> {
    Err(ConfigError::MissingTransport)
}
