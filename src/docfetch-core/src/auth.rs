//! Authentication variants and the request headers they resolve to.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const API_KEY_HEADER: &str = "apiKey";
pub const EMAIL_HEADER: &str = "email";
pub const PASSWORD_HEADER: &str = "password";
pub const JWT_TOKEN_HEADER: &str = "jwtTokenString";
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// How a client authenticates against the Data API. Exactly one variant is
/// active per client.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    ApiKey(String),
    EmailPassword { email: String, password: String },
    /// Custom JWT, sent as `jwtTokenString`
    JwtToken(String),
    /// Access token, sent as `Authorization: Bearer <token>`
    Bearer(String),
}

impl Auth {
    pub fn api_key(key: impl Into<String>) -> Self {
        Auth::ApiKey(key.into())
    }

    pub fn email_password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::EmailPassword {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn jwt_token(token: impl Into<String>) -> Self {
        Auth::JwtToken(token.into())
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(token.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Auth::ApiKey(_) => "api_key",
            Auth::EmailPassword { .. } => "email_password",
            Auth::JwtToken(_) => "jwt_token",
            Auth::Bearer(_) => "bearer",
        }
    }

    /// Resolve the headers this variant sends with every request.
    ///
    /// Fails if a credential is empty or cannot be carried in a header.
    pub fn headers(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut headers = BTreeMap::new();

        match self {
            Auth::ApiKey(key) => {
                check_credential("api key", key)?;
                headers.insert(API_KEY_HEADER.to_string(), key.clone());
            }
            Auth::EmailPassword { email, password } => {
                check_credential("email", email)?;
                check_credential("password", password)?;
                headers.insert(EMAIL_HEADER.to_string(), email.clone());
                headers.insert(PASSWORD_HEADER.to_string(), password.clone());
            }
            Auth::JwtToken(token) => {
                check_credential("jwt token", token)?;
                headers.insert(JWT_TOKEN_HEADER.to_string(), token.clone());
            }
            Auth::Bearer(token) => {
                check_credential("bearer token", token)?;
                headers.insert(AUTHORIZATION_HEADER.to_string(), format!("Bearer {token}"));
            }
        }

        Ok(headers)
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::EmailPassword { email, .. } => f
                .debug_struct("EmailPassword")
                .field("email", email)
                .finish_non_exhaustive(),
            other => f.debug_tuple(other.kind()).field(&"<redacted>").finish(),
        }
    }
}

fn check_credential(what: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidAuth(format!("{what} is empty")));
    }
    if !is_valid_header_value(value) {
        return Err(ConfigError::InvalidAuth(format!(
            "{what} contains characters not allowed in a header"
        )));
    }
    Ok(())
}

/// RFC 7230 token characters.
pub fn is_valid_header_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

pub fn is_valid_header_value(value: &str) -> bool {
    value.chars().all(|c| c == '\t' || !c.is_ascii_control())
}

/// Auth as it appears in a config file or the environment. Fields are
/// optional; [`Auth::try_from`] requires exactly one variant to be present.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default, alias = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, alias = "jwtTokenString", skip_serializing_if = "Option::is_none")]
    pub jwt_token: Option<String>,
    #[serde(default, alias = "bearerToken", skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("jwt_token", &self.jwt_token.as_ref().map(|_| "<redacted>"))
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl TryFrom<AuthConfig> for Auth {
    type Error = ConfigError;

    fn try_from(config: AuthConfig) -> Result<Self, Self::Error> {
        let AuthConfig {
            api_key,
            email,
            password,
            jwt_token,
            bearer_token,
        } = config;

        let login = email.is_some() || password.is_some();
        let present = [api_key.is_some(), login, jwt_token.is_some(), bearer_token.is_some()]
            .iter()
            .filter(|set| **set)
            .count();

        if present != 1 {
            return Err(ConfigError::InvalidAuth(format!(
                "expected exactly one of api_key, email/password, jwt_token, bearer_token; found {present}"
            )));
        }

        if login {
            return match (email, password) {
                (Some(email), Some(password)) => Ok(Auth::EmailPassword { email, password }),
                _ => Err(ConfigError::InvalidAuth(
                    "email and password must both be set".to_string(),
                )),
            };
        }

        api_key
            .map(Auth::ApiKey)
            .or(jwt_token.map(Auth::JwtToken))
            .or(bearer_token.map(Auth::Bearer))
            .ok_or_else(|| ConfigError::InvalidAuth("no credentials".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_per_variant() {
        let headers = Auth::api_key("secret").headers().unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[API_KEY_HEADER], "secret");

        let headers = Auth::email_password("me@example.com", "hunter2").headers().unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[EMAIL_HEADER], "me@example.com");
        assert_eq!(headers[PASSWORD_HEADER], "hunter2");

        let headers = Auth::jwt_token("eyJ.a.b").headers().unwrap();
        assert_eq!(headers[JWT_TOKEN_HEADER], "eyJ.a.b");

        let headers = Auth::bearer("tok").headers().unwrap();
        assert_eq!(headers[AUTHORIZATION_HEADER], "Bearer tok");
    }

    #[test]
    fn test_rejects_unusable_credentials() {
        assert!(matches!(
            Auth::api_key("").headers(),
            Err(ConfigError::InvalidAuth(_))
        ));
        assert!(matches!(
            Auth::bearer("tok\r\nX-Injected: 1").headers(),
            Err(ConfigError::InvalidAuth(_))
        ));
        assert!(matches!(
            Auth::email_password("me@example.com", "").headers(),
            Err(ConfigError::InvalidAuth(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", Auth::api_key("super-secret"));
        assert!(!rendered.contains("super-secret"));

        let rendered = format!("{:?}", Auth::email_password("me@example.com", "hunter2"));
        assert!(rendered.contains("me@example.com"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_auth_config_single_variant() {
        let config = AuthConfig {
            api_key: Some("k".into()),
            ..Default::default()
        };
        assert_eq!(Auth::try_from(config).unwrap(), Auth::api_key("k"));

        let config = AuthConfig {
            email: Some("a@b.c".into()),
            password: Some("p".into()),
            ..Default::default()
        };
        assert_eq!(
            Auth::try_from(config).unwrap(),
            Auth::email_password("a@b.c", "p")
        );

        let config = AuthConfig {
            bearer_token: Some("t".into()),
            ..Default::default()
        };
        assert_eq!(Auth::try_from(config).unwrap(), Auth::bearer("t"));
    }

    #[test]
    fn test_auth_config_rejects_none_or_many() {
        assert!(Auth::try_from(AuthConfig::default()).is_err());

        let ambiguous = AuthConfig {
            api_key: Some("k".into()),
            jwt_token: Some("t".into()),
            ..Default::default()
        };
        assert!(Auth::try_from(ambiguous).is_err());

        let half_login = AuthConfig {
            email: Some("a@b.c".into()),
            ..Default::default()
        };
        assert!(Auth::try_from(half_login).is_err());
    }

    #[test]
    fn test_auth_config_accepts_camel_case() {
        let config: AuthConfig = serde_json::from_str(r#"{"jwtTokenString": "t"}"#).unwrap();
        assert_eq!(Auth::try_from(config).unwrap(), Auth::jwt_token("t"));
    }

    #[test]
    fn test_header_name_validation() {
        assert!(is_valid_header_name("x-realm-op-name"));
        assert!(!is_valid_header_name(""));
        assert!(!is_valid_header_name("bad header"));
        assert!(is_valid_header_value("value with\ttab"));
        assert!(!is_valid_header_value("line\nbreak"));
    }
}
