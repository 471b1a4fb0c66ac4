use thiserror::Error;

/// Fallback message when neither the response nor the status code says anything useful.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Local configuration problems. Raised while building a client, never
/// from an operation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("invalid auth: {0}")]
    InvalidAuth(String),

    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    #[error("no transport available: enable the `reqwest` feature or supply a transport")]
    MissingTransport,

    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error reported by the Data API for a response outside 200-399.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Data API error {code}: {message}")]
pub struct DataApiError {
    /// HTTP status code of the response
    pub code: u16,
    pub message: String,
}

impl DataApiError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Error for a call that succeeded at the HTTP level but carried no data.
    pub fn unknown(code: u16) -> Self {
        Self::new(code, UNKNOWN_ERROR)
    }

    /// Last-resort message for a status when the response had nothing better.
    pub fn default_message(code: u16) -> &'static str {
        match code {
            400 => "Bad Request",
            401 => "Unauthorized",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => UNKNOWN_ERROR,
        }
    }
}

/// Outcome of a classified Data API call: unwrapped payload or remote error.
pub type OperationResult<T> = std::result::Result<T, DataApiError>;

/// Extended JSON encode/decode and document (de)serialization failures.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid Extended JSON: {0}")]
    ExtJson(#[from] bson::extjson::de::Error),

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] bson::ser::Error),

    #[error("failed to deserialize document: {0}")]
    Deserialize(#[from] bson::de::Error),

    #[error("expected a document, found {0:?}")]
    NotADocument(bson::spec::ElementType),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_messages() {
        assert_eq!(DataApiError::default_message(400), "Bad Request");
        assert_eq!(DataApiError::default_message(401), "Unauthorized");
        assert_eq!(DataApiError::default_message(404), "Not Found");
        assert_eq!(DataApiError::default_message(500), "Internal Server Error");
        assert_eq!(DataApiError::default_message(418), UNKNOWN_ERROR);
    }

    #[test]
    fn test_error_display() {
        let err = DataApiError::new(401, "Unauthorized");
        assert_eq!(err.to_string(), "Data API error 401: Unauthorized");

        let err = ConfigError::MissingSetting("endpoint");
        assert_eq!(err.to_string(), "missing setting: endpoint");
    }

    #[test]
    fn test_unknown_keeps_code() {
        let err = DataApiError::unknown(200);
        assert_eq!(err.code, 200);
        assert_eq!(err.message, UNKNOWN_ERROR);
    }
}
