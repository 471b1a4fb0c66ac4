//! One Data API call: compose, encode, send, classify, decode.

use std::time::Instant;

use bson::{Bson, Document};
use docfetch_core::codec::{self, EJSON_MEDIA_TYPE};
use docfetch_core::request::LABEL_HEADER;
use docfetch_core::{DataApiError, Namespace, OperationRequest, OperationResult};

use crate::connection::{set_header, ConnectionContext};
use crate::transport::{HttpRequest, HttpResponse};
use crate::{ClientError, Result};

/// Decoded body of a successful response, before envelope unwrapping.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reply {
    pub status: u16,
    /// `Bson::Null` when the response had no body
    pub payload: Bson,
}

/// Perform one request/response exchange.
///
/// Statuses outside 200-399 come back as `Ok(Err(DataApiError))`. The outer
/// error is reserved for local failures: empty identifiers, an unusable
/// action name, codec errors and transport failures.
pub(crate) async fn invoke(
    ctx: &ConnectionContext,
    database: &str,
    collection: &str,
    action: &str,
    body: Document,
    label: Option<String>,
) -> Result<OperationResult<Reply>> {
    if database.is_empty() {
        return Err(ClientError::EmptyIdentifier("database"));
    }
    if collection.is_empty() {
        return Err(ClientError::EmptyIdentifier("collection"));
    }
    if !is_valid_action(action) {
        return Err(ClientError::InvalidAction(action.to_string()));
    }

    let url = ctx
        .action_url(action)
        .map_err(|_| ClientError::InvalidAction(action.to_string()))?;

    let namespace = Namespace {
        data_source: ctx.data_source(),
        database,
        collection,
    };
    let request = OperationRequest::compose(action, namespace, body, label);

    let http_request = HttpRequest {
        method: "POST",
        url,
        headers: request_headers(ctx, &request.label),
        body: request.encode_body()?,
    };

    tracing::debug!(
        action,
        database,
        collection,
        label = %request.label,
        "Sending Data API request"
    );

    let started_at = Instant::now();
    let response = ctx
        .transport()
        .send(http_request)
        .await
        .map_err(ClientError::Transport)?;
    let elapsed_ms = started_at.elapsed().as_millis() as u64;

    if !response.is_success() {
        let error = DataApiError::new(response.status, error_message(&response));
        tracing::debug!(
            action,
            status = response.status,
            elapsed_ms,
            error = %error.message,
            "Data API request failed"
        );
        return Ok(Err(error));
    }

    tracing::debug!(
        action,
        status = response.status,
        elapsed_ms,
        "Data API request succeeded"
    );

    let payload = codec::decode(response.text())?;
    Ok(Ok(Reply {
        status: response.status,
        payload,
    }))
}

fn request_headers(ctx: &ConnectionContext, label: &str) -> Vec<(String, String)> {
    let mut headers = ctx.headers().to_vec();
    set_header(&mut headers, "content-type".to_string(), EJSON_MEDIA_TYPE.to_string());
    set_header(&mut headers, "accept".to_string(), EJSON_MEDIA_TYPE.to_string());
    if is_usable_label(label) {
        set_header(&mut headers, LABEL_HEADER.to_string(), label.to_string());
    }
    headers
}

/// Action names are single path segments: letters, digits, `_` and `-`.
fn is_valid_action(action: &str) -> bool {
    !action.is_empty()
        && action
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn is_usable_label(label: &str) -> bool {
    !label.is_empty() && docfetch_core::auth::is_valid_header_value(label)
}

/// Best-effort message for an error response: the JSON `error` field, then
/// the raw body, then the status text, then a fixed per-status default.
pub(crate) fn error_message(response: &HttpResponse) -> String {
    if let Ok(value) = response.json::<serde_json::Value>() {
        if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
            return message.to_string();
        }
    }

    let text = response.text().trim();
    if !text.is_empty() {
        return text.to_string();
    }

    if let Some(status_text) = response.status_text.as_deref() {
        if !status_text.is_empty() {
            return status_text.to_string();
        }
    }

    DataApiError::default_message(response.status).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_error_field() {
        let response = HttpResponse::new(400, r#"{"error": "invalid filter", "link": "x"}"#)
            .with_status_text("Bad Request");
        assert_eq!(error_message(&response), "invalid filter");
    }

    #[test]
    fn test_error_message_falls_back_to_body_text() {
        let response = HttpResponse::new(502, "upstream timed out").with_status_text("Bad Gateway");
        assert_eq!(error_message(&response), "upstream timed out");

        // JSON without a string `error` field is still just text
        let response = HttpResponse::new(400, r#"{"error": 12}"#);
        assert_eq!(error_message(&response), r#"{"error": 12}"#);
    }

    #[test]
    fn test_error_message_falls_back_to_status_text() {
        let response = HttpResponse::new(503, "").with_status_text("Service Unavailable");
        assert_eq!(error_message(&response), "Service Unavailable");
    }

    #[test]
    fn test_error_message_falls_back_to_defaults() {
        assert_eq!(error_message(&HttpResponse::new(401, "")), "Unauthorized");
        assert_eq!(error_message(&HttpResponse::new(404, "  ")), "Not Found");
        assert_eq!(
            error_message(&HttpResponse::new(500, "").with_status_text("")),
            "Internal Server Error"
        );
        assert_eq!(error_message(&HttpResponse::new(429, "")), "Unknown error");
    }

    #[test]
    fn test_action_validation() {
        assert!(is_valid_action("findOne"));
        assert!(is_valid_action("custom_action-2"));
        assert!(!is_valid_action(""));
        assert!(!is_valid_action("../admin"));
        assert!(!is_valid_action("find?x=1"));
    }
}
