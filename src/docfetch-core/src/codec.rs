//! Extended JSON codec
//!
//! Request bodies are written as canonical Extended JSON so that Int64,
//! ObjectId, Binary, Date and Decimal128 values reach the Data API with their
//! types intact. Responses may be canonical or relaxed; both decode.

use bson::{Bson, Document};

use crate::error::CodecError;

/// Media type for Extended JSON bodies, used for `content-type` and `accept`.
pub const EJSON_MEDIA_TYPE: &str = "application/ejson";

/// Encode a document as canonical Extended JSON text.
pub fn encode(document: Document) -> Result<String, CodecError> {
    let value = Bson::Document(document).into_canonical_extjson();
    Ok(serde_json::to_string(&value)?)
}

/// Decode Extended JSON text. An empty body decodes to `Bson::Null`.
pub fn decode(text: &str) -> Result<Bson, CodecError> {
    if text.trim().is_empty() {
        return Ok(Bson::Null);
    }

    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(Bson::try_from(value)?)
}

/// Decode Extended JSON text that must hold a top-level document.
pub fn decode_document(text: &str) -> Result<Document, CodecError> {
    match decode(text)? {
        Bson::Document(document) => Ok(document),
        other => Err(CodecError::NotADocument(other.element_type())),
    }
}

/// Render a value as pretty relaxed Extended JSON, for display.
pub fn to_relaxed_string(value: Bson) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(&value.into_relaxed_extjson())?)
}
