//! Request bodies and their composition into a Data API call.

use bson::{Bson, Document};
use serde::Serialize;

use crate::codec;
use crate::error::CodecError;

/// Header carrying the caller's tracing label.
pub const LABEL_HEADER: &str = "x-realm-op-name";

/// Identifiers injected into every request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace<'a> {
    pub data_source: &'a str,
    pub database: &'a str,
    pub collection: &'a str,
}

/// A single Data API call, ready to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    pub action: String,
    pub body: Document,
    pub label: String,
}

impl OperationRequest {
    /// Merge the caller body over `{collection, database, dataSource}` and
    /// drop top-level null fields. Caller keys win. The label defaults to
    /// the action name.
    pub fn compose(
        action: impl Into<String>,
        namespace: Namespace<'_>,
        body: Document,
        label: Option<String>,
    ) -> Self {
        let action = action.into();

        let mut merged = Document::new();
        merged.insert("collection", namespace.collection);
        merged.insert("database", namespace.database);
        merged.insert("dataSource", namespace.data_source);
        for (key, value) in body {
            merged.insert(key, value);
        }

        Self {
            label: label.unwrap_or_else(|| action.clone()),
            action,
            body: strip_nulls(merged),
        }
    }

    /// Path relative to the endpoint root.
    pub fn path(&self) -> String {
        format!("action/{}", self.action)
    }

    pub fn encode_body(&self) -> Result<String, CodecError> {
        codec::encode(self.body.clone())
    }
}

/// Remove top-level fields whose value is null or undefined. The Data API
/// answers explicit nulls in optional fields with 400. Nested values are
/// left alone.
pub fn strip_nulls(document: Document) -> Document {
    document
        .into_iter()
        .filter(|(_, value)| !matches!(value, Bson::Null | Bson::Undefined))
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindOneBody<'a> {
    pub filter: &'a Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<&'a Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<&'a Document>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindBody<'a> {
    pub filter: &'a Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<&'a Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<&'a Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct InsertOneBody<'a, T> {
    pub document: &'a T,
}

#[derive(Debug, Serialize)]
pub struct InsertManyBody<'a, T> {
    pub documents: &'a [T],
}

#[derive(Debug, Serialize)]
pub struct UpdateBody<'a> {
    pub filter: &'a Document,
    pub update: &'a Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upsert: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceBody<'a, T> {
    pub filter: &'a Document,
    pub replacement: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upsert: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DeleteBody<'a> {
    pub filter: &'a Document,
}

#[derive(Debug, Serialize)]
pub struct AggregateBody<'a> {
    pub pipeline: &'a [Document],
}

/// Serialize a typed body into a document.
pub fn to_body<B: Serialize>(body: &B) -> Result<Document, CodecError> {
    Ok(bson::to_document(body)?)
}
