use std::fmt;

use bson::Bson;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Action represents a Data API endpoint, addressed as `/action/<name>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    FindOne,
    Find,
    InsertOne,
    InsertMany,
    UpdateOne,
    UpdateMany,
    ReplaceOne,
    DeleteOne,
    DeleteMany,
    Aggregate,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::FindOne => "findOne",
            Action::Find => "find",
            Action::InsertOne => "insertOne",
            Action::InsertMany => "insertMany",
            Action::UpdateOne => "updateOne",
            Action::UpdateMany => "updateMany",
            Action::ReplaceOne => "replaceOne",
            Action::DeleteOne => "deleteOne",
            Action::DeleteMany => "deleteMany",
            Action::Aggregate => "aggregate",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// InsertOneResult is returned by `insertOne`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub inserted_id: Bson,
}

/// InsertManyResult is returned by `insertMany`, ids in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertManyResult {
    pub inserted_ids: Vec<Bson>,
}

/// UpdateResult is returned by `updateOne`, `updateMany` and `replaceOne`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<Bson>,
}

/// DeleteResult is returned by `deleteOne` and `deleteMany`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// `{ "document": ... }` envelope of `findOne`
#[derive(Debug, Deserialize)]
pub struct DocumentEnvelope<T> {
    pub document: Option<T>,
}

/// `{ "documents": [...] }` envelope of `find` and `aggregate`
#[derive(Debug, Deserialize)]
pub struct DocumentsEnvelope<T> {
    pub documents: Vec<T>,
}

/// Unwrap a `findOne` payload. A null payload, a missing `document` field
/// and `document: null` all mean "no match".
pub fn unwrap_document<T: DeserializeOwned>(payload: Bson) -> Result<Option<T>, CodecError> {
    match payload {
        Bson::Null | Bson::Undefined => Ok(None),
        other => Ok(bson::from_bson::<DocumentEnvelope<T>>(other)?.document),
    }
}

/// Unwrap a `find`/`aggregate` payload, preserving order. A null payload
/// is an empty result.
pub fn unwrap_documents<T: DeserializeOwned>(payload: Bson) -> Result<Vec<T>, CodecError> {
    match payload {
        Bson::Null | Bson::Undefined => Ok(Vec::new()),
        other => Ok(bson::from_bson::<DocumentsEnvelope<T>>(other)?.documents),
    }
}

/// Deserialize a payload that needs no unwrapping.
pub fn from_payload<T: DeserializeOwned>(payload: Bson) -> Result<T, CodecError> {
    Ok(bson::from_bson(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, Document};

    #[test]
    fn test_action_names() {
        let actions = [
            (Action::FindOne, "findOne"),
            (Action::Find, "find"),
            (Action::InsertOne, "insertOne"),
            (Action::InsertMany, "insertMany"),
            (Action::UpdateOne, "updateOne"),
            (Action::UpdateMany, "updateMany"),
            (Action::ReplaceOne, "replaceOne"),
            (Action::DeleteOne, "deleteOne"),
            (Action::DeleteMany, "deleteMany"),
            (Action::Aggregate, "aggregate"),
        ];
        for (action, name) in actions {
            assert_eq!(action.as_str(), name);
            assert_eq!(action.to_string(), name);
        }
    }

    #[test]
    fn test_unwrap_document_variants() {
        let found: Option<Document> =
            unwrap_document(Bson::Document(doc! { "document": { "a": 1 } })).unwrap();
        assert_eq!(found, Some(doc! { "a": 1 }));

        let null: Option<Document> =
            unwrap_document(Bson::Document(doc! { "document": Bson::Null })).unwrap();
        assert_eq!(null, None);

        let missing: Option<Document> = unwrap_document(Bson::Document(doc! {})).unwrap();
        assert_eq!(missing, None);

        let empty: Option<Document> = unwrap_document(Bson::Null).unwrap();
        assert_eq!(empty, None);
    }

    #[test]
    fn test_unwrap_documents_keeps_order() {
        let payload = Bson::Document(doc! {
            "documents": [ { "n": 2 }, { "n": 1 }, { "n": 3 } ]
        });
        let documents: Vec<Document> = unwrap_documents(payload).unwrap();
        let order: Vec<i32> = documents.iter().map(|d| d.get_i32("n").unwrap()).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn test_unwrap_documents_null_is_empty() {
        let documents: Vec<Document> = unwrap_documents(Bson::Null).unwrap();
        assert!(documents.is_empty());
    }

    #[test]
    fn test_unwrap_documents_requires_field() {
        let result: Result<Vec<Document>, _> = unwrap_documents(Bson::Document(doc! {}));
        assert!(matches!(result, Err(CodecError::Deserialize(_))));
    }

    #[test]
    fn test_update_result_from_relaxed_counts() {
        let result: UpdateResult =
            from_payload(Bson::Document(doc! { "matchedCount": 1, "modifiedCount": 0 })).unwrap();
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.modified_count, 0);
        assert!(result.upserted_id.is_none());

        let result: UpdateResult = from_payload(Bson::Document(doc! {
            "matchedCount": 0_i64,
            "modifiedCount": 0_i64,
            "upsertedId": "abc",
        }))
        .unwrap();
        assert_eq!(result.upserted_id, Some(Bson::String("abc".into())));
    }

    #[test]
    fn test_insert_many_result() {
        let result: InsertManyResult = from_payload(Bson::Document(doc! {
            "insertedIds": ["a", "b"]
        }))
        .unwrap();
        assert_eq!(result.inserted_ids.len(), 2);
    }
}
