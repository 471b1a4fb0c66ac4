use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use bson::{Bson, Document};
use docfetch_core::models::{from_payload, unwrap_document, unwrap_documents};
use docfetch_core::request::{
    to_body, AggregateBody, DeleteBody, FindBody, FindOneBody, InsertManyBody, InsertOneBody,
    ReplaceBody, UpdateBody,
};
use docfetch_core::{
    Action, CallOptions, CodecError, DataApiError, DeleteResult, FindOneOptions, FindOptions,
    InsertManyResult, InsertOneResult, OperationResult, UpdateOptions, UpdateResult,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::connection::ConnectionContext;
use crate::invoker::{invoke, Reply};
use crate::Result;

/// A database selected on a client. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    name: String,
    ctx: Arc<ConnectionContext>,
}

impl Database {
    pub(crate) fn new(ctx: Arc<ConnectionContext>, name: String) -> Self {
        Self { name, ctx }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Select a collection of untyped documents.
    pub fn collection(&self, name: impl Into<String>) -> Collection<Document> {
        self.collection_with_type(name)
    }

    /// Select a collection whose documents (de)serialize as `T`.
    pub fn collection_with_type<T>(&self, name: impl Into<String>) -> Collection<T> {
        Collection {
            name: name.into(),
            database: self.clone(),
            _marker: PhantomData,
        }
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A collection within a [`Database`]. Every operation is a single POST to
/// `<endpoint>/action/<action>`.
///
/// Operations return `Result<OperationResult<_>>`: the outer error is a
/// local failure (transport, codec, empty identifier); the inner error is
/// what the Data API answered with a status outside 200-399.
pub struct Collection<T = Document> {
    name: String,
    database: Database,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            database: self.database.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("database", &self.database.name)
            .field("name", &self.name)
            .finish()
    }
}

impl<T> Collection<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database_name(&self) -> &str {
        &self.database.name
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Same collection, different document type.
    pub fn clone_with_type<U>(&self) -> Collection<U> {
        self.database.collection_with_type(self.name.clone())
    }

    async fn invoke(
        &self,
        action: &str,
        body: Document,
        label: Option<String>,
    ) -> Result<OperationResult<Reply>> {
        invoke(
            &self.database.ctx,
            &self.database.name,
            &self.name,
            action,
            body,
            label,
        )
        .await
    }

    /// Find the first document matching `filter`. `Ok(Ok(None))` means no match.
    pub async fn find_one(
        &self,
        filter: Document,
        options: impl Into<Option<FindOneOptions>>,
    ) -> Result<OperationResult<Option<T>>>
    where
        T: DeserializeOwned,
    {
        let options = options.into().unwrap_or_default();
        let body = to_body(&FindOneBody {
            filter: &filter,
            projection: options.projection.as_ref(),
            sort: options.sort.as_ref(),
        })?;

        let outcome = self.invoke(Action::FindOne.as_str(), body, options.label).await?;
        unwrap_with(outcome, unwrap_document)
    }

    /// Find all documents matching `filter`, in the order the server returns them.
    pub async fn find(
        &self,
        filter: Document,
        options: impl Into<Option<FindOptions>>,
    ) -> Result<OperationResult<Vec<T>>>
    where
        T: DeserializeOwned,
    {
        let options = options.into().unwrap_or_default();
        let body = to_body(&FindBody {
            filter: &filter,
            projection: options.projection.as_ref(),
            sort: options.sort.as_ref(),
            limit: options.limit,
            skip: options.skip,
        })?;

        let outcome = self.invoke(Action::Find.as_str(), body, options.label).await?;
        unwrap_with(outcome, unwrap_documents)
    }

    pub async fn insert_one(
        &self,
        document: &T,
        options: impl Into<Option<CallOptions>>,
    ) -> Result<OperationResult<InsertOneResult>>
    where
        T: Serialize,
    {
        let options = options.into().unwrap_or_default();
        let body = to_body(&InsertOneBody { document })?;

        let outcome = self.invoke(Action::InsertOne.as_str(), body, options.label).await?;
        unwrap_with(outcome, from_payload)
    }

    pub async fn insert_many(
        &self,
        documents: &[T],
        options: impl Into<Option<CallOptions>>,
    ) -> Result<OperationResult<InsertManyResult>>
    where
        T: Serialize,
    {
        let options = options.into().unwrap_or_default();
        let body = to_body(&InsertManyBody { documents })?;

        let outcome = self.invoke(Action::InsertMany.as_str(), body, options.label).await?;
        unwrap_with(outcome, from_payload)
    }

    pub async fn update_one(
        &self,
        filter: Document,
        update: Document,
        options: impl Into<Option<UpdateOptions>>,
    ) -> Result<OperationResult<UpdateResult>> {
        self.update(Action::UpdateOne, filter, update, options.into())
            .await
    }

    pub async fn update_many(
        &self,
        filter: Document,
        update: Document,
        options: impl Into<Option<UpdateOptions>>,
    ) -> Result<OperationResult<UpdateResult>> {
        self.update(Action::UpdateMany, filter, update, options.into())
            .await
    }

    async fn update(
        &self,
        action: Action,
        filter: Document,
        update: Document,
        options: Option<UpdateOptions>,
    ) -> Result<OperationResult<UpdateResult>> {
        let options = options.unwrap_or_default();
        let body = to_body(&UpdateBody {
            filter: &filter,
            update: &update,
            upsert: options.upsert,
        })?;

        let outcome = self.invoke(action.as_str(), body, options.label).await?;
        unwrap_with(outcome, from_payload)
    }

    pub async fn replace_one(
        &self,
        filter: Document,
        replacement: &T,
        options: impl Into<Option<UpdateOptions>>,
    ) -> Result<OperationResult<UpdateResult>>
    where
        T: Serialize,
    {
        let options = options.into().unwrap_or_default();
        let body = to_body(&ReplaceBody {
            filter: &filter,
            replacement,
            upsert: options.upsert,
        })?;

        let outcome = self.invoke(Action::ReplaceOne.as_str(), body, options.label).await?;
        unwrap_with(outcome, from_payload)
    }

    pub async fn delete_one(
        &self,
        filter: Document,
        options: impl Into<Option<CallOptions>>,
    ) -> Result<OperationResult<DeleteResult>> {
        self.delete(Action::DeleteOne, filter, options.into()).await
    }

    pub async fn delete_many(
        &self,
        filter: Document,
        options: impl Into<Option<CallOptions>>,
    ) -> Result<OperationResult<DeleteResult>> {
        self.delete(Action::DeleteMany, filter, options.into()).await
    }

    async fn delete(
        &self,
        action: Action,
        filter: Document,
        options: Option<CallOptions>,
    ) -> Result<OperationResult<DeleteResult>> {
        let options = options.unwrap_or_default();
        let body = to_body(&DeleteBody { filter: &filter })?;

        let outcome = self.invoke(action.as_str(), body, options.label).await?;
        unwrap_with(outcome, from_payload)
    }

    /// Run an aggregation pipeline. A success response without any body is
    /// reported as an "Unknown error" carrying the response status.
    pub async fn aggregate<R>(
        &self,
        pipeline: impl IntoIterator<Item = Document>,
        options: impl Into<Option<CallOptions>>,
    ) -> Result<OperationResult<Vec<R>>>
    where
        R: DeserializeOwned,
    {
        let options = options.into().unwrap_or_default();
        let pipeline: Vec<Document> = pipeline.into_iter().collect();
        let body = to_body(&AggregateBody {
            pipeline: &pipeline,
        })?;

        match self.invoke(Action::Aggregate.as_str(), body, options.label).await? {
            Ok(reply) if matches!(reply.payload, Bson::Null | Bson::Undefined) => {
                Ok(Err(DataApiError::unknown(reply.status)))
            }
            outcome => unwrap_with(outcome, unwrap_documents),
        }
    }

    /// Call any Data API action with a raw body. The payload is returned as
    /// sent by the server, decoded into `R` (use [`Bson`] to keep it raw).
    pub async fn call_api<R>(
        &self,
        action: &str,
        body: Document,
        options: impl Into<Option<CallOptions>>,
    ) -> Result<OperationResult<R>>
    where
        R: DeserializeOwned,
    {
        let options = options.into().unwrap_or_default();
        let outcome = self.invoke(action, body, options.label).await?;
        unwrap_with(outcome, from_payload)
    }
}

fn unwrap_with<R>(
    outcome: OperationResult<Reply>,
    unwrap: impl FnOnce(Bson) -> std::result::Result<R, CodecError>,
) -> Result<OperationResult<R>> {
    match outcome {
        Ok(reply) => Ok(Ok(unwrap(reply.payload)?)),
        Err(error) => Ok(Err(error)),
    }
}
