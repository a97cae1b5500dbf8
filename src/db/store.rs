//! Storage calls the operation translators depend on.
//!
//! [`DocumentStore`] is implemented for `mongodb::Client`; every method is a
//! single driver call with errors classified by `From<mongodb::error::Error>`.

use crate::error::ProxyResult;
use crate::models::Namespace;
use bson::{Bson, Document};
use futures_util::TryStreamExt;
use mongodb::{Client, Collection};
use std::future::Future;

/// Raw outcome of a many-document update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<Bson>,
}

/// Native operations against a connected engine.
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Insert one document and return its `_id`.
    fn insert_document(
        &self,
        ns: &Namespace,
        document: Document,
    ) -> impl Future<Output = ProxyResult<Bson>> + Send;

    /// Return every document matching `filter`, in engine iteration order.
    fn find_documents(
        &self,
        ns: &Namespace,
        filter: Document,
    ) -> impl Future<Output = ProxyResult<Vec<Document>>> + Send;

    /// Apply `update` to all documents matching `filter`.
    fn update_documents(
        &self,
        ns: &Namespace,
        filter: Document,
        update: Document,
        upsert: bool,
    ) -> impl Future<Output = ProxyResult<UpdateOutcome>> + Send;

    /// Names of all databases visible to this connection.
    fn database_names(&self) -> impl Future<Output = ProxyResult<Vec<String>>> + Send;
}

fn collection(client: &Client, ns: &Namespace) -> Collection<Document> {
    client.database(ns.database()).collection(ns.collection())
}

impl DocumentStore for Client {
    async fn insert_document(&self, ns: &Namespace, document: Document) -> ProxyResult<Bson> {
        let result = collection(self, ns).insert_one(document).await?;
        Ok(result.inserted_id)
    }

    async fn find_documents(&self, ns: &Namespace, filter: Document) -> ProxyResult<Vec<Document>> {
        let cursor = collection(self, ns).find(filter).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn update_documents(
        &self,
        ns: &Namespace,
        filter: Document,
        update: Document,
        upsert: bool,
    ) -> ProxyResult<UpdateOutcome> {
        let result = collection(self, ns)
            .update_many(filter, update)
            .upsert(upsert)
            .await?;
        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id,
        })
    }

    async fn database_names(&self) -> ProxyResult<Vec<String>> {
        Ok(self.list_database_names().await?)
    }
}
