//! Insert one document.

use super::convert::{id_to_json, json_to_document};
use crate::db::store::DocumentStore;
use crate::error::ProxyResult;
use crate::models::{InsertRequest, InsertResult, Namespace};
use bson::Document;
use tracing::debug;

/// Translate the request into the document to store.
pub fn decode(request: InsertRequest) -> ProxyResult<Document> {
    json_to_document(request.document, "document")
}

/// Store `document` and report the identifier the engine assigned.
pub async fn execute<S: DocumentStore>(
    store: &S,
    ns: &Namespace,
    document: Document,
) -> ProxyResult<InsertResult> {
    let id = store
        .insert_document(ns, document)
        .await
        .map_err(|e| e.in_namespace(ns))?;
    debug!(namespace = %ns, inserted_id = %id, "Inserted document");

    Ok(InsertResult {
        inserted_id: id_to_json(id),
    })
}
