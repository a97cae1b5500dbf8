//! Find all documents matching a filter.

use super::convert::{document_to_json, json_to_document};
use crate::db::store::DocumentStore;
use crate::error::ProxyResult;
use crate::models::{FindRequest, FindResult, Namespace};
use bson::{Document, doc};
use tracing::debug;

/// Translate the request into a native filter. No filter matches everything.
pub fn decode(request: FindRequest) -> ProxyResult<Document> {
    match request.filter {
        Some(filter) => json_to_document(filter, "filter"),
        None => Ok(doc! {}),
    }
}

/// Run the query and return every match in engine order.
pub async fn execute<S: DocumentStore>(
    store: &S,
    ns: &Namespace,
    filter: Document,
) -> ProxyResult<FindResult> {
    let documents = store
        .find_documents(ns, filter)
        .await
        .map_err(|e| e.in_namespace(ns))?;
    debug!(namespace = %ns, count = documents.len(), "Found documents");

    Ok(FindResult::new(
        documents.into_iter().map(document_to_json).collect(),
    ))
}
