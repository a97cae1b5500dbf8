//! Update every document matching a filter.

use super::convert::{id_to_json, json_to_document};
use crate::db::store::DocumentStore;
use crate::error::{ProxyError, ProxyResult};
use crate::models::{Namespace, UpdateRequest, UpdateResult};
use bson::{Document, doc};
use tracing::debug;

/// Native form of an update request.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCommand {
    pub filter: Document,
    pub update: Document,
    pub upsert: bool,
}

/// Translate the request. Plain field documents are merged with `$set`;
/// operator documents are passed through as-is.
pub fn decode(request: UpdateRequest) -> ProxyResult<UpdateCommand> {
    let filter = json_to_document(request.filter, "filter")?;
    let update = json_to_document(request.update, "update")?;

    Ok(UpdateCommand {
        filter,
        update: to_update_document(update)?,
        upsert: request.upsert,
    })
}

fn to_update_document(update: Document) -> ProxyResult<Document> {
    if update.is_empty() {
        return Err(ProxyError::malformed("The update must not be empty"));
    }

    let operators = update.keys().filter(|k| k.starts_with('$')).count();
    if operators == update.len() {
        Ok(update)
    } else if operators == 0 {
        Ok(doc! { "$set": update })
    } else {
        Err(ProxyError::malformed(
            "The update cannot mix update operators and plain fields",
        ))
    }
}

/// Apply the update and report match and modification counts.
pub async fn execute<S: DocumentStore>(
    store: &S,
    ns: &Namespace,
    command: UpdateCommand,
) -> ProxyResult<UpdateResult> {
    let outcome = store
        .update_documents(ns, command.filter, command.update, command.upsert)
        .await
        .map_err(|e| e.in_namespace(ns))?;
    debug!(
        namespace = %ns,
        matched = outcome.matched_count,
        modified = outcome.modified_count,
        upserted = outcome.upserted_id.is_some(),
        "Updated documents"
    );

    Ok(UpdateResult {
        matched_count: outcome.matched_count,
        modified_count: outcome.modified_count.min(outcome.matched_count),
        upserted_id: outcome.upserted_id.map(id_to_json),
    })
}
