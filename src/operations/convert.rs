//! JSON <-> BSON conversion for caller payloads.

use crate::error::{ProxyError, ProxyResult};
use bson::{Bson, Document};
use serde_json::Value as JsonValue;

/// Decode caller JSON (Extended JSON accepted) into a document.
///
/// `what` names the payload in error messages, e.g. "filter".
pub fn json_to_document(value: JsonValue, what: &str) -> ProxyResult<Document> {
    if !value.is_object() {
        return Err(ProxyError::malformed(format!(
            "The {} must be a JSON object",
            what
        )));
    }
    match Bson::try_from(value)? {
        Bson::Document(document) => Ok(document),
        // A lone `{"$oid": ...}` and friends decode to scalars
        other => Err(ProxyError::malformed(format!(
            "The {} must be a document, got {:?}",
            what,
            other.element_type()
        ))),
    }
}

/// Render a stored document as relaxed Extended JSON.
pub fn document_to_json(document: Document) -> JsonValue {
    Bson::Document(document).into_relaxed_extjson()
}

/// Render an identifier. ObjectIds become plain hex strings.
pub fn id_to_json(id: Bson) -> JsonValue {
    match id {
        Bson::ObjectId(oid) => JsonValue::String(oid.to_hex()),
        other => other.into_relaxed_extjson(),
    }
}
