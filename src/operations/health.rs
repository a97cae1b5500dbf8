//! Health check: list the databases the engine exposes.

use crate::db::store::DocumentStore;
use crate::error::ProxyResult;
use crate::models::HealthResult;
use tracing::debug;

/// Any failure here means the service is degraded, so storage refusals are
/// reported as connectivity failures.
pub async fn execute<S: DocumentStore>(store: &S) -> ProxyResult<HealthResult> {
    let names = store
        .database_names()
        .await
        .map_err(|e| e.into_connectivity())?;
    debug!(databases = names.len(), "Listed databases");

    Ok(HealthResult {
        databases: names.into_iter().collect(),
    })
}
