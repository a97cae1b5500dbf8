//! In-memory connector and store shared by the integration tests.

#![allow(dead_code)]

use bson::{Bson, Document, oid::ObjectId};
use mongodb_proxy::db::{Connector, DocumentStore, UpdateOutcome};
use mongodb_proxy::error::{ProxyError, ProxyResult};
use mongodb_proxy::models::Namespace;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Collections = BTreeMap<(String, String), Vec<Document>>;

/// Document store backed by a map. Clones share the same data.
///
/// Filters support top-level equality only; updates support `$set` only.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub(crate) collections: Arc<Mutex<Collections>>,
    /// Answer `database_names` with an authorization failure
    pub refuse_listing: bool,
}

impl MemoryStore {
    pub fn documents(&self, ns: &Namespace) -> Vec<Document> {
        let collections = self.collections.lock().unwrap();
        collections.get(&key(ns)).cloned().unwrap_or_default()
    }
}

fn key(ns: &Namespace) -> (String, String) {
    (ns.database().to_string(), ns.collection().to_string())
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(field, value)| document.get(field) == Some(value))
}

impl DocumentStore for MemoryStore {
    async fn insert_document(&self, ns: &Namespace, mut document: Document) -> ProxyResult<Bson> {
        let mut collections = self.collections.lock().unwrap();
        let documents = collections.entry(key(ns)).or_default();

        let id = match document.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                document.insert("_id", id.clone());
                id
            }
        };
        if documents.iter().any(|d| d.get("_id") == Some(&id)) {
            return Err(ProxyError::storage(
                format!("E11000 duplicate key error collection: {} dup key: {}", ns, id),
                Some(11000),
                "A document with the same unique key already exists",
            ));
        }

        documents.push(document);
        Ok(id)
    }

    async fn find_documents(&self, ns: &Namespace, filter: Document) -> ProxyResult<Vec<Document>> {
        Ok(self
            .documents(ns)
            .into_iter()
            .filter(|d| matches(d, &filter))
            .collect())
    }

    async fn update_documents(
        &self,
        ns: &Namespace,
        filter: Document,
        update: Document,
        upsert: bool,
    ) -> ProxyResult<UpdateOutcome> {
        let changes = match update.get_document("$set") {
            Ok(changes) if update.len() == 1 => changes.clone(),
            _ => {
                return Err(ProxyError::storage(
                    "Only $set is supported",
                    Some(9),
                    "Use $set",
                ));
            }
        };

        let mut collections = self.collections.lock().unwrap();
        let documents = collections.entry(key(ns)).or_default();

        let mut matched_count = 0;
        let mut modified_count = 0;
        for document in documents.iter_mut().filter(|d| matches(d, &filter)) {
            matched_count += 1;
            let mut modified = false;
            for (field, value) in changes.iter() {
                if document.get(field) != Some(value) {
                    document.insert(field.clone(), value.clone());
                    modified = true;
                }
            }
            if modified {
                modified_count += 1;
            }
        }

        let mut upserted_id = None;
        if matched_count == 0 && upsert {
            let mut document = filter.clone();
            for (field, value) in changes {
                document.insert(field, value);
            }
            let id = match document.get("_id") {
                Some(id) => id.clone(),
                None => {
                    let id = Bson::ObjectId(ObjectId::new());
                    document.insert("_id", id.clone());
                    id
                }
            };
            documents.push(document);
            upserted_id = Some(id);
        }

        Ok(UpdateOutcome {
            matched_count,
            modified_count,
            upserted_id,
        })
    }

    async fn database_names(&self) -> ProxyResult<Vec<String>> {
        if self.refuse_listing {
            return Err(ProxyError::storage(
                "not authorized on admin to execute command { listDatabases: 1 }",
                Some(13),
                "Grant the listDatabases privilege",
            ));
        }
        let collections = self.collections.lock().unwrap();
        let mut names: Vec<String> = collections.keys().map(|(db, _)| db.clone()).collect();
        names.push("admin".to_string());
        Ok(names)
    }
}

/// Connector that hands out clones of one [`MemoryStore`] and counts calls.
#[derive(Clone, Default)]
pub struct MemoryConnector {
    pub store: MemoryStore,
    pub attempts: Arc<AtomicUsize>,
    pub connects: Arc<AtomicUsize>,
    pub releases: Arc<AtomicUsize>,
    pub uris: Arc<Mutex<Vec<String>>>,
    pub fail_connect: bool,
    pub connect_delay: Option<Duration>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            connect_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn last_uri(&self) -> Option<String> {
        self.uris.lock().unwrap().last().cloned()
    }
}

impl Connector for MemoryConnector {
    type Connection = MemoryStore;

    async fn connect(&self, uri: &str) -> ProxyResult<MemoryStore> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.uris.lock().unwrap().push(uri.to_string());

        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_connect {
            return Err(ProxyError::connection(
                "Connection refused",
                "Check that the database is running",
            ));
        }

        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.store.clone())
    }

    async fn release(&self, _connection: MemoryStore) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}
