use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::{known_collection, DocumentStore, StoreError, COLLECTIONS};

/// In-memory document store used by the test suite. Mirrors the Postgres
/// semantics: put replaces, update merges into existing documents only, and
/// find_eq compares top-level string fields.
pub struct MemoryStore {
    collections: RwLock<HashMap<&'static str, HashMap<String, Map<String, Value>>>>,
    puts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut collections = HashMap::new();
        for name in COLLECTIONS {
            collections.insert(*name, HashMap::new());
        }
        Self {
            collections: RwLock::new(collections),
            puts: AtomicUsize::new(0),
        }
    }

    /// Number of `put` calls observed, for call-count assertions in tests
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put(
        &self,
        collection: &str,
        id: &str,
        doc: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let table = known_collection(collection)?;
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(table) {
            docs.insert(id.to_string(), doc);
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Map<String, Value>>, StoreError> {
        let table = known_collection(collection)?;
        let collections = self.collections.read().await;
        Ok(collections.get(table).and_then(|docs| docs.get(id).cloned()))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let table = known_collection(collection)?;
        let mut collections = self.collections.write().await;
        if let Some(doc) = collections.get_mut(table).and_then(|docs| docs.get_mut(id)) {
            for (key, value) in patch {
                doc.insert(key, value);
            }
        }
        Ok(())
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let table = known_collection(collection)?;
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(table) else {
            return Ok(Vec::new());
        };
        let results = docs
            .iter()
            .filter(|(_, doc)| doc.get(field).and_then(Value::as_str) == Some(value))
            .map(|(id, doc)| {
                let mut map = doc.clone();
                map.insert("id".to_string(), Value::String(id.clone()));
                Value::Object(map)
            })
            .collect();
        Ok(results)
    }
}
