use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod memory;
pub mod postgres;
pub mod recordings;
pub mod users;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Collection of user documents, keyed by provider-issued user id
pub const USERS: &str = "users";
/// Collection of recording documents, keyed by generated document id
pub const RECORDINGS: &str = "recordings";

const COLLECTIONS: &[&str] = &[USERS, RECORDINGS];

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Validate a collection name against the fixed set. Collection names are
/// interpolated into SQL as table names, so nothing else may pass.
pub(crate) fn known_collection(collection: &str) -> Result<&'static str, StoreError> {
    COLLECTIONS
        .iter()
        .find(|c| **c == collection)
        .copied()
        .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
}

/// The handful of document operations this service needs. Writes are
/// unconditional last-write-wins: there is no optimistic concurrency check
/// and no retry; isolation is whatever the backing database provides.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or replace the document stored under `id`.
    async fn put(
        &self,
        collection: &str,
        id: &str,
        doc: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Fetch a document; absent documents yield `None`, never an error.
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Map<String, Value>>, StoreError>;

    /// Shallow-merge `patch` into an existing document. A missing document
    /// is silently left missing (matches the upstream exists-then-update).
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// All documents whose top-level `field` equals `value` (string
    /// equality), each returned with its document id injected under `"id"`.
    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError>;
}
