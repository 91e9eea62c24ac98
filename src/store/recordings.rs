use std::sync::Arc;

use serde_json::{Map, Value};

use super::{DocumentStore, StoreError, RECORDINGS};

/// Persistence operations on the "recordings" collection.
///
/// Recording documents are created externally by the storage-sync step when
/// a new audio file lands; each carries `deviceID`, `sessionTitle`, `notes`,
/// `viewed`, `createdAt` and `fileURL`. This service only reads them and
/// updates the three client-editable fields. The device binding set at
/// creation is never reassigned here.
#[derive(Clone)]
pub struct Recordings {
    store: Arc<dyn DocumentStore>,
}

impl Recordings {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All recordings produced by the given device, ids included.
    pub async fn for_device(&self, device_id: &str) -> Result<Vec<Value>, StoreError> {
        self.store.find_eq(RECORDINGS, "deviceID", device_id).await
    }

    pub async fn set_title(&self, recording_id: &str, title: &str) -> Result<(), StoreError> {
        self.patch_field(recording_id, "sessionTitle", Value::String(title.to_string()))
            .await
    }

    pub async fn set_notes(&self, recording_id: &str, notes: &str) -> Result<(), StoreError> {
        self.patch_field(recording_id, "notes", Value::String(notes.to_string()))
            .await
    }

    pub async fn set_viewed(&self, recording_id: &str, viewed: bool) -> Result<(), StoreError> {
        self.patch_field(recording_id, "viewed", Value::Bool(viewed))
            .await
    }

    /// Update exactly one field, leaving the rest of the document untouched.
    async fn patch_field(
        &self,
        recording_id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut patch = Map::new();
        patch.insert(field.to_string(), value);
        self.store.update(RECORDINGS, recording_id, patch).await
    }
}
