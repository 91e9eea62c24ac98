use std::sync::Arc;

use serde_json::{Map, Value};

use super::{DocumentStore, StoreError, USERS};

/// Persistence operations on the "users" collection.
///
/// A user document is keyed by the provider-issued user id and carries
/// `userID` (copy of the key), `email`, `firstName`, `timeZone`,
/// `deviceIDs`, `deviceNicknames` and `currentDeviceID`.
#[derive(Clone)]
pub struct Users {
    store: Arc<dyn DocumentStore>,
}

impl Users {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create the user document, stamping `userID` with the document key.
    pub async fn create(
        &self,
        user_id: &str,
        mut doc: Map<String, Value>,
    ) -> Result<(), StoreError> {
        doc.insert("userID".to_string(), Value::String(user_id.to_string()));
        self.store.put(USERS, user_id, doc).await
    }

    /// Fetch the stored profile; `None` when the user never registered.
    pub async fn fetch(&self, user_id: &str) -> Result<Option<Map<String, Value>>, StoreError> {
        self.store.get(USERS, user_id).await
    }

    /// Point the user at a new current device. Last-write-wins; a missing
    /// user document is silently left missing.
    pub async fn set_current_device(
        &self,
        user_id: &str,
        device: Value,
    ) -> Result<(), StoreError> {
        let mut patch = Map::new();
        patch.insert("currentDeviceID".to_string(), device);
        self.store.update(USERS, user_id, patch).await
    }

    /// The user's current device id; `None` when the user document is
    /// absent or the field is unset/empty.
    pub async fn current_device(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let device = self
            .fetch(user_id)
            .await?
            .and_then(|doc| {
                doc.get("currentDeviceID")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .filter(|device| !device.is_empty());
        Ok(device)
    }
}
