use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::store::recordings::Recordings;
use crate::store::users::Users;
use crate::store::DocumentStore;

/// Shared application state: the document store handle and the identity
/// provider client. Both are trait objects so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { store, verifier }
    }

    pub fn users(&self) -> Users {
        Users::new(self.store.clone())
    }

    pub fn recordings(&self) -> Recordings {
        Recordings::new(self.store.clone())
    }
}
