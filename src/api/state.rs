use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::Catalog;
use crate::services::{GenreIndex, InMemoryStore, ProfileStore, RecommendOptions};

/// Shared application state
///
/// The catalog and its genre index are built once and never mutated. Profile
/// edits are read-modify-write against the store, so edits to the same
/// profile are serialized through a per-username lock.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub index: Arc<GenreIndex>,
    pub store: Arc<dyn ProfileStore>,
    pub options: RecommendOptions,
    profile_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Built-in catalog, in-memory profiles, default options
    pub fn new() -> Self {
        Self::with_parts(
            Catalog::builtin(),
            Arc::new(InMemoryStore::new()),
            RecommendOptions::default(),
        )
    }

    pub fn with_parts(
        catalog: Catalog,
        store: Arc<dyn ProfileStore>,
        options: RecommendOptions,
    ) -> Self {
        let index = GenreIndex::build(&catalog);
        tracing::info!(
            titles = catalog.len(),
            genres = index.universe().len(),
            store = store.name(),
            "Application state initialized"
        );

        Self {
            catalog: Arc::new(catalog),
            index: Arc::new(index),
            store,
            options,
            profile_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Waits for exclusive access to one user's profile. Other users are not blocked.
    pub async fn lock_profile(&self, username: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.profile_locks.lock().await;
            locks
                .entry(username.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
