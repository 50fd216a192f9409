//! Shared committed storage.

use crate::entity::Entity;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Committed rows for one entity type, shared between services.
///
/// Cloning a `Table` is cheap and yields a handle to the same data.
/// All staged-write machinery lives in [`crate::Repository`]; the table
/// itself only ever holds committed state.
pub struct Table<E: Entity> {
    rows: Arc<RwLock<HashMap<E::Key, E>>>,
}

impl<E: Entity> Clone for Table<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Table<E> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, HashMap<E::Key, E>> {
        self.rows.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, HashMap<E::Key, E>> {
        self.rows.write().await
    }

    /// Insert a committed row directly, bypassing staging. Intended for
    /// seeding fixtures and tests.
    pub async fn insert(&self, entity: E) {
        self.rows.write().await.insert(entity.key(), entity);
    }

    /// Fetch a committed row by key.
    pub async fn get(&self, key: E::Key) -> Option<E> {
        self.rows.read().await.get(&key).cloned()
    }

    /// Number of committed rows, including soft-deleted ones.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}
