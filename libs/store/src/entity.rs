//! Entity capabilities required by the storage layer.

use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::hash::Hash;

/// A storable entity with a stable primary key.
///
/// `NAME` is the lowercase entity name used in error messages
/// (e.g., "product with id ... not found").
pub trait Entity: Clone + Send + Sync + 'static {
    type Key: Copy + Eq + Hash + Display + Send + Sync + 'static;

    const NAME: &'static str;

    fn key(&self) -> Self::Key;

    /// Whether the entity is soft-deleted. Entities without soft-delete
    /// support are never considered deleted.
    fn is_deleted(&self) -> bool {
        false
    }
}

/// Entities that support soft deletion.
///
/// Soft-deleting stages an update that flips the deleted flag and bumps
/// the modification timestamp instead of removing the row. List queries
/// skip soft-deleted entities; lookups by id still return them.
pub trait SoftDeletable: Entity {
    fn mark_deleted(&mut self, now: DateTime<Utc>);
}
