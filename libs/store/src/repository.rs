//! Generic repository with staged writes.
//!
//! A [`Repository`] wraps a shared [`Table`] and keeps two private layers
//! on top of it:
//!
//! - `staged`: writes recorded by `add`/`update`/`remove` that have not
//!   been flushed yet
//! - `overlay`: flushed-but-uncommitted writes, present only while a
//!   transaction is active
//!
//! Reads merge committed rows, the overlay, then the staged queue, so a
//! repository always observes its own pending writes. Flushing validates
//! the whole staged batch before applying any of it; on error the queue
//! is left intact and nothing is applied.

use crate::entity::{Entity, SoftDeletable};
use crate::error::{StoreError, StoreResult};
use crate::memory::Table;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};

enum StagedOp<E: Entity> {
    Insert(E),
    Update(E),
    Delete(E::Key),
}

pub struct Repository<E: Entity> {
    table: Table<E>,
    staged: Vec<StagedOp<E>>,
    overlay: Option<HashMap<E::Key, Option<E>>>,
}

impl<E: Entity> Repository<E> {
    pub fn new(table: Table<E>) -> Self {
        Self {
            table,
            staged: Vec::new(),
            overlay: None,
        }
    }

    /// Merged view: committed rows, then the transaction overlay, then
    /// the staged queue. An `Option::None` overlay value is a delete.
    async fn visible(&self) -> HashMap<E::Key, E> {
        let mut view = self.table.read().await.clone();
        if let Some(overlay) = &self.overlay {
            for (key, row) in overlay {
                match row {
                    Some(entity) => {
                        view.insert(*key, entity.clone());
                    }
                    None => {
                        view.remove(key);
                    }
                }
            }
        }
        for op in &self.staged {
            match op {
                StagedOp::Insert(entity) | StagedOp::Update(entity) => {
                    view.insert(entity.key(), entity.clone());
                }
                StagedOp::Delete(key) => {
                    view.remove(key);
                }
            }
        }
        view
    }

    /// Fetch one entity by id, observing staged writes.
    ///
    /// Soft-deleted entities are still returned here; only list queries
    /// filter them out.
    pub async fn get_by_id(&self, id: E::Key) -> StoreResult<E> {
        self.visible()
            .await
            .remove(&id)
            .ok_or_else(|| StoreError::not_found::<E>(id))
    }

    /// All entities that are not soft-deleted.
    pub async fn get_all(&self) -> StoreResult<Vec<E>> {
        Ok(self
            .visible()
            .await
            .into_values()
            .filter(|e| !e.is_deleted())
            .collect())
    }

    /// All non-deleted entities matching the predicate.
    pub async fn find<P>(&self, predicate: P) -> StoreResult<Vec<E>>
    where
        P: Fn(&E) -> bool + Send,
    {
        Ok(self
            .visible()
            .await
            .into_values()
            .filter(|e| !e.is_deleted() && predicate(e))
            .collect())
    }

    /// First non-deleted entity matching the predicate, `NotFound` when
    /// nothing matches.
    pub async fn first_or_default<P>(&self, predicate: P) -> StoreResult<E>
    where
        P: Fn(&E) -> bool + Send,
    {
        self.visible()
            .await
            .into_values()
            .find(|e| !e.is_deleted() && predicate(e))
            .ok_or_else(StoreError::no_match::<E>)
    }

    /// Whether any non-deleted entity matches the predicate.
    pub async fn any<P>(&self, predicate: P) -> StoreResult<bool>
    where
        P: Fn(&E) -> bool + Send,
    {
        Ok(self
            .visible()
            .await
            .values()
            .any(|e| !e.is_deleted() && predicate(e)))
    }

    /// Number of non-deleted entities.
    pub async fn count_all(&self) -> StoreResult<usize> {
        Ok(self
            .visible()
            .await
            .values()
            .filter(|e| !e.is_deleted())
            .count())
    }

    /// Number of non-deleted entities matching the predicate.
    pub async fn count_where<P>(&self, predicate: P) -> StoreResult<usize>
    where
        P: Fn(&E) -> bool + Send,
    {
        Ok(self
            .visible()
            .await
            .values()
            .filter(|e| !e.is_deleted() && predicate(e))
            .count())
    }

    /// Stage an insert. Fails immediately if the key is already visible.
    pub async fn add(&mut self, entity: E) -> StoreResult<()> {
        let key = entity.key();
        if self.visible().await.contains_key(&key) {
            return Err(StoreError::duplicated::<E>(format!("id {key}")));
        }
        self.staged.push(StagedOp::Insert(entity));
        Ok(())
    }

    /// Stage several inserts. The whole batch is rejected if any key is
    /// already visible or duplicated within the batch itself.
    pub async fn add_range(&mut self, entities: Vec<E>) -> StoreResult<()> {
        let view = self.visible().await;
        let mut batch = HashSet::new();
        for entity in &entities {
            let key = entity.key();
            if view.contains_key(&key) || !batch.insert(key) {
                return Err(StoreError::duplicated::<E>(format!("id {key}")));
            }
        }
        self.staged
            .extend(entities.into_iter().map(StagedOp::Insert));
        Ok(())
    }

    /// Stage a full replacement of the entity with this key. Existence
    /// is checked at flush time.
    pub fn update(&mut self, entity: E) {
        self.staged.push(StagedOp::Update(entity));
    }

    pub fn update_range(&mut self, entities: Vec<E>) {
        self.staged
            .extend(entities.into_iter().map(StagedOp::Update));
    }

    /// Stage a hard delete of the given entity.
    pub fn remove(&mut self, entity: &E) {
        self.staged.push(StagedOp::Delete(entity.key()));
    }

    /// Stage a hard delete by id, failing now if the id is not visible.
    pub async fn remove_by_id(&mut self, id: E::Key) -> StoreResult<()> {
        if !self.visible().await.contains_key(&id) {
            return Err(StoreError::not_found::<E>(id));
        }
        self.staged.push(StagedOp::Delete(id));
        Ok(())
    }

    pub fn remove_range(&mut self, entities: &[E]) {
        self.staged
            .extend(entities.iter().map(|e| StagedOp::Delete(e.key())));
    }

    /// Number of staged, unflushed operations.
    pub fn pending_count(&self) -> usize {
        self.staged.len()
    }

    /// Validate the staged batch against `present`, simulating batch
    /// order so an insert-then-delete of the same key is accepted.
    fn validate_staged(&self, present: &mut HashSet<E::Key>) -> StoreResult<()> {
        for op in &self.staged {
            match op {
                StagedOp::Insert(entity) => {
                    let key = entity.key();
                    if !present.insert(key) {
                        return Err(StoreError::duplicated::<E>(format!("id {key}")));
                    }
                }
                StagedOp::Update(entity) => {
                    if !present.contains(&entity.key()) {
                        return Err(StoreError::not_found::<E>(entity.key()));
                    }
                }
                StagedOp::Delete(key) => {
                    if !present.remove(key) {
                        return Err(StoreError::not_found::<E>(*key));
                    }
                }
            }
        }
        Ok(())
    }
}

impl<E: SoftDeletable> Repository<E> {
    /// Stage a soft delete: flips the deleted flag and stamps the
    /// modification time, keeping the row.
    pub async fn soft_delete(&mut self, id: E::Key) -> StoreResult<()> {
        let mut entity = self.get_by_id(id).await?;
        entity.mark_deleted(Utc::now());
        self.update(entity);
        Ok(())
    }
}

/// Type-erased handle over a repository, used by
/// [`crate::UnitOfWork`] to coordinate flushes and transaction overlays
/// across repositories of different entity types.
#[async_trait]
pub trait Session: Send {
    /// Number of staged, unflushed operations.
    fn pending_count(&self) -> usize;

    /// Validate and apply the staged batch. Inside a transaction the
    /// batch lands in the overlay; otherwise it is written straight to
    /// the shared table. Returns the number of applied operations; on
    /// error nothing is applied and the batch stays staged.
    async fn flush(&mut self) -> StoreResult<usize>;

    /// Open a transaction overlay.
    fn begin_overlay(&mut self);

    /// Publish the overlay to the shared table and drop it.
    async fn publish_overlay(&mut self) -> StoreResult<usize>;

    /// Drop the overlay without publishing.
    fn discard_overlay(&mut self);
}

#[async_trait]
impl<E: Entity> Session for Repository<E> {
    fn pending_count(&self) -> usize {
        self.pending_count()
    }

    async fn flush(&mut self) -> StoreResult<usize> {
        if self.staged.is_empty() {
            return Ok(0);
        }

        if self.overlay.is_some() {
            // Presence = committed keys adjusted by the overlay.
            let mut present: HashSet<E::Key> = self.table.read().await.keys().copied().collect();
            if let Some(overlay) = &self.overlay {
                for (key, row) in overlay {
                    if row.is_some() {
                        present.insert(*key);
                    } else {
                        present.remove(key);
                    }
                }
            }
            self.validate_staged(&mut present)?;

            let count = self.staged.len();
            if let Some(overlay) = &mut self.overlay {
                for op in self.staged.drain(..) {
                    match op {
                        StagedOp::Insert(entity) | StagedOp::Update(entity) => {
                            overlay.insert(entity.key(), Some(entity));
                        }
                        StagedOp::Delete(key) => {
                            overlay.insert(key, None);
                        }
                    }
                }
            }
            tracing::debug!(entity = E::NAME, count, "flushed staged operations to overlay");
            Ok(count)
        } else {
            let mut rows = self.table.write().await;
            let mut present: HashSet<E::Key> = rows.keys().copied().collect();
            self.validate_staged(&mut present)?;

            let count = self.staged.len();
            for op in self.staged.drain(..) {
                match op {
                    StagedOp::Insert(entity) | StagedOp::Update(entity) => {
                        rows.insert(entity.key(), entity);
                    }
                    StagedOp::Delete(key) => {
                        rows.remove(&key);
                    }
                }
            }
            tracing::debug!(entity = E::NAME, count, "flushed staged operations");
            Ok(count)
        }
    }

    fn begin_overlay(&mut self) {
        self.overlay = Some(HashMap::new());
    }

    async fn publish_overlay(&mut self) -> StoreResult<usize> {
        let Some(overlay) = self.overlay.take() else {
            return Ok(0);
        };
        let mut rows = self.table.write().await;
        let count = overlay.len();
        for (key, row) in overlay {
            match row {
                Some(entity) => {
                    rows.insert(key, entity);
                }
                None => {
                    rows.remove(&key);
                }
            }
        }
        Ok(count)
    }

    fn discard_overlay(&mut self) {
        self.overlay = None;
    }
}
