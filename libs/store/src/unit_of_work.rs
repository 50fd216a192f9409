//! Unit of work over a set of repositories.
//!
//! A [`UnitOfWork`] owns a [`Registry`] of repositories and coordinates
//! their staged writes: `save_changes` flushes every repository, and the
//! explicit transaction API (`begin` / `commit` / `rollback`) wraps those
//! flushes in overlays so a group of writes either all reach the shared
//! tables or none do.
//!
//! The transaction state machine has two states. A finished transaction
//! (committed or rolled back) immediately returns to `NoTransaction`;
//! beginning while one is active or finishing without one are errors, not
//! panics. Dropping a unit of work with an open transaction discards the
//! overlays, which is equivalent to a rollback.

use crate::error::{StoreError, StoreResult};
use crate::repository::Session;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    NoTransaction,
    Active,
}

/// A fixed set of repositories participating in one unit of work.
///
/// Implementations are plain structs with one field per repository; the
/// two methods hand them out type-erased so the unit of work can walk
/// them without knowing the entity types.
pub trait Registry: Send {
    fn sessions(&mut self) -> Vec<&mut dyn Session>;
    fn sessions_ref(&self) -> Vec<&dyn Session>;
}

pub struct UnitOfWork<R: Registry> {
    registry: R,
    state: TransactionState,
}

impl<R: Registry> UnitOfWork<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            state: TransactionState::NoTransaction,
        }
    }

    /// Access the typed repositories.
    pub fn repositories(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn transaction_state(&self) -> TransactionState {
        self.state
    }

    /// Whether any repository has staged, unflushed operations.
    pub fn has_pending_changes(&self) -> bool {
        self.pending_changes_count() > 0
    }

    /// Total staged, unflushed operations across all repositories.
    pub fn pending_changes_count(&self) -> usize {
        self.registry
            .sessions_ref()
            .iter()
            .map(|s| s.pending_count())
            .sum()
    }

    /// Open a transaction. Fails if one is already active.
    pub fn begin_transaction(&mut self) -> StoreResult<()> {
        if self.state == TransactionState::Active {
            warn!("begin_transaction called while a transaction is active");
            return Err(StoreError::TransactionInProgress);
        }
        for session in self.registry.sessions() {
            session.begin_overlay();
        }
        self.state = TransactionState::Active;
        debug!("transaction started");
        Ok(())
    }

    /// Publish all overlays to the shared tables. Fails if no
    /// transaction is active; a publish failure rolls the rest back.
    pub async fn commit_transaction(&mut self) -> StoreResult<()> {
        if self.state != TransactionState::Active {
            warn!("commit_transaction called without an active transaction");
            return Err(StoreError::NoActiveTransaction);
        }
        // The transaction is finished whichever way publishing goes.
        self.state = TransactionState::NoTransaction;

        let mut outcome = Ok(());
        for session in self.registry.sessions() {
            if let Err(e) = session.publish_overlay().await {
                outcome = Err(e);
                break;
            }
        }
        if outcome.is_err() {
            for session in self.registry.sessions() {
                session.discard_overlay();
            }
            warn!("commit failed, remaining overlays discarded");
        } else {
            debug!("transaction committed");
        }
        outcome
    }

    /// Discard all overlays. Fails if no transaction is active.
    pub fn rollback_transaction(&mut self) -> StoreResult<()> {
        if self.state != TransactionState::Active {
            warn!("rollback_transaction called without an active transaction");
            return Err(StoreError::NoActiveTransaction);
        }
        self.state = TransactionState::NoTransaction;
        for session in self.registry.sessions() {
            session.discard_overlay();
        }
        debug!("transaction rolled back");
        Ok(())
    }

    /// Flush every repository's staged operations, returning the total
    /// number of applied operations. Outside a transaction the writes go
    /// straight to the shared tables; inside one they land in the
    /// overlays until commit.
    pub async fn save_changes(&mut self) -> StoreResult<usize> {
        let mut affected = 0;
        for session in self.registry.sessions() {
            affected += session.flush().await?;
        }
        debug!(affected, "save_changes applied staged operations");
        Ok(affected)
    }

    /// Begin, save and commit in one step, rolling back on failure.
    pub async fn save_changes_with_transaction(&mut self) -> StoreResult<usize> {
        self.begin_transaction()?;
        let saved = match self.save_changes().await {
            Ok(saved) => saved,
            Err(e) => {
                // Best effort: the overlays go away either way.
                if self.rollback_transaction().is_err() {
                    warn!("rollback after failed save did not find an active transaction");
                }
                return Err(e);
            }
        };
        self.commit_transaction().await?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Table;
    use crate::repository::Repository;
    use crate::testing::Pastry;

    struct PastryRegistry {
        pastries: Repository<Pastry>,
    }

    impl Registry for PastryRegistry {
        fn sessions(&mut self) -> Vec<&mut dyn Session> {
            vec![&mut self.pastries]
        }

        fn sessions_ref(&self) -> Vec<&dyn Session> {
            vec![&self.pastries]
        }
    }

    fn unit_of_work() -> (Table<Pastry>, UnitOfWork<PastryRegistry>) {
        let table = Table::new();
        let uow = UnitOfWork::new(PastryRegistry {
            pastries: Repository::new(table.clone()),
        });
        (table, uow)
    }

    #[tokio::test]
    async fn test_begin_twice_fails() {
        let (_table, mut uow) = unit_of_work();
        uow.begin_transaction().unwrap();
        let err = uow.begin_transaction().unwrap_err();
        assert_eq!(err, StoreError::TransactionInProgress);
        assert_eq!(uow.transaction_state(), TransactionState::Active);
    }

    #[tokio::test]
    async fn test_commit_without_transaction_fails() {
        let (_table, mut uow) = unit_of_work();
        let err = uow.commit_transaction().await.unwrap_err();
        assert_eq!(err, StoreError::NoActiveTransaction);
    }

    #[tokio::test]
    async fn test_rollback_without_transaction_fails() {
        let (_table, mut uow) = unit_of_work();
        let err = uow.rollback_transaction().unwrap_err();
        assert_eq!(err, StoreError::NoActiveTransaction);
    }

    #[tokio::test]
    async fn test_save_inside_transaction_hidden_until_commit() {
        let (table, mut uow) = unit_of_work();
        let pastry = Pastry::new("croissant", 350);
        let id = pastry.id;

        uow.begin_transaction().unwrap();
        uow.repositories().pastries.add(pastry).await.unwrap();
        let saved = uow.save_changes().await.unwrap();
        assert_eq!(saved, 1);

        assert!(table.get(id).await.is_none());

        uow.commit_transaction().await.unwrap();
        assert!(table.get(id).await.is_some());
        assert_eq!(uow.transaction_state(), TransactionState::NoTransaction);
    }

    #[tokio::test]
    async fn test_rollback_discards_saved_changes() {
        let (table, mut uow) = unit_of_work();
        let pastry = Pastry::new("croissant", 350);
        let id = pastry.id;

        uow.begin_transaction().unwrap();
        uow.repositories().pastries.add(pastry).await.unwrap();
        uow.save_changes().await.unwrap();
        uow.rollback_transaction().unwrap();

        assert!(table.get(id).await.is_none());
        assert_eq!(uow.transaction_state(), TransactionState::NoTransaction);
    }

    #[tokio::test]
    async fn test_save_changes_without_transaction_writes_directly() {
        let (table, mut uow) = unit_of_work();
        let pastry = Pastry::new("croissant", 350);
        let id = pastry.id;

        uow.repositories().pastries.add(pastry).await.unwrap();
        let saved = uow.save_changes().await.unwrap();

        assert_eq!(saved, 1);
        assert!(table.get(id).await.is_some());
    }

    #[tokio::test]
    async fn test_save_changes_with_transaction_happy_path() {
        let (table, mut uow) = unit_of_work();
        uow.repositories()
            .pastries
            .add(Pastry::new("croissant", 350))
            .await
            .unwrap();
        uow.repositories()
            .pastries
            .add(Pastry::new("eclair", 450))
            .await
            .unwrap();

        let saved = uow.save_changes_with_transaction().await.unwrap();
        assert_eq!(saved, 2);
        assert_eq!(table.len().await, 2);
        assert_eq!(uow.transaction_state(), TransactionState::NoTransaction);
    }

    #[tokio::test]
    async fn test_save_changes_with_transaction_rolls_back_on_failure() {
        let (table, mut uow) = unit_of_work();
        uow.repositories()
            .pastries
            .add(Pastry::new("croissant", 350))
            .await
            .unwrap();
        // Update of a missing entity makes the flush fail.
        uow.repositories().pastries.update(Pastry::new("ghost", 1));

        let err = uow.save_changes_with_transaction().await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
        assert!(table.is_empty().await);
        assert_eq!(uow.transaction_state(), TransactionState::NoTransaction);
        // The failed batch stays staged.
        assert!(uow.has_pending_changes());
    }

    #[tokio::test]
    async fn test_pending_changes_count() {
        let (_table, mut uow) = unit_of_work();
        assert!(!uow.has_pending_changes());

        uow.repositories()
            .pastries
            .add(Pastry::new("croissant", 350))
            .await
            .unwrap();
        uow.repositories()
            .pastries
            .add(Pastry::new("eclair", 450))
            .await
            .unwrap();
        assert_eq!(uow.pending_changes_count(), 2);

        uow.save_changes().await.unwrap();
        assert_eq!(uow.pending_changes_count(), 0);
    }

    #[tokio::test]
    async fn test_transaction_reusable_after_commit() {
        let (_table, mut uow) = unit_of_work();
        uow.begin_transaction().unwrap();
        uow.commit_transaction().await.unwrap();
        // Finished transactions return to NoTransaction, so a new one can start.
        uow.begin_transaction().unwrap();
        uow.rollback_transaction().unwrap();
    }
}
