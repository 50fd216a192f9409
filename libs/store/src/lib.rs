//! # Bakery Store
//!
//! In-memory persistence layer with staged writes and transactional overlays.
//!
//! The crate is organized around three pieces:
//!
//! - **[`Table`]**: shared, committed storage for one entity type
//! - **[`Repository`]**: a per-request view over a table that stages
//!   inserts, updates and deletes until they are flushed
//! - **[`UnitOfWork`]**: coordinates flushing across several repositories
//!   and provides an explicit transaction state machine
//!
//! Reads through a repository always see that repository's own staged
//! writes layered over committed data. Nothing reaches the shared table
//! until `save_changes` runs, and inside a transaction nothing reaches it
//! until the transaction commits.

pub mod entity;
pub mod error;
pub mod memory;
pub mod page;
pub mod repository;
pub mod unit_of_work;

pub use entity::{Entity, SoftDeletable};
pub use error::{ErrorKind, StoreError, StoreResult};
pub use memory::Table;
pub use page::{Page, PagedList, paginate};
pub use repository::{Repository, Session};
pub use unit_of_work::{Registry, TransactionState, UnitOfWork};
