//! Persistence context abstractions and SQLite unit of work.
//!
//! # Responsibility
//! - Define the unit-of-work contract consumed by ownership-scoped
//!   repositories.
//! - Isolate SQLite statement details from repository orchestration.
//!
//! # Invariants
//! - Registered changes stay pending until an explicit `commit`.
//! - Storage identities exist only after `commit`; `register_insert`
//!   hands out provisional handles instead.

use crate::model::element::{ElementId, OwnedEntity};
use crate::repo::element_repo::RepoResult;

mod sqlite;

pub use sqlite::SqliteUnitOfWork;

/// Opaque handle for a registered insert.
///
/// The real `ElementId` is assigned by storage at commit time and can be
/// resolved through `CommitSummary::inserted` or `UnitOfWork::assigned_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProvisionalId(u64);

impl ProvisionalId {
    /// Wraps a raw registration sequence number.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw registration sequence number.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Outcome of one commit: applied change counts and assigned identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Storage identities assigned to registered inserts, in order.
    pub inserted: Vec<(ProvisionalId, ElementId)>,
    /// Number of applied updates.
    pub updated: usize,
    /// Number of applied deletions.
    pub deleted: usize,
}

/// Unit-of-work contract over one entity family.
///
/// Implementations own their storage handle exclusively; dropping the
/// unit of work releases it. Pending registrations are applied in
/// registration order inside a single transaction on `commit`.
pub trait UnitOfWork<E: OwnedEntity> {
    /// Registers a transient entity for insertion.
    fn register_insert(&mut self, entity: E) -> RepoResult<ProvisionalId>;
    /// Registers an existing entity for update.
    fn register_update(&mut self, entity: E) -> RepoResult<()>;
    /// Registers an existing entity for deletion.
    fn register_delete(&mut self, id: ElementId) -> RepoResult<()>;
    /// Looks one entity up by identity.
    ///
    /// Pending registrations take precedence over stored state: a pending
    /// deletion hides the row, a pending update supersedes it.
    fn find(&self, id: ElementId) -> RepoResult<Option<E>>;
    /// Applies all pending registrations in one transaction.
    fn commit(&mut self) -> RepoResult<CommitSummary>;
    /// Resolves a provisional handle to its committed identity, if any.
    fn assigned_id(&self, provisional: ProvisionalId) -> Option<ElementId>;
    /// Number of registrations waiting for the next commit.
    fn pending_count(&self) -> usize;
}
