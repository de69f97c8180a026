//! Element use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for file/folder metadata use-cases.
//! - Delegate persistence to the ownership-scoped repository.
//!
//! # Invariants
//! - Service APIs never bypass repository ownership checks.
//! - The service layer remains storage-agnostic.

use crate::model::element::{Element, ElementId};
use crate::repo::element_repo::{OwnedRepository, RepoError, RepoResult};
use crate::uow::{CommitSummary, ProvisionalId, UnitOfWork};
use crate::user::CurrentUserAccessor;

/// Use-case wrapper around the ownership-scoped element repository.
pub struct ElementService<C, A>
where
    C: UnitOfWork<Element>,
    A: CurrentUserAccessor,
{
    repo: OwnedRepository<Element, C, A>,
}

impl<C, A> ElementService<C, A>
where
    C: UnitOfWork<Element>,
    A: CurrentUserAccessor,
{
    /// Creates a service using the provided repository.
    pub fn new(repo: OwnedRepository<Element, C, A>) -> Self {
        Self { repo }
    }

    /// Registers a new file under the current actor.
    ///
    /// # Contract
    /// - The owner is assigned by the repository, not by the caller.
    /// - Returns a provisional handle; the storage identity is available
    ///   from the `save` summary.
    pub fn create_file(
        &mut self,
        name: impl Into<String>,
        size_bytes: i64,
        parent_id: Option<ElementId>,
    ) -> RepoResult<ProvisionalId> {
        let mut element = Element::file(name, size_bytes);
        element.parent_id = parent_id;
        self.repo.add(element)
    }

    /// Registers a new folder under the current actor.
    pub fn create_folder(
        &mut self,
        name: impl Into<String>,
        parent_id: Option<ElementId>,
    ) -> RepoResult<ProvisionalId> {
        let mut element = Element::folder(name);
        element.parent_id = parent_id;
        self.repo.add(element)
    }

    /// Renames an existing element.
    ///
    /// Returns repository-level not-found or ownership errors unchanged.
    pub fn rename(&mut self, id: ElementId, name: impl Into<String>) -> RepoResult<()> {
        let mut element = self.repo.find(id)?.ok_or(RepoError::NotFound(id))?;
        element.name = name.into();
        self.repo.update(element)
    }

    /// Moves an existing element under a new parent (or to the root).
    pub fn move_to(&mut self, id: ElementId, parent_id: Option<ElementId>) -> RepoResult<()> {
        let mut element = self.repo.find(id)?.ok_or(RepoError::NotFound(id))?;
        element.parent_id = parent_id;
        self.repo.update(element)
    }

    /// Registers an owned element for deletion.
    pub fn remove(&mut self, element: Element) -> RepoResult<()> {
        self.repo.remove(element)
    }

    /// Looks an element up by identity and registers it for deletion.
    pub fn remove_by_id(&mut self, id: ElementId) -> RepoResult<()> {
        self.repo.remove_by_id(id)
    }

    /// Gets one element by identity.
    pub fn get(&mut self, id: ElementId) -> RepoResult<Option<Element>> {
        self.repo.find(id)
    }

    /// Commits all pending registrations.
    pub fn save(&mut self) -> RepoResult<CommitSummary> {
        self.repo.save()
    }

    /// Resolves a provisional handle to its committed identity, if any.
    pub fn assigned_id(&self, provisional: ProvisionalId) -> RepoResult<Option<ElementId>> {
        self.repo.assigned_id(provisional)
    }

    /// Releases the underlying persistence context. Idempotent.
    pub fn release(&mut self) {
        self.repo.release();
    }
}
