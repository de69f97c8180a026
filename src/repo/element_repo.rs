//! Ownership-scoped repository over a persistence context.
//!
//! # Responsibility
//! - Enforce per-user ownership on every mutating operation.
//! - Delegate registration and commit to the unit of work.
//!
//! # Invariants
//! - `add` unconditionally assigns the current actor as owner.
//! - `update`/`remove` reject entities owned by another user before any
//!   registration happens.
//! - Lookups that come back empty surface `NotFound`, never a blind
//!   dereference.

use crate::db::DbError;
use crate::model::element::{ElementId, ElementValidationError, OwnedEntity, UserId};
use crate::uow::{CommitSummary, ProvisionalId, UnitOfWork};
use crate::user::CurrentUserAccessor;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for element persistence and ownership checks.
#[derive(Debug)]
pub enum RepoError {
    /// The current actor does not own the entity it tried to mutate.
    NotOwner {
        id: Option<ElementId>,
        owner: UserId,
        actor: UserId,
    },
    /// No entity with this identity exists in the persistence context.
    NotFound(ElementId),
    /// The entity has no storage identity yet; commit assigns one.
    NoIdentity,
    Validation(ElementValidationError),
    Db(DbError),
    /// Persisted state violates model invariants.
    InvalidData(String),
    /// The connection has not been migrated to this binary's schema.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// The repository released its persistence context already.
    Released,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOwner { id, owner, actor } => match id {
                Some(id) => write!(
                    f,
                    "element {id} does not belong to current user (owner {owner}, actor {actor})"
                ),
                None => write!(
                    f,
                    "element does not belong to current user (owner {owner}, actor {actor})"
                ),
            },
            Self::NotFound(id) => write!(f, "element not found: {id}"),
            Self::NoIdentity => {
                write!(f, "element has no storage identity; commit pending inserts first")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted element data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{column}` in table `{table}`")
            }
            Self::Released => write!(f, "repository already released its persistence context"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ElementValidationError> for RepoError {
    fn from(value: ElementValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository scoping every mutation to the current actor's elements.
///
/// Owns its persistence context exclusively. `release` drops the context
/// exactly once and is idempotent; dropping the repository releases on
/// all remaining exit paths.
pub struct OwnedRepository<E, C, A>
where
    E: OwnedEntity,
    C: UnitOfWork<E>,
    A: CurrentUserAccessor,
{
    context: Option<C>,
    accessor: A,
    _entity: PhantomData<E>,
}

impl<E, C, A> OwnedRepository<E, C, A>
where
    E: OwnedEntity,
    C: UnitOfWork<E>,
    A: CurrentUserAccessor,
{
    /// Creates a repository taking exclusive ownership of the context.
    pub fn new(context: C, accessor: A) -> Self {
        Self {
            context: Some(context),
            accessor,
            _entity: PhantomData,
        }
    }

    /// Registers a transient entity for insertion under the current actor.
    ///
    /// The owner field is overwritten unconditionally; the entity is new,
    /// so there is nothing to check against. The returned handle resolves
    /// to a storage identity only after `save`.
    pub fn add(&mut self, mut entity: E) -> RepoResult<ProvisionalId> {
        let actor = self.accessor.current_user_id();
        entity.assign_owner(actor);
        entity.validate()?;
        let provisional = self.context_mut()?.register_insert(entity)?;
        debug!(
            "event=element_add module=repo status=ok actor={actor} provisional={}",
            provisional.raw()
        );
        Ok(provisional)
    }

    /// Registers an owned entity for update.
    ///
    /// # Errors
    /// - `NotOwner` when the entity belongs to another user.
    /// - `NoIdentity` when the entity was never committed.
    pub fn update(&mut self, entity: E) -> RepoResult<()> {
        self.ensure_owned(&entity, "update")?;
        if entity.id().is_none() {
            return Err(RepoError::NoIdentity);
        }
        entity.validate()?;
        self.context_mut()?.register_update(entity)
    }

    /// Registers an owned entity for deletion.
    ///
    /// Same ownership precondition and failure behavior as `update`.
    pub fn remove(&mut self, entity: E) -> RepoResult<()> {
        self.ensure_owned(&entity, "remove")?;
        let id = entity.id().ok_or(RepoError::NoIdentity)?;
        self.context_mut()?.register_delete(id)
    }

    /// Looks an entity up by identity and registers it for deletion.
    ///
    /// # Errors
    /// - `NotFound` when no entity carries this identity.
    /// - `NotOwner` when the entity belongs to another user.
    pub fn remove_by_id(&mut self, id: ElementId) -> RepoResult<()> {
        let entity = self
            .context_ref()?
            .find(id)?
            .ok_or(RepoError::NotFound(id))?;
        self.ensure_owned(&entity, "remove_by_id")?;
        self.context_mut()?.register_delete(id)
    }

    /// Looks one entity up by identity.
    ///
    /// Reads are not ownership-scoped; only mutations are.
    pub fn find(&self, id: ElementId) -> RepoResult<Option<E>> {
        self.context_ref()?.find(id)
    }

    /// Commits all pending registrations through the persistence context.
    pub fn save(&mut self) -> RepoResult<CommitSummary> {
        let summary = self.context_mut()?.commit()?;
        info!(
            "event=element_save module=repo status=ok inserted={} updated={} deleted={}",
            summary.inserted.len(),
            summary.updated,
            summary.deleted
        );
        Ok(summary)
    }

    /// Resolves a provisional handle to its committed identity, if any.
    pub fn assigned_id(&self, provisional: ProvisionalId) -> RepoResult<Option<ElementId>> {
        Ok(self.context_ref()?.assigned_id(provisional))
    }

    /// Number of registrations waiting for the next `save`.
    pub fn pending_count(&self) -> RepoResult<usize> {
        Ok(self.context_ref()?.pending_count())
    }

    /// Releases the persistence context.
    ///
    /// Idempotent: the context is dropped on the first call and later
    /// calls are no-ops. Dropping the repository releases implicitly.
    pub fn release(&mut self) {
        if self.context.take().is_some() {
            debug!("event=context_released module=repo status=ok");
        }
    }

    /// Returns whether the persistence context has been released.
    pub fn is_released(&self) -> bool {
        self.context.is_none()
    }

    fn ensure_owned(&self, entity: &E, operation: &str) -> RepoResult<()> {
        let actor = self.accessor.current_user_id();
        let owner = entity.owner_id();
        if owner != actor {
            warn!(
                "event=ownership_denied module=repo operation={operation} owner={owner} actor={actor} id={:?}",
                entity.id()
            );
            return Err(RepoError::NotOwner {
                id: entity.id(),
                owner,
                actor,
            });
        }
        Ok(())
    }

    fn context_ref(&self) -> RepoResult<&C> {
        self.context.as_ref().ok_or(RepoError::Released)
    }

    fn context_mut(&mut self) -> RepoResult<&mut C> {
        self.context.as_mut().ok_or(RepoError::Released)
    }
}
