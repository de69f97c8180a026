//! Ownership-scoped metadata store for multi-tenant file-system elements.
//!
//! Every mutating operation is checked against the current actor's
//! identity before it reaches the persistence context; this crate is the
//! single source of truth for that ownership invariant.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod uow;
pub mod user;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::element::{
    Element, ElementId, ElementKind, ElementValidationError, OwnedEntity, UserId,
};
pub use repo::element_repo::{OwnedRepository, RepoError, RepoResult};
pub use service::element_service::ElementService;
pub use uow::{CommitSummary, ProvisionalId, SqliteUnitOfWork, UnitOfWork};
pub use user::{CurrentUserAccessor, StaticUserAccessor};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
