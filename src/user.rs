//! Current-actor resolution for ownership checks.
//!
//! # Responsibility
//! - Resolve the identity of the user performing the current operation.
//!
//! # Invariants
//! - Resolution is infallible; authentication happens outside this crate
//!   and callers embed an already-resolved identity.

use crate::model::element::UserId;

/// Resolves the identity of the current actor.
///
/// Repositories consult this on every mutating operation, so ownership
/// checks follow the accessor when the embedding application switches the
/// active user.
pub trait CurrentUserAccessor {
    /// Returns the identity of the user performing the current operation.
    fn current_user_id(&self) -> UserId;
}

/// Accessor with a fixed identity, for embedding and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticUserAccessor {
    user_id: UserId,
}

impl StaticUserAccessor {
    /// Creates an accessor that always resolves to `user_id`.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

impl CurrentUserAccessor for StaticUserAccessor {
    fn current_user_id(&self) -> UserId {
        self.user_id
    }
}
