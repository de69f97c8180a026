//! File-system element domain model.
//!
//! # Responsibility
//! - Define the canonical record for files and folders.
//! - Provide the `OwnedEntity` capability bound used by ownership checks.
//!
//! # Invariants
//! - `id` stays `None` until storage assigns an identity at commit.
//! - `owner_id` is set once at `add` time and never reassigned by the
//!   repository layer afterwards.
//! - Folders never carry a size; file sizes are non-negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identity for a persisted element.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ElementId = i64;

/// Identity of the user owning an element.
pub type UserId = i64;

/// Discriminator for the element family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Regular file with a byte size.
    File,
    /// Container node; never carries a size.
    Folder,
}

/// Validation failures for element records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementValidationError {
    EmptyName,
    NameContainsSeparator { name: String },
    FolderWithSize { size_bytes: i64 },
    NegativeSize { size_bytes: i64 },
}

impl Display for ElementValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "element name must not be empty"),
            Self::NameContainsSeparator { name } => {
                write!(f, "element name `{name}` must not contain path separators")
            }
            Self::FolderWithSize { size_bytes } => {
                write!(f, "folder must not carry a size, got {size_bytes}")
            }
            Self::NegativeSize { size_bytes } => {
                write!(f, "file size must be >= 0, got {size_bytes}")
            }
        }
    }
}

impl Error for ElementValidationError {}

/// Capability contract for any member of the element family.
///
/// Repositories require this bound instead of a common base type: an
/// entity participates in ownership scoping by exposing its optional
/// storage identity and a gettable/settable owner field.
pub trait OwnedEntity {
    /// Storage identity, absent until the persistence context commits.
    fn id(&self) -> Option<ElementId>;
    /// Identity of the owning user.
    fn owner_id(&self) -> UserId;
    /// Overwrites the owner. Called exactly once, at `add` time.
    fn assign_owner(&mut self, owner: UserId);
    /// Record-level invariants enforced before persistence.
    fn validate(&self) -> Result<(), ElementValidationError> {
        Ok(())
    }
}

/// Canonical metadata record for file-system nodes.
///
/// One storage shape supports both file and folder projections; fields
/// meaningful for only one projection are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Storage-assigned identity; `None` for transient records.
    pub id: Option<ElementId>,
    /// Owning user. Overwritten with the current actor on `add`.
    pub owner_id: UserId,
    /// Projection discriminator, serialized as `kind`.
    pub kind: ElementKind,
    /// Node name within its parent, without path separators.
    pub name: String,
    /// Parent folder identity; `None` for root-level nodes.
    pub parent_id: Option<ElementId>,
    /// Byte size. Meaningful only when `kind == ElementKind::File`.
    pub size_bytes: Option<i64>,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Update timestamp in epoch milliseconds.
    pub updated_at: i64,
}

impl Element {
    /// Creates a transient file record with no owner assigned yet.
    ///
    /// The repository overwrites `owner_id` at `add` time, so callers
    /// do not pick an owner here.
    pub fn file(name: impl Into<String>, size_bytes: i64) -> Self {
        let now = epoch_millis_now();
        Self {
            id: None,
            owner_id: 0,
            kind: ElementKind::File,
            name: name.into(),
            parent_id: None,
            size_bytes: Some(size_bytes),
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a transient folder record with no owner assigned yet.
    pub fn folder(name: impl Into<String>) -> Self {
        let now = epoch_millis_now();
        Self {
            id: None,
            owner_id: 0,
            kind: ElementKind::Folder,
            name: name.into(),
            parent_id: None,
            size_bytes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy placed under the given parent folder.
    pub fn under(mut self, parent_id: ElementId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Validates record-level invariants before persistence.
    ///
    /// # Errors
    /// - `EmptyName` when the trimmed name is empty.
    /// - `NameContainsSeparator` when the name contains `/` or `\`.
    /// - `FolderWithSize` when a folder carries a size.
    /// - `NegativeSize` when a file size is below zero.
    pub fn validate(&self) -> Result<(), ElementValidationError> {
        if self.name.trim().is_empty() {
            return Err(ElementValidationError::EmptyName);
        }
        if self.name.contains('/') || self.name.contains('\\') {
            return Err(ElementValidationError::NameContainsSeparator {
                name: self.name.clone(),
            });
        }
        match (self.kind, self.size_bytes) {
            (ElementKind::Folder, Some(size_bytes)) => {
                Err(ElementValidationError::FolderWithSize { size_bytes })
            }
            (ElementKind::File, Some(size_bytes)) if size_bytes < 0 => {
                Err(ElementValidationError::NegativeSize { size_bytes })
            }
            _ => Ok(()),
        }
    }

    /// Returns whether storage has assigned an identity yet.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl OwnedEntity for Element {
    fn id(&self) -> Option<ElementId> {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn assign_owner(&mut self, owner: UserId) {
        self.owner_id = owner;
    }

    fn validate(&self) -> Result<(), ElementValidationError> {
        Element::validate(self)
    }
}

fn epoch_millis_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
