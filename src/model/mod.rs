//! Domain model for multi-tenant file-system metadata.
//!
//! # Responsibility
//! - Define the canonical element record shared by file/folder projections.
//! - Express the ownership capability contract required by repositories.
//!
//! # Invariants
//! - Every persisted element has exactly one owner, set at creation time.
//! - Storage identity is absent until the persistence context commits.

pub mod element;
