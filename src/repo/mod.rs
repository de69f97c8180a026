//! Ownership-scoped repository layer.
//!
//! # Responsibility
//! - Mediate all create/update/delete access to the element family.
//! - Guarantee that callers only mutate or delete entities they own.
//!
//! # Invariants
//! - A rejected operation registers nothing with the persistence context.
//! - The persistence context is released exactly once.

pub mod element_repo;
