//! Branch store boundary for the roster reconciliation engine.
//!
//! Each branch owns its roster outright; the engine only ever touches a
//! branch through the [`BranchStore`] trait. This crate provides the trait,
//! its error taxonomy, an in-memory adapter, and roster integrity checking.
//!
//! # Design Rules
//!
//! 1. Lookups return `Ok(None)` or an empty list for missing data; `Err`
//!    is reserved for store failures.
//! 2. At most one Active record per passport within a branch. Inserting a
//!    second is rejected with [`StoreError::UniquenessViolation`].
//! 3. Employee codes are allocated `max + 1` and never reused, even after
//!    dismissal.
//! 4. History is append-only. No update or delete exists in the contract.
//! 5. Conflicts are never deleted; `resolved` flips false to true once.

pub mod check;
pub mod error;
pub mod memory;
pub mod traits;

pub use check::{check_branch, IntegrityReport, Violation, ViolationKind};
pub use error::{StoreError, StoreResult};
pub use memory::{BranchSnapshot, MemoryBranch};
pub use traits::{BranchStore, Resolution};
