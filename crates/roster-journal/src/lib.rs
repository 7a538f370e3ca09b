//! Conflict journal for the reconciliation engine.
//!
//! When the matcher finds a secondary-identity overlap it must not
//! guess. The journal parks the ambiguity as a [`roster_types::ConflictRecord`]
//! in the source branch and guarantees that the same overlap, keyed by
//! its unordered set of passports, is journaled at most once across
//! both branches while it remains unresolved.

mod journal;

pub use journal::{ConflictJournal, OpenOutcome};
