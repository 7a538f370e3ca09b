//! Cross-branch record matching for the roster reconciliation engine.
//!
//! Given a candidate record from one branch, the [`Matcher`] decides how it
//! relates to the opposite branch: already present, new, or ambiguous. The
//! passport is the trusted identity key; the secondary key (full name plus
//! birth date) is only ever strong enough to raise a conflict, never to
//! merge automatically.

pub mod matcher;
pub mod verdict;

pub use matcher::Matcher;
pub use verdict::{ConflictCandidate, ConflictEvidence, Verdict};
