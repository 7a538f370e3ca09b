use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::branch::BranchId;
use crate::employee::{EmployeeCode, Passport};

/// Branch-local conflict identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConflictId(u64);

impl ConflictId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConflictId({})", self.0)
    }
}

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ambiguous cross-branch match, parked for human resolution.
///
/// Opened by the matcher when a secondary-key match lacks passport
/// agreement. `resolved` flips false to true exactly once, by an external
/// action; the flip never changes roster data, so the next cycle must
/// re-classify the records involved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub id: ConflictId,
    pub branch: BranchId,
    pub employee: EmployeeCode,
    pub description: String,
    /// Every passport implicated, source first. Order is not significant
    /// for identity; see [`ConflictRecord::involves`].
    pub passports: Vec<Passport>,
    pub detected_at: DateTime<Utc>,
    pub resolved: bool,
}

impl ConflictRecord {
    /// Whether this conflict covers exactly the given passport set,
    /// ignoring order and repetition.
    pub fn involves(&self, passports: &[Passport]) -> bool {
        let mine: BTreeSet<&Passport> = self.passports.iter().collect();
        let theirs: BTreeSet<&Passport> = passports.iter().collect();
        mine == theirs
    }
}
