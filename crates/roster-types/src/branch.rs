use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier of one independently operated branch.
///
/// The two branches do not share a primary-key space; every record identity
/// in the system is scoped by a `BranchId`. Cross-branch "same person" is a
/// derived relationship (by passport), never a stored foreign key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BranchId(u32);

impl BranchId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw numeric id.
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BranchId({})", self.0)
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "branch-{}", self.0)
    }
}

impl FromStr for BranchId {
    type Err = TypeError;

    /// Parse `"branch-2"` or a bare number `"2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("branch-").unwrap_or(s);
        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|_| TypeError::InvalidBranchId(s.to_string()))
    }
}
