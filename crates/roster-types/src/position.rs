use std::fmt;

use serde::{Deserialize, Serialize};

use crate::branch::BranchId;

/// Branch-local position identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionCode(u32);

impl PositionCode {
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for PositionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PositionCode({})", self.0)
    }
}

impl fmt::Display for PositionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference data describing one position in one branch.
///
/// Read-only for the reconciliation engine; positions are maintained
/// locally by each branch and never propagated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub branch: BranchId,
    pub code: PositionCode,
    pub name: String,
    pub parent: Option<PositionCode>,
}
