use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::employee::{EmployeeCode, Passport};
use crate::position::PositionCode;

/// What a history entry records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryAction {
    /// A record was created, locally or by cross-branch copy.
    Hired,
    /// A record's status flipped to Fired.
    Fired,
    /// A record's position changed. Recorded by branch-local tooling,
    /// never produced by reconciliation.
    Promoted,
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hired => write!(f, "Hired"),
            Self::Fired => write!(f, "Fired"),
            Self::Promoted => write!(f, "Promoted"),
        }
    }
}

/// Immutable audit entry for one material change to an employee record.
///
/// Entries snapshot the mutable identity-bearing fields at the time of the
/// change. They are append-only: no update or delete exists anywhere in
/// the system's contracts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub employee: EmployeeCode,
    pub change_date: NaiveDate,
    pub surname: String,
    pub passport: Passport,
    pub position: PositionCode,
    pub action: HistoryAction,
}
