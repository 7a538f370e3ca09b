use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use roster_types::{BranchId, EmployeeCode, Passport, PositionCode};

use crate::error::StoreResult;
use crate::traits::BranchStore;

/// Result of checking one branch's roster invariants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub branch: BranchId,
    pub employees_checked: usize,
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    /// Returns `true` if no violations were found.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific invariant violation found in a branch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    /// More than one Active record holds the same passport.
    DuplicateActivePassport,
    /// An employee references a position code the branch does not hold.
    UnknownPosition,
    /// A history entry references an employee code the branch does not hold.
    OrphanHistory,
}

/// Check one branch's roster invariants.
///
/// The checks mirror what the snapshot format trusts on load: uniqueness of
/// Active passports, position references, and history attribution.
pub fn check_branch(store: &dyn BranchStore) -> StoreResult<IntegrityReport> {
    let mut employees = store.active_employees()?;
    employees.extend(store.fired_employees()?);
    let positions: BTreeSet<PositionCode> =
        store.positions()?.into_iter().map(|p| p.code).collect();

    let mut violations = Vec::new();

    let mut by_passport: BTreeMap<&Passport, Vec<EmployeeCode>> = BTreeMap::new();
    for record in employees.iter().filter(|e| e.status.is_active()) {
        by_passport.entry(&record.passport).or_default().push(record.code);
    }
    for (passport, codes) in by_passport {
        if codes.len() > 1 {
            let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
            violations.push(Violation {
                kind: ViolationKind::DuplicateActivePassport,
                description: format!(
                    "passport {passport} is Active on employees {}",
                    codes.join(", ")
                ),
            });
        }
    }

    for record in &employees {
        if !positions.contains(&record.position) {
            violations.push(Violation {
                kind: ViolationKind::UnknownPosition,
                description: format!(
                    "employee {} references unknown position {}",
                    record.code, record.position
                ),
            });
        }
    }

    let codes: BTreeSet<EmployeeCode> = employees.iter().map(|e| e.code).collect();
    for entry in store.history()? {
        if !codes.contains(&entry.employee) {
            violations.push(Violation {
                kind: ViolationKind::OrphanHistory,
                description: format!(
                    "history entry ({}, {}) references unknown employee {}",
                    entry.change_date, entry.action, entry.employee
                ),
            });
        }
    }

    Ok(IntegrityReport {
        branch: store.branch_id(),
        employees_checked: employees.len(),
        violations,
    })
}
