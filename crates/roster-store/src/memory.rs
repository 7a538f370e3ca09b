use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use roster_types::{
    BranchId, ConflictId, ConflictRecord, EmployeeCode, EmployeeRecord, EmployeeStatus,
    HistoryEntry, NewEmployee, Passport, PositionCode, PositionRecord, SecondaryKey,
};

use crate::error::{StoreError, StoreResult};
use crate::traits::{BranchStore, Resolution};

/// In-memory branch adapter for tests, demos, and snapshot-backed use.
///
/// All state is held behind a `RwLock`. Records are cloned on read; the
/// engine never holds references into the store.
pub struct MemoryBranch {
    branch: BranchId,
    inner: RwLock<BranchState>,
}

struct BranchState {
    employees: BTreeMap<EmployeeCode, EmployeeRecord>,
    positions: BTreeMap<PositionCode, PositionRecord>,
    history: Vec<HistoryEntry>,
    conflicts: BTreeMap<ConflictId, ConflictRecord>,
    next_conflict: ConflictId,
}

impl Default for BranchState {
    fn default() -> Self {
        Self {
            employees: BTreeMap::new(),
            positions: BTreeMap::new(),
            history: Vec::new(),
            conflicts: BTreeMap::new(),
            next_conflict: ConflictId::new(1),
        }
    }
}

/// Serializable image of one branch's full state.
///
/// The snapshot is trusted on restore; invariants are checked by
/// [`crate::check::check_branch`], not on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BranchSnapshot {
    pub branch: BranchId,
    pub employees: Vec<EmployeeRecord>,
    pub positions: Vec<PositionRecord>,
    pub history: Vec<HistoryEntry>,
    pub conflicts: Vec<ConflictRecord>,
}

impl MemoryBranch {
    /// Create a new empty branch store.
    pub fn new(branch: BranchId) -> Self {
        Self {
            branch,
            inner: RwLock::new(BranchState::default()),
        }
    }

    /// Restore a branch from a snapshot.
    ///
    /// Conflict id allocation continues after the highest id present.
    pub fn from_snapshot(snapshot: BranchSnapshot) -> Self {
        let next_conflict = snapshot
            .conflicts
            .iter()
            .map(|c| c.id)
            .max()
            .map(|id| id.next())
            .unwrap_or(ConflictId::new(1));
        let state = BranchState {
            employees: snapshot
                .employees
                .into_iter()
                .map(|e| (e.code, e))
                .collect(),
            positions: snapshot
                .positions
                .into_iter()
                .map(|p| (p.code, p))
                .collect(),
            history: snapshot.history,
            conflicts: snapshot.conflicts.into_iter().map(|c| (c.id, c)).collect(),
            next_conflict,
        };
        Self {
            branch: snapshot.branch,
            inner: RwLock::new(state),
        }
    }

    /// Export the full branch state.
    pub fn snapshot(&self) -> BranchSnapshot {
        let state = self.inner.read().expect("lock poisoned");
        BranchSnapshot {
            branch: self.branch,
            employees: state.employees.values().cloned().collect(),
            positions: state.positions.values().cloned().collect(),
            history: state.history.clone(),
            conflicts: state.conflicts.values().cloned().collect(),
        }
    }

    /// Add or replace position reference data.
    ///
    /// Positions are branch-local; the reconciliation engine never writes
    /// them, so this is not part of [`BranchStore`].
    pub fn insert_position(&self, position: PositionRecord) {
        let mut state = self.inner.write().expect("lock poisoned");
        state.positions.insert(position.code, position);
    }

    /// Number of employee records in any status.
    pub fn employee_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").employees.len()
    }
}

impl BranchStore for MemoryBranch {
    fn branch_id(&self) -> BranchId {
        self.branch
    }

    fn find_by_passport(&self, passport: &Passport) -> StoreResult<Option<EmployeeRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        let mut latest: Option<&EmployeeRecord> = None;
        for record in state.employees.values() {
            if record.passport == *passport {
                if record.status.is_active() {
                    return Ok(Some(record.clone()));
                }
                // Ascending code order, so the last hit is the most recent hire.
                latest = Some(record);
            }
        }
        Ok(latest.cloned())
    }

    fn find_by_secondary_key(&self, key: &SecondaryKey) -> StoreResult<Vec<EmployeeRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .employees
            .values()
            .filter(|record| record.secondary_key() == *key)
            .cloned()
            .collect())
    }

    fn insert_employee(&self, employee: &NewEmployee) -> StoreResult<EmployeeCode> {
        let mut state = self.inner.write().expect("lock poisoned");
        if employee.status.is_active() {
            let duplicate = state
                .employees
                .values()
                .any(|existing| existing.status.is_active() && existing.passport == employee.passport);
            if duplicate {
                return Err(StoreError::UniquenessViolation {
                    branch: self.branch,
                    passport: employee.passport.clone(),
                });
            }
        }
        let code = state
            .employees
            .keys()
            .next_back()
            .map(EmployeeCode::next)
            .unwrap_or(EmployeeCode::new(1));
        let record = EmployeeRecord {
            branch: self.branch,
            code,
            name: employee.name.clone(),
            surname: employee.surname.clone(),
            patronymic: employee.patronymic.clone(),
            birth_date: employee.birth_date,
            passport: employee.passport.clone(),
            position: employee.position,
            status: employee.status,
        };
        state.employees.insert(code, record);
        debug!(branch = %self.branch, code = %code, passport = %employee.passport, "employee inserted");
        Ok(code)
    }

    fn update_status(&self, code: EmployeeCode, status: EmployeeStatus) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        let record = state
            .employees
            .get_mut(&code)
            .ok_or(StoreError::EmployeeNotFound {
                branch: self.branch,
                code,
            })?;
        record.status = status;
        debug!(branch = %self.branch, code = %code, status = %status, "status updated");
        Ok(())
    }

    fn append_history(&self, entry: &HistoryEntry) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        state.history.push(entry.clone());
        Ok(())
    }

    fn open_conflict(
        &self,
        employee: EmployeeCode,
        description: &str,
        passports: &[Passport],
    ) -> StoreResult<ConflictId> {
        let mut state = self.inner.write().expect("lock poisoned");
        let id = state.next_conflict;
        state.next_conflict = id.next();
        let record = ConflictRecord {
            id,
            branch: self.branch,
            employee,
            description: description.to_string(),
            passports: passports.to_vec(),
            detected_at: Utc::now(),
            resolved: false,
        };
        state.conflicts.insert(id, record);
        debug!(branch = %self.branch, conflict = %id, employee = %employee, "conflict opened");
        Ok(id)
    }

    fn unresolved_conflicts(&self) -> StoreResult<Vec<ConflictRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .conflicts
            .values()
            .filter(|record| !record.resolved)
            .cloned()
            .collect())
    }

    fn resolve_conflict(&self, id: ConflictId) -> StoreResult<Resolution> {
        let mut state = self.inner.write().expect("lock poisoned");
        let record = state
            .conflicts
            .get_mut(&id)
            .ok_or(StoreError::ConflictNotFound {
                branch: self.branch,
                id,
            })?;
        if record.resolved {
            return Ok(Resolution::AlreadyResolved);
        }
        record.resolved = true;
        debug!(branch = %self.branch, conflict = %id, "conflict resolved");
        Ok(Resolution::Resolved)
    }

    fn active_employees(&self) -> StoreResult<Vec<EmployeeRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .employees
            .values()
            .filter(|record| record.status.is_active())
            .cloned()
            .collect())
    }

    fn fired_employees(&self) -> StoreResult<Vec<EmployeeRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .employees
            .values()
            .filter(|record| !record.status.is_active())
            .cloned()
            .collect())
    }

    fn positions(&self) -> StoreResult<Vec<PositionRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.positions.values().cloned().collect())
    }

    fn history(&self) -> StoreResult<Vec<HistoryEntry>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.history.clone())
    }
}

impl std::fmt::Debug for MemoryBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBranch")
            .field("branch", &self.branch)
            .field("employee_count", &self.employee_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use roster_types::HistoryAction;

    use super::*;

    fn branch() -> MemoryBranch {
        MemoryBranch::new(BranchId::new(1))
    }

    fn passport(value: &str) -> Passport {
        Passport::new(value).unwrap()
    }

    fn new_employee(surname: &str, passport_value: &str) -> NewEmployee {
        NewEmployee {
            name: "Иван".into(),
            surname: surname.into(),
            patronymic: "Иванович".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            passport: passport(passport_value),
            position: PositionCode::new(1),
            status: EmployeeStatus::Active,
        }
    }

    // -----------------------------------------------------------------------
    // Passport lookup
    // -----------------------------------------------------------------------

    #[test]
    fn find_by_passport_missing_returns_none() {
        let store = branch();
        assert!(store
            .find_by_passport(&passport("0000000000"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn find_by_passport_returns_active_record() {
        let store = branch();
        let code = store
            .insert_employee(&new_employee("Иванов", "1234567890"))
            .unwrap();
        let found = store
            .find_by_passport(&passport("1234567890"))
            .unwrap()
            .expect("should exist");
        assert_eq!(found.code, code);
        assert!(found.is_active());
    }

    #[test]
    fn find_by_passport_prefers_active_over_fired() {
        let store = branch();
        let first = store
            .insert_employee(&new_employee("Иванов", "1234567890"))
            .unwrap();
        store.update_status(first, EmployeeStatus::Fired).unwrap();
        let second = store
            .insert_employee(&new_employee("Иванов", "1234567890"))
            .unwrap();

        let found = store
            .find_by_passport(&passport("1234567890"))
            .unwrap()
            .expect("should exist");
        assert_eq!(found.code, second);
    }

    #[test]
    fn find_by_passport_falls_back_to_most_recent_fired() {
        let store = branch();
        let code = store
            .insert_employee(&new_employee("Иванов", "1234567890"))
            .unwrap();
        store.update_status(code, EmployeeStatus::Fired).unwrap();

        let found = store
            .find_by_passport(&passport("1234567890"))
            .unwrap()
            .expect("should exist");
        assert_eq!(found.code, code);
        assert_eq!(found.status, EmployeeStatus::Fired);
    }

    // -----------------------------------------------------------------------
    // Secondary key lookup
    // -----------------------------------------------------------------------

    #[test]
    fn find_by_secondary_key_matches_exactly() {
        let store = branch();
        store
            .insert_employee(&new_employee("Иванов", "1111111111"))
            .unwrap();
        store
            .insert_employee(&new_employee("Петров", "2222222222"))
            .unwrap();

        let key = SecondaryKey {
            surname: "Иванов".into(),
            name: "Иван".into(),
            patronymic: "Иванович".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        };
        let matches = store.find_by_secondary_key(&key).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].surname, "Иванов");
    }

    #[test]
    fn find_by_secondary_key_is_case_sensitive() {
        let store = branch();
        store
            .insert_employee(&new_employee("Иванов", "1111111111"))
            .unwrap();

        let key = SecondaryKey {
            surname: "ИВАНОВ".into(),
            name: "Иван".into(),
            patronymic: "Иванович".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        };
        assert!(store.find_by_secondary_key(&key).unwrap().is_empty());
    }

    #[test]
    fn find_by_secondary_key_includes_fired_records() {
        let store = branch();
        let code = store
            .insert_employee(&new_employee("Иванов", "1111111111"))
            .unwrap();
        store.update_status(code, EmployeeStatus::Fired).unwrap();

        let key = SecondaryKey {
            surname: "Иванов".into(),
            name: "Иван".into(),
            patronymic: "Иванович".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        };
        assert_eq!(store.find_by_secondary_key(&key).unwrap().len(), 1);
    }

    // -----------------------------------------------------------------------
    // Insert and code allocation
    // -----------------------------------------------------------------------

    #[test]
    fn insert_allocates_sequential_codes() {
        let store = branch();
        let first = store
            .insert_employee(&new_employee("Иванов", "1111111111"))
            .unwrap();
        let second = store
            .insert_employee(&new_employee("Петров", "2222222222"))
            .unwrap();
        assert_eq!(first, EmployeeCode::new(1));
        assert_eq!(second, EmployeeCode::new(2));
    }

    #[test]
    fn insert_never_reuses_a_retired_code() {
        let store = branch();
        let first = store
            .insert_employee(&new_employee("Иванов", "1111111111"))
            .unwrap();
        store.update_status(first, EmployeeStatus::Fired).unwrap();

        let second = store
            .insert_employee(&new_employee("Петров", "2222222222"))
            .unwrap();
        assert_eq!(second, first.next());
    }

    #[test]
    fn insert_rejects_duplicate_active_passport() {
        let store = branch();
        store
            .insert_employee(&new_employee("Иванов", "1234567890"))
            .unwrap();

        let err = store
            .insert_employee(&new_employee("Иванов", "1234567890"))
            .unwrap_err();
        assert!(matches!(err, StoreError::UniquenessViolation { .. }));
        assert_eq!(store.employee_count(), 1);
    }

    #[test]
    fn insert_allows_fired_duplicate_passport() {
        let store = branch();
        store
            .insert_employee(&new_employee("Иванов", "1234567890"))
            .unwrap();

        let mut rehired = new_employee("Иванов", "1234567890");
        rehired.status = EmployeeStatus::Fired;
        // Only the one-Active-per-passport invariant is enforced.
        store.insert_employee(&rehired).unwrap();
        assert_eq!(store.employee_count(), 2);
    }

    // -----------------------------------------------------------------------
    // Status updates
    // -----------------------------------------------------------------------

    #[test]
    fn update_status_flips_record() {
        let store = branch();
        let code = store
            .insert_employee(&new_employee("Иванов", "1111111111"))
            .unwrap();
        store.update_status(code, EmployeeStatus::Fired).unwrap();

        assert!(store.active_employees().unwrap().is_empty());
        assert_eq!(store.fired_employees().unwrap().len(), 1);
    }

    #[test]
    fn update_status_unknown_code_fails() {
        let store = branch();
        let err = store
            .update_status(EmployeeCode::new(99), EmployeeStatus::Fired)
            .unwrap_err();
        assert!(matches!(err, StoreError::EmployeeNotFound { .. }));
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    #[test]
    fn append_history_keeps_order() {
        let store = branch();
        for (code, action) in [(1, HistoryAction::Hired), (1, HistoryAction::Fired)] {
            store
                .append_history(&HistoryEntry {
                    employee: EmployeeCode::new(code),
                    change_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                    surname: "Иванов".into(),
                    passport: passport("1111111111"),
                    position: PositionCode::new(1),
                    action,
                })
                .unwrap();
        }
        let history = store.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, HistoryAction::Hired);
        assert_eq!(history[1].action, HistoryAction::Fired);
    }

    // -----------------------------------------------------------------------
    // Conflicts
    // -----------------------------------------------------------------------

    #[test]
    fn open_conflict_assigns_sequential_ids() {
        let store = branch();
        let passports = [passport("AAA"), passport("BBB")];
        let first = store
            .open_conflict(EmployeeCode::new(1), "overlap", &passports)
            .unwrap();
        let second = store
            .open_conflict(EmployeeCode::new(2), "overlap", &passports)
            .unwrap();
        assert_eq!(first, ConflictId::new(1));
        assert_eq!(second, ConflictId::new(2));
    }

    #[test]
    fn unresolved_conflicts_oldest_first() {
        let store = branch();
        let passports = [passport("AAA"), passport("BBB")];
        let first = store
            .open_conflict(EmployeeCode::new(1), "first", &passports)
            .unwrap();
        let second = store
            .open_conflict(EmployeeCode::new(2), "second", &passports)
            .unwrap();
        store.resolve_conflict(first).unwrap();

        let unresolved = store.unresolved_conflicts().unwrap();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].id, second);
    }

    #[test]
    fn resolve_conflict_is_idempotent() {
        let store = branch();
        let id = store
            .open_conflict(EmployeeCode::new(1), "overlap", &[passport("AAA")])
            .unwrap();
        assert_eq!(store.resolve_conflict(id).unwrap(), Resolution::Resolved);
        assert_eq!(
            store.resolve_conflict(id).unwrap(),
            Resolution::AlreadyResolved
        );
    }

    #[test]
    fn resolve_unknown_conflict_fails() {
        let store = branch();
        let err = store.resolve_conflict(ConflictId::new(42)).unwrap_err();
        assert!(matches!(err, StoreError::ConflictNotFound { .. }));
    }

    // -----------------------------------------------------------------------
    // Snapshot round-trip
    // -----------------------------------------------------------------------

    #[test]
    fn snapshot_roundtrip_preserves_state() {
        let store = branch();
        store.insert_position(PositionRecord {
            branch: BranchId::new(1),
            code: PositionCode::new(1),
            name: "Менеджер".into(),
            parent: None,
        });
        let code = store
            .insert_employee(&new_employee("Иванов", "1234567890"))
            .unwrap();
        store
            .append_history(&HistoryEntry {
                employee: code,
                change_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                surname: "Иванов".into(),
                passport: passport("1234567890"),
                position: PositionCode::new(1),
                action: HistoryAction::Hired,
            })
            .unwrap();
        store
            .open_conflict(code, "overlap", &[passport("AAA"), passport("BBB")])
            .unwrap();

        let snapshot = store.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored =
            MemoryBranch::from_snapshot(serde_json::from_str::<BranchSnapshot>(&json).unwrap());

        assert_eq!(restored.branch_id(), BranchId::new(1));
        assert_eq!(restored.employee_count(), 1);
        assert_eq!(restored.positions().unwrap().len(), 1);
        assert_eq!(restored.history().unwrap().len(), 1);
        assert_eq!(restored.unresolved_conflicts().unwrap().len(), 1);
    }

    #[test]
    fn restored_branch_continues_allocation() {
        let store = branch();
        store
            .insert_employee(&new_employee("Иванов", "1111111111"))
            .unwrap();
        store
            .open_conflict(EmployeeCode::new(1), "overlap", &[passport("AAA")])
            .unwrap();

        let restored = MemoryBranch::from_snapshot(store.snapshot());
        let code = restored
            .insert_employee(&new_employee("Петров", "2222222222"))
            .unwrap();
        let conflict = restored
            .open_conflict(code, "overlap", &[passport("BBB")])
            .unwrap();
        assert_eq!(code, EmployeeCode::new(2));
        assert_eq!(conflict, ConflictId::new(2));
    }

    // -----------------------------------------------------------------------
    // Concurrent read safety
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(branch());
        store
            .insert_employee(&new_employee("Иванов", "1234567890"))
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let found = store.find_by_passport(&passport("1234567890")).unwrap();
                    assert!(found.is_some());
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("thread should not panic");
        }
    }
}
