use chrono::{NaiveDate, Utc};
use roster_store::{BranchStore, StoreResult};
use roster_types::{EmployeeCode, EmployeeRecord, HistoryAction, HistoryEntry, NewEmployee};
use tracing::debug;

/// Writes audit entries for the changes the engine makes.
///
/// The recorder only ever appends. Each entry carries the change date
/// and a snapshot of the fields that identify the person at that
/// moment, mirroring what branch-local tooling writes for its own
/// hires and dismissals.
pub struct HistoryRecorder;

impl HistoryRecorder {
    /// Record a hire dated today.
    pub fn record_hire(
        store: &dyn BranchStore,
        code: EmployeeCode,
        employee: &NewEmployee,
    ) -> StoreResult<()> {
        Self::record_hire_on(store, code, employee, Utc::now().date_naive())
    }

    /// Record a hire with an explicit change date.
    pub fn record_hire_on(
        store: &dyn BranchStore,
        code: EmployeeCode,
        employee: &NewEmployee,
        date: NaiveDate,
    ) -> StoreResult<()> {
        let entry = HistoryEntry {
            employee: code,
            change_date: date,
            surname: employee.surname.clone(),
            passport: employee.passport.clone(),
            position: employee.position,
            action: HistoryAction::Hired,
        };
        store.append_history(&entry)?;
        debug!(branch = %store.branch_id(), code = %code, "hire recorded");
        Ok(())
    }

    /// Record a dismissal dated today.
    pub fn record_dismissal(store: &dyn BranchStore, employee: &EmployeeRecord) -> StoreResult<()> {
        Self::record_dismissal_on(store, employee, Utc::now().date_naive())
    }

    /// Record a dismissal with an explicit change date.
    pub fn record_dismissal_on(
        store: &dyn BranchStore,
        employee: &EmployeeRecord,
        date: NaiveDate,
    ) -> StoreResult<()> {
        let entry = HistoryEntry {
            employee: employee.code,
            change_date: date,
            surname: employee.surname.clone(),
            passport: employee.passport.clone(),
            position: employee.position,
            action: HistoryAction::Fired,
        };
        store.append_history(&entry)?;
        debug!(branch = %store.branch_id(), code = %employee.code, "dismissal recorded");
        Ok(())
    }
}
