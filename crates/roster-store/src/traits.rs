use roster_types::{
    BranchId, ConflictId, ConflictRecord, EmployeeCode, EmployeeRecord, EmployeeStatus,
    HistoryEntry, NewEmployee, Passport, PositionRecord, SecondaryKey,
};

use crate::error::StoreResult;

/// One branch's roster, as seen by the reconciliation engine.
///
/// All implementations must satisfy these invariants:
/// - At most one Active record per passport. [`BranchStore::insert_employee`]
///   rejects a violating insert with `UniquenessViolation`.
/// - Employee codes are allocated `max + 1` and never reused.
/// - History is append-only; entries are never updated or removed.
/// - Lookups return `Ok(None)` or an empty list for missing data. `Err` is
///   reserved for store failures.
pub trait BranchStore: Send + Sync {
    /// Identifier of the branch this store fronts.
    fn branch_id(&self) -> BranchId;

    /// Look up the record holding `passport`, in any status.
    ///
    /// Returns the Active record if one exists, otherwise the most recently
    /// hired record with that passport. `Ok(None)` if the passport is
    /// unknown to this branch.
    fn find_by_passport(&self, passport: &Passport) -> StoreResult<Option<EmployeeRecord>>;

    /// All records matching the secondary key exactly, case-sensitive,
    /// in any status, ordered by employee code.
    fn find_by_secondary_key(&self, key: &SecondaryKey) -> StoreResult<Vec<EmployeeRecord>>;

    /// Insert a new employee under a freshly allocated code.
    fn insert_employee(&self, employee: &NewEmployee) -> StoreResult<EmployeeCode>;

    /// Set the status of an existing employee.
    fn update_status(&self, code: EmployeeCode, status: EmployeeStatus) -> StoreResult<()>;

    /// Append an audit entry.
    fn append_history(&self, entry: &HistoryEntry) -> StoreResult<()>;

    /// Open a conflict record in this branch and return its id.
    fn open_conflict(
        &self,
        employee: EmployeeCode,
        description: &str,
        passports: &[Passport],
    ) -> StoreResult<ConflictId>;

    /// All conflicts not yet resolved, oldest first.
    fn unresolved_conflicts(&self) -> StoreResult<Vec<ConflictRecord>>;

    /// Mark a conflict resolved. Resolving twice reports
    /// [`Resolution::AlreadyResolved`] and changes nothing.
    fn resolve_conflict(&self, id: ConflictId) -> StoreResult<Resolution>;

    /// All Active records, ordered by employee code.
    fn active_employees(&self) -> StoreResult<Vec<EmployeeRecord>>;

    /// All Fired records, ordered by employee code.
    fn fired_employees(&self) -> StoreResult<Vec<EmployeeRecord>>;

    /// Position reference data, ordered by position code.
    fn positions(&self) -> StoreResult<Vec<PositionRecord>>;

    /// The audit log, in append order.
    fn history(&self) -> StoreResult<Vec<HistoryEntry>>;
}

/// Outcome of [`BranchStore::resolve_conflict`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The conflict was open and is now resolved.
    Resolved,
    /// The conflict had already been resolved. No-op.
    AlreadyResolved,
}
