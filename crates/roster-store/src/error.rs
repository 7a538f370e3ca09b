use roster_types::{BranchId, ConflictId, EmployeeCode, Passport};

/// Errors from branch store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write targeted an employee code the branch does not hold.
    #[error("employee {code} not found in {branch}")]
    EmployeeNotFound {
        branch: BranchId,
        code: EmployeeCode,
    },

    /// A resolution targeted a conflict id the branch does not hold.
    #[error("conflict {id} not found in {branch}")]
    ConflictNotFound { branch: BranchId, id: ConflictId },

    /// An insert would create a second Active record for the passport.
    #[error("duplicate active passport {passport} in {branch}")]
    UniquenessViolation {
        branch: BranchId,
        passport: Passport,
    },

    /// The branch's backing store cannot be reached.
    #[error("{branch} unavailable: {reason}")]
    Unavailable { branch: BranchId, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
