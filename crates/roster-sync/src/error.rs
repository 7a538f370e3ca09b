use thiserror::Error;

use roster_store::StoreError;
use roster_types::BranchId;

use crate::types::{CycleReport, DismissalReport};

/// Cycle-level failures.
///
/// Per-record failures never surface here; they are counted in the
/// report and the cycle keeps going. These variants mean a whole
/// branch was unreachable, and they carry the partial report for the
/// work that did complete.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("branch {branch} unavailable, reconciliation cycle aborted: {source}")]
    BranchUnavailable {
        branch: BranchId,
        #[source]
        source: StoreError,
        partial: CycleReport,
    },

    #[error("branch {branch} unavailable, dismissal sync aborted: {source}")]
    DismissalUnavailable {
        branch: BranchId,
        #[source]
        source: StoreError,
        partial: DismissalReport,
    },
}

impl SyncError {
    /// The branch that could not be reached.
    pub fn branch(&self) -> BranchId {
        match self {
            Self::BranchUnavailable { branch, .. } => *branch,
            Self::DismissalUnavailable { branch, .. } => *branch,
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
