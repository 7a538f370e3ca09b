use tracing::{info, warn};

use roster_history::HistoryRecorder;
use roster_store::{BranchStore, StoreError, StoreResult};
use roster_types::{EmployeeRecord, EmployeeStatus};

use crate::types::CancelToken;

/// Outcome of sweeping one branch's Fired records into the other.
#[derive(Debug, Default)]
pub(crate) struct FiredSweep {
    pub updated: usize,
    pub failed: usize,
    pub cancelled: bool,
    /// Set when every attempted record failed as unavailable.
    pub aborted: Option<StoreError>,
}

/// Mirror one Fired record into the target branch.
///
/// Returns `Ok(true)` when the target's record was flipped, `Ok(false)`
/// when there was nothing to do: the target has no record for the
/// passport (the person never propagated there) or already shows
/// Fired.
pub(crate) fn sync_one(fired: &EmployeeRecord, target: &dyn BranchStore) -> StoreResult<bool> {
    let Some(counterpart) = target.find_by_passport(&fired.passport)? else {
        return Ok(false);
    };
    if !counterpart.status.is_active() {
        return Ok(false);
    }

    target.update_status(counterpart.code, EmployeeStatus::Fired)?;
    let mut flipped = counterpart;
    flipped.status = EmployeeStatus::Fired;
    HistoryRecorder::record_dismissal(target, &flipped)?;
    info!(
        branch = %target.branch_id(),
        code = %flipped.code,
        passport = %fired.passport,
        "dismissal mirrored"
    );
    Ok(true)
}

/// Propagate every Fired record of `source` into `target`.
///
/// Enumeration failure is the caller's problem and comes back as the
/// store error. Per-record failures are counted and the sweep keeps
/// going, except when every attempted record fails as unavailable,
/// which marks the sweep aborted.
pub(crate) fn sweep(
    source: &dyn BranchStore,
    target: &dyn BranchStore,
    cancel: &CancelToken,
) -> Result<FiredSweep, StoreError> {
    let fired = source.fired_employees()?;
    let mut result = FiredSweep::default();
    let mut attempted = 0usize;
    let mut unavailable = 0usize;
    let mut last_error = None;

    for record in &fired {
        if cancel.is_cancelled() {
            result.cancelled = true;
            break;
        }
        attempted += 1;
        match sync_one(record, target) {
            Ok(true) => result.updated += 1,
            Ok(false) => {}
            Err(e) => {
                result.failed += 1;
                warn!(
                    passport = %record.passport,
                    error = %e,
                    "dismissal skipped for record, continuing"
                );
                if matches!(e, StoreError::Unavailable { .. }) {
                    unavailable += 1;
                    last_error = Some(e);
                }
            }
        }
    }

    if attempted > 0 && unavailable == attempted {
        result.aborted = last_error;
    }
    Ok(result)
}
