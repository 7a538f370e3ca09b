use tracing::{debug, info};

use roster_history::HistoryRecorder;
use roster_journal::{ConflictJournal, OpenOutcome};
use roster_match::{Matcher, Verdict};
use roster_store::{BranchStore, StoreError, StoreResult};
use roster_types::{ConflictId, EmployeeCode, EmployeeRecord};

/// What applying one verdict did to the target branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The record was copied into the target under this code.
    Applied { code: EmployeeCode },
    /// The target already agrees; nothing was written.
    Unchanged,
    /// A new conflict was journaled.
    ConflictOpened(ConflictId),
    /// The same conflict is already journaled and unresolved.
    ConflictSkipped(ConflictId),
}

/// Applies matcher verdicts to the target branch.
pub struct Propagator;

impl Propagator {
    pub fn apply(
        verdict: &Verdict,
        source: &EmployeeRecord,
        source_store: &dyn BranchStore,
        target: &dyn BranchStore,
    ) -> StoreResult<ApplyOutcome> {
        match verdict {
            Verdict::Identical => Ok(ApplyOutcome::Unchanged),
            Verdict::NewForTarget => Self::copy_record(source, target),
            Verdict::Conflicting(evidence) => {
                let outcome =
                    ConflictJournal::open_if_absent(source, source_store, target, evidence)?;
                Ok(match outcome {
                    OpenOutcome::Opened(id) => ApplyOutcome::ConflictOpened(id),
                    OpenOutcome::Duplicate(id) => ApplyOutcome::ConflictSkipped(id),
                })
            }
        }
    }

    /// Copy `source` into `target` under a freshly allocated code and
    /// record the hire.
    ///
    /// The matcher predicate is re-checked immediately before the
    /// insert: the verdict may have gone stale since classification
    /// (another cycle, or a live hire in the target). A record that no
    /// longer classifies as new is left for the next cycle. The
    /// store's uniqueness constraint closes the residual window; its
    /// rejection is demoted to no write.
    fn copy_record(source: &EmployeeRecord, target: &dyn BranchStore) -> StoreResult<ApplyOutcome> {
        if !Matcher::classify(source, target)?.is_new_for_target() {
            debug!(
                passport = %source.passport,
                branch = %target.branch_id(),
                "verdict went stale before the write, skipping"
            );
            return Ok(ApplyOutcome::Unchanged);
        }

        let employee = source.to_new();
        let code = match target.insert_employee(&employee) {
            Ok(code) => code,
            Err(StoreError::UniquenessViolation { .. }) => {
                debug!(
                    passport = %source.passport,
                    branch = %target.branch_id(),
                    "concurrent insert beat us, skipping"
                );
                return Ok(ApplyOutcome::Unchanged);
            }
            Err(e) => return Err(e),
        };
        HistoryRecorder::record_hire(target, code, &employee)?;
        info!(
            branch = %target.branch_id(),
            code = %code,
            passport = %source.passport,
            "employee copied across"
        );
        Ok(ApplyOutcome::Applied { code })
    }
}
