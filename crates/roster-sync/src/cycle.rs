use tracing::{info, warn};

use roster_match::Matcher;
use roster_store::{BranchStore, StoreError, StoreResult};
use roster_types::{BranchId, CycleId, EmployeeRecord};

use crate::dismissal;
use crate::error::{SyncError, SyncResult};
use crate::propagate::{ApplyOutcome, Propagator};
use crate::types::{CancelToken, CycleReport, DismissalReport};

/// Run one full reconciliation cycle over a pair of branches.
pub fn run_reconciliation_cycle(
    a: &dyn BranchStore,
    b: &dyn BranchStore,
) -> SyncResult<CycleReport> {
    Reconciler::new(a, b).run_cycle()
}

/// Run the standalone dismissal pass over a pair of branches.
pub fn run_dismissal_sync(
    a: &dyn BranchStore,
    b: &dyn BranchStore,
) -> SyncResult<DismissalReport> {
    Reconciler::new(a, b).run_dismissal_sync()
}

/// Orchestrates matching, propagation, and dismissal mirroring for
/// one branch pair.
///
/// The reconciler owns nothing but the cancellation token; all state
/// lives in the branches, all counts in the report it hands back.
pub struct Reconciler<'a> {
    a: &'a dyn BranchStore,
    b: &'a dyn BranchStore,
    cancel: CancelToken,
}

impl<'a> Reconciler<'a> {
    pub fn new(a: &'a dyn BranchStore, b: &'a dyn BranchStore) -> Self {
        Self {
            a,
            b,
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally held cancellation token.
    pub fn with_cancel(
        a: &'a dyn BranchStore,
        b: &'a dyn BranchStore,
        cancel: CancelToken,
    ) -> Self {
        Self { a, b, cancel }
    }

    /// One full cycle: classify and apply Active records A against B,
    /// then B against A, then mirror Fired records in both directions.
    ///
    /// A conflict or a single failing record never stops the pass.
    /// Losing a whole branch does: enumeration failure, or every
    /// record of a direction failing as unavailable, aborts with the
    /// partial report carried inside the error.
    pub fn run_cycle(&self) -> SyncResult<CycleReport> {
        let cycle = CycleId::new();
        let mut report = CycleReport::new(cycle);
        info!(
            cycle = %cycle,
            branch_a = %self.a.branch_id(),
            branch_b = %self.b.branch_id(),
            "reconciliation cycle started"
        );

        self.run_direction(self.a, self.b, &mut report)?;
        if !report.cancelled {
            self.run_direction(self.b, self.a, &mut report)?;
        }
        if !report.cancelled {
            self.mirror_dismissals(self.a, self.b, &mut report)?;
        }
        if !report.cancelled {
            self.mirror_dismissals(self.b, self.a, &mut report)?;
        }

        info!(
            cycle = %cycle,
            records = report.records_processed,
            synced = report.synced,
            conflicts_opened = report.conflicts_opened,
            conflicts_skipped = report.conflicts_skipped_duplicate,
            unchanged = report.unchanged,
            failed = report.failed,
            cancelled = report.cancelled,
            "reconciliation cycle finished"
        );
        Ok(report)
    }

    /// The standalone dismissal pass: B's Fired records update A,
    /// then A's update B. No matcher involved.
    pub fn run_dismissal_sync(&self) -> SyncResult<DismissalReport> {
        let mut report = DismissalReport::default();
        info!(
            branch_a = %self.a.branch_id(),
            branch_b = %self.b.branch_id(),
            "dismissal sync started"
        );

        report.updated_a = self.sweep_into(self.b, self.a, &mut report)?;
        if !report.cancelled {
            report.updated_b = self.sweep_into(self.a, self.b, &mut report)?;
        }

        info!(
            updated_a = report.updated_a,
            updated_b = report.updated_b,
            failed = report.failed,
            "dismissal sync finished"
        );
        Ok(report)
    }

    fn run_direction(
        &self,
        source: &dyn BranchStore,
        target: &dyn BranchStore,
        report: &mut CycleReport,
    ) -> SyncResult<()> {
        let records = match source.active_employees() {
            Ok(records) => records,
            Err(e) => {
                return Err(SyncError::BranchUnavailable {
                    branch: failing_branch(&e, source.branch_id()),
                    source: e,
                    partial: report.clone(),
                })
            }
        };

        let mut attempted = 0usize;
        let mut unavailable = 0usize;
        let mut last_error = None;

        for record in &records {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                info!(branch = %source.branch_id(), "cycle cancelled between records");
                break;
            }
            attempted += 1;
            report.records_processed += 1;
            match Self::reconcile_record(record, source, target) {
                Ok(ApplyOutcome::Applied { .. }) => report.synced += 1,
                Ok(ApplyOutcome::Unchanged) => report.unchanged += 1,
                Ok(ApplyOutcome::ConflictOpened(_)) => report.conflicts_opened += 1,
                Ok(ApplyOutcome::ConflictSkipped(_)) => report.conflicts_skipped_duplicate += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        passport = %record.passport,
                        error = %e,
                        "record skipped, continuing cycle"
                    );
                    if matches!(e, StoreError::Unavailable { .. }) {
                        unavailable += 1;
                        last_error = Some(e);
                    }
                }
            }
        }

        if attempted > 0 && unavailable == attempted {
            if let Some(e) = last_error {
                return Err(SyncError::BranchUnavailable {
                    branch: failing_branch(&e, target.branch_id()),
                    source: e,
                    partial: report.clone(),
                });
            }
        }
        Ok(())
    }

    fn reconcile_record(
        record: &EmployeeRecord,
        source: &dyn BranchStore,
        target: &dyn BranchStore,
    ) -> StoreResult<ApplyOutcome> {
        let verdict = Matcher::classify(record, target)?;
        Propagator::apply(&verdict, record, source, target)
    }

    fn mirror_dismissals(
        &self,
        source: &dyn BranchStore,
        target: &dyn BranchStore,
        report: &mut CycleReport,
    ) -> SyncResult<()> {
        let sweep = match dismissal::sweep(source, target, &self.cancel) {
            Ok(sweep) => sweep,
            Err(e) => {
                return Err(SyncError::BranchUnavailable {
                    branch: failing_branch(&e, source.branch_id()),
                    source: e,
                    partial: report.clone(),
                })
            }
        };

        report.synced += sweep.updated;
        report.failed += sweep.failed;
        if sweep.cancelled {
            report.cancelled = true;
        }
        if let Some(e) = sweep.aborted {
            return Err(SyncError::BranchUnavailable {
                branch: failing_branch(&e, target.branch_id()),
                source: e,
                partial: report.clone(),
            });
        }
        Ok(())
    }

    fn sweep_into(
        &self,
        source: &dyn BranchStore,
        target: &dyn BranchStore,
        report: &mut DismissalReport,
    ) -> SyncResult<usize> {
        let sweep = match dismissal::sweep(source, target, &self.cancel) {
            Ok(sweep) => sweep,
            Err(e) => {
                return Err(SyncError::DismissalUnavailable {
                    branch: failing_branch(&e, source.branch_id()),
                    source: e,
                    partial: report.clone(),
                })
            }
        };

        report.failed += sweep.failed;
        if sweep.cancelled {
            report.cancelled = true;
        }
        if let Some(e) = sweep.aborted {
            return Err(SyncError::DismissalUnavailable {
                branch: failing_branch(&e, target.branch_id()),
                source: e,
                partial: report.clone(),
            });
        }
        Ok(sweep.updated)
    }
}

/// The branch a store error points at, or the fallback when the error
/// does not carry one.
fn failing_branch(error: &StoreError, fallback: BranchId) -> BranchId {
    match error {
        StoreError::Unavailable { branch, .. } => *branch,
        _ => fallback,
    }
}
