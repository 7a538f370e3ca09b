use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use roster_types::CycleId;

/// Outcome counts for one reconciliation cycle.
///
/// `synced` counts records actually written to the other branch (hire
/// copies and mirrored dismissals); `unchanged` counts records the
/// target already held. Conflict counts are kept apart from `failed`
/// so ambiguous data and infrastructure trouble stay distinguishable.
#[derive(Clone, Debug, Serialize)]
pub struct CycleReport {
    pub cycle: CycleId,
    pub records_processed: usize,
    pub synced: usize,
    pub conflicts_opened: usize,
    pub conflicts_skipped_duplicate: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub cancelled: bool,
}

impl CycleReport {
    pub fn new(cycle: CycleId) -> Self {
        Self {
            cycle,
            records_processed: 0,
            synced: 0,
            conflicts_opened: 0,
            conflicts_skipped_duplicate: 0,
            unchanged: 0,
            failed: 0,
            cancelled: false,
        }
    }
}

/// Outcome counts for one standalone dismissal pass.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DismissalReport {
    /// Records in branch A flipped to Fired.
    pub updated_a: usize,
    /// Records in branch B flipped to Fired.
    pub updated_b: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Cooperative cancellation flag, checked between records.
///
/// Cancelling mid-cycle is safe: writes already applied stay applied,
/// and the next cycle picks up where this one stopped because every
/// apply is idempotent.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
