//! Reconciliation engine for a pair of branch rosters.
//!
//! One cycle classifies the Active records of each branch against the
//! opposite branch and applies the verdicts. New hires are copied
//! across; anything the target already holds is skipped. Ambiguous
//! matches go to the conflict journal instead of the roster. Fired
//! records are then mirrored in both directions. Every apply is
//! individually idempotent, so a cycle can be re-run or cancelled
//! between records without corrupting either roster.
//!
//! There is no transaction spanning the two branches. The engine
//! closes the classify-to-write window with a pre-write re-check and
//! leans on the stores' one-Active-per-passport constraint for the
//! residual race.

mod cycle;
mod dismissal;
mod error;
mod propagate;
mod types;

pub use cycle::{run_dismissal_sync, run_reconciliation_cycle, Reconciler};
pub use error::{SyncError, SyncResult};
pub use propagate::{ApplyOutcome, Propagator};
pub use types::{CancelToken, CycleReport, DismissalReport};
