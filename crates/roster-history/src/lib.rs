//! Audit-trail recorder.
//!
//! Every material change the engine makes to a branch, a hire copied
//! across or a dismissal mirrored, lands in that branch's append-only
//! history via [`HistoryRecorder`]. Entries snapshot the
//! identity-bearing fields at the time of the change so the trail
//! stays meaningful even after later edits to the record.

mod recorder;

pub use recorder::HistoryRecorder;
