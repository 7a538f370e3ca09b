use tracing::debug;

use roster_store::{BranchStore, StoreResult};
use roster_types::EmployeeRecord;

use crate::verdict::{ConflictEvidence, Verdict};

/// Cross-branch record classifier.
pub struct Matcher;

impl Matcher {
    /// Classify `source` against the opposite branch.
    ///
    /// 1. A record holding the source passport, in any status, means
    ///    [`Verdict::Identical`]. This is the common re-run case.
    /// 2. Otherwise, zero secondary-key matches mean
    ///    [`Verdict::NewForTarget`].
    /// 3. Otherwise the match is ambiguous: same identity signal, no
    ///    confirming key. The verdict carries every candidate found.
    ///
    /// Classification never writes to either branch.
    pub fn classify(source: &EmployeeRecord, target: &dyn BranchStore) -> StoreResult<Verdict> {
        if target.find_by_passport(&source.passport)?.is_some() {
            debug!(
                employee = %source.code,
                passport = %source.passport,
                target = %target.branch_id(),
                "passport already present in target"
            );
            return Ok(Verdict::Identical);
        }

        let candidates = target.find_by_secondary_key(&source.secondary_key())?;
        if candidates.is_empty() {
            return Ok(Verdict::NewForTarget);
        }

        let evidence = ConflictEvidence::new(source, &candidates);
        debug!(
            employee = %source.code,
            candidates = evidence.candidates.len(),
            target = %target.branch_id(),
            "secondary identity overlap without passport agreement"
        );
        Ok(Verdict::Conflicting(evidence))
    }
}
