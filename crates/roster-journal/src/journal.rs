use roster_match::ConflictEvidence;
use roster_store::{BranchStore, Resolution, StoreResult};
use roster_types::{ConflictId, EmployeeRecord};
use tracing::{debug, info};

/// Outcome of [`ConflictJournal::open_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new conflict was journaled under this id.
    Opened(ConflictId),
    /// An unresolved conflict over the same passports already exists.
    Duplicate(ConflictId),
}

impl OpenOutcome {
    pub fn conflict_id(&self) -> ConflictId {
        match self {
            Self::Opened(id) | Self::Duplicate(id) => *id,
        }
    }

    pub fn is_opened(&self) -> bool {
        matches!(self, Self::Opened(_))
    }
}

/// Deduplicated conflict bookkeeping over a pair of branches.
///
/// A conflict is identified by the unordered set of passports it
/// involves. Before journaling, the unresolved conflicts of both
/// branches are scanned for a record over the same set, so the reverse
/// direction of a cycle, or a later cycle over unchanged data, does
/// not journal the same ambiguity twice. Resolved records never
/// count: once a conflict is closed, still-ambiguous data opens a
/// fresh one.
pub struct ConflictJournal;

impl ConflictJournal {
    /// Journal a conflict for `source` in its own branch, unless an
    /// unresolved conflict over the same passports is already open in
    /// either branch.
    pub fn open_if_absent(
        source: &EmployeeRecord,
        source_store: &dyn BranchStore,
        target_store: &dyn BranchStore,
        evidence: &ConflictEvidence,
    ) -> StoreResult<OpenOutcome> {
        let passports = evidence.passports();
        for store in [source_store, target_store] {
            for existing in store.unresolved_conflicts()? {
                if existing.involves(&passports) {
                    debug!(
                        branch = %store.branch_id(),
                        conflict = %existing.id,
                        "conflict already journaled, skipping"
                    );
                    return Ok(OpenOutcome::Duplicate(existing.id));
                }
            }
        }

        let id = source_store.open_conflict(source.code, &evidence.description(), &passports)?;
        info!(
            branch = %source_store.branch_id(),
            conflict = %id,
            employee = %source.code,
            "conflict journaled"
        );
        Ok(OpenOutcome::Opened(id))
    }

    /// Mark a journaled conflict resolved.
    ///
    /// Resolution records that an operator dealt with the ambiguity
    /// outside the engine. It does not touch employee data, so if the
    /// records still overlap, the next cycle journals a new conflict.
    pub fn resolve(store: &dyn BranchStore, id: ConflictId) -> StoreResult<Resolution> {
        let resolution = store.resolve_conflict(id)?;
        match resolution {
            Resolution::Resolved => {
                info!(branch = %store.branch_id(), conflict = %id, "conflict resolved");
            }
            Resolution::AlreadyResolved => {
                debug!(branch = %store.branch_id(), conflict = %id, "conflict was already resolved");
            }
        }
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use roster_store::{BranchSnapshot, MemoryBranch};
    use roster_types::{BranchId, EmployeeCode, EmployeeRecord, EmployeeStatus, Passport, PositionCode};

    fn record(branch: u32, code: u32, passport: &str) -> EmployeeRecord {
        EmployeeRecord {
            branch: BranchId::new(branch),
            code: EmployeeCode::new(code),
            name: "Иван".to_owned(),
            surname: "Иванов".to_owned(),
            patronymic: "Иванович".to_owned(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            passport: Passport::new(passport).unwrap(),
            position: PositionCode::new(1),
            status: EmployeeStatus::Active,
        }
    }

    fn branch_with(branch: u32, employees: Vec<EmployeeRecord>) -> MemoryBranch {
        MemoryBranch::from_snapshot(BranchSnapshot {
            branch: BranchId::new(branch),
            employees,
            positions: Vec::new(),
            history: Vec::new(),
            conflicts: Vec::new(),
        })
    }

    fn evidence_for(source: &EmployeeRecord, candidate: &EmployeeRecord) -> ConflictEvidence {
        ConflictEvidence::new(source, std::slice::from_ref(candidate))
    }

    // ---------------------------------------------------------------- opening

    #[test]
    fn opens_a_conflict_in_the_source_branch() {
        let source = record(1, 1001, "6666666666");
        let candidate = record(2, 2001, "7777777777");
        let a = branch_with(1, vec![source.clone()]);
        let b = branch_with(2, vec![candidate.clone()]);

        let outcome =
            ConflictJournal::open_if_absent(&source, &a, &b, &evidence_for(&source, &candidate))
                .unwrap();

        assert!(outcome.is_opened());
        assert_eq!(a.unresolved_conflicts().unwrap().len(), 1);
        assert!(b.unresolved_conflicts().unwrap().is_empty());

        let opened = &a.unresolved_conflicts().unwrap()[0];
        assert_eq!(opened.employee, source.code);
        assert_eq!(opened.passports.len(), 2);
    }

    #[test]
    fn second_call_reports_a_duplicate() {
        let source = record(1, 1001, "6666666666");
        let candidate = record(2, 2001, "7777777777");
        let a = branch_with(1, vec![source.clone()]);
        let b = branch_with(2, vec![candidate.clone()]);
        let evidence = evidence_for(&source, &candidate);

        let first = ConflictJournal::open_if_absent(&source, &a, &b, &evidence).unwrap();
        let second = ConflictJournal::open_if_absent(&source, &a, &b, &evidence).unwrap();

        assert!(first.is_opened());
        assert!(!second.is_opened());
        assert_eq!(second.conflict_id(), first.conflict_id());
        assert_eq!(a.unresolved_conflicts().unwrap().len(), 1);
    }

    #[test]
    fn reverse_direction_sees_the_existing_conflict() {
        // The same pair of people observed from branch 2's side: the
        // passports come in the opposite order, but the set matches.
        let a_side = record(1, 1001, "6666666666");
        let b_side = record(2, 2001, "7777777777");
        let a = branch_with(1, vec![a_side.clone()]);
        let b = branch_with(2, vec![b_side.clone()]);

        let forward =
            ConflictJournal::open_if_absent(&a_side, &a, &b, &evidence_for(&a_side, &b_side))
                .unwrap();
        let reverse =
            ConflictJournal::open_if_absent(&b_side, &b, &a, &evidence_for(&b_side, &a_side))
                .unwrap();

        assert!(forward.is_opened());
        assert_eq!(reverse, OpenOutcome::Duplicate(forward.conflict_id()));
        assert!(b.unresolved_conflicts().unwrap().is_empty());
    }

    #[test]
    fn different_passport_sets_are_journaled_separately() {
        let source = record(1, 1001, "6666666666");
        let first_candidate = record(2, 2001, "7777777777");
        let second_candidate = record(2, 2002, "8888888888");
        let a = branch_with(1, vec![source.clone()]);
        let b = branch_with(2, vec![first_candidate.clone(), second_candidate.clone()]);

        let one =
            ConflictJournal::open_if_absent(&source, &a, &b, &evidence_for(&source, &first_candidate))
                .unwrap();
        let two = ConflictJournal::open_if_absent(
            &source,
            &a,
            &b,
            &evidence_for(&source, &second_candidate),
        )
        .unwrap();

        assert!(one.is_opened());
        assert!(two.is_opened());
        assert_eq!(a.unresolved_conflicts().unwrap().len(), 2);
    }

    // ------------------------------------------------------------- resolution

    #[test]
    fn resolving_unlocks_the_passport_set() {
        let source = record(1, 1001, "6666666666");
        let candidate = record(2, 2001, "7777777777");
        let a = branch_with(1, vec![source.clone()]);
        let b = branch_with(2, vec![candidate.clone()]);
        let evidence = evidence_for(&source, &candidate);

        let first = ConflictJournal::open_if_absent(&source, &a, &b, &evidence).unwrap();
        ConflictJournal::resolve(&a, first.conflict_id()).unwrap();

        // Data was not corrected, so the still-present overlap is
        // journaled again as a new conflict.
        let reopened = ConflictJournal::open_if_absent(&source, &a, &b, &evidence).unwrap();
        assert!(reopened.is_opened());
        assert_ne!(reopened.conflict_id(), first.conflict_id());
        assert_eq!(a.unresolved_conflicts().unwrap().len(), 1);
    }

    #[test]
    fn resolve_is_idempotent() {
        let source = record(1, 1001, "6666666666");
        let candidate = record(2, 2001, "7777777777");
        let a = branch_with(1, vec![source.clone()]);
        let b = branch_with(2, vec![candidate.clone()]);

        let outcome =
            ConflictJournal::open_if_absent(&source, &a, &b, &evidence_for(&source, &candidate))
                .unwrap();
        let id = outcome.conflict_id();

        assert_eq!(ConflictJournal::resolve(&a, id).unwrap(), Resolution::Resolved);
        assert_eq!(
            ConflictJournal::resolve(&a, id).unwrap(),
            Resolution::AlreadyResolved
        );
    }
}
