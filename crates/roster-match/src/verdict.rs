use roster_types::{EmployeeCode, EmployeeRecord, Passport, SecondaryKey};

/// How a source record relates to the opposite branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The target already holds this passport, in any status.
    Identical,
    /// No trace of this person in the target.
    NewForTarget,
    /// Secondary identity matches without passport agreement.
    Conflicting(ConflictEvidence),
}

impl Verdict {
    pub fn is_identical(&self) -> bool {
        matches!(self, Self::Identical)
    }

    pub fn is_new_for_target(&self) -> bool {
        matches!(self, Self::NewForTarget)
    }

    pub fn is_conflicting(&self) -> bool {
        matches!(self, Self::Conflicting(_))
    }
}

/// One target record implicated in an ambiguous match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictCandidate {
    pub code: EmployeeCode,
    pub passport: Passport,
}

/// Everything an ambiguous match found: the overlapping secondary key and
/// every candidate passport in the target.
///
/// Multiple secondary matches are all part of one verdict; no candidate is
/// silently picked over another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictEvidence {
    pub key: SecondaryKey,
    pub source_passport: Passport,
    pub candidates: Vec<ConflictCandidate>,
}

impl ConflictEvidence {
    pub fn new(source: &EmployeeRecord, candidates: &[EmployeeRecord]) -> Self {
        Self {
            key: source.secondary_key(),
            source_passport: source.passport.clone(),
            candidates: candidates
                .iter()
                .map(|record| ConflictCandidate {
                    code: record.code,
                    passport: record.passport.clone(),
                })
                .collect(),
        }
    }

    /// Every passport implicated, source first, without repetition.
    pub fn passports(&self) -> Vec<Passport> {
        let mut all = vec![self.source_passport.clone()];
        for candidate in &self.candidates {
            if !all.contains(&candidate.passport) {
                all.push(candidate.passport.clone());
            }
        }
        all
    }

    /// Human-readable journal entry text enumerating every candidate.
    pub fn description(&self) -> String {
        let candidates: Vec<String> = self
            .candidates
            .iter()
            .map(|c| format!("{} (employee {})", c.passport, c.code))
            .collect();
        let noun = if candidates.len() == 1 {
            "candidate passport"
        } else {
            "candidate passports"
        };
        format!(
            "secondary identity overlap for {}: source passport {}, {noun} {}",
            self.key,
            self.source_passport,
            candidates.join(", ")
        )
    }
}
