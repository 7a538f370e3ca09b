use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::branch::BranchId;
use crate::error::TypeError;
use crate::position::PositionCode;

/// Longest passport value accepted, in characters.
pub const PASSPORT_MAX_LEN: usize = 10;

/// Branch-local employee identifier.
///
/// Codes are allocated by each branch independently (`max + 1`) and are
/// never reused, even after dismissal. A code only identifies a person
/// together with its [`BranchId`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeCode(u32);

impl EmployeeCode {
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }

    /// The next code in allocation order.
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for EmployeeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EmployeeCode({})", self.0)
    }
}

impl fmt::Display for EmployeeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The trusted unique personal identifier used for cross-branch matching.
///
/// A passport value is opaque to the engine; it is only ever compared for
/// equality. Construction validates shape, not issuing-authority semantics.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Passport(String);

impl Passport {
    /// Validate and wrap a passport value.
    ///
    /// Rejects empty values, embedded whitespace, and values longer than
    /// [`PASSPORT_MAX_LEN`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TypeError::EmptyPassport);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(TypeError::PassportWhitespace);
        }
        let len = value.chars().count();
        if len > PASSPORT_MAX_LEN {
            return Err(TypeError::PassportTooLong {
                limit: PASSPORT_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Passport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Passport({:?})", self.0)
    }
}

impl fmt::Display for Passport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Passport {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Employment status. Dismissal is a status transition, never a deletion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Active,
    Fired,
}

impl EmployeeStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Fired => write!(f, "Fired"),
        }
    }
}

/// The weaker identity signal: full name plus birth date.
///
/// Compared exactly, case-sensitive, as stored. A secondary-key match
/// without passport agreement is a conflict, never an automatic merge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecondaryKey {
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub birth_date: NaiveDate,
}

impl fmt::Display for SecondaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}, born {}",
            self.surname, self.name, self.patronymic, self.birth_date
        )
    }
}

/// One roster entry in one branch.
///
/// Identity is `(branch, code)`. At most one record per
/// `(branch, passport)` may be Active at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub branch: BranchId,
    pub code: EmployeeCode,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub birth_date: NaiveDate,
    pub passport: Passport,
    pub position: PositionCode,
    pub status: EmployeeStatus,
}

impl EmployeeRecord {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// The secondary matching key of this record.
    pub fn secondary_key(&self) -> SecondaryKey {
        SecondaryKey {
            surname: self.surname.clone(),
            name: self.name.clone(),
            patronymic: self.patronymic.clone(),
            birth_date: self.birth_date,
        }
    }

    /// The insertable copy of this record, without branch-local identity.
    pub fn to_new(&self) -> NewEmployee {
        NewEmployee {
            name: self.name.clone(),
            surname: self.surname.clone(),
            patronymic: self.patronymic.clone(),
            birth_date: self.birth_date,
            passport: self.passport.clone(),
            position: self.position,
            status: self.status,
        }
    }
}

/// Insert payload for a branch store.
///
/// Carries every employee attribute except `(branch, code)`; the target
/// branch assigns those on insert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub birth_date: NaiveDate,
    pub passport: Passport,
    pub position: PositionCode,
    pub status: EmployeeStatus,
}
