use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("passport must not be empty")]
    EmptyPassport,

    #[error("passport must not contain whitespace")]
    PassportWhitespace,

    #[error("passport too long: {actual} characters, limit {limit}")]
    PassportTooLong { limit: usize, actual: usize },

    #[error("invalid branch id: {0:?}")]
    InvalidBranchId(String),

    #[error("invalid employee code: {0:?}")]
    InvalidEmployeeCode(String),
}
