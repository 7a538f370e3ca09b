//! Foundation types for the roster reconciliation engine.
//!
//! Two independently owned branch stores each keep their own employee
//! roster. This crate provides the value types shared by the matcher, the
//! propagator, the conflict journal, and the history recorder. Every other
//! roster crate depends on `roster-types`.
//!
//! # Key Types
//!
//! - [`BranchId`] — Identifier of one independently operated branch
//! - [`EmployeeRecord`] — One roster entry, identified by `(branch, code)`
//! - [`Passport`] — The trusted cross-branch matching key
//! - [`SecondaryKey`] — The weaker identity signal (full name + birth date)
//! - [`HistoryEntry`] — Immutable audit entry for a material change
//! - [`ConflictRecord`] — An ambiguous cross-branch match awaiting a human
//! - [`CycleId`] — UUID v7 identifier of one reconciliation cycle

pub mod branch;
pub mod conflict;
pub mod cycle;
pub mod employee;
pub mod error;
pub mod history;
pub mod position;

pub use branch::BranchId;
pub use conflict::{ConflictId, ConflictRecord};
pub use cycle::CycleId;
pub use employee::{
    EmployeeCode, EmployeeRecord, EmployeeStatus, NewEmployee, Passport, SecondaryKey,
};
pub use error::TypeError;
pub use history::{HistoryAction, HistoryEntry};
pub use position::{PositionCode, PositionRecord};
