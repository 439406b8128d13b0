//! This module implements the error types of the crate.
//!
//! Structural errors ([CircuitError], [AssignmentError]) are bugs in the code
//! describing a circuit and are reported as soon as they are detected. A
//! witness that does not satisfy the circuit is not an error of this kind: it
//! is reported by [crate::circuits::constraint_system::GateError].

use crate::circuits::{selector::SelectorSeed, variable::ColumnType};
use thiserror::Error;

/// A result type for component code.
pub type BlueprintResult<T> = std::result::Result<T, BlueprintError>;

/// Errors that can arise when reading or writing the assignment table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("the {kind} column {column} does not exist (the table has {columns} such columns)")]
    ColumnOutOfRange {
        kind: ColumnType,
        column: usize,
        columns: usize,
    },

    #[error("row {row} was never allocated (the table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("row {row} is outside of the usable rows of the table ({usable_rows})")]
    RowBudgetExceeded { row: usize, usable_rows: usize },

    #[error("offset {offset} applied to row {row} points before the first row")]
    NegativeRow { row: usize, offset: isize },

    #[error("the variable {0} is relative and cannot be resolved without a current row")]
    RelativeVariable(String),
}

/// Errors that can arise when describing a circuit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    #[error("the {kind} column {column} does not exist (the circuit has {columns} such columns)")]
    ColumnOutOfRange {
        kind: ColumnType,
        column: usize,
        columns: usize,
    },

    #[error("the constraint has degree {degree}, the circuit supports at most {max_degree}")]
    DegreeTooHigh { degree: usize, max_degree: usize },

    #[error("the selector {0} was never allocated")]
    UnknownSelector(usize),

    #[error("the constraint handle {0} does not belong to this circuit")]
    UnknownConstraint(usize),

    #[error("a gate needs at least one constraint (selector {0})")]
    EmptyGate(usize),

    #[error("the selector {0} already holds a different gate")]
    ConflictingGate(usize),

    #[error("a selector was already allocated for seed {0}")]
    DuplicateSelectorSeed(SelectorSeed),

    #[error("a selector block needs at least one gate")]
    EmptySelectorBlock,

    #[error("copy constraints only accept absolute variables, got {0}")]
    RelativeCopyConstraint(String),

    #[error("row {row} was never allocated ({allocated} rows allocated so far)")]
    UnallocatedRow { row: usize, allocated: usize },

    #[error("cannot allocate {requested} rows: only {available} usable rows are left")]
    RowBudgetExceeded { requested: usize, available: usize },

    #[error("invalid table description: {0}")]
    InvalidTableDescription(&'static str),

    #[error(transparent)]
    Assignment(#[from] AssignmentError),
}

/// Errors returned by components and by the [crate::blueprint::Blueprint]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlueprintError {
    #[error("invalid circuit: {0}")]
    Circuit(#[from] CircuitError),

    #[error("invalid assignment: {0}")]
    Assignment(#[from] AssignmentError),

    #[error("the input of {component} does not satisfy its precondition: {reason}")]
    Precondition {
        component: &'static str,
        reason: String,
    },

    #[error("the circuit and assignment phases of {component} disagree on its output")]
    PhaseMismatch { component: &'static str },
}

impl BlueprintError {
    pub fn precondition(component: &'static str, reason: impl ToString) -> Self {
        BlueprintError::Precondition {
            component,
            reason: reason.to_string(),
        }
    }
}
