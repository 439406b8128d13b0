//! This module implements the cell references used by constraints and copy
//! constraints.
//!
//! A [Variable] never holds a value, it only names a cell of the assignment
//! table. Inside a gate, variables are *relative*: their row is an offset from
//! the row the gate is evaluated on (`0` is the current row, `1` the next one,
//! `-1` the previous one). Copy constraints and component inputs/outputs use
//! *absolute* variables, which name a fixed row of the table.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter};

/// The different kinds of columns of the table.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ColumnType {
    /// Private values computed by the prover
    Witness,
    /// Values shared with the verifier
    PublicInput,
    /// Values fixed by the circuit
    Constant,
    /// Columns enabling gates on some rows
    Selector,
}

impl ColumnType {
    /// Short name of the column kind, used when printing expressions.
    pub fn prefix(&self) -> &'static str {
        match self {
            ColumnType::Witness => "w",
            ColumnType::PublicInput => "pi",
            ColumnType::Constant => "c",
            ColumnType::Selector => "q",
        }
    }
}

/// A reference to one cell of the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    /// The kind of column the cell lives in
    pub kind: ColumnType,
    /// The index of the column among the columns of the same kind
    pub column: usize,
    /// The row offset, or the absolute row when `absolute` is set
    pub offset: isize,
    /// Whether `offset` is an absolute row of the table
    pub absolute: bool,
}

impl Variable {
    /// Creates a variable relative to the row a constraint is evaluated on.
    pub const fn new(kind: ColumnType, column: usize, offset: isize) -> Self {
        Variable {
            kind,
            column,
            offset,
            absolute: false,
        }
    }

    /// Creates a variable naming the cell at `row` of the given column.
    ///
    /// Rows above `isize::MAX` saturate. They are past [MAX_ROWS] anyway, so
    /// reading or copying them fails as for any row outside the table.
    ///
    /// [MAX_ROWS]: crate::circuits::table::MAX_ROWS
    pub const fn absolute(kind: ColumnType, column: usize, row: usize) -> Self {
        let offset = if row > isize::MAX as usize {
            isize::MAX
        } else {
            row as isize
        };
        Variable {
            kind,
            column,
            offset,
            absolute: true,
        }
    }

    /// Relative witness variable.
    pub const fn witness(column: usize, offset: isize) -> Self {
        Self::new(ColumnType::Witness, column, offset)
    }

    /// Relative public input variable.
    pub const fn public_input(column: usize, offset: isize) -> Self {
        Self::new(ColumnType::PublicInput, column, offset)
    }

    /// Relative constant variable.
    pub const fn constant(column: usize, offset: isize) -> Self {
        Self::new(ColumnType::Constant, column, offset)
    }

    /// Relative selector variable.
    pub const fn selector(column: usize, offset: isize) -> Self {
        Self::new(ColumnType::Selector, column, offset)
    }

    /// Returns the row this variable points to when evaluated on `current_row`,
    /// or `None` if it points before the first row.
    pub fn resolve_row(&self, current_row: usize) -> Option<usize> {
        if self.absolute {
            usize::try_from(self.offset).ok()
        } else {
            current_row.checked_add_signed(self.offset)
        }
    }

    /// Pins a relative variable to the table, taking `row` as its current row.
    /// Absolute variables are returned unchanged.
    pub fn at(self, row: usize) -> Option<Self> {
        if self.absolute {
            return Some(self);
        }
        self.resolve_row(row)
            .map(|row| Self::absolute(self.kind, self.column, row))
    }

    /// Returns the same variable moved by `delta` rows.
    pub fn shifted(self, delta: isize) -> Self {
        Variable {
            offset: self.offset + delta,
            ..self
        }
    }

    /// The absolute row of this variable, if it has one.
    pub fn row(&self) -> Option<usize> {
        if self.absolute {
            usize::try_from(self.offset).ok()
        } else {
            None
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let col = format!("{}[{}]", self.kind.prefix(), self.column);
        match (self.absolute, self.offset) {
            (true, row) => write!(f, "{col}@{row}"),
            (false, 0) => write!(f, "Curr({col})"),
            (false, 1) => write!(f, "Next({col})"),
            (false, -1) => write!(f, "Prev({col})"),
            (false, offset) => write!(f, "{col}({offset:+})"),
        }
    }
}
