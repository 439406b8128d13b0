//! This module implements the assignment table, that is the execution trace
//! of a circuit.
//!
//! The table has a fixed number of witness, public input and constant columns
//! (see [TableDescription]) and one selector column per allocated selector.
//! Columns grow on write and never shrink. Cells that were never written read
//! as zero as long as their row has been allocated.
//!
//! Note that a component must not rely on that default: a cell it needs must
//! be written explicitly, otherwise a gate may accept a witness by accident.

use crate::{
    circuits::{table::TableDescription, variable::ColumnType, variable::Variable},
    error::AssignmentError,
};
use ark_ff::PrimeField;
use std::{fmt, ops::Range};
use strum::IntoEnumIterator;

/// The execution trace of a circuit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment<F: PrimeField> {
    description: TableDescription,
    witnesses: Vec<Vec<F>>,
    public_inputs: Vec<Vec<F>>,
    constants: Vec<Vec<F>>,
    selectors: Vec<Vec<F>>,
    rows: usize,
}

impl<F: PrimeField> Assignment<F> {
    /// Creates an empty table with the columns of `description`.
    pub fn new(description: TableDescription) -> Self {
        Assignment {
            witnesses: vec![vec![]; description.witness_columns],
            public_inputs: vec![vec![]; description.public_input_columns],
            constants: vec![vec![]; description.constant_columns],
            selectors: vec![],
            rows: 0,
            description,
        }
    }

    pub fn description(&self) -> &TableDescription {
        &self.description
    }

    /// Number of allocated rows.
    pub fn rows_amount(&self) -> usize {
        self.rows
    }

    /// Number of columns of a given kind.
    pub fn columns_amount(&self, kind: ColumnType) -> usize {
        self.columns(kind).len()
    }

    /// Makes sure the table has at least `rows` rows.
    pub fn extend_rows(&mut self, rows: usize) -> Result<(), AssignmentError> {
        if rows > self.rows {
            let usable_rows = self.description.row_limit();
            if rows > usable_rows {
                return Err(AssignmentError::RowBudgetExceeded {
                    row: rows - 1,
                    usable_rows,
                });
            }
            self.rows = rows;
        }
        Ok(())
    }

    /// Drops every row from `rows` on and every selector column from
    /// `selectors` on.
    pub fn truncate(&mut self, rows: usize, selectors: usize) {
        self.selectors.truncate(selectors);
        self.rows = self.rows.min(rows);
        for cells in self
            .witnesses
            .iter_mut()
            .chain(&mut self.public_inputs)
            .chain(&mut self.constants)
            .chain(&mut self.selectors)
        {
            cells.truncate(rows);
        }
    }

    /// Extends the table to the next power of two number of rows and returns
    /// the new row count. Padding rows hold zeros and enable no gate.
    pub fn pad_to_power_of_two(&mut self) -> Result<usize, AssignmentError> {
        let rows = self.rows.max(1).next_power_of_two();
        self.extend_rows(rows)?;
        Ok(rows)
    }

    /// Makes sure the table has at least `amount` selector columns.
    pub fn extend_selectors(&mut self, amount: usize) {
        if amount > self.selectors.len() {
            self.selectors.resize(amount, vec![]);
        }
    }

    fn columns(&self, kind: ColumnType) -> &Vec<Vec<F>> {
        match kind {
            ColumnType::Witness => &self.witnesses,
            ColumnType::PublicInput => &self.public_inputs,
            ColumnType::Constant => &self.constants,
            ColumnType::Selector => &self.selectors,
        }
    }

    fn columns_mut(&mut self, kind: ColumnType) -> &mut Vec<Vec<F>> {
        match kind {
            ColumnType::Witness => &mut self.witnesses,
            ColumnType::PublicInput => &mut self.public_inputs,
            ColumnType::Constant => &mut self.constants,
            ColumnType::Selector => &mut self.selectors,
        }
    }

    fn check_column(&self, kind: ColumnType, column: usize) -> Result<(), AssignmentError> {
        let columns = self.columns_amount(kind);
        if column >= columns {
            return Err(AssignmentError::ColumnOutOfRange {
                kind,
                column,
                columns,
            });
        }
        Ok(())
    }

    /// Reads a cell. Fails if the column does not exist or the row was never
    /// allocated.
    pub fn get(&self, kind: ColumnType, column: usize, row: usize) -> Result<F, AssignmentError> {
        self.check_column(kind, column)?;
        if row >= self.rows {
            return Err(AssignmentError::RowOutOfRange {
                row,
                rows: self.rows,
            });
        }
        Ok(self.columns(kind)[column]
            .get(row)
            .copied()
            .unwrap_or_else(F::zero))
    }

    /// Returns a mutable reference to a cell, growing the table if `row` is
    /// past its end.
    pub fn get_mut(
        &mut self,
        kind: ColumnType,
        column: usize,
        row: usize,
    ) -> Result<&mut F, AssignmentError> {
        self.check_column(kind, column)?;
        let rows = row
            .checked_add(1)
            .ok_or(AssignmentError::RowBudgetExceeded {
                row,
                usable_rows: self.description.row_limit(),
            })?;
        self.extend_rows(rows)?;
        let cells = &mut self.columns_mut(kind)[column];
        if row >= cells.len() {
            cells.resize(row + 1, F::zero());
        }
        Ok(&mut cells[row])
    }

    pub fn witness(&self, column: usize, row: usize) -> Result<F, AssignmentError> {
        self.get(ColumnType::Witness, column, row)
    }

    pub fn witness_mut(&mut self, column: usize, row: usize) -> Result<&mut F, AssignmentError> {
        self.get_mut(ColumnType::Witness, column, row)
    }

    pub fn public_input(&self, column: usize, row: usize) -> Result<F, AssignmentError> {
        self.get(ColumnType::PublicInput, column, row)
    }

    pub fn public_input_mut(
        &mut self,
        column: usize,
        row: usize,
    ) -> Result<&mut F, AssignmentError> {
        self.get_mut(ColumnType::PublicInput, column, row)
    }

    pub fn constant(&self, column: usize, row: usize) -> Result<F, AssignmentError> {
        self.get(ColumnType::Constant, column, row)
    }

    pub fn constant_mut(&mut self, column: usize, row: usize) -> Result<&mut F, AssignmentError> {
        self.get_mut(ColumnType::Constant, column, row)
    }

    pub fn selector(&self, column: usize, row: usize) -> Result<F, AssignmentError> {
        self.get(ColumnType::Selector, column, row)
    }

    pub fn selector_mut(&mut self, column: usize, row: usize) -> Result<&mut F, AssignmentError> {
        self.get_mut(ColumnType::Selector, column, row)
    }

    /// Value of `var` when evaluated on `current_row`.
    pub fn value_at(&self, var: &Variable, current_row: usize) -> Result<F, AssignmentError> {
        let row = var
            .resolve_row(current_row)
            .ok_or(AssignmentError::NegativeRow {
                row: current_row,
                offset: var.offset,
            })?;
        self.get(var.kind, var.column, row)
    }

    /// Value of an absolute variable.
    pub fn cell(&self, var: &Variable) -> Result<F, AssignmentError> {
        if !var.absolute {
            return Err(AssignmentError::RelativeVariable(var.to_string()));
        }
        self.value_at(var, 0)
    }

    /// Writes `value` in the cell of an absolute variable.
    pub fn set(&mut self, var: &Variable, value: F) -> Result<(), AssignmentError> {
        let row = var
            .row()
            .ok_or_else(|| AssignmentError::RelativeVariable(var.to_string()))?;
        *self.get_mut(var.kind, var.column, row)? = value;
        Ok(())
    }

    /// Rows on which a selector holds a non-zero value.
    pub fn enabled_rows(&self, selector: usize) -> Vec<usize> {
        self.selectors
            .get(selector)
            .map(|cells| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, value)| !value.is_zero())
                    .map(|(row, _)| row)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Renders the witness, public input and constant columns of `rows`.
    pub fn print_rows(&self, rows: Range<usize>) -> String {
        let mut out = String::new();
        for row in rows.start..rows.end.min(self.rows) {
            let mut line = format!("{row:>4} |");
            for kind in ColumnType::iter().filter(|kind| *kind != ColumnType::Selector) {
                for column in 0..self.columns_amount(kind) {
                    let value = self.get(kind, column, row).unwrap_or_else(|_| F::zero());
                    line.push_str(&format!(" {value} |"));
                }
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl<F: PrimeField> fmt::Display for Assignment<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print_rows(0..self.rows))
    }
}
