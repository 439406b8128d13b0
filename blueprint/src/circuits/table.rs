//! This module implements the description of the table layout shared by a
//! constraint system and its assignment.

use crate::{circuits::variable::ColumnType, error::CircuitError};
use serde::{Deserialize, Serialize};

/// Maximum degree of a constraint when none is configured.
pub const DEFAULT_MAX_DEGREE: usize = 3;

/// Hard limit on the number of rows of a table, whatever its budget.
pub const MAX_ROWS: usize = 1 << 30;

/// Number of columns of each kind, and the constraints put on them.
///
/// Selector columns are not listed: one is created for every selector the
/// circuit allocates.
///
/// How to use it:
/// 1. Create a description with `TableDescription::new(witness_columns)`
/// 2. Invoke any of `public_inputs()`, `constants()`, `max_degree()`, `usable_rows()`
/// 3. Call `build()` to validate it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescription {
    pub witness_columns: usize,
    #[serde(default)]
    pub public_input_columns: usize,
    #[serde(default)]
    pub constant_columns: usize,
    /// Maximum degree accepted for a single constraint
    #[serde(default = "default_max_degree")]
    pub max_degree: usize,
    /// If set, the table cannot grow beyond this number of rows. It cannot
    /// exceed [MAX_ROWS].
    #[serde(default)]
    pub usable_rows: Option<usize>,
}

fn default_max_degree() -> usize {
    DEFAULT_MAX_DEGREE
}

impl TableDescription {
    pub fn new(witness_columns: usize) -> Self {
        TableDescription {
            witness_columns,
            public_input_columns: 0,
            constant_columns: 0,
            max_degree: DEFAULT_MAX_DEGREE,
            usable_rows: None,
        }
    }

    #[must_use]
    pub fn public_inputs(mut self, columns: usize) -> Self {
        self.public_input_columns = columns;
        self
    }

    #[must_use]
    pub fn constants(mut self, columns: usize) -> Self {
        self.constant_columns = columns;
        self
    }

    #[must_use]
    pub fn max_degree(mut self, max_degree: usize) -> Self {
        self.max_degree = max_degree;
        self
    }

    #[must_use]
    pub fn usable_rows(mut self, rows: usize) -> Self {
        self.usable_rows = Some(rows);
        self
    }

    /// Checks the description is usable.
    pub fn build(self) -> Result<Self, CircuitError> {
        if self.witness_columns == 0 {
            return Err(CircuitError::InvalidTableDescription(
                "at least one witness column is required",
            ));
        }
        if self.max_degree == 0 {
            return Err(CircuitError::InvalidTableDescription(
                "the maximum degree must be at least 1",
            ));
        }
        if matches!(self.usable_rows, Some(rows) if rows > MAX_ROWS) {
            return Err(CircuitError::InvalidTableDescription(
                "the usable rows cannot exceed MAX_ROWS",
            ));
        }
        Ok(self)
    }

    /// Number of rows the table may grow to.
    pub fn row_limit(&self) -> usize {
        self.usable_rows.map_or(MAX_ROWS, |rows| rows.min(MAX_ROWS))
    }

    /// Number of fixed columns of a given kind. Selector columns are not fixed
    /// and return `None`.
    pub fn columns(&self, kind: ColumnType) -> Option<usize> {
        match kind {
            ColumnType::Witness => Some(self.witness_columns),
            ColumnType::PublicInput => Some(self.public_input_columns),
            ColumnType::Constant => Some(self.constant_columns),
            ColumnType::Selector => None,
        }
    }
}
