//! Field addition
//!
//! Layout (one row, default column mapping)
//!
//! | col | `Addition`   |
//! | --- | ------------ |
//! |   0 | `x` (copy)   |
//! |   1 | `y` (copy)   |
//! |   2 | `x + y`      |
//!
//! Constraints
//!
//!   1) w0 + w1 - w2

use crate::{
    blueprint::Blueprint,
    circuits::{assignment::Assignment, selector::SelectorSeed},
    components::{
        binary_assignments, binary_circuit, check_columns, shape, witness, BinaryInput,
        BinaryLayout, Component, ComponentOutput,
    },
    error::BlueprintResult,
};
use ark_ff::PrimeField;

/// Computes `x + y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Addition {
    columns: [usize; 3],
}

impl Default for Addition {
    fn default() -> Self {
        Addition { columns: [0, 1, 2] }
    }
}

impl Addition {
    /// Places `x`, `y` and the sum in the given witness columns.
    pub fn new(columns: [usize; 3]) -> BlueprintResult<Self> {
        check_columns("addition", &columns)?;
        Ok(Addition { columns })
    }

    pub fn layout(&self, start_row: usize) -> BinaryLayout {
        BinaryLayout::new(self.columns, start_row)
    }

    fn seed(&self) -> SelectorSeed {
        SelectorSeed::new("addition", &shape(&self.columns))
    }
}

impl<F: PrimeField> Component<F> for Addition {
    type Input = BinaryInput;
    type Output = ComponentOutput;

    const NAME: &'static str = "addition";

    fn rows_amount(&self) -> usize {
        1
    }

    fn generate_circuit(
        &self,
        bp: &mut Blueprint<F>,
        input: &BinaryInput,
        start_row: usize,
    ) -> BlueprintResult<ComponentOutput> {
        let [x, y, z] = self.columns;
        binary_circuit(
            bp,
            self.seed(),
            || witness(x, 0) + witness(y, 0) - witness(z, 0),
            &self.layout(start_row),
            input,
        )
    }

    fn generate_assignments(
        &self,
        assignment: &mut Assignment<F>,
        input: &BinaryInput,
        start_row: usize,
    ) -> BlueprintResult<ComponentOutput> {
        binary_assignments(assignment, &self.layout(start_row), input, |x, y| {
            Ok(x + y)
        })
    }
}
