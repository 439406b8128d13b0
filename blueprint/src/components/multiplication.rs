//! Field multiplication
//!
//! Layout (one row, default column mapping)
//!
//! | col | `Multiplication` |
//! | --- | ---------------- |
//! |   0 | `x` (copy)       |
//! |   1 | `y` (copy)       |
//! |   2 | `x * y`          |
//!
//! Constraints
//!
//!   1) w0 * w1 - w2

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

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Multiplication {
    columns: [usize; 3],
}

impl Default for Multiplication {
    fn default() -> Self {
        Multiplication { columns: [0, 1, 2] }
    }
}

impl Multiplication {
    pub fn new(columns: [usize; 3]) -> BlueprintResult<Self> {
        check_columns("multiplication", &columns)?;
        Ok(Multiplication { columns })
    }

    pub fn layout(&self, start_row: usize) -> BinaryLayout {
        BinaryLayout::new(self.columns, start_row)
    }
}

impl<F: PrimeField> Component<F> for Multiplication {
    type Input = BinaryInput;
    type Output = ComponentOutput;

    const NAME: &'static str = "multiplication";

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
        let seed = SelectorSeed::new("multiplication", &shape(&self.columns));
        binary_circuit(
            bp,
            seed,
            || witness(x, 0) * witness(y, 0) - witness(z, 0),
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
            Ok(x * y)
        })
    }
}
