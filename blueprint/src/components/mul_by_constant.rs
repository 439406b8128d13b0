//! Multiplication by a constant
//!
//! The constant lives in a constant column, so instances with different
//! constants share one selector.
//!
//! Layout (one row, default column mapping)
//!
//! | col | `MulByConstant` |
//! | --- | --------------- |
//! |  w0 | `x` (copy)      |
//! |  w1 | `k * x`         |
//! |  c0 | `k`             |
//!
//! Constraints
//!
//!   1) c0 * w0 - w1

use crate::{
    blueprint::Blueprint,
    circuits::{
        assignment::Assignment,
        selector::SelectorSeed,
        variable::{ColumnType, Variable},
    },
    components::{
        check_columns, constant, shape, witness, Component, ComponentOutput, UnaryInput,
    },
    error::BlueprintResult,
};
use ark_ff::PrimeField;

/// Computes `k * x` for a constant `k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MulByConstant<F> {
    constant: F,
    columns: [usize; 2],
    constant_column: usize,
}

/// Cells of a [MulByConstant] instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MulByConstantLayout {
    pub row: usize,
    pub x: Variable,
    pub output: Variable,
    pub constant: Variable,
}

impl<F: PrimeField> MulByConstant<F> {
    /// Uses witness columns 0 and 1, and constant column 0.
    pub fn new(constant: F) -> Self {
        MulByConstant {
            constant,
            columns: [0, 1],
            constant_column: 0,
        }
    }

    pub fn with_columns(
        constant: F,
        columns: [usize; 2],
        constant_column: usize,
    ) -> BlueprintResult<Self> {
        check_columns("mul_by_constant", &columns)?;
        Ok(MulByConstant {
            constant,
            columns,
            constant_column,
        })
    }

    pub fn layout(&self, start_row: usize) -> MulByConstantLayout {
        let [x, output] = self.columns;
        MulByConstantLayout {
            row: start_row,
            x: Variable::absolute(ColumnType::Witness, x, start_row),
            output: Variable::absolute(ColumnType::Witness, output, start_row),
            constant: Variable::absolute(ColumnType::Constant, self.constant_column, start_row),
        }
    }
}

impl<F: PrimeField> Component<F> for MulByConstant<F> {
    type Input = UnaryInput;
    type Output = ComponentOutput;

    const NAME: &'static str = "mul_by_constant";

    fn rows_amount(&self) -> usize {
        1
    }

    fn generate_circuit(
        &self,
        bp: &mut Blueprint<F>,
        input: &UnaryInput,
        start_row: usize,
    ) -> BlueprintResult<ComponentOutput> {
        let layout = self.layout(start_row);
        let [x, output] = self.columns;
        let k = self.constant_column;

        let mut seed_shape = shape(&self.columns);
        seed_shape.push(k as u64);
        let selector = bp.get_or_allocate_selector(
            SelectorSeed::new("mul_by_constant", &seed_shape),
            || vec![vec![constant::<F>(k, 0) * witness(x, 0) - witness(output, 0)]],
        )?;

        bp.assign_constant(k, start_row, self.constant)?;
        bp.enable_selector(selector, layout.row)?;
        bp.add_copy_constraint(input.x, layout.x)?;

        Ok(ComponentOutput {
            output: layout.output,
        })
    }

    fn generate_assignments(
        &self,
        assignment: &mut Assignment<F>,
        input: &UnaryInput,
        start_row: usize,
    ) -> BlueprintResult<ComponentOutput> {
        let layout = self.layout(start_row);
        let x = assignment.cell(&input.x)?;
        assignment.set(&layout.x, x)?;
        assignment.set(&layout.output, self.constant * x)?;
        Ok(ComponentOutput {
            output: layout.output,
        })
    }
}
