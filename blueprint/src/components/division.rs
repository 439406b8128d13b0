//! Field division
//!
//! The inverse of the divisor is part of the witness, which proves the
//! divisor is not zero.
//!
//! Layout (one row, default column mapping)
//!
//! | col | `Division`  |
//! | --- | ----------- |
//! |   0 | `x` (copy)  |
//! |   1 | `y` (copy)  |
//! |   2 | `x / y`     |
//! |   3 | `1 / y`     |
//!
//! Constraints
//!
//!   1) w1 * w2 - w0
//!   2) w1 * w3 - 1

use crate::{
    blueprint::Blueprint,
    circuits::{
        assignment::Assignment,
        expr::ConstraintExpr,
        selector::SelectorSeed,
        variable::{ColumnType, Variable},
    },
    components::{check_columns, shape, witness, BinaryInput, Component, ComponentOutput},
    error::{BlueprintError, BlueprintResult},
};
use ark_ff::PrimeField;

/// Computes `x / y`, for `y` different from zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Division {
    columns: [usize; 4],
}

impl Default for Division {
    fn default() -> Self {
        Division {
            columns: [0, 1, 2, 3],
        }
    }
}

/// Cells of a [Division] instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DivisionLayout {
    pub row: usize,
    pub x: Variable,
    pub y: Variable,
    pub output: Variable,
    pub y_inv: Variable,
}

impl Division {
    pub fn new(columns: [usize; 4]) -> BlueprintResult<Self> {
        check_columns("division", &columns)?;
        Ok(Division { columns })
    }

    pub fn layout(&self, start_row: usize) -> DivisionLayout {
        let [x, y, output, y_inv] =
            self.columns.map(|col| Variable::absolute(ColumnType::Witness, col, start_row));
        DivisionLayout {
            row: start_row,
            x,
            y,
            output,
            y_inv,
        }
    }
}

impl<F: PrimeField> Component<F> for Division {
    type Input = BinaryInput;
    type Output = ComponentOutput;

    const NAME: &'static str = "division";

    fn rows_amount(&self) -> usize {
        1
    }

    fn generate_circuit(
        &self,
        bp: &mut Blueprint<F>,
        input: &BinaryInput,
        start_row: usize,
    ) -> BlueprintResult<ComponentOutput> {
        let layout = self.layout(start_row);
        let [x, y, output, y_inv] = self.columns;

        let selector = bp.get_or_allocate_selector(
            SelectorSeed::new("division", &shape(&self.columns)),
            || {
                vec![vec![
                    witness::<F>(y, 0) * witness(output, 0) - witness(x, 0),
                    witness::<F>(y, 0) * witness(y_inv, 0) - ConstraintExpr::constant(F::one()),
                ]]
            },
        )?;

        bp.enable_selector(selector, layout.row)?;
        bp.add_copy_constraint(input.x, layout.x)?;
        bp.add_copy_constraint(input.y, layout.y)?;

        Ok(ComponentOutput {
            output: layout.output,
        })
    }

    fn generate_assignments(
        &self,
        assignment: &mut Assignment<F>,
        input: &BinaryInput,
        start_row: usize,
    ) -> BlueprintResult<ComponentOutput> {
        let layout = self.layout(start_row);
        let x = assignment.cell(&input.x)?;
        let y = assignment.cell(&input.y)?;
        let y_inv = y
            .inverse()
            .ok_or_else(|| BlueprintError::precondition("division", "the divisor is zero"))?;

        assignment.set(&layout.x, x)?;
        assignment.set(&layout.y, y)?;
        assignment.set(&layout.output, x * y_inv)?;
        assignment.set(&layout.y_inv, y_inv)?;

        Ok(ComponentOutput {
            output: layout.output,
        })
    }
}
