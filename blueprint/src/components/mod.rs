//! This module implements the [Component] contract and the components built
//! on it.
//!
//! A component is described twice:
//! - `generate_circuit` declares its gates, enables its selectors and links
//!   its cells to the caller's variables with copy constraints,
//! - `generate_assignments` computes the values of its cells and writes them.
//!
//! Both phases receive the same `start_row` and must agree on every cell they
//! touch. Each component derives the position of its cells from a single
//! layout function used by both phases.

pub mod addition;
pub mod bit_decomposition;
pub mod division;
pub mod exponentiation;
pub mod mul_by_constant;
pub mod multiplication;
pub mod polynomial_evaluation;
pub mod subtraction;

use crate::{
    blueprint::Blueprint,
    circuits::{
        assignment::Assignment,
        expr::ConstraintExpr,
        selector::SelectorSeed,
        variable::{ColumnType, Variable},
    },
    error::{BlueprintError, BlueprintResult},
};
use ark_ff::PrimeField;
use itertools::Itertools;
use std::fmt::Debug;

pub use addition::Addition;
pub use bit_decomposition::BitDecomposition;
pub use division::Division;
pub use exponentiation::Exponentiation;
pub use mul_by_constant::MulByConstant;
pub use multiplication::Multiplication;
pub use polynomial_evaluation::PolynomialEvaluation;
pub use subtraction::Subtraction;

/// A reusable piece of circuit.
pub trait Component<F: PrimeField> {
    /// Absolute variables the component reads
    type Input;
    /// Absolute variables the component produces
    type Output: Clone + Debug + PartialEq;

    /// Name used in errors and logs
    const NAME: &'static str;

    /// Number of rows the component occupies.
    fn rows_amount(&self) -> usize;

    /// Checks the parameters of the component against the field. Called
    /// before any row is allocated for it.
    fn check_parameters(&self) -> BlueprintResult<()> {
        Ok(())
    }

    /// Declares the gates and copy constraints of the component on the rows
    /// starting at `start_row`.
    fn generate_circuit(
        &self,
        bp: &mut Blueprint<F>,
        input: &Self::Input,
        start_row: usize,
    ) -> BlueprintResult<Self::Output>;

    /// Writes the cells of the component on the rows starting at `start_row`.
    fn generate_assignments(
        &self,
        assignment: &mut Assignment<F>,
        input: &Self::Input,
        start_row: usize,
    ) -> BlueprintResult<Self::Output>;
}

/// Input of the components reading a single value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnaryInput {
    pub x: Variable,
}

/// Input of the components reading two values
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinaryInput {
    pub x: Variable,
    pub y: Variable,
}

/// Output of the components producing a single value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentOutput {
    pub output: Variable,
}

/// Cells of the one row components computing `output` from `x` and `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinaryLayout {
    pub row: usize,
    pub x: Variable,
    pub y: Variable,
    pub output: Variable,
}

impl BinaryLayout {
    pub fn new(columns: [usize; 3], row: usize) -> Self {
        let [x, y, output] =
            columns.map(|col| Variable::absolute(ColumnType::Witness, col, row));
        BinaryLayout { row, x, y, output }
    }
}

/// Relative witness cell, as used in gates.
pub(crate) fn witness<F: PrimeField>(column: usize, offset: isize) -> ConstraintExpr<F> {
    Variable::witness(column, offset).into()
}

/// Relative constant cell, as used in gates.
pub(crate) fn constant<F: PrimeField>(column: usize, offset: isize) -> ConstraintExpr<F> {
    Variable::constant(column, offset).into()
}

/// Checks the columns given to a component do not overlap.
pub(crate) fn check_columns(component: &'static str, columns: &[usize]) -> BlueprintResult<()> {
    if !columns.iter().all_unique() {
        return Err(BlueprintError::precondition(
            component,
            format!("the columns {columns:?} overlap"),
        ));
    }
    Ok(())
}

/// The selector seed shape of a column mapping.
pub(crate) fn shape(columns: &[usize]) -> Vec<u64> {
    columns.iter().map(|&col| col as u64).collect()
}

/// The gate checking `x + y = output` style relations on one row: registers
/// `constraint` behind the selector of `seed`, enables it on the row of
/// `layout` and copies the inputs in.
pub(crate) fn binary_circuit<F: PrimeField>(
    bp: &mut Blueprint<F>,
    seed: SelectorSeed,
    constraint: impl FnOnce() -> ConstraintExpr<F>,
    layout: &BinaryLayout,
    input: &BinaryInput,
) -> BlueprintResult<ComponentOutput> {
    let selector = bp.get_or_allocate_selector(seed, || vec![vec![constraint()]])?;
    bp.enable_selector(selector, layout.row)?;
    bp.add_copy_constraint(input.x, layout.x)?;
    bp.add_copy_constraint(input.y, layout.y)?;
    Ok(ComponentOutput {
        output: layout.output,
    })
}

/// Writes the cells of a one row binary component, `output` being computed
/// by `op` from the values of the inputs.
pub(crate) fn binary_assignments<F: PrimeField>(
    assignment: &mut Assignment<F>,
    layout: &BinaryLayout,
    input: &BinaryInput,
    op: impl FnOnce(F, F) -> BlueprintResult<F>,
) -> BlueprintResult<ComponentOutput> {
    let x = assignment.cell(&input.x)?;
    let y = assignment.cell(&input.y)?;
    let output = op(x, y)?;
    assignment.set(&layout.x, x)?;
    assignment.set(&layout.y, y)?;
    assignment.set(&layout.output, output)?;
    Ok(ComponentOutput {
        output: layout.output,
    })
}
