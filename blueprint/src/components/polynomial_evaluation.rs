//! Polynomial evaluation with Horner's rule
//!
//! Evaluates `p(x) = c_0 + c_1 * x + ... + c_d * x^d` for fixed coefficients.
//! Coefficients are stored in a constant column, highest degree first, so all
//! polynomials share the same two gates whatever their coefficients.
//!
//! Layout (default column mapping)
//!
//! | row | w0                        | w1         | c0        |
//! | --- | ------------------------- | ---------- | --------- |
//! |   0 | `c_d`                     | `x` (copy) | `c_d`     |
//! |   i | `acc_{i-1} * x + c_{d-i}` | `x` (copy) | `c_{d-i}` |
//! |   d | `p(x)`                    | `x` (copy) | `c_0`     |
//!
//! Constraints
//!
//!   start) w0 - c0
//!   step)  w0 - (Prev(w0) * w1 + c0)

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
    error::{BlueprintError, BlueprintResult},
};
use ark_ff::PrimeField;

const START: usize = 0;
const STEP: usize = 1;

/// Evaluates a polynomial with fixed coefficients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolynomialEvaluation<F> {
    /// lowest degree first
    coefficients: Vec<F>,
    columns: [usize; 2],
    constant_column: usize,
}

/// Cells of one row of a [PolynomialEvaluation] instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HornerRow {
    pub acc: Variable,
    pub x: Variable,
    pub coefficient: Variable,
}

impl<F: PrimeField> PolynomialEvaluation<F> {
    /// `coefficients[i]` is the coefficient of `x^i`.
    pub fn new(coefficients: Vec<F>) -> BlueprintResult<Self> {
        Self::with_columns(coefficients, [0, 1], 0)
    }

    pub fn with_columns(
        coefficients: Vec<F>,
        columns: [usize; 2],
        constant_column: usize,
    ) -> BlueprintResult<Self> {
        if coefficients.is_empty() {
            return Err(BlueprintError::precondition(
                "polynomial_evaluation",
                "a polynomial needs at least one coefficient",
            ));
        }
        check_columns("polynomial_evaluation", &columns)?;
        Ok(PolynomialEvaluation {
            coefficients,
            columns,
            constant_column,
        })
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn layout(&self, start_row: usize) -> Vec<HornerRow> {
        let [acc, x] = self.columns;
        (start_row..=start_row + self.degree())
            .map(|row| HornerRow {
                acc: Variable::absolute(ColumnType::Witness, acc, row),
                x: Variable::absolute(ColumnType::Witness, x, row),
                coefficient: Variable::absolute(ColumnType::Constant, self.constant_column, row),
            })
            .collect()
    }

    /// Coefficients in the order they are absorbed, highest degree first.
    fn horner_order(&self) -> impl Iterator<Item = &F> {
        self.coefficients.iter().rev()
    }
}

impl<F: PrimeField> Component<F> for PolynomialEvaluation<F> {
    type Input = UnaryInput;
    type Output = ComponentOutput;

    const NAME: &'static str = "polynomial_evaluation";

    fn rows_amount(&self) -> usize {
        self.coefficients.len()
    }

    fn generate_circuit(
        &self,
        bp: &mut Blueprint<F>,
        input: &UnaryInput,
        start_row: usize,
    ) -> BlueprintResult<ComponentOutput> {
        let [acc, x] = self.columns;
        let c = self.constant_column;

        let mut seed_shape = shape(&self.columns);
        seed_shape.push(c as u64);
        let first = bp.get_or_allocate_selector(
            SelectorSeed::new("polynomial_evaluation", &seed_shape),
            || {
                vec![
                    vec![witness::<F>(acc, 0) - constant(c, 0)],
                    vec![
                        witness::<F>(acc, 0)
                            - (witness(acc, -1) * witness(x, 0) + constant(c, 0)),
                    ],
                ]
            },
        )?;

        let layout = self.layout(start_row);
        for (i, (cells, coefficient)) in layout.iter().zip(self.horner_order()).enumerate() {
            let row = start_row + i;
            bp.assign_constant(c, row, *coefficient)?;
            let gate = if i == 0 { START } else { STEP };
            bp.enable_selector(first + gate, row)?;
            bp.add_copy_constraint(input.x, cells.x)?;
        }

        Ok(ComponentOutput {
            output: layout[layout.len() - 1].acc,
        })
    }

    fn generate_assignments(
        &self,
        assignment: &mut Assignment<F>,
        input: &UnaryInput,
        start_row: usize,
    ) -> BlueprintResult<ComponentOutput> {
        let x = assignment.cell(&input.x)?;
        let layout = self.layout(start_row);

        let mut acc = F::zero();
        for (cells, coefficient) in layout.iter().zip(self.horner_order()) {
            acc = acc * x + coefficient;
            assignment.set(&cells.acc, acc)?;
            assignment.set(&cells.x, x)?;
        }

        Ok(ComponentOutput {
            output: layout[layout.len() - 1].acc,
        })
    }
}
