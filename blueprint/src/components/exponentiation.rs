//! Exponentiation by a fixed exponent
//!
//! `x^e` is computed by square-and-multiply, scanning the bits of `e` from
//! the most significant one. Row `i` holds the accumulator after the first
//! `i + 1` bits, so the component uses as many rows as `e` has bits. Every row
//! also holds the base `x`.
//!
//! Three gates are involved:
//! - `start`, on the first row: the accumulator is the base (the leading bit
//!   of `e` is always set)
//! - `square`, on row `i` when bit `i + 1` is not set
//! - `square_mul`, on row `i` when bit `i + 1` is set
//!
//! Layout (default column mapping)
//!
//! | row     | w0        | w1         |
//! | ------- | --------- | ---------- |
//! |   0     | `x`       | `x` (copy) |
//! |   i     | `acc_i`   | `x`        |
//! |   n - 1 | `x^e`     | `x`        |
//!
//! Constraints
//!
//!   start)      w0 - w1
//!   square)     Next(w0) - w0^2, Next(w1) - w1
//!   square_mul) Next(w0) - w0^2 * w1, Next(w1) - w1

use crate::{
    blueprint::Blueprint,
    circuits::{
        assignment::Assignment,
        selector::SelectorSeed,
        variable::{ColumnType, Variable},
    },
    components::{check_columns, shape, witness, Component, ComponentOutput, UnaryInput},
    error::{BlueprintError, BlueprintResult},
};
use ark_ff::PrimeField;

// Offsets of the gates in the selector block
const START: usize = 0;
const SQUARE: usize = 1;
const SQUARE_MUL: usize = 2;

/// Computes `x^e` for a fixed exponent `e >= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exponentiation {
    exponent: u64,
    columns: [usize; 2],
}

impl Exponentiation {
    pub fn new(exponent: u64) -> BlueprintResult<Self> {
        Self::with_columns(exponent, [0, 1])
    }

    pub fn with_columns(exponent: u64, columns: [usize; 2]) -> BlueprintResult<Self> {
        if exponent == 0 {
            return Err(BlueprintError::precondition(
                "exponentiation",
                "the exponent must be at least 1",
            ));
        }
        check_columns("exponentiation", &columns)?;
        Ok(Exponentiation { exponent, columns })
    }

    /// Bits of the exponent, most significant first.
    fn bits(&self) -> Vec<bool> {
        let len = 64 - self.exponent.leading_zeros();
        (0..len)
            .rev()
            .map(|i| (self.exponent >> i) & 1 == 1)
            .collect()
    }

    /// Accumulator and base cells of every row.
    pub fn layout(&self, start_row: usize) -> Vec<(Variable, Variable)> {
        let [acc, base] = self.columns;
        (start_row..start_row + self.bits().len())
            .map(|row| {
                (
                    Variable::absolute(ColumnType::Witness, acc, row),
                    Variable::absolute(ColumnType::Witness, base, row),
                )
            })
            .collect()
    }
}

impl<F: PrimeField> Component<F> for Exponentiation {
    type Input = UnaryInput;
    type Output = ComponentOutput;

    const NAME: &'static str = "exponentiation";

    fn rows_amount(&self) -> usize {
        self.bits().len()
    }

    fn generate_circuit(
        &self,
        bp: &mut Blueprint<F>,
        input: &UnaryInput,
        start_row: usize,
    ) -> BlueprintResult<ComponentOutput> {
        let [acc, base] = self.columns;
        let first = bp.get_or_allocate_selector(
            SelectorSeed::new("exponentiation", &shape(&self.columns)),
            || {
                let same_base = witness::<F>(base, 1) - witness(base, 0);
                vec![
                    vec![witness(acc, 0) - witness(base, 0)],
                    vec![witness(acc, 1) - witness(acc, 0).pow(2), same_base.clone()],
                    vec![
                        witness(acc, 1) - witness(acc, 0).pow(2) * witness(base, 0),
                        same_base,
                    ],
                ]
            },
        )?;

        let layout = self.layout(start_row);
        bp.enable_selector(first + START, start_row)?;
        for (i, bit) in self.bits().into_iter().enumerate().skip(1) {
            let gate = if bit { SQUARE_MUL } else { SQUARE };
            // the transition into row i is checked on row i - 1
            bp.enable_selector(first + gate, start_row + i - 1)?;
        }
        bp.add_copy_constraint(input.x, layout[0].1)?;

        Ok(ComponentOutput {
            output: layout[layout.len() - 1].0,
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

        let mut value = x;
        for ((acc, base), (i, bit)) in layout.iter().zip(self.bits().into_iter().enumerate()) {
            if i > 0 {
                value.square_in_place();
                if bit {
                    value *= x;
                }
            }
            assignment.set(acc, value)?;
            assignment.set(base, x)?;
        }

        Ok(ComponentOutput {
            output: layout[layout.len() - 1].0,
        })
    }
}
