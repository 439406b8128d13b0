//! Bit decomposition
//!
//! Decomposes `x` into `n` bits, `k` bits per row, most significant bits
//! first. Column 0 holds an accumulator which starts at zero and absorbs `k`
//! bits per row, so that the last row holds `x` itself.
//!
//! Layout (`k` = 2)
//!
//! | row   | w0          | w1          | w2          |
//! | ----- | ----------- | ----------- | ----------- |
//! |   0   | `0`         | `b_{n-1}`   | `b_{n-2}`   |
//! |   1   | `acc_1`     | `b_{n-3}`   | `b_{n-4}`   |
//! |   ... |             |             |             |
//! |   n/k | `x` (copy)  |             |             |
//!
//! Constraints
//!
//!   start) w0
//!   step)  w_j * (w_j - 1) for j in 1..=k,
//!          Next(w0) - (2^k * w0 + sum_j 2^(k-j) * w_j)

use crate::{
    blueprint::Blueprint,
    circuits::{
        assignment::Assignment,
        expr::ConstraintExpr,
        selector::SelectorSeed,
        variable::{ColumnType, Variable},
    },
    components::{witness, Component, UnaryInput},
    error::{BlueprintError, BlueprintResult},
    field_helpers::{two_pow, FieldHelpers},
};
use ark_ff::PrimeField;

const START: usize = 0;
const STEP: usize = 1;

/// Decomposes a value into `bits` bits, `chunk` of them per row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitDecomposition {
    bits: usize,
    chunk: usize,
}

/// Cells of a [BitDecomposition] instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitDecompositionLayout {
    /// The accumulator of every row, the last one being the decomposed value
    pub accumulators: Vec<Variable>,
    /// The bits, most significant first
    pub bits: Vec<Variable>,
}

/// The bits of the decomposed value, most significant first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitDecompositionOutput {
    pub bits: Vec<Variable>,
}

impl BitDecomposition {
    pub fn new(bits: usize, chunk: usize) -> BlueprintResult<Self> {
        if bits == 0 || chunk == 0 || bits % chunk != 0 {
            return Err(BlueprintError::precondition(
                "bit_decomposition",
                format!("{bits} bits cannot be split in rows of {chunk} bits"),
            ));
        }
        Ok(BitDecomposition { bits, chunk })
    }

    pub fn layout(&self, start_row: usize) -> BitDecompositionLayout {
        let rows = self.bits / self.chunk;
        let accumulators = (0..=rows)
            .map(|i| Variable::absolute(ColumnType::Witness, 0, start_row + i))
            .collect();
        let bits = (0..self.bits)
            .map(|i| {
                let (row, j) = (i / self.chunk, i % self.chunk);
                Variable::absolute(ColumnType::Witness, 1 + j, start_row + row)
            })
            .collect();
        BitDecompositionLayout { accumulators, bits }
    }
}

impl<F: PrimeField> Component<F> for BitDecomposition {
    type Input = UnaryInput;
    type Output = BitDecompositionOutput;

    const NAME: &'static str = "bit_decomposition";

    fn rows_amount(&self) -> usize {
        self.bits / self.chunk + 1
    }

    fn check_parameters(&self) -> BlueprintResult<()> {
        // A decomposition as wide as the field is not unique
        if self.bits >= F::MODULUS_BIT_SIZE as usize {
            return Err(BlueprintError::precondition(
                "bit_decomposition",
                format!(
                    "{} bits do not fit in a field of {} bits",
                    self.bits,
                    F::MODULUS_BIT_SIZE
                ),
            ));
        }
        Ok(())
    }

    fn generate_circuit(
        &self,
        bp: &mut Blueprint<F>,
        input: &UnaryInput,
        start_row: usize,
    ) -> BlueprintResult<BitDecompositionOutput> {
        Component::<F>::check_parameters(self)?;

        let k = self.chunk;
        let first = bp.get_or_allocate_selector(
            SelectorSeed::new("bit_decomposition", &[k as u64]),
            || {
                let mut step: Vec<ConstraintExpr<F>> = (1..=k)
                    .map(|j| {
                        let b = witness::<F>(j, 0);
                        &b * (&b - ConstraintExpr::constant(F::one()))
                    })
                    .collect();
                let packed = witness::<F>(0, 0).scale(two_pow(k))
                    + (0..k)
                        .map(|j| witness::<F>(1 + j, 0).scale(two_pow(k - 1 - j)))
                        .sum::<ConstraintExpr<F>>();
                step.push(witness(0, 1) - packed);
                vec![vec![witness(0, 0)], step]
            },
        )?;

        let layout = self.layout(start_row);
        bp.enable_selector(first + START, start_row)?;
        for row in start_row..start_row + self.bits / k {
            bp.enable_selector(first + STEP, row)?;
        }
        if let Some(value) = layout.accumulators.last() {
            bp.add_copy_constraint(input.x, *value)?;
        }

        Ok(BitDecompositionOutput { bits: layout.bits })
    }

    fn generate_assignments(
        &self,
        assignment: &mut Assignment<F>,
        input: &UnaryInput,
        start_row: usize,
    ) -> BlueprintResult<BitDecompositionOutput> {
        let x = assignment.cell(&input.x)?;
        if !x.fits_in_bits(self.bits) {
            return Err(BlueprintError::precondition(
                "bit_decomposition",
                format!("the value does not fit in {} bits", self.bits),
            ));
        }

        let layout = self.layout(start_row);
        let le_bits = x.to_bits_le();
        let bits = (0..self.bits)
            .rev()
            .map(|i| le_bits.get(i).copied().unwrap_or(false));

        let mut acc = F::zero();
        assignment.set(&layout.accumulators[0], acc)?;
        for (i, (bit, cell)) in bits.zip(&layout.bits).enumerate() {
            let bit = if bit { F::one() } else { F::zero() };
            assignment.set(cell, bit)?;
            acc = acc.double() + bit;
            if (i + 1) % self.chunk == 0 {
                assignment.set(&layout.accumulators[(i + 1) / self.chunk], acc)?;
            }
        }

        Ok(BitDecompositionOutput { bits: layout.bits })
    }
}
