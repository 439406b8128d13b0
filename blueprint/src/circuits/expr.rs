//! This module implements the constraint expressions stored in gates.
//!
//! An expression is a sparse sum of monomials. A [Monomial] is a sorted
//! multiset of [Variable]s and maps to a non-zero coefficient. Every
//! operation returns a canonical expression: identical monomials are merged
//! and zero coefficients are removed, so two expressions describing the same
//! polynomial are equal.

use crate::{
    circuits::{assignment::Assignment, variable::Variable},
    error::AssignmentError,
};
use ark_ff::PrimeField;
use std::{
    collections::{btree_map::Entry, BTreeMap, BTreeSet},
    fmt,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub},
};

/// A product of variables. The empty product is the constant monomial.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Monomial(Vec<Variable>);

impl Monomial {
    pub fn new(mut variables: Vec<Variable>) -> Self {
        variables.sort();
        Monomial(variables)
    }

    pub fn degree(&self) -> usize {
        self.0.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.0
    }

    fn product(&self, other: &Monomial) -> Monomial {
        let mut variables = Vec::with_capacity(self.0.len() + other.0.len());
        variables.extend_from_slice(&self.0);
        variables.extend_from_slice(&other.0);
        Monomial::new(variables)
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vars: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", vars.join("*"))
    }
}

/// A polynomial over the cells of the table, required to vanish on the rows a
/// gate is enabled on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintExpr<F: PrimeField> {
    monomials: BTreeMap<Monomial, F>,
}

impl<F: PrimeField> Default for ConstraintExpr<F> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<F: PrimeField> ConstraintExpr<F> {
    pub fn zero() -> Self {
        ConstraintExpr {
            monomials: BTreeMap::new(),
        }
    }

    /// Degree 0 expression.
    pub fn constant(c: F) -> Self {
        let mut expr = Self::zero();
        expr.accumulate(Monomial::default(), c);
        expr
    }

    /// Degree 1 expression.
    pub fn variable(v: Variable) -> Self {
        let mut expr = Self::zero();
        expr.accumulate(Monomial(vec![v]), F::one());
        expr
    }

    // Keeps the map free of zero coefficients.
    fn accumulate(&mut self, monomial: Monomial, coeff: F) {
        match self.monomials.entry(monomial) {
            Entry::Vacant(entry) => {
                if !coeff.is_zero() {
                    entry.insert(coeff);
                }
            }
            Entry::Occupied(mut entry) => {
                *entry.get_mut() += coeff;
                if entry.get().is_zero() {
                    entry.remove();
                }
            }
        }
    }

    /// Iterates over the monomials and their coefficients, in canonical order.
    pub fn monomials(&self) -> impl Iterator<Item = (&Monomial, &F)> {
        self.monomials.iter()
    }

    /// The size of the largest monomial.
    pub fn degree(&self) -> usize {
        self.monomials.keys().map(Monomial::degree).max().unwrap_or(0)
    }

    /// The distinct variables appearing in the expression.
    pub fn variables(&self) -> BTreeSet<Variable> {
        self.monomials
            .keys()
            .flat_map(|m| m.variables().iter().copied())
            .collect()
    }

    pub fn is_zero(&self) -> bool {
        self.monomials.is_empty()
    }

    pub fn is_constant(&self) -> bool {
        self.degree() == 0
    }

    /// Multiplies every coefficient by `c`.
    pub fn scale(&self, c: F) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        ConstraintExpr {
            monomials: self
                .monomials
                .iter()
                .map(|(m, coeff)| (m.clone(), *coeff * c))
                .collect(),
        }
    }

    pub fn pow(&self, n: u64) -> Self {
        let mut acc = Self::constant(F::one());
        for _ in 0..n {
            acc = &acc * self;
        }
        acc
    }

    /// Evaluates the expression, reading variables through `value`.
    pub fn evaluate_with<E>(
        &self,
        mut value: impl FnMut(&Variable) -> Result<F, E>,
    ) -> Result<F, E> {
        let mut acc = F::zero();
        for (monomial, coeff) in &self.monomials {
            let mut term = *coeff;
            for var in monomial.variables() {
                term *= value(var)?;
            }
            acc += term;
        }
        Ok(acc)
    }

    /// Evaluates the expression on `row` of the assignment. Relative
    /// variables are read at `row + offset`.
    pub fn evaluate(&self, assignment: &Assignment<F>, row: usize) -> Result<F, AssignmentError> {
        self.evaluate_with(|var| assignment.value_at(var, row))
    }
}

impl<F: PrimeField> From<Variable> for ConstraintExpr<F> {
    fn from(v: Variable) -> Self {
        Self::variable(v)
    }
}

impl<F: PrimeField> Add<&ConstraintExpr<F>> for &ConstraintExpr<F> {
    type Output = ConstraintExpr<F>;

    fn add(self, other: &ConstraintExpr<F>) -> ConstraintExpr<F> {
        let mut res = self.clone();
        for (monomial, coeff) in &other.monomials {
            res.accumulate(monomial.clone(), *coeff);
        }
        res
    }
}

impl<F: PrimeField> Sub<&ConstraintExpr<F>> for &ConstraintExpr<F> {
    type Output = ConstraintExpr<F>;

    fn sub(self, other: &ConstraintExpr<F>) -> ConstraintExpr<F> {
        let mut res = self.clone();
        for (monomial, coeff) in &other.monomials {
            res.accumulate(monomial.clone(), -*coeff);
        }
        res
    }
}

impl<F: PrimeField> Mul<&ConstraintExpr<F>> for &ConstraintExpr<F> {
    type Output = ConstraintExpr<F>;

    fn mul(self, other: &ConstraintExpr<F>) -> ConstraintExpr<F> {
        let mut res = ConstraintExpr::zero();
        for (m1, c1) in &self.monomials {
            for (m2, c2) in &other.monomials {
                res.accumulate(m1.product(m2), *c1 * c2);
            }
        }
        res
    }
}

impl<F: PrimeField> Neg for &ConstraintExpr<F> {
    type Output = ConstraintExpr<F>;

    fn neg(self) -> ConstraintExpr<F> {
        ConstraintExpr {
            monomials: self
                .monomials
                .iter()
                .map(|(m, c)| (m.clone(), -*c))
                .collect(),
        }
    }
}

impl<F: PrimeField> Neg for ConstraintExpr<F> {
    type Output = ConstraintExpr<F>;

    fn neg(self) -> ConstraintExpr<F> {
        -&self
    }
}

// Owned and mixed variants of the binary operators, all going through the
// by-reference implementation.
macro_rules! forward_binop {
    ($trait:ident, $method:ident) => {
        impl<F: PrimeField> $trait<ConstraintExpr<F>> for ConstraintExpr<F> {
            type Output = ConstraintExpr<F>;

            fn $method(self, other: ConstraintExpr<F>) -> ConstraintExpr<F> {
                (&self).$method(&other)
            }
        }

        impl<F: PrimeField> $trait<&ConstraintExpr<F>> for ConstraintExpr<F> {
            type Output = ConstraintExpr<F>;

            fn $method(self, other: &ConstraintExpr<F>) -> ConstraintExpr<F> {
                (&self).$method(other)
            }
        }

        impl<F: PrimeField> $trait<ConstraintExpr<F>> for &ConstraintExpr<F> {
            type Output = ConstraintExpr<F>;

            fn $method(self, other: ConstraintExpr<F>) -> ConstraintExpr<F> {
                self.$method(&other)
            }
        }

        impl<F: PrimeField> $trait<Variable> for ConstraintExpr<F> {
            type Output = ConstraintExpr<F>;

            fn $method(self, other: Variable) -> ConstraintExpr<F> {
                (&self).$method(&ConstraintExpr::variable(other))
            }
        }

        impl<F: PrimeField> $trait<Variable> for &ConstraintExpr<F> {
            type Output = ConstraintExpr<F>;

            fn $method(self, other: Variable) -> ConstraintExpr<F> {
                self.$method(&ConstraintExpr::variable(other))
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

impl<F: PrimeField> Sum for ConstraintExpr<F> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, e| acc + e)
    }
}

impl<F: PrimeField> fmt::Display for ConstraintExpr<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let terms: Vec<String> = self
            .monomials
            .iter()
            .map(|(m, c)| match (m.degree(), c.is_one()) {
                (0, _) => c.to_string(),
                (_, true) => m.to_string(),
                (_, false) => format!("{c}*{m}"),
            })
            .collect();
        write!(f, "{}", terms.join(" + "))
    }
}
