//! This module implements the constraint system of a circuit: the
//! constraints, the gates enabling them, the copy constraints and the
//! selectors.
//!
//! The constraint system is only a description. Checking it against an
//! [Assignment] is done with [ConstraintSystem::verify].

use crate::{
    circuits::{
        assignment::Assignment,
        expr::ConstraintExpr,
        gate::{ConstraintHandle, CopyConstraint, Gate},
        selector::{SelectorRegistry, SelectorSeed},
        table::TableDescription,
        variable::{ColumnType, Variable},
    },
    error::{AssignmentError, CircuitError},
};
use ark_ff::{BigInteger, PrimeField};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Domain separation string of constraint system digests.
pub const DIGEST_PREFIX: &[u8; 15] = b"plonk-circuit00";

/// Represents an error found when verifying an assignment against a
/// constraint system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Some copy constrained cells have different values
    #[error("the cells {0} and {1} are copy constrained but hold different values")]
    DisconnectedWires(Variable, Variable),
    /// A constraint does not vanish on a row where its gate is enabled
    #[error("constraint {constraint} of the gate of selector {selector} is not satisfied on row {row}")]
    UnsatisfiedConstraint {
        selector: usize,
        constraint: usize,
        row: usize,
    },
    /// A gate or copy constraint reads a cell outside of the table
    #[error("a cell read on row {row} is outside of the table: {source}")]
    OutOfTable { row: usize, source: AssignmentError },
}

/// A construction step that [ConstraintSystem::rollback] may have to undo.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Change {
    Gate(usize),
    CopyConstraint(CopyConstraint),
}

/// The size of a [ConstraintSystem] at some point of its construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    constraints: usize,
    selectors: usize,
    rows: usize,
    changes: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintSystem<F: PrimeField> {
    description: TableDescription,
    constraints: Vec<ConstraintExpr<F>>,
    /// gates, indexed by their selector
    gates: BTreeMap<usize, Gate>,
    copy_constraints: BTreeSet<CopyConstraint>,
    selectors: SelectorRegistry,
    rows: usize,
    /// gates and copy constraints, in the order they were added
    changes: Vec<Change>,
}

impl<F: PrimeField> ConstraintSystem<F> {
    pub fn new(description: TableDescription) -> Self {
        ConstraintSystem {
            description,
            constraints: vec![],
            gates: BTreeMap::new(),
            copy_constraints: BTreeSet::new(),
            selectors: SelectorRegistry::default(),
            rows: 0,
            changes: vec![],
        }
    }

    pub fn description(&self) -> &TableDescription {
        &self.description
    }

    /// Number of rows of the table the circuit was built for.
    pub fn rows_amount(&self) -> usize {
        self.rows
    }

    /// Makes the circuit span at least `rows` rows. Selectors can only be
    /// enabled and cells copied on those rows.
    pub fn extend_rows(&mut self, rows: usize) {
        self.rows = self.rows.max(rows);
    }

    fn check_row(&self, row: usize) -> Result<(), CircuitError> {
        if row >= self.rows {
            return Err(CircuitError::UnallocatedRow {
                row,
                allocated: self.rows,
            });
        }
        Ok(())
    }

    pub fn selectors_amount(&self) -> usize {
        self.selectors.len()
    }

    pub fn constraints(&self) -> &[ConstraintExpr<F>] {
        &self.constraints
    }

    pub fn constraint(&self, handle: ConstraintHandle) -> Option<&ConstraintExpr<F>> {
        self.constraints.get(handle.0)
    }

    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.gates.values()
    }

    pub fn gate(&self, selector: usize) -> Option<&Gate> {
        self.gates.get(&selector)
    }

    pub fn copy_constraints(&self) -> impl Iterator<Item = &CopyConstraint> {
        self.copy_constraints.iter()
    }

    fn check_variable(&self, var: &Variable) -> Result<(), CircuitError> {
        let columns = match self.description.columns(var.kind) {
            Some(columns) => columns,
            None => self.selectors.len(),
        };
        if var.column >= columns {
            return Err(CircuitError::ColumnOutOfRange {
                kind: var.kind,
                column: var.column,
                columns,
            });
        }
        Ok(())
    }

    /// Registers a constraint, checking its degree and the columns it reads.
    pub fn add_constraint(
        &mut self,
        expr: ConstraintExpr<F>,
    ) -> Result<ConstraintHandle, CircuitError> {
        let degree = expr.degree();
        if degree > self.description.max_degree {
            return Err(CircuitError::DegreeTooHigh {
                degree,
                max_degree: self.description.max_degree,
            });
        }
        for var in expr.variables() {
            self.check_variable(&var)?;
        }
        log::trace!("constraint {}: {expr}", self.constraints.len());
        self.constraints.push(expr);
        Ok(ConstraintHandle(self.constraints.len() - 1))
    }

    /// Associates a list of constraints to an allocated selector.
    ///
    /// A selector holds at most one gate. Adding a gate made of the same
    /// expressions again is accepted and changes nothing.
    pub fn add_gate(
        &mut self,
        selector: usize,
        constraints: Vec<ConstraintHandle>,
    ) -> Result<(), CircuitError> {
        if selector >= self.selectors.len() {
            return Err(CircuitError::UnknownSelector(selector));
        }
        if constraints.is_empty() {
            return Err(CircuitError::EmptyGate(selector));
        }
        if let Some(handle) = constraints.iter().find(|h| h.0 >= self.constraints.len()) {
            return Err(CircuitError::UnknownConstraint(handle.0));
        }

        if let Some(existing) = self.gates.get(&selector) {
            let same = existing.constraints.len() == constraints.len()
                && existing
                    .constraints
                    .iter()
                    .zip(&constraints)
                    .all(|(a, b)| self.constraints[a.0] == self.constraints[b.0]);
            return if same {
                Ok(())
            } else {
                Err(CircuitError::ConflictingGate(selector))
            };
        }

        log::debug!(
            "gate on selector {selector} with {} constraints",
            constraints.len()
        );
        self.changes.push(Change::Gate(selector));
        self.gates.insert(
            selector,
            Gate {
                selector,
                constraints,
            },
        );
        Ok(())
    }

    pub fn find_selector(&self, seed: &SelectorSeed) -> Option<usize> {
        self.selectors.find(seed)
    }

    /// Reserves `gate_count` consecutive selectors for `seed` and returns the
    /// first one. Callers must look the seed up with
    /// [ConstraintSystem::find_selector] first.
    pub fn allocate_selector(
        &mut self,
        seed: SelectorSeed,
        gate_count: usize,
    ) -> Result<usize, CircuitError> {
        let first = self.selectors.allocate(seed, gate_count)?;
        log::debug!(
            "selectors {first}..{} allocated for seed {seed}",
            first + gate_count
        );
        Ok(first)
    }

    /// Enables the gate of `selector` on `row`, which must be one of the rows
    /// of the circuit.
    pub fn enable_selector(
        &self,
        assignment: &mut Assignment<F>,
        selector: usize,
        row: usize,
    ) -> Result<(), CircuitError> {
        self.check_row(row)?;
        if selector >= self.selectors.len() {
            return Err(CircuitError::UnknownSelector(selector));
        }
        assignment.extend_selectors(self.selectors.len());
        *assignment.selector_mut(selector, row)? = F::one();
        Ok(())
    }

    /// Asserts two cells are equal. Both variables must be absolute and lie in
    /// the rows of the circuit.
    pub fn add_copy_constraint(&mut self, a: Variable, b: Variable) -> Result<(), CircuitError> {
        for var in [&a, &b] {
            let row = var
                .row()
                .ok_or_else(|| CircuitError::RelativeCopyConstraint(var.to_string()))?;
            self.check_variable(var)?;
            self.check_row(row)?;
        }
        let copy = CopyConstraint::new(a, b);
        if self.copy_constraints.insert(copy) {
            self.changes.push(Change::CopyConstraint(copy));
        }
        Ok(())
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            constraints: self.constraints.len(),
            selectors: self.selectors.len(),
            rows: self.rows,
            changes: self.changes.len(),
        }
    }

    /// Undoes everything added since `checkpoint` was taken: constraints,
    /// selectors, gates, copy constraints and rows.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        for change in self.changes.drain(checkpoint.changes.min(self.changes.len())..) {
            match change {
                Change::Gate(selector) => {
                    self.gates.remove(&selector);
                }
                Change::CopyConstraint(copy) => {
                    self.copy_constraints.remove(&copy);
                }
            }
        }
        self.constraints.truncate(checkpoint.constraints);
        self.selectors.truncate(checkpoint.selectors);
        self.rows = checkpoint.rows;
        log::debug!(
            "constraint system rolled back to {} constraints, {} selectors and {} rows",
            checkpoint.constraints,
            checkpoint.selectors,
            checkpoint.rows
        );
    }

    fn check_gate(
        &self,
        gate: &Gate,
        row: usize,
        assignment: &Assignment<F>,
    ) -> Result<(), GateError> {
        for handle in &gate.constraints {
            let value = self.constraints[handle.0]
                .evaluate(assignment, row)
                .map_err(|source| GateError::OutOfTable { row, source })?;
            if !value.is_zero() {
                return Err(GateError::UnsatisfiedConstraint {
                    selector: gate.selector,
                    constraint: handle.0,
                    row,
                });
            }
        }
        Ok(())
    }

    /// This function verifies the consistency of the assignment against the
    /// copy constraints and the gates, and returns the first failure found.
    pub fn verify(&self, assignment: &Assignment<F>) -> Result<(), GateError> {
        for copy in &self.copy_constraints {
            let read = |var: &Variable| {
                assignment.cell(var).map_err(|source| GateError::OutOfTable {
                    row: var.row().unwrap_or_default(),
                    source,
                })
            };
            if read(&copy.left)? != read(&copy.right)? {
                let err = GateError::DisconnectedWires(copy.left, copy.right);
                log::debug!("{err}");
                return Err(err);
            }
        }

        let enabled: Vec<(&Gate, usize)> = self
            .gates
            .values()
            .flat_map(|gate| {
                assignment
                    .enabled_rows(gate.selector)
                    .into_iter()
                    .map(move |row| (gate, row))
            })
            .collect();

        match enabled
            .par_iter()
            .find_map_first(|(gate, row)| self.check_gate(gate, *row, assignment).err())
        {
            Some(err) => {
                log::debug!("{err}");
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Whether every enabled gate vanishes and every copy constraint holds.
    pub fn is_satisfied(&self, assignment: &Assignment<F>) -> bool {
        self.verify(assignment).is_ok()
    }

    /// Returns a SHA-256 fingerprint of the constraint system. Two systems
    /// built by the same sequence of operations have the same digest.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(DIGEST_PREFIX);

        let desc = &self.description;
        for n in [
            desc.witness_columns,
            desc.public_input_columns,
            desc.constant_columns,
            desc.max_degree,
            desc.usable_rows.unwrap_or(0),
            self.selectors.len(),
            self.rows,
        ] {
            hasher.update((n as u64).to_le_bytes());
        }

        hasher.update((self.constraints.len() as u64).to_le_bytes());
        for expr in &self.constraints {
            for (monomial, coeff) in expr.monomials() {
                hasher.update((monomial.degree() as u64).to_le_bytes());
                for var in monomial.variables() {
                    hash_variable(&mut hasher, var);
                }
                hasher.update(coeff.into_bigint().to_bytes_le());
            }
            hasher.update([0xff]);
        }

        for gate in self.gates.values() {
            hasher.update((gate.selector as u64).to_le_bytes());
            hasher.update((gate.constraints.len() as u64).to_le_bytes());
            for handle in &gate.constraints {
                hasher.update((handle.0 as u64).to_le_bytes());
            }
        }

        for copy in &self.copy_constraints {
            hash_variable(&mut hasher, &copy.left);
            hash_variable(&mut hasher, &copy.right);
        }

        hasher.finalize().into()
    }
}

fn hash_variable(hasher: &mut Sha256, var: &Variable) {
    let kind: u8 = match var.kind {
        ColumnType::Witness => 0,
        ColumnType::PublicInput => 1,
        ColumnType::Constant => 2,
        ColumnType::Selector => 3,
    };
    hasher.update([kind, var.absolute as u8]);
    hasher.update((var.column as u64).to_le_bytes());
    hasher.update((var.offset as i64).to_le_bytes());
}
