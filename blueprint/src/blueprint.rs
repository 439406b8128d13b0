//! This module implements the [Blueprint], the context threading the
//! constraint system and the assignment table through the construction of a
//! circuit.
//!
//! The blueprint owns the row cursor. Rows are handed out in contiguous
//! blocks by [Blueprint::allocate_rows] and never twice, so that components
//! written independently can be composed without overlapping.
//!
//! A component that fails leaves no trace: [Blueprint::add_component] rolls
//! the constraint system, the assignment and the row cursor back to their
//! state before the call.

use crate::{
    circuits::{
        assignment::Assignment,
        constraint_system::{Checkpoint, ConstraintSystem, GateError},
        expr::ConstraintExpr,
        gate::ConstraintHandle,
        selector::SelectorSeed,
        table::TableDescription,
        variable::{ColumnType, Variable},
    },
    components::Component,
    error::{BlueprintError, BlueprintResult, CircuitError},
};
use ark_ff::PrimeField;

/// The construction context of a circuit.
#[derive(Clone, Debug)]
pub struct Blueprint<F: PrimeField> {
    cs: ConstraintSystem<F>,
    assignment: Assignment<F>,
    /// first row that was never allocated
    next_row: usize,
    /// next free row of each public input column
    public_input_rows: Vec<usize>,
}

/// State restored when a component fails.
struct BlueprintCheckpoint {
    circuit: Checkpoint,
    next_row: usize,
    public_input_rows: Vec<usize>,
}

impl<F: PrimeField> Blueprint<F> {
    pub fn new(description: TableDescription) -> Result<Self, CircuitError> {
        let description = description.build()?;
        Ok(Blueprint {
            public_input_rows: vec![0; description.public_input_columns],
            cs: ConstraintSystem::new(description.clone()),
            assignment: Assignment::new(description),
            next_row: 0,
        })
    }

    pub fn description(&self) -> &TableDescription {
        self.cs.description()
    }

    /// Number of rows allocated so far.
    pub fn rows_amount(&self) -> usize {
        self.next_row
    }

    pub fn constraint_system(&self) -> &ConstraintSystem<F> {
        &self.cs
    }

    pub fn assignment(&self) -> &Assignment<F> {
        &self.assignment
    }

    pub fn assignment_mut(&mut self) -> &mut Assignment<F> {
        &mut self.assignment
    }

    /// Reserves `n` fresh rows and returns the first one.
    pub fn allocate_rows(&mut self, n: usize) -> Result<usize, CircuitError> {
        let start = self.next_row;
        let usable_rows = self.description().row_limit();
        let end = start
            .checked_add(n)
            .filter(|end| *end <= usable_rows)
            .ok_or(CircuitError::RowBudgetExceeded {
                requested: n,
                available: usable_rows.saturating_sub(start),
            })?;
        self.assignment.extend_rows(end)?;
        self.cs.extend_rows(end);
        self.next_row = end;
        log::debug!("rows {start}..{end} allocated");
        Ok(start)
    }

    fn check_allocated(&self, row: usize) -> Result<(), CircuitError> {
        if row >= self.next_row {
            return Err(CircuitError::UnallocatedRow {
                row,
                allocated: self.next_row,
            });
        }
        Ok(())
    }

    pub fn add_constraint(
        &mut self,
        expr: ConstraintExpr<F>,
    ) -> Result<ConstraintHandle, CircuitError> {
        self.cs.add_constraint(expr)
    }

    pub fn add_gate(
        &mut self,
        selector: usize,
        constraints: Vec<ConstraintHandle>,
    ) -> Result<(), CircuitError> {
        self.cs.add_gate(selector, constraints)
    }

    pub fn find_selector(&self, seed: &SelectorSeed) -> Option<usize> {
        self.cs.find_selector(seed)
    }

    pub fn allocate_selector(
        &mut self,
        seed: SelectorSeed,
        gate_count: usize,
    ) -> Result<usize, CircuitError> {
        self.cs.allocate_selector(seed, gate_count)
    }

    /// Returns the first selector of the block allocated for `seed`.
    ///
    /// On the first call for a seed, `build_gates` is invoked and one selector
    /// is allocated for each of the gates it returns, in order. If one of the
    /// gates is rejected, none of them is registered.
    pub fn get_or_allocate_selector(
        &mut self,
        seed: SelectorSeed,
        build_gates: impl FnOnce() -> Vec<Vec<ConstraintExpr<F>>>,
    ) -> Result<usize, CircuitError> {
        if let Some(selector) = self.find_selector(&seed) {
            return Ok(selector);
        }

        let checkpoint = self.cs.checkpoint();
        self.register_gates(seed, build_gates()).map_err(|err| {
            self.cs.rollback(checkpoint);
            err
        })
    }

    fn register_gates(
        &mut self,
        seed: SelectorSeed,
        gates: Vec<Vec<ConstraintExpr<F>>>,
    ) -> Result<usize, CircuitError> {
        if gates.is_empty() {
            return Err(CircuitError::EmptySelectorBlock);
        }
        let gates = gates
            .into_iter()
            .map(|constraints| {
                constraints
                    .into_iter()
                    .map(|expr| self.cs.add_constraint(expr))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let first = self.cs.allocate_selector(seed, gates.len())?;
        for (i, handles) in gates.into_iter().enumerate() {
            self.cs.add_gate(first + i, handles)?;
        }
        Ok(first)
    }

    /// Enables the gate of `selector` on an allocated row.
    pub fn enable_selector(&mut self, selector: usize, row: usize) -> Result<(), CircuitError> {
        self.cs.enable_selector(&mut self.assignment, selector, row)
    }

    /// Asserts two cells are equal. Both cells must be absolute and lie in
    /// allocated rows.
    pub fn add_copy_constraint(&mut self, a: Variable, b: Variable) -> Result<(), CircuitError> {
        self.cs.add_copy_constraint(a, b)
    }

    /// Writes `value` in a constant column. Constant columns are part of the
    /// circuit: they are only written during the circuit phase.
    pub fn assign_constant(
        &mut self,
        column: usize,
        row: usize,
        value: F,
    ) -> Result<Variable, CircuitError> {
        self.check_allocated(row)?;
        *self.assignment.constant_mut(column, row)? = value;
        Ok(Variable::absolute(ColumnType::Constant, column, row))
    }

    /// Appends `value` to a public input column, allocating a row if the
    /// column already fills every allocated row.
    pub fn add_public_input(&mut self, column: usize, value: F) -> Result<Variable, CircuitError> {
        let columns = self.public_input_rows.len();
        let row = *self
            .public_input_rows
            .get(column)
            .ok_or(CircuitError::ColumnOutOfRange {
                kind: ColumnType::PublicInput,
                column,
                columns,
            })?;
        if row >= self.next_row {
            self.allocate_rows(row + 1 - self.next_row)?;
        }
        *self.assignment.public_input_mut(column, row)? = value;
        self.public_input_rows[column] += 1;
        Ok(Variable::absolute(ColumnType::PublicInput, column, row))
    }

    /// Allocates the rows of `component` and runs both of its phases on them.
    ///
    /// On error, everything the component added is removed and the blueprint
    /// can still be used.
    pub fn add_component<C: Component<F>>(
        &mut self,
        component: &C,
        input: &C::Input,
    ) -> BlueprintResult<C::Output> {
        component.check_parameters()?;

        let checkpoint = self.checkpoint();
        self.run_component(component, input).map_err(|err| {
            log::debug!("{} failed, rolling back: {err}", C::NAME);
            self.rollback(checkpoint);
            err
        })
    }

    fn run_component<C: Component<F>>(
        &mut self,
        component: &C,
        input: &C::Input,
    ) -> BlueprintResult<C::Output> {
        let start_row = self.allocate_rows(component.rows_amount())?;
        log::debug!(
            "{} on rows {start_row}..{}",
            C::NAME,
            start_row + component.rows_amount()
        );

        let circuit_output = component.generate_circuit(self, input, start_row)?;
        let assignment_output =
            component.generate_assignments(&mut self.assignment, input, start_row)?;

        if circuit_output != assignment_output {
            return Err(BlueprintError::PhaseMismatch { component: C::NAME });
        }
        Ok(circuit_output)
    }

    fn checkpoint(&self) -> BlueprintCheckpoint {
        BlueprintCheckpoint {
            circuit: self.cs.checkpoint(),
            next_row: self.next_row,
            public_input_rows: self.public_input_rows.clone(),
        }
    }

    // Cells written in rows allocated before the checkpoint are kept.
    fn rollback(&mut self, checkpoint: BlueprintCheckpoint) {
        self.cs.rollback(checkpoint.circuit);
        self.assignment
            .truncate(checkpoint.next_row, self.cs.selectors_amount());
        self.next_row = checkpoint.next_row;
        self.public_input_rows = checkpoint.public_input_rows;
    }

    pub fn verify(&self) -> Result<(), GateError> {
        self.cs.verify(&self.assignment)
    }

    pub fn is_satisfied(&self) -> bool {
        self.cs.is_satisfied(&self.assignment)
    }

    /// Ends the construction, returning the constraint system and its
    /// assignment.
    pub fn finalize(self) -> (ConstraintSystem<F>, Assignment<F>) {
        (self.cs, self.assignment)
    }
}
