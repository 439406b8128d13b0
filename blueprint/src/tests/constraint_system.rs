use crate::{
    blueprint::Blueprint,
    circuits::{
        assignment::Assignment,
        constraint_system::{ConstraintSystem, GateError},
        expr::ConstraintExpr,
        selector::SelectorSeed,
        table::{TableDescription, DEFAULT_MAX_DEGREE, MAX_ROWS},
        variable::{ColumnType, Variable},
    },
    components::{Addition, BinaryInput},
    error::{AssignmentError, CircuitError},
    tests::framework::{init_logger, TestFramework, F7},
};
use ark_ff::{One, Zero};

fn w(column: usize, offset: isize) -> ConstraintExpr<F7> {
    Variable::witness(column, offset).into()
}

fn blueprint(description: TableDescription) -> Blueprint<F7> {
    init_logger();
    Blueprint::new(description).unwrap()
}

#[test]
fn test_degree_is_checked() {
    let mut bp = blueprint(TableDescription::new(2).max_degree(2));
    assert!(bp.add_constraint(w(0, 0) * w(1, 0)).is_ok());
    assert_eq!(
        bp.add_constraint(w(0, 0) * w(1, 0) * w(1, 1)),
        Err(CircuitError::DegreeTooHigh {
            degree: 3,
            max_degree: 2
        })
    );
}

#[test]
fn test_columns_are_checked() {
    let mut bp = blueprint(TableDescription::new(2));
    assert_eq!(
        bp.add_constraint(w(2, 0)),
        Err(CircuitError::ColumnOutOfRange {
            kind: ColumnType::Witness,
            column: 2,
            columns: 2
        })
    );
    assert!(matches!(
        bp.add_constraint(Variable::constant(0, 0).into()),
        Err(CircuitError::ColumnOutOfRange {
            kind: ColumnType::Constant,
            ..
        })
    ));
    // Selector columns exist once allocated
    assert!(bp.add_constraint(Variable::selector(0, 0).into()).is_err());
    bp.allocate_selector(SelectorSeed::new("test", &[]), 1).unwrap();
    assert!(bp.add_constraint(Variable::selector(0, 0).into()).is_ok());
}

#[test]
fn test_gates() {
    let mut bp = blueprint(TableDescription::new(3));
    let seed = SelectorSeed::new("test", &[1, 2]);
    assert_eq!(bp.find_selector(&seed), None);
    let selector = bp.allocate_selector(seed, 1).unwrap();
    assert_eq!(bp.find_selector(&seed), Some(selector));

    let sum = bp.add_constraint(w(0, 0) + w(1, 0) - w(2, 0)).unwrap();
    let same_sum = bp.add_constraint(w(1, 0) - w(2, 0) + w(0, 0)).unwrap();
    let product = bp.add_constraint(w(0, 0) * w(1, 0) - w(2, 0)).unwrap();

    assert_eq!(bp.add_gate(selector, vec![]), Err(CircuitError::EmptyGate(selector)));
    assert_eq!(
        bp.add_gate(selector + 1, vec![sum]),
        Err(CircuitError::UnknownSelector(selector + 1))
    );
    assert!(bp.add_gate(selector, vec![sum]).is_ok());
    // The same expressions again
    assert!(bp.add_gate(selector, vec![same_sum]).is_ok());
    assert_eq!(
        bp.add_gate(selector, vec![product]),
        Err(CircuitError::ConflictingGate(selector))
    );
    assert_eq!(
        bp.constraint_system().gate(selector).map(|g| g.constraints.clone()),
        Some(vec![sum])
    );

    assert_eq!(
        bp.allocate_selector(seed, 1),
        Err(CircuitError::DuplicateSelectorSeed(seed))
    );
    assert_eq!(
        bp.allocate_selector(SelectorSeed::new("other", &[]), 0),
        Err(CircuitError::EmptySelectorBlock)
    );
}

#[test]
fn test_selectors_need_allocated_rows() {
    let mut bp = blueprint(TableDescription::new(3));
    let selector = bp.allocate_selector(SelectorSeed::new("test", &[]), 1).unwrap();
    assert_eq!(
        bp.enable_selector(selector, 0),
        Err(CircuitError::UnallocatedRow {
            row: 0,
            allocated: 0
        })
    );
    bp.allocate_rows(1).unwrap();
    assert!(bp.enable_selector(selector, 0).is_ok());
    assert_eq!(
        bp.enable_selector(selector + 1, 0),
        Err(CircuitError::UnknownSelector(selector + 1))
    );
    assert_eq!(bp.assignment().selector(selector, 0), Ok(F7::one()));
}

#[test]
fn test_copy_constraints_are_checked() {
    let mut bp = blueprint(TableDescription::new(2));
    let start = bp.allocate_rows(2).unwrap();
    assert_eq!(start, 0);

    let a = Variable::absolute(ColumnType::Witness, 0, 0);
    let b = Variable::absolute(ColumnType::Witness, 1, 1);
    assert!(bp.add_copy_constraint(a, b).is_ok());
    // The pair is unordered
    assert!(bp.add_copy_constraint(b, a).is_ok());
    assert_eq!(bp.constraint_system().copy_constraints().count(), 1);

    assert_eq!(
        bp.add_copy_constraint(a, Variable::absolute(ColumnType::Witness, 0, 2)),
        Err(CircuitError::UnallocatedRow {
            row: 2,
            allocated: 2
        })
    );
    assert!(matches!(
        bp.add_copy_constraint(a, Variable::witness(1, 0)),
        Err(CircuitError::RelativeCopyConstraint(_))
    ));
    assert!(matches!(
        bp.add_copy_constraint(a, Variable::absolute(ColumnType::Witness, 2, 0)),
        Err(CircuitError::ColumnOutOfRange { .. })
    ));
}

#[test]
fn test_circuit_rows_are_checked() {
    let description = TableDescription::new(2);
    let mut cs = ConstraintSystem::<F7>::new(description.clone());
    let mut assignment = Assignment::<F7>::new(description);
    let a = Variable::absolute(ColumnType::Witness, 0, 1000);
    let b = Variable::absolute(ColumnType::Witness, 1, 5000);

    assert_eq!(
        cs.add_copy_constraint(a, b),
        Err(CircuitError::UnallocatedRow {
            row: 1000,
            allocated: 0
        })
    );
    let selector = cs.allocate_selector(SelectorSeed::new("test", &[]), 1).unwrap();
    assert_eq!(
        cs.enable_selector(&mut assignment, selector, 77),
        Err(CircuitError::UnallocatedRow {
            row: 77,
            allocated: 0
        })
    );
    assert_eq!(assignment.rows_amount(), 0);
    assert_eq!(cs.copy_constraints().count(), 0);

    cs.extend_rows(5001);
    assignment.extend_rows(5001).unwrap();
    assert!(cs.add_copy_constraint(a, b).is_ok());
    assert!(cs.enable_selector(&mut assignment, selector, 77).is_ok());
    assert_eq!(assignment.enabled_rows(selector), vec![77]);
}

#[test]
fn test_rejected_gates_are_not_registered() {
    let mut bp = blueprint(TableDescription::new(2));
    let digest = bp.constraint_system().digest();
    let seed = SelectorSeed::new("test", &[]);

    // The second gate reads a column the table does not have
    assert_eq!(
        bp.get_or_allocate_selector(seed, || vec![vec![w(0, 0)], vec![w(5, 0)]]),
        Err(CircuitError::ColumnOutOfRange {
            kind: ColumnType::Witness,
            column: 5,
            columns: 2
        })
    );
    assert_eq!(
        bp.get_or_allocate_selector(seed, Vec::new),
        Err(CircuitError::EmptySelectorBlock)
    );
    assert_eq!(
        bp.get_or_allocate_selector(seed, || vec![vec![w(0, 0)], vec![]]),
        Err(CircuitError::EmptyGate(1))
    );

    let cs = bp.constraint_system();
    assert!(cs.constraints().is_empty());
    assert_eq!(cs.selectors_amount(), 0);
    assert_eq!(cs.gates().count(), 0);
    assert_eq!(bp.find_selector(&seed), None);
    assert_eq!(cs.digest(), digest);

    // The seed can still be used
    assert_eq!(
        bp.get_or_allocate_selector(seed, || vec![vec![w(0, 0)], vec![w(1, 0)]]),
        Ok(0)
    );
    assert_eq!(bp.constraint_system().constraints().len(), 2);
}

#[test]
fn test_huge_rows_are_rejected() {
    let mut bp = blueprint(TableDescription::new(1));
    bp.allocate_rows(1).unwrap();

    assert_eq!(
        bp.allocate_rows(usize::MAX),
        Err(CircuitError::RowBudgetExceeded {
            requested: usize::MAX,
            available: MAX_ROWS - 1
        })
    );
    assert_eq!(bp.rows_amount(), 1);

    let table = bp.assignment_mut();
    assert_eq!(
        table.witness_mut(0, usize::MAX).map(|_| ()),
        Err(AssignmentError::RowBudgetExceeded {
            row: usize::MAX,
            usable_rows: MAX_ROWS
        })
    );
    assert_eq!(
        table.witness_mut(0, MAX_ROWS).map(|_| ()),
        Err(AssignmentError::RowBudgetExceeded {
            row: MAX_ROWS,
            usable_rows: MAX_ROWS
        })
    );
    assert_eq!(table.rows_amount(), 1);

    let far = Variable::absolute(ColumnType::Witness, 0, usize::MAX);
    assert!(matches!(
        table.cell(&far),
        Err(AssignmentError::RowOutOfRange { rows: 1, .. })
    ));
    assert!(matches!(
        bp.add_copy_constraint(far, Variable::absolute(ColumnType::Witness, 0, 0)),
        Err(CircuitError::UnallocatedRow { allocated: 1, .. })
    ));

    assert!(TableDescription::new(1)
        .usable_rows(MAX_ROWS + 1)
        .build()
        .is_err());
}

#[test]
fn test_row_budget() {
    let mut runner = TestFramework::<F7>::new(3)
        .usable_rows(3)
        .public_inputs(vec![F7::from(1u64), F7::from(2u64)])
        .setup();
    let input = BinaryInput {
        x: runner.inputs[0],
        y: runner.inputs[1],
    };
    runner.add(&Addition::default(), &input);
    assert_eq!(runner.bp.rows_amount(), 3);

    assert!(matches!(
        runner.bp.add_component(&Addition::default(), &input),
        Err(crate::error::BlueprintError::Circuit(
            CircuitError::RowBudgetExceeded {
                requested: 1,
                available: 0
            }
        ))
    ));
    assert_eq!(
        runner.bp.assignment_mut().witness_mut(0, 3).map(|_| ()),
        Err(AssignmentError::RowBudgetExceeded {
            row: 3,
            usable_rows: 3
        })
    );
    runner.assert_satisfied();
}

#[test]
fn test_verify_reports_reads_outside_the_table() {
    let mut bp = blueprint(TableDescription::new(1));
    let selector = bp
        .get_or_allocate_selector(SelectorSeed::new("next", &[]), || {
            vec![vec![w(0, 1) - w(0, 0)]]
        })
        .unwrap();
    bp.allocate_rows(2).unwrap();
    bp.enable_selector(selector, 0).unwrap();
    assert!(bp.is_satisfied());

    // On the last row, the gate reads a row that does not exist
    bp.enable_selector(selector, 1).unwrap();
    assert_eq!(
        bp.verify(),
        Err(GateError::OutOfTable {
            row: 1,
            source: AssignmentError::RowOutOfRange { row: 2, rows: 2 }
        })
    );
}

#[test]
fn test_assignment_storage() {
    let mut bp = blueprint(TableDescription::new(2).constants(1));
    bp.allocate_rows(1).unwrap();
    let table = bp.assignment_mut();

    // Unwritten cells of allocated rows are zero
    assert_eq!(table.witness(1, 0), Ok(F7::zero()));
    assert_eq!(
        table.witness(0, 1),
        Err(AssignmentError::RowOutOfRange { row: 1, rows: 1 })
    );
    assert!(matches!(
        table.witness_mut(2, 0),
        Err(AssignmentError::ColumnOutOfRange { .. })
    ));
    assert!(matches!(
        table.public_input_mut(0, 0),
        Err(AssignmentError::ColumnOutOfRange { .. })
    ));

    // Writing past the end grows the table and keeps the values
    *table.witness_mut(0, 0).unwrap() = F7::from(4u64);
    *table.witness_mut(0, 5).unwrap() = F7::from(6u64);
    assert_eq!(table.rows_amount(), 6);
    assert_eq!(table.witness(0, 0), Ok(F7::from(4u64)));
    assert_eq!(table.witness(0, 3), Ok(F7::zero()));

    assert_eq!(table.pad_to_power_of_two(), Ok(8));
    assert_eq!(table.witness(0, 7), Ok(F7::zero()));
    assert_eq!(table.value_at(&Variable::witness(0, -2), 7), Ok(F7::from(6u64)));
    assert!(table.cell(&Variable::witness(0, 0)).is_err());

    let printed = table.print_rows(0..1);
    assert_eq!(printed.lines().count(), 1);
    assert!(printed.contains('4'));
}

#[test]
fn test_table_description_from_json() {
    let description: TableDescription =
        serde_json::from_str(r#"{ "witness_columns": 15, "constant_columns": 2 }"#).unwrap();
    assert_eq!(description, TableDescription::new(15).constants(2));
    assert_eq!(description.max_degree, DEFAULT_MAX_DEGREE);
    assert_eq!(description.usable_rows, None);

    let json = serde_json::to_string(&description.clone().usable_rows(1 << 10)).unwrap();
    let back: TableDescription = serde_json::from_str(&json).unwrap();
    assert_eq!(back.usable_rows, Some(1024));

    assert!(TableDescription::new(0).build().is_err());
    assert!(TableDescription::new(1).max_degree(0).build().is_err());
    assert!(matches!(
        Blueprint::<F7>::new(TableDescription::new(0)),
        Err(CircuitError::InvalidTableDescription(_))
    ));
}

#[test]
fn test_digest() {
    let build = |columns: [usize; 3]| {
        let mut runner = TestFramework::<F7>::new(3)
            .public_inputs(vec![F7::from(1u64), F7::from(2u64)])
            .setup();
        let input = BinaryInput {
            x: runner.inputs[0],
            y: runner.inputs[1],
        };
        runner.add(&Addition::new(columns).unwrap(), &input);
        runner.bp.finalize().0.digest()
    };

    assert_eq!(build([0, 1, 2]), build([0, 1, 2]));
    assert_ne!(build([0, 1, 2]), build([1, 0, 2]));
}
