use crate::{
    components::{PolynomialEvaluation, UnaryInput},
    tests::framework::{arb_fp, Fp, TestFramework, F7},
};
use ark_ff::{Field, Zero};
use proptest::prelude::*;

#[test]
fn test_horner_mod_7() {
    let mut runner = TestFramework::<F7>::new(2)
        .constants(1)
        .public_inputs(vec![F7::from(4u64)])
        .setup();
    let input = UnaryInput {
        x: runner.inputs[0],
    };

    // 2 + 3x + x^2
    let poly = PolynomialEvaluation::new([2u64, 3, 1].map(F7::from).to_vec()).unwrap();
    let out = runner.add(&poly, &input);
    assert_eq!(runner.value(&out.output), F7::from(2u64));
    runner.assert_satisfied();

    let layout = poly.layout(1);
    let accs: Vec<F7> = layout.iter().map(|row| runner.value(&row.acc)).collect();
    assert_eq!(accs, [1u64, 0, 2].map(F7::from).to_vec());
    let constants: Vec<F7> = layout
        .iter()
        .map(|row| runner.value(&row.coefficient))
        .collect();
    assert_eq!(constants, [1u64, 3, 2].map(F7::from).to_vec());

    let cells: Vec<_> = layout.iter().flat_map(|row| [row.acc, row.x]).collect();
    runner.assert_mutations_rejected(&cells);
}

#[test]
fn test_constant_polynomial() {
    let mut runner = TestFramework::<F7>::new(2)
        .constants(1)
        .public_inputs(vec![F7::from(6u64)])
        .setup();
    let input = UnaryInput {
        x: runner.inputs[0],
    };

    let poly = PolynomialEvaluation::new(vec![F7::from(5u64)]).unwrap();
    let out = runner.add(&poly, &input);
    assert_eq!(out.output.row(), Some(1));
    assert_eq!(runner.value(&out.output), F7::from(5u64));
    runner.assert_satisfied();
}

#[test]
fn test_polynomials_share_selectors() {
    let mut runner = TestFramework::<Fp>::new(2)
        .constants(1)
        .public_inputs(vec![Fp::from(10u64)])
        .setup();
    let input = UnaryInput {
        x: runner.inputs[0],
    };

    let square = PolynomialEvaluation::new(vec![Fp::zero(), Fp::zero(), Fp::from(1u64)]).unwrap();
    let affine = PolynomialEvaluation::new(vec![Fp::from(7u64), Fp::from(2u64)]).unwrap();
    let a = runner.add(&square, &input);
    let b = runner.add(&affine, &UnaryInput { x: a.output });

    assert_eq!(runner.value(&b.output), Fp::from(207u64));
    assert_eq!(runner.bp.constraint_system().selectors_amount(), 2);
    runner.assert_satisfied();
}

#[test]
fn test_empty_polynomial() {
    assert!(PolynomialEvaluation::<Fp>::new(vec![]).is_err());
    assert!(PolynomialEvaluation::with_columns(vec![Fp::zero()], [0, 0], 0).is_err());
}

proptest! {
    #[test]
    fn test_horner_round_trip(x in arb_fp(), coefficients in prop::collection::vec(arb_fp(), 1..8)) {
        let mut runner = TestFramework::<Fp>::new(2).constants(1).public_inputs(vec![x]).setup();
        let input = UnaryInput { x: runner.inputs[0] };

        let poly = PolynomialEvaluation::new(coefficients.clone()).unwrap();
        let out = runner.add(&poly, &input);

        let expected: Fp = coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| *c * x.pow([i as u64]))
            .sum();
        prop_assert_eq!(runner.value(&out.output), expected);
        prop_assert!(runner.bp.is_satisfied());
        runner.assert_mutations_rejected(&[out.output]);
    }
}
