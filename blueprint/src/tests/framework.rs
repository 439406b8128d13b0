//! Test Framework

use crate::{
    blueprint::Blueprint,
    circuits::{table::TableDescription, variable::Variable},
    components::Component,
};
use ark_ff::{Fp64, MontBackend, MontConfig, PrimeField, UniformRand as _};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng as _};

/// The field with 7 elements
#[derive(MontConfig)]
#[modulus = "7"]
#[generator = "3"]
pub struct F7Config;
pub type F7 = Fp64<MontBackend<F7Config, 1>>;

pub use ark_bn254::Fr as Fp;

pub(crate) const RNG_SEED: [u8; 32] = [
    211, 31, 143, 75, 29, 255, 0, 126, 237, 193, 86, 160, 1, 90, 131, 221, 186, 168, 4, 95, 50,
    48, 89, 29, 13, 250, 215, 172, 130, 24, 164, 162,
];

prop_compose! {
    pub(crate) fn arb_fp()(seed: [u8; 32]) -> Fp {
        let rng = &mut StdRng::from_seed(seed);
        Fp::rand(rng)
    }
}

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds a blueprint whose public input column 0 holds the inputs of the
/// test, one per row.
pub(crate) struct TestFramework<F: PrimeField> {
    description: TableDescription,
    public_inputs: Vec<F>,
}

pub(crate) struct TestRunner<F: PrimeField> {
    pub(crate) bp: Blueprint<F>,
    pub(crate) inputs: Vec<Variable>,
}

impl<F: PrimeField> TestFramework<F> {
    pub(crate) fn new(witness_columns: usize) -> Self {
        TestFramework {
            description: TableDescription::new(witness_columns).public_inputs(1),
            public_inputs: vec![],
        }
    }

    #[must_use]
    pub(crate) fn constants(mut self, columns: usize) -> Self {
        self.description = self.description.constants(columns);
        self
    }

    #[must_use]
    pub(crate) fn usable_rows(mut self, rows: usize) -> Self {
        self.description = self.description.usable_rows(rows);
        self
    }

    #[must_use]
    pub(crate) fn public_inputs(mut self, public_inputs: Vec<F>) -> Self {
        self.public_inputs = public_inputs;
        self
    }

    pub(crate) fn setup(self) -> TestRunner<F> {
        init_logger();
        let mut bp = Blueprint::new(self.description).unwrap();
        let inputs = self
            .public_inputs
            .into_iter()
            .map(|value| bp.add_public_input(0, value).unwrap())
            .collect();
        TestRunner { bp, inputs }
    }
}

impl<F: PrimeField> TestRunner<F> {
    pub(crate) fn add<C: Component<F>>(&mut self, component: &C, input: &C::Input) -> C::Output {
        self.bp.add_component(component, input).unwrap()
    }

    pub(crate) fn value(&self, var: &Variable) -> F {
        self.bp.assignment().cell(var).unwrap()
    }

    /// Panics with the failing constraint and the table if the assignment
    /// does not satisfy the circuit.
    pub(crate) fn assert_satisfied(&self) {
        if let Err(err) = self.bp.verify() {
            panic!("{err}\n{}", self.bp.assignment());
        }
    }

    /// Checks that changing the value of any of `cells` is detected.
    pub(crate) fn assert_mutations_rejected(&self, cells: &[Variable]) {
        let cs = self.bp.constraint_system();
        for cell in cells {
            let mut assignment = self.bp.assignment().clone();
            let value = assignment.cell(cell).unwrap();
            assignment.set(cell, value + F::one()).unwrap();
            assert!(
                !cs.is_satisfied(&assignment),
                "changing {cell} was not detected\n{assignment}"
            );
        }
    }
}
