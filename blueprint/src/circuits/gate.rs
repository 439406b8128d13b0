//! This module implements the gates and copy constraints of a circuit.

use crate::circuits::variable::Variable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque reference to a constraint registered in a
/// [crate::circuits::constraint_system::ConstraintSystem].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstraintHandle(pub(crate) usize);

impl ConstraintHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A list of constraints that must vanish on every row where `selector` is
/// enabled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub selector: usize,
    pub constraints: Vec<ConstraintHandle>,
}

/// Two cells asserted to hold the same value.
///
/// The pair is unordered: the smaller variable is always stored on the left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CopyConstraint {
    pub left: Variable,
    pub right: Variable,
}

impl CopyConstraint {
    pub fn new(a: Variable, b: Variable) -> Self {
        if a <= b {
            CopyConstraint { left: a, right: b }
        } else {
            CopyConstraint { left: b, right: a }
        }
    }
}

impl fmt::Display for CopyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.left, self.right)
    }
}
