mod framework;

mod constraint_system;
mod polynomial_evaluation;
