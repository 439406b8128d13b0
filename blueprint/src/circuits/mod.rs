pub mod assignment;
pub mod constraint_system;
pub mod expr;
pub mod gate;
pub mod selector;
pub mod table;
pub mod variable;
