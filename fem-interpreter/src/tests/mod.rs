//! Acceptance tests for the Fem interpreter
//!
//! Each suite drives the full scanner → parser → interpreter pipeline through
//! an [`InterpreterSession`](crate::InterpreterSession).

pub mod test_acceptance_arithmetic;
pub mod test_acceptance_builtins;
pub mod test_acceptance_functions;
pub mod test_session_persistence;
