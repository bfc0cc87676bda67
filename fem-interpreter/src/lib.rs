//! Fem Interpreter
//!
//! Tree-walking interpreter for programs produced by `fem-parser`. Values,
//! scopes and the function table live in an [`InterpreterContext`]; the
//! [`Evaluator`] walks the AST against it and the [`Interpreter`] facade ties
//! parsing and execution together.

pub mod builtins;
pub mod console;
pub mod context;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod test_harness;
pub mod value;

// Include tests directory with all test modules
#[cfg(test)]
#[path = "tests/mod.rs"]
pub mod tests;

// Re-export public API
pub use console::{BufferedConsole, Console, StdConsole};
pub use context::{CallFrame, Callable, FunctionTable, InterpreterConfig, InterpreterContext};
pub use environment::{Environment, ScopeType};
pub use error::RuntimeError;
pub use evaluator::{Evaluator, Flow};
pub use interpreter::{Interpreter, InterpreterError};
pub use test_harness::{InterpreterSession, TestHarnessError};
pub use value::{BuiltinFunction, DictKey, UserFunction, Value};
