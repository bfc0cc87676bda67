//! Interpreter session for testing Fem programs
//!
//! Wraps an [`Interpreter`] over a [`BufferedConsole`] so tests can:
//! - run source text and inspect the lines it printed
//! - evaluate single expressions to values
//! - script the input read by `ask`
//! - keep variables and functions between runs (REPL-like behavior)

use crate::console::BufferedConsole;
use crate::context::InterpreterConfig;
use crate::error::RuntimeError;
use crate::interpreter::{Interpreter, InterpreterError};
use crate::value::Value;
use fem_parser::{ParseError, StatementKind, parse_program};
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur during test harness operations
#[derive(Debug, Error, Diagnostic)]
pub enum TestHarnessError {
    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error("Runtime error: {source}")]
    Runtime {
        #[from]
        source: RuntimeError,
    },

    #[error("Assertion failed: expected {expected}, but got {actual}")]
    AssertionFailed { expected: String, actual: String },

    #[error("Setup error: {message}")]
    Setup { message: String },

    #[error("Variable not found: {name}")]
    VariableNotFound { name: String },
}

impl From<InterpreterError> for TestHarnessError {
    fn from(error: InterpreterError) -> Self {
        match error {
            InterpreterError::Parse(source) => TestHarnessError::Parse { source },
            InterpreterError::Runtime(source) => TestHarnessError::Runtime { source },
        }
    }
}

/// Interpreter session with captured output and scripted input
pub struct InterpreterSession {
    interpreter: Interpreter<BufferedConsole>,
}

impl InterpreterSession {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self {
            interpreter: Interpreter::with_console_and_config(BufferedConsole::new(), config),
        }
    }

    /// Session whose `ask` calls read `lines` in order
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interpreter: Interpreter::with_console(BufferedConsole::with_input(lines)),
        }
    }

    /// Run a program; returns the lines it printed
    pub fn execute(&mut self, code: &str) -> Result<Vec<String>, TestHarnessError> {
        let result = self.interpreter.run_source(code);
        let output = self.interpreter.console_mut().take_output();
        result?;
        Ok(output)
    }

    /// Run a program that is expected to fault. Returns the fault and the
    /// lines printed before it.
    pub fn execute_expecting_error(
        &mut self,
        code: &str,
    ) -> Result<(RuntimeError, Vec<String>), TestHarnessError> {
        let result = self.interpreter.run_source(code);
        let output = self.interpreter.console_mut().take_output();
        match result {
            Err(InterpreterError::Runtime(error)) => Ok((error, output)),
            Err(InterpreterError::Parse(source)) => Err(TestHarnessError::Parse { source }),
            Ok(()) => Err(TestHarnessError::AssertionFailed {
                expected: "a runtime error".to_string(),
                actual: format!("success with output {output:?}"),
            }),
        }
    }

    /// Evaluate one expression in the session's current state
    pub fn evaluate(&mut self, expression_code: &str) -> Result<Value, TestHarnessError> {
        let program = parse_program(&format!("print {expression_code}"))?;
        let expression = match program.statements.as_slice() {
            [statement] => match &statement.kind {
                StatementKind::Print(expression) => Some(expression),
                _ => None,
            },
            _ => None,
        };
        let Some(expression) = expression else {
            return Err(TestHarnessError::Setup {
                message: format!("'{expression_code}' is not a single expression"),
            });
        };

        Ok(self.interpreter.evaluate_expression(expression)?)
    }

    /// Current value of a variable as seen from the innermost frame
    pub fn get_variable(&self, name: &str) -> Result<Value, TestHarnessError> {
        self.interpreter
            .context()
            .environment
            .get(name)
            .cloned()
            .ok_or_else(|| TestHarnessError::VariableNotFound {
                name: name.to_string(),
            })
    }

    /// Queue another line for `ask`
    pub fn push_input(&mut self, line: impl Into<String>) {
        self.interpreter.console_mut().push_input(line);
    }

    /// Prompts written by `ask` so far
    pub fn prompts(&self) -> &[String] {
        self.interpreter.console().prompts()
    }

    pub fn interpreter(&self) -> &Interpreter<BufferedConsole> {
        &self.interpreter
    }

    /// Forget all variables and user functions
    pub fn reset(&mut self) {
        self.interpreter.reset();
    }

    // Assertions

    /// Run `code` and compare the printed lines
    pub fn assert_output(&mut self, code: &str, expected: &[&str]) -> Result<(), TestHarnessError> {
        let output = self.execute(code)?;
        if output != expected {
            return Err(TestHarnessError::AssertionFailed {
                expected: format!("{expected:?}"),
                actual: format!("{output:?}"),
            });
        }
        Ok(())
    }

    pub fn assert_evaluates_to(
        &mut self,
        expression_code: &str,
        expected: Value,
    ) -> Result<(), TestHarnessError> {
        let actual = self.evaluate(expression_code)?;
        if actual != expected {
            return Err(TestHarnessError::AssertionFailed {
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
            });
        }
        Ok(())
    }

    pub fn assert_evaluates_to_integer(
        &mut self,
        expression_code: &str,
        expected: i64,
    ) -> Result<(), TestHarnessError> {
        self.assert_evaluates_to(expression_code, Value::Integer(expected))
    }

    pub fn assert_evaluates_to_float(
        &mut self,
        expression_code: &str,
        expected: f64,
    ) -> Result<(), TestHarnessError> {
        self.assert_evaluates_to(expression_code, Value::Float(expected))
    }

    pub fn assert_evaluates_to_boolean(
        &mut self,
        expression_code: &str,
        expected: bool,
    ) -> Result<(), TestHarnessError> {
        self.assert_evaluates_to(expression_code, Value::Boolean(expected))
    }

    pub fn assert_evaluates_to_string(
        &mut self,
        expression_code: &str,
        expected: &str,
    ) -> Result<(), TestHarnessError> {
        self.assert_evaluates_to(expression_code, Value::String(expected.to_string()))
    }

    pub fn assert_evaluates_to_null(&mut self, expression_code: &str) -> Result<(), TestHarnessError> {
        self.assert_evaluates_to(expression_code, Value::Null)
    }
}

impl Default for InterpreterSession {
    fn default() -> Self {
        Self::new()
    }
}
