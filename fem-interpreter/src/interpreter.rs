//! Interpreter facade: owns the context and console and runs whole programs.

use crate::console::{Console, StdConsole};
use crate::context::{InterpreterConfig, InterpreterContext};
use crate::error::RuntimeError;
use crate::evaluator::Evaluator;
use crate::value::Value;
use fem_parser::{Expression, ParseError, Statement, parse_program};
use miette::Diagnostic;
use thiserror::Error;

/// Anything that can go wrong running source text
#[derive(Debug, Error, Diagnostic)]
pub enum InterpreterError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Runtime(#[from] RuntimeError),
}

/// The main interpreter for running Fem programs.
///
/// State persists between calls, so a sequence of `run_source` calls behaves
/// like one long program.
#[derive(Debug)]
pub struct Interpreter<C: Console = StdConsole> {
    context: InterpreterContext,
    console: C,
}

impl Interpreter<StdConsole> {
    /// Create an interpreter writing to stdout and reading from stdin
    pub fn new() -> Self {
        Self::with_console(StdConsole::new())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self::with_console_and_config(StdConsole::new(), config)
    }
}

impl Default for Interpreter<StdConsole> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Console> Interpreter<C> {
    pub fn with_console(console: C) -> Self {
        Self::with_console_and_config(console, InterpreterConfig::default())
    }

    pub fn with_console_and_config(console: C, config: InterpreterConfig) -> Self {
        Self {
            context: InterpreterContext::new(config),
            console,
        }
    }

    /// Execute parsed top-level statements
    pub fn interpret(&mut self, statements: &[Statement]) -> Result<(), RuntimeError> {
        let mut evaluator = Evaluator::new(&mut self.console);
        evaluator.execute_program(&mut self.context, statements)
    }

    /// Evaluate a single expression against the current state
    pub fn evaluate_expression(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        let mut evaluator = Evaluator::new(&mut self.console);
        evaluator.evaluate(&mut self.context, expression)
    }

    /// Scan, parse and execute `source`
    pub fn run_source(&mut self, source: &str) -> Result<(), InterpreterError> {
        let program = parse_program(source)?;
        self.interpret(&program.statements)?;
        Ok(())
    }

    pub fn context(&self) -> &InterpreterContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut InterpreterContext {
        &mut self.context
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Forget all variables and user functions
    pub fn reset(&mut self) {
        self.context.reset();
    }
}
