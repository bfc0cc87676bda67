//! Runtime context for the Fem interpreter
//!
//! Owns all mutable interpreter state: the scope stack, the global function
//! table and the call stack. Scope and call-frame pushes go through
//! [`InterpreterContext::with_scope`] and [`InterpreterContext::with_call_frame`],
//! which pop again on every exit path.

use crate::builtins::register_builtins;
use crate::environment::{Environment, ScopeType};
use crate::error::{Result, RuntimeError};
use crate::value::{BuiltinFunction, UserFunction, Value};
use fem_parser::Span;
use std::collections::HashMap;
use std::rc::Rc;

/// Interpreter limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum number of nested user function calls. The default leaves
    /// room on a 2 MiB thread stack, the smallest the evaluator runs on.
    pub max_call_depth: usize,
    /// Longest string (in bytes) or list that `+` and `*` may build
    pub max_sequence_length: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 64,
            max_sequence_length: 1 << 24,
        }
    }
}

/// Anything that can be called by name
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    User(Rc<UserFunction>),
    Builtin(BuiltinFunction),
}

impl Callable {
    pub fn name(&self) -> &str {
        match self {
            Callable::User(function) => &function.name,
            Callable::Builtin(builtin) => builtin.name,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Callable::User(function) => function.parameters.len(),
            Callable::Builtin(builtin) => builtin.arity,
        }
    }

    /// The callable as a first-class value
    pub fn to_value(&self) -> Value {
        match self {
            Callable::User(function) => Value::Function(Rc::clone(function)),
            Callable::Builtin(builtin) => Value::Builtin(*builtin),
        }
    }
}

/// Flat global map from function name to callable
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: HashMap<String, Callable>,
}

impl FunctionTable {
    /// Table pre-seeded with the built-ins
    pub fn new() -> Self {
        let mut table = Self::default();
        register_builtins(&mut table);
        table
    }

    /// Insert or overwrite an entry
    pub fn define(&mut self, name: impl Into<String>, callable: Callable) {
        self.functions.insert(name.into(), callable);
    }

    pub fn register_builtin(&mut self, builtin: BuiltinFunction) {
        self.define(builtin.name, Callable::Builtin(builtin));
    }

    pub fn get(&self, name: &str) -> Option<&Callable> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// All entries sorted by name
    pub fn entries(&self) -> Vec<(&str, &Callable)> {
        let mut entries: Vec<(&str, &Callable)> = self
            .functions
            .iter()
            .map(|(name, callable)| (name.as_str(), callable))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// A call frame representing a user function call on the stack
#[derive(Debug, Clone, PartialEq)]
pub struct CallFrame {
    /// Name of the function being called
    pub function_name: String,
    /// Call site location for error reporting
    pub call_span: Span,
}

impl CallFrame {
    pub fn new(function_name: impl Into<String>, call_span: Span) -> Self {
        Self {
            function_name: function_name.into(),
            call_span,
        }
    }
}

/// The main runtime context for the Fem interpreter
#[derive(Debug, Clone)]
pub struct InterpreterContext {
    /// Variable scope stack
    pub environment: Environment,
    /// Global function table
    pub functions: FunctionTable,
    /// Active user function calls, innermost last
    call_stack: Vec<CallFrame>,
    config: InterpreterConfig,
}

impl InterpreterContext {
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            environment: Environment::new(),
            functions: FunctionTable::new(),
            call_stack: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    // Variable Environment Management

    /// Bind in the innermost frame
    pub fn define_variable(&mut self, name: impl Into<String>, value: Value) {
        self.environment.define(name, value);
    }

    /// Variable lookup. Names bound in no frame fall back to the function
    /// table so functions can be used as values.
    pub fn lookup_variable(&self, name: &str) -> Result<Value> {
        if let Some(value) = self.environment.get(name) {
            return Ok(value.clone());
        }
        self.functions
            .get(name)
            .map(Callable::to_value)
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    /// Run `body` in a fresh innermost frame pre-populated with `bindings`.
    /// The frame is popped whatever `body` returns.
    pub fn with_scope<T>(
        &mut self,
        scope_type: ScopeType,
        bindings: impl IntoIterator<Item = (String, Value)>,
        body: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.environment.push_scope(scope_type);
        for (name, value) in bindings {
            self.environment.define(name, value);
        }
        let result = body(self);
        self.environment.pop_scope();
        result
    }

    // Call Stack Management

    /// Run `body` with `frame` pushed on the call stack, popping it afterwards.
    /// Fails with a stack overflow when the configured depth would be exceeded.
    pub fn with_call_frame<T>(
        &mut self,
        frame: CallFrame,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if self.call_stack.len() >= self.config.max_call_depth {
            return Err(
                RuntimeError::stack_overflow(&frame.function_name, self.config.max_call_depth)
                    .with_span(frame.call_span),
            );
        }
        self.call_stack.push(frame);
        let result = body(self);
        self.call_stack.pop();
        result
    }

    /// Get the current call stack depth
    pub fn call_stack_depth(&self) -> usize {
        self.call_stack.len()
    }

    /// Get a reference to the current call frame (top of stack)
    pub fn current_call_frame(&self) -> Option<&CallFrame> {
        self.call_stack.last()
    }

    /// Clear variables, user functions and the call stack
    pub fn reset(&mut self) {
        self.environment.clear_user_vars();
        self.functions = FunctionTable::new();
        self.call_stack.clear();
    }

    /// One line summary of scope and call depth, for debugging
    pub fn debug_state(&self) -> String {
        format!(
            "scope depth {} ({:?}), call depth {}/{}",
            self.environment.scope_depth(),
            self.environment.current_scope_type(),
            self.call_stack.len(),
            self.config.max_call_depth
        )
    }
}

impl Default for InterpreterContext {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}
