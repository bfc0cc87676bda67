//! Runtime error types for the Fem interpreter.
//!
//! Every fault raised while executing a program is a [`RuntimeError`]. Faults
//! can be caught by `try`/`except`; anything uncaught reaches the caller,
//! which renders it through miette.

use fem_parser::Span;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Runtime errors that can occur during interpretation
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Undefined variable: {name}")]
    #[diagnostic(
        code(fem::runtime::undefined_variable),
        help("Assign the variable before reading it")
    )]
    UndefinedVariable {
        name: String,
        #[label("undefined variable")]
        span: Option<SourceSpan>,
    },

    #[error("Undefined function: {name}")]
    #[diagnostic(
        code(fem::runtime::undefined_function),
        help("Define the function with 'def' before calling it")
    )]
    UndefinedFunction {
        name: String,
        #[label("no function with this name")]
        span: Option<SourceSpan>,
    },

    #[error("Wrong arity: function {function} expects {expected} arguments, got {found}")]
    #[diagnostic(
        code(fem::runtime::wrong_arity),
        help("Check the function definition for the correct number of arguments")
    )]
    WrongArity {
        function: String,
        expected: usize,
        found: usize,
        #[label("wrong number of arguments")]
        span: Option<SourceSpan>,
    },

    #[error("Type error: expected {expected}, found {found}")]
    #[diagnostic(
        code(fem::runtime::type_error),
        help("Check that the value has the expected type")
    )]
    TypeError {
        expected: String,
        found: String,
        #[label("type mismatch here")]
        span: Option<SourceSpan>,
    },

    #[error("Invalid operation: {operation} cannot be applied to types [{operand_types}]")]
    #[diagnostic(
        code(fem::runtime::invalid_operation),
        help("Check that the operation is supported for these types")
    )]
    InvalidOperation {
        operation: String,
        operand_types: String,
        #[label("invalid operation")]
        span: Option<SourceSpan>,
    },

    #[error("Division by zero")]
    #[diagnostic(
        code(fem::runtime::division_by_zero),
        help("Ensure the divisor is not zero before dividing")
    )]
    DivisionByZero {
        #[label("division by zero here")]
        span: Option<SourceSpan>,
    },

    #[error("Integer overflow in {operation}")]
    #[diagnostic(
        code(fem::runtime::integer_overflow),
        help("Integers are signed 64-bit; use a float for larger magnitudes")
    )]
    IntegerOverflow {
        operation: String,
        #[label("result does not fit in 64 bits")]
        span: Option<SourceSpan>,
    },

    #[error("Sequence too long: {operation} would produce more than {max_length} elements")]
    #[diagnostic(
        code(fem::runtime::sequence_too_long),
        help("Strings are measured in bytes; build large sequences in smaller pieces")
    )]
    SequenceTooLong {
        operation: String,
        max_length: usize,
        #[label("result too large")]
        span: Option<SourceSpan>,
    },

    #[error("Index out of bounds: index {index} is not valid for a list of length {length}")]
    #[diagnostic(
        code(fem::runtime::index_out_of_bounds),
        help("Valid indices are -{length} up to {length} (exclusive)")
    )]
    IndexOutOfBounds {
        index: i64,
        length: usize,
        #[label("invalid index")]
        span: Option<SourceSpan>,
    },

    #[error("List indices must be integers, found {found}")]
    #[diagnostic(code(fem::runtime::invalid_index))]
    InvalidIndex {
        found: String,
        #[label("not an integer")]
        span: Option<SourceSpan>,
    },

    #[error("Value of type {found} cannot be indexed")]
    #[diagnostic(
        code(fem::runtime::not_indexable),
        help("Only lists and dicts support indexing")
    )]
    NotIndexable {
        found: String,
        #[label("indexed here")]
        span: Option<SourceSpan>,
    },

    #[error("Value of type {found} is not iterable")]
    #[diagnostic(
        code(fem::runtime::not_iterable),
        help("A for loop can iterate over a list or a string")
    )]
    NotIterable {
        found: String,
        #[label("not iterable")]
        span: Option<SourceSpan>,
    },

    #[error("Cannot read property '{property}' of a value of type {found}")]
    #[diagnostic(
        code(fem::runtime::invalid_property),
        help("Property access is only supported on dicts")
    )]
    InvalidProperty {
        property: String,
        found: String,
        #[label("property access here")]
        span: Option<SourceSpan>,
    },

    #[error("'{statement}' outside of a loop")]
    #[diagnostic(
        code(fem::runtime::control_flow_outside_loop),
        help("'break' and 'continue' may only appear inside a while or for loop of the same function")
    )]
    ControlFlowOutsideLoop {
        statement: String,
        #[label("not inside a loop")]
        span: Option<SourceSpan>,
    },

    #[error("'return' outside of a function")]
    #[diagnostic(code(fem::runtime::return_outside_function))]
    ReturnOutsideFunction {
        #[label("not inside a function")]
        span: Option<SourceSpan>,
    },

    #[error("Call stack overflow while calling {function} (max depth: {max_depth})")]
    #[diagnostic(
        code(fem::runtime::stack_overflow),
        help("Check for unbounded recursion, or raise --max-call-depth")
    )]
    StackOverflow {
        function: String,
        max_depth: usize,
        #[label("call exceeds the maximum depth")]
        span: Option<SourceSpan>,
    },

    #[error("I/O error: {message}")]
    #[diagnostic(code(fem::runtime::io))]
    Io {
        message: String,
        #[label("while running this")]
        span: Option<SourceSpan>,
    },
}

impl RuntimeError {
    /// Create an undefined variable error
    pub fn undefined_variable(name: &str) -> Self {
        Self::UndefinedVariable {
            name: name.to_string(),
            span: None,
        }
    }

    /// Create an undefined function error
    pub fn undefined_function(name: &str) -> Self {
        Self::UndefinedFunction {
            name: name.to_string(),
            span: None,
        }
    }

    /// Create a wrong arity error
    pub fn wrong_arity(function: &str, expected: usize, found: usize) -> Self {
        Self::WrongArity {
            function: function.to_string(),
            expected,
            found,
            span: None,
        }
    }

    /// Create a type error
    pub fn type_error(expected: &str, found: &str) -> Self {
        Self::TypeError {
            expected: expected.to_string(),
            found: found.to_string(),
            span: None,
        }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(operation: &str, operand_types: Vec<&str>) -> Self {
        Self::InvalidOperation {
            operation: operation.to_string(),
            operand_types: operand_types.join(", "),
            span: None,
        }
    }

    pub fn division_by_zero() -> Self {
        Self::DivisionByZero { span: None }
    }

    pub fn integer_overflow(operation: &str) -> Self {
        Self::IntegerOverflow {
            operation: operation.to_string(),
            span: None,
        }
    }

    pub fn sequence_too_long(operation: &str, max_length: usize) -> Self {
        Self::SequenceTooLong {
            operation: operation.to_string(),
            max_length,
            span: None,
        }
    }

    pub fn index_out_of_bounds(index: i64, length: usize) -> Self {
        Self::IndexOutOfBounds {
            index,
            length,
            span: None,
        }
    }

    pub fn invalid_index(found: &str) -> Self {
        Self::InvalidIndex {
            found: found.to_string(),
            span: None,
        }
    }

    pub fn not_indexable(found: &str) -> Self {
        Self::NotIndexable {
            found: found.to_string(),
            span: None,
        }
    }

    pub fn not_iterable(found: &str) -> Self {
        Self::NotIterable {
            found: found.to_string(),
            span: None,
        }
    }

    pub fn invalid_property(property: &str, found: &str) -> Self {
        Self::InvalidProperty {
            property: property.to_string(),
            found: found.to_string(),
            span: None,
        }
    }

    /// `statement` is the offending keyword (`break` or `continue`)
    pub fn control_flow_outside_loop(statement: &str) -> Self {
        Self::ControlFlowOutsideLoop {
            statement: statement.to_string(),
            span: None,
        }
    }

    pub fn return_outside_function() -> Self {
        Self::ReturnOutsideFunction { span: None }
    }

    pub fn stack_overflow(function: &str, max_depth: usize) -> Self {
        Self::StackOverflow {
            function: function.to_string(),
            max_depth,
            span: None,
        }
    }

    pub fn io(error: &std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
            span: None,
        }
    }

    /// Attach a source location unless the error already has a more precise one
    pub fn with_span(mut self, span: Span) -> Self {
        let slot = self.span_slot();
        if slot.is_none() {
            *slot = Some(span_to_source_span(span));
        }
        self
    }

    /// Source location of the fault, if known
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            Self::UndefinedVariable { span, .. }
            | Self::UndefinedFunction { span, .. }
            | Self::WrongArity { span, .. }
            | Self::TypeError { span, .. }
            | Self::InvalidOperation { span, .. }
            | Self::DivisionByZero { span }
            | Self::IntegerOverflow { span, .. }
            | Self::SequenceTooLong { span, .. }
            | Self::IndexOutOfBounds { span, .. }
            | Self::InvalidIndex { span, .. }
            | Self::NotIndexable { span, .. }
            | Self::NotIterable { span, .. }
            | Self::InvalidProperty { span, .. }
            | Self::ControlFlowOutsideLoop { span, .. }
            | Self::ReturnOutsideFunction { span }
            | Self::StackOverflow { span, .. }
            | Self::Io { span, .. } => *span,
        }
    }

    fn span_slot(&mut self) -> &mut Option<SourceSpan> {
        match self {
            Self::UndefinedVariable { span, .. }
            | Self::UndefinedFunction { span, .. }
            | Self::WrongArity { span, .. }
            | Self::TypeError { span, .. }
            | Self::InvalidOperation { span, .. }
            | Self::DivisionByZero { span }
            | Self::IntegerOverflow { span, .. }
            | Self::SequenceTooLong { span, .. }
            | Self::IndexOutOfBounds { span, .. }
            | Self::InvalidIndex { span, .. }
            | Self::NotIndexable { span, .. }
            | Self::NotIterable { span, .. }
            | Self::InvalidProperty { span, .. }
            | Self::ControlFlowOutsideLoop { span, .. }
            | Self::ReturnOutsideFunction { span }
            | Self::StackOverflow { span, .. }
            | Self::Io { span, .. } => span,
        }
    }
}

/// Convert parser Span to miette SourceSpan
fn span_to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.end - span.start)
}

/// Type alias for interpreter results
pub type Result<T> = std::result::Result<T, RuntimeError>;
