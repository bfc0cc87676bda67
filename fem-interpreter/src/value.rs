//! Runtime value representation for the Fem interpreter.
//!
//! Defines the [`Value`] enum together with the arithmetic, comparison and
//! conversion rules the evaluator applies to it. Arithmetic follows Python:
//! booleans count as 0 and 1, mixed integer/float operands promote to float,
//! `/` always yields a float and `%` takes the sign of the divisor.
//!
//! Dict keys are wrapped in [`DictKey`], which compares with the language's
//! `==` so that `1`, `1.0` and `true` address the same entry.

use crate::console::Console;
use crate::error::{Result, RuntimeError};
use fem_parser::Block;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Runtime values in the Fem interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    Boolean(bool),
    Null,
    /// Ordered list of values
    List(Vec<Value>),
    /// Insertion-ordered map; equality ignores order
    Dict(IndexMap<DictKey, Value>),
    /// User-defined function
    Function(Rc<UserFunction>),
    /// Built-in function
    Builtin(BuiltinFunction),
}

/// A function created by `def`. There is no captured environment: the body
/// runs on top of whatever frames are live at the call site.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Block,
}

/// Native implementation of a built-in
pub type NativeFunction = fn(&[Value], &mut dyn Console) -> Result<Value>;

/// A host-implemented function with a fixed arity
#[derive(Clone, Copy)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: NativeFunction,
}

impl BuiltinFunction {
    /// Check arity and invoke the native implementation
    pub fn call(&self, arguments: &[Value], console: &mut dyn Console) -> Result<Value> {
        if arguments.len() != self.arity {
            return Err(RuntimeError::wrong_arity(
                self.name,
                self.arity,
                arguments.len(),
            ));
        }
        (self.function)(arguments, console)
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

// Built-ins are identified by name
impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity
    }
}

/// Numeric view of a value; booleans count as integers
#[derive(Debug, Clone, Copy)]
enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Integer(n) => n as f64,
            Number::Float(f) => f,
        }
    }
}

impl Value {
    /// Get the type name of this value, as reported by `type()`
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Boolean(_) => "bool",
            Value::Null => "null",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin",
        }
    }

    /// Check if this value is truthy (for conditions and logical operators)
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Null => false,
            Value::Integer(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Dict(map) => !map.is_empty(),
            Value::Function(_) | Value::Builtin(_) => true,
        }
    }

    /// Convert to the string written by `print`
    pub fn to_string_repr(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            _ => self.to_display_string(),
        }
    }

    /// Like [`Value::to_string_repr`] but strings are quoted. Used for
    /// elements nested inside lists and dicts, and by the REPL.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => format!("{s:?}"),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::List(items) => {
                let item_strings: Vec<String> =
                    items.iter().map(|v| v.to_display_string()).collect();
                format!("[{}]", item_strings.join(", "))
            }
            Value::Dict(map) => {
                let entries: Vec<String> = map
                    .iter()
                    .map(|(k, v)| {
                        format!("{}: {}", k.value().to_display_string(), v.to_display_string())
                    })
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            Value::Function(function) => format!("<function {}>", function.name),
            Value::Builtin(builtin) => format!("<builtin {}>", builtin.name),
        }
    }

    fn as_number(&self) -> Option<Number> {
        match self {
            Value::Integer(n) => Some(Number::Integer(*n)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Boolean(b) => Some(Number::Integer(i64::from(*b))),
            _ => None,
        }
    }

    fn as_repeat_count(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Boolean(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    fn invalid(&self, operation: &str, other: &Value) -> RuntimeError {
        RuntimeError::invalid_operation(operation, vec![self.type_name(), other.type_name()])
    }

    /// Apply an integer op (checked) or a float op to two numeric operands
    fn numeric(
        &self,
        other: &Value,
        operation: &str,
        integer_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<Value> {
        match (self.as_number(), other.as_number()) {
            (Some(Number::Integer(a)), Some(Number::Integer(b))) => integer_op(a, b)
                .map(Value::Integer)
                .ok_or_else(|| RuntimeError::integer_overflow(operation)),
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a.as_f64(), b.as_f64()))),
            _ => Err(self.invalid(operation, other)),
        }
    }

    // Arithmetic operations

    /// Addition: numbers, string concatenation, list concatenation.
    ///
    /// Concatenations longer than `max_length` (bytes for strings) fault.
    pub fn add(&self, other: &Value, max_length: usize) -> Result<Value> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => {
                check_length("+", a.len().checked_add(b.len()), max_length)?;
                Ok(Value::String(format!("{a}{b}")))
            }
            (Value::List(a), Value::List(b)) => {
                check_length("+", a.len().checked_add(b.len()), max_length)?;
                let mut result = a.clone();
                result.extend(b.iter().cloned());
                Ok(Value::List(result))
            }
            _ => self.numeric(other, "+", i64::checked_add, |a, b| a + b),
        }
    }

    pub fn subtract(&self, other: &Value) -> Result<Value> {
        self.numeric(other, "-", i64::checked_sub, |a, b| a - b)
    }

    /// Multiplication: numbers, or a string/list repeated by an integer.
    ///
    /// Repetitions longer than `max_length` (bytes for strings) fault, as
    /// does a result the allocator refuses.
    pub fn multiply(&self, other: &Value, max_length: usize) -> Result<Value> {
        match (self, other) {
            (Value::String(s), count) | (count, Value::String(s))
                if count.as_repeat_count().is_some() =>
            {
                let times = repeat_times(count, s.len(), max_length)?;
                let mut result = String::new();
                result
                    .try_reserve_exact(s.len() * times)
                    .map_err(|_| RuntimeError::sequence_too_long("*", max_length))?;
                for _ in 0..times {
                    result.push_str(s);
                }
                Ok(Value::String(result))
            }
            (Value::List(items), count) | (count, Value::List(items))
                if count.as_repeat_count().is_some() =>
            {
                let times = repeat_times(count, items.len(), max_length)?;
                let mut result = Vec::new();
                result
                    .try_reserve_exact(items.len() * times)
                    .map_err(|_| RuntimeError::sequence_too_long("*", max_length))?;
                for _ in 0..times {
                    result.extend(items.iter().cloned());
                }
                Ok(Value::List(result))
            }
            _ => self.numeric(other, "*", i64::checked_mul, |a, b| a * b),
        }
    }

    /// Division always produces a float
    pub fn divide(&self, other: &Value) -> Result<Value> {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => {
                let divisor = b.as_f64();
                if divisor == 0.0 {
                    Err(RuntimeError::division_by_zero())
                } else {
                    Ok(Value::Float(a.as_f64() / divisor))
                }
            }
            _ => Err(self.invalid("/", other)),
        }
    }

    /// Modulo; the result takes the sign of the divisor
    pub fn modulo(&self, other: &Value) -> Result<Value> {
        match (self.as_number(), other.as_number()) {
            (Some(Number::Integer(_)), Some(Number::Integer(0))) => {
                Err(RuntimeError::division_by_zero())
            }
            (Some(Number::Integer(a)), Some(Number::Integer(b))) => {
                // i64::MIN % -1 overflows in the host but is 0 mathematically
                let remainder = a.checked_rem(b).unwrap_or(0);
                if remainder != 0 && (remainder < 0) != (b < 0) {
                    Ok(Value::Integer(remainder + b))
                } else {
                    Ok(Value::Integer(remainder))
                }
            }
            (Some(a), Some(b)) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                if b == 0.0 {
                    return Err(RuntimeError::division_by_zero());
                }
                let remainder = a % b;
                if remainder != 0.0 && (remainder < 0.0) != (b < 0.0) {
                    Ok(Value::Float(remainder + b))
                } else {
                    Ok(Value::Float(remainder))
                }
            }
            _ => Err(self.invalid("%", other)),
        }
    }

    /// Unary minus
    pub fn negate(&self) -> Result<Value> {
        match self.as_number() {
            Some(Number::Integer(n)) => n
                .checked_neg()
                .map(Value::Integer)
                .ok_or_else(|| RuntimeError::integer_overflow("-")),
            Some(Number::Float(f)) => Ok(Value::Float(-f)),
            None => Err(RuntimeError::invalid_operation("-", vec![self.type_name()])),
        }
    }

    // Comparison operations

    /// Language equality (`==`). Works for every pair; numbers compare across
    /// kinds, everything else must match in kind.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            (Value::Dict(a), Value::Dict(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, value)| b.get(key).is_some_and(|other| value.equals(other)))
            }
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => match (self.as_number(), other.as_number()) {
                (Some(Number::Integer(a)), Some(Number::Integer(b))) => a == b,
                (Some(Number::Integer(a)), Some(Number::Float(b)))
                | (Some(Number::Float(b)), Some(Number::Integer(a))) => exact_integer(b) == Some(a),
                (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
                _ => false,
            },
        }
    }

    /// Ordering comparison (for <, >, <=, >=). `Ok(None)` means the operands
    /// are unordered (a NaN is involved) and every ordering test is false.
    pub fn compare(&self, other: &Value) -> Result<Option<Ordering>> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    if !x.equals(y) {
                        return x.compare(y);
                    }
                }
                Ok(Some(a.len().cmp(&b.len())))
            }
            _ => match (self.as_number(), other.as_number()) {
                (Some(Number::Integer(a)), Some(Number::Integer(b))) => Ok(Some(a.cmp(&b))),
                (Some(a), Some(b)) => Ok(a.as_f64().partial_cmp(&b.as_f64())),
                _ => Err(self.invalid("comparison", other)),
            },
        }
    }
}

/// Repetition count for `*` on a sequence; negative counts give an empty result
fn repeat_times(count: &Value, length: usize, max_length: usize) -> Result<usize> {
    let times = count
        .as_repeat_count()
        .map(|n| usize::try_from(n).unwrap_or(0))
        .unwrap_or(0);
    if length == 0 {
        return Ok(0);
    }
    check_length("*", length.checked_mul(times), max_length)?;
    Ok(times)
}

/// `None` stands for a length that does not even fit in `usize`
fn check_length(operation: &str, length: Option<usize>, max_length: usize) -> Result<()> {
    match length {
        Some(length) if length <= max_length => Ok(()),
        _ => Err(RuntimeError::sequence_too_long(operation, max_length)),
    }
}

/// The integer a float is exactly equal to, if any
fn exact_integer(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; i64 covers [-2^63, 2^63)
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        (if f > 0.0 { "inf" } else { "-inf" }).to_string()
    } else if f.fract() == 0.0 {
        format!("{f:.1}") // Show 1.0 instead of 1
    } else {
        f.to_string()
    }
}

/// A dict key.
///
/// Equality is [`Value::equals`] and the hash agrees with it: numbers that
/// compare equal (`1`, `1.0`, `true`) hash the same.
#[derive(Debug, Clone)]
pub struct DictKey(Value);

impl DictKey {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for DictKey {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl PartialEq for DictKey {
    fn eq(&self, other: &Self) -> bool {
        // A NaN key still finds itself
        self.0.equals(&other.0) || (is_nan(&self.0) && is_nan(&other.0))
    }
}

impl Eq for DictKey {}

impl Hash for DictKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(&self.0, state);
    }
}

fn is_nan(value: &Value) -> bool {
    matches!(value, Value::Float(f) if f.is_nan())
}

fn hash_integer<H: Hasher>(n: i64, state: &mut H) {
    0u8.hash(state);
    n.hash(state);
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Integer(n) => hash_integer(*n, state),
        Value::Boolean(b) => hash_integer(i64::from(*b), state),
        Value::Float(f) => match exact_integer(*f) {
            Some(n) => hash_integer(n, state),
            None if f.is_nan() => 1u8.hash(state),
            None => {
                1u8.hash(state);
                f.to_bits().hash(state);
            }
        },
        Value::String(s) => {
            2u8.hash(state);
            s.hash(state);
        }
        Value::Null => 3u8.hash(state),
        Value::List(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Dict(map) => {
            // Order-insensitive equality, so only the size is hashed
            5u8.hash(state);
            map.len().hash(state);
        }
        Value::Function(function) => {
            6u8.hash(state);
            function.name.hash(state);
        }
        Value::Builtin(builtin) => {
            7u8.hash(state);
            builtin.name.hash(state);
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_repr())
    }
}
