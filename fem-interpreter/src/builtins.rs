//! Built-in functions for the Fem interpreter: `len`, `type` and `ask`.

use crate::console::Console;
use crate::context::FunctionTable;
use crate::error::{Result, RuntimeError};
use crate::value::{BuiltinFunction, Value};

/// Register all built-in functions with the function table
pub fn register_builtins(table: &mut FunctionTable) {
    table.register_builtin(create_len());
    table.register_builtin(create_type());
    table.register_builtin(create_ask());
}

fn create_len() -> BuiltinFunction {
    BuiltinFunction {
        name: "len",
        arity: 1,
        function: builtin_len,
    }
}

fn create_type() -> BuiltinFunction {
    BuiltinFunction {
        name: "type",
        arity: 1,
        function: builtin_type,
    }
}

fn create_ask() -> BuiltinFunction {
    BuiltinFunction {
        name: "ask",
        arity: 1,
        function: builtin_ask,
    }
}

/// Length of a list, string (in characters) or dict
fn builtin_len(args: &[Value], _console: &mut dyn Console) -> Result<Value> {
    let length = match &args[0] {
        Value::List(items) => items.len(),
        Value::String(s) => s.chars().count(),
        Value::Dict(map) => map.len(),
        other => {
            return Err(RuntimeError::type_error(
                "list, string or dict",
                other.type_name(),
            ));
        }
    };
    i64::try_from(length)
        .map(Value::Integer)
        .map_err(|_| RuntimeError::integer_overflow("len"))
}

/// Kind name of a value
fn builtin_type(args: &[Value], _console: &mut dyn Console) -> Result<Value> {
    Ok(Value::String(args[0].type_name().to_string()))
}

/// Write the prompt, then read one line of input
fn builtin_ask(args: &[Value], console: &mut dyn Console) -> Result<Value> {
    let prompt = args[0].to_string_repr();
    console
        .write_prompt(&prompt)
        .map_err(|error| RuntimeError::io(&error))?;

    match console.read_line() {
        Ok(Some(line)) => Ok(Value::String(line)),
        Ok(None) => Err(RuntimeError::Io {
            message: "end of input while reading a line".to_string(),
            span: None,
        }),
        Err(error) => Err(RuntimeError::io(&error)),
    }
}
