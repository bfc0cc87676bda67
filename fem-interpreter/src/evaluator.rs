//! Statement execution and expression evaluation
//!
//! Statements produce a [`Flow`] describing how control leaves them; runtime
//! faults travel separately as `Err`. All mutable state lives in the
//! [`InterpreterContext`] passed into every call, and all I/O goes through the
//! evaluator's [`Console`].
//!
//! Evaluation recurses on the host stack. Its depth is bounded by the parser's
//! nesting limit within one function body and by
//! [`InterpreterConfig::max_call_depth`](crate::InterpreterConfig) across calls.

use crate::console::Console;
use crate::context::{CallFrame, Callable, InterpreterContext};
use crate::environment::ScopeType;
use crate::error::{Result, RuntimeError};
use crate::value::{DictKey, UserFunction, Value};
use fem_parser::{
    BinaryOperator, Block, ComparisonOperator, Expression, ExpressionKind, FunctionCall,
    LogicalOperator, Span, Statement, StatementKind, UnaryOperator,
};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::rc::Rc;

/// How control left a statement or block
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Fell through to the next statement
    Normal,
    Break,
    Continue,
    /// `return` with its value (`null` for a bare return)
    Return(Value),
}

/// Tree-walking evaluator bound to a console
pub struct Evaluator<'c> {
    console: &'c mut dyn Console,
}

impl<'c> Evaluator<'c> {
    pub fn new(console: &'c mut dyn Console) -> Self {
        Self { console }
    }

    /// Run top-level statements in order, stopping at the first fault.
    ///
    /// Control-flow signals that reach the top level are faults.
    pub fn execute_program(
        &mut self,
        ctx: &mut InterpreterContext,
        statements: &[Statement],
    ) -> Result<()> {
        for statement in statements {
            match self.execute_statement(ctx, statement)? {
                Flow::Normal => {}
                Flow::Break => {
                    return Err(
                        RuntimeError::control_flow_outside_loop("break").with_span(statement.span)
                    );
                }
                Flow::Continue => {
                    return Err(RuntimeError::control_flow_outside_loop("continue")
                        .with_span(statement.span));
                }
                Flow::Return(_) => {
                    return Err(RuntimeError::return_outside_function().with_span(statement.span));
                }
            }
        }
        Ok(())
    }

    /// Run a block; the first non-normal flow aborts it and is returned
    pub fn execute_block(&mut self, ctx: &mut InterpreterContext, block: &Block) -> Result<Flow> {
        for statement in &block.statements {
            let flow = self.execute_statement(ctx, statement)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    pub fn execute_statement(
        &mut self,
        ctx: &mut InterpreterContext,
        statement: &Statement,
    ) -> Result<Flow> {
        tracing::trace!(span = ?statement.span, "executing statement");

        match &statement.kind {
            StatementKind::Print(expression) => {
                let value = self.evaluate(ctx, expression)?;
                self.console
                    .write_line(&value.to_string_repr())
                    .map_err(|error| RuntimeError::io(&error).with_span(statement.span))?;
                Ok(Flow::Normal)
            }

            StatementKind::Assignment(assignment) => {
                let value = self.evaluate(ctx, &assignment.value)?;
                ctx.define_variable(assignment.target.name.clone(), value);
                Ok(Flow::Normal)
            }

            StatementKind::Call(call) => {
                self.evaluate_call(ctx, call, statement.span)?;
                Ok(Flow::Normal)
            }

            StatementKind::If(if_stmt) => {
                if self.evaluate(ctx, &if_stmt.condition)?.is_truthy() {
                    self.execute_block(ctx, &if_stmt.then_block)
                } else if let Some(else_block) = &if_stmt.else_block {
                    self.execute_block(ctx, else_block)
                } else {
                    Ok(Flow::Normal)
                }
            }

            StatementKind::While(while_loop) => {
                while self.evaluate(ctx, &while_loop.condition)?.is_truthy() {
                    match self.execute_block(ctx, &while_loop.body)? {
                        Flow::Break => break,
                        Flow::Normal | Flow::Continue => {}
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }

            StatementKind::For(for_loop) => {
                let iterable = self.evaluate(ctx, &for_loop.iterable)?;
                let items = iteration_items(iterable)
                    .map_err(|error| error.with_span(for_loop.iterable.span))?;
                let variable = &for_loop.variable.name;

                for item in items {
                    let scope_type = ScopeType::Loop {
                        variable: variable.clone(),
                    };
                    let flow = ctx.with_scope(scope_type, [(variable.clone(), item)], |ctx| {
                        self.execute_block(ctx, &for_loop.body)
                    })?;
                    match flow {
                        Flow::Break => break,
                        Flow::Normal | Flow::Continue => {}
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }

            StatementKind::FunctionDefinition(definition) => {
                let function = UserFunction {
                    name: definition.name.name.clone(),
                    parameters: definition
                        .parameters
                        .iter()
                        .map(|parameter| parameter.name.clone())
                        .collect(),
                    body: definition.body.clone(),
                };
                tracing::debug!(
                    function = %function.name,
                    arity = function.parameters.len(),
                    "defining function"
                );
                ctx.functions
                    .define(function.name.clone(), Callable::User(Rc::new(function)));
                Ok(Flow::Normal)
            }

            StatementKind::Return(value) => {
                let value = match value {
                    Some(expression) => self.evaluate(ctx, expression)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }

            StatementKind::Pass => Ok(Flow::Normal),
            StatementKind::Break => Ok(Flow::Break),
            StatementKind::Continue => Ok(Flow::Continue),

            StatementKind::Try(try_stmt) => match self.execute_block(ctx, &try_stmt.body) {
                Ok(flow) => Ok(flow),
                Err(error) => {
                    tracing::debug!(%error, "fault handled by except block");
                    self.execute_block(ctx, &try_stmt.handler)
                }
            },
        }
    }

    /// Evaluate an expression to a value
    pub fn evaluate(&mut self, ctx: &mut InterpreterContext, expression: &Expression) -> Result<Value> {
        let span = expression.span;

        match &expression.kind {
            ExpressionKind::Integer(value) => Ok(Value::Integer(*value)),
            ExpressionKind::Float(value) => Ok(Value::Float(*value)),
            ExpressionKind::String(value) => Ok(Value::String(value.clone())),
            ExpressionKind::Boolean(value) => Ok(Value::Boolean(*value)),
            ExpressionKind::Null => Ok(Value::Null),

            ExpressionKind::Variable(identifier) => ctx
                .lookup_variable(&identifier.name)
                .map_err(|error| error.with_span(identifier.span)),

            ExpressionKind::Unary(operation) => {
                let operand = self.evaluate(ctx, &operation.operand)?;
                match operation.operator {
                    UnaryOperator::Not => Ok(Value::Boolean(!operand.is_truthy())),
                    UnaryOperator::Negate => operand.negate().map_err(|error| error.with_span(span)),
                }
            }

            ExpressionKind::Binary(operation) => {
                let left = self.evaluate(ctx, &operation.left)?;
                let right = self.evaluate(ctx, &operation.right)?;
                let max_length = ctx.config().max_sequence_length;
                let result = match operation.operator {
                    BinaryOperator::Add => left.add(&right, max_length),
                    BinaryOperator::Subtract => left.subtract(&right),
                    BinaryOperator::Multiply => left.multiply(&right, max_length),
                    BinaryOperator::Divide => left.divide(&right),
                    BinaryOperator::Modulo => left.modulo(&right),
                };
                result.map_err(|error| error.with_span(span))
            }

            ExpressionKind::Comparison(comparison) => {
                let left = self.evaluate(ctx, &comparison.left)?;
                let right = self.evaluate(ctx, &comparison.right)?;
                compare(&left, comparison.operator, &right)
                    .map(Value::Boolean)
                    .map_err(|error| error.with_span(span))
            }

            ExpressionKind::Logical(operation) => {
                let left = self.evaluate(ctx, &operation.left)?;
                let decided = match operation.operator {
                    LogicalOperator::And => !left.is_truthy(),
                    LogicalOperator::Or => left.is_truthy(),
                };
                if decided {
                    Ok(left)
                } else {
                    self.evaluate(ctx, &operation.right)
                }
            }

            ExpressionKind::List(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.evaluate(ctx, element)?);
                }
                Ok(Value::List(values))
            }

            ExpressionKind::Dict(entries) => {
                let mut map = IndexMap::with_capacity(entries.len());
                for entry in entries {
                    let key = self.evaluate(ctx, &entry.key)?;
                    let value = self.evaluate(ctx, &entry.value)?;
                    map.insert(DictKey::from(key), value);
                }
                Ok(Value::Dict(map))
            }

            ExpressionKind::Index(access) => {
                let target = self.evaluate(ctx, &access.target)?;
                let index = self.evaluate(ctx, &access.index)?;
                index_value(&target, &index).map_err(|error| error.with_span(span))
            }

            ExpressionKind::Property(access) => {
                let target = self.evaluate(ctx, &access.target)?;
                let property = &access.property.name;
                match target {
                    Value::Dict(map) => Ok(map
                        .get(&DictKey::from(Value::String(property.clone())))
                        .cloned()
                        .unwrap_or(Value::Null)),
                    other => Err(RuntimeError::invalid_property(property, other.type_name())
                        .with_span(access.property.span)),
                }
            }

            ExpressionKind::Call(call) => self.evaluate_call(ctx, call, span),
        }
    }

    /// Resolve a call through the function table and invoke it
    fn evaluate_call(
        &mut self,
        ctx: &mut InterpreterContext,
        call: &FunctionCall,
        span: Span,
    ) -> Result<Value> {
        let callable = ctx
            .functions
            .get(&call.name.name)
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_function(&call.name.name).with_span(call.name.span))?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(ctx, argument)?);
        }

        match callable {
            Callable::Builtin(builtin) => {
                tracing::trace!(function = builtin.name, "calling builtin");
                builtin
                    .call(&arguments, &mut *self.console)
                    .map_err(|error| error.with_span(span))
            }
            Callable::User(function) => self.call_user_function(ctx, &function, arguments, span),
        }
    }

    /// Bind parameters in a fresh frame and run the body
    fn call_user_function(
        &mut self,
        ctx: &mut InterpreterContext,
        function: &UserFunction,
        arguments: Vec<Value>,
        span: Span,
    ) -> Result<Value> {
        if arguments.len() != function.parameters.len() {
            return Err(RuntimeError::wrong_arity(
                &function.name,
                function.parameters.len(),
                arguments.len(),
            )
            .with_span(span));
        }

        tracing::debug!(
            function = %function.name,
            depth = ctx.call_stack_depth() + 1,
            "calling function"
        );

        let bindings: Vec<(String, Value)> =
            function.parameters.iter().cloned().zip(arguments).collect();
        let frame = CallFrame::new(function.name.clone(), span);
        let scope_type = ScopeType::Function {
            name: function.name.clone(),
        };

        let flow = ctx.with_call_frame(frame, |ctx| {
            ctx.with_scope(scope_type, bindings, |ctx| {
                self.execute_block(ctx, &function.body)
            })
        })?;

        match flow {
            Flow::Normal => Ok(Value::Null),
            Flow::Return(value) => Ok(value),
            Flow::Break => Err(RuntimeError::control_flow_outside_loop("break").with_span(span)),
            Flow::Continue => {
                Err(RuntimeError::control_flow_outside_loop("continue").with_span(span))
            }
        }
    }
}

/// Elements visited by a for loop: list elements or one-character strings
fn iteration_items(iterable: Value) -> Result<Vec<Value>> {
    match iterable {
        Value::List(items) => Ok(items),
        Value::String(s) => Ok(s.chars().map(|c| Value::String(c.to_string())).collect()),
        other => Err(RuntimeError::not_iterable(other.type_name())),
    }
}

fn compare(left: &Value, operator: ComparisonOperator, right: &Value) -> Result<bool> {
    let ordering = match operator {
        ComparisonOperator::Equal => return Ok(left.equals(right)),
        ComparisonOperator::NotEqual => return Ok(!left.equals(right)),
        _ => left.compare(right)?,
    };
    Ok(match operator {
        ComparisonOperator::Less => ordering == Some(Ordering::Less),
        ComparisonOperator::LessEqual => {
            matches!(ordering, Some(Ordering::Less | Ordering::Equal))
        }
        ComparisonOperator::Greater => ordering == Some(Ordering::Greater),
        ComparisonOperator::GreaterEqual => {
            matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
        }
        ComparisonOperator::Equal | ComparisonOperator::NotEqual => false,
    })
}

/// `target[index]` for lists (Python-style negative indices) and dicts
fn index_value(target: &Value, index: &Value) -> Result<Value> {
    match target {
        Value::List(items) => {
            let position = match index {
                Value::Integer(i) => *i,
                Value::Boolean(b) => i64::from(*b),
                other => return Err(RuntimeError::invalid_index(other.type_name())),
            };
            let length = items.len();
            let resolved = if position < 0 {
                i64::try_from(length).ok().and_then(|len| len.checked_add(position))
            } else {
                Some(position)
            };
            resolved
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or_else(|| RuntimeError::index_out_of_bounds(position, length))
        }
        Value::Dict(map) => Ok(map
            .get(&DictKey::from(index.clone()))
            .cloned()
            .unwrap_or(Value::Null)),
        other => Err(RuntimeError::not_indexable(other.type_name())),
    }
}
