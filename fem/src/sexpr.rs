// S-expression formatter for the Fem AST
// Statements go one per line, nested blocks are indented, expressions stay on one line

use fem_parser::*;

pub fn format_program_as_sexpr(program: &Program) -> String {
    if program.statements.is_empty() {
        return "(program)".to_string();
    }

    let statements: Vec<String> = program
        .statements
        .iter()
        .map(|statement| format!("  {}", format_statement_with_indent(statement, 2)))
        .collect();
    format!("(program\n{})", statements.join("\n"))
}

fn format_statement_with_indent(statement: &Statement, indent: usize) -> String {
    match &statement.kind {
        StatementKind::Print(expression) => format!("(print {})", format_expression(expression)),
        StatementKind::Assignment(assignment) => format!(
            "(assign {} {})",
            assignment.target.name,
            format_expression(&assignment.value)
        ),
        StatementKind::Call(call) => format_call(call),
        StatementKind::If(if_stmt) => {
            let mut result = format!(
                "(if {}\n{}",
                format_expression(&if_stmt.condition),
                format_block_with_indent("then", &if_stmt.then_block, indent + 2)
            );
            if let Some(else_block) = &if_stmt.else_block {
                result.push('\n');
                result.push_str(&format_block_with_indent("else", else_block, indent + 2));
            }
            result.push(')');
            result
        }
        StatementKind::While(while_loop) => format!(
            "(while {}\n{})",
            format_expression(&while_loop.condition),
            format_block_with_indent("do", &while_loop.body, indent + 2)
        ),
        StatementKind::For(for_loop) => format!(
            "(for {} {}\n{})",
            for_loop.variable.name,
            format_expression(&for_loop.iterable),
            format_block_with_indent("do", &for_loop.body, indent + 2)
        ),
        StatementKind::FunctionDefinition(definition) => {
            let parameters: Vec<&str> = definition
                .parameters
                .iter()
                .map(|parameter| parameter.name.as_str())
                .collect();
            let parameters = if parameters.is_empty() {
                "(params)".to_string()
            } else {
                format!("(params {})", parameters.join(" "))
            };
            format!(
                "(def {} {}\n{})",
                definition.name.name,
                parameters,
                format_block_with_indent("body", &definition.body, indent + 2)
            )
        }
        StatementKind::Return(Some(expression)) => {
            format!("(return {})", format_expression(expression))
        }
        StatementKind::Return(None) => "(return)".to_string(),
        StatementKind::Pass => "(pass)".to_string(),
        StatementKind::Break => "(break)".to_string(),
        StatementKind::Continue => "(continue)".to_string(),
        StatementKind::Try(try_stmt) => format!(
            "(try\n{}\n{})",
            format_block_with_indent("body", &try_stmt.body, indent + 2),
            format_block_with_indent("except", &try_stmt.handler, indent + 2)
        ),
    }
}

/// `(label stmt...)` with each statement on its own line under `indent`
fn format_block_with_indent(label: &str, block: &Block, indent: usize) -> String {
    let pad = " ".repeat(indent);
    if block.statements.is_empty() {
        return format!("{pad}({label})");
    }

    let inner_pad = " ".repeat(indent + 2);
    let statements: Vec<String> = block
        .statements
        .iter()
        .map(|statement| {
            format!(
                "{inner_pad}{}",
                format_statement_with_indent(statement, indent + 2)
            )
        })
        .collect();
    format!("{pad}({label}\n{})", statements.join("\n"))
}

fn format_expression(expression: &Expression) -> String {
    match &expression.kind {
        ExpressionKind::Integer(value) => format!("(integer {value})"),
        ExpressionKind::Float(value) => format!("(float {value:?})"),
        ExpressionKind::String(value) => format!("{value:?}"),
        ExpressionKind::Boolean(value) => format!("(boolean {value})"),
        ExpressionKind::Null => "null".to_string(),
        ExpressionKind::Variable(identifier) => identifier.name.clone(),
        ExpressionKind::Unary(operation) => {
            let operator = match operation.operator {
                UnaryOperator::Not => "not",
                UnaryOperator::Negate => "neg",
            };
            format!("({operator} {})", format_expression(&operation.operand))
        }
        ExpressionKind::Binary(operation) => format!(
            "({} {} {})",
            operation.operator,
            format_expression(&operation.left),
            format_expression(&operation.right)
        ),
        ExpressionKind::Comparison(comparison) => format!(
            "({} {} {})",
            comparison.operator,
            format_expression(&comparison.left),
            format_expression(&comparison.right)
        ),
        ExpressionKind::Logical(operation) => format!(
            "({} {} {})",
            operation.operator,
            format_expression(&operation.left),
            format_expression(&operation.right)
        ),
        ExpressionKind::List(elements) => {
            format_with_items("list", elements.iter().map(format_expression))
        }
        ExpressionKind::Dict(entries) => format_with_items(
            "dict",
            entries.iter().map(|entry| {
                format!(
                    "({} {})",
                    format_expression(&entry.key),
                    format_expression(&entry.value)
                )
            }),
        ),
        ExpressionKind::Index(access) => format!(
            "(index {} {})",
            format_expression(&access.target),
            format_expression(&access.index)
        ),
        ExpressionKind::Property(access) => format!(
            "(property {} {})",
            format_expression(&access.target),
            access.property.name
        ),
        ExpressionKind::Call(call) => format_call(call),
    }
}

fn format_call(call: &FunctionCall) -> String {
    format_with_items(
        &format!("call {}", call.name.name),
        call.arguments.iter().map(format_expression),
    )
}

fn format_with_items(head: &str, items: impl Iterator<Item = String>) -> String {
    let items: Vec<String> = items.collect();
    if items.is_empty() {
        format!("({head})")
    } else {
        format!("({head} {})", items.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sexpr(source: &str) -> String {
        let program = parse_program(source).expect("Failed to parse test source");
        format_program_as_sexpr(&program)
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(sexpr(""), "(program)");
    }

    #[test]
    fn test_expressions_stay_on_one_line() {
        assert_eq!(
            sexpr("x = 2 + 3 * 4\nprint not -x"),
            "(program\n  (assign x (+ (integer 2) (* (integer 3) (integer 4))))\n  (print (not (neg x))))"
        );
    }

    #[test]
    fn test_collections_and_access() {
        assert_eq!(
            sexpr("print [1, \"a\"]\nprint {\"k\": null}\nprint d.k[0]"),
            "(program\n  (print (list (integer 1) \"a\"))\n  (print (dict (\"k\" null)))\n  (print (index (property d k) (integer 0))))"
        );
    }

    #[test]
    fn test_nested_blocks_are_indented() {
        let source = "def f(a, b) then\n    if a < b then\n        return a\n    else\n        pass\n    end\nend";
        let expected = "\
(program
  (def f (params a b)
    (body
      (if (< a b)
        (then
          (return a))
        (else
          (pass))))))";
        assert_eq!(sexpr(source), expected);
    }

    #[test]
    fn test_loops_try_and_calls() {
        let source = "for x in xs then show(x, 1.5) end\nwhile true then break end\ntry f() except end";
        let expected = "\
(program
  (for x xs
    (do
      (call show x (float 1.5))))
  (while (boolean true)
    (do
      (break)))
  (try
    (body
      (call f))
    (except)))";
        assert_eq!(sexpr(source), expected);
    }
}
