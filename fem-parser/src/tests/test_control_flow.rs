use crate::{ast::*, parse_program};
use pretty_assertions::assert_eq;

fn parse_single(input: &str) -> StatementKind {
    let program = parse_program(input).unwrap();
    assert_eq!(program.statements.len(), 1, "expected one statement");
    program.statements[0].kind.clone()
}

#[test]
fn test_if_without_else() {
    match parse_single("if x > 1 then print x end") {
        StatementKind::If(if_stmt) => {
            assert_eq!(if_stmt.then_block.statements.len(), 1);
            assert!(if_stmt.else_block.is_none());
        }
        other => panic!("Expected if statement, got: {other:?}"),
    }
}

#[test]
fn test_if_with_else() {
    let input = r#"
if x then
    print "yes"
    print "still yes"
else
    print "no"
end
"#;
    match parse_single(input) {
        StatementKind::If(if_stmt) => {
            assert_eq!(if_stmt.then_block.statements.len(), 2);
            assert_eq!(if_stmt.else_block.map(|b| b.statements.len()), Some(1));
        }
        other => panic!("Expected if statement, got: {other:?}"),
    }
}

#[test]
fn test_empty_blocks_are_allowed() {
    match parse_single("if x then else end") {
        StatementKind::If(if_stmt) => {
            assert!(if_stmt.then_block.statements.is_empty());
            assert_eq!(if_stmt.else_block.map(|b| b.statements.is_empty()), Some(true));
        }
        other => panic!("Expected if statement, got: {other:?}"),
    }
}

#[test]
fn test_while_loop() {
    match parse_single("while i < 3 then i = i + 1 end") {
        StatementKind::While(while_loop) => {
            assert!(matches!(
                while_loop.condition.kind,
                ExpressionKind::Comparison(_)
            ));
            assert_eq!(while_loop.body.statements.len(), 1);
        }
        other => panic!("Expected while loop, got: {other:?}"),
    }
}

#[test]
fn test_for_loop_with_assign_binder() {
    match parse_single("for x = [1, 2] then print x end") {
        StatementKind::For(for_loop) => {
            assert_eq!(for_loop.variable.name, "x");
            assert!(matches!(for_loop.iterable.kind, ExpressionKind::List(_)));
            assert_eq!(for_loop.body.statements.len(), 1);
        }
        other => panic!("Expected for loop, got: {other:?}"),
    }
}

#[test]
fn test_for_loop_with_in_binder() {
    match parse_single("for ch in \"abc\" then print ch end") {
        StatementKind::For(for_loop) => assert_eq!(for_loop.variable.name, "ch"),
        other => panic!("Expected for loop, got: {other:?}"),
    }
}

#[test]
fn test_function_definition() {
    let input = r#"
def add(a, b) then
    return a + b
end
"#;
    match parse_single(input) {
        StatementKind::FunctionDefinition(def) => {
            assert_eq!(def.name.name, "add");
            let params: Vec<&str> = def.parameters.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(params, vec!["a", "b"]);
            assert_eq!(def.body.statements.len(), 1);
        }
        other => panic!("Expected function definition, got: {other:?}"),
    }
}

#[test]
fn test_function_definition_without_parameters() {
    match parse_single("def noop() then pass end") {
        StatementKind::FunctionDefinition(def) => assert!(def.parameters.is_empty()),
        other => panic!("Expected function definition, got: {other:?}"),
    }
}

#[test]
fn test_try_except() {
    let input = r#"
try
    print missing
except
    print "recovered"
end
"#;
    match parse_single(input) {
        StatementKind::Try(try_stmt) => {
            assert_eq!(try_stmt.body.statements.len(), 1);
            assert_eq!(try_stmt.handler.statements.len(), 1);
        }
        other => panic!("Expected try statement, got: {other:?}"),
    }
}

#[test]
fn test_nested_blocks() {
    let input = r#"
def find(xs, target) then
    for x in xs then
        if x == target then
            return true
        end
    end
    return false
end
"#;
    match parse_single(input) {
        StatementKind::FunctionDefinition(def) => {
            assert_eq!(def.body.statements.len(), 2);
            match &def.body.statements[0].kind {
                StatementKind::For(for_loop) => {
                    assert!(matches!(
                        for_loop.body.statements[0].kind,
                        StatementKind::If(_)
                    ));
                }
                other => panic!("Expected for loop, got: {other:?}"),
            }
        }
        other => panic!("Expected function definition, got: {other:?}"),
    }
}

#[test]
fn test_compound_statement_span_reaches_end_keyword() {
    let program = parse_program("while x then pass end").unwrap();
    assert_eq!(program.statements[0].span, Span::new(0, 21));
}
