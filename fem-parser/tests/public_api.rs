use fem_parser::{parse_program, tokenize, Parser, StatementKind, TokenKind};

#[test]
fn test_tokenize_then_parse() {
    let source = "x = 2 + 3 * 4\nprint x";
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));

    let program = Parser::new(tokens).with_source(source).parse().unwrap();
    assert_eq!(program.statements.len(), 2);
    assert!(matches!(
        program.statements[0].kind,
        StatementKind::Assignment(_)
    ));
    assert!(matches!(program.statements[1].kind, StatementKind::Print(_)));
}

#[test]
fn test_parse_program_matches_manual_pipeline() {
    let source = "def f(n) then if n < 2 then return n end return f(n - 1) + f(n - 2) end";
    let manual = Parser::new(tokenize(source).unwrap()).parse().unwrap();
    assert_eq!(parse_program(source).unwrap(), manual);
}

#[test]
fn test_diagnostics_carry_source_snippet() {
    use miette::Diagnostic;

    let error = parse_program("print (1 + 2").unwrap_err();
    assert!(error.source_code().is_some());
    assert!(error.code().is_some());
    assert!(error.labels().is_some());
}

#[test]
fn test_parse_expression_entry_point() {
    use fem_parser::{parse_expression, ExpressionKind};

    let expression = parse_expression("xs[0] + len(xs)").unwrap();
    assert!(matches!(expression.kind, ExpressionKind::Binary(_)));

    let error = parse_expression("x = 1").unwrap_err();
    assert!(!error.is_incomplete_input());
    assert!(parse_expression("(1 +").unwrap_err().is_incomplete_input());
}

#[test]
fn test_diagnostics_without_source_have_no_snippet() {
    use miette::Diagnostic;

    let source = "print (1 + 2";
    let error = Parser::new(tokenize(source).unwrap()).parse().unwrap_err();
    assert!(error.source_code().is_none());
    assert!(error.labels().is_some());

    let error = Parser::new(tokenize(source).unwrap())
        .with_source(source)
        .parse()
        .unwrap_err();
    assert!(error.source_code().is_some());
}
