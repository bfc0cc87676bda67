use crate::RuntimeError;
use crate::test_harness::InterpreterSession;

#[test]
fn test_len() {
    let mut session = InterpreterSession::new();

    session.assert_evaluates_to_integer("len([1, 2, 3])", 3).unwrap();
    session.assert_evaluates_to_integer("len(\"hello\")", 5).unwrap();
    session.assert_evaluates_to_integer("len(\"\")", 0).unwrap();
    session.assert_evaluates_to_integer("len({\"a\": 1})", 1).unwrap();

    let (error, _) = session.execute_expecting_error("print len(5)").unwrap();
    assert!(matches!(error, RuntimeError::TypeError { .. }));
}

#[test]
fn test_type() {
    let mut session = InterpreterSession::new();

    let cases = [
        ("1", "int"),
        ("1.5", "float"),
        ("\"s\"", "string"),
        ("true", "bool"),
        ("null", "null"),
        ("[]", "list"),
        ("{}", "dict"),
        ("type", "builtin"),
    ];
    for (expression, expected) in cases {
        session
            .assert_evaluates_to_string(&format!("type({expression})"), expected)
            .unwrap();
    }
}

#[test]
fn test_builtin_arity_checked() {
    let mut session = InterpreterSession::new();
    let (error, _) = session.execute_expecting_error("print len([1], [2])").unwrap();
    assert!(matches!(
        error,
        RuntimeError::WrongArity {
            expected: 1,
            found: 2,
            ..
        }
    ));
}

#[test]
fn test_ask_reads_input() {
    let mut session = InterpreterSession::with_input(["Ada", "36\n"]);
    let code = r#"
name = ask("Name? ")
age = ask("Age? ")
print "Hi " + name + ", " + age
"#;
    session.assert_output(code, &["Hi Ada, 36"]).unwrap();
    assert_eq!(session.prompts(), ["Name? ".to_string(), "Age? ".to_string()]);
}

#[test]
fn test_ask_at_end_of_input_faults() {
    let mut session = InterpreterSession::new();
    let (error, _) = session.execute_expecting_error("x = ask(\"> \")").unwrap();
    assert!(matches!(error, RuntimeError::Io { .. }));

    session.push_input("late");
    session.assert_output("print ask(\"> \")", &["late"]).unwrap();
}
