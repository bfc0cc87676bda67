use crate::test_harness::InterpreterSession;
use crate::{RuntimeError, Value};

#[test]
fn test_precedence_program() {
    let mut session = InterpreterSession::new();
    session
        .assert_output("x = 2 + 3 * 4\nprint x", &["14"])
        .unwrap();
}

#[test]
fn test_integer_operations() {
    let mut session = InterpreterSession::new();

    session.assert_evaluates_to_integer("1 + 2", 3).unwrap();
    session.assert_evaluates_to_integer("10 - 3 - 2", 5).unwrap();
    session.assert_evaluates_to_integer("4 * 5", 20).unwrap();
    session.assert_evaluates_to_integer("17 % 5", 2).unwrap();
    session.assert_evaluates_to_integer("-7 % 3", 2).unwrap();
    session.assert_evaluates_to_integer("(2 + 3) * 4", 20).unwrap();
    session.assert_evaluates_to_integer("-(2 + 3)", -5).unwrap();
}

#[test]
fn test_division_always_yields_float() {
    let mut session = InterpreterSession::new();

    session.assert_evaluates_to_float("7 / 2", 3.5).unwrap();
    session.assert_evaluates_to_float("6 / 3", 2.0).unwrap();
    session.assert_output("print 6 / 3", &["2.0"]).unwrap();
}

#[test]
fn test_mixed_arithmetic_promotes_to_float() {
    let mut session = InterpreterSession::new();

    session.assert_evaluates_to_float("1 + 0.5", 1.5).unwrap();
    session.assert_evaluates_to_float("2.5 * 2", 5.0).unwrap();
    session.assert_evaluates_to_integer("true + true", 2).unwrap();
}

#[test]
fn test_string_operators() {
    let mut session = InterpreterSession::new();

    session
        .assert_evaluates_to_string("\"foo\" + 'bar'", "foobar")
        .unwrap();
    session.assert_evaluates_to_string("\"ab\" * 3", "ababab").unwrap();
}

#[test]
fn test_comparisons() {
    let mut session = InterpreterSession::new();

    session.assert_evaluates_to_boolean("1 == 1.0", true).unwrap();
    session.assert_evaluates_to_boolean("1 != 2", true).unwrap();
    session.assert_evaluates_to_boolean("\"a\" == 1", false).unwrap();
    session.assert_evaluates_to_boolean("null == null", true).unwrap();
    session.assert_evaluates_to_boolean("2 >= 2", true).unwrap();
    session.assert_evaluates_to_boolean("\"abc\" < \"abd\"", true).unwrap();
    session.assert_evaluates_to_boolean("[1, 2] < [1, 3]", true).unwrap();
}

#[test]
fn test_comparison_chain_nests_right() {
    let mut session = InterpreterSession::new();

    // 1 < (2 < 0) is 1 < false, and false counts as 0
    session.assert_evaluates_to_boolean("1 < 2 < 0", false).unwrap();
    // 0 < (2 < 3) is 0 < true
    session.assert_evaluates_to_boolean("0 < 2 < 3", true).unwrap();
}

#[test]
fn test_logical_operators_return_deciding_operand() {
    let mut session = InterpreterSession::new();

    session.assert_evaluates_to_integer("0 or 5", 5).unwrap();
    session.assert_evaluates_to_integer("3 or 5", 3).unwrap();
    session.assert_evaluates_to_integer("0 and 5", 0).unwrap();
    session.assert_evaluates_to_string("1 and \"yes\"", "yes").unwrap();
    session.assert_evaluates_to_null("null and 1").unwrap();
    session.assert_evaluates_to_boolean("not 0", true).unwrap();
    session.assert_evaluates_to_boolean("not [1]", false).unwrap();
}

#[test]
fn test_logical_operators_short_circuit() {
    let mut session = InterpreterSession::new();

    // The right operand would fault if evaluated
    session.assert_evaluates_to_boolean("false and 1 / 0", false).unwrap();
    session.assert_evaluates_to_boolean("true or missing", true).unwrap();
}

#[test]
fn test_arithmetic_faults() {
    let mut session = InterpreterSession::new();

    let (error, _) = session.execute_expecting_error("print 1 / 0").unwrap();
    assert!(matches!(error, RuntimeError::DivisionByZero { .. }));

    let (error, _) = session.execute_expecting_error("print 5 % 0").unwrap();
    assert!(matches!(error, RuntimeError::DivisionByZero { .. }));

    let (error, _) = session
        .execute_expecting_error("print 9223372036854775807 + 1")
        .unwrap();
    assert!(matches!(error, RuntimeError::IntegerOverflow { .. }));

    let (error, _) = session.execute_expecting_error("print \"a\" - 1").unwrap();
    match error {
        RuntimeError::InvalidOperation {
            operation,
            operand_types,
            ..
        } => {
            assert_eq!(operation, "-");
            assert_eq!(operand_types, "string, int");
        }
        other => panic!("Expected invalid operation, got: {other:?}"),
    }

    let (error, _) = session.execute_expecting_error("print 1 < \"a\"").unwrap();
    assert!(matches!(error, RuntimeError::InvalidOperation { .. }));
}

#[test]
fn test_float_output_format() {
    let mut session = InterpreterSession::new();
    session
        .assert_output("print 1.0\nprint 0.5 + 0.25\nprint 10 / 4", &["1.0", "0.75", "2.5"])
        .unwrap();
    assert_eq!(session.evaluate("1.5 * 2").unwrap(), Value::Float(3.0));
}
