use crate::test_harness::{InterpreterSession, TestHarnessError};
use crate::{RuntimeError, Value};

#[test]
fn test_variables_persist_between_runs() {
    let mut session = InterpreterSession::new();

    session.execute("counter = 1").unwrap();
    session.execute("counter = counter + 1").unwrap();

    assert_eq!(session.get_variable("counter").unwrap(), Value::Integer(2));
    session.assert_output("print counter", &["2"]).unwrap();
}

#[test]
fn test_functions_persist_between_runs() {
    let mut session = InterpreterSession::new();

    session.execute("def double(n) then return n * 2 end").unwrap();
    session.assert_evaluates_to_integer("double(21)", 42).unwrap();
}

#[test]
fn test_state_before_fault_is_kept() {
    let mut session = InterpreterSession::new();

    let (error, _) = session
        .execute_expecting_error("kept = \"yes\"\nprint 1 / 0\nlost = 1")
        .unwrap();
    assert!(matches!(error, RuntimeError::DivisionByZero { .. }));

    session.assert_evaluates_to_string("kept", "yes").unwrap();
    assert!(matches!(
        session.get_variable("lost"),
        Err(TestHarnessError::VariableNotFound { .. })
    ));
}

#[test]
fn test_reset_forgets_user_state_but_keeps_builtins() {
    let mut session = InterpreterSession::new();
    session
        .execute("x = 1\ndef f() then return 1 end\ndef len(v) then return 0 end")
        .unwrap();

    session.reset();

    assert!(session.get_variable("x").is_err());
    let (error, _) = session.execute_expecting_error("f()").unwrap();
    assert!(matches!(error, RuntimeError::UndefinedFunction { .. }));
    session.assert_evaluates_to_integer("len([1, 2])", 2).unwrap();
}

#[test]
fn test_output_is_per_run() {
    let mut session = InterpreterSession::new();

    assert_eq!(session.execute("print 1").unwrap(), vec!["1"]);
    assert_eq!(session.execute("print 2").unwrap(), vec!["2"]);
    assert!(session.execute("x = 3").unwrap().is_empty());
}
