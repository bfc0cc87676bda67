use crate::test_harness::InterpreterSession;
use crate::{InterpreterConfig, RuntimeError, Value};

#[test]
fn test_define_and_call() {
    let mut session = InterpreterSession::new();
    let code = r#"
def add(a, b) then
    return a + b
end
print add(2, 3)
"#;
    session.assert_output(code, &["5"]).unwrap();
}

#[test]
fn test_call_statement_discards_result() {
    let mut session = InterpreterSession::new();
    let code = r#"
def greet(name) then
    print "hello " + name
    return 1
end
greet("Ada")
"#;
    session.assert_output(code, &["hello Ada"]).unwrap();
}

#[test]
fn test_missing_return_yields_null() {
    let mut session = InterpreterSession::new();
    session
        .assert_output("def f() then pass end\nprint f()", &["null"])
        .unwrap();
    session
        .assert_output("def g() then return end\nprint g()", &["null"])
        .unwrap();
}

#[test]
fn test_return_exits_nested_loops() {
    let mut session = InterpreterSession::new();
    let code = r#"
def find(xs, target) then
    for x in xs then
        while true then
            if x == target then
                return "found"
            end
            break
        end
    end
    return "missing"
end
print find([1, 2, 3], 2)
print find([1, 2, 3], 7)
"#;
    session.assert_output(code, &["found", "missing"]).unwrap();
}

#[test]
fn test_recursion() {
    let mut session = InterpreterSession::new();
    let code = r#"
def fib(n) then
    if n < 2 then
        return n
    end
    return fib(n - 1) + fib(n - 2)
end
print fib(10)
"#;
    session.assert_output(code, &["55"]).unwrap();
}

#[test]
fn test_parameters_are_invisible_after_call() {
    let mut session = InterpreterSession::new();
    session
        .execute("def f(secret) then local = secret end\nf(42)")
        .unwrap();

    let (error, _) = session.execute_expecting_error("print secret").unwrap();
    assert!(matches!(error, RuntimeError::UndefinedVariable { .. }));
    let (error, _) = session.execute_expecting_error("print local").unwrap();
    assert!(matches!(error, RuntimeError::UndefinedVariable { .. }));
}

#[test]
fn test_assignment_in_function_shadows_global() {
    let mut session = InterpreterSession::new();
    let code = r#"
x = 1
def f() then
    x = 2
    print x
end
f()
print x
"#;
    session.assert_output(code, &["2", "1"]).unwrap();
}

#[test]
fn test_callee_sees_caller_frames() {
    let mut session = InterpreterSession::new();
    let code = r#"
def inner() then
    print value
end
def outer() then
    value = "from outer"
    inner()
end
outer()
"#;
    session.assert_output(code, &["from outer"]).unwrap();
}

#[test]
fn test_wrong_arity_faults() {
    let mut session = InterpreterSession::new();
    session.execute("def add(a, b) then return a + b end").unwrap();

    let (error, _) = session.execute_expecting_error("print add(1)").unwrap();
    match error {
        RuntimeError::WrongArity {
            function,
            expected,
            found,
            ..
        } => {
            assert_eq!(function, "add");
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        other => panic!("Expected wrong arity, got: {other:?}"),
    }
}

#[test]
fn test_undefined_function_faults() {
    let mut session = InterpreterSession::new();
    let (error, _) = session.execute_expecting_error("nope(1)").unwrap();
    assert!(matches!(error, RuntimeError::UndefinedFunction { ref name, .. } if name == "nope"));
}

#[test]
fn test_redefinition_overwrites() {
    let mut session = InterpreterSession::new();
    let code = r#"
def f() then return 1 end
print f()
def f() then return 2 end
print f()
"#;
    session.assert_output(code, &["1", "2"]).unwrap();
}

#[test]
fn test_user_function_can_replace_builtin() {
    let mut session = InterpreterSession::new();
    session
        .assert_output("def len(x) then return 99 end\nprint len([1])", &["99"])
        .unwrap();
}

#[test]
fn test_functions_are_values() {
    let mut session = InterpreterSession::new();
    session.execute("def square(n) then return n * n end").unwrap();

    session.assert_evaluates_to_string("type(square)", "function").unwrap();
    session.assert_evaluates_to_string("type(len)", "builtin").unwrap();
    session.assert_output("print square", &["<function square>"]).unwrap();
    assert!(matches!(session.evaluate("square").unwrap(), Value::Function(_)));
}

#[test]
fn test_arguments_evaluated_in_caller_scope() {
    let mut session = InterpreterSession::new();
    let code = r#"
def show(n) then
    print n
end
n = 5
show(n + 1)
"#;
    session.assert_output(code, &["6"]).unwrap();
}

#[test]
fn test_unbounded_recursion_is_a_fault() {
    let mut session = InterpreterSession::with_config(InterpreterConfig {
        max_call_depth: 32,
        ..InterpreterConfig::default()
    });
    let (error, _) = session
        .execute_expecting_error("def down(n) then return down(n + 1) end\ndown(0)")
        .unwrap();
    assert!(matches!(
        error,
        RuntimeError::StackOverflow { max_depth: 32, .. }
    ));

    // The session is usable again afterwards
    session.assert_output("print 1", &["1"]).unwrap();
}

#[test]
fn test_runaway_recursion_is_caught_with_default_limits() {
    let mut session = InterpreterSession::new();
    let code = r#"
def down(n) then
    return down(n + 1)
end
try
    down(0)
except
    print "caught"
end
"#;
    session.assert_output(code, &["caught"]).unwrap();

    let (error, _) = session.execute_expecting_error("down(0)").unwrap();
    assert!(matches!(
        error,
        RuntimeError::StackOverflow { max_depth: 64, .. }
    ));
}

#[test]
fn test_deep_recursion_inside_expressions() {
    let mut session = InterpreterSession::new();
    let code = r#"
def total(n) then
    if n == 0 then
        return 0
    end
    parts = [n, total(n - 1)]
    return parts[0] + parts[1] * 1
end
print total(60)
"#;
    session.assert_output(code, &["1830"]).unwrap();
}
