//! End-to-end runs through the public API

use fem_interpreter::{BufferedConsole, Interpreter, InterpreterError, RuntimeError};

fn run(source: &str) -> (Result<(), InterpreterError>, Vec<String>) {
    let mut interpreter = Interpreter::with_console(BufferedConsole::new());
    let result = interpreter.run_source(source);
    let output = interpreter.console_mut().take_output();
    (result, output)
}

#[test]
fn test_fizzbuzz() {
    let source = r#"
# classic
def fizzbuzz(n) then
    if n % 15 == 0 then
        return "FizzBuzz"
    else
        if n % 3 == 0 then return "Fizz" end
        if n % 5 == 0 then return "Buzz" end
    end
    return n
end

i = 1
while i <= 15 then
    print fizzbuzz(i)
    i = i + 1
end
"#;
    let (result, output) = run(source);
    result.unwrap();
    assert_eq!(
        output,
        vec![
            "1", "2", "Fizz", "4", "Buzz", "Fizz", "7", "8", "Fizz", "Buzz", "11", "Fizz", "13",
            "14", "FizzBuzz"
        ]
    );
}

#[test]
fn test_word_counts_with_dicts() {
    let source = r#"
def count(words) then
    total = 0
    for w in words then
        total = total + len(w)
    end
    return {"words": len(words), "letters": total}
end
stats = count(["fem", "is", "small"])
print stats.words
print stats["letters"]
print stats
"#;
    let (result, output) = run(source);
    result.unwrap();
    assert_eq!(output, vec!["3", "10", "{\"words\": 3, \"letters\": 10}"]);
}

#[test]
fn test_interactive_program() {
    let mut interpreter = Interpreter::with_console(BufferedConsole::with_input(["World", "3"]));
    let source = r#"
who = ask("Who? ")
times = ask("How many? ")
print ("Hello " + who + "! ") * len(times)
"#;
    interpreter.run_source(source).unwrap();

    assert_eq!(interpreter.console().output(), ["Hello World! "]);
    assert_eq!(interpreter.console().prompts(), ["Who? ", "How many? "]);
}

#[test]
fn test_parse_error_prevents_execution() {
    let (result, output) = run("print \"partial\"\nprint (1 +");
    assert!(matches!(result, Err(InterpreterError::Parse(_))));
    assert!(output.is_empty());
}

#[test]
fn test_runtime_error_keeps_earlier_output() {
    let (result, output) = run("xs = [1]\nprint \"a\"\nprint xs[5]\nprint \"b\"");
    assert_eq!(output, vec!["a"]);
    match result {
        Err(InterpreterError::Runtime(RuntimeError::IndexOutOfBounds { index, length, span })) => {
            assert_eq!((index, length), (5, 1));
            assert!(span.is_some());
        }
        other => panic!("Expected index out of bounds, got: {other:?}"),
    }
}
