//! REPL (Read-Eval-Print Loop) for the Fem interpreter
//!
//! Every line runs against one long-lived [`Interpreter`], so variables and
//! function definitions persist between inputs. Features:
//! - bare expressions are printed, statements run as in a program
//! - input continues over several lines while a block or string is unterminated
//! - `:` commands for inspecting and resetting the session
//! - history and line editing with rustyline

use fem_interpreter::{Console, Interpreter, RuntimeError, StdConsole, Value};
use fem_parser::{ParseError, parse_expression, parse_program};
use miette::Diagnostic;
use rustyline::{DefaultEditor, error::ReadlineError};
use thiserror::Error;

/// Errors that can occur in the REPL
#[derive(Debug, Error, Diagnostic)]
pub enum ReplError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("Readline error: {source}")]
    Readline {
        #[from]
        source: ReadlineError,
    },

    #[error("REPL command error: {message}")]
    #[diagnostic(code(fem::repl::command), help("Type :help for available commands"))]
    Command { message: String },
}

/// REPL configuration options
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string for input
    pub prompt: String,

    /// Enable history persistence
    pub persist_history: bool,

    /// History file path
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "fem> ".to_string(),
            persist_history: true,
            history_file: Some(".fem_history".to_string()),
        }
    }
}

/// REPL session statistics
#[derive(Debug, Clone, Default)]
pub struct ReplStats {
    pub statements_executed: usize,
    pub expressions_evaluated: usize,
    pub errors_encountered: usize,
    pub commands_executed: usize,
}

/// Result of evaluating one input in the REPL
#[derive(Debug)]
pub enum ReplResult {
    /// A bare expression and its value
    Value { value: Value },

    /// Statements ran; anything they printed has already gone to the console
    Executed { statements: usize },

    /// Executed a REPL command
    Command { message: String },

    /// Empty line or comment
    Empty,

    /// Exit request
    Exit,
}

/// REPL session that keeps interpreter state across inputs
pub struct ReplSession<C: Console = StdConsole> {
    interpreter: Interpreter<C>,
    config: ReplConfig,
    stats: ReplStats,
}

impl ReplSession<StdConsole> {
    pub fn new() -> Self {
        Self::with_interpreter(Interpreter::new(), ReplConfig::default())
    }
}

impl Default for ReplSession<StdConsole> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Console> ReplSession<C> {
    pub fn with_interpreter(interpreter: Interpreter<C>, config: ReplConfig) -> Self {
        Self {
            interpreter,
            config,
            stats: ReplStats::default(),
        }
    }

    /// Start the REPL main loop
    pub fn run(&mut self) -> Result<(), ReplError> {
        let mut editor = DefaultEditor::new()?;
        if self.config.persist_history {
            if let Some(ref history_file) = self.config.history_file {
                // Missing on first run
                let _ = editor.load_history(history_file);
            }
        }

        self.print_welcome();

        while let Some(input) = self.read_input(&mut editor)? {
            match self.evaluate_line(&input) {
                Ok(ReplResult::Exit) => break,
                Ok(result) => self.display_result(result),
                Err(error) => {
                    self.stats.errors_encountered += 1;
                    display_error(error, &input);
                }
            }
        }

        println!("Goodbye!");
        self.save_history(&mut editor)
    }

    /// Read one complete input, prompting with `... ` while it is unfinished
    fn read_input(&mut self, editor: &mut DefaultEditor) -> Result<Option<String>, ReplError> {
        let mut complete_input = String::new();

        loop {
            let prompt = if complete_input.is_empty() {
                self.config.prompt.as_str()
            } else {
                "... "
            };

            match editor.readline(prompt) {
                Ok(line) => {
                    if complete_input.is_empty() && line.trim().is_empty() {
                        return Ok(Some(String::new()));
                    }

                    if !complete_input.is_empty() {
                        complete_input.push('\n');
                    }
                    complete_input.push_str(&line);

                    if is_input_complete(&complete_input) {
                        editor.add_history_entry(complete_input.as_str())?;
                        return Ok(Some(complete_input));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Abandon the current input and start over
                    println!("^C");
                    return Ok(Some(String::new()));
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(error) => return Err(ReplError::Readline { source: error }),
            }
        }
    }

    /// Evaluate one input
    pub fn evaluate_line(&mut self, input: &str) -> Result<ReplResult, ReplError> {
        let trimmed = input.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(ReplResult::Empty);
        }

        if trimmed.starts_with(':') {
            return self.execute_command(trimmed);
        }

        let program = match parse_program(input) {
            Ok(program) => program,
            Err(error) => {
                // Not a program; maybe a bare expression
                return match self.evaluate_bare_expression(input) {
                    Some(result) => result,
                    None => Err(error.into()),
                };
            }
        };

        tracing::debug!(statements = program.statements.len(), "executing REPL input");
        self.interpreter.interpret(&program.statements)?;
        self.stats.statements_executed += program.statements.len();

        Ok(ReplResult::Executed {
            statements: program.statements.len(),
        })
    }

    /// `None` when `input` does not parse as a single expression either
    fn evaluate_bare_expression(&mut self, input: &str) -> Option<Result<ReplResult, ReplError>> {
        let expression = parse_expression(input).ok()?;
        let result = match self.interpreter.evaluate_expression(&expression) {
            Ok(value) => {
                self.stats.expressions_evaluated += 1;
                Ok(ReplResult::Value { value })
            }
            Err(error) => Err(error.into()),
        };
        Some(result)
    }

    /// Execute a REPL command
    fn execute_command(&mut self, command: &str) -> Result<ReplResult, ReplError> {
        self.stats.commands_executed += 1;

        let mut parts = command.split_whitespace();
        let Some(name) = parts.next() else {
            return Ok(ReplResult::Empty);
        };

        match name {
            ":help" | ":h" => Ok(ReplResult::Command {
                message: help_message(),
            }),

            ":vars" | ":variables" => Ok(ReplResult::Command {
                message: self.format_variables(),
            }),

            ":functions" | ":fns" => Ok(ReplResult::Command {
                message: self.format_functions(),
            }),

            ":reset" | ":clear" => {
                self.interpreter.reset();
                Ok(ReplResult::Command {
                    message: "Variables and functions cleared".to_string(),
                })
            }

            ":stats" => Ok(ReplResult::Command {
                message: self.format_stats(),
            }),

            ":config" => Ok(ReplResult::Command {
                message: self.format_config(),
            }),

            ":quit" | ":q" | ":exit" => Ok(ReplResult::Exit),

            unknown => Err(ReplError::Command {
                message: format!("Unknown command: {unknown}"),
            }),
        }
    }

    fn display_result(&self, result: ReplResult) {
        match result {
            ReplResult::Value { value } => println!("{}", value.to_display_string()),
            ReplResult::Command { message } => println!("{message}"),
            ReplResult::Executed { .. } | ReplResult::Empty | ReplResult::Exit => {}
        }
    }

    fn print_welcome(&self) {
        println!("Fem REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for commands, :quit to exit");
        println!();
    }

    fn save_history(&self, editor: &mut DefaultEditor) -> Result<(), ReplError> {
        if self.config.persist_history {
            if let Some(ref history_file) = self.config.history_file {
                editor.save_history(history_file)?;
            }
        }
        Ok(())
    }

    fn format_variables(&self) -> String {
        let variables = self.interpreter.context().environment.all_vars();
        if variables.is_empty() {
            return "No variables defined".to_string();
        }

        let mut lines = vec!["Variables:".to_string()];
        for (name, value) in variables {
            lines.push(format!("  {name} = {}", value.to_display_string()));
        }
        lines.join("\n")
    }

    fn format_functions(&self) -> String {
        let mut lines = vec!["Functions:".to_string()];
        for (name, callable) in self.interpreter.context().functions.entries() {
            let kind = callable.to_value().type_name();
            lines.push(format!("  {name}/{} ({kind})", callable.arity()));
        }
        lines.join("\n")
    }

    fn format_stats(&self) -> String {
        format!(
            r#"Session Statistics:
  Statements executed: {}
  Expressions evaluated: {}
  Errors encountered: {}
  Commands executed: {}"#,
            self.stats.statements_executed,
            self.stats.expressions_evaluated,
            self.stats.errors_encountered,
            self.stats.commands_executed
        )
    }

    fn format_config(&self) -> String {
        format!(
            r#"REPL Configuration:
  Prompt: "{}"
  Persist history: {}
  History file: {}
  Max call depth: {}
  Max sequence length: {}"#,
            self.config.prompt,
            self.config.persist_history,
            self.config.history_file.as_deref().unwrap_or("<none>"),
            self.interpreter.context().config().max_call_depth,
            self.interpreter.context().config().max_sequence_length
        )
    }

    pub fn interpreter(&self) -> &Interpreter<C> {
        &self.interpreter
    }

    pub fn stats(&self) -> &ReplStats {
        &self.stats
    }
}

/// True unless the input stops inside an open block, string or bracket
pub fn is_input_complete(input: &str) -> bool {
    match parse_program(input) {
        Ok(_) => true,
        Err(error) if error.is_incomplete_input() => false,
        Err(_) => !matches!(parse_expression(input), Err(error) if error.is_incomplete_input()),
    }
}

/// Render an error against the input that caused it
fn display_error(error: ReplError, input: &str) {
    match error {
        // Parse errors carry their own source
        ReplError::Parse(error) => eprintln!("{:?}", miette::Report::new(error)),
        ReplError::Runtime(error) => {
            let source = miette::NamedSource::new("<repl>", input.to_string());
            eprintln!("{:?}", miette::Report::new(error).with_source_code(source));
        }
        error => eprintln!("{:?}", miette::Report::new(error)),
    }
}

fn help_message() -> String {
    r#"Fem REPL Commands:
  :help, :h              Show this help message
  :vars, :variables      List all variables with their values
  :functions, :fns       List builtin and user functions
  :reset, :clear         Forget all variables and user functions
  :stats                 Show session statistics
  :config                Show current configuration
  :quit, :q, :exit       Exit the REPL

Examples:
  x = 2 + 3 * 4          Assign a variable
  x * 2                  Evaluate and show an expression
  def sq(n) then         Start a function; input continues
      return n * n       with the ... prompt until the
  end                    block is closed

Use Ctrl+C to abandon the current input, Ctrl+D to exit."#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fem_interpreter::BufferedConsole;

    fn create_test_repl() -> ReplSession<BufferedConsole> {
        let config = ReplConfig {
            persist_history: false,
            history_file: None,
            ..Default::default()
        };
        ReplSession::with_interpreter(Interpreter::with_console(BufferedConsole::new()), config)
    }

    fn command_message(result: ReplResult) -> String {
        match result {
            ReplResult::Command { message } => message,
            other => panic!("Expected command result, got: {other:?}"),
        }
    }

    #[test]
    fn test_bare_expression_evaluation() {
        let mut repl = create_test_repl();

        match repl.evaluate_line("2 + 3 * 4").unwrap() {
            ReplResult::Value { value } => assert_eq!(value, Value::Integer(14)),
            other => panic!("Expected value result, got: {other:?}"),
        }
        assert_eq!(repl.stats().expressions_evaluated, 1);
    }

    #[test]
    fn test_statements_persist_between_lines() {
        let mut repl = create_test_repl();

        assert!(matches!(
            repl.evaluate_line("x = 20").unwrap(),
            ReplResult::Executed { statements: 1 }
        ));
        repl.evaluate_line("def twice(n) then\n    return n * 2\nend")
            .unwrap();
        repl.evaluate_line("print twice(x) + 2").unwrap();

        assert_eq!(repl.interpreter().console().output(), ["42"]);
        assert_eq!(repl.stats().statements_executed, 3);
    }

    #[test]
    fn test_empty_line_handling() {
        let mut repl = create_test_repl();

        assert!(matches!(repl.evaluate_line("").unwrap(), ReplResult::Empty));
        assert!(matches!(repl.evaluate_line("   ").unwrap(), ReplResult::Empty));
        assert!(matches!(
            repl.evaluate_line("# comment").unwrap(),
            ReplResult::Empty
        ));
    }

    #[test]
    fn test_errors_are_reported_not_fatal() {
        let mut repl = create_test_repl();

        assert!(matches!(
            repl.evaluate_line("print missing"),
            Err(ReplError::Runtime(RuntimeError::UndefinedVariable { .. }))
        ));
        assert!(matches!(
            repl.evaluate_line("x = = 1"),
            Err(ReplError::Parse(_))
        ));
        assert!(matches!(
            repl.evaluate_line("1 / 0"),
            Err(ReplError::Runtime(RuntimeError::DivisionByZero { .. }))
        ));

        repl.evaluate_line("print 1").unwrap();
        assert_eq!(repl.interpreter().console().output(), ["1"]);
    }

    #[test]
    fn test_help_command() {
        let mut repl = create_test_repl();

        let message = command_message(repl.evaluate_line(":help").unwrap());
        assert!(message.contains("Fem REPL Commands"));
        assert!(message.contains(":vars"));
        assert!(message.contains(":functions"));
        assert!(message.contains(":quit"));

        assert_eq!(repl.stats().commands_executed, 1);
    }

    #[test]
    fn test_vars_command() {
        let mut repl = create_test_repl();

        let message = command_message(repl.evaluate_line(":vars").unwrap());
        assert_eq!(message, "No variables defined");

        repl.evaluate_line("name = \"fem\"\ncount = 3").unwrap();
        let message = command_message(repl.evaluate_line(":vars").unwrap());
        assert_eq!(message, "Variables:\n  count = 3\n  name = \"fem\"");
    }

    #[test]
    fn test_functions_command() {
        let mut repl = create_test_repl();
        repl.evaluate_line("def add(a, b) then return a + b end")
            .unwrap();

        let message = command_message(repl.evaluate_line(":functions").unwrap());
        assert!(message.contains("add/2 (function)"));
        assert!(message.contains("len/1 (builtin)"));
        assert!(message.contains("ask/1 (builtin)"));
    }

    #[test]
    fn test_reset_command() {
        let mut repl = create_test_repl();
        repl.evaluate_line("x = 1").unwrap();

        let message = command_message(repl.evaluate_line(":reset").unwrap());
        assert!(message.contains("cleared"));
        assert!(repl.evaluate_line("x").is_err());
    }

    #[test]
    fn test_quit_command() {
        let mut repl = create_test_repl();

        for command in [":quit", ":q", ":exit"] {
            assert!(matches!(
                repl.evaluate_line(command).unwrap(),
                ReplResult::Exit
            ));
        }
    }

    #[test]
    fn test_unknown_command() {
        let mut repl = create_test_repl();

        match repl.evaluate_line(":frobnicate") {
            Err(ReplError::Command { message }) => {
                assert!(message.contains("Unknown command"));
                assert!(message.contains(":frobnicate"));
            }
            other => panic!("Expected command error, got: {other:?}"),
        }
    }

    #[test]
    fn test_stats_and_config_commands() {
        let mut repl = create_test_repl();
        let _ = repl.evaluate_line("42");
        let _ = repl.evaluate_line(":help");

        let message = command_message(repl.evaluate_line(":stats").unwrap());
        assert!(message.contains("Expressions evaluated: 1"));
        assert!(message.contains("Commands executed: 2"));

        let message = command_message(repl.evaluate_line(":config").unwrap());
        assert!(message.contains("fem>"));
        assert!(message.contains("Max call depth: 64"));
        assert!(message.contains("Max sequence length: 16777216"));
    }

    #[test]
    fn test_multi_line_input_detection() {
        assert!(is_input_complete("x = 42"));
        assert!(is_input_complete("print [1, 2, 3]"));
        assert!(is_input_complete("if x then print 1 end"));

        assert!(!is_input_complete("if x then"));
        assert!(!is_input_complete("def f(a) then\n    return a"));
        assert!(!is_input_complete("while true then\n    if x then pass end"));
        assert!(!is_input_complete("print \"unclosed"));
        assert!(!is_input_complete("x = [1,"));
        assert!(!is_input_complete("(1 +"));

        // Errors that more input cannot fix are complete
        assert!(is_input_complete("x = )"));
        assert!(is_input_complete("print @"));
    }

    #[test]
    fn test_repl_config_defaults() {
        let config = ReplConfig::default();
        assert_eq!(config.prompt, "fem> ");
        assert!(config.persist_history);
        assert_eq!(config.history_file, Some(".fem_history".to_string()));
    }
}
