use clap::{ArgAction, Parser, Subcommand};
use fem_interpreter::{Interpreter, InterpreterConfig, InterpreterError};
use fem_parser::{parse_program, tokenize};
use miette::{IntoDiagnostic, MietteHandlerOpts, NamedSource, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

mod repl;
mod sexpr;

use repl::{ReplConfig, ReplSession};

/// Environment variable holding the log filter
const LOG_ENV: &str = "FEM_LOG";

#[derive(Parser)]
#[command(
    name = "fem",
    version,
    about = "The Fem scripting language",
    long_about = "Fem is a small dynamically-typed scripting language with block syntax, lists, dicts and try/except."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Maximum depth of nested function calls before a stack overflow fault
    #[arg(long, global = true, value_name = "N")]
    max_call_depth: Option<usize>,

    /// Log interpreter activity to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Fem program
    Run {
        /// Fem source file to run (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse Fem source files and display their AST
    Parse {
        /// Fem source files to parse (use '-' to read from stdin)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Print reconstructed source instead of an s-expression
        #[arg(short, long)]
        source: bool,
    },

    /// Print the token stream of a Fem source file
    Tokens {
        /// Fem source file to scan (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Start an interactive session
    Repl {
        /// Do not read or write the history file
        #[arg(long)]
        no_history: bool,
    },
}

fn main() {
    setup_miette_handler();

    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let mut config = InterpreterConfig::default();
    if let Some(max_call_depth) = cli.max_call_depth {
        config.max_call_depth = max_call_depth;
    }

    let result = match cli.command {
        Some(Commands::Run { file }) => run_file(&file, config),
        Some(Commands::Parse { files, source }) => {
            handle_parse_command(files, source);
            Ok(())
        }
        Some(Commands::Tokens { file }) => print_tokens(&file),
        Some(Commands::Repl { no_history }) => run_repl(config, no_history),
        None => {
            // No subcommand provided, show help
            Cli::parse_from(["fem", "--help"]);
            Ok(())
        }
    };

    if let Err(report) = result {
        eprintln!("{report:?}");
        process::exit(1);
    }
}

/// Configure miette for error reporting
fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

/// Install a stderr `fmt` subscriber; `FEM_LOG` applies unless -v is given
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Only fails when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn run_file(file_path: &Path, config: InterpreterConfig) -> Result<()> {
    let (source, source_name) = read_source(file_path)?;
    tracing::debug!(file = %source_name, bytes = source.len(), "running program");

    let mut interpreter = Interpreter::with_config(config);
    match interpreter.run_source(&source) {
        Ok(()) => Ok(()),
        // Parse errors carry their own source text
        Err(InterpreterError::Parse(error)) => Err(miette::Report::new(error)),
        Err(InterpreterError::Runtime(error)) => Err(miette::Report::new(error)
            .with_source_code(NamedSource::new(source_name, source))),
    }
}

fn handle_parse_command(files: Vec<PathBuf>, source: bool) {
    let mut success = true;
    let multiple_files = files.len() > 1;

    for file_path in files {
        match parse_single_file(&file_path, source) {
            Ok(()) => {
                if multiple_files {
                    println!("ok: {}", display_name(&file_path));
                }
            }
            Err(e) => {
                eprintln!("{e:?}");
                success = false;
            }
        }
    }

    if !success {
        process::exit(1);
    }
}

fn parse_single_file(file_path: &Path, source: bool) -> Result<()> {
    let (text, _) = read_source(file_path)?;
    let program = parse_program(&text)?;

    if source {
        print!("{program}");
    } else {
        println!("{}", sexpr::format_program_as_sexpr(&program));
    }
    Ok(())
}

fn print_tokens(file_path: &Path) -> Result<()> {
    let (source, _) = read_source(file_path)?;
    for token in tokenize(&source)? {
        println!("{:>5}..{:<5} {token}", token.span.start, token.span.end);
    }
    Ok(())
}

fn run_repl(config: InterpreterConfig, no_history: bool) -> Result<()> {
    let repl_config = ReplConfig {
        persist_history: !no_history,
        ..ReplConfig::default()
    };
    let mut session = ReplSession::with_interpreter(Interpreter::with_config(config), repl_config);
    session.run()?;
    Ok(())
}

fn display_name(file_path: &Path) -> String {
    if file_path.to_str() == Some("-") {
        "<stdin>".to_string()
    } else {
        file_path.display().to_string()
    }
}

/// Source text and display name of a file argument; `-` reads stdin
fn read_source(file_path: &Path) -> Result<(String, String)> {
    if file_path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).into_diagnostic()?;
        return Ok((buffer, display_name(file_path)));
    }

    if !file_path.exists() {
        return Err(miette::miette!("File not found: {}", file_path.display()));
    }

    if file_path.extension().and_then(|s| s.to_str()) != Some("fem") {
        return Err(miette::miette!(
            "Expected .fem file, got: {}",
            file_path.display()
        ));
    }

    let source = fs::read_to_string(file_path).into_diagnostic()?;
    Ok((source, display_name(file_path)))
}
