// Fem Parser Library
// logos scanner and recursive-descent parser for the Fem scripting language

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use error::*;
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{Parser, MAX_NESTING_DEPTH};

// Main parsing functions
pub fn parse_program(input: &str) -> Result<Program, ParseError> {
    Parser::for_source(input)?.parse()
}

pub fn parse_expression(input: &str) -> Result<Expression, ParseError> {
    Parser::for_source(input)?.parse_standalone_expression()
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
