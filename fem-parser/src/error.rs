// Fem Parser Error Handling
// Lexical and syntax faults with miette integration

use crate::ast::Span;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Faults raised while scanning or parsing. Both kinds are fatal.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unrecognized character {character:?} at offset {offset} (line {line}, column {column})")]
    #[diagnostic(
        code(fem::lex::unrecognized_character),
        help("Only letters, digits, quotes, operators and punctuation may appear outside comments")
    )]
    UnrecognizedCharacter {
        character: char,
        offset: usize,
        line: usize,
        column: usize,
        #[source_code]
        src: Option<String>,
        #[label("not part of any token")]
        span: SourceSpan,
    },

    #[error("Unterminated string literal starting at offset {offset}")]
    #[diagnostic(
        code(fem::lex::unterminated_string),
        help("Close the string with the same quote character that opened it")
    )]
    UnterminatedString {
        offset: usize,
        #[source_code]
        src: Option<String>,
        #[label("string starts here")]
        span: SourceSpan,
    },

    #[error("Invalid number literal {found}")]
    #[diagnostic(
        code(fem::lex::invalid_number),
        help("Integer literals must fit in a signed 64-bit integer")
    )]
    InvalidNumber {
        found: String,
        #[source_code]
        src: Option<String>,
        #[label("invalid number")]
        span: SourceSpan,
    },

    #[error("Unexpected token: found {found}, expected {expected}")]
    #[diagnostic(
        code(fem::parse::unexpected_token),
        help("Expected {expected}")
    )]
    UnexpectedToken {
        found: String,
        expected: String,
        #[source_code]
        src: Option<String>,
        #[label("found this")]
        span: SourceSpan,
    },

    #[error("Unterminated {construct} block")]
    #[diagnostic(
        code(fem::parse::unterminated_block),
        help("Close the block with 'end'")
    )]
    UnterminatedBlock {
        construct: String,
        #[source_code]
        src: Option<String>,
        #[label("block opened here")]
        span: SourceSpan,
    },

    #[error("Duplicate parameter '{name}' in definition of '{function}'")]
    #[diagnostic(
        code(fem::parse::duplicate_parameter),
        help("Each parameter name may appear only once")
    )]
    DuplicateParameter {
        name: String,
        function: String,
        #[source_code]
        src: Option<String>,
        #[label("already declared")]
        span: SourceSpan,
    },

    #[error("Nesting too deep: more than {limit} levels of expressions and blocks")]
    #[diagnostic(
        code(fem::parse::nesting_too_deep),
        help("Split deeply nested expressions into assignments or helper functions")
    )]
    NestingTooDeep {
        limit: usize,
        #[source_code]
        src: Option<String>,
        #[label("too deeply nested")]
        span: SourceSpan,
    },
}

impl ParseError {
    /// Create an unrecognized character error
    pub fn unrecognized_character(src: &str, character: char, span: Span) -> Self {
        let (line, column) = line_col(src, span.start);
        ParseError::UnrecognizedCharacter {
            character,
            offset: span.start,
            line,
            column,
            src: Some(src.to_string()),
            span: span.into(),
        }
    }

    /// Create an unterminated string error
    pub fn unterminated_string(src: &str, span: Span) -> Self {
        ParseError::UnterminatedString {
            offset: span.start,
            src: Some(src.to_string()),
            span: span.into(),
        }
    }

    /// Create an invalid number error
    pub fn invalid_number(src: &str, found: String, span: Span) -> Self {
        ParseError::InvalidNumber {
            found,
            src: Some(src.to_string()),
            span: span.into(),
        }
    }

    // Parser faults take the source only when the parser was given it

    /// Create an unexpected token error
    pub fn unexpected_token(
        src: Option<&str>,
        found: String,
        expected: String,
        span: Span,
    ) -> Self {
        ParseError::UnexpectedToken {
            found,
            expected,
            src: src.map(str::to_string),
            span: span.into(),
        }
    }

    /// Create an unterminated block error
    pub fn unterminated_block(src: Option<&str>, construct: &str, span: Span) -> Self {
        ParseError::UnterminatedBlock {
            construct: construct.to_string(),
            src: src.map(str::to_string),
            span: span.into(),
        }
    }

    /// Create a duplicate parameter error
    pub fn duplicate_parameter(
        src: Option<&str>,
        name: String,
        function: String,
        span: Span,
    ) -> Self {
        ParseError::DuplicateParameter {
            name,
            function,
            src: src.map(str::to_string),
            span: span.into(),
        }
    }

    /// Create a nesting depth error
    pub fn nesting_too_deep(src: Option<&str>, limit: usize, span: Span) -> Self {
        ParseError::NestingTooDeep {
            limit,
            src: src.map(str::to_string),
            span: span.into(),
        }
    }

    /// True for faults raised by the scanner rather than the parser
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            ParseError::UnrecognizedCharacter { .. }
                | ParseError::UnterminatedString { .. }
                | ParseError::InvalidNumber { .. }
        )
    }

    /// True when more input could complete the program (used by the REPL)
    pub fn is_incomplete_input(&self) -> bool {
        match self {
            ParseError::UnterminatedBlock { .. } | ParseError::UnterminatedString { .. } => true,
            ParseError::UnexpectedToken { found, .. } => found == "end of input",
            _ => false,
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// One-based line and column of a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (index, ch) in source.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_counts_from_one() {
        let source = "print 1\nprint $";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 6), (1, 7));
        assert_eq!(line_col(source, 14), (2, 7));
    }

    #[test]
    fn test_incomplete_input_classification() {
        let block = ParseError::unterminated_block(None, "while", Span::new(0, 5));
        assert!(block.is_incomplete_input());
        assert!(!block.is_lexical());

        let stray = ParseError::unrecognized_character("$", '$', Span::new(0, 1));
        assert!(stray.is_lexical());
        assert!(!stray.is_incomplete_input());

        let deep = ParseError::nesting_too_deep(Some("((1))"), 1, Span::new(1, 2));
        assert!(!deep.is_incomplete_input());
        assert!(!deep.is_lexical());
    }
}
