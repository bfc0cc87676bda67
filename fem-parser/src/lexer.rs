// Fem Scanner
// Turns source text into tokens. Longest match wins; on equal length a literal
// word or operator beats the generic identifier/number patterns.

use std::fmt;

use logos::Logos;

use crate::ast::Span;
use crate::error::{ParseError, ParseResult};

/// Error raised inside logos callbacks
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexicalError {
    #[default]
    Unrecognized,
    InvalidNumber,
}

/// All token kinds in Fem. Literal kinds carry their decoded value.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(error = LexicalError)]
pub enum TokenKind {
    // Literals
    #[regex(r"[0-9]+\.[0-9]+", parse_float)]
    Float(f64),
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    #[regex(r#""([^"\\]|\\.)*""#, parse_string)]
    #[regex(r#"'([^'\\]|\\.)*'"#, parse_string)]
    String(String),
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Boolean(bool),
    #[token("null")]
    Null,

    // Keywords
    #[token("print")]
    Print,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("end")]
    End,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("def")]
    Def,
    #[token("return")]
    Return,
    #[token("pass")]
    Pass,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("try")]
    Try,
    #[token("except")]
    Except,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Punctuation
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,

    /// `# comment` to end of line
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    /// End of input, appended by [`tokenize`]
    Eof,
}

fn parse_integer(lex: &mut logos::Lexer<TokenKind>) -> Result<i64, LexicalError> {
    lex.slice()
        .parse()
        .map_err(|_| LexicalError::InvalidNumber)
}

fn parse_float(lex: &mut logos::Lexer<TokenKind>) -> Result<f64, LexicalError> {
    lex.slice()
        .parse()
        .map_err(|_| LexicalError::InvalidNumber)
}

fn parse_string(lex: &mut logos::Lexer<TokenKind>) -> String {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1])
}

fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

impl TokenKind {
    /// Human readable description used in syntax errors
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Float(value) => format!("float {value}"),
            TokenKind::Integer(value) => format!("integer {value}"),
            TokenKind::String(value) => format!("string {value:?}"),
            TokenKind::Boolean(value) => format!("'{value}'"),
            TokenKind::Identifier(name) => format!("identifier '{name}'"),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    /// Fixed source text of keyword, operator and punctuation kinds
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::Null => "null",
            TokenKind::Print => "print",
            TokenKind::If => "if",
            TokenKind::Then => "then",
            TokenKind::Else => "else",
            TokenKind::End => "end",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::Def => "def",
            TokenKind::Return => "return",
            TokenKind::Pass => "pass",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Try => "try",
            TokenKind::Except => "except",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::EqualEqual => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::LessEqual => "<=",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Comment => "#",
            TokenKind::Eof => "",
            TokenKind::Float(_)
            | TokenKind::Integer(_)
            | TokenKind::String(_)
            | TokenKind::Boolean(_)
            | TokenKind::Identifier(_) => "",
        }
    }

    /// Upper-case kind name, independent of the carried value
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Float(_) => "FLOAT",
            TokenKind::Integer(_) => "INTEGER",
            TokenKind::String(_) => "STRING",
            TokenKind::Boolean(_) => "BOOLEAN",
            TokenKind::Null => "NULL",
            TokenKind::Identifier(_) => "ID",
            TokenKind::Eof => "EOF",
            TokenKind::Print => "PRINT",
            TokenKind::If => "IF",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::End => "END",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::In => "IN",
            TokenKind::Def => "DEF",
            TokenKind::Return => "RETURN",
            TokenKind::Pass => "PASS",
            TokenKind::Break => "BREAK",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Try => "TRY",
            TokenKind::Except => "EXCEPT",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::EqualEqual => "EQ",
            TokenKind::NotEqual => "NE",
            TokenKind::LessEqual => "LE",
            TokenKind::GreaterEqual => "GE",
            TokenKind::Less => "LT",
            TokenKind::Greater => "GT",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "MUL",
            TokenKind::Slash => "DIV",
            TokenKind::Percent => "MOD",
            TokenKind::LeftParen => "LPAREN",
            TokenKind::RightParen => "RPAREN",
            TokenKind::LeftBracket => "LBRACKET",
            TokenKind::RightBracket => "RBRACKET",
            TokenKind::LeftBrace => "LBRACE",
            TokenKind::RightBrace => "RBRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Colon => "COLON",
            TokenKind::Dot => "DOT",
            TokenKind::Comment => "COMMENT",
        }
    }
}

/// A scanned token: kind (with decoded value), matched text and byte span
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", Span::new(offset, offset))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Integer(value) => write!(f, "Token({}, {value})", self.kind.name()),
            TokenKind::Float(value) => write!(f, "Token({}, {value})", self.kind.name()),
            TokenKind::String(value) => write!(f, "Token({}, {value:?})", self.kind.name()),
            TokenKind::Boolean(value) => write!(f, "Token({}, {value})", self.kind.name()),
            TokenKind::Eof => write!(f, "Token(EOF, None)"),
            _ => write!(f, "Token({}, {:?})", self.kind.name(), self.lexeme),
        }
    }
}

/// Scan `source` into tokens. The last token is always [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span::new(range.start, range.end);

        match result {
            Ok(kind) => tokens.push(Token::new(kind, lexer.slice(), span)),
            Err(LexicalError::InvalidNumber) => {
                return Err(ParseError::invalid_number(
                    source,
                    lexer.slice().to_string(),
                    span,
                ));
            }
            Err(LexicalError::Unrecognized) => {
                let character = source[span.start..].chars().next().unwrap_or('\0');
                let char_span = Span::new(span.start, span.start + character.len_utf8());
                if character == '"' || character == '\'' {
                    return Err(ParseError::unterminated_string(source, char_span));
                }
                return Err(ParseError::unrecognized_character(
                    source, character, char_span,
                ));
            }
        }
    }

    tokens.push(Token::eof(source.len()));
    tracing::trace!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}
