// Fem Parser
// Recursive-descent parser over the token stream produced by the scanner

mod collections;
mod control_flow;
mod expressions;
mod statements;

use std::mem;

use crate::ast::{Expression, Identifier, Program, Span};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{tokenize, Token, TokenKind};

/// Deepest nesting of expressions and blocks the parser accepts
pub const MAX_NESTING_DEPTH: usize = 100;

/// Parser state: the token sequence and a cursor into it.
///
/// The source text is optional and only used to attach snippets to
/// diagnostics.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    source: Option<String>,
    depth: usize,
}

impl Parser {
    /// Create a parser over an already scanned token sequence
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let ends_with_eof = matches!(tokens.last(), Some(token) if token.kind == TokenKind::Eof);
        if !ends_with_eof {
            let offset = tokens.last().map(|token| token.span.end).unwrap_or(0);
            tokens.push(Token::eof(offset));
        }
        Self {
            tokens,
            position: 0,
            source: None,
            depth: 0,
        }
    }

    /// Attach the source text the tokens were scanned from
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Scan `source` and build a parser over the result
    pub fn for_source(source: &str) -> ParseResult<Self> {
        Ok(Self::new(tokenize(source)?).with_source(source))
    }

    /// Parse every statement up to end of input
    pub fn parse(mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !self.at_end() {
            statements.push(self.parse_statement()?);
        }

        let span = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::new(0, 0),
        };

        tracing::debug!(statements = statements.len(), "parsed program");
        Ok(Program { statements, span })
    }

    /// Parse a single expression that must span the whole input
    pub fn parse_standalone_expression(mut self) -> ParseResult<Expression> {
        let expression = self.parse_expression()?;
        if !self.at_end() {
            return Err(self.unexpected("end of input"));
        }
        Ok(expression)
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING_DEPTH`]
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::nesting_too_deep(
                self.source.as_deref(),
                MAX_NESTING_DEPTH,
                self.peek().span,
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // Cursor helpers

    fn peek(&self) -> &Token {
        let index = self.position.min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn peek_next(&self) -> &Token {
        let index = (self.position + 1).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Consume the current token. The trailing `Eof` is never consumed.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    /// Kind comparison that ignores carried literal values
    fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.peek().kind) == mem::discriminant(kind)
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|kind| self.check(kind))
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> ParseResult<Identifier> {
        match &self.peek().kind {
            TokenKind::Identifier(name) => {
                let identifier = Identifier {
                    name: name.clone(),
                    span: self.peek().span,
                };
                self.advance();
                Ok(identifier)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Syntax fault at the current token
    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::unexpected_token(
            self.source.as_deref(),
            token.kind.describe(),
            expected.to_string(),
            token.span,
        )
    }
}
