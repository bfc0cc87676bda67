// Simple statements and statement dispatch

use super::Parser;
use crate::ast::{Assignment, Block, FunctionCall, Identifier, Span, Statement, StatementKind};
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;

impl Parser {
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        tracing::trace!(token = %self.peek().kind.name(), "parsing statement");
        match &self.peek().kind {
            TokenKind::Print => self.parse_print(),
            TokenKind::Identifier(_) => match self.peek_next().kind {
                TokenKind::Assign => self.parse_assignment(),
                TokenKind::LeftParen => self.parse_call_statement(),
                _ => {
                    self.advance();
                    Err(self.unexpected("'=' or '('"))
                }
            },
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Def => self.parse_function_definition(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Pass => Ok(self.parse_keyword_statement(StatementKind::Pass)),
            TokenKind::Break => Ok(self.parse_keyword_statement(StatementKind::Break)),
            TokenKind::Continue => Ok(self.parse_keyword_statement(StatementKind::Continue)),
            _ => Err(self.unexpected("statement")),
        }
    }

    fn parse_print(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let value = self.parse_expression()?;
        let span = keyword.span.to(value.span);
        Ok(Statement::new(StatementKind::Print(value), span))
    }

    fn parse_assignment(&mut self) -> ParseResult<Statement> {
        let target = self.expect_identifier("variable name")?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        let span = target.span.to(value.span);
        Ok(Statement::new(
            StatementKind::Assignment(Assignment { target, value }),
            span,
        ))
    }

    fn parse_call_statement(&mut self) -> ParseResult<Statement> {
        let name = self.expect_identifier("function name")?;
        let (call, span) = self.parse_call_arguments(name)?;
        Ok(Statement::new(StatementKind::Call(call), span))
    }

    /// Argument list of a call whose name has already been consumed
    pub(super) fn parse_call_arguments(
        &mut self,
        name: Identifier,
    ) -> ParseResult<(FunctionCall, Span)> {
        self.expect(TokenKind::LeftParen)?;
        let (arguments, close) = self.parse_delimited(TokenKind::RightParen, |parser| {
            parser.parse_expression()
        })?;
        let span = name.span.to(close);
        Ok((FunctionCall { name, arguments }, span))
    }

    fn parse_return(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let bare = self.check_any(&[
            TokenKind::End,
            TokenKind::Else,
            TokenKind::Except,
            TokenKind::Eof,
        ]);
        if bare {
            return Ok(Statement::new(StatementKind::Return(None), keyword.span));
        }
        let value = self.parse_expression()?;
        let span = keyword.span.to(value.span);
        Ok(Statement::new(StatementKind::Return(Some(value)), span))
    }

    fn parse_keyword_statement(&mut self, kind: StatementKind) -> Statement {
        let keyword = self.advance();
        Statement::new(kind, keyword.span)
    }

    /// Statements up to (not including) one of `terminators`.
    ///
    /// `construct` and `opener` describe the enclosing statement for the
    /// unterminated block diagnostic.
    pub(super) fn parse_block(
        &mut self,
        terminators: &[TokenKind],
        construct: &str,
        opener: Span,
    ) -> ParseResult<Block> {
        let start = self.peek().span;
        let mut statements = Vec::new();

        loop {
            if self.at_end() {
                return Err(ParseError::unterminated_block(
                    self.source.as_deref(),
                    construct,
                    opener,
                ));
            }
            if self.check_any(terminators) {
                break;
            }
            statements.push(self.nested(Self::parse_statement)?);
        }

        let span = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::new(start.start, start.start),
        };
        Ok(Block { statements, span })
    }
}
