// Block statements: if, while, for, def and try

use std::collections::HashSet;

use super::Parser;
use crate::ast::{
    ForLoop, FunctionDefinition, IfStatement, Statement, StatementKind, TryStatement, WhileLoop,
};
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;

impl Parser {
    /// `if <expr> then <block> [else <block>] end`
    pub(super) fn parse_if(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Then)?;

        let then_block = self.parse_block(&[TokenKind::Else, TokenKind::End], "if", keyword.span)?;
        let else_block = if self.check(&TokenKind::Else) {
            self.advance();
            Some(self.parse_block(&[TokenKind::End], "if", keyword.span)?)
        } else {
            None
        };
        let end = self.expect(TokenKind::End)?;

        Ok(Statement::new(
            StatementKind::If(IfStatement {
                condition,
                then_block,
                else_block,
            }),
            keyword.span.to(end.span),
        ))
    }

    /// `while <expr> then <block> end`
    pub(super) fn parse_while(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Then)?;
        let body = self.parse_block(&[TokenKind::End], "while", keyword.span)?;
        let end = self.expect(TokenKind::End)?;

        Ok(Statement::new(
            StatementKind::While(WhileLoop { condition, body }),
            keyword.span.to(end.span),
        ))
    }

    /// `for <name> (= | in) <expr> then <block> end`
    pub(super) fn parse_for(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let variable = self.expect_identifier("loop variable")?;
        if self.check_any(&[TokenKind::Assign, TokenKind::In]) {
            self.advance();
        } else {
            return Err(self.unexpected("'=' or 'in'"));
        }
        let iterable = self.parse_expression()?;
        self.expect(TokenKind::Then)?;
        let body = self.parse_block(&[TokenKind::End], "for", keyword.span)?;
        let end = self.expect(TokenKind::End)?;

        Ok(Statement::new(
            StatementKind::For(ForLoop {
                variable,
                iterable,
                body,
            }),
            keyword.span.to(end.span),
        ))
    }

    /// `def <name>(<params>) then <block> end`
    pub(super) fn parse_function_definition(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let name = self.expect_identifier("function name")?;
        self.expect(TokenKind::LeftParen)?;
        let (parameters, _) = self.parse_delimited(TokenKind::RightParen, |parser| {
            parser.expect_identifier("parameter name")
        })?;

        let mut seen = HashSet::new();
        for parameter in &parameters {
            if !seen.insert(parameter.name.as_str()) {
                return Err(ParseError::duplicate_parameter(
                    self.source.as_deref(),
                    parameter.name.clone(),
                    name.name.clone(),
                    parameter.span,
                ));
            }
        }

        self.expect(TokenKind::Then)?;
        let body = self.parse_block(&[TokenKind::End], "def", keyword.span)?;
        let end = self.expect(TokenKind::End)?;

        Ok(Statement::new(
            StatementKind::FunctionDefinition(FunctionDefinition {
                name,
                parameters,
                body,
            }),
            keyword.span.to(end.span),
        ))
    }

    /// `try <block> except <block> end`
    pub(super) fn parse_try(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();
        let body = self.parse_block(&[TokenKind::Except], "try", keyword.span)?;
        self.expect(TokenKind::Except)?;
        let handler = self.parse_block(&[TokenKind::End], "try", keyword.span)?;
        let end = self.expect(TokenKind::End)?;

        Ok(Statement::new(
            StatementKind::Try(TryStatement { body, handler }),
            keyword.span.to(end.span),
        ))
    }
}
