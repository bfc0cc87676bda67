// List and dict literals, and the comma-separated helper shared with call arguments

use super::Parser;
use crate::ast::{DictEntry, Expression, ExpressionKind, Span};
use crate::error::ParseResult;
use crate::lexer::TokenKind;

impl Parser {
    /// `[a, b, ...]`
    pub(super) fn parse_list(&mut self) -> ParseResult<Expression> {
        let open = self.expect(TokenKind::LeftBracket)?;
        let (elements, close) =
            self.parse_delimited(TokenKind::RightBracket, |parser| parser.parse_expression())?;
        Ok(Expression::new(
            ExpressionKind::List(elements),
            open.span.to(close),
        ))
    }

    /// `{key: value, ...}`
    pub(super) fn parse_dict(&mut self) -> ParseResult<Expression> {
        let open = self.expect(TokenKind::LeftBrace)?;
        let (entries, close) = self.parse_delimited(TokenKind::RightBrace, |parser| {
            let key = parser.parse_expression()?;
            parser.expect(TokenKind::Colon)?;
            let value = parser.parse_expression()?;
            Ok(DictEntry { key, value })
        })?;
        Ok(Expression::new(
            ExpressionKind::Dict(entries),
            open.span.to(close),
        ))
    }

    /// Comma separated items up to and including `closer`, whose span is
    /// returned alongside the items. Zero items and a trailing comma are
    /// both accepted.
    pub(super) fn parse_delimited<T>(
        &mut self,
        closer: TokenKind,
        mut parse_item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<(Vec<T>, Span)> {
        let mut items = Vec::new();

        while !self.check(&closer) {
            items.push(parse_item(self)?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        let close = self.expect(closer)?;
        Ok((items, close.span))
    }
}
