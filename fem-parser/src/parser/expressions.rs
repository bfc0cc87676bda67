// Expression parsing, lowest precedence first:
// logical, comparison, additive, multiplicative, unary, primary

use super::Parser;
use crate::ast::{
    BinaryOperation, BinaryOperator, Comparison, ComparisonOperator, Expression, ExpressionKind,
    IndexAccess, LogicalOperation, LogicalOperator, PropertyAccess, UnaryOperation, UnaryOperator,
};
use crate::error::ParseResult;
use crate::lexer::TokenKind;

impl Parser {
    /// Every nested expression passes through here, so it carries the depth check
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.nested(Self::parse_logical)
    }

    /// `and` and `or` share one level and fold left
    fn parse_logical(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_comparison()?;

        loop {
            let operator = match self.peek().kind {
                TokenKind::And => LogicalOperator::And,
                TokenKind::Or => LogicalOperator::Or,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            let span = left.span.to(right.span);
            left = Expression::new(
                ExpressionKind::Logical(LogicalOperation {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                }),
                span,
            );
        }

        Ok(left)
    }

    /// One comparison at most; the right side recurses, so chains nest right
    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let left = self.parse_additive()?;

        let operator = match self.peek().kind {
            TokenKind::EqualEqual => ComparisonOperator::Equal,
            TokenKind::NotEqual => ComparisonOperator::NotEqual,
            TokenKind::Less => ComparisonOperator::Less,
            TokenKind::LessEqual => ComparisonOperator::LessEqual,
            TokenKind::Greater => ComparisonOperator::Greater,
            TokenKind::GreaterEqual => ComparisonOperator::GreaterEqual,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.nested(Self::parse_comparison)?;
        let span = left.span.to(right.span);

        Ok(Expression::new(
            ExpressionKind::Comparison(Comparison {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            }),
            span,
        ))
    }

    fn parse_additive(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let operator = match self.peek().kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary()?;

        loop {
            let operator = match self.peek().kind {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                TokenKind::Percent => BinaryOperator::Modulo,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        let operator = match self.peek().kind {
            TokenKind::Not => UnaryOperator::Not,
            TokenKind::Minus => UnaryOperator::Negate,
            _ => return self.parse_primary(),
        };
        let token = self.advance();
        let operand = self.nested(Self::parse_unary)?;
        let span = token.span.to(operand.span);

        Ok(Expression::new(
            ExpressionKind::Unary(UnaryOperation {
                operator,
                operand: Box::new(operand),
            }),
            span,
        ))
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let token = self.peek().clone();
        let kind = match token.kind {
            TokenKind::Integer(value) => ExpressionKind::Integer(value),
            TokenKind::Float(value) => ExpressionKind::Float(value),
            TokenKind::String(value) => ExpressionKind::String(value),
            TokenKind::Boolean(value) => ExpressionKind::Boolean(value),
            TokenKind::Null => ExpressionKind::Null,
            TokenKind::Identifier(_) => return self.parse_identifier_expression(),
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                return Ok(inner);
            }
            TokenKind::LeftBracket => return self.parse_list(),
            TokenKind::LeftBrace => return self.parse_dict(),
            _ => return Err(self.unexpected("expression")),
        };
        self.advance();
        Ok(Expression::new(kind, token.span))
    }

    /// Variable or call, followed by any chain of `.name` and `[index]`
    fn parse_identifier_expression(&mut self) -> ParseResult<Expression> {
        let name = self.expect_identifier("identifier")?;

        let mut expression = if self.check(&TokenKind::LeftParen) {
            let (call, span) = self.parse_call_arguments(name)?;
            Expression::new(ExpressionKind::Call(call), span)
        } else {
            let span = name.span;
            Expression::new(ExpressionKind::Variable(name), span)
        };

        loop {
            if self.check(&TokenKind::Dot) {
                self.advance();
                let property = self.expect_identifier("property name")?;
                let span = expression.span.to(property.span);
                expression = Expression::new(
                    ExpressionKind::Property(PropertyAccess {
                        target: Box::new(expression),
                        property,
                    }),
                    span,
                );
            } else if self.check(&TokenKind::LeftBracket) {
                self.advance();
                let index = self.parse_expression()?;
                let close = self.expect(TokenKind::RightBracket)?;
                let span = expression.span.to(close.span);
                expression = Expression::new(
                    ExpressionKind::Index(IndexAccess {
                        target: Box::new(expression),
                        index: Box::new(index),
                    }),
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expression)
    }
}

fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Expression {
    let span = left.span.to(right.span);
    Expression::new(
        ExpressionKind::Binary(BinaryOperation {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }),
        span,
    )
}
