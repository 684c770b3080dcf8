//! Precedence climbing for arithmetic.
//!
//! Precedence, low to high: `+ -`, `* /`, `^`, unary minus. Every binary
//! operator is left-associative, so `2 ^ 3 ^ 2` is `(2 ^ 3) ^ 2`.

use super::*;
use crate::ast::{BinOp, Expr};

const LOWEST: u8 = 1;

pub(super) fn parse_expr(parser: &mut Parser) -> Result<Value, ConfError> {
    parse_binary(parser, LOWEST)
}

/// Continue an expression whose first operand has already been parsed.
pub(super) fn continue_expr(parser: &mut Parser, lhs: Value) -> Result<Value, ConfError> {
    climb(parser, lhs, LOWEST)
}

fn parse_binary(parser: &mut Parser, min_prec: u8) -> Result<Value, ConfError> {
    let lhs = parse_unary(parser)?;
    climb(parser, lhs, min_prec)
}

fn climb(parser: &mut Parser, mut lhs: Value, min_prec: u8) -> Result<Value, ConfError> {
    while let Some(infix) = peek_infix(parser) {
        let op = infix.op();
        let prec = op.precedence();
        if prec < min_prec {
            break;
        }

        let rhs = match infix {
            Infix::Operator(_) => {
                parser.bump()?;
                parse_binary(parser, prec + 1)?
            }
            Infix::SignedLiteral(_, magnitude) => {
                parser.bump()?;
                climb(parser, magnitude, prec + 1)?
            }
        };

        lhs = Value::Expr(Expr::binary(op, lhs, rhs));
    }

    Ok(lhs)
}

enum Infix {
    Operator(BinOp),
    /// A literal such as `-2` directly after an operand, read as `- 2`.
    SignedLiteral(BinOp, Value),
}

impl Infix {
    fn op(&self) -> BinOp {
        match self {
            Infix::Operator(op) | Infix::SignedLiteral(op, _) => *op,
        }
    }
}

fn peek_infix(parser: &Parser) -> Option<Infix> {
    let spanned = parser.peek_spanned();
    let op = match &spanned.token {
        Token::Plus => BinOp::Add,
        Token::Minus => BinOp::Sub,
        Token::Star => BinOp::Mul,
        Token::Slash => BinOp::Div,
        Token::Caret => BinOp::Pow,
        Token::Int(i) => {
            let (op, magnitude) = split_sign(spanned.sign?, *i)?;
            return Some(Infix::SignedLiteral(op, Value::Int(magnitude)));
        }
        Token::Float(f) => {
            let op = if spanned.sign? == '-' { BinOp::Sub } else { BinOp::Add };
            return Some(Infix::SignedLiteral(op, Value::Float(f.abs())));
        }
        _ => return None,
    };
    Some(Infix::Operator(op))
}

fn split_sign(sign: char, value: i64) -> Option<(BinOp, i64)> {
    if sign == '-' {
        Some((BinOp::Sub, value.checked_neg()?))
    } else {
        Some((BinOp::Add, value))
    }
}

fn parse_unary(parser: &mut Parser) -> Result<Value, ConfError> {
    if *parser.peek() == Token::Minus {
        parser.bump()?;
        let operand = parse_unary(parser)?;
        return Ok(Value::Expr(Expr::neg(operand)));
    }
    parse_primary(parser)
}

fn parse_primary(parser: &mut Parser) -> Result<Value, ConfError> {
    match parser.peek() {
        Token::Int(_) | Token::Float(_) | Token::Ident(_) => {}
        Token::LParen => {
            parser.bump()?;
            let inner = parse_expr(parser)?;
            parser.expect(Token::RParen, "Expected ')' to close the parenthesis")?;
            return Ok(inner);
        }
        _ => return Err(parser.unexpected("Expected a number, a variable or '('")),
    }

    Ok(match parser.bump()?.token {
        Token::Int(i) => Value::Int(i),
        Token::Float(f) => Value::Float(f),
        Token::Ident(name) => Value::Expr(Expr::var(name)),
        _ => unreachable!(),
    })
}
