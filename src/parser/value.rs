use super::*;
use crate::ast::{Dict, Key};

/// Right-hand side of `name = ...`: a bracketed list, a single item, or a bare
/// comma-separated list of two or more items.
pub(super) fn parse_rhs(parser: &mut Parser) -> Result<Value, ConfError> {
    if *parser.peek() == Token::LBracket {
        return parse_list(parser);
    }

    let first = parse_item(parser)?;
    if *parser.peek() != Token::Comma {
        return Ok(first);
    }

    let mut items = vec![first];
    while *parser.peek() == Token::Comma {
        parser.bump()?;
        items.push(parse_item(parser)?);
    }
    Ok(Value::List(items))
}

/// Anything that may appear inside a list, tuple or dictionary. Lists
/// themselves are not items.
pub(super) fn parse_item(parser: &mut Parser) -> Result<Value, ConfError> {
    match parser.peek() {
        Token::Str(_) => match parser.bump()?.token {
            Token::Str(s) => Ok(Value::Str(s)),
            _ => unreachable!(),
        },
        Token::Bool(b) => {
            let b = *b;
            parser.bump()?;
            Ok(Value::Bool(b))
        }
        Token::LBrace => parse_dict(parser),
        Token::LParen => parse_group(parser),
        Token::LBracket => Err(parser.unexpected("Lists cannot be nested inside other values")),
        _ => expr::parse_expr(parser),
    }
}

fn parse_list(parser: &mut Parser) -> Result<Value, ConfError> {
    parser.bump()?; // consume [

    if *parser.peek() == Token::RBracket {
        parser.bump()?;
        return Ok(Value::List(Vec::new()));
    }

    let mut items = vec![parse_item(parser)?];
    while *parser.peek() == Token::Comma {
        parser.bump()?;
        items.push(parse_item(parser)?);
    }
    parser.expect(Token::RBracket, "Expected ',' or ']' in list")?;
    Ok(Value::List(items))
}

/// `( item, item, ... )` is a tuple; `( expr )` is a parenthesized expression
/// that may continue with further operators.
fn parse_group(parser: &mut Parser) -> Result<Value, ConfError> {
    parser.bump()?; // consume (

    let first = parse_item(parser)?;

    if *parser.peek() == Token::Comma {
        let mut items = vec![first];
        while *parser.peek() == Token::Comma {
            parser.bump()?;
            items.push(parse_item(parser)?);
        }
        parser.expect(Token::RParen, "Expected ',' or ')' in tuple")?;
        return Ok(Value::Tuple(items));
    }

    if !matches!(first, Value::Int(_) | Value::Float(_) | Value::Expr(_)) {
        return Err(parser.unexpected("Tuples need at least two items; only expressions may be parenthesized"));
    }
    parser.expect(Token::RParen, "Expected ')' to close the parenthesis")?;
    expr::continue_expr(parser, first)
}

fn parse_dict(parser: &mut Parser) -> Result<Value, ConfError> {
    parser.bump()?; // consume {
    let mut dict = Dict::new();

    if *parser.peek() == Token::RBrace {
        parser.bump()?;
        return Ok(Value::Dict(dict));
    }

    loop {
        let key = parse_key(parser)?;
        parser.expect(Token::Colon, "Expected ':' after dictionary key")?;
        let value = parse_item(parser)?;
        // later keys overwrite earlier ones
        dict.insert(key, value);

        if *parser.peek() == Token::Comma {
            parser.bump()?;
        } else {
            break;
        }
    }

    parser.expect(Token::RBrace, "Expected ',' or '}' in dictionary")?;
    Ok(Value::Dict(dict))
}

fn parse_key(parser: &mut Parser) -> Result<Key, ConfError> {
    let key = match parser.peek() {
        Token::Str(s) => Key::Str(s.clone()),
        Token::Int(i) => Key::Int(*i),
        Token::Float(f) => Key::Float(*f),
        Token::Bool(b) => Key::Bool(*b),
        _ => {
            return Err(parser.unexpected(
                "Dictionary keys must be string, integer, float or boolean literals",
            ));
        }
    };
    parser.bump()?;
    Ok(key)
}
