use tracing::trace;

use super::*;

pub(super) fn parse_document(parser: &mut Parser) -> Result<Block, ConfError> {
    parse_statements(parser, false)
}

/// Statements up to the end of input, or up to (not including) the closing
/// brace of a nested block.
fn parse_statements(parser: &mut Parser, nested: bool) -> Result<Block, ConfError> {
    let mut block = Block::new();

    loop {
        match parser.peek() {
            Token::Comment(_) => {
                parser.bump()?;
            }
            Token::Ident(_) => {
                let line = parser.line();
                let (name, value) = parse_assignment(parser)?;
                block.add(&name, value).map_err(|e| {
                    e.with_hint(format!("Second assignment of \"{}\" on line {}", name, line))
                })?;
            }
            Token::RBrace if nested => break,
            Token::Eof if !nested => break,
            _ => {
                let hint = if nested {
                    "Expected an assignment, a comment or '}'"
                } else {
                    "Expected an assignment or a comment"
                };
                return Err(parser.unexpected(hint));
            }
        }
    }

    Ok(block)
}

fn parse_assignment(parser: &mut Parser) -> Result<(String, Value), ConfError> {
    let name = match parser.bump()?.token {
        Token::Ident(name) => name,
        _ => unreachable!("statement loop only dispatches on identifiers"),
    };

    match parser.peek() {
        Token::Equals => {
            parser.bump()?;
            let value = value::parse_rhs(parser)?;
            trace!(name = %name, kind = value.type_name(), "assignment parsed");
            Ok((name, value))
        }
        Token::LBrace => {
            parser.bump()?;
            let block = parse_statements(parser, true)?;
            parser.expect(Token::RBrace, "Expected '}' to close the block")?;
            trace!(name = %name, entries = block.len(), "block parsed");
            Ok((name, Value::Block(block)))
        }
        _ => Err(parser.unexpected("Expected '=' or '{' after a variable name")),
    }
}
