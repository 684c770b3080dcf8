use crate::ConfError;
use crate::ast::Value;
use crate::config::Block;
use crate::lexer::{Lexer, Spanned, Token};

mod document;
mod expr;
mod value;

/// Recursive descent parser over the token stream, with one token of lookahead.
///
/// Every parser owns the block it builds, so two parses never share state.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peek: Spanned,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Result<Self, ConfError> {
        let mut lexer = Lexer::new(input);
        let peek = lexer.next_token()?;
        Ok(Self { lexer, peek })
    }

    /// Consume the current token and scan the next one.
    pub(crate) fn bump(&mut self) -> Result<Spanned, ConfError> {
        if self.peek.token == Token::Eof {
            return Ok(self.peek.clone());
        }
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.peek, next))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.peek.token
    }

    pub(crate) fn peek_spanned(&self) -> &Spanned {
        &self.peek
    }

    pub(crate) fn expect(&mut self, expected: Token, hint: &str) -> Result<Spanned, ConfError> {
        if *self.peek() != expected {
            return Err(self.unexpected(hint));
        }
        self.bump()
    }

    /// Syntax error pointing at the current token.
    pub(crate) fn unexpected(&self, hint: &str) -> ConfError {
        ConfError::Syntax {
            kind: self.peek.token.kind().to_string(),
            value: self.peek.token.to_string(),
            line: self.peek.line,
            column: self.peek.column,
            hint: Some(hint.into()),
            code: Some(if self.peek.token == Token::Eof { 201 } else { 202 }),
        }
    }

    pub(crate) fn line(&self) -> usize {
        self.peek.line
    }

    pub fn parse_document(&mut self) -> Result<Block, ConfError> {
        document::parse_document(self)
    }

    /// Parse a single right-hand side value, as written after `name =`.
    pub fn parse_value(&mut self) -> Result<Value, ConfError> {
        let value = value::parse_rhs(self)?;
        if *self.peek() != Token::Eof {
            return Err(self.unexpected("Expected end of input after value"));
        }
        Ok(value)
    }
}
