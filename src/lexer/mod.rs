use std::fmt;

use crate::ConfError;

mod scanner;
mod tokenizer;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- literals ---
    Bool(bool),
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    Comment(String),

    // --- operators ---
    Equals,
    Minus,
    Plus,
    Star,
    Slash,
    Caret,

    // --- punctuation ---
    Comma,
    Colon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    Eof,
}

impl Token {
    /// Grammar-level name of the token kind, used in syntax errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Bool(_) => "BOOLEAN",
            Token::Ident(_) => "VARIABLE",
            Token::Str(_) => "STRING",
            Token::Int(_) => "INTEGER",
            Token::Float(_) => "FLOAT",
            Token::Comment(_) => "COMMENT",
            Token::Equals => "EQUALS",
            Token::Minus => "MINUS",
            Token::Plus => "PLUS",
            Token::Star => "TIMES",
            Token::Slash => "DIVIDE",
            Token::Caret => "POWER",
            Token::Comma => "COMMA",
            Token::Colon => "COLON",
            Token::LParen => "OPEN_PARENTHESIS",
            Token::RParen => "CLOSE_PARENTHESIS",
            Token::LBracket => "OPEN_BRACKET",
            Token::RBracket => "CLOSE_BRACKET",
            Token::LBrace => "OPEN_CURLY_BRACKET",
            Token::RBrace => "CLOSE_CURLY_BRACKET",
            Token::Eof => "EOF",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Bool(b) => write!(f, "{}", b),
            Token::Ident(s) | Token::Str(s) | Token::Comment(s) => f.write_str(s),
            Token::Int(i) => write!(f, "{}", i),
            Token::Float(x) => write!(f, "{:?}", x),
            Token::Equals => f.write_str("="),
            Token::Minus => f.write_str("-"),
            Token::Plus => f.write_str("+"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::Caret => f.write_str("^"),
            Token::Comma => f.write_str(","),
            Token::Colon => f.write_str(":"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::LBrace => f.write_str("{"),
            Token::RBrace => f.write_str("}"),
            Token::Eof => f.write_str("<end of input>"),
        }
    }
}

/// A token together with the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
    pub column: usize,
    /// Sign character glued to a numeric literal, if any.
    pub sign: Option<char>,
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            src: input,
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Scan the next token. Returns `Token::Eof` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Spanned, ConfError> {
        tokenizer::next_token(self)
    }

    /// Scan the whole input into tokens, without the trailing end-of-input marker.
    pub fn tokenize(input: &'a str) -> Result<Vec<Token>, ConfError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            match lexer.next_token()?.token {
                Token::Eof => break,
                token => tokens.push(token),
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests;
