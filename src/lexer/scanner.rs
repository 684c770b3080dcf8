use super::*;

/// Advance one character and update line/column tracking
pub(super) fn bump(lexer: &mut Lexer) -> Option<char> {
    let curr = peek_char(lexer);
    if let Some(c) = curr {
        lexer.pos += c.len_utf8();
        if c == '\n' {
            lexer.line += 1;
            lexer.column = 0;
        } else {
            lexer.column += 1;
        }
    }
    curr
}

/// Consume `len` bytes, which must lie on a character boundary
pub(super) fn bump_bytes<'a>(lexer: &mut Lexer<'a>, len: usize) -> &'a str {
    let src = lexer.src;
    let start = lexer.pos;
    let end = start + len;
    while lexer.pos < end {
        bump(lexer);
    }
    &src[start..end]
}

/// Skip spaces, tabs, carriage returns and newlines
pub(super) fn skip_whitespace(lexer: &mut Lexer) {
    while let Some(c) = peek_char(lexer) {
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                bump(lexer);
            }
            _ => break,
        }
    }
}

pub(super) fn peek_char(lexer: &Lexer) -> Option<char> {
    rest(lexer).chars().next()
}

pub(super) fn peek_second(lexer: &Lexer) -> Option<char> {
    rest(lexer).chars().nth(1)
}

/// Unconsumed input
pub(super) fn rest<'a>(lexer: &Lexer<'a>) -> &'a str {
    let src = lexer.src;
    &src[lexer.pos..]
}
