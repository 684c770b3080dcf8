use once_cell::sync::Lazy;
use regex::Regex;

use super::*;
use super::scanner::{bump, bump_bytes, peek_char, peek_second, rest, skip_whitespace};

// Exponents use a lowercase `e` and only ever carry a `-` sign.
static FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:(?:\d+\.\d*|\.\d+)(?:e-?\d+)?|\d+e-?\d+)").expect("valid float pattern")
});

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?\d+").expect("valid integer pattern"));

pub(super) fn next_token(lexer: &mut Lexer) -> Result<Spanned, ConfError> {
    skip_whitespace(lexer);

    let line = lexer.line;
    let column = lexer.column + 1;
    let mut sign = None;

    let token = match peek_char(lexer) {
        None => Token::Eof,
        Some('/') if peek_second(lexer) == Some('/') => tokenize_comment(lexer),
        Some('"') => tokenize_string(lexer)?,
        Some(c) if c.is_ascii_alphabetic() || c == '_' => tokenize_word(lexer),
        Some(c) if starts_number(c, lexer) => {
            sign = matches!(c, '-' | '+').then_some(c);
            tokenize_number(lexer)?
        }
        Some('=') => tokenize_symbol(lexer, Token::Equals),
        Some('-') => tokenize_symbol(lexer, Token::Minus),
        Some('+') => tokenize_symbol(lexer, Token::Plus),
        Some('*') => tokenize_symbol(lexer, Token::Star),
        Some('/') => tokenize_symbol(lexer, Token::Slash),
        Some('^') => tokenize_symbol(lexer, Token::Caret),
        Some(',') => tokenize_symbol(lexer, Token::Comma),
        Some(':') => tokenize_symbol(lexer, Token::Colon),
        Some('(') => tokenize_symbol(lexer, Token::LParen),
        Some(')') => tokenize_symbol(lexer, Token::RParen),
        Some('[') => tokenize_symbol(lexer, Token::LBracket),
        Some(']') => tokenize_symbol(lexer, Token::RBracket),
        Some('{') => tokenize_symbol(lexer, Token::LBrace),
        Some('}') => tokenize_symbol(lexer, Token::RBrace),
        Some(_) => return Err(unexpected_input(lexer, None)),
    };

    Ok(Spanned {
        token,
        line,
        column,
        sign,
    })
}

/// Numbers win over the `+`/`-` operators when the sign is glued to the digits.
fn starts_number(c: char, lexer: &Lexer) -> bool {
    match c {
        '0'..='9' => true,
        '.' => matches!(peek_second(lexer), Some(d) if d.is_ascii_digit()),
        '-' | '+' => {
            let mut chars = rest(lexer).chars().skip(1);
            match chars.next() {
                Some('.') => matches!(chars.next(), Some(d) if d.is_ascii_digit()),
                other => matches!(other, Some(d) if d.is_ascii_digit()),
            }
        }
        _ => false,
    }
}

fn tokenize_symbol(lexer: &mut Lexer, token: Token) -> Token {
    bump(lexer);
    token
}

fn tokenize_comment(lexer: &mut Lexer) -> Token {
    let mut content = String::new();
    while let Some(ch) = peek_char(lexer) {
        if ch == '\n' {
            break;
        }
        content.push(ch);
        bump(lexer);
    }
    Token::Comment(content)
}

fn tokenize_string(lexer: &mut Lexer) -> Result<Token, ConfError> {
    let body = &rest(lexer)[1..];
    let Some(end) = body.find('"') else {
        return Err(unexpected_input(lexer, Some("String literal not closed")));
    };

    let content = body[..end].to_string();
    // opening quote + content + closing quote
    bump_bytes(lexer, end + 2);
    Ok(Token::Str(content))
}

/// Identifiers, with `true`/`false` in any letter case taken as booleans.
fn tokenize_word(lexer: &mut Lexer) -> Token {
    let len = rest(lexer)
        .char_indices()
        .find(|&(_, ch)| !(ch.is_alphanumeric() || ch == '_'))
        .map_or(rest(lexer).len(), |(i, _)| i);
    let word = bump_bytes(lexer, len);

    if word.eq_ignore_ascii_case("true") {
        Token::Bool(true)
    } else if word.eq_ignore_ascii_case("false") {
        Token::Bool(false)
    } else {
        Token::Ident(word.to_string())
    }
}

fn tokenize_number(lexer: &mut Lexer) -> Result<Token, ConfError> {
    let input = rest(lexer);

    if let Some(m) = FLOAT_RE.find(input) {
        let text = bump_bytes(lexer, m.end());
        return text
            .parse::<f64>()
            .map(Token::Float)
            .map_err(|_| number_error(text, lexer, "Invalid float literal"));
    }

    let Some(m) = INTEGER_RE.find(input) else {
        return Err(unexpected_input(lexer, None));
    };

    // `12e` is neither an integer nor a float
    if input[m.end()..].starts_with('e') {
        return Err(unexpected_input(lexer, Some("Exponent needs digits, as in 1e5 or 1e-5")));
    }

    let text = bump_bytes(lexer, m.end());
    text.parse::<i64>()
        .map(Token::Int)
        .map_err(|_| number_error(text, lexer, "Integer literal out of range"))
}

fn number_error(text: &str, lexer: &Lexer, hint: &str) -> ConfError {
    ConfError::Lex {
        fragment: text.to_string(),
        line: lexer.line,
        column: lexer.column.saturating_sub(text.chars().count()) + 1,
        hint: Some(hint.into()),
        code: Some(102),
    }
}

/// Error for input no rule accepts; the fragment runs up to the next whitespace.
fn unexpected_input(lexer: &Lexer, hint: Option<&str>) -> ConfError {
    let fragment: String = rest(lexer)
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect();
    ConfError::Lex {
        fragment,
        line: lexer.line,
        column: lexer.column + 1,
        hint: Some(hint.unwrap_or("No token starts here").into()),
        code: Some(if hint.is_some() { 103 } else { 104 }),
    }
}
