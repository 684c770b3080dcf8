use super::*;

fn tokens(input: &str) -> Vec<Token> {
    Lexer::tokenize(input).expect("input should tokenize")
}

#[test]
fn test_simple_assignment() {
    assert_eq!(
        tokens("num_zones = 4"),
        vec![Token::Ident("num_zones".into()), Token::Equals, Token::Int(4)]
    );
}

#[test]
fn test_full_case_example() {
    let input = r#"
// solver setup
case = "runs/cyl"
boundary {
    internal {
        write = TRUE
        index = [1, 2]
    }
}
"#;

    let expected_tokens = vec![
        Token::Comment("// solver setup".into()),
        Token::Ident("case".into()),
        Token::Equals,
        Token::Str("runs/cyl".into()),
        Token::Ident("boundary".into()),
        Token::LBrace,
        Token::Ident("internal".into()),
        Token::LBrace,
        Token::Ident("write".into()),
        Token::Equals,
        Token::Bool(true),
        Token::Ident("index".into()),
        Token::Equals,
        Token::LBracket,
        Token::Int(1),
        Token::Comma,
        Token::Int(2),
        Token::RBracket,
        Token::RBrace,
        Token::RBrace,
    ];

    assert_eq!(tokens(input), expected_tokens);
}

#[test]
fn test_booleans_any_case() {
    assert_eq!(
        tokens("true FALSE True fAlSe"),
        vec![
            Token::Bool(true),
            Token::Bool(false),
            Token::Bool(true),
            Token::Bool(false),
        ]
    );
}

#[test]
fn test_boolean_prefix_is_identifier() {
    assert_eq!(
        tokens("trueish false_flag"),
        vec![
            Token::Ident("trueish".into()),
            Token::Ident("false_flag".into()),
        ]
    );
}

#[test]
fn test_integer_and_float_literals() {
    assert_eq!(
        tokens("42 -7 +3 1.5 2. .25 1e3 2.5e-2 -0.5"),
        vec![
            Token::Int(42),
            Token::Int(-7),
            Token::Int(3),
            Token::Float(1.5),
            Token::Float(2.0),
            Token::Float(0.25),
            Token::Float(1000.0),
            Token::Float(0.025),
            Token::Float(-0.5),
        ]
    );
}

#[test]
fn test_detached_sign_is_operator() {
    assert_eq!(
        tokens("a - 1"),
        vec![Token::Ident("a".into()), Token::Minus, Token::Int(1)]
    );
}

#[test]
fn test_attached_sign_belongs_to_literal() {
    let mut lexer = Lexer::new("a -1");
    assert_eq!(lexer.next_token().unwrap().token, Token::Ident("a".into()));
    let literal = lexer.next_token().unwrap();
    assert_eq!(literal.token, Token::Int(-1));
    assert_eq!(literal.sign, Some('-'));
}

#[test]
fn test_operators_and_punctuation() {
    assert_eq!(
        tokens("= - + * / ^ , : ( ) [ ] { }"),
        vec![
            Token::Equals,
            Token::Minus,
            Token::Plus,
            Token::Star,
            Token::Slash,
            Token::Caret,
            Token::Comma,
            Token::Colon,
            Token::LParen,
            Token::RParen,
            Token::LBracket,
            Token::RBracket,
            Token::LBrace,
            Token::RBrace,
        ]
    );
}

#[test]
fn test_string_is_verbatim() {
    assert_eq!(
        tokens(r#""a // not a comment\n""#),
        vec![Token::Str(r"a // not a comment\n".into())]
    );
}

#[test]
fn test_comment_runs_to_end_of_line() {
    assert_eq!(
        tokens("x = 1 // trailing\ny = 2"),
        vec![
            Token::Ident("x".into()),
            Token::Equals,
            Token::Int(1),
            Token::Comment("// trailing".into()),
            Token::Ident("y".into()),
            Token::Equals,
            Token::Int(2),
        ]
    );
}

#[test]
fn test_positions_are_tracked() {
    let mut lexer = Lexer::new("a = 1\n  bb = 2");
    let mut last = None;
    loop {
        let tok = lexer.next_token().unwrap();
        if tok.token == Token::Eof {
            break;
        }
        if tok.token == Token::Ident("bb".into()) {
            last = Some((tok.line, tok.column));
        }
    }
    assert_eq!(last, Some((2, 3)));
}

#[test]
fn test_unclosed_string_error() {
    let result = Lexer::tokenize("name = \"open");
    match result {
        Err(ConfError::Lex { fragment, line, column, .. }) => {
            assert_eq!(fragment, "\"open");
            assert_eq!((line, column), (1, 8));
        }
        other => panic!("Expected lex error, got {:?}", other),
    }
}

#[test]
fn test_unexpected_character_error() {
    let result = Lexer::tokenize("x = 3 % 2");
    assert!(matches!(result, Err(ConfError::Lex { ref fragment, .. }) if fragment == "%"));
}

#[test]
fn test_dangling_exponent_error() {
    assert!(matches!(Lexer::tokenize("x = 12e"), Err(ConfError::Lex { .. })));
}

#[test]
fn test_integer_out_of_range_error() {
    assert!(matches!(
        Lexer::tokenize("x = 99999999999999999999"),
        Err(ConfError::Lex { .. })
    ));
}

#[test]
fn test_empty_input() {
    assert!(tokens("  \n\t \r\n").is_empty());
}
