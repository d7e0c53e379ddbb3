// tests/lexer_tests.rs

use molang_lang::ast::TokenKind;
use molang_lang::lexer::tokenize;

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).into_iter().map(|t| t.kind).collect()
}

// ============================================================================
// Token streams
// ============================================================================

#[test]
fn test_float_arrow_float() {
    assert_eq!(
        kinds("1 -> 2"),
        vec![
            TokenKind::Float,
            TokenKind::Arrow,
            TokenKind::Float,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_maximal_munch() {
    assert_eq!(
        kinds("<= >= == != && || ?? -> ? :"),
        vec![
            TokenKind::Lte,
            TokenKind::Gte,
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::AmpAmp,
            TokenKind::BarBar,
            TokenKind::QuesQues,
            TokenKind::Arrow,
            TokenKind::Ques,
            TokenKind::Colon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_single_char_prefixes() {
    assert_eq!(
        kinds("< > = ! ?"),
        vec![
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Eq,
            TokenKind::Bang,
            TokenKind::Ques,
            TokenKind::Eof
        ]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_float_forms() {
    let tokens = tokenize("42 3.14 .5");
    assert_eq!(tokens[0].kind, TokenKind::Float);
    assert_eq!(tokens[0].value_str(), "42");
    assert_eq!(tokens[1].value_str(), "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Float);
    assert_eq!(tokens[2].value_str(), ".5");
}

#[test]
fn test_string_escapes() {
    let tokens = tokenize(r"'it\'s a \\ backslash'");
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value_str(), r"it's a \ backslash");
    assert_eq!(tokens[1].kind, TokenKind::Eof);
}

#[test]
fn test_keywords_case_insensitive() {
    assert_eq!(
        kinds("TRUE False RETURN Break CONTINUE"),
        vec![
            TokenKind::True,
            TokenKind::False,
            TokenKind::Return,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_identifier_keeps_written_case() {
    let tokens = tokenize("Variable.Name");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value_str(), "Variable");
    assert_eq!(tokens[1].kind, TokenKind::Dot);
    assert_eq!(tokens[2].value_str(), "Name");
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_positions_are_one_based() {
    let tokens = tokenize("a\n  b");
    assert_eq!((tokens[0].position.line, tokens[0].position.column), (1, 1));
    assert_eq!((tokens[1].position.line, tokens[1].position.column), (2, 3));
}

#[test]
fn test_operator_position_at_first_char() {
    let tokens = tokenize("1 -> 2");
    assert_eq!((tokens[1].position.line, tokens[1].position.column), (1, 3));
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_unknown_char_resumes() {
    let tokens = tokenize("$ + @ 1");
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Error,
            TokenKind::Plus,
            TokenKind::Error,
            TokenKind::Float,
            TokenKind::Eof
        ]
    );
    assert!(tokens[0].value_str().contains('$'));
    assert!(tokens[2].value_str().contains('@'));
}

#[test]
fn test_lone_bitwise_operators_are_errors() {
    let tokens = tokenize("1 & 2");
    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert!(tokens[1].value_str().contains("&&"));

    let tokens = tokenize("1 | 2");
    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert!(tokens[1].value_str().contains("||"));
}

#[test]
fn test_unterminated_string() {
    let tokens = tokenize("'never closed");
    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert!(tokens[0].value_str().contains("end-of-file"));
    assert_eq!((tokens[0].position.line, tokens[0].position.column), (1, 1));
    assert_eq!(tokens[1].kind, TokenKind::Eof);
}
