use crate::ast::{Position, Token, TokenKind};

/// The Molang lexer: turns source text into a token stream.
///
/// Lexical errors are reported as data rather than failures: an unterminated
/// string or an unrecognized character produces a [`TokenKind::Error`] token
/// and scanning resumes, so a single pass can surface every problem in the
/// source. Contrast with the parser, which aborts on the first structural
/// error.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += 1;
    }

    fn here(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_word_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_word_continuation(ch: char) -> bool {
        Self::is_word_start(ch) || ch.is_ascii_digit()
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_word_continuation(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads a float literal: a run of digits, optionally followed by `.`
    /// and more digits. The integer part may be empty (`.5` is valid).
    /// No exponent notation. The dot is only taken when a digit follows,
    /// so `31.floor` stays a member access on `31`.
    fn read_number(&mut self) -> String {
        let mut number = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        if self.current_char() == Some('.')
            && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            number.push('.');
            self.advance();
            while let Some(ch) = self.current_char() {
                if ch.is_ascii_digit() {
                    number.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        number
    }

    /// Reads a single-quoted string literal. Backslash escapes an embedded
    /// quote or another backslash; any other escaped character is kept
    /// verbatim. An unterminated string becomes an error token.
    fn read_string(&mut self, position: Position) -> Token {
        self.advance(); // consume opening quote
        let mut value = String::new();

        while let Some(ch) = self.current_char() {
            match ch {
                '\'' => {
                    self.advance();
                    return Token::with_value(TokenKind::String, value, position);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('\'') => value.push('\''),
                        Some('\\') => value.push('\\'),
                        Some(other) => {
                            value.push('\\');
                            value.push(other);
                        }
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    value.push(ch);
                    self.advance();
                }
            }
        }

        Token::with_value(
            TokenKind::Error,
            "Found end-of-file before closing quote",
            position,
        )
    }

    /// Returns the next token. Call repeatedly until [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let position = self.here();

        let Some(ch) = self.current_char() else {
            return Token::new(TokenKind::Eof, position);
        };

        // maximal munch: two-character operators before their prefixes
        macro_rules! pair_or {
            ($second:literal, $pair:expr, $single:expr) => {{
                self.advance();
                if self.current_char() == Some($second) {
                    self.advance();
                    Token::new($pair, position)
                } else {
                    Token::new($single, position)
                }
            }};
        }

        match ch {
            '0'..='9' => {
                let text = self.read_number();
                Token::with_value(TokenKind::Float, text, position)
            }
            '.' if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                let text = self.read_number();
                Token::with_value(TokenKind::Float, text, position)
            }
            c if Self::is_word_start(c) => {
                let word = self.read_word();
                let kind = match word.to_lowercase().as_str() {
                    "break" => TokenKind::Break,
                    "continue" => TokenKind::Continue,
                    "return" => TokenKind::Return,
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    _ => TokenKind::Identifier,
                };
                if kind == TokenKind::Identifier {
                    Token::with_value(kind, word, position)
                } else {
                    Token::new(kind, position)
                }
            }
            '\'' => self.read_string(position),
            '!' => pair_or!('=', TokenKind::BangEq, TokenKind::Bang),
            '=' => pair_or!('=', TokenKind::EqEq, TokenKind::Eq),
            '<' => pair_or!('=', TokenKind::Lte, TokenKind::Lt),
            '>' => pair_or!('=', TokenKind::Gte, TokenKind::Gt),
            '-' => pair_or!('>', TokenKind::Arrow, TokenKind::Sub),
            '?' => pair_or!('?', TokenKind::QuesQues, TokenKind::Ques),
            '&' => {
                self.advance();
                if self.current_char() == Some('&') {
                    self.advance();
                    Token::new(TokenKind::AmpAmp, position)
                } else {
                    Token::with_value(
                        TokenKind::Error,
                        "Unexpected token '&', expected '&&' (bitwise operators are not supported)",
                        position,
                    )
                }
            }
            '|' => {
                self.advance();
                if self.current_char() == Some('|') {
                    self.advance();
                    Token::new(TokenKind::BarBar, position)
                } else {
                    Token::with_value(
                        TokenKind::Error,
                        "Unexpected token '|', expected '||' (bitwise operators are not supported)",
                        position,
                    )
                }
            }
            '.' => {
                self.advance();
                Token::new(TokenKind::Dot, position)
            }
            '*' => {
                self.advance();
                Token::new(TokenKind::Star, position)
            }
            '/' => {
                self.advance();
                Token::new(TokenKind::Slash, position)
            }
            '+' => {
                self.advance();
                Token::new(TokenKind::Plus, position)
            }
            '(' => {
                self.advance();
                Token::new(TokenKind::LParen, position)
            }
            ')' => {
                self.advance();
                Token::new(TokenKind::RParen, position)
            }
            '{' => {
                self.advance();
                Token::new(TokenKind::LBrace, position)
            }
            '}' => {
                self.advance();
                Token::new(TokenKind::RBrace, position)
            }
            ':' => {
                self.advance();
                Token::new(TokenKind::Colon, position)
            }
            '[' => {
                self.advance();
                Token::new(TokenKind::LBracket, position)
            }
            ']' => {
                self.advance();
                Token::new(TokenKind::RBracket, position)
            }
            ',' => {
                self.advance();
                Token::new(TokenKind::Comma, position)
            }
            ';' => {
                self.advance();
                Token::new(TokenKind::Semicolon, position)
            }
            other => {
                // unknown character: report it, resume on the next one
                self.advance();
                Token::with_value(
                    TokenKind::Error,
                    format!("Unexpected token '{}': invalid token", other),
                    position,
                )
            }
        }
    }
}

/// Tokenizes the whole input, including the final EOF token.
///
/// Error tokens are included in the stream, so callers can list every
/// lexical problem in one pass.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("break continue return true false");
    assert_eq!(lexer.next_token().kind, TokenKind::Break);
    assert_eq!(lexer.next_token().kind, TokenKind::Continue);
    assert_eq!(lexer.next_token().kind, TokenKind::Return);
    assert_eq!(lexer.next_token().kind, TokenKind::True);
    assert_eq!(lexer.next_token().kind, TokenKind::False);
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
}

#[test]
fn test_arrow_munch() {
    let kinds: Vec<_> = tokenize("1 -> 2").into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Float,
            TokenKind::Arrow,
            TokenKind::Float,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_error_recovery_continues() {
    let kinds: Vec<_> = tokenize("$ + 1").into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Error,
            TokenKind::Plus,
            TokenKind::Float,
            TokenKind::Eof
        ]
    );
}
