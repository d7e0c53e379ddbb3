use std::fmt;

/// A 1-based source position, recorded at the first character of a token.
///
/// Both fields start at 1; this is the coordinate pair that diagnostics
/// (and any host UI rendering them) must be able to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The kind of a lexical token.
///
/// Tokens are a sequence of one or more continuous characters, like `??`,
/// `->`, `!`, `true`, `1.0`. They have no behavior of their own; they just
/// group characters for the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input.
    Eof,

    /// A tokenization error. The token carries a message describing the
    /// problem; the lexer keeps scanning after emitting one, so a single
    /// pass can surface multiple issues.
    Error,

    /// Identifier, carries the name as written (case is folded later,
    /// by the parser).
    Identifier,

    /// String literal delimited by single quotes, carries its content.
    String,

    /// Float literal, carries its text (`42`, `3.14`, `.5`).
    Float,

    /// The `true` keyword.
    True,

    /// The `false` keyword.
    False,

    /// The `break` keyword.
    Break,

    /// The `continue` keyword.
    Continue,

    /// The `return` keyword.
    Return,

    /// `.`
    Dot,

    /// `!`
    Bang,

    /// `&&`
    AmpAmp,

    /// `||`
    BarBar,

    /// `<`
    Lt,

    /// `<=`
    Lte,

    /// `>`
    Gt,

    /// `>=`
    Gte,

    /// `=`
    Eq,

    /// `==`
    EqEq,

    /// `!=`
    BangEq,

    /// `*`
    Star,

    /// `/`
    Slash,

    /// `+`
    Plus,

    /// `-`
    Sub,

    /// `(`
    LParen,

    /// `)`
    RParen,

    /// `{`
    LBrace,

    /// `}`
    RBrace,

    /// `??`
    QuesQues,

    /// `?`
    Ques,

    /// `:`
    Colon,

    /// `->`
    Arrow,

    /// `[`
    LBracket,

    /// `]`
    RBracket,

    /// `,`
    Comma,

    /// `;`
    Semicolon,
}

impl TokenKind {
    /// Whether tokens of this kind carry a lexical value
    /// (identifier name, string content, float text, error message).
    pub fn has_value(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier | TokenKind::String | TokenKind::Float | TokenKind::Error
        )
    }
}

/// A single token: kind, optional lexical value, and source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<String>,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Token {
            kind,
            value: None,
            position,
        }
    }

    pub fn with_value(kind: TokenKind, value: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            value: Some(value.into()),
            position,
        }
    }

    /// The carried lexical value, or an empty string for valueless kinds.
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{:?}({})", self.kind, value),
            None => write!(f, "{:?}", self.kind),
        }
    }
}
