use crate::{
    ast::{BinOp, Expr, Token, TokenKind, UnaryOp},
    lexer::Lexer,
};
use thiserror::Error;

/// A positioned parse failure.
///
/// Parsing is all-or-nothing: the first structural problem aborts the parse
/// and is reported with a message, the 1-based line and column where it was
/// found, and the full script text, so a host can render a diagnostic
/// without keeping the source around itself.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// The script that failed to parse.
    pub script: String,
}

/// Parses a script: a sequence of `;`-separated statement-expressions.
///
/// The trailing semicolon is optional and an empty script parses to an
/// empty sequence.
pub fn parse(input: &str) -> Result<Vec<Expr>, ParseError> {
    let mut parser = Parser::new(input);
    parser.check_lexical()?;

    let mut statements = Vec::new();
    while parser.current_token.kind != TokenKind::Eof {
        statements.push(parser.parse_expression(0)?);
        match parser.current_token.kind {
            TokenKind::Semicolon => parser.advance()?,
            TokenKind::Eof => break,
            _ => {
                return Err(parser.error(format!(
                    "Expected ';' or end of input, got {}",
                    parser.current_token
                )));
            }
        }
    }
    Ok(statements)
}

struct Parser {
    lexer: Lexer,
    current_token: Token,
    script: String,
}

impl Parser {
    fn new(input: &str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
            script: input.to_string(),
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            line: self.current_token.position.line,
            column: self.current_token.position.column,
            script: self.script.clone(),
        }
    }

    /// Promotes a lexer error token into a parse failure.
    fn check_lexical(&self) -> Result<(), ParseError> {
        if self.current_token.kind == TokenKind::Error {
            Err(self.error(self.current_token.value_str()))
        } else {
            Ok(())
        }
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token();
        self.check_lexical()
    }

    fn expect(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        if self.current_token.kind != expected {
            return Err(self.error(format!(
                "Expected {:?}, got {}",
                expected, self.current_token
            )));
        }
        self.advance()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    /// Parses primary expressions (atoms): literals, identifiers and their
    /// dot-chains, parenthesized expressions, execution scopes, unary
    /// operators and the statement keywords.
    fn parse_single(&mut self) -> Result<Expr, ParseError> {
        match self.current_token.kind {
            TokenKind::Float => {
                let number = self.current_token.value_str().parse().unwrap_or_default();
                self.advance()?;
                Ok(Expr::Number(number))
            }
            // boolean literals are just numbers
            TokenKind::True => {
                self.advance()?;
                Ok(Expr::Number(1.0))
            }
            TokenKind::False => {
                self.advance()?;
                Ok(Expr::Number(0.0))
            }
            TokenKind::String => {
                let value = self.current_token.value_str().to_string();
                self.advance()?;
                Ok(Expr::String(value))
            }
            TokenKind::Identifier => {
                // identifiers are case-insensitive, folded once here
                let name = self.current_token.value_str().to_lowercase();
                self.advance()?;
                let mut expr = Expr::Identifier(name);
                while self.check(TokenKind::Dot) {
                    self.advance()?;
                    expr = Expr::Access {
                        object: Box::new(expr),
                        property: self.parse_property_name()?,
                    };
                }
                Ok(expr)
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression(0)?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBrace => {
                self.advance()?;
                self.parse_scope()
            }
            TokenKind::Sub => {
                self.advance()?;
                let operand = self.parse_expression(1500)?;
                // fold the sign into number literals
                match operand {
                    Expr::Number(n) => Ok(Expr::Number(-n)),
                    operand => Ok(Expr::Unary {
                        op: UnaryOp::Negate,
                        operand: Box::new(operand),
                    }),
                }
            }
            TokenKind::Bang => {
                self.advance()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(self.parse_expression(1500)?),
                })
            }
            TokenKind::Return => {
                self.advance()?;
                Ok(Expr::Return(Box::new(self.parse_expression(0)?)))
            }
            TokenKind::Break => {
                self.advance()?;
                Ok(Expr::Break)
            }
            TokenKind::Continue => {
                self.advance()?;
                Ok(Expr::Continue)
            }
            TokenKind::Eof => Err(self.error("Unexpected end of input")),
            _ => Err(self.error(format!(
                "Unexpected token {} in expression",
                self.current_token
            ))),
        }
    }

    fn parse_property_name(&mut self) -> Result<String, ParseError> {
        if !self.check(TokenKind::Identifier) {
            return Err(self.error(format!(
                "Expected a property name after '.', got {}",
                self.current_token
            )));
        }
        let name = self.current_token.value_str().to_lowercase();
        self.advance()?;
        Ok(name)
    }

    /// Parses the statements of an execution scope after its `{` was
    /// consumed. Statements are separated by `;`; the one before `}` may
    /// leave it off.
    fn parse_scope(&mut self) -> Result<Expr, ParseError> {
        let mut statements = Vec::new();
        if self.check(TokenKind::RBrace) {
            self.advance()?;
            return Ok(Expr::Scope(statements));
        }
        loop {
            statements.push(self.parse_expression(0)?);
            match self.current_token.kind {
                TokenKind::Semicolon => {
                    self.advance()?;
                    if self.check(TokenKind::RBrace) {
                        self.advance()?;
                        break;
                    }
                }
                TokenKind::RBrace => {
                    self.advance()?;
                    break;
                }
                _ => {
                    return Err(self.error(format!(
                        "Expected ';' or '}}' in execution scope, got {}",
                        self.current_token
                    )));
                }
            }
        }
        Ok(Expr::Scope(statements))
    }

    /// Precedence climbing: attaches postfix and infix continuations to
    /// `parse_single`'s atom while they bind more tightly than
    /// `attachment`.
    fn parse_expression(&mut self, attachment: u32) -> Result<Expr, ParseError> {
        let mut left = self.parse_single()?;
        loop {
            left = match self.current_token.kind {
                // postfix forms always attach
                TokenKind::Dot => {
                    self.advance()?;
                    Expr::Access {
                        object: Box::new(left),
                        property: self.parse_property_name()?,
                    }
                }
                TokenKind::LBracket => {
                    self.advance()?;
                    let index = self.parse_expression(0)?;
                    self.expect(TokenKind::RBracket)?;
                    Expr::ArrayAccess {
                        object: Box::new(left),
                        index: Box::new(index),
                    }
                }
                TokenKind::LParen => {
                    self.advance()?;
                    Expr::Call {
                        function: Box::new(left),
                        arguments: self.parse_arguments()?,
                    }
                }
                TokenKind::Arrow if attachment < 2000 => {
                    self.advance()?;
                    Expr::Arrow {
                        object: Box::new(left),
                        body: Box::new(self.parse_expression(2000)?),
                    }
                }
                TokenKind::Star if attachment < 1000 => self.parse_binary(left, BinOp::Mul)?,
                TokenKind::Slash if attachment < 1000 => self.parse_binary(left, BinOp::Div)?,
                TokenKind::Plus if attachment < 900 => self.parse_binary(left, BinOp::Add)?,
                TokenKind::Sub if attachment < 900 => self.parse_binary(left, BinOp::Sub)?,
                TokenKind::Lt if attachment < 700 => self.parse_binary(left, BinOp::Lt)?,
                TokenKind::Lte if attachment < 700 => self.parse_binary(left, BinOp::Lte)?,
                TokenKind::Gt if attachment < 700 => self.parse_binary(left, BinOp::Gt)?,
                TokenKind::Gte if attachment < 700 => self.parse_binary(left, BinOp::Gte)?,
                TokenKind::EqEq if attachment < 500 => self.parse_binary(left, BinOp::Eq)?,
                TokenKind::BangEq if attachment < 500 => self.parse_binary(left, BinOp::Neq)?,
                TokenKind::AmpAmp if attachment < 300 => self.parse_binary(left, BinOp::And)?,
                TokenKind::BarBar if attachment < 200 => self.parse_binary(left, BinOp::Or)?,
                TokenKind::QuesQues if attachment < 2 => {
                    self.advance()?;
                    Expr::NullCoalesce {
                        value: Box::new(left),
                        fallback: Box::new(self.parse_expression(2)?),
                    }
                }
                TokenKind::Ques if attachment < 1 => {
                    self.advance()?;
                    let if_true = self.parse_expression(0)?;
                    if self.check(TokenKind::Colon) {
                        self.advance()?;
                        Expr::Ternary {
                            condition: Box::new(left),
                            if_true: Box::new(if_true),
                            if_false: Box::new(self.parse_expression(0)?),
                        }
                    } else {
                        Expr::Conditional {
                            condition: Box::new(left),
                            if_true: Box::new(if_true),
                        }
                    }
                }
                TokenKind::Eq if attachment < 1 => {
                    if !matches!(
                        left,
                        Expr::Identifier(_) | Expr::Access { .. } | Expr::Arrow { .. }
                    ) {
                        return Err(self.error("Invalid assignment target"));
                    }
                    self.advance()?;
                    // right-associative: a = b = c assigns c to both
                    Expr::Assign {
                        target: Box::new(left),
                        value: Box::new(self.parse_expression(0)?),
                    }
                }
                _ => return Ok(left),
            };
        }
    }

    /// Left-associative binary operator: the right side is parsed with the
    /// operator's own precedence so an equal-precedence neighbor attaches
    /// to the combined expression instead.
    fn parse_binary(&mut self, left: Expr, op: BinOp) -> Result<Expr, ParseError> {
        self.advance()?;
        Ok(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(self.parse_expression(op.precedence())?),
        })
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut arguments = Vec::new();
        if self.check(TokenKind::RParen) {
            self.advance()?;
            return Ok(arguments);
        }
        loop {
            arguments.push(self.parse_expression(0)?);
            match self.current_token.kind {
                TokenKind::Comma => self.advance()?,
                TokenKind::RParen => {
                    self.advance()?;
                    break;
                }
                _ => {
                    return Err(self.error(format!(
                        "Expected ',' or ')' in argument list, got {}",
                        self.current_token
                    )));
                }
            }
        }
        Ok(arguments)
    }
}
