//! # Molang Abstract Syntax Tree
//!
//! This module defines the token and expression types for the Molang-style
//! expression language: short scripts that describe small computed values
//! (animation curves, entity queries, conditional logic) and are re-evaluated
//! frequently against a changing runtime context.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer, with source positions
//! - **[expressions]** - The flat expression node set and its renderer
//!
//! ## Core Concepts
//!
//! A script is a sequence of `;`-separated statement-expressions:
//!
//! ```text
//! temp.t = 3;
//! return 3 * temp.t * temp.t - 2 * temp.t * temp.t * temp.t;
//! ```
//!
//! Identifiers are case-insensitive and namespaced: `variable`/`v` persists
//! across evaluations of a shared scope, `temp`/`t` is per-evaluation scratch,
//! `query`/`q` and `context`/`c` are host-supplied, and `math` is the built-in
//! function table. The arrow operator (`->`) re-targets the right-hand lookup
//! at the object produced by the left-hand expression:
//!
//! ```text
//! v.self->q.get_name()
//! ```
//!
//! Trees are immutable after parsing and can be cached per source string and
//! shared across threads; each concurrent evaluation supplies its own scope.

pub mod expressions;
pub mod tokens;

pub use expressions::{BinOp, Expr, UnaryOp};
pub use tokens::{Position, Token, TokenKind};
