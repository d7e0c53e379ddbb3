//! An embeddable Molang-style expression language.
//!
//! Scripts are short `;`-separated expressions that compute small values,
//! typically re-evaluated every frame against a host context:
//!
//! ```
//! use molang_lang::Engine;
//!
//! let engine = Engine::new();
//! assert_eq!(engine.eval("math.sqrt(3 * 3 + 4 * 4)"), 5.0);
//! assert_eq!(engine.eval("variable.x = (variable.x ?? 1.2) + 0.3;"), 1.5);
//! ```
//!
//! Identifiers are case-insensitive and namespaced: `variable`/`v`
//! persists across evaluations, `temp`/`t` is per-evaluation scratch,
//! `query`/`q` and `context`/`c` are supplied by the host, and `math` is
//! the built-in function table. Evaluation is total: missing names read
//! as an absent marker, type mismatches coerce, division by zero is zero.
//!
//! Hosts extend the language through [`ObjectBinding`] (objects the arrow
//! operator can target) and [`NativeFunction`] (functions receiving their
//! arguments unevaluated). Hot paths can [`Engine::prepare`] a script to
//! parse once, or [`Engine::compile`] it into a [`CompiledFunction`] with
//! positional parameters.

pub mod ast;
pub mod bindings;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compiled;
pub mod engine;
pub mod evaluator;
pub mod json;
pub mod lexer;
pub mod math;
pub mod parser;
pub mod scope;
pub mod value;

pub use ast::{BinOp, Expr, Position, Token, TokenKind, UnaryOp};
pub use bindings::{
    BindingError, CaseFoldMap, MutableBinding, NativeFunction, ObjectBinding, function,
    numeric_function,
};
pub use compiled::{CompileError, CompiledFunction, ReturnKind};
pub use engine::{Engine, PreparedFunction};
pub use evaluator::Evaluator;
pub use lexer::{Lexer, tokenize};
pub use parser::{ParseError, parse};
pub use scope::Scope;
pub use value::Value;
