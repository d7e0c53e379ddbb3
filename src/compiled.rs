use crate::{
    ast::Expr,
    bindings::MutableBinding,
    evaluator::Evaluator,
    parser::{ParseError, parse},
    scope::Scope,
    value::Value,
};
use std::fmt;
use thiserror::Error;

/// Setup-time failure of [`CompiledFunction`] construction.
///
/// This is the only place the language reports errors to hosts besides
/// parsing itself; calls on a successfully compiled function never fail.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("duplicate parameter name '{0}'")]
    DuplicateParameter(String),
    #[error("empty parameter name")]
    EmptyParameter,
}

/// How a compiled function's result is coerced before it is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    /// Coerce to a number; null-likes come out as `0`.
    Number,
    /// Coerce to `1`/`0`.
    Bool,
    /// Coerce to a string; null-likes come out as `''`.
    String,
    /// No coercion, the raw value including `Nil`.
    Value,
}

/// A script specialized against a fixed parameter list.
///
/// Construction parses once and rewrites every identifier matching a
/// parameter name (case-insensitively) into a positional slot read, so
/// calls skip name resolution entirely: they just index the argument
/// slice. The surrounding scope is captured at compile time; each call
/// still gets its own fresh `temp` namespace.
///
/// Missing arguments read as [`Value::Nil`] inside the script and extra
/// ones are ignored, matching the language's no-error calling convention.
pub struct CompiledFunction {
    body: Vec<Expr>,
    parameters: Vec<String>,
    scope: Scope,
    return_kind: ReturnKind,
}

impl CompiledFunction {
    pub(crate) fn new(
        scope: Scope,
        source: &str,
        parameters: &[&str],
        return_kind: ReturnKind,
    ) -> Result<Self, CompileError> {
        let mut folded = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let name = parameter.to_lowercase();
            if name.is_empty() {
                return Err(CompileError::EmptyParameter);
            }
            if folded.contains(&name) {
                return Err(CompileError::DuplicateParameter(name));
            }
            folded.push(name);
        }

        let body = parse(source)?
            .into_iter()
            .map(|statement| specialize(statement, &folded))
            .collect();

        Ok(CompiledFunction {
            body,
            parameters: folded,
            scope,
            return_kind,
        })
    }

    /// The case-folded parameter names, in slot order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn call(&self, arguments: &[Value]) -> Value {
        let mut scope = self.scope.clone();
        let temp = Value::object(MutableBinding::new());
        scope.set("temp", temp.clone());
        scope.set("t", temp);

        let mut evaluator = Evaluator::with_arguments(&scope, arguments);
        let mut result = Value::Number(0.0);
        for statement in &self.body {
            result = evaluator.eval(statement);
            if let Some(value) = evaluator.take_return() {
                result = value;
                break;
            }
        }

        match self.return_kind {
            ReturnKind::Number => Value::number(result.as_number()),
            ReturnKind::Bool => Value::from(result.as_bool()),
            ReturnKind::String => Value::String(result.as_string()),
            ReturnKind::Value => result,
        }
    }

    /// Numeric convenience over [`call`](CompiledFunction::call).
    pub fn call_numbers(&self, arguments: &[f64]) -> f64 {
        let values: Vec<Value> = arguments.iter().map(|&n| Value::number(n)).collect();
        self.call(&values).as_number()
    }
}

impl fmt::Debug for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFunction")
            .field("parameters", &self.parameters)
            .field("return_kind", &self.return_kind)
            .finish_non_exhaustive()
    }
}

/// Rewrites parameter identifiers into argument slot reads. The one-time
/// tree rewrite that makes calls cheap.
fn specialize(expr: Expr, parameters: &[String]) -> Expr {
    let walk = |e: Box<Expr>| Box::new(specialize(*e, parameters));
    match expr {
        Expr::Identifier(name) => match parameters.iter().position(|p| *p == name) {
            Some(slot) => Expr::Argument(slot),
            None => Expr::Identifier(name),
        },
        Expr::Access { object, property } => Expr::Access {
            object: walk(object),
            property,
        },
        Expr::ArrayAccess { object, index } => Expr::ArrayAccess {
            object: walk(object),
            index: walk(index),
        },
        Expr::Arrow { object, body } => Expr::Arrow {
            object: walk(object),
            body: walk(body),
        },
        Expr::Call {
            function,
            arguments,
        } => Expr::Call {
            function: walk(function),
            arguments: arguments
                .into_iter()
                .map(|argument| specialize(argument, parameters))
                .collect(),
        },
        Expr::Unary { op, operand } => Expr::Unary {
            op,
            operand: walk(operand),
        },
        Expr::Binary { op, left, right } => Expr::Binary {
            op,
            left: walk(left),
            right: walk(right),
        },
        Expr::Assign { target, value } => Expr::Assign {
            target: walk(target),
            value: walk(value),
        },
        Expr::Ternary {
            condition,
            if_true,
            if_false,
        } => Expr::Ternary {
            condition: walk(condition),
            if_true: walk(if_true),
            if_false: walk(if_false),
        },
        Expr::Conditional { condition, if_true } => Expr::Conditional {
            condition: walk(condition),
            if_true: walk(if_true),
        },
        Expr::NullCoalesce { value, fallback } => Expr::NullCoalesce {
            value: walk(value),
            fallback: walk(fallback),
        },
        Expr::Scope(statements) => Expr::Scope(
            statements
                .into_iter()
                .map(|statement| specialize(statement, parameters))
                .collect(),
        ),
        Expr::Return(value) => Expr::Return(walk(value)),
        leaf @ (Expr::Number(_)
        | Expr::String(_)
        | Expr::Argument(_)
        | Expr::Break
        | Expr::Continue) => leaf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_become_slots() {
        let body = parse("value * 2 + other").unwrap();
        let rewritten: Vec<Expr> = body
            .into_iter()
            .map(|e| specialize(e, &["value".to_string()]))
            .collect();
        assert_eq!(
            rewritten[0],
            Expr::Binary {
                op: crate::ast::BinOp::Add,
                left: Box::new(Expr::Binary {
                    op: crate::ast::BinOp::Mul,
                    left: Box::new(Expr::Argument(0)),
                    right: Box::new(Expr::Number(2.0)),
                }),
                right: Box::new(Expr::Identifier("other".to_string())),
            }
        );
    }
}
