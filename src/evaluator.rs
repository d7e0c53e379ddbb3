use crate::{
    ast::{BinOp, Expr, UnaryOp},
    scope::Scope,
    value::Value,
};
use std::mem;

/// Loop control raised by `break` and `continue` and consumed by the
/// nearest enclosing loop built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Break,
    Continue,
}

/// A tree-walking evaluator for one evaluation pass.
///
/// Holds the scope to resolve names against, the positional arguments of a
/// compiled function (empty otherwise), the "current object" the arrow
/// operator re-targets, and the return-value channel.
///
/// Evaluation is total: there is no error path. Unknown names read as
/// [`Value::Nil`], type mismatches coerce, division by zero is zero, and
/// calling a non-function yields zero.
pub struct Evaluator<'a> {
    scope: &'a Scope,
    arguments: &'a [Value],
    current: Option<Value>,
    return_value: Option<Value>,
    flag: Option<Flag>,
}

impl<'a> Evaluator<'a> {
    pub fn new(scope: &'a Scope) -> Self {
        Evaluator::with_arguments(scope, &[])
    }

    pub fn with_arguments(scope: &'a Scope, arguments: &'a [Value]) -> Self {
        Evaluator {
            scope,
            arguments,
            current: None,
            return_value: None,
            flag: None,
        }
    }

    /// The object the innermost arrow operator evaluated to, if any.
    /// Host query functions read this to act on "the current entity".
    pub fn current_object(&self) -> Option<&Value> {
        self.current.as_ref()
    }

    /// Takes the pending `return` value, clearing the channel.
    pub fn take_return(&mut self) -> Option<Value> {
        self.return_value.take()
    }

    /// Whether a `return`, `break` or `continue` is unwinding.
    fn unwinding(&self) -> bool {
        self.return_value.is_some() || self.flag.is_some()
    }

    pub fn eval_number(&mut self, expr: &Expr) -> f64 {
        self.eval(expr).as_number()
    }

    pub fn eval_bool(&mut self, expr: &Expr) -> bool {
        self.eval(expr).as_bool()
    }

    pub fn eval(&mut self, expr: &Expr) -> Value {
        match expr {
            Expr::Number(n) => Value::Number(*n),
            Expr::String(s) => Value::String(s.clone()),
            Expr::Identifier(name) => self.scope.get(name),
            Expr::Argument(slot) => self.arguments.get(*slot).cloned().unwrap_or(Value::Nil),
            Expr::Access { object, property } => match self.eval(object) {
                Value::Object(binding) => binding.get(property),
                _ => Value::Nil,
            },
            Expr::ArrayAccess { object, index } => match self.eval(object) {
                Value::Array(items) => {
                    let index = self.eval_number(index).round();
                    if index >= 0.0 && (index as usize) < items.len() {
                        items[index as usize].clone()
                    } else {
                        Value::Nil
                    }
                }
                _ => Value::Nil,
            },
            Expr::Arrow { object, body } => match self.eval(object) {
                object @ Value::Object(_) => {
                    let outer = mem::replace(&mut self.current, Some(object));
                    let result = self.eval(body);
                    self.current = outer;
                    result
                }
                _ => Value::Number(0.0),
            },
            Expr::Call {
                function,
                arguments,
            } => self.eval_call(function, arguments),
            Expr::Unary { op, operand } => match op {
                UnaryOp::Negate => Value::number(-self.eval_number(operand)),
                UnaryOp::Not => Value::from(!self.eval_bool(operand)),
            },
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Expr::Assign { target, value } => {
                let value = self.eval(value);
                self.assign(target, value)
            }
            Expr::Ternary {
                condition,
                if_true,
                if_false,
            } => {
                if self.eval_bool(condition) {
                    self.eval(if_true)
                } else {
                    self.eval(if_false)
                }
            }
            Expr::Conditional { condition, if_true } => {
                if self.eval_bool(condition) {
                    self.eval(if_true)
                } else {
                    Value::Number(0.0)
                }
            }
            Expr::NullCoalesce { value, fallback } => {
                // only the absent marker takes the fallback; zero is kept
                let value = self.eval(value);
                if value.is_nil() {
                    self.eval(fallback)
                } else {
                    value
                }
            }
            Expr::Scope(statements) => {
                let mut last = Value::Number(0.0);
                for statement in statements {
                    last = self.eval(statement);
                    if self.unwinding() {
                        break;
                    }
                }
                last
            }
            Expr::Return(value) => {
                let value = self.eval(value);
                self.return_value = Some(value.clone());
                value
            }
            Expr::Break => {
                self.flag = Some(Flag::Break);
                Value::Number(0.0)
            }
            Expr::Continue => {
                self.flag = Some(Flag::Continue);
                Value::Number(0.0)
            }
        }
    }

    fn eval_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> Value {
        match op {
            BinOp::And => Value::from(self.eval_bool(left) && self.eval_bool(right)),
            BinOp::Or => Value::from(self.eval_bool(left) || self.eval_bool(right)),
            BinOp::Lt => Value::from(self.eval_number(left) < self.eval_number(right)),
            BinOp::Lte => Value::from(self.eval_number(left) <= self.eval_number(right)),
            BinOp::Gt => Value::from(self.eval_number(left) > self.eval_number(right)),
            BinOp::Gte => Value::from(self.eval_number(left) >= self.eval_number(right)),
            BinOp::Eq => Value::from(self.values_equal(left, right)),
            BinOp::Neq => Value::from(!self.values_equal(left, right)),
            BinOp::Add => {
                let left = self.eval(left);
                let right = self.eval(right);
                // + concatenates as soon as either side is a string
                if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
                    Value::String(left.as_string() + &right.as_string())
                } else {
                    Value::number(left.as_number() + right.as_number())
                }
            }
            BinOp::Sub => Value::number(self.eval_number(left) - self.eval_number(right)),
            BinOp::Mul => Value::number(self.eval_number(left) * self.eval_number(right)),
            BinOp::Div => {
                let dividend = self.eval_number(left);
                let divisor = self.eval_number(right);
                if divisor == 0.0 {
                    Value::Number(0.0)
                } else {
                    Value::number(dividend / divisor)
                }
            }
        }
    }

    fn values_equal(&mut self, left: &Expr, right: &Expr) -> bool {
        let left = self.eval(left);
        let right = self.eval(right);
        match (&left, &right) {
            (Value::String(a), Value::String(b)) => a == b,
            _ => left.as_number() == right.as_number(),
        }
    }

    fn assign(&mut self, target: &Expr, value: Value) -> Value {
        match target {
            Expr::Access { object, property } => {
                if let Value::Object(binding) = self.eval(object) {
                    binding.set(property, value.clone());
                }
                value
            }
            Expr::Arrow { object, body } => match self.eval(object) {
                object @ Value::Object(_) => {
                    let outer = mem::replace(&mut self.current, Some(object));
                    let result = self.assign(body, value);
                    self.current = outer;
                    result
                }
                _ => value,
            },
            // the scope itself is read-only during evaluation
            _ => value,
        }
    }

    fn eval_call(&mut self, function: &Expr, arguments: &[Expr]) -> Value {
        if let Expr::Identifier(name) = function {
            match name.as_str() {
                "loop" => return self.builtin_loop(arguments),
                "for_each" => return self.builtin_for_each(arguments),
                _ => {}
            }
        }
        match self.eval(function) {
            Value::Function(function) => function.call(self, arguments),
            _ => Value::Number(0.0),
        }
    }

    /// `loop(count, body)`: runs `body` a fixed number of times. The body
    /// is an unevaluated expression, re-walked per iteration.
    fn builtin_loop(&mut self, arguments: &[Expr]) -> Value {
        let (Some(count), Some(body)) = (arguments.first(), arguments.get(1)) else {
            return Value::Number(0.0);
        };
        let count = self.eval_number(count).round() as i64;
        for _ in 0..count {
            self.eval(body);
            if self.return_value.is_some() {
                break;
            }
            match self.flag.take() {
                Some(Flag::Break) => break,
                Some(Flag::Continue) | None => {}
            }
        }
        Value::Number(0.0)
    }

    /// `for_each(variable, array, body)`: binds each element to the given
    /// property (e.g. `v.item`) and runs `body` for it.
    fn builtin_for_each(&mut self, arguments: &[Expr]) -> Value {
        let (Some(variable), Some(array), Some(body)) =
            (arguments.first(), arguments.get(1), arguments.get(2))
        else {
            return Value::Number(0.0);
        };
        let Expr::Access { object, property } = variable else {
            return Value::Number(0.0);
        };
        let Value::Object(binding) = self.eval(object) else {
            return Value::Number(0.0);
        };
        let Value::Array(items) = self.eval(array) else {
            return Value::Number(0.0);
        };
        for item in items {
            binding.set(property, item);
            self.eval(body);
            if self.return_value.is_some() {
                break;
            }
            match self.flag.take() {
                Some(Flag::Break) => break,
                Some(Flag::Continue) | None => {}
            }
        }
        Value::Number(0.0)
    }
}
