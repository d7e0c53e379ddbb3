use std::fmt;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetical negation (`-`)
    Negate,
    /// Logical negation (`!`)
    Not,
}

/// Binary operators.
///
/// Assignment, conditionals, null-coalescing and the arrow operator have
/// dedicated [`Expr`] variants instead of living here; this enum only holds
/// the operators that evaluate both sides the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Logical AND (`&&`), short-circuit
    And,
    /// Logical OR (`||`), short-circuit
    Or,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Lte,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Gte,
    /// Equal (`==`)
    Eq,
    /// Not equal (`!=`)
    Neq,
    /// Addition, or concatenation when either side is a string (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`), division by zero yields zero
    Div,
}

impl BinOp {
    /// Binding strength used by the parser's precedence climbing and by
    /// [`Expr`]'s renderer when deciding where parentheses are required.
    pub fn precedence(self) -> u32 {
        match self {
            BinOp::Or => 200,
            BinOp::And => 300,
            BinOp::Eq | BinOp::Neq => 500,
            BinOp::Lt | BinOp::Lte | BinOp::Gt | BinOp::Gte => 700,
            BinOp::Add | BinOp::Sub => 900,
            BinOp::Mul | BinOp::Div => 1000,
        }
    }

    /// Source-text symbol for this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Lt => "<",
            BinOp::Lte => "<=",
            BinOp::Gt => ">",
            BinOp::Gte => ">=",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

/// Abstract syntax tree node for a parsed expression.
///
/// Nodes are immutable once constructed and exclusively own their children;
/// the same tree can be walked concurrently against different scopes.
///
/// Boolean literals do not appear here: `true` and `false` are folded to
/// `Number(1.0)` / `Number(0.0)` at parse time, and a unary minus applied to
/// a number literal is folded into the literal itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal number, e.g. `42`, `3.14`, `.5`
    Number(f64),

    /// Literal string, e.g. `'hello'`
    String(String),

    /// Identifier reference, case-folded to lowercase, e.g. `math`, `q`
    Identifier(String),

    /// Property access: `object.property`
    ///
    /// The property name is case-folded at parse time.
    Access {
        object: Box<Expr>,
        property: String,
    },

    /// Array element access: `object[index]`
    ArrayAccess {
        object: Box<Expr>,
        index: Box<Expr>,
    },

    /// Arrow access: `object->body`
    ///
    /// Evaluates `object` and, when it is an object value, evaluates `body`
    /// with the scope's "current object" rebound to it, so per-object query
    /// functions run against that object instead of the outer one.
    Arrow {
        object: Box<Expr>,
        body: Box<Expr>,
    },

    /// Call: `function(arguments...)`
    Call {
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },

    /// Unary operation: `-operand` or `!operand`
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Binary operation (arithmetic, comparison, logical)
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Assignment: `target = value`
    ///
    /// The parser only accepts lvalue shapes (identifier, property access,
    /// arrow access) as the target.
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },

    /// Ternary conditional: `condition ? if_true : if_false`
    Ternary {
        condition: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
    },

    /// Binary conditional: `condition ? if_true`
    ///
    /// Evaluates to zero when the condition is false.
    Conditional {
        condition: Box<Expr>,
        if_true: Box<Expr>,
    },

    /// Null-coalescing: `value ?? fallback`
    ///
    /// Takes the fallback only when `value` evaluates to the absent-binding
    /// marker; a zero number is a present value and is kept.
    NullCoalesce {
        value: Box<Expr>,
        fallback: Box<Expr>,
    },

    /// Execution scope: `{ expr; expr; ... }`
    ///
    /// Statement-expressions evaluated in order for their side effects,
    /// with early exit through the return-value channel.
    Scope(Vec<Expr>),

    /// Direct read of a compiled-function parameter slot.
    ///
    /// Never produced by the parser; the specialization step rewrites
    /// matching identifiers into this so calls skip name resolution.
    Argument(usize),

    /// `return expr` — sets the return-value slot and unwinds the
    /// enclosing execution scopes.
    Return(Box<Expr>),

    /// `break` — stops the nearest enclosing loop built-in.
    Break,

    /// `continue` — skips to the next iteration of the nearest
    /// enclosing loop built-in.
    Continue,
}

impl Expr {
    /// Binding strength of this node when re-rendered to source text.
    ///
    /// Parenthesization is not preserved structurally by the parser, so the
    /// renderer reinserts parentheses exactly where a child binds less
    /// tightly than its position requires.
    pub fn precedence(&self) -> u32 {
        match self {
            Expr::Number(_)
            | Expr::String(_)
            | Expr::Identifier(_)
            | Expr::Argument(_)
            | Expr::Scope(_)
            | Expr::Break
            | Expr::Continue => 4000,
            Expr::Access { .. } | Expr::ArrayAccess { .. } | Expr::Call { .. } => 2500,
            Expr::Arrow { .. } => 2000,
            Expr::Unary { .. } => 1500,
            Expr::Binary { op, .. } => op.precedence(),
            Expr::NullCoalesce { .. } => 2,
            Expr::Ternary { .. } | Expr::Conditional { .. } | Expr::Assign { .. } => 1,
            Expr::Return(_) => 0,
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, min_precedence: u32) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

fn fmt_string_literal(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in value.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("'")
}

impl fmt::Display for Expr {
    /// Renders the expression back to parseable source text, inserting
    /// parentheses only where precedence requires them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::String(s) => fmt_string_literal(f, s),
            Expr::Identifier(name) => f.write_str(name),
            Expr::Argument(slot) => write!(f, "arg{}", slot),
            Expr::Access { object, property } => {
                object.fmt_child(f, 2500)?;
                write!(f, ".{}", property)
            }
            Expr::ArrayAccess { object, index } => {
                object.fmt_child(f, 2500)?;
                write!(f, "[{}]", index)
            }
            Expr::Arrow { object, body } => {
                object.fmt_child(f, 2000)?;
                f.write_str("->")?;
                body.fmt_child(f, 2001)
            }
            Expr::Call {
                function,
                arguments,
            } => {
                function.fmt_child(f, 2500)?;
                f.write_str("(")?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Expr::Unary { op, operand } => {
                f.write_str(match op {
                    UnaryOp::Negate => "-",
                    UnaryOp::Not => "!",
                })?;
                operand.fmt_child(f, 1500)
            }
            Expr::Binary { op, left, right } => {
                left.fmt_child(f, op.precedence())?;
                write!(f, " {} ", op.symbol())?;
                right.fmt_child(f, op.precedence() + 1)
            }
            Expr::Assign { target, value } => {
                target.fmt_child(f, 2)?;
                f.write_str(" = ")?;
                value.fmt_child(f, 1)
            }
            Expr::Ternary {
                condition,
                if_true,
                if_false,
            } => {
                condition.fmt_child(f, 2)?;
                f.write_str(" ? ")?;
                if_true.fmt_child(f, 2)?;
                f.write_str(" : ")?;
                if_false.fmt_child(f, 1)
            }
            Expr::Conditional { condition, if_true } => {
                condition.fmt_child(f, 2)?;
                f.write_str(" ? ")?;
                if_true.fmt_child(f, 2)
            }
            Expr::NullCoalesce { value, fallback } => {
                value.fmt_child(f, 2)?;
                f.write_str(" ?? ")?;
                fallback.fmt_child(f, 3)
            }
            Expr::Scope(statements) => {
                f.write_str("{")?;
                for statement in statements {
                    write!(f, "{};", statement)?;
                }
                f.write_str("}")
            }
            Expr::Return(value) => {
                f.write_str("return ")?;
                write!(f, "{}", value)
            }
            Expr::Break => f.write_str("break"),
            Expr::Continue => f.write_str("continue"),
        }
    }
}
