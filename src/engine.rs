use crate::{
    ast::Expr,
    bindings::{BindingError, MutableBinding},
    compiled::{CompileError, CompiledFunction, ReturnKind},
    evaluator::Evaluator,
    math::math_binding,
    parser::{ParseError, parse},
    scope::Scope,
    value::Value,
};
use rand::{SeedableRng, rngs::StdRng};
use std::sync::{Arc, Mutex};

type ParseErrorHandler = Box<dyn Fn(&ParseError) + Send + Sync>;

/// The embedding entry point: owns the standard scope, the random source
/// and the host's bindings, and evaluates scripts against them.
///
/// The standard scope wires up the namespaces with their short aliases:
/// `variable`/`v` (host-visible state that persists across evaluations),
/// `query`/`q` and `context`/`c` (host-supplied data and functions) and
/// the read-only `math` table. `temp`/`t` is not part of the engine scope;
/// every evaluation gets a fresh one.
///
/// `eval` never fails. Parse errors are routed to the optional handler
/// and the evaluation yields zero, which keeps per-frame callers free of
/// error plumbing; hosts that want diagnostics up front use
/// [`Engine::parse`] or [`Engine::prepare`].
pub struct Engine {
    scope: Scope,
    variables: Arc<MutableBinding>,
    query: Arc<MutableBinding>,
    context: Arc<MutableBinding>,
    parse_error_handler: Option<ParseErrorHandler>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Engine::with_rng(StdRng::from_entropy())
    }

    /// An engine whose `math.random` family replays deterministically.
    pub fn with_seed(seed: u64) -> Self {
        Engine::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let rng = Arc::new(Mutex::new(rng));
        let variables = Arc::new(MutableBinding::new());
        let query = Arc::new(MutableBinding::new());
        let context = Arc::new(MutableBinding::new());

        let mut scope = Scope::new();
        scope.set("variable", Value::Object(variables.clone()));
        scope.set("v", Value::Object(variables.clone()));
        scope.set("query", Value::Object(query.clone()));
        scope.set("q", Value::Object(query.clone()));
        scope.set("context", Value::Object(context.clone()));
        scope.set("c", Value::Object(context.clone()));
        scope.set("math", Value::object(math_binding(rng)));

        Engine {
            scope,
            variables,
            query,
            context,
            parse_error_handler: None,
        }
    }

    /// Called with every parse error swallowed by [`Engine::eval`].
    pub fn set_parse_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ParseError) + Send + Sync + 'static,
    {
        self.parse_error_handler = Some(Box::new(handler));
    }

    /// Parses a script without evaluating it.
    pub fn parse(source: &str) -> Result<Vec<Expr>, ParseError> {
        parse(source)
    }

    /// Evaluates a script to a number. Unparseable scripts yield zero.
    pub fn eval(&self, source: &str) -> f64 {
        self.eval_value(source).as_number()
    }

    /// Evaluates a script to its raw value. Unparseable scripts yield zero.
    pub fn eval_value(&self, source: &str) -> Value {
        match parse(source) {
            Ok(statements) => self.eval_parsed(&statements),
            Err(error) => {
                if let Some(handler) = &self.parse_error_handler {
                    handler(&error);
                }
                Value::Number(0.0)
            }
        }
    }

    /// Evaluates an already parsed script.
    pub fn eval_parsed(&self, statements: &[Expr]) -> Value {
        let scope = self.local_scope();
        eval_in_scope(&scope, statements)
    }

    /// Evaluates with extra bare names visible to the script, on top of
    /// the standard scope.
    pub fn eval_with_bindings(&self, source: &str, bindings: &[(&str, Value)]) -> Value {
        let statements = match parse(source) {
            Ok(statements) => statements,
            Err(error) => {
                if let Some(handler) = &self.parse_error_handler {
                    handler(&error);
                }
                return Value::Number(0.0);
            }
        };
        let mut scope = self.local_scope();
        for (name, value) in bindings {
            scope.set(name, value.clone());
        }
        eval_in_scope(&scope, &statements)
    }

    /// Parses once, evaluates many times.
    pub fn prepare(&self, source: &str) -> Result<PreparedFunction<'_>, ParseError> {
        Ok(PreparedFunction {
            engine: self,
            statements: parse(source)?,
        })
    }

    /// Specializes a script against a positional parameter list. See
    /// [`CompiledFunction`].
    pub fn compile(
        &self,
        source: &str,
        parameters: &[&str],
        return_kind: ReturnKind,
    ) -> Result<CompiledFunction, CompileError> {
        CompiledFunction::new(self.scope.clone(), source, parameters, return_kind)
    }

    /// Registers a `variable.` property. Scripts can overwrite it.
    pub fn bind_variable(&self, name: &str, value: Value) -> Result<(), BindingError> {
        self.variables.define(name, value)
    }

    /// Registers a `query.` property, usually a function value built with
    /// [`crate::bindings::function`].
    pub fn bind_query(&self, name: &str, value: Value) -> Result<(), BindingError> {
        self.query.define(name, value)
    }

    /// Registers a `context.` property.
    pub fn bind_context(&self, name: &str, value: Value) -> Result<(), BindingError> {
        self.context.define(name, value)
    }

    fn local_scope(&self) -> Scope {
        let mut scope = self.scope.clone();
        let temp = Value::object(MutableBinding::new());
        scope.set("temp", temp.clone());
        scope.set("t", temp);
        scope
    }
}

fn eval_in_scope(scope: &Scope, statements: &[Expr]) -> Value {
    let mut evaluator = Evaluator::new(scope);
    let mut last = Value::Number(0.0);
    for statement in statements {
        last = evaluator.eval(statement);
        if let Some(value) = evaluator.take_return() {
            return value;
        }
    }
    last
}

/// A parsed script bound to its engine, for hot paths that re-evaluate
/// the same source every frame.
pub struct PreparedFunction<'a> {
    engine: &'a Engine,
    statements: Vec<Expr>,
}

impl PreparedFunction<'_> {
    pub fn evaluate(&self) -> Value {
        self.engine.eval_parsed(&self.statements)
    }

    pub fn evaluate_number(&self) -> f64 {
        self.evaluate().as_number()
    }

    pub fn statements(&self) -> &[Expr] {
        &self.statements
    }
}
