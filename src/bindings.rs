use crate::{ast::Expr, evaluator::Evaluator, value::Value};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Registration failure for host-facing binding setup.
///
/// Only setup can fail; script evaluation itself never raises binding
/// errors, missing names just read as [`Value::Nil`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindingError {
    /// The name is already taken under case folding, e.g. registering
    /// `Health` over an existing `health`.
    #[error("a binding named '{0}' is already registered")]
    Duplicate(String),
}

/// A map with case-insensitive string keys.
///
/// Keys are folded to lowercase once on insertion and lookup; iteration
/// yields the folded form. Plain composition over [`HashMap`], not a map
/// subtype, so the folding cannot be bypassed through an inherited method.
#[derive(Debug, Clone, Default)]
pub struct CaseFoldMap<V> {
    entries: HashMap<String, V>,
}

impl<V> CaseFoldMap<V> {
    pub fn new() -> Self {
        CaseFoldMap {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        self.entries.insert(key.to_lowercase(), value)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(&key.to_lowercase())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An object value: a named collection of properties.
///
/// This is the seam between scripts and the host. Namespaces like
/// `variable` and `query` are object bindings, and so is anything a host
/// hands to scripts for the arrow operator to target. Property names
/// arrive already case-folded from the parser; implementations folding
/// again is harmless.
///
/// Implementations must be `Send + Sync`: one binding may be read by many
/// concurrent evaluations.
pub trait ObjectBinding: Send + Sync {
    /// Reads a property. Unknown names yield [`Value::Nil`].
    fn get(&self, name: &str) -> Value;

    /// Writes a property, returning whether the write was accepted.
    /// Read-only bindings keep the default.
    fn set(&self, _name: &str, _value: Value) -> bool {
        false
    }

    /// Lists the properties, for hosts that serialize objects back out.
    /// Lazy bindings may return an empty list.
    fn entries(&self) -> Vec<(String, Value)> {
        Vec::new()
    }
}

/// A property bag with interior mutability.
///
/// Backs `variable` and `temp`, host context objects, and the `math`
/// namespace (which is blocked after construction). Writes go through a
/// [`RwLock`], so a binding shared across evaluations is safe, if
/// last-write-wins, under concurrency.
#[derive(Default)]
pub struct MutableBinding {
    entries: RwLock<CaseFoldMap<Value>>,
    blocked: AtomicBool,
}

impl MutableBinding {
    pub fn new() -> Self {
        MutableBinding::default()
    }

    /// Registers a property, rejecting names already taken under case
    /// folding. For host setup; scripts write through [`ObjectBinding::set`].
    pub fn define(&self, name: &str, value: Value) -> Result<(), BindingError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.contains_key(name) {
            return Err(BindingError::Duplicate(name.to_lowercase()));
        }
        entries.insert(name, value);
        Ok(())
    }

    /// Makes the binding read-only from here on.
    pub fn block(&self) {
        self.blocked.store(true, Ordering::Release);
    }
}

impl ObjectBinding for MutableBinding {
    fn get(&self, name: &str) -> Value {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(name).cloned().unwrap_or(Value::Nil)
    }

    fn set(&self, name: &str, value: Value) -> bool {
        if self.blocked.load(Ordering::Acquire) {
            return false;
        }
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(name, value);
        true
    }

    fn entries(&self) -> Vec<(String, Value)> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

/// A function value callable from scripts.
///
/// Arguments arrive *unevaluated*: the callee decides whether and how
/// often to evaluate each one through the passed evaluator. That is what
/// lets `loop` run its body expression many times and lets `q.`-style
/// query functions read the current object.
pub trait NativeFunction: Send + Sync {
    fn call(&self, ctx: &mut Evaluator<'_>, arguments: &[Expr]) -> Value;
}

struct LazyFn<F>(F);

impl<F> NativeFunction for LazyFn<F>
where
    F: Fn(&mut Evaluator<'_>, &[Expr]) -> Value + Send + Sync,
{
    fn call(&self, ctx: &mut Evaluator<'_>, arguments: &[Expr]) -> Value {
        (self.0)(ctx, arguments)
    }
}

struct EagerFn<F>(F);

impl<F> NativeFunction for EagerFn<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn call(&self, ctx: &mut Evaluator<'_>, arguments: &[Expr]) -> Value {
        let args: Vec<f64> = arguments.iter().map(|arg| ctx.eval_number(arg)).collect();
        Value::number((self.0)(&args))
    }
}

/// Wraps a lazy-argument closure as a function value.
pub fn function<F>(f: F) -> Value
where
    F: Fn(&mut Evaluator<'_>, &[Expr]) -> Value + Send + Sync + 'static,
{
    Value::Function(std::sync::Arc::new(LazyFn(f)))
}

/// Wraps a numeric closure as a function value. Arguments are evaluated
/// eagerly and coerced to doubles; missing arguments read as zero through
/// the slice helpers on the callee side.
pub fn numeric_function<F>(f: F) -> Value
where
    F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
{
    Value::Function(std::sync::Arc::new(EagerFn(f)))
}
