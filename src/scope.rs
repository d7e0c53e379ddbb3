use crate::{bindings::CaseFoldMap, value::Value};

/// The top-level name table an evaluation resolves identifiers against.
///
/// Holds the namespace objects (`variable`/`v`, `temp`/`t`, `query`/`q`,
/// `context`/`c`, `math`) plus any bare names a host adds. Lookups are
/// case-insensitive; a missing name reads as [`Value::Nil`].
///
/// The scope itself is read-only during evaluation. Scripts mutate state
/// only through the object bindings stored in it, so a cheap clone per
/// evaluation is enough to keep concurrent evaluations independent: the
/// clone shares the `Arc`'d objects but not the name table.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: CaseFoldMap<Value>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn get(&self, name: &str) -> Value {
        self.bindings.get(name).cloned().unwrap_or(Value::Nil)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.bindings.insert(name, value);
    }
}
