//! Per-kind method tables.
//!
//! Infix operators and `.method(...)` calls both resolve here, keyed by the
//! receiver's [`ValueKind`] and the method name.

use rustc_hash::FxHashMap;

use crate::{Value, ValueKind};

/// One name-to-callable table per value kind.
#[derive(Clone, Default)]
pub struct MethodRegistry {
    tables: [FxHashMap<String, Value>; ValueKind::COUNT],
}

impl MethodRegistry {
    pub fn new() -> Self {
        MethodRegistry::default()
    }

    /// Add or replace `kind.name`.
    pub fn register(&mut self, kind: ValueKind, name: impl Into<String>, callable: Value) {
        self.tables[kind.index()].insert(name.into(), callable);
    }

    /// The callable registered for `kind.name`, cloned out of the table.
    pub fn lookup(&self, kind: ValueKind, name: &str) -> Option<Value> {
        self.tables[kind.index()].get(name).cloned()
    }

    #[cfg(test)]
    pub fn contains(&self, kind: ValueKind, name: &str) -> bool {
        self.tables[kind.index()].contains_key(name)
    }

    /// Registered method names for `kind`, sorted.
    #[cfg(test)]
    pub fn method_names(&self, kind: ValueKind) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables[kind.index()]
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EvalResult, Interpreter};
    use pretty_assertions::assert_eq;

    fn noop(_: &mut Interpreter, _: Option<&Value>, _: &[Value]) -> EvalResult {
        Ok(Value::Null)
    }

    #[test]
    fn tables_are_per_kind() {
        let mut registry = MethodRegistry::new();
        registry.register(ValueKind::Number, "plus", Value::native("plus", noop));

        assert!(registry.contains(ValueKind::Number, "plus"));
        assert!(!registry.contains(ValueKind::String, "plus"));
        assert_eq!(registry.lookup(ValueKind::String, "plus"), None);
    }

    #[test]
    fn register_overrides() {
        let mut registry = MethodRegistry::new();
        registry.register(ValueKind::Null, "describe", Value::string("first"));
        registry.register(ValueKind::Null, "describe", Value::string("second"));
        assert_eq!(
            registry.lookup(ValueKind::Null, "describe"),
            Some(Value::string("second"))
        );
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = MethodRegistry::new();
        for name in ["or", "and", "equals"] {
            registry.register(ValueKind::Boolean, name, Value::Null);
        }
        assert_eq!(
            registry.method_names(ValueKind::Boolean),
            vec!["and", "equals", "or"]
        );
    }
}
