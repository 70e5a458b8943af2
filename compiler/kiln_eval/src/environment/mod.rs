//! Lexical environments.
//!
//! An [`Environment`] is a handle to one scope in a parent-linked chain.
//! Handles are cheap to clone and every clone sees the same bindings, which
//! is what lets a closure keep mutating a variable of a scope whose
//! defining block has already finished.
//!
//! Scopes are reference counted, not traced. A closure stored in the scope
//! it captured (`let f = () => ...` at any level) forms a cycle
//! `scope -> closure -> scope`, so that scope and everything reachable from
//! it stay allocated until the process exits. Hosts that run many programs
//! should give each run its own global environment rather than reuse one
//! indefinitely.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use thiserror::Error;

use crate::{Runtime, Value};

/// Error returned by assignment when no scope in the chain defines the name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("no binding with this name is in scope")]
    Undefined,
}

/// A single-threaded shared cell for scopes.
///
/// Same layout as `Rc<RefCell<T>>`; the wrapper keeps scope allocation in
/// one place.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Bindings of one scope plus a link to the enclosing one.
#[derive(Default)]
pub struct Scope {
    bindings: FxHashMap<String, Value>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Bind in this scope only, overwriting any existing binding here.
    pub fn define(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Look a name up in this scope and then each ancestor.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        let mut next = self.parent.clone();
        while let Some(scope) = next {
            let scope = scope.borrow();
            if let Some(value) = scope.bindings.get(name) {
                return Some(value.clone());
            }
            next = scope.parent.clone();
        }
        None
    }

    /// Overwrite the nearest existing binding of `name`.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        let mut next = self.parent.clone();
        while let Some(scope) = next {
            let mut scope = scope.borrow_mut();
            if let Some(slot) = scope.bindings.get_mut(name) {
                *slot = value;
                return Ok(());
            }
            next = scope.parent.clone();
        }
        Err(AssignError::Undefined)
    }
}

/// Handle to a scope plus the runtime it belongs to.
#[derive(Clone)]
pub struct Environment {
    scope: LocalScope<Scope>,
    runtime: Rc<Runtime>,
}

impl Environment {
    /// A root environment with no bindings.
    pub fn new(runtime: Rc<Runtime>) -> Self {
        Environment {
            scope: LocalScope::new(Scope::new()),
            runtime,
        }
    }

    /// A new empty scope whose parent is this one.
    #[must_use]
    pub fn child(&self) -> Self {
        Environment {
            scope: LocalScope::new(Scope::with_parent(self.scope.clone())),
            runtime: Rc::clone(&self.runtime),
        }
    }

    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.scope.borrow_mut().define(name.into(), value);
    }

    pub fn assign(&self, name: &str, value: Value) -> Result<(), AssignError> {
        self.scope.borrow_mut().assign(name, value)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.scope.borrow().lookup(name)
    }

    /// Whether `name` is bound in this scope itself, ignoring ancestors.
    #[cfg(test)]
    pub fn defines_locally(&self, name: &str) -> bool {
        self.scope.borrow().contains(name)
    }

    #[inline]
    pub fn runtime(&self) -> &Rc<Runtime> {
        &self.runtime
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.borrow();
        let mut names: Vec<&str> = scope.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("has_parent", &scope.parent.is_some())
            .finish()
    }
}
