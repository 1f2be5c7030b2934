//! Symbol tables chained along the lexical scope

use super::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared reference to an environment
pub type EnvRef = Rc<RefCell<Environment>>;

/// Environment holding variable bindings
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Variable bindings in this scope
    bindings: HashMap<String, Value>,
    /// Defining scope (global table, or a closure's captured scope)
    parent: Option<EnvRef>,
}

impl Environment {
    /// Create a new global environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new environment with a parent
    pub fn with_parent(parent: EnvRef) -> Self {
        Environment {
            bindings: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Wrap in Rc<RefCell<>>
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Bind a name in this scope, replacing any local binding
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up a variable in the scope chain
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            Some(value.clone())
        } else if let Some(parent) = &self.parent {
            parent.borrow().get(name)
        } else {
            None
        }
    }

    /// Check if a variable exists in the scope chain
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.borrow().contains(name))
    }
}

/// Create a child environment from a parent reference
pub fn child_env(parent: &EnvRef) -> EnvRef {
    Environment::with_parent(Rc::clone(parent)).into_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::int(n)
    }

    #[test]
    fn test_define_and_get() {
        let mut env = Environment::new();
        env.define("x", int(42));
        assert_eq!(env.get("x"), Some(int(42)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_scope_chain() {
        let parent = Environment::new().into_ref();
        parent.borrow_mut().define("x", int(1));

        let child = child_env(&parent);
        child.borrow_mut().define("y", int(2));

        // Child can see parent's bindings
        assert_eq!(child.borrow().get("x"), Some(int(1)));
        assert_eq!(child.borrow().get("y"), Some(int(2)));

        // Parent cannot see child's bindings
        assert_eq!(parent.borrow().get("y"), None);
    }

    #[test]
    fn test_define_shadows_parent() {
        let parent = Environment::new().into_ref();
        parent.borrow_mut().define("x", int(1));

        let child = child_env(&parent);
        child.borrow_mut().define("x", int(2));

        assert_eq!(child.borrow().get("x"), Some(int(2)));
        assert_eq!(parent.borrow().get("x"), Some(int(1)));
    }

    #[test]
    fn test_contains_parent_chain() {
        let parent = Environment::new().into_ref();
        parent.borrow_mut().define("x", int(1));

        let child = child_env(&parent);
        assert!(child.borrow().contains("x"));
        assert!(!child.borrow().contains("y"));
    }
}
