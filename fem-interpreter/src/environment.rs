//! Variable environment for the Fem interpreter.
//!
//! A stack of scope frames. Frame 0 is the global frame and is never popped.
//! Reads search every frame from innermost to outermost; writes always go to
//! the innermost frame.

use crate::value::Value;
use std::collections::HashMap;

/// Variable environment with scope management
#[derive(Debug, Clone)]
pub struct Environment {
    /// Stack of variable scopes (most recent scope is last)
    scopes: Vec<Scope>,
}

/// A single scope containing variable bindings
#[derive(Debug, Clone)]
pub struct Scope {
    variables: HashMap<String, Value>,
    scope_type: ScopeType,
}

/// Why a scope frame exists, for debugging and the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeType {
    /// The global frame
    Global,
    /// Frame for one user function call
    Function { name: String },
    /// Frame for one for-loop iteration
    Loop { variable: String },
}

impl Scope {
    fn new(scope_type: ScopeType) -> Self {
        Self {
            variables: HashMap::new(),
            scope_type,
        }
    }

    pub fn scope_type(&self) -> &ScopeType {
        &self.scope_type
    }
}

impl Environment {
    /// Create an environment holding only the global frame
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeType::Global)],
        }
    }

    /// Push a new innermost frame
    pub fn push_scope(&mut self, scope_type: ScopeType) {
        self.scopes.push(Scope::new(scope_type));
    }

    /// Pop the innermost frame. The global frame is never popped.
    pub fn pop_scope(&mut self) -> Option<Scope> {
        if self.scopes.len() <= 1 {
            return None;
        }
        self.scopes.pop()
    }

    /// Get the current scope depth (0 = global scope)
    pub fn scope_depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn current_scope_type(&self) -> &ScopeType {
        // The global frame always exists
        &self.scopes[self.scopes.len() - 1].scope_type
    }

    /// Create or update a binding in the innermost frame
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        if let Some(current_scope) = self.scopes.last_mut() {
            current_scope.variables.insert(name.into(), value);
        }
    }

    /// Look a variable up, innermost frame first
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.variables.get(name))
    }

    /// Check if a variable exists in any scope
    pub fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names bound in the innermost frame, sorted
    pub fn current_scope_vars(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .scopes
            .last()
            .map(|scope| scope.variables.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Every visible binding (inner frames shadow outer ones), sorted by name
    pub fn all_vars(&self) -> Vec<(String, Value)> {
        let mut visible: HashMap<&str, &Value> = HashMap::new();
        for scope in &self.scopes {
            for (name, value) in &scope.variables {
                visible.insert(name, value);
            }
        }
        let mut vars: Vec<(String, Value)> = visible
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }

    /// Drop every binding and every frame except an empty global frame
    pub fn clear_user_vars(&mut self) {
        self.scopes.clear();
        self.scopes.push(Scope::new(ScopeType::Global));
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_frames_shadow_and_unwind() {
        let mut env = Environment::new();
        env.define("x", Value::Integer(1));

        env.push_scope(ScopeType::Function {
            name: "f".to_string(),
        });
        assert_eq!(env.get("x"), Some(&Value::Integer(1)));

        env.define("x", Value::Integer(2));
        assert_eq!(env.get("x"), Some(&Value::Integer(2)));
        assert_eq!(env.scope_depth(), 1);

        env.pop_scope();
        assert_eq!(env.get("x"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_global_frame_is_never_popped() {
        let mut env = Environment::new();
        assert!(env.pop_scope().is_none());
        assert_eq!(env.current_scope_type(), &ScopeType::Global);
        env.define("y", Value::Null);
        assert!(env.exists("y"));
    }

    #[test]
    fn test_all_vars_reports_visible_bindings() {
        let mut env = Environment::new();
        env.define("b", Value::Integer(1));
        env.define("a", Value::Integer(1));
        env.push_scope(ScopeType::Loop {
            variable: "a".to_string(),
        });
        env.define("a", Value::Integer(2));

        let vars = env.all_vars();
        assert_eq!(
            vars,
            vec![
                ("a".to_string(), Value::Integer(2)),
                ("b".to_string(), Value::Integer(1)),
            ]
        );
        assert_eq!(env.current_scope_vars(), vec!["a".to_string()]);

        env.clear_user_vars();
        assert!(env.all_vars().is_empty());
        assert_eq!(env.scope_depth(), 0);
    }
}
