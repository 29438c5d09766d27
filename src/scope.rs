//! Lexical environments.
//!
//! A scope holds two ordered tables, one for variables (which classes
//! also live in) and one for functions, plus a link to its parent.
//! Defining a name always writes to the scope itself; only lookups walk
//! the parent chain, so a `set` inside a function can never leak into an
//! outer scope. Lookup order depends on position: call sites consult the
//! function table first, value positions the variable table first.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::Value;

pub type ScopeRef = Rc<RefCell<Scope>>;

pub struct Scope {
  vars: IndexMap<Rc<str>, Value>,
  funcs: IndexMap<Rc<str>, Value>,
  parent: Option<ScopeRef>,
}

impl Scope {
  /// The root scope of an interpreter.
  pub fn global() -> ScopeRef {
    Rc::new(RefCell::new(Scope {
      vars: IndexMap::new(),
      funcs: IndexMap::new(),
      parent: None,
    }))
  }

  /// A fresh scope for one invocation, parented to the capture scope.
  /// The parent is shared, never copied.
  pub fn child_of(parent: &ScopeRef) -> ScopeRef {
    Rc::new(RefCell::new(Scope {
      vars: IndexMap::new(),
      funcs: IndexMap::new(),
      parent: Some(parent.clone()),
    }))
  }

  /// Add or replace a variable binding in this scope.
  pub fn define_var(&mut self, name: Rc<str>, value: Value) {
    self.vars.insert(name, value);
  }

  /// Add or replace a function binding in this scope.
  pub fn define_func(&mut self, name: Rc<str>, value: Value) {
    self.funcs.insert(name, value);
  }

  fn var(&self, name: &str) -> Option<Value> {
    self.vars.get(name).cloned()
  }

  fn func(&self, name: &str) -> Option<Value> {
    self.funcs.get(name).cloned()
  }
}

/// First variable binding for `name`, walking the parent chain.
pub fn lookup_var(scope: &ScopeRef, name: &str) -> Option<Value> {
  walk(scope, |s| s.var(name))
}

/// First function binding for `name`, walking the parent chain.
pub fn lookup_func(scope: &ScopeRef, name: &str) -> Option<Value> {
  walk(scope, |s| s.func(name))
}

fn walk(scope: &ScopeRef, mut get: impl FnMut(&Scope) -> Option<Value>) -> Option<Value> {
  let mut current = scope.clone();
  loop {
    let next = {
      let scope = current.borrow();
      if let Some(value) = get(&scope) {
        return Some(value);
      }
      scope.parent.clone()
    };
    match next {
      Some(parent) => current = parent,
      None => return None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn define_and_lookup() {
    let global = Scope::global();
    global.borrow_mut().define_var("x".into(), Value::Number(1.0));
    assert_eq!(lookup_var(&global, "x"), Some(Value::Number(1.0)));
    assert_eq!(lookup_var(&global, "y"), None);
  }

  #[test]
  fn redefining_replaces_in_place() {
    let global = Scope::global();
    global.borrow_mut().define_var("x".into(), Value::Number(1.0));
    global.borrow_mut().define_var("x".into(), Value::Number(2.0));
    assert_eq!(lookup_var(&global, "x"), Some(Value::Number(2.0)));
  }

  #[test]
  fn lookup_walks_parents() {
    let global = Scope::global();
    global.borrow_mut().define_var("x".into(), Value::Number(1.0));
    let call = Scope::child_of(&global);
    assert_eq!(lookup_var(&call, "x"), Some(Value::Number(1.0)));
  }

  #[test]
  fn child_definitions_do_not_leak_upward() {
    let global = Scope::global();
    global.borrow_mut().define_var("x".into(), Value::Number(1.0));
    let call = Scope::child_of(&global);
    call.borrow_mut().define_var("x".into(), Value::Number(2.0));
    assert_eq!(lookup_var(&call, "x"), Some(Value::Number(2.0)));
    assert_eq!(lookup_var(&global, "x"), Some(Value::Number(1.0)));
  }

  #[test]
  fn variables_and_functions_are_separate_tables() {
    let global = Scope::global();
    global.borrow_mut().define_var("f".into(), Value::Number(1.0));
    assert_eq!(lookup_func(&global, "f"), None);
    assert_eq!(lookup_var(&global, "f"), Some(Value::Number(1.0)));
  }
}
