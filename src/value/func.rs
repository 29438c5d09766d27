use std::rc::Rc;

use syntax::ast;

use super::{ClassValue, Value};
use crate::scope::ScopeRef;

/// A function value: a non-owning view of its defining AST (shared via
/// `Rc` with the tree) plus the scope captured at definition time, which
/// becomes the parent of every invocation's call scope.
///
/// Methods additionally carry the receiver they were bound to and the
/// class whose table they came from; the latter is what `super` dispatch
/// starts from.
pub struct FuncValue {
  pub def: Rc<ast::Func>,
  pub scope: ScopeRef,
  pub receiver: Option<Value>,
  pub owner: Option<Rc<ClassValue>>,
}

impl FuncValue {
  pub fn name(&self) -> &str {
    self.def.name.as_ref()
  }

  pub fn arity(&self) -> usize {
    self.def.params.len()
  }
}
