use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use syntax::ast;

use super::Table;
use crate::scope::ScopeRef;

/// A class: an ordered method table plus the name of its parent, which
/// is resolved against the defining scope no earlier than instantiation.
pub struct ClassValue {
  pub name: Rc<str>,
  pub parent: Option<ast::Ident>,
  pub methods: IndexMap<Rc<str>, Method>,
  pub scope: ScopeRef,
}

pub struct Method {
  pub private: bool,
  pub def: Rc<ast::Func>,
}

impl ClassValue {
  pub fn method(&self, name: &str) -> Option<&Method> {
    self.methods.get(name)
  }
}

/// An instance: a class reference plus its own properties.
pub struct InstanceValue {
  pub class: Rc<ClassValue>,
  pub props: RefCell<Table>,
}
