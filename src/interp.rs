//! The tree-walking evaluator.
//!
//! [`Interp`] owns the global scope, the builtin table and the output
//! sink. Evaluation is direct-style recursion: statements produce a
//! [`Control`], expressions produce a [`Value`], and runtime failures
//! propagate as `Err` all the way to the caller of
//! [`Interp::eval_module`].

mod call;
mod expr;
mod field;

use std::rc::Rc;

use indexmap::IndexMap;
use span::Span;
use syntax::ast;

use crate::builtins;
use crate::error::{ErrorKind, RuntimeError};
use crate::scope::{Scope, ScopeRef};
use crate::value::{ClassValue, FuncValue, Method, Value};

pub(crate) type Result<T, E = RuntimeError> = std::result::Result<T, E>;

/// Calls nested deeper than this fail with `StackOverflow`.
pub const MAX_CALL_DEPTH: usize = 10_000;
/// A single loop spinning longer than this fails with
/// `LoopLimitExceeded`.
pub const MAX_LOOP_ITERATIONS: u64 = 10_000_000;

pub trait Stdout: std::io::Write + std::any::Any {
  fn as_any(&self) -> &dyn std::any::Any;
}
impl<T: std::io::Write + std::any::Any> Stdout for T {
  fn as_any(&self) -> &dyn std::any::Any {
    self
  }
}

/// The outcome of one statement: an ordinary value, or a control-flow
/// signal on its way to the construct that absorbs it. Loops absorb
/// `Break`/`Continue`, calls absorb `Return`; a compound passes anything
/// that is not `Value` straight through.
pub enum Control {
  Value(Value),
  Return(Value),
  Break,
  Continue,
}

impl Control {
  pub fn into_value(self) -> Value {
    match self {
      Control::Value(value) | Control::Return(value) => value,
      Control::Break | Control::Continue => Value::Null,
    }
  }
}

/// A host function. Receives the evaluated arguments and the call span
/// for diagnostics.
pub type NativeFn = fn(&mut Interp, &[Value], Span) -> Result<Value>;

pub struct Interp {
  globals: ScopeRef,
  builtins: IndexMap<&'static str, NativeFn>,
  stdout: Box<dyn Stdout>,
  depth: usize,
  // class owning the currently executing method, innermost last; what
  // `super` dispatches against
  method_stack: Vec<Rc<ClassValue>>,
}

impl Interp {
  pub fn new(stdout: Box<dyn Stdout>) -> Interp {
    Interp {
      globals: Scope::global(),
      builtins: builtins::register(),
      stdout,
      depth: 0,
      method_stack: vec![],
    }
  }

  pub fn globals(&self) -> ScopeRef {
    self.globals.clone()
  }

  pub fn io(&self) -> &dyn Stdout {
    &*self.stdout
  }

  pub fn print(&mut self, args: std::fmt::Arguments<'_>) -> std::io::Result<()> {
    self.stdout.write_fmt(args)
  }

  /// Evaluate a module in the persistent global scope and return the
  /// value of its last statement.
  pub fn eval_module(&mut self, module: &ast::Module) -> Result<Value> {
    let scope = self.globals();
    Ok(self.eval_block(&module.body, &scope)?.into_value())
  }

  /// Evaluate statements in order. The block's value is that of its last
  /// statement (or null when empty); any signal stops the walk and
  /// propagates.
  fn eval_block(&mut self, body: &[ast::Stmt], scope: &ScopeRef) -> Result<Control> {
    let mut value = Value::Null;
    for stmt in body {
      match self.eval_stmt(stmt, scope)? {
        Control::Value(v) => value = v,
        signal => return Ok(signal),
      }
    }
    Ok(Control::Value(value))
  }

  fn eval_stmt(&mut self, stmt: &ast::Stmt, scope: &ScopeRef) -> Result<Control> {
    match &**stmt {
      ast::StmtKind::Var(node) => {
        let value = self.eval_expr(&node.value, scope)?;
        let name = node.name.inner.clone();
        scope.borrow_mut().define_var(name, value);
        Ok(Control::Value(Value::Null))
      }
      ast::StmtKind::SetField(node) => {
        self.assign_field(node, stmt.span, scope)?;
        Ok(Control::Value(Value::Null))
      }
      ast::StmtKind::Func(def) => {
        let func = FuncValue {
          def: def.clone(),
          scope: scope.clone(),
          receiver: None,
          owner: None,
        };
        let name = def.name.inner.clone();
        scope
          .borrow_mut()
          .define_func(name, Value::Function(Rc::new(func)));
        Ok(Control::Value(Value::Null))
      }
      ast::StmtKind::Class(node) => {
        let mut methods = IndexMap::new();
        for member in &node.members {
          methods.insert(
            member.func.name.inner.clone(),
            Method {
              private: member.private,
              def: member.func.clone(),
            },
          );
        }
        let class = ClassValue {
          name: node.name.inner.clone(),
          parent: node.parent.clone(),
          methods,
          scope: scope.clone(),
        };
        let name = node.name.inner.clone();
        scope
          .borrow_mut()
          .define_var(name, Value::Class(Rc::new(class)));
        Ok(Control::Value(Value::Null))
      }
      ast::StmtKind::If(node) => {
        for branch in &node.branches {
          if self.eval_expr(&branch.cond, scope)?.truthy() {
            return self.eval_block(&branch.body, scope);
          }
        }
        match &node.default {
          Some(body) => self.eval_block(body, scope),
          None => Ok(Control::Value(Value::Null)),
        }
      }
      ast::StmtKind::While(node) => {
        let mut iterations: u64 = 0;
        loop {
          if !self.eval_expr(&node.cond, scope)?.truthy() {
            break;
          }
          iterations += 1;
          if iterations > MAX_LOOP_ITERATIONS {
            return Err(RuntimeError::new(
              ErrorKind::LoopLimitExceeded,
              format!("loop exceeded {MAX_LOOP_ITERATIONS} iterations"),
              stmt.span,
            ));
          }
          match self.eval_block(&node.body, scope)? {
            Control::Value(_) | Control::Continue => {}
            Control::Break => break,
            ret @ Control::Return(_) => return Ok(ret),
          }
        }
        Ok(Control::Value(Value::Null))
      }
      ast::StmtKind::ForIn(node) => self.eval_for_in(node, stmt.span, scope),
      ast::StmtKind::Ctrl(node) => match &**node {
        ast::Ctrl::Return(value) => {
          let value = match value {
            Some(expr) => self.eval_expr(expr, scope)?,
            None => Value::Null,
          };
          Ok(Control::Return(value))
        }
        ast::Ctrl::Break => Ok(Control::Break),
        ast::Ctrl::Continue => Ok(Control::Continue),
      },
      ast::StmtKind::Expr(expr) => Ok(Control::Value(self.eval_expr(expr, scope)?)),
      ast::StmtKind::Import(_) | ast::StmtKind::Noop => Ok(Control::Value(Value::Null)),
    }
  }

  fn eval_for_in(
    &mut self,
    node: &ast::ForIn,
    span: Span,
    scope: &ScopeRef,
  ) -> Result<Control> {
    let iterable = self.eval_expr(&node.iter, scope)?;
    // iterate over a snapshot so the body may freely mutate the source
    let items: Vec<Value> = match &iterable {
      Value::Array(items) => items.borrow().clone(),
      Value::Object(table) => table
        .borrow()
        .keys()
        .map(|key| Value::String(key.clone()))
        .collect(),
      other => {
        return Err(RuntimeError::new(
          ErrorKind::NotIterable,
          format!("{} is not iterable", other.type_name()),
          node.iter.span,
        ))
      }
    };

    let name = node.item.inner.clone();
    let mut iterations: u64 = 0;
    for item in items {
      iterations += 1;
      if iterations > MAX_LOOP_ITERATIONS {
        return Err(RuntimeError::new(
          ErrorKind::LoopLimitExceeded,
          format!("loop exceeded {MAX_LOOP_ITERATIONS} iterations"),
          span,
        ));
      }
      // there is no block scope; the iteration variable lives in the
      // enclosing scope
      scope.borrow_mut().define_var(name.clone(), item);
      match self.eval_block(&node.body, scope)? {
        Control::Value(_) | Control::Continue => {}
        Control::Break => break,
        ret @ Control::Return(_) => return Ok(ret),
      }
    }
    Ok(Control::Value(Value::Null))
  }
}
