use super::*;
use crate::scope;
use crate::value::{InstanceValue, Table};

impl Interp {
  /// Dispatch a named call. Resolution order: builtin, then function
  /// binding, then whatever a variable binding holds: a class value
  /// constructs, a function value calls, and any other value is returned
  /// as-is for a zero-argument call (the variable-reference fallback).
  pub(crate) fn eval_call(
    &mut self,
    call: &ast::Call,
    span: Span,
    scope: &ScopeRef,
  ) -> Result<Value> {
    let name = call.name.as_ref();

    if let Some(native) = self.builtins.get(name).copied() {
      let args = self.eval_args(&call.args, scope)?;
      return native(self, &args, span);
    }

    if let Some(Value::Function(func)) = scope::lookup_func(scope, name) {
      let args = self.eval_args(&call.args, scope)?;
      return self.call_function(&func, args, span);
    }

    if let Some(value) = scope::lookup_var(scope, name) {
      return match value {
        Value::Class(class) => {
          let args = self.eval_args(&call.args, scope)?;
          self.instantiate(&class, args, span)
        }
        Value::Function(func) => {
          let args = self.eval_args(&call.args, scope)?;
          self.call_function(&func, args, span)
        }
        value if call.args.is_empty() => Ok(value),
        value => Err(RuntimeError::new(
          ErrorKind::NotCallable,
          format!("`{name}` is a {}, not a function", value.type_name()),
          span,
        )),
      };
    }

    Err(RuntimeError::new(
      ErrorKind::UndefinedName,
      format!("`{name}` is not defined"),
      call.name.span,
    ))
  }

  /// Arguments evaluate left to right in the caller's scope, before the
  /// call frame exists.
  pub(crate) fn eval_args(&mut self, args: &[ast::Expr], scope: &ScopeRef) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
      values.push(self.eval_expr(arg, scope)?);
    }
    Ok(values)
  }

  /// Invoke a function value: fresh scope parented to the capture scope,
  /// `this` and parameters bound, body evaluated, `Return` unwrapped.
  pub(crate) fn call_function(
    &mut self,
    func: &FuncValue,
    args: Vec<Value>,
    span: Span,
  ) -> Result<Value> {
    if args.len() != func.arity() {
      return Err(RuntimeError::new(
        ErrorKind::ArityMismatch,
        format!(
          "`{}` expects {} arguments, got {}",
          func.name(),
          func.arity(),
          args.len()
        ),
        span,
      ));
    }
    if self.depth >= MAX_CALL_DEPTH {
      return Err(RuntimeError::new(
        ErrorKind::StackOverflow,
        format!("call depth exceeded {MAX_CALL_DEPTH}"),
        span,
      ));
    }

    let call_scope = Scope::child_of(&func.scope);
    {
      let mut s = call_scope.borrow_mut();
      if let Some(receiver) = &func.receiver {
        s.define_var("this".into(), receiver.clone());
      }
      for (param, arg) in func.def.params.iter().zip(args) {
        s.define_var(param.inner.clone(), arg);
      }
    }

    self.depth += 1;
    let is_method = func.owner.is_some();
    if let Some(owner) = &func.owner {
      self.method_stack.push(owner.clone());
    }
    let result = self.eval_block(&func.def.body, &call_scope);
    if is_method {
      self.method_stack.pop();
    }
    self.depth -= 1;

    Ok(result?.into_value())
  }

  /// `new ClassName args...`
  pub(crate) fn eval_new(&mut self, node: &ast::New, span: Span, scope: &ScopeRef) -> Result<Value> {
    let class = match self.lookup_name(scope, &node.class)? {
      Value::Class(class) => class,
      other => {
        return Err(RuntimeError::new(
          ErrorKind::NotCallable,
          format!("`{}` is a {}, not a class", node.class, other.type_name()),
          node.class.span,
        ))
      }
    };
    let args = self.eval_args(&node.args, scope)?;
    self.instantiate(&class, args, span)
  }

  pub(crate) fn instantiate(
    &mut self,
    class: &Rc<ClassValue>,
    args: Vec<Value>,
    span: Span,
  ) -> Result<Value> {
    let chain = self.class_chain(class, span)?;

    let instance = Value::Instance(Rc::new(InstanceValue {
      class: class.clone(),
      props: std::cell::RefCell::new(Table::new()),
    }));

    match find_method(&chain, "constructor") {
      Some((owner, method)) => {
        let ctor = FuncValue {
          def: method.def.clone(),
          scope: owner.scope.clone(),
          receiver: Some(instance.clone()),
          owner: Some(owner.clone()),
        };
        self.call_function(&ctor, args, span)?;
      }
      None if !args.is_empty() => {
        return Err(RuntimeError::new(
          ErrorKind::ArityMismatch,
          format!(
            "class `{}` has no constructor, but {} arguments were given",
            class.name,
            args.len()
          ),
          span,
        ));
      }
      None => {}
    }

    Ok(instance)
  }

  /// Resolve the inheritance chain, most-derived first. Parent names are
  /// looked up in each class's defining scope, which is what makes
  /// resolution lazy: the parent only has to exist by the time the class
  /// is instantiated.
  pub(crate) fn class_chain(
    &self,
    class: &Rc<ClassValue>,
    span: Span,
  ) -> Result<Vec<Rc<ClassValue>>> {
    let mut chain = vec![class.clone()];
    let mut current = class.clone();
    while let Some(parent_name) = current.parent.clone() {
      let parent = match scope::lookup_var(&current.scope, parent_name.as_ref()) {
        Some(Value::Class(parent)) => parent,
        Some(other) => {
          return Err(RuntimeError::new(
            ErrorKind::TypeMismatch,
            format!(
              "parent `{parent_name}` of class `{}` is a {}, not a class",
              current.name,
              other.type_name()
            ),
            span,
          ))
        }
        None => {
          return Err(RuntimeError::new(
            ErrorKind::UndefinedName,
            format!("parent class `{parent_name}` is not defined"),
            span,
          ))
        }
      };
      if chain.iter().any(|c| Rc::ptr_eq(c, &parent)) {
        return Err(RuntimeError::new(
          ErrorKind::BadArgument,
          format!("inheritance cycle through class `{}`", parent.name),
          span,
        ));
      }
      chain.push(parent.clone());
      current = parent;
    }
    Ok(chain)
  }
}

/// First class in the chain that defines `name`, together with the
/// method.
pub(crate) fn find_method<'c>(
  chain: &'c [Rc<ClassValue>],
  name: &str,
) -> Option<(&'c Rc<ClassValue>, &'c Method)> {
  for class in chain {
    if let Some(method) = class.method(name) {
      return Some((class, method));
    }
  }
  None
}
