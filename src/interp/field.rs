use super::call::find_method;
use super::*;
use crate::scope;

impl Interp {
  pub(crate) fn eval_field(
    &mut self,
    node: &ast::GetField,
    span: Span,
    scope: &ScopeRef,
  ) -> Result<Value> {
    if matches!(&*node.target, ast::ExprKind::GetSuper) {
      return self.super_field(&node.name, span, scope);
    }
    let target = self.eval_expr(&node.target, scope)?;
    self.get_field(&target, &node.name, span)
  }

  pub(crate) fn get_field(&mut self, target: &Value, name: &ast::Ident, span: Span) -> Result<Value> {
    match target {
      // missing object keys read as null
      Value::Object(table) => Ok(table.borrow().get(name.as_ref()).unwrap_or(Value::Null)),
      Value::Array(items) => {
        if name.as_ref() == "length" {
          return Ok(Value::Number(items.borrow().len() as f64));
        }
        if let Ok(index) = name.as_ref().parse::<usize>() {
          return Ok(items.borrow().get(index).cloned().unwrap_or(Value::Null));
        }
        Err(RuntimeError::new(
          ErrorKind::BadPropertyAccess,
          format!("arrays have `length` and numeric indices, not `{name}`"),
          name.span,
        ))
      }
      Value::Instance(instance) => {
        if let Some(value) = instance.props.borrow().get(name.as_ref()) {
          return Ok(value);
        }
        let chain = self.class_chain(&instance.class, span)?;
        let Some((owner, method)) = find_method(&chain, name.as_ref()) else {
          return Ok(Value::Null);
        };
        if method.private && !self.in_methods_of(&chain) {
          return Err(RuntimeError::new(
            ErrorKind::BadPropertyAccess,
            format!("`{name}` is private to class `{}`", owner.name),
            name.span,
          ));
        }
        let func = FuncValue {
          def: method.def.clone(),
          scope: owner.scope.clone(),
          receiver: Some(target.clone()),
          owner: Some(owner.clone()),
        };
        // a method without parameters is invoked by the access itself;
        // anything else becomes a bound function value
        if func.arity() == 0 {
          self.call_function(&func, vec![], span)
        } else {
          Ok(Value::Function(Rc::new(func)))
        }
      }
      Value::Error(e) => match name.as_ref() {
        "kind" => Ok(Value::string(e.kind.as_str())),
        "message" => Ok(Value::string(e.message.clone())),
        _ => Ok(Value::Null),
      },
      other => Err(RuntimeError::new(
        ErrorKind::BadPropertyAccess,
        format!("cannot access property `{name}` on {}", other.type_name()),
        span,
      )),
    }
  }

  /// `super.name` starts the method walk at the parent of the class
  /// that owns the currently executing method, keeping `this` bound to
  /// the original instance.
  fn super_field(&mut self, name: &ast::Ident, span: Span, scope: &ScopeRef) -> Result<Value> {
    let owner = self.method_stack.last().cloned().ok_or_else(|| {
      RuntimeError::new(
        ErrorKind::BadPropertyAccess,
        "`super` is only available inside a method",
        span,
      )
    })?;
    let this = scope::lookup_var(scope, "this").ok_or_else(|| {
      RuntimeError::new(
        ErrorKind::BadPropertyAccess,
        "`super` is only available inside a method",
        span,
      )
    })?;

    let parent_name = owner.parent.clone().ok_or_else(|| {
      RuntimeError::new(
        ErrorKind::BadPropertyAccess,
        format!("class `{}` has no parent", owner.name),
        span,
      )
    })?;
    let parent = match scope::lookup_var(&owner.scope, parent_name.as_ref()) {
      Some(Value::Class(parent)) => parent,
      _ => {
        return Err(RuntimeError::new(
          ErrorKind::UndefinedName,
          format!("parent class `{parent_name}` is not defined"),
          span,
        ))
      }
    };

    let chain = self.class_chain(&parent, span)?;
    let Some((owner, method)) = find_method(&chain, name.as_ref()) else {
      return Err(RuntimeError::new(
        ErrorKind::BadPropertyAccess,
        format!("no method `{name}` on `{}` or its parents", parent.name),
        name.span,
      ));
    };
    let func = FuncValue {
      def: method.def.clone(),
      scope: owner.scope.clone(),
      receiver: Some(this),
      owner: Some(owner.clone()),
    };
    if func.arity() == 0 {
      self.call_function(&func, vec![], span)
    } else {
      Ok(Value::Function(Rc::new(func)))
    }
  }

  /// Property assignment: `set target.field value`.
  pub(crate) fn assign_field(
    &mut self,
    node: &ast::SetField,
    span: Span,
    scope: &ScopeRef,
  ) -> Result<()> {
    let ast::ExprKind::GetField(access) = &*node.target else {
      return Err(RuntimeError::new(
        ErrorKind::BadPropertyAccess,
        "expected a property to assign to",
        node.target.span,
      ));
    };
    let object = self.eval_expr(&access.target, scope)?;
    let value = self.eval_expr(&node.value, scope)?;
    let name = &access.name;

    match &object {
      Value::Object(table) => {
        table.borrow_mut().insert(name.inner.clone(), value);
        Ok(())
      }
      Value::Instance(instance) => {
        instance
          .props
          .borrow_mut()
          .insert(name.inner.clone(), value);
        Ok(())
      }
      Value::Array(items) => {
        let Ok(index) = name.as_ref().parse::<usize>() else {
          return Err(RuntimeError::new(
            ErrorKind::BadPropertyAccess,
            format!("arrays are assigned through numeric indices, not `{name}`"),
            name.span,
          ));
        };
        let mut items = items.borrow_mut();
        if index >= items.len() {
          return Err(RuntimeError::new(
            ErrorKind::BadPropertyAccess,
            format!("index {index} is out of bounds (length {})", items.len()),
            name.span,
          ));
        }
        items[index] = value;
        Ok(())
      }
      other => Err(RuntimeError::new(
        ErrorKind::BadPropertyAccess,
        format!("cannot assign property `{name}` on {}", other.type_name()),
        span,
      )),
    }
  }

  /// Whether the innermost executing method belongs to one of the
  /// classes in `chain`; gates access to private members.
  fn in_methods_of(&self, chain: &[Rc<ClassValue>]) -> bool {
    match self.method_stack.last() {
      Some(current) => chain.iter().any(|class| Rc::ptr_eq(class, current)),
      None => false,
    }
  }
}
