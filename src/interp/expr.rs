use super::*;
use crate::value::Table;
use crate::{ops, scope};

impl Interp {
  pub(crate) fn eval_expr(&mut self, expr: &ast::Expr, scope: &ScopeRef) -> Result<Value> {
    match &**expr {
      ast::ExprKind::Literal(node) => self.eval_literal(node, scope),
      ast::ExprKind::Binary(node) => self.eval_binary(node, expr.span, scope),
      ast::ExprKind::Unary(node) => {
        let value = self.eval_expr(&node.right, scope)?;
        ops::unary(node.op, &value, expr.span)
      }
      ast::ExprKind::GetVar(node) => self.lookup_name(scope, &node.name),
      ast::ExprKind::Call(node) => self.eval_call(node, expr.span, scope),
      ast::ExprKind::GetField(node) => self.eval_field(node, expr.span, scope),
      ast::ExprKind::New(node) => self.eval_new(node, expr.span, scope),
      ast::ExprKind::GetSelf => scope::lookup_var(scope, "this").ok_or_else(|| {
        RuntimeError::new(
          ErrorKind::UndefinedName,
          "`this` is not bound here",
          expr.span,
        )
      }),
      ast::ExprKind::GetSuper => Err(RuntimeError::new(
        ErrorKind::BadPropertyAccess,
        "`super` must be followed by a property access",
        expr.span,
      )),
    }
  }

  /// Value-position name lookup: the variable table first, then the
  /// function table, each walking the full parent chain.
  pub(crate) fn lookup_name(&self, scope: &ScopeRef, name: &ast::Ident) -> Result<Value> {
    scope::lookup_var(scope, name.as_ref())
      .or_else(|| scope::lookup_func(scope, name.as_ref()))
      .ok_or_else(|| {
        RuntimeError::new(
          ErrorKind::UndefinedName,
          format!("`{name}` is not defined"),
          name.span,
        )
      })
  }

  fn eval_literal(&mut self, literal: &ast::Literal, scope: &ScopeRef) -> Result<Value> {
    match literal {
      ast::Literal::Null => Ok(Value::Null),
      ast::Literal::Undecidable => Ok(Value::Undecidable),
      ast::Literal::Bool(b) => Ok(Value::Bool(*b)),
      ast::Literal::Number(n) => Ok(Value::Number(*n)),
      ast::Literal::String(s) => Ok(Value::String(s.clone())),
      ast::Literal::Array(items) => {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
          values.push(self.eval_expr(item, scope)?);
        }
        Ok(Value::array(values))
      }
      ast::Literal::Object(entries) => {
        // entries evaluate in source order; a duplicate key replaces the
        // value but keeps the original position
        let mut table = Table::with_capacity(entries.len());
        for (key, expr) in entries {
          let value = self.eval_expr(expr, scope)?;
          table.insert(key.inner.clone(), value);
        }
        Ok(Value::object(table))
      }
    }
  }

  fn eval_binary(&mut self, node: &ast::Binary, span: Span, scope: &ScopeRef) -> Result<Value> {
    match node.op {
      // Short-circuiting, with Kleene behavior over whatever actually
      // gets evaluated: a decided left operand settles `&`/`|` the
      // two-valued way, an undecidable one defers to the right operand.
      ast::BinaryOp::And => {
        let left = self.eval_expr(&node.left, scope)?;
        if matches!(left, Value::Undecidable) {
          let right = self.eval_expr(&node.right, scope)?;
          if !right.truthy() && !matches!(right, Value::Undecidable) {
            return Ok(right);
          }
          return Ok(Value::Undecidable);
        }
        if !left.truthy() {
          return Ok(left);
        }
        self.eval_expr(&node.right, scope)
      }
      ast::BinaryOp::Or => {
        let left = self.eval_expr(&node.left, scope)?;
        if matches!(left, Value::Undecidable) {
          let right = self.eval_expr(&node.right, scope)?;
          if right.truthy() {
            return Ok(right);
          }
          return Ok(Value::Undecidable);
        }
        if left.truthy() {
          return Ok(left);
        }
        self.eval_expr(&node.right, scope)
      }
      op => {
        let left = self.eval_expr(&node.left, scope)?;
        let right = self.eval_expr(&node.right, scope)?;
        ops::binary(op, &left, &right, span)
      }
    }
  }
}
