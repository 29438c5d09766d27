use std::rc::Rc;

use super::*;

impl<'src> Parser<'src> {
  pub(super) fn stmt(&mut self) -> Result<ast::Stmt> {
    match self.current().kind {
      Kw_Set => self.var_stmt(),
      Kw_Function => self.func_stmt(),
      Kw_Class => self.class_stmt(),
      Kw_If => self.if_stmt(),
      Kw_While => self.while_stmt(),
      Kw_For => self.for_stmt(),
      Kw_Return => self.return_stmt(),
      Kw_Break => self.break_stmt(),
      Kw_Continue => self.continue_stmt(),
      Kw_Import | Kw_Export => self.import_stmt(),
      _ => self.expr_stmt(),
    }
  }

  /// An indented block: NEWLINE INDENT stmt.. DEDENT.
  fn body(&mut self) -> Result<Vec<ast::Stmt>> {
    self.check_recursion_limit(self.current().span)?;
    self.expect(Tok_Newline)?;
    if !self.bump_if(Tok_Indent) {
      fail!(
        MissingIndent,
        self.current().span,
        "expected an indented block",
      );
    }

    let mut body = vec![];
    while !matches!(self.current().kind, Tok_Dedent | Tok_Eof) {
      if self.bump_if(Tok_Newline) {
        continue;
      }
      let stmt = self.stmt()?;
      let terminated = self.previous().is(Tok_Dedent) || self.at_stmt_end();
      body.push(stmt);
      if !terminated {
        fail!(
          UnexpectedToken,
          self.current().span,
          format!("unexpected `{}` after statement", self.current().kind.name()),
        );
      }
    }
    self.bump_if(Tok_Dedent);
    Ok(body)
  }

  /// `set NAME value`, or `set TARGET.field value` when the target is a
  /// dotted path (rooted at a name or at `this`).
  fn var_stmt(&mut self) -> Result<ast::Stmt> {
    self.expect(Kw_Set)?;
    let start = self.previous().span.start;

    if self.current().is(Kw_This) || (self.current().is(Lit_Ident) && self.peek(1).is(Op_Dot)) {
      let target = self.postfix_expr()?;
      if !matches!(&*target, ast::ExprKind::GetField(_)) {
        fail!(
          UnexpectedToken,
          target.span,
          "expected a property to assign to",
        );
      }
      let value = self.var_value()?;
      let end = self.previous().span.end;
      return Ok(ast::set_field_stmt(start..end, target, value));
    }

    let name = self.ident()?;
    let value = self.var_value()?;
    let end = self.previous().span.end;
    Ok(ast::var_stmt(start..end, name, value))
  }

  /// The initializer of `set NAME ...`, which is where the object and
  /// array shorthands live.
  ///
  /// Tie-break: `ID expr` followed by a comma commits to an object
  /// literal, as does an indented block right after the name. A bare
  /// comma after an ordinary first expression commits to an array
  /// literal. Everything else is a plain expression.
  fn var_value(&mut self) -> Result<ast::Expr> {
    if self.current().is(Tok_Newline) && self.peek(1).is(Tok_Indent) {
      return self.object_block();
    }

    if self.current().is(Lit_Ident) {
      if let Some(object) = self.try_object_literal()? {
        return Ok(object);
      }
    }

    let first = self.value_expr()?;
    if self.current().is(Tok_Comma) {
      let start = first.span.start;
      let mut items = vec![first];
      while self.bump_if(Tok_Comma) {
        if self.at_stmt_end() {
          break;
        }
        items.push(self.value_expr()?);
      }
      return Ok(ast::lit::array(start..self.previous().span.end, items));
    }
    Ok(first)
  }

  /// Attempt the single-line object literal form `k1 v1, k2 v2, ...`.
  /// Returns `None` (with the cursor rewound) unless a comma follows the
  /// first `ID expr` pair; once the comma is seen, the object
  /// interpretation is committed and pair errors are reported as
  /// BadObjectLiteral.
  fn try_object_literal(&mut self) -> Result<Option<ast::Expr>> {
    let save = self.pos;
    let start = self.current().span.start;

    let key = self.ident()?;
    if !Self::starts_atom(self.current().kind) {
      self.pos = save;
      return Ok(None);
    }
    let value = match self.value_expr() {
      Ok(value) => value,
      Err(_) => {
        self.pos = save;
        return Ok(None);
      }
    };
    if !self.current().is(Tok_Comma) {
      self.pos = save;
      return Ok(None);
    }

    let mut entries = vec![(key, value)];
    while self.bump_if(Tok_Comma) {
      if self.at_stmt_end() {
        break;
      }
      entries.push(self.object_pair()?);
    }
    Ok(Some(ast::lit::object(
      start..self.previous().span.end,
      entries,
    )))
  }

  /// The block object form:
  ///
  /// ```text
  /// set point
  ///     x 1,
  ///     y 2
  /// ```
  ///
  /// The trailing commas make the lexer treat the block as one logical
  /// line, so by the time it gets here it is a comma-separated pair list
  /// between INDENT and DEDENT.
  fn object_block(&mut self) -> Result<ast::Expr> {
    self.bump(); // newline
    self.bump(); // indent
    let start = self.current().span.start;

    let mut entries = vec![];
    loop {
      entries.push(self.object_pair()?);
      if self.bump_if(Tok_Comma) {
        if self.current().is(Tok_Newline) {
          break;
        }
        continue;
      }
      if self.current().is(Tok_Newline) && self.peek(1).is(Lit_Ident) {
        self.bump();
        continue;
      }
      break;
    }

    let end = self.previous().span.end;
    self.expect(Tok_Newline)?;
    if !self.bump_if(Tok_Dedent) {
      fail!(
        BadObjectLiteral,
        self.current().span,
        "unterminated object literal",
      );
    }
    Ok(ast::lit::object(start..end, entries))
  }

  fn func_stmt(&mut self) -> Result<ast::Stmt> {
    self.expect(Kw_Function)?;
    let start = self.previous().span.start;
    let func = self.func()?;
    let end = self.previous().span.end;
    Ok(ast::func_stmt(start..end, func))
  }

  /// `NAME PARAM...` up to the end of the line, then an indented body.
  fn func(&mut self) -> Result<ast::Func> {
    let name = self.ident()?;
    let params = self.params()?;
    let state = self.state.with_func();
    let body = self.with_state(state, Self::body)?;
    Ok(ast::Func { name, params, body })
  }

  fn params(&mut self) -> Result<Vec<ast::Ident>> {
    let mut params: Vec<ast::Ident> = vec![];
    while self.current().is(Lit_Ident) {
      let param = self.ident()?;
      if params.iter().any(|p| p.as_ref() == param.as_ref()) {
        fail!(
          UnexpectedToken,
          param.span,
          format!("duplicate parameter `{param}`"),
        );
      }
      params.push(param);
    }
    Ok(params)
  }

  fn class_stmt(&mut self) -> Result<ast::Stmt> {
    self.expect(Kw_Class)?;
    let start = self.previous().span.start;
    let name = self.ident()?;
    let parent = if self.bump_if(Kw_Extends) {
      Some(self.ident()?)
    } else {
      None
    };

    let mut members = vec![];
    // a class with no body is legal
    if self.current().is(Tok_Newline) && self.peek(1).is(Tok_Indent) {
      self.bump(); // newline
      self.bump(); // indent
      let state = State::with_class(parent.is_some());
      members = self.with_state(state, |this| {
        let mut members = vec![];
        while !matches!(this.current().kind, Tok_Dedent | Tok_Eof) {
          if this.bump_if(Tok_Newline) {
            continue;
          }
          members.push(this.class_member()?);
        }
        this.bump_if(Tok_Dedent);
        Ok(members)
      })?;
    }

    let end = self.previous().span.end;
    Ok(ast::class_stmt(start..end, name, parent, members))
  }

  /// `[private] (function | method) NAME PARAM...` plus a body. `method`
  /// is not reserved; it is recognized by lexeme inside class bodies
  /// only.
  fn class_member(&mut self) -> Result<ast::Member> {
    let private = self.bump_if(Kw_Private);

    let introducer = self.current();
    let is_member_fn = introducer.is(Kw_Function)
      || (introducer.is(Lit_Ident) && introducer.lexeme.as_ref() == "method");
    if !is_member_fn {
      fail!(
        UnexpectedToken,
        introducer.span,
        "expected `function` or `method` in class body",
      );
    }
    self.bump();

    let name = self.ident()?;
    let params = self.params()?;
    let state = self.state.with_method();
    let body = self.with_state(state, Self::body)?;
    Ok(ast::Member {
      private,
      func: Rc::new(ast::Func { name, params, body }),
    })
  }

  fn if_stmt(&mut self) -> Result<ast::Stmt> {
    self.expect(Kw_If)?;
    let start = self.previous().span.start;

    let mut branches = vec![self.if_branch()?];
    let mut default = None;

    while self.current().is(Kw_Elif) {
      self.bump();
      branches.push(self.if_branch()?);
    }
    if self.current().is(Kw_Else) {
      self.bump();
      if self.current().is(Tok_Newline) {
        default = Some(self.body()?);
      } else {
        // single-line `else stmt`
        default = Some(vec![self.stmt()?]);
      }
    }

    let end = self.previous().span.end;
    Ok(ast::if_stmt(start..end, branches, default))
  }

  /// One arm of an `if`/`elif` chain. `then` selects the single-line
  /// form.
  fn if_branch(&mut self) -> Result<ast::Branch> {
    let cond = self.value_expr()?;
    let body = if self.bump_if(Kw_Then) {
      vec![self.stmt()?]
    } else {
      self.body()?
    };
    Ok(ast::branch(cond, body))
  }

  fn while_stmt(&mut self) -> Result<ast::Stmt> {
    self.expect(Kw_While)?;
    let start = self.previous().span.start;
    let cond = self.value_expr()?;
    let state = self.state.with_loop();
    let body = self.with_state(state, Self::body)?;
    let end = self.previous().span.end;
    Ok(ast::while_stmt(start..end, cond, body))
  }

  fn for_stmt(&mut self) -> Result<ast::Stmt> {
    self.expect(Kw_For)?;
    let start = self.previous().span.start;
    let item = self.ident()?;
    self.expect(Kw_In)?;
    let iter = self.value_expr()?;
    let state = self.state.with_loop();
    let body = self.with_state(state, Self::body)?;
    let end = self.previous().span.end;
    Ok(ast::for_in_stmt(start..end, item, iter, body))
  }

  fn return_stmt(&mut self) -> Result<ast::Stmt> {
    if !self.state.current_func {
      fail!(
        UnexpectedToken,
        self.current().span,
        "return outside of function",
      );
    }

    self.expect(Kw_Return)?;
    let start = self.previous().span.start;
    let value = if self.at_stmt_end() {
      None
    } else {
      Some(self.value_expr()?)
    };
    let end = self.previous().span.end;
    Ok(ast::return_stmt(start..end, value))
  }

  fn break_stmt(&mut self) -> Result<ast::Stmt> {
    if !self.state.current_loop {
      fail!(UnexpectedToken, self.current().span, "break outside of loop");
    }
    self.expect(Kw_Break)?;
    Ok(ast::break_stmt(self.previous().span))
  }

  fn continue_stmt(&mut self) -> Result<ast::Stmt> {
    if !self.state.current_loop {
      fail!(
        UnexpectedToken,
        self.current().span,
        "continue outside of loop",
      );
    }
    self.expect(Kw_Continue)?;
    Ok(ast::continue_stmt(self.previous().span))
  }

  fn import_stmt(&mut self) -> Result<ast::Stmt> {
    let export = self.current().is(Kw_Export);
    self.bump();
    let start = self.previous().span.start;
    let name = self.ident()?;
    let end = self.previous().span.end;
    Ok(ast::import_stmt(start..end, export, name))
  }

  fn expr_stmt(&mut self) -> Result<ast::Stmt> {
    let expr = self.head_expr()?;
    Ok(ast::expr_stmt(expr))
  }
}
