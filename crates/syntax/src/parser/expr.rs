use super::*;
use crate::lexer::unescape;

impl<'src> Parser<'src> {
  /// Expression in value position (`set` initializers, parenthesized
  /// groups, array items, object values): an identifier head may open a
  /// space-separated call.
  pub(super) fn value_expr(&mut self) -> Result<ast::Expr> {
    let left = if self.current().is(Lit_Ident) && Self::starts_atom(self.peek(1).kind) {
      self.space_call()?
    } else {
      self.unary_expr()?
    };
    self.binary_expr(left, 0)
  }

  /// Expression at the head of an expression statement. On top of the
  /// value-position rules, a bare identifier followed by the end of the
  /// statement becomes a zero-argument call, so `f` on a line of its own
  /// invokes `f` (and falls back to a variable read when `f` is not
  /// callable).
  pub(super) fn head_expr(&mut self) -> Result<ast::Expr> {
    if self.current().is(Lit_Ident) {
      let next = self.peek(1).kind;
      if Self::starts_atom(next) {
        let call = self.space_call()?;
        return self.binary_expr(call, 0);
      }
      if matches!(next, Tok_Newline | Tok_Dedent | Tok_Eof | Kw_Else) {
        let name = self.ident()?;
        return Ok(ast::expr_call(name.span, name, vec![]));
      }
    }
    self.value_expr()
  }

  /// Expression in argument position: no space-calls, no binary
  /// operators. A binary operator after an argument list therefore
  /// terminates the list and binds the whole call as its left operand.
  fn arg_expr(&mut self) -> Result<ast::Expr> {
    self.postfix_expr()
  }

  /// `name arg1 arg2 ...`. Arguments are collected while a token that
  /// can begin an atom is ahead; anything else ends the call.
  fn space_call(&mut self) -> Result<ast::Expr> {
    let name = self.ident()?;
    let mut args = vec![self.arg_expr()?];
    while Self::starts_atom(self.current().kind) {
      args.push(self.arg_expr()?);
    }
    let span = name.span.start..self.previous().span.end;
    Ok(ast::expr_call(span, name, args))
  }

  /// Precedence climbing over the binary operator table. `left` is the
  /// already-parsed leftmost operand; all operators are left-associative.
  fn binary_expr(&mut self, mut left: ast::Expr, min_prec: u8) -> Result<ast::Expr> {
    while let Some((op, prec)) = binary_op(self.current().kind) {
      if prec < min_prec {
        break;
      }
      self.bump();
      let mut right = self.unary_expr()?;
      while let Some((_, next_prec)) = binary_op(self.current().kind) {
        if next_prec > prec {
          right = self.binary_expr(right, next_prec)?;
        } else {
          break;
        }
      }
      left = ast::expr_binary(left.span.start..right.span.end, op, left, right);
    }
    Ok(left)
  }

  fn unary_expr(&mut self) -> Result<ast::Expr> {
    let op = match self.current().kind {
      Op_Minus => ast::UnaryOp::Neg,
      Op_Bang => ast::UnaryOp::Not,
      _ => return self.postfix_expr(),
    };
    self.bump();
    let start = self.previous().span.start;
    let right = self.unary_expr()?;
    Ok(ast::expr_unary(start..right.span.end, op, right))
  }

  pub(super) fn postfix_expr(&mut self) -> Result<ast::Expr> {
    let mut expr = self.primary_expr()?;
    while self.current().is(Op_Dot) {
      self.bump();
      // array elements are addressed as `.0`, `.1`, ... so a number is
      // a valid property name here
      let name = if self.current().is(Lit_Number) {
        let token = self.bump();
        ast::Ident::new(token.span, token.lexeme.as_ref().into())
      } else {
        self.ident()?
      };
      expr = ast::expr_get_field(expr.span.start..name.span.end, expr, name);
    }
    Ok(expr)
  }

  fn primary_expr(&mut self) -> Result<ast::Expr> {
    self.check_recursion_limit(self.current().span)?;

    if self.bump_if(Lit_Null) {
      return Ok(ast::lit::null(self.previous().span));
    }

    if self.bump_if(Lit_Undecidable) {
      return Ok(ast::lit::undecidable(self.previous().span));
    }

    if self.bump_if(Lit_Bool) {
      let token = self.previous();
      return Ok(ast::lit::bool(token.span, token.lexeme.as_ref() == "true"));
    }

    if self.bump_if(Lit_Number) {
      let token = self.previous();
      let value = token
        .lexeme
        .parse::<f64>()
        .map_err(|_| Error::new(ErrorKind::BadNumber, "invalid number literal", token.span))?;
      return Ok(ast::lit::number(token.span, value));
    }

    if self.bump_if(Lit_String) {
      let token = self.previous();
      let value = unescape(token.lexeme.as_ref());
      return Ok(ast::lit::string(token.span, value.into()));
    }

    if self.bump_if(Brk_SquareL) {
      let start = self.previous().span.start;
      let mut items = vec![];
      if !self.current().is(Brk_SquareR) {
        items.push(self.value_expr()?);
        while self.bump_if(Tok_Comma) && !self.current().is(Brk_SquareR) {
          items.push(self.value_expr()?);
        }
      }
      self.expect_close(Brk_SquareR)?;
      return Ok(ast::lit::array(start..self.previous().span.end, items));
    }

    if self.bump_if(Brk_CurlyL) {
      let start = self.previous().span.start;
      let mut entries = vec![];
      if !self.current().is(Brk_CurlyR) {
        entries.push(self.object_pair()?);
        while self.bump_if(Tok_Comma) && !self.current().is(Brk_CurlyR) {
          entries.push(self.object_pair()?);
        }
      }
      self.expect_close(Brk_CurlyR)?;
      return Ok(ast::lit::object(start..self.previous().span.end, entries));
    }

    if self.bump_if(Brk_ParenL) {
      let expr = self.value_expr()?;
      self.expect_close(Brk_ParenR)?;
      return Ok(expr);
    }

    if self.bump_if(Kw_New) {
      let start = self.previous().span.start;
      let class = self.ident()?;
      let mut args = vec![];
      while Self::starts_atom(self.current().kind) {
        args.push(self.arg_expr()?);
      }
      return Ok(ast::expr_new(start..self.previous().span.end, class, args));
    }

    if self.bump_if(Kw_This) {
      if !self.state.current_method {
        fail!(
          UnexpectedToken,
          self.previous().span,
          "cannot access `this` outside of a class method",
        );
      }
      return Ok(ast::Expr::new(self.previous().span, ast::ExprKind::GetSelf));
    }

    if self.bump_if(Kw_Super) {
      match self.state.current_class {
        Some(c) if self.state.current_method => {
          if !c.has_parent {
            fail!(
              UnexpectedToken,
              self.previous().span,
              "cannot access `super` in a class with no parent class",
            );
          }
        }
        _ => {
          fail!(
            UnexpectedToken,
            self.previous().span,
            "cannot access `super` outside of a class method",
          );
        }
      }
      return Ok(ast::Expr::new(self.previous().span, ast::ExprKind::GetSuper));
    }

    if self.current().is(Lit_Ident) {
      return Ok(ast::expr_get_var(self.ident()?));
    }

    Err(Error::new(
      ErrorKind::UnexpectedToken,
      format!("unexpected `{}`", self.current().kind.name()),
      self.current().span,
    ))
  }

  /// A `key value` entry of an object literal.
  pub(super) fn object_pair(&mut self) -> Result<(ast::Ident, ast::Expr)> {
    if !self.current().is(Lit_Ident) {
      fail!(
        BadObjectLiteral,
        self.current().span,
        format!(
          "expected a `key value` pair, found `{}`",
          self.current().kind.name()
        ),
      );
    }
    let key = self.ident()?;
    let value = self.value_expr().map_err(|e| {
      Error::new(
        ErrorKind::BadObjectLiteral,
        format!("invalid value for key `{key}`"),
        e.span,
      )
    })?;
    Ok((key, value))
  }
}

fn binary_op(kind: TokenKind) -> Option<(ast::BinaryOp, u8)> {
  use ast::BinaryOp::*;
  let entry = match kind {
    Op_Or => (Or, 1),
    Op_And => (And, 2),
    Op_Equal => (Eq, 3),
    Op_BangEqual => (Neq, 3),
    Op_Less => (Less, 4),
    Op_LessEqual => (LessEq, 4),
    Op_More => (More, 4),
    Op_MoreEqual => (MoreEq, 4),
    Op_Plus => (Add, 5),
    Op_Minus => (Sub, 5),
    Op_Star => (Mul, 6),
    Op_Slash => (Div, 6),
    Op_Percent => (Rem, 6),
    _ => return None,
  };
  Some(entry)
}
