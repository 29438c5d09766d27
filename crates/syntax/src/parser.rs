#![deny(unused_must_use)]

use span::Span;

use super::ast;
use super::lexer::TokenKind::*;
use super::lexer::{Lexer, Token, TokenKind};
use super::{Error, ErrorKind};

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

/// Parse a source buffer into a module.
///
/// All lexical and parse errors are collected; the parser synchronizes at
/// statement boundaries after an error, so a single run reports every
/// broken statement. A module that produced any error is never returned.
pub fn parse(src: &str) -> Result<ast::Module, Vec<Error>> {
  let lexer = Lexer::lex(src)?;
  Parser::new(lexer).module()
}

macro_rules! fail {
  ($kind:ident, $span:expr, $msg:expr $(,)?) => {
    return Err(Error::new(ErrorKind::$kind, $msg, $span))
  };
}

/// Grammar context carried while descending into nested constructs.
/// Controls which of `return`/`break`/`continue`/`this`/`super` are legal
/// at the current position.
#[derive(Clone, Copy, Default)]
struct State {
  current_func: bool,
  current_loop: bool,
  current_class: Option<ClassCtx>,
  current_method: bool,
}

#[derive(Clone, Copy)]
struct ClassCtx {
  has_parent: bool,
}

impl State {
  fn with_loop(self) -> Self {
    Self {
      current_loop: true,
      ..self
    }
  }

  fn with_func(self) -> Self {
    Self {
      current_func: true,
      current_loop: false,
      current_method: false,
      ..self
    }
  }

  fn with_class(has_parent: bool) -> Self {
    Self {
      current_func: false,
      current_loop: false,
      current_class: Some(ClassCtx { has_parent }),
      current_method: false,
    }
  }

  fn with_method(self) -> Self {
    Self {
      current_func: true,
      current_loop: false,
      current_method: true,
      ..self
    }
  }
}

struct Parser<'src> {
  lex: Lexer<'src>,
  pos: usize,
  errors: Vec<Error>,
  state: State,
}

impl<'src> Parser<'src> {
  fn new(lex: Lexer<'src>) -> Self {
    Self {
      lex,
      pos: 0,
      errors: Vec::new(),
      state: State::default(),
    }
  }

  fn module(mut self) -> Result<ast::Module, Vec<Error>> {
    let mut module = ast::Module::new();

    while !self.current().is(Tok_Eof) {
      if self.bump_if(Tok_Newline) || self.bump_if(Tok_Dedent) {
        continue;
      }
      if self.current().is(Tok_Indent) {
        self.errors.push(Error::new(
          ErrorKind::UnexpectedToken,
          "unexpected indentation",
          self.current().span,
        ));
        self.sync();
        continue;
      }
      match self.stmt() {
        Ok(stmt) => {
          let terminated = self.previous().is(Tok_Dedent) || self.at_stmt_end();
          module.body.push(stmt);
          if !terminated {
            self.errors.push(Error::new(
              ErrorKind::UnexpectedToken,
              format!("unexpected `{}` after statement", self.current().kind.name()),
              self.current().span,
            ));
            self.sync();
          }
        }
        Err(e) => {
          self.errors.push(e);
          self.sync();
        }
      }
    }

    if self.errors.is_empty() {
      Ok(module)
    } else {
      Err(self.errors)
    }
  }

  #[inline]
  fn current(&self) -> &Token<'src> {
    self.lex.get(self.pos)
  }

  #[inline]
  fn previous(&self) -> &Token<'src> {
    self.lex.get(self.pos.wrapping_sub(1))
  }

  #[inline]
  fn peek(&self, n: usize) -> &Token<'src> {
    self.lex.get(self.pos + n)
  }

  /// Move forward by one token, returning the one that was current.
  #[inline]
  fn bump(&mut self) -> &Token<'src> {
    if self.pos < self.lex.tokens().len() {
      self.pos += 1;
    }
    self.previous()
  }

  #[inline]
  fn bump_if(&mut self, kind: TokenKind) -> bool {
    if self.current().is(kind) {
      self.bump();
      true
    } else {
      false
    }
  }

  #[inline]
  fn expect(&mut self, kind: TokenKind) -> Result<()> {
    if self.bump_if(kind) {
      Ok(())
    } else {
      Err(Error::new(
        ErrorKind::UnexpectedToken,
        format!("expected `{}`", kind.name()),
        self.current().span,
      ))
    }
  }

  /// Like `expect`, but for the closing half of a delimiter pair.
  #[inline]
  fn expect_close(&mut self, kind: TokenKind) -> Result<()> {
    if self.bump_if(kind) {
      Ok(())
    } else {
      Err(Error::new(
        ErrorKind::UnmatchedDelimiter,
        format!("expected closing `{}`", kind.name()),
        self.current().span,
      ))
    }
  }

  /// True when the current token terminates a statement.
  #[inline]
  fn at_stmt_end(&self) -> bool {
    matches!(
      self.current().kind,
      Tok_Newline | Tok_Dedent | Tok_Eof | Kw_Else
    )
  }

  /// Calls `f` in the context of `state`, restoring the previous context
  /// afterwards.
  #[inline]
  fn with_state<T>(
    &mut self,
    state: State,
    f: impl FnOnce(&mut Self) -> Result<T>,
  ) -> Result<T> {
    let saved = self.state;
    self.state = state;
    let res = f(self);
    self.state = saved;
    res
  }

  /// Skip to the next statement boundary: the end of the broken line,
  /// plus any block that belonged to the broken statement.
  fn sync(&mut self) {
    while !matches!(self.current().kind, Tok_Newline | Tok_Eof) {
      self.bump();
    }
    self.bump_if(Tok_Newline);
    if self.current().is(Tok_Indent) {
      let mut depth = 0usize;
      loop {
        match self.current().kind {
          Tok_Indent => depth += 1,
          Tok_Dedent => {
            depth -= 1;
            if depth == 0 {
              self.bump();
              break;
            }
          }
          Tok_Eof => break,
          _ => {}
        }
        self.bump();
      }
    }
  }
}

mod common;
mod expr;
mod stmt;

impl<'src> Parser<'src> {
  // Every level of block or expression nesting costs one recursive call
  // of at most a few hundred bytes, so refusing to descend with less
  // than 96KiB of stack left keeps a few hundred further levels (and
  // whatever runs after the parser) safe from a hard overflow.
  const STACK_HEADROOM: usize = 96 * 1024;

  #[cfg(any(target_family = "wasm", not(feature = "check-recursion-limit")))]
  fn check_recursion_limit(&self, _span: Span) -> Result<()> {
    Ok(())
  }

  #[cfg(all(not(target_family = "wasm"), feature = "check-recursion-limit"))]
  fn check_recursion_limit(&self, span: Span) -> Result<()> {
    match stacker::remaining_stack() {
      Some(left) if left <= Self::STACK_HEADROOM => Err(Error::new(
        ErrorKind::UnexpectedToken,
        "too much nesting",
        span,
      )),
      _ => Ok(()),
    }
  }
}

#[cfg(test)]
mod tests;
