//! Syntax for ZEN: lexer, AST and parser.
//!
//! The pipeline is strict: [`lexer::Lexer`] turns a source buffer into a
//! token vector (synthesizing NEWLINE/INDENT/DEDENT), [`parser::parse`]
//! turns tokens into an [`ast::Module`], and nothing downstream mutates
//! either.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::Module;
pub use parser::parse;

use std::fmt;

use span::Span;

/// The failure classes of the front end.
///
/// The first five are produced by the lexer, the rest by the parser. The
/// variant name doubles as the KIND word in rendered diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
  UnterminatedString,
  BadEscape,
  BadNumber,
  UnknownChar,
  IndentMismatch,
  UnexpectedToken,
  MissingIndent,
  UnmatchedDelimiter,
  BadObjectLiteral,
}

impl ErrorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ErrorKind::UnterminatedString => "UnterminatedString",
      ErrorKind::BadEscape => "BadEscape",
      ErrorKind::BadNumber => "BadNumber",
      ErrorKind::UnknownChar => "UnknownChar",
      ErrorKind::IndentMismatch => "IndentMismatch",
      ErrorKind::UnexpectedToken => "UnexpectedToken",
      ErrorKind::MissingIndent => "MissingIndent",
      ErrorKind::UnmatchedDelimiter => "UnmatchedDelimiter",
      ErrorKind::BadObjectLiteral => "BadObjectLiteral",
    }
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A lexical or parse error, tied to a span of the offending source.
#[derive(Clone, Debug)]
pub struct Error {
  pub kind: ErrorKind,
  pub message: String,
  pub span: Span,
}

impl Error {
  pub fn new(kind: ErrorKind, message: impl Into<String>, span: impl Into<Span>) -> Error {
    Error {
      kind,
      message: message.into(),
      span: span.into(),
    }
  }

  /// Render this error against its source through `diag`.
  pub fn report(&self, source: diag::Source<'_>, color: bool) -> String {
    diag::Report::error()
      .source(source)
      .kind(self.kind.as_str())
      .message(self.message.as_str())
      .span(self.span)
      .color(color)
      .build()
      .emit_to_string()
      .unwrap_or_else(|_| format!("{}: {}", self.kind, self.message))
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.kind, self.message)
  }
}

impl std::error::Error for Error {}
