use std::error::Error as StdError;
use std::fmt::{self, Display};

use span::Span;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failure classes of the evaluator. The variant name doubles as the
/// KIND word in rendered diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
  UndefinedName,
  ArityMismatch,
  TypeMismatch,
  DivisionByZero,
  NotIterable,
  BadPropertyAccess,
  StackOverflow,
  LoopLimitExceeded,
  NotCallable,
  BadArgument,
  IOError,
}

impl ErrorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ErrorKind::UndefinedName => "UndefinedName",
      ErrorKind::ArityMismatch => "ArityMismatch",
      ErrorKind::TypeMismatch => "TypeMismatch",
      ErrorKind::DivisionByZero => "DivisionByZero",
      ErrorKind::NotIterable => "NotIterable",
      ErrorKind::BadPropertyAccess => "BadPropertyAccess",
      ErrorKind::StackOverflow => "StackOverflow",
      ErrorKind::LoopLimitExceeded => "LoopLimitExceeded",
      ErrorKind::NotCallable => "NotCallable",
      ErrorKind::BadArgument => "BadArgument",
      ErrorKind::IOError => "IOError",
    }
  }
}

impl Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// An error raised while evaluating. Propagates through the evaluator
/// via `?`; one that reaches the top level terminates the program with a
/// single diagnostic.
#[derive(Clone, Debug)]
pub struct RuntimeError {
  pub kind: ErrorKind,
  pub message: String,
  pub span: Span,
}

impl RuntimeError {
  pub fn new(kind: ErrorKind, message: impl Into<String>, span: impl Into<Span>) -> Self {
    Self {
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

impl Display for RuntimeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.kind, self.message)
  }
}

impl StdError for RuntimeError {}

/// Anything that can go wrong between a source string and a value.
#[derive(Debug)]
pub enum Error {
  Syntax(Vec<syntax::Error>),
  Runtime(RuntimeError),
}

impl Error {
  /// Render every contained diagnostic against `source`.
  pub fn report(&self, source: diag::Source<'_>, color: bool) -> String {
    match self {
      Error::Syntax(errors) => {
        let mut out = String::new();
        for error in errors {
          out.push_str(&error.report(source.clone(), color));
        }
        out
      }
      Error::Runtime(error) => error.report(source, color),
    }
  }
}

impl From<Vec<syntax::Error>> for Error {
  fn from(value: Vec<syntax::Error>) -> Self {
    Error::Syntax(value)
  }
}

impl From<RuntimeError> for Error {
  fn from(value: RuntimeError) -> Self {
    Error::Runtime(value)
  }
}

impl Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::Syntax(errors) => {
        for (i, error) in errors.iter().enumerate() {
          if i > 0 {
            writeln!(f)?;
          }
          write!(f, "{error}")?;
        }
        Ok(())
      }
      Error::Runtime(error) => write!(f, "{error}"),
    }
  }
}

impl StdError for Error {}
