//! Error reporting.
//!
//! The entrypoint to this module is [Report][`crate::Report`].

use std::fmt::{self, Display, Write};

use beef::lean::Cow;
use owo_colors::OwoColorize;
use span::Span;
use thiserror::Error;

use crate::source::Source;

#[derive(Clone, Copy, Debug)]
pub enum Level {
  Info,
  Warning,
  Error,
}

impl Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Level::Info => write!(f, "info"),
      Level::Warning => write!(f, "warning"),
      Level::Error => write!(f, "error"),
    }
  }
}

/// A single diagnostic, rendered as
/// `PATH:LINE:COL: KIND: MESSAGE` plus a snippet of the offending line.
///
/// Built through the typestate builder returned by [`Report::error`] and
/// friends; `build()` is only available once source, kind, message and
/// span have all been supplied.
pub struct Report<'a> {
  pub level: Level,
  pub source: Source<'a>,
  pub kind: Cow<'a, str>,
  pub message: Cow<'a, str>,
  pub span: Span,
  pub color: bool,
}

#[derive(Clone)]
pub struct ReportBuilder<Src, Kind, Msg, Sp> {
  level: Level,
  source: Src,
  kind: Kind,
  message: Msg,
  span: Sp,
  color: bool,
}

impl<Kind, Msg, Sp> ReportBuilder<(), Kind, Msg, Sp> {
  pub fn source<'a>(self, source: impl Into<Source<'a>>) -> ReportBuilder<Source<'a>, Kind, Msg, Sp> {
    ReportBuilder {
      level: self.level,
      source: source.into(),
      kind: self.kind,
      message: self.message,
      span: self.span,
      color: self.color,
    }
  }
}

impl<Src, Msg, Sp> ReportBuilder<Src, (), Msg, Sp> {
  pub fn kind<'a>(self, kind: impl Into<Cow<'a, str>>) -> ReportBuilder<Src, Cow<'a, str>, Msg, Sp> {
    ReportBuilder {
      level: self.level,
      source: self.source,
      kind: kind.into(),
      message: self.message,
      span: self.span,
      color: self.color,
    }
  }
}

impl<Src, Kind, Sp> ReportBuilder<Src, Kind, (), Sp> {
  pub fn message<'a>(
    self,
    message: impl Into<Cow<'a, str>>,
  ) -> ReportBuilder<Src, Kind, Cow<'a, str>, Sp> {
    ReportBuilder {
      level: self.level,
      source: self.source,
      kind: self.kind,
      message: message.into(),
      span: self.span,
      color: self.color,
    }
  }
}

impl<Src, Kind, Msg> ReportBuilder<Src, Kind, Msg, ()> {
  pub fn span(self, span: impl Into<Span>) -> ReportBuilder<Src, Kind, Msg, Span> {
    ReportBuilder {
      level: self.level,
      source: self.source,
      kind: self.kind,
      message: self.message,
      span: span.into(),
      color: self.color,
    }
  }
}

impl<Src, Kind, Msg, Sp> ReportBuilder<Src, Kind, Msg, Sp> {
  pub fn color(mut self, enabled: bool) -> Self {
    self.color = enabled;
    self
  }
}

impl<'a> ReportBuilder<Source<'a>, Cow<'a, str>, Cow<'a, str>, Span> {
  pub fn build(self) -> Report<'a> {
    Report {
      level: self.level,
      source: self.source,
      kind: self.kind,
      message: self.message,
      span: self.span,
      color: self.color,
    }
  }
}

#[derive(Debug, Error)]
pub enum EmitError {
  #[error("span does not fit within the source")]
  OutOfBounds,
  #[error("failed to format")]
  Fmt(#[from] fmt::Error),
}

impl<'a> Report<'a> {
  fn builder(level: Level) -> ReportBuilder<(), (), (), ()> {
    ReportBuilder {
      level,
      source: (),
      kind: (),
      message: (),
      span: (),
      color: true,
    }
  }

  /// An `Info`-level report.
  pub fn info() -> ReportBuilder<(), (), (), ()> {
    Self::builder(Level::Info)
  }

  /// A `Warning`-level report.
  pub fn warn() -> ReportBuilder<(), (), (), ()> {
    Self::builder(Level::Warning)
  }

  /// An `Error`-level report.
  pub fn error() -> ReportBuilder<(), (), (), ()> {
    Self::builder(Level::Error)
  }

  /// Emit the report to `w`.
  pub fn emit<W: Write>(&self, w: &mut W) -> Result<(), EmitError> {
    if self.span.start > self.source.str().len() {
      return Err(EmitError::OutOfBounds);
    }

    let path = self.source.name().unwrap_or("<repl>");
    let (line, col) = self.source.position(self.span.start);

    // PATH:LINE:COL: KIND: MESSAGE
    if self.color {
      let kind = match self.level {
        Level::Info => format!("{}", self.kind.blue()),
        Level::Warning => format!("{}", self.kind.yellow()),
        Level::Error => format!("{}", self.kind.red()),
      };
      writeln!(w, "{path}:{line}:{col}: {kind}: {}", self.message)?;
    } else {
      writeln!(w, "{path}:{line}:{col}: {}: {}", self.kind, self.message)?;
    }

    // | <line>
    // |   ^^^
    let (text, line_start) = self.source.line_of(self.span);
    if text.is_empty() {
      return Ok(());
    }
    writeln!(w, " | {text}")?;

    let mark_start = self.span.start.saturating_sub(line_start).min(text.len());
    let mark_end = self.span.end.saturating_sub(line_start).min(text.len());
    let width = (mark_end.saturating_sub(mark_start)).max(1);
    let carets = "^".repeat(width);
    if self.color {
      writeln!(w, " | {:mark_start$}{}", "", carets.red())?;
    } else {
      writeln!(w, " | {:mark_start$}{carets}", "")?;
    }

    Ok(())
  }

  pub fn emit_to_string(&self) -> Result<String, EmitError> {
    let mut out = String::new();
    self.emit(&mut out)?;
    Ok(out)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn render_file_report() {
    let out = Report::error()
      .source(Source::file("fib.zen", "set x = 1\n"))
      .kind("UnexpectedToken")
      .message("unexpected `=`")
      .span(6..7)
      .color(false)
      .build()
      .emit_to_string()
      .unwrap();
    assert_eq!(
      out,
      "fib.zen:1:7: UnexpectedToken: unexpected `=`\n | set x = 1\n |       ^\n"
    );
  }

  #[test]
  fn render_repl_report() {
    let out = Report::error()
      .source("print undefined_thing")
      .kind("UndefinedName")
      .message("`undefined_thing` is not defined")
      .span(6..21)
      .color(false)
      .build()
      .emit_to_string()
      .unwrap();
    assert!(out.starts_with("<repl>:1:7: UndefinedName:"));
    assert!(out.contains("^^^^^^^^^^^^^^^"));
  }

  #[test]
  fn span_on_later_line() {
    let src = "set ok 1\nset bad 1 % 0\n";
    let out = Report::error()
      .source(Source::file("m.zen", src))
      .kind("DivisionByZero")
      .message("modulo by zero")
      .span(19..24)
      .color(false)
      .build()
      .emit_to_string()
      .unwrap();
    assert!(out.starts_with("m.zen:2:11: DivisionByZero: modulo by zero\n"));
  }

  #[test]
  fn out_of_bounds_span_is_rejected() {
    let report = Report::error()
      .source("x")
      .kind("UnknownChar")
      .message("nope")
      .span(5..6)
      .build();
    assert!(matches!(report.emit_to_string(), Err(EmitError::OutOfBounds)));
  }
}
