use std::borrow::Cow;

use span::Span;

/// A named (or anonymous) source buffer.
///
/// Knows how to turn a byte offset back into 1-based line and column
/// numbers, and how to extract the line a span starts on.
#[derive(Clone, Debug)]
pub struct Source<'a> {
  name: Option<Cow<'a, str>>,
  str: Cow<'a, str>,
}

impl<'a> Source<'a> {
  pub fn string(str: impl Into<Cow<'a, str>>) -> Self {
    Source {
      name: None,
      str: str.into(),
    }
  }

  pub fn file(name: impl Into<Cow<'a, str>>, str: impl Into<Cow<'a, str>>) -> Self {
    Source {
      name: Some(name.into()),
      str: str.into(),
    }
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn str(&self) -> &str {
    self.str.as_ref()
  }

  /// 1-based (line, column) of `offset`. Columns count bytes, clamped to
  /// the buffer length.
  pub fn position(&self, offset: usize) -> (usize, usize) {
    let offset = offset.min(self.str.len());
    let before = &self.str[..offset];
    let line = before.matches('\n').count() + 1;
    let col = offset - before.rfind('\n').map(|i| i + 1).unwrap_or(0) + 1;
    (line, col)
  }

  /// The full line containing `span.start`, without its terminator, plus
  /// the offset of that line's first byte.
  pub fn line_of(&self, span: Span) -> (&str, usize) {
    let start = span.start.min(self.str.len());
    let line_start = self.str[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = self.str[line_start..]
      .find('\n')
      .map(|i| i + line_start)
      .unwrap_or(self.str.len());
    (self.str[line_start..line_end].trim_end_matches('\r'), line_start)
  }
}

impl<'a> From<&'a str> for Source<'a> {
  fn from(value: &'a str) -> Self {
    Source::string(value)
  }
}

impl<'a> From<String> for Source<'a> {
  fn from(value: String) -> Self {
    Source::string(value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn position_of_offsets() {
    let src = Source::string("set x 1\nset y 2\n");
    assert_eq!(src.position(0), (1, 1));
    assert_eq!(src.position(4), (1, 5));
    assert_eq!(src.position(8), (2, 1));
    assert_eq!(src.position(12), (2, 5));
  }

  #[test]
  fn position_clamps_to_eof() {
    let src = Source::string("x");
    assert_eq!(src.position(100), (1, 2));
  }

  #[test]
  fn line_extraction() {
    let src = Source::string("first\nsecond\nthird");
    let (line, start) = src.line_of(Span::new(8, 9));
    assert_eq!(line, "second");
    assert_eq!(start, 6);
  }
}
