//! Source locations for the ZEN interpreter.
//!
//! A [`Span`] is a half-open byte region of the source buffer; a
//! [`Spanned<T>`] pairs a piece of syntax with the region it was read
//! from. Diagnostics turn spans back into line and column numbers at
//! render time, so nothing else in the pipeline tracks positions.

use std::fmt;
use std::ops::{Deref, Range};

/// A half-open `[start, end)` byte region.
///
/// Functionally a `Range<usize>`, kept as its own `Copy` type so tokens
/// and nodes can carry it by value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
  pub start: usize,
  pub end: usize,
}

impl Span {
  pub fn new(start: usize, end: usize) -> Span {
    Span { start, end }
  }
}

impl From<Range<usize>> for Span {
  fn from(range: Range<usize>) -> Span {
    Span::new(range.start, range.end)
  }
}

impl fmt::Display for Span {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}", self.start, self.end)
  }
}

/// A piece of syntax together with its span.
///
/// The payload is reachable through `Deref` for the common read path and
/// as the public `inner` field where it has to be moved or cloned out.
/// Equality includes the span: two otherwise identical nodes read from
/// different positions are different nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
  pub span: Span,
  pub inner: T,
}

impl<T> Spanned<T> {
  pub fn new(span: impl Into<Span>, inner: T) -> Spanned<T> {
    Spanned {
      span: span.into(),
      inner,
    }
  }
}

impl<T> Deref for Spanned<T> {
  type Target = T;

  fn deref(&self) -> &T {
    &self.inner
  }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.inner.fmt(f)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn span_from_range() {
    let span = Span::from(4..9);
    assert_eq!((span.start, span.end), (4, 9));
    assert_eq!(span, Span::new(4, 9));
  }

  #[test]
  fn spanned_derefs_to_its_payload() {
    let word = Spanned::new(0..5, "hello".to_string());
    assert_eq!(word.len(), 5);
    assert_eq!(word.inner, "hello");
  }

  #[test]
  fn equality_includes_the_span() {
    assert_eq!(Spanned::new(2..3, 'x'), Spanned::new(2..3, 'x'));
    assert_ne!(Spanned::new(2..3, 'x'), Spanned::new(4..5, 'x'));
  }
}
