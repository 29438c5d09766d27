//! The operator runtime.
//!
//! Binary numeric operators coerce both sides to numbers; `+` doubles as
//! string concatenation when either operand is a string. Division follows
//! IEEE-754 (zero divisors give infinities or NaN); only the modulo of a
//! zero divisor is an error. The logical operators live in the evaluator
//! because they short-circuit; the three-valued tables live here.

use span::Span;
use syntax::ast::{BinaryOp, UnaryOp};

use crate::error::{ErrorKind, RuntimeError};
use crate::value::Value;

type Result<T, E = RuntimeError> = std::result::Result<T, E>;

/// Apply a non-logical binary operator. `And`/`Or` never reach this
/// point; the evaluator handles them to get short-circuiting right.
pub fn binary(op: BinaryOp, lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
  match op {
    BinaryOp::Add => add(lhs, rhs, span),
    BinaryOp::Sub => Ok(Value::Number(num(lhs, span)? - num(rhs, span)?)),
    BinaryOp::Mul => Ok(Value::Number(num(lhs, span)? * num(rhs, span)?)),
    BinaryOp::Div => Ok(Value::Number(num(lhs, span)? / num(rhs, span)?)),
    BinaryOp::Rem => rem(lhs, rhs, span),
    BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
    BinaryOp::Neq => Ok(Value::Bool(lhs != rhs)),
    BinaryOp::Less => compare(lhs, rhs, span, |o| o == std::cmp::Ordering::Less),
    BinaryOp::LessEq => compare(lhs, rhs, span, |o| o != std::cmp::Ordering::Greater),
    BinaryOp::More => compare(lhs, rhs, span, |o| o == std::cmp::Ordering::Greater),
    BinaryOp::MoreEq => compare(lhs, rhs, span, |o| o != std::cmp::Ordering::Less),
    BinaryOp::And | BinaryOp::Or => {
      unreachable!("logical operators are evaluated with short-circuiting")
    }
  }
}

pub fn unary(op: UnaryOp, value: &Value, span: Span) -> Result<Value> {
  match op {
    UnaryOp::Neg => Ok(Value::Number(-num(value, span)?)),
    UnaryOp::Not => match value {
      Value::Undecidable => Ok(Value::Undecidable),
      value => Ok(Value::Bool(!value.truthy())),
    },
  }
}

fn add(lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
  // `+` concatenates when either side is a string; the other side is
  // converted via its display form
  if matches!(lhs, Value::String(_)) || matches!(rhs, Value::String(_)) {
    return Ok(Value::string(format!("{lhs}{rhs}")));
  }
  Ok(Value::Number(num(lhs, span)? + num(rhs, span)?))
}

fn rem(lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
  let lhs = num(lhs, span)?;
  let rhs = num(rhs, span)?;
  if rhs == 0.0 {
    return Err(RuntimeError::new(
      ErrorKind::DivisionByZero,
      "modulo by zero",
      span,
    ));
  }
  Ok(Value::Number(lhs % rhs))
}

fn compare(
  lhs: &Value,
  rhs: &Value,
  span: Span,
  check: impl FnOnce(std::cmp::Ordering) -> bool,
) -> Result<Value> {
  // strings compare lexicographically; everything else numerically
  if let (Value::String(a), Value::String(b)) = (lhs, rhs) {
    return Ok(Value::Bool(check(a.cmp(b))));
  }
  let (a, b) = (num(lhs, span)?, num(rhs, span)?);
  match a.partial_cmp(&b) {
    Some(ordering) => Ok(Value::Bool(check(ordering))),
    None => Ok(Value::Bool(false)),
  }
}

fn num(value: &Value, span: Span) -> Result<f64> {
  value
    .to_number()
    .map_err(|message| RuntimeError::new(ErrorKind::TypeMismatch, message, span))
}

/// Project a value onto the three-element set: false = -1,
/// undecidable = 0, true = 1. Non-boolean operands go through
/// truthiness.
pub fn trilean(value: &Value) -> i8 {
  match value {
    Value::Undecidable => 0,
    value if value.truthy() => 1,
    _ => -1,
  }
}

pub fn from_trilean(t: i8) -> Value {
  match t {
    0 => Value::Undecidable,
    t if t > 0 => Value::Bool(true),
    _ => Value::Bool(false),
  }
}

/// Łukasiewicz conjunction: `a ⊗ b = min(a, b)`.
pub fn lukasiewicz_and(a: i8, b: i8) -> i8 {
  a.min(b)
}

/// Łukasiewicz disjunction: `a ⊕ b = max(a, b)`.
pub fn lukasiewicz_or(a: i8, b: i8) -> i8 {
  a.max(b)
}

/// Łukasiewicz implication: `a → b = max(1 − a, b)`, clamped to the
/// value set.
pub fn lukasiewicz_implies(a: i8, b: i8) -> i8 {
  (1 - a).max(b).clamp(-1, 1)
}

/// Kleene strong conjunction: false if either operand is false, true if
/// both are true, undecidable otherwise.
pub fn kleene_and(a: i8, b: i8) -> i8 {
  if a == -1 || b == -1 {
    -1
  } else if a == 1 && b == 1 {
    1
  } else {
    0
  }
}

/// Kleene strong disjunction: the dual of the conjunction.
pub fn kleene_or(a: i8, b: i8) -> i8 {
  if a == 1 || b == 1 {
    1
  } else if a == -1 && b == -1 {
    -1
  } else {
    0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn span() -> Span {
    Span::default()
  }

  #[test]
  fn numeric_operators() {
    let v = binary(BinaryOp::Add, &Value::Number(2.0), &Value::Number(3.0), span()).unwrap();
    assert_eq!(v, Value::Number(5.0));
    let v = binary(BinaryOp::Mul, &Value::Number(4.0), &Value::Number(2.5), span()).unwrap();
    assert_eq!(v, Value::Number(10.0));
  }

  #[test]
  fn add_coerces_booleans_and_null() {
    let v = binary(BinaryOp::Add, &Value::Bool(true), &Value::Null, span()).unwrap();
    assert_eq!(v, Value::Number(1.0));
  }

  #[test]
  fn string_concatenation() {
    let v = binary(
      BinaryOp::Add,
      &Value::string("n = "),
      &Value::Number(3.0),
      span(),
    )
    .unwrap();
    assert_eq!(v, Value::string("n = 3"));
  }

  #[test]
  fn division_by_zero_is_ieee() {
    let v = binary(BinaryOp::Div, &Value::Number(1.0), &Value::Number(0.0), span()).unwrap();
    assert_eq!(v, Value::Number(f64::INFINITY));
    let v = binary(BinaryOp::Div, &Value::Number(-1.0), &Value::Number(0.0), span()).unwrap();
    assert_eq!(v, Value::Number(f64::NEG_INFINITY));
    let v = binary(BinaryOp::Div, &Value::Number(0.0), &Value::Number(0.0), span()).unwrap();
    assert!(matches!(v, Value::Number(n) if n.is_nan()));
  }

  #[test]
  fn modulo_by_zero_is_an_error() {
    let err = binary(BinaryOp::Rem, &Value::Number(1.0), &Value::Number(0.0), span()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DivisionByZero);
  }

  #[test]
  fn string_comparison_is_lexicographic() {
    let v = binary(BinaryOp::Less, &Value::string("abc"), &Value::string("abd"), span()).unwrap();
    assert_eq!(v, Value::Bool(true));
  }

  #[test]
  fn comparing_incompatible_types_fails() {
    let err = binary(
      BinaryOp::Less,
      &Value::string("a"),
      &Value::Number(1.0),
      span(),
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
  }

  #[test]
  fn nan_is_not_equal_to_itself() {
    let nan = Value::Number(f64::NAN);
    let v = binary(BinaryOp::Eq, &nan, &nan, span()).unwrap();
    assert_eq!(v, Value::Bool(false));
  }

  #[test]
  fn deep_equality() {
    let a = Value::array(vec![Value::Number(1.0), Value::string("x")]);
    let b = Value::array(vec![Value::Number(1.0), Value::string("x")]);
    assert_eq!(binary(BinaryOp::Eq, &a, &b, span()).unwrap(), Value::Bool(true));
  }

  #[test]
  fn negation_and_not() {
    assert_eq!(
      unary(UnaryOp::Neg, &Value::Number(2.0), span()).unwrap(),
      Value::Number(-2.0)
    );
    assert_eq!(
      unary(UnaryOp::Not, &Value::Bool(false), span()).unwrap(),
      Value::Bool(true)
    );
    assert_eq!(
      unary(UnaryOp::Not, &Value::Undecidable, span()).unwrap(),
      Value::Undecidable
    );
  }

  const F: i8 = -1;
  const U: i8 = 0;
  const T: i8 = 1;
  const ALL: [i8; 3] = [F, U, T];

  #[test]
  fn lukasiewicz_tables() {
    for a in ALL {
      for b in ALL {
        assert_eq!(lukasiewicz_and(a, b), a.min(b));
        assert_eq!(lukasiewicz_or(a, b), a.max(b));
        assert_eq!(lukasiewicz_implies(a, b), (1 - a).max(b).clamp(-1, 1));
      }
    }
    // spot checks
    assert_eq!(lukasiewicz_and(U, T), U);
    assert_eq!(lukasiewicz_or(U, F), U);
    assert_eq!(lukasiewicz_implies(F, F), T);
  }

  #[test]
  fn kleene_tables() {
    assert_eq!(kleene_and(F, U), F);
    assert_eq!(kleene_and(U, T), U);
    assert_eq!(kleene_and(T, T), T);
    assert_eq!(kleene_and(U, U), U);
    assert_eq!(kleene_or(U, T), T);
    assert_eq!(kleene_or(U, F), U);
    assert_eq!(kleene_or(F, F), F);
    assert_eq!(kleene_or(U, U), U);
  }

  #[test]
  fn trilean_projection() {
    assert_eq!(trilean(&Value::Undecidable), U);
    assert_eq!(trilean(&Value::Bool(true)), T);
    assert_eq!(trilean(&Value::Bool(false)), F);
    assert_eq!(trilean(&Value::Number(7.0)), T);
    assert_eq!(trilean(&Value::Null), F);
    assert_eq!(from_trilean(U), Value::Undecidable);
    assert_eq!(from_trilean(T), Value::Bool(true));
    assert_eq!(from_trilean(F), Value::Bool(false));
  }
}
