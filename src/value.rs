//! The ZEN runtime value model.
//!
//! Primitives are by-value; strings, arrays, objects, functions, classes
//! and instances are reference counted (`Rc` clone/drop is the ref/unref
//! pair). Values never reference the AST except through [`FuncValue`],
//! which shares its defining subtree via `Rc`, so value lifetimes are
//! independent of any particular parse.

pub mod class;
pub mod func;
pub mod table;

use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

pub use class::{ClassValue, InstanceValue, Method};
pub use func::FuncValue;
pub use table::Table;

use crate::error::ErrorKind;

#[derive(Clone)]
pub enum Value {
  Null,
  Undecidable,
  Bool(bool),
  Number(f64),
  String(Rc<str>),
  Array(Rc<RefCell<Vec<Value>>>),
  Object(Rc<RefCell<Table>>),
  Function(Rc<FuncValue>),
  Class(Rc<ClassValue>),
  Instance(Rc<InstanceValue>),
  Error(Rc<ErrorValue>),
}

/// A failure reified as a value. Produced by host functions for
/// recoverable conditions (e.g. a JSON parse failure); always falsy.
pub struct ErrorValue {
  pub kind: ErrorKind,
  pub message: String,
}

impl Value {
  pub fn string(s: impl Into<Rc<str>>) -> Value {
    Value::String(s.into())
  }

  pub fn array(items: Vec<Value>) -> Value {
    Value::Array(Rc::new(RefCell::new(items)))
  }

  pub fn object(table: Table) -> Value {
    Value::Object(Rc::new(RefCell::new(table)))
  }

  pub fn error(kind: ErrorKind, message: impl Into<String>) -> Value {
    Value::Error(Rc::new(ErrorValue {
      kind,
      message: message.into(),
    }))
  }

  pub fn type_name(&self) -> &'static str {
    match self {
      Value::Null => "null",
      Value::Undecidable => "undecidable",
      Value::Bool(_) => "bool",
      Value::Number(_) => "number",
      Value::String(_) => "string",
      Value::Array(_) => "array",
      Value::Object(_) => "object",
      Value::Function(_) => "function",
      Value::Class(_) => "class",
      Value::Instance(_) => "instance",
      Value::Error(_) => "error",
    }
  }

  /// The two-valued truth of a value, used by branches and short-circuit
  /// operators. `Undecidable` is falsy here; the three-valued operators
  /// treat it separately.
  pub fn truthy(&self) -> bool {
    match self {
      Value::Null => false,
      Value::Undecidable => false,
      Value::Bool(b) => *b,
      Value::Number(n) => *n != 0.0 && !n.is_nan(),
      Value::String(s) => !s.is_empty(),
      Value::Array(a) => !a.borrow().is_empty(),
      Value::Object(o) => !o.borrow().is_empty(),
      Value::Function(_) | Value::Class(_) | Value::Instance(_) => true,
      Value::Error(_) => false,
    }
  }

  /// Numeric coercion. Strings parse strictly; everything that has no
  /// numeric reading reports why.
  pub fn to_number(&self) -> Result<f64, String> {
    match self {
      Value::Null => Ok(0.0),
      Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
      Value::Number(n) => Ok(*n),
      Value::String(s) => s
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("string `{s}` is not a number")),
      other => Err(format!("{} has no numeric value", other.type_name())),
    }
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  /// Write `self` the way it appears inside a serialized array or
  /// object: strings quoted and escaped, everything else as `Display`.
  fn write_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::String(s) => {
        f.write_str("\"")?;
        for c in s.chars() {
          match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{c}")?,
          }
        }
        f.write_str("\"")
      }
      other => write!(f, "{other}"),
    }
  }
}

impl Default for Value {
  fn default() -> Self {
    Value::Null
  }
}

impl Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Null => write!(f, "null"),
      Value::Undecidable => write!(f, "undecidable"),
      Value::Bool(b) => write!(f, "{b}"),
      Value::Number(n) => write!(f, "{n}"),
      Value::String(s) => write!(f, "{s}"),
      Value::Array(items) => {
        write!(f, "[")?;
        for (i, item) in items.borrow().iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          item.write_nested(f)?;
        }
        write!(f, "]")
      }
      Value::Object(table) => {
        write!(f, "{{")?;
        for (i, (key, value)) in table.borrow().iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "\"{key}\": ")?;
          value.write_nested(f)?;
        }
        write!(f, "}}")
      }
      Value::Function(func) => write!(f, "<function {}>", func.name()),
      Value::Class(class) => write!(f, "<class {}>", class.name),
      Value::Instance(instance) => write!(f, "<instance {}>", instance.class.name),
      Value::Error(e) => write!(f, "<error {}: {}>", e.kind, e.message),
    }
  }
}

impl Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Null => f.debug_tuple("Null").finish(),
      Value::Undecidable => f.debug_tuple("Undecidable").finish(),
      Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
      Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
      Value::String(s) => f.debug_tuple("String").field(s).finish(),
      other => write!(f, "{other}"),
    }
  }
}

impl PartialEq for Value {
  /// Structural equality: same type and equal contents. Numbers use IEEE
  /// equality (`NaN != NaN`); arrays and objects compare deeply;
  /// functions, classes and instances compare by identity.
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Null, Value::Null) => true,
      (Value::Undecidable, Value::Undecidable) => true,
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Number(a), Value::Number(b)) => a == b,
      (Value::String(a), Value::String(b)) => a == b,
      (Value::Array(a), Value::Array(b)) => {
        if Rc::ptr_eq(a, b) {
          return true;
        }
        let (a, b) = (a.borrow(), b.borrow());
        a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
      }
      (Value::Object(a), Value::Object(b)) => {
        if Rc::ptr_eq(a, b) {
          return true;
        }
        let (a, b) = (a.borrow(), b.borrow());
        a.len() == b.len()
          && a
            .iter()
            .all(|(key, value)| b.get(key.as_ref()).as_ref() == Some(value))
      }
      (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
      (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
      (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
      (Value::Error(a), Value::Error(b)) => a.kind == b.kind && a.message == b.message,
      _ => false,
    }
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Number(value)
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::String(value.into())
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::String(value.into())
  }
}
