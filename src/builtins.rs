//! Host functions.
//!
//! The evaluator consults this name-indexed table before any user
//! function, so these names are effectively reserved at call position.
//! Each entry is a plain `fn` receiving the evaluated arguments and the
//! call span.

use indexmap::IndexMap;
use span::Span;

use crate::error::{ErrorKind, RuntimeError};
use crate::interp::{Interp, NativeFn, Result};
use crate::ops;
use crate::value::{Table, Value};

pub(crate) fn register() -> IndexMap<&'static str, NativeFn> {
  IndexMap::from([
    ("print", print as NativeFn),
    // math
    ("abs", abs),
    ("floor", floor),
    ("ceil", ceil),
    ("round", round),
    ("sqrt", sqrt),
    ("sin", sin),
    ("cos", cos),
    ("tan", tan),
    ("log", log),
    ("exp", exp),
    ("pow", pow),
    ("min", min),
    ("max", max),
    ("random", random),
    // strings
    ("length", length),
    ("upper", upper),
    ("lower", lower),
    ("trim", trim),
    ("split", split),
    ("join", join),
    ("replace", replace),
    ("contains", contains),
    ("starts_with", starts_with),
    ("ends_with", ends_with),
    // conversions
    ("to_string", to_string),
    ("to_number", to_number),
    ("to_bool", to_bool),
    ("type", type_name),
    // json
    ("json_parse", json_parse),
    ("json_stringify", json_stringify),
    // file io
    ("read_file", read_file),
    ("write_file", write_file),
    // three-valued logic
    ("undecidable_and", undecidable_and),
    ("undecidable_or", undecidable_or),
    ("undecidable_implies", undecidable_implies),
    ("kleene_and", kleene_and),
    ("kleene_or", kleene_or),
  ])
}

fn arity(name: &str, args: &[Value], expected: usize, span: Span) -> Result<()> {
  if args.len() != expected {
    return Err(RuntimeError::new(
      ErrorKind::ArityMismatch,
      format!("`{name}` expects {expected} arguments, got {}", args.len()),
      span,
    ));
  }
  Ok(())
}

fn number(name: &str, args: &[Value], index: usize, span: Span) -> Result<f64> {
  args[index].to_number().map_err(|message| {
    RuntimeError::new(
      ErrorKind::BadArgument,
      format!("`{name}`: argument {}: {message}", index + 1),
      span,
    )
  })
}

fn string<'a>(name: &str, args: &'a [Value], index: usize, span: Span) -> Result<&'a str> {
  match &args[index] {
    Value::String(s) => Ok(s),
    other => Err(RuntimeError::new(
      ErrorKind::BadArgument,
      format!(
        "`{name}`: argument {} must be a string, got {}",
        index + 1,
        other.type_name()
      ),
      span,
    )),
  }
}

/// `print a b c` writes the display form of every argument, separated by
/// spaces and terminated by a newline. Returns null.
fn print(interp: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  let line = args
    .iter()
    .map(|value| value.to_string())
    .collect::<Vec<_>>()
    .join(" ");
  interp
    .print(format_args!("{line}\n"))
    .map_err(|e| RuntimeError::new(ErrorKind::IOError, e.to_string(), span))?;
  Ok(Value::Null)
}

macro_rules! float_builtin {
  ($($name:ident),* $(,)?) => {
    $(
      fn $name(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
        arity(stringify!($name), args, 1, span)?;
        let n = number(stringify!($name), args, 0, span)?;
        Ok(Value::Number(n.$name()))
      }
    )*
  };
}

float_builtin!(abs, floor, ceil, round, sqrt, sin, cos, tan, exp);

fn log(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("log", args, 1, span)?;
  Ok(Value::Number(number("log", args, 0, span)?.ln()))
}

fn pow(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("pow", args, 2, span)?;
  let base = number("pow", args, 0, span)?;
  let exponent = number("pow", args, 1, span)?;
  Ok(Value::Number(base.powf(exponent)))
}

fn min(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  fold_numbers("min", args, span, f64::min)
}

fn max(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  fold_numbers("max", args, span, f64::max)
}

fn fold_numbers(
  name: &str,
  args: &[Value],
  span: Span,
  fold: impl Fn(f64, f64) -> f64,
) -> Result<Value> {
  if args.is_empty() {
    return Err(RuntimeError::new(
      ErrorKind::ArityMismatch,
      format!("`{name}` expects at least 1 argument"),
      span,
    ));
  }
  let mut acc = number(name, args, 0, span)?;
  for index in 1..args.len() {
    acc = fold(acc, number(name, args, index, span)?);
  }
  Ok(Value::Number(acc))
}

fn random(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("random", args, 0, span)?;
  Ok(Value::Number(rand::random::<f64>()))
}

fn length(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("length", args, 1, span)?;
  let len = match &args[0] {
    Value::String(s) => s.chars().count(),
    Value::Array(items) => items.borrow().len(),
    Value::Object(table) => table.borrow().len(),
    other => {
      return Err(RuntimeError::new(
        ErrorKind::BadArgument,
        format!("`length`: {} has no length", other.type_name()),
        span,
      ))
    }
  };
  Ok(Value::Number(len as f64))
}

fn upper(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("upper", args, 1, span)?;
  Ok(Value::string(string("upper", args, 0, span)?.to_uppercase()))
}

fn lower(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("lower", args, 1, span)?;
  Ok(Value::string(string("lower", args, 0, span)?.to_lowercase()))
}

fn trim(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("trim", args, 1, span)?;
  Ok(Value::string(string("trim", args, 0, span)?.trim()))
}

/// `split s sep`. An empty separator splits into characters.
fn split(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("split", args, 2, span)?;
  let s = string("split", args, 0, span)?;
  let sep = string("split", args, 1, span)?;
  let parts: Vec<Value> = if sep.is_empty() {
    s.chars().map(|c| Value::string(c.to_string())).collect()
  } else {
    s.split(sep).map(Value::string).collect()
  };
  Ok(Value::array(parts))
}

fn join(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("join", args, 2, span)?;
  let Value::Array(items) = &args[0] else {
    return Err(RuntimeError::new(
      ErrorKind::BadArgument,
      format!("`join`: argument 1 must be an array, got {}", args[0].type_name()),
      span,
    ));
  };
  let sep = string("join", args, 1, span)?;
  let joined = items
    .borrow()
    .iter()
    .map(|value| value.to_string())
    .collect::<Vec<_>>()
    .join(sep);
  Ok(Value::string(joined))
}

fn replace(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("replace", args, 3, span)?;
  let s = string("replace", args, 0, span)?;
  let from = string("replace", args, 1, span)?;
  let to = string("replace", args, 2, span)?;
  Ok(Value::string(s.replace(from, to)))
}

/// Substring test for strings, membership for arrays, key presence for
/// objects.
fn contains(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("contains", args, 2, span)?;
  let found = match (&args[0], &args[1]) {
    (Value::String(s), Value::String(sub)) => s.contains(sub.as_ref()),
    (Value::Array(items), needle) => items.borrow().iter().any(|item| item == needle),
    (Value::Object(table), Value::String(key)) => table.borrow().contains_key(key),
    (haystack, _) => {
      return Err(RuntimeError::new(
        ErrorKind::BadArgument,
        format!("`contains`: cannot search a {}", haystack.type_name()),
        span,
      ))
    }
  };
  Ok(Value::Bool(found))
}

fn starts_with(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("starts_with", args, 2, span)?;
  let s = string("starts_with", args, 0, span)?;
  let prefix = string("starts_with", args, 1, span)?;
  Ok(Value::Bool(s.starts_with(prefix)))
}

fn ends_with(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("ends_with", args, 2, span)?;
  let s = string("ends_with", args, 0, span)?;
  let suffix = string("ends_with", args, 1, span)?;
  Ok(Value::Bool(s.ends_with(suffix)))
}

fn to_string(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("to_string", args, 1, span)?;
  Ok(Value::string(args[0].to_string()))
}

fn to_number(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("to_number", args, 1, span)?;
  args[0]
    .to_number()
    .map(Value::Number)
    .map_err(|message| RuntimeError::new(ErrorKind::TypeMismatch, message, span))
}

fn to_bool(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("to_bool", args, 1, span)?;
  Ok(Value::Bool(args[0].truthy()))
}

fn type_name(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("type", args, 1, span)?;
  Ok(Value::string(args[0].type_name()))
}

/// A failed parse returns an error *value* (falsy, with `kind` and
/// `message` properties) rather than aborting the program, so scripts
/// can probe untrusted input.
fn json_parse(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("json_parse", args, 1, span)?;
  let text = string("json_parse", args, 0, span)?;
  match serde_json::from_str::<serde_json::Value>(text) {
    Ok(json) => Ok(from_json(&json)),
    Err(e) => Ok(Value::error(ErrorKind::BadArgument, e.to_string())),
  }
}

fn json_stringify(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("json_stringify", args, 1, span)?;
  let json = to_json(&args[0], span)?;
  Ok(Value::string(json.to_string()))
}

fn from_json(json: &serde_json::Value) -> Value {
  match json {
    serde_json::Value::Null => Value::Null,
    serde_json::Value::Bool(b) => Value::Bool(*b),
    serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
    serde_json::Value::String(s) => Value::string(s.as_str()),
    serde_json::Value::Array(items) => Value::array(items.iter().map(from_json).collect()),
    serde_json::Value::Object(entries) => {
      let mut table = Table::with_capacity(entries.len());
      for (key, value) in entries {
        table.insert(key.as_str().into(), from_json(value));
      }
      Value::object(table)
    }
  }
}

fn to_json(value: &Value, span: Span) -> Result<serde_json::Value> {
  match value {
    Value::Null => Ok(serde_json::Value::Null),
    Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
    Value::Number(n) => serde_json::Number::from_f64(*n)
      .map(serde_json::Value::Number)
      .ok_or_else(|| {
        RuntimeError::new(
          ErrorKind::BadArgument,
          format!("`json_stringify`: {n} has no JSON form"),
          span,
        )
      }),
    Value::String(s) => Ok(serde_json::Value::String(s.to_string())),
    Value::Array(items) => {
      let mut out = Vec::with_capacity(items.borrow().len());
      for item in items.borrow().iter() {
        out.push(to_json(item, span)?);
      }
      Ok(serde_json::Value::Array(out))
    }
    Value::Object(table) => {
      let mut out = serde_json::Map::new();
      for (key, value) in table.borrow().iter() {
        out.insert(key.to_string(), to_json(value, span)?);
      }
      Ok(serde_json::Value::Object(out))
    }
    other => Err(RuntimeError::new(
      ErrorKind::BadArgument,
      format!("`json_stringify`: cannot serialize a {}", other.type_name()),
      span,
    )),
  }
}

fn read_file(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("read_file", args, 1, span)?;
  let path = string("read_file", args, 0, span)?;
  std::fs::read_to_string(path)
    .map(Value::from)
    .map_err(|e| RuntimeError::new(ErrorKind::IOError, format!("{path}: {e}"), span))
}

fn write_file(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
  arity("write_file", args, 2, span)?;
  let path = string("write_file", args, 0, span)?;
  let content = string("write_file", args, 1, span)?;
  std::fs::write(path, content)
    .map(|_| Value::Null)
    .map_err(|e| RuntimeError::new(ErrorKind::IOError, format!("{path}: {e}"), span))
}

macro_rules! trilean_builtin {
  ($($name:ident => $table:path),* $(,)?) => {
    $(
      fn $name(_: &mut Interp, args: &[Value], span: Span) -> Result<Value> {
        arity(stringify!($name), args, 2, span)?;
        let a = ops::trilean(&args[0]);
        let b = ops::trilean(&args[1]);
        Ok(ops::from_trilean($table(a, b)))
      }
    )*
  };
}

trilean_builtin! {
  undecidable_and => ops::lukasiewicz_and,
  undecidable_or => ops::lukasiewicz_or,
  undecidable_implies => ops::lukasiewicz_implies,
  kleene_and => ops::kleene_and,
  kleene_or => ops::kleene_or,
}
