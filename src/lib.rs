//! A tree-walking interpreter for ZEN, a small dynamically-typed
//! language with indentation-based blocks, `set name value` definitions,
//! space-separated calls, three-valued logic, and classes with single
//! inheritance.
//!
//! ```
//! let zen = zen::Zen::new();
//! let value = zen.eval("set x 40\nx + 2").unwrap();
//! assert_eq!(value, zen::Value::Number(42.0));
//! ```
//!
//! State persists across `eval` calls on the same instance, which is
//! what the REPL builds on. Output from `print` goes to the sink given
//! to [`Zen::with_io`] (standard output by default).

mod builtins;
mod error;
mod interp;
mod ops;
mod scope;
mod value;

use std::cell::{Ref, RefCell};

pub use error::{Error, ErrorKind, Result, RuntimeError};
pub use interp::{Control, Interp, Stdout, MAX_CALL_DEPTH, MAX_LOOP_ITERATIONS};
pub use scope::{Scope, ScopeRef};
pub use value::Value;

pub struct Zen {
  interp: RefCell<Interp>,
}

impl Zen {
  pub fn new() -> Self {
    Self::with_io(std::io::stdout())
  }

  /// An interpreter whose `print` output goes to `io`. Tests pass a
  /// `Vec<u8>` here and read it back through [`Zen::io`].
  pub fn with_io(io: impl Stdout) -> Self {
    Zen {
      interp: RefCell::new(Interp::new(Box::new(io))),
    }
  }

  /// Parse without evaluating.
  pub fn check(&self, src: &str) -> Result<(), Vec<syntax::Error>> {
    syntax::parse(src)?;
    Ok(())
  }

  /// Parse and evaluate `src` in the persistent global scope, returning
  /// the value of the last statement.
  pub fn eval(&self, src: &str) -> Result<Value> {
    let module = syntax::parse(src).map_err(Error::Syntax)?;
    let value = self
      .interp
      .borrow_mut()
      .eval_module(&module)
      .map_err(Error::Runtime)?;
    Ok(value)
  }

  /// Borrow the output sink back at its concrete type.
  pub fn io<T: 'static>(&self) -> Option<Ref<'_, T>> {
    match Ref::filter_map(self.interp.borrow(), |interp| {
      interp.io().as_any().downcast_ref()
    }) {
      Ok(v) => Some(v),
      _ => None,
    }
  }
}

impl Default for Zen {
  fn default() -> Self {
    Self::new()
  }
}
