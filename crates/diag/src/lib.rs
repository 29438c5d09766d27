//! Diagnostic reports for the ZEN interpreter.
//!
//! A [`Report`] renders a single diagnostic in the canonical form
//!
//! ```text
//! PATH:LINE:COL: KIND: MESSAGE
//!  | <offending source line>
//!  |        ^^^
//! ```
//!
//! where `PATH` falls back to `<repl>` for sources without a name.

pub mod report;
pub mod source;

pub use report::{Level, Report};
pub use source::Source;
