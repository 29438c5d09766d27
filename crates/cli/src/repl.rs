use rustyline::Editor;
use zen::{Value, Zen};

struct Repl {
  zen: Zen,
  editor: Editor<()>,
}

enum ReadResult {
  Incomplete,
  Complete,
}

enum Error {
  Readline(rustyline::error::ReadlineError),
  Parse(String),
}

enum Control {
  Eval,
  Loop,
  Quit,
}

impl Repl {
  fn new() -> rustyline::Result<Self> {
    Ok(Self {
      zen: Zen::new(),
      editor: Editor::new()?,
    })
  }

  fn read_logical_line(&mut self, buffer: &mut String) -> Result<Control, Error> {
    let mut prev_line = String::new();
    loop {
      if !buffer.is_empty() {
        buffer.push('\n');
      }
      // start continuation lines at the previous line's indentation
      let ws = &prev_line[..prev_line
        .chars()
        .take_while(|c| c.is_ascii_whitespace())
        .count()];
      let line = self
        .editor
        .readline_with_initial(if buffer.is_empty() { "zen> " } else { "...> " }, (ws, ""))
        .map_err(Error::Readline)?;
      prev_line.clear();
      prev_line.push_str(&line);
      if !line.trim().is_empty() {
        self.editor.add_history_entry(&line);
      }
      buffer.push_str(&line);

      match self.try_cmd(buffer) {
        Some(control) => return Ok(control),
        None => {}
      }

      match self.scan(buffer.as_str())? {
        ReadResult::Incomplete => continue,
        ReadResult::Complete => break Ok(Control::Eval),
      }
    }
  }

  fn try_cmd(&mut self, input: &str) -> Option<Control> {
    match input.trim() {
      "exit" | "quit" => Some(Control::Quit),
      "help" => {
        println!("ZEN REPL commands: exit, quit, help, clear");
        println!("Anything else is evaluated as ZEN code.");
        Some(Control::Loop)
      }
      "clear" => {
        print!("\x1b[2J\x1b[1;1H");
        Some(Control::Loop)
      }
      _ => None,
    }
  }

  /// Decide whether `input` is one complete logical line. Continuation
  /// is requested while a bracket is unclosed or a trailing comma is
  /// pending, and while an indented block is still being typed (a blank
  /// line closes it).
  fn scan(&self, input: &str) -> Result<ReadResult, Error> {
    if open_brackets(input) > 0 || input.trim_end().ends_with(',') {
      return Ok(ReadResult::Incomplete);
    }

    let is_multi_line = input.contains('\n');
    if is_multi_line {
      let last_line = input.split('\n').last().unwrap_or("");
      if !last_line.trim().is_empty() && (is_indented(last_line) || begins_block(last_line)) {
        return Ok(ReadResult::Incomplete);
      }
    } else if begins_block(input) {
      return Ok(ReadResult::Incomplete);
    }

    match self.zen.check(input) {
      Ok(()) => Ok(ReadResult::Complete),
      Err(errors) => {
        let mut out = String::new();
        for error in errors {
          out.push_str(&error.report(diag::Source::string(input), true));
        }
        Err(Error::Parse(out))
      }
    }
  }

  fn eval(&mut self, input: &str) -> Result<Value, zen::Error> {
    self.zen.eval(input)
  }
}

fn is_indented(line: &str) -> bool {
  line.starts_with([' ', '\t'])
}

/// Lines that open an indented block: block-statement keywords without
/// the single-line `then` form.
fn begins_block(line: &str) -> bool {
  let mut words = line.trim_start().split_whitespace();
  let first = words.next().unwrap_or("");
  match first {
    "function" | "while" | "for" | "class" => true,
    "if" | "elif" | "else" => !line.contains(" then ") && !trailing_word(line, "then"),
    // `set NAME` with no initializer opens the block object form
    "set" => words.next().is_some() && words.next().is_none(),
    _ => false,
  }
}

fn trailing_word(line: &str, word: &str) -> bool {
  line.trim_end().split_whitespace().last() == Some(word)
}

/// Net count of unclosed brackets, ignoring those inside string
/// literals and comments.
fn open_brackets(input: &str) -> i32 {
  let mut depth = 0;
  let mut chars = input.chars().peekable();
  while let Some(c) = chars.next() {
    match c {
      '(' | '[' | '{' => depth += 1,
      ')' | ']' | '}' => depth -= 1,
      '#' => {
        for c in chars.by_ref() {
          if c == '\n' {
            break;
          }
        }
      }
      '"' => {
        while let Some(c) = chars.next() {
          match c {
            '\\' => {
              chars.next();
            }
            '"' => break,
            _ => {}
          }
        }
      }
      _ => {}
    }
  }
  depth
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> rustyline::Result<()> {
  let mut repl = Repl::new()?;
  let mut buffer = String::new();

  println!("ZEN v{VERSION}\nType `help` for commands, `exit` to leave.");

  loop {
    buffer.clear();

    match repl.read_logical_line(&mut buffer) {
      Ok(Control::Eval) => {}
      Ok(Control::Loop) => continue,
      Ok(Control::Quit) => return Ok(()),
      Err(Error::Readline(e)) => match e {
        rustyline::error::ReadlineError::Eof => return Ok(()),
        rustyline::error::ReadlineError::Interrupted => continue,
        rustyline::error::ReadlineError::WindowResized => continue,
        e => return Err(e),
      },
      Err(Error::Parse(e)) => {
        print!("{e}");
        continue;
      }
    }

    if buffer.trim().is_empty() {
      continue;
    }

    match repl.eval(&buffer) {
      Ok(Value::Null) => {}
      Ok(value) => println!("{value}"),
      Err(error) => {
        print!("{}", error.report(diag::Source::string(buffer.as_str()), true));
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bracket_scanning_ignores_strings_and_comments() {
    assert_eq!(open_brackets("set xs [1, 2"), 1);
    assert_eq!(open_brackets("set xs [1, 2]"), 0);
    assert_eq!(open_brackets("set s \"[\""), 0);
    assert_eq!(open_brackets("set x 1 # ["), 0);
    assert_eq!(open_brackets("set s \"\\\"[\""), 0);
  }

  #[test]
  fn block_detection() {
    assert!(begins_block("function f a b"));
    assert!(begins_block("while n > 0"));
    assert!(begins_block("if x > 1"));
    assert!(!begins_block("if x > 1 then print x"));
    assert!(!begins_block("set x 1"));
    assert!(!begins_block("print x"));
  }
}
