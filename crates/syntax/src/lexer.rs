#![allow(non_camel_case_types)]

use std::fmt;

use beef::lean::Cow;
use logos::Logos;
use span::Span;

use crate::{Error, ErrorKind};

/// Tabs contribute a fixed width to indentation.
pub const TAB_WIDTH: u64 = 4;

#[derive(Clone, Debug)]
pub struct Token<'src> {
  pub kind: TokenKind,
  pub lexeme: Cow<'src, str>,
  pub span: Span,
}

impl<'src> Token<'src> {
  pub fn is(&self, kind: TokenKind) -> bool {
    self.kind == kind
  }
}

/// The token vector for one source buffer.
///
/// All tokens are materialized up front, which is what gives the parser
/// cheap arbitrary lookahead for the object-literal tie-break. NEWLINE,
/// INDENT and DEDENT are synthesized here from an indent stack seeded
/// with `[0]`; the parser never measures whitespace itself.
pub struct Lexer<'src> {
  src: &'src str,
  tokens: Vec<Token<'src>>,
  eof: Token<'src>,
}

impl<'src> Lexer<'src> {
  pub fn lex(src: &'src str) -> Result<Lexer<'src>, Vec<Error>> {
    let eof = Token {
      kind: TokenKind::Tok_Eof,
      lexeme: Cow::borrowed(""),
      span: (src.len()..src.len()).into(),
    };

    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut indent = IndentStack::new();
    // Indent of the upcoming line, once a line break has been seen and
    // before the first significant token of that line.
    let mut pending: Option<Pending> = None;
    let mut depth = 0usize;
    // Garbage after an unterminated string is not re-reported.
    let mut suppress_until = 0usize;

    // A file may open with an indented line; logos only reports
    // indentation after a newline, so measure the first line by hand.
    let leading = src.len() - src.trim_start_matches([' ', '\t']).len();
    if leading > 0 {
      pending = Some(Pending {
        width: measure_indent(&src[..leading]),
        newline: Span::new(0, 0),
        ws: Span::new(0, leading),
      });
    }

    let mut inner = TokenKind::lexer(src);
    while let Some(result) = inner.next() {
      let lexeme = inner.slice();
      let span: Span = inner.span().into();

      let kind = match result {
        // Filter
        Ok(TokenKind::_Whitespace | TokenKind::_Comment) => continue,
        // Measure indentation
        Ok(TokenKind::_Indentation) => {
          // Blank and comment-only lines overwrite the previous pending
          // measurement, so they never affect block structure.
          let ws = lexeme.rfind('\n').map(|i| i + 1).unwrap_or(0);
          pending = Some(Pending {
            width: measure_indent(&lexeme[ws..]),
            newline: Span::new(span.start, span.start + 1),
            ws: Span::new(span.start + ws, span.end),
          });
          continue;
        }
        Err(()) => {
          if span.start < suppress_until {
            continue;
          }
          if lexeme.starts_with('"') {
            let line_end = src[span.start..]
              .find('\n')
              .map(|i| i + span.start)
              .unwrap_or(src.len());
            errors.push(Error::new(
              ErrorKind::UnterminatedString,
              "unterminated string literal",
              span.start..line_end,
            ));
            suppress_until = line_end;
          } else {
            errors.push(Error::new(
              ErrorKind::UnknownChar,
              format!("unknown character `{}`", lexeme.escape_default()),
              span,
            ));
          }
          continue;
        }
        Ok(kind) => kind,
      };

      if let Some(p) = pending.take() {
        let continuation = matches!(tokens.last(), Some(Token { kind: TokenKind::Tok_Comma, .. }));
        if depth == 0 && !continuation {
          tokens.push(Token {
            kind: TokenKind::Tok_Newline,
            lexeme: Cow::borrowed(""),
            span: p.newline,
          });
          if p.width > indent.level() {
            indent.push(p.width);
            tokens.push(Token {
              kind: TokenKind::Tok_Indent,
              lexeme: Cow::borrowed(""),
              span: p.ws,
            });
          } else {
            while p.width < indent.level() {
              indent.pop();
              tokens.push(Token {
                kind: TokenKind::Tok_Dedent,
                lexeme: Cow::borrowed(""),
                span: p.ws,
              });
            }
            if p.width != indent.level() {
              errors.push(Error::new(
                ErrorKind::IndentMismatch,
                "dedent does not match any outer indentation level",
                p.ws,
              ));
            }
          }
        }
      }

      match kind {
        TokenKind::Brk_ParenL | TokenKind::Brk_SquareL | TokenKind::Brk_CurlyL => depth += 1,
        TokenKind::Brk_ParenR | TokenKind::Brk_SquareR | TokenKind::Brk_CurlyR => {
          depth = depth.saturating_sub(1)
        }
        _ => {}
      }

      let token = match kind {
        TokenKind::Lit_Number => match normalize_decimal(lexeme) {
          Ok(lexeme) => Token { kind, lexeme, span },
          Err(e) => {
            errors.push(Error::new(ErrorKind::BadNumber, e, span));
            continue;
          }
        },
        TokenKind::_HexNumber | TokenKind::_BinNumber => {
          let radix = if kind == TokenKind::_HexNumber { 16 } else { 2 };
          match normalize_radix(lexeme, radix) {
            Ok(lexeme) => Token {
              kind: TokenKind::Lit_Number,
              lexeme,
              span,
            },
            Err(e) => {
              errors.push(Error::new(ErrorKind::BadNumber, e, span));
              continue;
            }
          }
        }
        TokenKind::Lit_String => {
          // Raw strings carry no escapes to validate.
          if !lexeme.starts_with("r\"") {
            if let Some(err) = check_escapes(lexeme, span) {
              errors.push(err);
              continue;
            }
          }
          Token {
            kind,
            lexeme: Cow::borrowed(lexeme),
            span,
          }
        }
        _ => Token {
          kind,
          lexeme: Cow::borrowed(lexeme),
          span,
        },
      };
      tokens.push(token);
    }

    if depth == 0 && !matches!(tokens.last(), None | Some(Token { kind: TokenKind::Tok_Newline, .. })) {
      tokens.push(Token {
        kind: TokenKind::Tok_Newline,
        lexeme: Cow::borrowed(""),
        span: eof.span,
      });
    }
    while indent.level() > 0 {
      indent.pop();
      tokens.push(Token {
        kind: TokenKind::Tok_Dedent,
        lexeme: Cow::borrowed(""),
        span: eof.span,
      });
    }

    if errors.is_empty() {
      Ok(Lexer { src, tokens, eof })
    } else {
      Err(errors)
    }
  }

  #[inline]
  pub fn src(&self) -> &'src str {
    self.src
  }

  #[inline]
  pub fn tokens(&self) -> &[Token<'src>] {
    &self.tokens
  }

  /// Token at `pos`, or the EOF token past the end.
  #[inline]
  pub fn get(&self, pos: usize) -> &Token<'src> {
    self.tokens.get(pos).unwrap_or(&self.eof)
  }
}

struct Pending {
  width: u64,
  newline: Span,
  ws: Span,
}

/// Indentation levels currently open. Always holds at least the zero
/// level; `pop` never removes it.
struct IndentStack {
  stack: Vec<u64>,
}

impl IndentStack {
  fn new() -> Self {
    Self { stack: vec![0] }
  }

  fn level(&self) -> u64 {
    *self.stack.last().expect("indent stack is never empty")
  }

  fn push(&mut self, n: u64) {
    self.stack.push(n);
  }

  fn pop(&mut self) {
    if self.stack.len() > 1 {
      self.stack.pop();
    }
  }
}

fn measure_indent(ws: &str) -> u64 {
  ws.chars()
    .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
    .sum()
}

/// Strip digit-group underscores from a decimal literal.
fn normalize_decimal(lexeme: &str) -> Result<Cow<'_, str>, String> {
  let normalized: Cow<str> = if lexeme.contains('_') {
    Cow::owned(lexeme.replace('_', ""))
  } else {
    Cow::borrowed(lexeme)
  };
  match normalized[..].parse::<f64>() {
    Ok(_) => Ok(normalized),
    Err(_) => Err(format!("invalid number literal `{lexeme}`")),
  }
}

/// Convert a `0x`/`0b` literal to its decimal form.
fn normalize_radix(lexeme: &str, radix: u32) -> Result<Cow<'_, str>, String> {
  let digits = lexeme[2..].replace('_', "");
  match u64::from_str_radix(&digits, radix) {
    Ok(value) => Ok(Cow::owned(value.to_string())),
    Err(_) => Err(format!("number literal `{lexeme}` is out of range")),
  }
}

/// Validate the escape sequences of a quoted (non-raw) string literal.
fn check_escapes(lexeme: &str, span: Span) -> Option<Error> {
  let bytes = lexeme.as_bytes();
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'\\' {
      match bytes.get(i + 1) {
        Some(b'n' | b't' | b'r' | b'\\' | b'"') => i += 2,
        Some(c) => {
          return Some(Error::new(
            ErrorKind::BadEscape,
            format!("invalid escape sequence `\\{}`", *c as char),
            span.start + i..span.start + i + 2,
          ))
        }
        None => i += 1,
      }
    } else {
      i += 1;
    }
  }
  None
}

/// Decode a validated string literal lexeme (quotes included) into its
/// runtime text. Raw strings pass through untouched.
pub fn unescape(lexeme: &str) -> std::string::String {
  if let Some(raw) = lexeme.strip_prefix("r\"") {
    return raw.strip_suffix('"').unwrap_or(raw).to_string();
  }
  let inner = lexeme
    .strip_prefix('"')
    .and_then(|s| s.strip_suffix('"'))
    .unwrap_or(lexeme);
  let mut out = std::string::String::with_capacity(inner.len());
  let mut chars = inner.chars();
  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    }
    match chars.next() {
      Some('n') => out.push('\n'),
      Some('t') => out.push('\t'),
      Some('r') => out.push('\r'),
      Some('\\') => out.push('\\'),
      Some('"') => out.push('"'),
      Some(other) => out.push(other),
      None => {}
    }
  }
  out
}

// When adding a token matched by a `token` directive, also extend
// `TokenKind::name` below.
#[derive(Clone, Copy, Debug, Logos, PartialEq, Eq)]
pub enum TokenKind {
  // Keywords
  #[token("set")]
  Kw_Set,
  #[token("function")]
  Kw_Function,
  #[token("return")]
  Kw_Return,
  #[token("if")]
  Kw_If,
  #[token("elif")]
  Kw_Elif,
  #[token("else")]
  Kw_Else,
  #[token("then")]
  Kw_Then,
  #[token("while")]
  Kw_While,
  #[token("for")]
  Kw_For,
  #[token("in")]
  Kw_In,
  #[token("break")]
  Kw_Break,
  #[token("continue")]
  Kw_Continue,
  #[token("class")]
  Kw_Class,
  #[token("extends")]
  Kw_Extends,
  #[token("new")]
  Kw_New,
  #[token("super")]
  Kw_Super,
  #[token("this")]
  Kw_This,
  #[token("private")]
  Kw_Private,
  #[token("import")]
  Kw_Import,
  #[token("export")]
  Kw_Export,

  // Brackets
  #[token("(")]
  Brk_ParenL,
  #[token(")")]
  Brk_ParenR,
  #[token("[")]
  Brk_SquareL,
  #[token("]")]
  Brk_SquareR,
  #[token("{")]
  Brk_CurlyL,
  #[token("}")]
  Brk_CurlyR,

  // Operators and punctuation
  #[token("+")]
  Op_Plus,
  #[token("-")]
  Op_Minus,
  #[token("*")]
  Op_Star,
  #[token("/")]
  Op_Slash,
  #[token("%")]
  Op_Percent,
  #[token("=")]
  Op_Equal,
  #[token("!=")]
  Op_BangEqual,
  #[token("<")]
  Op_Less,
  #[token(">")]
  Op_More,
  #[token("<=")]
  Op_LessEqual,
  #[token(">=")]
  Op_MoreEqual,
  #[token("&")]
  Op_And,
  #[token("|")]
  Op_Or,
  #[token("!")]
  Op_Bang,
  #[token("?")]
  Tok_Question,
  #[token(":")]
  Tok_Colon,
  #[token(",")]
  Tok_Comma,
  #[token(".")]
  Op_Dot,

  // Literals
  #[token("null")]
  Lit_Null,
  #[token("undecidable")]
  Lit_Undecidable,
  /// `true` or `false`
  #[token("true")]
  #[token("false")]
  Lit_Bool,
  /// `0`, `1.5`, `5e10`, `1_000`, etc. Also the normalized form of the
  /// hidden hex/binary variants.
  #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9]+)?")]
  Lit_Number,
  /// `"..."` with escapes, or raw `r"..."`.
  #[regex(r#""([^"\\\n]|\\.)*""#)]
  #[regex(r#"r"[^"\n]*""#)]
  Lit_String,
  /// `a`, `b_c`, `__x0`, etc.
  #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
  Lit_Ident,

  #[doc(hidden)]
  #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*")]
  _HexNumber,
  #[doc(hidden)]
  #[regex(r"0[bB][01][01_]*")]
  _BinNumber,

  #[doc(hidden)]
  #[regex(r"(\r?\n)+[ \t]*")]
  _Indentation,
  #[doc(hidden)]
  #[regex(r"[ \t]+")]
  _Whitespace,
  #[doc(hidden)]
  #[regex(r"#[^\n]*")]
  _Comment,

  // Synthesized by the indentation pass; logos never produces these.
  Tok_Newline,
  Tok_Indent,
  Tok_Dedent,
  Tok_Eof,
}

impl TokenKind {
  pub fn name(&self) -> &'static str {
    match self {
      TokenKind::Kw_Set => "set",
      TokenKind::Kw_Function => "function",
      TokenKind::Kw_Return => "return",
      TokenKind::Kw_If => "if",
      TokenKind::Kw_Elif => "elif",
      TokenKind::Kw_Else => "else",
      TokenKind::Kw_Then => "then",
      TokenKind::Kw_While => "while",
      TokenKind::Kw_For => "for",
      TokenKind::Kw_In => "in",
      TokenKind::Kw_Break => "break",
      TokenKind::Kw_Continue => "continue",
      TokenKind::Kw_Class => "class",
      TokenKind::Kw_Extends => "extends",
      TokenKind::Kw_New => "new",
      TokenKind::Kw_Super => "super",
      TokenKind::Kw_This => "this",
      TokenKind::Kw_Private => "private",
      TokenKind::Kw_Import => "import",
      TokenKind::Kw_Export => "export",
      TokenKind::Brk_ParenL => "(",
      TokenKind::Brk_ParenR => ")",
      TokenKind::Brk_SquareL => "[",
      TokenKind::Brk_SquareR => "]",
      TokenKind::Brk_CurlyL => "{",
      TokenKind::Brk_CurlyR => "}",
      TokenKind::Op_Plus => "+",
      TokenKind::Op_Minus => "-",
      TokenKind::Op_Star => "*",
      TokenKind::Op_Slash => "/",
      TokenKind::Op_Percent => "%",
      TokenKind::Op_Equal => "=",
      TokenKind::Op_BangEqual => "!=",
      TokenKind::Op_Less => "<",
      TokenKind::Op_More => ">",
      TokenKind::Op_LessEqual => "<=",
      TokenKind::Op_MoreEqual => ">=",
      TokenKind::Op_And => "&",
      TokenKind::Op_Or => "|",
      TokenKind::Op_Bang => "!",
      TokenKind::Tok_Question => "?",
      TokenKind::Tok_Colon => ":",
      TokenKind::Tok_Comma => ",",
      TokenKind::Op_Dot => ".",
      TokenKind::Lit_Null => "null",
      TokenKind::Lit_Undecidable => "undecidable",
      TokenKind::Lit_Bool => "bool",
      TokenKind::Lit_Number => "number",
      TokenKind::Lit_String => "string",
      TokenKind::Lit_Ident => "identifier",
      TokenKind::_HexNumber | TokenKind::_BinNumber => "number",
      TokenKind::_Indentation => "<indentation>",
      TokenKind::_Whitespace => "<whitespace>",
      TokenKind::_Comment => "<comment>",
      TokenKind::Tok_Newline => "<newline>",
      TokenKind::Tok_Indent => "<indent>",
      TokenKind::Tok_Dedent => "<dedent>",
      TokenKind::Tok_Eof => "<eof>",
    }
  }
}

impl<'src> fmt::Debug for Lexer<'src> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut list = f.debug_list();
    for token in &self.tokens {
      list.entry(&format_args!("({:?} `{}` @{})", token.kind, token.lexeme, token.span));
    }
    list.finish()
  }
}

#[cfg(test)]
mod tests;
