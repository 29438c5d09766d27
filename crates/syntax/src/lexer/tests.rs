use indoc::indoc;

use super::TokenKind::*;
use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
  Lexer::lex(src)
    .unwrap()
    .tokens()
    .iter()
    .map(|t| t.kind)
    .collect()
}

fn lexemes(src: &str) -> Vec<String> {
  Lexer::lex(src)
    .unwrap()
    .tokens()
    .iter()
    .map(|t| t.lexeme.to_string())
    .collect()
}

fn error_kinds(src: &str) -> Vec<ErrorKind> {
  Lexer::lex(src)
    .unwrap_err()
    .into_iter()
    .map(|e| e.kind)
    .collect()
}

#[test]
fn simple_statement() {
  assert_eq!(
    kinds("set x 42"),
    [Kw_Set, Lit_Ident, Lit_Number, Tok_Newline]
  );
}

#[test]
fn indent_and_dedent_are_synthesized() {
  let src = indoc! {"
    function f
        set y 1
    print x
  "};
  assert_eq!(
    kinds(src),
    [
      Kw_Function, Lit_Ident, Tok_Newline, Tok_Indent, Kw_Set, Lit_Ident, Lit_Number,
      Tok_Newline, Tok_Dedent, Lit_Ident, Lit_Ident, Tok_Newline,
    ]
  );
}

#[test]
fn nested_blocks_drain_at_eof() {
  let src = "if a\n    if b\n        set c 1";
  assert_eq!(
    kinds(src),
    [
      Kw_If, Lit_Ident, Tok_Newline, Tok_Indent, Kw_If, Lit_Ident, Tok_Newline, Tok_Indent,
      Kw_Set, Lit_Ident, Lit_Number, Tok_Newline, Tok_Dedent, Tok_Dedent,
    ]
  );
}

#[test]
fn dedent_must_match_an_open_level() {
  let src = "if a\n        set b 1\n    set c 2\n";
  assert_eq!(error_kinds(src), [ErrorKind::IndentMismatch]);
}

#[test]
fn blank_and_comment_lines_do_not_affect_indentation() {
  let src = indoc! {"
    while x
        set y 1

        # a comment at a weird place is fine
    # so is one at column zero
        set z 2
  "};
  assert_eq!(
    kinds(src),
    [
      Kw_While, Lit_Ident, Tok_Newline, Tok_Indent, Kw_Set, Lit_Ident, Lit_Number,
      Tok_Newline, Kw_Set, Lit_Ident, Lit_Number, Tok_Newline, Tok_Dedent,
    ]
  );
}

#[test]
fn tabs_count_as_four() {
  // one tab and four spaces open the same block level
  let src = "if a\n\tset b 1\n    set c 2\n";
  assert_eq!(
    kinds(src),
    [
      Kw_If, Lit_Ident, Tok_Newline, Tok_Indent, Kw_Set, Lit_Ident, Lit_Number, Tok_Newline,
      Kw_Set, Lit_Ident, Lit_Number, Tok_Newline, Tok_Dedent,
    ]
  );
}

#[test]
fn newlines_are_suppressed_inside_brackets() {
  let src = indoc! {"
    set xs [1,
        2,
        3]
  "};
  assert_eq!(
    kinds(src),
    [
      Kw_Set, Lit_Ident, Brk_SquareL, Lit_Number, Tok_Comma, Lit_Number, Tok_Comma,
      Lit_Number, Brk_SquareR, Tok_Newline,
    ]
  );
}

#[test]
fn trailing_comma_continues_the_line() {
  let src = "set o a 1,\n    b 2\n";
  assert_eq!(
    kinds(src),
    [
      Kw_Set, Lit_Ident, Lit_Ident, Lit_Number, Tok_Comma, Lit_Ident, Lit_Number, Tok_Newline,
      // the continuation line never opened a block, so there is no
      // dedent to drain
    ]
  );
}

#[test]
fn block_object_shape() {
  let src = indoc! {"
    set o
        name 1,
        age 2
    print o
  "};
  assert_eq!(
    kinds(src),
    [
      Kw_Set, Lit_Ident, Tok_Newline, Tok_Indent, Lit_Ident, Lit_Number, Tok_Comma,
      Lit_Ident, Lit_Number, Tok_Newline, Tok_Dedent, Lit_Ident, Lit_Ident, Tok_Newline,
    ]
  );
}

#[test]
fn number_normalization() {
  assert_eq!(
    lexemes("set n 1_000_000"),
    ["set", "n", "1000000", ""]
  );
  assert_eq!(lexemes("set n 0x10"), ["set", "n", "16", ""]);
  assert_eq!(lexemes("set n 0b1010"), ["set", "n", "10", ""]);
  assert_eq!(lexemes("set n 1.5e2"), ["set", "n", "1.5e2", ""]);
}

#[test]
fn out_of_range_hex_is_a_bad_number() {
  assert_eq!(
    error_kinds("set n 0xFFFF_FFFF_FFFF_FFFF_F"),
    [ErrorKind::BadNumber]
  );
}

#[test]
fn string_escapes() {
  assert_eq!(unescape(r#""a\tb\n""#), "a\tb\n");
  assert_eq!(unescape(r#""say \"hi\"""#), "say \"hi\"");
  assert_eq!(unescape(r#"r"a\tb""#), "a\\tb");
}

#[test]
fn invalid_escape_is_reported() {
  assert_eq!(error_kinds(r#"set s "a\qb""#), [ErrorKind::BadEscape]);
}

#[test]
fn unterminated_string_is_reported() {
  assert_eq!(
    error_kinds("set s \"oops\nset t 1\n"),
    [ErrorKind::UnterminatedString]
  );
}

#[test]
fn unknown_character_is_reported() {
  assert_eq!(error_kinds("set a 1 @ 2"), [ErrorKind::UnknownChar]);
}

#[test]
fn interpolation_markers_pass_through() {
  // `${...}` has no special meaning; the text is preserved verbatim
  assert_eq!(unescape(r#""hello ${name}""#), "hello ${name}");
}

#[test]
fn keywords_are_not_identifiers() {
  assert_eq!(
    kinds("undecidable extends new super this"),
    [
      Lit_Undecidable, Kw_Extends, Kw_New, Kw_Super, Kw_This, Tok_Newline,
    ]
  );
}

#[test]
fn operators() {
  assert_eq!(
    kinds("a = b != c <= d >= e & f | g"),
    [
      Lit_Ident, Op_Equal, Lit_Ident, Op_BangEqual, Lit_Ident, Op_LessEqual, Lit_Ident,
      Op_MoreEqual, Lit_Ident, Op_And, Lit_Ident, Op_Or, Lit_Ident, Tok_Newline,
    ]
  );
}

#[test]
fn indented_first_line_is_reported_as_indent() {
  let src = "    set x 1\n";
  let kinds = kinds(src);
  assert_eq!(kinds[0], Tok_Newline);
  assert_eq!(kinds[1], Tok_Indent);
}

#[test]
fn spans_reconstruct_the_source() {
  // every lexed (non-synthesized, non-normalized) token's span indexes
  // its own lexeme back out of the source
  let src = "set greeting \"hi\"\nif x > 1\n    print greeting\n";
  let lexer = Lexer::lex(src).unwrap();
  for token in lexer.tokens() {
    match token.kind {
      Tok_Newline | Tok_Indent | Tok_Dedent | Tok_Eof => continue,
      _ => assert_eq!(&src[token.span.start..token.span.end], token.lexeme.as_ref()),
    }
  }
}

#[test]
fn crlf_line_endings() {
  assert_eq!(
    kinds("set x 1\r\nset y 2\r\n"),
    [
      Kw_Set, Lit_Ident, Lit_Number, Tok_Newline, Kw_Set, Lit_Ident, Lit_Number, Tok_Newline,
    ]
  );
}
