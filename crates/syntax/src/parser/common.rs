use super::*;

impl<'src> Parser<'src> {
  pub(super) fn ident(&mut self) -> Result<ast::Ident> {
    self.expect(Lit_Ident)?;
    let token = self.previous();
    Ok(ast::Ident::new(token.span, token.lexeme.as_ref().into()))
  }

  /// True when `kind` can begin an expression atom. This is the set that
  /// decides whether an identifier opens a space-separated call; binary
  /// operators and statement terminators are deliberately excluded so
  /// that `x + 1` reads the identifier as a variable.
  pub(super) fn starts_atom(kind: TokenKind) -> bool {
    matches!(
      kind,
      Lit_Number
        | Lit_String
        | Lit_Ident
        | Lit_Bool
        | Lit_Null
        | Lit_Undecidable
        | Brk_ParenL
        | Brk_SquareL
        | Brk_CurlyL
        | Kw_New
        | Kw_This
        | Kw_Super
    )
  }
}
