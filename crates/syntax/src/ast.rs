//! The ZEN syntax tree.
//!
//! Nodes are immutable once constructed and owned by their parent; the
//! root [`Module`] owns the whole tree. The one exception to plain
//! ownership is function bodies: a [`Func`] sits behind an `Rc` so that
//! a function value created at evaluation time can reference its
//! defining subtree without copying it and without tying runtime values
//! to the module's lifetime. Nothing downstream mutates the tree, so a
//! parsed module is shareable across reentrant calls.

use std::rc::Rc;

use span::{Span, Spanned};

pub type Ident = Spanned<Rc<str>>;

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Module {
  pub body: Vec<Stmt>,
}

impl Module {
  pub fn new() -> Self {
    Self { body: vec![] }
  }
}

impl Default for Module {
  fn default() -> Self {
    Self::new()
  }
}

pub type Stmt = Spanned<StmtKind>;

#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum StmtKind {
  Var(Box<Var>),
  SetField(Box<SetField>),
  Func(Rc<Func>),
  Class(Box<Class>),
  If(Box<If>),
  While(Box<While>),
  ForIn(Box<ForIn>),
  Ctrl(Box<Ctrl>),
  Expr(Box<Expr>),
  Import(Box<Import>),
  Noop,
}

/// `set name value`
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Var {
  pub name: Ident,
  pub value: Expr,
}

/// `set target.field value`. The target is always a `GetField`.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct SetField {
  pub target: Expr,
  pub value: Expr,
}

/// `function name params...` followed by an indented body. Also the
/// payload of a class member.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Func {
  pub name: Ident,
  pub params: Vec<Ident>,
  pub body: Vec<Stmt>,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Class {
  pub name: Ident,
  pub parent: Option<Ident>,
  pub members: Vec<Member>,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Member {
  pub private: bool,
  pub func: Rc<Func>,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct If {
  pub branches: Vec<Branch>,
  pub default: Option<Vec<Stmt>>,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Branch {
  pub cond: Expr,
  pub body: Vec<Stmt>,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct While {
  pub cond: Expr,
  pub body: Vec<Stmt>,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct ForIn {
  pub item: Ident,
  pub iter: Expr,
  pub body: Vec<Stmt>,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum Ctrl {
  Return(Option<Expr>),
  Break,
  Continue,
}

/// `import name` / `export name`. Recognized by the grammar, inert at
/// evaluation time.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Import {
  pub export: bool,
  pub name: Ident,
}

pub type Expr = Spanned<ExprKind>;

#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum ExprKind {
  Literal(Box<Literal>),
  Binary(Box<Binary>),
  Unary(Box<Unary>),
  GetVar(Box<GetVar>),
  Call(Box<Call>),
  GetField(Box<GetField>),
  New(Box<New>),
  GetSelf,
  GetSuper,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum Literal {
  Null,
  Undecidable,
  Bool(bool),
  Number(f64),
  String(Rc<str>),
  Array(Vec<Expr>),
  /// Entries preserve source order; a duplicate key overwrites its
  /// earlier entry at evaluation time.
  Object(Vec<(Ident, Expr)>),
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Binary {
  pub op: BinaryOp,
  pub left: Expr,
  pub right: Expr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Rem,
  Eq,
  Neq,
  Less,
  LessEq,
  More,
  MoreEq,
  And,
  Or,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Unary {
  pub op: UnaryOp,
  pub right: Expr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
  Neg,
  Not,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct GetVar {
  pub name: Ident,
}

/// A space-separated call: `name arg1 arg2 ...`. The callee is a name,
/// resolved at evaluation time against builtins, then functions, then
/// classes, then variables.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Call {
  pub name: Ident,
  pub args: Vec<Expr>,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct GetField {
  pub target: Expr,
  pub name: Ident,
}

/// `new ClassName args...`
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct New {
  pub class: Ident,
  pub args: Vec<Expr>,
}

pub fn var_stmt(s: impl Into<Span>, name: Ident, value: Expr) -> Stmt {
  Stmt::new(s, StmtKind::Var(Box::new(Var { name, value })))
}

pub fn set_field_stmt(s: impl Into<Span>, target: Expr, value: Expr) -> Stmt {
  Stmt::new(s, StmtKind::SetField(Box::new(SetField { target, value })))
}

pub fn func_stmt(s: impl Into<Span>, func: Func) -> Stmt {
  Stmt::new(s, StmtKind::Func(Rc::new(func)))
}

pub fn class_stmt(
  s: impl Into<Span>,
  name: Ident,
  parent: Option<Ident>,
  members: Vec<Member>,
) -> Stmt {
  Stmt::new(
    s,
    StmtKind::Class(Box::new(Class {
      name,
      parent,
      members,
    })),
  )
}

pub fn if_stmt(s: impl Into<Span>, branches: Vec<Branch>, default: Option<Vec<Stmt>>) -> Stmt {
  Stmt::new(s, StmtKind::If(Box::new(If { branches, default })))
}

pub fn branch(cond: Expr, body: Vec<Stmt>) -> Branch {
  Branch { cond, body }
}

pub fn while_stmt(s: impl Into<Span>, cond: Expr, body: Vec<Stmt>) -> Stmt {
  Stmt::new(s, StmtKind::While(Box::new(While { cond, body })))
}

pub fn for_in_stmt(s: impl Into<Span>, item: Ident, iter: Expr, body: Vec<Stmt>) -> Stmt {
  Stmt::new(s, StmtKind::ForIn(Box::new(ForIn { item, iter, body })))
}

pub fn return_stmt(s: impl Into<Span>, value: Option<Expr>) -> Stmt {
  Stmt::new(s, StmtKind::Ctrl(Box::new(Ctrl::Return(value))))
}

pub fn break_stmt(s: impl Into<Span>) -> Stmt {
  Stmt::new(s, StmtKind::Ctrl(Box::new(Ctrl::Break)))
}

pub fn continue_stmt(s: impl Into<Span>) -> Stmt {
  Stmt::new(s, StmtKind::Ctrl(Box::new(Ctrl::Continue)))
}

pub fn expr_stmt(expr: Expr) -> Stmt {
  Stmt::new(expr.span, StmtKind::Expr(Box::new(expr)))
}

pub fn import_stmt(s: impl Into<Span>, export: bool, name: Ident) -> Stmt {
  Stmt::new(s, StmtKind::Import(Box::new(Import { export, name })))
}

pub fn noop_stmt(s: impl Into<Span>) -> Stmt {
  Stmt::new(s, StmtKind::Noop)
}

pub fn expr_binary(s: impl Into<Span>, op: BinaryOp, left: Expr, right: Expr) -> Expr {
  Expr::new(s, ExprKind::Binary(Box::new(Binary { op, left, right })))
}

pub fn expr_unary(s: impl Into<Span>, op: UnaryOp, right: Expr) -> Expr {
  Expr::new(s, ExprKind::Unary(Box::new(Unary { op, right })))
}

pub fn expr_get_var(name: Ident) -> Expr {
  Expr::new(name.span, ExprKind::GetVar(Box::new(GetVar { name })))
}

pub fn expr_call(s: impl Into<Span>, name: Ident, args: Vec<Expr>) -> Expr {
  Expr::new(s, ExprKind::Call(Box::new(Call { name, args })))
}

pub fn expr_get_field(s: impl Into<Span>, target: Expr, name: Ident) -> Expr {
  Expr::new(s, ExprKind::GetField(Box::new(GetField { target, name })))
}

pub fn expr_new(s: impl Into<Span>, class: Ident, args: Vec<Expr>) -> Expr {
  Expr::new(s, ExprKind::New(Box::new(New { class, args })))
}

pub mod lit {
  use super::*;

  pub fn null(s: impl Into<Span>) -> Expr {
    Expr::new(s, ExprKind::Literal(Box::new(Literal::Null)))
  }

  pub fn undecidable(s: impl Into<Span>) -> Expr {
    Expr::new(s, ExprKind::Literal(Box::new(Literal::Undecidable)))
  }

  pub fn bool(s: impl Into<Span>, value: std::primitive::bool) -> Expr {
    Expr::new(s, ExprKind::Literal(Box::new(Literal::Bool(value))))
  }

  pub fn number(s: impl Into<Span>, value: f64) -> Expr {
    Expr::new(s, ExprKind::Literal(Box::new(Literal::Number(value))))
  }

  pub fn string(s: impl Into<Span>, value: Rc<str>) -> Expr {
    Expr::new(s, ExprKind::Literal(Box::new(Literal::String(value))))
  }

  pub fn array(s: impl Into<Span>, items: Vec<Expr>) -> Expr {
    Expr::new(s, ExprKind::Literal(Box::new(Literal::Array(items))))
  }

  pub fn object(s: impl Into<Span>, entries: Vec<(Ident, Expr)>) -> Expr {
    Expr::new(s, ExprKind::Literal(Box::new(Literal::Object(entries))))
  }
}
