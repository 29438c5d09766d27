use indoc::indoc;

use super::*;
use crate::ast::{BinaryOp, ExprKind, Literal, StmtKind, UnaryOp};

fn parse_ok(src: &str) -> ast::Module {
  match parse(src) {
    Ok(module) => module,
    Err(errors) => panic!("failed to parse {src:?}: {errors:?}"),
  }
}

fn parse_err(src: &str) -> Vec<ErrorKind> {
  match parse(src) {
    Ok(_) => panic!("expected {src:?} to fail"),
    Err(errors) => errors.into_iter().map(|e| e.kind).collect(),
  }
}

fn only_stmt(module: &ast::Module) -> &StmtKind {
  assert_eq!(module.body.len(), 1, "expected exactly one statement");
  &module.body[0]
}

fn var_value(module: &ast::Module) -> &ExprKind {
  match only_stmt(module) {
    StmtKind::Var(v) => &v.value,
    other => panic!("expected a `set` statement, got {other:?}"),
  }
}

#[test]
fn parse_is_deterministic() {
  let src = indoc! {"
    set x 42
    function add a b
        return a + b
    print (add x 3)
  "};
  assert_eq!(parse_ok(src), parse_ok(src));
}

#[test]
fn set_parses_a_plain_expression() {
  let module = parse_ok("set x 42");
  match var_value(&module) {
    ExprKind::Literal(lit) => assert_eq!(**lit, Literal::Number(42.0)),
    other => panic!("unexpected value {other:?}"),
  }
}

#[test]
fn set_with_commas_is_an_array_literal() {
  let module = parse_ok("set xs 1, 2, 3");
  match var_value(&module) {
    ExprKind::Literal(lit) => match &**lit {
      Literal::Array(items) => assert_eq!(items.len(), 3),
      other => panic!("expected array, got {other:?}"),
    },
    other => panic!("unexpected value {other:?}"),
  }
}

#[test]
fn bracketed_array_with_trailing_comma() {
  let module = parse_ok("set xs [1, 2, 3,]");
  match var_value(&module) {
    ExprKind::Literal(lit) => match &**lit {
      Literal::Array(items) => assert_eq!(items.len(), 3),
      other => panic!("expected array, got {other:?}"),
    },
    other => panic!("unexpected value {other:?}"),
  }
}

#[test]
fn key_value_pairs_are_an_object_literal() {
  let module = parse_ok("set o name \"Alice\", age 30");
  match var_value(&module) {
    ExprKind::Literal(lit) => match &**lit {
      Literal::Object(entries) => {
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0.as_ref(), "name");
        assert_eq!(entries[1].0.as_ref(), "age");
      }
      other => panic!("expected object, got {other:?}"),
    },
    other => panic!("unexpected value {other:?}"),
  }
}

#[test]
fn duplicate_keys_survive_parsing_in_order() {
  // the overwrite happens at evaluation time; the parser keeps both
  let module = parse_ok("set o a 1, b 2, a 3");
  match var_value(&module) {
    ExprKind::Literal(lit) => match &**lit {
      Literal::Object(entries) => {
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_ref()).collect();
        assert_eq!(keys, ["a", "b", "a"]);
      }
      other => panic!("expected object, got {other:?}"),
    },
    other => panic!("unexpected value {other:?}"),
  }
}

#[test]
fn object_without_comma_is_a_call() {
  // tie-break: `ID expr` with no comma after it is a function call
  let module = parse_ok("set o a 1");
  match var_value(&module) {
    ExprKind::Call(call) => {
      assert_eq!(call.name.as_ref(), "a");
      assert_eq!(call.args.len(), 1);
    }
    other => panic!("expected call, got {other:?}"),
  }
}

#[test]
fn block_object_literal() {
  let src = indoc! {"
    set point
        x 1,
        y 2
  "};
  let module = parse_ok(src);
  match var_value(&module) {
    ExprKind::Literal(lit) => match &**lit {
      Literal::Object(entries) => {
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0.as_ref(), "x");
        assert_eq!(entries[1].0.as_ref(), "y");
      }
      other => panic!("expected object, got {other:?}"),
    },
    other => panic!("unexpected value {other:?}"),
  }
}

#[test]
fn brace_object_literal() {
  let module = parse_ok("set o {a 1, b 2}");
  match var_value(&module) {
    ExprKind::Literal(lit) => assert!(matches!(&**lit, Literal::Object(e) if e.len() == 2)),
    other => panic!("unexpected value {other:?}"),
  }
}

#[test]
fn space_call_collects_arguments() {
  let module = parse_ok("add 2 3");
  match only_stmt(&module) {
    StmtKind::Expr(expr) => match &***expr {
      ExprKind::Call(call) => {
        assert_eq!(call.name.as_ref(), "add");
        assert_eq!(call.args.len(), 2);
      }
      other => panic!("expected call, got {other:?}"),
    },
    other => panic!("expected expression statement, got {other:?}"),
  }
}

#[test]
fn identifier_arguments_do_not_nest_calls() {
  // `f g 1` is f(g, 1); nested calls require parentheses
  let module = parse_ok("f g 1");
  match only_stmt(&module) {
    StmtKind::Expr(expr) => match &***expr {
      ExprKind::Call(call) => {
        assert_eq!(call.args.len(), 2);
        assert!(matches!(&*call.args[0], ExprKind::GetVar(_)));
        assert!(matches!(&*call.args[1], ExprKind::Literal(_)));
      }
      other => panic!("expected call, got {other:?}"),
    },
    other => panic!("expected expression statement, got {other:?}"),
  }
}

#[test]
fn parenthesized_call_argument() {
  let module = parse_ok("print (add 2 3)");
  match only_stmt(&module) {
    StmtKind::Expr(expr) => match &***expr {
      ExprKind::Call(call) => {
        assert_eq!(call.name.as_ref(), "print");
        assert_eq!(call.args.len(), 1);
        assert!(matches!(&*call.args[0], ExprKind::Call(_)));
      }
      other => panic!("expected call, got {other:?}"),
    },
    other => panic!("expected expression statement, got {other:?}"),
  }
}

#[test]
fn bare_identifier_statement_is_a_zero_argument_call() {
  let module = parse_ok("f");
  match only_stmt(&module) {
    StmtKind::Expr(expr) => match &***expr {
      ExprKind::Call(call) => assert!(call.args.is_empty()),
      other => panic!("expected call, got {other:?}"),
    },
    other => panic!("expected expression statement, got {other:?}"),
  }
}

#[test]
fn identifier_before_operator_is_a_variable() {
  let module = parse_ok("x + 1");
  match only_stmt(&module) {
    StmtKind::Expr(expr) => match &***expr {
      ExprKind::Binary(b) => {
        assert_eq!(b.op, BinaryOp::Add);
        assert!(matches!(&*b.left, ExprKind::GetVar(_)));
      }
      other => panic!("expected binary, got {other:?}"),
    },
    other => panic!("expected expression statement, got {other:?}"),
  }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
  let module = parse_ok("set v 1 + 2 * 3");
  match var_value(&module) {
    ExprKind::Binary(add) => {
      assert_eq!(add.op, BinaryOp::Add);
      match &*add.right {
        ExprKind::Binary(mul) => assert_eq!(mul.op, BinaryOp::Mul),
        other => panic!("expected `*` on the right, got {other:?}"),
      }
    }
    other => panic!("expected binary, got {other:?}"),
  }
}

#[test]
fn comparison_binds_tighter_than_logic() {
  let module = parse_ok("set v a < b & c > d");
  match var_value(&module) {
    ExprKind::Binary(and) => {
      assert_eq!(and.op, BinaryOp::And);
      assert!(matches!(&*and.left, ExprKind::Binary(b) if b.op == BinaryOp::Less));
      assert!(matches!(&*and.right, ExprKind::Binary(b) if b.op == BinaryOp::More));
    }
    other => panic!("expected binary, got {other:?}"),
  }
}

#[test]
fn unary_operators() {
  let module = parse_ok("set v !true");
  match var_value(&module) {
    ExprKind::Unary(u) => assert_eq!(u.op, UnaryOp::Not),
    other => panic!("expected unary, got {other:?}"),
  }
  let module = parse_ok("set v -x");
  match var_value(&module) {
    ExprKind::Unary(u) => assert_eq!(u.op, UnaryOp::Neg),
    other => panic!("expected unary, got {other:?}"),
  }
}

#[test]
fn property_access_chains() {
  let module = parse_ok("set v a.b.c");
  match var_value(&module) {
    ExprKind::GetField(outer) => {
      assert_eq!(outer.name.as_ref(), "c");
      assert!(matches!(&*outer.target, ExprKind::GetField(_)));
    }
    other => panic!("expected field access, got {other:?}"),
  }
}

#[test]
fn numeric_property_access() {
  let module = parse_ok("set v xs.0");
  match var_value(&module) {
    ExprKind::GetField(field) => assert_eq!(field.name.as_ref(), "0"),
    other => panic!("expected field access, got {other:?}"),
  }
}

#[test]
fn statement_block_requires_indentation() {
  assert_eq!(parse_err("set x 1\n    set y 1"), [ErrorKind::UnexpectedToken]);
  parse_ok("function f\n    set y 1");
}

#[test]
fn if_elif_else_chain() {
  let src = indoc! {"
    if a
        set x 1
    elif b
        set x 2
    else
        set x 3
  "};
  let module = parse_ok(src);
  match only_stmt(&module) {
    StmtKind::If(node) => {
      assert_eq!(node.branches.len(), 2);
      assert!(node.default.is_some());
    }
    other => panic!("expected if, got {other:?}"),
  }
}

#[test]
fn single_line_if_with_then() {
  let module = parse_ok("if x > 0 then print x");
  match only_stmt(&module) {
    StmtKind::If(node) => {
      assert_eq!(node.branches.len(), 1);
      assert_eq!(node.branches[0].body.len(), 1);
    }
    other => panic!("expected if, got {other:?}"),
  }
}

#[test]
fn while_loop_with_control_flow() {
  let src = indoc! {"
    while n > 0
        if n = 2
            break
        set n n - 1
  "};
  parse_ok(src);
}

#[test]
fn for_in_loop() {
  let module = parse_ok("for i in [1,2,3]\n    print i");
  match only_stmt(&module) {
    StmtKind::ForIn(node) => {
      assert_eq!(node.item.as_ref(), "i");
      assert_eq!(node.body.len(), 1);
    }
    other => panic!("expected for, got {other:?}"),
  }
}

#[test]
fn function_definition_records_parameters() {
  let module = parse_ok("function add a b\n    return a + b");
  match only_stmt(&module) {
    StmtKind::Func(func) => {
      assert_eq!(func.name.as_ref(), "add");
      assert_eq!(func.params.len(), 2);
    }
    other => panic!("expected function, got {other:?}"),
  }
}

#[test]
fn duplicate_parameters_are_rejected() {
  assert_eq!(
    parse_err("function f a a\n    return a"),
    [ErrorKind::UnexpectedToken]
  );
}

#[test]
fn class_with_members_and_inheritance() {
  let src = indoc! {"
    class A
        method greet
            return \"hi\"
        private function helper x
            return x
    class B extends A
  "};
  let module = parse_ok(src);
  assert_eq!(module.body.len(), 2);
  match &*module.body[0] {
    StmtKind::Class(class) => {
      assert_eq!(class.name.as_ref(), "A");
      assert!(class.parent.is_none());
      assert_eq!(class.members.len(), 2);
      assert!(!class.members[0].private);
      assert!(class.members[1].private);
    }
    other => panic!("expected class, got {other:?}"),
  }
  match &*module.body[1] {
    StmtKind::Class(class) => {
      assert_eq!(class.parent.as_ref().map(|p| p.as_ref()), Some("A"));
      assert!(class.members.is_empty());
    }
    other => panic!("expected class, got {other:?}"),
  }
}

#[test]
fn new_expression() {
  let module = parse_ok("set p new Point 1 2");
  match var_value(&module) {
    ExprKind::New(node) => {
      assert_eq!(node.class.as_ref(), "Point");
      assert_eq!(node.args.len(), 2);
    }
    other => panic!("expected new, got {other:?}"),
  }
}

#[test]
fn this_and_super_require_a_method() {
  assert_eq!(parse_err("set v this"), [ErrorKind::UnexpectedToken]);
  assert_eq!(parse_err("set v super"), [ErrorKind::UnexpectedToken]);
  assert_eq!(
    parse_err("class A\n    method m\n        return super.m"),
    [ErrorKind::UnexpectedToken]
  );
  parse_ok("class B extends A\n    method m\n        return super.m");
}

#[test]
fn return_break_continue_need_their_context() {
  assert_eq!(parse_err("return 1"), [ErrorKind::UnexpectedToken]);
  assert_eq!(parse_err("break"), [ErrorKind::UnexpectedToken]);
  assert_eq!(parse_err("continue"), [ErrorKind::UnexpectedToken]);
}

#[test]
fn stray_equals_is_rejected() {
  // `=` is equality; it is not an assignment operator
  assert_eq!(parse_err("set x = 1"), [ErrorKind::UnexpectedToken]);
}

#[test]
fn unmatched_delimiter() {
  assert_eq!(parse_err("set x (1 + 2"), [ErrorKind::UnmatchedDelimiter]);
  assert_eq!(parse_err("set xs [1, 2"), [ErrorKind::UnmatchedDelimiter]);
}

#[test]
fn bad_object_literal_after_commitment() {
  assert_eq!(parse_err("set o a 1, 2"), [ErrorKind::BadObjectLiteral]);
}

#[test]
fn recovery_reports_every_broken_statement() {
  let src = indoc! {"
    set x = 1
    set y 2
    set z = 3
  "};
  let errors = parse_err(src);
  assert_eq!(errors.len(), 2);
  assert!(errors.iter().all(|k| *k == ErrorKind::UnexpectedToken));
}

#[test]
fn dotted_set_assigns_a_property() {
  let module = parse_ok("set o.name \"Bob\"");
  match only_stmt(&module) {
    StmtKind::SetField(node) => {
      assert!(matches!(&*node.target, ExprKind::GetField(_)));
    }
    other => panic!("expected property assignment, got {other:?}"),
  }

  let src = indoc! {"
    class Point
        method constructor x
            set this.x x
  "};
  parse_ok(src);
}

#[test]
fn import_and_export_directives() {
  let module = parse_ok("import math\nexport helper");
  assert_eq!(module.body.len(), 2);
  assert!(matches!(&*module.body[0], StmtKind::Import(i) if !i.export));
  assert!(matches!(&*module.body[1], StmtKind::Import(i) if i.export));
}
