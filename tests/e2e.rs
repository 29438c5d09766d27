use zen::{Value, Zen};

fn output_of(src: &str) -> String {
  let zen = Zen::with_io(Vec::<u8>::new());
  if let Err(e) = zen.eval(src) {
    panic!("program failed: {e}");
  }
  let bytes = zen.io::<Vec<u8>>().unwrap().clone();
  String::from_utf8(bytes).unwrap()
}

#[test]
fn recursion_end_to_end() {
  let src = r#"
function fib n
    if n < 2 then return n
    return (fib (n - 1)) + (fib (n - 2))

print (fib 10)
"#;
  assert_eq!(output_of(src), "55\n");
}

#[test]
fn classes_end_to_end() {
  let src = r#"
class Shape
    method constructor name
        set this.name name
    method describe
        return this.name

class Circle extends Shape
    method constructor r
        set this.name "circle"
        set this.r r
    method area
        return 3.14159 * this.r * this.r

set c new Circle 2
print c.describe
print (c.area > 12) & (c.area < 13)
"#;
  assert_eq!(output_of(src), "circle\ntrue\n");
}

#[test]
fn undecidable_logic_end_to_end() {
  let src = r#"
set verdict undecidable
if verdict
    print "guilty"
else
    print "not proven"
print (undecidable_or verdict true)
"#;
  assert_eq!(output_of(src), "not proven\ntrue\n");
}

#[test]
fn last_statement_is_the_module_value() {
  let zen = Zen::with_io(Vec::<u8>::new());
  assert_eq!(zen.eval("set x 20\nx * 2").unwrap(), Value::Number(40.0));
}

#[test]
fn errors_surface_with_their_kind() {
  let zen = Zen::with_io(Vec::<u8>::new());
  let err = zen.eval("print missing_thing").unwrap_err();
  match err {
    zen::Error::Runtime(e) => assert_eq!(e.kind, zen::ErrorKind::UndefinedName),
    other => panic!("expected a runtime error, got {other}"),
  }
}

#[test]
fn diagnostics_render_path_line_col() {
  let zen = Zen::with_io(Vec::<u8>::new());
  let src = "set x 1\nset y 1 % 0\n";
  let err = zen.eval(src).unwrap_err();
  let report = err.report(diag::Source::file("m.zen", src), false);
  assert!(report.starts_with("m.zen:2:"), "unexpected report: {report}");
  assert!(report.contains("DivisionByZero"));
}
