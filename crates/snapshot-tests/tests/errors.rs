use snapshot_tests::{invalid, render_error};

#[test]
fn eof_positions() {
    invalid!("world = 1\r\n\r\nhello = ", @"3:9: unexpected EOF");
    invalid!("a = [1, 2", @"1:10: unexpected EOF");
    invalid!("t = { a = 1", @"1:12: unexpected EOF");
}

#[test]
fn syntax_errors() {
    invalid!("hello = [}", @"1:10: expected an expression, found a right brace");
    invalid!("= 1", @"1:1: expected a key or table header, found an equals");
    invalid!("a 1", @"1:3: expected '=', found an integer");
    invalid!("a = 1 2", @"1:7: expected a newline, found an integer");
    invalid!("[a = 1", @"1:4: expected ']', found an equals");
    invalid!("t = { a = 1 b = 2 }", @"1:13: expected '}', found an identifier");
    invalid!("a.= 1", @"1:3: expected an identifier, found an equals");
    invalid!("a = yes", @"1:5: unexpected identifier");
    invalid!("a = @", @"1:5: illegal character `@`");
}

#[test]
fn value_errors() {
    invalid!("a = 0x", @"1:5: invalid number");
    invalid!("a = 9223372036854775808", @"1:5: integer out of range");
    invalid!("a = \"abc", @"1:5: unterminated string");
    invalid!(r#"a = "x\qy""#, @"1:8: invalid escape character in string: `q`");
}

#[test]
fn semantic_errors() {
    invalid!("k = 1\nk = 2", @"2:1: cannot redefine key 'k'");
    invalid!("[a]\n[a]", @"2:2: cannot redefine key 'a'");
    invalid!("a = 1\n[a.b]", @"2:2: expected key 'a' to refer to a table");
    invalid!("t = {a=1, a=2}", @"1:11: cannot redefine key 'a'");
}

#[test]
fn unsupported_syntax() {
    invalid!("a = 'lit'", @"1:5: literal strings are not supported");
    invalid!("[[items]]", @"1:1: arrays of tables are not supported");
}

#[test]
fn invalid_utf8() {
    let arena = conftree::Arena::new();
    let err = conftree::parse_bytes(b"a = \"\xfe\"", &arena).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"1:6: invalid UTF-8");
}

#[test]
fn bounded_rendering() {
    let arena = conftree::Arena::new();
    let err = conftree::parse("k = 1\nk = 2", &arena).unwrap_err();
    let mut buf = [0u8; 20];
    insta::assert_snapshot!(err.write_to(&mut buf), @"2:1: cannot redefine");
}

#[test]
fn duplicate_key_diagnostic() {
    let out = render_error("dup", "k = 1\nk = 2\n");
    assert!(out.contains("error[duplicate-key]: cannot redefine key 'k'"), "{out}");
    assert!(out.contains("dup:2:1"), "{out}");
    assert!(out.contains("first key instance"), "{out}");
    assert!(out.contains("duplicate key"), "{out}");
}

#[test]
fn dotted_key_diagnostic() {
    let out = render_error("dotted", "a = 1\na.b = 2\n");
    assert!(
        out.contains("error[dotted-key-invalid-type]: expected key 'a' to refer to a table"),
        "{out}"
    );
    assert!(out.contains("dotted:2:1"), "{out}");
    assert!(out.contains("non-table"), "{out}");
}

#[test]
fn eof_diagnostic() {
    let out = render_error("eof", "hello = ");
    assert!(out.contains("error[unexpected-eof]: unexpected EOF"), "{out}");
    assert!(out.contains("input ends here"), "{out}");
}
