use super::*;

#[test]
fn locate_counts_lines_and_code_points() {
    let input = "a = 1\nbé = [\n  x";
    assert_eq!(locate(input, 0), (1, 1));
    assert_eq!(locate(input, 4), (1, 5));
    assert_eq!(locate(input, 5), (1, 6));
    assert_eq!(locate(input, 6), (2, 1));
    // `é` is two bytes but one column.
    assert_eq!(locate(input, 9), (2, 3));
    assert_eq!(locate(input, input.len()), (3, 4));
}

#[test]
fn locate_treats_crlf_as_one_break() {
    let input = "world = 1\r\n\r\nhello = ";
    assert_eq!(locate(input, 0), (1, 1));
    assert_eq!(locate(input, 13), (3, 1));
    assert_eq!(locate(input, input.len()), (3, 9));
}

#[test]
fn locate_clamps_past_the_end() {
    assert_eq!(locate("ab", 99), (1, 3));
    assert_eq!(locate("", 0), (1, 1));
}

#[test]
fn diagnostic_fits() {
    let mut buf = [0u8; 64];
    let text = write_diagnostic(&mut buf, 3, 9, "unexpected EOF");
    assert_eq!(text, "3:9: unexpected EOF");
}

#[test]
fn diagnostic_truncates_silently() {
    let mut buf = [0u8; 8];
    assert_eq!(write_diagnostic(&mut buf, 12, 4, "expected '='"), "12:4: ex");

    let mut empty = [0u8; 0];
    assert_eq!(write_diagnostic(&mut empty, 1, 1, "anything"), "");
}

#[test]
fn truncation_keeps_utf8_intact() {
    // "1:1: " is 5 bytes, then `ü` needs two more.
    let mut buf = [0u8; 6];
    assert_eq!(write_diagnostic(&mut buf, 1, 1, "über"), "1:1: ");

    let mut buf = [0u8; 7];
    assert_eq!(write_diagnostic(&mut buf, 1, 1, "über"), "1:1: ü");
}
