use super::*;

#[test]
fn steps_through_mixed_widths() {
    // 1, 2, 3 and 4 byte encodings.
    let mut c = Cursor::new("aé€𝄞");
    assert_eq!(c.next(), Some('a'));
    assert_eq!((c.byte_offset(), c.char_offset()), (1, 1));
    assert_eq!(c.next(), Some('é'));
    assert_eq!((c.byte_offset(), c.char_offset()), (3, 2));
    assert_eq!(c.next(), Some('€'));
    assert_eq!((c.byte_offset(), c.char_offset()), (6, 3));
    assert_eq!(c.next(), Some('𝄞'));
    assert_eq!((c.byte_offset(), c.char_offset()), (10, 4));
    assert!(c.is_eof());
    assert_eq!(c.next(), None);
    assert_eq!((c.byte_offset(), c.char_offset()), (10, 4));
}

#[test]
fn retreat_undoes_one_step() {
    let mut c = Cursor::new("x€y");
    c.next();
    assert_eq!(c.next(), Some('€'));
    c.retreat();
    assert_eq!((c.byte_offset(), c.char_offset()), (1, 1));
    assert_eq!(c.peek(), Some('€'));
    assert_eq!(c.next(), Some('€'));
    assert_eq!(c.next(), Some('y'));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "retreat without a preceding next")]
fn double_retreat_is_a_bug() {
    let mut c = Cursor::new("ab");
    c.next();
    c.next();
    c.retreat();
    c.retreat();
}

#[test]
fn checkpoint_and_eat() {
    let mut c = Cursor::new("\r\nz");
    let start = c.checkpoint();
    assert!(c.eat('\r'));
    assert!(!c.eat('z'));
    assert!(c.eat('\n'));
    c.restore(start);
    assert_eq!(c.byte_offset(), 0);
    assert_eq!(c.char_offset(), 0);
    assert_eq!(c.peek(), Some('\r'));
}
