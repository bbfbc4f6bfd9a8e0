use super::*;
use TokenKind::*;

fn tokens(input: &str) -> Vec<(TokenKind, &str)> {
    let mut t = Tokenizer::new(input);
    let mut out = Vec::new();
    while let Some(token) = t.next_token() {
        out.push((token.kind, t.slice(token.span)));
    }
    out
}

fn kinds(input: &str) -> Vec<TokenKind> {
    tokens(input).into_iter().map(|(k, _)| k).collect()
}

#[test]
fn structural_tokens() {
    assert_eq!(
        kinds("[]{}=,."),
        [LeftBracket, RightBracket, LeftBrace, RightBrace, Equals, Comma, Dot]
    );
    assert_eq!(
        tokens("[ a.b ]"),
        [
            (LeftBracket, "["),
            (Identifier, "a"),
            (Dot, "."),
            (Identifier, "b"),
            (RightBracket, "]"),
        ]
    );
}

#[test]
fn newlines_and_carriage_returns() {
    assert_eq!(tokens("a\nb"), [(Identifier, "a"), (Newline, "\n"), (Identifier, "b")]);
    assert_eq!(tokens("a\r\nb"), [(Identifier, "a"), (Newline, "\r\n"), (Identifier, "b")]);
    assert_eq!(tokens("a\rb"), [(Identifier, "a"), (Illegal, "\r"), (Identifier, "b")]);
    assert_eq!(tokens("\r"), [(Illegal, "\r")]);
}

#[test]
fn comments_are_invisible() {
    assert_eq!(
        tokens("a = 1 # trailing [x] = \"y\"\n# whole line\nb"),
        [
            (Identifier, "a"),
            (Equals, "="),
            (Integer, "1"),
            (Newline, "\n"),
            (Newline, "\n"),
            (Identifier, "b"),
        ]
    );
    assert!(kinds("# only a comment").is_empty());
    assert_eq!(kinds("#c\r\n"), [Newline]);
}

#[test]
fn strings() {
    assert_eq!(tokens(r#""hello""#), [(String, "hello")]);
    assert_eq!(tokens(r#""""#), [(String, "")]);
    assert_eq!(tokens(r#""say \"hi\"" x"#), [(String, r#"say \"hi\""#), (Identifier, "x")]);
    assert_eq!(tokens(r#""ends with \\" y"#), [(String, r#"ends with \\"#), (Identifier, "y")]);
    assert_eq!(tokens("\"never closed"), [(UnterminatedString, "\"never closed")]);
    assert_eq!(tokens("\"trailing escape\\"), [(UnterminatedString, "\"trailing escape\\")]);
    assert_eq!(tokens("'lit'"), [(SingleQuote, "'"), (Identifier, "lit"), (SingleQuote, "'")]);
}

#[test]
fn numerals() {
    let cases = [
        ("0", Integer, "0"),
        ("2005", Integer, "2005"),
        ("1_000", Integer, "1_000"),
        ("0b1101", Integer, "0b1101"),
        ("0o777", Integer, "0o777"),
        ("0xaBcD", Integer, "0xaBcD"),
        ("+17", Integer, "+17"),
        ("-17", Integer, "-17"),
        ("3.25", Float, "3.25"),
        ("1e10", Float, "1e10"),
        ("6.5E-3", Float, "6.5E-3"),
        ("-2.5e+2", Float, "-2.5e+2"),
    ];
    for (input, kind, text) in cases {
        assert_eq!(tokens(input), [(kind, text)], "input: {input}");
    }
}

#[test]
fn numeral_stops_at_first_foreign_character() {
    assert_eq!(tokens("0b102"), [(Integer, "0b10"), (Integer, "2")]);
    assert_eq!(tokens("0o78"), [(Integer, "0o7"), (Integer, "8")]);
    assert_eq!(tokens("12abc"), [(Integer, "12"), (Identifier, "abc")]);
    assert_eq!(tokens("1.x"), [(Integer, "1"), (Dot, "."), (Identifier, "x")]);
    assert_eq!(tokens("1e"), [(Integer, "1"), (Identifier, "e")]);
    assert_eq!(tokens("5,"), [(Integer, "5"), (Comma, ",")]);
    assert_eq!(tokens("-x"), [(Illegal, "-"), (Identifier, "x")]);
}

#[test]
fn identifiers() {
    assert_eq!(
        tokens("key_one key-two true inf x9"),
        [
            (Identifier, "key_one"),
            (Identifier, "key-two"),
            (Identifier, "true"),
            (Identifier, "inf"),
            (Identifier, "x9"),
        ]
    );
}

#[test]
fn illegal_characters_cover_the_whole_code_point() {
    assert_eq!(tokens("é"), [(Illegal, "é")]);
    assert_eq!(tokens("@ a"), [(Illegal, "@"), (Identifier, "a")]);
    assert_eq!(tokens("_a"), [(Illegal, "_"), (Identifier, "a")]);
}

#[test]
fn peek_does_not_consume() {
    let mut t = Tokenizer::new("  key = 1");
    let peeked = t.peek_token().unwrap();
    let next = t.next_token().unwrap();
    assert_eq!(peeked, next);
    assert_eq!(next.span, Span::new(2, 5));

    assert_eq!(t.next_token().unwrap().kind, Equals);
    assert_eq!(t.next_token().unwrap().kind, Integer);
    assert_eq!(t.peek_token(), None);
    assert_eq!(t.next_token(), None);
}
