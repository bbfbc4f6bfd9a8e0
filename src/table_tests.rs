use super::*;

fn key_at(name: &str, start: u32) -> Key<'_> {
    Key {
        name,
        span: Span::new(start, start + name.len() as u32),
    }
}

fn ival(i: i64) -> Value<'static> {
    Value::Integer(i)
}

// == insert / lookup =========================================================

#[test]
fn insert_preserves_order_and_allows_duplicates() {
    let mut t = Table::new();
    assert!(t.is_empty());
    t.insert(Key::new("b"), ival(1));
    t.insert(Key::new("a"), ival(2));
    // Plain insert does not check.
    t.insert(Key::new("b"), ival(3));

    assert_eq!(t.len(), 3);
    let names: Vec<&str> = t.keys().map(|k| k.name).collect();
    assert_eq!(names, ["b", "a", "b"]);
    // First match wins.
    assert_eq!(t.get("b").and_then(Value::as_integer), Some(1));
}

#[test]
fn lookup_is_byte_exact() {
    let mut t = Table::new();
    t.insert(Key::new("Name"), ival(1));
    assert!(t.contains_key("Name"));
    assert!(!t.contains_key("name"));
    assert!(!t.contains_key("Name "));
    assert!(t.get("").is_none());
}

#[test]
fn get_mut_and_get_key_value() {
    let mut t = Table::new();
    t.insert(key_at("x", 4), ival(1));

    if let Some(v) = t.get_mut("x") {
        *v = ival(10);
    }
    let (k, v) = t.get_key_value("x").unwrap();
    assert_eq!(k.span, Span::new(4, 5));
    assert_eq!(v.as_integer(), Some(10));
    assert!(t.get_mut("y").is_none());
}

#[test]
fn values_iter_and_into_iter() {
    let mut t = Table::new();
    t.insert(Key::new("a"), ival(1));
    t.insert(Key::new("b"), ival(2));

    let sum: i64 = t.values().filter_map(Value::as_integer).sum();
    assert_eq!(sum, 3);
    assert_eq!(t.iter().count(), 2);
    assert_eq!((&t).into_iter().count(), 2);

    let owned: Vec<(Key<'_>, Value<'_>)> = t.into_iter().collect();
    assert_eq!(owned[1].0.name, "b");
}

// == insert_path =============================================================

#[test]
fn insert_path_single_segment() {
    let mut t = Table::new();
    let v = t.insert_path(&[Key::new("k")], ival(1)).unwrap();
    assert_eq!(v.as_integer(), Some(1));
    assert_eq!(t.len(), 1);
}

#[test]
fn insert_path_creates_intermediate_tables() {
    let mut t = Table::new();
    t.insert_path(&[Key::new("a"), Key::new("b"), Key::new("c")], ival(1))
        .unwrap();
    t.insert_path(&[Key::new("a"), Key::new("d")], ival(2))
        .unwrap();

    let a = t.get("a").and_then(Value::as_table).unwrap();
    assert_eq!(a.len(), 2);
    let b = a.get("b").and_then(Value::as_table).unwrap();
    assert_eq!(b.get("c").and_then(Value::as_integer), Some(1));
    assert_eq!(a.get("d").and_then(Value::as_integer), Some(2));
}

#[test]
fn insert_path_returns_the_stored_value() {
    let mut t = Table::new();
    let slot = t
        .insert_path(&[Key::new("s"), Key::new("t")], Value::Table(Table::new()))
        .unwrap();
    slot.as_table_mut().unwrap().insert(Key::new("x"), ival(7));

    let s = t.get("s").and_then(Value::as_table).unwrap();
    let inner = s.get("t").and_then(Value::as_table).unwrap();
    assert_eq!(inner.get("x").and_then(Value::as_integer), Some(7));
}

#[test]
fn insert_path_rejects_duplicate_leaf() {
    let mut t = Table::new();
    t.insert_path(&[key_at("k", 0)], ival(1)).unwrap();
    let err = t.insert_path(&[key_at("k", 6)], ival(2)).unwrap_err();

    assert_eq!(
        err.kind,
        ErrorKind::DuplicateKey {
            key: "k".into(),
            first: Span::new(0, 1),
        }
    );
    assert_eq!(err.span, Span::new(6, 7));
    // The first value survives.
    assert_eq!(t.get("k").and_then(Value::as_integer), Some(1));
    assert_eq!(t.len(), 1);
}

#[test]
fn insert_path_rejects_duplicate_table_leaf() {
    let mut t = Table::new();
    t.insert_path(&[Key::new("a"), Key::new("b")], ival(1))
        .unwrap();
    let err = t
        .insert_path(&[Key::new("a")], Value::Table(Table::new()))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateKey { ref key, .. } if key == "a"));
}

#[test]
fn insert_path_through_non_table() {
    let mut t = Table::new();
    t.insert_path(&[key_at("a", 0)], ival(1)).unwrap();
    let err = t
        .insert_path(&[key_at("a", 10), key_at("b", 12)], ival(2))
        .unwrap_err();

    assert_eq!(
        err.kind,
        ErrorKind::DottedKeyInvalidType {
            key: "a".into(),
            first: Span::new(0, 1),
        }
    );
    assert_eq!(err.span, Span::new(10, 11));
}

#[test]
fn insert_path_empty_path_is_an_error() {
    let mut t = Table::new();
    let err = t.insert_path(&[], ival(1)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Wanted { .. }));
    assert!(t.is_empty());
}

#[test]
fn table_at_mut_follows_tables_only() {
    let mut t = Table::new();
    t.insert_path(&[Key::new("a"), Key::new("b"), Key::new("v")], ival(1))
        .unwrap();

    assert!(t.table_at_mut(&[]).is_some());
    let b = t.table_at_mut(&[Key::new("a"), Key::new("b")]).unwrap();
    b.insert(Key::new("w"), ival(2));
    assert!(t.table_at_mut(&[Key::new("a"), Key::new("b"), Key::new("v")]).is_none());
    assert!(t.table_at_mut(&[Key::new("missing")]).is_none());

    let a = t.get("a").and_then(Value::as_table).unwrap();
    let b = a.get("b").and_then(Value::as_table).unwrap();
    assert_eq!(b.len(), 2);
}

#[test]
fn debug_renders_as_map() {
    let mut t = Table::new();
    t.insert(Key::new("a"), ival(1));
    t.insert(Key::new("s"), Value::String("x"));
    assert_eq!(format!("{t:?}"), r#"{"a": Integer(1), "s": String("x")}"#);
}

#[test]
fn equality_ignores_key_spans() {
    let mut a = Table::new();
    a.insert(key_at("k", 0), ival(1));
    let mut b = Table::new();
    b.insert(key_at("k", 40), ival(1));
    assert_eq!(a, b);
}
