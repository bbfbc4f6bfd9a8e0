//! Parsed values and keys.

#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

use crate::{Array, Span, Table};
use std::fmt;

/// A parsed value.
///
/// Strings borrow from the [`Arena`](crate::Arena) the document was parsed
/// with; arrays and tables own their children.
///
/// # Examples
///
/// ```
/// use conftree::{Arena, Value};
///
/// let arena = Arena::new();
/// let table = conftree::parse("n = 10", &arena)?;
/// match table.get("n") {
///     Some(Value::Integer(i)) => assert_eq!(*i, 10),
///     other => panic!("expected integer, found {other:?}"),
/// }
/// # Ok::<(), conftree::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'de> {
    /// A string value.
    String(&'de str),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit float.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// An array of values.
    Array(Array<'de>),
    /// A table, from an inline table, a dotted key or a section header.
    Table(Table<'de>),
}

impl<'de> Value<'de> {
    /// Returns the type name (e.g. `"string"`, `"integer"`, `"table"`).
    #[inline]
    pub fn type_str(&self) -> &'static str {
        match self {
            Value::String(..) => "string",
            Value::Integer(..) => "integer",
            Value::Float(..) => "float",
            Value::Boolean(..) => "boolean",
            Value::Array(..) => "array",
            Value::Table(..) => "table",
        }
    }

    /// Returns the string if this is a string value.
    #[inline]
    pub fn as_str(&self) -> Option<&'de str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer value.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float if this is a float value.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&Array<'de>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Array<'de>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn as_table(&self) -> Option<&Table<'de>> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_table_mut(&mut self) -> Option<&mut Table<'de>> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(..))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value<'_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::String(s) => ser.serialize_str(s),
            Value::Integer(i) => ser.serialize_i64(*i),
            Value::Float(f) => ser.serialize_f64(*f),
            Value::Boolean(b) => ser.serialize_bool(*b),
            Value::Array(arr) => arr.serialize(ser),
            Value::Table(tab) => tab.serialize(ser),
        }
    }
}

/// One segment of a key path, with its source span.
///
/// Keys appear as the first element in `(`[`Key`]`, `[`Value`]`)` entry pairs
/// when iterating over a [`Table`]. The name is a copy held by the arena.
#[derive(Copy, Clone)]
pub struct Key<'de> {
    /// The key name.
    pub name: &'de str,
    /// The byte-offset span of the key in the source document.
    pub span: Span,
}

impl<'de> Key<'de> {
    /// Creates a key without source location, for building tables by hand.
    pub fn new(name: &'de str) -> Self {
        Self {
            name,
            span: Span::default(),
        }
    }

    /// Returns the key name as a string slice.
    pub fn as_str(&self) -> &'de str {
        self.name
    }
}

impl std::borrow::Borrow<str> for Key<'_> {
    fn borrow(&self) -> &str {
        self.name
    }
}

impl fmt::Debug for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.name, f)
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl PartialEq for Key<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Key<'_> {}
