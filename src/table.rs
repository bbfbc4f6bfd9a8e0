#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;

use crate::Span;
use crate::error::{Error, ErrorKind};
use crate::value::{Key, Value};
use std::fmt;

/// An ordered list of key/value entries at one nesting level.
///
/// Entries keep insertion order. Lookup is a linear scan comparing key bytes,
/// which is case-sensitive and never folds or normalizes names.
///
/// # Examples
///
/// ```
/// let arena = conftree::Arena::new();
/// let table = conftree::parse("server.port = 8080\nname = \"x\"", &arena)?;
///
/// let server = table.get("server").and_then(|v| v.as_table()).unwrap();
/// assert_eq!(server.get("port").and_then(|v| v.as_integer()), Some(8080));
/// assert!(table.contains_key("name"));
/// assert!(!table.contains_key("Name"));
/// # Ok::<(), conftree::Error>(())
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct Table<'de> {
    entries: Vec<(Key<'de>, Value<'de>)>,
}

impl<'de> Table<'de> {
    /// Creates an empty table.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an entry without checking for an existing key.
    ///
    /// Use [`insert_path`](Self::insert_path) to reject duplicates.
    pub fn insert(&mut self, key: Key<'de>, value: Value<'de>) -> &mut (Key<'de>, Value<'de>) {
        let index = self.entries.len();
        self.entries.push((key, value));
        &mut self.entries[index]
    }

    /// Inserts `value` under a dotted key path, creating intermediate tables
    /// as needed, and returns a reference to the stored value.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::DottedKeyInvalidType`] if an intermediate segment names
    ///   a value that is not a table.
    /// - [`ErrorKind::DuplicateKey`] if the final segment already exists.
    ///
    /// The error span points at the offending segment; the `first` span in
    /// the kind points at the existing definition.
    pub fn insert_path(
        &mut self,
        path: &[Key<'de>],
        value: Value<'de>,
    ) -> Result<&mut Value<'de>, Error> {
        let Some((leaf, parents)) = path.split_last() else {
            return Err(Error::from((
                ErrorKind::Wanted {
                    expected: "an identifier",
                    found: "an empty key",
                },
                Span::default(),
            )));
        };

        let mut table = self;
        for segment in parents {
            let index = match table.find_index(segment.name) {
                Some(index) => index,
                None => {
                    table.insert(*segment, Value::Table(Table::new()));
                    table.entries.len() - 1
                }
            };
            let (existing, slot) = &mut table.entries[index];
            table = match slot {
                Value::Table(sub) => sub,
                _ => {
                    return Err(Error::from((
                        ErrorKind::DottedKeyInvalidType {
                            key: segment.name.to_owned(),
                            first: existing.span,
                        },
                        segment.span,
                    )));
                }
            };
        }

        if let Some(index) = table.find_index(leaf.name) {
            return Err(Error::from((
                ErrorKind::DuplicateKey {
                    key: leaf.name.to_owned(),
                    first: table.entries[index].0.span,
                },
                leaf.span,
            )));
        }
        Ok(&mut table.insert(*leaf, value).1)
    }

    /// Follows `path` through nested tables, returning the table it names.
    pub(crate) fn table_at_mut(&mut self, path: &[Key<'de>]) -> Option<&mut Table<'de>> {
        let mut table = self;
        for segment in path {
            table = table.get_mut(segment.name)?.as_table_mut()?;
        }
        Some(table)
    }

    fn find_index(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key.name == name)
    }

    /// Returns a reference to the value for `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value<'de>> {
        self.get_key_value(name).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value for `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value<'de>> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key.name == name)
            .map(|(_, value)| value)
    }

    /// Returns both key and value for `name`.
    pub fn get_key_value(&self, name: &str) -> Option<(&Key<'de>, &Value<'de>)> {
        self.entries
            .iter()
            .find(|(key, _)| key.name == name)
            .map(|(key, value)| (key, value))
    }

    /// Returns `true` if the table contains `name`.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }

    /// Returns an iterator over the entries in insertion order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, (Key<'de>, Value<'de>)> {
        self.entries.iter()
    }

    /// Returns an iterator over the keys in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Key<'de>> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in insertion order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value<'de>> + '_ {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Returns the entries as a slice.
    #[inline]
    pub fn entries(&self) -> &[(Key<'de>, Value<'de>)] {
        &self.entries
    }
}

impl fmt::Debug for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<'a, 'de> IntoIterator for &'a Table<'de> {
    type Item = &'a (Key<'de>, Value<'de>);
    type IntoIter = std::slice::Iter<'a, (Key<'de>, Value<'de>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'de> IntoIterator for Table<'de> {
    type Item = (Key<'de>, Value<'de>);
    type IntoIter = std::vec::IntoIter<(Key<'de>, Value<'de>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Table<'_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = ser.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k.name, v)?;
        }
        map.end()
    }
}
