#[cfg(test)]
#[path = "./array_tests.rs"]
mod tests;

use crate::value::Value;
use std::fmt;

/// An ordered array of [`Value`]s.
#[derive(Clone, Default, PartialEq)]
pub struct Array<'de> {
    values: Vec<Value<'de>>,
}

impl<'de> Array<'de> {
    /// Creates an empty array.
    #[inline]
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Creates an array with pre-allocated capacity.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            values: Vec::with_capacity(cap),
        }
    }

    /// Appends a value to the end of the array.
    #[inline]
    pub fn push(&mut self, value: Value<'de>) {
        self.values.push(value);
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a reference to the element at the given index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value<'de>> {
        self.values.get(index)
    }

    /// Returns a mutable reference to the element at the given index.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value<'de>> {
        self.values.get_mut(index)
    }

    /// Returns an iterator over references to the elements.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Value<'de>> {
        self.values.iter()
    }

    /// Returns the contents as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Value<'de>] {
        &self.values
    }
}

impl fmt::Debug for Array<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

impl<'a, 'de> IntoIterator for &'a Array<'de> {
    type Item = &'a Value<'de>;
    type IntoIter = std::slice::Iter<'a, Value<'de>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<'de> IntoIterator for Array<'de> {
    type Item = Value<'de>;
    type IntoIter = std::vec::IntoIter<Value<'de>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'de> FromIterator<Value<'de>> for Array<'de> {
    fn from_iter<I: IntoIterator<Item = Value<'de>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Array<'_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = ser.serialize_seq(Some(self.len()))?;
        for ele in self {
            seq.serialize_element(ele)?;
        }
        seq.end()
    }
}
