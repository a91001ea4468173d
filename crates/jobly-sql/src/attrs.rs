//! Ordered field/value bags.
//!
//! An [`AttributeBag`] is the sparse input to both compilers: the fields a
//! caller wants to change (updates) or constrain (filters). Insertion order is
//! the order placeholders are numbered in, so the bag is an explicit `Vec` of
//! pairs rather than a hash map.

use crate::error::{SqlError, SqlResult};
use crate::value::Value;

/// An ordered sequence of `(field, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeBag {
    entries: Vec<(String, Value)>,
}

impl AttributeBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set `field` to `value`.
    ///
    /// A field that is already present keeps its position and takes the new value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    /// Consuming counterpart of [`AttributeBag::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Build a bag from a JSON object, keeping its key order.
    ///
    /// Nested arrays and objects are rejected.
    pub fn from_json(json: serde_json::Value) -> SqlResult<Self> {
        match json {
            serde_json::Value::Object(map) => {
                let mut bag = Self::new();
                for (field, value) in map {
                    let value = Value::try_from(value).map_err(|e| match e {
                        SqlError::Validation(msg) => {
                            SqlError::Validation(format!("field '{field}': {msg}"))
                        }
                        other => other,
                    })?;
                    bag.insert(field, value);
                }
                Ok(bag)
            }
            other => Err(SqlError::validation(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeBag
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (k, v) in iter {
            bag.insert(k, v);
        }
        bag
    }
}

impl IntoIterator for AttributeBag {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
