//! Logical field name to column identifier mapping.
//!
//! API payloads use camel-case field names (`numEmployees`) while tables use
//! snake-case columns (`num_employees`). A [`NameMap`] is the fixed, per-entity
//! translation between the two and is meant to live in a `static`.
//!
//! Column identifiers are interpolated into SQL text unescaped, so every
//! identifier the compilers emit must come from a map entry or a fixed logical
//! field name, never from request input. [`NameMap::allow_list`] enforces that
//! by refusing fields it does not list.

use crate::error::{SqlError, SqlResult};

/// How fields missing from a [`NameMap`] are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Unmapped fields are used verbatim as the column name.
    Fallback,
    /// Unmapped fields are rejected with [`SqlError::UnknownField`].
    AllowList,
}

/// Static lookup from logical field name to physical column.
#[derive(Debug, Clone, Copy)]
pub struct NameMap<'a> {
    entries: &'a [(&'a str, &'a str)],
    policy: Policy,
}

impl<'a> NameMap<'a> {
    /// A map that falls back to the logical name for unmapped fields.
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self {
            entries,
            policy: Policy::Fallback,
        }
    }

    /// An empty fallback map: every field is its own column.
    pub const fn identity() -> Self {
        Self::new(&[])
    }

    /// A map that only admits the fields it lists.
    ///
    /// List fields whose column has the same name as identity pairs
    /// (`("title", "title")`).
    pub const fn allow_list(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self {
            entries,
            policy: Policy::AllowList,
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// The mapped column for `field`, if the map lists it.
    pub fn column_for(&self, field: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| *c)
    }

    /// Resolve the column for `field` according to the map's policy.
    pub fn resolve<'f>(&self, field: &'f str) -> SqlResult<&'f str>
    where
        'a: 'f,
    {
        match (self.column_for(field), self.policy) {
            (Some(column), _) => Ok(column),
            (None, Policy::Fallback) => Ok(field),
            (None, Policy::AllowList) => Err(SqlError::unknown_field(field)),
        }
    }

    /// Logical field names listed in the map, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }
}

impl Default for NameMap<'_> {
    fn default() -> Self {
        Self::identity()
    }
}
