//! Uniqueness-enforcing namespace tables.
//!
//! A platform has three independent namespaces: CSR indices, interrupt lines and
//! memory-map base addresses. Each is an append-only table in which both the
//! names and the values are unique. This module provides:
//! 1. **Tables:** `NamespaceTable<V>`, insertion-ordered and tagged with its namespace.
//! 2. **Merge:** All-or-nothing `merge` that rejects duplicate names or values.
//! 3. **Derivation:** `derive`, which builds a new table from a base plus an extension.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::common::{CompositionError, Conflict, Result};

/// Identifies a namespace in collision reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// Control/status register bank indices.
    Csr,
    /// Interrupt controller lines.
    Interrupt,
    /// Memory-map base addresses.
    Memory,
    /// Named constants handed to firmware and device-tree generation.
    Constant,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csr => "CSR",
            Self::Interrupt => "interrupt",
            Self::Memory => "memory map",
            Self::Constant => "constant",
        })
    }
}

/// An append-only mapping from unique names to unique values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceTable<V> {
    namespace: Namespace,
    entries: Vec<(String, V)>,
}

impl<V> NamespaceTable<V>
where
    V: Copy + PartialEq + fmt::Display,
{
    /// Creates an empty table for `namespace`.
    pub const fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            entries: Vec::new(),
        }
    }

    /// Creates a table from a list of entries, validating them like a merge.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Collision`] if the entries repeat a name or value.
    pub fn from_entries(namespace: Namespace, entries: &[(String, V)]) -> Result<Self> {
        Self::derive(&Self::new(namespace), entries)
    }

    /// Builds a new table holding `base` extended by `proposed`.
    ///
    /// `base` itself is not modified, so a failed derivation leaves the caller
    /// with its table intact.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Collision`] if `proposed` reuses a name or value
    /// of `base`, or repeats one of its own.
    pub fn derive(base: &Self, proposed: &[(String, V)]) -> Result<Self> {
        let mut derived = base.clone();
        derived.merge(proposed)?;
        Ok(derived)
    }

    /// Returns the namespace this table belongs to.
    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Returns the value claimed by `name`.
    pub fn get(&self, name: &str) -> Option<V> {
        self.entries.iter().find(|(n, _)| n == name).map(|&(_, v)| v)
    }

    /// Returns the name owning `value`.
    pub fn owner_of(&self, value: V) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| n.as_str())
    }

    /// Returns `true` if `name` is claimed.
    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Returns `true` if `value` is claimed.
    pub fn contains_value(&self, value: V) -> bool {
        self.entries.iter().any(|(_, v)| *v == value)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been claimed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in claim order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, V)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Validates `proposed` against the table without modifying it.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::MalformedInput`] for an empty name.
    /// * [`CompositionError::Collision`] for a name or value that is already
    ///   claimed, or that appears twice in `proposed`.
    pub fn check(&self, proposed: &[(String, V)]) -> Result<()> {
        for (i, (name, value)) in proposed.iter().enumerate() {
            if name.is_empty() {
                return Err(CompositionError::malformed("resource name", name.as_str()));
            }
            let earlier = &proposed[..i];
            if self.contains_name(name) || earlier.iter().any(|(n, _)| n == name) {
                return Err(self.collision(Conflict::Name(name.clone())));
            }
            if self.contains_value(*value) || earlier.iter().any(|(_, v)| v == value) {
                return Err(self.collision(Conflict::Value(value.to_string())));
            }
        }
        Ok(())
    }

    /// Claims every pair of `proposed`, or none of them.
    ///
    /// # Errors
    ///
    /// Same as [`NamespaceTable::check`]; the table is unchanged on error.
    pub fn merge(&mut self, proposed: &[(String, V)]) -> Result<()> {
        self.check(proposed)?;
        for (name, value) in proposed {
            tracing::debug!(namespace = %self.namespace, %name, %value, "claimed");
        }
        self.entries.extend_from_slice(proposed);
        Ok(())
    }

    fn collision(&self, conflict: Conflict) -> CompositionError {
        CompositionError::Collision {
            namespace: self.namespace,
            conflict,
        }
    }
}

impl NamespaceTable<u32> {
    /// Returns the lowest value below `limit` that is neither claimed nor in `reserved`.
    pub fn lowest_free(&self, limit: u32, reserved: &[u32]) -> Option<u32> {
        (0..limit).find(|v| !self.contains_value(*v) && !reserved.contains(v))
    }
}

impl<V: Serialize> Serialize for NamespaceTable<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(n, v)| (n, v)))
    }
}
