//! Record identities.
//!
//! A record either names itself, borrows the identity of the record that owns
//! it, or carries no identity at all.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Generates a fresh identifier: `prefix` followed by a v4 UUID as 32
/// lowercase hex digits without hyphens.
pub fn generate_id(prefix: &str) -> String {
    let mut id = String::with_capacity(prefix.len() + 32);
    id.push_str(prefix);
    id.push_str(&Uuid::new_v4().simple().to_string());
    id
}

/// Identity of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Identity {
    /// No `ID=` line is ever emitted and the record never registers.
    Absent,
    /// Emits the id of the enclosing named record when nested.
    ///
    /// Reactions, trigger effects and areas of effect use this: the engine
    /// attaches them to their owner by repeating the owner's id.
    #[default]
    Inherited,
    /// An explicit id. The record registers into the active collection.
    Named(String),
}

impl Identity {
    /// Creates a named identity.
    pub fn named(id: impl Into<String>) -> Self {
        Identity::Named(id.into())
    }

    /// Returns the record's own id, if it has one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Identity::Named(id) => Some(id),
            _ => None,
        }
    }

    /// Returns true if this identity registers into an active collection.
    pub fn is_named(&self) -> bool {
        matches!(self, Identity::Named(_))
    }
}

impl From<&str> for Identity {
    fn from(id: &str) -> Self {
        Identity::Named(id.to_string())
    }
}

impl From<String> for Identity {
    fn from(id: String) -> Self {
        Identity::Named(id)
    }
}

impl From<Option<String>> for Identity {
    fn from(id: Option<String>) -> Self {
        id.map_or(Identity::Inherited, Identity::Named)
    }
}

/// A reference to a named record, rendered as the record's id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordRef(String);

impl RecordRef {
    /// Creates a reference to the record with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the referenced id.
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
