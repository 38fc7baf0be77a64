//! Records, comments, and collections: the units of an output artifact.

use std::borrow::Cow;

use crate::codec::text::{encode_collection, encode_comment, encode_record};
use crate::error::RecordError;
use crate::model::{Identity, Properties, RecordRef, Value};

/// A tagged block of properties with optional identity and nested records.
///
/// Sub-records are owned by their parent and encoded immediately after the
/// parent's own properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: Cow<'static, str>,
    identity: Identity,
    properties: Properties,
    subrecords: Vec<Record>,
}

impl Record {
    /// Creates a record with no sub-records.
    pub fn new(
        type_name: impl Into<Cow<'static, str>>,
        identity: impl Into<Identity>,
        properties: Properties,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            identity: identity.into(),
            properties,
            subrecords: Vec::new(),
        }
    }

    /// Replaces the sub-records, returning the record.
    pub fn with_subrecords(mut self, subrecords: impl IntoIterator<Item = Record>) -> Self {
        self.subrecords = subrecords.into_iter().collect();
        self
    }

    /// Sets a property, returning the record.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.set(key, value);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Returns the record's own id, if it is named.
    pub fn id(&self) -> Option<&str> {
        self.identity.as_str()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn subrecords(&self) -> &[Record] {
        &self.subrecords
    }

    /// Appends a sub-record.
    pub fn push_subrecord(&mut self, record: Record) {
        self.subrecords.push(record);
    }

    /// Returns a reference to this record for use as a property value.
    pub fn reference(&self) -> Result<RecordRef, RecordError> {
        self.id()
            .map(RecordRef::new)
            .ok_or_else(|| RecordError::NotReferenceable {
                type_name: self.type_name.to_string(),
            })
    }

    /// Encodes the record in the bracketed block format.
    pub fn encode(&self) -> String {
        encode_record(self)
    }
}

/// Literal text emitted as `--` comment lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn encode(&self) -> String {
        encode_comment(self)
    }
}

/// A top-level member of a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Record(Record),
    Comment(Comment),
    Collection(Collection),
}

impl Item {
    pub fn encode(&self) -> String {
        match self {
            Item::Record(r) => r.encode(),
            Item::Comment(c) => c.encode(),
            Item::Collection(c) => c.encode(),
        }
    }
}

impl From<Record> for Item {
    fn from(r: Record) -> Self {
        Item::Record(r)
    }
}

impl From<Comment> for Item {
    fn from(c: Comment) -> Self {
        Item::Comment(c)
    }
}

impl From<Collection> for Item {
    fn from(c: Collection) -> Self {
        Item::Collection(c)
    }
}

/// An ordered sequence of top-level items forming one artifact.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    items: Vec<Item>,
}

impl Collection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection from existing items.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    /// Appends an item.
    pub fn push(&mut self, item: impl Into<Item>) {
        self.items.push(item.into());
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the top-level records, skipping comments and nested
    /// collections.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.items.iter().filter_map(|item| match item {
            Item::Record(r) => Some(r),
            _ => None,
        })
    }

    /// Finds the first named record with `id`, searching nested collections
    /// depth-first.
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.items.iter().find_map(|item| match item {
            Item::Record(r) if r.id() == Some(id) => Some(r),
            Item::Collection(c) => c.find(id),
            _ => None,
        })
    }

    /// Mutable form of [`Collection::find`].
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Record> {
        self.items.iter_mut().find_map(|item| match item {
            Item::Record(r) if r.id() == Some(id) => Some(r),
            Item::Collection(c) => c.find_mut(id),
            _ => None,
        })
    }

    /// Encodes every item, separated by a blank line.
    pub fn encode(&self) -> String {
        encode_collection(self)
    }
}
