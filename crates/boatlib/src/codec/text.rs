//! Text encoder for the bracketed block format.
//!
//! ```text
//! [ItemType]
//!     ID=turnip;
//!     name=Turnip;
//! [ItemReaction]
//!     ID=turnip;
//!     element=smash;
//! ```
//!
//! Each record opens with `[TypeName]`. The `ID=` line comes first when the
//! record is named, or when it inherits the id of the named record that owns
//! it. Properties follow in insertion order, one line per non-null scalar;
//! list values repeat the key. Sub-records follow with their own headers.
//! Collection members are separated by one blank line.

use std::fmt::{self, Display, Write as _};

use crate::model::{Collection, Comment, Identity, Item, Record};

/// Indentation of property lines in the engine's format.
pub const DEFAULT_INDENT: usize = 4;

/// Prefix of a comment line.
pub const COMMENT_MARKER: &str = "--";

/// Options for text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Number of spaces before each property line.
    pub indent: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

/// Line-oriented writer for one block of output.
#[derive(Debug, Clone)]
pub struct TextWriter {
    buf: String,
    indent: String,
}

impl TextWriter {
    pub fn new(options: &EncodeOptions) -> Self {
        Self {
            buf: String::new(),
            indent: " ".repeat(options.indent),
        }
    }

    fn newline(&mut self) {
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
    }

    /// Writes a `[TypeName]` header line.
    pub fn header(&mut self, type_name: &str) {
        self.newline();
        self.buf.push('[');
        self.buf.push_str(type_name);
        self.buf.push(']');
    }

    /// Writes an indented `key=value;` line.
    pub fn field(&mut self, key: &str, value: &dyn Display) {
        self.newline();
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{}{key}={value};", self.indent);
    }

    /// Writes a `-- text` comment line.
    pub fn comment(&mut self, line: &str) {
        self.newline();
        self.buf.push_str(COMMENT_MARKER);
        self.buf.push(' ');
        self.buf.push_str(line);
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Encodes a record with default options.
pub fn encode_record(record: &Record) -> String {
    encode_record_with_options(record, &EncodeOptions::default())
}

/// Encodes a record and its sub-records.
pub fn encode_record_with_options(record: &Record, options: &EncodeOptions) -> String {
    let mut writer = TextWriter::new(options);
    write_record(&mut writer, record, None);
    writer.finish()
}

fn write_record(writer: &mut TextWriter, record: &Record, owner: Option<&str>) {
    writer.header(record.type_name());

    let context = match record.identity() {
        Identity::Named(id) => Some(id.as_str()),
        Identity::Inherited | Identity::Absent => owner,
    };
    if !matches!(record.identity(), Identity::Absent) {
        if let Some(id) = context {
            writer.field("ID", &id);
        }
    }

    for (key, value) in record.properties().iter() {
        for scalar in value.scalars() {
            writer.field(key, scalar);
        }
    }

    for sub in record.subrecords() {
        write_record(writer, sub, context);
    }
}

/// Encodes a comment, one `--` line per line of text.
pub fn encode_comment(comment: &Comment) -> String {
    let mut writer = TextWriter::new(&EncodeOptions::default());
    for line in comment.text().split('\n') {
        writer.comment(line.trim());
    }
    writer.finish()
}

/// Encodes a collection with default options.
pub fn encode_collection(collection: &Collection) -> String {
    encode_collection_with_options(collection, &EncodeOptions::default())
}

/// Encodes every member of a collection, separated by a blank line.
pub fn encode_collection_with_options(collection: &Collection, options: &EncodeOptions) -> String {
    collection
        .items()
        .iter()
        .map(|item| encode_item(item, options))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn encode_item(item: &Item, options: &EncodeOptions) -> String {
    match item {
        Item::Record(r) => encode_record_with_options(r, options),
        Item::Comment(c) => encode_comment(c),
        Item::Collection(c) => encode_collection_with_options(c, options),
    }
}

/// Displays a record in the text format.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_record(self))
    }
}
