//! Text encoding and parsing of the bracketed block format.

pub mod parser;
pub mod text;

pub use parser::{parse, parse_value, TYPE_KEY};
pub use text::{
    encode_collection, encode_collection_with_options, encode_comment, encode_record,
    encode_record_with_options, EncodeOptions, TextWriter,
};
