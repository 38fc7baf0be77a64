//! Compiler for bracketed line-record game content.
//!
//! Content is described as in-memory records and emitted in the engine's
//! block format:
//!
//! ```text
//! [ItemType]
//!     ID=turnip;
//!     name=Turnip;
//! [ItemReaction]
//!     ID=turnip;
//!     element=smash;
//!     newID=turnip_seeds;
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use boatlib::graph::{compile, expand, CompileOptions, ExpandOptions, Transition, TransitionGraph, Trigger};
//! use boatlib::{Properties, RecordContext};
//!
//! let mut graph = TransitionGraph::new();
//! graph.add_transition("seeds", "seeds_watered", Transition::new(Trigger::Water));
//! graph.add_transition(
//!     "seeds_watered",
//!     "sprout",
//!     Transition::new(Trigger::NewDay)
//!         .days(3)
//!         .description("It will sprout in {days} day{s}."),
//! );
//! graph.set_properties("seeds", Properties::new().with("name", "Seeds"));
//!
//! let graph = expand(graph, &ExpandOptions::default()).unwrap();
//!
//! let mut ctx = RecordContext::new();
//! let (collection, _) = ctx
//!     .collect(|ctx| compile(&graph, &CompileOptions::default(), ctx))
//!     .unwrap();
//!
//! let text = collection.encode();
//! assert!(text.starts_with("[ItemType]\n    ID=seeds;\n    name=Seeds;"));
//! assert!(text.contains("description=It will sprout in 2 days."));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Records, collections, the record context and builders
//! - [`codec`]: Text encoder and line-record parser
//! - [`graph`]: Transition graphs, the day-chain expander and the compiler
//! - [`error`]: Error types

pub mod codec;
pub mod error;
pub mod graph;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{encode_collection, encode_record, parse, EncodeOptions};
pub use error::{ErrorCode, GraphError, ParseError, RecordError, TemplateError, ValidationError};
pub use model::{
    generate_id, Collection, Comment, Duration, Identity, Item, Properties, Record, RecordContext,
    RecordRef, Registration, Value,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
