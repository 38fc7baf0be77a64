//! Transition graphs: states of an entity and the triggers that move it
//! between them.
//!
//! Authoring code builds a [`TransitionGraph`], [`expand`]s its delayed
//! transitions into day chains, then compiles it into records with
//! [`compile`] or [`compile_records`].

pub mod compile;
pub mod expand;
pub mod template;
pub mod transition;

pub use compile::{compile, compile_records, CompileOptions, DEFAULT_SENTINEL};
pub use expand::{expand, is_expanded, ExpandOptions, SyntheticIdScheme};
pub use transition::{StateNode, Transition, TransitionGraph, Trigger};
