//! Error types for record construction, parsing, and graph compilation.

use thiserror::Error;

use crate::model::AoeKind;

/// Error codes for line-record parse faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// P001: Block header has no closing bracket
    MissingBracket,
    /// P002: Block contains more than one closing bracket
    StrayBracket,
    /// P003: Field has no `=` separator
    MissingEquals,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "P001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MissingBracket => "P001",
            ErrorCode::StrayBracket => "P002",
            ErrorCode::MissingEquals => "P003",
        }
    }
}

/// Error while parsing line-record text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("[P001] block {block} has no closing `]`: {text:?}")]
    MissingBracket { block: usize, text: String },

    #[error("[P002] block {block} has more than one `]`: {text:?}")]
    StrayBracket { block: usize, text: String },

    #[error("[P003] field {field:?} in [{record}] has no `=`")]
    MissingEquals { record: String, field: String },
}

impl ParseError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::MissingBracket { .. } => ErrorCode::MissingBracket,
            ParseError::StrayBracket { .. } => ErrorCode::StrayBracket,
            ParseError::MissingEquals { .. } => ErrorCode::MissingEquals,
        }
    }
}

/// Error while constructing or patching records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("{record} expects an area of effect of kind {expected:?}, got {found:?}")]
    WrongAoeKind {
        record: &'static str,
        expected: AoeKind,
        found: AoeKind,
    },

    #[error("no record with id {id:?} in the active collections")]
    UnknownRecord { id: String },

    #[error("record [{type_name}] has no identity to reference")]
    NotReferenceable { type_name: String },

    #[error("no active collection to register into")]
    NoActiveCollection,
}

/// Error for argument checks on helper constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tick count must be greater than 0, got {count}")]
    NonPositiveTicks { count: i64 },

    #[error("end-of-turn count must be at least 1, got {count}")]
    EndOfTurnCount { count: i64 },

    #[error("journal entry {id:?} needs a title")]
    MissingTitle { id: String },
}

/// Error while rendering a description template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder {{{name}}} in {template:?}")]
    UnknownPlaceholder { name: String, template: String },

    #[error("unbalanced brace at byte {offset} in {template:?}")]
    UnbalancedBrace { offset: usize, template: String },
}

/// Error while expanding or compiling a transition graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {id:?} is not in the transition graph")]
    UnknownNode { id: String },

    #[error("synthetic node {id:?} collides with an existing node")]
    SyntheticIdCollision { id: String },

    #[error("{head} -> {tail} delays a {trigger} transition by {days} days; only newDay can be delayed")]
    DelayedNonDay {
        head: String,
        tail: String,
        trigger: String,
        days: u32,
    },

    #[error("{head} -> {tail} still carries a {days}-day delay; expand the graph before compiling")]
    UnexpandedDelay { head: String, tail: String, days: u32 },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Record(#[from] RecordError),
}
