//! Turns an expanded transition graph into item records.
//!
//! Every state becomes an `[ItemType]` carrying the state's property bag, with
//! one `[ItemReaction]` per distinct target state:
//!
//! ```text
//! [ItemType]
//!     ID=turnip_seeds;
//!     name=Turnip Seeds;
//! [ItemReaction]
//!     ID=turnip_seeds;
//!     element=water;
//!     newID=turnip_seeds_watered;
//! ```
//!
//! When several transitions join the same pair of states only the first one
//! added is compiled.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::{GraphError, RecordError};
use crate::graph::transition::TransitionGraph;
use crate::model::builder::{item_reaction, ItemTypeBuilder};
use crate::model::{Properties, Record, RecordContext, RecordRef, Registration, Value};

/// Id of the reserved terminal state.
pub const DEFAULT_SENTINEL: &str = "X";

/// Options for [`compile_records`] and [`compile`].
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// State that is never emitted.
    pub sentinel: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }
}

/// Builds one record per state, in state order.
pub fn compile_records(graph: &TransitionGraph, options: &CompileOptions) -> Result<Vec<Record>, GraphError> {
    let mut records = Vec::with_capacity(graph.node_count());

    for id in graph.node_ids() {
        if id == options.sentinel {
            continue;
        }

        let mut seen = FxHashSet::default();
        let mut reactions = Vec::new();
        for (tail, t) in graph.transitions_from(id) {
            if let Some(days) = t.delay() {
                return Err(GraphError::UnexpandedDelay {
                    head: id.to_string(),
                    tail: tail.to_string(),
                    days,
                });
            }
            if !seen.insert(tail) {
                continue;
            }
            reactions.push(item_reaction(
                Properties::new()
                    .with("element", t.trigger.as_str())
                    .with("newID", tail)
                    .with("spawnItem", t.spawn_item.clone().unwrap_or(Value::Null))
                    .with("action", t.action.clone()),
            ));
        }

        let bag = graph.properties(id).cloned().unwrap_or_default();
        records.push(
            ItemTypeBuilder::new(id)
                .properties(bag)
                .reactions(reactions)
                .build(),
        );
    }

    debug!(records = records.len(), "compiled transition graph");
    Ok(records)
}

/// Compiles `graph` and registers every record in the active collection.
///
/// Nothing is registered if compilation fails.
pub fn compile(
    graph: &TransitionGraph,
    options: &CompileOptions,
    ctx: &mut RecordContext,
) -> Result<Vec<RecordRef>, GraphError> {
    if ctx.current().is_none() {
        return Err(RecordError::NoActiveCollection.into());
    }
    let records = compile_records(graph, options)?;
    let mut refs = Vec::with_capacity(records.len());
    for record in records {
        match ctx.register(record) {
            Registration::Registered(r) => refs.push(r),
            Registration::Detached(_) => return Err(RecordError::NoActiveCollection.into()),
        }
    }
    Ok(refs)
}
