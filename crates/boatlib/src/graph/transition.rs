//! Transition graph over entity states.
//!
//! Nodes are state ids carrying an optional property bag. Edges are
//! [`Transition`]s: a trigger plus optional day delay, spawned items, action,
//! description template and redirects. Parallel edges between the same pair of
//! states are allowed.
//!
//! Adjacency is reported in insertion order. Every edge carries a sequence
//! number so that order survives removals and index reuse in the underlying
//! [`StableDiGraph`].

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use petgraph::dot::Dot;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use crate::model::{Properties, Value};

/// The event that fires a transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trigger {
    Smash,
    Slash,
    Water,
    Use,
    /// Fires once per in-game day.
    NewDay,
    Growth,
    Custom(String),
}

impl Trigger {
    /// Returns the engine's name for the trigger.
    pub fn as_str(&self) -> &str {
        match self {
            Trigger::Smash => "smash",
            Trigger::Slash => "slash",
            Trigger::Water => "water",
            Trigger::Use => "use",
            Trigger::NewDay => "newDay",
            Trigger::Growth => "growth",
            Trigger::Custom(name) => name,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trigger {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Trigger::from(s))
    }
}

impl From<&str> for Trigger {
    fn from(s: &str) -> Self {
        match s {
            "smash" => Trigger::Smash,
            "slash" => Trigger::Slash,
            "water" => Trigger::Water,
            "use" => Trigger::Use,
            "newDay" => Trigger::NewDay,
            "growth" => Trigger::Growth,
            other => Trigger::Custom(other.to_string()),
        }
    }
}

/// Attributes of one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub trigger: Trigger,
    /// Number of days the transition takes. Only values above 1 delay it.
    pub days: Option<u32>,
    pub spawn_item: Option<Value>,
    pub action: Option<String>,
    /// Description template rendered onto each waiting state.
    pub description: Option<String>,
    /// Alternate targets taken from a waiting state, by trigger.
    pub redirects: Vec<(Trigger, String)>,
}

impl Transition {
    pub fn new(trigger: impl Into<Trigger>) -> Self {
        Self {
            trigger: trigger.into(),
            days: None,
            spawn_item: None,
            action: None,
            description: None,
            redirects: Vec::new(),
        }
    }

    pub fn days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    pub fn spawn_item(mut self, item: impl Into<Value>) -> Self {
        self.spawn_item = Some(item.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn description(mut self, template: impl Into<String>) -> Self {
        self.description = Some(template.into());
        self
    }

    /// Adds a redirect. A later redirect for the same trigger replaces the
    /// earlier one.
    pub fn redirect(mut self, trigger: impl Into<Trigger>, target: impl Into<String>) -> Self {
        let trigger = trigger.into();
        let target = target.into();
        match self.redirects.iter_mut().find(|(t, _)| *t == trigger) {
            Some(slot) => slot.1 = target,
            None => self.redirects.push((trigger, target)),
        }
        self
    }

    /// Returns the day count if it spans more than one day.
    pub fn delay(&self) -> Option<u32> {
        self.days.filter(|&d| d > 1)
    }
}

/// A state in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct StateNode {
    pub id: String,
    pub properties: Option<Properties>,
}

impl fmt::Display for StateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TransitionEdge {
    seq: u64,
    pub(crate) transition: Transition,
}

impl fmt::Display for TransitionEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.transition.trigger, f)
    }
}

/// Directed multigraph of states and transitions.
#[derive(Debug, Clone, Default)]
pub struct TransitionGraph {
    graph: StableDiGraph<StateNode, TransitionEdge>,
    index: FxHashMap<String, NodeIndex>,
    next_seq: u64,
}

impl TransitionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state, or returns the existing one with that id.
    pub fn add_node(&mut self, id: impl Into<String>) -> NodeIndex {
        let id = id.into();
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(StateNode {
            id: id.clone(),
            properties: None,
        });
        self.index.insert(id, idx);
        idx
    }

    /// Replaces a state's property bag, adding the state if needed.
    pub fn set_properties(&mut self, id: impl Into<String>, properties: Properties) {
        let idx = self.add_node(id);
        self.graph[idx].properties = Some(properties);
    }

    pub fn properties(&self, id: &str) -> Option<&Properties> {
        self.node(id).and_then(|n| n.properties.as_ref())
    }

    /// Returns a state's property bag, creating an empty one if absent.
    pub(crate) fn properties_entry(&mut self, idx: NodeIndex) -> &mut Properties {
        self.graph[idx].properties.get_or_insert_with(Properties::new)
    }

    pub fn node(&self, id: &str) -> Option<&StateNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &StateNode {
        &self.graph[idx]
    }

    /// Adds a transition, adding either state if needed.
    pub fn add_transition(
        &mut self,
        head: impl Into<String>,
        tail: impl Into<String>,
        transition: Transition,
    ) -> EdgeIndex {
        let head = self.add_node(head);
        let tail = self.add_node(tail);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.graph.add_edge(head, tail, TransitionEdge { seq, transition })
    }

    pub(crate) fn remove_transition(&mut self, edge: EdgeIndex) -> Option<Transition> {
        self.graph.remove_edge(edge).map(|e| e.transition)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// State ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.node_indices().map(|idx| self.graph[idx].id.as_str())
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        // Nodes are never removed, so index order is insertion order.
        self.graph.node_indices()
    }

    pub(crate) fn outgoing(&self, idx: NodeIndex) -> Vec<(EdgeIndex, NodeIndex, &Transition)> {
        let mut edges: Vec<_> = self.graph.edges(idx).collect();
        edges.sort_by_key(|e| e.weight().seq);
        edges
            .into_iter()
            .map(|e| (e.id(), e.target(), &e.weight().transition))
            .collect()
    }

    /// Outgoing transitions of a state in insertion order, with target ids.
    pub fn transitions_from(&self, id: &str) -> Vec<(&str, &Transition)> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        self.outgoing(idx)
            .into_iter()
            .map(|(_, tail, t)| (self.graph[tail].id.as_str(), t))
            .collect()
    }

    /// Every transition as `(head, tail, transition)` in insertion order.
    pub fn transitions(&self) -> Vec<(&str, &str, &Transition)> {
        let mut edges: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        edges.sort_by_key(|&e| self.graph[e].seq);
        edges
            .into_iter()
            .filter_map(|e| {
                let (head, tail) = self.graph.edge_endpoints(e)?;
                Some((
                    self.graph[head].id.as_str(),
                    self.graph[tail].id.as_str(),
                    &self.graph[e].transition,
                ))
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Renders the graph as Graphviz DOT. Nodes are labelled with their id
    /// and edges with their trigger.
    pub fn to_dot(&self) -> String {
        Dot::new(&self.graph).to_string()
    }
}
