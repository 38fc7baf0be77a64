//! Unrolls delayed transitions into explicit day chains.
//!
//! A `newDay` transition from `head` to `tail` taking `n > 1` days becomes
//! `n - 1` synthetic waiting states and `n` one-day edges:
//!
//! ```text
//! head --newDay--> w1 --newDay--> ... --newDay--> w(n-1) --newDay--> tail
//! ```
//!
//! Each waiting state clones the state before it, is hidden from listings and
//! does not inherit reactions. Redirects declared on the delayed transition
//! become edges from every waiting state, so the chain can be interrupted at
//! any point. Only the last edge of the chain spawns items and carries the
//! transition's action.
//!
//! Redirect edges are added before the last `newDay` edge. A redirect whose
//! target is the chain's tail therefore shadows that edge once compiled, since
//! the compiler keeps the first transition per target. Such redirects are
//! logged as warnings.
//!
//! Transitions of at most one day are left as they are, so expanding an
//! already expanded graph is a no-op.

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::error::GraphError;
use crate::graph::template;
use crate::graph::transition::{Transition, TransitionGraph, Trigger};
use crate::model::Properties;

/// How ids of waiting states are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyntheticIdScheme {
    /// `{head}__day{k}` for the `k`-th waiting state.
    #[default]
    DayIndexed,
    /// Appends `_` to the previous state's id: `a_`, `a__`, ...
    Suffix,
}

impl SyntheticIdScheme {
    /// Returns the id of the `step`-th waiting state after `head`.
    pub fn synthetic_id(self, head: &str, previous: &str, step: u32) -> String {
        match self {
            SyntheticIdScheme::DayIndexed => format!("{head}__day{step}"),
            SyntheticIdScheme::Suffix => format!("{previous}_"),
        }
    }
}

/// Options for [`expand`].
#[derive(Debug, Clone, Default)]
pub struct ExpandOptions {
    pub scheme: SyntheticIdScheme,
}

struct DelayedEdge {
    edge: EdgeIndex,
    head: NodeIndex,
    tail: NodeIndex,
    days: u32,
    transition: Transition,
}

/// Returns `graph` with every delayed transition unrolled.
pub fn expand(mut graph: TransitionGraph, options: &ExpandOptions) -> Result<TransitionGraph, GraphError> {
    let delayed = delayed_edges(&graph)?;
    if delayed.is_empty() {
        return Ok(graph);
    }

    let mut reserved = FxHashSet::default();
    let mut new_edges: Vec<(String, String, Transition)> = Vec::new();
    let mut new_nodes: Vec<(String, Properties)> = Vec::new();

    for delayed in &delayed {
        let head = graph.node_at(delayed.head).id.clone();
        let tail = graph.node_at(delayed.tail).id.clone();
        let t = &delayed.transition;

        for (trigger, target) in &t.redirects {
            if !graph.contains(target) {
                return Err(GraphError::UnknownNode { id: target.clone() });
            }
            if *target == tail {
                warn!(
                    head = %head,
                    tail = %tail,
                    trigger = %trigger,
                    "redirect targets the chain's tail; the last waiting state keeps only the redirect"
                );
            }
        }

        if let Some(description) = &t.description {
            let bag = graph.properties(&head);
            let text = template::render(description, delayed.days, bag)?;
            graph.properties_entry(delayed.head).set("description", text);
        }

        let mut previous = head.clone();
        for step in 1..delayed.days {
            let id = options.scheme.synthetic_id(&head, &previous, step);
            if graph.contains(&id) || !reserved.insert(id.clone()) {
                return Err(GraphError::SyntheticIdCollision { id });
            }

            let mut bag = Properties::new()
                .with("cloneFrom", previous.clone())
                .with("special", vec!["dontCloneReactions"])
                .with("itemCategory", "hide");
            if let Some(description) = &t.description {
                let text = template::render(description, delayed.days - step, graph.properties(&head))?;
                bag.set("description", text);
            }
            new_nodes.push((id.clone(), bag));

            new_edges.push((previous, id.clone(), Transition::new(Trigger::NewDay)));
            for (trigger, target) in &t.redirects {
                new_edges.push((id.clone(), target.clone(), Transition::new(trigger.clone())));
            }
            previous = id;
        }

        let mut last = Transition::new(Trigger::NewDay);
        last.spawn_item = t.spawn_item.clone().filter(|v| !v.is_null());
        last.action = t.action.clone();
        new_edges.push((previous, tail.clone(), last));

        debug!(
            head = %head,
            tail = %tail,
            days = delayed.days,
            redirects = t.redirects.len(),
            "unrolled delayed transition"
        );
    }

    for delayed in &delayed {
        graph.remove_transition(delayed.edge);
    }
    for (head, tail, transition) in new_edges {
        graph.add_transition(head, tail, transition);
    }
    for (id, bag) in new_nodes {
        graph.set_properties(id, bag);
    }

    Ok(graph)
}

/// Finds delayed transitions in node order, then adjacency order.
fn delayed_edges(graph: &TransitionGraph) -> Result<Vec<DelayedEdge>, GraphError> {
    let mut delayed = Vec::new();
    for head in graph.node_indices() {
        for (edge, tail, transition) in graph.outgoing(head) {
            let Some(days) = transition.delay() else {
                continue;
            };
            if transition.trigger != Trigger::NewDay {
                return Err(GraphError::DelayedNonDay {
                    head: graph.node_at(head).id.clone(),
                    tail: graph.node_at(tail).id.clone(),
                    trigger: transition.trigger.to_string(),
                    days,
                });
            }
            delayed.push(DelayedEdge {
                edge,
                head,
                tail,
                days,
                transition: transition.clone(),
            });
        }
    }
    Ok(delayed)
}

/// Returns true if no transition in `graph` spans more than one day.
pub fn is_expanded(graph: &TransitionGraph) -> bool {
    graph.transitions().iter().all(|(_, _, t)| t.delay().is_none())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::model::Value;

    fn ids(graph: &TransitionGraph) -> Vec<&str> {
        graph.node_ids().collect()
    }

    fn edges(graph: &TransitionGraph) -> Vec<(String, String, String)> {
        graph
            .transitions()
            .into_iter()
            .map(|(h, t, tr)| (h.to_string(), t.to_string(), tr.trigger.to_string()))
            .collect()
    }

    fn edge(h: &str, t: &str, trigger: &str) -> (String, String, String) {
        (h.to_string(), t.to_string(), trigger.to_string())
    }

    fn suffix() -> ExpandOptions {
        ExpandOptions {
            scheme: SyntheticIdScheme::Suffix,
        }
    }

    #[test]
    fn test_three_day_chain_suffix_ids() {
        let mut g = TransitionGraph::new();
        g.add_transition("a", "b", Transition::new(Trigger::NewDay).days(3));
        let g = expand(g, &suffix()).unwrap();

        assert_eq!(ids(&g), vec!["a", "b", "a_", "a__"]);
        assert_eq!(
            edges(&g),
            vec![
                edge("a", "a_", "newDay"),
                edge("a_", "a__", "newDay"),
                edge("a__", "b", "newDay"),
            ]
        );
        assert!(is_expanded(&g));
    }

    #[test]
    fn test_day_indexed_ids() {
        let mut g = TransitionGraph::new();
        g.add_transition("a", "b", Transition::new(Trigger::NewDay).days(3));
        let g = expand(g, &ExpandOptions::default()).unwrap();
        assert_eq!(ids(&g), vec!["a", "b", "a__day1", "a__day2"]);
        assert_eq!(
            g.properties("a__day2").and_then(|p| p.get("cloneFrom")),
            Some(&Value::from("a__day1"))
        );
    }

    #[test]
    fn test_synthetic_properties_and_descriptions() {
        let mut g = TransitionGraph::new();
        g.add_transition(
            "seeds",
            "sprout",
            Transition::new(Trigger::NewDay)
                .days(3)
                .description("It will sprout in {days} day{s}."),
        );
        g.set_properties("seeds", Properties::new().with("name", "Seeds"));
        let g = expand(g, &ExpandOptions::default()).unwrap();

        assert_eq!(
            g.properties("seeds").and_then(|p| p.get("description")),
            Some(&Value::from("It will sprout in 3 days."))
        );
        let first = g.properties("seeds__day1").unwrap();
        let keys: Vec<_> = first.keys().collect();
        assert_eq!(keys, vec!["cloneFrom", "special", "itemCategory", "description"]);
        assert_eq!(first.get("cloneFrom"), Some(&Value::from("seeds")));
        assert_eq!(first.get("special"), Some(&Value::from(vec!["dontCloneReactions"])));
        assert_eq!(first.get("itemCategory"), Some(&Value::from("hide")));
        assert_eq!(
            first.get("description"),
            Some(&Value::from("It will sprout in 2 days."))
        );
        assert_eq!(
            g.properties("seeds__day2").and_then(|p| p.get("description")),
            Some(&Value::from("It will sprout in 1 day."))
        );
    }

    #[test]
    fn test_head_bag_created_for_description() {
        let mut g = TransitionGraph::new();
        g.add_transition("a", "b", Transition::new(Trigger::NewDay).days(2).description("{days}"));
        let g = expand(g, &ExpandOptions::default()).unwrap();
        assert_eq!(
            g.properties("a").and_then(|p| p.get("description")),
            Some(&Value::from("2"))
        );
    }

    #[test]
    fn test_redirects_from_every_waiting_state() {
        let mut g = TransitionGraph::new();
        g.add_transition("sprout", "dead", Transition::new(Trigger::Growth));
        g.add_transition(
            "sprout",
            "plant",
            Transition::new(Trigger::NewDay).days(3).redirect(Trigger::Growth, "dead"),
        );
        let g = expand(g, &suffix()).unwrap();

        assert_eq!(
            edges(&g),
            vec![
                edge("sprout", "dead", "growth"),
                edge("sprout", "sprout_", "newDay"),
                edge("sprout_", "dead", "growth"),
                edge("sprout_", "sprout__", "newDay"),
                edge("sprout__", "dead", "growth"),
                edge("sprout__", "plant", "newDay"),
            ]
        );
        // The head keeps only its own transitions.
        assert_eq!(g.transitions_from("sprout").len(), 2);
        assert!(g.transitions_from("plant").is_empty());
    }

    #[test]
    fn test_redirect_to_tail_precedes_last_edge() {
        let mut g = TransitionGraph::new();
        g.add_transition(
            "a",
            "b",
            Transition::new(Trigger::NewDay).days(2).redirect(Trigger::Growth, "b"),
        );
        let g = expand(g, &ExpandOptions::default()).unwrap();
        let from_waiting: Vec<_> = g
            .transitions_from("a__day1")
            .into_iter()
            .map(|(tail, t)| (tail, t.trigger.to_string()))
            .collect();
        assert_eq!(
            from_waiting,
            vec![("b", "growth".to_string()), ("b", "newDay".to_string())]
        );
    }

    #[test]
    fn test_spawn_only_on_last_edge() {
        let mut g = TransitionGraph::new();
        g.add_transition(
            "bush_watered",
            "bush",
            Transition::new(Trigger::NewDay)
                .days(3)
                .spawn_item("sleep_fruit")
                .action("shake"),
        );
        let g = expand(g, &ExpandOptions::default()).unwrap();
        let spawns: Vec<_> = g
            .transitions()
            .into_iter()
            .map(|(_, tail, t)| (tail, t.spawn_item.clone(), t.action.clone()))
            .collect();
        assert_eq!(
            spawns,
            vec![
                ("bush_watered__day1", None, None),
                ("bush_watered__day2", None, None),
                ("bush", Some(Value::from("sleep_fruit")), Some("shake".to_string())),
            ]
        );
    }

    #[test]
    fn test_self_loop_chain() {
        let mut g = TransitionGraph::new();
        g.add_transition("bush", "bush_watered", Transition::new(Trigger::Water));
        g.add_transition("bush_watered", "bush", Transition::new(Trigger::NewDay).days(2));
        let g = expand(g, &suffix()).unwrap();
        assert_eq!(
            edges(&g),
            vec![
                edge("bush", "bush_watered", "water"),
                edge("bush_watered", "bush_watered_", "newDay"),
                edge("bush_watered_", "bush", "newDay"),
            ]
        );
    }

    #[test]
    fn test_one_day_and_zero_day_untouched() {
        let mut g = TransitionGraph::new();
        g.add_transition("a", "b", Transition::new(Trigger::NewDay).days(1).description("{days}"));
        g.add_transition("b", "c", Transition::new(Trigger::NewDay).days(0));
        g.add_transition("c", "a", Transition::new(Trigger::NewDay));
        let before = edges(&g);
        let g = expand(g, &ExpandOptions::default()).unwrap();
        assert_eq!(edges(&g), before);
        assert_eq!(ids(&g), vec!["a", "b", "c"]);
        assert_eq!(g.properties("a"), None);
    }

    #[test]
    fn test_expanding_twice_is_noop() {
        let mut g = TransitionGraph::new();
        g.add_transition("a", "b", Transition::new(Trigger::NewDay).days(4));
        let once = expand(g, &ExpandOptions::default()).unwrap();
        let (ids_once, edges_once) = (
            ids(&once).into_iter().map(String::from).collect::<Vec<_>>(),
            edges(&once),
        );
        let twice = expand(once, &ExpandOptions::default()).unwrap();
        assert_eq!(ids(&twice), ids_once);
        assert_eq!(edges(&twice), edges_once);
    }

    #[test]
    fn test_delayed_non_day_rejected() {
        let mut g = TransitionGraph::new();
        g.add_transition("a", "b", Transition::new(Trigger::Water).days(2));
        assert_eq!(
            expand(g, &ExpandOptions::default()).unwrap_err(),
            GraphError::DelayedNonDay {
                head: "a".to_string(),
                tail: "b".to_string(),
                trigger: "water".to_string(),
                days: 2,
            }
        );
    }

    #[test]
    fn test_unknown_redirect_target() {
        let mut g = TransitionGraph::new();
        g.add_transition(
            "a",
            "b",
            Transition::new(Trigger::NewDay).days(2).redirect(Trigger::Slash, "ghost"),
        );
        assert_eq!(
            expand(g, &ExpandOptions::default()).unwrap_err(),
            GraphError::UnknownNode { id: "ghost".to_string() }
        );
    }

    #[test]
    fn test_synthetic_collision() {
        let mut g = TransitionGraph::new();
        g.add_transition("a", "b", Transition::new(Trigger::NewDay).days(2));
        g.add_node("a__day1");
        assert_eq!(
            expand(g, &ExpandOptions::default()).unwrap_err(),
            GraphError::SyntheticIdCollision { id: "a__day1".to_string() }
        );

        // Two delayed edges from one head claim the same waiting states.
        let mut g = TransitionGraph::new();
        g.add_transition("a", "b", Transition::new(Trigger::NewDay).days(2));
        g.add_transition("a", "c", Transition::new(Trigger::NewDay).days(2));
        assert!(matches!(
            expand(g, &suffix()),
            Err(GraphError::SyntheticIdCollision { .. })
        ));
    }

    #[test]
    fn test_bad_template_fails() {
        let mut g = TransitionGraph::new();
        g.add_transition("a", "b", Transition::new(Trigger::NewDay).days(2).description("{nope}"));
        assert!(matches!(
            expand(g, &ExpandOptions::default()),
            Err(GraphError::Template(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_chain_shape(days in 2u32..12, redirects in 0usize..3) {
            let targets = ["x0", "x1", "x2"];
            let mut g = TransitionGraph::new();
            for target in &targets[..redirects] {
                g.add_node(*target);
            }
            let mut t = Transition::new(Trigger::NewDay).days(days);
            let triggers = [Trigger::Growth, Trigger::Slash, Trigger::Water];
            for (trigger, target) in triggers.iter().zip(&targets[..redirects]) {
                t = t.redirect(trigger.clone(), *target);
            }
            g.add_transition("head", "tail", t);
            let nodes_before = g.node_count();

            let g = expand(g, &ExpandOptions::default()).unwrap();
            let synthetic = (days - 1) as usize;
            prop_assert_eq!(g.node_count(), nodes_before + synthetic);

            let new_day = g
                .transitions()
                .iter()
                .filter(|(_, _, t)| t.trigger == Trigger::NewDay)
                .count();
            prop_assert_eq!(new_day, days as usize);
            prop_assert_eq!(g.edge_count(), days as usize + synthetic * redirects);

            for step in 1..days {
                let id = format!("head__day{step}");
                let out = g.transitions_from(&id);
                prop_assert_eq!(out.len(), 1 + redirects);
            }
            prop_assert_eq!(g.transitions_from("head").len(), 1);
            prop_assert!(g.transitions_from("tail").is_empty());
        }
    }
}
