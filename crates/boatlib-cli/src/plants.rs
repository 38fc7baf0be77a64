//! Farming content: plants that grow over several days.

use boatlib::graph::{
    compile, expand, CompileOptions, ExpandOptions, Transition, TransitionGraph, Trigger,
};
use boatlib::{GraphError, Properties, RecordContext};
use clap::ValueEnum;
use tracing::info;

const CROPS_TEXTURE: &str = "rcfox_farming_crops";

/// A plant `boatc` knows how to author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Plant {
    Turnip,
    Aldleaf,
}

impl Plant {
    pub const ALL: [Plant; 2] = [Plant::Turnip, Plant::Aldleaf];

    pub fn name(self) -> &'static str {
        match self {
            Plant::Turnip => "turnip",
            Plant::Aldleaf => "aldleaf",
        }
    }

    /// Returns the plant's unexpanded growth graph.
    pub fn graph(self) -> TransitionGraph {
        match self {
            Plant::Turnip => turnip(),
            Plant::Aldleaf => aldleaf(),
        }
    }
}

fn new_day(days: u32) -> Transition {
    Transition::new(Trigger::NewDay).days(days)
}

pub fn turnip() -> TransitionGraph {
    let mut g = TransitionGraph::new();
    g.add_transition(
        "turnip",
        "turnip_seeds",
        Transition::new(Trigger::Smash).spawn_item(vec!["turnip_seeds", "turnip_seeds"]),
    );
    g.add_transition("turnip_seeds", "turnip_seeds_watered", Transition::new(Trigger::Water));
    g.add_transition(
        "turnip_seeds_watered",
        "turnip_sprout",
        new_day(3).description("It will sprout in {days} day{s}."),
    );
    g.add_transition("turnip_sprout", "turnip_sprout_watered", Transition::new(Trigger::Water));
    g.add_transition(
        "turnip_sprout_watered",
        "turnip_mature",
        new_day(7).description("It will mature in {days} day{s}."),
    );
    g.add_transition("turnip_mature", "turnip", Transition::new(Trigger::Use));

    g.set_properties(
        "turnip",
        Properties::new()
            .with("name", "Turnip")
            .with("itemCategory", "plant")
            .with("texture", CROPS_TEXTURE)
            .with("sprite", 0i64),
    );
    g.set_properties(
        "turnip_seeds",
        Properties::new()
            .with("name", "Turnip Seeds")
            .with("itemCategory", "plant")
            .with("texture", CROPS_TEXTURE)
            .with("sprite", 5i64),
    );
    g.set_properties(
        "turnip_seeds_watered",
        Properties::new()
            .with("name", "Turnip Seeds (Watered)")
            .with("itemCategory", "hide")
            .with("cloneFrom", "turnip_seeds")
            .with("special", vec!["dontCloneReactions", "cannotBePickedUp"]),
    );
    g.set_properties(
        "turnip_sprout",
        Properties::new()
            .with("name", "Turnip Sprout")
            .with("itemCategory", "plant")
            .with("texture", CROPS_TEXTURE)
            .with("sprite", 2i64)
            .with("special", "cannotBePickedUp"),
    );
    g.set_properties(
        "turnip_sprout_watered",
        Properties::new()
            .with("name", "Turnip Sprout (watered)")
            .with("itemCategory", "hide")
            .with("cloneFrom", "turnip_sprout")
            .with("special", vec!["dontCloneReactions", "cannotBePickedUp"]),
    );
    g.set_properties(
        "turnip_mature",
        Properties::new()
            .with("name", "Turnip (mature)")
            .with("itemCategory", "plant")
            .with("texture", CROPS_TEXTURE)
            .with("sprite", 1i64)
            .with("special", "cannotBePickedUp"),
    );
    g
}

pub fn aldleaf() -> TransitionGraph {
    let mut g = TransitionGraph::new();
    g.add_transition("aldleaf", "aldleafSeeds", Transition::new(Trigger::Smash));
    g.add_transition("aldleafSeeds", "aldleafSeeds_watered", Transition::new(Trigger::Water));
    g.add_transition("aldleafSeeds_watered", "aldleafSprout", Transition::new(Trigger::NewDay));
    g.add_transition("aldleafSeeds", "aldleafSprout", Transition::new(Trigger::Growth));
    g.add_transition("aldleafSprout", "aldleafPlant_deadend", Transition::new(Trigger::Growth));
    g.add_transition(
        "aldleafSprout",
        "aldleafPlant",
        new_day(3)
            .description("It will develop leaves in {days} day{s}.")
            .redirect(Trigger::Growth, "aldleafPlant_deadend"),
    );

    g.add_transition("aldleafPlant", "aldleafPlant_watered", Transition::new(Trigger::Water));
    g.add_transition(
        "aldleafPlant_watered",
        "aldleafBush",
        new_day(7)
            .description("It will mature in {days} day{s}.")
            .redirect(Trigger::Slash, "aldleaf"),
    );

    g.add_transition("aldleafBush", "aldleafBush_watered", Transition::new(Trigger::Water));
    g.add_transition(
        "aldleafBush_watered",
        "aldleafBush",
        new_day(7)
            .description("It will produce fruit in {days} day{s}.")
            .spawn_item("sleep_fruit"),
    );

    g.add_transition(
        "aldleafPlant",
        "aldleafPlant_wither",
        new_day(7)
            .redirect(Trigger::Water, "aldleafPlant_watered")
            .redirect(Trigger::Growth, "aldleafPlant"),
    );
    g.add_transition(
        "aldleafBush",
        "aldleafBush_wither",
        new_day(7)
            .redirect(Trigger::Water, "aldleafBush_watered")
            .redirect(Trigger::Growth, "aldleafBush"),
    );

    g.add_transition("aldleafPlant_wither", "aldleafPlant", Transition::new(Trigger::Growth));
    g.add_transition("aldleafBush_wither", "aldleafBush", Transition::new(Trigger::Growth));

    let reactionless = |clone_from: &str| {
        Properties::new()
            .with("cloneFrom", clone_from)
            .with("special", "dontCloneReactions")
    };

    g.set_properties("aldleaf", Properties::new().with("cloneFrom", "aldleaf"));
    g.set_properties(
        "aldleafSeeds",
        Properties::new()
            .with("name", "Aldleaf Seeds")
            .with("itemCategory", "plant")
            .with("sprite", 483i64)
            .with("description", "Seeds!"),
    );
    g.set_properties(
        "aldleafSeeds_watered",
        Properties::new()
            .with("name", "Aldleaf Seeds (Watered)")
            .with("itemCategory", "hide")
            .with("cloneFrom", "aldleafSeeds")
            .with("special", vec!["dontCloneReactions", "cannotBePickedUp"]),
    );
    g.set_properties(
        "aldleafSprout",
        Properties::new()
            .with("name", "Aldleaf Sprout")
            .with("itemCategory", "plant")
            .with("sprite", 556i64)
            .with("description", "It will develop leaves in 3 day.")
            .with("special", "cannotBePickedUp"),
    );
    g.set_properties(
        "aldleafPlant",
        reactionless("aldleafPlant").with("description", "It will mature in 7 days if watered."),
    );
    g.set_properties("aldleafPlant_deadend", reactionless("aldleafPlant"));
    g.set_properties("aldleafPlant_wither", reactionless("aldleafPlant_wither"));
    g.set_properties(
        "aldleafPlant_watered",
        Properties::new()
            .with("name", "Aldleaf Plant (Watered)")
            .with("itemCategory", "hide")
            .with("cloneFrom", "aldleafPlant")
            .with("special", "dontCloneReactions")
            .with("description", "It will mature in 7 days."),
    );
    g.set_properties(
        "aldleafBush",
        reactionless("aldleafBush").with("description", "It will produce fruit in 7 days if watered."),
    );
    g.set_properties("aldleafBush_wither", reactionless("aldleafBush_wither"));
    g.set_properties(
        "aldleafBush_watered",
        Properties::new()
            .with("name", "Aldleaf Bush (Watered)")
            .with("itemCategory", "hide")
            .with("cloneFrom", "aldleafBush")
            .with("special", "dontCloneReactions")
            .with("description", "It will produce fruit in 7 days."),
    );
    g
}

/// Expands and compiles each plant into the active collection, preceded by
/// a comment naming it.
pub fn define_plants(
    ctx: &mut RecordContext,
    plants: &[Plant],
    options: &ExpandOptions,
) -> Result<usize, GraphError> {
    let mut count = 0;
    for &plant in plants {
        let graph = expand(plant.graph(), options)?;
        ctx.comment(format!("{} growth stages", plant.name()));
        let refs = compile(&graph, &CompileOptions::default(), ctx)?;
        info!(plant = plant.name(), records = refs.len(), "defined plant");
        count += refs.len();
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use boatlib::graph::{is_expanded, SyntheticIdScheme};
    use boatlib::Value;

    use super::*;

    fn day_indexed() -> ExpandOptions {
        ExpandOptions::default()
    }

    #[test]
    fn test_turnip_expands() {
        let g = expand(turnip(), &day_indexed()).unwrap();
        assert!(is_expanded(&g));
        assert_eq!(g.node_count(), 6 + 2 + 6);
        assert_eq!(
            g.properties("turnip_seeds_watered").and_then(|p| p.get("description")),
            Some(&Value::from("It will sprout in 3 days."))
        );
        assert_eq!(
            g.properties("turnip_sprout_watered__day6").and_then(|p| p.get("description")),
            Some(&Value::from("It will mature in 1 day."))
        );
        let last: Vec<_> = g
            .transitions_from("turnip_sprout_watered__day6")
            .into_iter()
            .map(|(tail, _)| tail)
            .collect();
        assert_eq!(last, vec!["turnip_mature"]);
    }

    #[test]
    fn test_aldleaf_redirects() {
        let g = expand(aldleaf(), &day_indexed()).unwrap();
        assert!(is_expanded(&g));
        assert_eq!(g.node_count(), 11 + 2 + 6 + 6 + 6 + 6);

        for step in 1..7 {
            let id = format!("aldleafPlant__day{step}");
            let out: Vec<_> = g
                .transitions_from(&id)
                .into_iter()
                .map(|(tail, t)| (t.trigger.to_string(), tail.to_string()))
                .collect();
            assert!(out.contains(&("water".to_string(), "aldleafPlant_watered".to_string())));
            assert!(out.contains(&("growth".to_string(), "aldleafPlant".to_string())));
        }

        let fruit: Vec<_> = g
            .transitions()
            .into_iter()
            .filter(|(_, _, t)| t.spawn_item.is_some())
            .map(|(head, tail, _)| (head, tail))
            .collect();
        assert_eq!(fruit, vec![("aldleafBush_watered__day6", "aldleafBush")]);
    }

    #[test]
    fn test_suffix_scheme_ids() {
        let g = expand(
            turnip(),
            &ExpandOptions {
                scheme: SyntheticIdScheme::Suffix,
            },
        )
        .unwrap();
        assert!(g.contains("turnip_seeds_watered_"));
        assert!(g.contains("turnip_seeds_watered__"));
        assert!(!g.contains("turnip_seeds_watered___"));
    }

    #[test]
    fn test_define_plants_output() {
        let mut ctx = RecordContext::new();
        let (collection, count) = ctx
            .collect(|ctx| define_plants(ctx, &[Plant::Turnip], &day_indexed()))
            .unwrap();
        assert_eq!(count, 14);
        assert_eq!(collection.len(), 15);

        let text = collection.encode();
        assert!(text.starts_with("-- turnip growth stages\n\n[ItemType]\n    ID=turnip;\n"));
        assert!(text.contains(
            "\
[ItemType]
    ID=turnip_sprout;
    name=Turnip Sprout;
    itemCategory=plant;
    texture=rcfox_farming_crops;
    sprite=2;
    special=cannotBePickedUp;
[ItemReaction]
    ID=turnip_sprout;
    element=water;
    newID=turnip_sprout_watered;"
        ));
        assert!(text.contains(
            "\
[ItemType]
    ID=turnip_seeds_watered__day1;
    cloneFrom=turnip_seeds_watered;
    special=dontCloneReactions;
    itemCategory=hide;
    description=It will sprout in 2 days.;
[ItemReaction]
    ID=turnip_seeds_watered__day1;
    element=newDay;
    newID=turnip_seeds_watered__day2;"
        ));
    }

    #[test]
    fn test_all_plants_compile() {
        let mut ctx = RecordContext::new();
        let (collection, count) = ctx
            .collect(|ctx| define_plants(ctx, &Plant::ALL, &day_indexed()))
            .unwrap();
        assert_eq!(count, 14 + 37);
        assert!(collection.find("aldleafBush_wither").is_some());
        assert_eq!(ctx.depth(), 0);
    }
}
