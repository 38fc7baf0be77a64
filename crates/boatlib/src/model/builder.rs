//! Builder API for the engine's record types.
//!
//! Each builder produces a [`Record`] with the engine's type name and the
//! property layout the engine expects.
//!
//! # Example
//!
//! ```rust
//! use boatlib::model::builder::{item_reaction, ItemTypeBuilder};
//! use boatlib::Properties;
//!
//! let turnip = ItemTypeBuilder::new("turnip")
//!     .property("name", "Turnip")
//!     .special("cannotBePickedUp")
//!     .reaction(item_reaction(
//!         Properties::new().with("element", "smash").with("newID", "turnip_seeds"),
//!     ))
//!     .build();
//!
//! assert!(turnip.encode().starts_with("[ItemType]\n    ID=turnip;"));
//! ```

use crate::error::{RecordError, ValidationError};
use crate::model::{generate_id, Identity, Properties, Record, Value};
use crate::model::Duration;

/// Item ids of the engine's furnaces.
pub const FURNACE_IDS: [&str; 4] = [
    "furnace_lit",
    "furnace2_lit",
    "furnace_everlit1",
    "furnace_everlit2",
];

// =============================================================================
// Items and actors
// =============================================================================

/// An `[ItemReaction]` sub-record. Repeats its owner's id when encoded.
pub fn item_reaction(properties: Properties) -> Record {
    Record::new("ItemReaction", Identity::Inherited, properties)
}

/// An `[ActorTypeReaction]` sub-record.
pub fn actor_type_reaction(properties: Properties) -> Record {
    Record::new("ActorTypeReaction", Identity::Inherited, properties)
}

/// An `[ActorPrefab]` record.
pub fn actor_prefab(id: impl Into<String>, properties: Properties) -> Record {
    Record::new("ActorPrefab", Identity::Named(id.into()), properties)
}

/// An `[ActorTypeDetectAoE]` record.
pub fn actor_type_detect_aoe(id: impl Into<String>, properties: Properties) -> Record {
    Record::new("ActorTypeDetectAoE", Identity::Named(id.into()), properties)
}

/// A `[FormulaGlobal]` record.
pub fn formula_global(id: impl Into<String>, formula: impl Into<String>) -> Record {
    Record::new(
        "FormulaGlobal",
        Identity::Named(id.into()),
        Properties::new().with("formula", formula.into()),
    )
}

/// Builder for `[ItemType]` and `[ActorType]` records.
///
/// `special` is always emitted in list shape.
#[derive(Debug, Clone)]
pub struct ItemTypeBuilder {
    type_name: &'static str,
    id: String,
    properties: Properties,
    reactions: Vec<Record>,
}

impl ItemTypeBuilder {
    /// Starts an `[ItemType]` with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            type_name: "ItemType",
            id: id.into(),
            properties: Properties::new(),
            reactions: Vec::new(),
        }
    }

    /// Starts an `[ActorType]` with the given id.
    pub fn actor(id: impl Into<String>) -> Self {
        Self {
            type_name: "ActorType",
            ..Self::new(id)
        }
    }

    /// Sets a property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.set(key, value);
        self
    }

    /// Sets several properties at once, in order.
    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Adds one `special` flag.
    pub fn special(mut self, flag: impl Into<Value>) -> Self {
        self.properties.normalize_list("special");
        match self.properties.get_mut("special") {
            Some(Value::List(flags)) => flags.push(flag.into()),
            _ => self.properties.set("special", Value::List(vec![flag.into()])),
        }
        self
    }

    /// Adds a reaction sub-record.
    pub fn reaction(mut self, reaction: Record) -> Self {
        self.reactions.push(reaction);
        self
    }

    /// Adds several reaction sub-records.
    pub fn reactions(mut self, reactions: impl IntoIterator<Item = Record>) -> Self {
        self.reactions.extend(reactions);
        self
    }

    pub fn build(mut self) -> Record {
        self.properties.normalize_list("special");
        Record::new(self.type_name, Identity::Named(self.id), self.properties)
            .with_subrecords(self.reactions)
    }
}

// =============================================================================
// Global triggers
// =============================================================================

/// Builder for `[GlobalTrigger]` records.
///
/// The trigger area (`topX`, `topY`, `btmX`, `btmY`) defaults to 0.
#[derive(Debug, Clone)]
pub struct GlobalTriggerBuilder {
    alias_id: String,
    properties: Properties,
    effects: Vec<Record>,
}

impl GlobalTriggerBuilder {
    pub fn new(alias_id: impl Into<String>) -> Self {
        Self {
            alias_id: alias_id.into(),
            properties: Properties::new(),
            effects: Vec::new(),
        }
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.set(key, value);
        self
    }

    pub fn effect(mut self, effect: Record) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn build(mut self) -> Record {
        for corner in ["topX", "topY", "btmX", "btmY"] {
            self.properties.set_default(corner, 0i64);
        }
        self.properties.set("aliasID", self.alias_id.clone());
        Record::new("GlobalTrigger", Identity::Named(self.alias_id), self.properties)
            .with_subrecords(self.effects)
    }
}

/// Builder for `[GlobalTriggerEffect]` sub-records.
///
/// Only the first two strings, floats and bools are used.
#[derive(Debug, Clone, Default)]
pub struct TriggerEffectBuilder {
    effect_id: String,
    x: Option<i64>,
    y: Option<i64>,
    delay: Option<i64>,
    strings: Vec<String>,
    floats: Vec<f64>,
    bools: Vec<bool>,
}

impl TriggerEffectBuilder {
    pub fn new(effect_id: impl Into<String>) -> Self {
        Self {
            effect_id: effect_id.into(),
            ..Self::default()
        }
    }

    pub fn x(mut self, x: i64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: i64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn delay(mut self, delay: i64) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn string(mut self, s: impl Into<String>) -> Self {
        self.strings.push(s.into());
        self
    }

    pub fn float(mut self, f: f64) -> Self {
        self.floats.push(f);
        self
    }

    pub fn bool(mut self, b: bool) -> Self {
        self.bools.push(b);
        self
    }

    pub fn build(self) -> Record {
        let mut props = Properties::new().with("effectID", self.effect_id);
        props.extend(self.x.map(|x| ("xValue", x)));
        props.extend(self.y.map(|y| ("yValue", y)));
        props.extend(self.delay.map(|d| ("delay", d)));
        for (key, s) in ["sValue", "sValue2"].into_iter().zip(self.strings) {
            props.set(key, s);
        }
        for (key, f) in ["fValue", "fValue2"].into_iter().zip(self.floats) {
            props.set(key, f);
        }
        for (key, b) in ["bValue1", "bValue2"].into_iter().zip(self.bools) {
            props.set(key, b);
        }
        Record::new("GlobalTriggerEffect", Identity::Inherited, props)
    }
}

// =============================================================================
// Actions and areas of effect
// =============================================================================

/// Which record an area of effect belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AoeKind {
    /// `[ActionAOE]`, attached to an action.
    Action,
    /// `[AvAffecterAOE]`, attached to an attribute affecter.
    AvAffecter,
}

impl AoeKind {
    pub fn type_name(self) -> &'static str {
        match self {
            AoeKind::Action => "ActionAOE",
            AoeKind::AvAffecter => "AvAffecterAOE",
        }
    }
}

/// An area of effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Aoe {
    kind: AoeKind,
    properties: Properties,
}

impl Aoe {
    pub fn new(kind: AoeKind, properties: Properties) -> Self {
        Self { kind, properties }
    }

    /// A single-tile `[ActionAOE]`.
    pub fn basic_action() -> Self {
        Self::new(AoeKind::Action, Properties::new().with("cloneFrom", "oneTile"))
    }

    /// A single-tile `[AvAffecterAOE]`.
    pub fn basic_av_affecter() -> Self {
        Self::new(AoeKind::AvAffecter, Properties::new().with("cloneFrom", "oneTile"))
    }

    pub fn kind(&self) -> AoeKind {
        self.kind
    }

    fn into_record_for(self, record: &'static str, expected: AoeKind) -> Result<Record, RecordError> {
        if self.kind != expected {
            return Err(RecordError::WrongAoeKind {
                record,
                expected,
                found: self.kind,
            });
        }
        Ok(Record::new(
            self.kind.type_name(),
            Identity::Inherited,
            self.properties,
        ))
    }
}

/// Builder for `[AvAffecter]` sub-records.
///
/// `duration` defaults to [`Duration::instantaneous`].
#[derive(Debug, Clone, Default)]
pub struct AvAffecterBuilder {
    aoe: Option<Aoe>,
    properties: Properties,
}

impl AvAffecterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aoe(mut self, aoe: Aoe) -> Self {
        self.aoe = Some(aoe);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.set(key, value);
        self
    }

    pub fn build(mut self) -> Result<Record, RecordError> {
        let aoe = self
            .aoe
            .unwrap_or_else(Aoe::basic_av_affecter)
            .into_record_for("AvAffecter", AoeKind::AvAffecter)?;
        self.properties.set_default("duration", Duration::instantaneous());
        Ok(Record::new("AvAffecter", Identity::Inherited, self.properties).with_subrecords([aoe]))
    }
}

/// Builder for `[Action]` records.
///
/// Sub-records are the area of effect followed by each affecter.
#[derive(Debug, Clone)]
pub struct ActionBuilder {
    id: String,
    aoe: Option<Aoe>,
    affecters: Vec<Record>,
    properties: Properties,
}

impl ActionBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            aoe: None,
            affecters: Vec::new(),
            properties: Properties::new(),
        }
    }

    pub fn aoe(mut self, aoe: Aoe) -> Self {
        self.aoe = Some(aoe);
        self
    }

    /// Adds an affecter built with [`AvAffecterBuilder`].
    pub fn affecter(mut self, affecter: Record) -> Self {
        self.affecters.push(affecter);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.set(key, value);
        self
    }

    pub fn build(self) -> Result<Record, RecordError> {
        let aoe = self
            .aoe
            .unwrap_or_else(Aoe::basic_action)
            .into_record_for("Action", AoeKind::Action)?;
        let subrecords = std::iter::once(aoe).chain(self.affecters);
        Ok(Record::new("Action", Identity::Named(self.id), self.properties).with_subrecords(subrecords))
    }
}

// =============================================================================
// Dialog
// =============================================================================

/// Placeholder in an override's `fReq` replaced by the node's own id.
pub const THIS_NODE: &str = "__this_node__";

/// Condition that holds while dialog node `node_id` has not been seen.
pub fn not_seen_node(node_id: &str) -> String {
    format!("gIs0:D_{node_id}")
}

/// Condition that holds once dialog node `node_id` has been seen.
pub fn seen_node(node_id: &str) -> String {
    format!("g1:D_{node_id}")
}

/// Builder for `[DialogNode]` and `[DialogNodeOverride]` records.
///
/// Statements are flattened into parallel `animations` and `statements`
/// lists; a statement without an animation gets an empty animation.
#[derive(Debug, Clone, Default)]
pub struct DialogNodeBuilder {
    id: Option<String>,
    override_id: Option<String>,
    properties: Properties,
    animations: Vec<String>,
    lines: Vec<String>,
    options: Vec<Record>,
}

impl DialogNodeBuilder {
    /// Starts a node. Without [`DialogNodeBuilder::id`] an id is generated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a `[DialogNodeOverride]` replacing the node `override_id`.
    pub fn override_node(override_id: impl Into<String>) -> Self {
        Self {
            override_id: Some(override_id.into()),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.set(key, value);
        self
    }

    /// Adds a line with no animation.
    pub fn statement(mut self, line: impl Into<String>) -> Self {
        self.animations.push(String::new());
        self.lines.push(line.into());
        self
    }

    /// Adds a line played with an animation.
    pub fn animated(mut self, animation: impl Into<String>, line: impl Into<String>) -> Self {
        self.animations.push(animation.into());
        self.lines.push(line.into());
        self
    }

    /// Adds a `[DialogOption]` leading to `node`.
    pub fn option(self, text: impl Into<String>, node: impl Into<Value>) -> Self {
        self.option_with(text, node, Properties::new(), None)
    }

    /// Adds a `[DialogOption]` with extra properties and an optional id.
    pub fn option_with(
        mut self,
        text: impl Into<String>,
        node: impl Into<Value>,
        mut properties: Properties,
        id: Option<String>,
    ) -> Self {
        properties.set("text", text.into());
        properties.set("nodeToConnectTo", node);
        let identity = id.map_or(Identity::Absent, Identity::Named);
        self.options.push(Record::new("DialogOption", identity, properties));
        self
    }

    pub fn build(self) -> Record {
        let id = self.id.unwrap_or_else(|| generate_id("dialog_"));
        let mut props = self.properties;
        let type_name = match self.override_id {
            Some(override_id) => {
                props.set("dialogNodeID_toOverride", override_id);
                if let Some(Value::Str(req)) = props.get_mut("fReq") {
                    *req = req.replace(THIS_NODE, &id);
                }
                "DialogNodeOverride"
            }
            None => "DialogNode",
        };
        props.set("animations", self.animations);
        props.set("statements", self.lines);
        Record::new(type_name, Identity::Named(id), props).with_subrecords(self.options)
    }
}

// =============================================================================
// Journal
// =============================================================================

/// Builder for `[JournalEntry]` records. A title is required.
#[derive(Debug, Clone)]
pub struct JournalEntryBuilder {
    id: String,
    icons: Vec<String>,
    title: Option<String>,
    text: String,
    properties: Properties,
}

impl JournalEntryBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            icons: Vec::new(),
            title: None,
            text: String::new(),
            properties: Properties::new(),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icons.push(icon.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.set(key, value);
        self
    }

    pub fn build(mut self) -> Result<Record, ValidationError> {
        let title = self
            .title
            .ok_or_else(|| ValidationError::MissingTitle { id: self.id.clone() })?;
        let mut text: String = self
            .icons
            .iter()
            .map(|icon| format!("<itemBig={icon}>"))
            .collect();
        text.push_str(&format!("<title={title}>"));
        text.push_str("<brAdj=>");
        text.push_str(&self.text);
        self.properties.set("text", text);
        Ok(Record::new("JournalEntry", Identity::Named(self.id), self.properties))
    }
}
