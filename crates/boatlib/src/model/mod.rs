//! Data model for engine content.
//!
//! This module contains the types authoring code builds:
//! - Identities and references
//! - Values and ordered property bags
//! - Records, comments and collections
//! - The record context that collections are gathered in
//! - Builders for the engine's record types

pub mod builder;
pub mod context;
pub mod duration;
pub mod id;
pub mod recipe;
pub mod record;
pub mod value;

pub use builder::{
    Aoe, AoeKind, ActionBuilder, AvAffecterBuilder, DialogNodeBuilder, GlobalTriggerBuilder,
    ItemTypeBuilder, JournalEntryBuilder, TriggerEffectBuilder,
};
pub use context::{RecordContext, Registration};
pub use duration::Duration;
pub use id::{generate_id, Identity, RecordRef};
pub use recipe::{Recipe, RecipeBook};
pub use record::{Collection, Comment, Item, Record};
pub use value::{Properties, Value};
