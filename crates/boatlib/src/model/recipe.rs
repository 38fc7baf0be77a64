//! Crafting recipes, declared first and materialized in one pass.
//!
//! A recipe combines a base item with a material to make a result. The
//! material is re-declared as an item type cloned from itself that knows the
//! combination. Reverse partners let the result be combined back; those are
//! written onto the result record as comma-joined `!combineWith`, `!toMake`
//! and `!consumeOnCombine` lists.

use tracing::debug;

use crate::error::RecordError;
use crate::model::builder::ItemTypeBuilder;
use crate::model::{RecordContext, RecordRef, Registration, Value};

/// One recipe declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// The item the material is combined with.
    pub base: RecordRef,
    /// Id of the material item.
    pub material: String,
    /// The item produced.
    pub result: RecordRef,
    pub consume_on_combine: bool,
    /// Items the result can be combined with to get the material back.
    pub reverse_with: Vec<String>,
}

impl Recipe {
    pub fn new(base: RecordRef, material: impl Into<String>, result: RecordRef) -> Self {
        Self {
            base,
            material: material.into(),
            result,
            consume_on_combine: false,
            reverse_with: Vec::new(),
        }
    }

    pub fn consume_on_combine(mut self, consume: bool) -> Self {
        self.consume_on_combine = consume;
        self
    }

    pub fn reverse_with(mut self, partner: impl Into<String>) -> Self {
        self.reverse_with.push(partner.into());
        self
    }
}

/// Collects recipe declarations until [`RecipeBook::finalize`].
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a recipe.
    pub fn recipe(&mut self, recipe: Recipe) -> &mut Self {
        self.recipes.push(recipe);
        self
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Registers one derived material item per recipe, then writes the
    /// reverse-combination lists onto each result record.
    ///
    /// Results must already be registered in one of the context's active
    /// collections.
    pub fn finalize(self, ctx: &mut RecordContext) -> Result<Vec<RecordRef>, RecordError> {
        let mut derived = Vec::with_capacity(self.recipes.len());
        for recipe in &self.recipes {
            let item = ItemTypeBuilder::new(recipe.material.clone())
                .property("cloneFrom", recipe.material.clone())
                .property("combineWith", &recipe.base)
                .property("toMake", &recipe.result)
                .property("consumeOnCombine", recipe.consume_on_combine)
                .build();
            match ctx.register(item) {
                Registration::Registered(r) => derived.push(r),
                Registration::Detached(_) => return Err(RecordError::NoActiveCollection),
            }
        }

        let mut results: Vec<&RecordRef> = Vec::new();
        for recipe in self.recipes.iter().filter(|r| !r.reverse_with.is_empty()) {
            if !results.contains(&&recipe.result) {
                results.push(&recipe.result);
            }
        }

        for result in results {
            let record = ctx
                .find_mut(result.id())
                .ok_or_else(|| RecordError::UnknownRecord {
                    id: result.id().to_string(),
                })?;
            let props = record.properties();
            let mut combine_with = rendered(props.get("combineWith"));
            let mut to_make = rendered(props.get("toMake"));
            let mut consume = rendered(props.get("consumeOnCombine"));

            for recipe in self.recipes.iter().filter(|r| r.result == *result) {
                for partner in &recipe.reverse_with {
                    combine_with.push(partner.clone());
                    to_make.push(recipe.material.clone());
                    consume.push(recipe.consume_on_combine.to_string());
                }
            }

            debug!(result = result.id(), partners = combine_with.len(), "wired reverse recipes");
            let props = record.properties_mut();
            props.set("!combineWith", combine_with.join(","));
            props.set("!toMake", to_make.join(","));
            props.set("!consumeOnCombine", consume.join(","));
        }

        Ok(derived)
    }
}

/// Renders the non-null scalars of an optional value.
fn rendered(value: Option<&Value>) -> Vec<String> {
    value
        .map(|v| v.scalars().into_iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}
