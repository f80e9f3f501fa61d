//! The recipe aggregate.
//!
//! A [`Recipe`] owns its ingredients, steps, group associations and
//! categories. The aggregate is always read and written as a unit; children
//! have no lifecycle of their own.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{GroupId, IngredientId, RecipeId, StepId, UserId};

/// A single ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    /// Amount in `unit`. Always positive.
    pub quantity: f64,
    pub unit: String,
    /// Quantity in grams or millilitres, when the unit is convertible.
    pub metric_quantity: Option<f64>,
    /// Quantity in ounces or fluid ounces, when the unit is convertible.
    pub imperial_quantity: Option<f64>,
}

/// A single instruction step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    /// 1-based position within the recipe.
    pub step_number: u32,
    pub instruction: String,
}

/// Membership of a recipe in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssociation {
    pub recipe_id: RecipeId,
    pub group_id: GroupId,
    pub added_by: UserId,
    /// Unix milliseconds.
    pub added_at: i64,
}

/// The parent row of a recipe, without children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub owner: UserId,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A fully hydrated recipe aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub owner: UserId,
    pub created_at: i64,
    pub updated_at: i64,
    /// Ordered by name ascending.
    pub ingredients: Vec<Ingredient>,
    /// Ordered by step number ascending.
    pub steps: Vec<Step>,
    pub groups: Vec<GroupAssociation>,
    pub categories: Vec<String>,
}

impl Recipe {
    /// Build an aggregate from its parent row and children.
    ///
    /// Children may arrive in any order; ingredients end up sorted by name
    /// and steps by step number, with ids breaking ties.
    pub fn assemble(
        record: RecipeRecord,
        mut ingredients: Vec<Ingredient>,
        mut steps: Vec<Step>,
        groups: Vec<GroupAssociation>,
        categories: Vec<String>,
    ) -> Self {
        ingredients.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        steps.sort_by(|a, b| {
            a.step_number
                .cmp(&b.step_number)
                .then_with(|| a.id.cmp(&b.id))
        });

        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            image_url: record.image_url,
            owner: record.owner,
            created_at: record.created_at,
            updated_at: record.updated_at,
            ingredients,
            steps,
            groups,
            categories,
        }
    }

    /// The set of groups this recipe belongs to.
    pub fn group_ids(&self) -> BTreeSet<&GroupId> {
        self.groups.iter().map(|g| &g.group_id).collect()
    }

    /// Check whether the recipe belongs to `group_id`.
    pub fn in_group(&self, group_id: &GroupId) -> bool {
        self.groups.iter().any(|g| &g.group_id == group_id)
    }
}

/// A search hit: a hydrated recipe plus its relevance score.
///
/// Higher scores are more relevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecipe {
    pub recipe: Recipe,
    pub rank: f64,
}

/// Input for one ingredient in [`PutRecipeInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientInput {
    /// Keep a stable id across updates; a fresh one is generated if absent.
    pub id: Option<IngredientId>,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Input for one step in [`PutRecipeInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInput {
    pub id: Option<StepId>,
    pub step_number: u32,
    pub instruction: String,
}

/// Create-or-replace input for a recipe aggregate.
///
/// Format validation (non-empty name, positive quantities, at least one
/// group) happens upstream before this reaches the core.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PutRecipeInput {
    /// `None` creates a new recipe; `Some` replaces an existing one.
    pub id: Option<RecipeId>,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub group_ids: Vec<GroupId>,
    pub categories: Vec<String>,
    pub ingredients: Vec<IngredientInput>,
    pub steps: Vec<StepInput>,
}

impl PutRecipeInput {
    /// Start an input for a new recipe.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Target an existing recipe.
    pub fn with_id(mut self, id: RecipeId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn group(mut self, group_id: GroupId) -> Self {
        self.group_ids.push(group_id);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn ingredient(mut self, name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        self.ingredients.push(IngredientInput {
            id: None,
            name: name.into(),
            quantity,
            unit: unit.into(),
        });
        self
    }

    /// Append a step numbered after the current last step.
    pub fn step(mut self, instruction: impl Into<String>) -> Self {
        let step_number = self.steps.iter().map(|s| s.step_number).max().unwrap_or(0) + 1;
        self.steps.push(StepInput {
            id: None,
            step_number,
            instruction: instruction.into(),
        });
        self
    }

    /// Group ids with duplicates removed, first occurrence wins.
    pub fn distinct_group_ids(&self) -> Vec<GroupId> {
        let mut seen = BTreeSet::new();
        self.group_ids
            .iter()
            .filter(|g| seen.insert(*g))
            .cloned()
            .collect()
    }

    /// Trimmed, non-empty categories with duplicates removed.
    pub fn distinct_categories(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty() && seen.insert(c.to_string()))
            .map(String::from)
            .collect()
    }
}
