//! Store trait: the abstract interface for Potluck persistence.
//!
//! The store knows tables, transactions and the text index. It knows
//! nothing about who is allowed to call it; every caller goes through an
//! access guard first.

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use potluck_core::{
    Comment, GroupAssociation, GroupId, Ingredient, PopularTerm, Recipe, RecipeId, RecipeRecord,
    ShareLink, ShareToken, Step, UserId,
};

use crate::error::Result;

/// A fully resolved aggregate write.
///
/// Ids, timestamps and converted quantities are already assigned; the
/// store only persists.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeWrite {
    /// The parent row. On update only name, description, image and
    /// `updated_at` are written.
    pub record: RecipeRecord,
    /// Insert a new parent row instead of updating one.
    pub is_new: bool,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub groups: Vec<GroupAssociation>,
    pub categories: Vec<String>,
}

/// Result of persisting a [`RecipeWrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
    /// The update matched no recipe owned by the writer. Nothing was
    /// written.
    Missing,
}

/// Children of a batch of recipes, keyed by recipe id.
///
/// Rows may come in any order; [`Recipe::assemble`] puts ingredients and
/// steps in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeChildren {
    pub ingredients: Vec<(RecipeId, Ingredient)>,
    pub steps: Vec<(RecipeId, Step)>,
    pub groups: Vec<GroupAssociation>,
    pub categories: Vec<(RecipeId, String)>,
}

/// How the terms of a [`SearchQuery`] combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Every term must match.
    All,
    /// Any term may match.
    Any,
}

/// A ranked text query over the caller's groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Plain alphanumeric terms. Never empty.
    pub terms: Vec<String>,
    pub mode: MatchMode,
    /// Narrow to these groups; empty means all of the caller's groups.
    pub group_ids: Vec<GroupId>,
    /// Match any of these categories; empty means no filter.
    pub categories: Vec<String>,
    /// Leave this recipe out of the results.
    pub exclude: Option<RecipeId>,
    pub limit: u32,
    pub offset: u32,
}

/// A recipe row with its relevance score. Higher is more relevant.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecord {
    pub record: RecipeRecord,
    pub rank: f64,
}

/// The indexed text of one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchDocument {
    pub name: String,
    pub ingredients: String,
    pub steps: String,
    pub categories: String,
}

/// The Store trait: async interface for Potluck persistence.
///
/// For SQLite, statements run on `spawn_blocking` to avoid blocking the
/// runtime.
///
/// # Design Notes
///
/// - **Atomic aggregates**: [`Store::save_recipe`] replaces a recipe and all
///   of its children, plus its search document, in one transaction.
/// - **Guarded consumption**: [`Store::consume_share`] checks the view
///   budget and expiry in the same statement that increments the count.
/// - **One link per recipe**: [`Store::upsert_share`] is a single upsert on
///   the recipe id.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Membership
    // ─────────────────────────────────────────────────────────────────────────

    /// Record that `user_id` belongs to `group_id` with `role`.
    async fn add_member(&self, user_id: &UserId, group_id: &GroupId, role: &str) -> Result<()>;

    /// Remove a membership. Missing memberships are ignored.
    async fn remove_member(&self, user_id: &UserId, group_id: &GroupId) -> Result<()>;

    /// Check whether a membership row exists.
    async fn is_member(&self, user_id: &UserId, group_id: &GroupId) -> Result<bool>;

    /// Check whether some group contains both the recipe and the user.
    async fn shares_group(&self, recipe_id: &RecipeId, user_id: &UserId) -> Result<bool>;

    /// The owner of a recipe, if it exists.
    async fn recipe_owner(&self, recipe_id: &RecipeId) -> Result<Option<UserId>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Recipes
    // ─────────────────────────────────────────────────────────────────────────

    /// Persist an aggregate, replacing all children of an existing recipe.
    async fn save_recipe(&self, write: &RecipeWrite) -> Result<SaveOutcome>;

    /// Get the parent row of a recipe.
    async fn get_recipe_record(&self, recipe_id: &RecipeId) -> Result<Option<RecipeRecord>>;

    /// Recipes in any group `user_id` belongs to, each once, most recently
    /// updated first.
    async fn list_recipe_records_for_user(&self, user_id: &UserId) -> Result<Vec<RecipeRecord>>;

    /// Children of the given recipes, fetched in bounded batches.
    async fn load_children(&self, recipe_ids: &[RecipeId]) -> Result<RecipeChildren>;

    /// Delete a recipe and everything it owns. Returns whether it existed.
    async fn delete_recipe(&self, recipe_id: &RecipeId) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    /// Ranked full-text query scoped to `user_id`'s groups.
    async fn search_recipes(&self, user_id: &UserId, query: &SearchQuery) -> Result<Vec<RankedRecord>>;

    /// Recipe and ingredient names containing `partial`, scoped to
    /// `user_id`'s groups.
    async fn suggest(&self, user_id: &UserId, partial: &str, limit: u32) -> Result<Vec<String>>;

    /// The indexed text of a recipe.
    async fn search_document(&self, recipe_id: &RecipeId) -> Result<Option<SearchDocument>>;

    /// Ingredient names by the number of visible recipes using them.
    async fn popular_ingredients(
        &self,
        user_id: &UserId,
        min_len: u32,
        limit: u32,
    ) -> Result<Vec<PopularTerm>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Shares
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert `candidate`, or if the recipe already has a link, update that
    /// link's access type, view cap and expiry. Returns the stored link.
    async fn upsert_share(&self, candidate: &ShareLink) -> Result<ShareLink>;

    /// Links for a recipe, newest first.
    async fn list_shares(&self, recipe_id: &RecipeId) -> Result<Vec<ShareLink>>;

    /// Look up a link by token without consuming it.
    async fn find_share_by_token(&self, token: &ShareToken) -> Result<Option<ShareLink>>;

    /// Consume one view if the link exists, has not expired at `now`, and
    /// has budget left. Returns the recipe id on success.
    async fn consume_share(&self, token: &ShareToken, now: i64) -> Result<Option<RecipeId>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Comments
    // ─────────────────────────────────────────────────────────────────────────

    async fn insert_comment(&self, comment: &Comment) -> Result<()>;

    /// Comments on a recipe, newest first.
    async fn list_comments(&self, recipe_id: &RecipeId) -> Result<Vec<Comment>>;
}

/// Extension trait for common store patterns.
pub trait StoreExt: Store {
    /// Attach children to recipe rows, preserving row order.
    ///
    /// An empty input issues no queries.
    fn hydrate(
        &self,
        records: Vec<RecipeRecord>,
    ) -> impl Future<Output = Result<Vec<Recipe>>> + Send;

    /// Load one hydrated recipe.
    fn load_recipe(&self, recipe_id: &RecipeId) -> impl Future<Output = Result<Option<Recipe>>> + Send;
}

impl<S: Store + ?Sized> StoreExt for S {
    async fn hydrate(&self, records: Vec<RecipeRecord>) -> Result<Vec<Recipe>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<RecipeId> = records.iter().map(|r| r.id.clone()).collect();
        let children = self.load_children(&ids).await?;

        let mut ingredients: HashMap<RecipeId, Vec<Ingredient>> = HashMap::new();
        for (recipe_id, ingredient) in children.ingredients {
            ingredients.entry(recipe_id).or_default().push(ingredient);
        }

        let mut steps: HashMap<RecipeId, Vec<Step>> = HashMap::new();
        for (recipe_id, step) in children.steps {
            steps.entry(recipe_id).or_default().push(step);
        }

        let mut groups: HashMap<RecipeId, Vec<GroupAssociation>> = HashMap::new();
        for association in children.groups {
            groups
                .entry(association.recipe_id.clone())
                .or_default()
                .push(association);
        }

        let mut categories: HashMap<RecipeId, Vec<String>> = HashMap::new();
        for (recipe_id, category) in children.categories {
            categories.entry(recipe_id).or_default().push(category);
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let id = record.id.clone();
                Recipe::assemble(
                    record,
                    ingredients.remove(&id).unwrap_or_default(),
                    steps.remove(&id).unwrap_or_default(),
                    groups.remove(&id).unwrap_or_default(),
                    categories.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }

    async fn load_recipe(&self, recipe_id: &RecipeId) -> Result<Option<Recipe>> {
        let Some(record) = self.get_recipe_record(recipe_id).await? else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![record]).await?.pop())
    }
}
