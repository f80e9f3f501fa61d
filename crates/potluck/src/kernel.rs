//! The Potluck facade: one entry point over every service.
//!
//! `Potluck` wires a store, an access guard and a clock into the recipe
//! store, search engine, share ledger and comment thread, and exposes their
//! operations directly.

use std::sync::Arc;

use potluck_access::{AccessGuard, StoreGuard};
use potluck_core::{
    AddCommentInput, Clock, Comment, PopularTerm, PutRecipeInput, Recipe, RecipeId, ScoredRecipe,
    SearchFilters, ShareAvailability, ShareLink, ShareToken, SystemClock, UpsertShareInput, UserId,
};
use potluck_store::Store;

use crate::comments::CommentThread;
use crate::config::PotluckConfig;
use crate::context::Context;
use crate::error::Result;
use crate::recipes::RecipeStore;
use crate::search::SearchEngine;
use crate::shares::ShareLedger;

/// The main Potluck struct.
///
/// Provides a unified API for:
/// - Creating, replacing, loading and deleting recipes
/// - Searching the caller's groups
/// - Managing and consuming share links
/// - Commenting on recipes
pub struct Potluck<S, G = StoreGuard<S>> {
    /// The storage backend.
    store: Arc<S>,
    recipes: Arc<RecipeStore<S, G>>,
    search: SearchEngine<S, G>,
    shares: ShareLedger<S, G>,
    comments: CommentThread<S, G>,
    /// Configuration.
    config: PotluckConfig,
}

impl<S: Store + 'static> Potluck<S, StoreGuard<S>> {
    /// Create an instance that checks access against its own store and
    /// reads the system clock.
    pub fn new(store: S, config: PotluckConfig) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), config)
    }

    /// Like [`Potluck::new`] with an explicit clock.
    pub fn with_clock(store: S, clock: Arc<dyn Clock>, config: PotluckConfig) -> Self {
        let store = Arc::new(store);
        let guard = Arc::new(StoreGuard::new(Arc::clone(&store)));
        Self::with_parts(store, guard, clock, config)
    }
}

impl<S: Store, G: AccessGuard> Potluck<S, G> {
    /// Assemble from explicit parts.
    pub fn with_parts(
        store: Arc<S>,
        guard: Arc<G>,
        clock: Arc<dyn Clock>,
        config: PotluckConfig,
    ) -> Self {
        let ctx = Arc::new(Context::new(
            Arc::clone(&store),
            guard,
            clock,
            config.clone(),
        ));
        let recipes = Arc::new(RecipeStore::new(Arc::clone(&ctx)));

        Self {
            store,
            search: SearchEngine::new(Arc::clone(&ctx), Arc::clone(&recipes)),
            shares: ShareLedger::new(Arc::clone(&ctx), Arc::clone(&recipes)),
            comments: CommentThread::new(ctx),
            recipes,
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PotluckConfig {
        &self.config
    }

    pub fn recipes(&self) -> &RecipeStore<S, G> {
        &self.recipes
    }

    pub fn search_engine(&self) -> &SearchEngine<S, G> {
        &self.search
    }

    pub fn share_ledger(&self) -> &ShareLedger<S, G> {
        &self.shares
    }

    pub fn comment_thread(&self) -> &CommentThread<S, G> {
        &self.comments
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Recipes
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_recipes_for_user(&self, user_id: &UserId) -> Result<Vec<Recipe>> {
        self.recipes.list_recipes_for_user(user_id).await
    }

    pub async fn get_recipe_by_id(
        &self,
        recipe_id: &RecipeId,
        user_id: Option<&UserId>,
    ) -> Result<Option<Recipe>> {
        self.recipes.get_recipe_by_id(recipe_id, user_id).await
    }

    pub async fn put_recipe(&self, user_id: &UserId, input: &PutRecipeInput) -> Result<Recipe> {
        self.recipes.put_recipe(user_id, input).await
    }

    pub async fn delete_recipe(&self, user_id: &UserId, recipe_id: &RecipeId) -> Result<()> {
        self.recipes.delete_recipe(user_id, recipe_id).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn search(
        &self,
        user_id: &UserId,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<ScoredRecipe>> {
        self.search.search(user_id, query, filters).await
    }

    pub async fn suggestions(
        &self,
        user_id: &UserId,
        partial: &str,
        max: Option<u32>,
    ) -> Result<Vec<String>> {
        self.search.suggestions(user_id, partial, max).await
    }

    pub async fn similar(
        &self,
        user_id: &UserId,
        recipe_id: &RecipeId,
        max: Option<u32>,
    ) -> Result<Vec<ScoredRecipe>> {
        self.search.similar(user_id, recipe_id, max).await
    }

    pub async fn popular_terms(&self, user_id: &UserId, max: Option<u32>) -> Result<Vec<PopularTerm>> {
        self.search.popular_terms(user_id, max).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Shares
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_shares(&self, user_id: &UserId, recipe_id: &RecipeId) -> Result<Vec<ShareLink>> {
        self.shares.list_shares(user_id, recipe_id).await
    }

    pub async fn upsert_share(&self, user_id: &UserId, input: &UpsertShareInput) -> Result<ShareLink> {
        self.shares.upsert_share(user_id, input).await
    }

    pub async fn consume(&self, token: &ShareToken) -> Result<Option<RecipeId>> {
        self.shares.consume(token).await
    }

    pub async fn shared_recipe(&self, token: &ShareToken) -> Result<Option<Recipe>> {
        self.shares.shared_recipe(token).await
    }

    pub async fn share_availability(&self, token: &ShareToken) -> Result<Option<ShareAvailability>> {
        self.shares.share_availability(token).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Comments
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn add_comment(&self, user_id: &UserId, input: &AddCommentInput) -> Result<Comment> {
        self.comments.add_comment(user_id, input).await
    }

    pub async fn list_comments(&self, user_id: &UserId, recipe_id: &RecipeId) -> Result<Vec<Comment>> {
        self.comments.list_comments(user_id, recipe_id).await
    }
}
