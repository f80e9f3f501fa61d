//! Share links: anonymous, token-gated access to one recipe.
//!
//! Each recipe has at most one link. Its owner can change the access type,
//! view cap and expiry at any time; the token and view count survive those
//! changes. Consumption is anonymous and spends one view atomically.

use std::sync::Arc;

use potluck_access::AccessGuard;
use potluck_core::{
    Recipe, RecipeId, ShareAvailability, ShareId, ShareLink, ShareToken, UpsertShareInput, UserId,
};
use potluck_store::Store;

use crate::context::Context;
use crate::error::{denied, Result};
use crate::recipes::RecipeStore;

/// Issues, updates and consumes share links.
pub struct ShareLedger<S, G> {
    ctx: Arc<Context<S, G>>,
    recipes: Arc<RecipeStore<S, G>>,
}

impl<S: Store, G: AccessGuard> ShareLedger<S, G> {
    pub(crate) fn new(ctx: Arc<Context<S, G>>, recipes: Arc<RecipeStore<S, G>>) -> Self {
        Self { ctx, recipes }
    }

    /// Create the recipe's link, or update the policy of the existing one.
    ///
    /// Only the owner may do this.
    pub async fn upsert_share(&self, user_id: &UserId, input: &UpsertShareInput) -> Result<ShareLink> {
        self.ctx
            .guard
            .assert_ownership(&input.recipe_id, user_id)
            .await
            .map_err(|e| denied("upsert_share", user_id, e))?;

        let candidate = ShareLink {
            id: ShareId::generate(),
            recipe_id: input.recipe_id.clone(),
            token: ShareToken::generate(self.ctx.config.token_bytes),
            access_type: input.access_type,
            max_views: input.max_views,
            current_views: 0,
            expires_at: input.expires_at,
            created_by: user_id.clone(),
            created_at: self.ctx.now(),
        };

        let link = self.ctx.store.upsert_share(&candidate).await?;
        tracing::info!(
            %user_id,
            recipe_id = %link.recipe_id,
            access_type = %link.access_type,
            max_views = ?link.max_views,
            expires_at = ?link.expires_at,
            "share link upserted"
        );
        Ok(link)
    }

    /// Links for a recipe the caller can see, newest first.
    pub async fn list_shares(&self, user_id: &UserId, recipe_id: &RecipeId) -> Result<Vec<ShareLink>> {
        self.ctx
            .guard
            .assert_recipe_access(recipe_id, user_id)
            .await?;

        Ok(self.ctx.store.list_shares(recipe_id).await?)
    }

    /// Spend one view of `token`.
    ///
    /// Returns the recipe id, or `None` when the token is unknown, expired,
    /// or out of views. Policy never produces an error.
    pub async fn consume(&self, token: &ShareToken) -> Result<Option<RecipeId>> {
        let granted = self.ctx.store.consume_share(token, self.ctx.now()).await?;
        tracing::debug!(granted = granted.is_some(), "share token consumed");
        Ok(granted)
    }

    /// The state of `token`'s link at the current time, without spending a
    /// view. `None` when the token is unknown.
    pub async fn share_availability(&self, token: &ShareToken) -> Result<Option<ShareAvailability>> {
        let link = self.ctx.store.find_share_by_token(token).await?;
        Ok(link.map(|link| link.availability(self.ctx.now())))
    }

    /// Spend one view of `token` and load the recipe it grants.
    pub async fn shared_recipe(&self, token: &ShareToken) -> Result<Option<Recipe>> {
        let Some(recipe_id) = self.consume(token).await? else {
            return Ok(None);
        };

        self.recipes.get_recipe_by_id(&recipe_id, None).await
    }
}
