//! The access guard capability and its store-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use potluck_core::{GroupId, RecipeId, UserId};
use potluck_store::Store;

use crate::error::{AccessError, Result};

/// Membership and ownership checks.
///
/// Each check is a pure predicate: it either returns `Ok(())` or a
/// [`AccessError::Forbidden`], and never writes.
#[async_trait]
pub trait AccessGuard: Send + Sync {
    /// Forbidden unless `user_id` is a member of `group_id`.
    async fn assert_member(&self, user_id: &UserId, group_id: &GroupId) -> Result<()>;

    /// Forbidden unless some group contains both the recipe and the user.
    async fn assert_recipe_access(&self, recipe_id: &RecipeId, user_id: &UserId) -> Result<()>;

    /// Forbidden unless the recipe exists and `user_id` owns it.
    async fn assert_ownership(&self, recipe_id: &RecipeId, user_id: &UserId) -> Result<()>;

    /// [`AccessGuard::assert_member`] for every group, stopping at the first
    /// denial.
    async fn assert_member_of_all(&self, user_id: &UserId, group_ids: &[GroupId]) -> Result<()> {
        for group_id in group_ids {
            self.assert_member(user_id, group_id).await?;
        }
        Ok(())
    }
}

/// An [`AccessGuard`] that evaluates its predicates against a [`Store`].
pub struct StoreGuard<S> {
    store: Arc<S>,
}

impl<S: Store> StoreGuard<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<S> Clone for StoreGuard<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[async_trait]
impl<S: Store> AccessGuard for StoreGuard<S> {
    async fn assert_member(&self, user_id: &UserId, group_id: &GroupId) -> Result<()> {
        if self.store.is_member(user_id, group_id).await? {
            return Ok(());
        }

        tracing::debug!(%user_id, %group_id, "membership check denied");
        Err(AccessError::Forbidden(format!(
            "user is not a member of group {}",
            group_id
        )))
    }

    async fn assert_recipe_access(&self, recipe_id: &RecipeId, user_id: &UserId) -> Result<()> {
        if self.store.shares_group(recipe_id, user_id).await? {
            return Ok(());
        }

        tracing::debug!(%user_id, %recipe_id, "recipe access denied");
        Err(AccessError::Forbidden(format!(
            "no access to recipe {}",
            recipe_id
        )))
    }

    async fn assert_ownership(&self, recipe_id: &RecipeId, user_id: &UserId) -> Result<()> {
        match self.store.recipe_owner(recipe_id).await? {
            Some(owner) if &owner == user_id => Ok(()),
            _ => {
                tracing::debug!(%user_id, %recipe_id, "ownership check denied");
                Err(AccessError::Forbidden(format!(
                    "not the owner of recipe {}",
                    recipe_id
                )))
            }
        }
    }
}
