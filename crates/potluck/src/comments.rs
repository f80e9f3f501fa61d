//! Per-recipe discussion, visible to the recipe's groups.

use std::sync::Arc;

use potluck_access::AccessGuard;
use potluck_core::{AddCommentInput, Comment, CommentId, RecipeId, UserId};
use potluck_store::Store;

use crate::context::Context;
use crate::error::{denied, Result};

pub struct CommentThread<S, G> {
    ctx: Arc<Context<S, G>>,
}

impl<S: Store, G: AccessGuard> CommentThread<S, G> {
    pub(crate) fn new(ctx: Arc<Context<S, G>>) -> Self {
        Self { ctx }
    }

    pub async fn add_comment(&self, user_id: &UserId, input: &AddCommentInput) -> Result<Comment> {
        self.ctx
            .guard
            .assert_recipe_access(&input.recipe_id, user_id)
            .await
            .map_err(|e| denied("add_comment", user_id, e))?;

        let now = self.ctx.now();
        let comment = Comment {
            id: CommentId::generate(),
            recipe_id: input.recipe_id.clone(),
            user_id: user_id.clone(),
            content: input.content.clone(),
            created_at: now,
            updated_at: now,
        };
        self.ctx.store.insert_comment(&comment).await?;

        tracing::debug!(%user_id, recipe_id = %comment.recipe_id, "comment added");
        Ok(comment)
    }

    /// Comments on a recipe, newest first.
    pub async fn list_comments(&self, user_id: &UserId, recipe_id: &RecipeId) -> Result<Vec<Comment>> {
        self.ctx
            .guard
            .assert_recipe_access(recipe_id, user_id)
            .await?;

        Ok(self.ctx.store.list_comments(recipe_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::context;
    use crate::error::ErrorKind;
    use crate::recipes::RecipeStore;
    use potluck_core::{GroupId, PutRecipeInput};

    #[tokio::test]
    async fn test_comments_follow_recipe_access() {
        let (ctx, clock) = context().await;
        let recipes = RecipeStore::new(Arc::clone(&ctx));
        let thread = CommentThread::new(ctx);

        let recipe = recipes
            .put_recipe(
                &UserId::new("alice"),
                &PutRecipeInput::new("Soup").group(GroupId::new("g1")),
            )
            .await
            .unwrap();

        let input = |content: &str| AddCommentInput {
            recipe_id: recipe.id.clone(),
            content: content.to_string(),
        };

        thread.add_comment(&UserId::new("bob"), &input("Lovely")).await.unwrap();
        clock.advance(10);
        thread.add_comment(&UserId::new("alice"), &input("Thanks")).await.unwrap();

        let err = thread
            .add_comment(&UserId::new("carol"), &input("Hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let comments = thread.list_comments(&UserId::new("bob"), &recipe.id).await.unwrap();
        let contents: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["Thanks", "Lovely"]);

        assert!(thread
            .list_comments(&UserId::new("carol"), &recipe.id)
            .await
            .is_err());
    }
}
