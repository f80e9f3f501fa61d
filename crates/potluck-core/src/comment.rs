//! Recipe comments.

use serde::{Deserialize, Serialize};

use crate::types::{CommentId, RecipeId, UserId};

/// A comment left on a recipe by a member of one of its groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub recipe_id: RecipeId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCommentInput {
    pub recipe_id: RecipeId,
    pub content: String,
}
