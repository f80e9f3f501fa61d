//! # Potluck
//!
//! The unified API for Potluck: a group-scoped recipe library with ranked
//! search and anonymous share links.
//!
//! ## Overview
//!
//! - **Recipes**: aggregates of ingredients, steps, groups and categories,
//!   visible only to members of the recipe's groups
//! - **Search**: ranked full-text search, suggestions, similar recipes and
//!   popular ingredients, always bounded by the caller's groups
//! - **Share links**: one link per recipe, with optional expiry and view
//!   cap, consumed anonymously by token
//! - **Comments**: discussion on a recipe among its groups
//!
//! ## Usage
//!
//! ```rust,no_run
//! use potluck::{Potluck, PotluckConfig};
//! use potluck::core::{GroupId, PutRecipeInput, SearchFilters, UpsertShareInput, UserId};
//! use potluck::store::{SqliteStore, Store};
//!
//! async fn example() {
//!     let store = SqliteStore::open("potluck.db").unwrap();
//!     let alice = UserId::new("alice");
//!     store.add_member(&alice, &GroupId::new("family"), "owner").await.unwrap();
//!
//!     let potluck = Potluck::new(store, PotluckConfig::default());
//!
//!     let recipe = potluck
//!         .put_recipe(
//!             &alice,
//!             &PutRecipeInput::new("Garlic bread")
//!                 .group(GroupId::new("family"))
//!                 .ingredient("garlic", 3.0, "cloves")
//!                 .step("Toast the bread"),
//!         )
//!         .await
//!         .unwrap();
//!
//!     let hits = potluck
//!         .search(&alice, "garlic", &SearchFilters::default())
//!         .await
//!         .unwrap();
//!
//!     let link = potluck
//!         .upsert_share(&alice, &UpsertShareInput::public(recipe.id.clone()))
//!         .await
//!         .unwrap();
//!     let shared = potluck.shared_recipe(&link.token).await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `potluck::core` - Identifiers, aggregates, share policy, units
//! - `potluck::store` - Storage abstraction and SQLite
//! - `potluck::access` - Membership and ownership checks

pub mod comments;
pub mod config;
mod context;
pub mod error;
pub mod kernel;
pub mod recipes;
pub mod search;
pub mod shares;

// Re-export component crates
pub use potluck_access as access;
pub use potluck_core as core;
pub use potluck_store as store;

pub use comments::CommentThread;
pub use config::{PotluckConfig, SearchConfig};
pub use error::{ErrorKind, PotluckError, Result};
pub use kernel::Potluck;
pub use recipes::RecipeStore;
pub use search::SearchEngine;
pub use shares::ShareLedger;

// Re-export commonly used core types
pub use potluck_core::{
    AccessType, AddCommentInput, Comment, GroupId, PopularTerm, PutRecipeInput, Recipe, RecipeId,
    ScoredRecipe, SearchFilters, ShareAvailability, ShareConditions, ShareLink, ShareToken,
    UpsertShareInput, UserId,
};
