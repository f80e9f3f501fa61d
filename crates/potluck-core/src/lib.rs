//! # Potluck Core
//!
//! Core types for Potluck, a group-scoped recipe library.
//!
//! ## Overview
//!
//! - **Recipe aggregate**: [`Recipe`] owns its ingredients, steps, group
//!   associations and categories. It is read and written as one unit.
//! - **Share links**: [`ShareLink`] grants anonymous, limited access to one
//!   recipe. [`ShareConditions`] evaluates expiry and view budgets.
//! - **Identifiers**: newtypes over UUID strings, plus [`ShareToken`].
//! - **Units**: metric/imperial conversion of ingredient quantities.
//! - **Clock**: the [`Clock`] trait used for timestamps and expiry.
//!
//! This crate has no I/O. Persistence lives in `potluck-store`, access
//! checks in `potluck-access`.

pub mod clock;
pub mod comment;
pub mod error;
pub mod recipe;
pub mod search;
pub mod share;
pub mod types;
pub mod units;
pub mod validation;

pub use clock::{now_millis, Clock, ManualClock, SystemClock};
pub use comment::{AddCommentInput, Comment};
pub use error::{CoreError, ValidationError};
pub use recipe::{
    GroupAssociation, Ingredient, IngredientInput, PutRecipeInput, Recipe, RecipeRecord,
    ScoredRecipe, Step, StepInput,
};
pub use search::{terms, PopularTerm, SearchFilters, DEFAULT_MAX_RESULTS};
pub use share::{AccessType, ShareAvailability, ShareConditions, ShareLink, UpsertShareInput};
pub use types::{
    CommentId, GroupId, IngredientId, RecipeId, ShareId, ShareToken, StepId, UserId,
    DEFAULT_TOKEN_BYTES,
};
pub use units::{convert, ConvertedQuantity, Unit};
pub use validation::{validate_child_ids, validate_limit, validate_search_filters};
