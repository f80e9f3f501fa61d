//! # Potluck Access
//!
//! Membership and ownership predicates for Potluck.
//!
//! ## Overview
//!
//! Recipes are visible only to users who share a group with them. Every
//! service in the `potluck` crate asks an [`AccessGuard`] before it reads or
//! writes, except anonymous share link consumption.
//!
//! ## Key Concepts
//!
//! - **Membership**: a user belongs to a group ([`AccessGuard::assert_member`])
//! - **Recipe access**: some group holds both the recipe and the user
//!   ([`AccessGuard::assert_recipe_access`])
//! - **Ownership**: the user created the recipe
//!   ([`AccessGuard::assert_ownership`]). A missing recipe and a foreign
//!   recipe are the same denial.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use potluck_access::{AccessGuard, StoreGuard};
//! use potluck_core::{RecipeId, UserId};
//! use potluck_store::SqliteStore;
//!
//! async fn example() {
//!     let store = Arc::new(SqliteStore::open_memory().unwrap());
//!     let guard = StoreGuard::new(store);
//!
//!     let allowed = guard
//!         .assert_recipe_access(&RecipeId::new("r1"), &UserId::new("alice"))
//!         .await
//!         .is_ok();
//! }
//! ```

pub mod error;
pub mod guard;

pub use error::{AccessError, Result};
pub use guard::{AccessGuard, StoreGuard};
