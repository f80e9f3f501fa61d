//! # Potluck Testkit
//!
//! Testing utilities for Potluck.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: an in-memory [`Potluck`](potluck::Potluck) with seeded
//!   group memberships and a manual clock
//! - **Generators**: Proptest strategies for recipe inputs and share
//!   conditions
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use potluck_testkit::fixtures::{recipe, TestFixture};
//!
//! async fn example() {
//!     let fixture = TestFixture::with_members(&[("alice", "g1"), ("bob", "g1")]).await;
//!     let recipe = fixture
//!         .potluck
//!         .put_recipe(&TestFixture::user("alice"), &recipe("Soup", "g1"))
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use potluck_testkit::generators::put_recipe_input;
//!
//! proptest! {
//!     #[test]
//!     fn steps_are_numbered(input in put_recipe_input("g1")) {
//!         prop_assert!(input.steps.iter().all(|s| s.step_number >= 1));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{recipe, shared_file_fixtures, TestFixture, START_MILLIS};
pub use generators::{put_recipe_input, share_conditions};
