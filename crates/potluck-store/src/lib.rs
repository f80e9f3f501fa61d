//! # Potluck Store
//!
//! Storage abstraction for Potluck. Provides a trait-based interface for
//! recipe, share link and comment persistence, with a SQLite implementation
//! that also maintains the FTS5 search index.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`StoreExt`] - Hydration of recipe rows into full aggregates
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`RecipeWrite`] - A fully resolved aggregate write
//! - [`SearchQuery`] - A ranked text query over the caller's groups
//!
//! ## Usage
//!
//! ```rust,no_run
//! use potluck_store::{SqliteStore, Store, StoreExt};
//! use potluck_core::RecipeId;
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("potluck.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let recipe = store.load_recipe(&RecipeId::new("r1")).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **No authorization**: the store trusts its caller. Access checks live
//!   in `potluck-access`.
//! - **Literal search input**: terms are quoted before reaching `MATCH`
//!   (see [`fts`]).
//! - **Bounded hydration**: children are fetched with `IN (...)` batches of
//!   at most [`StoreConfig::hydration_chunk`] ids.

pub mod error;
pub mod fts;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use sqlite::{SqliteStore, StoreConfig};
pub use traits::{
    MatchMode, RankedRecord, RecipeChildren, RecipeWrite, SaveOutcome, SearchDocument,
    SearchQuery, Store, StoreExt,
};
