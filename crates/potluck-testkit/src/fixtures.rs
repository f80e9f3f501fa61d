//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::Path;
use std::sync::Arc;

use potluck::{Potluck, PotluckConfig};
use potluck_core::{GroupId, ManualClock, PutRecipeInput, UserId};
use potluck_store::{SqliteStore, Store};

/// Fixed start time for every fixture clock.
pub const START_MILLIS: i64 = 1_700_000_000_000;

/// A Potluck instance over an in-memory store, with a manual clock.
pub struct TestFixture {
    pub potluck: Potluck<SqliteStore>,
    pub clock: Arc<ManualClock>,
}

impl TestFixture {
    /// Create an empty fixture.
    pub fn new() -> Self {
        let store = SqliteStore::open_memory().expect("open in-memory store");
        Self::from_store(store, Arc::new(ManualClock::new(START_MILLIS)))
    }

    /// Create a fixture with `(user, group)` memberships.
    pub async fn with_members(members: &[(&str, &str)]) -> Self {
        let fixture = Self::new();
        for (user, group) in members {
            fixture.join(user, group).await;
        }
        fixture
    }

    fn from_store(store: SqliteStore, clock: Arc<ManualClock>) -> Self {
        let potluck = Potluck::with_clock(store, clock.clone(), PotluckConfig::default());
        Self { potluck, clock }
    }

    /// Shorthand for a user id.
    pub fn user(name: &str) -> UserId {
        UserId::new(name)
    }

    /// Shorthand for a group id.
    pub fn group(name: &str) -> GroupId {
        GroupId::new(name)
    }

    /// The underlying store.
    pub fn store(&self) -> &SqliteStore {
        self.potluck.store()
    }

    /// Add a membership.
    pub async fn join(&self, user: &str, group: &str) {
        self.store()
            .add_member(&UserId::new(user), &GroupId::new(group), "member")
            .await
            .expect("add member");
    }

    /// Remove a membership.
    pub async fn leave(&self, user: &str, group: &str) {
        self.store()
            .remove_member(&UserId::new(user), &GroupId::new(group))
            .await
            .expect("remove member");
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Open `count` fixtures over the same database file, sharing one clock.
///
/// Each fixture has its own connection, so they contend the way separate
/// processes would.
pub fn shared_file_fixtures(path: &Path, count: usize) -> Vec<TestFixture> {
    let clock = Arc::new(ManualClock::new(START_MILLIS));
    (0..count)
        .map(|_| {
            let store = SqliteStore::open(path).expect("open file store");
            TestFixture::from_store(store, Arc::clone(&clock))
        })
        .collect()
}

/// A minimal recipe input in one group.
pub fn recipe(name: &str, group: &str) -> PutRecipeInput {
    PutRecipeInput::new(name)
        .group(GroupId::new(group))
        .step("Cook")
}
