//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, potluck_core::now_millis()],
            )?;
            tracing::debug!(version, "applied schema migration");
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Group membership, written by the membership administration layer
        CREATE TABLE group_members (
            group_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            role TEXT NOT NULL,
            joined_at INTEGER NOT NULL,           -- Unix ms
            PRIMARY KEY (group_id, user_id)
        );

        -- Recipe parent rows
        CREATE TABLE recipes (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            image_url TEXT,
            created_by TEXT NOT NULL,             -- owner
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        -- Child ids are client-supplied and unique only within their recipe
        CREATE TABLE recipe_ingredients (
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            id TEXT NOT NULL,
            name TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL,
            metric_quantity REAL,
            imperial_quantity REAL,
            PRIMARY KEY (recipe_id, id)
        );

        CREATE TABLE recipe_steps (
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            id TEXT NOT NULL,
            step_number INTEGER NOT NULL,         -- 1-based
            instruction TEXT NOT NULL,
            PRIMARY KEY (recipe_id, id)
        );

        CREATE TABLE recipe_groups (
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            group_id TEXT NOT NULL,
            added_by TEXT NOT NULL,
            added_at INTEGER NOT NULL,
            PRIMARY KEY (recipe_id, group_id)
        );

        CREATE TABLE recipe_categories (
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            PRIMARY KEY (recipe_id, name)
        );

        -- At most one link per recipe; tokens are globally unique
        CREATE TABLE recipe_shares (
            id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL UNIQUE REFERENCES recipes(id) ON DELETE CASCADE,
            share_token TEXT NOT NULL UNIQUE,
            access_type TEXT NOT NULL,            -- 'public' | 'inviteOnly'
            max_views INTEGER,
            current_views INTEGER NOT NULL DEFAULT 0,
            expires_at INTEGER,                   -- Unix ms
            created_by TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE comments (
            id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        -- Text index, one row per recipe keyed by recipe_id
        CREATE VIRTUAL TABLE recipe_search_fts USING fts5(
            recipe_id UNINDEXED,
            name,
            ingredients,
            steps,
            categories,
            tokenize = 'porter unicode61'
        );

        -- Indexes for common queries
        CREATE INDEX idx_group_members_user ON group_members(user_id);
        CREATE INDEX idx_recipes_updated ON recipes(updated_at);
        CREATE INDEX idx_recipe_steps_recipe ON recipe_steps(recipe_id, step_number);
        CREATE INDEX idx_recipe_groups_group ON recipe_groups(group_id);
        CREATE INDEX idx_comments_recipe ON comments(recipe_id, created_at);
        "#,
    )?;

    Ok(())
}
