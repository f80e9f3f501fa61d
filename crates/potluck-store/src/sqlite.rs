//! SQLite implementation of the Store trait.
//!
//! This is the storage backend for Potluck. It uses rusqlite with bundled
//! SQLite (which includes FTS5), wrapped in async via
//! `tokio::task::spawn_blocking`.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::types::{Type, Value};
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};

use potluck_core::{
    AccessType, Comment, CommentId, GroupAssociation, GroupId, Ingredient, IngredientId,
    PopularTerm, RecipeId, RecipeRecord, ShareId, ShareLink, ShareToken, Step, StepId, UserId,
};

use crate::error::{Result, StoreError};
use crate::fts;
use crate::migration;
use crate::traits::{
    RankedRecord, RecipeChildren, RecipeWrite, SaveOutcome, SearchDocument, SearchQuery, Store,
};

/// Tuning knobs for [`SqliteStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long a statement waits on another connection's lock.
    pub busy_timeout: Duration,
    /// Maximum number of recipe ids bound into one `IN (...)` clause
    /// during hydration.
    pub hydration_chunk: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            hydration_chunk: 200,
        }
    }
}

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime. Several stores may open the same
/// file; they coordinate through SQLite's own locking.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
    config: StoreConfig,
}

const RECIPE_COLUMNS: &str =
    "r.id, r.name, r.description, r.image_url, r.created_by, r.created_at, r.updated_at";

const SHARE_COLUMNS: &str = "id, recipe_id, share_token, access_type, max_views, current_views, \
     expires_at, created_by, created_at";

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, StoreConfig::default())
    }

    /// Open a SQLite database with explicit configuration.
    pub fn open_with(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        Self::prepare(&mut conn, &config)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let config = StoreConfig::default();
        let mut conn = Connection::open_in_memory()?;
        Self::prepare(&mut conn, &config)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    fn prepare(conn: &mut Connection, config: &StoreConfig) -> Result<()> {
        conn.busy_timeout(config.busy_timeout)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migration::migrate(conn)
    }

    /// Run `f` against the connection on the blocking pool.
    async fn run<F, T>(&self, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task {
            op,
            reason: e.to_string(),
        })?
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row helpers
// ─────────────────────────────────────────────────────────────────────────────

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<RecipeRecord> {
    Ok(RecipeRecord {
        id: RecipeId::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        image_url: row.get(3)?,
        owner: UserId::new(row.get::<_, String>(4)?),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn row_to_share(row: &Row<'_>) -> rusqlite::Result<ShareLink> {
    let access: String = row.get(3)?;
    let access_type = access
        .parse::<AccessType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(ShareLink {
        id: ShareId::new(row.get::<_, String>(0)?),
        recipe_id: RecipeId::new(row.get::<_, String>(1)?),
        token: ShareToken::new(row.get::<_, String>(2)?),
        access_type,
        max_views: row.get(4)?,
        current_views: row.get(5)?,
        expires_at: row.get(6)?,
        created_by: UserId::new(row.get::<_, String>(7)?),
        created_at: row.get(8)?,
    })
}

fn row_to_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: CommentId::new(row.get::<_, String>(0)?),
        recipe_id: RecipeId::new(row.get::<_, String>(1)?),
        user_id: UserId::new(row.get::<_, String>(2)?),
        content: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn text(value: &str) -> Value {
    Value::Text(value.to_owned())
}

/// `EXISTS` clause limiting `r` to recipes in one of the user's groups,
/// optionally narrowed to `group_ids`. Pushes its parameters in order.
fn scope_clause(user_id: &UserId, group_ids: &[GroupId], args: &mut Vec<Value>) -> String {
    let mut clause = String::from(
        "EXISTS (SELECT 1 FROM recipe_groups rg \
         JOIN group_members gm ON gm.group_id = rg.group_id \
         WHERE rg.recipe_id = r.id AND gm.user_id = ?",
    );
    args.push(text(user_id.as_str()));

    if !group_ids.is_empty() {
        clause.push_str(" AND rg.group_id IN (");
        clause.push_str(&placeholders(group_ids.len()));
        clause.push(')');
        args.extend(group_ids.iter().map(|g| text(g.as_str())));
    }

    clause.push(')');
    clause
}

/// Replace every child row and the search document of one recipe.
fn write_children(tx: &Transaction<'_>, write: &RecipeWrite) -> Result<()> {
    let recipe_id = write.record.id.as_str();

    for table in [
        "recipe_ingredients",
        "recipe_steps",
        "recipe_groups",
        "recipe_categories",
    ] {
        tx.execute(
            &format!("DELETE FROM {table} WHERE recipe_id = ?1"),
            params![recipe_id],
        )?;
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO recipe_ingredients
                (id, recipe_id, name, quantity, unit, metric_quantity, imperial_quantity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for ingredient in &write.ingredients {
            stmt.execute(params![
                ingredient.id.as_str(),
                recipe_id,
                ingredient.name,
                ingredient.quantity,
                ingredient.unit,
                ingredient.metric_quantity,
                ingredient.imperial_quantity,
            ])?;
        }
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO recipe_steps (id, recipe_id, step_number, instruction)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for step in &write.steps {
            stmt.execute(params![
                step.id.as_str(),
                recipe_id,
                step.step_number,
                step.instruction
            ])?;
        }
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO recipe_groups (recipe_id, group_id, added_by, added_at)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for association in &write.groups {
            stmt.execute(params![
                recipe_id,
                association.group_id.as_str(),
                association.added_by.as_str(),
                association.added_at,
            ])?;
        }
    }

    {
        let mut stmt =
            tx.prepare("INSERT INTO recipe_categories (recipe_id, name) VALUES (?1, ?2)")?;
        for category in &write.categories {
            stmt.execute(params![recipe_id, category])?;
        }
    }

    let document = fts::document_for(write);
    tx.execute(
        "DELETE FROM recipe_search_fts WHERE recipe_id = ?1",
        params![recipe_id],
    )?;
    tx.execute(
        "INSERT INTO recipe_search_fts (recipe_id, name, ingredients, steps, categories)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            recipe_id,
            document.name,
            document.ingredients,
            document.steps,
            document.categories
        ],
    )?;

    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    async fn add_member(&self, user_id: &UserId, group_id: &GroupId, role: &str) -> Result<()> {
        let user_id = user_id.clone();
        let group_id = group_id.clone();
        let role = role.to_owned();

        self.run("add_member", move |conn| {
            conn.execute(
                "INSERT INTO group_members (group_id, user_id, role, joined_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(group_id, user_id) DO UPDATE SET role = excluded.role",
                params![
                    group_id.as_str(),
                    user_id.as_str(),
                    role,
                    potluck_core::now_millis()
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn remove_member(&self, user_id: &UserId, group_id: &GroupId) -> Result<()> {
        let user_id = user_id.clone();
        let group_id = group_id.clone();

        self.run("remove_member", move |conn| {
            conn.execute(
                "DELETE FROM group_members WHERE group_id = ?1 AND user_id = ?2",
                params![group_id.as_str(), user_id.as_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn is_member(&self, user_id: &UserId, group_id: &GroupId) -> Result<bool> {
        let user_id = user_id.clone();
        let group_id = group_id.clone();

        self.run("is_member", move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM group_members WHERE group_id = ?1 AND user_id = ?2)",
                params![group_id.as_str(), user_id.as_str()],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    async fn shares_group(&self, recipe_id: &RecipeId, user_id: &UserId) -> Result<bool> {
        let recipe_id = recipe_id.clone();
        let user_id = user_id.clone();

        self.run("shares_group", move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM recipe_groups rg
                    INNER JOIN group_members gm ON gm.group_id = rg.group_id
                    WHERE rg.recipe_id = ?1 AND gm.user_id = ?2
                 )",
                params![recipe_id.as_str(), user_id.as_str()],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    async fn recipe_owner(&self, recipe_id: &RecipeId) -> Result<Option<UserId>> {
        let recipe_id = recipe_id.clone();

        self.run("recipe_owner", move |conn| {
            let owner: Option<String> = conn
                .query_row(
                    "SELECT created_by FROM recipes WHERE id = ?1",
                    params![recipe_id.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(owner.map(UserId::new))
        })
        .await
    }

    async fn save_recipe(&self, write: &RecipeWrite) -> Result<SaveOutcome> {
        let write = write.clone();

        self.run("save_recipe", move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let record = &write.record;

            let outcome = if write.is_new {
                tx.execute(
                    "INSERT INTO recipes
                        (id, name, description, image_url, created_by, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        record.id.as_str(),
                        record.name,
                        record.description,
                        record.image_url,
                        record.owner.as_str(),
                        record.created_at,
                        record.updated_at,
                    ],
                )?;
                SaveOutcome::Created
            } else {
                // The owner predicate re-checks ownership inside the transaction.
                let updated = tx.execute(
                    "UPDATE recipes SET name = ?1, description = ?2, image_url = ?3, updated_at = ?4
                     WHERE id = ?5 AND created_by = ?6",
                    params![
                        record.name,
                        record.description,
                        record.image_url,
                        record.updated_at,
                        record.id.as_str(),
                        record.owner.as_str(),
                    ],
                )?;
                if updated == 0 {
                    return Ok(SaveOutcome::Missing);
                }
                SaveOutcome::Updated
            };

            write_children(&tx, &write)?;
            tx.commit()?;

            tracing::debug!(
                recipe_id = %record.id,
                ?outcome,
                ingredients = write.ingredients.len(),
                steps = write.steps.len(),
                "saved recipe aggregate"
            );
            Ok(outcome)
        })
        .await
    }

    async fn get_recipe_record(&self, recipe_id: &RecipeId) -> Result<Option<RecipeRecord>> {
        let recipe_id = recipe_id.clone();

        self.run("get_recipe_record", move |conn| {
            conn.query_row(
                &format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = ?1"),
                params![recipe_id.as_str()],
                row_to_record,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn list_recipe_records_for_user(&self, user_id: &UserId) -> Result<Vec<RecipeRecord>> {
        let user_id = user_id.clone();

        self.run("list_recipe_records_for_user", move |conn| {
            let mut args = Vec::new();
            let scope = scope_clause(&user_id, &[], &mut args);
            let sql = format!(
                "SELECT {RECIPE_COLUMNS} FROM recipes r
                 WHERE {scope}
                 ORDER BY r.updated_at DESC, r.id ASC"
            );

            let mut stmt = conn.prepare(&sql)?;
            let records = stmt
                .query_map(params_from_iter(args.iter()), row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
        .await
    }

    async fn load_children(&self, recipe_ids: &[RecipeId]) -> Result<RecipeChildren> {
        if recipe_ids.is_empty() {
            return Ok(RecipeChildren::default());
        }

        let recipe_ids = recipe_ids.to_vec();
        let chunk_size = self.config.hydration_chunk.max(1);

        self.run("load_children", move |conn| {
            let mut children = RecipeChildren::default();

            for chunk in recipe_ids.chunks(chunk_size) {
                let marks = placeholders(chunk.len());
                let ids = || params_from_iter(chunk.iter().map(|id| id.as_str()));

                let mut stmt = conn.prepare(&format!(
                    "SELECT recipe_id, id, name, quantity, unit, metric_quantity, imperial_quantity
                     FROM recipe_ingredients WHERE recipe_id IN ({marks})
                     ORDER BY recipe_id, name ASC, id ASC"
                ))?;
                let rows = stmt.query_map(ids(), |row| {
                    Ok((
                        RecipeId::new(row.get::<_, String>(0)?),
                        Ingredient {
                            id: IngredientId::new(row.get::<_, String>(1)?),
                            name: row.get(2)?,
                            quantity: row.get(3)?,
                            unit: row.get(4)?,
                            metric_quantity: row.get(5)?,
                            imperial_quantity: row.get(6)?,
                        },
                    ))
                })?;
                for row in rows {
                    children.ingredients.push(row?);
                }

                let mut stmt = conn.prepare(&format!(
                    "SELECT recipe_id, id, step_number, instruction
                     FROM recipe_steps WHERE recipe_id IN ({marks})
                     ORDER BY recipe_id, step_number ASC, id ASC"
                ))?;
                let rows = stmt.query_map(ids(), |row| {
                    Ok((
                        RecipeId::new(row.get::<_, String>(0)?),
                        Step {
                            id: StepId::new(row.get::<_, String>(1)?),
                            step_number: row.get(2)?,
                            instruction: row.get(3)?,
                        },
                    ))
                })?;
                for row in rows {
                    children.steps.push(row?);
                }

                let mut stmt = conn.prepare(&format!(
                    "SELECT recipe_id, group_id, added_by, added_at
                     FROM recipe_groups WHERE recipe_id IN ({marks})
                     ORDER BY recipe_id, added_at, group_id"
                ))?;
                let rows = stmt.query_map(ids(), |row| {
                    Ok(GroupAssociation {
                        recipe_id: RecipeId::new(row.get::<_, String>(0)?),
                        group_id: GroupId::new(row.get::<_, String>(1)?),
                        added_by: UserId::new(row.get::<_, String>(2)?),
                        added_at: row.get(3)?,
                    })
                })?;
                for row in rows {
                    children.groups.push(row?);
                }

                let mut stmt = conn.prepare(&format!(
                    "SELECT recipe_id, name FROM recipe_categories
                     WHERE recipe_id IN ({marks}) ORDER BY recipe_id, name"
                ))?;
                let rows = stmt.query_map(ids(), |row| {
                    Ok((RecipeId::new(row.get::<_, String>(0)?), row.get(1)?))
                })?;
                for row in rows {
                    children.categories.push(row?);
                }
            }

            Ok(children)
        })
        .await
    }

    async fn delete_recipe(&self, recipe_id: &RecipeId) -> Result<bool> {
        let recipe_id = recipe_id.clone();

        self.run("delete_recipe", move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute(
                "DELETE FROM recipe_search_fts WHERE recipe_id = ?1",
                params![recipe_id.as_str()],
            )?;
            let deleted = tx.execute(
                "DELETE FROM recipes WHERE id = ?1",
                params![recipe_id.as_str()],
            )?;
            tx.commit()?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn search_recipes(&self, user_id: &UserId, query: &SearchQuery) -> Result<Vec<RankedRecord>> {
        let Some(expression) = fts::match_expression(&query.terms, query.mode) else {
            return Ok(Vec::new());
        };
        let user_id = user_id.clone();
        let query = query.clone();

        self.run("search_recipes", move |conn| {
            let mut args = vec![Value::Text(expression)];
            let scope = scope_clause(&user_id, &query.group_ids, &mut args);

            let mut sql = format!(
                "SELECT {RECIPE_COLUMNS}, -bm25(recipe_search_fts, {weights}) AS score
                 FROM recipe_search_fts
                 JOIN recipes r ON r.id = recipe_search_fts.recipe_id
                 WHERE recipe_search_fts MATCH ?
                   AND {scope}",
                weights = fts::BM25_WEIGHTS,
            );

            if !query.categories.is_empty() {
                sql.push_str(&format!(
                    " AND EXISTS (SELECT 1 FROM recipe_categories rc
                       WHERE rc.recipe_id = r.id AND rc.name COLLATE NOCASE IN ({}))",
                    placeholders(query.categories.len())
                ));
                args.extend(query.categories.iter().map(|c| text(c.trim())));
            }

            if let Some(exclude) = &query.exclude {
                sql.push_str(" AND r.id != ?");
                args.push(text(exclude.as_str()));
            }

            sql.push_str(" ORDER BY score DESC, r.updated_at DESC, r.id ASC LIMIT ? OFFSET ?");
            args.push(Value::Integer(i64::from(query.limit)));
            args.push(Value::Integer(i64::from(query.offset)));

            let mut stmt = conn.prepare(&sql)?;
            let ranked = stmt
                .query_map(params_from_iter(args.iter()), |row| {
                    Ok(RankedRecord {
                        record: row_to_record(row)?,
                        rank: row.get(7)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            tracing::debug!(hits = ranked.len(), mode = ?query.mode, "ran recipe search");
            Ok(ranked)
        })
        .await
    }

    async fn suggest(&self, user_id: &UserId, partial: &str, limit: u32) -> Result<Vec<String>> {
        let user_id = user_id.clone();
        let escaped = fts::escape_like(partial);

        self.run("suggest", move |conn| {
            let mut stmt = conn.prepare(
                r#"SELECT term FROM (
                     SELECT MIN(s) AS term FROM (
                       SELECT r.name AS s FROM recipes r
                       WHERE r.name LIKE ?1 ESCAPE '\'
                         AND EXISTS (SELECT 1 FROM recipe_groups rg
                                     JOIN group_members gm ON gm.group_id = rg.group_id
                                     WHERE rg.recipe_id = r.id AND gm.user_id = ?2)
                       UNION
                       SELECT i.name AS s FROM recipe_ingredients i
                       JOIN recipes r ON r.id = i.recipe_id
                       WHERE i.name LIKE ?1 ESCAPE '\'
                         AND EXISTS (SELECT 1 FROM recipe_groups rg
                                     JOIN group_members gm ON gm.group_id = rg.group_id
                                     WHERE rg.recipe_id = r.id AND gm.user_id = ?2)
                     )
                     GROUP BY LOWER(s)
                   )
                   ORDER BY CASE WHEN term LIKE ?3 ESCAPE '\' THEN 0 ELSE 1 END,
                            LENGTH(term), term
                   LIMIT ?4"#,
            )?;

            let suggestions = stmt
                .query_map(
                    params![
                        format!("%{escaped}%"),
                        user_id.as_str(),
                        format!("{escaped}%"),
                        limit
                    ],
                    |row| row.get::<_, String>(0),
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(suggestions)
        })
        .await
    }

    async fn search_document(&self, recipe_id: &RecipeId) -> Result<Option<SearchDocument>> {
        let recipe_id = recipe_id.clone();

        self.run("search_document", move |conn| {
            conn.query_row(
                "SELECT name, ingredients, steps, categories FROM recipe_search_fts
                 WHERE recipe_id = ?1",
                params![recipe_id.as_str()],
                |row| {
                    Ok(SearchDocument {
                        name: row.get(0)?,
                        ingredients: row.get(1)?,
                        steps: row.get(2)?,
                        categories: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn popular_ingredients(
        &self,
        user_id: &UserId,
        min_len: u32,
        limit: u32,
    ) -> Result<Vec<PopularTerm>> {
        let user_id = user_id.clone();

        self.run("popular_ingredients", move |conn| {
            let mut stmt = conn.prepare(
                "SELECT LOWER(TRIM(i.name)) AS term, COUNT(DISTINCT i.recipe_id) AS uses
                 FROM recipe_ingredients i
                 JOIN recipes r ON r.id = i.recipe_id
                 WHERE LENGTH(TRIM(i.name)) >= ?2
                   AND EXISTS (SELECT 1 FROM recipe_groups rg
                               JOIN group_members gm ON gm.group_id = rg.group_id
                               WHERE rg.recipe_id = r.id AND gm.user_id = ?1)
                 GROUP BY term
                 ORDER BY uses DESC, term ASC
                 LIMIT ?3",
            )?;

            let terms = stmt
                .query_map(params![user_id.as_str(), min_len, limit], |row| {
                    Ok(PopularTerm {
                        term: row.get(0)?,
                        count: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(terms)
        })
        .await
    }

    async fn upsert_share(&self, candidate: &ShareLink) -> Result<ShareLink> {
        let candidate = candidate.clone();

        self.run("upsert_share", move |conn| {
            let stored = conn.query_row(
                &format!(
                    "INSERT INTO recipe_shares ({SHARE_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?8)
                     ON CONFLICT(recipe_id) DO UPDATE SET
                        access_type = excluded.access_type,
                        max_views = excluded.max_views,
                        expires_at = excluded.expires_at
                     RETURNING {SHARE_COLUMNS}"
                ),
                params![
                    candidate.id.as_str(),
                    candidate.recipe_id.as_str(),
                    candidate.token.as_str(),
                    candidate.access_type.as_str(),
                    candidate.max_views,
                    candidate.expires_at,
                    candidate.created_by.as_str(),
                    candidate.created_at,
                ],
                row_to_share,
            )?;
            Ok(stored)
        })
        .await
    }

    async fn list_shares(&self, recipe_id: &RecipeId) -> Result<Vec<ShareLink>> {
        let recipe_id = recipe_id.clone();

        self.run("list_shares", move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SHARE_COLUMNS} FROM recipe_shares
                 WHERE recipe_id = ?1 ORDER BY created_at DESC"
            ))?;
            let shares = stmt
                .query_map(params![recipe_id.as_str()], row_to_share)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(shares)
        })
        .await
    }

    async fn find_share_by_token(&self, token: &ShareToken) -> Result<Option<ShareLink>> {
        let token = token.clone();

        self.run("find_share_by_token", move |conn| {
            conn.query_row(
                &format!("SELECT {SHARE_COLUMNS} FROM recipe_shares WHERE share_token = ?1"),
                params![token.as_str()],
                row_to_share,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn consume_share(&self, token: &ShareToken, now: i64) -> Result<Option<RecipeId>> {
        let token = token.clone();

        self.run("consume_share", move |conn| {
            // IMMEDIATE takes the write lock up front so concurrent
            // connections queue on the busy timeout instead of deadlocking.
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let recipe_id: Option<String> = tx
                .query_row(
                    "UPDATE recipe_shares
                     SET current_views = current_views + 1
                     WHERE share_token = ?1
                       AND (expires_at IS NULL OR expires_at > ?2)
                       AND (max_views IS NULL OR current_views < max_views)
                     RETURNING recipe_id",
                    params![token.as_str(), now],
                    |row| row.get(0),
                )
                .optional()?;
            tx.commit()?;
            Ok(recipe_id.map(RecipeId::new))
        })
        .await
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<()> {
        let comment = comment.clone();

        self.run("insert_comment", move |conn| {
            conn.execute(
                "INSERT INTO comments (id, recipe_id, user_id, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    comment.id.as_str(),
                    comment.recipe_id.as_str(),
                    comment.user_id.as_str(),
                    comment.content,
                    comment.created_at,
                    comment.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn list_comments(&self, recipe_id: &RecipeId) -> Result<Vec<Comment>> {
        let recipe_id = recipe_id.clone();

        self.run("list_comments", move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, recipe_id, user_id, content, created_at, updated_at
                 FROM comments WHERE recipe_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let comments = stmt
                .query_map(params![recipe_id.as_str()], row_to_comment)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(comments)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MatchMode, StoreExt};

    fn ingredient(name: &str) -> Ingredient {
        Ingredient {
            id: IngredientId::generate(),
            name: name.to_string(),
            quantity: 1.0,
            unit: "pc".to_string(),
            metric_quantity: None,
            imperial_quantity: None,
        }
    }

    fn make_write(id: &str, owner: &str, group: &str, name: &str, ingredients: &[&str], at: i64) -> RecipeWrite {
        let recipe_id = RecipeId::new(id);
        RecipeWrite {
            record: RecipeRecord {
                id: recipe_id.clone(),
                name: name.to_string(),
                description: None,
                image_url: None,
                owner: UserId::new(owner),
                created_at: at,
                updated_at: at,
            },
            is_new: true,
            ingredients: ingredients.iter().map(|n| ingredient(n)).collect(),
            steps: vec![
                Step {
                    id: StepId::generate(),
                    step_number: 2,
                    instruction: "Serve warm".to_string(),
                },
                Step {
                    id: StepId::generate(),
                    step_number: 1,
                    instruction: "Cook everything".to_string(),
                },
            ],
            groups: vec![GroupAssociation {
                recipe_id,
                group_id: GroupId::new(group),
                added_by: UserId::new(owner),
                added_at: at,
            }],
            categories: vec!["dinner".to_string()],
        }
    }

    fn query(terms: &[&str]) -> SearchQuery {
        SearchQuery {
            terms: terms.iter().map(|t| t.to_string()).collect(),
            mode: MatchMode::All,
            group_ids: vec![],
            categories: vec![],
            exclude: None,
            limit: 20,
            offset: 0,
        }
    }

    fn share(recipe: &str, token: &str, max_views: Option<u32>, expires_at: Option<i64>) -> ShareLink {
        ShareLink {
            id: ShareId::generate(),
            recipe_id: RecipeId::new(recipe),
            token: ShareToken::new(token),
            access_type: AccessType::Public,
            max_views,
            current_views: 0,
            expires_at,
            created_by: UserId::new("alice"),
            created_at: 1,
        }
    }

    async fn seeded() -> SqliteStore {
        let store = SqliteStore::open_memory().unwrap();
        store
            .add_member(&UserId::new("alice"), &GroupId::new("g1"), "owner")
            .await
            .unwrap();
        store
            .add_member(&UserId::new("bob"), &GroupId::new("g1"), "member")
            .await
            .unwrap();
        store
            .add_member(&UserId::new("carol"), &GroupId::new("g2"), "owner")
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_save_and_load_recipe() {
        let store = seeded().await;
        let write = make_write("r1", "alice", "g1", "Garlic bread", &["garlic", "butter", "bread"], 10);

        let outcome = store.save_recipe(&write).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Created);

        let recipe = store.load_recipe(&RecipeId::new("r1")).await.unwrap().unwrap();
        let names: Vec<&str> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["bread", "butter", "garlic"]);
        let steps: Vec<u32> = recipe.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(steps, vec![1, 2]);
        assert_eq!(recipe.categories, vec!["dinner".to_string()]);
        assert!(recipe.in_group(&GroupId::new("g1")));
    }

    #[tokio::test]
    async fn test_update_replaces_children() {
        let store = seeded().await;
        let write = make_write("r1", "alice", "g1", "Soup", &["leek", "potato"], 10);
        store.save_recipe(&write).await.unwrap();

        let mut update = make_write("r1", "alice", "g1", "Leek soup", &["leek"], 20);
        update.is_new = false;
        update.steps.truncate(1);
        update.categories.clear();
        assert_eq!(store.save_recipe(&update).await.unwrap(), SaveOutcome::Updated);

        let recipe = store.load_recipe(&RecipeId::new("r1")).await.unwrap().unwrap();
        assert_eq!(recipe.name, "Leek soup");
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.steps.len(), 1);
        assert!(recipe.categories.is_empty());
        assert_eq!(recipe.created_at, 10);
        assert_eq!(recipe.updated_at, 20);

        // The old search document is gone with the old ingredients.
        let hits = store
            .search_recipes(&UserId::new("alice"), &query(&["potato"]))
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_update_by_other_owner_writes_nothing() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Soup", &["leek"], 10))
            .await
            .unwrap();

        let mut update = make_write("r1", "bob", "g1", "Hijacked", &[], 20);
        update.is_new = false;
        assert_eq!(store.save_recipe(&update).await.unwrap(), SaveOutcome::Missing);

        let recipe = store.load_recipe(&RecipeId::new("r1")).await.unwrap().unwrap();
        assert_eq!(recipe.name, "Soup");
        assert_eq!(recipe.ingredients.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Soup", &["leek"], 10))
            .await
            .unwrap();

        // Duplicate ingredient ids violate the primary key halfway through.
        let mut update = make_write("r1", "alice", "g1", "Broken", &["a", "b"], 20);
        update.is_new = false;
        let dup = update.ingredients[0].id.clone();
        update.ingredients[1].id = dup;
        assert!(store.save_recipe(&update).await.is_err());

        let recipe = store.load_recipe(&RecipeId::new("r1")).await.unwrap().unwrap();
        assert_eq!(recipe.name, "Soup");
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.ingredients[0].name, "leek");
    }

    #[tokio::test]
    async fn test_child_ids_are_scoped_to_their_recipe() {
        let store = seeded().await;
        let first = make_write("r1", "carol", "g2", "Stew", &["beef"], 10);
        store.save_recipe(&first).await.unwrap();

        let mut second = make_write("r2", "alice", "g1", "Soup", &["leek"], 20);
        second.ingredients[0].id = first.ingredients[0].id.clone();
        second.steps[0].id = first.steps[0].id.clone();
        assert_eq!(store.save_recipe(&second).await.unwrap(), SaveOutcome::Created);

        let stew = store.load_recipe(&RecipeId::new("r1")).await.unwrap().unwrap();
        let soup = store.load_recipe(&RecipeId::new("r2")).await.unwrap().unwrap();
        assert_eq!(stew.ingredients[0].id, soup.ingredients[0].id);
        assert_eq!(stew.ingredients[0].name, "beef");
        assert_eq!(soup.ingredients[0].name, "leek");
        assert_eq!(stew.steps.len(), 2);
    }

    #[tokio::test]
    async fn test_search_survives_vacuum() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("potluck.db")).unwrap();
        store
            .add_member(&UserId::new("alice"), &GroupId::new("g1"), "owner")
            .await
            .unwrap();

        for (i, name) in ["Soup", "Stew", "Salad"].iter().enumerate() {
            let id = format!("r{i}");
            store
                .save_recipe(&make_write(&id, "alice", "g1", name, &["leek"], i as i64))
                .await
                .unwrap();
        }
        store.delete_recipe(&RecipeId::new("r0")).await.unwrap();
        store
            .conn
            .lock()
            .unwrap()
            .execute_batch("VACUUM")
            .unwrap();

        let hits = store
            .search_recipes(&UserId::new("alice"), &query(&["stew"]))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.id, RecipeId::new("r1"));

        let document = store
            .search_document(&RecipeId::new("r2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(document.name, "Salad");
    }

    #[tokio::test]
    async fn test_membership_predicates() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Soup", &["leek"], 10))
            .await
            .unwrap();

        let r1 = RecipeId::new("r1");
        assert!(store.is_member(&UserId::new("bob"), &GroupId::new("g1")).await.unwrap());
        assert!(!store.is_member(&UserId::new("carol"), &GroupId::new("g1")).await.unwrap());
        assert!(store.shares_group(&r1, &UserId::new("bob")).await.unwrap());
        assert!(!store.shares_group(&r1, &UserId::new("carol")).await.unwrap());
        assert_eq!(
            store.recipe_owner(&r1).await.unwrap(),
            Some(UserId::new("alice"))
        );
        assert_eq!(store.recipe_owner(&RecipeId::new("nope")).await.unwrap(), None);

        store
            .remove_member(&UserId::new("bob"), &GroupId::new("g1"))
            .await
            .unwrap();
        assert!(!store.shares_group(&r1, &UserId::new("bob")).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_for_user_dedupes_and_orders() {
        let store = seeded().await;
        store
            .add_member(&UserId::new("alice"), &GroupId::new("g3"), "member")
            .await
            .unwrap();

        let mut both = make_write("r1", "alice", "g1", "Older", &["leek"], 10);
        both.groups.push(GroupAssociation {
            recipe_id: RecipeId::new("r1"),
            group_id: GroupId::new("g3"),
            added_by: UserId::new("alice"),
            added_at: 10,
        });
        store.save_recipe(&both).await.unwrap();
        store
            .save_recipe(&make_write("r2", "alice", "g1", "Newer", &["leek"], 20))
            .await
            .unwrap();
        store
            .save_recipe(&make_write("r3", "carol", "g2", "Hidden", &["leek"], 30))
            .await
            .unwrap();

        let records = store
            .list_recipe_records_for_user(&UserId::new("alice"))
            .await
            .unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r1"]);
    }

    #[tokio::test]
    async fn test_hydrate_in_small_chunks() {
        let store = SqliteStore {
            conn: Arc::new(Mutex::new({
                let mut conn = Connection::open_in_memory().unwrap();
                SqliteStore::prepare(&mut conn, &StoreConfig::default()).unwrap();
                conn
            })),
            config: StoreConfig {
                hydration_chunk: 2,
                ..StoreConfig::default()
            },
        };
        store
            .add_member(&UserId::new("alice"), &GroupId::new("g1"), "owner")
            .await
            .unwrap();

        for i in 0..5 {
            let name = format!("ing-{i}");
            store
                .save_recipe(&make_write(&format!("r{i}"), "alice", "g1", "Dish", &[name.as_str()], i))
                .await
                .unwrap();
        }

        let records = store
            .list_recipe_records_for_user(&UserId::new("alice"))
            .await
            .unwrap();
        let recipes = store.hydrate(records).await.unwrap();
        assert_eq!(recipes.len(), 5);
        for recipe in &recipes {
            let suffix = recipe.id.as_str().trim_start_matches('r');
            assert_eq!(recipe.ingredients.len(), 1);
            assert_eq!(recipe.ingredients[0].name, format!("ing-{suffix}"));
        }
    }

    #[tokio::test]
    async fn test_hydrate_empty_issues_no_queries() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.hydrate(Vec::new()).await.unwrap().is_empty());
        assert_eq!(
            store.load_children(&[]).await.unwrap(),
            RecipeChildren::default()
        );
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Soup", &["leek"], 10))
            .await
            .unwrap();
        store.upsert_share(&share("r1", "tok", None, None)).await.unwrap();

        assert!(store.delete_recipe(&RecipeId::new("r1")).await.unwrap());
        assert!(!store.delete_recipe(&RecipeId::new("r1")).await.unwrap());

        let children = store.load_children(&[RecipeId::new("r1")]).await.unwrap();
        assert_eq!(children, RecipeChildren::default());
        assert!(store
            .find_share_by_token(&ShareToken::new("tok"))
            .await
            .unwrap()
            .is_none());
        assert!(store
            .search_document(&RecipeId::new("r1"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_search_is_scoped_to_groups() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Garlic bread", &["garlic"], 10))
            .await
            .unwrap();
        store
            .save_recipe(&make_write("r2", "carol", "g2", "Garlic soup", &["garlic"], 10))
            .await
            .unwrap();

        let hits = store
            .search_recipes(&UserId::new("bob"), &query(&["garlic"]))
            .await
            .unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.record.id.as_str()).collect();
        assert_eq!(ids, vec!["r1"]);

        let hits = store
            .search_recipes(&UserId::new("nobody"), &query(&["garlic"]))
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_ranks_name_matches_higher() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Roast chicken", &["thyme", "lemon"], 10))
            .await
            .unwrap();
        store
            .save_recipe(&make_write("r2", "alice", "g1", "Lemon tart", &["lemon", "sugar"], 5))
            .await
            .unwrap();

        let hits = store
            .search_recipes(&UserId::new("alice"), &query(&["lemon"]))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].record.id.as_str(), "r2");
        assert!(hits[0].rank >= hits[1].rank);
    }

    #[tokio::test]
    async fn test_search_syntax_is_literal() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Soup", &["leek"], 10))
            .await
            .unwrap();

        // Operator keywords are matched as plain words.
        let hits = store
            .search_recipes(&UserId::new("alice"), &query(&["leek", "OR"]))
            .await
            .unwrap();
        assert!(hits.is_empty());

        let hits = store
            .search_recipes(&UserId::new("alice"), &query(&["NOT"]))
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_filters() {
        let store = seeded().await;
        store
            .add_member(&UserId::new("alice"), &GroupId::new("g2"), "member")
            .await
            .unwrap();
        let mut tagged = make_write("r1", "alice", "g1", "Leek pie", &["leek"], 10);
        tagged.categories = vec!["Baking".to_string()];
        store.save_recipe(&tagged).await.unwrap();
        store
            .save_recipe(&make_write("r2", "carol", "g2", "Leek soup", &["leek"], 20))
            .await
            .unwrap();

        let mut q = query(&["leek"]);
        q.categories = vec!["baking".to_string(), "brunch".to_string()];
        let hits = store.search_recipes(&UserId::new("alice"), &q).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.id.as_str(), "r1");

        let mut q = query(&["leek"]);
        q.group_ids = vec![GroupId::new("g2")];
        let hits = store.search_recipes(&UserId::new("alice"), &q).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.id.as_str(), "r2");

        let mut q = query(&["leek"]);
        q.exclude = Some(RecipeId::new("r2"));
        q.group_ids = vec![GroupId::new("g2")];
        assert!(store.search_recipes(&UserId::new("alice"), &q).await.unwrap().is_empty());

        let mut q = query(&["leek"]);
        q.limit = 1;
        q.offset = 1;
        let hits = store.search_recipes(&UserId::new("alice"), &q).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_suggest_orders_prefix_first() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Roasted garlic", &["garlic", "Garlic"], 10))
            .await
            .unwrap();
        store
            .save_recipe(&make_write("r2", "alice", "g1", "Garlic knots", &["flour"], 10))
            .await
            .unwrap();
        store
            .save_recipe(&make_write("r3", "carol", "g2", "Garlic secret", &["garlic"], 10))
            .await
            .unwrap();

        let suggestions = store.suggest(&UserId::new("bob"), "gar", 10).await.unwrap();
        assert_eq!(
            suggestions,
            vec!["Garlic", "Garlic knots", "Roasted garlic"]
        );

        let capped = store.suggest(&UserId::new("bob"), "gar", 1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn test_suggest_escapes_wildcards() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Soup", &["leek"], 10))
            .await
            .unwrap();

        assert!(store.suggest(&UserId::new("alice"), "%%", 5).await.unwrap().is_empty());
        assert!(store.suggest(&UserId::new("alice"), "__", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_popular_ingredients() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "A", &["Garlic", "ox", "salt"], 10))
            .await
            .unwrap();
        store
            .save_recipe(&make_write("r2", "alice", "g1", "B", &[" garlic ", "salt"], 10))
            .await
            .unwrap();
        store
            .save_recipe(&make_write("r3", "alice", "g1", "C", &["garlic", "pepper"], 10))
            .await
            .unwrap();
        store
            .save_recipe(&make_write("r4", "carol", "g2", "D", &["pepper", "pepper flakes"], 10))
            .await
            .unwrap();

        let terms = store
            .popular_ingredients(&UserId::new("bob"), 3, 10)
            .await
            .unwrap();
        let flat: Vec<(&str, u32)> = terms.iter().map(|t| (t.term.as_str(), t.count)).collect();
        // "ox" is below the minimum length; carol's group is not visible.
        assert_eq!(flat, vec![("garlic", 3), ("salt", 2), ("pepper", 1)]);
    }

    #[tokio::test]
    async fn test_upsert_share_keeps_one_link() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Soup", &["leek"], 10))
            .await
            .unwrap();

        let first = store.upsert_share(&share("r1", "tok-1", Some(3), None)).await.unwrap();
        assert_eq!(first.token.as_str(), "tok-1");
        store.consume_share(&ShareToken::new("tok-1"), 5).await.unwrap();

        let mut second = share("r1", "tok-2", Some(10), Some(99));
        second.access_type = AccessType::InviteOnly;
        let updated = store.upsert_share(&second).await.unwrap();

        assert_eq!(updated.id, first.id);
        assert_eq!(updated.token.as_str(), "tok-1");
        assert_eq!(updated.access_type, AccessType::InviteOnly);
        assert_eq!(updated.max_views, Some(10));
        assert_eq!(updated.expires_at, Some(99));
        assert_eq!(updated.current_views, 1);
        assert_eq!(store.list_shares(&RecipeId::new("r1")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_consume_share_guards() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Soup", &["leek"], 10))
            .await
            .unwrap();
        store
            .save_recipe(&make_write("r2", "alice", "g1", "Stew", &["leek"], 10))
            .await
            .unwrap();
        store.upsert_share(&share("r1", "capped", Some(2), None)).await.unwrap();
        store.upsert_share(&share("r2", "expiring", None, Some(100))).await.unwrap();

        let capped = ShareToken::new("capped");
        assert_eq!(store.consume_share(&capped, 0).await.unwrap(), Some(RecipeId::new("r1")));
        assert_eq!(store.consume_share(&capped, 0).await.unwrap(), Some(RecipeId::new("r1")));
        assert_eq!(store.consume_share(&capped, 0).await.unwrap(), None);

        let link = store.find_share_by_token(&capped).await.unwrap().unwrap();
        assert_eq!(link.current_views, 2);

        let expiring = ShareToken::new("expiring");
        assert!(store.consume_share(&expiring, 99).await.unwrap().is_some());
        assert!(store.consume_share(&expiring, 100).await.unwrap().is_none());

        assert!(store
            .consume_share(&ShareToken::new("unknown"), 0)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_comments_newest_first() {
        let store = seeded().await;
        store
            .save_recipe(&make_write("r1", "alice", "g1", "Soup", &["leek"], 10))
            .await
            .unwrap();

        for (i, text) in ["first", "second"].iter().enumerate() {
            store
                .insert_comment(&Comment {
                    id: CommentId::generate(),
                    recipe_id: RecipeId::new("r1"),
                    user_id: UserId::new("bob"),
                    content: text.to_string(),
                    created_at: i as i64,
                    updated_at: i as i64,
                })
                .await
                .unwrap();
        }

        let comments = store.list_comments(&RecipeId::new("r1")).await.unwrap();
        let texts: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_file_store_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("potluck.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .add_member(&UserId::new("alice"), &GroupId::new("g1"), "owner")
                .await
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert!(store
            .is_member(&UserId::new("alice"), &GroupId::new("g1"))
            .await
            .unwrap());
    }
}
