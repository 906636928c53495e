//! Category store: one table per category, addressed by category name.
//!
//! Category and column identifiers cannot be bound as query parameters, so
//! every name is checked against a strict allow-list before it reaches a
//! `format!` SQL string; all row values are bound. Discovery goes through
//! `sqlite_master` in lexicographic order, which makes the cross-category
//! title scan deterministic.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::{codec, db, ArtifactRecord, AppError, AppResult};

static CATEGORY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z][A-Za-z0-9_]{0,63}$").expect("valid category pattern"));

/// Where a session's backing store lives. `None` opens an in-memory store.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    pub db_path: Option<PathBuf>,
}

/// One authenticated store session. Created at login, dropped at logout;
/// the connection pool lives exactly as long as the session, so there is
/// no shared mutable credential state anywhere.
pub struct Session {
    pool: SqlitePool,
}

fn ensure_category_name(name: &str) -> AppResult<()> {
    if !CATEGORY_NAME.is_match(name) || name.to_ascii_lowercase().starts_with("sqlite_") {
        return Err(AppError::new(
            "CATEGORY/INVALID_NAME",
            "Category names must start with a letter and contain only letters, digits and underscores",
        )
        .with_context("name", name.to_string()));
    }
    Ok(())
}

fn bind_text<'q>(
    q: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    v: &Value,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    match v {
        Value::Null => q.bind(Option::<String>::None),
        Value::String(s) => q.bind(s.clone()),
        other => q.bind(other.to_string()),
    }
}

impl Session {
    /// Open a session against the configured store.
    pub async fn open(options: &StoreOptions) -> AppResult<Session> {
        let pool = match &options.db_path {
            Some(path) => db::connect_store_pool(path).await,
            None => db::connect_memory_pool().await,
        }
        .map_err(|err| AppError::from(err).with_context("operation", "open_session"))?;
        Ok(Session { pool })
    }

    /// Close the session, releasing every connection.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!(target: "musaeum", event = "session_closed");
    }

    async fn table_exists(&self, name: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(count > 0)
    }

    async fn has_title_column(&self, name: &str) -> AppResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = 'title'")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::from)?;
        Ok(count > 0)
    }

    async fn require_category(&self, name: &str) -> AppResult<()> {
        ensure_category_name(name)?;
        if !self.table_exists(name).await? {
            return Err(AppError::new("CATEGORY/NOT_FOUND", "No such category")
                .with_context("category", name.to_string()));
        }
        Ok(())
    }

    /// Every table in the schema, lexicographic. Unfiltered: a table is a
    /// "folder" here whether or not it holds artifact-shaped rows.
    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| AppError::from(err).with_context("operation", "list_categories"))?;
        rows.into_iter()
            .map(|row| row.try_get::<String, _>("name").map_err(AppError::from))
            .collect()
    }

    /// Create a new empty category table shaped to the flat row layout.
    pub async fn create_category(&self, name: &str) -> AppResult<()> {
        ensure_category_name(name)?;
        if self.table_exists(name).await? {
            return Err(AppError::new("CATEGORY/DUPLICATE", "Category already exists")
                .with_context("category", name.to_string()));
        }
        let columns: Vec<String> = codec::all_columns()
            .iter()
            .map(|column| {
                if *column == codec::TITLE_COLUMN || *column == codec::DESCRIPTION_COLUMN {
                    format!("{column} TEXT NOT NULL")
                } else {
                    format!("{column} TEXT")
                }
            })
            .collect();
        let sql = format!("CREATE TABLE {name} ({})", columns.join(", "));
        sqlx::query(&sql).execute(&self.pool).await.map_err(|err| {
            AppError::from(err)
                .with_context("operation", "create_category")
                .with_context("category", name.to_string())
        })?;
        tracing::info!(target: "musaeum", event = "category_created", category = %name);
        Ok(())
    }

    /// Every title in the named category, storage order.
    pub async fn list_titles(&self, category: &str) -> AppResult<Vec<String>> {
        self.require_category(category).await?;
        let sql = format!("SELECT title FROM {category}");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await.map_err(|err| {
            AppError::from(err)
                .with_context("operation", "list_titles")
                .with_context("category", category.to_string())
        })?;
        rows.into_iter()
            .map(|row| row.try_get::<String, _>("title").map_err(AppError::from))
            .collect()
    }

    async fn fetch_in_category(
        &self,
        category: &str,
        title: &str,
    ) -> AppResult<Option<ArtifactRecord>> {
        let sql = format!("SELECT * FROM {category} WHERE title = ? LIMIT 1");
        let row = sqlx::query(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| {
                AppError::from(err)
                    .with_context("operation", "find_by_title")
                    .with_context("category", category.to_string())
            })?;
        Ok(row.map(|row| codec::decode(&codec::row_to_map(&row))))
    }

    /// Look up a record by title.
    ///
    /// With a category, a single lookup. Without one, a linear scan over
    /// every category exposing a `title` column, in lexicographic order;
    /// the first match wins. Title uniqueness across categories is not
    /// enforced anywhere, so first-match is a documented behavior, not a
    /// guarantee. An absent title is `Ok(None)`, not an error.
    pub async fn find_by_title(
        &self,
        category: Option<&str>,
        title: &str,
    ) -> AppResult<Option<(ArtifactRecord, String)>> {
        if let Some(category) = category {
            self.require_category(category).await?;
            return Ok(self
                .fetch_in_category(category, title)
                .await?
                .map(|record| (record, category.to_string())));
        }
        for candidate in self.list_categories().await? {
            if ensure_category_name(&candidate).is_err() {
                // Externally created table we refuse to interpolate.
                tracing::debug!(
                    target: "musaeum",
                    event = "category_skipped",
                    category = %candidate
                );
                continue;
            }
            if !self.has_title_column(&candidate).await? {
                continue;
            }
            if let Some(record) = self.fetch_in_category(&candidate, title).await? {
                return Ok(Some((record, candidate)));
            }
        }
        Ok(None)
    }

    /// Full-row replace keyed by title: delete any row carrying the title,
    /// then insert the encoded row, in one transaction. Last write wins on
    /// duplicate titles; there is no insert-if-absent.
    pub async fn save(&self, category: &str, record: &ArtifactRecord) -> AppResult<()> {
        self.require_category(category).await?;
        let row = codec::encode(record);
        let cols: Vec<String> = row.keys().cloned().collect();
        let placeholders: Vec<&str> = cols.iter().map(|_| "?").collect();
        let insert_sql = format!(
            "INSERT INTO {category} ({}) VALUES ({})",
            cols.join(","),
            placeholders.join(",")
        );
        let delete_sql = format!("DELETE FROM {category} WHERE title = ?");

        let mut tx = self.pool.begin().await.map_err(AppError::from)?;
        sqlx::query(&delete_sql)
            .bind(&record.title)
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                AppError::from(err)
                    .with_context("operation", "save")
                    .with_context("category", category.to_string())
            })?;
        let mut query = sqlx::query(&insert_sql);
        for col in &cols {
            let value = row.get(col).ok_or_else(|| {
                AppError::new("STORE/MISSING_FIELD", "Row missing value for column")
                    .with_context("column", col.clone())
            })?;
            query = bind_text(query, value);
        }
        query.execute(&mut *tx).await.map_err(|err| {
            AppError::from(err)
                .with_context("operation", "save")
                .with_context("category", category.to_string())
        })?;
        tx.commit().await.map_err(AppError::from)?;
        tracing::info!(
            target: "musaeum",
            event = "record_saved",
            category = %category,
            title = %record.title
        );
        Ok(())
    }

    /// Remove the row carrying `title`. Returns whether a row existed; a
    /// missing title is a no-op success so a double-submitted delete from
    /// the UI stays harmless.
    pub async fn delete(&self, category: &str, title: &str) -> AppResult<bool> {
        self.require_category(category).await?;
        let sql = format!("DELETE FROM {category} WHERE title = ?");
        let result = sqlx::query(&sql)
            .bind(title)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                AppError::from(err)
                    .with_context("operation", "delete")
                    .with_context("category", category.to_string())
            })?;
        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!(
                target: "musaeum",
                event = "record_deleted",
                category = %category,
                title = %title
            );
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_follow_allow_list() {
        assert!(ensure_category_name("ceramics").is_ok());
        assert!(ensure_category_name("Coins_2024").is_ok());
        assert!(ensure_category_name("").is_err());
        assert!(ensure_category_name("1st").is_err());
        assert!(ensure_category_name("a b").is_err());
        assert!(ensure_category_name("items; DROP TABLE x").is_err());
        assert!(ensure_category_name("sqlite_master").is_err());
        assert!(ensure_category_name("SQLite_seq").is_err());
    }
}
