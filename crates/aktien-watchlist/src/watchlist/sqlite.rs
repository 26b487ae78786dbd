//! Watchlist persisted to a SQLite file
//!
//! Every operation opens its own connection and closes it before
//! returning; nothing is pooled and no lock is held between calls.

use super::{AddOutcome, RemoveOutcome, StoreKind, WatchlistStore};
use crate::error::Result;
use crate::ticker::Ticker;
use async_trait::async_trait;
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const CREATE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS watchlist (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ticker TEXT UNIQUE NOT NULL COLLATE NOCASE
    )
";

const TABLE_SQL: &str =
    "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'watchlist'";

/// Row type mapping the `watchlist` table.
#[derive(Debug, sqlx::FromRow)]
struct WatchlistRow {
    ticker: String,
}

/// Unbounded watchlist stored in SQLite, unique by ticker
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and ensure the schema exists
    ///
    /// A `watchlist` table whose `ticker` column is case-sensitive is
    /// rebuilt in place so lookups ignore case.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let store = Self { path, options };

        let mut conn = store.connect().await?;
        let existing: Option<(String,)> =
            sqlx::query_as(TABLE_SQL).fetch_optional(&mut conn).await?;
        match existing {
            None => {
                sqlx::query(CREATE_TABLE).execute(&mut conn).await?;
            }
            Some((sql,)) if !sql.to_uppercase().contains("NOCASE") => {
                migrate_case_sensitive_table(&mut conn).await?;
            }
            Some(_) => {}
        }
        conn.close().await?;

        info!("Watchlist database ready");
        Ok(store)
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        Ok(SqliteConnection::connect_with(&self.options).await?)
    }
}

/// Rebuild a table whose `ticker` column compares case-sensitively
///
/// Tickers are trimmed and uppercased, blank rows dropped and rows that only
/// differ in case collapsed onto the oldest one, keeping insertion order.
async fn migrate_case_sensitive_table(conn: &mut SqliteConnection) -> Result<()> {
    let mut tx = conn.begin().await?;

    sqlx::query("ALTER TABLE watchlist RENAME TO watchlist_legacy")
        .execute(&mut *tx)
        .await?;
    sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
    let moved = sqlx::query(
        "INSERT OR IGNORE INTO watchlist (ticker) \
         SELECT UPPER(TRIM(ticker)) FROM watchlist_legacy \
         WHERE TRIM(ticker) <> '' ORDER BY id",
    )
    .execute(&mut *tx)
    .await?;
    sqlx::query("DROP TABLE watchlist_legacy")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!(kept = moved.rows_affected(), "Migrated case-sensitive watchlist table");
    Ok(())
}

#[async_trait]
impl WatchlistStore for SqliteStore {
    #[instrument(skip(self))]
    async fn add(&mut self, input: &str) -> Result<AddOutcome> {
        let Some(ticker) = Ticker::parse(input) else {
            return Ok(AddOutcome::Ignored);
        };

        let mut conn = self.connect().await?;
        let result = sqlx::query("INSERT OR IGNORE INTO watchlist (ticker) VALUES (?)")
            .bind(ticker.as_str())
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        if result.rows_affected() == 0 {
            debug!(%ticker, "Ticker already stored");
            Ok(AddOutcome::Duplicate(ticker))
        } else {
            info!(%ticker, "Ticker stored");
            Ok(AddOutcome::Added(ticker))
        }
    }

    #[instrument(skip(self))]
    async fn remove(&mut self, input: &str) -> Result<RemoveOutcome> {
        let Some(ticker) = Ticker::parse(input) else {
            return Ok(RemoveOutcome::Ignored);
        };

        let mut conn = self.connect().await?;
        let result = sqlx::query("DELETE FROM watchlist WHERE ticker = ?")
            .bind(ticker.as_str())
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        if result.rows_affected() == 0 {
            Ok(RemoveOutcome::Absent(ticker))
        } else {
            info!(%ticker, "Ticker deleted");
            Ok(RemoveOutcome::Removed(ticker))
        }
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Ticker>> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query_as::<_, WatchlistRow>("SELECT ticker FROM watchlist ORDER BY id")
            .fetch_all(&mut conn)
            .await?;
        conn.close().await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| Ticker::parse(&row.ticker))
            .collect())
    }

    #[instrument(skip(self))]
    async fn clear(&mut self) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("DELETE FROM watchlist").execute(&mut conn).await?;
        conn.close().await?;

        info!(deleted = result.rows_affected(), "Watchlist cleared");
        Ok(())
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Sqlite
    }

    fn capacity(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("watchlist.db")).await.unwrap();
        (store, dir)
    }

    fn names(tickers: &[Ticker]) -> Vec<&str> {
        tickers.iter().map(Ticker::as_str).collect()
    }

    #[tokio::test]
    async fn test_open_creates_empty_table() {
        let (store, _dir) = temp_store().await;
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.path().exists());
        assert_eq!(store.kind(), StoreKind::Sqlite);
        assert_eq!(store.capacity(), None);
    }

    #[tokio::test]
    async fn test_add_and_list_in_insertion_order() {
        let (mut store, _dir) = temp_store().await;
        store.add("MSFT").await.unwrap();
        store.add("aapl").await.unwrap();
        store.add("NVDA").await.unwrap();

        let list = store.list().await.unwrap();
        assert_eq!(names(&list), vec!["MSFT", "AAPL", "NVDA"]);
    }

    #[tokio::test]
    async fn test_duplicate_insert_ignored_case_insensitive() {
        let (mut store, _dir) = temp_store().await;
        assert!(matches!(store.add("TSLA").await.unwrap(), AddOutcome::Added(_)));
        assert!(matches!(store.add("tsla").await.unwrap(), AddOutcome::Duplicate(_)));

        assert_eq!(names(&store.list().await.unwrap()), vec!["TSLA"]);
    }

    #[tokio::test]
    async fn test_blank_input_never_touches_database() {
        let (mut store, _dir) = temp_store().await;
        assert_eq!(store.add("   ").await.unwrap(), AddOutcome::Ignored);
        assert_eq!(store.remove("").await.unwrap(), RemoveOutcome::Ignored);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_present_and_absent() {
        let (mut store, _dir) = temp_store().await;
        store.add("AAPL").await.unwrap();
        store.add("MSFT").await.unwrap();

        assert!(matches!(store.remove("aapl").await.unwrap(), RemoveOutcome::Removed(_)));
        assert!(matches!(store.remove("AAPL").await.unwrap(), RemoveOutcome::Absent(_)));
        assert_eq!(names(&store.list().await.unwrap()), vec!["MSFT"]);
    }

    #[tokio::test]
    async fn test_purge_invalid_and_clear() {
        let (mut store, _dir) = temp_store().await;
        store.add("AAPL").await.unwrap();
        store.add("NOPE1").await.unwrap();

        let invalid = Ticker::parse("NOPE1").unwrap();
        assert_eq!(
            store.purge_invalid(&invalid).await.unwrap(),
            RemoveOutcome::Removed(invalid)
        );

        store.clear().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_migrates_case_sensitive_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.db");

        {
            let options = SqliteConnectOptions::new()
                .filename(&path)
                .create_if_missing(true);
            let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
            sqlx::query(
                "CREATE TABLE watchlist (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    ticker TEXT UNIQUE NOT NULL
                )",
            )
            .execute(&mut conn)
            .await
            .unwrap();
            for ticker in ["tsla", " msft ", "TSLA", "  "] {
                sqlx::query("INSERT INTO watchlist (ticker) VALUES (?)")
                    .bind(ticker)
                    .execute(&mut conn)
                    .await
                    .unwrap();
            }
            conn.close().await.unwrap();
        }

        let mut store = SqliteStore::open(&path).await.unwrap();
        assert_eq!(names(&store.list().await.unwrap()), vec!["TSLA", "MSFT"]);

        assert!(matches!(store.add("TSLA").await.unwrap(), AddOutcome::Duplicate(_)));
        assert_eq!(names(&store.list().await.unwrap()), vec!["TSLA", "MSFT"]);

        assert!(matches!(store.remove("TSLA").await.unwrap(), RemoveOutcome::Removed(_)));
        assert_eq!(names(&store.list().await.unwrap()), vec!["MSFT"]);

        // A second open finds the new schema and leaves the rows alone.
        let reopened = SqliteStore::open(&path).await.unwrap();
        assert_eq!(names(&reopened.list().await.unwrap()), vec!["MSFT"]);
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.db");

        {
            let mut store = SqliteStore::open(&path).await.unwrap();
            store.add("TSLA").await.unwrap();
        }

        let reopened = SqliteStore::open(&path).await.unwrap();
        assert_eq!(names(&reopened.list().await.unwrap()), vec!["TSLA"]);
    }
}
