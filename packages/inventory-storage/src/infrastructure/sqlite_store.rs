//! SQLite Asset Store
//!
//! Reads the inventory database file. Never creates or migrates a schema.
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OpenFlags, Row};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::StorageConfig;
use crate::domain::{AssetRow, AssetStore, StoredPage};
use crate::query::{QueryPlan, SqlArg};
use crate::{QueryError, Result};

/// SQLite-based AssetStore implementation
#[derive(Clone)]
pub struct SqliteAssetStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAssetStore {
    /// Open an existing database file and apply the configured pragmas
    pub fn open(db_path: impl AsRef<Path>, config: &StorageConfig) -> Result<Self> {
        let db_path = db_path.as_ref();
        if !db_path.is_file() {
            return Err(QueryError::config(format!(
                "Unable to find database file: {}",
                db_path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let store = Self::from_connection(conn, config)?;
        tracing::info!(path = %db_path.display(), "Connected to the database successfully");
        Ok(store)
    }

    /// Wrap an already-open connection (in-memory databases in tests)
    pub fn from_connection(conn: Connection, config: &StorageConfig) -> Result<Self> {
        config.validate()?;
        apply_pragmas(&conn, config)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `work` on the blocking pool with the connection locked
    ///
    /// Returns `Cancelled` as soon as `cancel` fires; `work` receives the token
    /// to stop between rows.
    async fn run_blocking<T, F>(
        &self,
        operation: &'static str,
        cancel: &CancellationToken,
        work: F,
    ) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &CancellationToken) -> Result<T> + Send + 'static,
    {
        if cancel.is_cancelled() {
            return Err(QueryError::cancelled(operation));
        }

        let conn = Arc::clone(&self.conn);
        let token = cancel.clone();
        let task = tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            if token.is_cancelled() {
                return Err(QueryError::cancelled(operation));
            }
            work(&guard, &token)
        });

        tokio::select! {
            joined = task => joined.map_err(|e| {
                QueryError::storage(format!("{} task failed: {}", operation, e)).with_source(e)
            })?,
            _ = cancel.cancelled() => {
                tracing::warn!(operation, "storage call cancelled");
                Err(QueryError::cancelled(operation))
            }
        }
    }
}

fn apply_pragmas(conn: &Connection, config: &StorageConfig) -> Result<()> {
    conn.pragma_update(None, "cache_size", config.cache_size)?;
    conn.pragma_update(None, "synchronous", config.synchronous.as_str())?;
    let journal_mode: String = conn.pragma_update_and_check(
        None,
        "journal_mode",
        config.journal_mode.as_str(),
        |row| row.get(0),
    )?;
    conn.pragma_update(None, "foreign_keys", config.foreign_keys)?;
    // host filters are case-sensitive substring matches
    conn.pragma_update(None, "case_sensitive_like", true)?;
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;

    tracing::debug!(
        cache_size = config.cache_size,
        synchronous = config.synchronous.as_str(),
        journal_mode = %journal_mode,
        "applied connection pragmas"
    );
    Ok(())
}

fn to_values(args: &[SqlArg]) -> Vec<Value> {
    args.iter()
        .map(|arg| match arg {
            SqlArg::Text(text) => Value::Text(text.clone()),
            SqlArg::Integer(n) => Value::Integer(*n),
        })
        .collect()
}

fn prepare_failed(err: rusqlite::Error) -> QueryError {
    QueryError::query_plan(format!("Failed to prepare statement: {}", err)).with_source(err)
}

fn scan_row(row: &Row<'_>) -> rusqlite::Result<AssetRow> {
    Ok(AssetRow {
        id: row.get(0)?,
        host: row.get(1)?,
        comment: row.get(2)?,
        owner: row.get(3)?,
        address: row.get(4)?,
        port: row.get(5)?,
    })
}

fn count_in(conn: &Connection, plan: &QueryPlan) -> Result<u64> {
    let mut stmt = conn.prepare(&plan.count_sql).map_err(prepare_failed)?;
    let count: i64 = stmt.query_row(params_from_iter(to_values(&plan.count_args())), |row| {
        row.get(0)
    })?;
    u64::try_from(count)
        .map_err(|_| QueryError::row_scan(format!("negative asset count: {}", count)))
}

fn rows_in(conn: &Connection, plan: &QueryPlan, token: &CancellationToken) -> Result<Vec<AssetRow>> {
    let mut stmt = conn.prepare(&plan.rows_sql).map_err(prepare_failed)?;
    let mut rows = stmt.query(params_from_iter(to_values(&plan.row_args())))?;

    let mut scanned = Vec::new();
    while let Some(row) = rows.next()? {
        if token.is_cancelled() {
            return Err(QueryError::cancelled("asset rows"));
        }
        scanned.push(scan_row(row)?);
    }
    Ok(scanned)
}

#[async_trait]
impl AssetStore for SqliteAssetStore {
    async fn count_assets(&self, plan: &QueryPlan, cancel: &CancellationToken) -> Result<u64> {
        let plan = plan.clone();
        self.run_blocking("asset count", cancel, move |conn, _| {
            let tx = conn.unchecked_transaction()?;
            let count = count_in(&tx, &plan)?;
            tx.commit()?;
            Ok(count)
        })
        .await
    }

    async fn fetch_rows(
        &self,
        plan: &QueryPlan,
        cancel: &CancellationToken,
    ) -> Result<Vec<AssetRow>> {
        let plan = plan.clone();
        let rows = self
            .run_blocking("asset rows", cancel, move |conn, token| {
                let tx = conn.unchecked_transaction()?;
                let rows = rows_in(&tx, &plan, token)?;
                tx.commit()?;
                Ok(rows)
            })
            .await?;

        tracing::debug!(rows = rows.len(), "fetched asset rows");
        Ok(rows)
    }

    /// Count and rows inside one read transaction, so `total_count` and the
    /// page come from the same snapshot
    async fn fetch_page(&self, plan: &QueryPlan, cancel: &CancellationToken) -> Result<StoredPage> {
        let plan = plan.clone();
        let page = self
            .run_blocking("asset page", cancel, move |conn, token| {
                let tx = conn.unchecked_transaction()?;
                let total_count = count_in(&tx, &plan)?;
                let rows = rows_in(&tx, &plan, token)?;
                tx.commit()?;
                Ok(StoredPage { total_count, rows })
            })
            .await?;

        tracing::debug!(
            total_count = page.total_count,
            rows = page.rows.len(),
            "fetched asset page"
        );
        Ok(page)
    }
}
