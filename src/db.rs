//! Store connection handling.
//!
//! The handle is explicit and short-lived: each command opens its own pool,
//! uses it, and closes it on teardown — never a process-global connection.
//! Writes all serialize through the single populate transaction, so one
//! connection per command is enough and sidesteps writer contention inside
//! a run. WAL journaling plus a busy timeout let the query side keep
//! reading the store while an ingest run holds its write transaction.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::config::Config;

/// How long a connection waits on a locked store before giving up. Ingest
/// commits are batch-sized, so readers arriving mid-run wait briefly
/// instead of failing with SQLITE_BUSY.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;

    // The store file may live in a directory no run has created yet.
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    // One writer at a time is the whole concurrency model; a larger pool
    // would only manufacture lock contention between our own connections.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}
