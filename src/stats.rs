//! Store statistics overview.
//!
//! A quick summary of what's ingested: tab and resource counts, distinct
//! artists, and search-index rows. Used by `tabvault stats` to verify that
//! an ingest run landed and that the FTS index tracks the base table.

use anyhow::Result;

use crate::config::Config;
use crate::db;

pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    let tabs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tabs")
        .fetch_one(&pool)
        .await?;

    let artists: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT artist) FROM tabs")
        .fetch_one(&pool)
        .await?;

    let resources: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resources")
        .fetch_one(&pool)
        .await?;

    let indexed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tabs_fts")
        .fetch_one(&pool)
        .await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Tabvault — Store Stats");
    println!("======================");
    println!();
    println!("  Database:   {}", config.db.path.display());
    println!("  Size:       {}", format_bytes(db_size));
    println!();
    println!("  Tabs:       {}", tabs);
    println!("  Artists:    {}", artists);
    println!("  Resources:  {}", resources);
    println!("  Indexed:    {}", indexed);
    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
