//! Full-text search over the tab index.
//!
//! Queries `tabs_fts` with FTS5 `MATCH` and returns hits in the engine's
//! own relevance order (bm25 rank) — no ranking of our own on top. Raw
//! user input is quoted term-by-term first so FTS5 operator syntax (`NOT`,
//! `*`, quotes, parentheses) cannot break the query. Resource titles have
//! no FTS index; `--resources` adds plain substring matching over them.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::config::Config;
use crate::db;
use crate::models::SearchHit;

pub async fn run_search(
    config: &Config,
    query: &str,
    include_resources: bool,
    limit: Option<i64>,
) -> Result<()> {
    let limit = limit.unwrap_or(config.search.limit);

    let match_expr = fts_match_expr(query);
    if match_expr.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let pool = db::connect(config).await?;

    let mut hits = fetch_tab_hits(&pool, &match_expr, limit).await?;
    if include_resources {
        hits.extend(fetch_resource_hits(&pool, query, limit).await?);
    }

    if hits.is_empty() {
        println!("No results.");
        pool.close().await;
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        match &hit.artist {
            Some(artist) => println!("{}. {} / {}", i + 1, artist, hit.title),
            None => println!("{}. {} (resource)", i + 1, hit.title),
        }
    }

    pool.close().await;
    Ok(())
}

async fn fetch_tab_hits(pool: &SqlitePool, match_expr: &str, limit: i64) -> Result<Vec<SearchHit>> {
    let rows = sqlx::query(
        r#"
        SELECT artist, title
        FROM tabs_fts
        WHERE tabs_fts MATCH ?
        ORDER BY rank
        LIMIT ?
        "#,
    )
    .bind(match_expr)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| SearchHit {
            artist: Some(row.get("artist")),
            title: row.get("title"),
        })
        .collect())
}

async fn fetch_resource_hits(pool: &SqlitePool, query: &str, limit: i64) -> Result<Vec<SearchHit>> {
    let pattern = format!("%{}%", escape_like(query.trim()));
    let rows = sqlx::query(
        r#"
        SELECT title
        FROM resources
        WHERE title LIKE ? ESCAPE '\'
        ORDER BY title
        LIMIT ?
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| SearchHit {
            artist: None,
            title: row.get("title"),
        })
        .collect())
}

/// Build an FTS5 MATCH expression from free text: each whitespace-separated
/// term becomes a quoted string (implicit AND between them), with embedded
/// quotes doubled. Returns an empty string for effectively empty input.
fn fts_match_expr(query: &str) -> String {
    query
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
