//! Exact-key document retrieval.
//!
//! `(artist, title)` keys a tab; a bare title keys a resource. Content is
//! printed verbatim — formatting raw titles into display strings and
//! rendering line-oriented tab text is the presentation layer's concern,
//! not this one's.

use anyhow::Result;
use sqlx::Row;

use crate::config::Config;
use crate::db;

/// Fetch the content blob for an exact key, or `None` if absent.
pub async fn lookup(config: &Config, title: &str, artist: Option<&str>) -> Result<Option<String>> {
    let pool = db::connect(config).await?;

    let row = match artist {
        Some(artist) => {
            sqlx::query("SELECT content FROM tabs WHERE artist = ? AND title = ?")
                .bind(artist)
                .bind(title)
                .fetch_optional(&pool)
                .await?
        }
        None => {
            sqlx::query("SELECT content FROM resources WHERE title = ?")
                .bind(title)
                .fetch_optional(&pool)
                .await?
        }
    };

    pool.close().await;
    Ok(row.map(|r| r.get("content")))
}

/// CLI entry point — prints the content or exits nonzero on a miss.
pub async fn run_get(config: &Config, title: &str, artist: Option<&str>) -> Result<()> {
    match lookup(config, title, artist).await? {
        Some(content) => {
            print!("{}", content);
            Ok(())
        }
        None => {
            match artist {
                Some(artist) => eprintln!("Error: not found: {} / {}", artist, title),
                None => eprintln!("Error: not found: {}", title),
            }
            std::process::exit(1);
        }
    }
}
