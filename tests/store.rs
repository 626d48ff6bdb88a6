//! Store-level tests for schema, trigger propagation, and exact lookup.
//!
//! These exercise the library directly rather than the binary: the CLI has
//! no delete or update surface, but the index-consistency contract covers
//! both.

use tempfile::TempDir;

use tabvault::config::{Config, DbConfig, IngestConfig, SearchConfig};
use tabvault::db;
use tabvault::get;
use tabvault::migrate;

fn test_config(tmp: &TempDir) -> Config {
    Config {
        db: DbConfig {
            path: tmp.path().join("store.sqlite"),
        },
        ingest: IngestConfig {
            workdir: tmp.path().join("work"),
            exclude_globs: vec![],
        },
        search: SearchConfig::default(),
    }
}

async fn insert_tab(pool: &sqlx::SqlitePool, artist: &str, title: &str, content: &str) {
    sqlx::query("INSERT OR IGNORE INTO tabs (artist, title, content) VALUES (?, ?, ?)")
        .bind(artist)
        .bind(title)
        .bind(content)
        .execute(pool)
        .await
        .unwrap();
}

async fn fts_count(pool: &sqlx::SqlitePool, match_expr: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tabs_fts WHERE tabs_fts MATCH ?")
        .bind(match_expr)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn insert_propagates_to_search_index() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();

    let pool = db::connect(&cfg).await.unwrap();
    insert_tab(&pool, "Queen", "bohemian_rhapsody.txt", "content").await;

    assert_eq!(fts_count(&pool, "queen").await, 1);
    assert_eq!(fts_count(&pool, "rhapsody").await, 1);
    pool.close().await;
}

#[tokio::test]
async fn duplicate_insert_does_not_double_index() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();

    let pool = db::connect(&cfg).await.unwrap();
    insert_tab(&pool, "Queen", "song.txt", "x").await;
    insert_tab(&pool, "Queen", "song.txt", "x").await;

    let tabs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tabs")
        .fetch_one(&pool)
        .await
        .unwrap();
    let indexed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tabs_fts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(tabs, 1);
    assert_eq!(indexed, 1);
    pool.close().await;
}

#[tokio::test]
async fn delete_removes_search_index_row() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();

    let pool = db::connect(&cfg).await.unwrap();
    insert_tab(&pool, "Queen", "song.txt", "x").await;
    assert_eq!(fts_count(&pool, "queen").await, 1);

    sqlx::query("DELETE FROM tabs WHERE title = ?")
        .bind("song.txt")
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(fts_count(&pool, "queen").await, 0);
    pool.close().await;
}

#[tokio::test]
async fn title_update_propagates_when_artist_unchanged() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();

    let pool = db::connect(&cfg).await.unwrap();
    insert_tab(&pool, "Queen", "old_title.txt", "x").await;

    sqlx::query("UPDATE tabs SET title = ? WHERE artist = ?")
        .bind("new_title.txt")
        .bind("Queen")
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(fts_count(&pool, "old_title").await, 0);
    assert_eq!(fts_count(&pool, "new_title").await, 1);
    pool.close().await;
}

// The update trigger keys on the artist only. Changing the artist leaves
// the index row under the old artist untouched — the documented drift, not
// something this suite should "fix" by accident.
#[tokio::test]
async fn artist_change_leaves_index_stale() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();

    let pool = db::connect(&cfg).await.unwrap();
    insert_tab(&pool, "Quen", "song.txt", "x").await;

    sqlx::query("UPDATE tabs SET artist = ? WHERE artist = ?")
        .bind("Queen")
        .bind("Quen")
        .execute(&pool)
        .await
        .unwrap();

    // The index still carries the misspelled artist.
    assert_eq!(fts_count(&pool, "quen").await, 1);
    assert_eq!(fts_count(&pool, "queen").await, 0);
    pool.close().await;
}

// The query side is read-only and must keep working while an ingest run
// holds its write transaction on the same store.
#[tokio::test]
async fn reads_tolerated_while_write_transaction_open() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();

    let writer = db::connect(&cfg).await.unwrap();
    let mut tx = writer.begin().await.unwrap();
    sqlx::query("INSERT INTO tabs (artist, title, content) VALUES (?, ?, ?)")
        .bind("Queen")
        .bind("song.txt")
        .bind("x")
        .execute(&mut *tx)
        .await
        .unwrap();

    // A second handle reads the pre-batch snapshot, not an error.
    let reader = db::connect(&cfg).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tabs")
        .fetch_one(&reader)
        .await
        .unwrap();
    assert_eq!(count, 0);

    tx.commit().await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tabs")
        .fetch_one(&reader)
        .await
        .unwrap();
    assert_eq!(count, 1);

    reader.close().await;
    writer.close().await;
}

#[tokio::test]
async fn exact_lookup_by_key() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();

    let pool = db::connect(&cfg).await.unwrap();
    insert_tab(&pool, "Queen", "song.txt", "Is this the real life\n").await;
    sqlx::query("INSERT OR IGNORE INTO resources (title, content) VALUES (?, ?)")
        .bind("manual.txt")
        .bind("Read me")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    let tab = get::lookup(&cfg, "song.txt", Some("Queen")).await.unwrap();
    assert_eq!(tab.as_deref(), Some("Is this the real life\n"));

    let res = get::lookup(&cfg, "manual.txt", None).await.unwrap();
    assert_eq!(res.as_deref(), Some("Read me"));

    // A tab title does not key the resources table and vice versa.
    assert!(get::lookup(&cfg, "song.txt", None).await.unwrap().is_none());
    assert!(get::lookup(&cfg, "manual.txt", Some("Queen"))
        .await
        .unwrap()
        .is_none());
}
