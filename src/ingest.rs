//! Ingestion pipeline orchestration.
//!
//! Coordinates the full run: archive extraction → in-place decompression →
//! classification, record extraction, and store population. Phases run in
//! strict sequence and each can be skipped independently for partial
//! re-runs. Every phase inspects prior output on disk (or relies on the
//! store's uniqueness constraints), so re-invoking after an interruption is
//! always safe and never duplicates work.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use walkdir::WalkDir;

use crate::archive;
use crate::classify;
use crate::config::Config;
use crate::db;
use crate::decompress;
use crate::extract::extract_record;
use crate::migrate;
use crate::models::Record;
use crate::progress::{IngestProgressEvent, IngestProgressReporter, ProgressMode};

const PROGRESS_EVERY: u64 = 250;

pub async fn run_ingest(
    config: &Config,
    archive_path: &Path,
    skip_extract: bool,
    skip_decompress: bool,
    skip_populate: bool,
    mode: ProgressMode,
) -> Result<()> {
    let reporter = mode.reporter();
    let workdir = &config.ingest.workdir;
    let exclude = build_globset(&config.ingest.exclude_globs)?;

    // Fatal before any mutation, regardless of skip flags: a run that
    // names a nonexistent archive is operator error, not a partial re-run.
    if !archive_path.exists() {
        bail!("archive does not exist: {}", archive_path.display());
    }

    std::fs::create_dir_all(workdir)
        .with_context(|| format!("Failed to create workdir: {}", workdir.display()))?;

    println!("ingest {}", archive_path.display());

    if skip_extract {
        println!("  extracted: skipped");
    } else {
        let extracted =
            archive::extract_archive(archive_path, workdir, &exclude, reporter.as_ref())?;
        println!("  extracted: {} entries", extracted);
    }

    if skip_decompress {
        println!("  decompressed: skipped");
    } else {
        let (done, failed) = decompress::decompress_tree(workdir, reporter.as_ref())?;
        if failed > 0 {
            println!("  decompressed: {} files ({} failed)", done, failed);
        } else {
            println!("  decompressed: {} files", done);
        }
    }

    if skip_populate {
        println!("  tabs inserted: skipped");
        println!("  resources inserted: skipped");
    } else {
        let (tabs, resources) = populate(config, workdir, &exclude, reporter.as_ref()).await?;
        println!("  tabs inserted: {}", tabs);
        println!("  resources inserted: {}", resources);
    }

    println!("ok");
    Ok(())
}

/// Walk the workdir, turn every eligible file into a record, and insert the
/// whole batch inside one transaction. Records stream into the open
/// transaction as the walk produces them, so memory stays bounded by one
/// file at a time. `INSERT OR IGNORE` makes the batch idempotent against
/// the uniqueness constraints; any other per-record failure is warned about
/// and skipped.
async fn populate(
    config: &Config,
    workdir: &Path,
    exclude: &GlobSet,
    reporter: &dyn IngestProgressReporter,
) -> Result<(u64, u64)> {
    // Schema setup is its own transactional phase.
    migrate::run_migrations(config).await?;

    let pool = db::connect(config).await?;
    let mut tx = pool.begin().await?;

    let mut tabs_inserted = 0u64;
    let mut resources_inserted = 0u64;
    let mut seen = 0u64;

    for entry in WalkDir::new(workdir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();

        // Leftover wrappers from a failed decompression are not documents.
        if path.extension().is_some_and(|ext| ext == "gz") {
            continue;
        }

        let relative = path.strip_prefix(workdir).unwrap_or(path);
        if exclude.is_match(relative) {
            continue;
        }

        if !classify::classify_file(path).is_eligible() {
            continue;
        }

        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("warning: cannot read {}: {}", path.display(), e);
                continue;
            }
        };

        let record = extract_record(workdir, path, &bytes);
        let inserted = match &record {
            Record::Tab(tab) => {
                sqlx::query("INSERT OR IGNORE INTO tabs (artist, title, content) VALUES (?, ?, ?)")
                    .bind(&tab.artist)
                    .bind(&tab.title)
                    .bind(&tab.content)
                    .execute(&mut *tx)
                    .await
            }
            Record::Resource(res) => {
                sqlx::query("INSERT OR IGNORE INTO resources (title, content) VALUES (?, ?)")
                    .bind(&res.title)
                    .bind(&res.content)
                    .execute(&mut *tx)
                    .await
            }
        };

        match inserted {
            // rows_affected == 0 means the uniqueness constraint absorbed a
            // duplicate — the intended no-op, not an error.
            Ok(r) if r.rows_affected() > 0 => match record {
                Record::Tab(_) => tabs_inserted += 1,
                Record::Resource(_) => resources_inserted += 1,
            },
            Ok(_) => {}
            Err(e) => {
                eprintln!("warning: skipping {}: {}", path.display(), e);
            }
        }

        seen += 1;
        if seen % PROGRESS_EVERY == 0 {
            reporter.report(IngestProgressEvent::Populating { n: seen });
        }
    }

    tx.commit().await?;
    reporter.report(IngestProgressEvent::Populating { n: seen });

    pool.close().await;
    Ok((tabs_inserted, resources_inserted))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
