//! Archive reader: selective extraction of the source zip container.
//!
//! Entries are streamed out one at a time — the full OLGA archive does not
//! fit comfortably in memory. Only `.gz` members are extracted (everything
//! else in the container is web-page scaffolding), and members already
//! present at the destination are skipped so an interrupted run resumes
//! where it left off.

use anyhow::{bail, Context, Result};
use globset::GlobSet;
use std::fs;
use std::io::BufReader;
use std::path::Path;
use zip::ZipArchive;

use crate::progress::{IngestProgressEvent, IngestProgressReporter};

/// How often extraction progress is reported, in entries.
const PROGRESS_EVERY: u64 = 250;

/// Extract every still-compressed entry of `zip_path` into `dest`,
/// preserving relative paths. Returns the number of entries written this
/// run (skipped entries don't count). A container that cannot be opened or
/// is truncated fails the whole operation; per-entry I/O errors surface as
/// errors rather than leaving a half-written file behind.
pub fn extract_archive(
    zip_path: &Path,
    dest: &Path,
    exclude: &GlobSet,
    reporter: &dyn IngestProgressReporter,
) -> Result<u64> {
    let file = fs::File::open(zip_path)
        .with_context(|| format!("Failed to open archive: {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Failed to read archive: {}", zip_path.display()))?;

    // Names first, contents lazily per entry.
    let names: Vec<String> = archive.file_names().map(String::from).collect();
    let candidates: Vec<&String> = names
        .iter()
        .filter(|n| n.ends_with(".gz") && !exclude.is_match(n.as_str()))
        .collect();
    let total = candidates.len() as u64;

    let mut extracted = 0u64;
    let mut seen = 0u64;

    for name in candidates {
        seen += 1;
        if seen % PROGRESS_EVERY == 0 {
            reporter.report(IngestProgressEvent::Extracting { n: seen, total });
        }

        let mut entry = archive
            .by_name(name)
            .with_context(|| format!("Failed to locate archive entry: {}", name))?;

        // Zip-slip guard: reject entries whose path escapes the destination.
        let safe_relative = match entry.enclosed_name() {
            Some(p) => p,
            None => bail!("Archive entry has an unsafe path: {}", name),
        };
        let target = dest.join(safe_relative);

        // Resumability: a prior run already materialized this entry.
        if target.exists() {
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        write_via_temp(&target, &mut entry)
            .with_context(|| format!("Failed to extract archive entry: {}", name))?;
        extracted += 1;
    }

    reporter.report(IngestProgressEvent::Extracting { n: seen, total });
    Ok(extracted)
}

/// Write `reader` to `target` through a sibling temp file and an atomic
/// rename, so `target` never exists half-written.
pub fn write_via_temp(target: &Path, reader: &mut impl std::io::Read) -> Result<()> {
    let tmp = temp_path(target);
    let result = (|| -> Result<()> {
        let mut out = fs::File::create(&tmp)?;
        std::io::copy(reader, &mut out)?;
        out.sync_all()?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            fs::rename(&tmp, target)?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn temp_path(target: &Path) -> std::path::PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    target.with_file_name(name)
}
