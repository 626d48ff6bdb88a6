//! Recursive decompressor: unwraps gzip members in place.
//!
//! Walks the extracted tree and replaces every `*.gz` file with its
//! decompressed sibling (suffix stripped), deleting the wrapper afterwards.
//! Files whose decompressed target already exists are treated as done and
//! skipped entirely, which is what makes the phase restartable. Corrupt
//! members are skipped with a warning; the temp-and-rename write discipline
//! guarantees a half-decompressed file never sits at its final path.

use anyhow::Result;
use flate2::read::GzDecoder;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::archive::write_via_temp;
use crate::progress::{IngestProgressEvent, IngestProgressReporter};

const PROGRESS_EVERY: u64 = 250;

/// Decompress every `.gz` file under `root`. Returns
/// `(decompressed, failed)` counts; failures are reported on stderr and do
/// not abort the walk.
pub fn decompress_tree(
    root: &Path,
    reporter: &dyn IngestProgressReporter,
) -> Result<(u64, u64)> {
    let mut done = 0u64;
    let mut failed = 0u64;

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "gz") {
            continue;
        }

        // "song.txt.gz" -> "song.txt"
        let target = match path.file_stem() {
            Some(stem) => path.with_file_name(stem),
            None => continue,
        };

        // Already unwrapped by a prior run.
        if target.exists() {
            continue;
        }

        let mut decoder = match fs::File::open(path) {
            Ok(f) => GzDecoder::new(f),
            Err(e) => {
                eprintln!("warning: cannot open {}: {}", path.display(), e);
                failed += 1;
                continue;
            }
        };

        match write_via_temp(&target, &mut decoder) {
            Ok(()) => {
                // Wrapper is spent; the decompressed file replaces it.
                if let Err(e) = fs::remove_file(path) {
                    eprintln!("warning: cannot remove {}: {}", path.display(), e);
                }
                done += 1;
                if done % PROGRESS_EVERY == 0 {
                    reporter.report(IngestProgressEvent::Decompressing { n: done });
                }
            }
            Err(e) => {
                eprintln!("warning: skipping corrupt member {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    reporter.report(IngestProgressEvent::Decompressing { n: done });
    Ok((done, failed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn unwraps_and_removes_wrapper() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("tabs/Queen");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("song.txt.gz"), gzip(b"Is this the real life\n")).unwrap();

        let (done, failed) = decompress_tree(tmp.path(), &NoProgress).unwrap();

        assert_eq!((done, failed), (1, 0));
        assert_eq!(
            fs::read(dir.join("song.txt")).unwrap(),
            b"Is this the real life\n"
        );
        assert!(!dir.join("song.txt.gz").exists());
    }

    #[test]
    fn skips_when_target_exists() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("doc.txt.gz"), gzip(b"new")).unwrap();
        fs::write(tmp.path().join("doc.txt"), b"already done").unwrap();

        let (done, _) = decompress_tree(tmp.path(), &NoProgress).unwrap();

        assert_eq!(done, 0);
        // Both files untouched: skip means skip.
        assert_eq!(fs::read(tmp.path().join("doc.txt")).unwrap(), b"already done");
        assert!(tmp.path().join("doc.txt.gz").exists());
    }

    #[test]
    fn corrupt_member_is_skipped_without_residue() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("bad.txt.gz"), b"not gzip at all").unwrap();
        fs::write(tmp.path().join("good.txt.gz"), gzip(b"fine")).unwrap();

        let (done, failed) = decompress_tree(tmp.path(), &NoProgress).unwrap();

        assert_eq!((done, failed), (1, 1));
        assert!(!tmp.path().join("bad.txt").exists());
        assert!(!tmp.path().join("bad.txt.part").exists());
        assert!(tmp.path().join("good.txt").exists());
    }

    #[test]
    fn non_gz_files_are_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("readme.txt"), b"plain").unwrap();

        let (done, failed) = decompress_tree(tmp.path(), &NoProgress).unwrap();
        assert_eq!((done, failed), (0, 0));
        assert!(tmp.path().join("readme.txt").exists());
    }

    #[test]
    fn idempotent_across_reruns() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.txt.gz"), gzip(b"a")).unwrap();

        let (first, _) = decompress_tree(tmp.path(), &NoProgress).unwrap();
        let (second, _) = decompress_tree(tmp.path(), &NoProgress).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 0);
        assert_eq!(fs::read(tmp.path().join("a.txt")).unwrap(), b"a");
    }
}
