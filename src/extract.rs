//! File-to-record extraction.
//!
//! Maps one eligible file to a [`Record`]. The title is the raw file name,
//! extension included — turning it into a display string (stripping
//! suffixes, separator replacement, title-casing) is the presentation
//! layer's job. Content is a best-effort UTF-8 decoding: the corpus spans
//! two decades of legacy encodings, so invalid sequences become U+FFFD
//! instead of failing the file.

use std::path::Path;

use crate::models::{Record, ResourceRecord, TabRecord};

/// Path segment that marks the artist-attributed subtree.
pub const TABS_SEGMENT: &str = "tabs";

/// Build a record from a file's path and bytes. `root` is the workdir the
/// file was extracted under; the artist attribute is assigned iff a `tabs`
/// segment appears in the file's ancestry below it, in which case the
/// artist is the immediate parent directory's name.
pub fn extract_record(root: &Path, path: &Path, bytes: &[u8]) -> Record {
    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let content = String::from_utf8_lossy(bytes).into_owned();

    let relative = path.strip_prefix(root).unwrap_or(path);
    let under_tabs = relative
        .components()
        .any(|c| c.as_os_str() == TABS_SEGMENT);

    if under_tabs {
        let artist = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Record::Tab(TabRecord {
            artist,
            title,
            content,
        })
    } else {
        Record::Resource(ResourceRecord { title, content })
    }
}
