//! Content-based file classification.
//!
//! Filenames in the source archive are unreliable — extensions are
//! inconsistent and often stripped by decompression — so eligibility is
//! decided from file bytes alone. Only plain text and RFC-822 message
//! envelopes (some tabs arrived by mail and kept their headers) are
//! ingested; everything else is excluded.

use content_inspector::inspect;
use std::path::Path;

/// Bytes inspected when deciding a file's content type.
const SNIFF_LEN: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    PlainText,
    Message,
    Binary,
}

impl FileKind {
    /// Eligible files become Records; binary and undeterminable content
    /// never does.
    pub fn is_eligible(&self) -> bool {
        !matches!(self, FileKind::Binary)
    }
}

/// Classify a byte buffer. Empty files are treated as binary (excluded):
/// they carry no content worth a record.
pub fn classify(bytes: &[u8]) -> FileKind {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];

    if head.is_empty() || !inspect(head).is_text() {
        return FileKind::Binary;
    }

    if looks_like_message(head) {
        FileKind::Message
    } else {
        FileKind::PlainText
    }
}

/// Classify by reading the first [`SNIFF_LEN`] bytes of a file.
/// Unreadable files are ineligible, never an error.
pub fn classify_file(path: &Path) -> FileKind {
    use std::io::Read;

    let mut head = vec![0u8; SNIFF_LEN];
    let n = match std::fs::File::open(path).and_then(|mut f| f.read(&mut head)) {
        Ok(n) => n,
        Err(_) => return FileKind::Binary,
    };
    classify(&head[..n])
}

/// True when the buffer opens with an RFC-822 header block: either an mbox
/// `From ` separator or a `Field-Name: value` line.
fn looks_like_message(head: &[u8]) -> bool {
    let text = String::from_utf8_lossy(head);
    let first_line = match text.lines().find(|l| !l.trim().is_empty()) {
        Some(l) => l,
        None => return false,
    };

    if first_line.starts_with("From ") {
        return true;
    }

    match first_line.split_once(':') {
        Some((name, rest)) => {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
                && rest.starts_with(' ')
        }
        None => false,
    }
}
