//! Ingest progress reporting.
//!
//! Reports observable progress during `tabvault ingest` so users see which
//! phase is running and how much is left — the full OLGA archive holds tens
//! of thousands of entries and a cold run takes minutes. Progress is emitted
//! on **stderr** so stdout remains parseable for scripts.

use std::io::Write;

/// A single progress event for ingest.
#[derive(Clone, Debug)]
pub enum IngestProgressEvent {
    /// Archive extraction: n entries extracted out of total candidates.
    Extracting { n: u64, total: u64 },
    /// Gunzip phase: n compressed files unwrapped so far. Total unknown
    /// until the walk finishes.
    Decompressing { n: u64 },
    /// Populate phase: n files classified and inserted so far.
    Populating { n: u64 },
}

/// Reports ingest progress. Implementations write to stderr (human or JSON).
pub trait IngestProgressReporter: Send + Sync {
    /// Emit a progress event. Called from the ingest pipeline.
    fn report(&self, event: IngestProgressEvent);
}

/// Human-friendly progress on stderr: "ingest  extracting  1,234 / 5,000 entries".
pub struct StderrProgress;

impl IngestProgressReporter for StderrProgress {
    fn report(&self, event: IngestProgressEvent) {
        let line = match &event {
            IngestProgressEvent::Extracting { n, total } => {
                format!(
                    "ingest  extracting  {} / {} entries\n",
                    format_number(*n),
                    format_number(*total)
                )
            }
            IngestProgressEvent::Decompressing { n } => {
                format!("ingest  decompressing  {} files\n", format_number(*n))
            }
            IngestProgressEvent::Populating { n } => {
                format!("ingest  populating  {} files\n", format_number(*n))
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl IngestProgressReporter for JsonProgress {
    fn report(&self, event: IngestProgressEvent) {
        let obj = match &event {
            IngestProgressEvent::Extracting { n, total } => serde_json::json!({
                "event": "progress",
                "phase": "extracting",
                "n": n,
                "total": total
            }),
            IngestProgressEvent::Decompressing { n } => serde_json::json!({
                "event": "progress",
                "phase": "decompressing",
                "n": n
            }),
            IngestProgressEvent::Populating { n } => serde_json::json!({
                "event": "progress",
                "phase": "populating",
                "n": n
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl IngestProgressReporter for NoProgress {
    fn report(&self, _event: IngestProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Build a reporter for this mode. Caller passes it to ingest.
    pub fn reporter(&self) -> Box<dyn IngestProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
