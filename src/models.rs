//! Core data models for the ingestion and query pipeline.
//!
//! A [`Record`] is the unit of ingestion output. Files found under a `tabs`
//! directory segment carry the artist attribute of their parent directory;
//! everything else is a resource with no artist. Identity is the full tuple
//! of populated fields, so re-ingesting identical content is a no-op.

/// A tab with an artist attribute, from the distinguished `tabs` subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRecord {
    pub artist: String,
    pub title: String,
    pub content: String,
}

/// A document outside the `tabs` subtree. No artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub title: String,
    pub content: String,
}

/// One eligible file, normalized. Content is always valid decoded text by
/// the time a `Record` exists (invalid byte sequences were substituted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Tab(TabRecord),
    Resource(ResourceRecord),
}

impl Record {
    pub fn title(&self) -> &str {
        match self {
            Record::Tab(t) => &t.title,
            Record::Resource(r) => &r.title,
        }
    }

    pub fn artist(&self) -> Option<&str> {
        match self {
            Record::Tab(t) => Some(&t.artist),
            Record::Resource(_) => None,
        }
    }
}

/// A search result row returned from the query engine.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub artist: Option<String>,
    pub title: String,
}
