//! # Tabvault
//!
//! Converts the OLGA guitar-tab archive into a normalized, full-text
//! searchable SQLite store, and serves search and exact lookup over it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌──────────┐   ┌──────────┐
//! │ Archive  │──▶│ Decompress │──▶│ Classify │──▶│  SQLite  │
//! │ (zip)    │   │ (gunzip)   │   │ +Extract │   │ FTS5     │
//! └──────────┘   └────────────┘   └──────────┘   └────┬─────┘
//!                                                     │
//!                                          ┌──────────┴───────┐
//!                                          ▼                  ▼
//!                                     ┌──────────┐      ┌──────────┐
//!                                     │  search  │      │   get    │
//!                                     └──────────┘      └──────────┘
//! ```
//!
//! Every pipeline phase is resumable: extraction skips entries already on
//! disk, decompression skips already-unwrapped targets, and population is
//! idempotent under the store's uniqueness constraints. Interrupt and
//! re-invoke; nothing is lost and nothing duplicates.
//!
//! ## Quick Start
//!
//! ```bash
//! tabvault init                    # create database and schema
//! tabvault ingest olga.zip         # extract, decompress, populate
//! tabvault search "queen"          # FTS5 over artist/title
//! tabvault get bohemian_rhapsody.txt --artist Queen
//! tabvault stats                   # row counts
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core record types |
//! | [`archive`] | Selective zip extraction |
//! | [`decompress`] | In-place gunzip of the extracted tree |
//! | [`classify`] | Content-based eligibility sniffing |
//! | [`extract`] | File → record mapping |
//! | [`ingest`] | Pipeline orchestration and store population |
//! | [`search`] | FTS5 keyword search |
//! | [`get`] | Exact (artist, title) lookup |
//! | [`stats`] | Store summary |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema and trigger setup |

pub mod archive;
pub mod classify;
pub mod config;
pub mod db;
pub mod decompress;
pub mod extract;
pub mod get;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod progress;
pub mod search;
pub mod stats;
