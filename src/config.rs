use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// Directory where archive entries are extracted and decompressed.
    /// Survives between runs so interrupted ingests can resume.
    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,

    /// Entries matching any of these globs are never extracted or ingested.
    /// The OLGA archive ships `index.php` wrappers alongside every tab.
    #[serde(default = "default_exclude_globs")]
    pub exclude_globs: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            exclude_globs: default_exclude_globs(),
        }
    }
}

fn default_workdir() -> PathBuf {
    PathBuf::from(".tabvault-work")
}

fn default_exclude_globs() -> Vec<String> {
    vec!["**/index.php*".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

fn default_limit() -> i64 {
    25
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.ingest.workdir.as_os_str().is_empty() {
        anyhow::bail!("ingest.workdir must not be empty");
    }

    if config.search.limit < 1 {
        anyhow::bail!("search.limit must be >= 1");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let cfg: Config = toml::from_str("[db]\npath = \"data/tabs.sqlite\"\n").unwrap();
        assert_eq!(cfg.db.path, PathBuf::from("data/tabs.sqlite"));
        assert_eq!(cfg.ingest.workdir, PathBuf::from(".tabvault-work"));
        assert_eq!(cfg.ingest.exclude_globs, vec!["**/index.php*"]);
        assert_eq!(cfg.search.limit, 25);
    }

    #[test]
    fn parse_full_config() {
        let cfg: Config = toml::from_str(
            r#"
            [db]
            path = "db.sqlite3"

            [ingest]
            workdir = ".tmp"
            exclude_globs = ["**/index.php*", "**/*.bak"]

            [search]
            limit = 50
            "#,
        )
        .unwrap();
        assert_eq!(cfg.ingest.workdir, PathBuf::from(".tmp"));
        assert_eq!(cfg.ingest.exclude_globs.len(), 2);
        assert_eq!(cfg.search.limit, 50);
    }
}
