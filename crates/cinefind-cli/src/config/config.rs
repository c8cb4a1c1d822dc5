//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::search::SearchOptions;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog request settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

/// Catalog request configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// Response language (e.g. "en-US").
    #[serde(default = "default_language")]
    pub language: String,
    /// Include adult titles in results.
    #[serde(default)]
    pub include_adult: bool,
    /// API base URL override, e.g. for a local proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_language() -> String {
    String::from("en-US")
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            include_adult: false,
            base_url: None,
        }
    }
}

impl TmdbConfig {
    /// Parses the base URL override.
    ///
    /// A missing trailing slash is added so endpoint paths join below it.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is set but is not a valid URL.
    pub fn base_url(&self) -> Result<Option<Url>> {
        let Some(raw) = self.base_url.as_deref() else {
            return Ok(None);
        };
        let normalized = if raw.ends_with('/') {
            raw.to_owned()
        } else {
            format!("{raw}/")
        };
        let url = Url::parse(&normalized)
            .with_context(|| format!("invalid tmdb.base_url in config: {raw}"))?;
        Ok(Some(url))
    }

    /// Request options for the fetch dispatcher.
    #[must_use]
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            language: self.language.clone(),
            include_adult: self.include_adult,
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Renders the config as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config to TOML")
    }
}
