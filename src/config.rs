//! Engine configuration.
//!
//! [`EngineConfig::load`] reads `config.json` from the settings directory and
//! falls back to the built-in defaults for anything missing. The defaults are
//! also what [`EngineConfig::default`] returns, which is what tests use.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const SETTINGS_FILENAME: &str = "Settings.json";
pub const CONFIG_FILENAME: &str = "config.json";

/// Tunables for scoring and icon resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_base_score")]
    pub base_score: i64,
    /// Added once per placeholder that received an argument.
    #[serde(default = "default_arg_bonus")]
    pub arg_bonus: i64,
    #[serde(default = "default_bulk_base")]
    pub bulk_base: i64,
    #[serde(default = "default_similarity_multiplier")]
    pub similarity_multiplier: i64,
    /// Rewards arguments that resemble the binding's title.
    #[serde(default)]
    pub title_similarity: bool,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: usize,
    /// `{host}` is replaced by the host of the candidate url.
    #[serde(default = "default_favicon_url_template")]
    pub favicon_url_template: String,
    #[serde(default = "default_default_icon")]
    pub default_icon: String,
}

fn default_base_score() -> i64 { 1000 }
fn default_arg_bonus() -> i64 { 100 }
fn default_bulk_base() -> i64 { 10_000 }
fn default_similarity_multiplier() -> i64 { 50 }
fn default_probe_timeout_secs() -> u64 { 5 }
fn default_max_concurrent_probes() -> usize { 10 }
fn default_favicon_url_template() -> String { "https://www.google.com/s2/favicons?domain_url={host}&sz=48".to_string() }
fn default_default_icon() -> String { "Images/app.png".to_string() }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_score: default_base_score(),
            arg_bonus: default_arg_bonus(),
            bulk_base: default_bulk_base(),
            similarity_multiplier: default_similarity_multiplier(),
            title_similarity: false,
            probe_timeout_secs: default_probe_timeout_secs(),
            max_concurrent_probes: default_max_concurrent_probes(),
            favicon_url_template: default_favicon_url_template(),
            default_icon: default_default_icon(),
        }
    }
}

impl EngineConfig {
    /// Loads the config at `path`. A missing or unreadable file yields the defaults.
    pub fn load(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => {
                log::debug!("no engine config at {}: {}", path.display(), err);
                return Self::default();
            }
        };

        if data.trim().is_empty() {
            return Self::default();
        }

        serde_json::from_str(&data).unwrap_or_else(|err| {
            log::warn!("ignoring invalid engine config {}: {}", path.display(), err);
            Self::default()
        })
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn favicon_url(&self, host: &str) -> String {
        self.favicon_url_template.replace("{host}", host)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `$XDG_CONFIG_HOME/linkopener`, or `~/.config/linkopener`.
pub fn settings_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("linkopener")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.base_score, 1000);
        assert_eq!(cfg.bulk_base, 10_000);
        assert_eq!(cfg.max_concurrent_probes, 10);
        assert_eq!(cfg.probe_timeout(), Duration::from_secs(5));
        assert!(!cfg.title_similarity);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"arg_bonus": 7, "title_similarity": true}"#).unwrap();
        assert_eq!(cfg.arg_bonus, 7);
        assert!(cfg.title_similarity);
        assert_eq!(cfg.similarity_multiplier, 50);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = EngineConfig::load(Path::new("/definitely/not/here/config.json"));
        assert_eq!(cfg.default_icon, "Images/app.png");
    }

    #[test]
    fn favicon_url_uses_host() {
        let cfg = EngineConfig::default();
        assert_eq!(
            cfg.favicon_url("github.com"),
            "https://www.google.com/s2/favicons?domain_url=github.com&sz=48"
        );
    }
}
