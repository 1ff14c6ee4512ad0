use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What the walker does when a listing page cannot be fetched or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// First failure aborts the whole walk; nothing is written.
    #[default]
    Abort,
    /// Failed listings are recorded and skipped; the rest of the tree is still walked.
    Partial,
}

/// Listing fetch parameters (optional `[fetch]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Connect timeout per listing request, in seconds.
    pub connect_timeout_secs: u64,
    /// Overall timeout per listing request, in seconds.
    pub timeout_secs: u64,
    /// Maximum listing requests in flight at once (1 = sequential depth-first walk).
    pub max_concurrent: usize,
    /// Abort on the first failed listing, or keep going and report failures.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 60,
            max_concurrent: 1,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

pub const DEFAULT_BASE_URL: &str = "https://video.fosdem.org/";
pub const DEFAULT_CATALOG_PATH: &str = "./fosdem-video-data.json";
pub const DEFAULT_PARENT_SENTINEL: &str = "Parent directory/";

pub fn default_extensions() -> Vec<String> {
    ["avi", "ogg", "ogv", "mp4", "webm"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_parent_sentinel() -> String {
    DEFAULT_PARENT_SENTINEL.to_string()
}

/// Global configuration loaded from `~/.config/mediadex/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediadexConfig {
    /// Root of the listing tree. Must end with `/`.
    pub base_url: String,
    /// Where `fetch` writes the catalog and `search` reads it.
    pub catalog_path: PathBuf,
    /// Recognized media extensions (matched by substring containment in the anchor label).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Label of the listing's link back to the parent directory; never descended into.
    #[serde(default = "default_parent_sentinel")]
    pub parent_sentinel: String,
    /// Optional fetch section; if missing, built-in defaults are used.
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
}

impl Default for MediadexConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            extensions: default_extensions(),
            parent_sentinel: default_parent_sentinel(),
            fetch: Some(FetchConfig::default()),
        }
    }
}

impl MediadexConfig {
    /// Fetch settings with defaults filled in.
    pub fn fetch_settings(&self) -> FetchConfig {
        self.fetch.clone().unwrap_or_default()
    }

    /// Reject configurations the walker cannot work with.
    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.base_url)?;
        if self.extensions.iter().all(|e| e.is_empty()) {
            anyhow::bail!("config: `extensions` must list at least one non-empty extension");
        }
        Ok(())
    }
}

/// A base URL must be absolute http(s) and end with `/`, since walked locations
/// are built by plain concatenation.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(base_url).with_context(|| format!("invalid base URL: {base_url}"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("base URL must be http or https: {base_url}");
    }
    if !base_url.ends_with('/') {
        anyhow::bail!("base URL must end with '/': {base_url}");
    }
    Ok(())
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mediadex")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MediadexConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but against an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<MediadexConfig> {
    if !path.exists() {
        let default_cfg = MediadexConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: MediadexConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
