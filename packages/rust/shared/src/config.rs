//! Application configuration for wikiharvest.
//!
//! User config lives at `~/.wikiharvest/wikiharvest.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, WikiHarvestError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "wikiharvest.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".wikiharvest";

/// User-Agent sent when none is configured. wiki.gg answers 403 without one.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "wikiharvest/",
    env!("CARGO_PKG_VERSION"),
    " (item data export; educational)"
);

// ---------------------------------------------------------------------------
// Config structs (matching wikiharvest.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote wiki settings.
    #[serde(default)]
    pub wiki: WikiConfig,

    /// Scrape run settings.
    #[serde(default)]
    pub scrape: ScrapeSection,
}

/// `[wiki]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Origin of the wiki, used for the API endpoint and to absolutize URLs.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of `api.php` relative to the origin.
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// Category the traversal starts from.
    #[serde(default = "default_root_category")]
    pub root_category: String,

    /// User-Agent header for every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_path: default_api_path(),
            root_category: default_root_category(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://deadbydaylight.wiki.gg".into()
}
fn default_api_path() -> String {
    "/api.php".into()
}
fn default_root_category() -> String {
    "Category:Items".into()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[scrape]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSection {
    /// Pause after every request, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Maximum number of item pages to process (0 = no limit).
    #[serde(default)]
    pub limit: usize,

    /// Output JSON path.
    #[serde(default = "default_output")]
    pub output: String,

    /// How item table columns are located.
    #[serde(default)]
    pub layout: LayoutMode,
}

impl Default for ScrapeSection {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            limit: 0,
            output: default_output(),
            layout: LayoutMode::default(),
        }
    }
}

fn default_delay_ms() -> u64 {
    250
}
fn default_output() -> String {
    "output/survivor_items.json".into()
}

/// Column resolution strategy for the item table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Icon, description and cost are columns 1, 2 and 3.
    #[default]
    Positional,
    /// Columns are located by header text; positional when the table has no header cells.
    Headers,
}

impl std::str::FromStr for LayoutMode {
    type Err = WikiHarvestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "positional" => Ok(Self::Positional),
            "headers" => Ok(Self::Headers),
            other => Err(WikiHarvestError::config(format!(
                "unknown layout '{other}': expected 'positional' or 'headers'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Scrape config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime scrape configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Wiki origin.
    pub base_url: Url,
    /// Path of `api.php` relative to the origin.
    pub api_path: String,
    /// Category the traversal starts from.
    pub root_category: String,
    /// User-Agent header.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Politeness delay inserted after each request.
    pub delay: Duration,
    /// Optional cap on the number of pages processed.
    pub limit: Option<usize>,
    /// Output JSON path.
    pub output: PathBuf,
    /// Column resolution strategy.
    pub layout: LayoutMode,
}

impl TryFrom<&AppConfig> for ScrapeConfig {
    type Error = WikiHarvestError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        let base_url = Url::parse(&config.wiki.base_url).map_err(|e| {
            WikiHarvestError::config(format!("invalid base_url '{}': {e}", config.wiki.base_url))
        })?;

        Ok(Self {
            base_url,
            api_path: config.wiki.api_path.clone(),
            root_category: config.wiki.root_category.clone(),
            user_agent: config.wiki.user_agent.clone(),
            timeout: Duration::from_secs(config.wiki.timeout_secs),
            delay: Duration::from_millis(config.scrape.delay_ms),
            limit: (config.scrape.limit > 0).then_some(config.scrape.limit),
            output: PathBuf::from(&config.scrape.output),
            layout: config.scrape.layout,
        })
    }
}

impl ScrapeConfig {
    /// Reject settings the remote service would refuse.
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(WikiHarvestError::config(
                "user agent must not be empty (the wiki rejects anonymous requests)",
            ));
        }
        if self.root_category.trim().is_empty() {
            return Err(WikiHarvestError::config("root category must not be empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.wikiharvest/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| WikiHarvestError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.wikiharvest/wikiharvest.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| WikiHarvestError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        WikiHarvestError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| WikiHarvestError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| WikiHarvestError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| WikiHarvestError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
