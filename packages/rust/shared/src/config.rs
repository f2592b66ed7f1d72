//! Application configuration for pagegen.
//!
//! User config lives at `~/.pagegen/pagegen.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PageGenError, Result};
use crate::types::CONTENT_VERSION;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pagegen.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pagegen";

// ---------------------------------------------------------------------------
// Config structs (matching pagegen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input/output defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Content generation settings.
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory the three page documents are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Raw product JSON file read when no `--input` is given.
    #[serde(default = "default_input")]
    pub input: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            input: default_input(),
        }
    }
}

fn default_output_dir() -> String {
    "output".into()
}
fn default_input() -> String {
    "sample_product.json".into()
}

/// `[generation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum number of answered questions on the FAQ page.
    #[serde(default = "default_faq_limit")]
    pub faq_limit: usize,

    /// Version stamp written into page metadata.
    #[serde(default = "default_version")]
    pub version: String,

    /// Seed for the comparison-variant random source. Unseeded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            faq_limit: default_faq_limit(),
            version: default_version(),
            seed: None,
        }
    }
}

fn default_faq_limit() -> usize {
    15
}
fn default_version() -> String {
    CONTENT_VERSION.into()
}

impl AppConfig {
    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.generation.faq_limit == 0 {
            return Err(PageGenError::config("generation.faq_limit must be at least 1"));
        }
        if self.generation.version.trim().is_empty() {
            return Err(PageGenError::config("generation.version must not be empty"));
        }
        if self.defaults.output_dir.trim().is_empty() {
            return Err(PageGenError::config("defaults.output_dir must not be empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pagegen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PageGenError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pagegen/pagegen.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| PageGenError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        PageGenError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PageGenError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PageGenError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PageGenError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
