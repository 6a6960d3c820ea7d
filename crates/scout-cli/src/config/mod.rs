//! Persisted CLI configuration.

use anyhow::{anyhow, bail, Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::output::OutputFormat;

/// Overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "SCOUT_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Keys accepted by `config set`.
pub const KEYS: [(&str, &str); 6] = [
    ("api_key", "API key sent with every request"),
    ("output_format", "Format for data commands (json/yaml/ndjson/short/template)"),
    ("spinner", "Show a progress spinner (true/false)"),
    ("show_tips", "Show hints after commands (true/false)"),
    ("timeout", "Request timeout in seconds"),
    ("api_url", "API base URL"),
];

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API key.
    pub api_key: Option<String>,

    /// Output format for commands that print data. Kept as text so a bad
    /// value surfaces as a format error at run time.
    pub output_format: String,

    /// Show a progress spinner while requests are in flight.
    pub spinner: bool,

    /// Show helpful tips after commands.
    pub show_tips: bool,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// API base URL, for proxies and test servers.
    pub api_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            output_format: OutputFormat::default().as_str().to_string(),
            spinner: true,
            show_tips: true,
            timeout_secs: 30,
            api_url: None,
        }
    }
}

impl Config {
    /// Directory holding the config file and templates.
    pub fn dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        let dirs = ProjectDirs::from("is", "scout", "scout")
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().to_path_buf())
    }

    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join(CONFIG_FILE))
    }

    /// Where `template` output looks for per-command templates.
    pub fn templates_dir() -> Result<PathBuf> {
        Ok(Self::dir()?.join("templates"))
    }

    /// Load configuration from file. A missing file means defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Load for repair: entries that do not parse fall back to their defaults
    /// with a warning instead of failing the whole file.
    pub fn load_lenient() -> Result<Self> {
        Self::load_lenient_from(&Self::path()?)
    }

    pub fn load_lenient_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let mut table: toml::Table = match content.parse() {
            Ok(table) => table,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config file is not valid TOML, using defaults");
                return Ok(Self::default());
            }
        };

        let rejected: Vec<String> = table
            .iter()
            .filter(|(key, value)| {
                let single = toml::Table::from_iter([((*key).clone(), (*value).clone())]);
                toml::Value::Table(single).try_into::<Self>().is_err()
            })
            .map(|(key, _)| key.clone())
            .collect();
        for key in &rejected {
            warn!(path = %path.display(), key = %key, "ignoring invalid config entry");
            table.remove(key);
        }

        toml::Value::Table(table)
            .try_into()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("cannot write {}", path.display()))
    }

    /// Set `key` from its textual `value`, checking the value first.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_key" => self.api_key = Some(value.to_string()),
            "output_format" => {
                let format: OutputFormat = value.parse()?;
                self.output_format = format.as_str().to_string();
            }
            "spinner" => self.spinner = parse_bool(key, value)?,
            "show_tips" => self.show_tips = parse_bool(key, value)?,
            "timeout" | "timeout_secs" => {
                self.timeout_secs = value
                    .parse()
                    .map_err(|_| anyhow!("timeout must be a whole number of seconds, got '{value}'"))?;
            }
            "api_url" => self.api_url = Some(value.to_string()),
            _ => {
                let keys: Vec<String> = KEYS.iter().map(|(k, help)| format!("  {k:<15}{help}")).collect();
                bail!("Unknown config key: {key}\n\nAvailable keys:\n{}", keys.join("\n"));
            }
        }
        Ok(())
    }

    /// The API key with everything but the edges hidden.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(mask)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| anyhow!("{key} must be true or false, got '{value}'"))
}

fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}
