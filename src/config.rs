use crate::calc::time::Period;
use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DefaultsConfig {
    /// Period preselected when `--period` is omitted
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClipboardConfig {
    /// Copy every new result without passing `--copy`
    #[serde(default)]
    pub auto_copy: bool,
    /// Fall back to the OSC 52 terminal escape when the system clipboard fails
    #[serde(default = "default_true")]
    pub osc52_fallback: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            auto_copy: false,
            osc52_fallback: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StateConfig {
    /// Optional override for the history directory (for testing)
    pub state_dir_override: Option<PathBuf>,
}

impl StateConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.state_dir_override {
            if dir.as_os_str().is_empty() {
                anyhow::bail!("state.state_dir_override must not be empty");
            }
            if dir.is_file() {
                anyhow::bail!(
                    "state.state_dir_override '{}' is a file, expected a directory",
                    dir.display()
                );
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.state.validate()?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(home::home_dir()
        .context("Could not find home directory")?
        .join(".sigan")
        .join("config.toml"))
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let loader = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .build()
        .context("Failed to build config loader")?;

    let config: Config = loader
        .try_deserialize()
        .context("Failed to parse config file")?;

    config.validate()?;
    Ok(config)
}

/// Loads `~/.sigan/config.toml`, or defaults when it does not exist yet.
pub fn load() -> Result<Config> {
    let config_path = config_path()?;
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    load_from_path(&config_path)
}

pub fn save_to_path<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

    Ok(())
}

/// Sets a dotted `key` (e.g. `clipboard.auto_copy`) in the config file at
/// `path`, creating the file if needed. The result must still deserialize
/// into a valid [`Config`].
pub fn set_in_path<P: AsRef<Path>>(path: P, key: &str, value: &str) -> Result<Config> {
    let path = path.as_ref();
    let mut table: toml::Table = if path.exists() {
        let raw = std::fs::read_to_string(path).context("Failed to read config file")?;
        raw.parse().context("Failed to parse config file")?
    } else {
        toml::Table::new()
    };

    let (section, field) = key
        .split_once('.')
        .with_context(|| format!("Key must look like section.field: {}", key))?;

    let known = serde_json::to_value(Config::default())?;
    let default_field = known
        .get(section)
        .and_then(|s| s.get(field))
        .with_context(|| format!("Unknown config key: {}", key))?;

    let parsed = match default_field {
        serde_json::Value::Bool(_) => toml::Value::Boolean(
            value
                .parse()
                .with_context(|| format!("{} expects true or false", key))?,
        ),
        _ => toml::Value::String(value.to_string()),
    };

    let section_table = table
        .entry(section.to_string())
        .or_insert(toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .with_context(|| format!("[{}] is not a table in config file", section))?;
    section_table.insert(field.to_string(), parsed);

    let updated: Config = toml::Value::Table(table)
        .try_into()
        .with_context(|| format!("Invalid value for {}: {}", key, value))?;
    updated.validate()?;

    save_to_path(&updated, path)?;
    Ok(updated)
}
