use crate::error::{DatattrError, Result};
use crate::options::{Options, DEFAULT_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

pub const CONFIG_KEYS: [&str; 3] = ["name", "empty", "bools"];

/// Stored default options, kept in .datattr/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatattrConfig {
    /// Attribute prefix and directive name
    #[serde(default = "default_name")]
    pub name: String,

    /// Write empty values instead of skipping them
    #[serde(default)]
    pub empty: bool,

    /// Keep booleans as true/false
    #[serde(default)]
    pub bools: bool,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl Default for DatattrConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            empty: false,
            bools: false,
        }
    }
}

impl DatattrConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: DatattrConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "name" => Ok(self.name.clone()),
            "empty" => Ok(self.empty.to_string()),
            "bools" => Ok(self.bools.to_string()),
            other => Err(unknown_key(other)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "name" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(DatattrError::Config("name cannot be empty".to_string()));
                }
                self.name = value.to_string();
            }
            "empty" => self.empty = parse_bool(key, value)?,
            "bools" => self.bools = parse_bool(key, value)?,
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }

    pub fn options(&self) -> Options {
        Options {
            name: self.name.clone(),
            empty: self.empty,
            bools: self.bools,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(DatattrError::Config(format!(
            "{} expects a boolean, got {:?}",
            key, value
        ))),
    }
}

fn unknown_key(key: &str) -> DatattrError {
    DatattrError::Config(format!(
        "Unknown config key: {} (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
