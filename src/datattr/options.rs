//! Synchronization options and how they combine.
//!
//! There are three layers, each merged on top of the previous one into a
//! fresh [`Options`] value:
//!
//! 1. [`Options::default`]: prefix `data`, empties skipped, booleans as `1`/`0`
//! 2. [`PluginConfig`]: given once at installation
//! 3. [`Modifiers`]: given per directive call (flags only; the prefix stays
//!    the installed one, see [`Options::merged_call`])
//!
//! Merging never mutates the value it starts from, so modifiers from one call
//! can't leak into the next.

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_NAME: &str = "data";

/// Effective options for one synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Attribute prefix; attributes are named `{name}-{key}`.
    pub name: String,

    /// Write empty and undefined values instead of skipping them.
    pub empty: bool,

    /// Keep booleans as `true`/`false` instead of coercing to `1`/`0`.
    pub bools: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            empty: false,
            bools: false,
        }
    }
}

impl Options {
    /// Returns a copy of `self` with every field set in `overrides` replaced.
    pub fn merged(&self, overrides: &Modifiers) -> Options {
        Options {
            name: overrides.name.clone().unwrap_or_else(|| self.name.clone()),
            empty: overrides.empty.unwrap_or(self.empty),
            bools: overrides.bools.unwrap_or(self.bools),
        }
    }

    /// Merge per-call modifiers. The prefix is fixed at installation, so a
    /// `name` in `call` is ignored; attributes written by one call can always
    /// be found and cleared by the next.
    pub fn merged_call(&self, call: &Modifiers) -> Options {
        if let Some(name) = &call.name {
            if *name != self.name {
                warn!(name = %name, prefix = %self.name, "ignoring per-call prefix override");
            }
        }
        Options {
            name: self.name.clone(),
            empty: call.empty.unwrap_or(self.empty),
            bools: call.bools.unwrap_or(self.bools),
        }
    }

    pub fn attribute_name(&self, key: &str) -> String {
        format!("{}-{}", self.name, key)
    }
}

/// Partial options. Unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bools: Option<bool>,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build modifiers from host directive flags such as `v-data.empty.bools`.
    /// Each recognized flag turns its option on; other flags are ignored.
    pub fn from_flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut modifiers = Self::default();
        for flag in flags {
            match flag.as_ref() {
                "empty" => modifiers.empty = Some(true),
                "bools" => modifiers.bools = Some(true),
                other => warn!(flag = other, "ignoring unknown directive modifier"),
            }
        }
        modifiers
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_empty(mut self, empty: bool) -> Self {
        self.empty = Some(empty);
        self
    }

    pub fn with_bools(mut self, bools: bool) -> Self {
        self.bools = Some(bools);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.empty.is_none() && self.bools.is_none()
    }
}

/// Installation config: either a bare prefix or a partial options record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PluginConfig {
    Prefix(String),
    Record(Modifiers),
}

impl Default for PluginConfig {
    fn default() -> Self {
        PluginConfig::Record(Modifiers::default())
    }
}

impl PluginConfig {
    /// The overrides this config applies on top of the defaults.
    pub fn modifiers(&self) -> Modifiers {
        match self {
            PluginConfig::Prefix(name) => Modifiers::new().with_name(name.clone()),
            PluginConfig::Record(modifiers) => modifiers.clone(),
        }
    }

    pub fn resolve(&self, defaults: &Options) -> Options {
        defaults.merged(&self.modifiers())
    }
}

impl From<&str> for PluginConfig {
    fn from(name: &str) -> Self {
        PluginConfig::Prefix(name.to_string())
    }
}

impl From<String> for PluginConfig {
    fn from(name: String) -> Self {
        PluginConfig::Prefix(name)
    }
}

impl From<Options> for Modifiers {
    fn from(options: Options) -> Self {
        Modifiers {
            name: Some(options.name),
            empty: Some(options.empty),
            bools: Some(options.bools),
        }
    }
}

impl From<Options> for PluginConfig {
    fn from(options: Options) -> Self {
        PluginConfig::Record(options.into())
    }
}

impl From<Modifiers> for PluginConfig {
    fn from(modifiers: Modifiers) -> Self {
        PluginConfig::Record(modifiers)
    }
}
