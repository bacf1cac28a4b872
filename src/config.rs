use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level refcast configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RefcastConfig {
    /// Persistence settings.
    #[serde(default)]
    pub persistence: PersistenceToml,

    /// Climatology settings.
    #[serde(default)]
    pub climatology: ClimatologyToml,

    /// Unit conversions available to the upscaler.
    #[serde(default)]
    pub rescale: RescaleToml,
}

impl RefcastConfig {
    /// Reads the configuration at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersistenceToml {
    #[serde(default = "default_order")]
    pub order: i64,
    /// Output unit. Falls back to the unit of the first source series.
    pub unit: Option<String>,
    /// Drop persisted values that are NaN or infinite.
    #[serde(default = "default_true")]
    pub finite_only: bool,
}

impl Default for PersistenceToml {
    fn default() -> Self {
        Self {
            order: default_order(),
            unit: None,
            finite_only: default_true(),
        }
    }
}

fn default_order() -> i64 {
    1
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ClimatologyToml {
    /// Output unit. Falls back to the unit of the first source series.
    pub unit: Option<String>,
    /// Earliest admissible valid time, RFC 3339.
    pub minimum: Option<String>,
    /// Latest admissible valid time, RFC 3339.
    pub maximum: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RescaleToml {
    #[serde(default)]
    pub conversions: Vec<ConversionToml>,
}

/// `to = from * factor`; the inverse is registered too.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionToml {
    pub from: String,
    pub to: String,
    pub factor: f64,
}
