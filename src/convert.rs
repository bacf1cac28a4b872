//! Conversion from TOML config structs to library config types.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use refcast_baseline::{ClimatologyConfig, PersistenceConfig};
use refcast_rescale::UnitMapper;

use crate::config::{ClimatologyToml, PersistenceToml, RescaleToml};

/// Parse an RFC 3339 instant into UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(s).with_context(|| {
        format!("invalid instant '{s}': expected RFC 3339, e.g. 1981-01-01T00:00:00Z")
    })?;
    Ok(parsed.with_timezone(&Utc))
}

/// Build a [`PersistenceConfig`], using `fallback_unit` when none is configured.
pub fn build_persistence_config(
    persistence: &PersistenceToml,
    order: Option<i64>,
    fallback_unit: &str,
) -> PersistenceConfig {
    let unit = persistence.unit.as_deref().unwrap_or(fallback_unit);
    PersistenceConfig::new(unit).with_order(order.unwrap_or(persistence.order))
}

/// Build a [`ClimatologyConfig`], using `fallback_unit` when none is configured.
pub fn build_climatology_config(
    climatology: &ClimatologyToml,
    fallback_unit: &str,
) -> Result<ClimatologyConfig> {
    let unit = climatology.unit.as_deref().unwrap_or(fallback_unit);
    let mut config = ClimatologyConfig::new(unit);
    if let Some(ref minimum) = climatology.minimum {
        config = config.with_minimum(parse_instant(minimum).context("climatology.minimum")?);
    }
    if let Some(ref maximum) = climatology.maximum {
        config = config.with_maximum(parse_instant(maximum).context("climatology.maximum")?);
    }
    Ok(config)
}

/// Build a [`UnitMapper`] from the configured conversions.
pub fn build_unit_mapper(rescale: &RescaleToml) -> Result<UnitMapper> {
    let mut units = UnitMapper::new();
    for c in &rescale.conversions {
        if !c.factor.is_finite() || c.factor <= 0.0 {
            bail!(
                "conversion from {} to {} needs a positive factor, got {}",
                c.from,
                c.to,
                c.factor
            );
        }
        units = units.with_conversion(c.from.as_str(), c.to.as_str(), c.factor);
    }
    Ok(units)
}
