//! Linear measurement-unit conversions.

use std::collections::HashMap;

use refcast_series::{Event, TimeSeries};

use crate::error::RescaleError;

/// Multiplicative conversion factors between named units.
#[derive(Debug, Clone, Default)]
pub struct UnitMapper {
    factors: HashMap<(String, String), f64>,
}

impl UnitMapper {
    /// Creates a mapper that knows only the identity conversion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `to = from * factor` and the inverse conversion.
    pub fn with_conversion(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        factor: f64,
    ) -> Self {
        let (from, to) = (from.into(), to.into());
        self.factors.insert((to.clone(), from.clone()), 1.0 / factor);
        self.factors.insert((from, to), factor);
        self
    }

    /// Returns the factor that converts `from` into `to`.
    ///
    /// # Errors
    ///
    /// Returns [`RescaleError::UnitConversion`] when no conversion is known.
    pub fn factor(&self, from: &str, to: &str) -> Result<f64, RescaleError> {
        if from == to {
            return Ok(1.0);
        }
        self.factors
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .ok_or_else(|| RescaleError::UnitConversion {
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    /// Converts every value of `series` into `to`, relabelling its unit.
    ///
    /// # Errors
    ///
    /// Returns [`RescaleError::UnitConversion`] when no conversion is known.
    pub fn convert(
        &self,
        series: TimeSeries<f64>,
        to: &str,
    ) -> Result<TimeSeries<f64>, RescaleError> {
        let factor = self.factor(series.unit(), to)?;
        if factor == 1.0 {
            return Ok(series.with_unit(to));
        }
        let (metadata, events) = series.into_parts();
        let events = events
            .into_iter()
            .map(|e| Event::new(e.time(), e.value() * factor))
            .collect();
        Ok(TimeSeries::new(metadata.with_unit(to), events)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_is_always_known() {
        assert_eq!(UnitMapper::new().factor("CMS", "CMS").unwrap(), 1.0);
    }

    #[test]
    fn inverse_is_registered() {
        let mapper = UnitMapper::new().with_conversion("CFS", "CMS", 0.028_316_846_592);
        assert_relative_eq!(mapper.factor("CMS", "CFS").unwrap(), 35.314_666_721, epsilon = 1e-6);
    }

    #[test]
    fn unknown_conversion_is_error() {
        let err = UnitMapper::new().factor("CFS", "CMS").unwrap_err();
        assert_eq!(
            err,
            RescaleError::UnitConversion {
                from: "CFS".to_string(),
                to: "CMS".to_string()
            }
        );
    }
}
