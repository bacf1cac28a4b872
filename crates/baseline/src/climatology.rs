//! Climatology baselines: for each template valid time, an ensemble of the
//! source values at the same calendar instant in every other year.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use refcast_calendar::{month_day_interval, with_year};
use refcast_rescale::{Upscaler, is_rescaling_required};
use refcast_series::{
    Ensemble, Event, Feature, TimeScale, TimeScaleFunction, TimeSeries, TimeSeriesMetadata,
};
use tracing::{debug, trace};

use crate::config::ClimatologyConfig;
use crate::consolidate::consolidate_by_feature;
use crate::error::BaselineError;
use crate::generator::{BaselineGenerator, BaselineWarning, Generated};

const GENERATOR: &str = "climatology";

/// Consolidated source for one feature.
#[derive(Debug)]
struct ClimatologyStructure {
    /// Exact lookups by valid time.
    by_time: BTreeMap<DateTime<Utc>, f64>,
    /// Whole series, handed to the upscaler.
    series: TimeSeries<f64>,
}

impl ClimatologyStructure {
    fn new(series: TimeSeries<f64>) -> Self {
        let by_time = series.events().iter().map(|e| (e.time(), *e.value())).collect();
        Self { by_time, series }
    }

    fn metadata(&self) -> &TimeSeriesMetadata {
        self.series.metadata()
    }

    /// Calendar years from the first to the last source event.
    fn years(&self) -> impl Iterator<Item = i32> {
        let first = self.series.first().map(|e| e.time().year());
        let last = self.series.last().map(|e| e.time().year());
        first.zip(last).into_iter().flat_map(|(first, last)| first..=last)
    }
}

/// Generates climatological ensembles from observation-like source data.
///
/// The source is consolidated per feature once, at construction. A template
/// series of any value type supplies the valid times, the feature and the
/// desired time scale; each output event holds one member per other source
/// year, labelled with that year.
pub struct ClimatologyGenerator {
    sources: BTreeMap<Feature, ClimatologyStructure>,
    source_metadata: TimeSeriesMetadata,
    config: ClimatologyConfig,
    upscaler: Option<Arc<dyn Upscaler<f64>>>,
    warnings: Vec<BaselineWarning>,
}

impl fmt::Debug for ClimatologyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClimatologyGenerator")
            .field("features", &self.sources.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .field("upscaler", &self.upscaler.is_some())
            .finish_non_exhaustive()
    }
}

impl ClimatologyGenerator {
    /// Builds a generator from the complete source.
    ///
    /// # Errors
    ///
    /// - [`BaselineError::InvalidPeriod`] if both bounds are set and the
    ///   maximum is not later than the minimum.
    /// - [`BaselineError::EmptySource`] if there are no series or no events.
    /// - [`BaselineError::ForecastLikeSource`] if any series has a `T0`
    ///   reference time.
    #[tracing::instrument(skip_all, fields(unit = config.unit()))]
    pub fn new(
        source: impl IntoIterator<Item = TimeSeries<f64>>,
        config: ClimatologyConfig,
    ) -> Result<Self, BaselineError> {
        if let (Some(minimum), Some(maximum)) = (config.minimum(), config.maximum()) {
            if maximum <= minimum {
                return Err(BaselineError::InvalidPeriod { minimum, maximum });
            }
        }

        let source: Vec<TimeSeries<f64>> = source.into_iter().collect();
        if source.iter().all(TimeSeries::is_empty) {
            return Err(BaselineError::EmptySource {
                generator: GENERATOR,
            });
        }

        if let Some(forecast) = source.iter().find(|s| s.metadata().is_forecast_like()) {
            return Err(BaselineError::ForecastLikeSource {
                generator: GENERATOR,
                feature: forecast.feature().to_string(),
            });
        }

        let (merged, warnings) = consolidate_by_feature(source, GENERATOR);
        let sources: BTreeMap<_, _> = merged
            .into_iter()
            .map(|(feature, series)| (feature, ClimatologyStructure::new(series)))
            .collect();

        let source_metadata = sources
            .values()
            .next()
            .map(|s| s.metadata().clone())
            .ok_or(BaselineError::EmptySource {
                generator: GENERATOR,
            })?;

        debug!(
            n_features = sources.len(),
            minimum = ?config.minimum(),
            maximum = ?config.maximum(),
            "created climatology generator"
        );

        Ok(Self {
            sources,
            source_metadata,
            config,
            upscaler: None,
            warnings,
        })
    }

    /// Supplies the upscaler used when a template's time scale differs from
    /// the source's.
    pub fn with_upscaler(mut self, upscaler: Arc<dyn Upscaler<f64>>) -> Self {
        self.upscaler = Some(upscaler);
        self
    }

    /// Warnings raised at construction, such as duplicate source events.
    pub fn warnings(&self) -> &[BaselineWarning] {
        &self.warnings
    }

    /// Metadata of one consolidated source series.
    pub fn source_metadata(&self) -> &TimeSeriesMetadata {
        &self.source_metadata
    }

    /// Features with source data.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.sources.keys()
    }

    /// Generates the climatology for `template`.
    ///
    /// # Errors
    ///
    /// - [`BaselineError::UnknownFeature`] if no source matches the template.
    /// - [`BaselineError::MissingUpscaler`] if rescaling is needed and no
    ///   upscaler was supplied.
    /// - [`BaselineError::Rescale`] if the upscaler rejects the request.
    pub fn generate<S>(
        &self,
        template: &TimeSeries<S>,
    ) -> Result<TimeSeries<Ensemble>, BaselineError> {
        self.generate_with_warnings(template).map(|g| g.series)
    }

    /// As [`generate`](Self::generate), also returning rescaling warnings.
    pub fn generate_with_warnings<S>(
        &self,
        template: &TimeSeries<S>,
    ) -> Result<Generated<Ensemble>, BaselineError> {
        let structure = self.structure_for(template.feature())?;

        if template.is_empty() {
            trace!(feature = %template.feature(), "empty template");
            let metadata = template.metadata().clone().with_unit(structure.series.unit());
            return Ok(Generated::new(TimeSeries::empty(metadata), Vec::new()));
        }

        match (template.time_scale(), structure.series.time_scale()) {
            (Some(desired), Some(existing))
                if is_rescaling_required(Some(desired), Some(existing)) =>
            {
                self.with_upscaling(template, structure, desired, existing)
            }
            _ => self
                .without_upscaling(template, structure)
                .map(|series| Generated::new(series, Vec::new())),
        }
    }

    fn structure_for(&self, feature: &Feature) -> Result<&ClimatologyStructure, BaselineError> {
        self.sources
            .get(feature)
            .ok_or_else(|| BaselineError::UnknownFeature {
                feature: feature.to_string(),
                known: self.sources.keys().map(Feature::to_string).collect(),
            })
    }

    /// Admissible instants matching `time` in the other source years,
    /// ascending.
    fn candidates(
        &self,
        time: DateTime<Utc>,
        structure: &ClimatologyStructure,
    ) -> Vec<DateTime<Utc>> {
        structure
            .years()
            .filter(|year| *year != time.year())
            .filter_map(|year| with_year(time, year))
            .filter(|candidate| self.config.admits(*candidate))
            .collect()
    }

    fn without_upscaling<S>(
        &self,
        template: &TimeSeries<S>,
        structure: &ClimatologyStructure,
    ) -> Result<TimeSeries<Ensemble>, BaselineError> {
        let events = template
            .times()
            .map(|time| {
                let members = self
                    .candidates(time, structure)
                    .into_iter()
                    .filter_map(|c| structure.by_time.get(&c).map(|v| (c.year().to_string(), *v)));
                Event::new(time, Ensemble::from_pairs(members))
            })
            .collect();

        let metadata = template.metadata().clone().with_unit(structure.series.unit());
        Ok(TimeSeries::new(metadata, events)?)
    }

    fn with_upscaling<S>(
        &self,
        template: &TimeSeries<S>,
        structure: &ClimatologyStructure,
        desired: &TimeScale,
        existing: &TimeScale,
    ) -> Result<Generated<Ensemble>, BaselineError> {
        let upscaler = self.upscaler.as_ref().ok_or(BaselineError::MissingUpscaler {
            desired: *desired,
            existing: *existing,
        })?;

        let desired = match desired.function() {
            TimeScaleFunction::Unknown => {
                debug!(%desired, "template time scale function is UNKNOWN, rescaling with MEAN");
                desired.with_function(TimeScaleFunction::Mean)
            }
            _ => *desired,
        };

        let candidates: Vec<(DateTime<Utc>, Vec<DateTime<Utc>>)> = template
            .times()
            .map(|time| (time, self.candidates(time, structure)))
            .collect();
        let ends: BTreeSet<DateTime<Utc>> = candidates
            .iter()
            .flat_map(|(_, c)| c.iter().copied())
            .collect();

        // An empty set asks the upscaler for dense intervals, which no
        // ensemble would read.
        if ends.is_empty() {
            let events = candidates
                .into_iter()
                .map(|(time, _)| {
                    Event::new(time, Ensemble::from_pairs(Vec::<(String, f64)>::new()))
                })
                .collect();
            let metadata = template.metadata().clone().with_unit(self.config.unit());
            return Ok(Generated::new(TimeSeries::new(metadata, events)?, Vec::new()));
        }

        let rescaled = upscaler.upscale(&structure.series, &desired, &ends, self.config.unit())?;
        let warnings: Vec<BaselineWarning> = rescaled
            .warnings
            .into_iter()
            .inspect(|w| debug!(feature = %template.feature(), "{w}"))
            .map(BaselineWarning::Rescale)
            .collect();
        let upscaled = rescaled.series;

        // A candidate missing from the upscaled series could not be formed
        // and is left out; one present with a missing value is kept.
        let mut events = Vec::with_capacity(candidates.len());
        for (time, candidates) in candidates {
            let mut members = Vec::with_capacity(candidates.len());
            for c in candidates {
                if let Some(value) = upscaled_value(&upscaled, &desired, c)? {
                    members.push((c.year().to_string(), value));
                }
            }
            events.push(Event::new(time, Ensemble::from_pairs(members)));
        }

        let metadata = template.metadata().clone().with_unit(upscaled.unit());
        Ok(Generated::new(TimeSeries::new(metadata, events)?, warnings))
    }
}

/// The upscaled value covering `candidate`. Month-day values are stamped at
/// the end of their interval, so the candidate is matched to the interval
/// that contains it.
fn upscaled_value(
    upscaled: &TimeSeries<f64>,
    desired: &TimeScale,
    candidate: DateTime<Utc>,
) -> Result<Option<f64>, BaselineError> {
    if !desired.has_month_days() {
        return Ok(upscaled.get(candidate).map(|e| *e.value()));
    }
    let (lower, upper) = month_day_interval(
        candidate,
        desired.start_month_day(),
        desired.end_month_day(),
        desired.period(),
    )?;
    if candidate <= lower || candidate > upper {
        return Ok(None);
    }
    Ok(upscaled.get(upper).map(|e| *e.value()))
}

impl<S> BaselineGenerator<S, Ensemble> for ClimatologyGenerator {
    fn generate(&self, template: &TimeSeries<S>) -> Result<TimeSeries<Ensemble>, BaselineError> {
        ClimatologyGenerator::generate(self, template)
    }
}
