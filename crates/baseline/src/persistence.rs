//! Persistence baselines: the value observed `order` steps before the
//! anchor, repeated forward.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use refcast_calendar::lagged_year_interval;
use refcast_rescale::{Upscaler, is_rescaling_required};
use refcast_series::{Event, Feature, TimeScale, TimeSeries, TimeSeriesMetadata};
use tracing::{debug, trace};

use crate::config::PersistenceConfig;
use crate::consolidate::consolidate_by_feature;
use crate::error::BaselineError;
use crate::generator::{BaselineGenerator, BaselineWarning, Generated};
use crate::search::nth_nearest_earlier;

const GENERATOR: &str = "persistence";

type Admissible<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Desired and existing time scales when a template needs rescaling.
type Rescale = Option<(TimeScale, TimeScale)>;

/// Generates persistence series from observation-like source data.
///
/// A template with a reference time is anchored on its first reference
/// time and receives one value at every valid time. A template without
/// reference times is anchored on each valid time separately.
pub struct PersistenceGenerator<T> {
    order: u32,
    sources: BTreeMap<Feature, TimeSeries<T>>,
    source_metadata: TimeSeriesMetadata,
    unit: String,
    upscaler: Option<Arc<dyn Upscaler<T>>>,
    admissible: Admissible<T>,
    warnings: Vec<BaselineWarning>,
}

impl<T> fmt::Debug for PersistenceGenerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceGenerator")
            .field("order", &self.order)
            .field("features", &self.sources.keys().collect::<Vec<_>>())
            .field("unit", &self.unit)
            .field("upscaler", &self.upscaler.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> PersistenceGenerator<T> {
    /// Builds a generator from the complete source.
    ///
    /// Series with fewer events than the order are discarded before the
    /// remainder is consolidated per feature.
    ///
    /// # Errors
    ///
    /// - [`BaselineError::InvalidOrder`] for a negative order.
    /// - [`BaselineError::EmptySource`] if there are no series or no events.
    /// - [`BaselineError::ForecastLikeSource`] if any series has a `T0`
    ///   reference time.
    /// - [`BaselineError::InsufficientHistory`] if no series is long enough.
    #[tracing::instrument(skip_all, fields(order = config.order(), unit = config.unit()))]
    pub fn new(
        source: impl IntoIterator<Item = TimeSeries<T>>,
        config: PersistenceConfig,
    ) -> Result<Self, BaselineError> {
        let order = u32::try_from(config.order()).map_err(|_| BaselineError::InvalidOrder {
            order: config.order(),
        })?;

        let source: Vec<TimeSeries<T>> = source.into_iter().collect();
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

        let required = order as usize;
        let (sources, warnings) =
            consolidate_by_feature(source.into_iter().filter(|s| s.len() >= required), GENERATOR);

        let source_metadata = sources
            .values()
            .next()
            .map(|s| s.metadata().clone())
            .ok_or(BaselineError::InsufficientHistory { order: required })?;

        debug!(n_features = sources.len(), "created persistence generator");

        Ok(Self {
            order,
            sources,
            source_metadata,
            unit: config.unit().to_string(),
            upscaler: None,
            admissible: Arc::new(|_: &T| true),
            warnings,
        })
    }

    /// Supplies the upscaler used when a template's time scale differs from
    /// the source's.
    pub fn with_upscaler(mut self, upscaler: Arc<dyn Upscaler<T>>) -> Self {
        self.upscaler = Some(upscaler);
        self
    }

    /// Restricts which values may be persisted.
    pub fn with_admissible(
        mut self,
        admissible: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.admissible = Arc::new(admissible);
        self
    }

    pub fn order(&self) -> u32 {
        self.order
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

    /// Generates the persistence series for `template`.
    ///
    /// A value that cannot be found, or that is not admissible, yields an
    /// empty series when anchored on a reference time and a skipped valid
    /// time otherwise.
    ///
    /// # Errors
    ///
    /// - [`BaselineError::UnknownFeature`] if no source matches the template.
    /// - [`BaselineError::MissingUpscaler`] if rescaling is needed and no
    ///   upscaler was supplied.
    /// - [`BaselineError::Rescale`] if the upscaler rejects the request.
    pub fn generate(&self, template: &TimeSeries<T>) -> Result<TimeSeries<T>, BaselineError> {
        self.generate_with_warnings(template).map(|g| g.series)
    }

    /// As [`generate`](Self::generate), also returning rescaling warnings.
    pub fn generate_with_warnings(
        &self,
        template: &TimeSeries<T>,
    ) -> Result<Generated<T>, BaselineError> {
        if template.is_empty() {
            trace!(feature = %template.feature(), "empty template, returning it unchanged");
            return Ok(Generated::new(template.clone(), Vec::new()));
        }

        let source = self.source_for(template.feature())?;
        let rescale = match (template.time_scale(), source.time_scale()) {
            (Some(desired), Some(existing))
                if is_rescaling_required(Some(desired), Some(existing)) =>
            {
                Some((*desired, *existing))
            }
            _ => None,
        };

        match template.metadata().first_reference_time() {
            Some((kind, reference)) => {
                trace!(?kind, %reference, "anchoring on the first reference time");
                self.for_reference_time(template, source, reference, rescale)
            }
            None => {
                trace!("no reference times, anchoring on each valid time");
                self.for_each_valid_time(template, source, rescale)
            }
        }
    }

    fn source_for(&self, feature: &Feature) -> Result<&TimeSeries<T>, BaselineError> {
        self.sources
            .get(feature)
            .ok_or_else(|| BaselineError::UnknownFeature {
                feature: feature.to_string(),
                known: self.sources.keys().map(Feature::to_string).collect(),
            })
    }

    fn for_reference_time(
        &self,
        template: &TimeSeries<T>,
        source: &TimeSeries<T>,
        reference: DateTime<Utc>,
        rescale: Rescale,
    ) -> Result<Generated<T>, BaselineError> {
        let mut warnings = Vec::new();

        let (value, unit) = match rescale {
            None => {
                let events = source.events();
                let value = nth_nearest_earlier(events, reference, self.order as usize)
                    .map(|i| events[i].value().clone());
                (value, source.unit().to_string())
            }
            Some((desired, existing)) if desired.has_month_days() => {
                let dense = BTreeSet::new();
                let upscaled = self.upscale(source, &desired, &existing, &dense, &mut warnings)?;
                let interval = lagged_year_interval(reference, self.order)?;
                let value = first_within(upscaled.events(), interval).cloned();
                (value, upscaled.unit().to_string())
            }
            Some((desired, existing)) => {
                match nth_nearest_earlier(source.events(), reference, self.order as usize) {
                    Some(i) => {
                        let ends = BTreeSet::from([source.events()[i].time()]);
                        let upscaled =
                            self.upscale(source, &desired, &existing, &ends, &mut warnings)?;
                        let value = upscaled.first().map(|e| e.value().clone());
                        (value, upscaled.unit().to_string())
                    }
                    None => (None, source.unit().to_string()),
                }
            }
        };

        let metadata = template.metadata().clone().with_unit(unit);
        let series = match value {
            Some(value) if (self.admissible)(&value) => {
                let events = template.times().map(|t| Event::new(t, value.clone())).collect();
                TimeSeries::new(metadata, events)?
            }
            Some(_) => {
                trace!(
                    %reference,
                    "persistence value is not admissible, returning an empty series"
                );
                TimeSeries::empty(metadata)
            }
            None => {
                trace!(
                    %reference,
                    n_source = source.len(),
                    "no persistence value found, returning an empty series"
                );
                TimeSeries::empty(metadata)
            }
        };

        Ok(Generated::new(series, warnings))
    }

    fn for_each_valid_time(
        &self,
        template: &TimeSeries<T>,
        source: &TimeSeries<T>,
        rescale: Rescale,
    ) -> Result<Generated<T>, BaselineError> {
        let mut warnings = Vec::new();
        let order = self.order as usize;

        let (found, unit): (Vec<(DateTime<Utc>, T)>, String) = match rescale {
            None => (lagged_values(source.events(), template, order), source.unit().to_string()),
            Some((desired, existing)) if desired.has_month_days() => {
                let dense = BTreeSet::new();
                let upscaled = self.upscale(source, &desired, &existing, &dense, &mut warnings)?;
                let mut found = Vec::with_capacity(template.len());
                for time in template.times() {
                    let interval = lagged_year_interval(time, self.order)?;
                    if let Some(value) = first_within(upscaled.events(), interval) {
                        found.push((time, value.clone()));
                    }
                }
                (found, upscaled.unit().to_string())
            }
            Some((desired, existing)) => {
                // Values are only formed at the template's own valid times, so
                // the first valid time has no earlier upscaled value to use.
                let ends: BTreeSet<DateTime<Utc>> = template.times().collect();
                let upscaled = self.upscale(source, &desired, &existing, &ends, &mut warnings)?;
                (lagged_values(upscaled.events(), template, order), upscaled.unit().to_string())
            }
        };

        let events = found
            .into_iter()
            .filter(|(time, value)| {
                let admissible = (self.admissible)(value);
                if !admissible {
                    trace!(%time, "persistence value is not admissible, skipping");
                }
                admissible
            })
            .map(|(time, value)| Event::new(time, value))
            .collect();

        let metadata = template.metadata().clone().with_unit(unit);
        Ok(Generated::new(TimeSeries::new(metadata, events)?, warnings))
    }

    fn upscale(
        &self,
        source: &TimeSeries<T>,
        desired: &TimeScale,
        existing: &TimeScale,
        ends: &BTreeSet<DateTime<Utc>>,
        warnings: &mut Vec<BaselineWarning>,
    ) -> Result<TimeSeries<T>, BaselineError> {
        let upscaler = self.upscaler.as_ref().ok_or(BaselineError::MissingUpscaler {
            desired: *desired,
            existing: *existing,
        })?;

        let rescaled = upscaler.upscale(source, desired, ends, &self.unit)?;
        for warning in rescaled.warnings {
            debug!(feature = %source.feature(), "{warning}");
            warnings.push(BaselineWarning::Rescale(warning));
        }
        Ok(rescaled.series)
    }
}

impl<T: Clone + 'static> BaselineGenerator<T, T> for PersistenceGenerator<T> {
    fn generate(&self, template: &TimeSeries<T>) -> Result<TimeSeries<T>, BaselineError> {
        PersistenceGenerator::generate(self, template)
    }
}

/// Pairs each template valid time with the value `order` steps earlier in
/// `events`, dropping valid times without one.
fn lagged_values<S, T: Clone>(
    events: &[Event<T>],
    template: &TimeSeries<S>,
    order: usize,
) -> Vec<(DateTime<Utc>, T)> {
    template
        .times()
        .filter_map(|time| {
            let found = nth_nearest_earlier(events, time, order);
            if found.is_none() {
                trace!(%time, "no persistence value found, skipping");
            }
            found.map(|i| (time, events[i].value().clone()))
        })
        .collect()
}

/// First value whose time lies in the closed interval.
fn first_within<T>(
    events: &[Event<T>],
    (lower, upper): (DateTime<Utc>, DateTime<Utc>),
) -> Option<&T> {
    let start = events.partition_point(|e| e.time() < lower);
    events.get(start).filter(|e| e.time() <= upper).map(Event::value)
}
