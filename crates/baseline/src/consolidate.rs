//! Merging of raw source series per feature.

use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map::Entry;

use chrono::{DateTime, Utc};
use refcast_series::{Feature, TimeSeries};
use tracing::warn;

use crate::generator::BaselineWarning;

/// One duplicate-free series built from several raw series.
#[derive(Debug, Clone, PartialEq)]
pub struct Consolidated<T> {
    pub series: TimeSeries<T>,
    /// Valid times that appeared more than once across the inputs.
    pub duplicates: BTreeSet<DateTime<Utc>>,
}

impl<T> Consolidated<T> {
    /// Describes the discarded duplicates, if there were any.
    pub fn warning(&self) -> Option<BaselineWarning> {
        let first = *self.duplicates.first()?;
        Some(BaselineWarning::DuplicateEvents {
            feature: self.series.feature().clone(),
            count: self.duplicates.len(),
            first,
            metadata: self.series.metadata().clone(),
        })
    }
}

/// Merges `series` into one, keeping the first value seen at each valid
/// time. The metadata comes from the last input.
///
/// Returns `None` only when there is no input series at all.
pub fn consolidate<T>(series: impl IntoIterator<Item = TimeSeries<T>>) -> Option<Consolidated<T>> {
    let mut metadata = None;
    let mut values = BTreeMap::new();
    let mut duplicates = BTreeSet::new();

    for next in series {
        let (next_metadata, events) = next.into_parts();
        metadata = Some(next_metadata);
        for event in events {
            match values.entry(event.time()) {
                Entry::Vacant(slot) => {
                    slot.insert(event.into_value());
                }
                Entry::Occupied(_) => {
                    duplicates.insert(event.time());
                }
            }
        }
    }

    Some(Consolidated {
        series: TimeSeries::from_map(metadata?, values),
        duplicates,
    })
}

/// Groups `series` by feature and consolidates each group.
///
/// Duplicate findings are logged and returned alongside the merged series.
pub(crate) fn consolidate_by_feature<T>(
    series: impl IntoIterator<Item = TimeSeries<T>>,
    generator: &'static str,
) -> (BTreeMap<Feature, TimeSeries<T>>, Vec<BaselineWarning>) {
    let mut grouped: BTreeMap<Feature, Vec<TimeSeries<T>>> = BTreeMap::new();
    for next in series {
        grouped.entry(next.feature().clone()).or_default().push(next);
    }

    let mut merged = BTreeMap::new();
    let mut warnings = Vec::new();
    for (feature, group) in grouped {
        let Some(consolidated) = consolidate(group) else {
            continue;
        };
        if let Some(warning) = consolidated.warning() {
            warn!(
                generator,
                feature = %feature,
                duplicates = consolidated.duplicates.len(),
                "{warning}"
            );
            warnings.push(warning);
        }
        merged.insert(feature, consolidated.series);
    }
    (merged, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use refcast_series::{Event, TimeSeriesMetadata};

    fn utc(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1980, 1, 1, h, 0, 0).unwrap()
    }

    fn series(feature: &str, unit: &str, events: &[(u32, f64)]) -> TimeSeries<f64> {
        let metadata = TimeSeriesMetadata::new(Feature::new(feature), unit);
        let events = events.iter().map(|(h, v)| Event::new(utc(*h), *v)).collect();
        TimeSeries::new(metadata, events).unwrap()
    }

    #[test]
    fn first_value_wins_and_duplicates_are_recorded() {
        let merged = consolidate([
            series("FAKE", "CMS", &[(0, 1.0), (1, 2.0)]),
            series("FAKE", "CMS", &[(1, 99.0), (2, 3.0)]),
        ])
        .unwrap();

        let values: Vec<_> = merged.series.events().iter().map(|e| *e.value()).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        assert_eq!(merged.duplicates, BTreeSet::from([utc(1)]));
    }

    #[test]
    fn metadata_comes_from_last_series() {
        let merged = consolidate([
            series("FAKE", "CFS", &[(0, 1.0)]),
            series("FAKE", "CMS", &[(1, 2.0)]),
        ])
        .unwrap();
        assert_eq!(merged.series.unit(), "CMS");
    }

    #[test]
    fn no_duplicates_no_warning() {
        let merged = consolidate([series("FAKE", "CMS", &[(0, 1.0)])]).unwrap();
        assert!(merged.warning().is_none());
    }

    #[test]
    fn consolidated_series_is_returned_unchanged() {
        let original = series("FAKE", "CMS", &[(0, 1.0), (1, 2.0), (4, 3.0)]);

        let merged = consolidate([original.clone()]).unwrap();

        assert_eq!(merged.series, original);
        assert!(merged.duplicates.is_empty());
        assert!(merged.warning().is_none());
    }

    #[test]
    fn duplicate_warning_describes_the_first_duplicate() {
        let merged = consolidate([
            series("FAKE", "CMS", &[(3, 1.0), (5, 1.0)]),
            series("FAKE", "CMS", &[(3, 2.0), (5, 2.0)]),
        ])
        .unwrap();
        match merged.warning() {
            Some(BaselineWarning::DuplicateEvents {
                feature,
                count,
                first,
                ..
            }) => {
                assert_eq!(feature, Feature::new("FAKE"));
                assert_eq!(count, 2);
                assert_eq!(first, utc(3));
            }
            other => panic!("expected a duplicate warning, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_has_nothing_to_consolidate() {
        assert!(consolidate(Vec::<TimeSeries<f64>>::new()).is_none());
    }

    #[test]
    fn groups_by_feature() {
        let (merged, warnings) = consolidate_by_feature(
            [
                series("A", "CMS", &[(0, 1.0)]),
                series("B", "CMS", &[(0, 2.0)]),
                series("A", "CMS", &[(1, 3.0)]),
            ],
            "climatology",
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[&Feature::new("A")].len(), 2);
        assert!(warnings.is_empty());
    }
}
