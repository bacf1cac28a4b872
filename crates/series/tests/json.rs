use chrono::{TimeDelta, TimeZone, Utc};
use refcast_series::{
    Ensemble, Event, Feature, MISSING_DOUBLE, MonthDay, ReferenceTimeType, TimeScale,
    TimeScaleFunction, TimeSeries, TimeSeriesMetadata,
};

#[test]
fn observation_series_reads_from_json() {
    let json = r#"{
        "metadata": {
            "feature": { "name": "FAKE2" },
            "unit": "CMS",
            "variable": "STREAMFLOW",
            "time_scale": { "period_ms": 3600000, "function": "MEAN" },
            "reference_times": { "UNKNOWN": "2551-03-17T00:00:00Z" }
        },
        "events": [
            { "time": "2551-03-17T01:00:00Z", "value": 317.0 },
            { "time": "2551-03-17T00:00:00Z", "value": 313.0 }
        ]
    }"#;

    let series: TimeSeries<f64> = serde_json::from_str(json).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(
        series.first().map(Event::time),
        Some(Utc.with_ymd_and_hms(2551, 3, 17, 0, 0, 0).unwrap())
    );
    assert_eq!(
        series.time_scale(),
        Some(&TimeScale::new(TimeDelta::hours(1), TimeScaleFunction::Mean).unwrap())
    );
    assert!(!series.metadata().is_forecast_like());
    assert_eq!(
        series.metadata().first_reference_time().map(|(k, _)| k),
        Some(ReferenceTimeType::Unknown)
    );
}

#[test]
fn duplicate_times_are_rejected_when_reading() {
    let json = r#"{
        "metadata": { "feature": { "name": "FAKE" }, "unit": "CMS" },
        "events": [
            { "time": "1980-01-01T12:00:00Z", "value": 1.0 },
            { "time": "1980-01-01T12:00:00Z", "value": 2.0 }
        ]
    }"#;

    let err = serde_json::from_str::<TimeSeries<f64>>(json).unwrap_err();
    assert!(err.to_string().contains("duplicate event time"));
}

#[test]
fn month_day_scale_reads_from_json() {
    let json = r#"{
        "function": "MEAN",
        "start_month_day": "--04-01",
        "end_month_day": "--04-02"
    }"#;
    let scale: TimeScale = serde_json::from_str(json).unwrap();
    assert_eq!(scale.start_month_day(), MonthDay::new(4, 1).ok());
    assert!(scale.has_month_days());
}

#[test]
fn ensemble_series_writes_labels() {
    let metadata = TimeSeriesMetadata::new(Feature::new("FAKE"), "CMS");
    let time = Utc.with_ymd_and_hms(1983, 1, 1, 12, 0, 0).unwrap();
    let series = TimeSeries::new(
        metadata,
        vec![Event::new(
            time,
            Ensemble::from_pairs([("1980", 313.0), ("1981", 347.0)]),
        )],
    )
    .unwrap();

    let json = serde_json::to_value(&series).unwrap();
    assert_eq!(json["events"][0]["value"]["labels"][1], "1981");
    assert_eq!(json["events"][0]["value"]["members"][0], 313.0);
}

#[test]
fn mismatched_ensemble_is_rejected_when_reading() {
    let json = r#"{ "members": [1.0, 2.0], "labels": ["1980"] }"#;
    assert!(serde_json::from_str::<Ensemble>(json).is_err());
}

#[test]
fn missing_members_survive_a_round_trip() {
    let metadata = TimeSeriesMetadata::new(Feature::new("FAKE"), "CMS");
    let time = Utc.with_ymd_and_hms(1983, 1, 1, 12, 0, 0).unwrap();
    let series = TimeSeries::new(
        metadata,
        vec![Event::new(
            time,
            Ensemble::from_pairs([("1980", MISSING_DOUBLE), ("1981", 2.0)]),
        )],
    )
    .unwrap();

    let json = serde_json::to_string(&vec![series]).unwrap();
    assert!(json.contains(r#""members":[null,2.0]"#));

    let back: Vec<TimeSeries<Ensemble>> = serde_json::from_str(&json).unwrap();
    let ensemble = back[0].events()[0].value();
    assert_eq!(ensemble.labels(), &["1980".to_string(), "1981".to_string()]);
    assert!(ensemble.members()[0].is_nan());
    assert_eq!(ensemble.members()[1], 2.0);
}

#[test]
fn null_value_reads_as_missing() {
    let json = r#"{
        "metadata": { "feature": { "name": "FAKE" }, "unit": "CMS" },
        "events": [
            { "time": "1980-01-01T12:00:00Z", "value": null },
            { "time": "1980-01-01T18:00:00Z", "value": 317.0 }
        ]
    }"#;

    let series: TimeSeries<f64> = serde_json::from_str(json).unwrap();
    assert!(series.events()[0].value().is_nan());
    assert_eq!(*series.events()[1].value(), 317.0);

    let written = serde_json::to_value(&series).unwrap();
    assert!(written["events"][0]["value"].is_null());
}
