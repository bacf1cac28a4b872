//! JSON reading and writing of series collections.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

/// Read a JSON array of series from `path`.
pub fn read_series<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    info!(path = %path.display(), "reading {what}");
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what}: {}", path.display()))?;
    let series: Vec<T> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {what}: {}", path.display()))?;
    info!(n = series.len(), "loaded {what}");
    Ok(series)
}

/// Write `value` as pretty JSON to `path`, or to stdout when no path is given.
pub fn write_output<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match path {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write output to stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use refcast_series::TimeSeries;

    #[test]
    fn series_survive_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.json");
        std::fs::write(
            &path,
            r#"[{
                "metadata": { "feature": { "name": "FAKE" }, "unit": "CMS" },
                "events": [{ "time": "1980-01-01T12:00:00Z", "value": 313.0 }]
            }]"#,
        )
        .unwrap();

        let series: Vec<TimeSeries<f64>> = read_series(&path, "source").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].unit(), "CMS");

        let out = dir.path().join("out.json");
        write_output(&series, Some(out.as_path())).unwrap();
        let back: Vec<TimeSeries<f64>> = read_series(&out, "output").unwrap();
        assert_eq!(back, series);
    }

    #[test]
    fn malformed_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_series::<TimeSeries<f64>>(&path, "templates").unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse templates"));
    }
}
