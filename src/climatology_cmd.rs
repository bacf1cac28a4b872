//! Climatology command: build same-instant ensembles from other years.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use refcast_baseline::{ClimatologyGenerator, Generated};
use refcast_rescale::BasicUpscaler;
use refcast_series::{Ensemble, TimeSeries};
use tracing::{info, info_span, warn};

use crate::cli::ClimatologyArgs;
use crate::config::RefcastConfig;
use crate::{convert, json};

/// Run the climatology pipeline.
pub fn run(args: ClimatologyArgs) -> Result<()> {
    let _cmd = info_span!("climatology").entered();
    let config = RefcastConfig::load(args.config.as_deref())?;

    // 1. Read source and templates
    let source: Vec<TimeSeries<f64>> = json::read_series(&args.source, "source series")?;
    let templates: Vec<TimeSeries<Ensemble>> =
        json::read_series(&args.templates, "template series")?;
    let Some(fallback_unit) = source.first().map(|s| s.unit().to_string()) else {
        bail!("source file contains no series: {}", args.source.display());
    };

    // 2. Build the generator
    let climatology = convert::build_climatology_config(&config.climatology, &fallback_unit)?;
    let units = convert::build_unit_mapper(&config.rescale)?;
    let generator = ClimatologyGenerator::new(source, climatology)
        .context("failed to build climatology generator")?
        .with_upscaler(Arc::new(BasicUpscaler::with_units(units)));
    for w in generator.warnings() {
        warn!("{w}");
    }
    info!(
        features = generator.features().count(),
        source = %generator.source_metadata(),
        "climatology generator ready"
    );

    // 3. Generate in parallel, one ensemble series per template
    let generated: Vec<Generated<Ensemble>> = templates
        .par_iter()
        .map(|t| {
            generator
                .generate_with_warnings(t)
                .with_context(|| {
                    format!("failed to generate climatology for feature {}", t.feature())
                })
        })
        .collect::<Result<_>>()?;

    let mut baselines = Vec::with_capacity(generated.len());
    for g in generated {
        for w in &g.warnings {
            warn!(feature = %g.series.feature(), "{w}");
        }
        baselines.push(g.series);
    }
    info!(n = baselines.len(), "generated climatology baselines");

    // 4. Write
    json::write_output(&baselines, args.output.as_deref())
}
