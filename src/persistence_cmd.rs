//! Persistence command: persist observed values into forecast templates.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use refcast_baseline::{Generated, PersistenceGenerator};
use refcast_rescale::BasicUpscaler;
use refcast_series::TimeSeries;
use tracing::{info, info_span, warn};

use crate::cli::PersistenceArgs;
use crate::config::RefcastConfig;
use crate::{convert, json};

/// Run the persistence pipeline.
pub fn run(args: PersistenceArgs) -> Result<()> {
    let _cmd = info_span!("persistence").entered();
    let config = RefcastConfig::load(args.config.as_deref())?;

    // 1. Read source and templates
    let source: Vec<TimeSeries<f64>> = json::read_series(&args.source, "source series")?;
    let templates: Vec<TimeSeries<f64>> = json::read_series(&args.templates, "template series")?;
    let Some(fallback_unit) = source.first().map(|s| s.unit().to_string()) else {
        bail!("source file contains no series: {}", args.source.display());
    };

    // 2. Build the generator
    let persistence =
        convert::build_persistence_config(&config.persistence, args.order, &fallback_unit);
    let units = convert::build_unit_mapper(&config.rescale)?;
    let mut generator = PersistenceGenerator::new(source, persistence)
        .context("failed to build persistence generator")?
        .with_upscaler(Arc::new(BasicUpscaler::with_units(units)));
    if config.persistence.finite_only {
        generator = generator.with_admissible(|v: &f64| v.is_finite());
    }
    for w in generator.warnings() {
        warn!("{w}");
    }
    info!(
        order = generator.order(),
        features = generator.features().count(),
        source = %generator.source_metadata(),
        "persistence generator ready"
    );

    // 3. Generate in parallel, one baseline per template
    let generated: Vec<Generated<f64>> = templates
        .par_iter()
        .map(|t| {
            generator
                .generate_with_warnings(t)
                .with_context(|| {
                    format!("failed to generate persistence for feature {}", t.feature())
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
    info!(n = baselines.len(), "generated persistence baselines");

    // 4. Write
    json::write_output(&baselines, args.output.as_deref())
}
