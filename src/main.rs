//! NYC Airbnb Analytics - batch entry point
//!
//! One-shot run over the fixed input file: load, clean, chart, map, report,
//! export. No arguments, no flags.

use anyhow::Result;
use tracing::info;

use airbnb_analytics::charts::ChartRenderer;
use airbnb_analytics::config::RunConfig;
use airbnb_analytics::data::{write_cleaned_csv, ListingCleaner, ListingLoader};
use airbnb_analytics::map::HostMapBuilder;
use airbnb_analytics::report::ReportWriter;
use airbnb_analytics::stats::PriceSummary;

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    info!("NYC Airbnb Analytics");

    let config = RunConfig::default();

    let raw = ListingLoader::load(&config.input_path)?;
    let cleaned = ListingCleaner::clean(raw, &config.cleaning)?;

    ChartRenderer::render_all(&cleaned, &config.style, &config.charts)?;

    if config.cleaning.host_features {
        HostMapBuilder::write(&cleaned, &config.map_path)?;
    } else {
        info!("Host features disabled; skipping the host map");
    }

    let summary = PriceSummary::compute(&cleaned)?;
    ReportWriter::write(&summary, &config.report_path)?;

    write_cleaned_csv(&cleaned, &config.cleaned_csv_path)?;

    info!("All outputs generated:");
    info!("  - {}", config.cleaned_csv_path.display());
    info!("  - 5 PNG plots");
    info!("  - {}", config.map_path.display());
    info!("  - {}", config.report_path.display());

    Ok(())
}
