//! Hybrid sizer entry point: CLI wiring and scenario-driven runs.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hybrid_sizer::cli::CliOptions;
use hybrid_sizer::config::ScenarioConfig;
use hybrid_sizer::io::export::{export_cash_flow_csv, export_daily_csv};
use hybrid_sizer::runner::run_scenario;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = CliOptions::parse();

    // --scenario takes priority, otherwise a preset (residential by default)
    let mut scenario = match &cli.scenario {
        Some(path) => ScenarioConfig::from_toml_file(path)?,
        None => ScenarioConfig::from_preset(cli.preset_name())?,
    };
    cli.apply_overrides(&mut scenario);

    let report = run_scenario(&scenario)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if let Some(path) = &cli.cash_flow_out {
        export_cash_flow_csv(&report.cash_flows, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "cash flows written");
    }
    if let Some(path) = &cli.daily_out {
        export_daily_csv(&report.daily_profiles, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "daily profiles written");
    }

    Ok(())
}
