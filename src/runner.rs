//! Turns a validated scenario into a planning report.

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, ScenarioConfig};
use crate::error::EngineError;
use crate::io::{ProfileImportError, read_profile_csv};
use crate::planner::Planner;
use crate::sim::{PlanningReport, RunMode};

/// Anything that can stop a scenario run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{} invalid scenario field(s): {}", .0.len(), join_errors(.0))]
    Config(Vec<ConfigError>),
    #[error(transparent)]
    Import(#[from] ProfileImportError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> Self {
        Self::Config(vec![err])
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Loads demand, tariff and any custom generation profiles into a planner.
///
/// CSV profiles take precedence over the synthetic generators.
///
/// # Errors
///
/// Returns [`RunError`] if a selector is invalid, a CSV cannot be read or a
/// profile fails validation.
pub fn build_planner(config: &ScenarioConfig) -> Result<Planner, RunError> {
    let mut planner = Planner::new(config.simulation.seed);

    match &config.demand.profile_csv {
        Some(path) => {
            let profile = read_profile_csv(path, "demand")?;
            planner.set_demand_profile(profile.into_inner())?;
        }
        None => {
            planner.generate_load_profile(config.demand.annual_kwh, config.load_type()?)?;
        }
    }

    match &config.export.profile_csv {
        Some(path) => {
            let profile = read_profile_csv(path, "export_tariff")?;
            planner.set_export_tariff(profile.into_inner())?;
        }
        None => {
            planner.generate_export_tariff(config.export.base_price, config.tariff_profile()?)?;
        }
    }

    if let Some(path) = &config.generation.pv_profile_csv {
        planner.set_pv_profile(read_profile_csv(path, "pv_profile")?.into_inner())?;
    }
    if let Some(path) = &config.generation.wind_profile_csv {
        planner.set_wind_profile(read_profile_csv(path, "wind_profile")?.into_inner())?;
    }

    Ok(planner)
}

/// Validates the scenario and runs it in its configured mode.
///
/// # Errors
///
/// Returns [`RunError::Config`] with every validation failure, or the first
/// import or engine error encountered.
pub fn run_scenario(config: &ScenarioConfig) -> Result<PlanningReport, RunError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(RunError::Config(errors));
    }

    let planner = build_planner(config)?;
    let mode = config.mode()?;
    info!(%mode, seed = config.simulation.seed, "running scenario");

    let report = match mode {
        RunMode::Optimize => planner.optimize(
            config.objective()?,
            &config.bounds,
            &config.costs,
            &config.simulation.options(),
        )?,
        RunMode::Simulate => planner.simulate(&config.design, &config.costs)?,
    };
    Ok(report)
}
