//! Command-line arguments for the `hybrid-sizer` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ScenarioConfig;
use crate::sim::{Objective, RunMode};

/// Preset used when neither `--scenario` nor `--preset` is given.
pub const DEFAULT_PRESET: &str = "residential";

/// Size a hybrid PV + wind + battery system against an hourly demand profile.
#[derive(Debug, Parser)]
#[command(name = "hybrid-sizer", version, about)]
pub struct CliOptions {
    /// Load the scenario from a TOML file
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,
    /// Use a built-in preset (residential, commercial, mixed_dynamic)
    #[arg(long)]
    pub preset: Option<String>,
    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,
    /// Override the run mode (optimize, simulate)
    #[arg(long)]
    pub mode: Option<RunMode>,
    /// Override the optimization objective (self_consumption, npv)
    #[arg(long)]
    pub objective: Option<Objective>,
    /// Override the number of grid intervals per dimension
    #[arg(long)]
    pub step_count: Option<usize>,
    /// Evaluate candidates on a single thread
    #[arg(long)]
    pub sequential: bool,
    /// Write the cash-flow table to this CSV file
    #[arg(long)]
    pub cash_flow_out: Option<PathBuf>,
    /// Write the summer and winter sample days to this CSV file
    #[arg(long)]
    pub daily_out: Option<PathBuf>,
    /// Print the full report as JSON instead of the text summary
    #[arg(long)]
    pub json: bool,
}

impl CliOptions {
    /// Preset to load when no scenario file was given.
    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or(DEFAULT_PRESET)
    }

    /// Applies command-line overrides on top of a loaded scenario.
    pub fn apply_overrides(&self, scenario: &mut ScenarioConfig) {
        let sim = &mut scenario.simulation;
        if let Some(seed) = self.seed {
            sim.seed = seed;
        }
        if let Some(mode) = self.mode {
            sim.mode = mode.to_string();
        }
        if let Some(objective) = self.objective {
            sim.objective = objective.to_string();
        }
        if let Some(step_count) = self.step_count {
            sim.step_count = step_count;
        }
        if self.sequential {
            sim.parallel = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions, clap::Error> {
        CliOptions::try_parse_from(std::iter::once("hybrid-sizer").chain(args.iter().copied()))
    }

    #[test]
    fn supports_scenario_cli() {
        let opts = parse(&["--scenario", "scenario.toml"]).unwrap();
        assert_eq!(
            opts.scenario.as_deref().and_then(|p| p.to_str()),
            Some("scenario.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn defaults_to_residential_preset() {
        let opts = parse(&[]).unwrap();
        assert_eq!(opts.preset_name(), "residential");
    }

    #[test]
    fn scenario_and_preset_are_exclusive() {
        assert!(parse(&["--scenario", "a.toml", "--preset", "commercial"]).is_err());
    }

    #[test]
    fn overrides_apply() {
        let opts = parse(&[
            "--seed",
            "9",
            "--mode",
            "simulate",
            "--objective",
            "self-consumption",
            "--step-count",
            "3",
            "--sequential",
        ])
        .unwrap();
        let mut cfg = ScenarioConfig::commercial();
        opts.apply_overrides(&mut cfg);
        assert_eq!(cfg.simulation.seed, 9);
        assert_eq!(cfg.simulation.mode, "simulate");
        assert_eq!(cfg.simulation.objective, "self_consumption");
        assert_eq!(cfg.simulation.step_count, 3);
        assert!(!cfg.simulation.parallel);
    }

    #[test]
    fn unknown_objective_rejected() {
        assert!(parse(&["--objective", "roi"]).is_err());
    }
}
