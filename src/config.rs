//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::{EngineError, ensure_non_negative, parse_selector};
use crate::profiles::{LoadType, TariffProfile};
use crate::sim::{
    CostParameters, Objective, OptimizerOptions, RunMode, SizingBounds, SystemSizing,
};

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the `residential` preset. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or pick a built-in preset
/// with [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run mode, objective and search settings.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Demand profile source.
    #[serde(default)]
    pub demand: DemandConfig,
    /// Optional custom generation profiles.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Export tariff source.
    #[serde(default)]
    pub export: ExportConfig,
    /// Capital, O&M and energy prices.
    #[serde(default)]
    pub costs: CostParameters,
    /// Search-space limits for optimize runs.
    #[serde(default)]
    pub bounds: SizingBounds,
    /// Fixed design for simulate runs.
    #[serde(default)]
    pub design: SystemSizing,
}

/// Run mode, objective and search settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed.
    pub seed: u64,
    /// `"optimize"` or `"simulate"`.
    pub mode: String,
    /// `"self_consumption"` or `"npv"`.
    pub objective: String,
    /// Intervals per sizing dimension (must be > 0).
    pub step_count: usize,
    /// Evaluate candidates in parallel.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let options = OptimizerOptions::default();
        Self {
            seed: 42,
            mode: RunMode::Optimize.to_string(),
            objective: Objective::SelfConsumption.to_string(),
            step_count: options.step_count,
            parallel: options.parallel,
        }
    }
}

impl SimulationConfig {
    pub fn options(&self) -> OptimizerOptions {
        OptimizerOptions {
            step_count: self.step_count,
            parallel: self.parallel,
        }
    }
}

/// Demand profile source: synthetic unless `profile_csv` is set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Annual consumption (kWh).
    pub annual_kwh: f64,
    /// `"residential"`, `"commercial"` or `"mixed"`.
    pub load_type: String,
    /// Hourly demand CSV replacing the synthetic profile.
    pub profile_csv: Option<PathBuf>,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            annual_kwh: 4000.0,
            load_type: LoadType::Residential.to_string(),
            profile_csv: None,
        }
    }
}

/// Custom generation profiles. Synthetic models are used when absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Normalized PV output per kWp.
    pub pv_profile_csv: Option<PathBuf>,
    /// Wind output shape, rescaled to the turbine rating.
    pub wind_profile_csv: Option<PathBuf>,
}

/// Export tariff source: synthetic unless `profile_csv` is set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Base sell-back price (per kWh).
    pub base_price: f64,
    /// `"flat"`, `"time_of_day"`, `"seasonal"` or `"dynamic"`.
    pub profile_type: String,
    /// Hourly tariff CSV replacing the synthetic profile.
    pub profile_csv: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_price: 0.08,
            profile_type: TariffProfile::Flat.to_string(),
            profile_csv: None,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.step_count"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<EngineError> for ConfigError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation { field, message } => Self { field, message },
            other => Self::new("engine", other.to_string()),
        }
    }
}

impl ScenarioConfig {
    /// A 4 MWh household with a flat feed-in tariff, maximizing self-consumption.
    pub fn residential() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            demand: DemandConfig::default(),
            generation: GenerationConfig::default(),
            export: ExportConfig::default(),
            costs: CostParameters::default(),
            bounds: SizingBounds {
                max_pv_kwp: 10.0,
                max_wind_kw: 5.0,
                max_battery_kwh: 15.0,
            },
            design: SystemSizing {
                pv_kwp: 5.0,
                wind_kw: 0.0,
                battery_kwh: 10.0,
            },
        }
    }

    /// A 25 MWh office with a time-of-day tariff, maximizing NPV.
    pub fn commercial() -> Self {
        Self {
            simulation: SimulationConfig {
                objective: Objective::Npv.to_string(),
                ..SimulationConfig::default()
            },
            demand: DemandConfig {
                annual_kwh: 25_000.0,
                load_type: LoadType::Commercial.to_string(),
                ..DemandConfig::default()
            },
            generation: GenerationConfig::default(),
            export: ExportConfig {
                base_price: 0.07,
                profile_type: TariffProfile::TimeOfDay.to_string(),
                ..ExportConfig::default()
            },
            costs: CostParameters {
                pv_cost_per_kwp: 850.0,
                wind_cost_per_kw: 1400.0,
                battery_cost_per_kwh: 450.0,
                electricity_price_per_kwh: 0.25,
                ..CostParameters::default()
            },
            bounds: SizingBounds {
                max_pv_kwp: 50.0,
                max_wind_kw: 20.0,
                max_battery_kwh: 60.0,
            },
            design: SystemSizing {
                pv_kwp: 30.0,
                wind_kw: 10.0,
                battery_kwh: 20.0,
            },
        }
    }

    /// A mixed-use site on a dynamic tariff with cheap wind, maximizing NPV.
    pub fn mixed_dynamic() -> Self {
        Self {
            simulation: SimulationConfig {
                objective: Objective::Npv.to_string(),
                ..SimulationConfig::default()
            },
            demand: DemandConfig {
                annual_kwh: 12_000.0,
                load_type: LoadType::Mixed.to_string(),
                ..DemandConfig::default()
            },
            generation: GenerationConfig::default(),
            export: ExportConfig {
                base_price: 0.09,
                profile_type: TariffProfile::Dynamic.to_string(),
                ..ExportConfig::default()
            },
            costs: CostParameters {
                wind_cost_per_kw: 1100.0,
                wind_om_per_kw_year: 30.0,
                electricity_price_per_kwh: 0.32,
                discount_rate: 0.04,
                ..CostParameters::default()
            },
            bounds: SizingBounds {
                max_pv_kwp: 20.0,
                max_wind_kw: 10.0,
                max_battery_kwh: 30.0,
            },
            design: SystemSizing {
                pv_kwp: 10.0,
                wind_kw: 5.0,
                battery_kwh: 15.0,
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["residential", "commercial", "mixed_dynamic"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "residential" => Ok(Self::residential()),
            "commercial" => Ok(Self::commercial()),
            "mixed_dynamic" => Ok(Self::mixed_dynamic()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// Relative CSV paths inside the file are resolved against the file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        Ok(config)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    fn resolve_paths(&mut self, dir: &Path) {
        let paths = [
            &mut self.demand.profile_csv,
            &mut self.generation.pv_profile_csv,
            &mut self.generation.wind_profile_csv,
            &mut self.export.profile_csv,
        ];
        for path in paths.into_iter().flatten() {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    /// Parsed run mode.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the accepted values.
    pub fn mode(&self) -> Result<RunMode, ConfigError> {
        Ok(parse_selector("simulation.mode", &self.simulation.mode)?)
    }

    /// Parsed optimization objective.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the accepted values.
    pub fn objective(&self) -> Result<Objective, ConfigError> {
        Ok(parse_selector("simulation.objective", &self.simulation.objective)?)
    }

    /// Parsed demand shape.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the accepted values.
    pub fn load_type(&self) -> Result<LoadType, ConfigError> {
        Ok(parse_selector("demand.load_type", &self.demand.load_type)?)
    }

    /// Parsed export tariff shape.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the accepted values.
    pub fn tariff_profile(&self) -> Result<TariffProfile, ConfigError> {
        Ok(parse_selector("export.profile_type", &self.export.profile_type)?)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let selectors = [
            self.mode().err(),
            self.objective().err(),
            self.load_type().err(),
            self.tariff_profile().err(),
        ];
        errors.extend(selectors.into_iter().flatten());

        if self.simulation.step_count == 0 {
            errors.push(ConfigError::new("simulation.step_count", "must be > 0"));
        }

        let checks = [
            ensure_non_negative("demand.annual_kwh", self.demand.annual_kwh),
            ensure_non_negative("export.base_price", self.export.base_price),
            self.costs.validate(),
            self.bounds.validate(),
            self.design.validate(),
        ];
        errors.extend(checks.into_iter().filter_map(Result::err).map(ConfigError::from));

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residential_preset_valid() {
        let cfg = ScenarioConfig::residential();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "residential should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent").unwrap_err();
        assert!(err.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
seed = 7
mode = "simulate"
objective = "npv"
step_count = 4
parallel = false

[demand]
annual_kwh = 6000.0
load_type = "mixed"

[export]
base_price = 0.06
profile_type = "time-of-day"

[costs]
pv_cost_per_kwp = 900.0
discount_rate = 0.03

[bounds]
max_pv_kwp = 12.0

[design]
pv_kwp = 6.0
battery_kwh = 8.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.mode(), Ok(RunMode::Simulate));
        assert_eq!(cfg.tariff_profile(), Ok(TariffProfile::TimeOfDay));
        assert_eq!(cfg.load_type(), Ok(LoadType::Mixed));
        assert_eq!(cfg.costs.pv_cost_per_kwp, 900.0);
        // untouched cost fields keep defaults
        assert_eq!(cfg.costs.wind_cost_per_kw, 1500.0);
        assert_eq!(cfg.bounds.max_wind_kw, 10.0);
        assert_eq!(cfg.design.wind_kw, 0.0);
        assert!(!cfg.simulation.options().parallel);
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[costs]
pv_cost_per_kwp = 900.0
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_collects_every_error() {
        let mut cfg = ScenarioConfig::residential();
        cfg.simulation.step_count = 0;
        cfg.simulation.objective = "roi".to_string();
        cfg.costs.discount_rate = 1.2;
        cfg.design.battery_kwh = -1.0;
        let errors = cfg.validate();
        for field in [
            "simulation.step_count",
            "simulation.objective",
            "costs.discount_rate",
            "sizing.battery_kwh",
        ] {
            assert!(
                errors.iter().any(|e| e.field == field),
                "missing {field}: {errors:?}"
            );
        }
    }

    #[test]
    fn unknown_load_type_lists_choices() {
        let mut cfg = ScenarioConfig::residential();
        cfg.demand.load_type = "industrial".to_string();
        let err = cfg.load_type().unwrap_err();
        assert_eq!(err.field, "demand.load_type");
        assert!(err.message.contains("residential, commercial, mixed"));
    }

    #[test]
    fn relative_csv_paths_follow_scenario_file() {
        let mut cfg = ScenarioConfig::residential();
        cfg.demand.profile_csv = Some(PathBuf::from("load.csv"));
        cfg.export.profile_csv = Some(PathBuf::from("/abs/tariff.csv"));
        cfg.resolve_paths(Path::new("scenarios"));
        assert_eq!(cfg.demand.profile_csv, Some(PathBuf::from("scenarios/load.csv")));
        assert_eq!(cfg.export.profile_csv, Some(PathBuf::from("/abs/tariff.csv")));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = ScenarioConfig::from_toml_str("[simulation]\nseed = 99\n").unwrap();
        assert_eq!(cfg.simulation.seed, 99);
        assert_eq!(cfg.simulation.step_count, 5);
        assert_eq!(cfg.demand.annual_kwh, 4000.0);
    }
}
