//! Per-run façade holding the demand, tariff and custom generation profiles.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::error::EngineError;
use crate::profiles::{
    HourlySeries, LoadType, TariffProfile, generate_export_tariff_profile, generate_load_profile,
    simulate_pv_generation, simulate_wind_generation,
};
use crate::sim::{
    CostParameters, Objective, OptimizerOptions, PlanningReport, ScenarioInputs, SizingBounds,
    SystemSizing, optimize, simulate,
};

/// Seed offsets so each generator gets its own stream from the master seed.
const LOAD_SEED_OFFSET: u64 = 0;
const TARIFF_SEED_OFFSET: u64 = 1;
const PV_SEED_OFFSET: u64 = 2;
const WIND_SEED_OFFSET: u64 = 3;

/// Holds the hourly profiles of one planning session and runs the engine on them.
///
/// Demand and export tariff must be generated or supplied before
/// [`Planner::optimize`] or [`Planner::simulate`] can run. PV and wind fall
/// back to the synthetic models unless a custom profile was set.
///
/// Each generator draws from its own RNG derived from the master seed, so
/// results depend only on the seed and the inputs, never on call order.
#[derive(Debug, Clone)]
pub struct Planner {
    seed: u64,
    demand: Option<HourlySeries>,
    export_tariff: Option<HourlySeries>,
    /// Normalized PV output per kWp.
    pv_profile: Option<HourlySeries>,
    /// Wind shape, rescaled to the turbine's full-load hours.
    wind_profile: Option<HourlySeries>,
}

impl Planner {
    /// Creates an empty planner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            demand: None,
            export_tariff: None,
            pv_profile: None,
            wind_profile: None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn rng(&self, offset: u64) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_add(offset))
    }

    /// Synthesizes and stores the demand profile.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `annual_demand_kwh` is negative or not finite.
    pub fn generate_load_profile(
        &mut self,
        annual_demand_kwh: f64,
        load_type: LoadType,
    ) -> Result<&HourlySeries, EngineError> {
        let profile =
            generate_load_profile(annual_demand_kwh, load_type, &mut self.rng(LOAD_SEED_OFFSET))?;
        Ok(self.demand.insert(profile))
    }

    /// Synthesizes and stores the export tariff.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `base_price` is negative or not finite.
    pub fn generate_export_tariff(
        &mut self,
        base_price: f64,
        profile_type: TariffProfile,
    ) -> Result<&HourlySeries, EngineError> {
        let profile = generate_export_tariff_profile(
            base_price,
            profile_type,
            &mut self.rng(TARIFF_SEED_OFFSET),
        )?;
        Ok(self.export_tariff.insert(profile))
    }

    /// Stores a caller-supplied demand profile (kWh per hour).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] unless `values` has exactly 8760
    /// finite, non-negative entries.
    pub fn set_demand_profile(&mut self, values: Vec<f64>) -> Result<(), EngineError> {
        self.demand = Some(HourlySeries::try_new_non_negative("demand", values)?);
        Ok(())
    }

    /// Stores a caller-supplied export tariff (price per kWh).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] unless `values` has exactly 8760
    /// finite entries. Negative prices are allowed.
    pub fn set_export_tariff(&mut self, values: Vec<f64>) -> Result<(), EngineError> {
        self.export_tariff = Some(HourlySeries::try_new("export_tariff", values)?);
        Ok(())
    }

    /// Stores a normalized PV profile (kWh per kWp and hour).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] unless `values` has exactly 8760
    /// finite, non-negative entries.
    pub fn set_pv_profile(&mut self, values: Vec<f64>) -> Result<(), EngineError> {
        self.pv_profile = Some(HourlySeries::try_new_non_negative("pv_profile", values)?);
        Ok(())
    }

    /// Stores a wind output shape of any magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] unless `values` has exactly 8760
    /// finite, non-negative entries.
    pub fn set_wind_profile(&mut self, values: Vec<f64>) -> Result<(), EngineError> {
        self.wind_profile = Some(HourlySeries::try_new_non_negative("wind_profile", values)?);
        Ok(())
    }

    pub fn demand(&self) -> Option<&HourlySeries> {
        self.demand.as_ref()
    }

    pub fn export_tariff(&self) -> Option<&HourlySeries> {
        self.export_tariff.as_ref()
    }

    fn ready(&self) -> Result<(&HourlySeries, &HourlySeries), EngineError> {
        let demand = self.demand.as_ref().ok_or(EngineError::NotReady("demand"))?;
        let tariff = self
            .export_tariff
            .as_ref()
            .ok_or(EngineError::NotReady("export tariff"))?;
        Ok((demand, tariff))
    }

    /// Normalized PV (per kWp) and wind (per kW) output used for every candidate.
    ///
    /// # Errors
    ///
    /// Never fails for the fixed unit sizes; the `Result` comes from the generators.
    pub fn base_generation(&self) -> Result<(HourlySeries, HourlySeries), EngineError> {
        let pv = match &self.pv_profile {
            Some(profile) => profile.clone(),
            None => simulate_pv_generation(1.0, &mut self.rng(PV_SEED_OFFSET))?,
        };
        let wind = simulate_wind_generation(
            1.0,
            self.wind_profile.as_ref(),
            &mut self.rng(WIND_SEED_OFFSET),
        )?;
        Ok((pv, wind))
    }

    /// Grid-searches the best design under `objective`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotReady`] if demand or tariff are missing and
    /// [`EngineError::Validation`] for invalid bounds, costs or options.
    pub fn optimize(
        &self,
        objective: Objective,
        bounds: &SizingBounds,
        costs: &CostParameters,
        options: &OptimizerOptions,
    ) -> Result<PlanningReport, EngineError> {
        let (demand, export_tariff) = self.ready()?;
        let (base_pv, base_wind) = self.base_generation()?;
        info!(seed = self.seed, %objective, "optimizing design");
        let inputs = ScenarioInputs {
            demand,
            base_pv: &base_pv,
            base_wind: &base_wind,
            export_tariff,
            costs,
        };
        optimize(objective, bounds, &inputs, options)
    }

    /// Evaluates one fixed design.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotReady`] if demand or tariff are missing and
    /// [`EngineError::Validation`] for an invalid sizing or costs.
    pub fn simulate(
        &self,
        sizing: &SystemSizing,
        costs: &CostParameters,
    ) -> Result<PlanningReport, EngineError> {
        let (demand, export_tariff) = self.ready()?;
        let (base_pv, base_wind) = self.base_generation()?;
        let inputs = ScenarioInputs {
            demand,
            base_pv: &base_pv,
            base_wind: &base_wind,
            export_tariff,
            costs,
        };
        simulate(sizing, &inputs)
    }
}
