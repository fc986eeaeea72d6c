//! Planning report assembled from an evaluated design.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::error::EngineError;

use super::daily::{DailyProfile, daily_profiles, tariff_sample};
use super::optimizer::{Evaluation, Objective, ScenarioInputs};
use super::types::{CashFlowYear, OptimizedDesign};

/// Whether a report comes from a grid search or a single fixed design.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunMode {
    #[default]
    Optimize,
    Simulate,
}

/// Everything a caller gets back from an optimize or simulate run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningReport {
    pub mode: RunMode,
    /// `None` for simulate runs.
    pub objective: Option<Objective>,
    pub design: OptimizedDesign,
    pub initial_investment: f64,
    /// First year with non-negative cumulative NPV.
    pub payback_year: Option<u32>,
    pub cash_flows: Vec<CashFlowYear>,
    /// Summer and winter sample days.
    pub daily_profiles: Vec<DailyProfile>,
    /// Export tariff over the two sample days, summer first.
    pub tariff_sample: Vec<f64>,
    pub candidates_evaluated: usize,
}

impl PlanningReport {
    /// Assembles the report for an evaluated design, adding the sample days.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if the design's sizing is invalid.
    pub fn build(
        mode: RunMode,
        objective: Option<Objective>,
        evaluation: Evaluation,
        inputs: &ScenarioInputs<'_>,
        candidates_evaluated: usize,
    ) -> Result<Self, EngineError> {
        let Evaluation { design, finance } = evaluation;
        let (pv, wind) = inputs.scaled_generation(&design.sizing)?;
        let daily_profiles =
            daily_profiles(&design.sizing, inputs.demand, &pv, &wind, inputs.export_tariff);

        Ok(Self {
            mode,
            objective,
            design,
            initial_investment: finance.initial_investment,
            payback_year: finance.payback_year,
            cash_flows: finance.cash_flows,
            daily_profiles,
            tariff_sample: tariff_sample(inputs.export_tariff),
            candidates_evaluated,
        })
    }
}

impl fmt::Display for PlanningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizing = &self.design.sizing;
        let flow = &self.design.flow;

        writeln!(f, "--- Planning Report ---")?;
        writeln!(f, "Mode:                  {}", self.mode)?;
        if let Some(objective) = self.objective {
            writeln!(f, "Objective:             {objective}")?;
        }
        writeln!(f, "Candidates evaluated:  {}", self.candidates_evaluated)?;
        writeln!(f, "PV capacity:           {:.2} kWp", sizing.pv_kwp)?;
        writeln!(f, "Wind capacity:         {:.2} kW", sizing.wind_kw)?;
        writeln!(f, "Battery capacity:      {:.2} kWh", sizing.battery_kwh)?;
        writeln!(
            f,
            "Self-consumption:      {:.1}%",
            100.0 * flow.self_consumption_ratio
        )?;
        writeln!(
            f,
            "Self-sufficiency:      {:.1}%",
            100.0 * flow.self_sufficiency_ratio
        )?;
        writeln!(f, "Demand:                {:.2} kWh", flow.total_demand_kwh)?;
        writeln!(f, "PV generation:         {:.2} kWh", flow.pv_generation_kwh)?;
        writeln!(f, "Wind generation:       {:.2} kWh", flow.wind_generation_kwh)?;
        writeln!(f, "Grid import:           {:.2} kWh", flow.energy_from_grid_kwh)?;
        writeln!(f, "Grid export:           {:.2} kWh", flow.energy_to_grid_kwh)?;
        writeln!(f, "Initial investment:    {:.2}", self.initial_investment)?;
        writeln!(f, "NPV (20 years):        {:.2}", self.design.npv)?;
        match self.payback_year {
            Some(year) => write!(f, "Payback year:          {year}"),
            None => write!(f, "Payback year:          none"),
        }
    }
}
