//! Exhaustive grid search over PV, wind and battery capacities.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};
use tracing::{debug, info};

use crate::error::EngineError;
use crate::profiles::{HourlySeries, scale_pv_profile};

use super::energy_flow::simulate_energy_flow;
use super::finance::{FinancialResult, calculate_npv};
use super::report::{PlanningReport, RunMode};
use super::types::{CostParameters, OptimizedDesign, SizingBounds, SystemSizing};

/// Default number of intervals per sizing dimension.
pub const DEFAULT_STEP_COUNT: usize = 5;

/// What the grid search maximizes.
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
pub enum Objective {
    /// Share of renewable generation consumed on site.
    #[default]
    #[serde(alias = "self-consumption")]
    #[strum(to_string = "self_consumption", serialize = "self-consumption")]
    SelfConsumption,
    /// 20-year net present value.
    #[strum(to_string = "npv")]
    Npv,
}

impl Objective {
    /// Score of an evaluated design under this objective (higher is better).
    pub fn score(self, design: &OptimizedDesign) -> f64 {
        match self {
            Self::SelfConsumption => design.flow.self_consumption_ratio,
            Self::Npv => design.npv,
        }
    }
}

/// Tuning knobs of the grid search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerOptions {
    /// Intervals per dimension; `step_count + 1` sizes are tried on each axis.
    pub step_count: usize,
    /// Evaluate candidates on the rayon thread pool.
    pub parallel: bool,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            step_count: DEFAULT_STEP_COUNT,
            parallel: true,
        }
    }
}

impl OptimizerOptions {
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `step_count` is zero.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.step_count == 0 {
            return Err(EngineError::validation("optimizer.step_count", "must be > 0"));
        }
        Ok(())
    }
}

/// Everything a candidate evaluation needs besides its sizing.
///
/// Generation series are normalized: `base_pv` is output per kWp and
/// `base_wind` output per kW of rated power. They are generated once per run
/// and rescaled for every candidate.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioInputs<'a> {
    /// Hourly demand (kWh).
    pub demand: &'a HourlySeries,
    /// PV output per kWp of installed capacity.
    pub base_pv: &'a HourlySeries,
    /// Wind output per kW of rated power.
    pub base_wind: &'a HourlySeries,
    /// Feed-in price per exported kWh.
    pub export_tariff: &'a HourlySeries,
    /// Capital and operating cost assumptions.
    pub costs: &'a CostParameters,
}

/// A fully evaluated design.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Sizing, energy balance and NPV.
    pub design: OptimizedDesign,
    /// Full cash-flow table behind `design.npv`.
    pub finance: FinancialResult,
}

impl ScenarioInputs<'_> {
    /// PV and wind output scaled to the capacities of `sizing`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for negative or non-finite capacities.
    pub fn scaled_generation(
        &self,
        sizing: &SystemSizing,
    ) -> Result<(HourlySeries, HourlySeries), EngineError> {
        sizing.validate()?;
        let pv = scale_pv_profile(self.base_pv, sizing.pv_kwp)?;
        let wind = self.base_wind.scaled(sizing.wind_kw);
        Ok((pv, wind))
    }

    /// Runs energy flow and financial model for one sizing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if the sizing or costs are invalid.
    pub fn evaluate(&self, sizing: &SystemSizing) -> Result<Evaluation, EngineError> {
        let (pv, wind) = self.scaled_generation(sizing)?;
        let flow = simulate_energy_flow(self.demand, &pv, &wind, sizing.battery_kwh)?;
        let finance = calculate_npv(sizing, &flow, self.costs, self.export_tariff)?;
        Ok(Evaluation {
            design: OptimizedDesign {
                sizing: *sizing,
                flow,
                npv: finance.npv,
            },
            finance,
        })
    }
}

/// `step_count + 1` evenly spaced sizes from 0 to `max` inclusive.
pub fn candidate_sizes(max: f64, step_count: usize) -> Vec<f64> {
    (0..=step_count)
        .map(|i| max * i as f64 / step_count as f64)
        .collect()
}

/// All candidate sizings, PV outermost, then wind, battery innermost.
pub fn candidate_grid(bounds: &SizingBounds, step_count: usize) -> Vec<SystemSizing> {
    let pv_sizes = candidate_sizes(bounds.max_pv_kwp, step_count);
    let wind_sizes = candidate_sizes(bounds.max_wind_kw, step_count);
    let battery_sizes = candidate_sizes(bounds.max_battery_kwh, step_count);

    let mut grid = Vec::with_capacity(pv_sizes.len() * wind_sizes.len() * battery_sizes.len());
    for &pv_kwp in &pv_sizes {
        for &wind_kw in &wind_sizes {
            for &battery_kwh in &battery_sizes {
                grid.push(SystemSizing {
                    pv_kwp,
                    wind_kw,
                    battery_kwh,
                });
            }
        }
    }
    grid
}

/// Winner of a grid search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Highest-scoring candidate, first in grid order on ties.
    pub best: Evaluation,
    /// Grid size, `(step_count + 1)^3`.
    pub candidates_evaluated: usize,
}

/// Evaluates every candidate of the grid and keeps the highest score.
///
/// Scores may be computed in parallel, but selection walks them in
/// enumeration order with a strict `>`, so the first of equally good
/// candidates wins and the result never depends on thread scheduling.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] for a zero `step_count`, invalid
/// bounds or invalid costs. Nothing is evaluated in that case.
pub fn grid_search(
    objective: Objective,
    bounds: &SizingBounds,
    inputs: &ScenarioInputs<'_>,
    options: &OptimizerOptions,
) -> Result<SearchOutcome, EngineError> {
    options.validate()?;
    bounds.validate()?;
    inputs.costs.validate()?;

    let grid = candidate_grid(bounds, options.step_count);
    info!(
        %objective,
        candidates = grid.len(),
        parallel = options.parallel,
        "starting grid search"
    );

    let score = |sizing: &SystemSizing| -> Result<f64, EngineError> {
        inputs
            .evaluate(sizing)
            .map(|evaluation| objective.score(&evaluation.design))
    };
    let scores: Vec<f64> = if options.parallel {
        grid.par_iter().map(score).collect::<Result<_, _>>()?
    } else {
        grid.iter().map(score).collect::<Result<_, _>>()?
    };

    let mut best: Option<(usize, f64)> = None;
    for (index, &candidate_score) in scores.iter().enumerate() {
        if best.is_none_or(|(_, best_score)| candidate_score > best_score) {
            let sizing = &grid[index];
            debug!(%sizing, score = candidate_score, "new best candidate");
            best = Some((index, candidate_score));
        }
    }

    let (best_index, _) = best.ok_or_else(|| {
        EngineError::validation("optimizer.step_count", "candidate grid is empty")
    })?;
    let best = inputs.evaluate(&grid[best_index])?;
    info!(
        sizing = %best.design.sizing,
        npv = best.design.npv,
        self_consumption = best.design.flow.self_consumption_ratio,
        "grid search finished"
    );

    Ok(SearchOutcome {
        best,
        candidates_evaluated: grid.len(),
    })
}

/// Searches the grid and assembles the full report for the winner.
///
/// # Errors
///
/// See [`grid_search`].
pub fn optimize(
    objective: Objective,
    bounds: &SizingBounds,
    inputs: &ScenarioInputs<'_>,
    options: &OptimizerOptions,
) -> Result<PlanningReport, EngineError> {
    let outcome = grid_search(objective, bounds, inputs, options)?;
    PlanningReport::build(
        RunMode::Optimize,
        Some(objective),
        outcome.best,
        inputs,
        outcome.candidates_evaluated,
    )
}

/// Evaluates a single fixed design and assembles its report.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if the sizing or costs are invalid.
pub fn simulate(
    sizing: &SystemSizing,
    inputs: &ScenarioInputs<'_>,
) -> Result<PlanningReport, EngineError> {
    info!(%sizing, "simulating fixed design");
    let evaluation = inputs.evaluate(sizing)?;
    PlanningReport::build(RunMode::Simulate, None, evaluation, inputs, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    struct Fixture {
        demand: HourlySeries,
        pv: HourlySeries,
        wind: HourlySeries,
        tariff: HourlySeries,
        costs: CostParameters,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                demand: HourlySeries::from_fn(|_| 0.5),
                pv: HourlySeries::from_fn(|h| if (9..15).contains(&(h % 24)) { 0.6 } else { 0.0 }),
                wind: HourlySeries::from_fn(|h| if h % 3 == 0 { 0.4 } else { 0.1 }),
                tariff: HourlySeries::from_fn(|_| 0.08),
                costs: CostParameters::default(),
            }
        }

        fn inputs(&self) -> ScenarioInputs<'_> {
            ScenarioInputs {
                demand: &self.demand,
                base_pv: &self.pv,
                base_wind: &self.wind,
                export_tariff: &self.tariff,
                costs: &self.costs,
            }
        }
    }

    fn bounds(max: f64) -> SizingBounds {
        SizingBounds {
            max_pv_kwp: max,
            max_wind_kw: max / 2.0,
            max_battery_kwh: max,
        }
    }

    #[rstest]
    #[case(10.0, 5, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0])]
    #[case(3.0, 1, vec![0.0, 3.0])]
    #[case(0.0, 2, vec![0.0, 0.0, 0.0])]
    fn candidate_sizes_cases(#[case] max: f64, #[case] steps: usize, #[case] expected: Vec<f64>) {
        let sizes = candidate_sizes(max, steps);
        assert_eq!(sizes.len(), expected.len());
        for (got, want) in sizes.iter().zip(&expected) {
            assert_approx_eq!(f64, *got, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn grid_order_is_pv_wind_battery() {
        let grid = candidate_grid(&bounds(2.0), 1);
        assert_eq!(grid.len(), 8);
        assert_eq!(grid[0], SystemSizing::default());
        assert_eq!(grid[1].battery_kwh, 2.0);
        assert_eq!(grid[2].wind_kw, 1.0);
        assert_eq!(grid[4].pv_kwp, 2.0);
    }

    #[test]
    fn zero_step_count_rejected() {
        let fx = Fixture::new();
        let options = OptimizerOptions {
            step_count: 0,
            parallel: false,
        };
        let err = grid_search(Objective::Npv, &bounds(10.0), &fx.inputs(), &options).unwrap_err();
        assert!(err.to_string().contains("step_count"));
    }

    #[rstest]
    #[case(Objective::SelfConsumption)]
    #[case(Objective::Npv)]
    fn parallel_and_sequential_agree(#[case] objective: Objective) {
        let fx = Fixture::new();
        let seq = OptimizerOptions {
            step_count: 3,
            parallel: false,
        };
        let par = OptimizerOptions {
            parallel: true,
            ..seq
        };
        let a = grid_search(objective, &bounds(8.0), &fx.inputs(), &seq).unwrap();
        let b = grid_search(objective, &bounds(8.0), &fx.inputs(), &par).unwrap();
        assert_eq!(a.best.design.sizing, b.best.design.sizing);
        assert_eq!(a.candidates_evaluated, 64);
    }

    #[test]
    fn best_beats_every_candidate() {
        let fx = Fixture::new();
        let options = OptimizerOptions {
            step_count: 2,
            parallel: false,
        };
        let outcome = grid_search(Objective::Npv, &bounds(6.0), &fx.inputs(), &options).unwrap();
        for sizing in candidate_grid(&bounds(6.0), 2) {
            let npv = fx.inputs().evaluate(&sizing).unwrap().design.npv;
            assert!(outcome.best.design.npv >= npv);
        }
    }

    #[test]
    fn ties_keep_first_candidate() {
        // No generation at all: every candidate has self-consumption 0.
        let fx = Fixture {
            pv: HourlySeries::zeros(),
            wind: HourlySeries::zeros(),
            ..Fixture::new()
        };
        let outcome = grid_search(
            Objective::SelfConsumption,
            &bounds(4.0),
            &fx.inputs(),
            &OptimizerOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome.best.design.sizing, SystemSizing::default());
    }

    #[test]
    fn simulate_zero_design() {
        let fx = Fixture::new();
        let report = simulate(&SystemSizing::default(), &fx.inputs()).unwrap();
        let flow = &report.design.flow;
        assert_approx_eq!(f64, flow.energy_from_grid_kwh, 0.5 * 8760.0, epsilon = 1e-6);
        assert_eq!(flow.energy_to_grid_kwh, 0.0);
        assert_approx_eq!(f64, report.design.npv, 0.0, epsilon = 1e-9);
        assert_eq!(report.candidates_evaluated, 1);
        assert_eq!(report.objective, None);
    }

    #[test]
    fn objective_parses_both_spellings() {
        assert_eq!("self_consumption".parse::<Objective>().ok(), Some(Objective::SelfConsumption));
        assert_eq!("self-consumption".parse::<Objective>().ok(), Some(Objective::SelfConsumption));
        assert_eq!("npv".parse::<Objective>().ok(), Some(Objective::Npv));
        assert!("roi".parse::<Objective>().is_err());
        assert_eq!(Objective::SelfConsumption.to_string(), "self_consumption");
    }
}
