//! Discounted cash-flow model over the project lifetime.

use serde::Serialize;

use crate::error::EngineError;
use crate::profiles::HourlySeries;

use super::types::{CashFlowYear, CostParameters, EnergyFlowResult, SystemSizing};

/// Years of operation covered by the cash-flow table (year 0 is the investment).
pub const PROJECT_LIFETIME_YEARS: u32 = 20;

/// Operating years in which the battery is replaced.
pub const BATTERY_REPLACEMENT_YEARS: [u32; 2] = [8, 16];

/// Replacement cost as a fraction of the original battery capital cost.
pub const BATTERY_REPLACEMENT_SHARE: f64 = 0.8;

/// Outcome of the financial evaluation of one design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialResult {
    /// Sum of all discounted cash flows, year 0 included.
    pub npv: f64,
    /// Up-front capital cost.
    pub initial_investment: f64,
    /// First year whose cumulative NPV is non-negative, if any.
    pub payback_year: Option<u32>,
    /// Yearly rows, `0..=PROJECT_LIFETIME_YEARS`.
    pub cash_flows: Vec<CashFlowYear>,
}

/// Up-front capital cost of a design.
pub fn initial_investment(sizing: &SystemSizing, costs: &CostParameters) -> f64 {
    sizing.pv_kwp * costs.pv_cost_per_kwp
        + sizing.wind_kw * costs.wind_cost_per_kw
        + sizing.battery_kwh * costs.battery_cost_per_kwh
}

/// Export revenue of one year: hourly export priced at the hour's tariff.
pub fn feed_in_revenue(hourly_export: &[f64], export_tariff: &HourlySeries) -> f64 {
    hourly_export
        .iter()
        .zip(export_tariff.iter())
        .map(|(kwh, price)| kwh * price)
        .sum()
}

/// Battery replacement outlay due in `year`.
fn battery_replacement(year: u32, sizing: &SystemSizing, costs: &CostParameters) -> f64 {
    if BATTERY_REPLACEMENT_YEARS.contains(&year) {
        sizing.battery_kwh * costs.battery_cost_per_kwh * BATTERY_REPLACEMENT_SHARE
    } else {
        0.0
    }
}

/// Builds the 20-year cash-flow table and NPV of a design.
///
/// Annual savings, feed-in revenue and O&M are the same every year. No
/// degradation or price escalation is modelled.
///
/// # Arguments
///
/// * `sizing` - Capacities of the design
/// * `flow` - Energy balance previously simulated for `sizing`
/// * `costs` - Capital, O&M and price inputs
/// * `export_tariff` - Hourly sell-back price, matched hour-by-hour against export
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `sizing` or `costs` fail validation.
pub fn calculate_npv(
    sizing: &SystemSizing,
    flow: &EnergyFlowResult,
    costs: &CostParameters,
    export_tariff: &HourlySeries,
) -> Result<FinancialResult, EngineError> {
    sizing.validate()?;
    costs.validate()?;

    let investment = initial_investment(sizing, costs);
    let price = costs.electricity_price_per_kwh;
    let grid_savings =
        flow.total_demand_kwh * price - flow.energy_from_grid_kwh * price;
    let feed_in = feed_in_revenue(&flow.hourly_energy_to_grid, export_tariff);
    let operational_costs =
        sizing.pv_kwp * costs.pv_om_per_kwp_year + sizing.wind_kw * costs.wind_om_per_kw_year;

    let mut cash_flows = Vec::with_capacity(PROJECT_LIFETIME_YEARS as usize + 1);
    cash_flows.push(CashFlowYear {
        year: 0,
        grid_savings: 0.0,
        feed_in_revenue: 0.0,
        operational_costs: 0.0,
        battery_replacement: 0.0,
        cash_flow: -investment,
        discounted_cash_flow: -investment,
        cumulative_npv: -investment,
    });

    let mut cumulative = -investment;
    let mut payback_year = (investment <= 0.0).then_some(0);
    for year in 1..=PROJECT_LIFETIME_YEARS {
        let replacement = battery_replacement(year, sizing, costs);
        let cash_flow = grid_savings + feed_in - operational_costs - replacement;
        let discounted = cash_flow / (1.0 + costs.discount_rate).powi(year as i32);
        cumulative += discounted;
        if payback_year.is_none() && cumulative >= 0.0 {
            payback_year = Some(year);
        }
        cash_flows.push(CashFlowYear {
            year,
            grid_savings,
            feed_in_revenue: feed_in,
            operational_costs,
            battery_replacement: replacement,
            cash_flow,
            discounted_cash_flow: discounted,
            cumulative_npv: cumulative,
        });
    }

    Ok(FinancialResult {
        npv: cumulative,
        initial_investment: investment,
        payback_year,
        cash_flows,
    })
}
