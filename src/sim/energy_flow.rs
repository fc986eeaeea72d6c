//! Annual hour-by-hour energy dispatch.

use crate::error::{EngineError, ensure_non_negative};
use crate::profiles::HourlySeries;

use super::battery::{BatteryDispatcher, HourDispatch};
use super::types::EnergyFlowResult;

/// Running sums folded over the hourly dispatch.
#[derive(Debug, Default)]
struct FlowTotals {
    demand: f64,
    pv: f64,
    wind: f64,
    self_consumption: f64,
    pv_direct: f64,
    wind_direct: f64,
    from_grid: f64,
    to_grid: f64,
    pv_export: f64,
    wind_export: f64,
    charged: f64,
    discharged: f64,
}

impl FlowTotals {
    fn add(&mut self, hour: &HourDispatch) {
        self.demand += hour.demand;
        self.pv += hour.pv;
        self.wind += hour.wind;
        self.self_consumption += hour.direct_consumption + hour.battery_discharge;
        self.pv_direct += hour.pv_direct;
        self.wind_direct += hour.wind_direct;
        self.from_grid += hour.grid_import;
        self.to_grid += hour.grid_export;
        self.pv_export += hour.pv_export;
        self.wind_export += hour.wind_export;
        self.charged += hour.battery_charge;
        self.discharged += hour.battery_discharge;
    }

    fn into_result(self, hourly_energy_to_grid: Vec<f64>) -> EnergyFlowResult {
        let generation = self.pv + self.wind;
        EnergyFlowResult {
            self_consumption_ratio: ratio(self.self_consumption, generation),
            self_sufficiency_ratio: ratio(self.self_consumption, self.demand),
            energy_from_grid_kwh: self.from_grid,
            energy_to_grid_kwh: self.to_grid,
            hourly_energy_to_grid,
            total_demand_kwh: self.demand,
            total_generation_kwh: generation,
            total_self_consumption_kwh: self.self_consumption,
            pv_generation_kwh: self.pv,
            wind_generation_kwh: self.wind,
            pv_self_consumption: self.pv_direct,
            wind_self_consumption: self.wind_direct,
            pv_export: self.pv_export,
            wind_export: self.wind_export,
            pv_self_consumption_ratio: ratio(self.pv_direct, self.pv),
            wind_self_consumption_ratio: ratio(self.wind_direct, self.wind),
            pv_export_ratio: ratio(self.pv_export, self.pv),
            wind_export_ratio: ratio(self.wind_export, self.wind),
            battery_charged_kwh: self.charged,
            battery_discharged_kwh: self.discharged,
        }
    }
}

/// `numerator / denominator` clamped to `[0, 1]`, or 0 when there is nothing
/// to divide by.
///
/// Numerator and denominator are summed along different paths, so rounding
/// alone can push a full ratio a few ulps past 1.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        (numerator / denominator).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Runs the dispatch over every hour in order, handing each hour to `on_hour`.
fn dispatch_year(
    demand: &HourlySeries,
    pv: &HourlySeries,
    wind: &HourlySeries,
    battery_kwh: f64,
    mut on_hour: impl FnMut(HourDispatch),
) -> Result<(), EngineError> {
    ensure_non_negative("sizing.battery_kwh", battery_kwh)?;

    let mut battery = BatteryDispatcher::new(battery_kwh);
    for ((&d, &p), &w) in demand.iter().zip(pv.iter()).zip(wind.iter()) {
        on_hour(battery.step(d, p, w));
    }
    Ok(())
}

/// Simulates one year of dispatch and aggregates the energy balance.
///
/// The battery starts empty. All three series must already be scaled to the
/// capacities under evaluation.
///
/// # Arguments
///
/// * `demand` - Hourly demand (kWh)
/// * `pv_generation` - Hourly PV output (kWh)
/// * `wind_generation` - Hourly wind output (kWh)
/// * `battery_kwh` - Usable battery capacity (kWh)
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `battery_kwh` is negative or not finite.
pub fn simulate_energy_flow(
    demand: &HourlySeries,
    pv_generation: &HourlySeries,
    wind_generation: &HourlySeries,
    battery_kwh: f64,
) -> Result<EnergyFlowResult, EngineError> {
    let mut totals = FlowTotals::default();
    let mut hourly_export = Vec::with_capacity(demand.len());
    dispatch_year(demand, pv_generation, wind_generation, battery_kwh, |hour| {
        totals.add(&hour);
        hourly_export.push(hour.grid_export);
    })?;
    Ok(totals.into_result(hourly_export))
}

/// Same dispatch as [`simulate_energy_flow`], returning every hour instead of totals.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `battery_kwh` is negative or not finite.
pub fn trace_energy_flow(
    demand: &HourlySeries,
    pv_generation: &HourlySeries,
    wind_generation: &HourlySeries,
    battery_kwh: f64,
) -> Result<Vec<HourDispatch>, EngineError> {
    let mut hours = Vec::with_capacity(demand.len());
    dispatch_year(demand, pv_generation, wind_generation, battery_kwh, |hour| {
        hours.push(hour);
    })?;
    Ok(hours)
}
