//! Core sizing types: design candidates, cost inputs and result records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ensure_non_negative};

/// Installed capacities of one candidate design.
///
/// # Examples
///
/// ```
/// use hybrid_sizer::sim::types::SystemSizing;
///
/// let sizing = SystemSizing::new(5.0, 0.0, 10.0).unwrap();
/// assert_eq!(sizing.battery_kwh, 10.0);
/// assert!(SystemSizing::new(-1.0, 0.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemSizing {
    /// PV array peak power (kWp).
    pub pv_kwp: f64,
    /// Wind turbine rated power (kW).
    pub wind_kw: f64,
    /// Usable battery capacity (kWh).
    pub battery_kwh: f64,
}

impl SystemSizing {
    /// Creates a validated sizing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if any capacity is negative or not finite.
    pub fn new(pv_kwp: f64, wind_kw: f64, battery_kwh: f64) -> Result<Self, EngineError> {
        let sizing = Self {
            pv_kwp,
            wind_kw,
            battery_kwh,
        };
        sizing.validate()?;
        Ok(sizing)
    }

    /// Checks every capacity is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns the first violation as [`EngineError::Validation`].
    pub fn validate(&self) -> Result<(), EngineError> {
        ensure_non_negative("sizing.pv_kwp", self.pv_kwp)?;
        ensure_non_negative("sizing.wind_kw", self.wind_kw)?;
        ensure_non_negative("sizing.battery_kwh", self.battery_kwh)
    }
}

impl fmt::Display for SystemSizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PV {:.2} kWp, wind {:.2} kW, battery {:.2} kWh",
            self.pv_kwp, self.wind_kw, self.battery_kwh
        )
    }
}

/// Upper limits of the optimizer search space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingBounds {
    /// Largest PV array considered (kWp).
    pub max_pv_kwp: f64,
    /// Largest wind turbine considered (kW).
    pub max_wind_kw: f64,
    /// Largest battery considered (kWh).
    pub max_battery_kwh: f64,
}

impl Default for SizingBounds {
    fn default() -> Self {
        Self {
            max_pv_kwp: 20.0,
            max_wind_kw: 10.0,
            max_battery_kwh: 20.0,
        }
    }
}

impl SizingBounds {
    /// Checks every bound is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns the first violation as [`EngineError::Validation`].
    pub fn validate(&self) -> Result<(), EngineError> {
        ensure_non_negative("bounds.max_pv_kwp", self.max_pv_kwp)?;
        ensure_non_negative("bounds.max_wind_kw", self.max_wind_kw)?;
        ensure_non_negative("bounds.max_battery_kwh", self.max_battery_kwh)
    }
}

/// Capital, operating and energy prices shared by every candidate of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostParameters {
    /// PV capital cost (per kWp).
    pub pv_cost_per_kwp: f64,
    /// Wind capital cost (per kW).
    pub wind_cost_per_kw: f64,
    /// Battery capital cost (per kWh).
    pub battery_cost_per_kwh: f64,
    /// Retail price of grid electricity (per kWh).
    pub electricity_price_per_kwh: f64,
    /// PV operation and maintenance (per kWp and year).
    pub pv_om_per_kwp_year: f64,
    /// Wind operation and maintenance (per kW and year).
    pub wind_om_per_kw_year: f64,
    /// Annual discount rate in `[0, 1)`.
    pub discount_rate: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            pv_cost_per_kwp: 1000.0,
            wind_cost_per_kw: 1500.0,
            battery_cost_per_kwh: 500.0,
            electricity_price_per_kwh: 0.30,
            pv_om_per_kwp_year: 15.0,
            wind_om_per_kw_year: 40.0,
            discount_rate: 0.05,
        }
    }
}

impl CostParameters {
    /// Checks all costs are non-negative and the discount rate lies in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns the first violation as [`EngineError::Validation`].
    pub fn validate(&self) -> Result<(), EngineError> {
        ensure_non_negative("costs.pv_cost_per_kwp", self.pv_cost_per_kwp)?;
        ensure_non_negative("costs.wind_cost_per_kw", self.wind_cost_per_kw)?;
        ensure_non_negative("costs.battery_cost_per_kwh", self.battery_cost_per_kwh)?;
        ensure_non_negative(
            "costs.electricity_price_per_kwh",
            self.electricity_price_per_kwh,
        )?;
        ensure_non_negative("costs.pv_om_per_kwp_year", self.pv_om_per_kwp_year)?;
        ensure_non_negative("costs.wind_om_per_kw_year", self.wind_om_per_kw_year)?;
        ensure_non_negative("costs.discount_rate", self.discount_rate)?;
        if self.discount_rate >= 1.0 {
            return Err(EngineError::validation(
                "costs.discount_rate",
                format!("must be in [0, 1), got {}", self.discount_rate),
            ));
        }
        Ok(())
    }
}

/// Annual energy balance of one design, aggregated from the hourly dispatch.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EnergyFlowResult {
    /// Share of renewable generation consumed on site (directly or via battery).
    pub self_consumption_ratio: f64,
    /// Share of demand met by on-site generation (directly or via battery).
    pub self_sufficiency_ratio: f64,
    /// Energy imported from the grid (kWh).
    pub energy_from_grid_kwh: f64,
    /// Energy exported to the grid (kWh).
    pub energy_to_grid_kwh: f64,
    /// Hourly export (kWh), hour-matched against the export tariff.
    #[serde(skip)]
    pub hourly_energy_to_grid: Vec<f64>,
    /// Total demand (kWh).
    pub total_demand_kwh: f64,
    /// Total PV + wind generation (kWh).
    pub total_generation_kwh: f64,
    /// Demand covered on site, direct use plus battery discharge (kWh).
    pub total_self_consumption_kwh: f64,
    /// PV generation (kWh).
    pub pv_generation_kwh: f64,
    /// Wind generation (kWh).
    pub wind_generation_kwh: f64,
    /// PV energy consumed directly (kWh).
    pub pv_self_consumption: f64,
    /// Wind energy consumed directly (kWh).
    pub wind_self_consumption: f64,
    /// PV energy exported (kWh).
    pub pv_export: f64,
    /// Wind energy exported (kWh).
    pub wind_export: f64,
    /// `pv_self_consumption / pv_generation_kwh`.
    pub pv_self_consumption_ratio: f64,
    /// `wind_self_consumption / wind_generation_kwh`.
    pub wind_self_consumption_ratio: f64,
    /// `pv_export / pv_generation_kwh`.
    pub pv_export_ratio: f64,
    /// `wind_export / wind_generation_kwh`.
    pub wind_export_ratio: f64,
    /// Energy put into the battery (kWh).
    pub battery_charged_kwh: f64,
    /// Energy taken out of the battery (kWh).
    pub battery_discharged_kwh: f64,
}

/// One row of the 20-year cash-flow table.
///
/// Year 0 carries only the (negative) initial investment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowYear {
    /// Project year, 0 to 20.
    pub year: u32,
    /// Avoided grid purchases.
    pub grid_savings: f64,
    /// Export revenue.
    pub feed_in_revenue: f64,
    /// Operation and maintenance costs.
    pub operational_costs: f64,
    /// Battery replacement outlay (years 8 and 16 only).
    pub battery_replacement: f64,
    /// Net cash flow of the year.
    pub cash_flow: f64,
    /// `cash_flow / (1 + r)^year`.
    pub discounted_cash_flow: f64,
    /// Running sum of discounted cash flows.
    pub cumulative_npv: f64,
}

/// A design together with its energy balance and NPV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedDesign {
    /// Capacities of the design.
    #[serde(flatten)]
    pub sizing: SystemSizing,
    /// Annual energy balance.
    #[serde(flatten)]
    pub flow: EnergyFlowResult,
    /// 20-year net present value.
    pub npv: f64,
}
