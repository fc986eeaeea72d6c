//! Representative 24-hour dispatch windows for a summer and a winter day.

use serde::Serialize;
use strum::Display;

use crate::profiles::HourlySeries;

use super::battery::BatteryDispatcher;
use super::types::SystemSizing;

/// First hour of the summer sample day (day 151, early June).
pub const SUMMER_WINDOW_START: usize = 3624;
/// First hour of the winter sample day (day 335, early December).
pub const WINTER_WINDOW_START: usize = 8040;
/// Length of each sample window.
pub const WINDOW_HOURS: usize = 24;

/// Which sample day a profile covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    /// First hour of the year covered by this season's window.
    pub fn start_hour(self) -> usize {
        match self {
            Self::Summer => SUMMER_WINDOW_START,
            Self::Winter => WINTER_WINDOW_START,
        }
    }
}

/// One hour of a sample day (energy in kWh, tariff per kWh).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyProfileHour {
    /// Hour of the day, 0 to 23.
    pub hour: usize,
    /// Demand in this hour.
    pub demand: f64,
    /// PV output in this hour.
    pub pv: f64,
    /// Wind output in this hour.
    pub wind: f64,
    /// Stored energy at the end of the hour.
    pub battery_level: f64,
    /// Energy drawn from the grid.
    pub grid_import: f64,
    /// Energy fed into the grid.
    pub grid_export: f64,
    /// Feed-in price for this hour.
    pub export_tariff: f64,
}

/// A 24-hour dispatch window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyProfile {
    pub season: Season,
    pub start_hour: usize,
    pub hours: Vec<DailyProfileHour>,
}

/// Re-dispatches one window with an empty battery.
///
/// The battery state of the annual run is not carried into the window, so the
/// first hours show the battery starting at zero.
pub fn daily_profile(
    season: Season,
    sizing: &SystemSizing,
    demand: &HourlySeries,
    pv: &HourlySeries,
    wind: &HourlySeries,
    export_tariff: &HourlySeries,
) -> DailyProfile {
    let start = season.start_hour();
    let mut battery = BatteryDispatcher::new(sizing.battery_kwh);
    let hours = (0..WINDOW_HOURS)
        .map(|offset| {
            let h = start + offset;
            let step = battery.step(demand[h], pv[h], wind[h]);
            DailyProfileHour {
                hour: offset,
                demand: step.demand,
                pv: step.pv,
                wind: step.wind,
                battery_level: step.battery_level,
                grid_import: step.grid_import,
                grid_export: step.grid_export,
                export_tariff: export_tariff[h],
            }
        })
        .collect();

    DailyProfile {
        season,
        start_hour: start,
        hours,
    }
}

/// Summer and winter profiles, in that order.
pub fn daily_profiles(
    sizing: &SystemSizing,
    demand: &HourlySeries,
    pv: &HourlySeries,
    wind: &HourlySeries,
    export_tariff: &HourlySeries,
) -> Vec<DailyProfile> {
    [Season::Summer, Season::Winter]
        .into_iter()
        .map(|season| daily_profile(season, sizing, demand, pv, wind, export_tariff))
        .collect()
}

/// Export tariff over both sample windows, summer first.
pub fn tariff_sample(export_tariff: &HourlySeries) -> Vec<f64> {
    [SUMMER_WINDOW_START, WINTER_WINDOW_START]
        .into_iter()
        .flat_map(|start| export_tariff[start..start + WINDOW_HOURS].iter().copied())
        .collect()
}
