use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};
use tracing::debug;

use super::types::{HOURS_PER_YEAR, HourlySeries, day_of_year, hour_of_day, month_of_hour, uniform};
use crate::error::{EngineError, ensure_non_negative};

/// Share of the residential shape in a `mixed` load.
const MIXED_RESIDENTIAL_WEIGHT: f64 = 0.6;
/// Share of the commercial shape in a `mixed` load.
const MIXED_COMMERCIAL_WEIGHT: f64 = 0.4;

/// Per-hour random perturbation band applied before renormalization.
const JITTER_LOW: f64 = 0.9;
const JITTER_HIGH: f64 = 1.1;

/// Diurnal shape of a household: morning bump, evening peak.
const RESIDENTIAL_DIURNAL: [f64; 24] = [
    0.50, 0.40, 0.35, 0.35, 0.40, 0.55, 0.85, 1.15, 1.10, 0.90, 0.80, 0.80, //
    0.85, 0.80, 0.75, 0.80, 0.95, 1.25, 1.55, 1.60, 1.50, 1.30, 1.00, 0.70,
];

/// Diurnal shape of an office/retail site: flat plateau over business hours.
const COMMERCIAL_DIURNAL: [f64; 24] = [
    0.35, 0.30, 0.30, 0.30, 0.35, 0.45, 0.70, 1.10, 1.45, 1.60, 1.65, 1.65, //
    1.55, 1.60, 1.60, 1.55, 1.40, 1.10, 0.80, 0.60, 0.50, 0.45, 0.40, 0.35,
];

/// Day-of-week factors, day 0 is the first day of the year.
const RESIDENTIAL_WEEKLY: [f64; 7] = [0.95, 0.95, 0.95, 0.95, 1.00, 1.10, 1.10];
const COMMERCIAL_WEEKLY: [f64; 7] = [1.10, 1.10, 1.10, 1.10, 1.05, 0.45, 0.30];

/// Month factors: households heat in winter, commercial sites cool in summer.
const RESIDENTIAL_SEASONAL: [f64; 12] = [
    1.30, 1.25, 1.10, 0.95, 0.85, 0.80, 0.80, 0.80, 0.85, 0.95, 1.10, 1.30,
];
const COMMERCIAL_SEASONAL: [f64; 12] = [
    1.05, 1.00, 0.95, 0.95, 1.00, 1.10, 1.15, 1.15, 1.05, 0.95, 0.95, 1.00,
];

/// Consumer category selecting the demand shape.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoadType {
    /// Household demand.
    Residential,
    /// Office / retail demand.
    Commercial,
    /// 60/40 blend of residential and commercial.
    Mixed,
}

impl LoadType {
    /// Returns the `(diurnal, weekly, seasonal)` factors for an hour of the year.
    fn factors(self, hour: usize) -> (f64, f64, f64) {
        let hod = hour_of_day(hour);
        let dow = day_of_year(hour) % 7;
        let month = month_of_hour(hour);

        let residential = (
            RESIDENTIAL_DIURNAL[hod],
            RESIDENTIAL_WEEKLY[dow],
            RESIDENTIAL_SEASONAL[month],
        );
        let commercial = (
            COMMERCIAL_DIURNAL[hod],
            COMMERCIAL_WEEKLY[dow],
            COMMERCIAL_SEASONAL[month],
        );

        match self {
            Self::Residential => residential,
            Self::Commercial => commercial,
            Self::Mixed => (
                blend(residential.0, commercial.0),
                blend(residential.1, commercial.1),
                blend(residential.2, commercial.2),
            ),
        }
    }
}

fn blend(residential: f64, commercial: f64) -> f64 {
    MIXED_RESIDENTIAL_WEIGHT * residential + MIXED_COMMERCIAL_WEIGHT * commercial
}

/// Generates an hourly demand profile whose annual total equals `annual_demand_kwh`.
///
/// The flat hourly average is shaped by diurnal, weekly and seasonal factors
/// and an independent uniform multiplier in `[0.9, 1.1)` per hour. The whole
/// series is then rescaled so the perturbation cannot move the annual total.
///
/// # Arguments
///
/// * `annual_demand_kwh` - Target annual consumption (kWh, >= 0)
/// * `load_type` - Demand shape selector
/// * `rng` - Random source for the per-hour perturbation
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `annual_demand_kwh` is negative or not finite.
pub fn generate_load_profile(
    annual_demand_kwh: f64,
    load_type: LoadType,
    rng: &mut StdRng,
) -> Result<HourlySeries, EngineError> {
    ensure_non_negative("demand.annual_kwh", annual_demand_kwh)?;

    let hourly_average = annual_demand_kwh / HOURS_PER_YEAR as f64;
    let raw = HourlySeries::from_fn(|hour| {
        let (diurnal, weekly, seasonal) = load_type.factors(hour);
        hourly_average * diurnal * weekly * seasonal * uniform(rng, JITTER_LOW, JITTER_HIGH)
    });

    let total = raw.sum();
    if total <= 0.0 {
        return Ok(HourlySeries::zeros());
    }

    debug!(%load_type, annual_demand_kwh, "generated load profile");
    Ok(raw.scaled(annual_demand_kwh / total))
}
