use std::f64::consts::PI;

use rand::{Rng, rngs::StdRng};

use super::types::{HourlySeries, day_of_year, hour_of_day};
use crate::error::{EngineError, ensure_non_negative};

/// Annual specific yield assumed for the synthetic PV model (kWh per kWp).
const SPECIFIC_YIELD_KWH_PER_KWP: f64 = 1700.0;
/// Daylight hours per year the specific yield is spread over.
const DAYLIGHT_HOURS_PER_YEAR: f64 = 4380.0;
/// Day-of-year offset of the seasonal sine.
const SEASONAL_PHASE_DAYS: f64 = 28.0;
/// Seasonal swing of output around the mean (±30%).
const SEASONAL_AMPLITUDE: f64 = 0.3;
/// Maximum fractional irradiance loss drawn per hour for clouds.
const CLOUD_DEPTH: f64 = 0.3;
/// Fraction of output that is unaffected by clouds.
const CLEAR_SKY_SHARE: f64 = 0.7;

/// Seasonal modulation in `[-1, 1]` for a day of the year.
fn seasonal_factor(day: usize) -> f64 {
    ((day as f64 - SEASONAL_PHASE_DAYS) * 2.0 * PI / 365.0 + PI / 2.0).sin()
}

/// Half-sine daylight shape between 06:00 and 18:00, zero otherwise.
fn diurnal_factor(hod: usize) -> f64 {
    ((hod as f64 - 6.0) * PI / 12.0).sin().max(0.0)
}

/// Simulates hourly PV output (kWh per hour) for a system of `pv_kwp`.
///
/// Output is `base * (1 + 0.3 * seasonal) * diurnal * (0.7 + 0.3 * cloud)`
/// where `base = pv_kwp * 1700 / 4380` and `cloud = max(0, 1 - U(0,1) * 0.3)`
/// is drawn once per hour, including night hours, so the random stream does
/// not depend on the size being simulated.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `pv_kwp` is negative or not finite.
pub fn simulate_pv_generation(
    pv_kwp: f64,
    rng: &mut StdRng,
) -> Result<HourlySeries, EngineError> {
    ensure_non_negative("sizing.pv_kwp", pv_kwp)?;

    let base = pv_kwp * SPECIFIC_YIELD_KWH_PER_KWP / DAYLIGHT_HOURS_PER_YEAR;
    Ok(HourlySeries::from_fn(|hour| {
        let seasonal = seasonal_factor(day_of_year(hour));
        let diurnal = diurnal_factor(hour_of_day(hour));
        let cloud = (1.0 - rng.random::<f64>() * CLOUD_DEPTH).max(0.0);
        let cloud_blend = CLEAR_SKY_SHARE + cloud * (1.0 - CLEAR_SKY_SHARE);
        base * (1.0 + SEASONAL_AMPLITUDE * seasonal) * diurnal * cloud_blend
    }))
}

/// Rescales a normalized (per-kWp) PV profile to a system of `pv_kwp`.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `pv_kwp` is negative or not finite.
pub fn scale_pv_profile(
    normalized: &HourlySeries,
    pv_kwp: f64,
) -> Result<HourlySeries, EngineError> {
    ensure_non_negative("sizing.pv_kwp", pv_kwp)?;
    Ok(normalized.scaled(pv_kwp))
}
