use rand::rngs::StdRng;
use tracing::warn;

use super::types::{HOURS_PER_YEAR, HourlySeries, hour_of_day, month_of_hour, uniform};
use crate::error::{EngineError, ensure_non_negative};

/// Mean hub-height wind speed of the synthetic site (m/s).
const AVERAGE_WIND_SPEED: f64 = 6.0;
/// Below this speed the turbine does not turn (m/s).
const CUT_IN_SPEED: f64 = 3.0;
/// Above this speed the turbine shuts down (m/s).
const CUT_OUT_SPEED: f64 = 25.0;
/// Speed at which rated output is reached (m/s).
const RATED_SPEED: f64 = 12.0;

/// Per-hour turbulence band applied to the modelled speed.
const TURBULENCE_LOW: f64 = 0.7;
const TURBULENCE_HIGH: f64 = 1.3;

/// Monthly speed factors: windier winters, calmer summers.
const SEASONAL_PATTERN: [f64; 12] = [
    1.20, 1.15, 1.10, 1.00, 0.90, 0.85, 0.80, 0.80, 0.90, 1.00, 1.10, 1.20,
];

/// Hourly speed factors: windier at night, calmer around midday.
const DIURNAL_PATTERN: [f64; 24] = [
    1.10, 1.12, 1.14, 1.15, 1.14, 1.12, 1.08, 1.02, 0.96, 0.92, 0.89, 0.87, //
    0.86, 0.86, 0.87, 0.89, 0.92, 0.96, 1.00, 1.03, 1.05, 1.07, 1.08, 1.09,
];

/// Fraction of rated power produced at `speed` (m/s).
///
/// Zero outside `[cut_in, cut_out]`, one from the rated speed up to cut-out
/// and a cubic ramp in between.
pub fn power_curve(speed: f64) -> f64 {
    if !(CUT_IN_SPEED..=CUT_OUT_SPEED).contains(&speed) {
        0.0
    } else if speed >= RATED_SPEED {
        1.0
    } else {
        ((speed - CUT_IN_SPEED) / (RATED_SPEED - CUT_IN_SPEED)).powi(3)
    }
}

/// Simulates hourly wind output (kWh per hour) for a turbine of `wind_kw`.
///
/// With a `custom_profile` the caller's temporal shape is kept and only its
/// magnitude is set: the result sums to `wind_kw * 8760`. An all-zero custom
/// profile stays all-zero. Without one, hourly speeds are synthesized from
/// the seasonal and diurnal patterns plus uniform turbulence and passed
/// through [`power_curve`].
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `wind_kw` is negative or not finite.
pub fn simulate_wind_generation(
    wind_kw: f64,
    custom_profile: Option<&HourlySeries>,
    rng: &mut StdRng,
) -> Result<HourlySeries, EngineError> {
    ensure_non_negative("sizing.wind_kw", wind_kw)?;

    if let Some(profile) = custom_profile {
        let total = profile.sum();
        if total <= 0.0 {
            warn!("custom wind profile sums to zero, wind output will be zero");
            return Ok(HourlySeries::zeros());
        }
        return Ok(profile.scaled(wind_kw * HOURS_PER_YEAR as f64 / total));
    }

    Ok(HourlySeries::from_fn(|hour| {
        let speed = AVERAGE_WIND_SPEED
            * SEASONAL_PATTERN[month_of_hour(hour)]
            * DIURNAL_PATTERN[hour_of_day(hour)]
            * uniform(rng, TURBULENCE_LOW, TURBULENCE_HIGH);
        power_curve(speed) * wind_kw
    }))
}
