use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};
use tracing::debug;

use super::types::{HourlySeries, hour_of_day, month_of_hour, uniform};
use crate::error::{EngineError, ensure_non_negative};

/// Midday premium window (hour of day, inclusive).
const MIDDAY_HOURS: std::ops::RangeInclusive<usize> = 9..=14;
/// Evening discount window (hour of day, inclusive).
const EVENING_HOURS: std::ops::RangeInclusive<usize> = 18..=20;
const MIDDAY_FACTOR: f64 = 1.2;
const EVENING_FACTOR: f64 = 0.8;

/// Summer months (zero-based) with abundant PV and cheap exports.
const SUMMER_MONTHS: std::ops::RangeInclusive<usize> = 4..=7;
/// Winter months (zero-based) with scarce generation and dear exports.
const WINTER_MONTHS: [usize; 4] = [10, 11, 0, 1];
const SUMMER_FACTOR: f64 = 0.7;
const WINTER_FACTOR: f64 = 1.3;

/// Per-hour jitter band of the `dynamic` profile.
const DYNAMIC_JITTER_LOW: f64 = 0.95;
const DYNAMIC_JITTER_HIGH: f64 = 1.05;

/// Shape of the export (feed-in) tariff over the year.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "snake_case")]
pub enum TariffProfile {
    /// Constant price.
    #[strum(to_string = "flat")]
    Flat,
    /// Midday premium and evening discount.
    #[serde(alias = "time-of-day")]
    #[strum(to_string = "time_of_day", serialize = "time-of-day")]
    TimeOfDay,
    /// Summer discount and winter premium.
    #[strum(to_string = "seasonal")]
    Seasonal,
    /// Time-of-day and seasonal combined, with ±5% hourly jitter.
    #[strum(to_string = "dynamic")]
    Dynamic,
}

/// Time-of-day multiplier for an hour of the year.
fn time_of_day_factor(hour: usize) -> f64 {
    let hod = hour_of_day(hour);
    if MIDDAY_HOURS.contains(&hod) {
        MIDDAY_FACTOR
    } else if EVENING_HOURS.contains(&hod) {
        EVENING_FACTOR
    } else {
        1.0
    }
}

/// Seasonal multiplier for an hour of the year.
fn seasonal_factor(hour: usize) -> f64 {
    let month = month_of_hour(hour);
    if SUMMER_MONTHS.contains(&month) {
        SUMMER_FACTOR
    } else if WINTER_MONTHS.contains(&month) {
        WINTER_FACTOR
    } else {
        1.0
    }
}

/// Generates an hourly export tariff (price per kWh) from a base price.
///
/// Only the `dynamic` profile draws from `rng`; the other shapes are fully
/// deterministic.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `base_price` is negative or not finite.
pub fn generate_export_tariff_profile(
    base_price: f64,
    profile_type: TariffProfile,
    rng: &mut StdRng,
) -> Result<HourlySeries, EngineError> {
    ensure_non_negative("export.base_price", base_price)?;

    let series = match profile_type {
        TariffProfile::Flat => HourlySeries::from_fn(|_| base_price),
        TariffProfile::TimeOfDay => HourlySeries::from_fn(|h| base_price * time_of_day_factor(h)),
        TariffProfile::Seasonal => HourlySeries::from_fn(|h| base_price * seasonal_factor(h)),
        TariffProfile::Dynamic => HourlySeries::from_fn(|h| {
            base_price
                * time_of_day_factor(h)
                * seasonal_factor(h)
                * uniform(rng, DYNAMIC_JITTER_LOW, DYNAMIC_JITTER_HIGH)
        }),
    };

    debug!(%profile_type, base_price, "generated export tariff");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::types::HOURS_PER_YEAR;
    use float_cmp::assert_approx_eq;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn flat_tariff_is_constant() {
        let tariff = generate_export_tariff_profile(0.20, TariffProfile::Flat, &mut rng()).unwrap();
        assert_eq!(tariff.len(), HOURS_PER_YEAR);
        assert!(tariff.iter().all(|&p| p == 0.20));
    }

    #[test]
    fn time_of_day_windows() {
        let tariff =
            generate_export_tariff_profile(0.10, TariffProfile::TimeOfDay, &mut rng()).unwrap();
        assert_approx_eq!(f64, tariff[8], 0.10);
        assert_approx_eq!(f64, tariff[9], 0.12);
        assert_approx_eq!(f64, tariff[14], 0.12);
        assert_approx_eq!(f64, tariff[15], 0.10);
        assert_approx_eq!(f64, tariff[18], 0.08);
        assert_approx_eq!(f64, tariff[20], 0.08);
        assert_approx_eq!(f64, tariff[21], 0.10);
        // Same pattern on a later day.
        assert_approx_eq!(f64, tariff[200 * 24 + 10], 0.12);
    }

    #[test]
    fn seasonal_months() {
        let tariff =
            generate_export_tariff_profile(0.10, TariffProfile::Seasonal, &mut rng()).unwrap();
        // Month 0 (winter), month 2 (shoulder), month 5 (summer), month 10 (winter).
        assert_approx_eq!(f64, tariff[0], 0.13);
        assert_approx_eq!(f64, tariff[2 * 730], 0.10);
        assert_approx_eq!(f64, tariff[4 * 730], 0.07);
        assert_approx_eq!(f64, tariff[7 * 730 + 729], 0.07);
        assert_approx_eq!(f64, tariff[8 * 730], 0.10);
        assert_approx_eq!(f64, tariff[10 * 730], 0.13);
    }

    #[test]
    fn dynamic_combines_factors_within_jitter() {
        let tariff =
            generate_export_tariff_profile(0.10, TariffProfile::Dynamic, &mut rng()).unwrap();
        for (h, &price) in tariff.iter().enumerate() {
            let expected = 0.10 * time_of_day_factor(h) * seasonal_factor(h);
            assert!(price >= expected * 0.95 - 1e-12 && price <= expected * 1.05 + 1e-12);
        }
    }

    #[test]
    fn negative_base_price_rejected() {
        let result = generate_export_tariff_profile(-0.01, TariffProfile::Flat, &mut rng());
        assert!(result.is_err());
    }

    #[test]
    fn parses_hyphenated_alias() {
        assert_eq!(
            "time-of-day".parse::<TariffProfile>().ok(),
            Some(TariffProfile::TimeOfDay)
        );
        assert_eq!(
            "time_of_day".parse::<TariffProfile>().ok(),
            Some(TariffProfile::TimeOfDay)
        );
        assert_eq!(TariffProfile::TimeOfDay.to_string(), "time_of_day");
    }

    #[test]
    fn unknown_profile_is_validation_error() {
        let err = crate::error::parse_selector::<TariffProfile>("export.profile_type", "hourly")
            .unwrap_err();
        assert!(err.to_string().contains("expected one of"));
    }
}
