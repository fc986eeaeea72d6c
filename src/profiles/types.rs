//! Common types and helpers shared by the profile generators.

use std::ops::Deref;

use rand::{Rng, rngs::StdRng};
use serde::Serialize;

use crate::error::EngineError;

/// Number of hourly values in one simulated year.
pub const HOURS_PER_YEAR: usize = 8760;

/// Hours per calendar-month bucket used by the seasonal tables (`8760 / 12`).
pub const HOURS_PER_MONTH: usize = 730;

/// An ordered sequence of exactly [`HOURS_PER_YEAR`] values, index 0 = hour 0.
///
/// The length invariant is enforced on construction. Caller-supplied arrays
/// of any other length are rejected, never truncated or padded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HourlySeries(Vec<f64>);

impl HourlySeries {
    /// Wraps caller-supplied values, validating the length.
    ///
    /// # Arguments
    ///
    /// * `field` - Name reported in the validation error (e.g. `"demand"`)
    /// * `values` - Hourly values, must contain exactly 8760 finite entries
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `values.len() != 8760` or any
    /// value is NaN or infinite. The message names the first offending hour.
    pub fn try_new(field: &str, values: Vec<f64>) -> Result<Self, EngineError> {
        if values.len() != HOURS_PER_YEAR {
            return Err(EngineError::validation(
                field,
                format!(
                    "expected {HOURS_PER_YEAR} hourly values, got {}",
                    values.len()
                ),
            ));
        }
        if let Some((hour, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::validation(
                field,
                format!("hour {hour}: must be finite, got {value}"),
            ));
        }
        Ok(Self(values))
    }

    /// Like [`HourlySeries::try_new`], but also rejects negative values.
    ///
    /// Used for energy series (demand and generation); prices may be signed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for a wrong length, a non-finite
    /// value or a value below zero.
    pub fn try_new_non_negative(field: &str, values: Vec<f64>) -> Result<Self, EngineError> {
        let series = Self::try_new(field, values)?;
        if let Some((hour, value)) = series.iter().enumerate().find(|(_, v)| **v < 0.0) {
            return Err(EngineError::validation(
                field,
                format!("hour {hour}: must be >= 0, got {value}"),
            ));
        }
        Ok(series)
    }

    /// Builds a series by evaluating `f` for every hour of the year in order.
    pub(crate) fn from_fn(f: impl FnMut(usize) -> f64) -> Self {
        Self((0..HOURS_PER_YEAR).map(f).collect())
    }

    /// A series of zeros.
    pub fn zeros() -> Self {
        Self(vec![0.0; HOURS_PER_YEAR])
    }

    /// Sum over all hours.
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Returns a copy with every value multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self(self.0.iter().map(|v| v * factor).collect())
    }

    /// Consumes the series, returning the raw values.
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for HourlySeries {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for HourlySeries {
    type Error = EngineError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::try_new("profile", values)
    }
}

/// Zero-based month bucket of an hour index (`floor(hour / 730)`).
pub fn month_of_hour(hour: usize) -> usize {
    (hour / HOURS_PER_MONTH).min(11)
}

/// Hour of the day (0..24) of an hour index.
pub fn hour_of_day(hour: usize) -> usize {
    hour % 24
}

/// Zero-based day of the year of an hour index.
pub fn day_of_year(hour: usize) -> usize {
    hour / 24
}

/// Draws a uniform multiplier from `[low, high)`.
pub fn uniform(rng: &mut StdRng, low: f64, high: f64) -> f64 {
    low + rng.random::<f64>() * (high - low)
}
