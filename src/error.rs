//! Error types raised by the sizing engine.

use std::str::FromStr;

use strum::VariantNames;
use thiserror::Error;

/// Errors returned by the engine before or instead of running a simulation.
///
/// Every variant is raised synchronously and means nothing was computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// An input parameter or hourly array failed validation.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending parameter (e.g. `"costs.discount_rate"`).
        field: String,
        /// Human-readable constraint description.
        message: String,
    },

    /// A required profile has neither been generated nor supplied yet.
    #[error("{0} profile has not been generated or supplied")]
    NotReady(&'static str),
}

impl EngineError {
    /// Shorthand for building a [`EngineError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Checks that `value` is finite and non-negative.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() {
        return Err(EngineError::validation(field, format!("must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(EngineError::validation(field, format!("must be >= 0, got {value}")));
    }
    Ok(())
}

/// Parses a string selector (load type, tariff profile, objective) into its enum.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] listing the accepted values if `value`
/// names no variant.
pub fn parse_selector<T>(field: &str, value: &str) -> Result<T, EngineError>
where
    T: FromStr + VariantNames,
{
    value.parse::<T>().map_err(|_| {
        EngineError::validation(
            field,
            format!(
                "unknown value \"{value}\", expected one of: {}",
                T::VARIANTS.join(", ")
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_field() {
        let err = EngineError::validation("sizing.pv_kwp", "must be >= 0");
        assert_eq!(err.to_string(), "invalid sizing.pv_kwp: must be >= 0");
    }

    #[test]
    fn not_ready_message() {
        let err = EngineError::NotReady("demand");
        assert_eq!(err.to_string(), "demand profile has not been generated or supplied");
    }

    #[test]
    fn non_negative_check() {
        assert!(ensure_non_negative("x", 0.0).is_ok());
        assert!(ensure_non_negative("x", 3.5).is_ok());
        assert!(ensure_non_negative("x", -0.1).is_err());
        assert!(ensure_non_negative("x", f64::NAN).is_err());
        assert!(ensure_non_negative("x", f64::INFINITY).is_err());
    }
}
