//! Synthetic hourly profiles: demand, export tariff, PV and wind generation.

/// Demand profile generator.
pub mod load;
/// Solar PV generation model.
pub mod solar;
/// Export (feed-in) tariff generator.
pub mod tariff;
pub mod types;
/// Wind turbine generation model.
pub mod wind;

// Re-export the main types for convenience
pub use load::{LoadType, generate_load_profile};
pub use solar::{scale_pv_profile, simulate_pv_generation};
pub use tariff::{TariffProfile, generate_export_tariff_profile};
pub use types::{HOURS_PER_YEAR, HourlySeries};
pub use wind::simulate_wind_generation;
