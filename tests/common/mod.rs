//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use hybrid_sizer::Planner;
use hybrid_sizer::profiles::{HourlySeries, LoadType, TariffProfile};
use hybrid_sizer::sim::{OptimizerOptions, SizingBounds};

/// Default master seed.
pub const SEED: u64 = 42;

/// Planner with a 4 MWh residential load and a flat 0.08 export tariff.
pub fn residential_planner(seed: u64) -> Planner {
    let mut planner = Planner::new(seed);
    planner
        .generate_load_profile(4000.0, LoadType::Residential)
        .expect("load profile should generate");
    planner
        .generate_export_tariff(0.08, TariffProfile::Flat)
        .expect("tariff should generate");
    planner
}

/// Planner with a 12 MWh mixed load and a dynamic export tariff.
pub fn mixed_dynamic_planner(seed: u64) -> Planner {
    let mut planner = Planner::new(seed);
    planner
        .generate_load_profile(12_000.0, LoadType::Mixed)
        .expect("load profile should generate");
    planner
        .generate_export_tariff(0.09, TariffProfile::Dynamic)
        .expect("tariff should generate");
    planner
}

/// A full year with the same value every hour.
pub fn constant_series(value: f64) -> HourlySeries {
    HourlySeries::try_new("test", vec![value; 8760]).expect("8760 values")
}

/// A full year built from an hour-of-year function.
pub fn series(f: impl FnMut(usize) -> f64) -> HourlySeries {
    HourlySeries::try_new("test", (0..8760).map(f).collect()).expect("8760 values")
}

/// Search bounds scaled by `max`.
pub fn bounds(max: f64) -> SizingBounds {
    SizingBounds {
        max_pv_kwp: max,
        max_wind_kw: max / 2.0,
        max_battery_kwh: max,
    }
}

/// Coarse search options.
pub fn options(step_count: usize, parallel: bool) -> OptimizerOptions {
    OptimizerOptions {
        step_count,
        parallel,
    }
}
