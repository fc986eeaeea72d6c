//! Property tests for dispatch invariants and profile generators.

mod common;

use hybrid_sizer::profiles::{
    LoadType, TariffProfile, generate_export_tariff_profile, generate_load_profile,
    simulate_wind_generation,
};
use hybrid_sizer::sim::battery::BatteryDispatcher;
use hybrid_sizer::sim::simulate_energy_flow;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn load_type() -> impl Strategy<Value = LoadType> {
    prop_oneof![
        Just(LoadType::Residential),
        Just(LoadType::Commercial),
        Just(LoadType::Mixed),
    ]
}

proptest! {
    #[test]
    fn every_hour_balances(
        capacity in 0.0f64..20.0,
        hours in prop::collection::vec((0.0f64..10.0, 0.0f64..10.0, 0.0f64..10.0), 1..200),
    ) {
        let mut battery = BatteryDispatcher::new(capacity);
        for (demand, pv, wind) in hours {
            let step = battery.step(demand, pv, wind);
            let supply = step.direct_consumption + step.battery_charge + step.grid_export;
            let served = step.direct_consumption + step.battery_discharge + step.grid_import;
            prop_assert!((step.generation() - supply).abs() < 1e-6);
            prop_assert!((step.demand - served).abs() < 1e-6);
            prop_assert!(step.battery_level >= 0.0);
            prop_assert!(step.battery_level <= capacity + 1e-9);
            prop_assert!(step.grid_import >= 0.0 && step.grid_export >= 0.0);
            prop_assert!(step.grid_import == 0.0 || step.grid_export == 0.0);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn load_profile_keeps_annual_total(
        annual in 1.0f64..1.0e6,
        load_type in load_type(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let profile = generate_load_profile(annual, load_type, &mut rng).unwrap();
        prop_assert_eq!(profile.len(), 8760);
        prop_assert!(((profile.sum() - annual) / annual).abs() < 1e-6);
        prop_assert!(profile.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn flat_tariff_is_constant(base in 0.0f64..1.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let tariff = generate_export_tariff_profile(base, TariffProfile::Flat, &mut rng).unwrap();
        prop_assert!(tariff.iter().all(|&p| p == base));
    }

    #[test]
    fn custom_wind_sums_to_full_load_hours(
        rating in 0.1f64..50.0,
        scale in 0.01f64..100.0,
        period in 2usize..48,
    ) {
        let shape = common::series(|h| scale * ((h % period) as f64 + 0.5));
        let mut rng = StdRng::seed_from_u64(0);
        let wind = simulate_wind_generation(rating, Some(&shape), &mut rng).unwrap();
        let expected = rating * 8760.0;
        prop_assert!(((wind.sum() - expected) / expected).abs() < 1e-9);
    }

    #[test]
    fn ratios_stay_in_unit_interval(
        demand in 0.0f64..5.0,
        pv_peak in 0.0f64..8.0,
        wind in 0.0f64..3.0,
        battery in 0.0f64..20.0,
    ) {
        let demand = common::constant_series(demand);
        let pv = common::series(|h| if (8..16).contains(&(h % 24)) { pv_peak } else { 0.0 });
        let wind = common::constant_series(wind);
        let flow = simulate_energy_flow(&demand, &pv, &wind, battery).unwrap();
        for ratio in [
            flow.self_consumption_ratio,
            flow.self_sufficiency_ratio,
            flow.pv_self_consumption_ratio,
            flow.wind_self_consumption_ratio,
            flow.pv_export_ratio,
            flow.wind_export_ratio,
        ] {
            prop_assert!((0.0..=1.0).contains(&ratio), "ratio {}", ratio);
        }
    }
}
