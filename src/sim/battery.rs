use serde::Serialize;

/// Energy movements of a single hour of dispatch (all values in kWh).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HourDispatch {
    /// Demand of the hour.
    pub demand: f64,
    /// PV generation of the hour.
    pub pv: f64,
    /// Wind generation of the hour.
    pub wind: f64,
    /// Generation consumed directly, `min(demand, pv + wind)`.
    pub direct_consumption: f64,
    /// PV share of `direct_consumption`.
    pub pv_direct: f64,
    /// Wind share of `direct_consumption`.
    pub wind_direct: f64,
    /// Surplus stored in the battery.
    pub battery_charge: f64,
    /// Deficit served from the battery.
    pub battery_discharge: f64,
    /// Remaining deficit bought from the grid.
    pub grid_import: f64,
    /// Remaining surplus sold to the grid.
    pub grid_export: f64,
    /// PV share of `grid_export`.
    pub pv_export: f64,
    /// Wind share of `grid_export`.
    pub wind_export: f64,
    /// Battery charge at the end of the hour.
    pub battery_level: f64,
}

impl HourDispatch {
    /// Total renewable generation of the hour.
    pub fn generation(&self) -> f64 {
        self.pv + self.wind
    }
}

/// A lossless battery dispatched greedily against the hourly net load.
///
/// Surplus generation charges the battery until full, deficits discharge it
/// until empty. Whatever the battery cannot absorb or deliver goes to or
/// comes from the grid. Charge always stays in `[0, capacity_kwh]`.
#[derive(Debug, Clone)]
pub struct BatteryDispatcher {
    /// Usable capacity in kilowatt-hours.
    capacity_kwh: f64,

    /// Stored energy in kilowatt-hours.
    charge_kwh: f64,
}

impl BatteryDispatcher {
    /// Creates an empty battery of `capacity_kwh`. Negative capacities act as zero.
    pub fn new(capacity_kwh: f64) -> Self {
        Self {
            capacity_kwh: capacity_kwh.max(0.0),
            charge_kwh: 0.0,
        }
    }

    /// Currently stored energy (kWh).
    pub fn charge_kwh(&self) -> f64 {
        self.charge_kwh
    }

    /// Dispatches one hour and advances the battery state.
    ///
    /// Direct consumption, self-consumption and export are attributed to PV
    /// and wind by each source's share of the hour's generation.
    pub fn step(&mut self, demand: f64, pv: f64, wind: f64) -> HourDispatch {
        let generation = pv + wind;
        let direct_consumption = demand.min(generation);
        let (pv_share, wind_share) = if generation > 0.0 {
            (pv / generation, wind / generation)
        } else {
            (0.0, 0.0)
        };

        let net_generation = generation - direct_consumption;
        let mut battery_discharge = 0.0;
        let mut grid_import = 0.0;
        let mut battery_charge = 0.0;
        let mut grid_export = 0.0;

        if demand > generation {
            let deficit = demand - generation;
            battery_discharge = self.charge_kwh.min(deficit);
            self.charge_kwh -= battery_discharge;
            grid_import = deficit - battery_discharge;
        }

        if net_generation > 0.0 {
            battery_charge = net_generation.min(self.capacity_kwh - self.charge_kwh);
            self.charge_kwh += battery_charge;
            grid_export = net_generation - battery_charge;
        }

        HourDispatch {
            demand,
            pv,
            wind,
            direct_consumption,
            pv_direct: direct_consumption * pv_share,
            wind_direct: direct_consumption * wind_share,
            battery_charge,
            battery_discharge,
            grid_import,
            grid_export,
            pv_export: grid_export * pv_share,
            wind_export: grid_export * wind_share,
            battery_level: self.charge_kwh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn surplus_charges_then_exports() {
        let mut battery = BatteryDispatcher::new(2.0);
        let hour = battery.step(1.0, 3.0, 1.0);
        assert_eq!(hour.direct_consumption, 1.0);
        assert_eq!(hour.battery_charge, 2.0);
        assert_eq!(hour.grid_export, 1.0);
        assert_eq!(hour.grid_import, 0.0);
        assert_eq!(battery.charge_kwh(), 2.0);
        // Export split 3:1 between PV and wind.
        assert_approx_eq!(f64, hour.pv_export, 0.75);
        assert_approx_eq!(f64, hour.wind_export, 0.25);
    }

    #[test]
    fn deficit_discharges_then_imports() {
        let mut battery = BatteryDispatcher::new(5.0);
        battery.step(0.0, 1.5, 0.0);
        let hour = battery.step(3.0, 0.5, 0.0);
        assert_eq!(hour.direct_consumption, 0.5);
        assert_eq!(hour.battery_discharge, 1.5);
        assert_eq!(hour.grid_import, 1.0);
        assert_eq!(hour.battery_charge, 0.0);
        assert_eq!(battery.charge_kwh(), 0.0);
    }

    #[test]
    fn zero_capacity_exports_everything() {
        let mut battery = BatteryDispatcher::new(0.0);
        let hour = battery.step(1.0, 4.0, 0.0);
        assert_eq!(hour.battery_charge, 0.0);
        assert_eq!(hour.grid_export, 3.0);
    }

    #[test]
    fn no_generation_attributes_nothing() {
        let mut battery = BatteryDispatcher::new(1.0);
        let hour = battery.step(2.0, 0.0, 0.0);
        assert_eq!(hour.pv_direct, 0.0);
        assert_eq!(hour.wind_direct, 0.0);
        assert_eq!(hour.grid_import, 2.0);
    }

    #[test]
    fn charge_never_exceeds_capacity() {
        let mut battery = BatteryDispatcher::new(3.0);
        for _ in 0..10 {
            let hour = battery.step(0.0, 1.0, 1.0);
            assert!(hour.battery_level <= 3.0);
        }
        assert_eq!(battery.charge_kwh(), 3.0);
    }

    #[test]
    fn balanced_hour_touches_nothing() {
        let mut battery = BatteryDispatcher::new(3.0);
        let hour = battery.step(2.0, 1.0, 1.0);
        assert_eq!(hour.battery_charge, 0.0);
        assert_eq!(hour.battery_discharge, 0.0);
        assert_eq!(hour.grid_import, 0.0);
        assert_eq!(hour.grid_export, 0.0);
    }
}
