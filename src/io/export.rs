//! CSV export for cash-flow tables and sample-day profiles.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::CashFlowYear;
use crate::sim::daily::DailyProfile;

/// Column header of the cash-flow export.
const CASH_FLOW_HEADER: &str = "year,grid_savings,feed_in_revenue,operational_costs,\
                                battery_replacement,cash_flow,discounted_cash_flow,cumulative_npv";

/// Column header of the sample-day export.
const DAILY_HEADER: &str = "season,hour,hour_of_year,demand_kwh,pv_kwh,wind_kwh,\
                            battery_level_kwh,grid_import_kwh,grid_export_kwh,export_tariff";

/// Exports the cash-flow table to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_cash_flow_csv(rows: &[CashFlowYear], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_cash_flow_csv(rows, io::BufWriter::new(file))
}

/// Writes the cash-flow table as CSV to any writer.
///
/// One row per project year. Money columns use two decimals, so identical
/// inputs always produce identical bytes.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_cash_flow_csv(rows: &[CashFlowYear], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(CASH_FLOW_HEADER.split(',').map(str::trim))?;

    for r in rows {
        wtr.write_record(&[
            r.year.to_string(),
            format!("{:.2}", r.grid_savings),
            format!("{:.2}", r.feed_in_revenue),
            format!("{:.2}", r.operational_costs),
            format!("{:.2}", r.battery_replacement),
            format!("{:.2}", r.cash_flow),
            format!("{:.2}", r.discounted_cash_flow),
            format!("{:.2}", r.cumulative_npv),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports sample-day profiles to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_daily_csv(profiles: &[DailyProfile], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_daily_csv(profiles, io::BufWriter::new(file))
}

/// Writes sample-day profiles as CSV, one row per hour, profiles back to back.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_daily_csv(profiles: &[DailyProfile], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(DAILY_HEADER.split(',').map(str::trim))?;

    for profile in profiles {
        for h in &profile.hours {
            wtr.write_record(&[
                profile.season.to_string(),
                h.hour.to_string(),
                (profile.start_hour + h.hour).to_string(),
                format!("{:.4}", h.demand),
                format!("{:.4}", h.pv),
                format!("{:.4}", h.wind),
                format!("{:.4}", h.battery_level),
                format!("{:.4}", h.grid_import),
                format!("{:.4}", h.grid_export),
                format!("{:.4}", h.export_tariff),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
