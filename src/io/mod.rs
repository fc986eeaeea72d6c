/// Cash-flow and sample-day CSV export.
pub mod export;
/// Hourly profile CSV import.
pub mod import;

pub use import::{ProfileImportError, read_profile_csv};
