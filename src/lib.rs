//! Sizing engine for hybrid PV + wind + battery systems.

pub mod cli;
pub mod config;
pub mod error;
/// CSV profile import and report export.
pub mod io;
pub mod planner;
/// Synthetic demand, tariff and generation profiles.
pub mod profiles;
pub mod runner;
/// Energy dispatch, financial model and grid-search optimizer.
pub mod sim;

pub use error::EngineError;
pub use planner::Planner;
