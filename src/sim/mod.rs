/// Lossless battery and the single-hour dispatch step.
pub mod battery;
/// Summer and winter sample-day profiles.
pub mod daily;
pub mod energy_flow;
pub mod finance;
pub mod optimizer;
pub mod report;
pub mod types;

pub use energy_flow::{simulate_energy_flow, trace_energy_flow};
pub use finance::{FinancialResult, calculate_npv};
pub use optimizer::{Objective, OptimizerOptions, ScenarioInputs, optimize, simulate};
pub use report::{PlanningReport, RunMode};
pub use types::{
    CashFlowYear, CostParameters, EnergyFlowResult, OptimizedDesign, SizingBounds, SystemSizing,
};
