//! Analyzers over a decoded [`DatImage`](crate::dat::DatImage)
//!
//! Phases come from the ring step tables, periods from the timing-plan
//! entries. Both are independent consumers of the same image; the plan and
//! cycle tables combine their output for reporting.

pub mod cycle_table;
pub mod periods;
pub mod phases;
pub mod plan_table;

// Re-export key types for convenience
pub use cycle_table::{CycleTable, PhaseColumn};
pub use periods::{Period, PeriodExtractor, SplitEncoding};
pub use phases::{Phase, PhaseAnalyzer, DEFAULT_YELLOW_S};
pub use plan_table::{PlanLevel, PlanTable, TimeOfDayEntry};
