//! Signal Timing Library
//!
//! A stateless, reusable library for decoding traffic-signal controller memory
//! images ("DAT" files) and for optimizing green-wave offsets along a corridor.
//!
//! # Architecture
//!
//! The library has two independent engines:
//! - The DAT decoder reads the fixed-offset binary layout into a [`DatImage`],
//!   reconstructs phases from the ring step tables, extracts time-of-day
//!   periods and classifies the controller vendor
//! - The offset optimizer searches offset assignments for a list of
//!   intersections and ranks them by forward, reverse and balanced bandwidth
//!
//! The library does NOT:
//! - Store intersections or DAT files
//! - Render phase diagrams or vehicle trajectories
//! - Fill spreadsheet templates
//!
//! All of that is left to the application layer (signal-timing-cli or a web
//! front end).
//!
//! # Example Usage
//!
//! ```no_run
//! use signal_timing::{DatDecoder, Intersection, OffsetOptimizer};
//! use std::path::Path;
//!
//! // Decode a controller image
//! let summary = DatDecoder::decode_file(Path::new("intersection.dat")).unwrap();
//! println!("{}: {} phases", summary.manufacturer, summary.phase_count);
//!
//! // Optimize a corridor at 40 km/h
//! let corridor = vec![
//!     Intersection::new(1, "A", 160, 0, 120.0, 0.0),
//!     Intersection::new(2, "B", 160, 0, 80.0, 214.0),
//! ];
//! let result = OffsetOptimizer::new().optimize(&corridor, 40.0).unwrap();
//! for scenario in &result.scenarios {
//!     println!("{}: {:?}", scenario.kind, scenario.items.first());
//! }
//! ```

// Public modules
pub mod analysis;
pub mod config;
pub mod dat;
pub mod decoder;
pub mod optimizer;
pub mod types;

// Re-export main types for convenience
pub use analysis::{CycleTable, Period, PeriodExtractor, Phase, PhaseAnalyzer, PlanLevel, PlanTable};
pub use config::OptimizerConfig;
pub use dat::{DatFormat, DatImage, DatReader, FormatDetector, FormatInfo, Manufacturer, ManufacturerDetector};
pub use decoder::{DatDecoder, DatSummary};
pub use optimizer::{
    signal_state, Intersection, Light, OffsetCandidate, OffsetOptimizer, OptimizationResult,
    RankedCandidate, Scenario, ScenarioKind, SignalState,
};
pub use types::{Movement, Result, SignalCode, SignalTimingError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
