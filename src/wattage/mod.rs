//! Wattage estimation engine: step lookup, base decomposition,
//! redistribution, and power limiting.

pub mod base;
/// Calibration curves and floor lookup.
pub mod curve;
pub mod engine;
/// Per-fixture calibration tables.
pub mod table;
pub mod types;

pub use curve::{ChannelWattageCurve, StepPoint, step_wattage};
pub use engine::{
    POWER_CEILING_W, compute_wattage, format_wattage, max_wattage, theoretical_max_wattage,
};
pub use table::{ChannelProfile, WattageTable};
pub use types::{
    Channel, ChannelPercentages, ChannelWattages, PerChannel, WattageCalculationResult,
};
