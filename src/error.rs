//! Load-time errors for wattage tables.
//!
//! The estimation engine itself is infallible; everything that can go wrong
//! is caught here, when a table is built.

use thiserror::Error;

use crate::wattage::types::Channel;

/// A step curve that cannot be used for floor lookups.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("curve has no steps")]
    Empty,
    #[error("step {index} has a non-finite value")]
    NonFinite { index: usize },
    #[error("step {index} threshold {threshold}% is not above the previous threshold {previous}%")]
    ThresholdNotIncreasing {
        index: usize,
        threshold: f64,
        previous: f64,
    },
    #[error("step {index} wattage {watts}W is below the previous wattage {previous}W")]
    WattageDecreasing {
        index: usize,
        watts: f64,
        previous: f64,
    },
    #[error("step {index} wattage {watts}W is not positive")]
    NonPositiveWattage { index: usize, watts: f64 },
    #[error("step {index} wattage {watts}W is not a whole number of watts")]
    FractionalWattage { index: usize, watts: f64 },
    #[error("last threshold {last}% does not reach {required}%")]
    InsufficientCoverage { last: f64, required: f64 },
}

/// A fixture table that failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("{channel} curve: {source}")]
    Curve {
        channel: Channel,
        #[source]
        source: CurveError,
    },
    #[error("{channel} embedded base {base}W must be a non-negative whole number of watts")]
    InvalidEmbeddedBase { channel: Channel, base: f64 },
    #[error("{channel} embedded base {base}W exceeds the lowest step wattage {lowest}W")]
    EmbeddedBaseAboveCurve {
        channel: Channel,
        base: f64,
        lowest: f64,
    },
    /// With `channels` on at full boost the fixture would request more than
    /// the table's theoretical maximum.
    #[error(
        "shared base {shared_base}W for {channels} exceeds the {available}W left by their embedded bases and the other channels' top steps"
    )]
    SharedBaseUncovered {
        channels: String,
        shared_base: f64,
        available: f64,
    },
}

impl TableError {
    /// The channel the error refers to, if it concerns a single channel.
    pub fn channel(&self) -> Option<Channel> {
        match self {
            TableError::Curve { channel, .. }
            | TableError::InvalidEmbeddedBase { channel, .. }
            | TableError::EmbeddedBaseAboveCurve { channel, .. } => Some(*channel),
            TableError::SharedBaseUncovered { .. } => None,
        }
    }
}
