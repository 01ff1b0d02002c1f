//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::wattage::table::WattageTable;
use crate::wattage::types::{ChannelPercentages, WattageCalculationResult};

/// Fixture summary returned by `GET /fixture`.
#[derive(Debug, Serialize)]
pub struct FixtureResponse {
    /// Enforced hardware ceiling (W).
    pub max_wattage: f64,
    /// Sum of per-channel curve maxima (W); informational.
    pub theoretical_max_wattage: f64,
    /// Full calibration table.
    pub table: WattageTable,
}

/// Estimate plus its display string.
#[derive(Debug, Serialize)]
pub struct WattageResponse {
    #[serde(flatten)]
    pub result: WattageCalculationResult,
    /// `total_wattage` formatted for display, e.g. `"68W"`.
    pub display: String,
}

/// Channel levels for `GET /wattage`; missing channels are off.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WattageQuery {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub white: f64,
}

impl From<WattageQuery> for ChannelPercentages {
    fn from(q: WattageQuery) -> Self {
        ChannelPercentages::new(q.red, q.green, q.blue, q.white)
    }
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
