//! Per-channel calibration curves and floor lookup.

use serde::Serialize;

use crate::error::CurveError;

/// Percentages below this turn a channel off.
pub const CHANNEL_ON_THRESHOLD_PCT: f64 = 1.0;

/// Highest brightness the device accepts, including boost headroom.
pub const BOOST_MAX_PCT: f64 = 140.0;

/// One calibrated point: the wattage measured from `percent` upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepPoint {
    pub percent: f64,
    pub watts: f64,
}

impl StepPoint {
    pub const fn new(percent: f64, watts: f64) -> Self {
        Self { percent, watts }
    }
}

impl From<(f64, f64)> for StepPoint {
    fn from((percent, watts): (f64, f64)) -> Self {
        Self { percent, watts }
    }
}

/// Stair-step wattage curve for one channel.
///
/// Thresholds are strictly increasing, wattages whole, positive and
/// non-decreasing, and the last threshold reaches [`BOOST_MAX_PCT`]. These
/// hold by construction; there is no way to build an unchecked curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChannelWattageCurve {
    points: Vec<StepPoint>,
}

impl ChannelWattageCurve {
    /// Validates and wraps a list of calibration points.
    ///
    /// # Errors
    ///
    /// Returns a `CurveError` describing the first offending step.
    pub fn new(points: Vec<StepPoint>) -> Result<Self, CurveError> {
        if points.is_empty() {
            return Err(CurveError::Empty);
        }

        for (index, p) in points.iter().enumerate() {
            if !p.percent.is_finite() || !p.watts.is_finite() {
                return Err(CurveError::NonFinite { index });
            }
            if p.watts <= 0.0 {
                return Err(CurveError::NonPositiveWattage {
                    index,
                    watts: p.watts,
                });
            }
            if p.watts.fract() != 0.0 {
                return Err(CurveError::FractionalWattage {
                    index,
                    watts: p.watts,
                });
            }
            if index == 0 {
                continue;
            }
            let prev = points[index - 1];
            if p.percent <= prev.percent {
                return Err(CurveError::ThresholdNotIncreasing {
                    index,
                    threshold: p.percent,
                    previous: prev.percent,
                });
            }
            if p.watts < prev.watts {
                return Err(CurveError::WattageDecreasing {
                    index,
                    watts: p.watts,
                    previous: prev.watts,
                });
            }
        }

        let last = points[points.len() - 1].percent;
        if last < BOOST_MAX_PCT {
            return Err(CurveError::InsufficientCoverage {
                last,
                required: BOOST_MAX_PCT,
            });
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[StepPoint] {
        &self.points
    }

    /// Wattage of the lowest step.
    pub fn min_watts(&self) -> f64 {
        self.points[0].watts
    }

    /// Wattage of the highest step.
    pub fn max_watts(&self) -> f64 {
        self.points[self.points.len() - 1].watts
    }

    /// Floor lookup: wattage of the greatest threshold `<= percentage`.
    ///
    /// Below the first threshold the first entry applies, above the last
    /// threshold the last entry applies. Callers handle the off case.
    pub fn floor_watts(&self, percentage: f64) -> f64 {
        // Thresholds are sorted, so the partition point is the count of
        // thresholds at or below `percentage`.
        let idx = self.points.partition_point(|p| p.percent <= percentage);
        self.points[idx.saturating_sub(1)].watts
    }
}

/// Raw wattage for one channel at `percentage`, including its embedded base.
///
/// Returns 0 when the channel is off (`percentage < 1`, or NaN).
pub fn step_wattage(percentage: f64, curve: &ChannelWattageCurve) -> f64 {
    if !is_on(percentage) {
        return 0.0;
    }
    curve.floor_watts(percentage)
}

/// Whether a requested percentage turns the channel on.
pub fn is_on(percentage: f64) -> bool {
    percentage >= CHANNEL_ON_THRESHOLD_PCT
}
