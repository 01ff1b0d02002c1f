//! Calibration sweeps over channel settings and their summary report.

use std::fmt;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::wattage::curve::BOOST_MAX_PCT;
use crate::wattage::engine::compute_wattage;
use crate::wattage::table::WattageTable;
use crate::wattage::types::{Channel, ChannelPercentages, WattageCalculationResult};

/// Smallest ramp increment (%); bounds a ramp to 14,001 points.
pub const MIN_RAMP_STEP_PCT: f64 = 0.01;

/// Which channel settings a sweep evaluates.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepPlan {
    /// Walks 0 to 140% in `step_pct` increments. `channel: None` drives all
    /// four channels together; otherwise only that channel is on.
    Ramp {
        channel: Option<Channel>,
        step_pct: f64,
    },
    /// Independent uniform draws in 0-140% per channel from a seeded RNG.
    Random { samples: usize, seed: u64 },
}

/// One evaluated point of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub index: usize,
    pub channels: ChannelPercentages,
    pub result: WattageCalculationResult,
}

/// Evaluates every point of `plan` against `table`.
///
/// # Panics
///
/// Panics if a ramp's `step_pct` is not finite or is below
/// [`MIN_RAMP_STEP_PCT`].
pub fn run_sweep(table: &WattageTable, plan: &SweepPlan) -> Vec<SweepRow> {
    let inputs = match plan {
        SweepPlan::Ramp { channel, step_pct } => ramp_inputs(*channel, *step_pct),
        SweepPlan::Random { samples, seed } => random_inputs(*samples, *seed),
    };

    let rows: Vec<SweepRow> = inputs
        .into_iter()
        .enumerate()
        .map(|(index, channels)| SweepRow {
            index,
            channels,
            result: compute_wattage(&channels, table),
        })
        .collect();

    debug!(fixture = table.name(), points = rows.len(), "sweep finished");
    rows
}

fn ramp_inputs(channel: Option<Channel>, step_pct: f64) -> Vec<ChannelPercentages> {
    assert!(
        step_pct.is_finite() && step_pct >= MIN_RAMP_STEP_PCT,
        "ramp step must be at least {MIN_RAMP_STEP_PCT}%"
    );

    let below_top = (BOOST_MAX_PCT / step_pct).ceil() as usize;
    (0..below_top)
        .map(|i| i as f64 * step_pct)
        .take_while(|level| *level < BOOST_MAX_PCT)
        .chain(std::iter::once(BOOST_MAX_PCT))
        .map(|level| match channel {
            None => ChannelPercentages::uniform(level),
            Some(c) => {
                let mut pct = ChannelPercentages::uniform(0.0);
                pct.set(c, level);
                pct
            }
        })
        .collect()
}

fn random_inputs(samples: usize, seed: u64) -> Vec<ChannelPercentages> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..samples)
        .map(|_| ChannelPercentages::from_fn(|_| rng.random_range(0.0..=BOOST_MAX_PCT)))
        .collect()
}

/// Aggregate figures over a complete sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    /// Number of evaluated points.
    pub samples: usize,
    /// Points whose requested wattage exceeded the ceiling.
    pub power_limited_count: usize,
    /// Highest uncapped estimate (W).
    pub peak_requested_w: f64,
    /// Highest delivered wattage (W).
    pub peak_total_w: f64,
    /// Mean efficiency over all points (%).
    pub mean_efficiency_pct: f64,
    /// Largest |sum of channel wattages - total| seen (W).
    pub max_redistribution_drift_w: f64,
}

impl SweepReport {
    /// Computes the report from the complete row set.
    pub fn from_rows(rows: &[SweepRow]) -> Self {
        if rows.is_empty() {
            return Self {
                samples: 0,
                power_limited_count: 0,
                peak_requested_w: 0.0,
                peak_total_w: 0.0,
                mean_efficiency_pct: 0.0,
                max_redistribution_drift_w: 0.0,
            };
        }

        let mut limited = 0_usize;
        let mut peak_requested = 0.0_f64;
        let mut peak_total = 0.0_f64;
        let mut efficiency_sum = 0.0_f64;
        let mut drift = 0.0_f64;

        for row in rows {
            let r = &row.result;
            if r.power_limited {
                limited += 1;
            }
            peak_requested = peak_requested.max(r.requested_wattage);
            peak_total = peak_total.max(r.total_wattage);
            efficiency_sum += f64::from(r.efficiency);
            drift = drift.max((r.channel_sum() - r.total_wattage).abs());
        }

        Self {
            samples: rows.len(),
            power_limited_count: limited,
            peak_requested_w: peak_requested,
            peak_total_w: peak_total,
            mean_efficiency_pct: efficiency_sum / rows.len() as f64,
            max_redistribution_drift_w: drift,
        }
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Sweep Report ---")?;
        writeln!(f, "Samples:               {}", self.samples)?;
        writeln!(f, "Power limited:         {}", self.power_limited_count)?;
        writeln!(f, "Peak requested:        {:.1} W", self.peak_requested_w)?;
        writeln!(f, "Peak delivered:        {:.1} W", self.peak_total_w)?;
        writeln!(f, "Mean efficiency:       {:.1}%", self.mean_efficiency_pct)?;
        write!(
            f,
            "Max rounding drift:    {:.1} W",
            self.max_redistribution_drift_w
        )
    }
}
