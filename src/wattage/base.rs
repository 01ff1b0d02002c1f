//! Embedded and shared base overhead decomposition.

use super::curve::{is_on, step_wattage};
use super::table::WattageTable;
use super::types::{Channel, ChannelPercentages, PerChannel};

/// Shared overhead when green drives the shared circuit alone or with one partner.
const SHARED_BASE_GREEN_PAIR_W: f64 = 10.0;
/// Shared overhead for three channels including green.
const SHARED_BASE_GREEN_TRIO_W: f64 = 9.0;
/// Shared overhead with all four channels on.
const SHARED_BASE_ALL_W: f64 = 10.0;
/// Shared overhead for one to three channels without green.
const SHARED_BASE_DEFAULT_W: f64 = 9.0;

/// Per-channel raw wattage split into embedded base and step value.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Raw curve wattage per channel (0 when off).
    pub raw: PerChannel<f64>,
    /// Raw wattage minus embedded base per channel (0 when off).
    pub step: PerChannel<f64>,
    /// Whether each channel is on.
    pub active: PerChannel<bool>,
    /// Sum of embedded bases over active channels.
    pub embedded_base_sum: f64,
}

impl Decomposition {
    pub fn num_on(&self) -> usize {
        self.active.iter().filter(|(_, on)| *on).count()
    }

    pub fn step_sum(&self) -> f64 {
        self.step.iter().map(|(_, w)| w).sum()
    }

    pub fn raw_sum(&self) -> f64 {
        self.raw.iter().map(|(_, w)| w).sum()
    }

    pub fn shared_base(&self) -> f64 {
        shared_base(self.num_on(), self.active.green)
    }
}

/// Looks up every channel and separates out its embedded base.
pub fn decompose(channels: &ChannelPercentages, table: &WattageTable) -> Decomposition {
    let raw = channels.map(|c, pct| step_wattage(pct, table.curve(c)));
    let active = channels.map(|_, pct| is_on(pct));
    let step = raw.map(|c, w| {
        if active.get(c) {
            w - table.embedded_base(c)
        } else {
            0.0
        }
    });
    let embedded_base_sum = Channel::ALL
        .into_iter()
        .filter(|&c| active.get(c))
        .map(|c| table.embedded_base(c))
        .sum();

    Decomposition {
        raw,
        step,
        active,
        embedded_base_sum,
    }
}

/// Shared circuit overhead for `num_on` active channels.
///
/// Rules are checked in order and the first match wins, so green with all
/// four channels on falls through to the four-channel rule.
pub fn shared_base(num_on: usize, green_on: bool) -> f64 {
    match (num_on, green_on) {
        (0, _) => 0.0,
        (1..=2, true) => SHARED_BASE_GREEN_PAIR_W,
        (3, true) => SHARED_BASE_GREEN_TRIO_W,
        (4.., _) => SHARED_BASE_ALL_W,
        _ => SHARED_BASE_DEFAULT_W,
    }
}
