//! Wattage estimation: aggregation, display redistribution, and power limiting.
//!
//! Every function here is pure. A [`WattageTable`] is read-only after load,
//! so one table can serve any number of concurrent callers.

use tracing::trace;

use super::base::{Decomposition, decompose};
use super::table::WattageTable;
use super::types::{Channel, ChannelPercentages, ChannelWattages, WattageCalculationResult};

/// Hardware power ceiling of the fixture (W), independent of any table.
pub const POWER_CEILING_W: f64 = 138.0;

/// Estimates the fixture's real power draw for the requested channel levels.
///
/// Out-of-range percentages are not errors: anything below 1% turns the
/// channel off and anything above the curve's top threshold clamps to it.
///
/// # Examples
///
/// ```
/// use fixture_wattage::config::FixtureConfig;
/// use fixture_wattage::wattage::engine::compute_wattage;
/// use fixture_wattage::wattage::types::ChannelPercentages;
///
/// let table = FixtureConfig::wrgb2_pro().build_table().unwrap();
/// let off = compute_wattage(&ChannelPercentages::uniform(0.0), &table);
/// assert_eq!(off.total_wattage, 0.0);
/// assert!(!off.power_limited);
/// ```
pub fn compute_wattage(
    channels: &ChannelPercentages,
    table: &WattageTable,
) -> WattageCalculationResult {
    let parts = decompose(channels, table);
    let step_sum = parts.step_sum();
    let shared_base = parts.shared_base();
    let requested_wattage = step_sum + shared_base;

    let display = redistribute(requested_wattage, &parts);
    let (channel_wattages, total_wattage, power_limited) = limit(requested_wattage, display);

    trace!(
        requested_wattage,
        total_wattage,
        power_limited,
        "computed fixture wattage"
    );

    WattageCalculationResult {
        total_wattage,
        channel_wattages,
        step_sum,
        embedded_base_sum: parts.embedded_base_sum,
        shared_base,
        requested_wattage,
        power_limited,
        efficiency: efficiency(total_wattage),
    }
}

/// Splits `requested` across channels in proportion to their raw wattage.
///
/// Each share is rounded on its own, so the shares may not add back up to
/// `requested` exactly.
fn redistribute(requested: f64, parts: &Decomposition) -> ChannelWattages {
    let raw_sum = parts.raw_sum();
    if raw_sum <= 0.0 {
        return ChannelWattages::uniform(0.0);
    }
    parts.raw.map(|_, w| (requested * w / raw_sum).round())
}

/// Applies the hardware ceiling to the display breakdown.
///
/// Returns `(channel_wattages, total_wattage, power_limited)`. Under the
/// ceiling the total is the requested wattage itself; over it, the total is
/// the sum of the rescaled channels. Rounding can leave that sum slightly
/// under the ceiling, but never over it.
fn limit(requested: f64, display: ChannelWattages) -> (ChannelWattages, f64, bool) {
    if requested <= POWER_CEILING_W {
        return (display, requested, false);
    }

    let scale = POWER_CEILING_W / requested;
    let mut scaled = display.map(|_, w| (w * scale).round());
    trim_to_ceiling(&mut scaled);
    let total = scaled.iter().map(|(_, w)| w).sum();
    (scaled, total, true)
}

/// Takes rounding overshoot off the largest channels, a watt at a time,
/// until the channels sum to at most the ceiling.
///
/// Ties go to the channel that comes first in device order.
fn trim_to_ceiling(channels: &mut ChannelWattages) {
    let mut overshoot = channels.iter().map(|(_, w)| w).sum::<f64>() - POWER_CEILING_W;
    while overshoot > 0.0 {
        let largest = channels
            .iter()
            .fold(None, |best: Option<(Channel, f64)>, (c, w)| match best {
                Some((_, top)) if top >= w => best,
                _ => Some((c, w)),
            });
        let Some((channel, watts)) = largest else {
            return;
        };
        if watts <= 0.0 {
            return;
        }
        let cut = overshoot.min(1.0).min(watts);
        channels.set(channel, watts - cut);
        overshoot -= cut;
    }
}

/// `total` as a rounded percentage of the ceiling.
fn efficiency(total: f64) -> u8 {
    (total / POWER_CEILING_W * 100.0).round() as u8
}

/// The enforced power ceiling (W).
pub fn max_wattage() -> f64 {
    POWER_CEILING_W
}

/// Sum of each channel's highest tabulated wattage; never enforced.
pub fn theoretical_max_wattage(table: &WattageTable) -> f64 {
    table.theoretical_max_wattage()
}

/// Display string for a wattage, e.g. `"138W"`.
pub fn format_wattage(watts: f64) -> String {
    format!("{watts}W")
}
