//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use fixture_wattage::config::FixtureConfig;
use fixture_wattage::wattage::{ChannelPercentages, WattageCalculationResult, WattageTable};

/// The default WRGB II Pro table (embedded bases 9/10/9/9, 180W theoretical max).
pub fn pro_table() -> WattageTable {
    FixtureConfig::wrgb2_pro()
        .build_table()
        .expect("wrgb2_pro preset should build")
}

/// The WRGB II Slim table (104W theoretical max, never power-limited).
pub fn slim_table() -> WattageTable {
    FixtureConfig::wrgb2_slim()
        .build_table()
        .expect("wrgb2_slim preset should build")
}

/// Path of a shipped fixture file, relative to the crate root.
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Shorthand for `ChannelPercentages::new`.
pub fn pct(red: f64, green: f64, blue: f64, white: f64) -> ChannelPercentages {
    ChannelPercentages::new(red, green, blue, white)
}

/// Number of channels at or above 1%.
pub fn active_count(channels: &ChannelPercentages) -> usize {
    channels.iter().filter(|(_, v)| *v >= 1.0).count()
}

/// Asserts the result invariants that hold for every input.
pub fn assert_invariants(channels: &ChannelPercentages, r: &WattageCalculationResult) {
    assert!(
        r.total_wattage <= 138.0,
        "total {} exceeds ceiling",
        r.total_wattage
    );
    assert_eq!(r.power_limited, r.requested_wattage > 138.0);
    assert_eq!(
        f64::from(r.efficiency),
        (r.total_wattage / 138.0 * 100.0).round()
    );
    let tolerance = active_count(channels).saturating_sub(1) as f64;
    assert!(
        (r.channel_sum() - r.total_wattage).abs() <= tolerance,
        "channel sum {} drifted from total {} by more than {tolerance}",
        r.channel_sum(),
        r.total_wattage
    );
}
