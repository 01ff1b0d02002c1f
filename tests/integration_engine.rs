//! Integration tests for wattage estimation against the shipped fixtures.

mod common;

use common::{assert_invariants, pct, pro_table, slim_table};
use fixture_wattage::config::FixtureConfig;
use fixture_wattage::wattage::{
    Channel, ChannelWattages, compute_wattage, format_wattage, max_wattage,
    theoretical_max_wattage,
};

#[test]
fn all_channels_off() {
    let channels = pct(0.0, 0.0, 0.0, 0.0);
    let r = compute_wattage(&channels, &pro_table());
    assert_eq!(r.total_wattage, 0.0);
    assert!(!r.power_limited);
    assert_eq!(r.efficiency, 0);
    assert_eq!(r.channel_wattages, ChannelWattages::uniform(0.0));
    assert_invariants(&channels, &r);
}

#[test]
fn all_channels_at_half_is_not_limited() {
    let channels = pct(50.0, 50.0, 50.0, 50.0);
    let r = compute_wattage(&channels, &pro_table());
    assert!(!r.power_limited);
    assert_eq!(r.total_wattage, 68.0);
    assert_invariants(&channels, &r);
}

#[test]
fn all_channels_at_full_is_min_of_requested_and_ceiling() {
    let channels = pct(100.0, 100.0, 100.0, 100.0);
    let r = compute_wattage(&channels, &pro_table());
    assert_eq!(r.requested_wattage, 117.0);
    assert_eq!(r.total_wattage, r.requested_wattage.min(138.0));
    assert_eq!(r.efficiency, 85);
    assert_invariants(&channels, &r);
}

#[test]
fn near_maximum_lands_on_ceiling() {
    let channels = pct(139.0, 139.0, 137.0, 140.0);
    let r = compute_wattage(&channels, &pro_table());
    assert!(r.power_limited);
    assert_eq!(r.total_wattage, 138.0);
    assert_eq!(r.efficiency, 100);
    assert_invariants(&channels, &r);
}

#[test]
fn shared_base_single_channel_rules() {
    let table = pro_table();
    let green = compute_wattage(&pct(0.0, 30.0, 0.0, 0.0), &table);
    assert_eq!(green.shared_base, 10.0);
    for channels in [
        pct(30.0, 0.0, 0.0, 0.0),
        pct(0.0, 0.0, 30.0, 0.0),
        pct(0.0, 0.0, 0.0, 30.0),
    ] {
        assert_eq!(compute_wattage(&channels, &table).shared_base, 9.0);
    }
}

#[test]
fn shared_base_multi_channel_rules() {
    let table = pro_table();
    // green + one partner
    assert_eq!(
        compute_wattage(&pct(30.0, 30.0, 0.0, 0.0), &table).shared_base,
        10.0
    );
    // green + two partners
    assert_eq!(
        compute_wattage(&pct(30.0, 30.0, 30.0, 0.0), &table).shared_base,
        9.0
    );
    // three without green
    assert_eq!(
        compute_wattage(&pct(30.0, 0.0, 30.0, 30.0), &table).shared_base,
        9.0
    );
    // all four
    assert_eq!(
        compute_wattage(&pct(1.0, 1.0, 1.0, 1.0), &table).shared_base,
        10.0
    );
}

#[test]
fn embedded_base_sum_covers_active_channels_only() {
    let r = compute_wattage(&pct(0.0, 70.0, 0.0, 70.0), &pro_table());
    assert_eq!(r.embedded_base_sum, 19.0);
    // green 30-10 + white 32-9
    assert_eq!(r.step_sum, 43.0);
}

#[test]
fn boost_above_curve_clamps_to_top_step() {
    let table = pro_table();
    let at_top = compute_wattage(&pct(140.0, 0.0, 0.0, 0.0), &table);
    let beyond = compute_wattage(&pct(250.0, 0.0, 0.0, 0.0), &table);
    assert_eq!(at_top, beyond);
    assert_eq!(beyond.requested_wattage, 44.0);
}

#[test]
fn negative_levels_are_off_not_errors() {
    let r = compute_wattage(&pct(-20.0, 0.0, 0.0, 0.0), &pro_table());
    assert_eq!(r.total_wattage, 0.0);
}

#[test]
fn slim_fixture_never_limits() {
    let channels = pct(140.0, 140.0, 140.0, 140.0);
    let r = compute_wattage(&channels, &slim_table());
    // 20+20+18+25 steps + 10 shared
    assert_eq!(r.requested_wattage, 93.0);
    assert!(!r.power_limited);
    assert_invariants(&channels, &r);
}

#[test]
fn theoretical_max_may_exceed_ceiling() {
    assert_eq!(theoretical_max_wattage(&pro_table()), 180.0);
    assert!(theoretical_max_wattage(&pro_table()) > max_wattage());
    assert!(theoretical_max_wattage(&slim_table()) < max_wattage());
}

#[test]
fn format_wattage_appends_unit() {
    assert_eq!(format_wattage(0.0), "0W");
    assert_eq!(format_wattage(138.0), "138W");
}

#[test]
fn shipped_fixture_files_match_presets() {
    for (file, preset) in [
        ("wrgb2_pro.toml", "wrgb2_pro"),
        ("wrgb2_slim.toml", "wrgb2_slim"),
    ] {
        let from_file = FixtureConfig::from_toml_file(&common::fixture_path(file))
            .and_then(|c| c.build_table())
            .expect("shipped fixture should load");
        let from_preset = FixtureConfig::from_preset(preset)
            .and_then(|c| c.build_table())
            .expect("preset should load");
        assert_eq!(from_file, from_preset, "{file} diverges from {preset}");
    }
}

#[test]
fn table_is_shareable_across_threads() {
    let table = std::sync::Arc::new(pro_table());
    let handles: Vec<_> = Channel::ALL
        .into_iter()
        .map(|c| {
            let table = std::sync::Arc::clone(&table);
            std::thread::spawn(move || {
                let mut channels = pct(0.0, 0.0, 0.0, 0.0);
                channels.set(c, 100.0);
                compute_wattage(&channels, &table)
            })
        })
        .collect();
    for h in handles {
        let r = h.join().expect("worker should not panic");
        assert!(r.total_wattage > 0.0);
    }
}
