//! Pre-dispatch sanity check for brightness commands.
//!
//! The engine tolerates any input; this guard is the strict layer a server
//! puts in front of the device transport.

use thiserror::Error;
use tracing::warn;

use crate::wattage::curve::BOOST_MAX_PCT;
use crate::wattage::engine::{POWER_CEILING_W, compute_wattage};
use crate::wattage::table::WattageTable;
use crate::wattage::types::{Channel, ChannelPercentages, WattageCalculationResult};

/// What the guard lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPolicy {
    /// Accept commands the fixture will scale down to the ceiling.
    pub allow_power_limited: bool,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            allow_power_limited: true,
        }
    }
}

impl GuardPolicy {
    /// Rejects anything the fixture would have to power-limit.
    pub fn strict() -> Self {
        Self {
            allow_power_limited: false,
        }
    }
}

/// Reason a command was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuardError {
    #[error("{channel} level is not a finite number")]
    NonFinite { channel: Channel },
    #[error("{channel} level {value}% is outside 0-{max}%")]
    OutOfRange {
        channel: Channel,
        value: f64,
        max: f64,
    },
    #[error("requested {requested}W exceeds the {ceiling}W ceiling")]
    PowerLimited { requested: f64, ceiling: f64 },
}

/// Checks a command against the device domain and evaluates it.
///
/// # Errors
///
/// Returns a `GuardError` for non-finite or out-of-range levels, or, under a
/// strict policy, for commands that would be power-limited.
pub fn check_command(
    table: &WattageTable,
    channels: &ChannelPercentages,
    policy: GuardPolicy,
) -> Result<WattageCalculationResult, GuardError> {
    for (channel, value) in channels.iter() {
        if !value.is_finite() {
            return Err(GuardError::NonFinite { channel });
        }
        if !(0.0..=BOOST_MAX_PCT).contains(&value) {
            return Err(GuardError::OutOfRange {
                channel,
                value,
                max: BOOST_MAX_PCT,
            });
        }
    }

    let result = compute_wattage(channels, table);
    if result.power_limited {
        if !policy.allow_power_limited {
            warn!(
                fixture = table.name(),
                requested = result.requested_wattage,
                "rejecting power-limited command"
            );
            return Err(GuardError::PowerLimited {
                requested: result.requested_wattage,
                ceiling: POWER_CEILING_W,
            });
        }
        warn!(
            fixture = table.name(),
            requested = result.requested_wattage,
            delivered = result.total_wattage,
            "command will be power-limited"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixtureConfig;

    fn table() -> WattageTable {
        FixtureConfig::wrgb2_pro()
            .build_table()
            .expect("preset should build")
    }

    #[test]
    fn accepts_in_range_command() {
        let r = check_command(
            &table(),
            &ChannelPercentages::uniform(50.0),
            GuardPolicy::default(),
        );
        assert_eq!(r.map(|r| r.total_wattage), Ok(68.0));
    }

    #[test]
    fn rejects_negative_level() {
        let r = check_command(
            &table(),
            &ChannelPercentages::new(0.0, -1.0, 0.0, 0.0),
            GuardPolicy::default(),
        );
        assert!(matches!(
            r,
            Err(GuardError::OutOfRange {
                channel: Channel::Green,
                ..
            })
        ));
    }

    #[test]
    fn rejects_above_boost() {
        let r = check_command(
            &table(),
            &ChannelPercentages::new(0.0, 0.0, 0.0, 140.5),
            GuardPolicy::default(),
        );
        assert!(matches!(
            r,
            Err(GuardError::OutOfRange {
                channel: Channel::White,
                ..
            })
        ));
    }

    #[test]
    fn rejects_nan() {
        let r = check_command(
            &table(),
            &ChannelPercentages::new(f64::NAN, 0.0, 0.0, 0.0),
            GuardPolicy::default(),
        );
        assert_eq!(
            r,
            Err(GuardError::NonFinite {
                channel: Channel::Red
            })
        );
    }

    #[test]
    fn default_policy_allows_power_limited() {
        let r = check_command(
            &table(),
            &ChannelPercentages::uniform(140.0),
            GuardPolicy::default(),
        );
        assert!(r.as_ref().is_ok_and(|r| r.power_limited));
        assert_eq!(r.map(|r| r.total_wattage), Ok(138.0));
    }

    #[test]
    fn strict_policy_rejects_power_limited() {
        let r = check_command(
            &table(),
            &ChannelPercentages::uniform(140.0),
            GuardPolicy::strict(),
        );
        assert_eq!(
            r,
            Err(GuardError::PowerLimited {
                requested: 153.0,
                ceiling: 138.0
            })
        );
    }
}
