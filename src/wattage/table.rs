//! Validated per-fixture wattage tables.

use serde::Serialize;

use super::base::shared_base;
use super::curve::ChannelWattageCurve;
use super::types::{Channel, PerChannel};
use crate::error::TableError;

/// Calibration data for one channel: its step curve and embedded base.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelProfile {
    /// Raw wattage curve, embedded base included.
    pub curve: ChannelWattageCurve,
    /// Fixed driver overhead present whenever the channel is on (W).
    pub embedded_base: f64,
}

impl ChannelProfile {
    pub fn new(curve: ChannelWattageCurve, embedded_base: f64) -> Self {
        Self {
            curve,
            embedded_base,
        }
    }
}

/// Immutable calibration table for one fixture model.
///
/// Built once at load time and shared read-only between callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WattageTable {
    name: String,
    channels: PerChannel<ChannelProfile>,
}

impl WattageTable {
    /// Validates channel profiles and builds a table.
    ///
    /// Curves are already valid by construction; this checks each embedded
    /// base against its curve.
    ///
    /// # Errors
    ///
    /// Returns a `TableError` for the first channel whose embedded base is
    /// not a non-negative whole number or exceeds the curve's lowest wattage,
    /// or if some set of active channels could request more than
    /// [`WattageTable::theoretical_max_wattage`].
    pub fn new(
        name: impl Into<String>,
        channels: PerChannel<ChannelProfile>,
    ) -> Result<Self, TableError> {
        for channel in Channel::ALL {
            let profile = channels.profile(channel);
            check_embedded_base(channel, profile.embedded_base, &profile.curve)?;
        }
        check_shared_base(&channels)?;

        Ok(Self {
            name: name.into(),
            channels,
        })
    }

    /// Fixture model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self, channel: Channel) -> &ChannelProfile {
        self.channels.profile(channel)
    }

    pub fn curve(&self, channel: Channel) -> &ChannelWattageCurve {
        &self.profile(channel).curve
    }

    pub fn embedded_base(&self, channel: Channel) -> f64 {
        self.profile(channel).embedded_base
    }

    /// Sum of each curve's highest wattage.
    ///
    /// Informational only: the limiter enforces the fixed hardware ceiling,
    /// which this may exceed.
    pub fn theoretical_max_wattage(&self) -> f64 {
        Channel::ALL
            .into_iter()
            .map(|c| self.curve(c).max_watts())
            .sum()
    }
}

/// Checks that an embedded base can be subtracted from every step of `curve`.
///
/// # Errors
///
/// Returns a `TableError` if `base` is not a non-negative whole number, or
/// exceeds the curve's lowest wattage.
pub fn check_embedded_base(
    channel: Channel,
    base: f64,
    curve: &ChannelWattageCurve,
) -> Result<(), TableError> {
    if !base.is_finite() || base < 0.0 || base.fract() != 0.0 {
        return Err(TableError::InvalidEmbeddedBase { channel, base });
    }
    let lowest = curve.min_watts();
    if base > lowest {
        return Err(TableError::EmbeddedBaseAboveCurve {
            channel,
            base,
            lowest,
        });
    }
    Ok(())
}

/// Checks that no set of active channels can request more than the
/// theoretical maximum.
///
/// With its active channels on their top steps, a set requests their top
/// wattages, minus their embedded bases, plus its shared base. The shared
/// base must therefore fit within the active embedded bases plus the top
/// wattages of the channels left off.
fn check_shared_base(channels: &PerChannel<ChannelProfile>) -> Result<(), TableError> {
    for mask in 1u8..16 {
        let mut names = Vec::new();
        let mut green_on = false;
        let mut available = 0.0;
        for (i, channel) in Channel::ALL.into_iter().enumerate() {
            let profile = channels.profile(channel);
            if mask & (1 << i) != 0 {
                names.push(channel.name());
                green_on |= channel == Channel::Green;
                available += profile.embedded_base;
            } else {
                available += profile.curve.max_watts();
            }
        }

        let shared = shared_base(names.len(), green_on);
        if shared > available {
            return Err(TableError::SharedBaseUncovered {
                channels: names.join("+"),
                shared_base: shared,
                available,
            });
        }
    }
    Ok(())
}

impl PerChannel<ChannelProfile> {
    /// Borrowing accessor; `PerChannel::get` needs `Copy`.
    pub fn profile(&self, channel: Channel) -> &ChannelProfile {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
            Channel::White => &self.white,
        }
    }
}
