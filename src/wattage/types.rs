//! Core wattage types: channels, per-channel values, and calculation results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the fixture's four LED driver circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
    White,
}

impl Channel {
    /// All channels in device order.
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::White];

    /// Lowercase channel name, as used in config files and CSV headers.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
            Channel::White => "white",
        }
    }

    /// Parses a channel from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per channel.
///
/// # Examples
///
/// ```
/// use fixture_wattage::wattage::types::{Channel, ChannelPercentages};
///
/// let pct = ChannelPercentages::new(80.0, 60.0, 40.0, 20.0);
/// assert_eq!(pct.get(Channel::Blue), 40.0);
/// assert_eq!(pct.iter().map(|(_, v)| v).sum::<f64>(), 200.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerChannel<T> {
    pub red: T,
    pub green: T,
    pub blue: T,
    pub white: T,
}

/// Requested intensity per channel, in percent (nominally 0-140).
pub type ChannelPercentages = PerChannel<f64>;

/// Display wattage per channel.
pub type ChannelWattages = PerChannel<f64>;

impl<T> PerChannel<T> {
    pub fn new(red: T, green: T, blue: T, white: T) -> Self {
        Self {
            red,
            green,
            blue,
            white,
        }
    }
}

impl<T: Copy> PerChannel<T> {
    /// The same value on every channel.
    pub fn uniform(value: T) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn get(&self, channel: Channel) -> T {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
            Channel::White => self.white,
        }
    }

    pub fn set(&mut self, channel: Channel, value: T) {
        match channel {
            Channel::Red => self.red = value,
            Channel::Green => self.green = value,
            Channel::Blue => self.blue = value,
            Channel::White => self.white = value,
        }
    }

    /// Builds a value per channel from a function of the channel.
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        Self::new(
            f(Channel::Red),
            f(Channel::Green),
            f(Channel::Blue),
            f(Channel::White),
        )
    }

    pub fn map<U: Copy>(&self, mut f: impl FnMut(Channel, T) -> U) -> PerChannel<U> {
        PerChannel::from_fn(|c| f(c, self.get(c)))
    }

    /// Iterates `(channel, value)` pairs in device order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, T)> + '_ {
        Channel::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Outcome of one wattage estimation.
///
/// `total_wattage` never exceeds the power ceiling; `requested_wattage` is
/// the uncapped estimate it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WattageCalculationResult {
    /// Final delivered wattage after power limiting (W).
    pub total_wattage: f64,
    /// Per-channel display breakdown (W, rounded).
    pub channel_wattages: ChannelWattages,
    /// Sum of active step values, i.e. raw wattage minus embedded base (W).
    pub step_sum: f64,
    /// Sum of embedded bases over active channels (W, diagnostic only).
    pub embedded_base_sum: f64,
    /// Overhead of circuitry shared between active channels (W).
    pub shared_base: f64,
    /// Uncapped estimate: `step_sum + shared_base` (W).
    pub requested_wattage: f64,
    /// Whether `requested_wattage` exceeded the ceiling.
    pub power_limited: bool,
    /// `total_wattage` as a whole percentage of the ceiling.
    pub efficiency: u8,
}

impl WattageCalculationResult {
    /// Sum of the per-channel display wattages.
    pub fn channel_sum(&self) -> f64 {
        self.channel_wattages.iter().map(|(_, w)| w).sum()
    }
}

impl fmt::Display for WattageCalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = &self.channel_wattages;
        write!(
            f,
            "total={:>4}W (requested={}W, limited={}) eff={:>3}% | \
             R={}W G={}W B={}W W={}W | steps={}W embedded={}W shared={}W",
            self.total_wattage,
            self.requested_wattage,
            self.power_limited,
            self.efficiency,
            w.red,
            w.green,
            w.blue,
            w.white,
            self.step_sum,
            self.embedded_base_sum,
            self.shared_base,
        )
    }
}
