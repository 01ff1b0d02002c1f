//! TOML-based fixture configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::{CurveError, TableError};
use crate::wattage::curve::{ChannelWattageCurve, StepPoint};
use crate::wattage::table::{ChannelProfile, WattageTable, check_embedded_base};
use crate::wattage::types::{Channel, PerChannel};

/// Fixture calibration table parsed from TOML.
///
/// Every channel section is required, and so is each channel's
/// `embedded_base`. Load with [`FixtureConfig::from_toml_file`] or use a
/// preset such as [`FixtureConfig::wrgb2_pro`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
    /// Fixture model name.
    pub name: String,
    pub red: ChannelConfig,
    pub green: ChannelConfig,
    pub blue: ChannelConfig,
    pub white: ChannelConfig,
}

/// Calibration data for one channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Driver overhead present whenever the channel is on (W).
    pub embedded_base: f64,
    /// `(threshold %, watts)` pairs in ascending threshold order.
    pub steps: Vec<(f64, f64)>,
}

impl ChannelConfig {
    fn from_steps(embedded_base: f64, thresholds: &[f64], watts: &[f64]) -> Self {
        Self {
            embedded_base,
            steps: thresholds.iter().copied().zip(watts.iter().copied()).collect(),
        }
    }

    fn curve(&self) -> Result<ChannelWattageCurve, CurveError> {
        ChannelWattageCurve::new(self.steps.iter().copied().map(StepPoint::from).collect())
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"green.steps"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl From<TableError> for ConfigError {
    fn from(e: TableError) -> Self {
        let key = match e {
            TableError::Curve { .. } => "steps",
            TableError::InvalidEmbeddedBase { .. }
            | TableError::EmbeddedBaseAboveCurve { .. }
            | TableError::SharedBaseUncovered { .. } => "embedded_base",
        };
        Self {
            field: match e.channel() {
                Some(channel) => format!("{channel}.{key}"),
                None => key.to_string(),
            },
            message: match &e {
                TableError::Curve { source, .. } => source.to_string(),
                other => other.to_string(),
            },
        }
    }
}

const PRO_THRESHOLDS: [f64; 15] = [
    1.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 120.0, 130.0, 140.0,
];

const SLIM_THRESHOLDS: [f64; 7] = [1.0, 25.0, 50.0, 75.0, 100.0, 120.0, 140.0];

impl FixtureConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["wrgb2_pro", "wrgb2_slim"];

    /// Preset used when no fixture is given.
    pub const DEFAULT_PRESET: &str = "wrgb2_pro";

    /// WRGB II Pro: four channels, boost headroom beyond the 138W ceiling.
    pub fn wrgb2_pro() -> Self {
        Self {
            name: "WRGB II Pro".to_string(),
            red: ChannelConfig::from_steps(
                9.0,
                &PRO_THRESHOLDS,
                &[
                    10.0, 12.0, 14.0, 17.0, 20.0, 23.0, 25.0, 28.0, 30.0, 33.0, 35.0, 37.0, 39.0,
                    40.0, 44.0,
                ],
            ),
            green: ChannelConfig::from_steps(
                10.0,
                &PRO_THRESHOLDS,
                &[
                    11.0, 13.0, 16.0, 19.0, 22.0, 25.0, 27.0, 30.0, 32.0, 35.0, 37.0, 40.0, 42.0,
                    44.0, 46.0,
                ],
            ),
            blue: ChannelConfig::from_steps(
                9.0,
                &PRO_THRESHOLDS,
                &[
                    10.0, 11.0, 13.0, 16.0, 18.0, 21.0, 23.0, 25.0, 27.0, 30.0, 32.0, 34.0, 36.0,
                    39.0, 40.0,
                ],
            ),
            white: ChannelConfig::from_steps(
                9.0,
                &PRO_THRESHOLDS,
                &[
                    10.0, 13.0, 16.0, 19.0, 23.0, 26.0, 29.0, 32.0, 35.0, 38.0, 40.0, 43.0, 46.0,
                    48.0, 50.0,
                ],
            ),
        }
    }

    /// WRGB II Slim: coarser calibration, never reaches the ceiling.
    pub fn wrgb2_slim() -> Self {
        Self {
            name: "WRGB II Slim".to_string(),
            red: ChannelConfig::from_steps(
                5.0,
                &SLIM_THRESHOLDS,
                &[6.0, 9.0, 13.0, 17.0, 21.0, 23.0, 25.0],
            ),
            green: ChannelConfig::from_steps(
                6.0,
                &SLIM_THRESHOLDS,
                &[7.0, 10.0, 14.0, 18.0, 22.0, 24.0, 26.0],
            ),
            blue: ChannelConfig::from_steps(
                5.0,
                &SLIM_THRESHOLDS,
                &[6.0, 8.0, 12.0, 15.0, 19.0, 21.0, 23.0],
            ),
            white: ChannelConfig::from_steps(
                5.0,
                &SLIM_THRESHOLDS,
                &[6.0, 10.0, 15.0, 20.0, 25.0, 28.0, 30.0],
            ),
        }
    }

    /// Loads a fixture from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "wrgb2_pro" => Ok(Self::wrgb2_pro()),
            "wrgb2_slim" => Ok(Self::wrgb2_slim()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a fixture from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "fixture".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a fixture from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, has unknown fields, or
    /// is missing a channel or embedded base.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    pub fn channel(&self, channel: Channel) -> &ChannelConfig {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
            Channel::White => &self.white,
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ConfigError {
                field: "name".into(),
                message: "must not be empty".into(),
            });
        }

        let mut channels_ok = true;
        for channel in Channel::ALL {
            if let Err(e) = self.profile(channel) {
                errors.push(e.into());
                channels_ok = false;
            }
        }
        if channels_ok {
            if let Err(e) = self.assemble() {
                errors.push(e.into());
            }
        }

        errors
    }

    /// Builds the immutable table the engine evaluates against.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` [`FixtureConfig::validate`] would report.
    pub fn build_table(&self) -> Result<WattageTable, ConfigError> {
        if let Some(e) = self.validate().into_iter().next() {
            return Err(e);
        }
        Ok(self.assemble()?)
    }

    fn assemble(&self) -> Result<WattageTable, TableError> {
        let channels = PerChannel::new(
            self.profile(Channel::Red)?,
            self.profile(Channel::Green)?,
            self.profile(Channel::Blue)?,
            self.profile(Channel::White)?,
        );
        WattageTable::new(self.name.clone(), channels)
    }

    fn profile(&self, channel: Channel) -> Result<ChannelProfile, TableError> {
        let cfg = self.channel(channel);
        let curve = cfg
            .curve()
            .map_err(|source| TableError::Curve { channel, source })?;
        check_embedded_base(channel, cfg.embedded_base, &curve)?;
        Ok(ChannelProfile::new(curve, cfg.embedded_base))
    }
}
