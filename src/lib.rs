//! Power draw estimation for multi-channel LED light fixtures.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
/// Pre-dispatch command checks.
pub mod guard;
pub mod io;
pub mod logging;
pub mod sweep;
pub mod wattage;
