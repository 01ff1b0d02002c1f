//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

use crate::sweep::MIN_RAMP_STEP_PCT;
use crate::wattage::types::{Channel, ChannelPercentages};

/// What the binary should do once the fixture is loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Print the fixture summary.
    Summary,
    /// Evaluate one set of channel levels.
    Evaluate(ChannelPercentages),
    /// Ramp one channel (or all with `None`) from 0 to 140%.
    Ramp {
        channel: Option<Channel>,
        step_pct: f64,
    },
    /// Evaluate `samples` seeded random channel mixes.
    Random { samples: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub fixture: Option<PathBuf>,
    pub preset: Option<String>,
    pub mode: Mode,
    pub seed: u64,
    pub out: Option<PathBuf>,
    pub strict: bool,
    pub verbose: bool,
    pub serve: bool,
    pub port: u16,
}

/// Outcome of argument parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Run(CliOptions),
    Help,
}

pub fn parse_args() -> Result<Parsed, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_options(&args)
}

const DEFAULT_STEP_PCT: f64 = 10.0;
const DEFAULT_SEED: u64 = 42;
const DEFAULT_PORT: u16 = 3000;

pub fn parse_options(args: &[String]) -> Result<Parsed, String> {
    let mut i = 0usize;
    let mut fixture = None;
    let mut preset = None;
    let mut channels = None;
    let mut ramp: Option<Option<Channel>> = None;
    let mut step_pct = None;
    let mut random = None;
    let mut seed = DEFAULT_SEED;
    let mut out = None;
    let mut strict = false;
    let mut verbose = false;
    let mut serve = false;
    let mut port = DEFAULT_PORT;

    while i < args.len() {
        match args[i].as_str() {
            "--fixture" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --fixture (expected a TOML file path)",
                )?;
                if fixture.replace(PathBuf::from(path)).is_some() {
                    return Err("--fixture provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--channels" => {
                i += 1;
                let raw =
                    args.next_or_err(i, "missing value for --channels (expected r,g,b,w)")?;
                channels = Some(parse_channels(raw)?);
            }
            "--ramp" => {
                i += 1;
                let raw = args.next_or_err(
                    i,
                    "missing value for --ramp (expected red, green, blue, white or all)",
                )?;
                ramp = Some(parse_ramp_target(raw)?);
            }
            "--step" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --step (expected a percent)")?;
                let step: f64 = raw
                    .parse()
                    .map_err(|_| format!("--step value \"{raw}\" is not a number"))?;
                if !step.is_finite() || step < MIN_RAMP_STEP_PCT {
                    return Err(format!(
                        "--step value \"{raw}\" must be at least {MIN_RAMP_STEP_PCT}"
                    ));
                }
                step_pct = Some(step);
            }
            "--random" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --random (expected a count)")?;
                let n: usize = raw
                    .parse()
                    .map_err(|_| format!("--random value \"{raw}\" is not a valid count"))?;
                random = Some(n);
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                seed = raw
                    .parse()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
            }
            "--out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --out (expected a file path)")?;
                out = Some(PathBuf::from(path));
            }
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = raw
                    .parse()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            "--strict" => strict = true,
            "--verbose" | "-v" => verbose = true,
            "--serve" => serve = true,
            "--help" | "-h" => return Ok(Parsed::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if fixture.is_some() && preset.is_some() {
        return Err(
            "arguments `--fixture` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    let modes = [channels.is_some(), ramp.is_some(), random.is_some()]
        .iter()
        .filter(|set| **set)
        .count();
    if modes > 1 {
        return Err(
            "arguments `--channels`, `--ramp` and `--random` are mutually exclusive".to_string(),
        );
    }
    if step_pct.is_some() && ramp.is_none() {
        return Err("--step only applies to --ramp".to_string());
    }

    let mode = if let Some(pct) = channels {
        Mode::Evaluate(pct)
    } else if let Some(channel) = ramp {
        Mode::Ramp {
            channel,
            step_pct: step_pct.unwrap_or(DEFAULT_STEP_PCT),
        }
    } else if let Some(samples) = random {
        Mode::Random { samples }
    } else {
        Mode::Summary
    };

    Ok(Parsed::Run(CliOptions {
        fixture,
        preset,
        mode,
        seed,
        out,
        strict,
        verbose,
        serve,
        port,
    }))
}

fn parse_channels(raw: &str) -> Result<ChannelPercentages, String> {
    let values = raw
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| format!("--channels value \"{v}\" is not a number"))
        })
        .collect::<Result<Vec<f64>, String>>()?;
    match values.as_slice() {
        [r, g, b, w] => Ok(ChannelPercentages::new(*r, *g, *b, *w)),
        _ => Err(format!(
            "--channels expects 4 comma-separated values, got {}",
            values.len()
        )),
    }
}

fn parse_ramp_target(raw: &str) -> Result<Option<Channel>, String> {
    if raw == "all" {
        return Ok(None);
    }
    Channel::from_name(raw)
        .map(Some)
        .ok_or_else(|| format!("--ramp value \"{raw}\" is not a channel or \"all\""))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("fixture-wattage: LED fixture power estimation");
    eprintln!();
    eprintln!("Usage: fixture-wattage [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --fixture <path>         Load fixture table from TOML file");
    eprintln!("  --preset <name>          Use a built-in fixture (wrgb2_pro, wrgb2_slim)");
    eprintln!("  --channels <r,g,b,w>     Estimate wattage for one set of levels");
    eprintln!("  --ramp <channel|all>     Sweep one channel, or all together, 0-140%");
    eprintln!("  --step <pct>             Ramp increment (default: 10)");
    eprintln!("  --random <n>             Sweep n random channel mixes");
    eprintln!("  --seed <u64>             Seed for --random (default: 42)");
    eprintln!("  --out <path>             Write sweep rows to CSV");
    eprintln!("  --strict                 Reject commands that would be power-limited");
    eprintln!("  --verbose, -v            Debug logging");
    eprintln!("  --serve                  Start REST API server (requires `api` feature)");
    eprintln!("  --port <u16>             API server port (default: 3000)");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --fixture or --preset is given, the wrgb2_pro preset is used.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn run(list: &[&str]) -> CliOptions {
        match parse_options(&args(list)).expect("parse should succeed") {
            Parsed::Run(opts) => opts,
            Parsed::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn defaults_to_summary() {
        let opts = run(&[]);
        assert_eq!(opts.mode, Mode::Summary);
        assert!(opts.fixture.is_none());
        assert!(opts.preset.is_none());
        assert_eq!(opts.seed, 42);
    }

    #[test]
    fn supports_fixture_cli() {
        let opts = run(&["--fixture", "fixtures/wrgb2_pro.toml"]);
        assert_eq!(
            opts.fixture.as_deref().and_then(|p| p.to_str()),
            Some("fixtures/wrgb2_pro.toml")
        );
    }

    #[test]
    fn parses_channels() {
        let opts = run(&["--channels", "80, 60,40,20"]);
        assert_eq!(
            opts.mode,
            Mode::Evaluate(ChannelPercentages::new(80.0, 60.0, 40.0, 20.0))
        );
    }

    #[test]
    fn rejects_short_channel_list() {
        assert!(parse_options(&args(&["--channels", "1,2,3"])).is_err());
    }

    #[test]
    fn parses_ramp_with_step() {
        let opts = run(&["--ramp", "green", "--step", "5"]);
        assert_eq!(
            opts.mode,
            Mode::Ramp {
                channel: Some(Channel::Green),
                step_pct: 5.0
            }
        );
        let all = run(&["--ramp", "all"]);
        assert_eq!(
            all.mode,
            Mode::Ramp {
                channel: None,
                step_pct: 10.0
            }
        );
    }

    #[test]
    fn rejects_conflicting_modes() {
        assert!(parse_options(&args(&["--ramp", "red", "--random", "5"])).is_err());
        assert!(parse_options(&args(&["--preset", "wrgb2_pro", "--fixture", "x.toml"])).is_err());
        assert!(parse_options(&args(&["--step", "5"])).is_err());
    }

    #[test]
    fn rejects_step_below_minimum() {
        let err = parse_options(&args(&["--ramp", "all", "--step", "1e-9"]));
        assert!(err.is_err_and(|e| e.contains("at least 0.01")));
        assert!(parse_options(&args(&["--ramp", "all", "--step", "0.01"])).is_ok());
    }

    #[test]
    fn help_flag() {
        assert_eq!(parse_options(&args(&["--help"])), Ok(Parsed::Help));
    }

    #[test]
    fn unknown_argument() {
        let err = parse_options(&args(&["--bogus"]));
        assert_eq!(err, Err("unknown argument: --bogus".to_string()));
    }
}
