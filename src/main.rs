//! Fixture wattage entry point: CLI wiring and config-driven table loading.

use std::path::Path;
use std::process;

use tracing::{error, info};

use fixture_wattage::cli::{self, CliOptions, Mode, Parsed};
use fixture_wattage::config::FixtureConfig;
use fixture_wattage::guard::{self, GuardPolicy};
use fixture_wattage::io::export::export_csv;
use fixture_wattage::logging::init_logging;
use fixture_wattage::sweep::{SweepPlan, SweepReport, run_sweep};
use fixture_wattage::wattage::{WattageTable, format_wattage, max_wattage};

/// Exit status for a command the guard refused.
const EXIT_REJECTED: i32 = 2;

/// Loads the fixture: `--fixture` takes priority, then `--preset`, then the default preset.
fn load_table(cli: &CliOptions) -> WattageTable {
    let config = if let Some(ref path) = cli.fixture {
        FixtureConfig::from_toml_file(path)
    } else {
        FixtureConfig::from_preset(
            cli.preset
                .as_deref()
                .unwrap_or(FixtureConfig::DEFAULT_PRESET),
        )
    };
    let config = config.unwrap_or_else(|e| {
        error!("{e}");
        process::exit(1);
    });

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        process::exit(1);
    }

    let table = config.build_table().unwrap_or_else(|e| {
        error!("{e}");
        process::exit(1);
    });
    info!(
        fixture = table.name(),
        theoretical_max = table.theoretical_max_wattage(),
        "fixture table loaded"
    );
    table
}

fn print_summary(table: &WattageTable) {
    println!("Fixture:               {}", table.name());
    println!("Power ceiling:         {}", format_wattage(max_wattage()));
    println!(
        "Theoretical maximum:   {}",
        format_wattage(table.theoretical_max_wattage())
    );
}

fn run_plan(table: &WattageTable, plan: &SweepPlan, out: Option<&Path>) {
    let rows = run_sweep(table, plan);
    for row in &rows {
        println!("#{:<4} {}", row.index, row.result);
    }
    println!("\n{}", SweepReport::from_rows(&rows));

    if let Some(path) = out {
        if let Err(e) = export_csv(&rows, path) {
            error!("failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Sweep written to {}", path.display());
    }
}

fn main() {
    let cli = match cli::parse_args() {
        Ok(Parsed::Run(opts)) => opts,
        Ok(Parsed::Help) => {
            cli::print_usage();
            return;
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    init_logging(if cli.verbose { "debug" } else { "warn" });

    let table = load_table(&cli);
    let policy = if cli.strict {
        GuardPolicy::strict()
    } else {
        GuardPolicy::default()
    };

    match &cli.mode {
        Mode::Summary => print_summary(&table),
        Mode::Evaluate(channels) => match guard::check_command(&table, channels, policy) {
            Ok(result) => {
                println!("{result}");
                println!("Total: {}", format_wattage(result.total_wattage));
            }
            Err(e) => {
                error!("command rejected: {e}");
                process::exit(EXIT_REJECTED);
            }
        },
        Mode::Ramp { channel, step_pct } => run_plan(
            &table,
            &SweepPlan::Ramp {
                channel: *channel,
                step_pct: *step_pct,
            },
            cli.out.as_deref(),
        ),
        Mode::Random { samples } => run_plan(
            &table,
            &SweepPlan::Random {
                samples: *samples,
                seed: cli.seed,
            },
            cli.out.as_deref(),
        ),
    }

    if cli.serve {
        serve(table, policy, cli.port);
    }
}

#[cfg(feature = "api")]
fn serve(table: WattageTable, policy: GuardPolicy, port: u16) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(fixture_wattage::api::AppState { table, policy });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        error!("failed to create tokio runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = rt.block_on(fixture_wattage::api::serve(state, addr)) {
        error!("API server failed: {e}");
        process::exit(1);
    }
}

#[cfg(not(feature = "api"))]
fn serve(_table: WattageTable, _policy: GuardPolicy, _port: u16) {
    error!("--serve requires building with the `api` feature");
    process::exit(1);
}
