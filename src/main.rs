//! Scheduler entry point: CLI wiring and scenario execution.

mod cli;

use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use solar_sched::config::{ConfigError, ScenarioConfig};
use solar_sched::engine::{DailySummary, ScheduleCoordinator};
use solar_sched::io::{export_schedule_csv, export_series_csv};

use cli::{CliOptions, Command};

fn load_scenario(cli: &CliOptions) -> Result<ScenarioConfig, ConfigError> {
    // --scenario takes priority, then --preset, then baseline default
    let mut scenario = match (&cli.scenario, &cli.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
        (None, Some(name)) => ScenarioConfig::from_preset(name)?,
        (None, None) => ScenarioConfig::baseline(),
    };
    if let Some(mode) = cli.mode {
        scenario.scoring.mode = mode;
    }
    Ok(scenario)
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match cli::parse_args() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            cli::print_usage();
            process::exit(0);
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    let scenario = load_scenario(&cli).unwrap_or_else(|e| fail(e));
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let series = scenario.production_series().unwrap_or_else(|e| fail(e));
    let appliances = scenario.build_appliances().unwrap_or_else(|e| fail(e));
    info!(
        samples = series.len(),
        appliances = appliances.len(),
        mode = ?scenario.scoring.mode,
        "running scenario"
    );

    let schedule = ScheduleCoordinator::new(scenario.scoring)
        .schedule(&series, &appliances)
        .unwrap_or_else(|e| fail(e));

    println!("{}", DailySummary::from_series(&series));
    println!("--- Schedule ---");
    print!("{schedule}");

    if let Some(ref path) = cli.schedule_out {
        if let Err(e) = export_schedule_csv(&schedule, path) {
            fail(format!("failed to write schedule CSV: {e}"));
        }
        info!(path = %path.display(), "schedule written");
    }
    if let Some(ref path) = cli.series_out {
        if let Err(e) = export_series_csv(&series, path) {
            fail(format!("failed to write series CSV: {e}"));
        }
        info!(path = %path.display(), "series written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(solar_sched::api::AppState {
            options: scenario.scoring,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail(format!("failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(solar_sched::api::serve(state, addr)) {
            fail(format!("server error: {e}"));
        }
    }
}
