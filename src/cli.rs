use std::env;
use std::path::PathBuf;

use solar_sched::engine::ScoringMode;

/// Parsed command-line options.
#[derive(Debug)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub mode: Option<ScoringMode>,
    pub schedule_out: Option<PathBuf>,
    pub series_out: Option<PathBuf>,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: u16,
}

/// Outcome of argument parsing.
#[derive(Debug)]
pub enum Command {
    Run(CliOptions),
    Help,
}

pub fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

fn parse_args_from(args: &[String]) -> Result<Command, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut mode = None;
    let mut schedule_out = None;
    let mut series_out = None;
    #[cfg(feature = "api")]
    let mut serve = false;
    #[cfg(feature = "api")]
    let mut port = 3000u16;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
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
            "--mode" => {
                i += 1;
                let value =
                    args.next_or_err(i, "missing value for --mode (expected net or closeness)")?;
                mode = Some(value.parse::<ScoringMode>()?);
            }
            "--schedule-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --schedule-out (expected a file path)",
                )?;
                schedule_out = Some(PathBuf::from(path));
            }
            "--series-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --series-out (expected a file path)")?;
                series_out = Some(PathBuf::from(path));
            }
            #[cfg(feature = "api")]
            "--serve" => serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = value
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{value}\" is not a valid u16"))?;
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(Command::Run(CliOptions {
        scenario,
        preset,
        mode,
        schedule_out,
        series_out,
        #[cfg(feature = "api")]
        serve,
        #[cfg(feature = "api")]
        port,
    }))
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
    eprintln!("solar-sched: schedule appliances into forecast solar production");
    eprintln!();
    eprintln!("Usage: solar-sched [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, laundry_day, overcast)");
    eprintln!("  --mode <net|closeness>   Override the scoring mode");
    eprintln!("  --schedule-out <path>    Export the schedule to CSV");
    eprintln!("  --series-out <path>      Export the production series to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after scheduling");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}
