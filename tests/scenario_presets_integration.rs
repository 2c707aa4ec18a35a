use std::collections::BTreeMap;
use std::process::Command;

const SENTINEL: &str = "No optimal time found within solar production constraints.";

#[test]
fn two_peak_csv_scenario_places_laundry_on_peaks() {
    let schedule = run_and_parse_schedule(&["--scenario", "scenarios/two_peaks.toml"]);
    assert_eq!(
        schedule.get("washing_machine").map(String::as_str),
        Some("2024-06-21 10:00")
    );
    assert_eq!(
        schedule.get("tumble_dryer").map(String::as_str),
        Some("2024-06-21 16:00")
    );
}

#[test]
fn baseline_scenario_respects_preferred_hours() {
    let schedule = run_and_parse_schedule(&["--scenario", "scenarios/baseline.toml"]);

    let washer = hour_minute(&schedule, "washing_machine");
    let dryer = hour_minute(&schedule, "tumble_dryer");
    assert!(
        ("06:00".."10:51").contains(&washer.as_str()),
        "washer start {washer} outside morning window"
    );
    assert!(
        ("13:00".."17:51").contains(&dryer.as_str()),
        "dryer start {dryer} outside afternoon window"
    );
}

#[test]
fn overcast_scenario_reports_no_window() {
    let schedule = run_and_parse_schedule(&["--scenario", "scenarios/overcast.toml"]);
    assert_eq!(schedule.len(), 2);
    for (id, outcome) in &schedule {
        assert_eq!(outcome, SENTINEL, "{id} should have no window");
    }
}

#[test]
fn laundry_day_scenario_lists_three_starts_each() {
    let schedule = run_and_parse_schedule(&["--scenario", "scenarios/laundry_day.toml"]);
    assert_eq!(schedule.len(), 3);
    for (id, outcome) in &schedule {
        assert_eq!(
            outcome.split(", ").count(),
            3,
            "{id} should list three ranked starts, got `{outcome}`"
        );
    }
}

#[test]
fn presets_match_scenario_files() {
    for name in ["baseline", "laundry_day", "overcast"] {
        let from_preset = run_and_parse_schedule(&["--preset", name]);
        let path = format!("scenarios/{name}.toml");
        let from_file = run_and_parse_schedule(&["--scenario", &path]);
        assert_eq!(from_preset, from_file, "preset {name} differs from {path}");
    }
}

#[test]
fn mode_flag_overrides_scenario() {
    let closeness = run_and_parse_schedule(&["--scenario", "scenarios/two_peaks.toml"]);
    let net = run_and_parse_schedule(&["--scenario", "scenarios/two_peaks.toml", "--mode", "net"]);
    assert_eq!(
        net.get("washing_machine").map(String::as_str),
        Some("2024-06-21 09:00")
    );
    assert_ne!(closeness, net);
}

#[test]
fn invalid_scenario_exits_with_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_solar-sched"))
        .args(["--preset", "nonexistent"])
        .output()
        .expect("solar-sched process should run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown preset"), "stderr: {stderr}");
}

fn run_and_parse_schedule(args: &[&str]) -> BTreeMap<String, String> {
    let output = Command::new(env!("CARGO_BIN_EXE_solar-sched"))
        .args(args)
        .output()
        .expect("solar-sched process should run");

    assert!(
        output.status.success(),
        "scenario run failed for {args:?}: stderr={} ",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    parse_schedule(&stdout)
}

fn parse_schedule(stdout: &str) -> BTreeMap<String, String> {
    let (_, section) = stdout
        .split_once("--- Schedule ---")
        .unwrap_or_else(|| panic!("missing schedule section in output: {stdout}"));

    section
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let (id, outcome) = line
                .split_once(": ")
                .unwrap_or_else(|| panic!("invalid schedule line `{line}`"));
            (id.trim().to_string(), outcome.trim().to_string())
        })
        .collect()
}

fn hour_minute(schedule: &BTreeMap<String, String>, id: &str) -> String {
    let outcome = schedule
        .get(id)
        .unwrap_or_else(|| panic!("missing schedule line for {id}"));
    outcome
        .split_whitespace()
        .nth(1)
        .unwrap_or_else(|| panic!("`{outcome}` is not a start time"))
        .to_string()
}
