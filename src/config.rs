//! TOML-based scenario configuration and preset definitions.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::appliances::{Appliance, ApplianceSpec, PreferredTime, catalog};
use crate::engine::{EngineOptions, OutputMode, ProductionSeries, Sequencing};
use crate::forecast::SyntheticPv;
use crate::io::import_series_csv;

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Where the production forecast comes from.
    #[serde(default)]
    pub production: ProductionConfig,
    /// Scheduling policy.
    #[serde(default)]
    pub scoring: EngineOptions,
    /// Appliances to schedule, in placement order.
    #[serde(default = "default_appliances")]
    pub appliances: Vec<ApplianceSpec>,
}

fn default_appliances() -> Vec<ApplianceSpec> {
    [catalog::WASHING_MACHINE, catalog::TUMBLE_DRYER]
        .into_iter()
        .map(|id| ApplianceSpec {
            id: id.to_string(),
            profile: None,
            preferred_time: None,
        })
        .collect()
}

/// Production forecast source and synthetic model parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductionConfig {
    /// Forecast source: `"synthetic"` or `"csv"`.
    pub source: String,
    /// `timestamp,power_w` file read when `source = "csv"`.
    pub csv_path: Option<PathBuf>,
    /// UTC calendar day of the synthetic forecast (`"YYYY-MM-DD"`).
    pub date: NaiveDate,
    /// Samples per day for the synthetic forecast.
    pub steps_per_day: usize,
    /// Clear-sky peak output (W).
    pub peak_w: f64,
    /// Hour generation starts.
    pub sunrise_hour: f64,
    /// Hour generation stops.
    pub sunset_hour: f64,
    /// Noise standard deviation as a fraction of output.
    pub noise_std: f64,
    /// Noise seed.
    pub seed: u64,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        let pv = SyntheticPv::default();
        Self {
            source: "synthetic".to_string(),
            csv_path: None,
            date: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap_or_default(),
            steps_per_day: 144,
            peak_w: pv.peak_w,
            sunrise_hour: pv.sunrise_hour,
            sunset_hour: pv.sunset_hour,
            noise_std: pv.noise_std,
            seed: pv.seed,
        }
    }
}

impl ProductionConfig {
    /// Synthetic model described by this section.
    pub fn synthetic(&self) -> SyntheticPv {
        SyntheticPv {
            peak_w: self.peak_w,
            sunrise_hour: self.sunrise_hour,
            sunset_hour: self.sunset_hour,
            noise_std: self.noise_std,
            seed: self.seed,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"production.steps_per_day"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: washing machine and tumble dryer on a
    /// clear summer day.
    pub fn baseline() -> Self {
        Self {
            production: ProductionConfig::default(),
            scoring: EngineOptions::default(),
            appliances: default_appliances(),
        }
    }

    /// Returns the laundry-day preset: a larger array, residual sequencing,
    /// ranked output, and a third load in the evening.
    pub fn laundry_day() -> Self {
        let mut appliances = default_appliances();
        appliances.push(ApplianceSpec {
            id: "dishwasher".to_string(),
            profile: Some(crate::appliances::ProfileSpec::Scalar {
                total_wh: 900.0,
                duration_minutes: 120,
            }),
            preferred_time: Some(PreferredTime::Evening),
        });
        Self {
            production: ProductionConfig {
                peak_w: 6000.0,
                sunrise_hour: 5.0,
                sunset_hour: 21.0,
                ..ProductionConfig::default()
            },
            scoring: EngineOptions {
                sequencing: Sequencing::Residual,
                output: OutputMode::Ranked,
                top_n: Some(3),
                ..EngineOptions::default()
            },
            appliances,
        }
    }

    /// Returns the overcast preset: no usable production at all.
    pub fn overcast() -> Self {
        Self {
            production: ProductionConfig {
                peak_w: 0.0,
                ..ProductionConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "laundry_day", "overcast"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "laundry_day" => Ok(Self::laundry_day()),
            "overcast" => Ok(Self::overcast()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let mut scenario = Self::from_toml_str(&content)?;
        // relative CSV paths are relative to the scenario file
        if let (Some(csv), Some(dir)) = (&mut scenario.production.csv_path, path.parent()) {
            if csv.is_relative() {
                *csv = dir.join(&*csv);
            }
        }
        Ok(scenario)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let p = &self.production;

        match p.source.as_str() {
            "synthetic" => {}
            "csv" => {
                if p.csv_path.is_none() {
                    errors.push(ConfigError::new(
                        "production.csv_path",
                        "required when production.source = \"csv\"",
                    ));
                }
            }
            other => errors.push(ConfigError::new(
                "production.source",
                format!("must be \"synthetic\" or \"csv\", got \"{other}\""),
            )),
        }
        if p.steps_per_day == 0 || 86_400 % p.steps_per_day != 0 {
            errors.push(ConfigError::new(
                "production.steps_per_day",
                "must be > 0 and divide a day into whole seconds",
            ));
        }
        if !p.peak_w.is_finite() || p.peak_w < 0.0 {
            errors.push(ConfigError::new("production.peak_w", "must be >= 0"));
        }
        if !(0.0..=24.0).contains(&p.sunrise_hour) || !(0.0..=24.0).contains(&p.sunset_hour) {
            errors.push(ConfigError::new(
                "production.sunrise_hour",
                "sunrise and sunset must be within [0, 24]",
            ));
        } else if p.sunrise_hour >= p.sunset_hour {
            errors.push(ConfigError::new(
                "production.sunrise_hour",
                "must be < production.sunset_hour",
            ));
        }
        if !p.noise_std.is_finite() || p.noise_std < 0.0 {
            errors.push(ConfigError::new("production.noise_std", "must be >= 0"));
        }

        if self.scoring.top_n == Some(0) {
            errors.push(ConfigError::new("scoring.top_n", "must be > 0"));
        }

        if self.appliances.is_empty() {
            errors.push(ConfigError::new("appliances", "at least one appliance is required"));
        }
        let mut seen = HashSet::new();
        for (i, spec) in self.appliances.iter().enumerate() {
            if !seen.insert(spec.id.as_str()) {
                errors.push(ConfigError::new(
                    format!("appliances[{i}].id"),
                    format!("duplicate appliance id \"{}\"", spec.id),
                ));
            }
            if let Err(e) = spec.to_appliance() {
                errors.push(ConfigError::new(format!("appliances[{i}].profile"), e.to_string()));
            }
        }

        errors
    }

    /// Builds the production series this scenario describes.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the CSV cannot be loaded or the synthetic
    /// parameters do not yield a valid series.
    pub fn production_series(&self) -> Result<ProductionSeries, ConfigError> {
        let p = &self.production;
        match (p.source.as_str(), &p.csv_path) {
            ("csv", Some(path)) => import_series_csv(path)
                .map_err(|e| ConfigError::new("production.csv_path", e.to_string())),
            ("csv", None) => Err(ConfigError::new(
                "production.csv_path",
                "required when production.source = \"csv\"",
            )),
            _ => p
                .synthetic()
                .series(p.date, p.steps_per_day)
                .map_err(|e| ConfigError::new("production", e.to_string())),
        }
    }

    /// Resolves the appliance list into validated appliances.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first appliance that fails.
    pub fn build_appliances(&self) -> Result<Vec<Appliance>, ConfigError> {
        self.appliances
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                spec.to_appliance()
                    .map_err(|e| ConfigError::new(format!("appliances[{i}]"), e.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScoringMode;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent").expect_err("must fail");
        assert!(err.message.contains("unknown preset"));
        assert_eq!(err.field, "preset");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name).expect("preset loads");
            let errors = cfg.validate();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
            assert!(cfg.production_series().is_ok(), "preset \"{name}\" builds a series");
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[production]
source = "synthetic"
date = "2024-03-20"
steps_per_day = 96
peak_w = 5000.0
sunrise_hour = 7.0
sunset_hour = 19.0
noise_std = 0.0
seed = 7

[scoring]
mode = "net"
require_production = false
output = "ranked"
top_n = 5
sequencing = "residual"
fallback = "no_result"

[[appliances]]
id = "tumble_dryer"
preferred_time = "evening"

[[appliances]]
id = "dishwasher"
profile = { total_wh = 900.0, duration_minutes = 120 }

[[appliances]]
id = "kettle_run"
preferred_time = "morning"

[appliances.profile]
interval_minutes = 5
samples = [
    { sequence = 1, consumption_wh = 100.0 },
    { sequence = 2, consumption_wh = 50.0 },
]
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).expect("valid TOML should parse");
        assert_eq!(cfg.production.steps_per_day, 96);
        assert_eq!(cfg.production.date, NaiveDate::from_ymd_opt(2024, 3, 20).expect("date"));
        assert_eq!(cfg.scoring.mode, ScoringMode::Net);
        assert_eq!(cfg.scoring.top_n, Some(5));
        assert_eq!(cfg.scoring.fallback, crate::engine::WindowFallback::NoResult);
        assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());

        let appliances = cfg.build_appliances().expect("appliances resolve");
        assert_eq!(appliances.len(), 3);
        assert_eq!(appliances[0].preferred_time, Some(PreferredTime::Evening));
        assert_eq!(appliances[2].profile.total_wh(), 150.0);
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[production]
steps_per_day = 24
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_scoring_mode_is_rejected() {
        let toml = r#"
[scoring]
mode = "greedy"
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[production]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).expect("parses");
        // seed overridden
        assert_eq!(cfg.production.seed, 99);
        // steps_per_day kept default
        assert_eq!(cfg.production.steps_per_day, 144);
        // scoring and appliances kept default
        assert_eq!(cfg.scoring, EngineOptions::default());
        assert_eq!(cfg.appliances.len(), 2);
    }

    #[test]
    fn validation_catches_bad_source() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.production.source = "satellite".to_string();
        assert!(cfg.validate().iter().any(|e| e.field == "production.source"));
    }

    #[test]
    fn csv_path_resolves_against_scenario_dir() {
        let dir = std::env::temp_dir().join(format!("solar-sched-cfg-{}", std::process::id()));
        fs::create_dir_all(dir.join("data")).expect("create temp dir");
        let mut csv = String::from("timestamp,power_w\n");
        for h in 0..24 {
            let power = if h == 12 { 1000 } else { 0 };
            csv.push_str(&format!("2024-06-21T{h:02}:00:00Z,{power}\n"));
        }
        fs::write(dir.join("data/day.csv"), csv).expect("write csv");
        let scenario_path = dir.join("scenario.toml");
        fs::write(
            &scenario_path,
            "[production]\nsource = \"csv\"\ncsv_path = \"data/day.csv\"\n",
        )
        .expect("write scenario");

        let cfg = ScenarioConfig::from_toml_file(&scenario_path).expect("scenario parses");
        assert_eq!(cfg.production.csv_path, Some(dir.join("data/day.csv")));
        let series = cfg.production_series().expect("csv loads");
        assert_eq!(series.len(), 24);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn validation_requires_csv_path() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.production.source = "csv".to_string();
        assert!(cfg.validate().iter().any(|e| e.field == "production.csv_path"));
        assert!(cfg.production_series().is_err());
    }

    #[test]
    fn validation_catches_bad_resolution() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.production.steps_per_day = 7;
        assert!(cfg.validate().iter().any(|e| e.field == "production.steps_per_day"));
    }

    #[test]
    fn validation_catches_inverted_daylight() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.production.sunrise_hour = 20.0;
        cfg.production.sunset_hour = 6.0;
        assert!(cfg.validate().iter().any(|e| e.field == "production.sunrise_hour"));
    }

    #[test]
    fn validation_catches_duplicate_and_unknown_appliances() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.appliances.push(cfg.appliances[0].clone());
        cfg.appliances.push(ApplianceSpec {
            id: "jacuzzi".to_string(),
            profile: None,
            preferred_time: None,
        });
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "appliances[2].id"));
        assert!(errors.iter().any(|e| e.field == "appliances[3].profile"));
        assert!(cfg.build_appliances().is_err());
    }

    #[test]
    fn validation_catches_zero_top_n() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.scoring.top_n = Some(0);
        assert!(cfg.validate().iter().any(|e| e.field == "scoring.top_n"));
    }

    #[test]
    fn laundry_day_has_larger_array() {
        let base = ScenarioConfig::baseline();
        let laundry = ScenarioConfig::laundry_day();
        assert!(laundry.production.peak_w > base.production.peak_w);
        assert_eq!(laundry.scoring.sequencing, Sequencing::Residual);
        assert_eq!(laundry.appliances.len(), 3);
    }
}
