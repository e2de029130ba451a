/*
 *  config.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered configuration: defaults, YAML file, CLI overrides
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::display::components::jitter::{
    BurnInJitter, DEFAULT_MAX_OFFSET, DEFAULT_TRANSFORM_DURATION, MAX_OFFSET as MAX_JITTER_OFFSET,
};
use crate::display::components::pulse::PulseConfig;
use crate::display::scheduler::{DEFAULT_FAST_TICK, DEFAULT_JITTER_INTERVAL, SchedulerConfig};

/// Upper bounds for the two timer delays
pub const MAX_FAST_TICK_MS: u64 = 60_000;
pub const MAX_JITTER_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    /// log to this file instead of stderr (stderr shares the clock's tty)
    pub log_file: Option<PathBuf>,
    pub schedule: Option<ScheduleConfig>,
    pub jitter: Option<JitterConfig>,
    pub pulse: Option<PulseToggle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ScheduleConfig {
    pub fast_tick_ms: Option<u64>,
    pub jitter_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct JitterConfig {
    pub max_offset: Option<i32>,
    pub duration_ms: Option<u64>,
    /// fixed seed for a reproducible drift sequence
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PulseToggle {
    pub enabled: Option<bool>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "timeclock", version, about = "Full-screen zener clock", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, short = 'c', value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,
    /// Enable debug log level
    #[arg(long, short = 'v', alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub fast_tick_ms: Option<u64>,
    #[arg(long)]
    pub jitter_interval_secs: Option<u64>,
    #[arg(long)]
    pub jitter_max_offset: Option<i32>,
    #[arg(long)]
    pub jitter_seed: Option<u64>,
    /// Disable the clapper breathing pulse
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_pulse: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Parse CLI, read YAML, merge, validate.
///
/// Returns the CLI alongside so the caller can act on `dump_config`/`debug`.
pub fn load() -> Result<(Config, Cli), ConfigError> {
    let cli = Cli::parse();
    let cfg = resolve(&cli)?;
    Ok((cfg, cli))
}

/// Everything after argument parsing, separated for testing
pub fn resolve(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/timeclock/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/timeclock/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/timeclock.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["timeclock.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    if src.log_file.is_some()  { dst.log_file = src.log_file; }
    match (&mut dst.schedule, src.schedule) {
        (None, Some(s)) => dst.schedule = Some(s),
        (Some(d), Some(s)) => {
            if s.fast_tick_ms.is_some()         { d.fast_tick_ms = s.fast_tick_ms; }
            if s.jitter_interval_secs.is_some() { d.jitter_interval_secs = s.jitter_interval_secs; }
        }
        _ => {}
    }
    match (&mut dst.jitter, src.jitter) {
        (None, Some(j)) => dst.jitter = Some(j),
        (Some(d), Some(s)) => {
            if s.max_offset.is_some()  { d.max_offset = s.max_offset; }
            if s.duration_ms.is_some() { d.duration_ms = s.duration_ms; }
            if s.seed.is_some()        { d.seed = s.seed; }
        }
        _ => {}
    }
    if let Some(p) = src.pulse {
        if p.enabled.is_some() {
            dst.pulse = Some(p);
        }
    }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }
    if cli.log_file.is_some()  { cfg.log_file = cli.log_file.clone(); }
    if cli.debug { cfg.log_level = Some("debug".into()); }

    if cli.fast_tick_ms.is_some() || cli.jitter_interval_secs.is_some() {
        let schedule = cfg.schedule.get_or_insert_with(ScheduleConfig::default);
        if cli.fast_tick_ms.is_some()         { schedule.fast_tick_ms = cli.fast_tick_ms; }
        if cli.jitter_interval_secs.is_some() { schedule.jitter_interval_secs = cli.jitter_interval_secs; }
    }
    if cli.jitter_max_offset.is_some() || cli.jitter_seed.is_some() {
        let jitter = cfg.jitter.get_or_insert_with(JitterConfig::default);
        if cli.jitter_max_offset.is_some() { jitter.max_offset = cli.jitter_max_offset; }
        if cli.jitter_seed.is_some()       { jitter.seed = cli.jitter_seed; }
    }
    if cli.no_pulse {
        cfg.pulse = Some(PulseToggle { enabled: Some(false) });
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(schedule) = cfg.schedule.as_ref() {
        if let Some(ms) = schedule.fast_tick_ms {
            if !(1..=MAX_FAST_TICK_MS).contains(&ms) {
                return Err(ConfigError::Validation(format!(
                    "schedule fast_tick_ms must be 1..={}", MAX_FAST_TICK_MS
                )));
            }
        }
        if let Some(secs) = schedule.jitter_interval_secs {
            if !(1..=MAX_JITTER_INTERVAL_SECS).contains(&secs) {
                return Err(ConfigError::Validation(format!(
                    "schedule jitter_interval_secs must be 1..={}", MAX_JITTER_INTERVAL_SECS
                )));
            }
        }
    }
    if let Some(jitter) = cfg.jitter.as_ref() {
        if let Some(m) = jitter.max_offset {
            if !(0..=MAX_JITTER_OFFSET).contains(&m) {
                return Err(ConfigError::Validation(format!(
                    "jitter max_offset must be 0..={}", MAX_JITTER_OFFSET
                )));
            }
        }
    }
    Ok(())
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        let schedule = self.schedule.clone().unwrap_or_default();
        let pulse_enabled = self.pulse.as_ref().and_then(|p| p.enabled).unwrap_or(true);
        SchedulerConfig {
            fast_tick: schedule.fast_tick_ms.map(Duration::from_millis).unwrap_or(DEFAULT_FAST_TICK),
            jitter_interval: schedule
                .jitter_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_JITTER_INTERVAL),
            pulse: pulse_enabled.then(PulseConfig::default),
        }
    }

    pub fn build_jitter(&self) -> BurnInJitter {
        let jitter = self.jitter.clone().unwrap_or_default();
        let base = match jitter.seed {
            Some(seed) => BurnInJitter::seeded(seed),
            None => BurnInJitter::new(),
        };
        base.with_max_offset(jitter.max_offset.unwrap_or(DEFAULT_MAX_OFFSET))
            .with_duration(jitter.duration_ms.map(Duration::from_millis).unwrap_or(DEFAULT_TRANSFORM_DURATION))
    }
}
