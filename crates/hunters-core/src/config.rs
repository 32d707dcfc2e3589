//! Configuration loading and typed config structures.
//!
//! The configuration lives in `hunters-config.yaml` in the working
//! directory. Every field has a default, so a partial file (or no file at
//! all) yields a runnable world. [`SimulationConfig::validate`] rejects
//! values the engine cannot honour before anything is seeded.

use std::path::Path;

use hunters_types::{GameMap, MissionType};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Map, seed, and tick cadence.
    #[serde(default)]
    pub world: WorldConfig,

    /// Presence decay.
    #[serde(default)]
    pub presence: PresenceConfig,

    /// Mission durations and scouting radius.
    #[serde(default)]
    pub missions: MissionConfig,

    /// Capture probability tuning.
    #[serde(default)]
    pub capture: CaptureConfig,

    /// HTTP server and subscriber limits.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// Environment variables override the server address:
    /// - `HUNTERS_HOST` overrides `server.host`
    /// - `HUNTERS_PORT` overrides `server.port`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.server.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable by the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.map_width == 0 || self.world.map_height == 0 {
            return Err(invalid("world.map_width", "map dimensions must be at least 1"));
        }
        if self.world.tick_interval_ms == 0 {
            return Err(invalid("world.tick_interval_ms", "must be at least 1"));
        }
        if self.world.minutes_per_tick == 0 {
            return Err(invalid("world.minutes_per_tick", "must be at least 1"));
        }
        if !(self.presence.decay_per_minute >= 0.0 && self.presence.decay_per_minute <= 1.0) {
            return Err(invalid("presence.decay_per_minute", "must be within [0, 1]"));
        }
        if self.missions.scout_minutes == 0
            || self.missions.observe_minutes == 0
            || self.missions.capture_minutes == 0
        {
            return Err(invalid("missions", "durations must be at least 1 minute"));
        }
        self.capture.validate()?;
        if self.server.subscriber_buffer == 0 {
            return Err(invalid("server.subscriber_buffer", "must be at least 1"));
        }
        if self.server.max_subscription_secs == 0 {
            return Err(invalid("server.max_subscription_secs", "must be at least 1"));
        }
        if self.server.max_tick_minutes == 0 {
            return Err(invalid("server.max_tick_minutes", "must be at least 1"));
        }
        Ok(())
    }

    /// Grid dimensions as a [`GameMap`].
    pub const fn map(&self) -> GameMap {
        GameMap {
            width: self.world.map_width,
            height: self.world.map_height,
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_owned(),
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable world name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed for the capture roll generator. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Grid columns.
    #[serde(default = "default_map_size")]
    pub map_width: u32,

    /// Grid rows.
    #[serde(default = "default_map_size")]
    pub map_height: u32,

    /// Real-time milliseconds between driver ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Simulated minutes advanced by each driver tick.
    #[serde(default = "default_minutes_per_tick")]
    pub minutes_per_tick: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: None,
            map_width: default_map_size(),
            map_height: default_map_size(),
            tick_interval_ms: default_tick_interval_ms(),
            minutes_per_tick: default_minutes_per_tick(),
        }
    }
}

/// Presence decay configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PresenceConfig {
    /// Presence lost per simulated minute.
    #[serde(default = "default_decay_per_minute")]
    pub decay_per_minute: f64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            decay_per_minute: default_decay_per_minute(),
        }
    }
}

/// Mission timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MissionConfig {
    /// Duration of a scout mission in simulated minutes.
    #[serde(default = "default_scout_minutes")]
    pub scout_minutes: u64,

    /// Duration of an observe mission in simulated minutes.
    #[serde(default = "default_short_mission_minutes")]
    pub observe_minutes: u64,

    /// Duration of a capture mission in simulated minutes.
    #[serde(default = "default_short_mission_minutes")]
    pub capture_minutes: u64,

    /// Chebyshev radius a scouting hunter reveals around its cell.
    #[serde(default = "default_scout_radius")]
    pub scout_radius: u32,

    /// Terminal missions kept in the store (oldest pruned first).
    #[serde(default = "default_finished_history")]
    pub finished_history: usize,
}

impl MissionConfig {
    /// Fixed duration for a mission type.
    pub const fn duration(&self, mission_type: MissionType) -> u64 {
        match mission_type {
            MissionType::Scout => self.scout_minutes,
            MissionType::Observe => self.observe_minutes,
            MissionType::Capture => self.capture_minutes,
        }
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            scout_minutes: default_scout_minutes(),
            observe_minutes: default_short_mission_minutes(),
            capture_minutes: default_short_mission_minutes(),
            scout_radius: default_scout_radius(),
            finished_history: default_finished_history(),
        }
    }
}

/// Capture probability tuning.
///
/// `chance = clamp(base + skill_bonus*skill + presence_bonus*presence
/// - threat_penalty*threat, min_chance, max_chance)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CaptureConfig {
    /// Starting chance before modifiers.
    #[serde(default = "default_capture_base")]
    pub base: f64,

    /// Added per point of hunter skill.
    #[serde(default = "default_skill_bonus")]
    pub skill_bonus: f64,

    /// Subtracted per point of monster threat.
    #[serde(default = "default_threat_penalty")]
    pub threat_penalty: f64,

    /// Multiplied by the monster's current presence.
    #[serde(default = "default_presence_bonus")]
    pub presence_bonus: f64,

    /// Lower clamp on the final chance.
    #[serde(default = "default_min_chance")]
    pub min_chance: f64,

    /// Upper clamp on the final chance.
    #[serde(default = "default_max_chance")]
    pub max_chance: f64,

    /// Presence removed from a monster that escapes a capture.
    #[serde(default = "default_failure_presence_penalty")]
    pub failure_presence_penalty: f64,
}

impl CaptureConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.min_chance) || !unit.contains(&self.max_chance) {
            return Err(invalid("capture.min_chance", "chance bounds must be within [0, 1]"));
        }
        if self.min_chance > self.max_chance {
            return Err(invalid("capture.min_chance", "must not exceed capture.max_chance"));
        }
        if !unit.contains(&self.failure_presence_penalty) {
            return Err(invalid(
                "capture.failure_presence_penalty",
                "must be within [0, 1]",
            ));
        }
        let rates = [
            self.base,
            self.skill_bonus,
            self.threat_penalty,
            self.presence_bonus,
        ];
        if rates.iter().any(|r| !r.is_finite()) {
            return Err(invalid("capture", "modifiers must be finite"));
        }
        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            base: default_capture_base(),
            skill_bonus: default_skill_bonus(),
            threat_penalty: default_threat_penalty(),
            presence_bonus: default_presence_bonus(),
            min_chance: default_min_chance(),
            max_chance: default_max_chance(),
            failure_presence_penalty: default_failure_presence_penalty(),
        }
    }
}

/// HTTP server and subscriber configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Snapshots buffered per observer before it counts as lagging.
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,

    /// Wall-clock seconds after which a stream subscription is force-closed.
    #[serde(default = "default_max_subscription_secs")]
    pub max_subscription_secs: u64,

    /// Largest `minutes` accepted by the on-demand tick endpoint.
    #[serde(default = "default_max_tick_minutes")]
    pub max_tick_minutes: u64,
}

impl ServerSection {
    /// Override host and port from `HUNTERS_HOST` / `HUNTERS_PORT`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("HUNTERS_HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("HUNTERS_PORT") {
            self.port = val.parse().map_err(|e| ConfigError::Invalid {
                field: "HUNTERS_PORT",
                reason: format!("{val}: {e}"),
            })?;
        }
        Ok(())
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            subscriber_buffer: default_subscriber_buffer(),
            max_subscription_secs: default_max_subscription_secs(),
            max_tick_minutes: default_max_tick_minutes(),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Line format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Hollow Vale".to_owned()
}

const fn default_map_size() -> u32 {
    6
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_minutes_per_tick() -> u64 {
    1
}

const fn default_decay_per_minute() -> f64 {
    0.01
}

const fn default_scout_minutes() -> u64 {
    60
}

const fn default_short_mission_minutes() -> u64 {
    5
}

const fn default_scout_radius() -> u32 {
    1
}

const fn default_finished_history() -> usize {
    200
}

const fn default_capture_base() -> f64 {
    0.45
}

const fn default_skill_bonus() -> f64 {
    0.10
}

const fn default_threat_penalty() -> f64 {
    0.08
}

const fn default_presence_bonus() -> f64 {
    0.20
}

const fn default_min_chance() -> f64 {
    0.10
}

const fn default_max_chance() -> f64 {
    0.90
}

const fn default_failure_presence_penalty() -> f64 {
    0.10
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

const fn default_subscriber_buffer() -> usize {
    16
}

const fn default_max_subscription_secs() -> u64 {
    1_800
}

const fn default_max_tick_minutes() -> u64 {
    1_440
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.map(), GameMap { width: 6, height: 6 });
        assert_eq!(config.missions.duration(MissionType::Scout), 60);
        assert_eq!(config.missions.duration(MissionType::Observe), 5);
        assert_eq!(config.missions.duration(MissionType::Capture), 5);
        assert_eq!(config.world.seed, None);
    }

    #[test]
    fn parse_partial_yaml_fills_defaults() {
        let yaml = r"
world:
  name: Fenmarch
  seed: 7
  map_width: 10
missions:
  scout_minutes: 30
logging:
  format: json
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "Fenmarch");
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.world.map_width, 10);
        assert_eq!(config.world.map_height, 6);
        assert_eq!(config.missions.scout_minutes, 30);
        assert_eq!(config.missions.observe_minutes, 5);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!((config.capture.base - 0.45).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_document_is_default() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config.world, WorldConfig::default());
        assert_eq!(config.missions, MissionConfig::default());
    }

    #[test]
    fn zero_map_is_rejected() {
        let err = SimulationConfig::parse("world:\n  map_width: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn inverted_chance_bounds_are_rejected() {
        let yaml = "capture:\n  min_chance: 0.8\n  max_chance: 0.2\n";
        let err = SimulationConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = SimulationConfig::parse("missions:\n  capture_minutes: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = SimulationConfig::parse(include_str!("../../../hunters-config.yaml")).unwrap();
        let defaults = SimulationConfig::default();
        assert_eq!(config.world, defaults.world);
        assert_eq!(config.presence, defaults.presence);
        assert_eq!(config.missions, defaults.missions);
        assert_eq!(config.capture, defaults.capture);
        assert_eq!(config.logging, defaults.logging);
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = SimulationConfig::parse("world: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
