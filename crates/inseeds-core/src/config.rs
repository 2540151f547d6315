//! Configuration loading and typed config structures for the INSEEDS
//! farming simulation.
//!
//! The canonical configuration lives in `inseeds-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every field is optional in the YAML and falls back to the default
//! documented on it.

use std::path::Path;

use serde::Deserialize;

use inseeds_agents::FarmerConfig;

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

    /// A value parsed but is outside its valid range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `inseeds-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, metadata).
    #[serde(default)]
    pub world: WorldConfig,

    /// Coupling parameters of the farming component.
    #[serde(default)]
    pub coupled_config: CoupledConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Output table settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.coupled_config.validate()?;
        Ok(config)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Country the world represents, reported in world-scoped output rows.
    #[serde(default)]
    pub country: Option<String>,

    /// World area in square kilometres, reported in world-scoped rows.
    #[serde(default)]
    pub area_km2: Option<f64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            country: None,
            area_km2: None,
        }
    }
}

/// Farmer decision behaviour selected in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviourKind {
    /// Adopt the neighbourhood majority past an AFT-specific threshold.
    #[default]
    Imitation,
    /// Never change practice.
    Hold,
}

/// Coupling parameters of the farming component.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoupledConfig {
    /// Number of world-scoped decision makers (default: 3).
    #[serde(default = "default_num_decision_makers")]
    pub num_decision_makers: u32,

    /// Number of lobby groups (default: 2). Lobby groups are bound one per
    /// AFT, so this must equal the number of AFTs.
    #[serde(default = "default_num_lobby_groups")]
    pub num_lobby_groups: u32,

    /// Probability that a new farmer is a pioneer (default: 0.5).
    #[serde(default = "default_pioneer_share")]
    pub pioneer_share: f64,

    /// Neighbourhood radius in degrees (default: 1.0).
    #[serde(default = "default_neighbourhood_radius_deg")]
    pub neighbourhood_radius_deg: f64,

    /// Maximum neighbourhood size (default: 8).
    #[serde(default = "default_max_neighbours")]
    pub max_neighbours: u32,

    /// Majority share a traditionalist needs to switch (default: 0.75).
    #[serde(default = "default_imitation_threshold_traditionalist")]
    pub imitation_threshold_traditionalist: f64,

    /// Majority share a pioneer needs to switch (default: 0.5).
    #[serde(default = "default_imitation_threshold_pioneer")]
    pub imitation_threshold_pioneer: f64,

    /// Farmer decision behaviour (default: imitation).
    #[serde(default)]
    pub behaviour: BehaviourKind,
}

impl CoupledConfig {
    /// Check value ranges that the YAML types cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let shares = [
            ("pioneer_share", self.pioneer_share),
            (
                "imitation_threshold_traditionalist",
                self.imitation_threshold_traditionalist,
            ),
            ("imitation_threshold_pioneer", self.imitation_threshold_pioneer),
        ];
        for (field, value) in shares {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    reason: format!("{field} must lie in [0, 1], got {value}"),
                });
            }
        }
        if self.neighbourhood_radius_deg.is_nan() || self.neighbourhood_radius_deg < 0.0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "neighbourhood_radius_deg must be non-negative, got {}",
                    self.neighbourhood_radius_deg
                ),
            });
        }
        Ok(())
    }

    /// Farmer parameters derived from this section.
    pub fn farmer_config(&self) -> FarmerConfig {
        FarmerConfig {
            neighbourhood_radius_deg: self.neighbourhood_radius_deg,
            max_neighbours: usize::try_from(self.max_neighbours).unwrap_or(usize::MAX),
            imitation_threshold_traditionalist: self.imitation_threshold_traditionalist,
            imitation_threshold_pioneer: self.imitation_threshold_pioneer,
        }
    }
}

impl Default for CoupledConfig {
    fn default() -> Self {
        Self {
            num_decision_makers: default_num_decision_makers(),
            num_lobby_groups: default_num_lobby_groups(),
            pioneer_share: default_pioneer_share(),
            neighbourhood_radius_deg: default_neighbourhood_radius_deg(),
            max_neighbours: default_max_neighbours(),
            imitation_threshold_traditionalist: default_imitation_threshold_traditionalist(),
            imitation_threshold_pioneer: default_imitation_threshold_pioneer(),
            behaviour: BehaviourKind::default(),
        }
    }
}

/// Simulation boundary parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Number of ticks to run (default: 10).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
        }
    }
}

/// Output table settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Whether output rows are collected at all (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON-lines file the engine writes rows to (default: none).
    #[serde(default)]
    pub path: Option<String>,

    /// Farmer variables to report; all declared ones when absent.
    #[serde(default)]
    pub farmer_variables: Option<Vec<String>>,

    /// Decision maker variables to report; all declared ones when absent.
    #[serde(default)]
    pub decision_maker_variables: Option<Vec<String>>,

    /// Lobby group variables to report; all declared ones when absent.
    #[serde(default)]
    pub lobby_group_variables: Option<Vec<String>>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            farmer_variables: None,
            decision_maker_variables: None,
            lobby_group_variables: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    String::from("INSEEDS")
}

const fn default_seed() -> u64 {
    42
}

const fn default_num_decision_makers() -> u32 {
    3
}

const fn default_num_lobby_groups() -> u32 {
    2
}

const fn default_pioneer_share() -> f64 {
    0.5
}

const fn default_neighbourhood_radius_deg() -> f64 {
    1.0
}

const fn default_max_neighbours() -> u32 {
    8
}

const fn default_imitation_threshold_traditionalist() -> f64 {
    0.75
}

const fn default_imitation_threshold_pioneer() -> f64 {
    0.5
}

const fn default_max_ticks() -> u64 {
    10
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SimulationConfig::default();
        assert_eq!(config.coupled_config.num_decision_makers, 3);
        assert_eq!(config.coupled_config.num_lobby_groups, 2);
        assert_eq!(config.coupled_config.behaviour, BehaviourKind::Imitation);
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.simulation.max_ticks, 10);
        assert!(config.output.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Brandenburg"
  seed: 7
  country: "DEU"
  area_km2: 29654.0

coupled_config:
  num_decision_makers: 5
  num_lobby_groups: 2
  pioneer_share: 0.3
  neighbourhood_radius_deg: 1.5
  max_neighbours: 4
  imitation_threshold_traditionalist: 0.8
  imitation_threshold_pioneer: 0.6
  behaviour: hold

simulation:
  max_ticks: 25

output:
  enabled: true
  path: "out/rows.jsonl"
  lobby_group_variables: ["agreement"]

logging:
  level: "debug"
"#;

        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world.name, "Brandenburg");
        assert_eq!(config.world.country.as_deref(), Some("DEU"));
        assert_eq!(config.coupled_config.num_decision_makers, 5);
        assert_eq!(config.coupled_config.max_neighbours, 4);
        assert_eq!(config.coupled_config.behaviour, BehaviourKind::Hold);
        assert_eq!(config.simulation.max_ticks, 25);
        assert_eq!(config.output.path.as_deref(), Some("out/rows.jsonl"));
        assert_eq!(
            config.output.lobby_group_variables,
            Some(vec![String::from("agreement")])
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn absent_counts_fall_back_to_defaults() {
        let yaml = "coupled_config:\n  pioneer_share: 0.25\n";
        let config = SimulationConfig::parse(yaml).ok().unwrap_or_default();
        assert_eq!(config.coupled_config.num_decision_makers, 3);
        assert_eq!(config.coupled_config.num_lobby_groups, 2);
    }

    #[test]
    fn configured_counts_are_used() {
        let yaml = "coupled_config:\n  num_decision_makers: 7\n  num_lobby_groups: 4\n";
        let config = SimulationConfig::parse(yaml).ok().unwrap_or_default();
        assert_eq!(config.coupled_config.num_decision_makers, 7);
        assert_eq!(config.coupled_config.num_lobby_groups, 4);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = SimulationConfig::parse("");
        assert!(config.is_ok_and(|c| c == SimulationConfig::default()));
    }

    #[test]
    fn out_of_range_share_rejected() {
        let yaml = "coupled_config:\n  pioneer_share: 1.5\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn farmer_config_mirrors_section() {
        let section = CoupledConfig {
            max_neighbours: 3,
            neighbourhood_radius_deg: 2.0,
            ..CoupledConfig::default()
        };
        let farmer = section.farmer_config();
        assert_eq!(farmer.max_neighbours, 3);
        assert!((farmer.neighbourhood_radius_deg - 2.0).abs() < f64::EPSILON);
    }
}
