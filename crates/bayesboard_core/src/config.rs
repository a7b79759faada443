//! Configuration management for game parameters.
//!
//! Strongly-typed sections mapping to a `config.toml` file. Every field has a
//! default, so a file only needs the values it changes.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! seed = "abc123"
//!
//! [board]
//! dim = 16
//!
//! [network]
//! correlation_bound = 0.1
//! num_nodes = 7
//!
//! [scoring]
//! reward_points = 10
//! punish_points = 10
//! ```

use crate::network::DEFAULT_KEYS;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Board presentation parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    /// Cells per side of the square board.
    pub dim: usize,
    /// Color cells by role instead of by node color.
    pub cheat_mode: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            dim: 16,
            cheat_mode: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClockMode {
    /// Heat countdown follows real time.
    #[default]
    Wall,
    /// Heat countdown advances one frame per tick.
    Simulated,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub fps: u32,
    /// Milliseconds before heat death.
    pub game_length_ms: u64,
    pub clock: ClockMode,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fps: 5,
            game_length_ms: 2 * 60 * 1000,
            clock: ClockMode::Wall,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Table leaves are within this distance of 0 or 1.
    pub correlation_bound: f64,
    /// Chance a derived node reads its own previous state.
    pub stateful_prob: f64,
    /// Requested derived node count; drawn from the board size when absent.
    pub num_nodes: Option<usize>,
    pub keys: Vec<char>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            correlation_bound: 0.5,
            stateful_prob: 0.2,
            num_nodes: None,
            keys: DEFAULT_KEYS.to_vec(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub reward_points: i64,
    pub punish_points: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reward_points: 10,
            punish_points: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Ticks between summary log lines.
    pub report_interval: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            report_interval: 100,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Game seed; a random game name is used when absent.
    pub seed: Option<String>,
    pub board: BoardConfig,
    pub timing: TimingConfig,
    pub network: NetworkConfig,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.board.dim > 0 && self.board.dim <= 256,
            "Board dim must be in [1, 256]"
        );

        anyhow::ensure!(
            self.timing.fps > 0 && self.timing.fps <= 240,
            "FPS must be in [1, 240]"
        );
        anyhow::ensure!(
            self.timing.game_length_ms > 0,
            "Game length must be positive"
        );

        anyhow::ensure!(
            self.network.correlation_bound > 0.0 && self.network.correlation_bound <= 0.5,
            "Correlation bound must be in (0.0, 0.5]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.network.stateful_prob),
            "Stateful probability must be in [0.0, 1.0]"
        );
        if let Some(n) = self.network.num_nodes {
            anyhow::ensure!(n >= 2, "At least 2 nodes are needed for reward and punish");
        }
        let unique: HashSet<char> = self
            .network
            .keys
            .iter()
            .map(char::to_ascii_lowercase)
            .collect();
        anyhow::ensure!(
            unique.len() == self.network.keys.len(),
            "Input keys must be unique"
        );

        anyhow::ensure!(
            self.scoring.reward_points >= 0 && self.scoring.punish_points >= 0,
            "Points must be non-negative"
        );
        anyhow::ensure!(
            self.logging.report_interval > 0,
            "Report interval must be positive"
        );

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Milliseconds per frame.
    #[must_use]
    pub fn update_ms(&self) -> u64 {
        1000 / u64::from(self.timing.fps.max(1))
    }

    /// The configured node count, or `5 + round(random * dim² * 0.10)`.
    pub fn resolve_node_count<R: RandomSource>(&self, rng: &mut R) -> usize {
        match self.network.num_nodes {
            Some(n) => n,
            None => {
                let cells = (self.board.dim * self.board.dim) as f64;
                5 + (rng.random() * cells * 0.10).round() as usize
            }
        }
    }

    /// Hash of every section that changes game behaviour.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.network).as_bytes());
        hasher.update(format!("{:?}", self.scoring).as_bytes());
        hasher.update(format!("{:?}", self.timing).as_bytes());
        hasher.update(format!("{:?}", self.board.dim).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            seed = "abc123"
            [network]
            num_nodes = 7
            correlation_bound = 0.1
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.seed.as_deref(), Some("abc123"));
        assert_eq!(config.network.num_nodes, Some(7));
        assert_eq!(config.network.stateful_prob, 0.2);
        assert_eq!(config.scoring.reward_points, 10);
        assert_eq!(config.board.dim, 16);
    }

    #[test]
    fn test_clock_mode_parses_lowercase() {
        let config = AppConfig::from_toml("[timing]\nclock = \"simulated\"\n").expect("valid");
        assert_eq!(config.timing.clock, ClockMode::Simulated);
    }

    #[test]
    fn test_invalid_correlation_bound() {
        let config = AppConfig {
            network: NetworkConfig {
                correlation_bound: 0.7,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_too_few_nodes() {
        let config = AppConfig {
            network: NetworkConfig {
                num_nodes: Some(1),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_keys() {
        let config = AppConfig {
            network: NetworkConfig {
                keys: vec!['a', 'A'],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_fps() {
        let config = AppConfig {
            timing: TimingConfig {
                fps: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_update_ms() {
        assert_eq!(AppConfig::default().update_ms(), 200);
    }

    #[test]
    fn test_resolved_node_count_within_board_range() {
        let config = AppConfig::default();
        let mut rng = SeededRandom::from_u64(1);
        for _ in 0..100 {
            let n = config.resolve_node_count(&mut rng);
            assert!((5..=31).contains(&n));
        }
    }

    #[test]
    fn test_fingerprint_consistency() {
        let a = AppConfig::default();
        let mut b = AppConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.scoring.punish_points = 20;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
