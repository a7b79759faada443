//! Tick orchestration and scoring.
//!
//! A tick refreshes the inputs, recalculates every derived node in
//! construction order and scores the committed result. A tick either commits
//! completely or leaves the game exactly as it was, random stream included.

use crate::config::AppConfig;
use crate::error::{EngineError, Result};
use crate::influence;
use crate::input::{Clock, Keyboard};
use crate::metrics::Metrics;
use crate::network::{Network, NetworkBuilder, NetworkNode};
use crate::random::{RandomSource, SeededRandom};
use bayesboard_data::{NodeSnapshot, TickSnapshot};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRules {
    pub reward_points: i64,
    pub punish_points: i64,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            reward_points: 10,
            punish_points: 10,
        }
    }
}

/// Outcome of one committed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub delta: i64,
    pub score: i64,
}

/// Points earned by the committed states of `network`.
#[must_use]
pub fn score_delta(network: &Network, rules: &ScoreRules) -> i64 {
    network
        .nodes()
        .iter()
        .zip(network.states())
        .filter(|(_, state)| state.is_active())
        .map(|(node, _)| {
            if node.is_rewarding() {
                rules.reward_points
            } else if node.is_punishing() {
                -rules.punish_points
            } else {
                0
            }
        })
        .sum()
}

pub struct Simulation<R: RandomSource + Clone = SeededRandom> {
    network: Network,
    rng: R,
    rules: ScoreRules,
    score: i64,
    last_delta: i64,
    tick: u64,
    metrics: Metrics,
    torn_down: bool,
}

impl Simulation<SeededRandom> {
    /// Builds the network described by `config` and wraps it in a game.
    pub fn from_config(
        config: &AppConfig,
        mut rng: SeededRandom,
        clock: Arc<dyn Clock>,
        keyboard: Keyboard,
    ) -> Result<Self> {
        let count = config.resolve_node_count(&mut rng);
        let network = NetworkBuilder::new(count)
            .correlation_bound(config.network.correlation_bound)
            .stateful_prob(config.network.stateful_prob)
            .keys(&config.network.keys)
            .game_length_ms(config.timing.game_length_ms)
            .clock(clock)
            .keyboard(keyboard)
            .build(&mut rng)?;
        let rules = ScoreRules {
            reward_points: config.scoring.reward_points,
            punish_points: config.scoring.punish_points,
        };
        Ok(Self::new(network, rng, rules).with_metrics(Metrics::new(config.logging.report_interval)))
    }
}

impl<R: RandomSource + Clone> Simulation<R> {
    pub fn new(network: Network, rng: R, rules: ScoreRules) -> Self {
        Self {
            network,
            rng,
            rules,
            score: 0,
            last_delta: 0,
            tick: 0,
            metrics: Metrics::default(),
            torn_down: false,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Advances the game by one tick.
    pub fn tick(&mut self) -> Result<TickReport> {
        self.ensure_running()?;
        let started = Instant::now();
        let checkpoint = self.rng.clone();
        if let Err(e) = self.network.advance(&mut self.rng) {
            self.rng = checkpoint;
            self.metrics.record_failure(&e);
            return Err(e);
        }

        let delta = score_delta(&self.network, &self.rules);
        self.score += delta;
        self.last_delta = delta;
        self.tick += 1;

        let active = self.network.states().iter().filter(|s| s.is_active()).count();
        self.metrics
            .record_tick(started.elapsed(), self.score, delta, active);
        Ok(TickReport {
            tick: self.tick,
            delta,
            score: self.score,
        })
    }

    /// Runs `ticks` ticks, stopping at the first failure.
    pub fn run(&mut self, ticks: u64) -> Result<Vec<TickReport>> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    /// Derived node shown at a board index; indices wrap around.
    pub fn lookup(&self, index: usize) -> Result<&NetworkNode> {
        self.network.lookup(index)
    }

    /// Committed state of every node and weight of every edge.
    pub fn snapshot(&self) -> Result<TickSnapshot> {
        let states = self.network.states();
        let nodes = self
            .network
            .nodes()
            .iter()
            .zip(states)
            .map(|(node, &state)| NodeSnapshot {
                id: node.id,
                name: node.name.clone(),
                kind: node.kind_tag(),
                active: state.is_active(),
                is_rewarding: node.is_rewarding(),
                is_punishing: node.is_punishing(),
                stateful: node.is_stateful(),
                layer: node.layer,
                offset: node.offset,
                color: node.color(state),
            })
            .collect();
        Ok(TickSnapshot {
            tick: self.tick,
            score: self.score,
            delta: self.last_delta,
            nodes,
            edges: influence::edge_weights(&self.network)?,
        })
    }

    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Mutable access for pinning tables between ticks.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    #[must_use]
    pub fn rules(&self) -> &ScoreRules {
        &self.rules
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Releases input subscriptions. Further ticks fail.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            self.network.teardown();
            self.torn_down = true;
            tracing::info!(tick = self.tick, score = self.score, "Simulation torn down");
        }
    }

    /// Errors if the game was already torn down.
    pub fn ensure_running(&self) -> Result<()> {
        if self.torn_down {
            return Err(EngineError::Stopped);
        }
        Ok(())
    }
}

impl<R: RandomSource + Clone> Drop for Simulation<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
