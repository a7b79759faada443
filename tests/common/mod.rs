use bayesboard_lib::app::{App, KeyScript, RunMode};
use bayesboard_lib::model::config::{AppConfig, ClockMode};
use bayesboard_lib::model::cpt::ConditionalProbabilityTable;
use bayesboard_lib::model::input::{Keyboard, SimulatedClock};
use bayesboard_lib::model::{NodeId, SeededRandom, Simulation};
use std::sync::Arc;

#[allow(dead_code)]
pub struct GameBuilder {
    config: AppConfig,
    keyboard: Keyboard,
    clock: Arc<SimulatedClock>,
}

#[allow(dead_code)]
impl GameBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.seed = Some("abc123".to_string());
        config.network.num_nodes = Some(7);
        config.timing.clock = ClockMode::Simulated;
        Self {
            config,
            keyboard: Keyboard::new(),
            clock: Arc::new(SimulatedClock::new()),
        }
    }

    pub fn with_seed(mut self, seed: &str) -> Self {
        self.config.seed = Some(seed.to_string());
        self
    }

    pub fn with_nodes(mut self, count: usize) -> Self {
        self.config.network.num_nodes = Some(count);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn keyboard(&self) -> Keyboard {
        self.keyboard.clone()
    }

    pub fn clock(&self) -> Arc<SimulatedClock> {
        self.clock.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn build(self) -> Simulation {
        let seed = self.config.seed.clone().unwrap_or_default();
        Simulation::from_config(
            &self.config,
            SeededRandom::from_seed_str(&seed),
            self.clock,
            self.keyboard,
        )
        .expect("Failed to build game")
    }

    pub fn build_app(self, script: KeyScript) -> App {
        App::new(self.config, RunMode::Headless, script).expect("Failed to build app")
    }
}

/// Pins `id` to always (or never) activate.
#[allow(dead_code)]
pub fn pin(game: &mut Simulation, id: NodeId, prob: f64) {
    let depth = game
        .network()
        .node(id)
        .expect("node")
        .derived()
        .expect("derived node")
        .parents()
        .len();
    let cpt = ConditionalProbabilityTable::constant(depth, prob).expect("table");
    game.network_mut().set_cpt(id, cpt).expect("set table");
}
