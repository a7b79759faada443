use anyhow::Result;
use std::sync::Arc;

use crate::app::board::Board;
use crate::app::script::KeyScript;
use crate::model::config::{AppConfig, ClockMode};
use crate::model::input::{Clock, Keyboard, SimulatedClock, SystemClock};
use crate::model::naming::random_name;
use crate::model::simulation::TickReport;
use crate::model::{SeededRandom, Simulation};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// One tick per frame on the wall clock.
    Realtime,
    /// Ticks back to back on a simulated clock.
    Headless,
}

pub struct App {
    pub running: bool,
    pub mode: RunMode,
    pub config: AppConfig,
    pub game: Simulation,
    pub keyboard: Keyboard,
    pub board: Board,
    seed: String,
    script: KeyScript,
    // Present when the heat countdown follows game time.
    sim_clock: Option<Arc<SimulatedClock>>,
}

impl App {
    /// Builds a game from `config`, naming it randomly when no seed is set.
    pub fn new(config: AppConfig, mode: RunMode, script: KeyScript) -> Result<Self> {
        config.validate()?;
        let seed = config
            .seed
            .clone()
            .unwrap_or_else(|| random_name(&mut SeededRandom::from_entropy()));

        let sim_clock = (mode == RunMode::Headless || config.timing.clock == ClockMode::Simulated)
            .then(|| Arc::new(SimulatedClock::new()));
        let clock: Arc<dyn Clock> = match &sim_clock {
            Some(clock) => clock.clone() as Arc<dyn Clock>,
            None => Arc::new(SystemClock::new()),
        };

        let keyboard = Keyboard::new();
        let rng = SeededRandom::from_seed_str(&seed);
        let game = Simulation::from_config(&config, rng, clock, keyboard.clone())?;
        let mut board = Board::new(config.board.dim, config.board.cheat_mode);
        board.update(&game)?;

        tracing::info!(
            %seed,
            nodes = game.network().nodes().len(),
            fingerprint = %config.fingerprint(),
            ?mode,
            "Game ready"
        );

        Ok(Self {
            running: true,
            mode,
            config,
            game,
            keyboard,
            board,
            seed,
            script,
            sim_clock,
        })
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Milliseconds of game time before the next tick.
    pub fn game_time_ms(&self) -> u64 {
        self.game.tick_count() * self.config.update_ms()
    }

    /// Ticks until heat death on a simulated clock.
    pub fn default_ticks(&self) -> u64 {
        self.config.timing.game_length_ms / self.config.update_ms() + 1
    }

    /// Applies scripted keys, ticks the game and repaints the board.
    pub fn step(&mut self) -> Result<TickReport> {
        let now = self.game_time_ms();
        self.script.apply(&self.keyboard, now);
        if let Some(clock) = &self.sim_clock {
            clock.set(now);
        }
        let report = self.game.tick()?;
        self.board.update(&self.game)?;
        Ok(report)
    }
}
