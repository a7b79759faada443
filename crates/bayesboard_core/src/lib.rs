//! # Bayesboard Core
//!
//! The game engine behind Bayesboard, a screensaver game where a hidden
//! probabilistic boolean network drives a grid of colored cells.
//!
//! This crate contains the deterministic engine, including:
//! - Seeded randomness with reproducible sampling helpers
//! - Conditional probability tables and table-driven nodes
//! - Input adapters for the clock ("heat") and keyboard keys
//! - Layered network construction, ticking, and influence weights
//! - Scoring, snapshots, and lifecycle of a running game
//! - Color feature extraction for board observations
//! - Metrics collection and structured logging
//!
//! ## Example
//!
//! ```
//! use bayesboard_core::network::NetworkBuilder;
//! use bayesboard_core::random::SeededRandom;
//! use bayesboard_core::simulation::{ScoreRules, Simulation};
//!
//! let mut rng = SeededRandom::from_seed_str("abc123");
//! let network = NetworkBuilder::new(7).build(&mut rng).unwrap();
//! let mut game = Simulation::new(network, rng, ScoreRules::default());
//! let report = game.tick().unwrap();
//! assert_eq!(report.tick, 1);
//! ```

/// Configuration loading and validation
pub mod config;
/// Conditional probability tables keyed by parent states
pub mod cpt;
/// Engine error type
pub mod error;
/// Edge weights: how much a parent sways its child
pub mod influence;
/// Clock and keyboard driven input nodes
pub mod input;
/// Performance metrics collection and logging
pub mod metrics;
/// Random node names and colors
pub mod naming;
/// Layered network of input and derived nodes
pub mod network;
/// Table-driven derived nodes
pub mod node;
/// Seeded random source
pub mod random;
/// Color filters, convolution, and aggregators
pub mod representation;
/// Game loop state: ticking, scoring, snapshots
pub mod simulation;

pub use error::{EngineError, Result};
pub use metrics::{init_logging, Metrics};
pub use network::{Network, NetworkBuilder};
pub use random::{RandomSource, SeededRandom};
pub use simulation::{ScoreRules, Simulation, TickReport};
