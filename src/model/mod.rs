pub use bayesboard_core::{EngineError, Metrics, RandomSource, SeededRandom, Simulation};
pub use bayesboard_data::{Activation, EdgeSnapshot, NodeId, NodeSnapshot, TickSnapshot};
pub mod config {
    pub use bayesboard_core::config::*;
}
pub mod cpt {
    pub use bayesboard_core::cpt::*;
}
pub mod influence {
    pub use bayesboard_core::influence::*;
}
pub mod input {
    pub use bayesboard_core::input::*;
}
pub mod naming {
    pub use bayesboard_core::naming::*;
}
pub mod network {
    pub use bayesboard_core::network::*;
}
pub mod representation {
    pub use bayesboard_core::representation::*;
}
pub mod simulation {
    pub use bayesboard_core::simulation::*;
}
