//! Error types for the bayesboard engine.
//!
//! Construction and evaluation failures are reported here; configuration
//! problems go through `anyhow` in [`crate::config`].

use bayesboard_data::NodeId;
use thiserror::Error;

/// Main error type for engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Fewer derived nodes requested than there are scoring roles.
    #[error("network needs at least 2 derived nodes, {requested} requested")]
    NetworkTooSmall { requested: usize },

    /// Sampling without replacement from too small a collection.
    #[error("cannot sample {requested} distinct elements from {available}")]
    SampleTooLarge { requested: usize, available: usize },

    /// Empty inclusive integer range.
    #[error("invalid range [{min}, {max}]")]
    InvalidRange { min: i64, max: i64 },

    /// Parent-state sequence length differs from the table depth.
    #[error("probability table of depth {expected} given {actual} parent states")]
    DepthMismatch { expected: usize, actual: usize },

    /// Table depth outside the supported range.
    #[error("unsupported probability table depth {0}")]
    InvalidDepth(usize),

    /// Leaf probability outside `[0, 1]` or not finite.
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    /// Correlation bound outside `[0, 1]` or not finite.
    #[error("correlation bound {0} is outside [0, 1]")]
    InvalidCorrelationBound(f64),

    /// Explicit leaf list of the wrong size.
    #[error("depth {depth} needs {expected} leaves, got {actual}")]
    LeafCountMismatch {
        depth: usize,
        expected: usize,
        actual: usize,
    },

    /// Handle does not belong to the network.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Operation needs a table-driven node but got an input.
    #[error("node {0} is an input and has no probability table")]
    NotDerived(NodeId),

    /// Influence requested along an edge that does not exist.
    #[error("{parent} is not a parent of {child}")]
    NotAParent { parent: NodeId, child: NodeId },

    /// A parent was read before it was ever recalculated.
    #[error("{node} read uninitialized parent {parent}")]
    UninitializedParent { node: NodeId, parent: NodeId },

    /// Lookup on a network without derived nodes.
    #[error("network has no derived nodes")]
    NoDerivedNodes,

    /// Graph shape breaks the layered-DAG rules.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// Tick requested after teardown.
    #[error("simulation has been torn down")]
    Stopped,

    /// Input source refused a subscription.
    #[error("subscription failed: {0}")]
    Subscription(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
