//! Plain data shared between the bayesboard engine and its consumers.
//!
//! Nothing in here knows how a network is evaluated; these are the handles,
//! states and per-tick snapshots that cross the engine boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense handle of a node inside a network arena.
///
/// Handles are assigned in construction order, so a smaller handle was always
/// built before a larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Observable phase of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Activation {
    /// Never recalculated.
    #[default]
    Uninitialized,
    Active,
    Inactive,
}

impl Activation {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub fn is_initialized(self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    /// Boolean view used by probability tables; `None` while uninitialized.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Uninitialized => None,
            Self::Active => Some(true),
            Self::Inactive => Some(false),
        }
    }
}

impl From<bool> for Activation {
    fn from(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// Role a node plays in scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeRole {
    #[default]
    Plain,
    Rewarding,
    Punishing,
}

/// Which family of node produced a snapshot entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKindTag {
    /// Wall-clock countdown input.
    Heat,
    /// Externally driven key input.
    Key,
    /// Node sampled from its conditional probability table.
    Derived,
}

/// Per-node state handed to renderers after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKindTag,
    pub active: bool,
    pub is_rewarding: bool,
    pub is_punishing: bool,
    pub stateful: bool,
    /// Layer index; inputs are layer 0.
    pub layer: usize,
    /// Position inside the layer.
    pub offset: usize,
    /// 24-bit RGB color for the current state.
    pub color: u32,
}

/// Weighted dependency edge, `source` being a parent of `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source_id: NodeId,
    pub target_id: NodeId,
    /// Counterfactual influence of the source on the target.
    pub weight: f64,
}

/// Complete, committed view of one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub score: i64,
    pub delta: i64,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl TickSnapshot {
    /// Serializes the snapshot as a single JSON line.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
