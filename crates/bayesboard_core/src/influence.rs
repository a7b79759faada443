//! Counterfactual influence of a parent on its child.
//!
//! The weight of an edge is the child's activation probability under the
//! committed states minus the probability with only that parent flipped.
//! Positive weights mean the parent's actual state is pushing the child
//! towards activation. The value is meant for presentation (edge color and
//! intensity) and never feeds back into the simulation.

use crate::error::{EngineError, Result};
use crate::network::Network;
use bayesboard_data::{EdgeSnapshot, NodeId};

pub fn weight(network: &Network, parent: NodeId, child: NodeId) -> Result<f64> {
    network.node(parent)?;
    let node = network
        .node(child)?
        .derived()
        .ok_or(EngineError::NotDerived(child))?;
    let states = network.states();
    let actual = node.probability(states, states)?;
    let counterfactual = node.hypothetical(states, parent)?;
    Ok(finite_or_zero(actual - counterfactual))
}

/// Weights for every edge of the network, in [`Network::edges`] order.
pub fn edge_weights(network: &Network) -> Result<Vec<EdgeSnapshot>> {
    network
        .edges()
        .into_iter()
        .map(|(source_id, target_id)| {
            Ok(EdgeSnapshot {
                source_id,
                target_id,
                weight: weight(network, source_id, target_id)?,
            })
        })
        .collect()
}

/// Presentation metrics fall back to 0 rather than carrying NaN or infinity.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
