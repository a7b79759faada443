//! Table-driven nodes.
//!
//! A [`Node`] does not own its activation; states live in the network's
//! double buffer and are passed in. This keeps evaluation pure and lets the
//! self edge of a stateful node read the pre-tick buffer while its other
//! parents are read from the buffer being written this tick.

use crate::cpt::ConditionalProbabilityTable;
use crate::error::{EngineError, Result};
use crate::random::RandomSource;
use bayesboard_data::{Activation, NodeId};

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    /// Fixed evaluation order; a stateful node's own id comes last.
    parents: Vec<NodeId>,
    cpt: ConditionalProbabilityTable,
    stateful: bool,
}

impl Node {
    /// Builds a node with a fresh random table sized to its parents.
    pub fn build<R: RandomSource>(
        id: NodeId,
        parents: &[NodeId],
        stateful: bool,
        correlation_bound: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let parents = with_self_edge(id, parents, stateful);
        let cpt = ConditionalProbabilityTable::build(parents.len(), correlation_bound, rng)?;
        Ok(Self {
            id,
            parents,
            cpt,
            stateful,
        })
    }

    /// Builds a node around an existing table.
    pub fn with_cpt(
        id: NodeId,
        parents: &[NodeId],
        stateful: bool,
        cpt: ConditionalProbabilityTable,
    ) -> Result<Self> {
        let parents = with_self_edge(id, parents, stateful);
        if cpt.depth() != parents.len() {
            return Err(EngineError::DepthMismatch {
                expected: parents.len(),
                actual: cpt.depth(),
            });
        }
        Ok(Self {
            id,
            parents,
            cpt,
            stateful,
        })
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    #[must_use]
    pub fn cpt(&self) -> &ConditionalProbabilityTable {
        &self.cpt
    }

    #[must_use]
    pub fn is_stateful(&self) -> bool {
        self.stateful
    }

    pub(crate) fn replace_cpt(&mut self, cpt: ConditionalProbabilityTable) -> Result<()> {
        if cpt.depth() != self.parents.len() {
            return Err(EngineError::DepthMismatch {
                expected: self.parents.len(),
                actual: cpt.depth(),
            });
        }
        self.cpt = cpt;
        Ok(())
    }

    /// Parent states in table order: the self edge from `previous`, every
    /// other parent from `current`.
    pub fn parent_states(&self, current: &[Activation], previous: &[Activation]) -> Result<Vec<bool>> {
        self.parents
            .iter()
            .map(|&parent| {
                let buffer = if parent == self.id { previous } else { current };
                let state = buffer
                    .get(parent.index())
                    .ok_or(EngineError::UnknownNode(parent))?;
                state.as_bool().ok_or(EngineError::UninitializedParent {
                    node: self.id,
                    parent,
                })
            })
            .collect()
    }

    pub fn probability(&self, current: &[Activation], previous: &[Activation]) -> Result<f64> {
        let states = self.parent_states(current, previous)?;
        self.cpt.evaluate(&states)
    }

    /// Weighted coin flip with the node's current activation probability.
    pub fn recalculate<R: RandomSource>(
        &self,
        current: &[Activation],
        previous: &[Activation],
        rng: &mut R,
    ) -> Result<bool> {
        let prob = self.probability(current, previous)?;
        Ok(rng.bool_with_prob(prob))
    }

    /// Probability with `flipped` inverted and every other parent as in `states`.
    ///
    /// Pure: reads one committed buffer for all parents, self edge included.
    pub fn hypothetical(&self, states: &[Activation], flipped: NodeId) -> Result<f64> {
        if !self.parents.contains(&flipped) {
            return Err(EngineError::NotAParent {
                parent: flipped,
                child: self.id,
            });
        }
        let mut parent_states = self.parent_states(states, states)?;
        for (slot, &parent) in parent_states.iter_mut().zip(&self.parents) {
            if parent == flipped {
                *slot = !*slot;
            }
        }
        self.cpt.evaluate(&parent_states)
    }
}

fn with_self_edge(id: NodeId, parents: &[NodeId], stateful: bool) -> Vec<NodeId> {
    let mut parents = parents.to_vec();
    if stateful {
        parents.push(id);
    }
    parents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use bayesboard_data::Activation::{Active, Inactive, Uninitialized};

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    #[test]
    fn test_stateful_node_has_extra_depth() {
        let mut rng = SeededRandom::from_u64(1);
        let node = Node::build(NodeId(1), &ids(&[0]), true, 0.5, &mut rng).expect("builds");
        assert_eq!(node.cpt().depth(), 2);
        assert_eq!(node.parents(), &ids(&[0, 1])[..]);

        let plain = Node::build(NodeId(1), &ids(&[0]), false, 0.5, &mut rng).expect("builds");
        assert_eq!(plain.cpt().depth(), 1);
    }

    #[test]
    fn test_self_edge_reads_previous_buffer() {
        // Active only when parent 0 is active and the node itself was inactive.
        let cpt = ConditionalProbabilityTable::from_leaves(2, vec![0.0, 1.0, 0.0, 0.0])
            .expect("valid");
        let node = Node::with_cpt(NodeId(1), &ids(&[0]), true, cpt).expect("depth 2");
        let previous = [Inactive, Inactive];
        let current = [Active, Active];
        assert_eq!(node.probability(&current, &previous), Ok(1.0));
        let previous = [Inactive, Active];
        assert_eq!(node.probability(&current, &previous), Ok(0.0));
    }

    #[test]
    fn test_uninitialized_parent_is_an_error() {
        let cpt = ConditionalProbabilityTable::constant(1, 0.5).expect("valid");
        let node = Node::with_cpt(NodeId(1), &ids(&[0]), false, cpt).expect("depth 1");
        let states = [Uninitialized, Uninitialized];
        assert_eq!(
            node.probability(&states, &states),
            Err(EngineError::UninitializedParent {
                node: NodeId(1),
                parent: NodeId(0)
            })
        );
    }

    #[test]
    fn test_with_cpt_checks_depth() {
        let cpt = ConditionalProbabilityTable::constant(1, 0.5).expect("valid");
        assert!(Node::with_cpt(NodeId(2), &ids(&[0, 1]), false, cpt).is_err());
    }

    #[test]
    fn test_hypothetical_flips_one_parent_only() {
        let cpt = ConditionalProbabilityTable::from_leaves(2, vec![0.1, 0.2, 0.3, 0.4])
            .expect("valid");
        let node = Node::with_cpt(NodeId(2), &ids(&[0, 1]), false, cpt).expect("depth 2");
        let states = [Active, Inactive, Inactive];
        assert_eq!(node.probability(&states, &states), Ok(0.2));
        assert_eq!(node.hypothetical(&states, NodeId(0)), Ok(0.4));
        assert_eq!(node.hypothetical(&states, NodeId(1)), Ok(0.1));
        assert_eq!(states, [Active, Inactive, Inactive], "states untouched");
    }

    #[test]
    fn test_hypothetical_rejects_non_parent() {
        let cpt = ConditionalProbabilityTable::constant(1, 0.5).expect("valid");
        let node = Node::with_cpt(NodeId(2), &ids(&[0]), false, cpt).expect("depth 1");
        let states = [Active, Active, Active];
        assert_eq!(
            node.hypothetical(&states, NodeId(1)),
            Err(EngineError::NotAParent {
                parent: NodeId(1),
                child: NodeId(2)
            })
        );
    }

    #[test]
    fn test_recalculate_follows_certain_tables() {
        let mut rng = SeededRandom::from_u64(4);
        let always = Node::with_cpt(
            NodeId(1),
            &ids(&[0]),
            false,
            ConditionalProbabilityTable::constant(1, 1.0).expect("valid"),
        )
        .expect("depth 1");
        let states = [Inactive, Inactive];
        for _ in 0..20 {
            assert_eq!(always.recalculate(&states, &states, &mut rng), Ok(true));
        }
    }
}
