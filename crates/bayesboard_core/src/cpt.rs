//! Conditional probability tables.
//!
//! A table of depth `d` maps every combination of `d` parent states to the
//! probability that the owning node becomes active. Leaves live in a flat
//! array of `2^d` entries indexed by the bit-packed parent states.
//!
//! The first parent state is the most significant bit and an *active* parent
//! contributes a 0 bit. That makes the array order the order a depth-first,
//! active-branch-first walk of the equivalent nested table visits its leaves,
//! so leaves are drawn from the random source in that same order.

use crate::error::{EngineError, Result};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

/// Largest supported depth. Layers hold at most five nodes, plus one self edge.
pub const MAX_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct ConditionalProbabilityTable {
    depth: usize,
    leaves: Vec<f64>,
}

impl ConditionalProbabilityTable {
    /// Draws every leaf with [`RandomSource::correlation`].
    pub fn build<R: RandomSource>(depth: usize, correlation_bound: f64, rng: &mut R) -> Result<Self> {
        check_depth(depth)?;
        if !(0.0..=1.0).contains(&correlation_bound) {
            return Err(EngineError::InvalidCorrelationBound(correlation_bound));
        }
        let leaves = (0..1usize << depth)
            .map(|_| rng.correlation(correlation_bound))
            .collect();
        Ok(Self { depth, leaves })
    }

    /// Table with explicit leaves, given in key order.
    pub fn from_leaves(depth: usize, leaves: Vec<f64>) -> Result<Self> {
        check_depth(depth)?;
        let expected = 1usize << depth;
        if leaves.len() != expected {
            return Err(EngineError::LeafCountMismatch {
                depth,
                expected,
                actual: leaves.len(),
            });
        }
        if let Some(&bad) = leaves.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(EngineError::InvalidProbability(bad));
        }
        Ok(Self { depth, leaves })
    }

    /// Every combination maps to `prob`.
    pub fn constant(depth: usize, prob: f64) -> Result<Self> {
        check_depth(depth)?;
        Self::from_leaves(depth, vec![prob; 1usize << depth])
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn leaves(&self) -> &[f64] {
        &self.leaves
    }

    /// Bit-packed key of a parent-state sequence.
    pub fn key(&self, states: &[bool]) -> Result<usize> {
        if states.len() != self.depth {
            return Err(EngineError::DepthMismatch {
                expected: self.depth,
                actual: states.len(),
            });
        }
        Ok(states
            .iter()
            .fold(0usize, |acc, &active| (acc << 1) | usize::from(!active)))
    }

    /// Activation probability for exactly `depth` parent states.
    pub fn evaluate(&self, states: &[bool]) -> Result<f64> {
        let key = self.key(states)?;
        self.leaves
            .get(key)
            .copied()
            .ok_or(EngineError::LeafCountMismatch {
                depth: self.depth,
                expected: 1usize << self.depth,
                actual: self.leaves.len(),
            })
    }

    /// Overwrites the leaf addressed by `states`.
    pub fn set_leaf(&mut self, states: &[bool], prob: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&prob) {
            return Err(EngineError::InvalidProbability(prob));
        }
        let key = self.key(states)?;
        let expected = 1usize << self.depth;
        let actual = self.leaves.len();
        let leaf = self
            .leaves
            .get_mut(key)
            .ok_or(EngineError::LeafCountMismatch {
                depth: self.depth,
                expected,
                actual,
            })?;
        *leaf = prob;
        Ok(())
    }
}

/// Unchecked wire form; deserialized tables go through [`ConditionalProbabilityTable::from_leaves`].
#[derive(Deserialize)]
struct RawTable {
    depth: usize,
    leaves: Vec<f64>,
}

impl TryFrom<RawTable> for ConditionalProbabilityTable {
    type Error = EngineError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Self::from_leaves(raw.depth, raw.leaves)
    }
}

fn check_depth(depth: usize) -> Result<()> {
    if depth == 0 || depth > MAX_DEPTH {
        return Err(EngineError::InvalidDepth(depth));
    }
    Ok(())
}

/// All `2^depth` parent-state combinations in key order.
#[must_use]
pub fn combinations(depth: usize) -> Vec<Vec<bool>> {
    (0..1usize << depth)
        .map(|key| {
            (0..depth)
                .map(|bit| (key >> (depth - 1 - bit)) & 1 == 0)
                .collect()
        })
        .collect()
}
