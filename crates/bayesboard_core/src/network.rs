//! Layered network construction and the node arena.
//!
//! Nodes live in one dense vector indexed by [`NodeId`], in construction
//! order. Inputs form layer 0; each following layer is fully connected to the
//! one before it, so construction order is always a valid evaluation order.

use crate::cpt::ConditionalProbabilityTable;
use crate::error::{EngineError, Result};
use crate::input::{Clock, HeatAdapter, InputAdapter, KeyAdapter, Keyboard, SystemClock};
use crate::naming::{random_color, random_name};
use crate::node::Node;
use crate::random::RandomSource;
use bayesboard_data::{Activation, NodeId, NodeKindTag, NodeRole};
use petgraph::graph::DiGraph;
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_KEYS: [char; 4] = ['a', 's', 'k', 'l'];
pub const MIN_LAYER_SIZE: i64 = 2;
pub const MAX_LAYER_SIZE: i64 = 5;
pub const REWARD_NAME: &str = "reward";
pub const PUNISH_NAME: &str = "punish";

const HEAT_COLORS: (u32, u32) = (0x00ff_7f00, 0x003f_1f00);
const KEY_COLORS: (u32, u32) = (0x00ff_ffff, 0x0000_0000);

#[derive(Debug)]
pub enum NodeKind {
    Input(InputAdapter),
    Derived(Node),
}

/// Arena slot: evaluation behaviour plus presentation metadata.
#[derive(Debug)]
pub struct NetworkNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub role: NodeRole,
    pub layer: usize,
    pub offset: usize,
    /// Non-owning back references, in edge creation order.
    pub children: Vec<NodeId>,
    pub active_color: u32,
    pub inactive_color: u32,
}

impl NetworkNode {
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self.kind, NodeKind::Input(_))
    }

    #[must_use]
    pub fn derived(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::Derived(node) => Some(node),
            NodeKind::Input(_) => None,
        }
    }

    #[must_use]
    pub fn is_stateful(&self) -> bool {
        self.derived().is_some_and(Node::is_stateful)
    }

    #[must_use]
    pub fn is_rewarding(&self) -> bool {
        self.role == NodeRole::Rewarding
    }

    #[must_use]
    pub fn is_punishing(&self) -> bool {
        self.role == NodeRole::Punishing
    }

    #[must_use]
    pub fn kind_tag(&self) -> NodeKindTag {
        match &self.kind {
            NodeKind::Input(input) => input.kind_tag(),
            NodeKind::Derived(_) => NodeKindTag::Derived,
        }
    }

    #[must_use]
    pub fn color(&self, state: Activation) -> u32 {
        if state.is_active() {
            self.active_color
        } else {
            self.inactive_color
        }
    }
}

/// A built network and its committed activation states.
#[derive(Debug)]
pub struct Network {
    nodes: Vec<NetworkNode>,
    layers: Vec<Vec<NodeId>>,
    input_count: usize,
    states: Vec<Activation>,
    registry: HashMap<String, NodeId>,
    reward: NodeId,
    punish: NodeId,
}

impl Network {
    #[must_use]
    pub fn nodes(&self) -> &[NetworkNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Result<&NetworkNode> {
        self.nodes.get(id.index()).ok_or(EngineError::UnknownNode(id))
    }

    #[must_use]
    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Derived nodes in construction order.
    #[must_use]
    pub fn derived_nodes(&self) -> &[NetworkNode] {
        &self.nodes[self.input_count..]
    }

    #[must_use]
    pub fn derived_count(&self) -> usize {
        self.nodes.len() - self.input_count
    }

    #[must_use]
    pub fn states(&self) -> &[Activation] {
        &self.states
    }

    pub fn state(&self, id: NodeId) -> Result<Activation> {
        self.states
            .get(id.index())
            .copied()
            .ok_or(EngineError::UnknownNode(id))
    }

    #[must_use]
    pub fn reward_id(&self) -> NodeId {
        self.reward
    }

    #[must_use]
    pub fn punish_id(&self) -> NodeId {
        self.punish
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<NodeId> {
        self.registry.get(name).copied()
    }

    #[must_use]
    pub fn registry(&self) -> &HashMap<String, NodeId> {
        &self.registry
    }

    /// Every `(parent, child)` edge, self edges included.
    #[must_use]
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes
            .iter()
            .flat_map(|n| n.children.iter().map(move |&child| (n.id, child)))
            .collect()
    }

    /// Maps any index onto a derived node by wrapping around.
    pub fn lookup(&self, index: usize) -> Result<&NetworkNode> {
        let derived = self.derived_nodes();
        if derived.is_empty() {
            return Err(EngineError::NoDerivedNodes);
        }
        Ok(&derived[index % derived.len()])
    }

    /// Replaces a derived node's table; the depth must match its parents.
    pub fn set_cpt(&mut self, id: NodeId, cpt: ConditionalProbabilityTable) -> Result<()> {
        let slot = self
            .nodes
            .get_mut(id.index())
            .ok_or(EngineError::UnknownNode(id))?;
        match &mut slot.kind {
            NodeKind::Derived(node) => node.replace_cpt(cpt),
            NodeKind::Input(_) => Err(EngineError::NotDerived(id)),
        }
    }

    /// Recalculates every node once, in construction order.
    ///
    /// New states go into a scratch buffer and are committed only when every
    /// node succeeded. Self edges read the pre-tick buffer.
    pub fn advance<R: RandomSource>(&mut self, rng: &mut R) -> Result<()> {
        let previous = self.states.clone();
        let mut next = previous.clone();
        for (idx, slot) in self.nodes.iter_mut().enumerate() {
            let active = match &mut slot.kind {
                NodeKind::Input(input) => input.recalculate(rng),
                NodeKind::Derived(node) => node.recalculate(&next, &previous, rng)?,
            };
            next[idx] = Activation::from(active);
        }
        self.states = next;
        Ok(())
    }

    /// Checks the layered-DAG rules.
    ///
    /// Apart from self edges the graph must be acyclic, and every parent
    /// must precede its child in construction order.
    pub fn validate(&self) -> Result<()> {
        let mut graph = DiGraph::<NodeId, ()>::with_capacity(self.nodes.len(), 0);
        let indices: Vec<_> = self.nodes.iter().map(|n| graph.add_node(n.id)).collect();
        for node in self.derived_nodes() {
            let Some(derived) = node.derived() else {
                continue;
            };
            for &parent in derived.parents() {
                if parent == node.id {
                    continue;
                }
                if parent >= node.id {
                    return Err(EngineError::InvalidTopology(format!(
                        "{} depends on later node {}",
                        node.id, parent
                    )));
                }
                graph.add_edge(indices[parent.index()], indices[node.id.index()], ());
            }
        }
        if petgraph::algo::is_cyclic_directed(&graph) {
            return Err(EngineError::InvalidTopology("dependency cycle".to_string()));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, id: NodeId, state: Activation) {
        self.states[id.index()] = state;
    }

    /// Releases every input subscription.
    pub fn teardown(&mut self) {
        for slot in &mut self.nodes {
            if let NodeKind::Input(input) = &mut slot.kind {
                input.release();
            }
        }
    }
}

/// Builds a layered network with reward and punish roles assigned.
pub struct NetworkBuilder {
    derived_count: usize,
    correlation_bound: f64,
    stateful_prob: f64,
    keys: Vec<char>,
    game_length_ms: u64,
    clock: Arc<dyn Clock>,
    keyboard: Keyboard,
}

impl NetworkBuilder {
    /// Builder for at least `derived_count` table-driven nodes.
    #[must_use]
    pub fn new(derived_count: usize) -> Self {
        Self {
            derived_count,
            correlation_bound: 0.5,
            stateful_prob: 0.2,
            keys: DEFAULT_KEYS.to_vec(),
            game_length_ms: 2 * 60 * 1000,
            clock: Arc::new(SystemClock::new()),
            keyboard: Keyboard::new(),
        }
    }

    #[must_use]
    pub fn correlation_bound(mut self, bound: f64) -> Self {
        self.correlation_bound = bound;
        self
    }

    #[must_use]
    pub fn stateful_prob(mut self, prob: f64) -> Self {
        self.stateful_prob = prob;
        self
    }

    #[must_use]
    pub fn keys(mut self, keys: &[char]) -> Self {
        self.keys = keys.to_vec();
        self
    }

    #[must_use]
    pub fn game_length_ms(mut self, ms: u64) -> Self {
        self.game_length_ms = ms;
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = keyboard;
        self
    }

    pub fn build<R: RandomSource>(self, rng: &mut R) -> Result<Network> {
        if self.derived_count < 2 {
            return Err(EngineError::NetworkTooSmall {
                requested: self.derived_count,
            });
        }
        if !(0.0..=1.0).contains(&self.stateful_prob) {
            return Err(EngineError::InvalidProbability(self.stateful_prob));
        }
        if !(0.0..=1.0).contains(&self.correlation_bound) {
            return Err(EngineError::InvalidCorrelationBound(self.correlation_bound));
        }

        let mut nodes = Vec::new();
        let mut states = Vec::new();
        let mut input_layer = Vec::new();

        let mut inputs = vec![InputAdapter::Heat(HeatAdapter::new(
            Arc::clone(&self.clock),
            self.game_length_ms,
        ))];
        for &key in &self.keys {
            let source = Box::new(self.keyboard.source(key));
            inputs.push(InputAdapter::Key(KeyAdapter::new(key, source)?));
        }
        for (offset, input) in inputs.into_iter().enumerate() {
            let id = NodeId(nodes.len());
            let (active_color, inactive_color) = match &input {
                InputAdapter::Heat(_) => HEAT_COLORS,
                InputAdapter::Key(_) => KEY_COLORS,
            };
            states.push(input.initial_activation());
            nodes.push(NetworkNode {
                id,
                name: input.name(),
                kind: NodeKind::Input(input),
                role: NodeRole::Plain,
                layer: 0,
                offset,
                children: Vec::new(),
                active_color,
                inactive_color,
            });
            input_layer.push(id);
        }
        let input_count = nodes.len();
        let mut layers = vec![input_layer];

        let mut remaining = self.derived_count as i64;
        while remaining > 0 {
            let upper = remaining.min(MAX_LAYER_SIZE).max(MIN_LAYER_SIZE);
            let size = rng.int_between(MIN_LAYER_SIZE, upper)?;
            let parents = layers.last().cloned().unwrap_or_default();
            let layer_idx = layers.len();
            let mut layer = Vec::new();

            for offset in 0..size as usize {
                let id = NodeId(nodes.len());
                let stateful = rng.bool_with_prob(self.stateful_prob);
                let pre_state = if stateful {
                    Activation::from(rng.bool_with_prob(0.5))
                } else {
                    Activation::Uninitialized
                };
                let name = random_name(rng);
                let active_color = random_color(rng);
                let inactive_color = random_color(rng);
                let node = Node::build(id, &parents, stateful, self.correlation_bound, rng)?;

                for &parent in node.parents() {
                    if parent != id {
                        nodes[parent.index()].children.push(id);
                    }
                }
                states.push(pre_state);
                let primed = node.recalculate(&states, &states, rng)?;
                states[id.index()] = Activation::from(primed);

                let children = if stateful { vec![id] } else { Vec::new() };
                nodes.push(NetworkNode {
                    id,
                    name,
                    kind: NodeKind::Derived(node),
                    role: NodeRole::Plain,
                    layer: layer_idx,
                    offset,
                    children,
                    active_color,
                    inactive_color,
                });
                layer.push(id);
            }
            layers.push(layer);
            remaining -= size;
        }

        let reward = NodeId(nodes.len() - 1);
        let punish = NodeId(nodes.len() - 2);
        nodes[reward.index()].role = NodeRole::Rewarding;
        nodes[reward.index()].name = REWARD_NAME.to_string();
        nodes[punish.index()].role = NodeRole::Punishing;
        nodes[punish.index()].name = PUNISH_NAME.to_string();

        let registry = build_registry(&mut nodes, &[reward, punish]);

        let network = Network {
            nodes,
            layers,
            input_count,
            states,
            registry,
            reward,
            punish,
        };
        network.validate()?;

        tracing::info!(
            layers = network.layers.len(),
            inputs = network.input_count,
            derived = network.derived_count(),
            requested = self.derived_count,
            stateful = network.nodes.iter().filter(|n| n.is_stateful()).count(),
            "Network built"
        );
        Ok(network)
    }
}

/// Name registry; `reserved` nodes claim their names first and later
/// collisions get a `-<index>` suffix.
fn build_registry(nodes: &mut [NetworkNode], reserved: &[NodeId]) -> HashMap<String, NodeId> {
    let mut registry = HashMap::with_capacity(nodes.len());
    for &id in reserved {
        registry.insert(nodes[id.index()].name.clone(), id);
    }
    for node in nodes.iter_mut() {
        if reserved.contains(&node.id) {
            continue;
        }
        if registry.contains_key(&node.name) {
            node.name = format!("{}-{}", node.name, node.id.index());
        }
        registry.insert(node.name.clone(), node.id);
    }
    registry
}
