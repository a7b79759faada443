mod common;
use bayesboard_lib::model::cpt::{combinations, ConditionalProbabilityTable};
use bayesboard_lib::model::influence::{edge_weights, weight};
use bayesboard_lib::model::EngineError;
use common::{pin, GameBuilder};

#[test]
fn test_every_edge_has_a_bounded_weight() {
    let mut game = GameBuilder::new().with_nodes(25).build();
    game.run(10).expect("run");

    let weights = edge_weights(game.network()).expect("weights");
    let expected_edges: usize = game
        .network()
        .derived_nodes()
        .iter()
        .filter_map(|n| n.derived())
        .map(|d| d.parents().len())
        .sum();
    assert_eq!(weights.len(), expected_edges);
    for edge in &weights {
        assert!(edge.weight.is_finite());
        assert!((-1.0..=1.0).contains(&edge.weight), "weight {}", edge.weight);
    }
}

#[test]
fn test_pinned_child_ignores_parents() {
    let mut game = GameBuilder::new().build();
    let reward = game.network().reward_id();
    pin(&mut game, reward, 0.8);

    let parents = game
        .network()
        .node(reward)
        .expect("node")
        .derived()
        .expect("derived")
        .parents()
        .to_vec();
    for parent in parents {
        assert_eq!(weight(game.network(), parent, reward).expect("weight"), 0.0);
    }
}

#[test]
fn test_copying_parent_has_full_weight() {
    let mut game = GameBuilder::new().build();
    let child = game.network().reward_id();
    let parents = game
        .network()
        .node(child)
        .expect("node")
        .derived()
        .expect("derived")
        .parents()
        .to_vec();
    let leader = parents[0];

    // Child copies its first parent and ignores the rest.
    let leaves = combinations(parents.len())
        .iter()
        .map(|states| if states[0] { 1.0 } else { 0.0 })
        .collect();
    let cpt = ConditionalProbabilityTable::from_leaves(parents.len(), leaves).expect("table");
    game.network_mut().set_cpt(child, cpt).expect("set table");

    let leader_active = game.network().state(leader).expect("state").is_active();
    let expected = if leader_active { 1.0 } else { -1.0 };
    assert_eq!(weight(game.network(), leader, child).expect("weight"), expected);
    for &other in &parents[1..] {
        assert_eq!(weight(game.network(), other, child).expect("weight"), 0.0);
    }
}

#[test]
fn test_weight_requires_a_real_edge() {
    let game = GameBuilder::new().build();
    let network = game.network();
    let reward = network.reward_id();
    let heat = network.nodes()[0].id;

    let parents = network.node(reward).expect("node").derived().expect("derived").parents();
    if !parents.contains(&heat) {
        assert_eq!(
            weight(network, heat, reward),
            Err(EngineError::NotAParent {
                parent: heat,
                child: reward
            })
        );
    }
    assert_eq!(
        weight(network, reward, heat),
        Err(EngineError::NotDerived(heat))
    );
}
