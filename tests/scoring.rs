mod common;
use common::{pin, GameBuilder};

#[test]
fn test_reward_only_earns_points_every_tick() {
    let mut game = GameBuilder::new().build();
    let (reward, punish) = (game.network().reward_id(), game.network().punish_id());
    pin(&mut game, reward, 1.0);
    pin(&mut game, punish, 0.0);

    for expected in 1..=5 {
        let report = game.tick().expect("tick");
        assert_eq!(report.delta, 10);
        assert_eq!(report.score, 10 * expected);
    }
}

#[test]
fn test_punish_only_loses_points() {
    let mut game = GameBuilder::new().build();
    let (reward, punish) = (game.network().reward_id(), game.network().punish_id());
    pin(&mut game, reward, 0.0);
    pin(&mut game, punish, 1.0);

    let reports = game.run(3).expect("run");
    assert!(reports.iter().all(|r| r.delta == -10));
    assert_eq!(game.score(), -30);
}

#[test]
fn test_both_active_cancel_out() {
    let mut game = GameBuilder::new().build();
    let (reward, punish) = (game.network().reward_id(), game.network().punish_id());
    pin(&mut game, reward, 1.0);
    pin(&mut game, punish, 1.0);

    let report = game.tick().expect("tick");
    assert_eq!(report.delta, 0);
    assert_eq!(game.score(), 0);
}

#[test]
fn test_configured_points_are_used() {
    let mut game = GameBuilder::new()
        .with_config(|c| {
            c.scoring.reward_points = 3;
            c.scoring.punish_points = 7;
        })
        .build();
    let (reward, punish) = (game.network().reward_id(), game.network().punish_id());
    pin(&mut game, reward, 1.0);
    pin(&mut game, punish, 0.0);
    assert_eq!(game.tick().expect("tick").delta, 3);

    pin(&mut game, reward, 0.0);
    pin(&mut game, punish, 1.0);
    assert_eq!(game.tick().expect("tick").delta, -7);
    assert_eq!(game.score(), -4);
}

#[test]
fn test_score_is_sum_of_deltas() {
    let mut game = GameBuilder::new().with_nodes(25).build();
    let reports = game.run(200).expect("run");
    let total: i64 = reports.iter().map(|r| r.delta).sum();
    assert_eq!(total, game.score());
    assert_eq!(reports.last().map(|r| r.score), Some(game.score()));
}

#[test]
fn test_snapshot_delta_matches_last_tick() {
    let mut game = GameBuilder::new().build();
    let report = game.tick().expect("tick");
    let snapshot = game.snapshot().expect("snapshot");
    assert_eq!(snapshot.tick, 1);
    assert_eq!(snapshot.delta, report.delta);
    assert_eq!(snapshot.score, report.score);
}
