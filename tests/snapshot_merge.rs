use std::collections::HashMap;

use price_grid_engine::domain::chart::config::EngineTuning;
use price_grid_engine::domain::events::EventQueue;
use price_grid_engine::domain::wagers::{
    AnimationKind, AnimationTimeline, BackendBox, ContractId,
};
use price_grid_engine::ecs::WagerBoard;

fn backend_box(id: &str, world_x: f64) -> BackendBox {
    BackendBox {
        id: ContractId::from(id),
        world_x,
        world_y: 100.0,
        width: 10.0,
        height: 2.0,
        value: 1.8,
        total_trades: 5,
        user_trade: None,
        status: None,
    }
}

fn snapshot_of(boxes: &[BackendBox]) -> HashMap<ContractId, BackendBox> {
    boxes.iter().map(|b| (b.id.clone(), b.clone())).collect()
}

fn merge(
    board: &mut WagerBoard,
    snapshot: &HashMap<ContractId, BackendBox>,
    timeline: &mut AnimationTimeline,
    tuning: &EngineTuning,
) -> price_grid_engine::ecs::MergeOutcome {
    // camera at x=0 with a 100-unit-wide viewport
    board.merge_snapshot(snapshot, timeline, 0.0, 100.0, tuning)
}

#[test]
fn merge_is_idempotent_thanks_to_dirty_check() {
    let tuning = EngineTuning::default();
    let mut board = WagerBoard::new();
    let mut timeline = AnimationTimeline::new(400.0);

    let snapshot = snapshot_of(&[backend_box("a", 0.0), backend_box("b", 10.0)]);
    let first = merge(&mut board, &snapshot, &mut timeline, &tuning);
    assert_eq!((first.added, first.updated, first.removed), (2, 0, 0));

    let second = merge(&mut board, &snapshot, &mut timeline, &tuning);
    assert_eq!((second.added, second.updated, second.removed), (0, 0, 0));
}

#[test]
fn changed_fields_mark_a_box_dirty() {
    let tuning = EngineTuning::default();
    let mut board = WagerBoard::new();
    let mut timeline = AnimationTimeline::new(400.0);

    merge(&mut board, &snapshot_of(&[backend_box("a", 0.0)]), &mut timeline, &tuning);

    let mut changed = backend_box("a", 0.0);
    changed.total_trades = 6;
    let outcome = merge(&mut board, &snapshot_of(&[changed]), &mut timeline, &tuning);
    assert_eq!(outcome.updated, 1);

    let stored = board.backend_box(&ContractId::from("a")).unwrap();
    assert_eq!(stored.total_trades, 6);
}

#[test]
fn removed_ids_take_their_bookkeeping_along() {
    let tuning = EngineTuning::default();
    let mut board = WagerBoard::new();
    let mut timeline = AnimationTimeline::new(400.0);
    let mut events = EventQueue::new();

    merge(
        &mut board,
        &snapshot_of(&[backend_box("a", 20.0), backend_box("b", 30.0)]),
        &mut timeline,
        &tuning,
    );

    // put "a" in flight with an animation
    board.refresh_clickability(0.0, 1);
    assert!(board.select_box(&ContractId::from("a"), &mut timeline, &mut events));
    board.confirm_selected_contract(&ContractId::from("a"), 0.0, &mut timeline, &mut events);
    assert!(timeline.get(&ContractId::from("a")).is_some());

    // feed forgets "a"
    let outcome = merge(&mut board, &snapshot_of(&[backend_box("b", 30.0)]), &mut timeline, &tuning);
    assert_eq!(outcome.removed, 1);
    assert!(!board.contains(&ContractId::from("a")));
    assert!(board.selected_ids().is_empty());
    assert!(timeline.get(&ContractId::from("a")).is_none());
}

#[test]
fn overflow_evicts_only_boxes_far_behind_the_camera() {
    let tuning = EngineTuning { max_backend_boxes: 5, ..EngineTuning::default() };
    let mut board = WagerBoard::new();
    let mut timeline = AnimationTimeline::new(400.0);

    // eviction threshold is camera_x - 2 viewport widths = -200
    let mut boxes = vec![
        backend_box("behind1", -400.0),
        backend_box("behind2", -350.0),
        backend_box("behind3", -300.0),
    ];
    for i in 0..5 {
        boxes.push(backend_box(&format!("ahead{}", i), i as f64 * 10.0));
    }

    let outcome = merge(&mut board, &snapshot_of(&boxes), &mut timeline, &tuning);
    assert_eq!(outcome.evicted, 3);
    assert_eq!(board.backend_count(), 5);
    for i in 0..5 {
        assert!(board.contains(&ContractId::from(format!("ahead{}", i).as_str())));
    }
    assert!(!board.contains(&ContractId::from("behind1")));
}

#[test]
fn eviction_never_touches_boxes_ahead_of_the_camera() {
    let tuning = EngineTuning { max_backend_boxes: 5, ..EngineTuning::default() };
    let mut board = WagerBoard::new();
    let mut timeline = AnimationTimeline::new(400.0);

    let boxes: Vec<BackendBox> =
        (0..8).map(|i| backend_box(&format!("f{}", i), i as f64 * 10.0)).collect();
    let outcome = merge(&mut board, &snapshot_of(&boxes), &mut timeline, &tuning);

    // over the cap, but nothing qualifies: the population stays intact
    assert_eq!(outcome.evicted, 0);
    assert_eq!(board.backend_count(), 8);
}

#[test]
fn near_the_camera_behind_boxes_survive_the_cap() {
    let tuning = EngineTuning { max_backend_boxes: 2, ..EngineTuning::default() };
    let mut board = WagerBoard::new();
    let mut timeline = AnimationTimeline::new(400.0);

    // behind the camera, but inside the two-viewport grace distance
    let boxes = vec![
        backend_box("recent", -150.0),
        backend_box("now1", 0.0),
        backend_box("now2", 10.0),
    ];
    merge(&mut board, &snapshot_of(&boxes), &mut timeline, &tuning);
    assert!(board.contains(&ContractId::from("recent")));
}

#[test]
fn non_finite_records_are_dropped_defensively() {
    let tuning = EngineTuning::default();
    let mut board = WagerBoard::new();
    let mut timeline = AnimationTimeline::new(400.0);

    let mut bad = backend_box("bad", 0.0);
    bad.world_y = f64::NAN;
    let snapshot = snapshot_of(&[bad, backend_box("good", 10.0)]);
    merge(&mut board, &snapshot, &mut timeline, &tuning);

    assert!(!board.contains(&ContractId::from("bad")));
    assert!(board.contains(&ContractId::from("good")));
}

#[test]
fn outcome_animation_kind_is_activate() {
    let tuning = EngineTuning::default();
    let mut board = WagerBoard::new();
    let mut timeline = AnimationTimeline::new(400.0);
    let mut events = EventQueue::new();

    merge(&mut board, &snapshot_of(&[backend_box("a", 20.0)]), &mut timeline, &tuning);
    board.mark_contract_as_hit(&ContractId::from("a"), 50.0, &mut timeline, &mut events);

    let anim = timeline.get(&ContractId::from("a")).unwrap();
    assert_eq!(anim.kind, AnimationKind::Activate);
    assert_eq!(anim.start_time, 50.0);
}
