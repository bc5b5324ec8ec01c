use price_grid_engine::domain::chart::config::EngineTuning;
use price_grid_engine::domain::market_data::PricePoint;
use price_grid_engine::{ChartEngine, CoreEvent};

fn quiet_tuning() -> EngineTuning {
    EngineTuning { filler_interval_frames: 100_000, ..EngineTuning::default() }
}

fn ready_engine() -> ChartEngine {
    let mut engine = ChartEngine::new(quiet_tuning()).unwrap();
    engine.resize(800.0, 600.0);
    engine.add_price_data(PricePoint::at(100.0, 0));
    engine.snap_to_price();
    engine.tick(0.0);
    engine.drain_events();
    engine
}

fn zoom_events(events: &[CoreEvent]) -> Vec<f64> {
    events
        .iter()
        .filter_map(|e| match e {
            CoreEvent::ZoomLevelChanged { zoom_level } => Some(*zoom_level),
            _ => None,
        })
        .collect()
}

#[test]
fn wheel_deltas_accumulate_into_one_zoom_step() {
    let mut engine = ready_engine();
    engine.wheel(-100.0);
    engine.wheel(-50.0);
    engine.tick(16.0);

    // sign inverted, scaled by sensitivity: -(-150) * 0.001 on top of 1.0
    assert!((engine.get_zoom_level() - 1.15).abs() < 1e-9);
    let emitted = zoom_events(&engine.drain_events());
    assert_eq!(emitted.len(), 1);
    assert!((emitted[0] - 1.15).abs() < 1e-9);
}

#[test]
fn no_wheel_means_no_zoom_event() {
    let mut engine = ready_engine();
    engine.tick(16.0);
    assert!(zoom_events(&engine.drain_events()).is_empty());
    assert_eq!(engine.get_zoom_level(), 1.0);
}

#[test]
fn zoom_clamps_to_configured_bounds() {
    let tuning = quiet_tuning();
    let mut engine = ready_engine();

    engine.wheel(-1.0e9);
    engine.tick(16.0);
    assert_eq!(engine.get_zoom_level(), tuning.zoom_max);

    engine.wheel(1.0e9);
    engine.tick(32.0);
    assert_eq!(engine.get_zoom_level(), tuning.zoom_min);
}

#[test]
fn zoom_at_bound_emits_nothing_further() {
    let mut engine = ready_engine();
    engine.wheel(-1.0e9);
    engine.tick(16.0);
    engine.drain_events();

    engine.wheel(-100.0);
    engine.tick(32.0);
    assert!(zoom_events(&engine.drain_events()).is_empty());
}

#[test]
fn free_camera_zoom_keeps_viewport_center_fixed() {
    let mut engine = ready_engine();
    // park the camera away from the live edge
    engine.pointer_down(400.0, 300.0);
    engine.pointer_move(460.0, 320.0);
    engine.pointer_up(460.0, 320.0);
    engine.drain_events();
    assert!(!engine.is_camera_following_price());

    let center_before =
        engine.coordinate_system().screen_to_world(engine.camera(), 400.0, 300.0);

    engine.wheel(-500.0);
    engine.tick(16.0);

    let center_after =
        engine.coordinate_system().screen_to_world(engine.camera(), 400.0, 300.0);
    assert!((center_after.x - center_before.x).abs() < 1e-9);
    assert!((center_after.y - center_before.y).abs() < 1e-9);
    assert!((engine.get_zoom_level() - 1.5).abs() < 1e-9);
}

#[test]
fn following_zoom_leaves_camera_to_the_follow_logic() {
    let mut engine = ready_engine();
    assert!(engine.is_camera_following_price());
    engine.wheel(-200.0);
    engine.tick(16.0);
    assert!((engine.get_zoom_level() - 1.2).abs() < 1e-9);
    assert!(engine.is_camera_following_price());
}
