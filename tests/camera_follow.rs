use price_grid_engine::domain::chart::camera::{CameraController, CameraMode};
use price_grid_engine::domain::chart::config::EngineTuning;
use price_grid_engine::domain::chart::coordinates::CoordinateSystem;

fn setup() -> (CameraController, CoordinateSystem, EngineTuning) {
    let tuning = EngineTuning::default();
    let mut coords = CoordinateSystem::new(&tuning);
    coords.update_viewport(800.0, 600.0);
    coords.set_zoom(1.0);
    coords.set_visible_range(10.0);
    (CameraController::new(&tuning), coords, tuning)
}

#[test]
fn follow_target_places_now_line_at_offset_ratio() {
    let (mut camera, coords, tuning) = setup();
    camera.update_follow_target(1000.0, 50.0, &coords);
    let expected = 1000.0 - 800.0 * tuning.camera_offset_ratio;
    assert!((camera.camera().target_x - expected).abs() < 1e-9);
    assert_eq!(camera.camera().target_y, 50.0);
}

#[test]
fn follow_target_clamps_at_world_origin() {
    let (mut camera, coords, _) = setup();
    camera.update_follow_target(10.0, 50.0, &coords);
    assert_eq!(camera.camera().target_x, 0.0);
}

#[test]
fn smoothing_converges_onto_target() {
    let (mut camera, coords, _) = setup();
    camera.update_follow_target(1000.0, 50.0, &coords);
    for _ in 0..600 {
        camera.advance();
    }
    let cam = camera.camera();
    assert!((cam.x - cam.target_x).abs() < 1e-3);
    assert!((cam.y - 50.0).abs() < 1e-3);
    // authoritative position is always the smoothed one
    assert_eq!(cam.x, cam.smooth_x);
    assert_eq!(cam.y, cam.smooth_y);
}

#[test]
fn y_axis_tracks_tighter_than_x() {
    let (mut camera, coords, tuning) = setup();
    assert!(tuning.camera_smoothing_y < tuning.camera_smoothing_x);
    camera.update_follow_target(1000.0, 50.0, &coords);
    camera.advance();
    let cam = camera.camera();
    let x_fraction = cam.x / cam.target_x;
    let y_fraction = cam.y / cam.target_y;
    assert!(y_fraction > x_fraction);
}

#[test]
fn snap_bypasses_smoothing() {
    let (mut camera, coords, _) = setup();
    camera.snap_to_price(1000.0, 50.0, &coords);
    let cam = camera.camera();
    assert_eq!(cam.y, 50.0);
    assert_eq!(cam.smooth_y, 50.0);
    assert_eq!(cam.target_y, 50.0);
    assert!(cam.x > 0.0);
}

#[test]
fn free_mode_halts_target_updates() {
    let (mut camera, coords, _) = setup();
    camera.update_follow_target(1000.0, 50.0, &coords);
    let target_before = camera.camera().target_x;

    assert!(camera.release_to_free());
    assert!(!camera.release_to_free(), "second release reports no change");
    assert_eq!(camera.mode(), CameraMode::Free);

    camera.update_follow_target(5000.0, 80.0, &coords);
    assert_eq!(camera.camera().target_x, target_before);
}

#[test]
fn reset_to_follow_snaps_all_three_positions() {
    let (mut camera, coords, _) = setup();
    camera.release_to_free();
    camera.camera_mut().place(3.0, 7.0);

    assert!(camera.reset_to_follow(1000.0, 50.0, &coords));
    let cam = camera.camera();
    assert_eq!(cam.x, cam.target_x);
    assert_eq!(cam.x, cam.smooth_x);
    assert_eq!(cam.y, 50.0);
    assert_eq!(cam.smooth_y, 50.0);
    assert!(camera.is_following());

    // advancing right after reset must not move the camera (no
    // snap-then-drift)
    camera.update_follow_target(1000.0, 50.0, &coords);
    let x = camera.camera().x;
    camera.advance();
    assert!((camera.camera().x - x).abs() < 1e-12);
}
