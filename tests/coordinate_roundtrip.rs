use price_grid_engine::domain::chart::config::EngineTuning;
use price_grid_engine::domain::chart::coordinates::CoordinateSystem;
use price_grid_engine::domain::chart::value_objects::Camera;
use quickcheck_macros::quickcheck;

fn coords(zoom: f64, range: f64) -> CoordinateSystem {
    let mut cs = CoordinateSystem::new(&EngineTuning::default());
    cs.update_viewport(800.0, 600.0);
    cs.set_zoom(zoom);
    cs.set_visible_range(range);
    cs
}

#[quickcheck]
fn screen_world_roundtrip(cam_x: f64, cam_y: f64, zoom: f64, wx: f64, wy: f64) -> bool {
    let cam_x = if cam_x.is_finite() { cam_x.abs() % 10_000.0 } else { 0.0 };
    let cam_y = if cam_y.is_finite() { cam_y % 10_000.0 } else { 0.0 };
    let zoom = if zoom.is_finite() { 0.4 + zoom.abs() % 2.6 } else { 1.0 };
    let wx = if wx.is_finite() { wx % 50_000.0 } else { 0.0 };
    let wy = if wy.is_finite() { wy % 50_000.0 } else { 0.0 };

    let cs = coords(zoom, 14.0);
    let camera = Camera::at(cam_x, cam_y);

    let screen = cs.world_to_screen(&camera, wx, wy);
    let world = cs.screen_to_world(&camera, screen.x, screen.y);

    let tolerance = 1e-6 * (1.0 + wx.abs().max(wy.abs()));
    (world.x - wx).abs() <= tolerance && (world.y - wy).abs() <= tolerance
}

#[test]
fn screen_x_is_zero_at_camera_left_edge() {
    let cs = coords(1.0, 10.0);
    let camera = Camera::at(42.0, 100.0);
    let p = cs.world_to_screen(&camera, 42.0, 100.0);
    assert!((p.x - 0.0).abs() < 1e-12);
    assert!((p.y - 300.0).abs() < 1e-12);
}

#[test]
fn price_scale_ignores_real_pixel_height() {
    // the vertical scale references a fixed viewport height, so resizing the
    // canvas must not change it
    let mut cs = coords(1.0, 10.0);
    let before = cs.price_scale();
    cs.update_viewport(800.0, 150.0);
    assert_eq!(cs.price_scale(), before);
}

#[test]
fn zoom_scales_both_axes_identically() {
    let cs = coords(2.0, 10.0);
    let camera = Camera::at(0.0, 0.0);
    let a = cs.world_to_screen(&camera, 10.0, 0.0);
    assert!((a.x - 20.0).abs() < 1e-12);
    // doubling zoom doubles the price scale as well
    assert!((cs.price_scale() - 800.0 / 10.0 * 2.0).abs() < 1e-12);
}

#[test]
fn invalid_visible_range_is_dropped() {
    let mut cs = coords(1.0, 10.0);
    let before = cs.price_scale();
    cs.set_visible_range(0.0);
    cs.set_visible_range(-5.0);
    cs.set_visible_range(f64::NAN);
    assert_eq!(cs.price_scale(), before);
    assert_eq!(cs.visible_range(), 10.0);
}

#[test]
fn line_position_steps_by_pixels_per_point() {
    let tuning = EngineTuning::default();
    let cs = coords(1.0, 10.0);
    let a = cs.line_position(3, 7, 99.5);
    let b = cs.line_position(4, 7, 99.5);
    assert!((a.x - 10.0 * tuning.pixels_per_point).abs() < 1e-12);
    assert!((b.x - a.x - tuning.pixels_per_point).abs() < 1e-12);
    assert_eq!(a.y, 99.5);
}

#[test]
fn visible_bounds_buffer_expands_through_scales() {
    let cs = coords(2.0, 10.0);
    let camera = Camera::at(100.0, 50.0);
    let tight = cs.visible_world_bounds(&camera, 0.0);
    let buffered = cs.visible_world_bounds(&camera, 40.0);
    // 40px at zoom 2 is 20 world units on the x axis
    assert!((tight.left - buffered.left - 20.0).abs() < 1e-9);
    assert!((buffered.right - tight.right - 20.0).abs() < 1e-9);
    assert!(buffered.top > tight.top);
    assert!(buffered.bottom < tight.bottom);
}
