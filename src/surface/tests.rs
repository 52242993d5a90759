//! Tests for the signature surface.

use super::*;
use crate::session::StrokePoint;

fn config() -> SurfaceConfig {
    SurfaceConfig {
        height: 200,
        stroke_width: 2.0,
    }
}

fn active_surface(width: u32) -> (SignatureSurface, Signature) {
    let mut surface = SignatureSurface::new(&config());
    let mut signature = Signature::default();
    surface.activate(&mut signature);
    surface.resize(&mut signature, width);
    (surface, signature)
}

fn draw_line(surface: &mut SignatureSurface, signature: &mut Signature) {
    assert!(surface.begin(&PointerSample::mouse(10.0, 10.0)));
    assert!(surface.extend(&PointerSample::mouse(60.0, 40.0)));
    assert!(surface.extend(&PointerSample::mouse(90.0, 20.0)));
    assert!(surface.end(signature));
}

#[test]
fn test_inactive_surface_ignores_input() {
    let mut surface = SignatureSurface::new(&config());
    let mut signature = Signature::default();

    assert!(!surface.begin(&PointerSample::mouse(5.0, 5.0)));
    assert!(!surface.extend(&PointerSample::mouse(9.0, 9.0)));
    assert!(!surface.end(&mut signature));
    assert!(signature.is_empty());
}

#[test]
fn test_stroke_produces_artifact() {
    let (mut surface, mut signature) = active_surface(300);
    assert!(signature.artifact.is_none());

    draw_line(&mut surface, &mut signature);

    assert_eq!(signature.strokes.len(), 1);
    assert_eq!(signature.strokes[0].len(), 3);
    let artifact = signature.artifact.as_ref().expect("artifact after end");
    assert_eq!((artifact.width(), artifact.height()), (300, 200));
    assert!(!surface.raster().is_blank());
}

#[test]
fn test_points_are_relative_to_origin() {
    let (mut surface, mut signature) = active_surface(300);
    surface.set_origin(PagePoint::new(100.0, 50.0));

    surface.begin(&PointerSample::mouse(110.0, 70.0));
    surface.extend(&PointerSample::mouse(140.0, 90.0));
    surface.end(&mut signature);

    assert_eq!(
        signature.strokes[0],
        vec![StrokePoint::new(10.0, 20.0), StrokePoint::new(40.0, 40.0)]
    );
}

#[test]
fn test_touch_input_draws() {
    let (mut surface, mut signature) = active_surface(300);

    assert!(surface.begin(&PointerSample::touch(vec![PagePoint::new(20.0, 20.0)])));
    assert!(surface.extend(&PointerSample::touch(vec![
        PagePoint::new(80.0, 20.0),
        PagePoint::new(0.0, 0.0),
    ])));
    surface.end(&mut signature);

    assert_eq!(signature.strokes[0][1], StrokePoint::new(80.0, 20.0));
    assert!(!surface.raster().is_blank());
}

#[test]
fn test_malformed_input_is_ignored() {
    let (mut surface, mut signature) = active_surface(300);

    assert!(!surface.begin(&PointerSample::default()));
    assert!(!surface.is_drawing());

    surface.begin(&PointerSample::mouse(10.0, 10.0));
    assert!(!surface.extend(&PointerSample::default()));
    surface.end(&mut signature);
    assert_eq!(signature.strokes[0].len(), 1);
}

#[test]
fn test_extend_without_begin_is_noop() {
    let (mut surface, mut signature) = active_surface(300);
    assert!(!surface.extend(&PointerSample::mouse(10.0, 10.0)));
    assert!(!surface.end(&mut signature));
    assert!(signature.artifact.is_none());
}

#[test]
fn test_single_tap_recorded_without_ink() {
    let (mut surface, mut signature) = active_surface(300);

    surface.begin(&PointerSample::mouse(30.0, 30.0));
    assert!(surface.end(&mut signature));

    assert_eq!(signature.strokes.len(), 1);
    assert!(signature.artifact.is_some());
    assert!(surface.raster().is_blank());
}

#[test]
fn test_clear_resets_signature() {
    let (mut surface, mut signature) = active_surface(300);
    draw_line(&mut surface, &mut signature);

    surface.clear(&mut signature);

    assert!(signature.strokes.is_empty());
    assert!(signature.artifact.is_none());
    assert!(surface.raster().is_blank());
}

#[test]
fn test_resize_erases_drawing() {
    let (mut surface, mut signature) = active_surface(300);
    draw_line(&mut surface, &mut signature);
    surface.begin(&PointerSample::mouse(5.0, 5.0));

    surface.resize(&mut signature, 420);

    assert!(signature.artifact.is_none());
    assert!(signature.strokes.is_empty());
    assert!(!surface.is_drawing());
    assert!(surface.raster().is_blank());
    assert_eq!(surface.raster().width(), 420);
    assert_eq!(surface.raster().height(), 200);
}

#[test]
fn test_resize_clamps_oversized_width() {
    let (mut surface, mut signature) = active_surface(300);

    surface.resize(&mut signature, u32::MAX);

    assert_eq!(surface.raster().width(), MAX_SURFACE_DIMENSION);
    assert_eq!(surface.raster().height(), 200);
}

#[test]
fn test_zero_width_surface_has_no_artifact() {
    let mut surface = SignatureSurface::new(&config());
    let mut signature = Signature::default();
    surface.activate(&mut signature);

    surface.begin(&PointerSample::mouse(1.0, 1.0));
    surface.extend(&PointerSample::mouse(2.0, 2.0));
    assert!(surface.end(&mut signature));

    assert_eq!(signature.strokes.len(), 1);
    assert!(signature.artifact.is_none());
}

#[test]
fn test_deactivate_drops_unfinished_stroke() {
    let (mut surface, mut signature) = active_surface(300);
    surface.begin(&PointerSample::mouse(5.0, 5.0));

    surface.deactivate();

    assert!(!surface.is_active());
    assert!(!surface.end(&mut signature));
    assert!(signature.strokes.is_empty());
}
