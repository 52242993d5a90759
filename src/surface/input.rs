//! Pointer input resolution.
//!
//! Raw pointer events may carry mouse-style coordinates, a list of touch
//! contacts, or neither. They are resolved once, here, into an
//! [`InputCoordinate`] so the rest of the surface never branches on the
//! source.

use serde::{Deserialize, Serialize};

use crate::session::StrokePoint;

/// A point in page (device) coordinates, before translation to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PagePoint {
    pub x: f32,
    pub y: f32,
}

impl PagePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One raw pointer event as delivered by the input layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Mouse-style coordinates, if the event carries them.
    #[serde(default)]
    pub client: Option<PagePoint>,
    /// Active touch contacts, first contact first.
    #[serde(default)]
    pub touches: Vec<PagePoint>,
}

impl PointerSample {
    pub fn mouse(x: f32, y: f32) -> Self {
        Self {
            client: Some(PagePoint::new(x, y)),
            touches: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn touch(contacts: Vec<PagePoint>) -> Self {
        Self {
            client: None,
            touches: contacts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCoordinate {
    Pointer(PagePoint),
    Touch(PagePoint),
}

impl InputCoordinate {
    /// Picks the mouse coordinates when present, otherwise the first touch
    /// contact. Returns `None` for events with neither.
    ///
    /// A mouse coordinate of `0` is a real coordinate, not a missing one.
    pub fn resolve(sample: &PointerSample) -> Option<Self> {
        if let Some(point) = sample.client {
            return Some(InputCoordinate::Pointer(point));
        }
        sample.touches.first().copied().map(InputCoordinate::Touch)
    }

    pub fn page_point(&self) -> PagePoint {
        match self {
            InputCoordinate::Pointer(point) | InputCoordinate::Touch(point) => *point,
        }
    }

    /// Translates into surface-local coordinates given the surface's
    /// bounding-box origin.
    pub fn to_surface(&self, origin: PagePoint) -> StrokePoint {
        let page = self.page_point();
        StrokePoint::new(page.x - origin.x, page.y - origin.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mouse_coordinates_win_over_touches() {
        let sample = PointerSample {
            client: Some(PagePoint::new(3.0, 4.0)),
            touches: vec![PagePoint::new(50.0, 60.0)],
        };
        assert_eq!(
            InputCoordinate::resolve(&sample),
            Some(InputCoordinate::Pointer(PagePoint::new(3.0, 4.0)))
        );
    }

    #[test]
    fn test_first_touch_used_without_mouse() {
        let sample = PointerSample::touch(vec![PagePoint::new(7.0, 8.0), PagePoint::new(1.0, 1.0)]);
        assert_eq!(
            InputCoordinate::resolve(&sample),
            Some(InputCoordinate::Touch(PagePoint::new(7.0, 8.0)))
        );
    }

    #[test]
    fn test_zero_mouse_coordinate_is_kept() {
        let sample = PointerSample::mouse(0.0, 0.0);
        assert_eq!(
            InputCoordinate::resolve(&sample).map(|c| c.page_point()),
            Some(PagePoint::new(0.0, 0.0))
        );
    }

    #[test]
    fn test_missing_source_resolves_to_none() {
        assert_eq!(InputCoordinate::resolve(&PointerSample::default()), None);
    }

    proptest! {
        #[test]
        fn prop_surface_point_is_page_minus_origin(
            px in -2000.0f32..2000.0,
            py in -2000.0f32..2000.0,
            ox in -500.0f32..500.0,
            oy in -500.0f32..500.0,
        ) {
            let coordinate = InputCoordinate::resolve(&PointerSample::mouse(px, py)).unwrap();
            let local = coordinate.to_surface(PagePoint::new(ox, oy));
            prop_assert_eq!(local, StrokePoint::new(px - ox, py - oy));
        }
    }
}
