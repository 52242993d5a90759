//! Freehand signature capture.
//!
//! [`SignatureSurface`] turns pointer input into strokes and a raster, and
//! re-encodes the raster into an [`Artifact`] whenever a stroke is closed.
//! The surface holds drawing state only; the strokes and artifact it produces
//! are written into the session's [`Signature`], which is passed in by the
//! caller for each operation.

mod artifact;
mod input;
mod raster;

pub use artifact::Artifact;
pub use input::{PagePoint, PointerSample};

use input::InputCoordinate;
use raster::Raster;

use crate::config::SurfaceConfig;
use crate::session::{Signature, Stroke};

/// Largest width or height, in surface units, a raster is allocated for.
pub const MAX_SURFACE_DIMENSION: u32 = 8192;

pub struct SignatureSurface {
    raster: Raster,
    origin: PagePoint,
    stroke_width: f32,
    height: u32,
    active: bool,
    current: Option<Stroke>,
}

impl SignatureSurface {
    /// Creates an inactive surface with no drawable width. The width is set
    /// by the first [`resize`](Self::resize).
    pub fn new(config: &SurfaceConfig) -> Self {
        let height = config.height.min(MAX_SURFACE_DIMENSION);
        Self {
            raster: Raster::new(0, height),
            origin: PagePoint::new(0.0, 0.0),
            stroke_width: config.stroke_width,
            height,
            active: false,
            current: None,
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[cfg(test)]
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn current_stroke(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    /// Makes the surface accept input and wipes any previous drawing.
    pub fn activate(&mut self, signature: &mut Signature) {
        self.active = true;
        self.clear(signature);
    }

    /// Stops accepting input. An unfinished stroke is discarded.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.current = None;
    }

    /// Moves the surface's bounding-box origin in page coordinates. Does not
    /// touch the raster.
    pub fn set_origin(&mut self, origin: PagePoint) {
        self.origin = origin;
    }

    /// Starts a stroke. Returns false when the surface is inactive or the
    /// sample has no usable coordinate.
    pub fn begin(&mut self, sample: &PointerSample) -> bool {
        if !self.active {
            return false;
        }
        let Some(coordinate) = InputCoordinate::resolve(sample) else {
            tracing::debug!("Ignoring pointer-down without coordinates");
            return false;
        };
        self.current = Some(vec![coordinate.to_surface(self.origin)]);
        true
    }

    /// Appends a point to the current stroke and inks the segment from the
    /// previous point.
    pub fn extend(&mut self, sample: &PointerSample) -> bool {
        let Some(stroke) = self.current.as_mut() else {
            return false;
        };
        let Some(coordinate) = InputCoordinate::resolve(sample) else {
            tracing::debug!("Ignoring pointer-move without coordinates");
            return false;
        };
        let point = coordinate.to_surface(self.origin);
        if let Some(previous) = stroke.last().copied() {
            self.raster.draw_segment(previous, point, self.stroke_width);
        }
        stroke.push(point);
        true
    }

    /// Closes the current stroke, records it and re-encodes the raster.
    ///
    /// A single-point stroke is still recorded; it leaves no ink, so the
    /// artifact shows whatever was drawn before.
    pub fn end(&mut self, signature: &mut Signature) -> bool {
        let Some(stroke) = self.current.take() else {
            return false;
        };
        signature.strokes.push(stroke);
        signature.artifact = match Artifact::encode(self.raster.image()) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                tracing::warn!("Signature artifact unavailable: {:#}", e);
                None
            }
        };
        if self.raster.is_blank() {
            tracing::debug!("Stroke closed on a blank raster");
        }
        true
    }

    pub fn clear(&mut self, signature: &mut Signature) {
        self.raster.clear();
        self.current = None;
        signature.clear();
    }

    /// Sets the drawable width to `width`; the height stays at the configured
    /// value.
    ///
    /// This reallocates the raster and therefore ERASES it. Strokes recorded
    /// before the resize are dropped rather than replayed, and the artifact
    /// becomes `None`, so a signer who triggers a resize mid-signature has to
    /// sign again.
    ///
    /// Widths above [`MAX_SURFACE_DIMENSION`] are clamped to it.
    pub fn resize(&mut self, signature: &mut Signature, width: u32) {
        if width > MAX_SURFACE_DIMENSION {
            tracing::warn!(
                "Surface width {} clamped to {}",
                width,
                MAX_SURFACE_DIMENSION
            );
        }
        self.raster.resize(width.min(MAX_SURFACE_DIMENSION), self.height);
        self.current = None;
        signature.clear();
    }
}

#[cfg(test)]
mod tests;
