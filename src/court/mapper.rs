//! Pixel → court coordinate mapping.
//!
//! The surface's top-left pixel corresponds to the frame origin (-250, 900);
//! x grows to the right on both, y is inverted (screen-down is court-up).
//! No clamping: clicks reported outside the surface map outside the court.
use crate::court::types::{CourtCoordinate, CourtFrame, PixelPoint, RenderSurfaceSpec};

#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateMapper {
    frame: CourtFrame,
}

impl CoordinateMapper {
    pub fn new(frame: CourtFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &CourtFrame {
        &self.frame
    }

    pub fn map(&self, point: PixelPoint, surface: RenderSurfaceSpec) -> CourtCoordinate {
        let x = (point.px / surface.width_px()) * self.frame.width + self.frame.origin_x;
        let y = -(point.py / surface.height_px()) * self.frame.height + self.frame.origin_y;
        CourtCoordinate { x, y }
    }
}
