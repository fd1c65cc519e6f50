use serde::{Deserialize, Serialize};

use crate::errors::{ShotCallError, ShotCallResult};

/// Click position relative to the surface's top-left corner, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub px: f64,
    pub py: f64,
}

impl PixelPoint {
    pub fn new(px: f64, py: f64) -> Self {
        Self { px, py }
    }

    /// Converts a viewport position (e.g. a pointer event's client coordinates)
    /// into surface-relative pixels, given the surface's bounding-rect origin.
    pub fn from_viewport(client_x: f64, client_y: f64, surface_left: f64, surface_top: f64) -> Self {
        Self {
            px: client_x - surface_left,
            py: client_y - surface_top,
        }
    }
}

/// Fixed pixel dimensions of the clickable surface. Both sides are finite and > 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderSurfaceSpec {
    width_px: f64,
    height_px: f64,
}

impl RenderSurfaceSpec {
    pub fn new(width_px: f64, height_px: f64) -> ShotCallResult<Self> {
        if !(width_px.is_finite() && width_px > 0.0) {
            return Err(ShotCallError::Config(format!(
                "surface width must be a positive number, got {width_px}"
            )));
        }
        if !(height_px.is_finite() && height_px > 0.0) {
            return Err(ShotCallError::Config(format!(
                "surface height must be a positive number, got {height_px}"
            )));
        }
        Ok(Self { width_px, height_px })
    }

    pub fn width_px(&self) -> f64 {
        self.width_px
    }

    pub fn height_px(&self) -> f64 {
        self.height_px
    }
}

/// Position in the logical court system (x ∈ [-250, 250], y ∈ [-50, 900] for on-court clicks).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtCoordinate {
    pub x: f64,
    pub y: f64,
}

impl std::fmt::Display for CourtCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Logical extent of the court: width/height in court units and the court
/// coordinate that sits at the surface's top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtFrame {
    pub width: f64,
    pub height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl CourtFrame {
    pub const HALF_COURT: CourtFrame = CourtFrame {
        width: 500.0,
        height: 950.0,
        origin_x: -250.0,
        origin_y: 900.0,
    };

    pub fn min_x(&self) -> f64 {
        self.origin_x
    }

    pub fn max_x(&self) -> f64 {
        self.origin_x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.origin_y - self.height
    }

    pub fn max_y(&self) -> f64 {
        self.origin_y
    }

    /// Whether `coord` lies inside the logical bounding box (edges included).
    pub fn contains(&self, coord: CourtCoordinate) -> bool {
        (self.min_x()..=self.max_x()).contains(&coord.x)
            && (self.min_y()..=self.max_y()).contains(&coord.y)
    }
}

impl Default for CourtFrame {
    fn default() -> Self {
        Self::HALF_COURT
    }
}
