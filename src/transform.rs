//! Projection of the normalized plot box onto the screen.
//!
//! Data is first mapped into the box `[-1, 1]^3` by the axis scales, then rotated by the
//! camera and projected orthographically.

use crate::error::{check_finite, ConfigError};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Fraction of the shorter screen side kept free around the box.
const SCREEN_MARGIN: f64 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Rotation around Z, degrees.
    pub azimuth_deg: f64,
    /// Angle above the XY plane, degrees.
    pub elevation_deg: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            azimuth_deg: -61.3,
            elevation_deg: 36.1,
        }
    }
}

impl Camera {
    pub fn new(azimuth_deg: f64, elevation_deg: f64) -> Self {
        Self {
            azimuth_deg,
            elevation_deg,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("camera azimuth", self.azimuth_deg)?;
        check_finite("camera elevation", self.elevation_deg)
    }

    /// Unit vector from the scene towards the viewer.
    pub fn view_direction(&self) -> DVec3 {
        let (sa, ca) = self.azimuth_deg.to_radians().sin_cos();
        let (se, ce) = self.elevation_deg.to_radians().sin_cos();
        DVec3::new(ce * ca, ce * sa, se)
    }
}

/// Screen position in pixels (y grows downwards) plus depth (larger is farther).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenProjection {
    right: DVec3,
    up: DVec3,
    toward_viewer: DVec3,
    center_x: f64,
    center_y: f64,
    scale: f64,
}

impl ScreenProjection {
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let (sa, ca) = camera.azimuth_deg.to_radians().sin_cos();
        let (se, ce) = camera.elevation_deg.to_radians().sin_cos();

        let right = DVec3::new(-sa, ca, 0.0);
        let up = DVec3::new(-ca * se, -sa * se, ce);

        let w = width as f64;
        let h = height as f64;
        // The box spans at most 2*sqrt(3) in any projected direction.
        let usable = w.min(h) * (1.0 - 2.0 * SCREEN_MARGIN);
        let scale = (usable / (2.0 * 3f64.sqrt())).max(0.0);

        Self {
            right,
            up,
            toward_viewer: camera.view_direction(),
            center_x: w * 0.5,
            center_y: h * 0.5,
            scale,
        }
    }

    /// Projects a point of the normalized box.
    pub fn project(&self, p: DVec3) -> ScreenPoint {
        ScreenPoint {
            x: self.center_x + p.dot(self.right) * self.scale,
            y: self.center_y - p.dot(self.up) * self.scale,
            depth: -p.dot(self.toward_viewer),
        }
    }

    pub fn view_direction(&self) -> DVec3 {
        self.toward_viewer
    }
}
