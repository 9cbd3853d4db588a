//! Reflection model used to shade surface elements.
//!
//! Intensity is the sum of four terms:
//! - ambient: constant
//! - diffuse: facing the light
//! - specular: mirror highlight, width controlled by the spread angle
//! - diffractive: sheen at grazing view angles

use crate::error::{check_non_negative, ConfigError};
use glam::DVec3;
use serde::{Deserialize, Serialize};

const MIN_SHININESS: f64 = 1.0;
const MAX_SHININESS: f64 = 1000.0;
const DIFFRACTIVE_FALLOFF: i32 = 2;

/// Raw light direction used by `LightModel::default`, normalized on construction.
pub const DEFAULT_LIGHT_DIRECTION: DVec3 = DVec3::new(-50.0, -10.0, 30.0);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLightModel", into = "RawLightModel")]
pub struct LightModel {
    ambient_strength: f64,
    diffuse_strength: f64,
    diffractive_strength: f64,
    specular_strength: f64,
    /// Degrees.
    specular_spread_angle: f64,
    light_direction: DVec3,
}

impl LightModel {
    pub fn new(
        ambient_strength: f64,
        diffuse_strength: f64,
        diffractive_strength: f64,
        specular_strength: f64,
        specular_spread_angle: f64,
        light_direction: DVec3,
    ) -> Result<Self, ConfigError> {
        let model = Self {
            ambient_strength,
            diffuse_strength,
            diffractive_strength,
            specular_strength,
            specular_spread_angle,
            light_direction: normalize_direction(light_direction)?,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("ambient strength", self.ambient_strength)?;
        check_non_negative("diffuse strength", self.diffuse_strength)?;
        check_non_negative("diffractive strength", self.diffractive_strength)?;
        check_non_negative("specular strength", self.specular_strength)?;
        check_non_negative("specular spread angle", self.specular_spread_angle)?;
        normalize_direction(self.light_direction).map(|_| ())
    }

    pub fn ambient_strength(&self) -> f64 {
        self.ambient_strength
    }

    pub fn diffuse_strength(&self) -> f64 {
        self.diffuse_strength
    }

    pub fn diffractive_strength(&self) -> f64 {
        self.diffractive_strength
    }

    pub fn specular_strength(&self) -> f64 {
        self.specular_strength
    }

    pub fn specular_spread_angle(&self) -> f64 {
        self.specular_spread_angle
    }

    /// Always unit length.
    pub fn light_direction(&self) -> DVec3 {
        self.light_direction
    }

    pub fn set_light_direction(&mut self, direction: DVec3) -> Result<(), ConfigError> {
        self.light_direction = normalize_direction(direction)?;
        Ok(())
    }

    /// Upper bound of `shade`.
    pub fn max_intensity(&self) -> f64 {
        self.ambient_strength + self.diffuse_strength + self.diffractive_strength + self.specular_strength
    }

    /// Exponent of the specular lobe: the highlight drops to half strength at half the spread angle.
    pub fn shininess(&self) -> f64 {
        let half = (self.specular_spread_angle * 0.5).to_radians();
        let c = half.cos();
        if c >= 1.0 - f64::EPSILON {
            return MAX_SHININESS;
        }
        if c <= 0.0 {
            return MIN_SHININESS;
        }
        (0.5f64.ln() / c.ln()).clamp(MIN_SHININESS, MAX_SHININESS)
    }

    /// Light intensity reflected by a surface element.
    ///
    /// `surface_normal` and `view_direction` are unit vectors; `view_direction` points from the
    /// surface towards the viewer. The result lies in `[0, max_intensity()]`.
    pub fn shade(&self, surface_normal: DVec3, view_direction: DVec3) -> f64 {
        let n = surface_normal;
        let l = self.light_direction;

        let ambient = self.ambient_strength;

        let diffuse = self.diffuse_strength * n.dot(-l).max(0.0);

        // Light travelling along `l`, mirrored about the normal.
        let reflected = l - 2.0 * l.dot(n) * n;
        let specular = if self.specular_strength > 0.0 {
            let alignment = reflected.dot(view_direction).max(0.0);
            self.specular_strength * alignment.powf(self.shininess())
        } else {
            0.0
        };

        let facing = n.dot(view_direction).abs().min(1.0);
        let diffractive = self.diffractive_strength * (1.0 - facing).powi(DIFFRACTIVE_FALLOFF);

        ambient + diffuse + specular + diffractive
    }
}

impl Default for LightModel {
    fn default() -> Self {
        Self {
            ambient_strength: 0.35,
            diffuse_strength: 0.6,
            diffractive_strength: 0.15,
            specular_strength: 0.4,
            specular_spread_angle: 30.0,
            light_direction: DEFAULT_LIGHT_DIRECTION.normalize(),
        }
    }
}

fn normalize_direction(direction: DVec3) -> Result<DVec3, ConfigError> {
    let scale = direction.abs().max_element();
    if !direction.is_finite() || scale == 0.0 {
        return Err(ConfigError::ZeroLightDirection);
    }
    // Already unit: keep the exact bits so reloading a saved model is lossless.
    if (direction.length_squared() - 1.0).abs() <= 4.0 * f64::EPSILON {
        return Ok(direction);
    }
    // Rescale first so the squared length cannot underflow.
    (direction / scale)
        .try_normalize()
        .ok_or(ConfigError::ZeroLightDirection)
}

/// Wire form: the direction may be any non-zero vector, it is normalized on load.
#[derive(Serialize, Deserialize)]
struct RawLightModel {
    ambient_strength: f64,
    diffuse_strength: f64,
    diffractive_strength: f64,
    specular_strength: f64,
    specular_spread_angle: f64,
    light_direction: [f64; 3],
}

impl TryFrom<RawLightModel> for LightModel {
    type Error = ConfigError;

    fn try_from(raw: RawLightModel) -> Result<Self, Self::Error> {
        LightModel::new(
            raw.ambient_strength,
            raw.diffuse_strength,
            raw.diffractive_strength,
            raw.specular_strength,
            raw.specular_spread_angle,
            DVec3::from_array(raw.light_direction),
        )
    }
}

impl From<LightModel> for RawLightModel {
    fn from(model: LightModel) -> Self {
        Self {
            ambient_strength: model.ambient_strength,
            diffuse_strength: model.diffuse_strength,
            diffractive_strength: model.diffractive_strength,
            specular_strength: model.specular_strength,
            specular_spread_angle: model.specular_spread_angle,
            light_direction: model.light_direction.to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shininess_narrows_with_smaller_spread() {
        let mut wide = LightModel::default();
        wide.specular_spread_angle = 90.0;
        let mut narrow = LightModel::default();
        narrow.specular_spread_angle = 10.0;
        assert!(narrow.shininess() > wide.shininess());
    }

    #[test]
    fn test_shininess_bounds() {
        let mut m = LightModel::default();
        m.specular_spread_angle = 0.0;
        assert_eq!(m.shininess(), MAX_SHININESS);
        m.specular_spread_angle = 360.0;
        assert_eq!(m.shininess(), MIN_SHININESS);
    }
}
