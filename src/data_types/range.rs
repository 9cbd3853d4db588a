use crate::error::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Index of a plotted dimension. 0..=2 are the spatial axes, 3.. are extra dimensions.
pub const X: usize = 0;
pub const Y: usize = 1;
pub const Z: usize = 2;
pub const SPATIAL_DIMENSIONS: usize = 3;

/// Bounds of one axis, stored as exact decimals.
///
/// When `auto_range_enabled` is set, `minimum`/`maximum` are only used as a fallback
/// when no series contributes an extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisRangeValue {
    pub minimum: Decimal,
    pub maximum: Decimal,
    #[serde(default)]
    pub auto_range_enabled: bool,
}

impl AxisRangeValue {
    pub fn new(minimum: Decimal, maximum: Decimal) -> Self {
        Self {
            minimum,
            maximum,
            auto_range_enabled: false,
        }
    }

    /// Auto-ranged axis with the given fallback bounds.
    pub fn auto(minimum: Decimal, maximum: Decimal) -> Self {
        Self {
            minimum,
            maximum,
            auto_range_enabled: true,
        }
    }

    pub fn with_auto_range(mut self, enabled: bool) -> Self {
        self.auto_range_enabled = enabled;
        self
    }

    pub fn set_auto_range_enabled(&mut self, enabled: bool) {
        self.auto_range_enabled = enabled;
    }

    /// Manual bounds may be inverted on purpose, so there is nothing to reject here
    /// beyond what the type already rules out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

impl Default for AxisRangeValue {
    fn default() -> Self {
        Self::new(Decimal::NEGATIVE_ONE, Decimal::ONE)
    }
}

/// Range settings for X, Y, Z and any number of extra dimensions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisRangeSet {
    pub x: AxisRangeValue,
    pub y: AxisRangeValue,
    pub z: AxisRangeValue,
    #[serde(default)]
    pub extra: Vec<AxisRangeValue>,
}

impl AxisRangeSet {
    pub fn dimensions(&self) -> usize {
        SPATIAL_DIMENSIONS + self.extra.len()
    }

    pub fn get(&self, dimension: usize) -> Option<&AxisRangeValue> {
        match dimension {
            X => Some(&self.x),
            Y => Some(&self.y),
            Z => Some(&self.z),
            d => self.extra.get(d - SPATIAL_DIMENSIONS),
        }
    }

    pub fn get_mut(&mut self, dimension: usize) -> Option<&mut AxisRangeValue> {
        match dimension {
            X => Some(&mut self.x),
            Y => Some(&mut self.y),
            Z => Some(&mut self.z),
            d => self.extra.get_mut(d - SPATIAL_DIMENSIONS),
        }
    }

    /// Replaces one axis wholesale.
    pub fn set(&mut self, dimension: usize, value: AxisRangeValue) -> Result<(), ConfigError> {
        value.validate()?;
        let available = self.dimensions();
        let slot = self.get_mut(dimension).ok_or(ConfigError::UnknownDimension {
            index: dimension,
            available,
        })?;
        *slot = value;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AxisRangeValue> {
        [&self.x, &self.y, &self.z]
            .into_iter()
            .chain(self.extra.iter())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.iter().try_for_each(AxisRangeValue::validate)
    }
}
