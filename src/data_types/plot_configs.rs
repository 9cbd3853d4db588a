use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Quality/speed trade-off of a pass. Only shading refinement depends on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RenderingMode {
    #[default]
    Quality,
    Speed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfiguration {
    pub rendering_mode: RenderingMode,
    /// Pixels. Zero is a legal, empty surface.
    pub screen_width: u32,
    pub screen_height: u32,
    pub show_labels: bool,
    pub show_legend: bool,
    pub show_grid: bool,
}

impl Default for RenderConfiguration {
    fn default() -> Self {
        Self {
            rendering_mode: RenderingMode::Quality,
            screen_width: 640,
            screen_height: 480,
            show_labels: true,
            show_legend: true,
            show_grid: true,
        }
    }
}

impl RenderConfiguration {
    /// Builds a configuration from signed dimensions, as received from a host toolkit.
    pub fn try_new(screen_width: i64, screen_height: i64) -> Result<Self, ConfigError> {
        Ok(Self {
            screen_width: checked_dimension("width", screen_width)?,
            screen_height: checked_dimension("height", screen_height)?,
            ..Self::default()
        })
    }

    pub fn with_rendering_mode(mut self, mode: RenderingMode) -> Self {
        self.rendering_mode = mode;
        self
    }

    pub fn is_empty_surface(&self) -> bool {
        self.screen_width == 0 || self.screen_height == 0
    }

    /// Unsigned dimensions cannot be negative; kept for symmetry with the other records.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

pub(crate) fn checked_dimension(field: &'static str, value: i64) -> Result<u32, ConfigError> {
    if value < 0 {
        return Err(ConfigError::NegativeDimension { field, value });
    }
    u32::try_from(value).map_err(|_| ConfigError::DimensionOverflow { field, value })
}
