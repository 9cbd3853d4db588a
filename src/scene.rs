//! Scene state shared between mutating callers and the renderer.
//!
//! Configuration is an immutable `SceneConfig` published behind one `Arc`. Setters build
//! a modified copy, validate it and swap it in, so a reader sees either the old record or
//! the new one. Data lives in the `DataStore`. `snapshot()` reads both while holding all
//! the locks at once, then releases them before any rendering work starts.

use crate::data_types::{
    AxisRangeSet, AxisRangeValue, DataSnapshot, DataStore, RenderConfiguration, RenderingMode,
};
use crate::error::ConfigError;
use crate::light::LightModel;
use crate::transform::Camera;
use eyre::{Result, WrapErr};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Every configuration object consulted by a pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub axes: AxisRangeSet,
    pub light: LightModel,
    pub render: RenderConfiguration,
    pub camera: Camera,
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.axes.validate()?;
        self.light.validate()?;
        self.render.validate()?;
        self.camera.validate()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: SceneConfig =
            serde_json::from_str(text).wrap_err("failed to parse scene configuration")?;
        config
            .validate()
            .wrap_err("scene configuration rejected")?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).wrap_err("failed to serialize scene configuration")
    }
}

/// Consistent view of configuration and data taken at the start of a pass.
#[derive(Clone)]
pub struct SceneSnapshot {
    pub config: Arc<SceneConfig>,
    pub data: DataSnapshot,
}

#[derive(Default)]
pub struct Scene {
    config: RwLock<Arc<SceneConfig>>,
    data: DataStore,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: RwLock::new(Arc::new(config)),
            data: DataStore::new(),
        })
    }

    pub fn data(&self) -> &DataStore {
        &self.data
    }

    pub fn config(&self) -> Arc<SceneConfig> {
        self.config.read().clone()
    }

    /// Replaces the whole configuration. Nothing changes if it fails validation.
    pub fn apply(&self, config: SceneConfig) -> Result<(), ConfigError> {
        config.validate().inspect_err(log_rejected)?;
        *self.config.write() = Arc::new(config);
        Ok(())
    }

    /// Copy, modify, validate, publish. All under the write lock so concurrent
    /// setters never lose each other's changes.
    fn update(&self, f: impl FnOnce(&mut SceneConfig) -> Result<(), ConfigError>) -> Result<(), ConfigError> {
        let mut current = self.config.write();
        let mut next = SceneConfig::clone(&current);
        f(&mut next).inspect_err(log_rejected)?;
        next.validate().inspect_err(log_rejected)?;
        *current = Arc::new(next);
        Ok(())
    }

    pub fn set_axis_range(&self, dimension: usize, value: AxisRangeValue) -> Result<(), ConfigError> {
        self.update(|c| c.axes.set(dimension, value))
    }

    pub fn set_axis_ranges(&self, axes: AxisRangeSet) -> Result<(), ConfigError> {
        self.update(|c| {
            c.axes = axes;
            Ok(())
        })
    }

    pub fn set_auto_range_enabled(&self, dimension: usize, enabled: bool) -> Result<(), ConfigError> {
        self.update(|c| {
            let available = c.axes.dimensions();
            c.axes
                .get_mut(dimension)
                .ok_or(ConfigError::UnknownDimension {
                    index: dimension,
                    available,
                })?
                .set_auto_range_enabled(enabled);
            Ok(())
        })
    }

    pub fn set_light(&self, light: LightModel) -> Result<(), ConfigError> {
        self.update(|c| {
            c.light = light;
            Ok(())
        })
    }

    pub fn set_render_configuration(&self, render: RenderConfiguration) -> Result<(), ConfigError> {
        self.update(|c| {
            c.render = render;
            Ok(())
        })
    }

    pub fn set_rendering_mode(&self, mode: RenderingMode) -> Result<(), ConfigError> {
        self.update(|c| {
            c.render.rendering_mode = mode;
            Ok(())
        })
    }

    /// Signed input so host sizes can be passed straight through; negatives are rejected.
    pub fn set_screen_size(&self, width: i64, height: i64) -> Result<(), ConfigError> {
        let size = RenderConfiguration::try_new(width, height).inspect_err(log_rejected)?;
        self.update(|c| {
            c.render.screen_width = size.screen_width;
            c.render.screen_height = size.screen_height;
            Ok(())
        })
    }

    pub fn set_camera(&self, camera: Camera) -> Result<(), ConfigError> {
        self.update(|c| {
            c.camera = camera;
            Ok(())
        })
    }

    /// Configuration and data as of one instant.
    pub fn snapshot(&self) -> SceneSnapshot {
        let config = self.config.read();
        let data = self.data.snapshot();
        SceneSnapshot {
            config: config.clone(),
            data,
        }
    }
}

fn log_rejected(err: &ConfigError) {
    tracing::warn!(error = %err, "configuration rejected");
}
