//! plot3d_scene: scene data, range resolution and shading for interactive 3D graph plotting.

pub mod axis_renderer;
pub mod composer;
pub mod data_types;
pub mod error;
pub mod evaluator;
pub mod frame;
pub mod light;
pub mod range_resolver;
pub mod render_loop;
pub mod scales;
pub mod scene;
pub mod theme;
pub mod transform;

pub use composer::{PassSummary, RenderState, SceneComposer};
pub use data_types::{
    ArraySeries, AxisRangeSet, AxisRangeValue, DataSeries, DataSeriesGroup, DataStore, MathSeries,
    RenderConfiguration, RenderingMode,
};
pub use error::{ConfigError, EvaluationError};
pub use light::LightModel;
pub use range_resolver::RangeResolver;
pub use render_loop::RenderLoop;
pub use scene::{Scene, SceneConfig};
