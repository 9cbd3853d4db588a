use crate::error::{ConfigError, EvaluationError};
use crate::evaluator::{Expression, ExpressionEvaluator};
use std::fmt;
use std::sync::Arc;

/// Extent of a run of values, ignoring non-finite ones.
pub fn extent_of(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min <= max {
        Some((min, max))
    } else {
        None
    }
}

/// Union of two optional extents.
pub fn union_extent(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> Option<(f64, f64)> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a.0.min(b.0), a.1.max(b.1))),
        (a, None) => a,
        (None, b) => b,
    }
}

/// How a point table is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointStyle {
    #[default]
    Markers,
    Polyline,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArrayLayout {
    /// Row-major table, one point per row. Columns are x, y, then z and extra dimensions.
    Points { columns: usize, values: Vec<f64> },
    /// Height field: `zs` holds `ys.len()` rows of `xs.len()` cells.
    Matrix {
        xs: Vec<f64>,
        ys: Vec<f64>,
        zs: Vec<f64>,
    },
}

/// Series backed by explicit coordinates. The table is copied on construction
/// and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ArraySeries {
    name: String,
    layout: ArrayLayout,
    style: PointStyle,
}

impl ArraySeries {
    pub fn points(name: impl Into<String>, columns: usize, values: &[f64]) -> Result<Self, ConfigError> {
        if columns < 2 {
            return Err(ConfigError::TooFewColumns(columns));
        }
        if values.len() % columns != 0 {
            return Err(ConfigError::RaggedTable {
                len: values.len(),
                columns,
            });
        }
        Ok(Self {
            name: name.into(),
            layout: ArrayLayout::Points {
                columns,
                values: values.to_vec(),
            },
            style: PointStyle::Markers,
        })
    }

    /// Builds a point table from rows of equal length.
    pub fn from_rows<R: AsRef<[f64]>>(name: impl Into<String>, rows: &[R]) -> Result<Self, ConfigError> {
        let columns = rows.first().map(|r| r.as_ref().len()).unwrap_or(SPATIAL_COLUMNS);
        let mut values = Vec::with_capacity(rows.len() * columns);
        for row in rows {
            let row = row.as_ref();
            if row.len() != columns {
                return Err(ConfigError::RaggedTable {
                    len: values.len() + row.len(),
                    columns,
                });
            }
            values.extend_from_slice(row);
        }
        Self::points(name, columns, &values)
    }

    pub fn matrix(name: impl Into<String>, xs: &[f64], ys: &[f64], zs: &[f64]) -> Result<Self, ConfigError> {
        let expected = xs.len() * ys.len();
        if zs.len() != expected {
            return Err(ConfigError::MatrixShape {
                rows: ys.len(),
                cols: xs.len(),
                expected,
                actual: zs.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            layout: ArrayLayout::Matrix {
                xs: xs.to_vec(),
                ys: ys.to_vec(),
                zs: zs.to_vec(),
            },
            style: PointStyle::Markers,
        })
    }

    /// Connects consecutive rows of a point table. No effect on matrices.
    pub fn as_polyline(mut self) -> Self {
        self.style = PointStyle::Polyline;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> &ArrayLayout {
        &self.layout
    }

    pub fn style(&self) -> PointStyle {
        self.style
    }

    pub fn len(&self) -> usize {
        match &self.layout {
            ArrayLayout::Points { columns, values } => values.len() / columns,
            ArrayLayout::Matrix { zs, .. } => zs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn compute_extent(&self, dimension: usize) -> Option<(f64, f64)> {
        match &self.layout {
            ArrayLayout::Points { columns, values } => {
                if dimension >= *columns {
                    return None;
                }
                extent_of(values.iter().skip(dimension).step_by(*columns).copied())
            }
            ArrayLayout::Matrix { xs, ys, zs } => match dimension {
                0 => extent_of(xs.iter().copied()),
                1 => extent_of(ys.iter().copied()),
                2 => extent_of(zs.iter().copied()),
                _ => None,
            },
        }
    }
}

const SPATIAL_COLUMNS: usize = 3;

/// One free variable of a sampling grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridAxis {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub resolution: usize,
}

impl GridAxis {
    pub fn new(name: impl Into<String>, min: f64, max: f64, resolution: usize) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            resolution,
        }
    }

    /// Evenly spaced values from `min` to `max`. Empty below two samples.
    pub fn samples(&self) -> Vec<f64> {
        let n = self.resolution;
        if n < 2 {
            return Vec::new();
        }
        let step = (self.max - self.min) / (n - 1) as f64;
        (0..n)
            .map(|i| if i + 1 == n { self.max } else { self.min + step * i as f64 })
            .collect()
    }
}

/// Points at which an expression is evaluated: one axis samples a curve `y = f(x)`, two sample a surface `z = f(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingGrid {
    axes: Vec<GridAxis>,
}

impl SamplingGrid {
    pub fn new(axes: Vec<GridAxis>) -> Result<Self, ConfigError> {
        if axes.is_empty() || axes.len() > 2 {
            return Err(ConfigError::GridArity(axes.len()));
        }
        for axis in &axes {
            crate::error::check_finite("grid minimum", axis.min)?;
            crate::error::check_finite("grid maximum", axis.max)?;
            if axis.resolution < 2 {
                return Err(ConfigError::GridResolution {
                    name: axis.name.clone(),
                    resolution: axis.resolution,
                });
            }
        }
        Ok(Self { axes })
    }

    pub fn curve(x: GridAxis) -> Result<Self, ConfigError> {
        Self::new(vec![x])
    }

    pub fn surface(x: GridAxis, y: GridAxis) -> Result<Self, ConfigError> {
        Self::new(vec![x, y])
    }

    pub fn axes(&self) -> &[GridAxis] {
        &self.axes
    }

    pub fn is_surface(&self) -> bool {
        self.axes.len() == 2
    }

    /// Dimension that receives the evaluated value.
    pub fn dependent_dimension(&self) -> usize {
        self.axes.len()
    }

    pub fn sample_count(&self) -> usize {
        self.axes.iter().map(|a| a.resolution).product()
    }
}

/// Result of sampling a `MathSeries`. Failed samples are `NaN`.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledGrid {
    pub xs: Vec<f64>,
    /// Present for surfaces only.
    pub ys: Option<Vec<f64>>,
    /// Curves: one value per x. Surfaces: `ys.len()` rows of `xs.len()` values.
    pub values: Vec<f64>,
    pub failed_samples: usize,
}

impl SampledGrid {
    pub fn extent(&self, dimension: usize) -> Option<(f64, f64)> {
        match (dimension, &self.ys) {
            (0, _) => extent_of(self.xs.iter().copied()),
            (1, None) => extent_of(self.values.iter().copied()),
            (1, Some(ys)) => extent_of(ys.iter().copied()),
            (2, Some(_)) => extent_of(self.values.iter().copied()),
            _ => None,
        }
    }
}

/// Series generated by evaluating an expression over a sampling grid.
#[derive(Clone)]
pub struct MathSeries {
    name: String,
    expression: Expression,
    grid: SamplingGrid,
    evaluator: Arc<dyn ExpressionEvaluator>,
}

impl MathSeries {
    pub fn new(
        name: impl Into<String>,
        expression: Expression,
        grid: SamplingGrid,
        evaluator: Arc<dyn ExpressionEvaluator>,
    ) -> Result<Self, ConfigError> {
        if expression.as_str().trim().is_empty() {
            return Err(ConfigError::EmptyText { field: "expression" });
        }
        Ok(Self {
            name: name.into(),
            expression,
            grid,
            evaluator,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn grid(&self) -> &SamplingGrid {
        &self.grid
    }

    /// Evaluates the expression at every grid point.
    ///
    /// A failing sample leaves a hole. Fails only when no sample succeeds.
    pub fn sample(&self) -> Result<SampledGrid, EvaluationError> {
        let axes = self.grid.axes();
        let xs = axes[0].samples();
        let ys = axes.get(1).map(GridAxis::samples);

        let mut values = Vec::with_capacity(self.grid.sample_count());
        let mut failed_samples = 0;
        let mut last_error = None;

        let mut eval = |point: &[f64]| match self.evaluator.evaluate(&self.expression, point) {
            Ok(v) if v.is_finite() => v,
            Ok(_) => {
                failed_samples += 1;
                f64::NAN
            }
            Err(e) => {
                failed_samples += 1;
                last_error = Some(e);
                f64::NAN
            }
        };

        match &ys {
            None => {
                for &x in &xs {
                    values.push(eval(&[x]));
                }
            }
            Some(ys) => {
                for &y in ys {
                    for &x in &xs {
                        values.push(eval(&[x, y]));
                    }
                }
            }
        }

        if failed_samples == values.len() {
            if let Some(e) = &last_error {
                tracing::debug!(series = %self.name, error = %e, "every sample failed");
            }
            return Err(EvaluationError::NoSamples {
                expression: self.expression.to_string(),
            });
        }

        Ok(SampledGrid {
            xs,
            ys,
            values,
            failed_samples,
        })
    }

    /// Extent of the sampled points. `None` on every dimension when no sample succeeds.
    pub fn compute_extent(&self, dimension: usize) -> Option<(f64, f64)> {
        self.sample().ok()?.extent(dimension)
    }
}

impl fmt::Debug for MathSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MathSeries")
            .field("name", &self.name)
            .field("expression", &self.expression)
            .field("grid", &self.grid)
            .finish_non_exhaustive()
    }
}

/// Either kind of series, as seen through the merged view of a `DataStore`.
#[derive(Clone, Debug)]
pub enum DataSeries {
    Array(Arc<ArraySeries>),
    Math(Arc<MathSeries>),
}

impl DataSeries {
    pub fn name(&self) -> &str {
        match self {
            Self::Array(s) => s.name(),
            Self::Math(s) => s.name(),
        }
    }

    pub fn compute_extent(&self, dimension: usize) -> Option<(f64, f64)> {
        match self {
            Self::Array(s) => s.compute_extent(dimension),
            Self::Math(s) => s.compute_extent(dimension),
        }
    }
}
