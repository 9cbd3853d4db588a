use super::series::{union_extent, ArraySeries, DataSeries, SampledGrid};
use rayon::prelude::*;
use std::sync::Arc;

/// Series left out of a pass, with the evaluator's reason.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedSeries {
    pub name: String,
    pub reason: String,
}

/// Plottable coordinates of one series.
#[derive(Clone, Debug)]
pub enum Shape {
    Array(Arc<ArraySeries>),
    /// `y = f(x)`, drawn in the z=0 plane.
    Curve(SampledGrid),
    /// `z = f(x, y)`.
    Surface(SampledGrid),
}

#[derive(Clone, Debug)]
pub struct MaterializedSeries {
    /// Position in the merged view, used for color and legend order.
    pub index: usize,
    pub name: String,
    pub shape: Shape,
}

impl MaterializedSeries {
    pub fn extent(&self, dimension: usize) -> Option<(f64, f64)> {
        match &self.shape {
            Shape::Array(s) => s.compute_extent(dimension),
            Shape::Curve(g) | Shape::Surface(g) => g.extent(dimension),
        }
    }
}

/// Every series of a snapshot with expressions sampled once.
///
/// Range resolution and drawing both read from here, so a series the pass skips
/// never contributes to an auto range.
#[derive(Clone, Debug, Default)]
pub struct MaterializedData {
    pub series: Vec<MaterializedSeries>,
    pub skipped: Vec<SkippedSeries>,
}

impl MaterializedData {
    pub fn from_series(merged: Vec<DataSeries>) -> Self {
        let results: Vec<Result<MaterializedSeries, SkippedSeries>> = merged
            .into_par_iter()
            .enumerate()
            .map(|(index, series)| match series {
                DataSeries::Array(s) => Ok(MaterializedSeries {
                    index,
                    name: s.name().to_string(),
                    shape: Shape::Array(s),
                }),
                DataSeries::Math(s) => match s.sample() {
                    Ok(grid) => Ok(MaterializedSeries {
                        index,
                        name: s.name().to_string(),
                        shape: if s.grid().is_surface() {
                            Shape::Surface(grid)
                        } else {
                            Shape::Curve(grid)
                        },
                    }),
                    Err(e) => {
                        tracing::warn!(series = s.name(), error = %e, "skipping series for this pass");
                        Err(SkippedSeries {
                            name: s.name().to_string(),
                            reason: e.to_string(),
                        })
                    }
                },
            })
            .collect();

        let mut out = Self::default();
        for r in results {
            match r {
                Ok(m) => out.series.push(m),
                Err(s) => out.skipped.push(s),
            }
        }
        out
    }

    /// Union of the extents of every drawable series.
    pub fn extent(&self, dimension: usize) -> Option<(f64, f64)> {
        self.series
            .iter()
            .fold(None, |acc, m| union_extent(acc, m.extent(dimension)))
    }
}
