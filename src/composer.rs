//! One render pass: snapshot, resolve ranges, shade and project, decorate, composite.

use crate::axis_renderer::AxisRenderer;
use crate::data_types::{
    ArrayLayout, MaterializedSeries, PointStyle, RenderingMode, Shape, SkippedSeries, X, Y, Z,
    SPATIAL_DIMENSIONS,
};
use crate::frame::{DrawCommand, Frame, FrameHandle, LegendEntry};
use crate::light::LightModel;
use crate::range_resolver::RangeResolver;
use crate::scales::{AxisScale, EffectiveRange};
use crate::scene::{Scene, SceneSnapshot};
use crate::theme::{colormap, ChartTheme, Rgba};
use crate::transform::{ScreenPoint, ScreenProjection};
use glam::DVec3;
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const BOX_EPSILON: f64 = 1e-9;
const MARKER_SIZE: f32 = 4.0;
const LINE_WIDTH: f32 = 1.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderState {
    #[default]
    Idle,
    ResolvingRanges,
    ShadingAndProjecting,
    Decorating,
    Composited,
}

/// Outcome of one pass.
#[derive(Clone, Debug)]
pub struct PassSummary {
    pub pass: u64,
    pub series_drawn: usize,
    pub skipped: Vec<SkippedSeries>,
    pub primitives: usize,
    pub elapsed: Duration,
}

type RepaintListener = Arc<dyn Fn(u64) + Send + Sync>;

pub struct SceneComposer {
    scene: Arc<Scene>,
    theme: ChartTheme,
    frame: FrameHandle,
    state: Mutex<RenderState>,
    pass_lock: Mutex<()>,
    pass_counter: AtomicU64,
    repaint: RwLock<Option<RepaintListener>>,
}

impl SceneComposer {
    pub fn new(scene: Arc<Scene>) -> Self {
        Self::with_theme(scene, ChartTheme::default())
    }

    pub fn with_theme(scene: Arc<Scene>, theme: ChartTheme) -> Self {
        Self {
            scene,
            theme,
            frame: Arc::new(RwLock::new(Frame::default())),
            state: Mutex::new(RenderState::Idle),
            pass_lock: Mutex::new(()),
            pass_counter: AtomicU64::new(0),
            repaint: RwLock::new(None),
        }
    }

    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    /// The image every pass draws into. Same handle for the composer's whole lifetime.
    pub fn frame(&self) -> FrameHandle {
        self.frame.clone()
    }

    pub fn state(&self) -> RenderState {
        *self.state.lock()
    }

    pub fn passes_completed(&self) -> u64 {
        self.pass_counter.load(Ordering::Acquire)
    }

    /// Called with the pass number once a frame is composited.
    pub fn set_repaint_listener(&self, listener: impl Fn(u64) + Send + Sync + 'static) {
        *self.repaint.write() = Some(Arc::new(listener));
    }

    fn enter(&self, state: RenderState) {
        *self.state.lock() = state;
    }

    /// Runs one pass to completion. Concurrent callers are serialized.
    ///
    /// The repaint listener runs after the pass lock is released and may call `render` again.
    pub fn render(&self) -> PassSummary {
        let pass_guard = self.pass_lock.lock();
        let started = Instant::now();
        let pass = self.pass_counter.load(Ordering::Acquire) + 1;

        let snapshot = self.scene.snapshot();
        tracing::debug!(pass, series = snapshot.data.len(), "render pass started");

        // 1. Ranges
        self.enter(RenderState::ResolvingRanges);
        let data = snapshot.data.materialized();
        let ranges = RangeResolver::resolve_all(&snapshot.config.axes, &snapshot.data);

        // 2. Shading and projection
        self.enter(RenderState::ShadingAndProjecting);
        let render = &snapshot.config.render;
        let projection = ScreenProjection::new(&snapshot.config.camera, render.screen_width, render.screen_height);
        let mut primitives = Vec::new();
        if !render.is_empty_surface() {
            let ctx = ShadeContext::new(&snapshot, &ranges, projection);
            let per_series: Vec<Vec<DrawCommand>> = data
                .series
                .par_iter()
                .map(|m| ctx.commands_for(m, self.theme.series_color(m.index)))
                .collect();
            primitives = per_series.into_iter().flatten().collect();
            // Stable: on equal depth, later series stay on top.
            primitives.sort_by(|a, b| b.depth().total_cmp(&a.depth()));
        }

        // 3. Decorations
        self.enter(RenderState::Decorating);
        let decorations = if render.is_empty_surface() {
            Default::default()
        } else {
            AxisRenderer::build(&ranges, &projection, render, &self.theme)
        };

        // 4. Composite into the shared frame
        self.enter(RenderState::Composited);
        let primitive_count = primitives.len();
        {
            let mut frame = self.frame.write();
            frame.reset(pass, render.screen_width, render.screen_height, self.theme.background);
            frame.decorations.extend(decorations.back);
            frame.primitives.extend(primitives);
            frame.overlay.extend(decorations.front);
            if render.show_legend {
                frame.legend.extend(data.series.iter().rev().map(|m| LegendEntry {
                    name: m.name.clone(),
                    color: self.theme.series_color(m.index),
                }));
            }
            frame.ranges = ranges;
        }
        self.pass_counter.store(pass, Ordering::Release);
        self.enter(RenderState::Idle);
        drop(pass_guard);

        let listener = self.repaint.read().clone();
        if let Some(listener) = listener {
            listener(pass);
        }

        let summary = PassSummary {
            pass,
            series_drawn: data.series.len(),
            skipped: data.skipped.clone(),
            primitives: primitive_count,
            elapsed: started.elapsed(),
        };
        tracing::debug!(
            pass,
            drawn = summary.series_drawn,
            skipped = summary.skipped.len(),
            elapsed_us = summary.elapsed.as_micros() as u64,
            "render pass finished"
        );
        summary
    }
}

struct ShadeContext<'a> {
    scales: [AxisScale; 3],
    color_scale: Option<AxisScale>,
    projection: ScreenProjection,
    view: DVec3,
    light: &'a LightModel,
    mode: RenderingMode,
}

impl<'a> ShadeContext<'a> {
    fn new(snapshot: &'a SceneSnapshot, ranges: &[EffectiveRange], projection: ScreenProjection) -> Self {
        Self {
            scales: [
                AxisScale::new(&ranges[X]),
                AxisScale::new(&ranges[Y]),
                AxisScale::new(&ranges[Z]),
            ],
            color_scale: ranges.get(SPATIAL_DIMENSIONS).map(AxisScale::new),
            projection,
            view: projection.view_direction(),
            light: &snapshot.config.light,
            mode: snapshot.config.render.rendering_mode,
        }
    }

    fn quality(&self) -> bool {
        self.mode == RenderingMode::Quality
    }

    fn to_box(&self, x: f64, y: f64, z: f64) -> DVec3 {
        DVec3::new(self.scales[0].map(x), self.scales[1].map(y), self.scales[2].map(z))
    }

    fn project(&self, p: DVec3) -> ScreenPoint {
        self.projection.project(p)
    }

    fn shade(&self, normal: DVec3) -> f64 {
        // Two-sided: always light the face turned towards the viewer.
        let n = if normal.dot(self.view) < 0.0 { -normal } else { normal };
        self.light.shade(n, self.view)
    }

    fn commands_for(&self, m: &MaterializedSeries, base: Rgba) -> Vec<DrawCommand> {
        match &m.shape {
            Shape::Array(s) => match s.layout() {
                ArrayLayout::Points { columns, values } => {
                    self.point_commands(*columns, values, s.style(), base)
                }
                ArrayLayout::Matrix { xs, ys, zs } => self.surface_commands(xs, ys, zs, base),
            },
            Shape::Curve(g) => {
                let pts: Vec<Option<DVec3>> = g
                    .xs
                    .iter()
                    .zip(&g.values)
                    .map(|(&x, &y)| finite(&[x, y]).then(|| self.to_box(x, y, 0.0)))
                    .collect();
                self.polyline(&pts, &vec![base; pts.len()])
            }
            Shape::Surface(g) => match &g.ys {
                Some(ys) => self.surface_commands(&g.xs, ys, &g.values, base),
                None => Vec::new(),
            },
        }
    }

    fn point_commands(&self, columns: usize, values: &[f64], style: PointStyle, base: Rgba) -> Vec<DrawCommand> {
        let mut pts = Vec::with_capacity(values.len() / columns);
        let mut colors = Vec::with_capacity(pts.capacity());
        for row in values.chunks_exact(columns) {
            let z = row.get(Z).copied().unwrap_or(0.0);
            pts.push(finite(&[row[X], row[Y], z]).then(|| self.to_box(row[X], row[Y], z)));
            let color = match (row.get(SPATIAL_DIMENSIONS), &self.color_scale) {
                (Some(v), Some(scale)) if v.is_finite() => colormap(scale.fraction(*v)),
                _ => base,
            };
            colors.push(color);
        }

        match style {
            PointStyle::Markers => pts
                .iter()
                .zip(&colors)
                .filter_map(|(p, color)| {
                    let p = (*p).filter(|p| inside(*p))?;
                    Some(DrawCommand::Marker {
                        at: self.project(p),
                        color: *color,
                        size: MARKER_SIZE,
                        antialias: self.quality(),
                    })
                })
                .collect(),
            PointStyle::Polyline => self.polyline(&pts, &colors),
        }
    }

    fn polyline(&self, pts: &[Option<DVec3>], colors: &[Rgba]) -> Vec<DrawCommand> {
        pts.windows(2)
            .zip(colors)
            .filter_map(|(w, color)| {
                let (a, b) = (w[0]?, w[1]?);
                (inside(a) && inside(b)).then(|| DrawCommand::Line {
                    from: self.project(a),
                    to: self.project(b),
                    color: *color,
                    width: LINE_WIDTH,
                    antialias: self.quality(),
                })
            })
            .collect()
    }

    /// Height field: `zs` has `ys.len()` rows of `xs.len()` values, holes are non-finite.
    fn surface_commands(&self, xs: &[f64], ys: &[f64], zs: &[f64], base: Rgba) -> Vec<DrawCommand> {
        let (cols, rows) = (xs.len(), ys.len());
        if cols < 2 || rows < 2 || zs.len() != cols * rows {
            return Vec::new();
        }
        let at = |r: usize, c: usize| r * cols + c;
        let verts: Vec<Option<DVec3>> = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| {
                let (x, y, z) = (xs[c], ys[r], zs[at(r, c)]);
                finite(&[x, y, z]).then(|| self.to_box(x, y, z))
            })
            .collect();

        let mut triangles = Vec::with_capacity((rows - 1) * (cols - 1) * 2);
        for r in 0..rows - 1 {
            for c in 0..cols - 1 {
                triangles.push([at(r, c), at(r, c + 1), at(r + 1, c)]);
                triangles.push([at(r + 1, c + 1), at(r + 1, c), at(r, c + 1)]);
            }
        }
        let faces: Vec<Option<([DVec3; 3], DVec3)>> = triangles
            .iter()
            .map(|t| {
                let p = [verts[t[0]]?, verts[t[1]]?, verts[t[2]]?];
                Some((p, face_normal(&p)))
            })
            .collect();

        // Smooth shading: average the normals of the faces around each vertex.
        let vertex_normals = if self.quality() {
            let mut acc = vec![DVec3::ZERO; verts.len()];
            for (t, face) in triangles.iter().zip(&faces) {
                if let Some((_, n)) = face {
                    for &v in t {
                        acc[v] += *n;
                    }
                }
            }
            acc.into_iter().map(|n| n.try_normalize().unwrap_or(DVec3::Z)).collect()
        } else {
            Vec::new()
        };

        let mut out = Vec::with_capacity(triangles.len());
        for (t, face) in triangles.iter().zip(faces) {
            let Some((p, n)) = face else { continue };
            if !p.iter().all(|v| inside(*v)) {
                continue;
            }
            let colors = if self.quality() {
                [0, 1, 2].map(|i| base.shaded(self.shade(vertex_normals[t[i]])))
            } else {
                [base.shaded(self.shade(n)); 3]
            };
            out.push(DrawCommand::Triangle {
                points: p.map(|v| self.project(v)),
                colors,
                antialias: self.quality(),
            });
        }
        out
    }
}

fn face_normal(p: &[DVec3; 3]) -> DVec3 {
    (p[1] - p[0]).cross(p[2] - p[0]).try_normalize().unwrap_or(DVec3::Z)
}

fn finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn inside(p: DVec3) -> bool {
    p.abs().max_element() <= 1.0 + BOX_EPSILON
}
