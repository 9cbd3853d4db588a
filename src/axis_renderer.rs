//! Bounding box, grid and axis scale decorations.
//!
//! Everything here is placed from the resolved ranges, the camera and the screen size.
//! The rendering mode is never consulted, so decorations are identical in both modes.

use crate::data_types::{RenderConfiguration, X, Y, Z};
use crate::frame::{DrawCommand, TextAnchor};
use crate::scales::{format_tick, nice_ticks, AxisScale, EffectiveRange};
use crate::theme::{ChartTheme, Rgba};
use crate::transform::ScreenProjection;
use glam::DVec3;
use rust_decimal::prelude::ToPrimitive;

const TICKS_PER_AXIS: usize = 5;
const TICK_LENGTH: f64 = 0.05;
const LABEL_OFFSET: f64 = 0.15;
const TITLE_OFFSET: f64 = 0.35;
const TICK_EPSILON: f64 = 1e-9;
const AXIS_TITLES: [&str; 3] = ["X", "Y", "Z"];

/// Decorations of one pass, split by draw order.
#[derive(Default)]
pub struct Decorations {
    pub back: Vec<DrawCommand>,
    pub front: Vec<DrawCommand>,
}

pub struct AxisRenderer;

impl AxisRenderer {
    pub fn build(
        ranges: &[EffectiveRange],
        projection: &ScreenProjection,
        config: &RenderConfiguration,
        theme: &ChartTheme,
    ) -> Decorations {
        let mut out = Decorations::default();
        if ranges.len() < 3 {
            return out;
        }
        let view = projection.view_direction();

        // 1. Box edges
        for (a, b) in box_edges() {
            out.back.push(line(projection, a, b, theme.frame_line, 1.0));
        }

        // 2. Grid on the three walls facing away from the viewer
        let scales = [
            AxisScale::new(&ranges[X]),
            AxisScale::new(&ranges[Y]),
            AxisScale::new(&ranges[Z]),
        ];
        let ticks: Vec<Vec<(f64, String)>> = (0..3)
            .map(|axis| {
                nice_ticks(&ranges[axis], TICKS_PER_AXIS)
                    .into_iter()
                    .filter_map(|t| {
                        let pos = scales[axis].map(t.to_f64()?);
                        (-1.0 - TICK_EPSILON..=1.0 + TICK_EPSILON).contains(&pos).then(|| (pos, format_tick(t)))
                    })
                    .collect()
            })
            .collect();

        if config.show_grid {
            for wall_axis in 0..3 {
                // The wall perpendicular to `wall_axis` on the far side.
                let wall = if view[wall_axis] > 0.0 { -1.0 } else { 1.0 };
                for along in (0..3).filter(|&a| a != wall_axis) {
                    let across = 3 - wall_axis - along;
                    for (pos, _) in &ticks[along] {
                        let mut a = DVec3::ZERO;
                        a[wall_axis] = wall;
                        a[along] = *pos;
                        a[across] = -1.0;
                        let mut b = a;
                        b[across] = 1.0;
                        out.back.push(line(projection, a, b, theme.grid_line, 1.0));
                    }
                }
            }
        }

        // 3. Tick marks and labels on the near-bottom edges
        let near_x = if view.x > 0.0 { 1.0 } else { -1.0 };
        let near_y = if view.y > 0.0 { 1.0 } else { -1.0 };
        let anchors = [
            (DVec3::new(0.0, near_y, -1.0), DVec3::new(0.0, near_y, 0.0)),
            (DVec3::new(near_x, 0.0, -1.0), DVec3::new(near_x, 0.0, 0.0)),
            (DVec3::new(near_x, -near_y, 0.0), DVec3::new(near_x, 0.0, 0.0)),
        ];
        for (axis, &(base, outward)) in anchors.iter().enumerate() {
            for (pos, text) in &ticks[axis] {
                let mut p = base;
                p[axis] = *pos;
                let tip = p + outward * TICK_LENGTH;
                out.front.push(line(projection, p, tip, theme.tick_line, 1.0));
                if config.show_labels {
                    out.front.push(DrawCommand::Text {
                        at: projection.project(p + outward * LABEL_OFFSET),
                        text: text.clone(),
                        color: theme.axis_label,
                        anchor: TextAnchor::Middle,
                    });
                }
            }
            if config.show_labels {
                let mut mid = base + outward * TITLE_OFFSET;
                mid[axis] = 0.0;
                out.front.push(DrawCommand::Text {
                    at: projection.project(mid),
                    text: AXIS_TITLES[axis].to_string(),
                    color: theme.axis_label,
                    anchor: TextAnchor::Middle,
                });
            }
        }

        out
    }
}

fn line(projection: &ScreenProjection, a: DVec3, b: DVec3, color: Rgba, width: f32) -> DrawCommand {
    DrawCommand::Line {
        from: projection.project(a),
        to: projection.project(b),
        color,
        width,
        antialias: false,
    }
}

/// The 12 edges of the box `[-1, 1]^3`.
fn box_edges() -> Vec<(DVec3, DVec3)> {
    let mut edges = Vec::with_capacity(12);
    for axis in 0..3 {
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
        for su in [-1.0, 1.0] {
            for sv in [-1.0, 1.0] {
                let mut a = DVec3::ZERO;
                a[u] = su;
                a[v] = sv;
                a[axis] = -1.0;
                let mut b = a;
                b[axis] = 1.0;
                edges.push((a, b));
            }
        }
    }
    edges
}
