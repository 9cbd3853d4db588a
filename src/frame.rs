//! Output of a pass: a list of drawing commands handed to the host's drawing surface.

use crate::scales::EffectiveRange;
use crate::theme::Rgba;
use crate::transform::ScreenPoint;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Filled triangle with one color per vertex (all equal for flat shading).
    Triangle {
        points: [ScreenPoint; 3],
        colors: [Rgba; 3],
        antialias: bool,
    },
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        color: Rgba,
        width: f32,
        antialias: bool,
    },
    Marker {
        at: ScreenPoint,
        color: Rgba,
        size: f32,
        antialias: bool,
    },
    Text {
        at: ScreenPoint,
        text: String,
        color: Rgba,
        anchor: TextAnchor,
    },
}

impl DrawCommand {
    /// Depth used for back-to-front ordering.
    pub fn depth(&self) -> f64 {
        match self {
            Self::Triangle { points, .. } => {
                (points[0].depth + points[1].depth + points[2].depth) / 3.0
            }
            Self::Line { from, to, .. } => (from.depth + to.depth) * 0.5,
            Self::Marker { at, .. } | Self::Text { at, .. } => at.depth,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub color: Rgba,
}

/// Rasterization primitives provided by the host.
pub trait DrawingSurface {
    fn clear(&mut self, color: Rgba);
    fn draw(&mut self, command: &DrawCommand);
    fn legend(&mut self, _entries: &[LegendEntry]) {}
}

/// Composited image of one pass.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub pass: u64,
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
    /// Grid and frame edges, drawn first.
    pub decorations: Vec<DrawCommand>,
    /// Data primitives, sorted back to front.
    pub primitives: Vec<DrawCommand>,
    /// Tick marks and labels, drawn last.
    pub overlay: Vec<DrawCommand>,
    /// Highest priority (most recently registered) first.
    pub legend: Vec<LegendEntry>,
    /// One per dimension: X, Y, Z, then extra dimensions.
    pub ranges: Vec<EffectiveRange>,
}

impl Frame {
    /// Empties the frame while keeping its buffers.
    pub fn reset(&mut self, pass: u64, width: u32, height: u32, background: Rgba) {
        self.pass = pass;
        self.width = width;
        self.height = height;
        self.background = background;
        self.decorations.clear();
        self.primitives.clear();
        self.overlay.clear();
        self.legend.clear();
        self.ranges.clear();
    }

    pub fn replay(&self, surface: &mut dyn DrawingSurface) {
        surface.clear(self.background);
        for cmd in self
            .decorations
            .iter()
            .chain(self.primitives.iter())
            .chain(self.overlay.iter())
        {
            surface.draw(cmd);
        }
        if !self.legend.is_empty() {
            surface.legend(&self.legend);
        }
    }

    pub fn command_count(&self) -> usize {
        self.decorations.len() + self.primitives.len() + self.overlay.len()
    }
}

/// Handle to the image a renderer draws into. Created once per renderer and
/// updated in place by every pass.
pub type FrameHandle = Arc<RwLock<Frame>>;
