use serde::{Deserialize, Serialize};

/// Linear RGBA color, components in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Scales the color by a shading intensity and clamps into the displayable range.
    pub fn shaded(self, intensity: f64) -> Self {
        let k = intensity.max(0.0) as f32;
        Self {
            r: (self.r * k).clamp(0.0, 1.0),
            g: (self.g * k).clamp(0.0, 1.0),
            b: (self.b * k).clamp(0.0, 1.0),
            a: self.a,
        }
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

const COLORMAP_LOW: Rgba = Rgba::rgb(0.37, 0.51, 0.71);
const COLORMAP_MID: Rgba = Rgba::rgb(0.39, 0.69, 0.29);
const COLORMAP_HIGH: Rgba = Rgba::rgb(0.88, 0.58, 0.17);

/// Blue at 0, green at 0.5, orange at 1.
pub fn colormap(t: f64) -> Rgba {
    let t = t.clamp(0.0, 1.0) as f32;
    if t < 0.5 {
        COLORMAP_LOW.lerp(COLORMAP_MID, t * 2.0)
    } else {
        COLORMAP_MID.lerp(COLORMAP_HIGH, (t - 0.5) * 2.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartTheme {
    pub background: Rgba,
    pub frame_line: Rgba,
    pub grid_line: Rgba,
    pub tick_line: Rgba,
    pub axis_label: Rgba,
    pub legend_text: Rgba,
    pub palette: Vec<Rgba>,
}

impl ChartTheme {
    /// Base color of the n-th registered series.
    pub fn series_color(&self, index: usize) -> Rgba {
        if self.palette.is_empty() {
            return Rgba::rgb(1.0, 1.0, 1.0);
        }
        self.palette[index % self.palette.len()]
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(1.0, 1.0, 1.0),
            frame_line: Rgba::rgb(0.0, 0.0, 0.0).alpha(0.6),
            grid_line: Rgba::rgb(0.0, 0.0, 0.0).alpha(0.1),
            tick_line: Rgba::rgb(0.0, 0.0, 0.0).alpha(0.6),
            axis_label: Rgba::rgb(0.0, 0.0, 0.0).alpha(0.8),
            legend_text: Rgba::rgb(0.0, 0.0, 0.0),
            palette: vec![
                Rgba::rgb(0.37, 0.51, 0.71),
                Rgba::rgb(0.88, 0.61, 0.14),
                Rgba::rgb(0.56, 0.69, 0.19),
                Rgba::rgb(0.92, 0.39, 0.21),
                Rgba::rgb(0.53, 0.47, 0.70),
                Rgba::rgb(0.77, 0.43, 0.10),
                Rgba::rgb(0.36, 0.62, 0.78),
                Rgba::rgb(1.00, 0.75, 0.00),
            ],
        }
    }
}
