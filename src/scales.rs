use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Where the bounds of an `EffectiveRange` came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeSource {
    /// Auto-range off, stored bounds used as-is.
    Manual,
    /// Union of the series extents.
    Data,
    /// Auto-range on but nothing contributed an extent.
    Fallback,
}

/// Bounds actually used for one dimension during a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectiveRange {
    pub minimum: Decimal,
    pub maximum: Decimal,
    pub source: RangeSource,
}

impl EffectiveRange {
    pub fn new(minimum: Decimal, maximum: Decimal, source: RangeSource) -> Self {
        Self {
            minimum,
            maximum,
            source,
        }
    }

    /// Converts a float extent. `None` for non-finite values. Magnitudes beyond
    /// `Decimal` saturate at `Decimal::MIN`/`Decimal::MAX`.
    pub fn from_extent(extent: (f64, f64)) -> Option<Self> {
        Some(Self::new(
            saturating_decimal(extent.0)?,
            saturating_decimal(extent.1)?,
            RangeSource::Data,
        ))
    }

    pub fn min_f64(&self) -> f64 {
        self.minimum.to_f64().unwrap_or(0.0)
    }

    pub fn max_f64(&self) -> f64 {
        self.maximum.to_f64().unwrap_or(0.0)
    }

    pub fn is_inverted(&self) -> bool {
        self.minimum > self.maximum
    }
}

fn saturating_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).or(Some(if value.abs() < 1.0 {
        Decimal::ZERO
    } else if value > 0.0 {
        Decimal::MAX
    } else {
        Decimal::MIN
    }))
}

/// Linear map from a data range onto the normalized box coordinate `[-1, 1]`.
///
/// `minimum` always maps to -1, so an inverted range flips the axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisScale {
    d_min: f64,
    d_max: f64,
}

impl AxisScale {
    pub fn new(range: &EffectiveRange) -> Self {
        let mut d_min = range.min_f64();
        let mut d_max = range.max_f64();
        if (d_max - d_min).abs() < f64::EPSILON {
            d_min -= 0.5;
            d_max += 0.5;
        }
        Self { d_min, d_max }
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.d_min, self.d_max)
    }

    pub fn map(&self, value: f64) -> f64 {
        let res = -1.0 + 2.0 * (value - self.d_min) / (self.d_max - self.d_min);
        if res.is_finite() {
            res
        } else {
            0.0
        }
    }

    /// Position in `[0, 1]` along the axis, for color mapping.
    pub fn fraction(&self, value: f64) -> f64 {
        ((self.map(value) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

const MAX_TICKS: usize = 1000;
const MAX_DECIMAL_EXPONENT: i32 = 28;

/// Round tick values (1, 2 or 5 times a power of ten) covering the range.
///
/// Ticks are produced by exact decimal addition, so the same range always yields
/// the same tick values, whatever number of passes came before.
pub fn nice_ticks(range: &EffectiveRange, count: usize) -> Vec<Decimal> {
    let (lo, hi) = if range.minimum <= range.maximum {
        (range.minimum, range.maximum)
    } else {
        (range.maximum, range.minimum)
    };
    if lo == hi {
        return vec![lo];
    }
    nice_step(hi - lo, count.max(1))
        .and_then(|step| ticks_with_step(lo, hi, step))
        .unwrap_or_default()
}

fn nice_step(span: Decimal, count: usize) -> Option<Decimal> {
    let raw = span.checked_div(Decimal::from(count))?;
    let exponent = raw.to_f64()?.log10().floor() as i32;
    let magnitude = pow10(exponent.clamp(-MAX_DECIMAL_EXPONENT, MAX_DECIMAL_EXPONENT))?;
    let fraction = raw.checked_div(magnitude)?;
    let nice = if fraction <= Decimal::ONE {
        1
    } else if fraction <= Decimal::TWO {
        2
    } else if fraction <= Decimal::from(5) {
        5
    } else {
        10
    };
    magnitude.checked_mul(Decimal::from(nice))
}

fn ticks_with_step(lo: Decimal, hi: Decimal, step: Decimal) -> Option<Vec<Decimal>> {
    if step <= Decimal::ZERO {
        return None;
    }
    let mut tick = lo.checked_div(step)?.ceil().checked_mul(step)?;
    let mut ticks = Vec::new();
    while tick <= hi && ticks.len() < MAX_TICKS {
        ticks.push(tick.normalize());
        tick = tick.checked_add(step)?;
    }
    Some(ticks)
}

fn pow10(exponent: i32) -> Option<Decimal> {
    if exponent >= 0 {
        Decimal::try_from_i128_with_scale(10i128.pow(exponent as u32), 0).ok()
    } else {
        Decimal::try_from_i128_with_scale(1, exponent.unsigned_abs()).ok()
    }
}

/// Label text for a tick value. Exact, so no float noise like `0.30000000000000004`.
pub fn format_tick(value: Decimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    value.normalize().to_string()
}
