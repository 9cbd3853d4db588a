//! Turns axis range settings into the bounds used for one pass.
//!
//! Ranges are pulled at pass start from whatever data is in the snapshot. Nothing is
//! recomputed eagerly when series are added.

use crate::data_types::{AxisRangeSet, AxisRangeValue, DataSnapshot};
use crate::scales::{EffectiveRange, RangeSource};

/// Anything that can report the extent of its content along a dimension.
pub trait ExtentSource {
    fn extent(&self, dimension: usize) -> Option<(f64, f64)>;
}

impl ExtentSource for DataSnapshot {
    fn extent(&self, dimension: usize) -> Option<(f64, f64)> {
        DataSnapshot::extent(self, dimension)
    }
}

pub struct RangeResolver;

impl RangeResolver {
    /// Effective bounds of one dimension.
    ///
    /// - auto-range off: stored bounds verbatim, inverted or not
    /// - auto-range on: union of extents, or the stored bounds if nothing contributes
    pub fn resolve(
        setting: &AxisRangeValue,
        dimension: usize,
        data: &impl ExtentSource,
    ) -> EffectiveRange {
        if !setting.auto_range_enabled {
            return EffectiveRange::new(setting.minimum, setting.maximum, RangeSource::Manual);
        }
        data.extent(dimension)
            .and_then(EffectiveRange::from_extent)
            .unwrap_or_else(|| {
                EffectiveRange::new(setting.minimum, setting.maximum, RangeSource::Fallback)
            })
    }

    /// Resolves X, Y, Z and every extra dimension, in dimension order.
    pub fn resolve_all(ranges: &AxisRangeSet, data: &impl ExtentSource) -> Vec<EffectiveRange> {
        ranges
            .iter()
            .enumerate()
            .map(|(dimension, setting)| Self::resolve(setting, dimension, data))
            .collect()
    }
}
