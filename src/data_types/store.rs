use super::group::{DataSeriesGroup, SeriesList};
use super::materialized::MaterializedData;
use super::series::{ArraySeries, DataSeries, MathSeries};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// All plotted data: one group of expression-backed series and one of array-backed series.
///
/// Lock order is always array group, then math group.
#[derive(Default)]
pub struct DataStore {
    array: DataSeriesGroup<ArraySeries>,
    math: DataSeriesGroup<MathSeries>,
}

/// Point-in-time view of both groups.
///
/// Expression series are sampled at most once per snapshot, on first use.
#[derive(Clone)]
pub struct DataSnapshot {
    pub array: SeriesList<ArraySeries>,
    pub math: SeriesList<MathSeries>,
    materialized: Arc<OnceCell<MaterializedData>>,
}

impl DataSnapshot {
    fn new(array: SeriesList<ArraySeries>, math: SeriesList<MathSeries>) -> Self {
        Self {
            array,
            math,
            materialized: Arc::new(OnceCell::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Arc::new(Vec::new()), Arc::new(Vec::new()))
    }

    pub fn len(&self) -> usize {
        self.array.len() + self.math.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Array series first, then math series, each in registration order.
    pub fn merged(&self) -> Vec<DataSeries> {
        self.array
            .iter()
            .cloned()
            .map(DataSeries::Array)
            .chain(self.math.iter().cloned().map(DataSeries::Math))
            .collect()
    }

    /// Drawable form of every series. Shared by all clones of this snapshot.
    pub fn materialized(&self) -> &MaterializedData {
        self.materialized
            .get_or_init(|| MaterializedData::from_series(self.merged()))
    }

    /// Union of the extents along one dimension. Series whose expression
    /// produced no sample do not contribute.
    pub fn extent(&self, dimension: usize) -> Option<(f64, f64)> {
        self.materialized().extent(dimension)
    }
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn array_series(&self) -> &DataSeriesGroup<ArraySeries> {
        &self.array
    }

    pub fn math_series(&self) -> &DataSeriesGroup<MathSeries> {
        &self.math
    }

    pub fn add_array(&self, series: ArraySeries) {
        self.array.add(series);
    }

    pub fn add_math(&self, series: MathSeries) {
        self.math.add(series);
    }

    pub fn remove_last_array(&self) -> Option<Arc<ArraySeries>> {
        self.array.remove_last()
    }

    pub fn remove_last_math(&self) -> Option<Arc<MathSeries>> {
        self.math.remove_last()
    }

    pub fn clear_array(&self) {
        self.array.clear_all();
    }

    pub fn clear_math(&self) {
        self.math.clear_all();
    }

    pub fn replace_array_series(&self, group: &DataSeriesGroup<ArraySeries>) {
        self.array.replace_all(group);
    }

    pub fn replace_math_series(&self, group: &DataSeriesGroup<MathSeries>) {
        self.math.replace_all(group);
    }

    pub fn append_array_series(&self, group: &DataSeriesGroup<ArraySeries>) {
        self.array.append_all(group);
    }

    pub fn append_math_series(&self, group: &DataSeriesGroup<MathSeries>) {
        self.math.append_all(group);
    }

    /// Clears both groups as one unit: a snapshot sees both cleared or neither.
    pub fn clear_data_series(&self) {
        let mut array = self.array.write();
        let mut math = self.math.write();
        *array = Arc::new(Vec::new());
        *math = Arc::new(Vec::new());
    }

    pub fn snapshot(&self) -> DataSnapshot {
        let array = self.array.read();
        let math = self.math.read();
        DataSnapshot::new(array.clone(), math.clone())
    }

    pub fn merged(&self) -> Vec<DataSeries> {
        self.snapshot().merged()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
