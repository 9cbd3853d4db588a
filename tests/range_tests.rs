use eyre::eyre;
use plot3d_scene::data_types::{ArraySeries, AxisRangeValue, DataStore, GridAxis, SamplingGrid, X, Y, Z};
use plot3d_scene::evaluator::{Expression, FnEvaluator};
use plot3d_scene::range_resolver::RangeResolver;
use plot3d_scene::scales::RangeSource;
use plot3d_scene::{AxisRangeSet, MathSeries, Scene, SceneComposer};
use std::sync::Arc;
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_manual_range_is_verbatim() {
    let store = DataStore::new();
    store.add_array(ArraySeries::from_rows("p", &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap());

    let setting = AxisRangeValue::new(dec!(-2.5), dec!(7.125));
    let r = RangeResolver::resolve(&setting, X, &store.snapshot());
    assert_eq!(r.minimum, dec!(-2.5));
    assert_eq!(r.maximum, dec!(7.125));
    assert_eq!(r.source, RangeSource::Manual);
}

#[test]
fn test_manual_inverted_range_is_not_reordered() {
    let store = DataStore::new();
    let setting = AxisRangeValue::new(dec!(10), dec!(-10));
    let r = RangeResolver::resolve(&setting, Y, &store.snapshot());
    assert_eq!(r.minimum, dec!(10));
    assert_eq!(r.maximum, dec!(-10));
    assert!(r.is_inverted());
}

#[test]
fn test_auto_range_on_empty_store_falls_back() {
    let store = DataStore::new();
    let mut setting = AxisRangeValue::new(dec!(-1), dec!(1));
    setting.set_auto_range_enabled(true);

    // Repeated resolution stays put.
    for _ in 0..3 {
        let r = RangeResolver::resolve(&setting, X, &store.snapshot());
        assert_eq!(r.minimum, dec!(-1));
        assert_eq!(r.maximum, dec!(1));
        assert_eq!(r.source, RangeSource::Fallback);
    }
}

#[test]
fn test_auto_range_from_array_series() {
    let store = DataStore::new();
    store.add_array(
        ArraySeries::from_rows("p", &[[-5.0, 1.0, 0.0], [0.0, 2.0, 0.0], [10.0, 3.0, 0.0]]).unwrap(),
    );
    let setting = AxisRangeValue::auto(dec!(-1), dec!(1));
    let r = RangeResolver::resolve(&setting, X, &store.snapshot());
    assert_eq!(r.minimum, dec!(-5));
    assert_eq!(r.maximum, dec!(10));
    assert_eq!(r.source, RangeSource::Data);
}

#[test]
fn test_auto_range_saturates_beyond_decimal() {
    let store = DataStore::new();
    store.add_array(ArraySeries::from_rows("far", &[[-5.0, 0.0, 0.0], [1e30, 0.0, 0.0]]).unwrap());
    store.add_array(ArraySeries::from_rows("near", &[[0.0, -1e35, 0.0], [0.0, 2.0, 0.0]]).unwrap());
    let setting = AxisRangeValue::auto(dec!(-1), dec!(1));

    let x = RangeResolver::resolve(&setting, X, &store.snapshot());
    assert_eq!(x.source, RangeSource::Data);
    assert_eq!(x.minimum, dec!(-5));
    assert_eq!(x.maximum, Decimal::MAX);

    let y = RangeResolver::resolve(&setting, Y, &store.snapshot());
    assert_eq!(y.source, RangeSource::Data);
    assert_eq!(y.minimum, Decimal::MIN);
    assert_eq!(y.maximum, dec!(2));
}

#[test]
fn test_failing_expression_does_not_widen_auto_range() {
    let scene = Arc::new(Scene::new());
    scene.set_auto_range_enabled(X, true).unwrap();
    scene
        .data()
        .add_array(ArraySeries::from_rows("p", &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap());
    scene.data().add_math(
        MathSeries::new(
            "bad",
            Expression::new("?"),
            SamplingGrid::surface(GridAxis::new("x", -100.0, 100.0, 5), GridAxis::new("y", -100.0, 100.0, 5))
                .unwrap(),
            Arc::new(FnEvaluator::new(|_: &Expression, _: &[f64]| Err(eyre!("parse error")))),
        )
        .unwrap(),
    );

    let resolved = RangeResolver::resolve(&scene.config().axes.x, X, &scene.data().snapshot());
    assert_eq!((resolved.minimum, resolved.maximum), (dec!(0), dec!(1)));
    assert_eq!(resolved.source, RangeSource::Data);

    let composer = SceneComposer::new(scene);
    let summary = composer.render();
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(composer.frame().read().ranges[X], resolved);
}

#[test]
fn test_auto_range_ignores_dimension_without_data() {
    let store = DataStore::new();
    // Two columns only: nothing on Z.
    store.add_array(ArraySeries::from_rows("flat", &[[1.0, 2.0], [3.0, 4.0]]).unwrap());
    let setting = AxisRangeValue::auto(dec!(0), dec!(5));
    let r = RangeResolver::resolve(&setting, Z, &store.snapshot());
    assert_eq!(r.source, RangeSource::Fallback);
    assert_eq!((r.minimum, r.maximum), (dec!(0), dec!(5)));
}

#[test]
fn test_auto_range_is_union_of_extents() {
    let mut rng = rand::rng();
    for _ in 0..20 {
        let store = DataStore::new();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for s in 0..rng.random_range(1..5) {
            let rows: Vec<[f64; 3]> = (0..rng.random_range(1..50))
                .map(|_| {
                    let x = rng.random_range(-1000..1000) as f64 / 4.0;
                    lo = lo.min(x);
                    hi = hi.max(x);
                    [x, 0.0, 0.0]
                })
                .collect();
            store.add_array(ArraySeries::from_rows(format!("s{s}"), &rows).unwrap());
        }
        let r = RangeResolver::resolve(&AxisRangeValue::auto(dec!(0), dec!(1)), X, &store.snapshot());
        assert_eq!(r.minimum, Decimal::from_f64(lo).unwrap());
        assert_eq!(r.maximum, Decimal::from_f64(hi).unwrap());
    }
}

#[test]
fn test_resolve_all_covers_extra_dimensions() {
    let store = DataStore::new();
    store.add_array(
        ArraySeries::from_rows("colored", &[[0.0, 0.0, 0.0, 2.0], [1.0, 1.0, 1.0, 8.0]]).unwrap(),
    );
    let ranges = AxisRangeSet {
        extra: vec![AxisRangeValue::auto(dec!(0), dec!(1))],
        ..Default::default()
    };
    let resolved = RangeResolver::resolve_all(&ranges, &store.snapshot());
    assert_eq!(resolved.len(), 4);
    assert_eq!(resolved[3].minimum, dec!(2));
    assert_eq!(resolved[3].maximum, dec!(8));
    // Spatial axes were left manual.
    assert_eq!(resolved[0].source, RangeSource::Manual);
}

#[test]
fn test_unknown_dimension_is_rejected() {
    let mut ranges = AxisRangeSet::default();
    assert!(ranges.set(5, AxisRangeValue::default()).is_err());
    assert!(ranges.set(Z, AxisRangeValue::new(dec!(0), dec!(3))).is_ok());
    assert_eq!(ranges.z.maximum, dec!(3));
}
