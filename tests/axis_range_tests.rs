use flotline::core::axis::{Axis, AxisDirection};
use flotline::options::AxisOptions;

fn axis(options: AxisOptions) -> Axis {
    Axis::new(1, AxisDirection::X, options)
}

#[test]
fn range_comes_from_data_when_unpinned() {
    let mut a = axis(AxisOptions::default());
    a.datamin = Some(1.0);
    a.datamax = Some(3.0);
    a.set_range();
    assert_eq!((a.min, a.max), (1.0, 3.0));
}

#[test]
fn autoscale_margin_grows_both_unpinned_ends() {
    let mut a = axis(AxisOptions {
        autoscale_margin: Some(0.02),
        ..AxisOptions::default()
    });
    a.datamin = Some(1.0);
    a.datamax = Some(3.0);
    a.set_range();
    assert_eq!((a.min, a.max), (0.96, 3.04));
}

#[test]
fn margin_clamps_to_zero_when_data_never_crosses_it() {
    let mut a = axis(AxisOptions {
        autoscale_margin: Some(0.5),
        ..AxisOptions::default()
    });
    a.datamin = Some(0.0);
    a.datamax = Some(1.0);
    a.set_range();
    // all data is non-negative, so the lower margin stops at zero
    assert_eq!(a.min, 0.0);
    assert_eq!(a.max, 1.5);
}

#[test]
fn pinned_bounds_are_never_moved() {
    let mut a = axis(AxisOptions {
        min: Some(-1.0),
        max: Some(4.0),
        autoscale_margin: Some(0.5),
        ..AxisOptions::default()
    });
    a.datamin = Some(0.0);
    a.datamax = Some(3.0);
    a.set_range();
    assert_eq!((a.min, a.max), (-1.0, 4.0));
}

#[test]
fn degenerate_range_widens_by_a_percent_of_max() {
    let mut a = axis(AxisOptions::default());
    a.datamin = Some(5.0);
    a.datamax = Some(5.0);
    a.set_range();
    assert_eq!((a.min, a.max), (4.95, 5.05));
}

#[test]
fn degenerate_range_at_zero_widens_by_one() {
    let mut a = axis(AxisOptions::default());
    a.set_range();
    assert_eq!((a.min, a.max), (-1.0, 1.0));
}

#[test]
fn degenerate_range_with_pinned_min_pushes_max_up() {
    let mut a = axis(AxisOptions {
        min: Some(0.0),
        ..AxisOptions::default()
    });
    a.set_range();
    // min stays pinned at zero; max gives way by the zero-range widening
    assert_eq!((a.min, a.max), (0.0, 1.0));
}

#[test]
fn degenerate_range_with_pinned_max_pushes_min_down() {
    let mut a = axis(AxisOptions {
        max: Some(0.0),
        ..AxisOptions::default()
    });
    a.set_range();
    assert_eq!((a.min, a.max), (-1.0, 0.0));
}

#[test]
fn range_is_always_ordered_after_resolution() {
    let mut a = axis(AxisOptions::default());
    a.datamin = Some(-2.5);
    a.datamax = Some(7.5);
    a.set_range();
    assert!(a.min < a.max);
}
