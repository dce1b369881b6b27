use flotline::core::axis::{Axis, AxisDirection};
use flotline::core::pipeline::{normalize_series, sweep_extents, synthesize_format};
use flotline::core::Series;
use flotline::options::{BarAlign, SeriesOptions};

fn xy_axes() -> (Axis, Axis) {
    (
        Axis::new(1, AxisDirection::X, Default::default()),
        Axis::new(1, AxisDirection::Y, Default::default()),
    )
}

fn line_series(data: Vec<Option<Vec<Option<f64>>>>) -> Series {
    let mut options = SeriesOptions::default();
    options.lines.show = Some(true);
    Series::new(options, data)
}

fn pairs(points: &[(f64, f64)]) -> Vec<Option<Vec<Option<f64>>>> {
    points
        .iter()
        .map(|&(x, y)| Some(vec![Some(x), Some(y)]))
        .collect()
}

#[test]
fn missing_required_field_nullifies_the_tuple() {
    let mut series = line_series(vec![
        Some(vec![Some(1.0), Some(2.0)]),
        Some(vec![None, Some(5.0)]),
        Some(vec![Some(3.0), Some(4.0)]),
    ]);
    let (mut ax, mut ay) = xy_axes();
    normalize_series(&mut series, &mut ax, &mut ay);

    assert_eq!(series.datapoints.point_size, 2);
    assert_eq!(series.datapoints.tuple(1), Some(&[None, None][..]));
    // the surviving y value still fed the data extent before blanking
    assert_eq!(ay.datamax, Some(5.0));
}

#[test]
fn nan_values_nullify_and_infinities_become_off_scale_sentinels() {
    let mut series = line_series(vec![
        Some(vec![Some(1.0), Some(f64::NAN)]),
        Some(vec![Some(2.0), Some(f64::INFINITY)]),
        Some(vec![Some(3.0), Some(f64::NEG_INFINITY)]),
    ]);
    let (mut ax, mut ay) = xy_axes();
    normalize_series(&mut series, &mut ax, &mut ay);

    assert_eq!(series.datapoints.tuple(0), Some(&[None, None][..]));
    assert_eq!(series.datapoints.tuple(1), Some(&[Some(2.0), Some(f64::MAX)][..]));
    assert_eq!(
        series.datapoints.tuple(2),
        Some(&[Some(3.0), Some(-f64::MAX)][..])
    );

    // sentinels draw off-scale but never drive autoscaling
    let ((_, _), (ymin, ymax)) = sweep_extents(&series);
    assert!(ymin.is_infinite() && ymax.is_infinite());
}

#[test]
fn explicit_gap_entries_stay_gaps() {
    let mut series = line_series(vec![
        Some(vec![Some(1.0), Some(1.0)]),
        None,
        Some(vec![Some(2.0), Some(2.0)]),
    ]);
    let (mut ax, mut ay) = xy_axes();
    normalize_series(&mut series, &mut ax, &mut ay);

    assert_eq!(series.datapoints.len(), 3);
    assert_eq!(series.datapoints.tuple(1), Some(&[None, None][..]));
}

#[test]
fn stepped_lines_splice_a_mid_tuple_with_the_previous_y() {
    let mut series = line_series(pairs(&[(1.0, 1.0), (2.0, 2.0)]));
    series.options.lines.steps = true;
    let (mut ax, mut ay) = xy_axes();
    normalize_series(&mut series, &mut ax, &mut ay);

    assert_eq!(series.datapoints.len(), 3);
    assert_eq!(series.datapoints.tuple(1), Some(&[Some(2.0), Some(1.0)][..]));
    assert_eq!(series.datapoints.tuple(2), Some(&[Some(2.0), Some(2.0)][..]));
}

#[test]
fn bars_get_a_zero_base_slot_and_widen_the_x_extent() {
    let mut options = SeriesOptions::default();
    options.bars.show = true;
    options.bars.bar_width = 1.0;
    options.bars.align = BarAlign::Center;
    let mut series = Series::new(options, pairs(&[(0.0, 5.0), (2.0, 3.0)]));

    let format = synthesize_format(&series);
    assert_eq!(format.len(), 3);
    assert!(format[2].y && format[2].autoscale);
    assert_eq!(format[2].default_value, Some(0.0));

    let (mut ax, mut ay) = xy_axes();
    normalize_series(&mut series, &mut ax, &mut ay);
    assert_eq!(series.datapoints.tuple(0), Some(&[Some(0.0), Some(5.0), Some(0.0)][..]));

    let ((xmin, xmax), (ymin, ymax)) = sweep_extents(&series);
    assert_eq!((xmin, xmax), (-0.5, 2.5));
    assert_eq!((ymin, ymax), (0.0, 5.0));
}

#[test]
fn horizontal_bars_put_the_base_on_the_x_axis() {
    let mut options = SeriesOptions::default();
    options.bars.show = true;
    options.bars.horizontal = true;
    let series = Series::new(options, Vec::new());

    let format = synthesize_format(&series);
    assert!(format[2].x && !format[2].y);
}

#[test]
fn filled_lines_without_zero_skip_base_autoscaling() {
    let mut options = SeriesOptions::default();
    options.lines.show = Some(true);
    options.lines.fill = flotline::options::FillSetting::On;
    options.lines.zero = Some(false);
    let series = Series::new(options, Vec::new());

    let format = synthesize_format(&series);
    assert_eq!(format.len(), 3);
    assert!(!format[2].autoscale);
}

#[test]
fn prefilled_buffers_are_left_alone() {
    let mut series = line_series(pairs(&[(1.0, 1.0)]));
    series.datapoints.point_size = 2;
    series.datapoints.points = vec![Some(9.0), Some(9.0)];
    series.datapoints.format = synthesize_format(&series);

    let (mut ax, mut ay) = xy_axes();
    normalize_series(&mut series, &mut ax, &mut ay);
    assert_eq!(series.datapoints.points, vec![Some(9.0), Some(9.0)]);
}
