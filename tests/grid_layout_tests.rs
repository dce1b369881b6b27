use flotline::core::axis::AxisDirection;
use flotline::options::{AxisOptions, AxisPosition, GridOptions, Margins, PlotOptions, SeriesOptions};
use flotline::render::surface::RecordingSurface;
use flotline::{Plot, SeriesDescriptor};

fn build(options: PlotOptions, data: Vec<SeriesDescriptor>) -> Plot<RecordingSurface> {
    let surface = RecordingSurface::new(400.0, 300.0).unwrap();
    let overlay = RecordingSurface::new(400.0, 300.0).unwrap();
    Plot::new(surface, overlay, data, options, &[]).unwrap()
}

fn line_data() -> Vec<SeriesDescriptor> {
    vec![SeriesDescriptor::from_xy(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)])]
}

#[test]
fn plot_area_plus_offsets_fill_the_surface() {
    let plot = build(PlotOptions::default(), line_data());
    let offset = plot.offset();
    assert_eq!(plot.width() + offset.left + offset.right, 400.0);
    assert_eq!(plot.height() + offset.top + offset.bottom, 300.0);
}

#[test]
fn axis_boxes_reserve_room_for_measured_labels() {
    let plot = build(PlotOptions::default(), line_data());
    let core = plot.core();

    let ax = core.axis(AxisDirection::X, 1).unwrap();
    let ay = core.axis(AxisDirection::Y, 1).unwrap();
    assert!(ax.label_height > 0.0);
    assert!(ay.label_width > 0.0);

    // left offset covers the y labels, their padding, and the border
    let offset = plot.offset();
    assert!(offset.left >= ay.label_width + core.options.grid.label_margin);
    assert!(offset.bottom >= ax.label_height + core.options.grid.label_margin);
}

#[test]
fn hiding_the_grid_collapses_the_offsets_to_the_margin() {
    let options = PlotOptions {
        grid: GridOptions {
            show: false,
            margin: Margins::uniform(4.0),
            ..GridOptions::default()
        },
        ..PlotOptions::default()
    };
    let plot = build(options, line_data());
    assert_eq!(plot.offset(), Margins::uniform(4.0));
    assert_eq!(plot.width(), 392.0);
}

#[test]
fn border_width_is_added_outside_the_axis_boxes() {
    let mut thin = PlotOptions::default();
    thin.grid.border_width = Margins::uniform(0.0);
    let mut thick = PlotOptions::default();
    thick.grid.border_width = Margins::uniform(10.0);

    let plot_thin = build(thin, line_data());
    let plot_thick = build(thick, line_data());
    assert!(plot_thick.offset().left >= plot_thin.offset().left + 10.0);
}

#[test]
fn a_right_positioned_second_y_axis_claims_the_right_side() {
    let options = PlotOptions {
        yaxes: vec![
            AxisOptions::default_y(),
            AxisOptions {
                position: AxisPosition::Right,
                ..AxisOptions::default_y()
            },
        ],
        ..PlotOptions::default()
    };
    let mut data = line_data();
    data.push(SeriesDescriptor {
        data: vec![Some(vec![Some(1.0), Some(50.0)]), Some(vec![Some(3.0), Some(90.0)])],
        options: Some(SeriesOptions {
            yaxis: 2,
            ..SeriesOptions::default()
        }),
    });
    let plot = build(options, data);

    let baseline = build(PlotOptions::default(), line_data());
    assert!(plot.offset().right > baseline.offset().right);

    let y2 = plot.core().axis(AxisDirection::Y, 2).unwrap();
    assert!(y2.layout.left > plot.offset().left + plot.width() - 1.0);
}

#[test]
fn unused_axes_do_not_reserve_space() {
    let plot = build(PlotOptions::default(), line_data());
    // only one y axis was referenced, so none were allocated beyond it
    assert!(plot.core().axis(AxisDirection::Y, 2).is_none());
}

#[test]
fn transforms_are_ready_after_setup() {
    let plot = build(PlotOptions::default(), line_data());
    let ax = plot.core().axis(AxisDirection::X, 1).unwrap();
    assert!((ax.p2c(ax.min)).abs() < 1e-9);
    assert!((ax.p2c(ax.max) - plot.width()).abs() < 1e-9);
}

#[test]
fn stickout_margin_covers_point_markers() {
    let mut options = PlotOptions::default();
    options.grid.border_width = Margins::uniform(0.0);
    options.series.points.show = true;
    options.series.points.radius = 10.0;
    options.series.points.line_width = 2.0;
    let plot = build(options, line_data());

    // 2 * (radius + line_width / 2) on every side
    let offset = plot.offset();
    assert!(offset.right >= 22.0);
    assert!(offset.top >= 22.0);
}

#[test]
fn resize_then_setup_rescales_the_transforms() {
    let surface = RecordingSurface::new(400.0, 300.0).unwrap();
    let overlay = RecordingSurface::new(400.0, 300.0).unwrap();
    let mut plot = Plot::new(surface, overlay, line_data(), PlotOptions::default(), &[]).unwrap();

    let old_width = plot.width();
    plot.resize(800.0, 300.0).unwrap();
    plot.setup_grid().unwrap();
    plot.draw();
    assert!(plot.width() > old_width + 300.0);
}
