use flotline::core::axis::AxisDirection;
use flotline::error::PlotError;
use flotline::extensions::hooks::{HookRegistry, Plugin};
use flotline::options::{AxisOptions, PlotOptions, SeriesColor, SeriesOptions};
use flotline::render::surface::RecordingSurface;
use flotline::{Plot, PlotResult, SeriesDescriptor};

fn surfaces() -> (RecordingSurface, RecordingSurface) {
    (
        RecordingSurface::new(400.0, 300.0).unwrap(),
        RecordingSurface::new(400.0, 300.0).unwrap(),
    )
}

fn simple_plot(options: PlotOptions) -> Plot<RecordingSurface> {
    let (surface, overlay) = surfaces();
    let data = vec![SeriesDescriptor::from_xy(&[
        (1.0, 1.0),
        (2.0, 2.0),
        (3.0, 3.0),
    ])];
    Plot::new(surface, overlay, data, options, &[]).unwrap()
}

#[test]
fn construction_runs_the_full_pipeline() {
    let plot = simple_plot(PlotOptions::default());
    assert!(plot.width() > 0.0);
    assert!(plot.height() > 0.0);
    // data landed in a normalized buffer
    assert_eq!(plot.core().series[0].datapoints.len(), 3);
    // both implicit axes exist and resolved a range
    let ax = plot.core().axis(AxisDirection::X, 1).unwrap();
    assert!(ax.min < ax.max && ax.used);
}

#[test]
fn a_one_color_palette_still_yields_distinct_series_colors() {
    let (surface, overlay) = surfaces();
    let data = vec![
        SeriesDescriptor::from_xy(&[(1.0, 1.0)]),
        SeriesDescriptor::from_xy(&[(1.0, 2.0)]),
        SeriesDescriptor::from_xy(&[(1.0, 3.0)]),
    ];
    let options = PlotOptions {
        colors: vec!["#808080".to_owned()],
        ..PlotOptions::default()
    };
    let plot = Plot::new(surface, overlay, data, options, &[]).unwrap();

    let colors: Vec<&str> = plot.core().series.iter().map(|s| s.color.as_str()).collect();
    assert_eq!(colors.len(), 3);
    assert_ne!(colors[0], colors[1]);
    assert_ne!(colors[1], colors[2]);
    assert_ne!(colors[0], colors[2]);
}

#[test]
fn explicit_series_colors_are_kept_and_indices_resolve_into_the_palette() {
    let (surface, overlay) = surfaces();
    let css = SeriesDescriptor {
        data: vec![Some(vec![Some(1.0), Some(1.0)])],
        options: Some(SeriesOptions {
            color: Some(SeriesColor::Css("#123456".to_owned())),
            ..SeriesOptions::default()
        }),
    };
    let indexed = SeriesDescriptor {
        data: vec![Some(vec![Some(1.0), Some(2.0)])],
        options: Some(SeriesOptions {
            color: Some(SeriesColor::Index(1)),
            ..SeriesOptions::default()
        }),
    };
    let plot = Plot::new(
        surface,
        overlay,
        vec![css, indexed],
        PlotOptions::default(),
        &[],
    )
    .unwrap();

    assert_eq!(plot.core().series[0].color, "#123456");
    // palette slot 1 is #afd8f8
    assert_eq!(plot.core().series[1].color, "rgb(175,216,248)");
}

#[test]
fn lines_turn_on_when_nothing_else_is_shown() {
    let plot = simple_plot(PlotOptions::default());
    assert_eq!(plot.core().series[0].options.lines.show, Some(true));
}

#[test]
fn series_referencing_a_second_axis_allocates_it() {
    let (surface, overlay) = surfaces();
    let second = SeriesDescriptor {
        data: vec![Some(vec![Some(1.0), Some(100.0)])],
        options: Some(SeriesOptions {
            yaxis: 2,
            ..SeriesOptions::default()
        }),
    };
    let data = vec![SeriesDescriptor::from_xy(&[(1.0, 1.0)]), second];
    let plot = Plot::new(surface, overlay, data, PlotOptions::default(), &[]).unwrap();

    let y2 = plot.core().axis(AxisDirection::Y, 2).unwrap();
    assert!(y2.used);
    assert!(plot.core().axis(AxisDirection::Y, 1).is_some());
}

#[test]
fn coordinate_maps_round_trip_through_the_axes() {
    let plot = simple_plot(PlotOptions::default());
    let position = plot.core().canvas_to_axis_coords(100.0, 50.0);
    let x = position.x().unwrap();
    let y = position.y().unwrap();

    let (left, top) = plot.core().axis_to_canvas_coords(&position.coords);
    assert!((left.unwrap() - 100.0).abs() < 1e-9);
    assert!((top.unwrap() - 50.0).abs() < 1e-9);

    // named keys carry the axis number
    assert!(position.coords.contains_key("x1"));
    assert_eq!(position.coords.get("x1"), Some(&x));
    assert_eq!(position.coords.get("y1"), Some(&y));
}

#[test]
fn point_offset_maps_data_to_surface_pixels() {
    let plot = simple_plot(PlotOptions::default());
    let core = plot.core();
    let ax = core.axis(AxisDirection::X, 1).unwrap();
    let ay = core.axis(AxisDirection::Y, 1).unwrap();

    let (px, py) = core.point_offset(ax.min, ay.max, 1, 1).unwrap();
    assert_eq!(px, core.plot_offset.left.trunc());
    assert_eq!(py, core.plot_offset.top.trunc());
}

#[test]
fn set_data_replaces_the_series() {
    let mut plot = simple_plot(PlotOptions::default());
    plot.set_data(vec![
        SeriesDescriptor::from_xy(&[(0.0, 0.0)]),
        SeriesDescriptor::from_xy(&[(1.0, 1.0)]),
    ]);
    plot.setup_grid().unwrap();
    plot.draw();
    assert_eq!(plot.core().series.len(), 2);
}

#[test]
fn resize_rejects_degenerate_dimensions() {
    let mut plot = simple_plot(PlotOptions::default());
    let err = plot.resize(0.0, 100.0).unwrap_err();
    assert!(matches!(err, PlotError::InvalidSurfaceSize { .. }));
    assert!(plot.resize(800.0, 600.0).is_ok());
}

#[test]
fn destroy_makes_the_plot_inert() {
    let mut plot = simple_plot(PlotOptions::default());
    plot.destroy();
    assert!(plot.core().series.is_empty());
    // further pipeline calls are no-ops rather than panics
    plot.draw();
    plot.setup_grid().unwrap();
}

struct MarkingsPlugin;

impl Plugin for MarkingsPlugin {
    fn name(&self) -> &'static str {
        "markings-recolor"
    }

    fn apply_default_options(&self, options: &mut PlotOptions) {
        options.grid.markings_color = "#112233".to_owned();
    }

    fn init(&self, hooks: &mut HookRegistry, _options: &mut PlotOptions) -> PlotResult<()> {
        hooks.on_process_options(|core| {
            core.options.grid.markings_line_width = 7.0;
        })?;
        hooks.on_bind_events(|core| {
            core.options.grid.axis_margin = 11.0;
        })?;
        hooks.on_process_datapoints(|core, index| {
            // shift every y value up by one
            let ps = core.series[index].datapoints.point_size;
            let points = &mut core.series[index].datapoints.points;
            let mut i = 1;
            while i < points.len() {
                if let Some(y) = &mut points[i] {
                    *y += 1.0;
                }
                i += ps;
            }
        })?;
        Ok(())
    }
}

#[test]
fn plugins_merge_defaults_and_hook_into_the_pipeline() {
    let (surface, overlay) = surfaces();
    let data = vec![SeriesDescriptor::from_xy(&[(1.0, 1.0), (2.0, 2.0)])];
    let plot = Plot::new(surface, overlay, data, PlotOptions::default(), &[&MarkingsPlugin])
        .unwrap();

    assert_eq!(plot.options().grid.markings_color, "#112233");
    assert_eq!(plot.options().grid.markings_line_width, 7.0);
    // the bind-events stage ran once construction completed
    assert_eq!(plot.options().grid.axis_margin, 11.0);
    // the datapoints hook ran after normalization
    assert_eq!(
        plot.core().series[0].datapoints.tuple(0),
        Some(&[Some(1.0), Some(2.0)][..])
    );
}

#[test]
fn axis_options_inherit_from_the_direction_base() {
    let (surface, overlay) = surfaces();
    let options = PlotOptions {
        yaxes: vec![
            AxisOptions::default_y(),
            AxisOptions {
                position: flotline::options::AxisPosition::Right,
                ..AxisOptions::default_y()
            },
        ],
        ..PlotOptions::default()
    };
    let second = SeriesDescriptor {
        data: vec![Some(vec![Some(1.0), Some(10.0)])],
        options: Some(SeriesOptions {
            yaxis: 2,
            ..SeriesOptions::default()
        }),
    };
    let plot = Plot::new(
        surface,
        overlay,
        vec![SeriesDescriptor::from_xy(&[(1.0, 1.0)]), second],
        options,
        &[],
    )
    .unwrap();

    let y2 = plot.core().axis(AxisDirection::Y, 2).unwrap();
    assert_eq!(y2.options.position, flotline::options::AxisPosition::Right);
    // the y-direction default margin came through inheritance
    assert_eq!(y2.options.autoscale_margin, Some(0.02));
}
