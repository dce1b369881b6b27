use std::thread::sleep;
use std::time::Duration;

use flotline::core::axis::AxisDirection;
use flotline::interaction::{PointerEvent, PointerEventKind};
use flotline::options::{PlotOptions, RedrawInterval, SeriesOptions};
use flotline::render::context::DrawCommand;
use flotline::render::surface::RecordingSurface;
use flotline::{Plot, SeriesDescriptor};

fn build(options: PlotOptions, data: Vec<SeriesDescriptor>) -> Plot<RecordingSurface> {
    let surface = RecordingSurface::new(400.0, 300.0).unwrap();
    let overlay = RecordingSurface::new(400.0, 300.0).unwrap();
    Plot::new(surface, overlay, data, options, &[]).unwrap()
}

fn hoverable_options() -> PlotOptions {
    let mut options = PlotOptions::default();
    options.grid.hoverable = true;
    options.grid.clickable = true;
    options.interaction.redraw_overlay_interval = RedrawInterval::Immediate;
    options
}

fn point_data() -> Vec<SeriesDescriptor> {
    let mut descriptor = SeriesDescriptor::from_xy(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
    descriptor.options = Some(SeriesOptions {
        points: flotline::options::PointsOptions {
            show: true,
            ..Default::default()
        },
        ..SeriesOptions::default()
    });
    vec![descriptor]
}

/// Surface coordinates of a data point on the first axes.
fn surface_pos(plot: &Plot<RecordingSurface>, x: f64, y: f64) -> (f64, f64) {
    let core = plot.core();
    let ax = core.axis(AxisDirection::X, 1).unwrap();
    let ay = core.axis(AxisDirection::Y, 1).unwrap();
    (
        core.plot_offset.left + ax.p2c(x),
        core.plot_offset.top + ay.p2c(y),
    )
}

#[test]
fn hovering_near_a_point_reports_it() {
    let mut plot = build(hoverable_options(), point_data());
    let (sx, sy) = surface_pos(&plot, 2.0, 2.0);

    let report = plot
        .handle_event(PointerEvent::Move { x: sx + 2.0, y: sy - 2.0 })
        .unwrap();
    assert_eq!(report.kind, PointerEventKind::Hover);
    let item = report.item.unwrap();
    assert_eq!(item.series_index, 0);
    assert_eq!(item.data_index, 1);
    assert_eq!(item.datapoint[0], Some(2.0));

    // the resolved position tracks the pointer, not the matched point
    assert!((report.position.x().unwrap() - 2.0).abs() < 0.5);
}

#[test]
fn hovering_outside_the_active_radius_reports_nothing() {
    let mut plot = build(hoverable_options(), point_data());
    let (sx, sy) = surface_pos(&plot, 1.5, 2.8);

    let report = plot.handle_event(PointerEvent::Move { x: sx, y: sy }).unwrap();
    assert!(report.item.is_none());
}

#[test]
fn hover_events_are_suppressed_when_hovering_is_off() {
    let mut options = hoverable_options();
    options.grid.hoverable = false;
    let mut plot = build(options, point_data());
    assert!(plot.handle_event(PointerEvent::Move { x: 10.0, y: 10.0 }).is_none());
}

#[test]
fn clicks_use_the_clickable_filter() {
    let mut plot = build(hoverable_options(), point_data());
    let (sx, sy) = surface_pos(&plot, 3.0, 3.0);

    let report = plot.handle_event(PointerEvent::Click { x: sx, y: sy }).unwrap();
    assert_eq!(report.kind, PointerEventKind::Click);
    assert_eq!(report.item.unwrap().data_index, 2);
}

#[test]
fn auto_highlights_follow_the_pointer_and_clear_on_leave() {
    let mut plot = build(hoverable_options(), point_data());
    let (sx, sy) = surface_pos(&plot, 2.0, 2.0);

    plot.handle_event(PointerEvent::Move { x: sx, y: sy }).unwrap();
    assert_eq!(plot.core().highlights.len(), 1);

    // moving to another point swaps the highlight
    let (sx3, sy3) = surface_pos(&plot, 3.0, 3.0);
    plot.handle_event(PointerEvent::Move { x: sx3, y: sy3 }).unwrap();
    assert_eq!(plot.core().highlights.len(), 1);
    assert_eq!(plot.core().highlights[0].point[0], Some(3.0));

    plot.handle_event(PointerEvent::Leave).unwrap();
    assert!(plot.core().highlights.is_empty());
}

#[test]
fn manual_highlights_survive_pointer_leave() {
    let mut plot = build(hoverable_options(), point_data());
    plot.highlight(0, (1.0, 1.0));
    plot.handle_event(PointerEvent::Leave).unwrap();
    assert_eq!(plot.core().highlights.len(), 1);

    plot.unhighlight(0, (1.0, 1.0));
    assert!(plot.core().highlights.is_empty());
}

#[test]
fn immediate_mode_draws_the_highlight_ring_synchronously() {
    let mut plot = build(hoverable_options(), point_data());
    plot.highlight(0, (2.0, 2.0));

    let has_ring = plot
        .overlay()
        .commands()
        .iter()
        .any(|c| matches!(c, DrawCommand::Arc { .. }));
    assert!(has_ring);
}

#[test]
fn delayed_overlay_redraws_coalesce_until_pumped() {
    let mut options = hoverable_options();
    options.interaction.redraw_overlay_interval = RedrawInterval::DelayMs(10.0);
    let mut plot = build(options, point_data());

    // drain the request queued by the initial draw
    sleep(Duration::from_millis(15));
    assert!(plot.pump_overlay());

    plot.highlight(0, (1.0, 1.0));
    plot.highlight(0, (2.0, 2.0));
    assert!(plot.core().scheduler.is_pending());
    assert!(!plot.pump_overlay());

    sleep(Duration::from_millis(15));
    assert!(plot.pump_overlay());
    assert!(!plot.core().scheduler.is_pending());

    let rings = plot
        .overlay()
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::Arc { .. }))
        .count();
    assert_eq!(rings, 2);
}

#[test]
fn bar_hits_require_the_pointer_inside_the_bar_body() {
    let mut options = hoverable_options();
    options.series.bars.show = true;
    options.series.bars.bar_width = 1.0;
    let data = vec![SeriesDescriptor::from_xy(&[(0.0, 5.0), (2.0, 5.0)])];
    let plot = build(options, data);
    let core = plot.core();
    let ax = core.axis(AxisDirection::X, 1).unwrap();
    let ay = core.axis(AxisDirection::Y, 1).unwrap();

    // inside the first bar
    let hit = core.find_nearby_item(ax.p2c(0.5), ay.p2c(2.5), |_| true);
    assert_eq!(hit.unwrap().data_index, 0);

    // in the gap between the bars
    let miss = core.find_nearby_item(ax.p2c(1.5), ay.p2c(2.5), |_| true);
    assert!(miss.is_none());

    // above the bar top
    let above = core.find_nearby_item(ax.p2c(0.5), ay.p2c(5.5), |_| true);
    assert!(above.is_none());
}

#[test]
fn bar_highlights_redraw_the_bar_on_the_overlay() {
    let mut options = hoverable_options();
    options.series.bars.show = true;
    let data = vec![SeriesDescriptor::from_xy(&[(0.0, 5.0)])];
    let mut plot = build(options, data);
    plot.highlight(0, (0.0, 5.0));

    let has_fill = plot
        .overlay()
        .commands()
        .iter()
        .any(|c| matches!(c, DrawCommand::FillRect { .. }));
    assert!(has_fill);
}

#[test]
fn later_series_win_hit_test_ties() {
    let mut plot_data = point_data();
    plot_data.push(point_data().remove(0));
    let plot = build(hoverable_options(), plot_data);
    let (sx, sy) = surface_pos(&plot, 2.0, 2.0);
    let core = plot.core();

    let item = core
        .find_nearby_item(
            sx - core.plot_offset.left,
            sy - core.plot_offset.top,
            |_| true,
        )
        .unwrap();
    assert_eq!(item.series_index, 1);
}
