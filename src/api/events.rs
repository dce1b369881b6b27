//! Pointer event handling, hit-testing, and the highlight overlay.

use std::time::Instant;

use tracing::trace;

use crate::core::series::Series;
use crate::extensions::hooks::HookRegistry;
use crate::interaction::{
    EventReport, Highlight, NearbyItem, PointerEvent, PointerEventKind, PlotPosition,
};
use crate::render::context::{draw_circle, Paint, PlotContext};
use crate::render::draw::draw_bar;
use crate::render::surface::Surface;

use super::plot::{Plot, PlotCore};

impl PlotCore {
    /// Finds the closest data item within the active radius of a plot-area
    /// pixel position. Later series win ties; bars only match when the
    /// pointer is inside the bar body.
    pub fn find_nearby_item(
        &self,
        canvas_x: f64,
        canvas_y: f64,
        filter: impl Fn(&Series) -> bool,
    ) -> Option<NearbyItem> {
        let max_distance = self.options.grid.mouse_active_radius;
        let mut smallest = max_distance * max_distance + 1.0;
        let mut item: Option<(usize, usize)> = None;

        for i in (0..self.series.len()).rev() {
            let series = &self.series[i];
            if !filter(series) {
                continue;
            }
            let Some((axisx, axisy)) = self.axis_pair(series) else {
                continue;
            };
            let dp = &series.datapoints;
            let ps = dp.point_size;
            if ps == 0 {
                continue;
            }
            let mx = axisx.c2p(canvas_x);
            let my = axisy.c2p(canvas_y);
            // prefilter in data space, disabled under a nonlinear transform
            let maxx = if axisx.options.inverse_transform.is_some() {
                f64::MAX
            } else {
                max_distance / axisx.scale
            };
            let maxy = if axisy.options.inverse_transform.is_some() {
                f64::MAX
            } else {
                max_distance / axisy.scale
            };

            if series.options.lines.show.unwrap_or(false) || series.options.points.show {
                let mut j = 0;
                while j < dp.points.len() {
                    let (x_raw, y_raw) = (dp.points[j], dp.points[j + 1]);
                    let tuple_index = j / ps;
                    j += ps;
                    let (Some(x), Some(y)) = (x_raw, y_raw) else {
                        continue;
                    };
                    if x - mx > maxx || x - mx < -maxx || y - my > maxy || y - my < -maxy {
                        continue;
                    }
                    let dx = (axisx.p2c(x) - canvas_x).abs();
                    let dy = (axisy.p2c(y) - canvas_y).abs();
                    let dist = dx * dx + dy * dy;
                    if dist < smallest {
                        smallest = dist;
                        item = Some((i, tuple_index));
                    }
                }
            }

            if series.options.bars.show && item.is_none() {
                let bar_left = series.bar_left_align();
                let bar_right = bar_left + series.options.bars.bar_width;
                let mut j = 0;
                while j < dp.points.len() {
                    let x_raw = dp.points[j];
                    let y_raw = dp.points.get(j + 1).copied().flatten();
                    let b_raw = dp.points.get(j + 2).copied().flatten();
                    let tuple_index = j / ps;
                    j += ps;
                    let (Some(x), Some(y)) = (x_raw, y_raw) else {
                        continue;
                    };
                    let b = b_raw.unwrap_or(0.0);
                    let inside = if series.options.bars.horizontal {
                        mx <= b.max(x)
                            && mx >= b.min(x)
                            && my >= y + bar_left
                            && my <= y + bar_right
                    } else {
                        mx >= x + bar_left
                            && mx <= x + bar_right
                            && my >= b.min(y)
                            && my <= b.max(y)
                    };
                    if inside {
                        item = Some((i, tuple_index));
                    }
                }
            }
        }

        let (series_index, data_index) = item?;
        let series = &self.series[series_index];
        let ps = series.datapoints.point_size;
        let datapoint: Vec<Option<f64>> = series
            .datapoints
            .points
            .iter()
            .skip(data_index * ps)
            .take(ps)
            .copied()
            .collect();
        let (axisx, axisy) = self.axis_pair(series)?;
        let (cx, cy) = match (datapoint.first().copied().flatten(), datapoint.get(1).copied().flatten())
        {
            (Some(x), Some(y)) => (axisx.p2c(x), axisy.p2c(y)),
            _ => (canvas_x, canvas_y),
        };
        Some(NearbyItem {
            series_index,
            data_index,
            datapoint,
            canvas_x: cx,
            canvas_y: cy,
        })
    }

    fn index_of_highlight(&self, series_index: usize, point: &[Option<f64>]) -> Option<usize> {
        self.highlights.iter().position(|h| {
            h.series_index == series_index
                && h.point.first() == point.first()
                && h.point.get(1) == point.get(1)
        })
    }
}

impl<S: Surface> Plot<S> {
    /// Feeds one pointer event through hit-testing and auto-highlighting.
    ///
    /// Returns `None` when the relevant interaction (`grid.hoverable` /
    /// `grid.clickable`) is disabled; otherwise the report carries the
    /// resolved axis coordinates and the matched item, if any.
    pub fn handle_event(&mut self, event: PointerEvent) -> Option<EventReport> {
        if self.destroyed {
            return None;
        }
        let grid = &self.core.options.grid;
        let (kind, coords) = match event {
            PointerEvent::Move { x, y } => {
                if !grid.hoverable {
                    return None;
                }
                (PointerEventKind::Hover, Some((x, y)))
            }
            PointerEvent::Leave => {
                if !grid.hoverable {
                    return None;
                }
                (PointerEventKind::Hover, None)
            }
            PointerEvent::Click { x, y } => {
                if !grid.clickable {
                    return None;
                }
                (PointerEventKind::Click, Some((x, y)))
            }
        };

        let (position, item) = match coords {
            Some((x, y)) => {
                let canvas_x = x - self.core.plot_offset.left;
                let canvas_y = y - self.core.plot_offset.top;
                let position = self.core.canvas_to_axis_coords(canvas_x, canvas_y);
                let item = self.core.find_nearby_item(canvas_x, canvas_y, |s| match kind {
                    PointerEventKind::Hover => s.options.hoverable,
                    PointerEventKind::Click => s.options.clickable,
                });
                (position, item)
            }
            // leaving the plot: nothing can be near the pointer anymore
            None => (PlotPosition::default(), None),
        };

        if self.core.options.grid.auto_highlight {
            let mut changed = false;
            let stale: Vec<(usize, Vec<Option<f64>>)> = self
                .core
                .highlights
                .iter()
                .filter(|h| {
                    h.auto == Some(kind)
                        && !matches!(&item, Some(it) if it.series_index == h.series_index
                            && it.datapoint.first() == h.point.first()
                            && it.datapoint.get(1) == h.point.get(1))
                })
                .map(|h| (h.series_index, h.point.clone()))
                .collect();
            for (series_index, point) in stale {
                changed |= self.unhighlight_point(series_index, &point);
            }
            if let Some(it) = &item {
                changed |= self.highlight_inner(it.series_index, it.datapoint.clone(), Some(kind));
            }
            if changed {
                self.trigger_redraw_overlay();
            }
        }

        trace!(?kind, hit = item.is_some(), "pointer event handled");
        Some(EventReport {
            kind,
            position,
            item,
        })
    }

    /// Adds a manual highlight on a data point (data-space coordinates).
    pub fn highlight(&mut self, series_index: usize, point: (f64, f64)) {
        if self.highlight_inner(series_index, vec![Some(point.0), Some(point.1)], None) {
            self.trigger_redraw_overlay();
        }
    }

    fn highlight_inner(
        &mut self,
        series_index: usize,
        point: Vec<Option<f64>>,
        auto: Option<PointerEventKind>,
    ) -> bool {
        if series_index >= self.core.series.len() {
            return false;
        }
        match self.core.index_of_highlight(series_index, &point) {
            Some(i) => {
                // a manual request pins an existing auto highlight
                if auto.is_none() && self.core.highlights[i].auto.is_some() {
                    self.core.highlights[i].auto = None;
                }
                false
            }
            None => {
                self.core.highlights.push(Highlight {
                    series_index,
                    point,
                    auto,
                });
                true
            }
        }
    }

    /// Removes a highlight placed on a data point.
    pub fn unhighlight(&mut self, series_index: usize, point: (f64, f64)) {
        if self.unhighlight_point(series_index, &[Some(point.0), Some(point.1)]) {
            self.trigger_redraw_overlay();
        }
    }

    fn unhighlight_point(&mut self, series_index: usize, point: &[Option<f64>]) -> bool {
        match self.core.index_of_highlight(series_index, point) {
            Some(i) => {
                self.core.highlights.remove(i);
                true
            }
            None => false,
        }
    }

    /// Clears every highlight, manual and automatic.
    pub fn unhighlight_all(&mut self) {
        if !self.core.highlights.is_empty() {
            self.core.highlights.clear();
            self.trigger_redraw_overlay();
        }
    }

    /// Requests an overlay redraw; immediate mode redraws synchronously,
    /// otherwise requests coalesce until the host pumps them.
    pub fn trigger_redraw_overlay(&mut self) {
        if self.core.scheduler.request(Instant::now()) {
            self.draw_overlay();
        }
    }

    /// Runs a coalesced overlay redraw if its deadline has passed. Returns
    /// whether a redraw happened.
    pub fn pump_overlay(&mut self) -> bool {
        if self.core.scheduler.take_due(Instant::now()) {
            self.draw_overlay();
            true
        } else {
            false
        }
    }

    /// Redraws the overlay surface from the highlight list.
    pub fn draw_overlay(&mut self) {
        if self.destroyed {
            return;
        }
        self.core.scheduler.cancel();
        self.overlay.clear();

        let ctx = self.overlay.context();
        ctx.save();
        ctx.translate(self.core.plot_offset.left, self.core.plot_offset.top);
        for highlight in &self.core.highlights {
            let Some(series) = self.core.series.get(highlight.series_index) else {
                continue;
            };
            if series.options.bars.show {
                draw_bar_highlight(&self.core, series, &highlight.point, ctx);
            } else {
                draw_point_highlight(&self.core, series, &highlight.point, ctx);
            }
        }
        ctx.restore();

        HookRegistry::run_draw(&mut self.hooks.draw_overlay, &mut self.core, ctx);
    }
}

fn draw_point_highlight(
    core: &PlotCore,
    series: &Series,
    point: &[Option<f64>],
    ctx: &mut dyn PlotContext,
) {
    let (Some(x), Some(y)) = (
        point.first().copied().flatten(),
        point.get(1).copied().flatten(),
    ) else {
        return;
    };
    let Some((axisx, axisy)) = core.axis_pair(series) else {
        return;
    };
    if x < axisx.min || x > axisx.max || y < axisy.min || y > axisy.max {
        return;
    }

    let point_radius = series.options.points.radius + series.options.points.line_width / 2.0;
    ctx.set_line_width(point_radius);
    ctx.set_stroke(Paint::css(&series.highlight_color()));
    let radius = 1.5 * point_radius;
    let (cx, cy) = (axisx.p2c(x), axisy.p2c(y));

    ctx.begin_path();
    match &series.options.points.symbol {
        Some(symbol) => (symbol.0)(ctx, cx, cy, radius, false),
        None => draw_circle(ctx, cx, cy, radius, false),
    }
    ctx.close_path();
    ctx.stroke();
}

fn draw_bar_highlight(
    core: &PlotCore,
    series: &Series,
    point: &[Option<f64>],
    ctx: &mut dyn PlotContext,
) {
    let (Some(x), Some(y)) = (
        point.first().copied().flatten(),
        point.get(1).copied().flatten(),
    ) else {
        return;
    };
    let Some((axisx, axisy)) = core.axis_pair(series) else {
        return;
    };
    let b = point.get(2).copied().flatten().unwrap_or(0.0);

    let paint = Paint::css(&series.highlight_color());
    ctx.set_line_width(series.options.bars.line_width);
    ctx.set_stroke(paint.clone());

    let bar_left = series.bar_left_align();
    let fill = |_bottom: f64, _top: f64| paint.clone();
    draw_bar(
        x,
        y,
        b,
        bar_left,
        bar_left + series.options.bars.bar_width,
        Some(&fill),
        axisx,
        axisy,
        series.options.bars.horizontal,
        series.options.bars.line_width,
        ctx,
    );
}
