//! The draw pass: background, grid, markings, and series rendering.

use std::f64::consts::PI;

use tracing::trace;

use crate::core::axis::{Axis, AxisDirection};
use crate::core::series::Series;
use crate::extensions::hooks::HookRegistry;
use crate::options::{AxisPosition, LinesOptions, Marking, TickLength};
use crate::render::context::{LineJoin, Paint, PlotContext};
use crate::render::draw::{color_or_gradient, draw_bar, draw_line, draw_line_area, draw_points, fill_style};
use crate::render::surface::Surface;

use super::plot::{Plot, PlotCore};

impl<S: Surface> Plot<S> {
    /// Full redraw of the base surface. A draw implies the axes or data
    /// changed, so the overlay is refreshed as well.
    pub fn draw(&mut self) {
        if self.destroyed {
            return;
        }
        trace!("draw pass");
        self.surface.clear();

        let ctx = self.surface.context();
        HookRegistry::run_draw(&mut self.hooks.draw_background, &mut self.core, ctx);

        let show_grid = self.core.options.grid.show;
        if show_grid && self.core.options.grid.background_color.is_some() {
            self.core.draw_background(ctx);
        }
        if show_grid && !self.core.options.grid.above_data {
            self.core.draw_grid(ctx);
        }
        for i in 0..self.core.series.len() {
            HookRegistry::run_series_draw(&mut self.hooks.draw_series, &mut self.core, ctx, i);
            self.core.draw_series(i, ctx);
        }
        HookRegistry::run_draw(&mut self.hooks.draw, &mut self.core, ctx);
        if show_grid && self.core.options.grid.above_data {
            self.core.draw_grid(ctx);
        }

        self.surface.render();
        self.trigger_redraw_overlay();
    }
}

/// Resolved marking bounds along one direction.
struct MarkRange<'a> {
    from: Option<f64>,
    to: Option<f64>,
    axis: &'a Axis,
}

impl PlotCore {
    pub(crate) fn draw_background(&self, ctx: &mut dyn PlotContext) {
        ctx.save();
        ctx.translate(self.plot_offset.left, self.plot_offset.top);
        let paint = match &self.options.grid.background_color {
            Some(spec) => color_or_gradient(spec, self.plot_height, 0.0, "rgba(255, 255, 255, 0)"),
            None => Paint::css("rgba(255, 255, 255, 0)"),
        };
        ctx.set_fill(paint);
        ctx.fill_rect(0.0, 0.0, self.plot_width, self.plot_height);
        ctx.restore();
    }

    fn extract_range(&self, marking: &Marking, direction: AxisDirection) -> Option<MarkRange<'_>> {
        let slots = match direction {
            AxisDirection::X => &self.x_axes,
            AxisDirection::Y => &self.y_axes,
        };
        let letter = direction.letter();
        for axis in slots.iter().flatten() {
            let mut key = format!("{letter}{}axis", axis.number);
            if !marking.ranges.contains_key(&key) && axis.number == 1 {
                key = format!("{letter}axis");
            }
            if let Some(range) = marking.ranges.get(&key) {
                let (mut from, mut to) = (range.from, range.to);
                if let (Some(f), Some(t)) = (from, to) {
                    if f > t {
                        from = Some(t);
                        to = Some(f);
                    }
                }
                return Some(MarkRange { from, to, axis });
            }
        }
        // no range named along this direction: span the first axis
        slots.iter().flatten().next().map(|axis| MarkRange {
            from: None,
            to: None,
            axis,
        })
    }

    pub(crate) fn draw_grid(&self, ctx: &mut dyn PlotContext) {
        let grid = &self.options.grid;
        ctx.save();
        ctx.translate(self.plot_offset.left, self.plot_offset.top);

        for marking in &grid.markings {
            let Some(xr) = self.extract_range(marking, AxisDirection::X) else {
                continue;
            };
            let Some(yr) = self.extract_range(marking, AxisDirection::Y) else {
                continue;
            };
            // open bounds extend to the axis range
            let xfrom = xr.from.unwrap_or(xr.axis.min);
            let xto = xr.to.unwrap_or(xr.axis.max);
            let yfrom = yr.from.unwrap_or(yr.axis.min);
            let yto = yr.to.unwrap_or(yr.axis.max);

            if xto < xr.axis.min
                || xfrom > xr.axis.max
                || yto < yr.axis.min
                || yfrom > yr.axis.max
            {
                continue;
            }
            let xfrom = xfrom.max(xr.axis.min);
            let xto = xto.min(xr.axis.max);
            let yfrom = yfrom.max(yr.axis.min);
            let yto = yto.min(yr.axis.max);

            let xequal = xfrom == xto;
            let yequal = yfrom == yto;
            if xequal && yequal {
                continue;
            }

            let xfrom = xr.axis.p2c(xfrom).floor();
            let xto = xr.axis.p2c(xto).floor();
            let yfrom = yr.axis.p2c(yfrom).floor();
            let yto = yr.axis.p2c(yto).floor();

            let color = marking.color.as_deref().unwrap_or(&grid.markings_color);
            if xequal || yequal {
                let line_width = marking.line_width.unwrap_or(grid.markings_line_width);
                // odd widths get a half-pixel shift to land on the pixel grid
                let sub_pixel = if line_width % 2.0 != 0.0 { 0.5 } else { 0.0 };
                ctx.begin_path();
                ctx.set_stroke(Paint::css(color));
                ctx.set_line_width(line_width);
                if xequal {
                    ctx.move_to(xto + sub_pixel, yfrom);
                    ctx.line_to(xto + sub_pixel, yto);
                } else {
                    ctx.move_to(xfrom, yto + sub_pixel);
                    ctx.line_to(xto, yto + sub_pixel);
                }
                ctx.stroke();
            } else {
                ctx.set_fill(Paint::css(color));
                ctx.fill_rect(xfrom, yto, xto - xfrom, yfrom - yto);
            }
        }

        for axis in self.axes() {
            if !axis.show || axis.ticks.is_empty() {
                continue;
            }
            self.draw_axis_ticks(axis, ctx);
        }

        self.draw_border(ctx);
        ctx.restore();
    }

    fn draw_axis_ticks(&self, axis: &Axis, ctx: &mut dyn PlotContext) {
        let grid = &self.options.grid;
        let bw = grid.border_width;
        ctx.set_line_width(1.0);

        // the axis edge in plot-area coordinates
        let mut x = 0.0;
        let mut y = 0.0;
        match axis.direction {
            AxisDirection::X => {
                y = match axis.tick_length {
                    TickLength::Full => {
                        if axis.options.position == AxisPosition::Top {
                            0.0
                        } else {
                            self.plot_height
                        }
                    }
                    TickLength::Px(_) => {
                        axis.layout.top - self.plot_offset.top
                            + if axis.options.position == AxisPosition::Top {
                                axis.layout.height
                            } else {
                                0.0
                            }
                    }
                };
            }
            AxisDirection::Y => {
                x = match axis.tick_length {
                    TickLength::Full => {
                        if axis.options.position == AxisPosition::Left {
                            0.0
                        } else {
                            self.plot_width
                        }
                    }
                    TickLength::Px(_) => {
                        axis.layout.left - self.plot_offset.left
                            + if axis.options.position == AxisPosition::Left {
                                axis.layout.width
                            } else {
                                0.0
                            }
                    }
                };
            }
        }

        // a bar along the axis edge for stacked (non-innermost) axes
        if !axis.innermost {
            let color = axis.options.color.as_deref().unwrap_or(&self.options.grid.color);
            ctx.set_stroke(Paint::css(color));
            ctx.begin_path();
            let (mut bx, mut by) = (x, y);
            let (xoff, yoff) = match axis.direction {
                AxisDirection::X => (self.plot_width + 1.0, 0.0),
                AxisDirection::Y => (0.0, self.plot_height + 1.0),
            };
            match axis.direction {
                AxisDirection::X => by = by.floor() + 0.5,
                AxisDirection::Y => bx = bx.floor() + 0.5,
            }
            ctx.move_to(bx, by);
            ctx.line_to(bx + xoff, by + yoff);
            ctx.stroke();
        }

        let tick_color = axis
            .options
            .tick_color
            .as_deref()
            .unwrap_or(&self.options.grid.color);
        ctx.set_stroke(Paint::css(tick_color));
        ctx.begin_path();
        let border_on_side = match axis.options.position {
            AxisPosition::Bottom => bw.bottom,
            AxisPosition::Top => bw.top,
            AxisPosition::Left => bw.left,
            AxisPosition::Right => bw.right,
        } > 0.0;

        for tick in &axis.ticks {
            let v = tick.value;
            if v.is_nan() || v < axis.min || v > axis.max {
                continue;
            }
            // full-length ticks riding on a drawn border are redundant
            if matches!(axis.tick_length, TickLength::Full)
                && border_on_side
                && (v == axis.min || v == axis.max)
            {
                continue;
            }

            let (mut tx, mut ty) = (x, y);
            let (xoff, yoff);
            match axis.direction {
                AxisDirection::X => {
                    tx = axis.p2c(v);
                    let mut off = match axis.tick_length {
                        TickLength::Full => -self.plot_height,
                        TickLength::Px(px) => px,
                    };
                    if axis.options.position == AxisPosition::Top {
                        off = -off;
                    }
                    xoff = 0.0;
                    yoff = off;
                    tx = tx.floor() + 0.5;
                }
                AxisDirection::Y => {
                    ty = axis.p2c(v);
                    let mut off = match axis.tick_length {
                        TickLength::Full => -self.plot_width,
                        TickLength::Px(px) => px,
                    };
                    if axis.options.position == AxisPosition::Left {
                        off = -off;
                    }
                    xoff = off;
                    yoff = 0.0;
                    ty = ty.floor() + 0.5;
                }
            }
            ctx.move_to(tx, ty);
            ctx.line_to(tx + xoff, ty + yoff);
        }
        ctx.stroke();
    }

    fn draw_border(&self, ctx: &mut dyn PlotContext) {
        let grid = &self.options.grid;
        let bw = grid.border_width;
        if bw.left <= 0.0 && bw.right <= 0.0 && bw.top <= 0.0 && bw.bottom <= 0.0 {
            return;
        }
        let color = grid.border_color.as_deref().unwrap_or(&grid.color);
        ctx.set_stroke(Paint::css(color));

        let uniform = bw.left == bw.right && bw.right == bw.top && bw.top == bw.bottom;
        if uniform {
            let w = bw.left;
            ctx.set_line_width(w);
            ctx.stroke_rect(-w / 2.0, -w / 2.0, self.plot_width + w, self.plot_height + w);
            return;
        }

        // centered on each side so the stroke sits just outside the plot
        if bw.top > 0.0 {
            ctx.set_line_width(bw.top);
            ctx.begin_path();
            ctx.move_to(-bw.left, -bw.top / 2.0);
            ctx.line_to(self.plot_width, -bw.top / 2.0);
            ctx.stroke();
        }
        if bw.right > 0.0 {
            ctx.set_line_width(bw.right);
            ctx.begin_path();
            ctx.move_to(self.plot_width + bw.right / 2.0, -bw.top);
            ctx.line_to(self.plot_width + bw.right / 2.0, self.plot_height);
            ctx.stroke();
        }
        if bw.bottom > 0.0 {
            ctx.set_line_width(bw.bottom);
            ctx.begin_path();
            ctx.move_to(self.plot_width + bw.right, self.plot_height + bw.bottom / 2.0);
            ctx.line_to(0.0, self.plot_height + bw.bottom / 2.0);
            ctx.stroke();
        }
        if bw.left > 0.0 {
            ctx.set_line_width(bw.left);
            ctx.begin_path();
            ctx.move_to(-bw.left / 2.0, self.plot_height + bw.bottom);
            ctx.line_to(-bw.left / 2.0, 0.0);
            ctx.stroke();
        }
    }

    /// Draws one series: lines first, then bars, then point markers on top.
    pub fn draw_series(&self, index: usize, ctx: &mut dyn PlotContext) {
        let Some(series) = self.series.get(index) else {
            return;
        };
        if series.options.lines.show.unwrap_or(false) {
            self.draw_series_lines(series, ctx);
        }
        if series.options.bars.show {
            self.draw_series_bars(series, ctx);
        }
        if series.options.points.show {
            self.draw_series_points(series, ctx);
        }
    }

    fn draw_series_lines(&self, series: &Series, ctx: &mut dyn PlotContext) {
        let Some((axisx, axisy)) = self.axis_pair(series) else {
            return;
        };
        let LinesOptions {
            line_width: lw,
            fill,
            ref fill_color,
            ..
        } = series.options.lines;
        let sw = series.options.shadow_size;

        ctx.save();
        ctx.translate(self.plot_offset.left, self.plot_offset.top);
        ctx.set_line_join(LineJoin::Round);

        if lw > 0.0 && sw > 0.0 {
            // shadows: two translucent passes nudged down-right
            ctx.set_line_width(sw);
            ctx.set_stroke(Paint::css("rgba(0, 0, 0, 0.1)"));
            let angle = PI / 18.0;
            draw_line(
                &series.datapoints,
                angle.sin() * (lw / 2.0 + sw / 2.0),
                angle.cos() * (lw / 2.0 + sw / 2.0),
                axisx,
                axisy,
                ctx,
            );
            ctx.set_line_width(sw / 2.0);
            draw_line(
                &series.datapoints,
                angle.sin() * (lw / 2.0 + sw / 4.0),
                angle.cos() * (lw / 2.0 + sw / 4.0),
                axisx,
                axisy,
                ctx,
            );
        }

        ctx.set_line_width(lw);
        ctx.set_stroke(Paint::css(&series.color));
        if let Some(paint) = fill_style(fill, fill_color.as_ref(), &series.color, 0.0, self.plot_height)
        {
            ctx.set_fill(paint);
            draw_line_area(&series.datapoints, axisx, axisy, ctx);
        }
        if lw > 0.0 {
            draw_line(&series.datapoints, 0.0, 0.0, axisx, axisy, ctx);
        }
        ctx.restore();
    }

    fn draw_series_points(&self, series: &Series, ctx: &mut dyn PlotContext) {
        let Some((axisx, axisy)) = self.axis_pair(series) else {
            return;
        };
        let points = &series.options.points;
        let mut lw = points.line_width;
        let sw = series.options.shadow_size;
        let radius = points.radius;
        let symbol = points.symbol.as_ref();
        if lw == 0.0 {
            lw = 0.0001;
        }

        ctx.save();
        ctx.translate(self.plot_offset.left, self.plot_offset.top);

        if lw > 0.0 && sw > 0.0 {
            let w = sw / 2.0;
            ctx.set_line_width(w);
            ctx.set_stroke(Paint::css("rgba(0, 0, 0, 0.1)"));
            draw_points(
                &series.datapoints,
                radius,
                None,
                w + w / 2.0,
                true,
                axisx,
                axisy,
                symbol,
                ctx,
            );
            ctx.set_stroke(Paint::css("rgba(0, 0, 0, 0.2)"));
            draw_points(
                &series.datapoints,
                radius,
                None,
                w / 2.0,
                true,
                axisx,
                axisy,
                symbol,
                ctx,
            );
        }

        ctx.set_line_width(lw);
        ctx.set_stroke(Paint::css(&series.color));
        let fill = fill_style(points.fill, points.fill_color.as_ref(), &series.color, 0.0, 0.0);
        draw_points(
            &series.datapoints,
            radius,
            fill.as_ref(),
            0.0,
            false,
            axisx,
            axisy,
            symbol,
            ctx,
        );
        ctx.restore();
    }

    fn draw_series_bars(&self, series: &Series, ctx: &mut dyn PlotContext) {
        let Some((axisx, axisy)) = self.axis_pair(series) else {
            return;
        };
        let bars = &series.options.bars;

        ctx.save();
        ctx.translate(self.plot_offset.left, self.plot_offset.top);
        ctx.set_line_width(bars.line_width);
        ctx.set_stroke(Paint::css(&series.color));

        let bar_left = series.bar_left_align();
        let fill_cb = |bottom: f64, top: f64| {
            fill_style(bars.fill, bars.fill_color.as_ref(), &series.color, bottom, top)
                .unwrap_or_default()
        };
        let fill: Option<&dyn Fn(f64, f64) -> Paint> = if bars.fill.is_on() {
            Some(&fill_cb)
        } else {
            None
        };

        let dp = &series.datapoints;
        let ps = dp.point_size;
        if ps == 0 {
            ctx.restore();
            return;
        }
        let mut i = 0;
        while i < dp.points.len() {
            let tuple = (
                dp.points[i],
                dp.points.get(i + 1).copied().flatten(),
                dp.points.get(i + 2).copied().flatten(),
            );
            i += ps;
            let (Some(x), Some(y)) = (tuple.0, tuple.1) else {
                continue;
            };
            draw_bar(
                x,
                y,
                tuple.2.unwrap_or(0.0),
                bar_left,
                bar_left + bars.bar_width,
                fill,
                axisx,
                axisy,
                bars.horizontal,
                bars.line_width,
                ctx,
            );
        }
        ctx.restore();
    }
}
