//! Clipped draw routines for lines, filled areas, bars, and point markers.
//!
//! Everything here clips in data space first and converts through the axis
//! transforms at the last moment, so off-range segments cost nothing and
//! partially visible ones are interpolated exactly to the plot edge.

use crate::color::Rgba;
use crate::core::axis::Axis;
use crate::core::datapoints::DataPoints;
use crate::options::{FillSetting, FillSpec, GradientStop, SymbolRenderer};
use crate::render::context::{draw_circle, Paint, PlotContext};

/// Resolves a fill spec to a paint; derived gradient stops vary
/// `default_color`.
#[must_use]
pub fn color_or_gradient(spec: &FillSpec, bottom: f64, top: f64, default_color: &str) -> Paint {
    match spec {
        FillSpec::Color(color) => Paint::css(color),
        FillSpec::Gradient { colors } => {
            let denom = colors.len().saturating_sub(1).max(1) as f64;
            let stops = colors
                .iter()
                .enumerate()
                .map(|(i, stop)| {
                    let color = match stop {
                        GradientStop::Color(color) => Rgba::parse(color),
                        GradientStop::Derived {
                            brightness,
                            opacity,
                        } => {
                            let mut color = Rgba::parse(default_color);
                            if let Some(brightness) = brightness {
                                color = color.scale("rgb", *brightness);
                            }
                            if let Some(opacity) = opacity {
                                color = color.scale("a", *opacity);
                            }
                            color
                        }
                    };
                    (i as f64 / denom, color)
                })
                .collect();
            Paint::LinearGradient {
                y0: top,
                y1: bottom,
                stops,
            }
        }
    }
}

/// Fill paint for a series component: the explicit fill color if any,
/// otherwise the series color at the requested (default 0.4) opacity.
#[must_use]
pub fn fill_style(
    fill: FillSetting,
    fill_color: Option<&FillSpec>,
    series_color: &str,
    bottom: f64,
    top: f64,
) -> Option<Paint> {
    if !fill.is_on() {
        return None;
    }
    if let Some(spec) = fill_color {
        return Some(color_or_gradient(spec, bottom, top, series_color));
    }
    let alpha = match fill {
        FillSetting::Opacity(alpha) => alpha,
        _ => 0.4,
    };
    Some(Paint::Solid(Rgba::parse(series_color).with_alpha(alpha)))
}

/// Strokes a polyline through the visible parts of the buffer.
///
/// Each segment is clipped against all four plot edges in turn; a `move_to`
/// is only emitted when the clipped start does not coincide with the
/// previous clipped end, so contiguous runs stay a single path.
pub fn draw_line(
    dp: &DataPoints,
    xoffset: f64,
    yoffset: f64,
    axisx: &Axis,
    axisy: &Axis,
    ctx: &mut dyn PlotContext,
) {
    let ps = dp.point_size;
    if ps == 0 {
        return;
    }
    let mut prev: Option<(f64, f64)> = None;
    ctx.begin_path();

    let mut i = ps;
    while i < dp.points.len() {
        let start = (dp.points[i - ps], dp.points[i - ps + 1]);
        let end = (dp.points[i], dp.points[i + 1]);
        i += ps;

        let ((Some(mut x1), Some(mut y1)), (Some(mut x2), Some(mut y2))) = (start, end) else {
            continue;
        };

        // clip with ymin
        if y1 <= y2 && y1 < axisy.min {
            if y2 < axisy.min {
                continue;
            }
            x1 = (axisy.min - y1) / (y2 - y1) * (x2 - x1) + x1;
            y1 = axisy.min;
        } else if y2 <= y1 && y2 < axisy.min {
            if y1 < axisy.min {
                continue;
            }
            x2 = (axisy.min - y1) / (y2 - y1) * (x2 - x1) + x1;
            y2 = axisy.min;
        }

        // clip with ymax
        if y1 >= y2 && y1 > axisy.max {
            if y2 > axisy.max {
                continue;
            }
            x1 = (axisy.max - y1) / (y2 - y1) * (x2 - x1) + x1;
            y1 = axisy.max;
        } else if y2 >= y1 && y2 > axisy.max {
            if y1 > axisy.max {
                continue;
            }
            x2 = (axisy.max - y1) / (y2 - y1) * (x2 - x1) + x1;
            y2 = axisy.max;
        }

        // clip with xmin
        if x1 <= x2 && x1 < axisx.min {
            if x2 < axisx.min {
                continue;
            }
            y1 = (axisx.min - x1) / (x2 - x1) * (y2 - y1) + y1;
            x1 = axisx.min;
        } else if x2 <= x1 && x2 < axisx.min {
            if x1 < axisx.min {
                continue;
            }
            y2 = (axisx.min - x1) / (x2 - x1) * (y2 - y1) + y1;
            x2 = axisx.min;
        }

        // clip with xmax
        if x1 >= x2 && x1 > axisx.max {
            if x2 > axisx.max {
                continue;
            }
            y1 = (axisx.max - x1) / (x2 - x1) * (y2 - y1) + y1;
            x1 = axisx.max;
        } else if x2 >= x1 && x2 > axisx.max {
            if x1 > axisx.max {
                continue;
            }
            y2 = (axisx.max - x1) / (x2 - x1) * (y2 - y1) + y1;
            x2 = axisx.max;
        }

        if prev != Some((x1, y1)) {
            ctx.move_to(axisx.p2c(x1) + xoffset, axisy.p2c(y1) + yoffset);
        }
        prev = Some((x2, y2));
        ctx.line_to(axisx.p2c(x2) + xoffset, axisy.p2c(y2) + yoffset);
    }
    ctx.stroke();
}

/// Fills the area between a line and the axis baseline.
///
/// Each gap-delimited run is traced in two sweeps: forward along the y
/// values to sketch the top, then backward along the base values (third
/// tuple slot) for the bottom, flipping the stride sign at the turning
/// point. Vertical clipping decomposes a crossing segment into a flat
/// clamped rectangle plus the interpolated triangle.
pub fn draw_line_area(dp: &DataPoints, axisx: &Axis, axisy: &Axis, ctx: &mut dyn PlotContext) {
    if dp.point_size == 0 {
        return;
    }
    let len = dp.points.len() as i64;
    let mut ps = dp.point_size as i64;
    let bottom = 0f64.max(axisy.min).min(axisy.max);

    let mut i: i64 = 0;
    let mut ypos: i64 = 1;
    let mut area_open = false;
    let mut segment_start: i64 = 0;
    let mut segment_end: i64 = 0;

    loop {
        if ps > 0 && i > len + ps {
            break;
        }

        // ps is negative on the backward sweep
        i += ps;
        let x1_raw = dp.at(i - ps);
        let y1_raw = dp.at(i - ps + ypos);
        let x2_raw = dp.at(i);
        let y2_raw = dp.at(i + ypos);

        if area_open {
            if ps > 0 && x1_raw.is_some() && x2_raw.is_none() {
                // turning point: reverse over the base values
                segment_end = i;
                ps = -ps;
                ypos = 2;
                continue;
            }
            if ps < 0 && i == segment_start + ps {
                // closed the loop for this run
                ctx.fill();
                area_open = false;
                ps = -ps;
                ypos = 1;
                segment_start = segment_end + ps;
                i = segment_start;
                continue;
            }
        }

        let (Some(mut x1), Some(mut x2)) = (x1_raw, x2_raw) else {
            continue;
        };
        let mut y1 = y1_raw.unwrap_or(0.0);
        let mut y2 = y2_raw.unwrap_or(0.0);

        // clip with xmin
        if x1 <= x2 && x1 < axisx.min {
            if x2 < axisx.min {
                continue;
            }
            y1 = (axisx.min - x1) / (x2 - x1) * (y2 - y1) + y1;
            x1 = axisx.min;
        } else if x2 <= x1 && x2 < axisx.min {
            if x1 < axisx.min {
                continue;
            }
            y2 = (axisx.min - x1) / (x2 - x1) * (y2 - y1) + y1;
            x2 = axisx.min;
        }

        // clip with xmax
        if x1 >= x2 && x1 > axisx.max {
            if x2 > axisx.max {
                continue;
            }
            y1 = (axisx.max - x1) / (x2 - x1) * (y2 - y1) + y1;
            x1 = axisx.max;
        } else if x2 >= x1 && x2 > axisx.max {
            if x1 > axisx.max {
                continue;
            }
            y2 = (axisx.max - x1) / (x2 - x1) * (y2 - y1) + y1;
            x2 = axisx.max;
        }

        if !area_open {
            ctx.begin_path();
            ctx.move_to(axisx.p2c(x1), axisy.p2c(bottom));
            area_open = true;
        }

        // fully clamped above or below: a flat run along the edge
        if y1 >= axisy.max && y2 >= axisy.max {
            ctx.line_to(axisx.p2c(x1), axisy.p2c(axisy.max));
            ctx.line_to(axisx.p2c(x2), axisy.p2c(axisy.max));
            continue;
        } else if y1 <= axisy.min && y2 <= axisy.min {
            ctx.line_to(axisx.p2c(x1), axisy.p2c(axisy.min));
            ctx.line_to(axisx.p2c(x2), axisy.p2c(axisy.min));
            continue;
        }

        // the segment crosses an edge; remember the unclipped x span so
        // the clamped part becomes a rectangle
        let x1_old = x1;
        let x2_old = x2;

        // clip with ymin
        if y1 <= y2 && y1 < axisy.min && y2 >= axisy.min {
            x1 = (axisy.min - y1) / (y2 - y1) * (x2 - x1) + x1;
            y1 = axisy.min;
        } else if y2 <= y1 && y2 < axisy.min && y1 >= axisy.min {
            x2 = (axisy.min - y1) / (y2 - y1) * (x2 - x1) + x1;
            y2 = axisy.min;
        }

        // clip with ymax
        if y1 >= y2 && y1 > axisy.max && y2 <= axisy.max {
            x1 = (axisy.max - y1) / (y2 - y1) * (x2 - x1) + x1;
            y1 = axisy.max;
        } else if y2 >= y1 && y2 > axisy.max && y1 <= axisy.max {
            x2 = (axisy.max - y1) / (y2 - y1) * (x2 - x1) + x1;
            y2 = axisy.max;
        }

        if x1 != x1_old {
            ctx.line_to(axisx.p2c(x1_old), axisy.p2c(y1));
        }

        ctx.line_to(axisx.p2c(x1), axisy.p2c(y1));
        ctx.line_to(axisx.p2c(x2), axisy.p2c(y2));

        if x2 != x2_old {
            ctx.line_to(axisx.p2c(x2), axisy.p2c(y2));
            ctx.line_to(axisx.p2c(x2_old), axisy.p2c(y2));
        }
    }
}

/// Draws a marker at every in-range point.
///
/// Shadow passes draw only the lower half of the default circle, offset
/// downward by `offset`.
#[allow(clippy::too_many_arguments)]
pub fn draw_points(
    dp: &DataPoints,
    radius: f64,
    fill: Option<&Paint>,
    offset: f64,
    shadow: bool,
    axisx: &Axis,
    axisy: &Axis,
    symbol: Option<&SymbolRenderer>,
    ctx: &mut dyn PlotContext,
) {
    let ps = dp.point_size;
    if ps == 0 {
        return;
    }

    let mut i = 0;
    while i < dp.points.len() {
        let (x_raw, y_raw) = (dp.points[i], dp.points[i + 1]);
        i += ps;
        let (Some(x), Some(y)) = (x_raw, y_raw) else {
            continue;
        };
        if x < axisx.min || x > axisx.max || y < axisy.min || y > axisy.max {
            continue;
        }

        ctx.begin_path();
        let cx = axisx.p2c(x);
        let cy = axisy.p2c(y) + offset;
        match symbol {
            Some(symbol) => (symbol.0)(ctx, cx, cy, radius, shadow),
            None => draw_circle(ctx, cx, cy, radius, shadow),
        }
        ctx.close_path();

        if let Some(paint) = fill {
            ctx.set_fill(paint.clone());
            ctx.fill();
        }
        ctx.stroke();
    }
}

/// Draws one bar spanning `bar_left..bar_right` around the data point.
///
/// Negative bars swap their edges so the body still fills toward the base;
/// an edge clipped away by the plot range is also not outlined, and the
/// edge facing the base is never outlined.
#[allow(clippy::too_many_arguments)]
pub fn draw_bar(
    x: f64,
    y: f64,
    b: f64,
    bar_left: f64,
    bar_right: f64,
    fill: Option<&dyn Fn(f64, f64) -> Paint>,
    axisx: &Axis,
    axisy: &Axis,
    horizontal: bool,
    line_width: f64,
    ctx: &mut dyn PlotContext,
) {
    let (mut left, mut right, mut bottom, mut top);
    let (mut draw_left, mut draw_right, mut draw_top, mut draw_bottom);

    if horizontal {
        draw_bottom = true;
        draw_right = true;
        draw_top = true;
        draw_left = false;
        left = b;
        right = x;
        top = y + bar_left;
        bottom = y + bar_right;

        if right < left {
            std::mem::swap(&mut right, &mut left);
            draw_left = true;
            draw_right = false;
        }
    } else {
        draw_left = true;
        draw_right = true;
        draw_top = true;
        draw_bottom = false;
        left = x + bar_left;
        right = x + bar_right;
        bottom = b;
        top = y;

        if top < bottom {
            std::mem::swap(&mut top, &mut bottom);
            draw_bottom = true;
            draw_top = false;
        }
    }

    if right < axisx.min || left > axisx.max || top < axisy.min || bottom > axisy.max {
        return;
    }

    if left < axisx.min {
        left = axisx.min;
        draw_left = false;
    }
    if right > axisx.max {
        right = axisx.max;
        draw_right = false;
    }
    if bottom < axisy.min {
        bottom = axisy.min;
        draw_bottom = false;
    }
    if top > axisy.max {
        top = axisy.max;
        draw_top = false;
    }

    let left = axisx.p2c(left);
    let bottom = axisy.p2c(bottom);
    let right = axisx.p2c(right);
    let top = axisy.p2c(top);

    if let Some(fill) = fill {
        ctx.set_fill(fill(bottom, top));
        ctx.fill_rect(left, top, right - left, bottom - top);
    }

    if line_width > 0.0 && (draw_left || draw_right || draw_top || draw_bottom) {
        ctx.begin_path();
        ctx.move_to(left, bottom);
        if draw_left {
            ctx.line_to(left, top);
        } else {
            ctx.move_to(left, top);
        }
        if draw_top {
            ctx.line_to(right, top);
        } else {
            ctx.move_to(right, top);
        }
        if draw_right {
            ctx.line_to(right, bottom);
        } else {
            ctx.move_to(right, bottom);
        }
        if draw_bottom {
            ctx.line_to(left, bottom);
        } else {
            ctx.move_to(left, bottom);
        }
        ctx.stroke();
    }
}
