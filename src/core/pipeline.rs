//! Series normalization: raw tuples in, flat point buffers and axis data
//! extents out.
//!
//! Pass one copies and cleans each tuple. Malformed tuples are kept as
//! explicit gaps rather than dropped so line segments break where the data
//! did. Pass two sweeps the cleaned buffers for the min/max that drive
//! autoscaling.

use tracing::debug;

use crate::core::axis::Axis;
use crate::core::datapoints::{FieldSpec, PointFormat};
use crate::core::series::Series;
use crate::options::BarAlign;

/// Builds the per-series tuple layout.
///
/// Always x and y; bars and filled lines add a third "base" slot that
/// defaults to zero. Horizontal bars put the base on the x axis instead.
#[must_use]
pub fn synthesize_format(series: &Series) -> PointFormat {
    let opts = &series.options;
    let mut format = PointFormat::new();
    format.push(FieldSpec::required_x());
    format.push(FieldSpec::required_y());

    let lines_on = opts.lines.show.unwrap_or(false);
    if opts.bars.show || (lines_on && opts.lines.fill.is_on()) {
        let autoscale = (opts.bars.show && opts.bars.zero)
            || (lines_on && opts.lines.zero.unwrap_or(false));
        let mut base = FieldSpec {
            x: false,
            y: true,
            number: true,
            required: false,
            default_value: Some(0.0),
            autoscale,
        };
        if opts.bars.horizontal {
            base.y = false;
            base.x = true;
        }
        format.push(base);
    }

    format
}

/// Pass one: normalize one series's raw data into its flat point buffer.
///
/// Values coerce as follows: `NaN` becomes a gap, `+inf`/`-inf` clamp to
/// `±f64::MAX` so they still draw off-scale, and a missing required field
/// nullifies the whole tuple. Nullified tuples still feed their surviving
/// finite values into the axis extent before being blanked. With stepped
/// lines on, a mid tuple carrying the previous y is spliced between
/// neighbors that differ in both coordinates.
pub fn normalize_series(series: &mut Series, xaxis: &mut Axis, yaxis: &mut Axis) {
    if series.datapoints.format.is_empty() {
        series.datapoints.format = synthesize_format(series);
    }
    // a raw-data hook may have filled the buffer in already
    if series.datapoints.point_size != 0 {
        return;
    }
    let format = series.datapoints.format.clone();
    let ps = format.len();
    series.datapoints.point_size = ps;

    let insert_steps = series.options.lines.show.unwrap_or(false) && series.options.lines.steps;
    xaxis.used = true;
    yaxis.used = true;

    let mut points: Vec<Option<f64>> = Vec::with_capacity(series.data.len() * ps);

    for raw in &series.data {
        let mut nullify = raw.is_none();
        let base = points.len();

        if let Some(tuple) = raw {
            for (m, spec) in format.iter().enumerate() {
                let mut val = tuple.get(m).copied().flatten();
                if spec.number {
                    val = val.and_then(|v| {
                        if v.is_nan() {
                            None
                        } else if v == f64::INFINITY {
                            Some(f64::MAX)
                        } else if v == f64::NEG_INFINITY {
                            Some(-f64::MAX)
                        } else {
                            Some(v)
                        }
                    });
                }
                if val.is_none() {
                    if spec.required {
                        nullify = true;
                    }
                    if spec.default_value.is_some() {
                        val = spec.default_value;
                    }
                }
                points.push(val);
            }
        } else {
            points.resize(base + ps, None);
        }

        if nullify {
            for (m, spec) in format.iter().enumerate() {
                if let Some(val) = points[base + m] {
                    if spec.autoscale {
                        if spec.x {
                            update_axis_extent(xaxis, val, val);
                        }
                        if spec.y {
                            update_axis_extent(yaxis, val, val);
                        }
                    }
                }
                points[base + m] = None;
            }
        } else if insert_steps
            && base > 0
            && points[base - ps].is_some()
            && points[base - ps] != points[base]
            && points[base - ps + 1] != points[base + 1]
        {
            // splice in a mid tuple with the new x and the previous y
            let current: Vec<Option<f64>> = points[base..base + ps].to_vec();
            points.extend_from_slice(&current);
            points[base + 1] = points[base - ps + 1];
        }
    }

    debug!(
        tuples = points.len() / ps,
        point_size = ps,
        "normalized series data"
    );
    series.datapoints.points = points;
}

/// Pass two: sweep one cleaned buffer for its data extent.
///
/// `±f64::MAX` sentinels are skipped so an infinite input cannot blow up
/// autoscaling. Bars widen the extent sideways so every bar body fits.
#[must_use]
pub fn sweep_extents(series: &Series) -> ((f64, f64), (f64, f64)) {
    let dp = &series.datapoints;
    let ps = dp.point_size;
    let mut xmin = f64::INFINITY;
    let mut xmax = f64::NEG_INFINITY;
    let mut ymin = f64::INFINITY;
    let mut ymax = f64::NEG_INFINITY;

    for tuple in dp.points.chunks(ps) {
        if tuple[0].is_none() {
            continue;
        }
        for (m, spec) in dp.format.iter().enumerate() {
            let Some(val) = tuple[m] else { continue };
            if !spec.autoscale || val == f64::MAX || val == -f64::MAX {
                continue;
            }
            if spec.x {
                xmin = xmin.min(val);
                xmax = xmax.max(val);
            }
            if spec.y {
                ymin = ymin.min(val);
                ymax = ymax.max(val);
            }
        }
    }

    if series.options.bars.show {
        let bars = &series.options.bars;
        let delta = match bars.align {
            BarAlign::Left => 0.0,
            BarAlign::Right => -bars.bar_width,
            BarAlign::Center => -bars.bar_width / 2.0,
        };
        if bars.horizontal {
            ymin += delta;
            ymax += delta + bars.bar_width;
        } else {
            xmin += delta;
            xmax += delta + bars.bar_width;
        }
    }

    ((xmin, xmax), (ymin, ymax))
}

/// Folds one min/max pair into an axis's data extent, ignoring the
/// off-scale sentinels.
pub fn update_axis_extent(axis: &mut Axis, min: f64, max: f64) {
    if min != -f64::MAX && min < axis.datamin.unwrap_or(f64::INFINITY) {
        axis.datamin = Some(min);
    }
    if max != f64::MAX && max > axis.datamax.unwrap_or(f64::NEG_INFINITY) {
        axis.datamax = Some(max);
    }
}
