//! Axis state: range resolution, tick generation, and the data/canvas
//! coordinate transforms.

use crate::core::layout::AxisBox;
use crate::error::{PlotError, PlotResult};
use crate::options::{AxisOptions, AxisPosition, TickGenerator, TickLength, TickSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    X,
    Y,
}

impl AxisDirection {
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            AxisDirection::X => 'x',
            AxisDirection::Y => 'y',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// One axis of the plot.
///
/// Fields below `options` are derived state, recomputed on every data or
/// grid pass.
#[derive(Debug, Clone)]
pub struct Axis {
    /// 1-based axis number within its direction.
    pub number: usize,
    pub direction: AxisDirection,
    pub options: AxisOptions,

    /// Data extent gathered during normalization; `None` when no series
    /// contributed a finite value.
    pub datamin: Option<f64>,
    pub datamax: Option<f64>,
    /// Whether any series maps to this axis.
    pub used: bool,
    pub show: bool,
    pub reserve_space: bool,

    pub min: f64,
    pub max: f64,

    /// Approximate value span between ticks before niceness rounding.
    pub delta: f64,
    pub tick_decimals: u32,
    pub tick_size: f64,
    pub ticks: Vec<Tick>,
    /// Plugin- or alignment-installed generator; `None` uses the built-in
    /// decimal generator.
    pub tick_generator: Option<TickGenerator>,

    pub label_width: f64,
    pub label_height: f64,
    pub layout: AxisBox,
    /// Resolved from options during layout.
    pub tick_length: TickLength,
    pub innermost: bool,

    /// Pixels per (transformed) axis unit, always positive.
    pub scale: f64,
    // transform anchors, set by update_transform
    s: f64,
    m: f64,
}

impl Axis {
    #[must_use]
    pub fn new(number: usize, direction: AxisDirection, options: AxisOptions) -> Self {
        Self {
            number,
            direction,
            options,
            datamin: None,
            datamax: None,
            used: false,
            show: false,
            reserve_space: false,
            min: 0.0,
            max: 0.0,
            delta: 0.0,
            tick_decimals: 0,
            tick_size: 0.0,
            ticks: Vec::new(),
            tick_generator: None,
            label_width: 0.0,
            label_height: 0.0,
            layout: AxisBox::default(),
            tick_length: TickLength::Px(5.0),
            innermost: false,
            scale: 1.0,
            s: 1.0,
            m: 0.0,
        }
    }

    /// Coordinate-map key for this axis (`x`, `x2`, `y3`, ...).
    #[must_use]
    pub fn coord_key(&self) -> String {
        if self.number == 1 {
            self.direction.letter().to_string()
        } else {
            format!("{}{}", self.direction.letter(), self.number)
        }
    }

    /// Resolves `min`/`max` from pinned options and the gathered data
    /// extent.
    ///
    /// A degenerate (zero-width) range is widened by 1% of `|max|`, or by
    /// 1.0 when `max` is zero; a pinned bound is never moved, and `max`
    /// always gives when `min` cannot. Otherwise the autoscale margin grows
    /// both unpinned ends, clamped to zero when the data never crosses it.
    pub fn set_range(&mut self) {
        let opts = &self.options;
        let mut min = opts.min.or(self.datamin).unwrap_or(0.0);
        let mut max = opts.max.or(self.datamax).unwrap_or(0.0);
        let delta = max - min;

        if delta == 0.0 {
            let widen = if max == 0.0 { 1.0 } else { 0.01 * max.abs() };
            if opts.min.is_none() {
                min -= widen;
            }
            if opts.max.is_none() || opts.min.is_some() {
                max += widen;
            }
        } else if let Some(margin) = opts.autoscale_margin {
            if opts.min.is_none() {
                min -= delta * margin;
                if min < 0.0 && self.datamin.is_some_and(|d| d >= 0.0) {
                    min = 0.0;
                }
            }
            if opts.max.is_none() {
                max += delta * margin;
                if max > 0.0 && self.datamax.is_some_and(|d| d <= 0.0) {
                    max = 0.0;
                }
            }
        }

        self.min = min;
        self.max = max;
    }

    /// Picks a nice tick size and decimal count for the current range.
    ///
    /// `surface_dim` is the canvas width (x axes) or height (y axes); the
    /// target tick count is `0.3 * sqrt(surface_dim)` unless the options
    /// request a count. Fails when the axis names a mode that no plugin
    /// backed with a generator.
    pub fn setup_tick_generation(&mut self, surface_dim: f64) -> PlotResult<()> {
        let no_ticks = match self.options.ticks {
            TickSpec::Count(n) if n > 0.0 => n,
            _ => 0.3 * surface_dim.sqrt(),
        };

        let delta = (self.max - self.min) / no_ticks;
        let max_dec = self.options.tick_decimals;
        let mut dec = -(delta.log10().floor());
        if let Some(maxd) = max_dec {
            if dec > f64::from(maxd) {
                dec = f64::from(maxd);
            }
        }

        let magn = 10f64.powf(-dec);
        // norm lands in [1.0, 10.0)
        let norm = delta / magn;
        let mut size;
        if norm < 1.5 {
            size = 1.0;
        } else if norm < 3.0 {
            size = 2.0;
            // 2.5 reads nicer but needs one more decimal
            if norm > 2.25 && max_dec.map_or(true, |maxd| dec + 1.0 <= f64::from(maxd)) {
                size = 2.5;
                dec += 1.0;
            }
        } else if norm < 7.5 {
            size = 5.0;
        } else {
            size = 10.0;
        }
        size *= magn;

        if let Some(min_size) = self.options.min_tick_size {
            if size < min_size {
                size = min_size;
            }
        }

        self.delta = delta;
        self.tick_decimals = match max_dec {
            Some(maxd) => maxd,
            None => dec.max(0.0) as u32,
        };
        self.tick_size = self.options.tick_size.unwrap_or(size);

        if self.tick_generator.is_none() {
            self.tick_generator = self.options.tick_generator.clone();
        }
        if let Some(mode) = &self.options.mode {
            if self.tick_generator.is_none() {
                return Err(PlotError::MissingAxisMode { mode: mode.clone() });
            }
        }

        Ok(())
    }

    /// Runs the installed or built-in tick generator.
    #[must_use]
    pub fn generate_tick_values(&self) -> Vec<f64> {
        if let Some(generator) = &self.tick_generator {
            return (generator.0)(self);
        }
        default_tick_values(self)
    }

    /// Derives tick positions from `other` so grid lines coincide across a
    /// dual-axis plot, snapping unpinned bounds to this axis's own nice
    /// ticks first.
    pub fn align_ticks_with(&mut self, other: &Axis) {
        if !other.used || (other.number == self.number && other.direction == self.direction) {
            return;
        }

        let nice = self.generate_tick_values();
        if !nice.is_empty() {
            if self.options.min.is_none() {
                self.min = self.min.min(nice[0]);
            }
            if self.options.max.is_none() && nice.len() > 1 {
                self.max = self.max.max(nice[nice.len() - 1]);
            }
        }

        let other_ticks: Vec<f64> = other.ticks.iter().map(|t| t.value).collect();
        let (other_min, other_max) = (other.min, other.max);
        self.tick_generator = Some(TickGenerator::new(move |axis: &Axis| {
            other_ticks
                .iter()
                .map(|&v| {
                    let frac = (v - other_min) / (other_max - other_min);
                    axis.min + frac * (axis.max - axis.min)
                })
                .collect()
        }));

        // forced ticks rarely land on round values, so consider an extra
        // decimal unless that only adds a trailing zero
        if self.options.mode.is_none() && self.options.tick_decimals.is_none() {
            let extra_dec = (-(self.delta.log10().floor()) + 1.0).max(0.0) as usize;
            let ts = self.generate_tick_values();
            let redundant = ts.len() > 1 && {
                let step = format!("{:.*}", extra_dec, ts[1] - ts[0]);
                step.contains('.') && step.ends_with('0')
            };
            if !redundant {
                self.tick_decimals = extra_dec as u32;
            }
        }
    }

    /// Builds the final tick list, labelling each value.
    pub fn set_ticks(&mut self) {
        let raw: Vec<(f64, Option<String>)> = match &self.options.ticks {
            TickSpec::Auto | TickSpec::Count(_) => self
                .generate_tick_values()
                .into_iter()
                .map(|v| (v, None))
                .collect(),
            TickSpec::Values(values) => values.iter().map(|&v| (v, None)).collect(),
            TickSpec::Labeled(pairs) => pairs
                .iter()
                .map(|(v, label)| (*v, Some(label.clone())))
                .collect(),
        };

        let mut ticks = Vec::with_capacity(raw.len());
        for (value, label) in raw {
            if value.is_nan() {
                continue;
            }
            let label = match label {
                Some(label) => label,
                None => self.format_tick(value),
            };
            ticks.push(Tick { value, label });
        }
        self.ticks = ticks;
    }

    /// Formats one tick value with the custom or built-in formatter.
    #[must_use]
    pub fn format_tick(&self, value: f64) -> String {
        if let Some(formatter) = &self.options.tick_formatter {
            return (formatter.0)(value, self);
        }
        default_tick_formatter(value, self.tick_decimals)
    }

    /// Extends unpinned bounds to the outermost generated ticks so the plot
    /// edge lands on a labelled line. Only applies when autoscaling added a
    /// margin in the first place.
    pub fn snap_range_to_ticks(&mut self) {
        let autoscaling = matches!(self.options.autoscale_margin, Some(m) if m != 0.0);
        if !autoscaling || self.ticks.is_empty() {
            return;
        }
        if self.options.min.is_none() {
            self.min = self.min.min(self.ticks[0].value);
        }
        if self.options.max.is_none() && self.ticks.len() > 1 {
            self.max = self.max.max(self.ticks[self.ticks.len() - 1].value);
        }
    }

    /// Precomputes the linear transform anchors once the plot area is known.
    pub fn update_transform(&mut self, plot_width: f64, plot_height: f64) {
        let t = |v: f64| match &self.options.transform {
            Some(transform) => transform.apply(v),
            None => v,
        };
        let (tmin, tmax) = (t(self.min), t(self.max));

        match self.direction {
            AxisDirection::X => {
                self.scale = plot_width / (tmax - tmin).abs();
                self.s = self.scale;
                self.m = tmin.min(tmax);
            }
            AxisDirection::Y => {
                self.scale = plot_height / (tmax - tmin).abs();
                self.s = -self.scale;
                self.m = tmin.max(tmax);
            }
        }
    }

    /// Data value to canvas offset (relative to the plot area origin).
    #[must_use]
    pub fn p2c(&self, p: f64) -> f64 {
        let v = match &self.options.transform {
            Some(transform) => transform.apply(p),
            None => p,
        };
        (v - self.m) * self.s
    }

    /// Canvas offset back to a data value.
    #[must_use]
    pub fn c2p(&self, c: f64) -> f64 {
        let v = self.m + c / self.s;
        match &self.options.inverse_transform {
            Some(inverse) => inverse.apply(v),
            None => v,
        }
    }
}

/// Round `n` down to the nearest multiple of `base`.
fn floor_in_base(n: f64, base: f64) -> f64 {
    base * (n / base).floor()
}

/// Built-in decimal tick generator: multiples of `tick_size` from just
/// below `min` through `max`. The `prev` comparison stops the loop if the
/// step is too small to advance the float.
fn default_tick_values(axis: &Axis) -> Vec<f64> {
    let start = floor_in_base(axis.min, axis.tick_size);
    let mut ticks = Vec::new();
    let mut i = 0.0;
    let mut v = f64::NAN;
    loop {
        let prev = v;
        v = start + i * axis.tick_size;
        ticks.push(v);
        i += 1.0;
        if !(v < axis.max && v != prev) {
            break;
        }
    }
    ticks
}

/// Built-in formatter: round to `tick_decimals` and zero-pad to exactly
/// that precision.
fn default_tick_formatter(value: f64, tick_decimals: u32) -> String {
    let factor = if tick_decimals > 0 {
        10f64.powi(tick_decimals as i32)
    } else {
        1.0
    };
    let formatted = format!("{}", (value * factor).round() / factor);

    let precision = match formatted.find('.') {
        Some(dot) => formatted.len() - dot - 1,
        None => 0,
    };
    let wanted = tick_decimals as usize;
    if precision < wanted {
        let pad = "0".repeat(wanted - precision);
        return if precision > 0 {
            formatted + &pad
        } else {
            formatted + "." + &pad
        };
    }

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::AxisOptions;

    fn axis_with_range(min: f64, max: f64) -> Axis {
        let mut axis = Axis::new(1, AxisDirection::X, AxisOptions::default());
        axis.min = min;
        axis.max = max;
        axis
    }

    #[test]
    fn formatter_pads_to_tick_decimals() {
        assert_eq!(default_tick_formatter(2.0, 2), "2.00");
        assert_eq!(default_tick_formatter(2.5, 2), "2.50");
        assert_eq!(default_tick_formatter(2.0, 0), "2");
    }

    #[test]
    fn generator_covers_the_range() {
        let mut axis = axis_with_range(0.0, 10.0);
        axis.tick_size = 2.5;
        let values = default_tick_values(&axis);
        assert!(values[0] <= axis.min);
        assert!(*values.last().unwrap() >= axis.max);
    }

    #[test]
    fn generator_terminates_on_denormal_steps() {
        let mut axis = axis_with_range(1.0, 1.0 + f64::EPSILON);
        axis.tick_size = f64::MIN_POSITIVE;
        // must not hang even though start + i * step stops advancing
        let values = default_tick_values(&axis);
        assert!(!values.is_empty());
    }
}
