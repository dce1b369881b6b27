//! Plot construction and the data pipeline.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::color::Rgba;
use crate::core::axis::{Axis, AxisDirection};
use crate::core::datapoints::DataPoints;
use crate::core::pipeline;
use crate::core::series::Series;
use crate::error::PlotResult;
use crate::extensions::hooks::{HookRegistry, Plugin};
use crate::interaction::{Highlight, OverlayScheduler};
use crate::options::{AxisOptions, AxisPosition, Margins, PlotOptions, SeriesColor, SeriesOptions};
use crate::render::surface::Surface;

/// One series as handed in by the host: raw data plus optional options.
/// Missing options fall back to the plot-level series defaults.
#[derive(Debug, Clone, Default)]
pub struct SeriesDescriptor {
    pub data: crate::core::datapoints::RawData,
    pub options: Option<SeriesOptions>,
}

impl SeriesDescriptor {
    /// Bare `[x, y]` pairs with default options.
    #[must_use]
    pub fn from_xy(pairs: &[(f64, f64)]) -> Self {
        Self {
            data: pairs
                .iter()
                .map(|&(x, y)| Some(vec![Some(x), Some(y)]))
                .collect(),
            options: None,
        }
    }
}

/// Mutable plot state shared with hooks.
///
/// Everything except the surfaces and the hook registry lives here, so a
/// hook can reach options, series, axes, and layout through one borrow.
#[derive(Debug)]
pub struct PlotCore {
    pub options: PlotOptions,
    pub series: Vec<Series>,
    /// Axis slot `n - 1` holds axis number `n`; gaps stay `None`.
    pub x_axes: Vec<Option<Axis>>,
    pub y_axes: Vec<Option<Axis>>,
    pub plot_offset: Margins,
    pub plot_width: f64,
    pub plot_height: f64,
    pub surface_width: f64,
    pub surface_height: f64,
    pub highlights: Vec<Highlight>,
    pub scheduler: OverlayScheduler,
}

impl PlotCore {
    #[must_use]
    pub(crate) fn new(options: PlotOptions) -> Self {
        let scheduler = OverlayScheduler::new(options.interaction.redraw_overlay_interval);
        Self {
            options,
            series: Vec::new(),
            x_axes: Vec::new(),
            y_axes: Vec::new(),
            plot_offset: Margins::default(),
            plot_width: 0.0,
            plot_height: 0.0,
            surface_width: 0.0,
            surface_height: 0.0,
            highlights: Vec::new(),
            scheduler,
        }
    }

    #[must_use]
    pub fn axis(&self, direction: AxisDirection, number: usize) -> Option<&Axis> {
        let slots = match direction {
            AxisDirection::X => &self.x_axes,
            AxisDirection::Y => &self.y_axes,
        };
        slots.get(number.checked_sub(1)?)?.as_ref()
    }

    /// All allocated axes, x axes first, in slot order.
    pub fn axes(&self) -> impl Iterator<Item = &Axis> {
        self.x_axes.iter().chain(self.y_axes.iter()).flatten()
    }

    pub(crate) fn axes_mut(&mut self) -> impl Iterator<Item = &mut Axis> {
        self.x_axes
            .iter_mut()
            .chain(self.y_axes.iter_mut())
            .flatten()
    }

    /// Axes keyed `xaxis`, `x2axis`, `yaxis`, ... as hosts name them in
    /// markings.
    #[must_use]
    pub fn get_axes(&self) -> IndexMap<String, &Axis> {
        self.axes()
            .map(|axis| (format!("{}axis", axis.coord_key()), axis))
            .collect()
    }

    /// The x and y axis a series maps to.
    #[must_use]
    pub fn axis_pair(&self, series: &Series) -> Option<(&Axis, &Axis)> {
        Some((
            self.axis(AxisDirection::X, series.options.xaxis)?,
            self.axis(AxisDirection::Y, series.options.yaxis)?,
        ))
    }

    pub(crate) fn get_or_create_axis(
        &mut self,
        direction: AxisDirection,
        number: usize,
    ) -> &mut Axis {
        let number = number.max(1);
        let base = match direction {
            AxisDirection::X => self.options.xaxis.clone(),
            AxisDirection::Y => self.options.yaxis.clone(),
        };
        let per_axis = match direction {
            AxisDirection::X => self.options.xaxes.get(number - 1).cloned(),
            AxisDirection::Y => self.options.yaxes.get(number - 1).cloned(),
        };
        let slots = match direction {
            AxisDirection::X => &mut self.x_axes,
            AxisDirection::Y => &mut self.y_axes,
        };
        if slots.len() < number {
            slots.resize_with(number, || None);
        }
        slots[number - 1].get_or_insert_with(|| {
            let mut options = per_axis.unwrap_or_else(|| base.clone());
            inherit_axis_options(&mut options, &base);
            // coerce a position that belongs to the other direction
            let valid = match direction {
                AxisDirection::X => matches!(
                    options.position,
                    AxisPosition::Bottom | AxisPosition::Top
                ),
                AxisDirection::Y => matches!(
                    options.position,
                    AxisPosition::Left | AxisPosition::Right
                ),
            };
            if !valid {
                options.position = base.position;
            }
            Axis::new(number, direction, options)
        })
    }

    /// Resolves a plot-area pixel position against every used axis.
    #[must_use]
    pub fn canvas_to_axis_coords(
        &self,
        canvas_x: f64,
        canvas_y: f64,
    ) -> crate::interaction::PlotPosition {
        let mut coords = IndexMap::new();
        for axis in self.x_axes.iter().flatten() {
            if axis.used {
                coords.insert(format!("x{}", axis.number), axis.c2p(canvas_x));
            }
        }
        for axis in self.y_axes.iter().flatten() {
            if axis.used {
                coords.insert(format!("y{}", axis.number), axis.c2p(canvas_y));
            }
        }
        if let Some(&x1) = coords.get("x1") {
            coords.insert("x".to_owned(), x1);
        }
        if let Some(&y1) = coords.get("y1") {
            coords.insert("y".to_owned(), y1);
        }
        crate::interaction::PlotPosition {
            coords,
            canvas_x,
            canvas_y,
        }
    }

    /// Maps named axis coordinates (`x`, `x2`, `y`, ...) back to plot-area
    /// pixels; the first matching key per direction wins.
    #[must_use]
    pub fn axis_to_canvas_coords(
        &self,
        coords: &IndexMap<String, f64>,
    ) -> (Option<f64>, Option<f64>) {
        let mut left = None;
        for axis in self.x_axes.iter().flatten() {
            if !axis.used {
                continue;
            }
            let mut key = format!("x{}", axis.number);
            if !coords.contains_key(&key) && axis.number == 1 {
                key = "x".to_owned();
            }
            if let Some(&value) = coords.get(&key) {
                left = Some(axis.p2c(value));
                break;
            }
        }
        let mut top = None;
        for axis in self.y_axes.iter().flatten() {
            if !axis.used {
                continue;
            }
            let mut key = format!("y{}", axis.number);
            if !coords.contains_key(&key) && axis.number == 1 {
                key = "y".to_owned();
            }
            if let Some(&value) = coords.get(&key) {
                top = Some(axis.p2c(value));
                break;
            }
        }
        (left, top)
    }

    /// Surface pixel position of a data point, truncated to whole pixels.
    #[must_use]
    pub fn point_offset(
        &self,
        x: f64,
        y: f64,
        xaxis: usize,
        yaxis: usize,
    ) -> Option<(f64, f64)> {
        let ax = self.axis(AxisDirection::X, xaxis)?;
        let ay = self.axis(AxisDirection::Y, yaxis)?;
        Some((
            (self.plot_offset.left + ax.p2c(x)).trunc(),
            (self.plot_offset.top + ay.p2c(y)).trunc(),
        ))
    }

    /// Option fixups run once before any data processing: derived colors
    /// and per-axis option inheritance.
    pub(crate) fn apply_option_fixups(&mut self) {
        let grid_faded = Rgba::parse(&self.options.grid.color)
            .scale("a", 0.22)
            .to_css();

        if self.options.xaxis.color.is_none() {
            self.options.xaxis.color = Some(grid_faded.clone());
        }
        if self.options.yaxis.color.is_none() {
            self.options.yaxis.color = Some(grid_faded.clone());
        }
        if self.options.xaxis.tick_color.is_none() {
            self.options.xaxis.tick_color = self
                .options
                .grid
                .tick_color
                .clone()
                .or_else(|| self.options.xaxis.color.clone());
        }
        if self.options.yaxis.tick_color.is_none() {
            self.options.yaxis.tick_color = self
                .options
                .grid
                .tick_color
                .clone()
                .or_else(|| self.options.yaxis.color.clone());
        }
        if self.options.grid.border_color.is_none() {
            self.options.grid.border_color = Some(self.options.grid.color.clone());
        }
        if self.options.grid.tick_color.is_none() {
            self.options.grid.tick_color = Some(grid_faded);
        }

        if self.options.xaxes.is_empty() {
            self.options.xaxes.push(self.options.xaxis.clone());
        }
        if self.options.yaxes.is_empty() {
            self.options.yaxes.push(self.options.yaxis.clone());
        }

        let xbase = self.options.xaxis.clone();
        for entry in &mut self.options.xaxes {
            fixup_axis_entry(entry, &xbase);
        }
        let ybase = self.options.yaxis.clone();
        for entry in &mut self.options.yaxes {
            fixup_axis_entry(entry, &ybase);
        }
    }

    /// Resolves series colors and implicit display options, and allocates
    /// the axes each series references.
    pub(crate) fn fill_in_series_options(&mut self) {
        let mut needed: i64 = self.series.len() as i64;
        let mut max_index: i64 = -1;
        for series in &self.series {
            match &series.options.color {
                Some(SeriesColor::Index(i)) => {
                    needed -= 1;
                    max_index = max_index.max(*i as i64);
                }
                Some(SeriesColor::Css(_)) => needed -= 1,
                None => {}
            }
        }
        if needed <= max_index {
            needed = max_index + 1;
        }

        // cycle the palette, scaling brightness a bit more on each full
        // cycle, alternating lighter and darker
        let pool = &self.options.colors;
        let pool_size = pool.len();
        let mut variation = 0.0_f64;
        let mut colors = Vec::with_capacity(needed.max(0) as usize);
        for i in 0..needed.max(0) as usize {
            let base = if pool_size > 0 {
                pool[i % pool_size].as_str()
            } else {
                "#666666"
            };
            if pool_size > 0 && i % pool_size == 0 && i > 0 {
                if variation >= 0.0 {
                    if variation < 0.5 {
                        variation = -variation - 0.2;
                    } else {
                        variation = 0.0;
                    }
                } else {
                    variation = -variation;
                }
            }
            colors.push(Rgba::parse(base).scale("rgb", 1.0 + variation));
        }

        let mut next_color = 0;
        for i in 0..self.series.len() {
            let color = match &self.series[i].options.color {
                None => {
                    let color = colors[next_color].to_css();
                    next_color += 1;
                    color
                }
                Some(SeriesColor::Index(idx)) => colors
                    .get(*idx)
                    .map(Rgba::to_css)
                    .unwrap_or_else(|| "#666666".to_owned()),
                Some(SeriesColor::Css(css)) => css.clone(),
            };
            self.series[i].color = color;

            let opts = &mut self.series[i].options;
            // turn lines on when nothing else is shown
            if opts.lines.show.is_none() && !opts.points.show && !opts.bars.show {
                opts.lines.show = Some(true);
            }
            // filled areas extend to zero unless told otherwise
            if opts.lines.zero.is_none() {
                opts.lines.zero = Some(opts.lines.fill.is_on());
            }

            let (xn, yn) = (opts.xaxis.max(1), opts.yaxis.max(1));
            self.series[i].options.xaxis = xn;
            self.series[i].options.yaxis = yn;
            self.get_or_create_axis(AxisDirection::X, xn);
            self.get_or_create_axis(AxisDirection::Y, yn);
        }
        debug!(series = self.series.len(), "series options resolved");
    }

    pub(crate) fn reset_data_extents(&mut self) {
        for axis in self.axes_mut() {
            axis.datamin = None;
            axis.datamax = None;
            axis.used = false;
        }
    }

    /// Pass one for one series. Skipped when a raw-data hook already
    /// filled in the buffer.
    pub(crate) fn normalize_series_at(&mut self, index: usize) {
        let Some(series) = self.series.get_mut(index) else {
            return;
        };
        let Some(xslot) = series.options.xaxis.checked_sub(1) else {
            return;
        };
        let Some(yslot) = series.options.yaxis.checked_sub(1) else {
            return;
        };
        let Some(xaxis) = self.x_axes.get_mut(xslot).and_then(Option::as_mut) else {
            return;
        };
        let Some(yaxis) = self.y_axes.get_mut(yslot).and_then(Option::as_mut) else {
            return;
        };
        pipeline::normalize_series(series, xaxis, yaxis);
    }

    /// Pass two for one series: fold its extent into the axes.
    pub(crate) fn sweep_series_extents(&mut self, index: usize) {
        let Some(series) = self.series.get(index) else {
            return;
        };
        let ((xmin, xmax), (ymin, ymax)) = pipeline::sweep_extents(series);
        let (xn, yn) = (series.options.xaxis, series.options.yaxis);
        if let Some(axis) = self
            .x_axes
            .get_mut(xn - 1)
            .and_then(Option::as_mut)
        {
            pipeline::update_axis_extent(axis, xmin, xmax);
        }
        if let Some(axis) = self
            .y_axes
            .get_mut(yn - 1)
            .and_then(Option::as_mut)
        {
            pipeline::update_axis_extent(axis, ymin, ymax);
        }
    }
}

/// Fills `None` option fields from the direction's base axis options.
fn inherit_axis_options(child: &mut AxisOptions, base: &AxisOptions) {
    macro_rules! inherit {
        ($($field:ident),+ $(,)?) => {
            $(if child.$field.is_none() {
                child.$field = base.$field.clone();
            })+
        };
    }
    inherit!(
        show,
        mode,
        color,
        tick_color,
        font,
        min,
        max,
        autoscale_margin,
        tick_decimals,
        tick_size,
        min_tick_size,
        label_width,
        label_height,
        reserve_space,
        tick_length,
        align_ticks_with_axis,
        transform,
        inverse_transform,
        tick_generator,
        tick_formatter,
    );
    if matches!(child.ticks, crate::options::TickSpec::Auto)
        && !matches!(base.ticks, crate::options::TickSpec::Auto)
    {
        child.ticks = base.ticks.clone();
    }
}

fn fixup_axis_entry(entry: &mut AxisOptions, base: &AxisOptions) {
    if entry.tick_color.is_none() {
        entry.tick_color = entry.color.clone();
    }
    inherit_axis_options(entry, base);
    if let Some(font) = &mut entry.font {
        if font.color.is_none() {
            font.color = entry.color.clone();
        }
        if font.line_height <= 0.0 {
            font.line_height = (font.size * 1.15).round();
        }
    }
}

/// A live plot bound to a base surface and an interaction overlay.
pub struct Plot<S: Surface> {
    pub(crate) surface: S,
    pub(crate) overlay: S,
    pub(crate) core: PlotCore,
    pub(crate) hooks: HookRegistry,
    pub(crate) destroyed: bool,
}

impl<S: Surface> Plot<S> {
    /// Builds a plot and runs the full pipeline once: plugin init, option
    /// fixups, data processing, layout, and the first draw.
    pub fn new(
        surface: S,
        overlay: S,
        data: Vec<SeriesDescriptor>,
        options: PlotOptions,
        plugins: &[&dyn Plugin],
    ) -> PlotResult<Self> {
        let mut options = options;
        let mut hooks = HookRegistry::default();
        for plugin in plugins {
            plugin.apply_default_options(&mut options);
        }
        for plugin in plugins {
            debug!(plugin = plugin.name(), "initializing plugin");
            plugin.init(&mut hooks, &mut options)?;
        }
        hooks.freeze();

        let mut core = PlotCore::new(options);
        core.apply_option_fixups();

        let mut plot = Self {
            surface,
            overlay,
            core,
            hooks,
            destroyed: false,
        };
        HookRegistry::run_core(&mut plot.hooks.process_options, &mut plot.core);
        plot.set_data(data);
        plot.setup_grid()?;
        plot.draw();
        HookRegistry::run_core(&mut plot.hooks.bind_events, &mut plot.core);
        info!(
            series = plot.core.series.len(),
            width = plot.core.plot_width,
            height = plot.core.plot_height,
            "plot initialized"
        );
        Ok(plot)
    }

    /// Replaces the plotted data and re-runs normalization. The caller
    /// follows up with `setup_grid` and `draw` when ready.
    pub fn set_data(&mut self, data: Vec<SeriesDescriptor>) {
        let defaults = self.core.options.series.clone();
        let series: Vec<Series> = data
            .into_iter()
            .map(|descriptor| {
                Series::new(
                    descriptor.options.unwrap_or_else(|| defaults.clone()),
                    descriptor.data,
                )
            })
            .collect();
        self.core.series = series;
        self.core.fill_in_series_options();
        self.process_data();
    }

    fn process_data(&mut self) {
        self.core.reset_data_extents();
        for i in 0..self.core.series.len() {
            self.core.series[i].datapoints = DataPoints::default();
            HookRegistry::run_series(&mut self.hooks.process_raw_data, &mut self.core, i);
        }
        for i in 0..self.core.series.len() {
            self.core.normalize_series_at(i);
        }
        for i in 0..self.core.series.len() {
            HookRegistry::run_series(&mut self.hooks.process_datapoints, &mut self.core, i);
        }
        for i in 0..self.core.series.len() {
            self.core.sweep_series_extents(i);
        }
    }

    /// Resizes both surfaces; follow with `setup_grid` and `draw`.
    pub fn resize(&mut self, width: f64, height: f64) -> PlotResult<()> {
        self.surface.resize(width, height)?;
        self.overlay.resize(width, height)?;
        Ok(())
    }

    #[must_use]
    pub fn core(&self) -> &PlotCore {
        &self.core
    }

    #[must_use]
    pub fn core_mut(&mut self) -> &mut PlotCore {
        &mut self.core
    }

    #[must_use]
    pub fn options(&self) -> &PlotOptions {
        &self.core.options
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn overlay(&self) -> &S {
        &self.overlay
    }

    /// Plot-area width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.core.plot_width
    }

    /// Plot-area height in pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.core.plot_height
    }

    #[must_use]
    pub fn offset(&self) -> Margins {
        self.core.plot_offset
    }

    /// Cancels pending overlay work and runs shutdown hooks.
    pub fn shutdown(&mut self) {
        self.core.scheduler.cancel();
        HookRegistry::run_core(&mut self.hooks.shutdown, &mut self.core);
    }

    /// Shuts down and drops all plot state; the plot draws nothing after
    /// this.
    pub fn destroy(&mut self) {
        self.shutdown();
        self.core.series.clear();
        self.core.x_axes.clear();
        self.core.y_axes.clear();
        self.core.highlights.clear();
        self.destroyed = true;
    }
}
