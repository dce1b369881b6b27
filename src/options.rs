//! Typed plot configuration.
//!
//! Every struct here derives serde with field defaults so hosts can persist
//! partial option documents and load them back without inventing an ad-hoc
//! format. Callback-style options (transforms, custom formatters, symbol
//! renderers) are skipped during serialization.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::axis::Axis;
use crate::error::{PlotError, PlotResult};
use crate::render::context::PlotContext;

/// Monotonic data-space transform applied to one axis (`transform` /
/// `inverse_transform` pairs).
#[derive(Clone)]
pub struct AxisTransform(pub Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl AxisTransform {
    #[must_use]
    pub fn new(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        (self.0)(value)
    }
}

impl fmt::Debug for AxisTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AxisTransform(..)")
    }
}

/// Plugin-supplied tick generator (replaces the built-in decimal generator).
#[derive(Clone)]
pub struct TickGenerator(pub Arc<dyn Fn(&Axis) -> Vec<f64> + Send + Sync>);

impl TickGenerator {
    #[must_use]
    pub fn new(f: impl Fn(&Axis) -> Vec<f64> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for TickGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TickGenerator(..)")
    }
}

/// Custom tick label formatter.
#[derive(Clone)]
pub struct TickFormatter(pub Arc<dyn Fn(f64, &Axis) -> String + Send + Sync>);

impl TickFormatter {
    #[must_use]
    pub fn new(f: impl Fn(f64, &Axis) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for TickFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TickFormatter(..)")
    }
}

/// Caller-supplied point marker: `(context, x, y, radius, shadow_pass)`.
#[derive(Clone)]
pub struct SymbolRenderer(pub Arc<dyn Fn(&mut dyn PlotContext, f64, f64, f64, bool) + Send + Sync>);

impl fmt::Debug for SymbolRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymbolRenderer(..)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisPosition {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
}

/// Tick request on an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum TickSpec {
    /// Heuristic count derived from the surface dimension.
    #[default]
    Auto,
    /// Approximate number of generated ticks.
    Count(f64),
    /// Explicit tick values; labels come from the formatter.
    Values(Vec<f64>),
    /// Explicit value/label pairs.
    Labeled(Vec<(f64, String)>),
}

/// Tick mark length: `Full` stretches across the whole plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TickLength {
    Full,
    Px(f64),
}

/// Font description used for tick labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub size: f64,
    pub line_height: f64,
    pub style: Option<String>,
    pub weight: Option<String>,
    pub family: Option<String>,
    pub color: Option<String>,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size: 10.0,
            line_height: 12.0,
            style: None,
            weight: None,
            family: None,
            color: None,
        }
    }
}

impl FontSpec {
    /// Stable key for the text cache.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "{} {} {}px/{}px {}",
            self.style.as_deref().unwrap_or("normal"),
            self.weight.as_deref().unwrap_or("normal"),
            self.size,
            self.line_height,
            self.family.as_deref().unwrap_or("sans-serif"),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOptions {
    /// `None` means auto-detect from whether any series uses the axis.
    pub show: Option<bool>,
    pub position: AxisPosition,
    /// Non-decimal axis modes (e.g. a time mode) are provided by plugins;
    /// naming a mode without a registered generator is a setup error.
    pub mode: Option<String>,
    pub color: Option<String>,
    pub tick_color: Option<String>,
    pub font: Option<FontSpec>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Fractional margin added to unpinned bounds when autoscaling.
    pub autoscale_margin: Option<f64>,
    pub ticks: TickSpec,
    pub tick_decimals: Option<u32>,
    pub tick_size: Option<f64>,
    pub min_tick_size: Option<f64>,
    pub label_width: Option<f64>,
    pub label_height: Option<f64>,
    /// Reserve layout space even when the axis is hidden.
    pub reserve_space: Option<bool>,
    /// `None` means auto: full-length for the first axis per direction, 5px otherwise.
    pub tick_length: Option<TickLength>,
    /// Derive tick positions from another axis (1-based number) so grid
    /// lines stay level across dual axes.
    pub align_ticks_with_axis: Option<usize>,
    #[serde(skip)]
    pub transform: Option<AxisTransform>,
    #[serde(skip)]
    pub inverse_transform: Option<AxisTransform>,
    #[serde(skip)]
    pub tick_generator: Option<TickGenerator>,
    #[serde(skip)]
    pub tick_formatter: Option<TickFormatter>,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            show: None,
            position: AxisPosition::Bottom,
            mode: None,
            color: None,
            tick_color: None,
            font: None,
            min: None,
            max: None,
            autoscale_margin: None,
            ticks: TickSpec::Auto,
            tick_decimals: None,
            tick_size: None,
            min_tick_size: None,
            label_width: None,
            label_height: None,
            reserve_space: None,
            tick_length: None,
            align_ticks_with_axis: None,
            transform: None,
            inverse_transform: None,
            tick_generator: None,
            tick_formatter: None,
        }
    }
}

impl AxisOptions {
    /// Default options for a y-direction axis.
    #[must_use]
    pub fn default_y() -> Self {
        Self {
            position: AxisPosition::Left,
            autoscale_margin: Some(0.02),
            ..Self::default()
        }
    }
}

/// Fill toggle for lines/points/bars; `Opacity` derives the fill from the
/// series color at the given alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum FillSetting {
    #[default]
    Off,
    On,
    Opacity(f64),
}

impl FillSetting {
    #[must_use]
    pub fn is_on(self) -> bool {
        !matches!(self, FillSetting::Off)
    }
}

/// One stop of a vertical gradient: an explicit color, or a variation of
/// the series color by brightness/opacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GradientStop {
    Color(String),
    Derived {
        brightness: Option<f64>,
        opacity: Option<f64>,
    },
}

/// A fill: a solid color string or a vertical gradient spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FillSpec {
    Color(String),
    Gradient { colors: Vec<GradientStop> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinesOptions {
    /// `None` lets the controller turn lines on when nothing else is shown.
    pub show: Option<bool>,
    pub line_width: f64,
    pub fill: FillSetting,
    pub fill_color: Option<FillSpec>,
    pub steps: bool,
    /// Whether filled lines extend to zero; `None` defaults to match `fill`.
    pub zero: Option<bool>,
}

impl Default for LinesOptions {
    fn default() -> Self {
        Self {
            show: None,
            line_width: 2.0,
            fill: FillSetting::Off,
            fill_color: None,
            steps: false,
            zero: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsOptions {
    pub show: bool,
    pub radius: f64,
    pub line_width: f64,
    pub fill: FillSetting,
    pub fill_color: Option<FillSpec>,
    #[serde(skip)]
    pub symbol: Option<SymbolRenderer>,
}

impl Default for PointsOptions {
    fn default() -> Self {
        Self {
            show: false,
            radius: 3.0,
            line_width: 2.0,
            fill: FillSetting::On,
            fill_color: Some(FillSpec::Color("#ffffff".to_owned())),
            symbol: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BarAlign {
    #[default]
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarsOptions {
    pub show: bool,
    pub line_width: f64,
    /// Bar width in x-axis units.
    pub bar_width: f64,
    pub fill: FillSetting,
    pub fill_color: Option<FillSpec>,
    pub align: BarAlign,
    pub horizontal: bool,
    pub zero: bool,
}

impl Default for BarsOptions {
    fn default() -> Self {
        Self {
            show: false,
            line_width: 2.0,
            bar_width: 1.0,
            fill: FillSetting::On,
            fill_color: None,
            align: BarAlign::Left,
            horizontal: false,
            zero: true,
        }
    }
}

/// Series color request: a CSS string or an index into the generated palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesColor {
    Index(usize),
    Css(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesOptions {
    pub color: Option<SeriesColor>,
    pub label: Option<String>,
    pub lines: LinesOptions,
    pub points: PointsOptions,
    pub bars: BarsOptions,
    /// 1-based axis numbers; axis 1 is implicit.
    pub xaxis: usize,
    pub yaxis: usize,
    pub shadow_size: f64,
    /// Defaults to the series color at half alpha.
    pub highlight_color: Option<String>,
    pub hoverable: bool,
    pub clickable: bool,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            color: None,
            label: None,
            lines: LinesOptions::default(),
            points: PointsOptions::default(),
            bars: BarsOptions::default(),
            xaxis: 1,
            yaxis: 1,
            shadow_size: 3.0,
            highlight_color: None,
            hoverable: true,
            clickable: true,
        }
    }
}

/// Four pixel margins, used for grid margin and border widths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }
}

/// Inclusive value range inside one marking, keyed by axis name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MarkingRange {
    pub from: Option<f64>,
    pub to: Option<f64>,
}

/// A highlighted region or line on the grid. Ranges are keyed by axis name
/// (`xaxis`, `x2axis`, `yaxis`, ...); missing bounds extend to the axis range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Marking {
    pub ranges: IndexMap<String, MarkingRange>,
    pub color: Option<String>,
    pub line_width: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    pub show: bool,
    pub above_data: bool,
    /// Primary color for outline and labels.
    pub color: String,
    pub background_color: Option<FillSpec>,
    pub border_color: Option<String>,
    pub tick_color: Option<String>,
    /// Distance from the canvas edge to the grid.
    pub margin: Margins,
    /// Gap between tick marks and tick labels, in pixels.
    pub label_margin: f64,
    /// Gap between stacked axis boxes, in pixels.
    pub axis_margin: f64,
    pub border_width: Margins,
    /// `None` derives the margin from the largest point radius.
    pub min_border_margin: Option<f64>,
    pub markings: Vec<Marking>,
    pub markings_color: String,
    pub markings_line_width: f64,
    pub clickable: bool,
    pub hoverable: bool,
    pub auto_highlight: bool,
    /// Hit-test radius in pixels.
    pub mouse_active_radius: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            show: true,
            above_data: false,
            color: "#545454".to_owned(),
            background_color: None,
            border_color: None,
            tick_color: None,
            margin: Margins::default(),
            label_margin: 5.0,
            axis_margin: 8.0,
            border_width: Margins::uniform(2.0),
            min_border_margin: None,
            markings: Vec::new(),
            markings_color: "#f4f4f4".to_owned(),
            markings_line_width: 2.0,
            clickable: false,
            hoverable: false,
            auto_highlight: true,
            mouse_active_radius: 10.0,
        }
    }
}

/// Overlay redraw pacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RedrawInterval {
    /// Redraw synchronously, skipping the event queue.
    Immediate,
    /// Coalesce redraws to at most one per this many milliseconds.
    DelayMs(f64),
}

impl Default for RedrawInterval {
    fn default() -> Self {
        RedrawInterval::DelayMs(1000.0 / 60.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InteractionOptions {
    pub redraw_overlay_interval: RedrawInterval,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Base palette cycled (with brightness variation) across series.
    pub colors: Vec<String>,
    pub xaxis: AxisOptions,
    pub yaxis: AxisOptions,
    /// Per-axis overrides; entry `i` configures axis number `i + 1`.
    pub xaxes: Vec<AxisOptions>,
    pub yaxes: Vec<AxisOptions>,
    /// Defaults applied to every series without explicit options.
    pub series: SeriesOptions,
    pub grid: GridOptions,
    pub interaction: InteractionOptions,
}

impl PlotOptions {
    /// Parses a (possibly partial) JSON option document; omitted fields
    /// take their defaults. Callback options cannot be expressed in JSON
    /// and stay unset.
    pub fn from_json(doc: &str) -> PlotResult<Self> {
        serde_json::from_str(doc).map_err(|e| PlotError::InvalidOptions(e.to_string()))
    }

    /// Serializes the option tree so hosts can persist it.
    pub fn to_json(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlotError::InvalidOptions(e.to_string()))
    }
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            colors: vec![
                "#edc240".to_owned(),
                "#afd8f8".to_owned(),
                "#cb4b4b".to_owned(),
                "#4da74d".to_owned(),
                "#9440ed".to_owned(),
            ],
            xaxis: AxisOptions::default(),
            yaxis: AxisOptions::default_y(),
            xaxes: Vec::new(),
            yaxes: Vec::new(),
            series: SeriesOptions::default(),
            grid: GridOptions::default(),
            interaction: InteractionOptions::default(),
        }
    }
}
