//! One plotted series: resolved options, raw data, and its normalized buffer.

use crate::color::Rgba;
use crate::core::datapoints::{DataPoints, RawData};
use crate::options::{BarAlign, SeriesOptions};

#[derive(Debug, Clone, Default)]
pub struct Series {
    pub options: SeriesOptions,
    /// Resolved CSS color; palette generation replaces any index request.
    pub color: String,
    pub data: RawData,
    pub datapoints: DataPoints,
}

impl Series {
    #[must_use]
    pub fn new(options: SeriesOptions, data: RawData) -> Self {
        Self {
            options,
            color: String::new(),
            data,
            datapoints: DataPoints::default(),
        }
    }

    /// Offset from the data x value to the left bar edge, in axis units.
    #[must_use]
    pub fn bar_left_align(&self) -> f64 {
        match self.options.bars.align {
            BarAlign::Left => 0.0,
            BarAlign::Right => -self.options.bars.bar_width,
            BarAlign::Center => -self.options.bars.bar_width / 2.0,
        }
    }

    /// Highlight color: the explicit option, or the series color at half alpha.
    #[must_use]
    pub fn highlight_color(&self) -> String {
        match &self.options.highlight_color {
            Some(color) => color.clone(),
            None => Rgba::parse(&self.color).scale("a", 0.5).to_css(),
        }
    }
}
