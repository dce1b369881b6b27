//! Normalized point buffers.
//!
//! Raw input data is a list of tuples where both a tuple and any of its
//! fields may be missing. Normalization flattens it into one `Vec` of
//! `point_size` slots per tuple, so the draw loops can walk a single
//! buffer with a fixed stride.

use smallvec::SmallVec;

/// One raw input tuple; extra fields beyond the point format are ignored.
pub type RawPoint = Vec<Option<f64>>;

/// Raw series data. A `None` entry is an explicit gap.
pub type RawData = Vec<Option<RawPoint>>;

/// How one slot of a normalized tuple is interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Field lives on the x axis.
    pub x: bool,
    /// Field lives on the y axis.
    pub y: bool,
    /// Coerce to a number; non-finite input degrades to a gap or sentinel.
    pub number: bool,
    /// A missing value here nullifies the whole tuple.
    pub required: bool,
    /// Substituted when the input field is missing.
    pub default_value: Option<f64>,
    /// Whether the field participates in data extent tracking.
    pub autoscale: bool,
}

impl FieldSpec {
    #[must_use]
    pub fn required_x() -> Self {
        Self {
            x: true,
            y: false,
            number: true,
            required: true,
            default_value: None,
            autoscale: true,
        }
    }

    #[must_use]
    pub fn required_y() -> Self {
        Self {
            x: false,
            y: true,
            number: true,
            required: true,
            default_value: None,
            autoscale: true,
        }
    }
}

/// Per-series tuple layout; three slots covers x/y/base without spilling.
pub type PointFormat = SmallVec<[FieldSpec; 3]>;

/// Flat normalized buffer for one series.
///
/// `points.len()` is always a multiple of `point_size`. A tuple whose first
/// slot is `None` is a gap; draw loops break the line there.
#[derive(Debug, Clone, Default)]
pub struct DataPoints {
    pub points: Vec<Option<f64>>,
    pub point_size: usize,
    pub format: PointFormat,
}

impl DataPoints {
    /// Number of normalized tuples.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.point_size == 0 {
            0
        } else {
            self.points.len() / self.point_size
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns tuple `index` as a slice, or `None` when out of range.
    #[must_use]
    pub fn tuple(&self, index: usize) -> Option<&[Option<f64>]> {
        let start = index.checked_mul(self.point_size)?;
        self.points.get(start..start + self.point_size)
    }

    /// Bounds-and-gap tolerant slot accessor used by the sweep loops, which
    /// deliberately run past both ends of the buffer.
    #[must_use]
    pub fn at(&self, index: i64) -> Option<f64> {
        if index < 0 {
            return None;
        }
        self.points.get(index as usize).copied().flatten()
    }
}
