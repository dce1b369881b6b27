//! Data normalization, axis math, and plot layout.

pub mod axis;
pub mod datapoints;
pub mod layout;
pub mod pipeline;
pub mod series;

pub use axis::{Axis, AxisDirection, Tick};
pub use datapoints::{DataPoints, FieldSpec, PointFormat, RawData, RawPoint};
pub use layout::AxisBox;
pub use series::Series;
