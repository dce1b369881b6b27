//! flotline: a backend-agnostic 2D plotting engine.
//!
//! The crate normalizes series data into flat point buffers, computes axis
//! ranges/ticks and a two-phase plot layout, and renders lines, filled areas,
//! bars, and point markers through an abstract canvas surface. An ordered
//! hook registry lets plugins graft onto fixed pipeline stages without
//! touching the core.

pub mod api;
pub mod color;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod options;
pub mod render;
pub mod telemetry;

pub use api::{Plot, PlotCore, SeriesDescriptor};
pub use error::{PlotError, PlotResult};
pub use options::PlotOptions;
