//! Backend abstraction: drawing contexts, surfaces, the text overlay
//! cache, and the series draw routines.

pub mod context;
pub mod draw;
pub mod surface;

pub use context::{DrawCommand, LineJoin, Paint, PlotContext, RecordingContext};
pub use surface::{
    RecordingSurface, Surface, TextCache, TextHAlign, TextSize, TextVAlign,
};
