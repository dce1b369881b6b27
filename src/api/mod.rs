//! Public plot API: construction, the data pipeline, layout, drawing, and
//! pointer interaction.

mod draw;
mod events;
mod grid;
mod plot;

pub use plot::{Plot, PlotCore, SeriesDescriptor};
