use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

/// Fatal setup failures.
///
/// Data-shape problems never surface here; malformed points degrade to gaps
/// during normalization instead of aborting the plot.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid surface size: width={width}, height={height}")]
    InvalidSurfaceSize { width: f64, height: f64 },

    #[error("axis mode `{mode}` requires a tick generator from a plugin that was not registered")]
    MissingAxisMode { mode: String },

    #[error("hook registry is frozen; hooks can only be registered during plugin initialization")]
    HooksFrozen,

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}
