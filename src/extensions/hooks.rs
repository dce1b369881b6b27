//! Ordered hook registry.
//!
//! Plugins graft onto fixed pipeline stages by appending callbacks during
//! initialization. Hooks for one stage run in registration order, and the
//! registry freezes once plugin init completes; late registration is an
//! error rather than a silent no-op.

use tracing::debug;

use crate::api::PlotCore;
use crate::error::{PlotError, PlotResult};
use crate::options::PlotOptions;
use crate::render::context::PlotContext;

/// Hook over the mutable plot state.
pub type CoreHook = Box<dyn FnMut(&mut PlotCore) + Send>;
/// Hook over one series, identified by index.
pub type SeriesHook = Box<dyn FnMut(&mut PlotCore, usize) + Send>;
/// Hook with access to a drawing context.
pub type DrawHook = Box<dyn FnMut(&mut PlotCore, &mut dyn PlotContext) + Send>;
/// Per-series draw hook.
pub type SeriesDrawHook = Box<dyn FnMut(&mut PlotCore, &mut dyn PlotContext, usize) + Send>;

/// A chart extension.
///
/// `apply_default_options` merges the plugin's option defaults before user
/// options are applied; `init` registers hooks and may adjust the merged
/// options.
pub trait Plugin {
    fn name(&self) -> &'static str;

    fn apply_default_options(&self, _options: &mut PlotOptions) {}

    fn init(&self, hooks: &mut HookRegistry, options: &mut PlotOptions) -> PlotResult<()>;
}

#[derive(Default)]
pub struct HookRegistry {
    frozen: bool,
    pub(crate) process_options: Vec<CoreHook>,
    pub(crate) process_raw_data: Vec<SeriesHook>,
    pub(crate) process_datapoints: Vec<SeriesHook>,
    pub(crate) process_offset: Vec<CoreHook>,
    pub(crate) draw_background: Vec<DrawHook>,
    pub(crate) draw_series: Vec<SeriesDrawHook>,
    pub(crate) draw: Vec<DrawHook>,
    pub(crate) draw_overlay: Vec<DrawHook>,
    pub(crate) bind_events: Vec<CoreHook>,
    pub(crate) shutdown: Vec<CoreHook>,
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("frozen", &self.frozen)
            .field("process_options", &self.process_options.len())
            .field("process_raw_data", &self.process_raw_data.len())
            .field("process_datapoints", &self.process_datapoints.len())
            .field("process_offset", &self.process_offset.len())
            .field("draw_background", &self.draw_background.len())
            .field("draw_series", &self.draw_series.len())
            .field("draw", &self.draw.len())
            .field("draw_overlay", &self.draw_overlay.len())
            .field("bind_events", &self.bind_events.len())
            .field("shutdown", &self.shutdown.len())
            .finish()
    }
}

macro_rules! register {
    ($self:ident, $stage:ident, $hook:expr) => {{
        $self.ensure_open()?;
        $self.$stage.push(Box::new($hook));
        Ok(())
    }};
}

impl HookRegistry {
    fn ensure_open(&self) -> PlotResult<()> {
        if self.frozen {
            return Err(PlotError::HooksFrozen);
        }
        Ok(())
    }

    /// Called after plugin init; registration fails from here on.
    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
        debug!(registry = ?self, "hook registry frozen");
    }

    /// Runs after user options are merged, before any data processing.
    pub fn on_process_options(
        &mut self,
        hook: impl FnMut(&mut PlotCore) + Send + 'static,
    ) -> PlotResult<()> {
        register!(self, process_options, hook)
    }

    /// Runs per series before normalization; a hook may pre-fill the
    /// series's point format or buffer to take over normalization.
    pub fn on_process_raw_data(
        &mut self,
        hook: impl FnMut(&mut PlotCore, usize) + Send + 'static,
    ) -> PlotResult<()> {
        register!(self, process_raw_data, hook)
    }

    /// Runs per series after pass one, before extent sweeping.
    pub fn on_process_datapoints(
        &mut self,
        hook: impl FnMut(&mut PlotCore, usize) + Send + 'static,
    ) -> PlotResult<()> {
        register!(self, process_datapoints, hook)
    }

    /// Runs during layout, after the grid margin seeds the plot offset.
    pub fn on_process_offset(
        &mut self,
        hook: impl FnMut(&mut PlotCore) + Send + 'static,
    ) -> PlotResult<()> {
        register!(self, process_offset, hook)
    }

    /// Runs at the start of a draw pass, before the grid and series.
    pub fn on_draw_background(
        &mut self,
        hook: impl FnMut(&mut PlotCore, &mut dyn PlotContext) + Send + 'static,
    ) -> PlotResult<()> {
        register!(self, draw_background, hook)
    }

    /// Runs before each series is drawn.
    pub fn on_draw_series(
        &mut self,
        hook: impl FnMut(&mut PlotCore, &mut dyn PlotContext, usize) + Send + 'static,
    ) -> PlotResult<()> {
        register!(self, draw_series, hook)
    }

    /// Runs after all series are drawn.
    pub fn on_draw(
        &mut self,
        hook: impl FnMut(&mut PlotCore, &mut dyn PlotContext) + Send + 'static,
    ) -> PlotResult<()> {
        register!(self, draw, hook)
    }

    /// Runs after the highlight overlay is redrawn.
    pub fn on_draw_overlay(
        &mut self,
        hook: impl FnMut(&mut PlotCore, &mut dyn PlotContext) + Send + 'static,
    ) -> PlotResult<()> {
        register!(self, draw_overlay, hook)
    }

    /// Runs once after construction finishes, when the plot is ready for
    /// pointer input.
    pub fn on_bind_events(
        &mut self,
        hook: impl FnMut(&mut PlotCore) + Send + 'static,
    ) -> PlotResult<()> {
        register!(self, bind_events, hook)
    }

    /// Runs when the plot shuts down.
    pub fn on_shutdown(
        &mut self,
        hook: impl FnMut(&mut PlotCore) + Send + 'static,
    ) -> PlotResult<()> {
        register!(self, shutdown, hook)
    }

    pub(crate) fn run_core(stage: &mut [CoreHook], core: &mut PlotCore) {
        for hook in stage {
            hook(core);
        }
    }

    pub(crate) fn run_series(stage: &mut [SeriesHook], core: &mut PlotCore, index: usize) {
        for hook in stage {
            hook(core, index);
        }
    }

    pub(crate) fn run_draw(
        stage: &mut [DrawHook],
        core: &mut PlotCore,
        ctx: &mut dyn PlotContext,
    ) {
        for hook in stage {
            hook(core, ctx);
        }
    }

    pub(crate) fn run_series_draw(
        stage: &mut [SeriesDrawHook],
        core: &mut PlotCore,
        ctx: &mut dyn PlotContext,
        index: usize,
    ) {
        for hook in stage {
            hook(core, ctx, index);
        }
    }
}
