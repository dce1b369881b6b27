//! Canvas surfaces and the retained text overlay.
//!
//! Tick labels are not drawn through the immediate-mode context; they live
//! in a retained cache keyed by layer, style, and content. Each grid pass
//! marks the labels it still wants and a final `render` sweep drops the
//! rest, so unchanged labels survive replots without being re-measured.

use indexmap::IndexMap;

use crate::error::{PlotError, PlotResult};
use crate::options::FontSpec;
use crate::render::context::{PlotContext, RecordingContext};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextHAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// One placement of a cached text fragment; coordinates are the top-left
/// corner after alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPosition {
    pub x: f64,
    pub y: f64,
    pub active: bool,
    pub rendered: bool,
}

/// A measured text fragment and everywhere it appears.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextEntry {
    pub size: TextSize,
    pub positions: Vec<TextPosition>,
}

type StyleCache = IndexMap<String, TextEntry>;
type LayerCache = IndexMap<String, StyleCache>;

/// Layer -> style -> text cache of overlay fragments.
#[derive(Debug, Clone, Default)]
pub struct TextCache {
    layers: IndexMap<String, LayerCache>,
}

impl TextCache {
    /// Returns the measured size for a fragment, measuring it at most once
    /// per layer/style/text triple.
    pub fn measure(
        &mut self,
        layer: &str,
        style: &str,
        text: &str,
        measure: impl FnOnce(&str) -> TextSize,
    ) -> TextSize {
        let entry = self
            .layers
            .entry(layer.to_owned())
            .or_default()
            .entry(style.to_owned())
            .or_default()
            .entry(text.to_owned())
            .or_insert_with(|| TextEntry {
                size: measure(text),
                positions: Vec::new(),
            });
        entry.size
    }

    /// Places a fragment, aligning `(x, y)` by the measured size. Placing
    /// the same text at the same spot twice just re-activates it.
    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &mut self,
        layer: &str,
        style: &str,
        text: &str,
        mut x: f64,
        mut y: f64,
        halign: TextHAlign,
        valign: TextVAlign,
        measure: impl FnOnce(&str) -> TextSize,
    ) {
        let size = self.measure(layer, style, text, measure);
        match halign {
            TextHAlign::Left => {}
            TextHAlign::Center => x -= size.width / 2.0,
            TextHAlign::Right => x -= size.width,
        }
        match valign {
            TextVAlign::Top => {}
            TextVAlign::Middle => y -= size.height / 2.0,
            TextVAlign::Bottom => y -= size.height,
        }

        // measure() created the entry above
        let entry = &mut self.layers[layer][style][text];
        for position in &mut entry.positions {
            if position.x == x && position.y == y {
                position.active = true;
                return;
            }
        }
        entry.positions.push(TextPosition {
            x,
            y,
            active: true,
            rendered: false,
        });
    }

    /// Marks every placement in `layer` inactive; the next sweep removes
    /// whatever is not re-added before then.
    pub fn remove_layer(&mut self, layer: &str) {
        let Some(layer_cache) = self.layers.get_mut(layer) else {
            return;
        };
        for style_cache in layer_cache.values_mut() {
            for entry in style_cache.values_mut() {
                for position in &mut entry.positions {
                    position.active = false;
                }
            }
        }
    }

    /// Drops inactive placements, marks the rest rendered, and returns the
    /// placements that became visible in this pass.
    pub fn sweep(&mut self) -> Vec<(String, String, String, TextPosition)> {
        let mut newly_rendered = Vec::new();
        for (layer_key, layer_cache) in &mut self.layers {
            for (style_key, style_cache) in layer_cache.iter_mut() {
                style_cache.retain(|text, entry| {
                    entry.positions.retain_mut(|position| {
                        if !position.active {
                            return false;
                        }
                        if !position.rendered {
                            position.rendered = true;
                            newly_rendered.push((
                                layer_key.clone(),
                                style_key.clone(),
                                text.clone(),
                                position.clone(),
                            ));
                        }
                        true
                    });
                    !entry.positions.is_empty()
                });
            }
        }
        newly_rendered
    }

    /// Active placements in one layer, in insertion order.
    #[must_use]
    pub fn active_in_layer(&self, layer: &str) -> Vec<(&str, &TextPosition)> {
        let mut out = Vec::new();
        if let Some(layer_cache) = self.layers.get(layer) {
            for style_cache in layer_cache.values() {
                for (text, entry) in style_cache {
                    for position in &entry.positions {
                        if position.active {
                            out.push((text.as_str(), position));
                        }
                    }
                }
            }
        }
        out
    }
}

/// A drawing target with a pixel size, a context, and a text overlay.
pub trait Surface {
    type Context: PlotContext;

    fn width(&self) -> f64;
    fn height(&self) -> f64;
    /// Device pixels per logical pixel; backends scale their raster target
    /// by this. Headless surfaces report 1.0.
    fn pixel_ratio(&self) -> f64 {
        1.0
    }
    /// Fails on non-positive dimensions.
    fn resize(&mut self, width: f64, height: f64) -> PlotResult<()>;
    fn clear(&mut self);
    fn context(&mut self) -> &mut Self::Context;

    fn measure_text(&self, text: &str, font: Option<&FontSpec>) -> TextSize;
    fn text_cache(&mut self) -> &mut TextCache;
    /// Flushes the text overlay (the sweep described on [`TextCache`]).
    fn render(&mut self);

    /// Measures through the cache, keyed by layer and font style.
    fn text_info(&mut self, layer: &str, text: &str, font: Option<&FontSpec>) -> TextSize {
        let size = self.measure_text(text, font);
        let style = font_style_key(font);
        self.text_cache().measure(layer, &style, text, |_| size)
    }

    /// Queues a text fragment for the next overlay sweep.
    #[allow(clippy::too_many_arguments)]
    fn add_text(
        &mut self,
        layer: &str,
        x: f64,
        y: f64,
        text: &str,
        font: Option<&FontSpec>,
        halign: TextHAlign,
        valign: TextVAlign,
    ) {
        let size = self.measure_text(text, font);
        let style = font_style_key(font);
        self.text_cache()
            .add(layer, &style, text, x, y, halign, valign, |_| size);
    }
}

fn font_style_key(font: Option<&FontSpec>) -> String {
    match font {
        Some(font) => font.cache_key(),
        None => "tick-label".to_owned(),
    }
}

/// Headless surface over a [`RecordingContext`], with fixed per-character
/// text metrics so layout math stays deterministic in tests.
#[derive(Debug)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    context: RecordingContext,
    text: TextCache,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> PlotResult<Self> {
        if width <= 0.0 || height <= 0.0 {
            return Err(PlotError::InvalidSurfaceSize { width, height });
        }
        Ok(Self {
            width,
            height,
            context: RecordingContext::new(),
            text: TextCache::default(),
        })
    }

    /// Read-only view of the recorded command stream.
    #[must_use]
    pub fn commands(&self) -> &[crate::render::context::DrawCommand] {
        &self.context.commands
    }
}

impl Surface for RecordingSurface {
    type Context = RecordingContext;

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn resize(&mut self, width: f64, height: f64) -> PlotResult<()> {
        if width <= 0.0 || height <= 0.0 {
            return Err(PlotError::InvalidSurfaceSize { width, height });
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn clear(&mut self) {
        self.context.reset();
    }

    fn context(&mut self) -> &mut RecordingContext {
        &mut self.context
    }

    fn measure_text(&self, text: &str, font: Option<&FontSpec>) -> TextSize {
        let (char_width, line_height) = match font {
            Some(font) => (font.size * 0.6, font.line_height),
            None => (6.0, 12.0),
        };
        TextSize {
            width: char_width * text.chars().count() as f64,
            height: line_height,
        }
    }

    fn text_cache(&mut self) -> &mut TextCache {
        &mut self.text
    }

    fn render(&mut self) {
        self.text.sweep();
    }
}
