//! Immediate-mode drawing contract implemented by rendering backends.
//!
//! The trait mirrors a 2D canvas closely enough that the draw routines
//! translate one to one onto a real backend, while staying object safe so
//! hooks can receive `&mut dyn PlotContext`.

use std::f64::consts::PI;

use crate::color::Rgba;

/// Fill or stroke source.
///
/// Gradients are vertical-only: `y0`/`y1` anchor the stop ramp in canvas
/// space, each stop is `(offset, color)` with offsets in `0..=1`.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    LinearGradient {
        y0: f64,
        y1: f64,
        stops: Vec<(f64, Rgba)>,
    },
}

impl Paint {
    /// Parses a CSS color string into a solid paint.
    #[must_use]
    pub fn css(color: &str) -> Self {
        Paint::Solid(Rgba::parse(color))
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Rgba::opaque(0.0, 0.0, 0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// 2D drawing context.
///
/// Coordinates are in canvas pixels, affected by the current translation.
/// `stroke`/`fill` consume the current path using the current paint state.
pub trait PlotContext {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Circular arc around `(x, y)`; angles in radians.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);

    fn set_line_width(&mut self, width: f64);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_stroke(&mut self, paint: Paint);
    fn set_fill(&mut self, paint: Paint);

    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

/// Stroke a full circle at `(x, y)`; shadow passes only draw the lower half.
pub fn draw_circle(ctx: &mut dyn PlotContext, x: f64, y: f64, radius: f64, shadow: bool) {
    let end = if shadow { PI } else { 2.0 * PI };
    ctx.arc(x, y, radius, 0.0, end);
}

/// One recorded drawing operation, with path coordinates already translated
/// into absolute canvas space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginPath,
    ClosePath,
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Stroke {
        paint: Paint,
        line_width: f64,
    },
    Fill {
        paint: Paint,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: Paint,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: Paint,
        line_width: f64,
    },
}

/// Headless context that records every operation.
///
/// Tests assert on the command stream instead of pixels; recorded
/// coordinates are absolute so the assertions are independent of the
/// translation stack.
#[derive(Debug, Default)]
pub struct RecordingContext {
    pub commands: Vec<DrawCommand>,
    offset: (f64, f64),
    saved_offsets: Vec<(f64, f64)>,
    line_width: f64,
    line_join: LineJoin,
    stroke_paint: Paint,
    fill_paint: Paint,
}

impl RecordingContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.commands.clear();
        self.offset = (0.0, 0.0);
        self.saved_offsets.clear();
    }

    /// Counts `MoveTo` commands, one per disconnected path segment.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::MoveTo { .. }))
            .count()
    }

    /// Counts `LineTo` commands.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::LineTo { .. }))
            .count()
    }
}

impl PlotContext for RecordingContext {
    fn save(&mut self) {
        self.saved_offsets.push(self.offset);
    }

    fn restore(&mut self) {
        if let Some(offset) = self.saved_offsets.pop() {
            self.offset = offset;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.offset.0 += dx;
        self.offset.1 += dy;
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo {
            x: x + self.offset.0,
            y: y + self.offset.1,
        });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo {
            x: x + self.offset.0,
            y: y + self.offset.1,
        });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        self.commands.push(DrawCommand::Arc {
            x: x + self.offset.0,
            y: y + self.offset.1,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    fn set_stroke(&mut self, paint: Paint) {
        self.stroke_paint = paint;
    }

    fn set_fill(&mut self, paint: Paint) {
        self.fill_paint = paint;
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke {
            paint: self.stroke_paint.clone(),
            line_width: self.line_width,
        });
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill {
            paint: self.fill_paint.clone(),
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::FillRect {
            x: x + self.offset.0,
            y: y + self.offset.1,
            width,
            height,
            paint: self.fill_paint.clone(),
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            x: x + self.offset.0,
            y: y + self.offset.1,
            width,
            height,
            paint: self.stroke_paint.clone(),
            line_width: self.line_width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_is_baked_into_recorded_coordinates() {
        let mut ctx = RecordingContext::new();
        ctx.save();
        ctx.translate(10.0, 20.0);
        ctx.move_to(1.0, 2.0);
        ctx.restore();
        ctx.move_to(1.0, 2.0);

        assert_eq!(
            ctx.commands,
            vec![
                DrawCommand::MoveTo { x: 11.0, y: 22.0 },
                DrawCommand::MoveTo { x: 1.0, y: 2.0 },
            ]
        );
    }
}
