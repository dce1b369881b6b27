//! Grid setup: range resolution, tick generation, and the two-phase axis
//! layout that produces the final plot area.

use tracing::debug;

use crate::core::axis::{Axis, AxisDirection};
use crate::core::layout::{
    adjust_layout_for_stickouts, allocate_axis_box_first_phase, allocate_axis_box_second_phase,
    classify_axis,
};
use crate::error::PlotResult;
use crate::options::AxisPosition;
use crate::render::surface::{Surface, TextHAlign, TextVAlign};

use super::plot::Plot;

/// Text-cache layer one axis's labels live in.
pub(crate) fn axis_layer(axis: &Axis) -> String {
    format!("flot-{}{}-axis", axis.direction.letter(), axis.number)
}

fn measure_tick_labels<S: Surface>(surface: &mut S, axis: &mut Axis) {
    let layer = axis_layer(axis);
    let font = axis.options.font.clone();
    let mut label_width = axis.options.label_width.unwrap_or(0.0);
    let mut label_height = axis.options.label_height.unwrap_or(0.0);

    for tick in &axis.ticks {
        if tick.label.is_empty() {
            continue;
        }
        let info = surface.text_info(&layer, &tick.label, font.as_ref());
        label_width = label_width.max(info.width);
        label_height = label_height.max(info.height);
    }

    axis.label_width = axis.options.label_width.unwrap_or(label_width);
    axis.label_height = axis.options.label_height.unwrap_or(label_height);
}

impl<S: Surface> Plot<S> {
    /// Resolves axis ranges and ticks, lays out the axis boxes, and sizes
    /// the plot area. Call after `set_data` or a resize, before `draw`.
    pub fn setup_grid(&mut self) -> PlotResult<()> {
        if self.destroyed {
            return Ok(());
        }
        self.core.surface_width = self.surface.width();
        self.core.surface_height = self.surface.height();
        let show_grid = self.core.options.grid.show;
        let grid = self.core.options.grid.clone();

        self.core.plot_offset = grid.margin;
        crate::extensions::hooks::HookRegistry::run_core(
            &mut self.hooks.process_offset,
            &mut self.core,
        );
        let mut offset = self.core.plot_offset;
        if show_grid {
            offset.left += grid.border_width.left;
            offset.right += grid.border_width.right;
            offset.top += grid.border_width.top;
            offset.bottom += grid.border_width.bottom;
        }

        for axis in self.core.axes_mut() {
            axis.show = axis.options.show.unwrap_or(axis.used);
            axis.reserve_space = axis.show || axis.options.reserve_space.unwrap_or(false);
            axis.set_range();
        }

        if show_grid {
            self.setup_ticks()?;

            // phase one walks outside in, so reversed storage order
            let surface_width = self.core.surface_width;
            let surface_height = self.core.surface_height;
            for direction in [AxisDirection::Y, AxisDirection::X] {
                let siblings = allocation_map(&self.core, direction);
                let slots = match direction {
                    AxisDirection::X => &mut self.core.x_axes,
                    AxisDirection::Y => &mut self.core.y_axes,
                };
                for slot in (0..slots.len()).rev() {
                    if !siblings[slot].0 {
                        continue;
                    }
                    let placement = classify_axis(&siblings, slot);
                    let Some(axis) = slots[slot].as_mut() else {
                        continue;
                    };
                    allocate_axis_box_first_phase(
                        axis,
                        placement,
                        &mut offset,
                        surface_width,
                        surface_height,
                        &grid,
                    );
                }
            }

            let min_margin = grid.min_border_margin.unwrap_or_else(|| {
                self.core.series.iter().fold(0.0, |acc: f64, s| {
                    acc.max(2.0 * (s.options.points.radius + s.options.points.line_width / 2.0))
                })
            });
            adjust_layout_for_stickouts(&mut offset, min_margin, self.core.axes());

            for axis in self.core.axes_mut() {
                if axis.show || axis.reserve_space {
                    allocate_axis_box_second_phase(
                        axis,
                        &offset,
                        surface_width,
                        surface_height,
                    );
                }
            }
        }

        self.core.plot_offset = offset;
        self.core.plot_width = self.core.surface_width - offset.left - offset.right;
        self.core.plot_height = self.core.surface_height - offset.top - offset.bottom;

        let (plot_width, plot_height) = (self.core.plot_width, self.core.plot_height);
        for axis in self.core.axes_mut() {
            axis.update_transform(plot_width, plot_height);
        }

        if show_grid {
            self.draw_axis_labels();
        }
        debug!(
            plot_width = self.core.plot_width,
            plot_height = self.core.plot_height,
            "grid layout settled"
        );
        Ok(())
    }

    /// Tick generation for every allocated axis, in storage order so a
    /// later axis can align with an earlier one's settled ticks.
    fn setup_ticks(&mut self) -> PlotResult<()> {
        for direction in [AxisDirection::X, AxisDirection::Y] {
            let surface_dim = match direction {
                AxisDirection::X => self.core.surface_width,
                AxisDirection::Y => self.core.surface_height,
            };
            let len = match direction {
                AxisDirection::X => self.core.x_axes.len(),
                AxisDirection::Y => self.core.y_axes.len(),
            };
            for slot in 0..len {
                let slots = match direction {
                    AxisDirection::X => &self.core.x_axes,
                    AxisDirection::Y => &self.core.y_axes,
                };
                let Some(axis) = slots[slot].as_ref() else {
                    continue;
                };
                if !(axis.show || axis.reserve_space) {
                    continue;
                }
                // snapshot the alignment sibling before borrowing this
                // axis mutably
                let sibling = axis
                    .options
                    .align_ticks_with_axis
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| slots.get(i))
                    .and_then(Clone::clone);

                let slots = match direction {
                    AxisDirection::X => &mut self.core.x_axes,
                    AxisDirection::Y => &mut self.core.y_axes,
                };
                let Some(axis) = slots[slot].as_mut() else {
                    continue;
                };
                axis.tick_generator = None;
                axis.setup_tick_generation(surface_dim)?;
                if let Some(sibling) = &sibling {
                    axis.align_ticks_with(sibling);
                }
                axis.set_ticks();
                axis.snap_range_to_ticks();
                measure_tick_labels(&mut self.surface, axis);
            }
        }
        Ok(())
    }

    fn draw_axis_labels(&mut self) {
        let offset = self.core.plot_offset;
        for axis in self.core.x_axes.iter().chain(self.core.y_axes.iter()) {
            let Some(axis) = axis.as_ref() else { continue };
            let layer = axis_layer(axis);
            self.surface.text_cache().remove_layer(&layer);
            if !axis.show || axis.ticks.is_empty() {
                continue;
            }
            let font = axis.options.font.clone();
            let b = axis.layout;

            for tick in &axis.ticks {
                if tick.label.is_empty() || tick.value < axis.min || tick.value > axis.max {
                    continue;
                }
                let (x, y, halign, valign) = match axis.direction {
                    AxisDirection::X => {
                        let x = offset.left + axis.p2c(tick.value);
                        if axis.options.position == AxisPosition::Bottom {
                            (x, b.top + b.padding, TextHAlign::Center, TextVAlign::Top)
                        } else {
                            (
                                x,
                                b.top + b.height - b.padding,
                                TextHAlign::Center,
                                TextVAlign::Bottom,
                            )
                        }
                    }
                    AxisDirection::Y => {
                        let y = offset.top + axis.p2c(tick.value);
                        if axis.options.position == AxisPosition::Left {
                            (
                                b.left + b.width - b.padding,
                                y,
                                TextHAlign::Right,
                                TextVAlign::Middle,
                            )
                        } else {
                            (b.left + b.padding, y, TextHAlign::Left, TextVAlign::Middle)
                        }
                    }
                };
                self.surface
                    .add_text(&layer, x, y, &tick.label, font.as_ref(), halign, valign);
            }
        }
    }
}

/// `(allocated, position)` per slot for [`classify_axis`].
fn allocation_map(
    core: &super::plot::PlotCore,
    direction: AxisDirection,
) -> Vec<(bool, AxisPosition)> {
    let slots = match direction {
        AxisDirection::X => &core.x_axes,
        AxisDirection::Y => &core.y_axes,
    };
    slots
        .iter()
        .map(|slot| match slot {
            Some(axis) => (axis.show || axis.reserve_space, axis.options.position),
            None => (false, AxisPosition::Bottom),
        })
        .collect()
}
