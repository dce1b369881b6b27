//! Two-phase plot layout.
//!
//! Phase one walks the allocated axes from the outside in, measuring each
//! axis box along its own direction and shrinking the plot offset. Phase
//! two, once the plot area is final, fills in the cross dimension of every
//! box. A stick-out pass in between makes room for markers and labels that
//! overhang the plot edges.

use crate::core::axis::{Axis, AxisDirection};
use crate::options::{AxisPosition, GridOptions, Margins, TickLength};

/// Pixel rectangle reserved for one axis's ticks and labels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Label margin plus tick length, measured from the plot edge.
    pub padding: f64,
}

/// Where an axis sits relative to its same-direction siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisPlacement {
    /// No allocated sibling between this axis and the plot, on its side.
    pub innermost: bool,
    /// No allocated sibling beyond this axis, on its side.
    pub outermost: bool,
    /// First allocated axis in its direction; its ticks stretch across the
    /// plot by default.
    pub first: bool,
}

/// Classifies `target` against its same-direction siblings.
///
/// `siblings` lists every axis slot in storage order as
/// `(allocated, position)`; unallocated slots are ignored.
#[must_use]
pub fn classify_axis(siblings: &[(bool, AxisPosition)], target: usize) -> AxisPlacement {
    let target_pos = siblings[target].1;
    let mut innermost = true;
    let mut outermost = true;
    let mut first = true;
    let mut found = false;

    for (i, &(allocated, pos)) in siblings.iter().enumerate() {
        if !allocated {
            continue;
        }
        if i == target {
            found = true;
        } else if pos == target_pos {
            if found {
                outermost = false;
            } else {
                innermost = false;
            }
        }
        if !found {
            first = false;
        }
    }

    AxisPlacement {
        innermost,
        outermost,
        first,
    }
}

/// Phase one: size the axis box along its own direction and push the plot
/// offset inward on that side.
pub fn allocate_axis_box_first_phase(
    axis: &mut Axis,
    placement: AxisPlacement,
    offset: &mut Margins,
    surface_width: f64,
    surface_height: f64,
    grid: &GridOptions,
) {
    let mut label_width = axis.label_width;
    let mut label_height = axis.label_height;
    let pos = axis.options.position;

    // the outermost axis on each side has no margin
    let axis_margin = if placement.outermost {
        0.0
    } else {
        grid.axis_margin
    };

    // the first axis per direction gets full-length ticks
    let tick_length = axis.options.tick_length.unwrap_or(if placement.first {
        TickLength::Full
    } else {
        TickLength::Px(5.0)
    });

    let mut padding = grid.label_margin;
    if let TickLength::Px(px) = tick_length {
        padding += px;
    }

    match axis.direction {
        AxisDirection::X => {
            label_height += padding;
            if pos == AxisPosition::Bottom {
                offset.bottom += label_height + axis_margin;
                axis.layout.top = surface_height - offset.bottom;
                axis.layout.height = label_height;
            } else {
                axis.layout.top = offset.top + axis_margin;
                axis.layout.height = label_height;
                offset.top += label_height + axis_margin;
            }
        }
        AxisDirection::Y => {
            label_width += padding;
            if pos == AxisPosition::Left {
                axis.layout.left = offset.left + axis_margin;
                axis.layout.width = label_width;
                offset.left += label_width + axis_margin;
            } else {
                offset.right += label_width + axis_margin;
                axis.layout.left = surface_width - offset.right;
                axis.layout.width = label_width;
            }
        }
    }

    axis.layout.padding = padding;
    axis.tick_length = tick_length;
    axis.innermost = placement.innermost;
}

/// Phase two: with the plot area settled, fill in the cross dimension.
pub fn allocate_axis_box_second_phase(
    axis: &mut Axis,
    offset: &Margins,
    surface_width: f64,
    surface_height: f64,
) {
    match axis.direction {
        AxisDirection::X => {
            axis.layout.left = offset.left - axis.label_width / 2.0;
            axis.layout.width = surface_width - offset.left - offset.right + axis.label_width;
        }
        AxisDirection::Y => {
            axis.layout.top = offset.top - axis.label_height / 2.0;
            axis.layout.height = surface_height - offset.bottom - offset.top + axis.label_height;
        }
    }
}

/// Grows the plot offset so point markers and the outermost tick labels do
/// not get clipped at the canvas edge.
///
/// Uses the overall label width/height rather than the actual outermost
/// label so the layout does not jump between replots.
pub fn adjust_layout_for_stickouts<'a>(
    offset: &mut Margins,
    min_margin: f64,
    axes: impl Iterator<Item = &'a Axis>,
) {
    let mut margins = Margins::uniform(min_margin);

    for axis in axes {
        if !axis.reserve_space || axis.ticks.is_empty() {
            continue;
        }
        match axis.direction {
            AxisDirection::X => {
                margins.left = margins.left.max(axis.label_width / 2.0);
                margins.right = margins.right.max(axis.label_width / 2.0);
            }
            AxisDirection::Y => {
                margins.bottom = margins.bottom.max(axis.label_height / 2.0);
                margins.top = margins.top.max(axis.label_height / 2.0);
            }
        }
    }

    offset.left = margins.left.max(offset.left).ceil();
    offset.right = margins.right.max(offset.right).ceil();
    offset.top = margins.top.max(offset.top).ceil();
    offset.bottom = margins.bottom.max(offset.bottom).ceil();
}
