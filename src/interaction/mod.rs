//! Pointer events, hit-test results, highlights, and overlay redraw
//! pacing.

use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::options::RedrawInterval;

/// Pointer input in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { x: f64, y: f64 },
    Leave,
    Click { x: f64, y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Hover,
    Click,
}

/// Pointer position resolved against every used axis, keyed `x`, `x2`,
/// `y`, ... in axis order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotPosition {
    pub coords: IndexMap<String, f64>,
    /// Plot-area pixel coordinates the lookup started from.
    pub canvas_x: f64,
    pub canvas_y: f64,
}

impl PlotPosition {
    /// First-axis shorthand.
    #[must_use]
    pub fn x(&self) -> Option<f64> {
        self.coords.get("x").copied()
    }

    #[must_use]
    pub fn y(&self) -> Option<f64> {
        self.coords.get("y").copied()
    }
}

/// Hit-test result: the closest data item within the active radius.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyItem {
    pub series_index: usize,
    pub data_index: usize,
    /// The matched normalized tuple.
    pub datapoint: Vec<Option<f64>>,
    /// Plot-area pixel position of the matched point.
    pub canvas_x: f64,
    pub canvas_y: f64,
}

/// What a pointer event produced; delivered to the host after highlight
/// state is updated.
#[derive(Debug, Clone, PartialEq)]
pub struct EventReport {
    pub kind: PointerEventKind,
    pub position: PlotPosition,
    pub item: Option<NearbyItem>,
}

/// One highlighted data point on the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub series_index: usize,
    pub point: Vec<Option<f64>>,
    /// Set when the highlight was auto-applied by an event of this kind;
    /// manual highlights are `None` and survive auto-clearing.
    pub auto: Option<PointerEventKind>,
}

/// Coalesces overlay redraw requests.
///
/// The engine has no timer of its own; the host pumps `take_due` from its
/// frame loop. `request` returns `true` only in immediate mode, meaning
/// the caller must redraw synchronously instead of waiting for the pump.
#[derive(Debug, Clone)]
pub struct OverlayScheduler {
    interval: RedrawInterval,
    deadline: Option<Instant>,
}

impl OverlayScheduler {
    #[must_use]
    pub fn new(interval: RedrawInterval) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn set_interval(&mut self, interval: RedrawInterval) {
        self.interval = interval;
    }

    /// Requests a redraw. Repeated requests before the deadline coalesce
    /// into one.
    #[must_use]
    pub fn request(&mut self, now: Instant) -> bool {
        match self.interval {
            RedrawInterval::Immediate => true,
            RedrawInterval::DelayMs(ms) => {
                if self.deadline.is_none() {
                    self.deadline = Some(now + Duration::from_secs_f64(ms.max(0.0) / 1000.0));
                }
                false
            }
        }
    }

    /// Consumes a due request, if any.
    #[must_use]
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_coalesce_until_the_deadline_passes() {
        let mut scheduler = OverlayScheduler::new(RedrawInterval::DelayMs(10.0));
        let t0 = Instant::now();
        assert!(!scheduler.request(t0));
        assert!(!scheduler.request(t0 + Duration::from_millis(2)));
        assert!(!scheduler.take_due(t0 + Duration::from_millis(5)));
        assert!(scheduler.take_due(t0 + Duration::from_millis(11)));
        // consumed; nothing pending anymore
        assert!(!scheduler.take_due(t0 + Duration::from_millis(20)));
    }

    #[test]
    fn immediate_mode_never_queues() {
        let mut scheduler = OverlayScheduler::new(RedrawInterval::Immediate);
        let t0 = Instant::now();
        assert!(scheduler.request(t0));
        assert!(!scheduler.is_pending());
    }
}
