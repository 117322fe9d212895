use crate::error::{GanttError, Result};

/// A totally ordered timeline value measured in whole units of a single
/// granularity (days, months, ...) chosen by the caller.
pub trait TimePoint: Copy + Ord {
    /// Signed number of whole units from `self` to `other`.
    fn units_between(self, other: Self) -> i64;
}

impl TimePoint for i64 {
    fn units_between(self, other: Self) -> i64 {
        other - self
    }
}

impl TimePoint for i32 {
    fn units_between(self, other: Self) -> i64 {
        i64::from(other) - i64::from(self)
    }
}

/// Capability interface extracting the time span from an opaque child.
///
/// `end_time` is exclusive: the instant immediately after the child ends.
pub trait TimeReader<C> {
    type Time: TimePoint;

    fn start_time(&self, child: &C) -> Self::Time;
    fn end_time(&self, child: &C) -> Self::Time;
}

/// Reader for children that carry their own `(start, end)` unit span.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitSpanReader;

impl TimeReader<(i64, i64)> for UnitSpanReader {
    type Time = i64;

    fn start_time(&self, child: &(i64, i64)) -> i64 {
        child.0
    }

    fn end_time(&self, child: &(i64, i64)) -> i64 {
        child.1
    }
}

/// Visible timeline range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow<T> {
    pub start: T,
    pub end: T,
}

/// Projects timeline points onto horizontal pixel coordinates.
///
/// The window is unit-inclusive on both ends: a window covering `N` whole
/// units maps onto `[0, layout_width]` with each unit owning an equal share.
/// Pure over its window; no rounding is performed here (rounding, if any, is
/// a rendering concern).
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeProjector<T> {
    window: Option<TimeWindow<T>>,
}

impl<T: TimePoint> TimeProjector<T> {
    pub fn new() -> Self {
        Self { window: None }
    }

    /// Sets the visible window. Rejects a window whose end precedes its
    /// start; equal bounds describe a one-unit window.
    pub fn set_window(&mut self, start: T, end: T) -> Result<()> {
        if end < start {
            return Err(GanttError::InvalidWindow);
        }
        self.window = Some(TimeWindow { start, end });
        Ok(())
    }

    pub fn clear_window(&mut self) {
        self.window = None;
    }

    pub fn window(&self) -> Option<TimeWindow<T>> {
        self.window
    }

    /// Maps `time` to an x coordinate within `layout_width`.
    ///
    /// An exclusive start lands at the end of the unit before `time`; an
    /// inclusive end lands at the end of `time`'s own unit. A child spanning
    /// whole units therefore occupies pixels from the start of its first
    /// unit to the end of its last. Returns `0` while no window is set.
    pub fn time_to_x(&self, time: T, is_start: bool, is_exclusive: bool, layout_width: f64) -> f64 {
        let Some(window) = self.window else {
            return 0.0;
        };
        let total_units = window.start.units_between(window.end) + 1;
        let mut delta = window.start.units_between(time);
        if is_start && is_exclusive || !is_start && !is_exclusive {
            delta += 1;
        }
        layout_width * delta as f64 / total_units as f64
    }
}
