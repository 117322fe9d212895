//! Experimental pilot implementation of the Gantt time-layout engine MVP.
//!
//! The crate packs time-bounded children into a minimal number of horizontal
//! rows for Gantt-style rendering: a pure time-to-x projection over the
//! visible window, per-parent-group row packing (stacking or tetris), and
//! cross-group row-offset accumulation into a single global row index. The
//! modules follow the RSB `MODULE_SPEC` pattern so we can eventually promote
//! the code into a production crate without major surgery.

pub mod engine;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod metrics;
pub mod pack;
pub mod time;

pub use engine::{CacheState, CollectionChange, GanttLayout};
pub use error::{GanttError, Result};
pub use geometry::LayoutBounds;
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use pack::{Packing, RowPacker};
pub use time::{TimePoint, TimeProjector, TimeReader, TimeWindow, UnitSpanReader};
