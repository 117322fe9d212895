//! Time module orchestrator following the RSB module specification.
//!
//! Downstream code imports the timeline traits and the projector from here
//! while the implementation details live in the private `core` module.

mod core;

pub use core::{TimePoint, TimeProjector, TimeReader, TimeWindow, UnitSpanReader};
