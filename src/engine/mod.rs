//! Engine module orchestrator following the RSB module specification.

mod core;

pub use core::{CacheState, CollectionChange, GanttLayout};
