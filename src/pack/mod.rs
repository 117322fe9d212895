//! Row-packing module orchestrator following the RSB module specification.

mod core;

pub use core::{Packing, RowPacker};
