use serde::Serialize;

/// Mutable per-child layout record produced by a layout pass.
///
/// `min_x`/`width` come from the time projection; `row_index` is the global
/// row assigned by the packing engine. Vertical placement (`min_y`/`height`)
/// is derived by the hosting renderer from `row_index` and its configured row
/// height, so both stay at zero here. `max_x`/`max_y` are derived, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
    pub valid: bool,
    pub row_index: usize,
    pub column_index: usize,
}

impl LayoutBounds {
    pub const fn new(min_x: f64, width: f64, row_index: usize) -> Self {
        Self {
            min_x,
            min_y: 0.0,
            width,
            height: 0.0,
            valid: true,
            row_index,
            column_index: 0,
        }
    }

    /// Placeholder bounds awaiting recomputation.
    pub const fn invalid() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width: 0.0,
            height: 0.0,
            valid: false,
            row_index: 0,
            column_index: 0,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.min_x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.min_y + self.height
    }
}

impl Default for LayoutBounds {
    fn default() -> Self {
        Self::invalid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_derived_from_origin_and_extent() {
        let bounds = LayoutBounds::new(20.0, 20.0, 1);
        assert_eq!(bounds.max_x(), 40.0);
        assert_eq!(bounds.max_y(), 0.0);
        assert!(bounds.valid);
        assert_eq!(bounds.row_index, 1);
        assert_eq!(bounds.column_index, 0);
    }

    #[test]
    fn default_bounds_are_invalid() {
        let bounds = LayoutBounds::default();
        assert!(!bounds.valid);
        assert_eq!(bounds.max_x(), 0.0);
    }
}
