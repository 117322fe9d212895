use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

use crate::error::Result;
use crate::geometry::LayoutBounds;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv, json_str};
use crate::metrics::LayoutMetrics;
use crate::pack::{Packing, RowPacker};
use crate::time::{TimeProjector, TimeReader, TimeWindow};

/// Two-state marker for the group-index cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Clean,
    Dirty,
}

/// Structural change notification consumed from the hosting collection.
/// Content mutation of an existing child does not count; only membership
/// changes invalidate the packing caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionChange {
    Inserted,
    Removed,
}

/// Lays out time-bounded children into a minimal set of horizontal rows,
/// optionally grouped by a parent key.
///
/// Children stay externally owned; the engine only reads their time span
/// through the configured [`TimeReader`] and their group through the
/// optional parent reader. A pass over an unchanged collection and window is
/// deterministic: identical row indices and coordinates every time.
///
/// Not safe for concurrent mutation; callers serialize passes and change
/// notifications, and must not mutate the collection mid-pass.
pub struct GanttLayout<C, R, P = ()>
where
    R: TimeReader<C>,
    P: Eq + Hash + Clone,
{
    reader: R,
    parent_reader: Option<Box<dyn Fn(&C) -> Option<P>>>,
    projector: TimeProjector<R::Time>,
    layout_width: f64,
    packing: Packing,
    parent_rows: HashMap<Option<P>, RowPacker>,
    cache_state: CacheState,
    bounds: Vec<LayoutBounds>,
    logger: Option<Logger>,
    metrics: LayoutMetrics,
}

impl<C, R, P> GanttLayout<C, R, P>
where
    R: TimeReader<C>,
    P: Eq + Hash + Clone,
{
    /// A fresh engine starts dirty so the first `rows_count` query forces a
    /// full pass instead of reporting an empty cache as zero rows.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            parent_reader: None,
            projector: TimeProjector::new(),
            layout_width: 0.0,
            packing: Packing::Stacking,
            parent_rows: HashMap::new(),
            cache_state: CacheState::Dirty,
            bounds: Vec::new(),
            logger: None,
            metrics: LayoutMetrics::new(),
        }
    }

    /// Groups children by the key this reader yields. Without a reader (or
    /// for children yielding `None`) everything collapses into one implicit
    /// ungrouped namespace.
    pub fn with_parent_reader(mut self, reader: impl Fn(&C) -> Option<P> + 'static) -> Self {
        self.parent_reader = Some(Box::new(reader));
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn set_packing(&mut self, packing: Packing) {
        self.packing = packing;
    }

    pub fn set_layout_width(&mut self, layout_width: f64) {
        self.layout_width = layout_width;
    }

    /// Sets the visible window, inclusive on both ends.
    pub fn set_window(&mut self, start: R::Time, end: R::Time) -> Result<()> {
        self.projector.set_window(start, end)
    }

    pub fn window(&self) -> Option<TimeWindow<R::Time>> {
        self.projector.window()
    }

    pub fn projector(&self) -> &TimeProjector<R::Time> {
        &self.projector
    }

    pub fn cache_state(&self) -> CacheState {
        self.cache_state
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Bounds computed by the most recent pass, one entry per child in
    /// traversal order. Invalid entries are pending recomputation.
    pub fn bounds(&self) -> &[LayoutBounds] {
        &self.bounds
    }

    /// Marks the group index dirty. The next pass cleans every packer's
    /// cache against the collection it is handed.
    pub fn notify_children_changed(&mut self, _change: CollectionChange) {
        self.cache_state = CacheState::Dirty;
        for bounds in &mut self.bounds {
            bounds.valid = false;
        }
    }

    /// Runs one full layout pass: projection, per-group packing, and
    /// cross-group row-offset accumulation, in child traversal order.
    ///
    /// Offsets accumulate in first-encounter order of parent keys, so the
    /// group whose first child appears earliest owns the topmost rows. When
    /// consecutive children alternate groups, the previous group's current
    /// row count is added at every switch; callers wanting contiguous group
    /// bands feed children grouped by parent.
    pub fn layout_pass(&mut self, children: &[C]) -> &[LayoutBounds] {
        let pass_started = Instant::now();

        let cleaned = self.cache_state == CacheState::Dirty;
        if cleaned {
            for packer in self.parent_rows.values_mut() {
                packer.clean_cache();
            }
            self.cache_state = CacheState::Clean;
            self.metrics.record_cache_clean();
        }
        for packer in self.parent_rows.values_mut() {
            packer.begin_pass();
        }

        self.bounds.clear();
        self.bounds.reserve(children.len());

        let packing = self.packing;
        let mut current_key: Option<Option<P>> = None;
        let mut offset = 0usize;
        let mut groups_touched = 0usize;

        for child in children {
            let start_time = self.reader.start_time(child);
            let end_time = self.reader.end_time(child);
            // Child end times are exclusive instants, hence the flags.
            let start_x = self
                .projector
                .time_to_x(start_time, true, false, self.layout_width);
            let end_x = self
                .projector
                .time_to_x(end_time, false, true, self.layout_width);

            let key: Option<P> = self.parent_reader.as_ref().and_then(|read| read(child));
            if current_key.as_ref() != Some(&key) {
                if let Some(previous) = current_key.replace(key.clone()) {
                    offset += self
                        .parent_rows
                        .get(&previous)
                        .map(RowPacker::rows_count)
                        .unwrap_or(0);
                }
                groups_touched += 1;
            }

            let packer = self.parent_rows.entry(key).or_default();
            let local_row = packer.assign_row(start_x, end_x, packing);
            self.bounds
                .push(LayoutBounds::new(start_x, end_x - start_x, offset + local_row));
        }

        if cleaned {
            // Rebuilding the group index purges keys no longer present.
            self.parent_rows.retain(|_, packer| packer.rows_count() > 0);
        }

        let rows_total: usize = self.parent_rows.values().map(RowPacker::rows_count).sum();
        self.metrics
            .record_pass(children.len(), rows_total, groups_touched);

        if let Some(logger) = &self.logger {
            let event = event_with_fields(
                LogLevel::Debug,
                "gantt.engine",
                "layout_pass",
                [
                    json_kv("children", children.len()),
                    json_kv("groups", groups_touched),
                    json_kv("rows", rows_total),
                    json_kv("cache_cleaned", cleaned),
                    json_kv("elapsed_us", pass_started.elapsed().as_micros() as u64),
                    json_str(
                        "mode",
                        match packing {
                            Packing::Stacking => "stacking",
                            Packing::Tetris => "tetris",
                        },
                    ),
                ],
            );
            logger.log_event(event).ok();
        }

        &self.bounds
    }

    /// Total rows across all groups. While dirty this forces a full pass
    /// over `children` through the same code path that computes positions;
    /// per-group counts are only trustworthy once every group has been
    /// freshly scanned.
    pub fn rows_count(&mut self, children: &[C]) -> usize {
        if self.cache_state == CacheState::Dirty {
            self.layout_pass(children);
        }
        self.parent_rows.values().map(RowPacker::rows_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{MemorySink, Logger};
    use crate::time::UnitSpanReader;
    use serde_json::json;

    type Span = (i64, i64);

    fn ungrouped() -> GanttLayout<Span, UnitSpanReader> {
        let mut layout = GanttLayout::new(UnitSpanReader);
        layout.set_layout_width(100.0);
        layout.set_window(0, 9).expect("window");
        layout
    }

    fn grouped(
        groups: &'static [(&'static str, Span)],
    ) -> (GanttLayout<Span, UnitSpanReader, &'static str>, Vec<Span>) {
        let mut layout: GanttLayout<Span, UnitSpanReader, &'static str> =
            GanttLayout::new(UnitSpanReader).with_parent_reader(move |child: &Span| {
                groups
                    .iter()
                    .find(|entry| entry.1 == *child)
                    .map(|entry| entry.0)
            });
        layout.set_layout_width(100.0);
        layout.set_window(0, 9).expect("window");
        (layout, groups.iter().map(|(_, span)| *span).collect())
    }

    #[test]
    fn projection_and_stacking_scenario() {
        // Ten-day window, width 100. A=[0,3) and B=[2,5) overlap.
        let mut layout = ungrouped();
        let children = vec![(0, 3), (2, 5)];
        let bounds = layout.layout_pass(&children).to_vec();

        assert_eq!(bounds[0].min_x, 0.0);
        assert_eq!(bounds[0].max_x(), 30.0);
        assert_eq!(bounds[0].row_index, 0);
        assert_eq!(bounds[1].min_x, 20.0);
        assert_eq!(bounds[1].max_x(), 50.0);
        assert_eq!(bounds[1].row_index, 1);
        assert!(bounds.iter().all(|b| b.valid && b.column_index == 0));
    }

    #[test]
    fn tetris_reuses_the_vacated_first_row() {
        let mut layout = ungrouped();
        layout.set_packing(Packing::Tetris);
        let children = vec![(0, 3), (2, 5), (3, 5)];
        let bounds = layout.layout_pass(&children).to_vec();

        assert_eq!(bounds[0].row_index, 0);
        assert_eq!(bounds[1].row_index, 1);
        // Row 0's last child ends at unit 3, so C=[3,5) fits it.
        assert_eq!(bounds[2].row_index, 0);
        assert_eq!(layout.rows_count(&children), 2);
    }

    #[test]
    fn repeated_passes_are_deterministic() {
        let mut layout = ungrouped();
        let children = vec![(0, 3), (2, 5), (3, 5), (1, 2)];
        let first = layout.layout_pass(&children).to_vec();
        let second = layout.layout_pass(&children).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn groups_never_share_a_global_row() {
        let (mut layout, children) = grouped(&[
            ("alpha", (0, 2)),
            ("alpha", (1, 3)),
            ("beta", (5, 7)),
            ("beta", (6, 8)),
        ]);
        let bounds = layout.layout_pass(&children).to_vec();

        // Beta's spans do not overlap alpha's horizontally, yet its rows
        // start below alpha's two.
        assert_eq!(bounds[0].row_index, 0);
        assert_eq!(bounds[1].row_index, 1);
        assert_eq!(bounds[2].row_index, 2);
        assert_eq!(bounds[3].row_index, 3);
        assert_eq!(layout.rows_count(&children), 4);
    }

    #[test]
    fn missing_parent_reader_collapses_into_one_group() {
        let mut layout = ungrouped();
        layout.set_packing(Packing::Tetris);
        // Disjoint spans share row 0 because there is a single namespace.
        let children = vec![(0, 2), (5, 7)];
        let bounds = layout.layout_pass(&children).to_vec();
        assert_eq!(bounds[0].row_index, 0);
        assert_eq!(bounds[1].row_index, 0);
        assert_eq!(layout.rows_count(&children), 1);
    }

    #[test]
    fn empty_collection_has_zero_rows() {
        let mut layout = ungrouped();
        assert_eq!(layout.rows_count(&[]), 0);
        assert!(layout.bounds().is_empty());
    }

    #[test]
    fn dirty_rows_count_forces_a_full_pass() {
        let mut layout = ungrouped();
        let children = vec![(0, 3), (2, 5)];
        layout.layout_pass(&children);
        assert_eq!(layout.cache_state(), CacheState::Clean);

        layout.notify_children_changed(CollectionChange::Inserted);
        assert_eq!(layout.cache_state(), CacheState::Dirty);
        assert!(layout.bounds().iter().all(|b| !b.valid));

        let children = vec![(0, 3), (2, 5), (2, 4)];
        assert_eq!(layout.rows_count(&children), 3);
        assert_eq!(layout.cache_state(), CacheState::Clean);
        assert!(layout.bounds().iter().all(|b| b.valid));
    }

    #[test]
    fn cache_clean_matches_packing_from_scratch() {
        let (mut layout, mut children) = grouped(&[
            ("alpha", (0, 3)),
            ("alpha", (2, 5)),
            ("beta", (0, 4)),
        ]);
        assert_eq!(layout.rows_count(&children), 3);

        children.remove(1);
        layout.notify_children_changed(CollectionChange::Removed);
        let recount = layout.rows_count(&children);

        let (mut fresh, _) = grouped(&[("alpha", (0, 3)), ("beta", (0, 4))]);
        assert_eq!(recount, fresh.rows_count(&children));
        assert_eq!(recount, 2);
    }

    #[test]
    fn unset_window_projects_every_child_to_zero() {
        let mut layout: GanttLayout<Span, UnitSpanReader> = GanttLayout::new(UnitSpanReader);
        layout.set_layout_width(100.0);
        let children = vec![(2, 4)];
        let bounds = layout.layout_pass(&children).to_vec();
        assert_eq!(bounds[0].min_x, 0.0);
        assert_eq!(bounds[0].width, 0.0);
        assert!(bounds[0].valid);
    }

    #[test]
    fn pass_emits_a_structured_summary_event() {
        let sink = MemorySink::new();
        let mut layout: GanttLayout<Span, UnitSpanReader> =
            GanttLayout::new(UnitSpanReader).with_logger(Logger::new(sink.clone()));
        layout.set_layout_width(100.0);
        layout.set_window(0, 9).expect("window");

        layout.layout_pass(&[(0, 3), (2, 5)]);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "layout_pass");
        assert_eq!(events[0].fields.get("children"), Some(&json!(2)));
        assert_eq!(events[0].fields.get("rows"), Some(&json!(2)));
        assert_eq!(events[0].fields.get("mode"), Some(&json!("stacking")));
    }

    #[test]
    fn metrics_accumulate_across_passes() {
        let mut layout = ungrouped();
        let children = vec![(0, 3), (2, 5)];
        layout.layout_pass(&children);
        layout.layout_pass(&children);

        let snapshot = layout.metrics().snapshot();
        assert_eq!(snapshot.passes, 2);
        assert_eq!(snapshot.children_placed, 4);
        // Only the first pass found the engine dirty.
        assert_eq!(snapshot.cache_cleans, 1);
    }
}
