/// Row assignment policy for one parent group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Packing {
    /// Greedy placement in strict traversal order: a new row opens whenever
    /// the current row's last interval overlaps the incoming child, and a
    /// closed row is never revisited. Callers are expected to feed children
    /// sorted by start time for a minimal row count.
    #[default]
    Stacking,
    /// First-fit placement: the child lands in the first row (creation
    /// order) whose most recent interval ends at or before the child's
    /// start, reusing rows vacated in time. Never produces more rows than
    /// stacking for the same input.
    Tetris,
}

/// Half-open horizontal span `[start_x, end_x)` occupied by a placed child.
#[derive(Debug, Clone, Copy)]
struct Interval {
    start_x: f64,
    end_x: f64,
}

impl Interval {
    fn overlaps(&self, start_x: f64, end_x: f64) -> bool {
        self.start_x < end_x && start_x < self.end_x
    }
}

#[derive(Debug, Clone, Default)]
struct PackedRow {
    placed: Vec<Interval>,
}

impl PackedRow {
    fn last(&self) -> Option<&Interval> {
        self.placed.last()
    }

    fn place(&mut self, start_x: f64, end_x: f64) {
        self.placed.push(Interval { start_x, end_x });
    }
}

/// Packs the children of one parent group into non-overlapping rows.
///
/// The row list survives between passes as the group's cache, so
/// `rows_count` stays answerable after a pass completes. `begin_pass`
/// clears only per-pass occupancy; `clean_cache` discards everything so the
/// next full re-scan rebuilds assignments from scratch.
#[derive(Debug, Default)]
pub struct RowPacker {
    rows: Vec<PackedRow>,
    active_rows: usize,
    cursor: usize,
}

impl RowPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh pass over this group's children. Per-pass scratch
    /// state (row occupancy, the stacking cursor) resets; the row list is
    /// kept and its slots are reused as rows reopen.
    pub fn begin_pass(&mut self) {
        for row in &mut self.rows {
            row.placed.clear();
        }
        self.active_rows = 0;
        self.cursor = 0;
    }

    /// Assigns the next child (in traversal order) a local row index.
    pub fn assign_row(&mut self, start_x: f64, end_x: f64, packing: Packing) -> usize {
        let row_index = match packing {
            Packing::Stacking => self.stack(start_x, end_x),
            Packing::Tetris => self.first_fit(start_x),
        };
        self.rows[row_index].place(start_x, end_x);
        row_index
    }

    /// Number of rows opened so far in the current pass.
    pub fn rows_count(&self) -> usize {
        self.active_rows
    }

    /// Drops all occupancy state. Called when the child collection changed
    /// structurally; the packer holds no irrecoverable references, so a
    /// complete re-scan of the group's children rebuilds every assignment.
    pub fn clean_cache(&mut self) {
        self.rows.clear();
        self.active_rows = 0;
        self.cursor = 0;
    }

    fn stack(&mut self, start_x: f64, end_x: f64) -> usize {
        if self.active_rows == 0 {
            self.cursor = self.open_row();
        } else if self.rows[self.cursor]
            .last()
            .is_some_and(|last| last.overlaps(start_x, end_x))
        {
            self.cursor = self.open_row();
        }
        self.cursor
    }

    fn first_fit(&mut self, start_x: f64) -> usize {
        for index in 0..self.active_rows {
            if self.rows[index]
                .last()
                .is_none_or(|last| last.end_x <= start_x)
            {
                return index;
            }
        }
        self.open_row()
    }

    fn open_row(&mut self) -> usize {
        let index = self.active_rows;
        if index == self.rows.len() {
            self.rows.push(PackedRow::default());
        }
        self.active_rows += 1;
        index
    }
}
