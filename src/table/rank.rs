use super::{AppliedRows, Cell, ReorderHook};

/// Rewrites a dense 1..N rank into a column of every matching row, in
/// display order, across all pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankResync {
    column: usize,
}

impl RankResync {
    /// Resync into the first column
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_column(column: usize) -> Self {
        Self { column }
    }
}

impl<R> ReorderHook<R> for RankResync {
    fn after_reorder(&mut self, rows: &mut AppliedRows<'_, R>) {
        let written = rows.update_column(self.column, |position| Cell::Int(position as i64 + 1));
        if !written {
            log::warn!("Rank column {} is not writable, ranks left as they were", self.column);
        }
    }
}
