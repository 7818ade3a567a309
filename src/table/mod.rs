//! Sortable, searchable, paginated table
//!
//! The table owns its rows and all view state (search text, ordering, page).
//! Callers register [`ReorderHook`]s which run after every [`DataTable::draw`],
//! seeing every matching row in display order.

pub mod cell;
pub mod rank;

pub use cell::Cell;
pub use rank::RankResync;

use crate::params::SortDirection;
use std::fmt;

pub const DEFAULT_PAGE_LENGTH: usize = 10;

/// What a cell renderer is producing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Html,
    Text,
}

type DataFn<R> = Box<dyn Fn(&R) -> Cell>;
type RenderFn<R> = Box<dyn Fn(&R, Target) -> String>;
type WriteFn<R> = Box<dyn Fn(&mut R, Cell)>;

/// A column definition
pub struct Column<R> {
    pub name: String,
    pub title: String,
    pub sortable: bool,
    pub searchable: bool,
    data: DataFn<R>,
    render: Option<RenderFn<R>>,
    write: Option<WriteFn<R>>,
}

impl<R> Column<R> {
    pub fn new(name: &str, title: &str, data: impl Fn(&R) -> Cell + 'static) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            sortable: true,
            searchable: true,
            data: Box::new(data),
            render: None,
            write: None,
        }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn unsearchable(mut self) -> Self {
        self.searchable = false;
        self
    }

    /// Custom per-cell rendering; without one the cell's `Display` is used
    pub fn render_with(mut self, render: impl Fn(&R, Target) -> String + 'static) -> Self {
        self.render = Some(Box::new(render));
        self
    }

    /// Allow reorder hooks to overwrite this column
    pub fn writable(mut self, write: impl Fn(&mut R, Cell) + 'static) -> Self {
        self.write = Some(Box::new(write));
        self
    }

    pub fn data(&self, row: &R) -> Cell {
        (self.data)(row)
    }

    pub fn render(&self, row: &R, target: Target) -> String {
        match &self.render {
            Some(render) => render(row, target),
            None => self.data(row).to_string(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("searchable", &self.searchable)
            .finish()
    }
}

/// Initial ordering by column name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: SortDirection,
}

/// Initial view state of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    pub order: Option<Order>,
    pub search: String,
    /// Rows per page; 0 shows everything on one page
    pub page_length: usize,
    /// 0-based
    pub page: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            order: None,
            search: String::new(),
            page_length: DEFAULT_PAGE_LENGTH,
            page: 0,
        }
    }
}

/// Rows matching the current search, in current display order
pub struct AppliedRows<'a, R> {
    rows: &'a mut [R],
    order: &'a [usize],
    columns: &'a [Column<R>],
}

impl<R> AppliedRows<'_, R> {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&R> {
        self.order.get(position).map(|&idx| &self.rows[idx])
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Overwrite `column` for every applied row, top to bottom. `value` gets
    /// the 0-based display position. Returns false if the column is missing
    /// or not writable.
    pub fn update_column(&mut self, column: usize, mut value: impl FnMut(usize) -> Cell) -> bool {
        let Some(write) = self.columns.get(column).and_then(|c| c.write.as_ref()) else {
            return false;
        };
        for (position, &idx) in self.order.iter().enumerate() {
            write(&mut self.rows[idx], value(position));
        }
        true
    }
}

/// Notified after every draw that may have changed which rows match or their order
pub trait ReorderHook<R> {
    fn after_reorder(&mut self, rows: &mut AppliedRows<'_, R>);
}

/// Paging summary, e.g. "Showing 1 to 10 of 57 entries"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based first row shown, 0 when nothing matches
    pub start: usize,
    pub end: usize,
    pub matching: usize,
    pub total: usize,
    /// 0-based
    pub page: usize,
    pub pages: usize,
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} entries",
            self.start, self.end, self.matching
        )?;
        if self.matching != self.total {
            write!(f, " (filtered from {} total entries)", self.total)?;
        }
        Ok(())
    }
}

/// Header of a rendered column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub name: String,
    pub title: String,
    pub sortable: bool,
    pub sorted: Option<SortDirection>,
}

/// The current page, rendered cell by cell
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<String>>,
    pub info: PageInfo,
    pub search: String,
}

pub struct DataTable<R> {
    columns: Vec<Column<R>>,
    rows: Vec<R>,
    /// Indices into `rows` after search and ordering
    applied: Vec<usize>,
    order: Option<(usize, SortDirection)>,
    search: String,
    page_length: usize,
    page: usize,
    hooks: Vec<Box<dyn ReorderHook<R>>>,
    draws: u64,
}

impl<R> DataTable<R> {
    /// Build a table. Nothing is searched or ordered until the first [`draw`](Self::draw).
    pub fn new(rows: Vec<R>, columns: Vec<Column<R>>, options: TableOptions) -> Self {
        let applied = (0..rows.len()).collect();
        let mut table = Self {
            columns,
            rows,
            applied,
            order: None,
            search: options.search,
            page_length: options.page_length,
            page: options.page,
            hooks: Vec::new(),
            draws: 0,
        };
        if let Some(order) = options.order {
            table.order_by(&order.column, order.direction);
        }
        table
    }

    pub fn on_reorder(&mut self, hook: Box<dyn ReorderHook<R>>) {
        self.hooks.push(hook);
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// Set the search text; takes effect on the next draw
    pub fn search(&mut self, text: &str) -> &mut Self {
        self.search = text.trim().to_string();
        self
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    /// Order by a column, matched by name case-insensitively. Unknown and
    /// unsortable columns are ignored and reported as false.
    pub fn order_by(&mut self, name: &str, direction: SortDirection) -> bool {
        let found = self
            .columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name));

        match found {
            Some(idx) if self.columns[idx].sortable => {
                self.order = Some((idx, direction));
                true
            }
            Some(_) => {
                log::warn!("Column '{}' is not sortable", name);
                false
            }
            None => {
                log::warn!("No column named '{}' to sort by", name);
                false
            }
        }
    }

    pub fn current_order(&self) -> Option<(&str, SortDirection)> {
        self.order
            .map(|(idx, dir)| (self.columns[idx].name.as_str(), dir))
    }

    /// Recompute matching rows and their order, then run the reorder hooks
    pub fn draw(&mut self) -> &mut Self {
        self.applied = self.search_and_order();
        self.clamp_page();

        let mut applied = AppliedRows {
            rows: &mut self.rows,
            order: &self.applied,
            columns: &self.columns,
        };
        for hook in self.hooks.iter_mut() {
            hook.after_reorder(&mut applied);
        }

        self.draws += 1;
        log::debug!(
            "Draw {}: {} of {} rows match",
            self.draws,
            self.applied.len(),
            self.rows.len()
        );
        self
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Change page (0-based, clamped). Does not redraw.
    pub fn set_page(&mut self, page: usize) -> &mut Self {
        self.page = page;
        self.clamp_page();
        self
    }

    /// Change page length, keeping the first visible row on screen
    pub fn set_page_length(&mut self, page_length: usize) -> &mut Self {
        let first = self.page * self.page_length;
        self.page_length = page_length;
        self.page = if page_length == 0 { 0 } else { first / page_length };
        self.clamp_page();
        self
    }

    pub fn page_length(&self) -> usize {
        self.page_length
    }

    /// All rows matching the search, in display order
    pub fn applied(&self) -> Vec<&R> {
        self.applied.iter().map(|&idx| &self.rows[idx]).collect()
    }

    /// Rows on the current page
    pub fn page_rows(&self) -> Vec<&R> {
        let (start, end) = self.page_bounds();
        self.applied[start..end]
            .iter()
            .map(|&idx| &self.rows[idx])
            .collect()
    }

    pub fn info(&self) -> PageInfo {
        let (start, end) = self.page_bounds();
        PageInfo {
            start: if start < end { start + 1 } else { 0 },
            end,
            matching: self.applied.len(),
            total: self.rows.len(),
            page: self.page,
            pages: self.page_count(),
        }
    }

    /// Render the current page
    pub fn render(&self, target: Target) -> RenderedTable {
        let sorted = self.order;
        let headers = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, c)| HeaderCell {
                name: c.name.clone(),
                title: c.title.clone(),
                sortable: c.sortable,
                sorted: sorted.filter(|(i, _)| *i == idx).map(|(_, dir)| dir),
            })
            .collect();

        let rows = self
            .page_rows()
            .into_iter()
            .map(|row| self.columns.iter().map(|c| c.render(row, target)).collect())
            .collect();

        RenderedTable {
            headers,
            rows,
            info: self.info(),
            search: self.search.clone(),
        }
    }

    fn search_and_order(&self) -> Vec<usize> {
        let terms: Vec<String> = self
            .search
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();

        let mut applied: Vec<usize> = (0..self.rows.len())
            .filter(|&idx| terms.is_empty() || self.row_matches(&self.rows[idx], &terms))
            .collect();

        if let Some((col, direction)) = self.order {
            let column = &self.columns[col];
            // sort_by is stable, so ties keep source order
            applied.sort_by(|&a, &b| {
                let cmp = column.data(&self.rows[a]).compare(&column.data(&self.rows[b]));
                match direction {
                    SortDirection::Asc => cmp,
                    SortDirection::Desc => cmp.reverse(),
                }
            });
        }

        applied
    }

    fn row_matches(&self, row: &R, terms: &[String]) -> bool {
        let haystack = self
            .columns
            .iter()
            .filter(|c| c.searchable)
            .map(|c| c.render(row, Target::Text).to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        terms.iter().all(|t| haystack.contains(t.as_str()))
    }

    fn page_count(&self) -> usize {
        if self.page_length == 0 {
            return 1;
        }
        self.applied.len().div_ceil(self.page_length).max(1)
    }

    fn clamp_page(&mut self) {
        self.page = self.page.min(self.page_count() - 1);
    }

    fn page_bounds(&self) -> (usize, usize) {
        let len = self.applied.len();
        if self.page_length == 0 {
            return (0, len);
        }
        let start = (self.page * self.page_length).min(len);
        let end = (start + self.page_length).min(len);
        (start, end)
    }
}
