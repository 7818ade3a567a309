//! Page controller: load, derive, build the table, track what is shown

use crate::columns::stats_columns;
use crate::derive::{derive, InvalidRecord};
use crate::model::{Dataset, DerivedRow, FieldSelection, MetricFields};
use crate::params::{query_string, selection_url, SortDirection, ViewParams, DEFAULT_PAGE};
use crate::source::{load_dataset, Source};
use crate::table::{DataTable, Order, RankResync, TableOptions, DEFAULT_PAGE_LENGTH};
use url::form_urlencoded;

/// What the page's output area currently holds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Error(String),
    Rendered { draws: u64 },
}

/// The single output area. Every write replaces the previous one, so a
/// row warning written during derivation is hidden by the table render
/// that follows it.
#[derive(Debug, Clone, Default)]
pub struct StatusSlot {
    current: Status,
}

impl StatusSlot {
    pub fn write(&mut self, status: Status) {
        self.current = status;
    }

    pub fn current(&self) -> &Status {
        &self.current
    }

    pub fn error(&self) -> Option<&str> {
        match &self.current {
            Status::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Table state (search, page, page length) and the page the URLs point at.
/// Carried in the URL next to the view parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    /// Page the view URLs point at
    pub base_url: String,
    pub search: String,
    pub page_length: usize,
    /// 0-based
    pub page: usize,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PAGE.to_string(),
            search: String::new(),
            page_length: DEFAULT_PAGE_LENGTH,
            page: 0,
        }
    }
}

impl PageOptions {
    /// Read `search`, `page` (1-based) and `page_length` from a query string
    /// or URL. Missing or malformed values keep the defaults.
    pub fn from_query(input: &str) -> Self {
        let mut options = Self::default();
        for (key, value) in form_urlencoded::parse(query_string(input).as_bytes()) {
            match key.as_ref() {
                "search" => options.search = value.trim().to_string(),
                "page" | "page_length" if value.is_empty() => {}
                "page" => match value.parse::<usize>() {
                    Ok(page) => options.page = page.saturating_sub(1),
                    Err(_) => log::warn!("Ignoring page '{}'", value),
                },
                "page_length" => match value.parse::<usize>() {
                    Ok(length) => options.page_length = length,
                    Err(_) => log::warn!("Ignoring page length '{}'", value),
                },
                _ => {}
            }
        }
        options
    }

    /// URL for `params` with this table state. Values at their defaults are left out.
    pub fn url(&self, params: &ViewParams) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        params.append_pairs(&mut query);
        if !self.search.is_empty() {
            query.append_pair("search", &self.search);
        }
        if self.page > 0 {
            query.append_pair("page", &(self.page + 1).to_string());
        }
        if self.page_length != DEFAULT_PAGE_LENGTH {
            query.append_pair("page_length", &self.page_length.to_string());
        }
        format!("{}?{}", self.base_url, query.finish())
    }
}

pub struct StatsPage {
    params: ViewParams,
    base_url: String,
    fields: MetricFields,
    selection: Option<FieldSelection>,
    table: Option<DataTable<DerivedRow>>,
    rejected: Vec<InvalidRecord>,
    status: StatusSlot,
}

impl StatsPage {
    /// Load the source and build the page. Failures end up in the status slot.
    pub fn load(source: &Source, params: ViewParams, options: PageOptions) -> Self {
        match load_dataset(source) {
            Ok(dataset) => Self::from_dataset(dataset, params, options),
            Err(e) => {
                log::error!("Error loading the CSV file: {}", e);
                let mut page = Self::empty(params, &options, MetricFields::default());
                page.status
                    .write(Status::Error(format!("Error loading CSV file. Error: {}", e)));
                page
            }
        }
    }

    /// Build the page from already loaded data
    pub fn from_dataset(dataset: Dataset, params: ViewParams, options: PageOptions) -> Self {
        let mut page = Self::empty(params, &options, dataset.metric_fields());

        let selection = match page.fields.select(&page.params.stat1, &page.params.stat2) {
            Ok(selection) => selection,
            Err(e) => {
                log::error!("{}", e);
                page.status.write(Status::Error(e.to_string()));
                return page;
            }
        };

        let derivation = derive(&dataset.records, &selection);
        for invalid in &derivation.rejected {
            page.status.write(Status::Error(invalid.to_string()));
        }

        let table_options = TableOptions {
            order: Some(Order {
                column: page.params.sort.clone(),
                direction: page.params.order,
            }),
            search: options.search,
            page_length: options.page_length,
            page: options.page,
        };
        let mut table = DataTable::new(derivation.rows, stats_columns(&selection), table_options);
        table.on_reorder(Box::new(RankResync::new()));

        page.selection = Some(selection);
        page.rejected = derivation.rejected;
        page.table = Some(table);
        page.redraw();
        page
    }

    fn empty(params: ViewParams, options: &PageOptions, fields: MetricFields) -> Self {
        Self {
            params,
            base_url: options.base_url.clone(),
            fields,
            selection: None,
            table: None,
            rejected: Vec::new(),
            status: StatusSlot::default(),
        }
    }

    /// Filter rows; ranks follow the new result
    pub fn search(&mut self, text: &str) {
        if let Some(table) = self.table.as_mut() {
            table.search(text);
        }
        self.redraw();
    }

    /// Sort by a column. Returns false if the column cannot be sorted.
    pub fn sort(&mut self, column: &str, direction: SortDirection) -> bool {
        let ordered = self
            .table
            .as_mut()
            .is_some_and(|t| t.order_by(column, direction));
        if ordered {
            self.redraw();
        }
        ordered
    }

    /// 0-based page. Ranks are not touched.
    pub fn set_page(&mut self, page: usize) {
        if let Some(table) = self.table.as_mut() {
            table.set_page(page);
        }
        self.rerender();
    }

    pub fn set_page_length(&mut self, page_length: usize) {
        if let Some(table) = self.table.as_mut() {
            table.set_page_length(page_length);
        }
        self.rerender();
    }

    fn redraw(&mut self) {
        if let Some(table) = self.table.as_mut() {
            table.draw();
        }
        self.rerender();
    }

    fn rerender(&mut self) {
        if let Some(table) = &self.table {
            self.status.write(Status::Rendered {
                draws: table.draws(),
            });
        }
    }

    /// Parameters the page was loaded with
    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    /// Parameters describing the current sort state
    pub fn current_params(&self) -> ViewParams {
        match self.table.as_ref().and_then(|t| t.current_order()) {
            Some((column, direction)) => self.params.with_sort(column, direction),
            None => self.params.clone(),
        }
    }

    /// Table state as currently shown
    pub fn current_options(&self) -> PageOptions {
        let mut options = PageOptions {
            base_url: self.base_url.clone(),
            ..PageOptions::default()
        };
        if let Some(table) = &self.table {
            options.search = table.search_text().to_string();
            options.page = table.info().page;
            options.page_length = table.page_length();
        }
        options
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fields(&self) -> &MetricFields {
        &self.fields
    }

    pub fn selection(&self) -> Option<&FieldSelection> {
        self.selection.as_ref()
    }

    pub fn table(&self) -> Option<&DataTable<DerivedRow>> {
        self.table.as_ref()
    }

    pub fn rejected(&self) -> &[InvalidRecord] {
        &self.rejected
    }

    pub fn status(&self) -> &StatusSlot {
        &self.status
    }

    /// Where to navigate when either metric selection changes
    pub fn selection_url(&self, stat1: &str, stat2: &str) -> String {
        selection_url(&self.base_url, stat1, stat2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_dataset;
    use std::path::PathBuf;

    const CSV: &str = "\
Rank,agent_name,faction,level,explorer,pioneer,builder
1,Alpha,RES,16,100,50,7
2,Bravo,ENL,15,abc,5,3
3,Charlie,res,14,20,40,9
4,Delta,ENL,12,300,100,1
5,Echo,ENL,11,10,0,2
";

    fn dataset() -> Dataset {
        parse_dataset(CSV.as_bytes()).unwrap()
    }

    fn ranks(page: &StatsPage) -> Vec<(usize, String)> {
        page.table()
            .unwrap()
            .applied()
            .iter()
            .map(|r| (r.display_index, r.agent_name.clone()))
            .collect()
    }

    #[test]
    fn test_default_view_sorts_by_ratio_ascending() {
        let page =
            StatsPage::from_dataset(dataset(), ViewParams::default(), PageOptions::default());

        // ratios: Alpha 2, Charlie 0.5, Delta 3, Echo 0 (guarded)
        assert_eq!(
            ranks(&page),
            vec![
                (1, "Echo".to_string()),
                (2, "Charlie".to_string()),
                (3, "Alpha".to_string()),
                (4, "Delta".to_string()),
            ]
        );
        assert_eq!(page.rejected().len(), 1);
        assert_eq!(page.status().current(), &Status::Rendered { draws: 1 });
    }

    #[test]
    fn test_render_overwrites_row_warning() {
        let page =
            StatsPage::from_dataset(dataset(), ViewParams::default(), PageOptions::default());
        assert_eq!(page.rejected()[0].agent_name, "Bravo");
        assert!(page.status().error().is_none());
    }

    #[test]
    fn test_search_and_sort_resync_ranks() {
        let mut page =
            StatsPage::from_dataset(dataset(), ViewParams::default(), PageOptions::default());
        assert!(page.sort("difference", SortDirection::Desc));
        // differences: Alpha 50, Charlie 20, Delta 200, Echo 10
        assert_eq!(ranks(&page)[0], (1, "Delta".to_string()));

        page.search("ch");
        assert_eq!(
            ranks(&page),
            vec![(1, "Charlie".to_string()), (2, "Echo".to_string())]
        );
        assert_eq!(page.status().current(), &Status::Rendered { draws: 3 });

        assert!(!page.sort("agent_name", SortDirection::Asc));
        assert_eq!(page.current_params().sort, "difference");
        assert_eq!(page.current_params().order, SortDirection::Desc);
    }

    #[test]
    fn test_paging_does_not_redraw() {
        let options = PageOptions {
            page_length: 2,
            ..PageOptions::default()
        };
        let mut page = StatsPage::from_dataset(dataset(), ViewParams::default(), options);
        page.set_page(1);

        let table = page.table().unwrap();
        let shown: Vec<usize> = table.page_rows().iter().map(|r| r.display_index).collect();
        assert_eq!(shown, vec![3, 4]);
        assert_eq!(page.status().current(), &Status::Rendered { draws: 1 });
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let params = ViewParams {
            stat1: "trekker".to_string(),
            ..ViewParams::default()
        };
        let page = StatsPage::from_dataset(dataset(), params, PageOptions::default());
        assert!(page.table().is_none());
        let message = page.status().error().unwrap();
        assert!(message.contains("trekker"));
        assert!(message.contains("builder, explorer, pioneer"));
    }

    #[test]
    fn test_load_failure_is_reported() {
        let source = Source::Path(PathBuf::from("/nonexistent/agent_statistics.csv"));
        let page = StatsPage::load(&source, ViewParams::default(), PageOptions::default());
        assert!(page.table().is_none());
        assert!(page
            .status()
            .error()
            .unwrap()
            .starts_with("Error loading CSV file. Error: "));
    }

    #[test]
    fn test_identity_column_is_not_selectable() {
        // level is an identity column, not a metric
        let params = ViewParams {
            stat1: "level".to_string(),
            ..ViewParams::default()
        };
        let page = StatsPage::from_dataset(dataset(), params, PageOptions::default());
        assert!(page.table().is_none());
        assert!(page.status().error().unwrap().starts_with("Unknown field 'level'"));
    }

    #[test]
    fn test_every_row_invalid_still_renders_empty_table() {
        let csv = "agent_name,faction,explorer,pioneer\nAlpha,RES,x,1\nBravo,ENL,2,\n";
        let page = StatsPage::from_dataset(
            parse_dataset(csv.as_bytes()).unwrap(),
            ViewParams::default(),
            PageOptions::default(),
        );
        assert_eq!(page.rejected().len(), 2);
        assert!(page.table().unwrap().applied().is_empty());
        assert_eq!(page.status().current(), &Status::Rendered { draws: 1 });
    }

    #[test]
    fn test_page_options_from_query() {
        let options = PageOptions::from_query(
            "stats.html?stat1=builder&search=+ch+&page=3&page_length=25",
        );
        assert_eq!(options.search, "ch");
        assert_eq!(options.page, 2);
        assert_eq!(options.page_length, 25);
        assert_eq!(options.base_url, "stats.html");

        let defaults = PageOptions::from_query("page=abc&page_length=&search=");
        assert_eq!(defaults, PageOptions::default());
    }

    #[test]
    fn test_page_options_url_keeps_table_state() {
        let options = PageOptions {
            search: "char lie".to_string(),
            page: 1,
            page_length: 25,
            ..PageOptions::default()
        };
        let url = options.url(&ViewParams::default());
        assert_eq!(
            url,
            "stats.html?stat1=explorer&stat2=pioneer&sort=ratio&order=ASC&search=char+lie&page=2&page_length=25"
        );
        assert_eq!(PageOptions::from_query(&url), options);

        // Defaults are left out
        assert_eq!(
            PageOptions::default().url(&ViewParams::default()),
            "stats.html?stat1=explorer&stat2=pioneer&sort=ratio&order=ASC"
        );
    }

    #[test]
    fn test_current_options_follow_the_table() {
        let options = PageOptions {
            page_length: 2,
            ..PageOptions::default()
        };
        let mut page = StatsPage::from_dataset(dataset(), ViewParams::default(), options);
        page.search("a");
        page.set_page(9);

        let current = page.current_options();
        assert_eq!(current.search, "a");
        assert_eq!(current.page_length, 2);
        // Alpha, Charlie, Delta match; the page is clamped to the last one
        assert_eq!(current.page, 1);
    }

    #[test]
    fn test_selection_url() {
        let page =
            StatsPage::from_dataset(dataset(), ViewParams::default(), PageOptions::default());
        assert_eq!(
            page.selection_url("builder", "explorer"),
            "stats.html?stat1=builder&stat2=explorer&sort=ratio&order=ASC"
        );
    }
}
