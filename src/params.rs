//! View parameters carried in the page URL

use std::fmt;
use url::form_urlencoded;

pub const DEFAULT_STAT1: &str = "explorer";
pub const DEFAULT_STAT2: &str = "pioneer";
pub const DEFAULT_SORT: &str = "ratio";
pub const DEFAULT_PAGE: &str = "stats.html";

/// Sort direction of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive; unrecognised values fall back to ascending
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => {
                log::warn!("Unknown sort order '{}', using ASC", other);
                SortDirection::Asc
            }
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selection and initial sort state of the stats view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParams {
    pub stat1: String,
    pub stat2: String,
    pub sort: String,
    pub order: SortDirection,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            stat1: DEFAULT_STAT1.to_string(),
            stat2: DEFAULT_STAT2.to_string(),
            sort: DEFAULT_SORT.to_string(),
            order: SortDirection::Asc,
        }
    }
}

impl ViewParams {
    /// Read parameters from a query string. Accepts `a=b&c=d`, `?a=b`, or a
    /// whole URL. Missing and empty values use the defaults.
    pub fn from_query(input: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query_string(input).as_bytes()) {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "stat1" => params.stat1 = value.into_owned(),
                "stat2" => params.stat2 = value.into_owned(),
                "sort" => params.sort = value.into_owned(),
                "order" => params.order = SortDirection::parse(&value),
                // Table state, read by PageOptions
                "search" | "page" | "page_length" => {}
                other => log::debug!("Ignoring query parameter '{}'", other),
            }
        }
        params
    }

    /// Encode as a query string (without the leading `?`)
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        self.append_pairs(&mut query);
        query.finish()
    }

    /// Add the four view parameters to a query being built
    pub fn append_pairs(&self, query: &mut form_urlencoded::Serializer<'_, String>) {
        query
            .append_pair("stat1", &self.stat1)
            .append_pair("stat2", &self.stat2)
            .append_pair("sort", &self.sort)
            .append_pair("order", self.order.as_str());
    }

    /// Same view sorted by another column
    pub fn with_sort(&self, column: &str, order: SortDirection) -> Self {
        Self {
            sort: column.to_string(),
            order,
            ..self.clone()
        }
    }

    /// URL for this view on the given page
    pub fn url(&self, base: &str) -> String {
        format!("{}?{}", base, self.to_query())
    }
}

/// The query part of `input`: everything after `?` in a URL, or the whole
/// value when it already looks like `a=b`. Fragments are dropped.
pub fn query_string(input: &str) -> &str {
    let query = match input.find('?') {
        Some(idx) => &input[idx + 1..],
        None if input.contains('=') => input,
        None => "",
    };
    query.split('#').next().unwrap_or("")
}

/// URL to navigate to when the metric selection changes. Sort state is
/// reset to the defaults.
pub fn selection_url(base: &str, stat1: &str, stat2: &str) -> String {
    ViewParams {
        stat1: stat1.to_string(),
        stat2: stat2.to_string(),
        ..ViewParams::default()
    }
    .url(base)
}
