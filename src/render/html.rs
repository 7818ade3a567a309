//! Self-contained HTML rendering of the stats page

use super::escape_html;
use crate::page::{PageOptions, StatsPage, Status};
use crate::params::{SortDirection, ViewParams};
use crate::table::{RenderedTable, Target};

/// Render the whole page as an HTML document
pub fn render_page(page: &StatsPage) -> String {
    let params = page.params();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Agent Statistics - {stat1} vs {stat2}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>Agent Statistics</h1>
        {selectors}
        <div id="stats_table_root">{root}</div>
    </div>
    <script>{js}</script>
</body>
</html>"#,
        stat1 = escape_html(&params.stat1),
        stat2 = escape_html(&params.stat2),
        css = inline_css(),
        selectors = render_selectors(page),
        root = render_root(page),
        js = inline_javascript(),
    )
}

fn render_selectors(page: &StatsPage) -> String {
    let params = page.params();
    format!(
        r#"<form class="selectors" data-base="{base}">
            <label for="stat1">Stat 1</label>
            <select id="stat1" name="stat1">{options1}</select>
            <label for="stat2">Stat 2</label>
            <select id="stat2" name="stat2">{options2}</select>
        </form>"#,
        base = escape_html(page.base_url()),
        options1 = render_options(page, &params.stat1),
        options2 = render_options(page, &params.stat2),
    )
}

fn render_options(page: &StatsPage, selected: &str) -> String {
    page.fields()
        .iter()
        .map(|field| {
            let marker = if field == selected { " selected" } else { "" };
            format!(
                r#"<option value="{v}"{marker}>{v}</option>"#,
                v = escape_html(field),
                marker = marker
            )
        })
        .collect()
}

/// Whatever the output area last received
fn render_root(page: &StatsPage) -> String {
    match page.status().current() {
        Status::Idle => String::new(),
        Status::Error(message) => {
            format!(r#"<p class="status">{}</p>"#, escape_html(message))
        }
        Status::Rendered { .. } => match page.table() {
            Some(table) => render_table(page, &table.render(Target::Html)),
            None => String::new(),
        },
    }
}

/// Page lengths offered next to the table
const PAGE_LENGTHS: [usize; 4] = [10, 25, 50, 100];

fn render_table(page: &StatsPage, table: &RenderedTable) -> String {
    let current = page.current_params();
    let options = page.current_options();
    let mut html = render_controls(&current, &options);

    html.push_str(r#"<table id="statsTable"><thead><tr>"#);
    for header in &table.headers {
        if !header.sortable {
            html.push_str(&format!("<th>{}</th>", escape_html(&header.title)));
            continue;
        }
        let (class, next) = match header.sorted {
            Some(SortDirection::Asc) => ("sortable sorted-asc", SortDirection::Desc),
            Some(SortDirection::Desc) => ("sortable sorted-desc", SortDirection::Asc),
            None => ("sortable", SortDirection::Asc),
        };
        // A new order starts again from the first page
        let sorted_options = PageOptions {
            page: 0,
            ..options.clone()
        };
        let href = sorted_options.url(&current.with_sort(&header.name, next));
        html.push_str(&format!(
            r#"<th class="{class}" data-column="{name}"><a href="{href}">{title}</a></th>"#,
            class = class,
            name = escape_html(&header.name),
            href = escape_html(&href),
            title = escape_html(&header.title),
        ));
    }
    html.push_str("</tr></thead><tbody>");

    if table.rows.is_empty() {
        html.push_str(&format!(
            r#"<tr><td class="empty" colspan="{}">No matching records found</td></tr>"#,
            table.headers.len()
        ));
    }
    for row in &table.rows {
        html.push_str("<tr>");
        for (i, cell) in row.iter().enumerate() {
            // Cells other than the agent link are plain values
            if i == 1 {
                html.push_str(&format!("<td>{}</td>", cell));
            } else {
                html.push_str(&format!(r#"<td class="num">{}</td>"#, escape_html(cell)));
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");

    html.push_str(&format!(r#"<div class="info">{}</div>"#, table.info));
    html.push_str(&render_pager(&current, &options, table.info.pages));
    html
}

/// Search box and page length, submitted as a GET form that keeps the view parameters
fn render_controls(current: &ViewParams, options: &PageOptions) -> String {
    let hidden: String = [
        ("stat1", current.stat1.as_str()),
        ("stat2", current.stat2.as_str()),
        ("sort", current.sort.as_str()),
        ("order", current.order.as_str()),
    ]
    .iter()
    .map(|(name, value)| {
        format!(
            r#"<input type="hidden" name="{}" value="{}">"#,
            name,
            escape_html(value)
        )
    })
    .collect();

    let mut lengths = PAGE_LENGTHS.to_vec();
    if !lengths.contains(&options.page_length) {
        lengths.push(options.page_length);
    }
    let length_options: String = lengths
        .iter()
        .map(|&length| {
            let marker = if length == options.page_length { " selected" } else { "" };
            let label = if length == 0 { "All".to_string() } else { length.to_string() };
            format!(r#"<option value="{}"{}>{}</option>"#, length, marker, label)
        })
        .collect();

    format!(
        r#"<form class="table-controls" method="get" action="{action}">{hidden}
            <div class="search">
                <input type="search" name="search" placeholder="Search Agent" value="{search}">
                <button type="submit">Search</button>
            </div>
            <label>Show
                <select name="page_length" class="page-length">{length_options}</select>
            entries</label>
        </form>"#,
        action = escape_html(&options.base_url),
        hidden = hidden,
        search = escape_html(&options.search),
        length_options = length_options,
    )
}

/// Previous/next links around "Page X of Y"
fn render_pager(current: &ViewParams, options: &PageOptions, pages: usize) -> String {
    let link = |class: &str, label: &str, target: Option<usize>| match target {
        Some(page) => {
            let href = PageOptions {
                page,
                ..options.clone()
            }
            .url(current);
            format!(
                r#"<a class="{}" href="{}">{}</a>"#,
                class,
                escape_html(&href),
                label
            )
        }
        None => format!(r#"<span class="{} disabled">{}</span>"#, class, label),
    };

    let previous = options.page.checked_sub(1);
    let next = Some(options.page + 1).filter(|&p| p < pages);
    format!(
        r#"<div class="pager">{} <span class="current">Page {} of {}</span> {}</div>"#,
        link("previous", "Previous", previous),
        options.page + 1,
        pages,
        link("next", "Next", next),
    )
}

fn inline_css() -> &'static str {
    r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
    background: #111; color: #ddd; margin: 0;
}
.container { max-width: 1200px; margin: 0 auto; padding: 20px; }
.selectors { display: flex; gap: 10px; align-items: center; margin-bottom: 15px; }
.search input { padding: 4px 8px; }
table { border-collapse: collapse; width: 100%; }
th, td { padding: 6px 10px; border-bottom: 1px solid #333; white-space: nowrap; }
th { text-align: left; position: sticky; top: 0; background: #1b1b1b; }
th a { color: inherit; text-decoration: none; }
th.sorted-asc a::after { content: " \25B2"; }
th.sorted-desc a::after { content: " \25BC"; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
td.empty { text-align: center; color: #888; }
.table-controls { display: flex; gap: 20px; align-items: center; margin-bottom: 10px; }
.info, .pager { margin-top: 10px; color: #999; }
.pager a { color: #00c2ff; }
.pager .disabled { color: #555; }
.status { color: #f66; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
(function () {
  var controls = document.querySelector("form.table-controls");
  if (controls) {
    controls.querySelector("select.page-length").addEventListener("change", function () {
      controls.submit();
    });
  }
  var form = document.querySelector("form.selectors");
  if (!form) { return; }
  function updateURL() {
    var stat1 = document.getElementById("stat1").value;
    var stat2 = document.getElementById("stat2").value;
    window.location.href = form.dataset.base + "?stat1=" + encodeURIComponent(stat1) +
      "&stat2=" + encodeURIComponent(stat2) + "&sort=ratio&order=ASC";
  }
  document.getElementById("stat1").addEventListener("change", updateURL);
  document.getElementById("stat2").addEventListener("change", updateURL);
})();
"#
}
