//! Plain-text rendering for terminals

use crate::page::{StatsPage, Status};
use crate::table::Target;

/// Render the current page as an aligned text table
pub fn render_text(page: &StatsPage) -> String {
    let table = match (page.status().current(), page.table()) {
        (Status::Error(message), _) => return format!("{}\n", message),
        (Status::Rendered { .. }, Some(table)) => table.render(Target::Text),
        _ => return String::new(),
    };

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.title.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let params = page.params();
    out.push_str(&format!("{} vs {}\n", params.stat1, params.stat2));
    if !table.search.is_empty() {
        out.push_str(&format!("Search: {}\n", table.search));
    }
    out.push('\n');

    let header: Vec<String> = table
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h.title, w = *w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                // Agent names left-aligned, numbers right-aligned
                if i == 1 {
                    format!("{:<w$}", cell, w = *w)
                } else {
                    format!("{:>w$}", cell, w = *w)
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!(
        "{} (page {} of {})\n",
        table.info,
        table.info.page + 1,
        table.info.pages
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageOptions;
    use crate::params::ViewParams;
    use crate::source::parse_dataset;

    #[test]
    fn test_render_text() {
        let csv = "agent_name,faction,explorer,pioneer\nAlpha,RES,1200,300\nBo,ENL,20,40\n";
        let page = StatsPage::from_dataset(
            parse_dataset(csv.as_bytes()).unwrap(),
            ViewParams::default(),
            PageOptions::default(),
        );
        let text = render_text(&page);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "explorer vs pioneer");
        assert_eq!(
            lines[2],
            "Rank  Agent Name  explorer  pioneer  Ratio      Ratio %      Difference"
        );
        assert_eq!(
            lines[4],
            "   1  Bo                20       40  0.5000000  200.0000000          20"
        );
        assert_eq!(
            lines[5],
            "   2  Alpha          1,200      300  4.0000000   25.0000000         900"
        );
        assert_eq!(lines[7], "Showing 1 to 2 of 2 entries (page 1 of 1)");
    }

    #[test]
    fn test_render_text_error() {
        let csv = "agent_name,faction,explorer\nAlpha,RES,1\n";
        let page = StatsPage::from_dataset(
            parse_dataset(csv.as_bytes()).unwrap(),
            ViewParams::default(),
            PageOptions::default(),
        );
        assert!(render_text(&page).starts_with("Unknown field 'pioneer'"));
    }
}
