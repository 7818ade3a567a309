//! Column set of the stats comparison table

use crate::model::{DerivedRow, FieldName, FieldSelection};
use crate::render::{escape_html, format_fixed, format_with_commas};
use crate::table::{Cell, Column, Target};

pub const PROFILE_URL: &str = "https://link.ingress.com/?link=https://intel.ingress.com/agent/";

/// Decimal places shown for ratio columns
const RATIO_DECIMALS: usize = 7;

/// Rank, Agent Name, the two selected stats, Ratio, Ratio % and Difference.
/// Rank is always the first column.
pub fn stats_columns(selection: &FieldSelection) -> Vec<Column<DerivedRow>> {
    vec![
        Column::new("index", "Rank", |r: &DerivedRow| Cell::Int(r.display_index as i64))
            .unsortable()
            .unsearchable()
            .writable(|r: &mut DerivedRow, cell| {
                if let Some(rank) = cell.as_i64() {
                    r.display_index = rank.max(0) as usize;
                }
            }),
        Column::new("agent_name", "Agent Name", |r: &DerivedRow| {
            Cell::Text(r.agent_name.clone())
        })
        .unsortable()
        .render_with(render_agent),
        metric_column(&selection.stat1),
        metric_column(&selection.stat2),
        Column::new("ratio", "Ratio", |r: &DerivedRow| Cell::Number(r.ratio))
            .render_with(|r: &DerivedRow, _| format_fixed(r.ratio, RATIO_DECIMALS)),
        Column::new("ratiopercent", "Ratio %", |r: &DerivedRow| {
            Cell::Number(r.ratio_percent)
        })
        .render_with(|r: &DerivedRow, _| format_fixed(r.ratio_percent, RATIO_DECIMALS)),
        Column::new("difference", "Difference", |r: &DerivedRow| {
            Cell::Number(r.difference)
        })
        .render_with(|r: &DerivedRow, _| format_with_commas(r.difference)),
    ]
}

fn metric_column(field: &FieldName) -> Column<DerivedRow> {
    let data_field = field.clone();
    let render_field = field.clone();
    Column::new(field.as_str(), field.as_str(), move |r: &DerivedRow| {
        Cell::Number(r.metric(&data_field).unwrap_or_default())
    })
    .render_with(move |r: &DerivedRow, _| {
        format_with_commas(r.metric(&render_field).unwrap_or_default())
    })
}

/// Faction icon plus a profile link in the faction colour
fn render_agent(row: &DerivedRow, target: Target) -> String {
    match target {
        Target::Text => row.agent_name.clone(),
        Target::Html => {
            let name = escape_html(&row.agent_name);
            format!(
                r#"<img src="{logo}" alt="{faction} logo" style="height: 20px; vertical-align: middle; margin-right: 5px;"><a href="{profile}{name}" target="_blank" style="color: {color};">{name}</a>"#,
                logo = row.style.logo,
                faction = escape_html(&row.faction),
                profile = PROFILE_URL,
                name = name,
                color = row.style.color,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use crate::model::{MetricFields, RawRecord};

    fn rows() -> (FieldSelection, Vec<DerivedRow>) {
        let selection =
            MetricFields::from_headers(&["agent_name", "faction", "explorer", "pioneer"])
                .select("explorer", "pioneer")
            .unwrap();
        let records = vec![RawRecord::new()
            .with("agent_name", "Alpha")
            .with("faction", "RES")
            .with("explorer", "1234567")
            .with("pioneer", "2500")];
        let rows = derive(&records, &selection).rows;
        (selection, rows)
    }

    #[test]
    fn test_column_order_and_flags() {
        let (selection, _) = rows();
        let columns = stats_columns(&selection);
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "index",
                "agent_name",
                "explorer",
                "pioneer",
                "ratio",
                "ratiopercent",
                "difference",
            ]
        );
        let sortable: Vec<bool> = columns.iter().map(|c| c.sortable).collect();
        assert_eq!(sortable, vec![false, false, true, true, true, true, true]);
        assert_eq!(columns[5].title, "Ratio %");
    }

    #[test]
    fn test_cell_rendering() {
        let (selection, rows) = rows();
        let columns = stats_columns(&selection);
        let row = &rows[0];

        let text: Vec<String> = columns.iter().map(|c| c.render(row, Target::Text)).collect();
        assert_eq!(
            text,
            vec!["1", "Alpha", "1,234,567", "2,500", "493.8268000", "0.2025001", "1,232,067"]
        );

        let html = columns[1].render(row, Target::Html);
        assert!(html.contains(r#"src="icons/Resistance_Logo.webp""#));
        assert!(
            html.contains("https://link.ingress.com/?link=https://intel.ingress.com/agent/Alpha")
        );
        assert!(html.contains("color: #00c2ff;"));
    }

    #[test]
    fn test_rank_column_is_writable() {
        let (selection, mut rows) = rows();
        let columns = stats_columns(&selection);
        let mut table = crate::table::DataTable::new(
            std::mem::take(&mut rows),
            columns,
            crate::table::TableOptions::default(),
        );
        table.search("alpha");
        table.on_reorder(Box::new(crate::table::RankResync::new()));
        table.draw();
        assert_eq!(table.applied()[0].display_index, 1);
    }
}
