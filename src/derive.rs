//! Turning raw records into comparison rows

use crate::model::{DerivedRow, FieldSelection, RawRecord};
use std::fmt;

/// A record dropped because a selected field was not numeric
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecord {
    /// 0-based position in the input
    pub position: usize,
    pub agent_name: String,
    pub stat1_raw: Option<String>,
    pub stat2_raw: Option<String>,
}

impl fmt::Display for InvalidRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid value for agent {}: Field 1 - {}, Field 2 - {}",
            self.agent_name,
            self.stat1_raw.as_deref().unwrap_or("(missing)"),
            self.stat2_raw.as_deref().unwrap_or("(missing)")
        )
    }
}

/// Output of [`derive`]
#[derive(Debug, Clone, Default)]
pub struct Derivation {
    pub rows: Vec<DerivedRow>,
    pub rejected: Vec<InvalidRecord>,
}

/// Parse a metric value. Non-finite results count as unparseable.
pub fn parse_metric(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Build one row per record whose two selected fields are numeric, in input order.
/// Ranks are dense over the kept rows.
pub fn derive(records: &[RawRecord], selection: &FieldSelection) -> Derivation {
    let FieldSelection { stat1, stat2 } = selection;
    let mut derivation = Derivation::default();

    for (position, record) in records.iter().enumerate() {
        let raw1 = record.get(stat1.as_str());
        let raw2 = record.get(stat2.as_str());

        match (parse_metric(raw1), parse_metric(raw2)) {
            (Some(v1), Some(v2)) => {
                let display_index = derivation.rows.len() + 1;
                derivation.rows.push(DerivedRow::new(
                    display_index,
                    record.agent_name(),
                    record.faction(),
                    (stat1, v1),
                    (stat2, v2),
                ));
            }
            _ => {
                let invalid = InvalidRecord {
                    position,
                    agent_name: record.agent_name().to_string(),
                    stat1_raw: raw1.map(String::from),
                    stat2_raw: raw2.map(String::from),
                };
                log::warn!("{}", invalid);
                derivation.rejected.push(invalid);
            }
        }
    }

    derivation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetricFields;

    fn selection() -> FieldSelection {
        MetricFields::from_headers(&["agent_name", "faction", "explorer", "pioneer"])
            .select("explorer", "pioneer")
            .unwrap()
    }

    fn record(name: &str, faction: &str, explorer: &str, pioneer: &str) -> RawRecord {
        RawRecord::new()
            .with("agent_name", name)
            .with("faction", faction)
            .with("explorer", explorer)
            .with("pioneer", pioneer)
    }

    #[test]
    fn test_derive_mixed_records() {
        let records = vec![
            record("A", "RES", "10", "0"),
            record("B", "ENL", "abc", "5"),
            record("C", "res", "20", "40"),
        ];
        let result = derive(&records, &selection());

        assert_eq!(result.rows.len(), 2);
        let a = &result.rows[0];
        assert_eq!(a.agent_name, "A");
        assert_eq!(a.ratio, 0.0);
        assert_eq!(a.ratio_percent, 0.0);
        assert_eq!(a.difference, 10.0);
        assert_eq!(a.display_index, 1);

        let c = &result.rows[1];
        assert_eq!(c.agent_name, "C");
        assert_eq!(c.ratio, 0.5);
        assert_eq!(c.ratio_percent, 200.0);
        assert_eq!(c.difference, 20.0);
        assert_eq!(c.display_index, 2);
        assert_eq!(c.style, crate::model::faction::RESISTANCE);

        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].position, 1);
        assert_eq!(
            result.rejected[0].to_string(),
            "Invalid value for agent B: Field 1 - abc, Field 2 - 5"
        );
    }

    #[test]
    fn test_zero_guards_use_the_denominator() {
        let records = vec![record("Z", "ENL", "0", "7"), record("Y", "ENL", "0", "0")];
        let result = derive(&records, &selection());

        // stat1 is zero: ratio is a real 0/7, ratio percent is guarded
        assert_eq!(result.rows[0].ratio, 0.0);
        assert_eq!(result.rows[0].ratio_percent, 0.0);
        assert_eq!(result.rows[0].difference, 7.0);

        assert_eq!(result.rows[1].ratio, 0.0);
        assert_eq!(result.rows[1].ratio_percent, 0.0);
        assert_eq!(result.rows[1].difference, 0.0);
    }

    #[test]
    fn test_ranks_are_dense_after_exclusions() {
        let records = vec![
            record("A", "ENL", "", "1"),
            record("B", "ENL", "1", "2"),
            record("C", "ENL", "NaN", "2"),
            record("D", "ENL", "3", "inf"),
            record("E", "ENL", " 4 ", "8"),
        ];
        let result = derive(&records, &selection());

        let ranks: Vec<usize> = result.rows.iter().map(|r| r.display_index).collect();
        let names: Vec<&str> = result.rows.iter().map(|r| r.agent_name.as_str()).collect();
        assert_eq!(ranks, vec![1, 2]);
        assert_eq!(names, vec!["B", "E"]);

        let rejected: Vec<usize> = result.rejected.iter().map(|r| r.position).collect();
        assert_eq!(rejected, vec![0, 2, 3]);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let records = vec![RawRecord::new().with("agent_name", "M").with("explorer", "5")];
        let result = derive(&records, &selection());
        assert!(result.rows.is_empty());
        assert_eq!(
            result.rejected[0].to_string(),
            "Invalid value for agent M: Field 1 - 5, Field 2 - (missing)"
        );
    }

    #[test]
    fn test_same_field_twice() {
        let fields = MetricFields::from_headers(&["agent_name", "explorer"]);
        let same = fields.select("explorer", "explorer").unwrap();
        let records = vec![RawRecord::new().with("agent_name", "S").with("explorer", "4")];

        let row = &derive(&records, &same).rows[0];
        assert_eq!(row.ratio, 1.0);
        assert_eq!(row.ratio_percent, 100.0);
        assert_eq!(row.difference, 0.0);
        assert_eq!(row.metric(&same.stat1), Some(4.0));
    }

    #[test]
    fn test_negative_difference_is_absolute() {
        let records = vec![record("N", "ENL", "-5", "10")];
        let row = &derive(&records, &selection()).rows[0];
        assert_eq!(row.difference, 15.0);
        assert_eq!(row.ratio, -0.5);
        assert_eq!(row.ratio_percent, -200.0);
    }
}
