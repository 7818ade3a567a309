use crate::error::{Result, StatsError};
use std::fmt;

/// Header columns that identify an agent rather than measure them
pub const IDENTITY_COLUMNS: [&str; 4] = ["Rank", "agent_name", "faction", "level"];

/// A metric column name that is known to exist in the loaded file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldName(String);

impl FieldName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The selectable metric columns of a file, sorted alphabetically
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricFields {
    names: Vec<String>,
}

impl MetricFields {
    /// Discover metric fields from a header row
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut names: Vec<String> = headers
            .iter()
            .map(|h| h.as_ref())
            .filter(|h| !IDENTITY_COLUMNS.contains(h))
            .map(|h| h.to_string())
            .collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    /// Validate a name against the metric set
    pub fn field(&self, name: &str) -> Result<FieldName> {
        if self.contains(name) {
            Ok(FieldName(name.to_string()))
        } else {
            Err(StatsError::UnknownField {
                field: name.to_string(),
                available: self.names.clone(),
            })
        }
    }

    /// Validate both halves of a selection
    pub fn select(&self, stat1: &str, stat2: &str) -> Result<FieldSelection> {
        Ok(FieldSelection {
            stat1: self.field(stat1)?,
            stat2: self.field(stat2)?,
        })
    }
}

/// The two metrics being compared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    pub stat1: FieldName,
    pub stat2: FieldName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_fields_exclude_identity_columns() {
        let fields = MetricFields::from_headers(&[
            "Rank", "agent_name", "faction", "level", "pioneer", "explorer", "builder",
        ]);
        let names: Vec<&str> = fields.iter().collect();
        assert_eq!(names, vec!["builder", "explorer", "pioneer"]);
    }

    #[test]
    fn test_identity_match_is_exact_case() {
        let fields = MetricFields::from_headers(&["rank", "Level", "explorer"]);
        assert!(fields.contains("rank"));
        assert!(fields.contains("Level"));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_select_rejects_unknown_field() {
        let fields = MetricFields::from_headers(&["agent_name", "explorer", "pioneer"]);
        assert!(fields.select("explorer", "pioneer").is_ok());

        match fields.select("explorer", "faction") {
            Err(StatsError::UnknownField { field, available }) => {
                assert_eq!(field, "faction");
                assert_eq!(available, vec!["explorer", "pioneer"]);
            }
            other => panic!("Expected UnknownField, got {:?}", other),
        }
    }
}
