use super::faction::FactionStyle;
use super::field::FieldName;
use std::collections::BTreeMap;

/// A table row comparing two metrics for one agent
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRow {
    /// 1-based rank. Assigned at derivation, rewritten after every sort or search.
    pub display_index: usize,
    pub agent_name: String,
    pub faction: String,
    pub style: FactionStyle,
    pub stat1_value: f64,
    pub stat2_value: f64,
    pub ratio: f64,
    pub ratio_percent: f64,
    pub difference: f64,
    metrics: BTreeMap<FieldName, f64>,
}

impl DerivedRow {
    pub fn new(
        display_index: usize,
        agent_name: &str,
        faction: &str,
        stat1: (&FieldName, f64),
        stat2: (&FieldName, f64),
    ) -> Self {
        let (v1, v2) = (stat1.1, stat2.1);
        let mut metrics = BTreeMap::new();
        metrics.insert(stat1.0.clone(), v1);
        metrics.insert(stat2.0.clone(), v2);

        Self {
            display_index,
            agent_name: agent_name.to_string(),
            faction: faction.to_string(),
            style: FactionStyle::for_faction(faction),
            stat1_value: v1,
            stat2_value: v2,
            ratio: if v2 != 0.0 { v1 / v2 } else { 0.0 },
            ratio_percent: if v1 != 0.0 { (v2 / v1) * 100.0 } else { 0.0 },
            difference: (v1 - v2).abs(),
            metrics,
        }
    }

    /// Value of a selected metric by field name
    pub fn metric(&self, field: &FieldName) -> Option<f64> {
        self.metrics.get(field).copied()
    }

    pub fn metrics(&self) -> &BTreeMap<FieldName, f64> {
        &self.metrics
    }
}
