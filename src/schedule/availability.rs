use serde::{Deserialize, Serialize};

use crate::model::AvailabilityRow;
use crate::schedule::{MarkerRule, YearSpan, YearValue, constant, first_match};

/// Make-up gas availability profiles keyed by run-name markers. Runs that
/// match no rule get zero availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityTemplate {
    pub years: YearSpan,
    pub rules: Vec<MarkerRule>,
}

impl Default for AvailabilityTemplate {
    fn default() -> Self {
        let supply_until_2028 = || {
            let mut values = vec![YearValue::new(2024, 0.5)];
            values.extend(constant(YearSpan::new(2025, 2028), 1.0));
            values
        };

        Self {
            years: YearSpan::new(2024, 2049),
            rules: vec![
                MarkerRule::new(&["2027"], constant(YearSpan::new(2025, 2026), 1.0)),
                MarkerRule::new(&["2029"], supply_until_2028()),
                MarkerRule::new(&["2032"], supply_until_2028()),
            ],
        }
    }
}

impl AvailabilityTemplate {
    pub fn profile(&self, run: &str) -> Vec<AvailabilityRow> {
        let rule = first_match(&self.rules, run);
        self.years
            .years()
            .map(|year| AvailabilityRow {
                year,
                availability: rule.map_or(0.0, |rule| rule.value_for(year)),
            })
            .collect()
    }
}
