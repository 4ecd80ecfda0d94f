//! Yearly schedules derived from simulation runs: workover counts, drilling and
//! facilities templates, and make-up gas availability.

pub mod availability;
pub mod template;
pub mod workover;

use serde::{Deserialize, Serialize};

use crate::model::Year;

/// A value assigned to one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: Year,
    pub value: f64,
}

impl YearValue {
    pub const fn new(year: Year, value: f64) -> Self {
        Self { year, value }
    }
}

/// Inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpan {
    pub first: Year,
    pub last: Year,
}

impl YearSpan {
    pub const fn new(first: Year, last: Year) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, year: Year) -> bool {
        (self.first..=self.last).contains(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = Year> {
        self.first..=self.last
    }
}

/// Yearly values applied to runs whose name contains every marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRule {
    pub markers: Vec<String>,
    pub values: Vec<YearValue>,
}

impl MarkerRule {
    pub fn new(markers: &[&str], values: Vec<YearValue>) -> Self {
        Self {
            markers: markers.iter().map(|marker| marker.to_string()).collect(),
            values,
        }
    }

    pub fn matches(&self, run: &str) -> bool {
        self.markers.iter().all(|marker| run.contains(marker.as_str()))
    }

    /// Value for `year`, or zero when the rule does not list it.
    pub fn value_for(&self, year: Year) -> f64 {
        self.values
            .iter()
            .find(|entry| entry.year == year)
            .map(|entry| entry.value)
            .unwrap_or(0.0)
    }
}

/// First rule in `rules` whose markers all appear in `run`.
pub fn first_match<'a>(rules: &'a [MarkerRule], run: &str) -> Option<&'a MarkerRule> {
    rules.iter().find(|rule| rule.matches(run))
}

fn constant(years: YearSpan, value: f64) -> Vec<YearValue> {
    years.years().map(|year| YearValue::new(year, value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_rule_wins() {
        let rules = vec![
            MarkerRule::new(&["12VINFILL"], vec![YearValue::new(2025, 4.0)]),
            MarkerRule::new(&["VINFILL"], vec![YearValue::new(2026, 1.0)]),
        ];
        let rule = first_match(&rules, "CASE_12VINFILL").expect("rule matched");
        assert_eq!(rule.value_for(2025), 4.0);
        assert_eq!(rule.value_for(2026), 0.0);
        assert!(first_match(&rules, "BASE").is_none());
    }

    #[test]
    fn every_marker_must_be_present() {
        let rule = MarkerRule::new(&["BDPRODUCERS", "2029"], Vec::new());
        assert!(rule.matches("BDPRODUCERS_2029"));
        assert!(!rule.matches("BDPRODUCERS_2027"));
    }
}
