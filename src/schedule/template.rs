use serde::{Deserialize, Serialize};

use crate::model::ScheduleRow;
use crate::schedule::workover::YearCount;
use crate::schedule::{MarkerRule, YearSpan, YearValue, first_match};

/// Drilling and facilities plans keyed by run-name markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleTemplate {
    pub years: YearSpan,
    /// Vertical wells drilled per year; first matching rule applies.
    pub vertical_wells: Vec<MarkerRule>,
    /// Facilities payment per year in percent; first matching rule applies.
    pub facilities_percent: Vec<MarkerRule>,
}

impl Default for ScheduleTemplate {
    fn default() -> Self {
        let wells = |years: &[i32]| -> Vec<YearValue> {
            years.iter().map(|&year| YearValue::new(year, 4.0)).collect()
        };
        let payments = |first: i32, percents: &[f64]| -> Vec<YearValue> {
            percents
                .iter()
                .zip(first..)
                .map(|(&percent, year)| YearValue::new(year, percent))
                .collect()
        };

        Self {
            years: YearSpan::new(2024, 2049),
            vertical_wells: vec![
                MarkerRule::new(&["12VINFILL"], wells(&[2025, 2026, 2027])),
                MarkerRule::new(&["4VINFILL"], wells(&[2025])),
            ],
            facilities_percent: vec![
                MarkerRule::new(
                    &["BDPRODUCERS", "2029"],
                    payments(2025, &[30.0, 40.0, 20.0, 10.0]),
                ),
                MarkerRule::new(&["BDPRODUCERS", "2027"], payments(2025, &[50.0, 50.0])),
                MarkerRule::new(
                    &["BDPRODUCERS", "2032"],
                    payments(2025, &[20.0, 30.0, 30.0, 10.0, 10.0]),
                ),
            ],
        }
    }
}

impl ScheduleTemplate {
    /// Builds the yearly schedule of a run. Workover years outside the
    /// template span are dropped.
    pub fn generate(&self, run: &str, workovers: &[YearCount]) -> Vec<ScheduleRow> {
        let vertical = first_match(&self.vertical_wells, run);
        let facilities = first_match(&self.facilities_percent, run);

        self.years
            .years()
            .map(|year| ScheduleRow {
                year,
                vertical_wells: vertical.map_or(0.0, |rule| rule.value_for(year)),
                workover_perf_shutoff: workovers
                    .iter()
                    .find(|entry| entry.year == year)
                    .map_or(0.0, |entry| f64::from(entry.count)),
                facilities_fraction: facilities.map_or(0.0, |rule| rule.value_for(year)) / 100.0,
                ..ScheduleRow::default()
            })
            .collect()
    }
}
