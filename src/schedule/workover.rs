use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::Year;
use crate::report::prt::{ConnectionEvent, EventKind};

/// Connection changes of one well in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellYearConnections {
    pub year: Year,
    pub well: String,
    pub closed: u32,
    pub opened: u32,
}

impl WellYearConnections {
    pub fn total(&self) -> u32 {
        self.closed + self.opened
    }
}

/// Number of workovers assigned to a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: Year,
    pub count: u32,
}

/// When a well-year's connection changes amount to a workover, and how many
/// workovers a single year can absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoverRule {
    /// First year judged against `late_threshold`.
    pub threshold_year: Year,
    /// A well-year before `threshold_year` needs more than this many changes.
    pub early_threshold: u32,
    /// A well-year from `threshold_year` on needs more than this many changes.
    pub late_threshold: u32,
    pub max_per_year: u32,
}

impl Default for WorkoverRule {
    fn default() -> Self {
        Self {
            threshold_year: 2027,
            early_threshold: 3,
            late_threshold: 2,
            max_per_year: 6,
        }
    }
}

impl WorkoverRule {
    pub fn qualifies(&self, connections: &WellYearConnections) -> bool {
        let threshold = if connections.year < self.threshold_year {
            self.early_threshold
        } else {
            self.late_threshold
        };
        connections.total() > threshold
    }
}

/// Counts opening and closing events per (year, well), ordered by year then well.
pub fn connections_per_well(events: &[ConnectionEvent]) -> Vec<WellYearConnections> {
    let mut counts: BTreeMap<(Year, &str), (u32, u32)> = BTreeMap::new();
    for event in events {
        let entry = counts.entry((event.year, event.well.as_str())).or_default();
        match event.kind {
            EventKind::Closing { .. } => entry.0 += 1,
            EventKind::Opening { .. } => entry.1 += 1,
        }
    }

    counts
        .into_iter()
        .map(|((year, well), (closed, opened))| WellYearConnections {
            year,
            well: well.to_string(),
            closed,
            opened,
        })
        .collect()
}

/// Number of qualifying wells per year. Years without any are omitted.
pub fn workovers_per_year(connections: &[WellYearConnections], rule: &WorkoverRule) -> Vec<YearCount> {
    let mut per_year: BTreeMap<Year, u32> = BTreeMap::new();
    for well_year in connections.iter().filter(|c| rule.qualifies(c)) {
        *per_year.entry(well_year.year).or_default() += 1;
    }
    per_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Workover counts after the yearly cap.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CappedWorkovers {
    pub years: Vec<YearCount>,
    /// Excess still unassigned after the last listed year.
    pub leftover: u32,
}

/// Caps each listed year at `max_per_year`, carrying the excess into the next
/// listed year. Excess remaining after the last year is reported, not placed.
pub fn enforce_cap(counts: &[YearCount], max_per_year: u32) -> CappedWorkovers {
    let mut sorted = counts.to_vec();
    sorted.sort_by_key(|entry| entry.year);

    let mut excess = 0;
    let years = sorted
        .into_iter()
        .map(|entry| {
            let wanted = entry.count + excess;
            let count = wanted.min(max_per_year);
            excess = wanted - count;
            YearCount {
                year: entry.year,
                count,
            }
        })
        .collect();

    if excess > 0 {
        warn!(leftover = excess, "workovers exceed the cap beyond the last listed year");
    }
    CappedWorkovers {
        years,
        leftover: excess,
    }
}
