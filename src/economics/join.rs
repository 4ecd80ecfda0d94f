use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{EconError, Result};
use crate::model::{Assumptions, AvailabilityRow, ProductionRow, ScheduleRow, Year, YearInputs};

/// Joins the three input tables into the yearly skeleton.
///
/// Schedule and production rows are inner-joined on year; availability is
/// left-joined and defaults to zero. The result is ascending by year.
pub fn join_tables(
    schedule: &[ScheduleRow],
    production: &[ProductionRow],
    availability: &[AvailabilityRow],
) -> Result<Vec<YearInputs>> {
    let production = index_by_year("production", production, |row| row.year)?;
    let availability = index_by_year("availability", availability, |row| row.year)?;
    let schedule = index_by_year("schedule", schedule, |row| row.year)?;

    let joined: Vec<YearInputs> = schedule
        .into_iter()
        .filter_map(|(year, schedule_row)| {
            let production_row = production.get(&year)?;
            let share = availability
                .get(&year)
                .map(|row| row.availability)
                .unwrap_or(0.0);
            Some(YearInputs::from_parts(schedule_row, production_row, share))
        })
        .collect();

    debug!(rows = joined.len(), "joined input tables");
    Ok(joined)
}

/// Drops rows at or beyond the analysis horizon. Rows before the start year
/// are kept.
pub fn apply_horizon(rows: Vec<YearInputs>, assumptions: &Assumptions) -> Vec<YearInputs> {
    match assumptions.horizon_years {
        Some(horizon) => {
            let horizon = i32::try_from(horizon).unwrap_or(i32::MAX);
            rows.into_iter()
                .filter(|row| assumptions.offset(row.year) < horizon)
                .collect()
        }
        None => rows,
    }
}

fn index_by_year<'a, T>(
    table: &'static str,
    rows: &'a [T],
    year_of: impl Fn(&T) -> Year,
) -> Result<BTreeMap<Year, &'a T>> {
    let mut index = BTreeMap::new();
    for row in rows {
        let year = year_of(row);
        if index.insert(year, row).is_some() {
            return Err(EconError::DuplicateYear { table, year });
        }
    }
    Ok(index)
}

/// Holds the input tables of one evaluation until all of them are present.
#[derive(Debug, Clone, Default)]
pub struct ModelInputs {
    production: Option<Vec<ProductionRow>>,
    schedule: Option<Vec<ScheduleRow>>,
    availability: Option<Vec<AvailabilityRow>>,
}

impl ModelInputs {
    pub fn with_production(mut self, rows: Vec<ProductionRow>) -> Self {
        self.production = Some(rows);
        self
    }

    pub fn with_schedule(mut self, rows: Vec<ScheduleRow>) -> Self {
        self.schedule = Some(rows);
        self
    }

    pub fn with_availability(mut self, rows: Vec<AvailabilityRow>) -> Self {
        self.availability = Some(rows);
        self
    }

    pub fn is_ready(&self) -> bool {
        self.production.is_some() && self.schedule.is_some() && self.availability.is_some()
    }

    /// Builds the joined skeleton, failing if any table is still missing.
    pub fn prepare(&self, assumptions: &Assumptions) -> Result<Vec<YearInputs>> {
        let production = self
            .production
            .as_deref()
            .ok_or(EconError::MissingTable("production"))?;
        let schedule = self
            .schedule
            .as_deref()
            .ok_or(EconError::MissingTable("schedule"))?;
        let availability = self
            .availability
            .as_deref()
            .ok_or(EconError::MissingTable("availability"))?;

        let joined = join_tables(schedule, production, availability)?;
        Ok(apply_horizon(joined, assumptions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(year: Year) -> ScheduleRow {
        ScheduleRow {
            year,
            vertical_wells: 1.0,
            ..ScheduleRow::default()
        }
    }

    fn production(year: Year, oil: f64) -> ProductionRow {
        ProductionRow {
            year,
            oil,
            ..ProductionRow::default()
        }
    }

    #[test]
    fn unmatched_years_are_dropped_and_availability_defaults_to_zero() {
        let joined = join_tables(
            &[schedule(2025), schedule(2024), schedule(2026)],
            &[production(2024, 10.0), production(2025, 20.0), production(2030, 5.0)],
            &[AvailabilityRow {
                year: 2025,
                availability: 0.5,
            }],
        )
        .expect("tables joined");

        let years: Vec<Year> = joined.iter().map(|row| row.year).collect();
        assert_eq!(years, vec![2024, 2025]);
        assert_eq!(joined[0].availability, 0.0);
        assert_eq!(joined[1].availability, 0.5);
        assert_eq!(joined[1].oil, 20.0);
        assert_eq!(joined[1].vertical_wells, 1.0);
    }

    #[test]
    fn duplicate_years_are_rejected() {
        let error = join_tables(
            &[schedule(2024)],
            &[production(2024, 1.0), production(2024, 2.0)],
            &[],
        )
        .unwrap_err();
        assert!(matches!(
            error,
            EconError::DuplicateYear {
                table: "production",
                year: 2024
            }
        ));
    }

    #[test]
    fn horizon_keeps_years_before_start() {
        let assumptions = Assumptions {
            start_year: 2024,
            horizon_years: Some(2),
            ..Assumptions::default()
        };
        let rows = (2022..=2027)
            .map(|year| YearInputs {
                year,
                ..YearInputs::default()
            })
            .collect();
        let kept: Vec<Year> = apply_horizon(rows, &assumptions)
            .iter()
            .map(|row| row.year)
            .collect();
        assert_eq!(kept, vec![2022, 2023, 2024, 2025]);
    }

    #[test]
    fn oversized_horizon_keeps_every_year() {
        let assumptions = Assumptions {
            start_year: 2024,
            horizon_years: Some(u32::MAX),
            ..Assumptions::default()
        };
        let rows: Vec<YearInputs> = (2024..=2026)
            .map(|year| YearInputs {
                year,
                ..YearInputs::default()
            })
            .collect();
        assert_eq!(apply_horizon(rows, &assumptions).len(), 3);
    }

    #[test]
    fn prepare_requires_every_table() {
        let inputs = ModelInputs::default()
            .with_production(vec![production(2024, 1.0)])
            .with_schedule(vec![schedule(2024)]);
        assert!(!inputs.is_ready());
        let error = inputs.prepare(&Assumptions::default()).unwrap_err();
        assert!(matches!(error, EconError::MissingTable("availability")));

        let inputs = inputs.with_availability(Vec::new());
        assert!(inputs.is_ready());
        assert_eq!(inputs.prepare(&Assumptions::default()).unwrap().len(), 1);
    }
}
