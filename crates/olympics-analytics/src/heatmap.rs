//! Row-key by year count matrices for heatmaps.

use crate::engine::OlympicsEngine;
use crate::error::Result;
use duckdb::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Dense count matrix: one row per label, one column per year.
///
/// Every (row, year) cell exists; combinations absent from the data are 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotTable {
    pub rows: Vec<String>,
    pub years: Vec<i32>,
    pub cells: Vec<Vec<i64>>,
}

impl PivotTable {
    /// Pivot `(row, year, count)` triples. Repeated pairs are summed.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (String, i32, i64)>,
    {
        let mut grid: BTreeMap<String, BTreeMap<i32, i64>> = BTreeMap::new();
        let mut years = BTreeSet::new();

        for (row, year, count) in counts {
            years.insert(year);
            *grid.entry(row).or_default().entry(year).or_insert(0) += count;
        }

        let years: Vec<i32> = years.into_iter().collect();
        let (rows, cells): (Vec<String>, Vec<Vec<i64>>) = grid
            .into_iter()
            .map(|(row, by_year)| {
                let line: Vec<i64> = years
                    .iter()
                    .map(|year| by_year.get(year).copied().unwrap_or(0))
                    .collect();
                (row, line)
            })
            .unzip();

        Self { rows, years, cells }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell for `row` and `year`, `None` when either is outside the table.
    pub fn get(&self, row: &str, year: i32) -> Option<i64> {
        let r = self.rows.iter().position(|label| label == row)?;
        let c = self.years.binary_search(&year).ok()?;
        Some(self.cells[r][c])
    }

    /// Sum across all years for `row`.
    pub fn row_total(&self, row: &str) -> Option<i64> {
        let r = self.rows.iter().position(|label| label == row)?;
        Some(self.cells[r].iter().sum())
    }
}

impl OlympicsEngine {
    /// Distinct events per sport and edition.
    pub fn sport_event_heatmap(&self) -> Result<PivotTable> {
        let counts: Vec<(String, i32, i64)> = self.query_rows(
            r#"
            SELECT sport, year, count(DISTINCT event)
            FROM events
            WHERE sport IS NOT NULL AND event IS NOT NULL
            GROUP BY sport, year
            "#,
            Vec::new(),
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        Ok(PivotTable::from_counts(counts))
    }

    /// Medals per sport and edition for one country, team medals once.
    pub fn country_sport_heatmap(&self, country: &str) -> Result<PivotTable> {
        let counts: Vec<(String, i32, i64)> = self.query_rows(
            r#"
            SELECT sport, year, count(*)
            FROM medal_events
            WHERE medal IS NOT NULL AND sport IS NOT NULL AND region = ?
            GROUP BY sport, year
            "#,
            vec![Value::Text(country.to_string())],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        Ok(PivotTable::from_counts(counts))
    }
}
