//! Participation over time.

use crate::engine::OlympicsEngine;
use crate::error::Result;
use olympics_domain::ParticipationEntity;
use serde::{Deserialize, Serialize};

/// Distinct entity count for one edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionCount {
    pub edition: i32,
    pub count: i64,
}

/// Distinct male and female athletes in one edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SexParticipation {
    pub year: i32,
    pub male: i64,
    pub female: i64,
}

/// Column of the cleaned table holding the entity.
fn entity_column(entity: ParticipationEntity) -> &'static str {
    match entity {
        ParticipationEntity::Nations => "region",
        ParticipationEntity::Events => "event",
        ParticipationEntity::Athletes => "name",
        ParticipationEntity::Sports => "sport",
        ParticipationEntity::Hosts => "city",
    }
}

impl OlympicsEngine {
    /// Distinct values of `entity` per edition, ascending by year.
    ///
    /// A missing value is one more distinct value, so athletes from unmapped
    /// NOC codes still register in the nations count.
    pub fn participation_over_time(&self, entity: ParticipationEntity) -> Result<Vec<EditionCount>> {
        let column = entity_column(entity);
        let query = format!(
            r#"
            SELECT
                year,
                CAST(count(DISTINCT {column}) + max(CASE WHEN {column} IS NULL THEN 1 ELSE 0 END) AS BIGINT)
            FROM events
            GROUP BY year
            ORDER BY year
            "#
        );

        self.query_rows(&query, Vec::new(), |row| {
            Ok(EditionCount {
                edition: row.get(0)?,
                count: row.get(1)?,
            })
        })
    }

    /// Male and female athlete counts for every edition in the dataset.
    ///
    /// Athletes are counted once per represented region. An edition where one
    /// sex is absent reports 0 for it.
    pub fn men_vs_women(&self) -> Result<Vec<SexParticipation>> {
        self.query_rows(
            r#"
            WITH editions AS (
                SELECT DISTINCT year FROM events
            ),
            by_sex AS (
                SELECT
                    year,
                    count(name) FILTER (WHERE sex = 'M') AS male,
                    count(name) FILTER (WHERE sex = 'F') AS female
                FROM athletes
                GROUP BY year
            )
            SELECT e.year, COALESCE(b.male, 0), COALESCE(b.female, 0)
            FROM editions e
            LEFT JOIN by_sex b ON b.year = e.year
            ORDER BY e.year
            "#,
            Vec::new(),
            |row| {
                Ok(SexParticipation {
                    year: row.get(0)?,
                    male: row.get(1)?,
                    female: row.get(2)?,
                })
            },
        )
    }
}
