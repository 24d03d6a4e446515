//! Medal tally queries.

use crate::engine::OlympicsEngine;
use crate::error::Result;
use crate::filter::Predicates;
use duckdb::types::Value;
use olympics_domain::MedalTallyFilter;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One ranked team in the medal tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalTallyRow {
    pub team: String,
    pub noc: String,
    pub region: String,
    pub gold: i64,
    pub silver: i64,
    pub bronze: i64,
    pub total: i64,
}

impl MedalTallyRow {
    fn new(team: String, noc: String, region: String, gold: i64, silver: i64, bronze: i64) -> Self {
        Self {
            team,
            noc,
            region,
            gold,
            silver,
            bronze,
            total: gold + silver + bronze,
        }
    }
}

/// Medals won by one country in one edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyMedalCount {
    pub year: i32,
    pub medals: i64,
}

impl OlympicsEngine {
    /// Ranked medal tally per `(team, noc, region)`.
    ///
    /// Team medals count once per event. Rows without a resolved region do
    /// not form a group. Ties on the total keep group key order.
    pub fn medal_tally(&self, filter: &MedalTallyFilter) -> Result<Vec<MedalTallyRow>> {
        debug!(year = ?filter.year, country = ?filter.country, "Computing medal tally");

        let predicates = Predicates::new()
            .year(filter.year)
            .region(filter.country.as_deref())
            .not_null("team")
            .not_null("noc")
            .not_null("region");

        let query = format!(
            r#"
            SELECT
                team,
                noc,
                region,
                CAST(SUM(gold) AS BIGINT) AS gold_count,
                CAST(SUM(silver) AS BIGINT) AS silver_count,
                CAST(SUM(bronze) AS BIGINT) AS bronze_count,
                CAST(SUM(gold + silver + bronze) AS BIGINT) AS total
            FROM medal_events
            {}
            GROUP BY team, noc, region
            ORDER BY total DESC, team, noc, region
            "#,
            predicates.where_clause()
        );

        self.query_rows(&query, predicates.into_values(), |row| {
            Ok(MedalTallyRow::new(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })
    }

    /// Medals per edition for one country, ascending by year.
    pub fn yearwise_medal_tally(&self, country: &str) -> Result<Vec<YearlyMedalCount>> {
        self.query_rows(
            r#"
            SELECT year, count(*) AS medals
            FROM medal_events
            WHERE medal IS NOT NULL AND region = ?
            GROUP BY year
            ORDER BY year
            "#,
            vec![Value::Text(country.to_string())],
            |row| {
                Ok(YearlyMedalCount {
                    year: row.get(0)?,
                    medals: row.get(1)?,
                })
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PreprocessOptions;
    use crate::test_support::{regions, sample_engine};
    use olympics_domain::{EventRecord, Medal};

    #[test]
    fn test_overall_tally_ranks_by_total() {
        let engine = sample_engine();
        let tally = engine.medal_tally(&MedalTallyFilter::overall()).unwrap();

        // Shared basketball gold counts once; unmapped ATL forms no group.
        assert_eq!(tally.len(), 2);
        assert_eq!(tally[0].region, "USA");
        assert_eq!((tally[0].gold, tally[0].silver, tally[0].bronze), (2, 0, 1));
        assert_eq!(tally[0].total, 3);
        assert_eq!(tally[1].region, "Kenya");
        assert_eq!(tally[1].total, 2);
    }

    #[test]
    fn test_totals_equal_medal_sums() {
        let engine = sample_engine();
        let filters = [
            MedalTallyFilter::overall(),
            MedalTallyFilter::overall().in_year(2000),
            MedalTallyFilter::overall().for_country("Kenya"),
            MedalTallyFilter::overall().in_year(2004).for_country("Kenya"),
        ];
        for filter in &filters {
            for row in engine.medal_tally(filter).unwrap() {
                assert_eq!(row.total, row.gold + row.silver + row.bronze);
            }
        }
    }

    #[test]
    fn test_year_and_country_filters() {
        let engine = sample_engine();

        let sydney = engine
            .medal_tally(&MedalTallyFilter::overall().in_year(2000))
            .unwrap();
        assert_eq!(sydney.len(), 2);
        assert_eq!(sydney[0].team, "USA");
        assert_eq!(sydney[0].total, 3);
        assert_eq!(sydney[1].team, "Kenya");
        assert_eq!(sydney[1].total, 1);

        let kenya = engine
            .medal_tally(&MedalTallyFilter::overall().for_country("Kenya"))
            .unwrap();
        assert_eq!(kenya.len(), 1);
        assert_eq!((kenya[0].gold, kenya[0].silver), (1, 1));

        // Teams that competed without medalling still appear with zeros.
        let paris = engine
            .medal_tally(&MedalTallyFilter::overall().in_year(1900).for_country("USA"))
            .unwrap();
        assert_eq!(paris.len(), 1);
        assert_eq!(paris[0].total, 0);
    }

    #[test]
    fn test_no_matching_records_yields_empty_tally() {
        let engine = sample_engine();
        assert!(engine
            .medal_tally(&MedalTallyFilter::overall().in_year(1996))
            .unwrap()
            .is_empty());
        assert!(engine
            .medal_tally(&MedalTallyFilter::overall().for_country("Atlantis"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_two_team_example() {
        let mut events: Vec<EventRecord> = ["100m", "200m", "400m"]
            .iter()
            .map(|event| {
                EventRecord::participation("A", "TeamA", "USA", 2000, "Athletics", *event)
                    .with_medal(Medal::Gold)
            })
            .collect();
        events.push(
            EventRecord::participation("B", "TeamB", "KEN", 2000, "Athletics", "100m")
                .with_medal(Medal::Silver),
        );
        let engine =
            OlympicsEngine::from_records(&events, &regions(), &PreprocessOptions::default()).unwrap();

        let tally = engine
            .medal_tally(&MedalTallyFilter::overall().in_year(2000))
            .unwrap();
        assert_eq!(tally.len(), 2);
        assert_eq!(tally[0].team, "TeamA");
        assert_eq!(tally[0].total, 3);
        assert_eq!(tally[1].team, "TeamB");
        assert_eq!(tally[1].total, 1);
    }

    #[test]
    fn test_overall_row_count_matches_distinct_team_keys() {
        let engine = sample_engine();
        let expected = engine
            .scalar_count(
                "SELECT count(*) FROM (SELECT DISTINCT team, noc, region FROM medal_events \
                 WHERE region IS NOT NULL)",
            )
            .unwrap();
        let tally = engine.medal_tally(&MedalTallyFilter::overall()).unwrap();
        assert_eq!(tally.len() as i64, expected);
    }

    #[test]
    fn test_yearwise_medal_tally() {
        let engine = sample_engine();
        let usa = engine.yearwise_medal_tally("USA").unwrap();
        assert_eq!(usa, vec![YearlyMedalCount { year: 2000, medals: 3 }]);

        let kenya = engine.yearwise_medal_tally("Kenya").unwrap();
        assert_eq!(
            kenya,
            vec![
                YearlyMedalCount { year: 2000, medals: 1 },
                YearlyMedalCount { year: 2004, medals: 1 },
            ]
        );

        assert!(engine.yearwise_medal_tally("Atlantis").unwrap().is_empty());
    }
}
