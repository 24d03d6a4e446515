//! Most successful athletes.
//!
//! Every medal-bearing record counts as one medal for the athlete, so each
//! member of a medal-winning team is credited individually.

use crate::engine::OlympicsEngine;
use crate::error::Result;
use crate::filter::Predicates;
use duckdb::types::Value;
use olympics_domain::{COUNTRY_LEADERBOARD_LIMIT, DEFAULT_LEADERBOARD_LIMIT, LeaderboardFilter};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteRanking {
    pub name: String,
    pub medals: i64,
    pub sport: Option<String>,
    pub region: Option<String>,
}

impl OlympicsEngine {
    /// Top `limit` athletes by medal records.
    ///
    /// Sport and region come from the athlete's first record within the
    /// sport scope. Ties on the count order by name.
    pub fn most_successful(
        &self,
        filter: &LeaderboardFilter,
        limit: usize,
    ) -> Result<Vec<AthleteRanking>> {
        debug!(sport = ?filter.sport, country = ?filter.country, limit, "Ranking athletes");

        let scope = Predicates::new().sport(filter.sport.as_deref());
        let counted = Predicates::new()
            .not_null("medal")
            .not_null("name")
            .region(filter.country.as_deref());

        let query = format!(
            r#"
            WITH scoped AS (
                SELECT * FROM events
                {}
            ),
            medal_counts AS (
                SELECT name, count(*) AS medals
                FROM scoped
                {}
                GROUP BY name
                ORDER BY medals DESC, name
                LIMIT ?
            ),
            profiles AS (
                SELECT name, sport, region
                FROM scoped
                QUALIFY row_number() OVER (PARTITION BY name ORDER BY seq) = 1
            )
            SELECT c.name, c.medals, p.sport, p.region
            FROM medal_counts c
            JOIN profiles p ON p.name = c.name
            ORDER BY c.medals DESC, c.name
            "#,
            scope.where_clause(),
            counted.where_clause()
        );

        let mut values = scope.into_values();
        values.extend(counted.into_values());
        values.push(Value::BigInt(i64::try_from(limit).unwrap_or(i64::MAX)));

        self.query_rows(&query, values, |row| {
            Ok(AthleteRanking {
                name: row.get(0)?,
                medals: row.get(1)?,
                sport: row.get(2)?,
                region: row.get(3)?,
            })
        })
    }

    /// Overall leaderboard, optionally for one sport, with the default size.
    pub fn most_successful_overall(&self, sport: Option<&str>) -> Result<Vec<AthleteRanking>> {
        let filter = LeaderboardFilter {
            sport: sport.map(str::to_string),
            country: None,
        };
        self.most_successful(&filter, DEFAULT_LEADERBOARD_LIMIT)
    }

    /// Top athletes of one country.
    pub fn most_successful_in_country(&self, country: &str) -> Result<Vec<AthleteRanking>> {
        let filter = LeaderboardFilter {
            sport: None,
            country: Some(country.to_string()),
        };
        self.most_successful(&filter, COUNTRY_LEADERBOARD_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PreprocessOptions;
    use crate::test_support::{regions, sample_engine};
    use fake::Fake;
    use fake::faker::name::en::Name;
    use olympics_domain::{EventRecord, Medal};
    use std::collections::HashSet;

    #[test]
    fn test_overall_leaderboard() {
        let engine = sample_engine();
        let board = engine.most_successful_overall(None).unwrap();

        let names: Vec<&str> = board.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob", "Cal", "Dan", "Zed"]);
        assert_eq!(board[0].medals, 2);
        assert_eq!(board[0].sport.as_deref(), Some("Athletics"));
        assert_eq!(board[0].region.as_deref(), Some("Kenya"));
        assert_eq!(board[4].region, None);
    }

    #[test]
    fn test_team_medal_credited_to_each_player() {
        let engine = sample_engine();
        let board = engine.most_successful_overall(Some("Basketball")).unwrap();
        assert_eq!(board.len(), 2);
        assert!(board.iter().all(|a| a.medals == 1));
    }

    #[test]
    fn test_limit_is_respected() {
        let engine = sample_engine();
        let board = engine
            .most_successful(&LeaderboardFilter::default(), 3)
            .unwrap();
        let names: Vec<&str> = board.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob", "Cal"]);

        assert!(engine
            .most_successful(&LeaderboardFilter::default(), 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_sport_scope() {
        let engine = sample_engine();
        let board = engine.most_successful_overall(Some("Swimming")).unwrap();
        assert_eq!(
            board,
            vec![AthleteRanking {
                name: "Bob".to_string(),
                medals: 2,
                sport: Some("Swimming".to_string()),
                region: Some("USA".to_string()),
            }]
        );

        assert!(engine.most_successful_overall(Some("Curling")).unwrap().is_empty());
    }

    #[test]
    fn test_country_leaderboard() {
        let engine = sample_engine();
        let board = engine.most_successful_in_country("USA").unwrap();
        let names: Vec<&str> = board.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Cal", "Dan"]);
        assert!(engine.most_successful_in_country("Atlantis").unwrap().is_empty());
    }

    #[test]
    fn test_multi_sport_athlete_appears_once() {
        let events = vec![
            EventRecord::participation("Ann", "Kenya", "KEN", 2000, "Athletics", "Marathon")
                .with_medal(Medal::Gold),
            EventRecord::participation("Ann", "Kenya", "KEN", 2004, "Cycling", "Road Race")
                .with_medal(Medal::Bronze),
        ];
        let engine =
            OlympicsEngine::from_records(&events, &regions(), &PreprocessOptions::default()).unwrap();

        let board = engine.most_successful_overall(None).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].medals, 2);
        assert_eq!(board[0].sport.as_deref(), Some("Athletics"));
    }

    #[test]
    fn test_generated_athletes_respect_limits_and_uniqueness() {
        let events: Vec<EventRecord> = (0..120)
            .map(|i| {
                let name: String = Name().fake();
                let noc = if i % 2 == 0 { "KEN" } else { "USA" };
                let sport = if i % 3 == 0 { "Rowing" } else { "Athletics" };
                let year = 1996 + (i % 3) * 4;
                let record =
                    EventRecord::participation(name, noc, noc, year, sport, format!("Event {}", i % 7));
                if i % 4 == 0 {
                    record
                } else {
                    record.with_medal(Medal::Gold)
                }
            })
            .collect();
        let engine =
            OlympicsEngine::from_records(&events, &regions(), &PreprocessOptions::default()).unwrap();

        let overall = engine.most_successful_overall(None).unwrap();
        assert!(overall.len() <= DEFAULT_LEADERBOARD_LIMIT);
        let unique: HashSet<&str> = overall.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(unique.len(), overall.len());

        let country = engine.most_successful_in_country("Kenya").unwrap();
        assert!(country.len() <= COUNTRY_LEADERBOARD_LIMIT);
        let unique: HashSet<&str> = country.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(unique.len(), country.len());

        for pair in overall.windows(2) {
            assert!(pair[0].medals >= pair[1].medals);
        }
    }
}
