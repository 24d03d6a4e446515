//! Athlete demographics: age distributions and physique scatter data.

use crate::engine::OlympicsEngine;
use crate::error::Result;
use crate::filter::Predicates;
use olympics_domain::{Medal, MedalClass, Sex};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Median};
use std::collections::BTreeMap;

/// Number of athletes with a given age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBin {
    pub age: i32,
    pub frequency: i64,
}

/// Summary statistics of an age sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation, absent for a single value
    pub std_dev: Option<f64>,
    pub min: i32,
    pub max: i32,
}

/// Ages of one athlete group, with its histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeSample {
    pub label: String,
    /// Medal of the group, `None` for the overall sample
    pub medal: Option<Medal>,
    pub ages: Vec<i32>,
    pub histogram: Vec<AgeBin>,
    pub summary: Option<AgeSummary>,
}

impl AgeSample {
    fn new(label: &str, medal: Option<Medal>, ages: Vec<i32>) -> Self {
        let mut bins: BTreeMap<i32, i64> = BTreeMap::new();
        for age in &ages {
            *bins.entry(*age).or_insert(0) += 1;
        }
        let histogram = bins
            .into_iter()
            .map(|(age, frequency)| AgeBin { age, frequency })
            .collect();
        let summary = summarize(&ages);

        Self {
            label: label.to_string(),
            medal,
            ages,
            histogram,
            summary,
        }
    }
}

fn summarize(ages: &[i32]) -> Option<AgeSummary> {
    let min = *ages.iter().min()?;
    let max = *ages.iter().max()?;
    let data = Data::new(ages.iter().map(|&age| f64::from(age)).collect::<Vec<_>>());

    Some(AgeSummary {
        count: ages.len(),
        mean: data.mean().unwrap_or_default(),
        median: data.median(),
        std_dev: data.std_dev().filter(|sd| sd.is_finite()),
        min,
        max,
    })
}

/// Overlaid age samples: every athlete, then gold, silver and bronze medalists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeDistribution {
    pub samples: Vec<AgeSample>,
}

impl AgeDistribution {
    pub fn overall(&self) -> Option<&AgeSample> {
        self.samples.iter().find(|s| s.medal.is_none())
    }

    pub fn for_medal(&self, medal: Medal) -> Option<&AgeSample> {
        self.samples.iter().find(|s| s.medal == Some(medal))
    }
}

/// One athlete point for the height / weight / age scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthletePhysique {
    pub name: String,
    pub sex: Option<Sex>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub sport: Option<String>,
    pub region: Option<String>,
    pub medal: MedalClass,
}

impl OlympicsEngine {
    /// Age samples over distinct athletes; athletes without an age are left out.
    pub fn age_distribution(&self) -> Result<AgeDistribution> {
        let rows: Vec<(i32, Option<String>)> = self.query_rows(
            "SELECT age, medal FROM athletes WHERE age IS NOT NULL ORDER BY seq",
            Vec::new(),
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let overall: Vec<i32> = rows.iter().map(|(age, _)| *age).collect();
        let mut samples = vec![AgeSample::new("Overall Age", None, overall)];
        for medal in Medal::ALL {
            let ages = rows
                .iter()
                .filter(|(_, m)| m.as_deref() == Some(medal.as_str()))
                .map(|(age, _)| *age)
                .collect();
            samples.push(AgeSample::new(
                &format!("{medal} Medalist"),
                Some(medal),
                ages,
            ));
        }

        Ok(AgeDistribution { samples })
    }

    /// Distinct athletes for the physique scatter, optionally one sport only.
    ///
    /// Missing medals become [`MedalClass::NoMedal`]; missing measurements
    /// stay `None`.
    pub fn athlete_physique(&self, sport: Option<&str>) -> Result<Vec<AthletePhysique>> {
        let predicates = Predicates::new().sport(sport);
        let query = format!(
            r#"
            SELECT name, sex, age, height, weight, sport, region, medal
            FROM athletes
            {}
            ORDER BY seq
            "#,
            predicates.where_clause()
        );

        self.query_rows(&query, predicates.into_values(), |row| {
            let sex: Option<String> = row.get(1)?;
            let medal: Option<String> = row.get(7)?;
            Ok(AthletePhysique {
                name: row.get(0)?,
                sex: sex.and_then(|s| s.parse().ok()),
                age: row.get(2)?,
                height_cm: row.get(3)?,
                weight_kg: row.get(4)?,
                sport: row.get(5)?,
                region: row.get(6)?,
                medal: MedalClass::from(medal.and_then(|m| m.parse::<Medal>().ok())),
            })
        })
    }
}
