//! # Olympics Analytics - Domain Model
//!
//! Value types shared by the analytics engine and its presentation layers:
//! raw input rows, medal/sex/season enums, and the typed filters every
//! query accepts in place of "Overall" sentinel strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of athletes returned by the overall leaderboard unless overridden.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 15;

/// Number of athletes returned by the country-scoped leaderboard.
pub const COUNTRY_LEADERBOARD_LIMIT: usize = 10;

// =============================================================================
// ENUMS
// =============================================================================

/// Medal awarded for a single event result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub const ALL: [Self; 3] = [Self::Gold, Self::Silver, Self::Bronze];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Medal {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Gold" => Ok(Self::Gold),
            "Silver" => Ok(Self::Silver),
            "Bronze" => Ok(Self::Bronze),
            other => Err(DomainError::InvalidMedal(other.to_string())),
        }
    }
}

/// Medal outcome with an explicit class for athletes who did not medal.
///
/// Charts group and color by this value, so a missing medal is a category of
/// its own rather than a null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MedalClass {
    Gold,
    Silver,
    Bronze,
    #[serde(rename = "No Medal")]
    NoMedal,
}

impl MedalClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
            Self::NoMedal => "No Medal",
        }
    }
}

impl From<Option<Medal>> for MedalClass {
    fn from(medal: Option<Medal>) -> Self {
        match medal {
            Some(Medal::Gold) => Self::Gold,
            Some(Medal::Silver) => Self::Silver,
            Some(Medal::Bronze) => Self::Bronze,
            None => Self::NoMedal,
        }
    }
}

impl fmt::Display for MedalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Athlete sex as recorded in the source data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    /// Single-letter code used by the source data
    pub fn code(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

impl FromStr for Sex {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" => Ok(Self::Male),
            "F" => Ok(Self::Female),
            other => Err(DomainError::InvalidSex(other.to_string())),
        }
    }
}

/// Games season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summer => "Summer",
            Self::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summer" => Ok(Self::Summer),
            "winter" => Ok(Self::Winter),
            _ => Err(DomainError::InvalidSeason(s.to_string())),
        }
    }
}

/// Entity whose distinct values are counted per edition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationEntity {
    Nations,
    Events,
    Athletes,
    Sports,
    Hosts,
}

impl ParticipationEntity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nations => "Nations",
            Self::Events => "Events",
            Self::Athletes => "Athletes",
            Self::Sports => "Sports",
            Self::Hosts => "Hosts",
        }
    }
}

// =============================================================================
// INPUT ROWS
// =============================================================================

/// One athlete's participation in one event at one Games edition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub athlete_id: Option<i64>,
    pub name: String,
    pub sex: Sex,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub team: String,
    pub noc: String,
    pub games: String,
    pub year: i32,
    pub season: Season,
    pub city: String,
    pub sport: String,
    pub event: String,
    pub medal: Option<Medal>,
}

impl EventRecord {
    /// Summer participation without a medal. Games label is derived from the
    /// year; other attributes default to empty and can be set with the
    /// `with_*` methods.
    pub fn participation(
        name: impl Into<String>,
        team: impl Into<String>,
        noc: impl Into<String>,
        year: i32,
        sport: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            athlete_id: None,
            name: name.into(),
            sex: Sex::Male,
            age: None,
            height_cm: None,
            weight_kg: None,
            team: team.into(),
            noc: noc.into(),
            games: format!("{year} Summer"),
            year,
            season: Season::Summer,
            city: String::new(),
            sport: sport.into(),
            event: event.into(),
            medal: None,
        }
    }

    #[must_use]
    pub fn with_medal(mut self, medal: Medal) -> Self {
        self.medal = Some(medal);
        self
    }

    #[must_use]
    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    #[must_use]
    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    #[must_use]
    pub fn with_physique(mut self, height_cm: f64, weight_kg: f64) -> Self {
        self.height_cm = Some(height_cm);
        self.weight_kg = Some(weight_kg);
        self
    }

    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// Set the season and re-derive the games label
    #[must_use]
    pub fn with_season(mut self, season: Season) -> Self {
        self.season = season;
        self.games = format!("{} {}", self.year, season);
        self
    }
}

/// NOC code to region mapping row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub noc: String,
    pub region: Option<String>,
    pub notes: Option<String>,
}

impl RegionRecord {
    pub fn new(noc: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            noc: noc.into(),
            region: Some(region.into()),
            notes: None,
        }
    }
}

// =============================================================================
// QUERY/FILTER TYPES
// =============================================================================

/// Year and country restriction for the medal tally. `None` means all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalTallyFilter {
    pub year: Option<i32>,
    pub country: Option<String>,
}

impl MedalTallyFilter {
    /// Every year, every country
    pub fn overall() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn in_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn for_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Scope of the most-successful-athletes leaderboard.
///
/// `sport` narrows both the medal count and the sport/region lookup;
/// `country` narrows only the medal count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardFilter {
    pub sport: Option<String>,
    pub country: Option<String>,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid medal: {0}")]
    InvalidMedal(String),

    #[error("Invalid sex code: {0}")]
    InvalidSex(String),

    #[error("Invalid season: {0}")]
    InvalidSeason(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medal_parsing() {
        assert_eq!("Gold".parse::<Medal>().unwrap(), Medal::Gold);
        assert_eq!(" Bronze ".parse::<Medal>().unwrap(), Medal::Bronze);
        assert!(matches!(
            "Platinum".parse::<Medal>(),
            Err(DomainError::InvalidMedal(m)) if m == "Platinum"
        ));
    }

    #[test]
    fn test_medal_class_from_missing_medal() {
        assert_eq!(MedalClass::from(None), MedalClass::NoMedal);
        assert_eq!(MedalClass::from(Some(Medal::Silver)), MedalClass::Silver);
        assert_eq!(MedalClass::NoMedal.to_string(), "No Medal");
    }

    #[test]
    fn test_season_parsing_is_case_insensitive() {
        assert_eq!("summer".parse::<Season>().unwrap(), Season::Summer);
        assert_eq!("WINTER".parse::<Season>().unwrap(), Season::Winter);
        assert!("spring".parse::<Season>().is_err());
    }

    #[test]
    fn test_sex_codes() {
        assert_eq!("F".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!(Sex::Male.code(), "M");
        assert!("X".parse::<Sex>().is_err());
    }

    #[test]
    fn test_participation_builder() {
        let record = EventRecord::participation("Jane Doe", "Kenya", "KEN", 2000, "Athletics", "Marathon")
            .with_medal(Medal::Gold)
            .with_season(Season::Winter);
        assert_eq!(record.games, "2000 Winter");
        assert_eq!(record.medal, Some(Medal::Gold));
    }

    #[test]
    fn test_tally_filter_builder() {
        let filter = MedalTallyFilter::overall().in_year(2000).for_country("USA");
        assert_eq!(filter.year, Some(2000));
        assert_eq!(filter.country.as_deref(), Some("USA"));
        assert_eq!(MedalTallyFilter::overall(), MedalTallyFilter::default());
    }
}
