//! Analytics engine: loads the raw tables into DuckDB and builds the
//! cleaned `events` table every query reads from.

use crate::error::{AnalyticsError, Result};
use duckdb::types::Value;
use duckdb::{params, params_from_iter, Connection, Row};
use olympics_domain::{EventRecord, RegionRecord, Season};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Natural key of a medal award: a team wins at most one medal per event.
pub const MEDAL_KEY: &str = "team, noc, games, year, city, sport, event, medal";

/// Natural key of an athlete: one entry per name and represented region.
pub const ATHLETE_KEY: &str = "name, region";

/// Every column of a raw event row, used to drop exact duplicates.
const RAW_EVENT_COLUMNS: &str = "athlete_id, name, sex, age, height, weight, team, noc, games, \
                                 year, season, city, sport, event, medal";

/// Locations of the two input tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPaths {
    pub events: PathBuf,
    pub regions: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            events: PathBuf::from("athlete_events.csv"),
            regions: PathBuf::from("noc_regions.csv"),
        }
    }
}

/// Options applied while building the cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessOptions {
    /// Keep only this season's Games; `None` keeps all of them.
    pub season: Option<Season>,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            season: Some(Season::Summer),
        }
    }
}

/// Immutable Olympics dataset backed by an in-memory DuckDB database.
///
/// Construction ingests and preprocesses the inputs; afterwards every query
/// takes `&self` and leaves the data untouched.
pub struct OlympicsEngine {
    pub(crate) conn: Connection,
}

impl OlympicsEngine {
    /// Load both CSV inputs from disk and preprocess them.
    pub fn load(paths: &DataPaths, options: &PreprocessOptions) -> Result<Self> {
        for path in [&paths.events, &paths.regions] {
            match fs::metadata(path) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => return Err(AnalyticsError::MissingInput(path.clone())),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    return Err(AnalyticsError::MissingInput(path.clone()));
                }
                Err(err) => return Err(err.into()),
            }
        }

        let engine = Self::empty()?;
        engine.import_events_csv(&paths.events)?;
        engine.import_regions_csv(&paths.regions)?;
        engine.preprocess(options)?;
        Ok(engine)
    }

    /// Build the dataset from in-memory rows.
    pub fn from_records(
        events: &[EventRecord],
        regions: &[RegionRecord],
        options: &PreprocessOptions,
    ) -> Result<Self> {
        let engine = Self::empty()?;
        engine.ingest_events(events)?;
        engine.ingest_regions(regions)?;
        engine.preprocess(options)?;
        Ok(engine)
    }

    fn empty() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let engine = Self { conn };
        engine.initialize_schema()?;
        Ok(engine)
    }

    /// Initialize the raw input tables.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- Source rows, seq preserves input order
            CREATE TABLE raw_events (
                seq BIGINT NOT NULL,
                athlete_id BIGINT,
                name VARCHAR,
                sex VARCHAR,
                age DOUBLE,
                height DOUBLE,
                weight DOUBLE,
                team VARCHAR,
                noc VARCHAR,
                games VARCHAR,
                year INTEGER,
                season VARCHAR,
                city VARCHAR,
                sport VARCHAR,
                event VARCHAR,
                medal VARCHAR
            );

            CREATE TABLE raw_regions (
                seq BIGINT NOT NULL,
                noc VARCHAR,
                region VARCHAR,
                notes VARCHAR
            );
            "#,
        )?;
        Ok(())
    }

    fn import_events_csv(&self, path: &Path) -> Result<()> {
        let query = format!(
            r#"
            INSERT INTO raw_events
            SELECT row_number() OVER () AS seq, *
            FROM read_csv({}, header = true, nullstr = 'NA', ignore_errors = true,
                columns = {{
                    'athlete_id': 'BIGINT', 'name': 'VARCHAR', 'sex': 'VARCHAR',
                    'age': 'DOUBLE', 'height': 'DOUBLE', 'weight': 'DOUBLE',
                    'team': 'VARCHAR', 'noc': 'VARCHAR', 'games': 'VARCHAR',
                    'year': 'INTEGER', 'season': 'VARCHAR', 'city': 'VARCHAR',
                    'sport': 'VARCHAR', 'event': 'VARCHAR', 'medal': 'VARCHAR'
                }})
            "#,
            sql_string(path)
        );
        let count = self.conn.execute(&query, [])?;
        debug!(path = %path.display(), rows = count, "Imported event rows");
        Ok(())
    }

    fn import_regions_csv(&self, path: &Path) -> Result<()> {
        let source = format!(
            "read_csv({}, header = true, nullstr = 'NA', ignore_errors = true, all_varchar = true)",
            sql_string(path)
        );

        // The notes column is optional
        let columns: Vec<String> = self.query_rows(
            &format!("DESCRIBE SELECT * FROM {source}"),
            Vec::new(),
            |row| row.get(0),
        )?;
        let has_column = |name: &str| columns.iter().any(|c| c.eq_ignore_ascii_case(name));
        for required in ["noc", "region"] {
            if !has_column(required) {
                return Err(AnalyticsError::Conversion(format!(
                    "{} has no {required} column",
                    path.display()
                )));
            }
        }
        let notes = if has_column("notes") { "notes" } else { "NULL" };

        let query = format!(
            r#"
            INSERT INTO raw_regions
            SELECT row_number() OVER () AS seq, noc, region, {notes}
            FROM {source}
            "#
        );
        let count = self.conn.execute(&query, [])?;
        debug!(path = %path.display(), rows = count, "Imported region rows");
        Ok(())
    }

    fn ingest_events(&self, events: &[EventRecord]) -> Result<()> {
        let mut appender = self.conn.appender("raw_events")?;
        for (seq, record) in (1_i64..).zip(events) {
            appender.append_row(params![
                seq,
                record.athlete_id,
                record.name,
                record.sex.code(),
                record.age.map(f64::from),
                record.height_cm,
                record.weight_kg,
                record.team,
                record.noc,
                record.games,
                record.year,
                record.season.as_str(),
                record.city,
                record.sport,
                record.event,
                record.medal.map(|m| m.as_str()),
            ])?;
        }
        Ok(())
    }

    fn ingest_regions(&self, regions: &[RegionRecord]) -> Result<()> {
        let mut appender = self.conn.appender("raw_regions")?;
        for (seq, record) in (1_i64..).zip(regions) {
            appender.append_row(params![seq, record.noc, record.region, record.notes])?;
        }
        Ok(())
    }

    /// Build `events` plus the `medal_events` and `athletes` keyed views.
    fn preprocess(&self, options: &PreprocessOptions) -> Result<()> {
        let season_clause = options
            .season
            .map(|season| format!("WHERE season = '{}'", season.as_str()))
            .unwrap_or_default();

        self.conn.execute_batch(&format!(
            r#"
            CREATE TABLE events AS
            WITH regions AS (
                SELECT noc, region
                FROM raw_regions
                QUALIFY row_number() OVER (PARTITION BY noc ORDER BY seq) = 1
            ),
            distinct_rows AS (
                SELECT *
                FROM raw_events
                {season_clause}
                QUALIFY row_number() OVER (PARTITION BY {RAW_EVENT_COLUMNS} ORDER BY seq) = 1
            ),
            normalized AS (
                SELECT
                    e.*,
                    r.region AS resolved_region,
                    CASE WHEN e.medal IN ('Gold', 'Silver', 'Bronze') THEN e.medal END AS medal_label
                FROM distinct_rows e
                LEFT JOIN regions r ON e.noc = r.noc
            )
            SELECT
                seq,
                athlete_id,
                name,
                sex,
                CAST(trunc(age) AS INTEGER) AS age,
                height,
                weight,
                team,
                noc,
                resolved_region AS region,
                games,
                CAST(year AS INTEGER) AS year,
                season,
                city,
                sport,
                event,
                medal_label AS medal,
                CASE WHEN medal_label = 'Gold' THEN 1 ELSE 0 END AS gold,
                CASE WHEN medal_label = 'Silver' THEN 1 ELSE 0 END AS silver,
                CASE WHEN medal_label = 'Bronze' THEN 1 ELSE 0 END AS bronze
            FROM normalized
            WHERE year IS NOT NULL
            ORDER BY seq;

            -- First row per medal award
            CREATE VIEW medal_events AS
            SELECT *
            FROM events
            QUALIFY row_number() OVER (PARTITION BY {MEDAL_KEY} ORDER BY seq) = 1;

            -- First row per athlete and represented region
            CREATE VIEW athletes AS
            SELECT *
            FROM events
            QUALIFY row_number() OVER (PARTITION BY {ATHLETE_KEY} ORDER BY seq) = 1;
            "#
        ))?;

        let raw = self.scalar_count("SELECT count(*) FROM raw_events")?;
        let cleaned = self.scalar_count("SELECT count(*) FROM events")?;
        let unmatched =
            self.scalar_count("SELECT count(*) FROM events WHERE region IS NULL")?;
        info!(
            raw_rows = raw,
            cleaned_rows = cleaned,
            unmatched_region_rows = unmatched,
            season = ?options.season,
            "Olympics dataset preprocessed"
        );
        Ok(())
    }

    /// Number of rows in the cleaned table.
    pub fn event_count(&self) -> Result<i64> {
        self.scalar_count("SELECT count(*) FROM events")
    }

    /// Distinct years, regions and sports offered as filter choices.
    pub fn filter_options(&self) -> Result<FilterOptions> {
        let years = self.query_rows(
            "SELECT DISTINCT year FROM events ORDER BY year",
            Vec::new(),
            |row| row.get(0),
        )?;
        let countries = self.query_rows(
            "SELECT DISTINCT region FROM events WHERE region IS NOT NULL ORDER BY region",
            Vec::new(),
            |row| row.get(0),
        )?;
        let sports = self.query_rows(
            "SELECT DISTINCT sport FROM events WHERE sport IS NOT NULL ORDER BY sport",
            Vec::new(),
            |row| row.get(0),
        )?;

        Ok(FilterOptions {
            years,
            countries,
            sports,
        })
    }

    /// Headline distinct counts across the whole dataset.
    pub fn overview(&self) -> Result<OverviewStats> {
        let stats = self.conn.query_row(
            r#"
            SELECT
                count(DISTINCT year),
                count(DISTINCT city),
                count(DISTINCT sport),
                count(DISTINCT event),
                count(DISTINCT name),
                count(DISTINCT region)
            FROM events
            "#,
            [],
            |row| {
                Ok(OverviewStats {
                    editions: row.get(0)?,
                    hosts: row.get(1)?,
                    sports: row.get(2)?,
                    events: row.get(3)?,
                    athletes: row.get(4)?,
                    nations: row.get(5)?,
                })
            },
        )?;
        Ok(stats)
    }

    pub(crate) fn scalar_count(&self, sql: &str) -> Result<i64> {
        let count = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Run `sql` with positional `values` and map every row.
    pub(crate) fn query_rows<T, F>(&self, sql: &str, values: Vec<Value>, f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> duckdb::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(values), f)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AnalyticsError::from)
    }
}

/// Quote a path as a SQL string literal.
fn sql_string(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "''"))
}

/// Choices for the year, country and sport selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub countries: Vec<String>,
    pub sports: Vec<String>,
}

/// Distinct counts shown on the overview page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewStats {
    pub editions: i64,
    pub hosts: i64,
    pub sports: i64,
    pub events: i64,
    pub athletes: i64,
    pub nations: i64,
}
