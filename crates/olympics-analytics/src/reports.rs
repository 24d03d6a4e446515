//! Report generation for analytics data.

use crate::demographics::AgeSummary;
use crate::engine::{OlympicsEngine, OverviewStats};
use crate::error::{AnalyticsError, Result};
use crate::heatmap::PivotTable;
use crate::leaderboard::AthleteRanking;
use crate::tally::{MedalTallyRow, YearlyMedalCount};
use crate::trends::{EditionCount, SexParticipation};
use olympics_domain::{
    DEFAULT_LEADERBOARD_LIMIT, LeaderboardFilter, MedalClass, MedalTallyFilter,
    ParticipationEntity,
};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution};

/// What a report covers. `None` filters mean all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub year: Option<i32>,
    pub country: Option<String>,
    pub sport: Option<String>,
    /// Number of medal tally rows to keep, `None` for the full list
    pub tally_limit: Option<usize>,
    pub athlete_limit: usize,
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self {
            year: None,
            country: None,
            sport: None,
            tally_limit: Some(10),
            athlete_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

/// Sections that only exist for a selected country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryReport {
    pub country: String,
    pub yearwise_tally: Vec<YearlyMedalCount>,
    pub sport_heatmap: PivotTable,
    pub top_athletes: Vec<AthleteRanking>,
}

/// Age summary line for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeReportLine {
    pub label: String,
    pub summary: Option<AgeSummary>,
}

/// Average build of athletes in one medal class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysiqueReportLine {
    pub medal: MedalClass,
    pub athletes: usize,
    pub mean_height_cm: Option<f64>,
    pub mean_weight_kg: Option<f64>,
}

/// Comprehensive analytics report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlympicsReport {
    pub generated_at: String,
    pub request: ReportRequest,
    pub overview: OverviewStats,
    pub medal_tally: Vec<MedalTallyRow>,
    pub nations_over_time: Vec<EditionCount>,
    pub events_over_time: Vec<EditionCount>,
    pub athletes_over_time: Vec<EditionCount>,
    pub men_vs_women: Vec<SexParticipation>,
    pub sport_event_heatmap: PivotTable,
    pub top_athletes: Vec<AthleteRanking>,
    pub age_summary: Vec<AgeReportLine>,
    pub physique: Vec<PhysiqueReportLine>,
    pub country: Option<CountryReport>,
}

impl OlympicsEngine {
    /// Generate comprehensive analytics report.
    pub fn generate_report(&self, request: &ReportRequest) -> Result<OlympicsReport> {
        let tally_filter = MedalTallyFilter {
            year: request.year,
            country: request.country.clone(),
        };
        let mut medal_tally = self.medal_tally(&tally_filter)?;
        if let Some(limit) = request.tally_limit {
            medal_tally.truncate(limit);
        }

        let leaderboard_filter = LeaderboardFilter {
            sport: request.sport.clone(),
            country: None,
        };
        let top_athletes = self.most_successful(&leaderboard_filter, request.athlete_limit)?;

        let age_summary = self
            .age_distribution()?
            .samples
            .into_iter()
            .map(|sample| AgeReportLine {
                label: sample.label,
                summary: sample.summary,
            })
            .collect();

        let country = request
            .country
            .as_deref()
            .map(|country| self.country_report(country))
            .transpose()?;

        Ok(OlympicsReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            request: request.clone(),
            overview: self.overview()?,
            medal_tally,
            nations_over_time: self.participation_over_time(ParticipationEntity::Nations)?,
            events_over_time: self.participation_over_time(ParticipationEntity::Events)?,
            athletes_over_time: self.participation_over_time(ParticipationEntity::Athletes)?,
            men_vs_women: self.men_vs_women()?,
            sport_event_heatmap: self.sport_event_heatmap()?,
            top_athletes,
            age_summary,
            physique: self.physique_report(request.sport.as_deref())?,
            country,
        })
    }

    fn country_report(&self, country: &str) -> Result<CountryReport> {
        Ok(CountryReport {
            country: country.to_string(),
            yearwise_tally: self.yearwise_medal_tally(country)?,
            sport_heatmap: self.country_sport_heatmap(country)?,
            top_athletes: self.most_successful_in_country(country)?,
        })
    }

    fn physique_report(&self, sport: Option<&str>) -> Result<Vec<PhysiqueReportLine>> {
        let athletes = self.athlete_physique(sport)?;
        let classes = [
            MedalClass::Gold,
            MedalClass::Silver,
            MedalClass::Bronze,
            MedalClass::NoMedal,
        ];

        Ok(classes
            .into_iter()
            .map(|medal| {
                let group: Vec<_> = athletes.iter().filter(|a| a.medal == medal).collect();
                PhysiqueReportLine {
                    medal,
                    athletes: group.len(),
                    mean_height_cm: mean(group.iter().filter_map(|a| a.height_cm)),
                    mean_weight_kg: mean(group.iter().filter_map(|a| a.weight_kg)),
                }
            })
            .collect())
    }

    /// Generate report as JSON string.
    pub fn generate_report_json(&self, request: &ReportRequest) -> Result<String> {
        let report = self.generate_report(request)?;
        serde_json::to_string_pretty(&report)
            .map_err(|e| AnalyticsError::Conversion(e.to_string()))
    }

    /// Generate Markdown report.
    pub fn generate_report_markdown(&self, request: &ReportRequest) -> Result<String> {
        let report = self.generate_report(request)?;
        Ok(render_markdown(&report))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return None;
    }
    Data::new(values).mean()
}

fn tally_title(request: &ReportRequest) -> String {
    match (request.year, request.country.as_deref()) {
        (None, None) => "Overall Tally".to_string(),
        (None, Some(country)) => format!("{country} overall performance"),
        (Some(year), None) => format!("Medal Tally in {year} Olympics"),
        (Some(year), Some(country)) => format!("{country} performance in {year} Olympics"),
    }
}

fn render_markdown(report: &OlympicsReport) -> String {
    let mut md = String::new();
    md.push_str("# Olympics Analytics Report\n\n");
    md.push_str(&format!("**Generated:** {}\n\n", report.generated_at));

    md.push_str("## Overview\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    let stats = &report.overview;
    for (label, value) in [
        ("Editions", stats.editions),
        ("Hosts", stats.hosts),
        ("Sports", stats.sports),
        ("Events", stats.events),
        ("Athletes", stats.athletes),
        ("Nations", stats.nations),
    ] {
        md.push_str(&format!("| {label} | {value} |\n"));
    }
    md.push('\n');

    md.push_str(&format!("## {}\n\n", tally_title(&report.request)));
    if report.medal_tally.is_empty() {
        md.push_str("_No medals for this selection._\n\n");
    } else {
        md.push_str("| Rank | Team | NOC | Region | Gold | Silver | Bronze | Total |\n");
        md.push_str("|------|------|-----|--------|------|--------|--------|-------|\n");
        for (i, row) in report.medal_tally.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
                i + 1,
                row.team,
                row.noc,
                row.region,
                row.gold,
                row.silver,
                row.bronze,
                row.total
            ));
        }
        md.push('\n');
    }

    md.push_str("## Participation over the Years\n\n");
    md.push_str("| Edition | Nations | Events | Athletes | Male | Female |\n");
    md.push_str("|---------|---------|--------|----------|------|--------|\n");
    for (i, nations) in report.nations_over_time.iter().enumerate() {
        let events = report.events_over_time.get(i).map_or(0, |p| p.count);
        let athletes = report.athletes_over_time.get(i).map_or(0, |p| p.count);
        let (male, female) = report
            .men_vs_women
            .iter()
            .find(|p| p.year == nations.edition)
            .map_or((0, 0), |p| (p.male, p.female));
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            nations.edition, nations.count, events, athletes, male, female
        ));
    }
    md.push('\n');

    if !report.sport_event_heatmap.is_empty() {
        md.push_str("## Events per Sport\n\n");
        render_pivot(&mut md, "Sport", &report.sport_event_heatmap);
    }

    if !report.top_athletes.is_empty() {
        let scope = report.request.sport.as_deref().unwrap_or("All Sports");
        md.push_str(&format!("## Most Successful Athletes ({scope})\n\n"));
        render_athletes(&mut md, &report.top_athletes);
    }

    md.push_str("## Age Distribution\n\n");
    md.push_str("| Sample | Athletes | Mean | Median | Std Dev | Min | Max |\n");
    md.push_str("|--------|----------|------|--------|---------|-----|-----|\n");
    for line in &report.age_summary {
        match &line.summary {
            Some(s) => {
                let std_dev = s
                    .std_dev
                    .map_or_else(|| "N/A".to_string(), |sd| format!("{sd:.1}"));
                md.push_str(&format!(
                    "| {} | {} | {:.1} | {:.1} | {} | {} | {} |\n",
                    line.label, s.count, s.mean, s.median, std_dev, s.min, s.max
                ));
            }
            None => {
                md.push_str(&format!("| {} | 0 | N/A | N/A | N/A | N/A | N/A |\n", line.label));
            }
        }
    }
    md.push('\n');

    md.push_str("## Height and Weight by Medal\n\n");
    md.push_str("| Medal | Athletes | Mean Height | Mean Weight |\n");
    md.push_str("|-------|----------|-------------|-------------|\n");
    for line in &report.physique {
        let height = line
            .mean_height_cm
            .map_or_else(|| "N/A".to_string(), |h| format!("{h:.1} cm"));
        let weight = line
            .mean_weight_kg
            .map_or_else(|| "N/A".to_string(), |w| format!("{w:.1} kg"));
        md.push_str(&format!("| {} | {} | {} | {} |\n", line.medal, line.athletes, height, weight));
    }
    md.push('\n');

    if let Some(ref country) = report.country {
        md.push_str(&format!("## {} Medal Tally over the Years\n\n", country.country));
        md.push_str("| Year | Medals |\n");
        md.push_str("|------|--------|\n");
        for point in &country.yearwise_tally {
            md.push_str(&format!("| {} | {} |\n", point.year, point.medals));
        }
        md.push('\n');

        if !country.sport_heatmap.is_empty() {
            md.push_str(&format!("## {} Medals per Sport\n\n", country.country));
            render_pivot(&mut md, "Sport", &country.sport_heatmap);
        }

        if !country.top_athletes.is_empty() {
            md.push_str(&format!("## Top Athletes of {}\n\n", country.country));
            render_athletes(&mut md, &country.top_athletes);
        }
    }

    md
}

fn render_pivot(md: &mut String, row_header: &str, pivot: &PivotTable) {
    md.push_str(&format!("| {row_header} |"));
    for year in &pivot.years {
        md.push_str(&format!(" {year} |"));
    }
    md.push('\n');
    md.push_str("|---|");
    md.push_str(&"---|".repeat(pivot.years.len()));
    md.push('\n');
    for (label, line) in pivot.rows.iter().zip(&pivot.cells) {
        md.push_str(&format!("| {label} |"));
        for count in line {
            md.push_str(&format!(" {count} |"));
        }
        md.push('\n');
    }
    md.push('\n');
}

fn render_athletes(md: &mut String, athletes: &[AthleteRanking]) {
    md.push_str("| Rank | Athlete | Medals | Sport | Region |\n");
    md.push_str("|------|---------|--------|-------|--------|\n");
    for (i, athlete) in athletes.iter().enumerate() {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            i + 1,
            athlete.name,
            athlete.medals,
            athlete.sport.as_deref().unwrap_or("N/A"),
            athlete.region.as_deref().unwrap_or("Unknown")
        ));
    }
    md.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PreprocessOptions;
    use crate::test_support::sample_engine;

    #[test]
    fn test_empty_report() {
        let engine = OlympicsEngine::from_records(&[], &[], &PreprocessOptions::default()).unwrap();
        let report = engine.generate_report(&ReportRequest::default()).unwrap();
        assert!(report.medal_tally.is_empty());
        assert!(report.top_athletes.is_empty());
        assert!(report.men_vs_women.is_empty());
        assert!(report.country.is_none());
        assert_eq!(report.age_summary.len(), 4);
    }

    #[test]
    fn test_tally_limit_truncates() {
        let engine = sample_engine();
        let request = ReportRequest {
            tally_limit: Some(1),
            ..ReportRequest::default()
        };
        let report = engine.generate_report(&request).unwrap();
        assert_eq!(report.medal_tally.len(), 1);
        assert_eq!(report.medal_tally[0].region, "USA");
    }

    #[test]
    fn test_country_section() {
        let engine = sample_engine();
        let request = ReportRequest {
            country: Some("Kenya".to_string()),
            ..ReportRequest::default()
        };
        let report = engine.generate_report(&request).unwrap();
        let country = report.country.unwrap();
        assert_eq!(country.yearwise_tally.len(), 2);
        assert_eq!(country.top_athletes[0].name, "Ann");
        assert_eq!(report.medal_tally.len(), 1);
    }

    #[test]
    fn test_physique_report_groups_by_medal() {
        let engine = sample_engine();
        let report = engine.generate_report(&ReportRequest::default()).unwrap();
        let gold = report
            .physique
            .iter()
            .find(|line| line.medal == MedalClass::Gold)
            .unwrap();
        // Ann, Bob, Cal and Dan; only Ann and Bob have measurements.
        assert_eq!(gold.athletes, 4);
        assert!((gold.mean_height_cm.unwrap() - 176.5).abs() < 1e-9);
    }

    #[test]
    fn test_markdown_generation() {
        let engine = sample_engine();
        let request = ReportRequest {
            year: Some(2000),
            country: Some("USA".to_string()),
            ..ReportRequest::default()
        };
        let md = engine.generate_report_markdown(&request).unwrap();
        assert!(md.contains("# Olympics Analytics Report"));
        assert!(md.contains("## USA performance in 2000 Olympics"));
        assert!(md.contains("| 1 | USA | USA | USA | 2 | 0 | 1 | 3 |"));
        assert!(md.contains("## Top Athletes of USA"));
    }

    #[test]
    fn test_json_generation() {
        let engine = sample_engine();
        let json = engine.generate_report_json(&ReportRequest::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["overview"]["editions"], 3);
        assert_eq!(value["physique"][3]["medal"], "No Medal");
    }
}
