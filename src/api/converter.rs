//! Normalization of API payloads before they reach the store.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{DataAnalysis, MatchLink, MatchStatus, ScreenshotAnalysis};
use chrono::{DateTime, Utc};

/// SofaScore appends `#id:<event id>` to match URLs.
static URL_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#id:(\d+)").expect("valid regex"));

/// Separators used between team names in link titles.
static TEAMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(.+?)\s+(?:-|vs\.?|x)\s+(.+?)\s*$").expect("valid regex"));

/// Placeholder the scraper writes into both scores of a postponed match.
const POSTPONED_SCORE: &str = "Adiado";

/// Converts API responses into the shapes the views expect.
pub struct DataConverter;

impl DataConverter {
    /// Fill in identifiers and team names the scraper left empty.
    pub fn normalize_link(mut link: MatchLink) -> MatchLink {
        if link.match_id.is_empty()
            && let Some(id) = Self::match_id_from_url(&link.url)
        {
            link.match_id = id;
        }

        if link.home_team.is_empty() || link.away_team.is_empty() {
            let label = link.title.as_deref().or(link.text.as_deref()).unwrap_or("");
            if let Some((home, away)) = Self::split_teams(label) {
                link.home_team = home;
                link.away_team = away;
            }
        }

        if link.match_id.is_empty() {
            // Fall back to the URL so grouping and selection still have a key.
            link.match_id = link.url.clone();
        }

        link
    }

    /// Normalize every link of a collection.
    pub fn normalize_links(links: Vec<MatchLink>) -> Vec<MatchLink> {
        links.into_iter().map(Self::normalize_link).collect()
    }

    /// Extract the numeric event id from a SofaScore match URL.
    pub fn match_id_from_url(url: &str) -> Option<String> {
        URL_ID_RE
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Split a `"Home - Away"` label into its two team names.
    pub fn split_teams(label: &str) -> Option<(String, String)> {
        let caps = TEAMS_RE.captures(label)?;
        Some((caps[1].to_string(), caps[2].to_string()))
    }

    /// Whether a match was postponed, either by status or by score placeholder.
    pub fn is_postponed(link: &MatchLink) -> bool {
        link.match_status == Some(MatchStatus::Postponed)
            || (link.home_score.as_deref() == Some(POSTPONED_SCORE)
                && link.away_score.as_deref() == Some(POSTPONED_SCORE))
    }

    /// The `home - away` score line, when the match has one worth showing.
    pub fn score_line(link: &MatchLink) -> Option<String> {
        if Self::is_postponed(link) || link.match_status == Some(MatchStatus::NotStarted) {
            return None;
        }
        match (&link.home_score, &link.away_score) {
            (Some(home), Some(away)) => Some(format!("{home} - {away}")),
            _ => None,
        }
    }

    /// Stamp a generated analysis with the envelope time when it has none.
    pub fn stamp_analysis(
        mut analysis: DataAnalysis,
        match_id: &str,
        received_at: Option<DateTime<Utc>>,
    ) -> DataAnalysis {
        if analysis.match_id.is_empty() {
            analysis.match_id = match_id.to_string();
        }
        if analysis.created_at.is_none() {
            analysis.created_at = Some(received_at.unwrap_or_else(Utc::now));
        }
        analysis
    }

    /// Drop analyses without a usable match key.
    pub fn clean_analyses(analyses: Vec<ScreenshotAnalysis>) -> Vec<ScreenshotAnalysis> {
        let before = analyses.len();
        let cleaned: Vec<_> = analyses
            .into_iter()
            .filter(|a| !a.match_id.trim().is_empty())
            .collect();
        if cleaned.len() != before {
            tracing::warn!(dropped = before - cleaned.len(), "Analyses without match_id ignored");
        }
        cleaned
    }
}
