//! Response shapes of the match-analysis API.
//!
//! Every payload here is a read-only value decoded from JSON. Optional
//! fields are lenient on purpose: the service omits keys it could not
//! scrape rather than sending nulls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Lenient timestamp decoding.
///
/// The service emits RFC 3339 strings from the database and naive
/// `datetime.now()` strings from its own envelopes. Naive values are UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, de};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    /// Parse a timestamp string in any of the accepted formats.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    /// Optional timestamps; unparseable values decode as `None`.
    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            Ok(raw.as_deref().and_then(parse))
        }
    }
}

/// Accept strings, numbers and booleans as text.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_string(deserializer)?;
    Ok(if value.is_empty() { None } else { Some(value) })
}

/// The `{success, message, timestamp, data}` wrapper around every call.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, with = "timestamp::option")]
    pub timestamp: Option<DateTime<Utc>>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, turning `success: false` into an error.
    pub fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(Error::Rejected(self.message));
        }
        self.data
            .ok_or_else(|| Error::Rejected(format!("response carried no data: {}", self.message)))
    }
}

/// `GET /` service description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, with = "timestamp::option")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Endpoint listing, kept as sent.
    #[serde(default, alias = "active_endpoints")]
    pub endpoints: serde_json::Value,
}

/// Live state of a fixture as scraped from SofaScore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum MatchStatus {
    #[default]
    NotStarted,
    InProgress,
    Finished,
    Postponed,
    Other(String),
}

impl From<String> for MatchStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "not_started" => Self::NotStarted,
            "in_progress" => Self::InProgress,
            "finished" => Self::Finished,
            "postponed" => Self::Postponed,
            _ => Self::Other(raw),
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "Not started"),
            Self::InProgress => write!(f, "Live"),
            Self::Finished => write!(f, "Finished"),
            Self::Postponed => write!(f, "Postponed"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// A collected match link, optionally enriched with score and status.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MatchLink {
    #[serde(default)]
    pub match_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub home_score: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub away_score: Option<String>,
    #[serde(default)]
    pub match_time: Option<String>,
    #[serde(default)]
    pub match_status: Option<MatchStatus>,
}

/// Summary counters of a link collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinkStatistics {
    #[serde(default)]
    pub total_filtered_links: u64,
    #[serde(default)]
    pub unique_match_ids: u64,
}

/// Payload of the latest-links and collect-links calls.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinksData {
    #[serde(default, alias = "matches")]
    pub filtered_links: Vec<MatchLink>,
    #[serde(default)]
    pub statistics: Option<LinkStatistics>,
}

/// Payload of the collect-links call: the bare link array, or the same
/// object latest-links returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CollectedLinks {
    List(Vec<MatchLink>),
    Data(LinksData),
}

impl CollectedLinks {
    pub fn into_links(self) -> Vec<MatchLink> {
        match self {
            Self::List(links) => links,
            Self::Data(data) => data.filtered_links,
        }
    }
}

/// `POST /sofascore/collect-links` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectLinksResponse {
    #[serde(flatten)]
    pub envelope: Envelope<CollectedLinks>,
    #[serde(default)]
    pub total_links: Option<u64>,
    #[serde(default)]
    pub filtered_links: Option<u64>,
}

/// Metadata about the stored collection the links came from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default, with = "timestamp::option")]
    pub collection_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_links: u64,
}

/// `GET /sofascore/latest-links` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestLinksResponse {
    #[serde(flatten)]
    pub envelope: Envelope<LinksData>,
    #[serde(default)]
    pub collection_info: Option<CollectionInfo>,
}

/// One stored analysis of a match.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScreenshotAnalysis {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    /// Empty when the service stored the analysis without a match.
    #[serde(default, deserialize_with = "lenient_string")]
    pub match_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub home_team: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub away_team: String,
    #[serde(default)]
    pub match_url: String,
    #[serde(default)]
    pub analysis_text: String,
    #[serde(default)]
    pub screenshot_filename: Option<String>,
    #[serde(default)]
    pub analysis_type: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Paged list of analyses.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisListResponse {
    #[serde(flatten)]
    pub envelope: Envelope<Vec<ScreenshotAnalysis>>,
    #[serde(default)]
    pub total_analyses: Option<u64>,
}

/// Home/away pair of a single statistic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatPair {
    #[serde(default, deserialize_with = "lenient_string")]
    pub home: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub away: String,
}

/// A goal, card, substitution or other notable moment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MatchEvent {
    #[serde(default, alias = "minute", deserialize_with = "lenient_opt_string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub player: Option<String>,
    #[serde(default, alias = "detail", deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
}

/// Result of an analysis generation call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DataAnalysis {
    #[serde(default, deserialize_with = "lenient_string")]
    pub match_id: String,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub match_url: Option<String>,
    #[serde(default, alias = "analysis")]
    pub analysis_text: String,
    #[serde(default)]
    pub screenshot_filename: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    /// Category -> statistic name -> values.
    #[serde(default)]
    pub statistics: BTreeMap<String, BTreeMap<String, StatPair>>,
    /// Category -> events, e.g. `goals`, `cards`.
    #[serde(default)]
    pub events: BTreeMap<String, Vec<MatchEvent>>,
}

/// Result of a raw screenshot capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScreenshotCapture {
    #[serde(default, alias = "screenshot_filename")]
    pub filename: Option<String>,
    #[serde(default, alias = "screenshot_path")]
    pub path: Option<String>,
    #[serde(default)]
    pub match_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 14, 18, 30, 0).unwrap();
        assert_eq!(timestamp::parse("2025-03-14T18:30:00+00:00"), Some(expected));
        assert_eq!(timestamp::parse("2025-03-14T21:30:00+03:00"), Some(expected));
        assert_eq!(timestamp::parse("2025-03-14T18:30:00"), Some(expected));
        assert_eq!(timestamp::parse("2025-03-14 18:30:00"), Some(expected));
        assert!(timestamp::parse("2025-03-14T18:30:00.123456").is_some());
        assert_eq!(timestamp::parse("yesterday"), None);
    }

    #[test]
    fn test_envelope_rejected() {
        let raw = r#"{"success": false, "message": "Nenhum link encontrado", "timestamp": "2025-03-14T18:30:00", "data": null}"#;
        let envelope: Envelope<LinksData> = serde_json::from_str(raw).unwrap();
        match envelope.into_data() {
            Err(Error::Rejected(msg)) => assert_eq!(msg, "Nenhum link encontrado"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_latest_links_response() {
        let raw = r#"{
            "success": true,
            "message": "ok",
            "timestamp": "2025-03-14T18:30:00.5",
            "data": {
                "filtered_links": [
                    {
                        "url": "https://www.sofascore.com/pt/football/match/a-b/xyz#id:12345",
                        "home_team": "Flamengo",
                        "away_team": "Palmeiras",
                        "home_score": 2,
                        "away_score": "1",
                        "match_time": "67'",
                        "match_status": "in_progress"
                    }
                ],
                "statistics": {"total_filtered_links": 1, "unique_match_ids": 1}
            },
            "collection_info": {"id": "c1", "collection_timestamp": "2025-03-14T18:29:00+00:00", "total_links": 1}
        }"#;
        let response: LatestLinksResponse = serde_json::from_str(raw).unwrap();
        let info = response.collection_info.unwrap();
        assert_eq!(info.total_links, 1);
        assert!(info.collection_timestamp.is_some());

        let data = response.envelope.into_data().unwrap();
        let link = &data.filtered_links[0];
        assert_eq!(link.home_score.as_deref(), Some("2"));
        assert_eq!(link.away_score.as_deref(), Some("1"));
        assert_eq!(link.match_status, Some(MatchStatus::InProgress));
        assert_eq!(data.statistics.unwrap().unique_match_ids, 1);
    }

    #[test]
    fn test_collect_links_array_payload() {
        let raw = r#"{
            "success": true,
            "message": "Links coletados",
            "timestamp": "2025-03-14T18:30:00",
            "data": [
                {"url": "https://www.sofascore.com/pt/football/match/a-b/xyz#id:1", "match_id": "1",
                 "home_team": "Santos", "away_team": "Ceará"}
            ],
            "total_links": 10,
            "filtered_links": 1
        }"#;
        let response: CollectLinksResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.total_links, Some(10));
        assert_eq!(response.filtered_links, Some(1));

        let links = response.envelope.into_data().unwrap().into_links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].match_id, "1");
        assert_eq!(links[0].away_team, "Ceará");
    }

    #[test]
    fn test_collect_links_object_payload() {
        let raw = r#"{
            "success": true,
            "data": {"filtered_links": [{"url": "https://www.sofascore.com/m#id:2"}]}
        }"#;
        let response: CollectLinksResponse = serde_json::from_str(raw).unwrap();
        let links = response.envelope.into_data().unwrap().into_links();
        assert_eq!(links[0].url, "https://www.sofascore.com/m#id:2");
        assert_eq!(response.total_links, None);
    }

    #[test]
    fn test_unknown_status_kept() {
        let status: MatchStatus = serde_json::from_str(r#""interrupted""#).unwrap();
        assert_eq!(status, MatchStatus::Other("interrupted".to_string()));
        assert_eq!(status.to_string(), "interrupted");
    }

    #[test]
    fn test_analysis_list_response() {
        let raw = r#"{
            "success": true,
            "message": "2 análises",
            "timestamp": "2025-03-14T18:30:00",
            "total_analyses": 2,
            "data": [
                {"id": "a1", "match_id": 12345, "home_team": "Flamengo", "away_team": "Palmeiras",
                 "match_url": "u", "analysis_text": "**Resumo**", "created_at": "2025-03-14T18:00:00+00:00"},
                {"id": "a2", "match_id": "12345", "match_url": "u", "analysis_text": "x",
                 "screenshot_filename": "shot.png", "created_at": "2025-03-14T18:10:00"}
            ]
        }"#;
        let response: AnalysisListResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.total_analyses, Some(2));
        let analyses = response.envelope.into_data().unwrap();
        assert_eq!(analyses[0].match_id, "12345");
        assert_eq!(analyses[1].match_id, "12345");
        assert_eq!(analyses[1].home_team, "");
        assert_eq!(analyses[1].screenshot_filename.as_deref(), Some("shot.png"));
    }

    #[test]
    fn test_analysis_list_tolerates_missing_keys() {
        let raw = r#"{
            "success": true,
            "data": [
                {"id": "a1", "match_id": "7", "created_at": "2025-03-14T18:00:00+00:00"},
                {"id": "a2", "created_at": "2025-03-14T18:05:00+00:00"},
                {"match_id": "8", "created_at": "2025-03-14T18:10:00+00:00"}
            ]
        }"#;
        let response: AnalysisListResponse = serde_json::from_str(raw).unwrap();
        let analyses = response.envelope.into_data().unwrap();
        assert_eq!(analyses.len(), 3);
        assert_eq!(analyses[1].match_id, "");
        assert_eq!(analyses[2].id, "");

        let kept = crate::api::DataConverter::clean_analyses(analyses);
        let ids: Vec<_> = kept.iter().map(|a| a.match_id.as_str()).collect();
        assert_eq!(ids, vec!["7", "8"]);
    }

    #[test]
    fn test_analysis_requires_created_at() {
        let raw = r#"{"id": "a1", "match_id": "1", "created_at": "not a date"}"#;
        assert!(serde_json::from_str::<ScreenshotAnalysis>(raw).is_err());
    }

    #[test]
    fn test_data_analysis_with_statistics() {
        let raw = r###"{
            "match_id": "12345",
            "analysis": "## Situação\n- pressão alta",
            "statistics": {"possession": {"Ball possession": {"home": "58%", "away": "42%"}},
                           "shots": {"Total shots": {"home": 12, "away": 7}}},
            "events": {"goals": [{"time": 23, "team": "home", "player": "Pedro"}]}
        }"###;
        let analysis: DataAnalysis = serde_json::from_str(raw).unwrap();
        assert!(analysis.analysis_text.starts_with("## Situação"));
        assert_eq!(analysis.statistics["shots"]["Total shots"].home, "12");
        assert_eq!(analysis.events["goals"][0].time.as_deref(), Some("23"));
        assert_eq!(analysis.created_at, None);
    }
}
