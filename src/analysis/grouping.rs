//! Per-match grouping of analyses.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::api::ScreenshotAnalysis;

/// All analyses that share one match identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedMatch {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    pub match_url: String,
    /// Analyses in the order they were received.
    pub analyses: Vec<ScreenshotAnalysis>,
    pub total_analyses: usize,
    /// Newest `created_at` in the bucket.
    pub latest_analysis: DateTime<Utc>,
}

impl GroupedMatch {
    fn new(first: &ScreenshotAnalysis) -> Self {
        Self {
            match_id: first.match_id.clone(),
            home_team: first.home_team.clone(),
            away_team: first.away_team.clone(),
            match_url: first.match_url.clone(),
            analyses: Vec::new(),
            total_analyses: 0,
            latest_analysis: first.created_at,
        }
    }

    fn push(&mut self, analysis: &ScreenshotAnalysis) {
        if analysis.created_at > self.latest_analysis {
            self.latest_analysis = analysis.created_at;
        }
        // Early analyses sometimes lack team names; take them from later ones.
        if self.home_team.is_empty() && !analysis.home_team.is_empty() {
            self.home_team = analysis.home_team.clone();
        }
        if self.away_team.is_empty() && !analysis.away_team.is_empty() {
            self.away_team = analysis.away_team.clone();
        }
        self.analyses.push(analysis.clone());
        self.total_analyses = self.analyses.len();
    }

    /// The most recent analysis of the match.
    pub fn latest(&self) -> Option<&ScreenshotAnalysis> {
        self.analyses.iter().max_by_key(|a| a.created_at)
    }
}

/// Fold a flat list of analyses into one bucket per `match_id`.
///
/// Buckets are ordered by `latest_analysis`, newest first; equal timestamps
/// keep the order in which their match first appeared.
pub fn group_by_match(analyses: &[ScreenshotAnalysis]) -> Vec<GroupedMatch> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupedMatch> = Vec::new();

    for analysis in analyses {
        let slot = *index.entry(analysis.match_id.as_str()).or_insert_with(|| {
            groups.push(GroupedMatch::new(analysis));
            groups.len() - 1
        });
        groups[slot].push(analysis);
    }

    // Stable sort keeps first-appearance order for ties.
    groups.sort_by(|a, b| b.latest_analysis.cmp(&a.latest_analysis));
    groups
}
