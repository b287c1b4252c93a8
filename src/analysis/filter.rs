//! Search, ordering and paging over loaded lists.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use crate::api::{MatchLink, ScreenshotAnalysis};

/// Ordering of the history screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest `created_at` first.
    #[default]
    Date,
    /// Home team A-Z.
    Team,
}

impl SortOrder {
    /// The other ordering.
    pub fn toggle(self) -> Self {
        match self {
            Self::Date => Self::Team,
            Self::Team => Self::Date,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "date (newest)",
            Self::Team => "team (A-Z)",
        }
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Case-insensitive substring match over team names. The query is used as typed.
pub fn teams_match(home: &str, away: &str, query: &str) -> bool {
    let needle = query.to_lowercase();
    needle.is_empty() || contains_ci(home, &needle) || contains_ci(away, &needle)
}

/// Matches whose team names contain `query`, ignoring case.
pub fn search_matches<'a>(matches: &'a [MatchLink], query: &str) -> Vec<&'a MatchLink> {
    matches
        .iter()
        .filter(|m| teams_match(&m.home_team, &m.away_team, query))
        .collect()
}

/// Analyses whose team names or text contain `query`, ignoring case.
pub fn search_analyses<'a>(
    analyses: &'a [ScreenshotAnalysis],
    query: &str,
) -> Vec<&'a ScreenshotAnalysis> {
    let needle = query.to_lowercase();
    analyses
        .iter()
        .filter(|a| {
            needle.is_empty()
                || contains_ci(&a.home_team, &needle)
                || contains_ci(&a.away_team, &needle)
                || contains_ci(&a.analysis_text, &needle)
        })
        .collect()
}

/// Sort analyses in place. Both orders are stable.
pub fn sort_analyses(analyses: &mut [&ScreenshotAnalysis], order: SortOrder) {
    match order {
        SortOrder::Date => analyses.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Team => {
            analyses.sort_by_cached_key(|a| a.home_team.to_lowercase());
        }
    }
}

/// Number of pages needed for `len` items; at least one.
pub fn page_count(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 1;
    }
    len.div_ceil(per_page).max(1)
}

/// The slice of `items` shown on zero-based `page`, clamped to the last page.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if per_page == 0 {
        return items;
    }
    let page = page.min(page_count(items.len(), per_page) - 1);
    let start = (page * per_page).min(items.len());
    let end = (start + per_page).min(items.len());
    &items[start..end]
}

/// Counters shown above the history list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    pub total: usize,
    pub today: usize,
    pub yesterday: usize,
    pub unique_matches: usize,
}

impl AnalysisStats {
    /// Compute counters relative to `now`, using UTC calendar days.
    pub fn compute(analyses: &[ScreenshotAnalysis], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let yesterday = (now - Duration::days(1)).date_naive();

        let on_day = |day| {
            analyses
                .iter()
                .filter(|a| a.created_at.date_naive() == day)
                .count()
        };

        Self {
            total: analyses.len(),
            today: on_day(today),
            yesterday: on_day(yesterday),
            unique_matches: analyses
                .iter()
                .map(|a| a.match_id.as_str())
                .collect::<HashSet<_>>()
                .len(),
        }
    }
}

/// "N minutes ago" style rendering of `then` relative to `now`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    if elapsed < Duration::minutes(1) {
        return "just now".to_string();
    }

    let (value, unit) = if elapsed < Duration::hours(1) {
        (elapsed.num_minutes(), "minute")
    } else if elapsed < Duration::days(1) {
        (elapsed.num_hours(), "hour")
    } else {
        (elapsed.num_days(), "day")
    };

    if value == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{value} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn analysis(id: &str, match_id: &str, home: &str, away: &str, at: DateTime<Utc>) -> ScreenshotAnalysis {
        ScreenshotAnalysis {
            id: id.to_string(),
            match_id: match_id.to_string(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            match_url: String::new(),
            analysis_text: format!("{home} pressiona {away}"),
            screenshot_filename: None,
            analysis_type: None,
            created_at: at,
            updated_at: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_team_search_is_case_insensitive_substring() {
        let matches = vec![
            MatchLink {
                home_team: "Flamengo".to_string(),
                away_team: "Palmeiras".to_string(),
                ..Default::default()
            },
            MatchLink {
                home_team: "Real Madrid".to_string(),
                away_team: "Barcelona".to_string(),
                ..Default::default()
            },
        ];

        let found = search_matches(&matches, "MENG");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].home_team, "Flamengo");

        assert_eq!(search_matches(&matches, "celo").len(), 1);
        assert_eq!(search_matches(&matches, "").len(), 2);
        assert!(search_matches(&matches, "santos").is_empty());
    }

    #[test]
    fn test_analysis_search_includes_text() {
        let analyses = vec![
            analysis("1", "m1", "Grêmio", "Inter", now()),
            analysis("2", "m2", "Bahia", "Vitória", now()),
        ];
        assert_eq!(search_analyses(&analyses, "PRESSIONA inter").len(), 1);
        assert_eq!(search_analyses(&analyses, "grêmio").len(), 1);
        assert_eq!(search_analyses(&analyses, "").len(), 2);
    }

    #[test]
    fn test_search_keeps_surrounding_spaces() {
        let matches = vec![
            MatchLink {
                home_team: "Real Madrid".to_string(),
                away_team: "Barcelona".to_string(),
                ..Default::default()
            },
            MatchLink {
                home_team: "Madrid FC".to_string(),
                away_team: "Getafe".to_string(),
                ..Default::default()
            },
        ];

        let found = search_matches(&matches, " madrid");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].home_team, "Real Madrid");
        assert_eq!(search_matches(&matches, "madrid").len(), 2);
    }

    #[test]
    fn test_sort_orders() {
        let analyses = vec![
            analysis("old", "m1", "Santos", "A", now() - Duration::hours(2)),
            analysis("new", "m2", "bahia", "B", now()),
            analysis("mid", "m3", "Corinthians", "C", now() - Duration::hours(1)),
        ];
        let mut refs: Vec<_> = analyses.iter().collect();

        sort_analyses(&mut refs, SortOrder::Date);
        let ids: Vec<_> = refs.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);

        sort_analyses(&mut refs, SortOrder::Team);
        let teams: Vec<_> = refs.iter().map(|a| a.home_team.as_str()).collect();
        assert_eq!(teams, vec!["bahia", "Corinthians", "Santos"]);
    }

    #[test]
    fn test_paginate_clamps() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(page_count(items.len(), 10), 3);
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(paginate(&items, 0, 10), &items[0..10]);
        assert_eq!(paginate(&items, 2, 10), &items[20..25]);
        assert_eq!(paginate(&items, 9, 10), &items[20..25]);
        assert!(paginate(&Vec::<u32>::new(), 3, 10).is_empty());
    }

    #[test]
    fn test_stats() {
        let analyses = vec![
            analysis("1", "m1", "A", "B", now()),
            analysis("2", "m1", "A", "B", now() - Duration::hours(14)),
            analysis("3", "m2", "C", "D", now() - Duration::hours(20)),
            analysis("4", "m3", "E", "F", now() - Duration::days(3)),
        ];
        let stats = AnalysisStats::compute(&analyses, now());
        assert_eq!(
            stats,
            AnalysisStats {
                total: 4,
                today: 2,
                yesterday: 1,
                unique_matches: 3,
            }
        );
    }

    #[test]
    fn test_relative_time() {
        assert_eq!(relative_time(now(), now()), "just now");
        assert_eq!(relative_time(now() - Duration::minutes(1), now()), "1 minute ago");
        assert_eq!(relative_time(now() - Duration::minutes(45), now()), "45 minutes ago");
        assert_eq!(relative_time(now() - Duration::hours(3), now()), "3 hours ago");
        assert_eq!(relative_time(now() - Duration::days(2), now()), "2 days ago");
    }
}
