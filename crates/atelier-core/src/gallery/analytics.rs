//! Gallery statistics derived from artifact timestamps and text.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::artifact::Artifact;

const POPULAR_TERM_LIMIT: usize = 8;
const ACTIVITY_DAYS: i64 = 7;

/// Window of creation times counted in `total_designs` and popular terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Week,
    Month,
    All,
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "all" => Ok(TimeRange::All),
            other => Err(format!("unknown time range '{other}' (expected week, month or all)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryStats {
    pub range: TimeRange,
    pub total_designs: usize,
    pub today_designs: usize,
    /// Week-over-week change in percent; 0 when last week was empty.
    pub weekly_growth: f64,
    pub popular_terms: Vec<TermCount>,
    /// Oldest day first, ending today.
    pub daily_activity: Vec<DailyCount>,
}

impl GalleryStats {
    /// Computes statistics as of `now`. Days are UTC calendar days.
    pub fn compute(artifacts: &[Artifact], range: TimeRange, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let today_start = today.and_time(NaiveTime::MIN).and_utc();
        let week_ago = today_start - Duration::days(7);
        let two_weeks_ago = week_ago - Duration::days(7);
        let month_ago = today_start - Duration::days(30);

        let in_range: Vec<&Artifact> = artifacts
            .iter()
            .filter(|a| match range {
                TimeRange::Week => a.created_at >= week_ago,
                TimeRange::Month => a.created_at >= month_ago,
                TimeRange::All => true,
            })
            .collect();

        let today_designs = artifacts
            .iter()
            .filter(|a| a.created_at >= today_start)
            .count();

        let this_week = artifacts.iter().filter(|a| a.created_at >= week_ago).count();
        let last_week = artifacts
            .iter()
            .filter(|a| a.created_at >= two_weeks_ago && a.created_at < week_ago)
            .count();
        let weekly_growth = if last_week > 0 {
            (this_week as f64 - last_week as f64) / last_week as f64 * 100.0
        } else {
            0.0
        };

        let daily_activity = (0..ACTIVITY_DAYS)
            .rev()
            .map(|days_back| {
                let date = today - Duration::days(days_back);
                let count = artifacts
                    .iter()
                    .filter(|a| a.created_at.date_naive() == date)
                    .count();
                DailyCount { date, count }
            })
            .collect();

        Self {
            range,
            total_designs: in_range.len(),
            today_designs,
            weekly_growth,
            popular_terms: popular_terms(&in_range),
            daily_activity,
        }
    }
}

fn popular_terms(artifacts: &[&Artifact]) -> Vec<TermCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for artifact in artifacts {
        for word in artifact.searchable_text().split_whitespace() {
            if word.chars().count() > 2 {
                *counts.entry(word.to_string()).or_default() += 1;
            }
        }
    }

    let mut terms: Vec<TermCount> = counts
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    terms.truncate(POPULAR_TERM_LIMIT);
    terms
}
