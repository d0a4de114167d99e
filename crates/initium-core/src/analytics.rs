//! In-memory aggregation over the stored page views.
//!
//! Everything is recomputed from the full record set on every call. That is
//! fine while the store is capped (see [`crate::store::DEFAULT_RETENTION_LIMIT`]).

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::event::PageView;

/// Look-back window of `GET /stats/{id}`.
pub const STATS_WINDOW_DAYS: i64 = 30;

/// Maximum number of rows in [`StatsSummary::top_pages`].
pub const TOP_PAGES_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounts {
    pub total_views: usize,
    pub unique_sessions: usize,
    pub days_with_traffic: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCount {
    pub page_url: String,
    pub views: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserCount {
    pub browser: String,
    pub count: usize,
}

/// Response body of `GET /stats/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub summary: SummaryCounts,
    pub top_pages: Vec<PageCount>,
    pub browsers: Vec<BrowserCount>,
}

/// Lower bound used by the stats route: `now - 30 days`.
pub fn stats_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(STATS_WINDOW_DAYS)
}

/// Aggregate `records` for one website.
///
/// Only records with `website_id` equal to `website_id` and a timestamp
/// strictly after `since` count. Active days are calendar dates in the
/// server's local timezone.
///
/// Both rankings sort by descending count; equal counts keep the order in
/// which the key first appeared in `records` (the store is append-ordered, so
/// that is also first-seen time).
pub fn compute_stats(records: &[PageView], website_id: &str, since: DateTime<Utc>) -> StatsSummary {
    let mut total_views = 0;
    let mut sessions = HashSet::new();
    let mut days = HashSet::new();
    let mut pages = Tally::default();
    let mut browsers = Tally::default();

    for view in records
        .iter()
        .filter(|v| v.website_id == website_id && v.timestamp > since)
    {
        total_views += 1;
        sessions.insert(view.session_id.as_str());
        days.insert(view.timestamp.with_timezone(&Local).date_naive());
        pages.bump(&view.page_url);
        browsers.bump(&view.browser);
    }

    StatsSummary {
        summary: SummaryCounts {
            total_views,
            unique_sessions: sessions.len(),
            days_with_traffic: days.len(),
        },
        top_pages: pages
            .ranked()
            .into_iter()
            .take(TOP_PAGES_LIMIT)
            .map(|(page_url, views)| PageCount { page_url, views })
            .collect(),
        browsers: browsers
            .ranked()
            .into_iter()
            .map(|(browser, count)| BrowserCount { browser, count })
            .collect(),
    }
}

/// Insertion-ordered counter.
#[derive(Default)]
struct Tally<'a> {
    index: HashMap<&'a str, usize>,
    counts: Vec<(&'a str, usize)>,
}

impl<'a> Tally<'a> {
    fn bump(&mut self, key: &'a str) {
        match self.index.get(key) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(key, self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }

    /// Descending by count. `sort_by` is stable, so ties stay first-seen.
    fn ranked(mut self) -> Vec<(String, usize)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
            .into_iter()
            .map(|(key, count)| (key.to_string(), count))
            .collect()
    }
}
