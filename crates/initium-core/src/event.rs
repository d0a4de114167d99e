use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::browser::classify_browser;

/// The payload the tracking script sends to POST /track.
///
/// Every field defaults to an empty string: the script always sends the full
/// object, but hand-rolled beacons that omit fields are still accepted.
/// `timestamp` stays a raw string here; see [`parse_client_timestamp`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackPayload {
    pub tracking_id: String,
    pub session_id: String,
    pub page_url: String,
    pub page_title: String,
    pub referrer: String,
    pub user_agent: String,
    pub timestamp: String,
}

/// A stored page view. Mirrors one element of `pageviews.json` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub id: String,
    pub website_id: String,
    pub session_id: String,
    pub page_url: String,
    pub page_title: String,
    /// Empty when the visit had no referrer.
    pub referrer: String,
    pub ip_address: String,
    pub user_agent: String,
    /// Derived from `user_agent` at ingest time, see [`crate::browser`].
    pub browser: String,
    pub timestamp: DateTime<Utc>,
}

impl PageView {
    /// Build a record from an accepted payload.
    ///
    /// The caller has already checked `payload.tracking_id` against the
    /// registry. A timestamp that is not valid RFC 3339 is replaced by `now`.
    pub fn from_payload(
        id: String,
        payload: TrackPayload,
        ip_address: String,
        now: DateTime<Utc>,
    ) -> Self {
        let timestamp = parse_client_timestamp(&payload.timestamp).unwrap_or(now);
        let browser = classify_browser(&payload.user_agent).as_str().to_string();

        Self {
            id,
            website_id: payload.tracking_id,
            session_id: payload.session_id,
            page_url: payload.page_url,
            page_title: payload.page_title,
            referrer: payload.referrer,
            ip_address,
            user_agent: payload.user_agent,
            browser,
            timestamp,
        }
    }
}

/// Strict RFC 3339 parse of a client-supplied timestamp, normalised to UTC.
pub fn parse_client_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
