use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{ConnectInfo, FromRequestParts, State},
    http::{request::Parts, HeaderMap},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::debug;

use initium_core::event::{parse_client_timestamp, PageView, TrackPayload};

use crate::{error::AppError, state::AppState};

/// Peer address when the server was started with connect info.
///
/// Unlike `ConnectInfo` itself this never rejects, so the router also works
/// under `oneshot` in tests where no socket exists.
pub struct MaybeConnectInfo(pub Option<SocketAddr>);

impl<S> FromRequestParts<S> for MaybeConnectInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
        ))
    }
}

/// `POST /track`: record one page view.
///
/// The body is parsed as JSON whatever the `Content-Type`, because
/// `navigator.sendBeacon` does not always send `application/json`.
///
/// ## Validation
/// - Body that is not a JSON object → 400 `bad_request`.
/// - `tracking_id` not in the registry → 400 `invalid_tracking_id`; nothing
///   is stored.
/// - A `timestamp` that is not RFC 3339 is replaced with server time.
///
/// ## Response
/// `200 OK` with `{ "success": true }`.
#[tracing::instrument(skip_all)]
pub async fn track(
    State(state): State<Arc<AppState>>,
    MaybeConnectInfo(peer): MaybeConnectInfo,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: TrackPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))?;

    if !state.registry.is_known(&payload.tracking_id).await? {
        debug!(tracking_id = %payload.tracking_id, "Rejected unknown tracking id");
        return Err(AppError::InvalidTrackingId);
    }

    if parse_client_timestamp(&payload.timestamp).is_none() {
        debug!(raw = %payload.timestamp, "Unparseable client timestamp, using server time");
    }

    let client_ip = extract_client_ip(&headers, peer);
    let view = PageView::from_payload(state.ids.next_id(), payload, client_ip, Utc::now());

    state.store.append(view).await?;

    Ok(Json(json!({ "success": true })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Best-effort client IP.
///
/// First entry of `X-Forwarded-For`, then `X-Real-IP`, then the TCP peer
/// address without its port. `"unknown"` when none is available.
pub fn extract_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(first) = header("x-forwarded-for")
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first.to_string();
    }

    if let Some(real_ip) = header("x-real-ip") {
        return real_ip.to_string();
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    fn peer() -> Option<SocketAddr> {
        "192.0.2.7:54321".parse().ok()
    }

    #[test]
    fn forwarded_for_first_entry_wins() {
        let h = headers(&[
            ("x-forwarded-for", "203.0.113.1, 10.0.0.1"),
            ("x-real-ip", "198.51.100.2"),
        ]);
        assert_eq!(extract_client_ip(&h, peer()), "203.0.113.1");
    }

    #[test]
    fn real_ip_used_without_forwarded_for() {
        let h = headers(&[("x-real-ip", "198.51.100.2")]);
        assert_eq!(extract_client_ip(&h, peer()), "198.51.100.2");
    }

    #[test]
    fn empty_forwarded_for_falls_through() {
        let h = headers(&[("x-forwarded-for", ""), ("x-real-ip", "198.51.100.2")]);
        assert_eq!(extract_client_ip(&h, peer()), "198.51.100.2");
    }

    #[test]
    fn peer_address_port_is_stripped() {
        assert_eq!(extract_client_ip(&HeaderMap::new(), peer()), "192.0.2.7");
    }

    #[test]
    fn ipv6_peer_keeps_full_address() {
        let peer = "[2001:db8::1]:443".parse().ok();
        assert_eq!(extract_client_ip(&HeaderMap::new(), peer), "2001:db8::1");
    }

    #[test]
    fn no_source_is_unknown() {
        assert_eq!(extract_client_ip(&HeaderMap::new(), None), "unknown");
    }
}
