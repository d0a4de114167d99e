use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse browser family derived from a User-Agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Other,
}

impl Browser {
    pub fn as_str(self) -> &'static str {
        match self {
            Browser::Chrome => "Chrome",
            Browser::Firefox => "Firefox",
            Browser::Safari => "Safari",
            Browser::Edge => "Edge",
            Browser::Other => "Other",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a User-Agent by case-insensitive substring match.
///
/// The checks run in a fixed order and the first hit wins:
///
/// 1. `chrome` without `edg` → Chrome
/// 2. `firefox` → Firefox
/// 3. `safari` without `chrome` → Safari
/// 4. `edg` → Edge
///
/// Chromium-based Edge advertises both `Chrome` and `Edg/`, and Chrome
/// advertises `Safari`, so the exclusions in 1 and 3 matter.
pub fn classify_browser(user_agent: &str) -> Browser {
    let ua = user_agent.to_lowercase();
    let has_chrome = ua.contains("chrome");
    let has_edge = ua.contains("edg");

    if has_chrome && !has_edge {
        Browser::Chrome
    } else if ua.contains("firefox") {
        Browser::Firefox
    } else if ua.contains("safari") && !has_chrome {
        Browser::Safari
    } else if has_edge {
        Browser::Edge
    } else {
        Browser::Other
    }
}
