//! Chat session types for Parley.
//!
//! A `Session` is one conversation thread as the remote API reports it.
//! Sessions are cached newest-first, keyed by the server-assigned `id`.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// A conversation thread.
///
/// `id` is assigned by the remote API and never changes. `created_at` is the
/// server's ISO-8601 creation time, kept verbatim so a round trip through the
/// cache never alters what the server sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Empty when the server stores no title (`null` or absent).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Owner of the session, if the server tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Session {
    /// Ordering weight of this session: creation time in epoch milliseconds,
    /// or 0 when the timestamp is missing or unreadable.
    pub fn sort_weight(&self) -> i64 {
        self.created_at
            .as_deref()
            .map(timestamp_millis)
            .unwrap_or(0)
    }
}

/// Fields that may be shallow-merged into a cached [`Session`].
///
/// `None` means "leave as is". The session id is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl SessionPatch {
    /// Patch that only sets the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Merge the present fields into `session`.
    pub fn apply_to(&self, session: &mut Session) {
        if let Some(title) = &self.title {
            session.title = title.clone();
        }
        if let Some(created_at) = &self.created_at {
            session.created_at = Some(created_at.clone());
        }
        if let Some(user_id) = &self.user_id {
            session.user_id = Some(user_id.clone());
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a server timestamp into epoch milliseconds.
///
/// Accepts RFC 3339 (`2024-01-02T10:00:00+08:00`), naive date-times
/// (`2024-01-02T10:00:00.123456`, read as UTC) and plain dates
/// (`2024-01-02`, midnight UTC). Anything else weighs 0.
pub fn timestamp_millis(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp_millis();
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return dt.and_utc().timestamp_millis();
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Stable sort, newest first. Equal weights keep their incoming order.
pub fn sort_newest_first(sessions: &mut [Session]) {
    sessions.sort_by_key(|s| Reverse(s.sort_weight()));
}
