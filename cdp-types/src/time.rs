//! Visit bookkeeping carried in profile metadata.
//!
//! These values are owned by the session tracker. Reconciliation never merges
//! them; the cached copy replaces the new one wholesale so visit counts
//! cannot regress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile lifecycle timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileTime {
    /// When the profile was first stored.
    #[serde(default)]
    pub insert: Option<DateTime<Utc>>,
    /// Last time the profile was written.
    #[serde(default)]
    pub update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub visit: ProfileVisit,
}

impl ProfileTime {
    /// Timestamps for a profile created at `now` during its first visit.
    #[must_use]
    pub fn first_visit(now: DateTime<Utc>) -> Self {
        Self {
            insert: Some(now),
            update: None,
            visit: ProfileVisit {
                last: None,
                current: Some(now),
                count: 1,
                tz: None,
            },
        }
    }
}

/// Visit counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileVisit {
    #[serde(default)]
    pub last: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current: Option<DateTime<Utc>>,
    #[serde(default)]
    pub count: u64,
    /// IANA time zone of the visitor, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tz: Option<String>,
}
