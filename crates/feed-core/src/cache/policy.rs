//! Cache freshness rule.

use crate::config::CacheConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Decides whether a snapshot taken at some instant may still be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCachePolicy {
    /// Maximum snapshot age. A snapshot exactly this old is already stale.
    pub max_age: Duration,
}

impl FeedCachePolicy {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub fn with_max_age_days(days: u64) -> Self {
        Self::new(Duration::from_secs(days.saturating_mul(86_400)))
    }

    /// True iff `now` is strictly before `timestamp + max_age`.
    pub fn validate(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.expires_at(timestamp).is_some_and(|expires_at| now < expires_at)
    }

    /// Instant at which a snapshot taken at `timestamp` goes stale, or `None`
    /// if that instant is not representable.
    pub fn expires_at(&self, timestamp: DateTime<Utc>) -> Option<DateTime<Utc>> {
        chrono::Duration::from_std(self.max_age)
            .ok()
            .and_then(|max_age| timestamp.checked_add_signed(max_age))
    }
}

impl Default for FeedCachePolicy {
    fn default() -> Self {
        Self::new(CacheConfig::DEFAULT_MAX_AGE)
    }
}
