//! Punishment cooldown tracking
//!
//! One punishment per principal per window. The window absorbs duplicate
//! audit-log deliveries and cascades (a bulk delete raising many individual
//! events attributed to the same executor) into a single ban.
//!
//! [`CooldownTracker::begin_punishment`] performs the check and the record
//! under one lock, so two events for the same executor racing through the
//! engine cannot both pass the gate.

use chrono::{DateTime, Duration, Utc};
use guildguard_types::{CommunityId, PrincipalId, COOLDOWN_WINDOW_SECS};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Per-(community, principal) time-gated suppression of repeated punishment
pub struct CooldownTracker {
    window: Duration,
    punished: Mutex<HashMap<(CommunityId, PrincipalId), DateTime<Utc>>>,
}

impl CooldownTracker {
    /// Tracker with the standard 15 second window
    pub fn new() -> Self {
        Self::with_window(Duration::seconds(COOLDOWN_WINDOW_SECS))
    }

    /// Tracker with an explicit window
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            punished: Mutex::new(HashMap::new()),
        }
    }

    /// The configured suppression window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a punishment for this principal must be suppressed at `now`
    pub fn should_suppress(
        &self,
        community: CommunityId,
        principal: PrincipalId,
        now: DateTime<Utc>,
    ) -> bool {
        self.punished
            .lock()
            .get(&(community, principal))
            .map(|last| now - *last < self.window)
            .unwrap_or(false)
    }

    /// Unconditionally store `now` as the last punishment instant
    pub fn record_punishment(
        &self,
        community: CommunityId,
        principal: PrincipalId,
        now: DateTime<Utc>,
    ) {
        self.punished.lock().insert((community, principal), now);
    }

    /// Atomic check-and-record: returns false when suppressed, otherwise
    /// records `now` and returns true. The engine always uses this form.
    pub fn begin_punishment(
        &self,
        community: CommunityId,
        principal: PrincipalId,
        now: DateTime<Utc>,
    ) -> bool {
        let mut punished = self.punished.lock();
        let key = (community, principal);
        if let Some(last) = punished.get(&key) {
            if now - *last < self.window {
                return false;
            }
        }
        punished.insert(key, now);
        true
    }

    /// The last recorded punishment instant, if any
    pub fn last_punished(
        &self,
        community: CommunityId,
        principal: PrincipalId,
    ) -> Option<DateTime<Utc>> {
        self.punished.lock().get(&(community, principal)).copied()
    }
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new()
    }
}
