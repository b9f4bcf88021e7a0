//! GuildGuard Audit - attribution of change-events to acting principals
//!
//! A change-event says what happened, never who did it. The attributor
//! answers "who" by querying the community's audit trail for the single most
//! recent entry whose action kind matches the event, and taking its recorded
//! executor.
//!
//! Only that one entry is considered: no history scan, no correlation with
//! the event's target. Fast, but a second unrelated action of the same kind
//! landing between the event and the query can misattribute. That trade-off
//! is part of the contract; callers get `None` on any miss and must treat it
//! as "do nothing", never as "punish".

use guildguard_platform::AuditTrail;
use guildguard_types::{AttributionRecord, ChangeEvent};
use std::sync::Arc;

/// Resolves the executing principal behind a change-event
pub struct AuditAttributor {
    trail: Arc<dyn AuditTrail>,
}

impl AuditAttributor {
    pub fn new(trail: Arc<dyn AuditTrail>) -> Self {
        Self { trail }
    }

    /// Attribute `event` to its executor, or `None` when the trail has no
    /// matching entry or cannot be queried at all.
    ///
    /// Every event triggers a fresh lookup; records are never cached, the
    /// audit trail being the only source of truth for "who acted".
    pub async fn attribute(&self, event: &ChangeEvent) -> Option<AttributionRecord> {
        let action = event.kind.audit_action();
        let entries = match self.trail.recent_entries(event.community, action, 1).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(community = %event.community, %action, %err,
                    "audit trail query failed, skipping attribution");
                return None;
            }
        };
        entries.into_iter().next().map(|entry| AttributionRecord {
            action,
            executor: entry.executor,
            at: entry.at,
        })
    }
}
