//! Audit-trail entry types
//!
//! The platform maintains an append-only record of administrative actions
//! and their executors. The guard never writes to it; it only queries the
//! most recent matching entry to attribute a change to an actor.

use crate::member::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action kinds recorded by the platform audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditActionKind {
    MemberBan,
    MemberKick,
    ChannelCreate,
    ChannelDelete,
    RoleDelete,
    RoleUpdate,
}

impl fmt::Display for AuditActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MemberBan => "member-ban",
            Self::MemberKick => "member-kick",
            Self::ChannelCreate => "channel-create",
            Self::ChannelDelete => "channel-delete",
            Self::RoleDelete => "role-delete",
            Self::RoleUpdate => "role-update",
        };
        write!(f, "{}", name)
    }
}

/// One entry of the platform audit trail, as exposed by the query capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrailEntry {
    /// The principal that executed the recorded action
    pub executor: Principal,
    /// Description of the affected target
    pub target: String,
    /// When the action was recorded
    pub at: DateTime<Utc>,
}

/// A change-event resolved to its executing principal.
///
/// Derived freshly for every event; the audit trail is the only source of
/// truth for "who acted", so records are never cached across events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionRecord {
    /// Audit action kind the lookup matched on
    pub action: AuditActionKind,
    /// The executing principal
    pub executor: Principal,
    /// Timestamp of the matched audit entry
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_display() {
        assert_eq!(AuditActionKind::RoleDelete.to_string(), "role-delete");
        assert_eq!(AuditActionKind::MemberBan.to_string(), "member-ban");
    }
}
