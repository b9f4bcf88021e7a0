//! Change-events and message-events delivered by the platform
//!
//! Events are ephemeral: they are handled once and never stored. Each
//! change-event names the affected target but says nothing about who acted;
//! attribution always goes through the audit trail.

use crate::audit::AuditActionKind;
use crate::identity::{ChannelId, CommunityId, MessageId, RoleId};
use crate::member::Principal;
use serde::{Deserialize, Serialize};

/// A destructive or suspicious administrative change observed in a community
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Community in which the change happened
    pub community: CommunityId,
    /// What changed
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(community: CommunityId, kind: ChangeKind) -> Self {
        Self { community, kind }
    }
}

/// The kinds of change the guard watches, each carrying the affected target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// A member was banned
    MemberBanned { target: Principal },
    /// A member was kicked
    MemberKicked { target: Principal },
    /// A channel was created
    ChannelCreated { channel: ChannelId, name: String },
    /// A channel was deleted
    ChannelDeleted { channel: ChannelId, name: String },
    /// A role was deleted
    RoleDeleted { role: RoleId, name: String },
    /// A role was edited
    RoleUpdated { role: RoleId, name: String },
}

impl ChangeKind {
    /// The audit-trail action kind that records this change
    pub fn audit_action(&self) -> AuditActionKind {
        match self {
            Self::MemberBanned { .. } => AuditActionKind::MemberBan,
            Self::MemberKicked { .. } => AuditActionKind::MemberKick,
            Self::ChannelCreated { .. } => AuditActionKind::ChannelCreate,
            Self::ChannelDeleted { .. } => AuditActionKind::ChannelDelete,
            Self::RoleDeleted { .. } => AuditActionKind::RoleDelete,
            Self::RoleUpdated { .. } => AuditActionKind::RoleUpdate,
        }
    }

    /// Human-readable reason string attached to the punishment
    pub fn punishment_reason(&self) -> String {
        match self {
            Self::MemberBanned { target } => {
                format!("Unauthorized ban attempt on {}", target)
            }
            Self::MemberKicked { target } => {
                format!("Unauthorized kick attempt on {}", target)
            }
            Self::ChannelCreated { .. } => "Unauthorized channel creation".to_string(),
            Self::ChannelDeleted { .. } => "Unauthorized channel deletion".to_string(),
            Self::RoleDeleted { name, .. } => {
                format!("Unauthorized role deletion ({})", name)
            }
            Self::RoleUpdated { name, .. } => {
                format!("Unauthorized role update ({})", name)
            }
        }
    }
}

/// A posted message, consumed by the content guard only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Community the message was posted in
    pub community: CommunityId,
    /// Channel the message was posted in
    pub channel: ChannelId,
    /// Id of the message itself
    pub message: MessageId,
    /// Author of the message
    pub author: Principal,
    /// Raw message text
    pub content: String,
}
