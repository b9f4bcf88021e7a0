//! Error types for GuildGuard
//!
//! A missing attribution is not an error (lookups return `Option`); the
//! variants here cover rejected privileged mutations, failed actuations and
//! plumbing failures. Everything raised inside the guard is recovered at the
//! handler boundary, so no variant is fatal to the event loop.

use crate::identity::{ChannelId, CommunityId, PrincipalId};
use thiserror::Error;

/// Result type for GuildGuard operations
pub type Result<T> = std::result::Result<T, GuardError>;

/// GuildGuard error types
#[derive(Debug, Clone, Error)]
pub enum GuardError {
    /// A privileged mutation was attempted by a non-owner
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// A ban, delete or timeout request was refused by the platform
    #[error("Actuation '{action}' failed: {reason}")]
    ActuationFailed { action: String, reason: String },

    /// The audit trail could not be queried
    #[error("Audit trail unavailable for community {community}: {reason}")]
    AuditUnavailable {
        community: CommunityId,
        reason: String,
    },

    /// A member lookup targeted a principal not present in the community
    #[error("Member {principal} not found in community {community}")]
    MemberNotFound {
        community: CommunityId,
        principal: PrincipalId,
    },

    /// A channel operation targeted a channel that does not exist
    #[error("Channel {channel} not found")]
    ChannelNotFound { channel: ChannelId },

    /// No log channel could be resolved or created for a community
    #[error("No usable log channel in community {community}")]
    ChannelUnavailable { community: CommunityId },

    /// The persisted trust snapshot could not be read or written
    #[error("Trust store error: {0}")]
    TrustStore(String),

    /// An owner command could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl GuardError {
    /// Create an unauthorized error
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Create an actuation failure
    pub fn actuation(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ActuationFailed {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Whether this failure may be surfaced to a chat user verbatim
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::InvalidCommand(_))
    }
}
