//! GuildGuard Platform - capability seams consumed by the guard
//!
//! The guard never talks to a chat platform SDK directly. Everything it
//! consumes is expressed as one of three object-safe seams:
//!
//! - [`AuditTrail`] - query the community's append-only audit record
//! - [`Moderation`] - actuation requests (ban, delete, timeout)
//! - [`Directory`] - live membership and channel lookup/creation
//!
//! Each actuation may fail with a permission or not-found error; callers are
//! expected to recover locally and downgrade failures to log records rather
//! than propagate them.
//!
//! [`InMemoryPlatform`] implements all three seams over in-process state and
//! records every actuation, for tests and the playground scenario.

pub mod memory;

pub use memory::InMemoryPlatform;

use async_trait::async_trait;
use guildguard_types::{
    AuditActionKind, AuditTrailEntry, ChannelId, CommunityId, Member, MessageId, PrincipalId,
    Result,
};

/// Query capability over the platform's append-only audit record
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// Entries matching `action` in `community`, most recent first, at most
    /// `limit` of them. An empty result is not an error.
    async fn recent_entries(
        &self,
        community: CommunityId,
        action: AuditActionKind,
        limit: usize,
    ) -> Result<Vec<AuditTrailEntry>>;
}

/// Actuation capability: requests against the platform's live state
#[async_trait]
pub trait Moderation: Send + Sync {
    /// Ban a principal from a community
    async fn ban(
        &self,
        community: CommunityId,
        principal: PrincipalId,
        reason: &str,
    ) -> Result<()>;

    /// Delete a channel
    async fn delete_channel(&self, community: CommunityId, channel: ChannelId) -> Result<()>;

    /// Delete a single message
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()>;

    /// Time a principal out for `duration`
    async fn timeout(
        &self,
        community: CommunityId,
        principal: PrincipalId,
        duration: chrono::Duration,
        reason: &str,
    ) -> Result<()>;
}

/// Live membership and channel state
#[async_trait]
pub trait Directory: Send + Sync {
    /// The member record for a principal, or `None` if not a member
    async fn member(
        &self,
        community: CommunityId,
        principal: PrincipalId,
    ) -> Result<Option<Member>>;

    /// Whether the channel currently exists in the community
    async fn channel_exists(&self, community: CommunityId, channel: ChannelId) -> Result<bool>;

    /// Find a text channel by name
    async fn find_text_channel(
        &self,
        community: CommunityId,
        name: &str,
    ) -> Result<Option<ChannelId>>;

    /// Create a text channel with the given name
    async fn create_text_channel(&self, community: CommunityId, name: &str) -> Result<ChannelId>;

    /// Post a message to a channel
    async fn send_message(&self, channel: ChannelId, text: &str) -> Result<()>;
}
