//! In-memory platform used by tests and the playground scenario
//!
//! Implements all three capability seams over in-process state, records
//! every actuation for later inspection, and supports failure injection so
//! the permission-denied paths can be exercised.

use crate::{AuditTrail, Directory, Moderation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guildguard_types::{
    AuditActionKind, AuditTrailEntry, ChannelId, CommunityId, GuardError, Member, MessageId,
    Principal, PrincipalId, Result,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A recorded ban actuation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRecord {
    pub community: CommunityId,
    pub principal: PrincipalId,
    pub reason: String,
}

/// A recorded timeout actuation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutRecord {
    pub community: CommunityId,
    pub principal: PrincipalId,
    pub duration: chrono::Duration,
    pub reason: String,
}

#[derive(Default)]
struct CommunityState {
    members: HashMap<PrincipalId, Member>,
    channels: HashMap<ChannelId, String>,
    // audit entries in arrival order; queries walk it backwards
    audit: Vec<(AuditActionKind, AuditTrailEntry)>,
}

#[derive(Default)]
struct RecordedActions {
    bans: Vec<BanRecord>,
    deleted_channels: Vec<(CommunityId, ChannelId)>,
    deleted_messages: Vec<(ChannelId, MessageId)>,
    timeouts: Vec<TimeoutRecord>,
    sent: Vec<(ChannelId, String)>,
}

/// In-process platform with recorded actuations and failure injection
#[derive(Default)]
pub struct InMemoryPlatform {
    state: RwLock<HashMap<CommunityId, CommunityState>>,
    actions: RwLock<RecordedActions>,
    deny_bans: AtomicBool,
    deny_audit: AtomicBool,
    deny_channel_create: AtomicBool,
    next_channel_id: AtomicU64,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self {
            next_channel_id: AtomicU64::new(9000),
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------

    /// Add or replace a member of a community
    pub fn add_member(&self, community: CommunityId, member: Member) {
        let mut state = self.state.write();
        state
            .entry(community)
            .or_default()
            .members
            .insert(member.principal.id, member);
    }

    /// Add a named text channel
    pub fn add_channel(&self, community: CommunityId, channel: ChannelId, name: &str) {
        let mut state = self.state.write();
        state
            .entry(community)
            .or_default()
            .channels
            .insert(channel, name.to_string());
    }

    /// Append an audit-trail entry recording an executed action
    pub fn record_audit(
        &self,
        community: CommunityId,
        action: AuditActionKind,
        executor: Principal,
        target: &str,
        at: DateTime<Utc>,
    ) {
        let mut state = self.state.write();
        state.entry(community).or_default().audit.push((
            action,
            AuditTrailEntry {
                executor,
                target: target.to_string(),
                at,
            },
        ));
    }

    // ------------------------------------------------------------------
    // Failure injection
    // ------------------------------------------------------------------

    /// Make subsequent ban requests fail with a permission error
    pub fn deny_bans(&self, deny: bool) {
        self.deny_bans.store(deny, Ordering::SeqCst);
    }

    /// Make subsequent audit-trail queries fail
    pub fn deny_audit(&self, deny: bool) {
        self.deny_audit.store(deny, Ordering::SeqCst);
    }

    /// Make subsequent channel creation fail with a permission error
    pub fn deny_channel_creation(&self, deny: bool) {
        self.deny_channel_create.store(deny, Ordering::SeqCst);
    }

    // ------------------------------------------------------------------
    // Recorded actuations
    // ------------------------------------------------------------------

    pub fn bans(&self) -> Vec<BanRecord> {
        self.actions.read().bans.clone()
    }

    pub fn deleted_channels(&self) -> Vec<(CommunityId, ChannelId)> {
        self.actions.read().deleted_channels.clone()
    }

    pub fn deleted_messages(&self) -> Vec<(ChannelId, MessageId)> {
        self.actions.read().deleted_messages.clone()
    }

    pub fn timeouts(&self) -> Vec<TimeoutRecord> {
        self.actions.read().timeouts.clone()
    }

    /// Every message sent through the directory, in order
    pub fn sent_messages(&self) -> Vec<(ChannelId, String)> {
        self.actions.read().sent.clone()
    }

    /// Messages delivered to one channel
    pub fn messages_in(&self, channel: ChannelId) -> Vec<String> {
        self.actions
            .read()
            .sent
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Whether the named channel currently exists in the community
    pub fn has_channel_named(&self, community: CommunityId, name: &str) -> Option<ChannelId> {
        self.state
            .read()
            .get(&community)
            .and_then(|s| s.channels.iter().find(|(_, n)| n.as_str() == name))
            .map(|(id, _)| *id)
    }

    /// Whether the principal is still a member (bans remove membership)
    pub fn is_member(&self, community: CommunityId, principal: PrincipalId) -> bool {
        self.state
            .read()
            .get(&community)
            .map(|s| s.members.contains_key(&principal))
            .unwrap_or(false)
    }
}

#[async_trait]
impl AuditTrail for InMemoryPlatform {
    async fn recent_entries(
        &self,
        community: CommunityId,
        action: AuditActionKind,
        limit: usize,
    ) -> Result<Vec<AuditTrailEntry>> {
        if self.deny_audit.load(Ordering::SeqCst) {
            return Err(GuardError::AuditUnavailable {
                community,
                reason: "missing audit log permission".to_string(),
            });
        }
        let state = self.state.read();
        let entries = match state.get(&community) {
            Some(s) => s
                .audit
                .iter()
                .rev()
                .filter(|(kind, _)| *kind == action)
                .map(|(_, entry)| entry.clone())
                .take(limit)
                .collect(),
            None => Vec::new(),
        };
        Ok(entries)
    }
}

#[async_trait]
impl Moderation for InMemoryPlatform {
    async fn ban(
        &self,
        community: CommunityId,
        principal: PrincipalId,
        reason: &str,
    ) -> Result<()> {
        if self.deny_bans.load(Ordering::SeqCst) {
            return Err(GuardError::actuation("ban", "missing ban permission"));
        }
        let mut state = self.state.write();
        if let Some(s) = state.get_mut(&community) {
            s.members.remove(&principal);
        }
        drop(state);
        self.actions.write().bans.push(BanRecord {
            community,
            principal,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn delete_channel(&self, community: CommunityId, channel: ChannelId) -> Result<()> {
        let mut state = self.state.write();
        let removed = state
            .get_mut(&community)
            .map(|s| s.channels.remove(&channel).is_some())
            .unwrap_or(false);
        drop(state);
        if !removed {
            return Err(GuardError::ChannelNotFound { channel });
        }
        self.actions
            .write()
            .deleted_channels
            .push((community, channel));
        Ok(())
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()> {
        self.actions.write().deleted_messages.push((channel, message));
        Ok(())
    }

    async fn timeout(
        &self,
        community: CommunityId,
        principal: PrincipalId,
        duration: chrono::Duration,
        reason: &str,
    ) -> Result<()> {
        let known = self
            .state
            .read()
            .get(&community)
            .map(|s| s.members.contains_key(&principal))
            .unwrap_or(false);
        if !known {
            return Err(GuardError::MemberNotFound {
                community,
                principal,
            });
        }
        self.actions.write().timeouts.push(TimeoutRecord {
            community,
            principal,
            duration,
            reason: reason.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl Directory for InMemoryPlatform {
    async fn member(
        &self,
        community: CommunityId,
        principal: PrincipalId,
    ) -> Result<Option<Member>> {
        Ok(self
            .state
            .read()
            .get(&community)
            .and_then(|s| s.members.get(&principal))
            .cloned())
    }

    async fn channel_exists(&self, community: CommunityId, channel: ChannelId) -> Result<bool> {
        Ok(self
            .state
            .read()
            .get(&community)
            .map(|s| s.channels.contains_key(&channel))
            .unwrap_or(false))
    }

    async fn find_text_channel(
        &self,
        community: CommunityId,
        name: &str,
    ) -> Result<Option<ChannelId>> {
        Ok(self.has_channel_named(community, name))
    }

    async fn create_text_channel(&self, community: CommunityId, name: &str) -> Result<ChannelId> {
        if self.deny_channel_create.load(Ordering::SeqCst) {
            return Err(GuardError::actuation(
                "create-channel",
                "missing manage-channels permission",
            ));
        }
        let id = ChannelId::new(self.next_channel_id.fetch_add(1, Ordering::SeqCst));
        self.add_channel(community, id, name);
        Ok(id)
    }

    async fn send_message(&self, channel: ChannelId, text: &str) -> Result<()> {
        let known = self
            .state
            .read()
            .values()
            .any(|s| s.channels.contains_key(&channel));
        if !known {
            return Err(GuardError::ChannelNotFound { channel });
        }
        self.actions.write().sent.push((channel, text.to_string()));
        Ok(())
    }
}
