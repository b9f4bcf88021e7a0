//! GuildGuard LogSink - best-effort delivery of human-readable audit records
//!
//! Every punishment and every content violation produces one record. The
//! destination is resolved per community: an owner-configured binding first,
//! then a text channel with the well-known name, created lazily when absent.
//! Delivery is best-effort end to end; a community where no channel can be
//! resolved or created simply loses its records (with a tracing note), and
//! the guard keeps running.

use async_trait::async_trait;
use guildguard_platform::Directory;
use guildguard_types::{ChannelId, CommunityId, DEFAULT_LOG_CHANNEL};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Best-effort record delivery. Implementations must never fail the caller.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Deliver one human-readable record for the community
    async fn record(&self, community: CommunityId, message: &str);
}

/// Per-community log-destination bindings, set by the owner command surface
#[derive(Default)]
pub struct ChannelBindings {
    inner: RwLock<HashMap<CommunityId, ChannelId>>,
}

impl ChannelBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind or rebind the community's log destination
    pub fn set(&self, community: CommunityId, channel: ChannelId) {
        self.inner.write().insert(community, channel);
    }

    /// The bound destination, if any
    pub fn get(&self, community: CommunityId) -> Option<ChannelId> {
        self.inner.read().get(&community).copied()
    }
}

/// Sink that writes records into a community text channel
pub struct ChannelLogSink {
    directory: Arc<dyn Directory>,
    bindings: Arc<ChannelBindings>,
    channel_name: String,
}

impl ChannelLogSink {
    /// Sink with the default well-known channel name
    pub fn new(directory: Arc<dyn Directory>, bindings: Arc<ChannelBindings>) -> Self {
        Self::with_channel_name(directory, bindings, DEFAULT_LOG_CHANNEL)
    }

    /// Sink with an explicit fallback channel name
    pub fn with_channel_name(
        directory: Arc<dyn Directory>,
        bindings: Arc<ChannelBindings>,
        channel_name: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            bindings,
            channel_name: channel_name.into(),
        }
    }

    /// Resolve the destination channel: the binding when it still exists,
    /// else the well-known channel by name, else a lazily created one.
    pub async fn resolve(&self, community: CommunityId) -> Option<ChannelId> {
        if let Some(bound) = self.bindings.get(community) {
            match self.directory.channel_exists(community, bound).await {
                Ok(true) => return Some(bound),
                // stale or unknowable binding, fall back to the named channel
                Ok(false) | Err(_) => {}
            }
        }

        match self
            .directory
            .find_text_channel(community, &self.channel_name)
            .await
        {
            Ok(Some(channel)) => return Some(channel),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%community, %err, "log channel lookup failed");
                return None;
            }
        }

        match self
            .directory
            .create_text_channel(community, &self.channel_name)
            .await
        {
            Ok(channel) => Some(channel),
            Err(err) => {
                tracing::warn!(%community, %err, "could not provision log channel");
                None
            }
        }
    }
}

#[async_trait]
impl LogSink for ChannelLogSink {
    async fn record(&self, community: CommunityId, message: &str) {
        let Some(channel) = self.resolve(community).await else {
            tracing::warn!(%community, "no usable log channel, record dropped");
            return;
        };
        if let Err(err) = self.directory.send_message(channel, message).await {
            tracing::warn!(%community, %channel, %err, "log record delivery failed");
        }
    }
}

/// Recording sink for tests
#[derive(Default)]
pub struct MemorySink {
    records: RwLock<Vec<(CommunityId, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records delivered so far, in order
    pub fn records(&self) -> Vec<(CommunityId, String)> {
        self.records.read().clone()
    }

    /// Records delivered for one community
    pub fn records_for(&self, community: CommunityId) -> Vec<String> {
        self.records
            .read()
            .iter()
            .filter(|(c, _)| *c == community)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[async_trait]
impl LogSink for MemorySink {
    async fn record(&self, community: CommunityId, message: &str) {
        self.records.write().push((community, message.to_string()));
    }
}
