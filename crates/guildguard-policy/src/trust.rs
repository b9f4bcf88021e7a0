//! Trust registry
//!
//! A principal is trusted within a community if its id is in that
//! community's explicit trust set, or if it holds administrative capability
//! there. The capability side comes from the live [`Member`] record the
//! caller resolves at decision time; role state is never cached here.
//!
//! Mutation is restricted to the single designated owner principal. When a
//! [`TrustStore`] is attached, every successful mutation rewrites the
//! snapshot; store failures are logged and never block the decision path.

use crate::store::TrustStore;
use guildguard_types::{CommunityId, GuardError, Member, PrincipalId, Result};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// Explicit trust sets keyed by community, plus the derived-trust predicate
pub struct TrustRegistry {
    owner: PrincipalId,
    trusted: RwLock<HashMap<CommunityId, HashSet<PrincipalId>>>,
    store: Option<TrustStore>,
}

impl TrustRegistry {
    /// Create a memory-only registry
    pub fn new(owner: PrincipalId) -> Self {
        Self {
            owner,
            trusted: RwLock::new(HashMap::new()),
            store: None,
        }
    }

    /// Create a registry backed by a snapshot file.
    ///
    /// The snapshot is loaded once here; an unreadable file is fatal to
    /// construction so a corrupt trust list is noticed at startup, not
    /// at decision time.
    pub fn with_store(owner: PrincipalId, store: TrustStore) -> Result<Self> {
        let loaded = store.load()?;
        Ok(Self {
            owner,
            trusted: RwLock::new(loaded),
            store: Some(store),
        })
    }

    /// The designated owner principal
    pub fn owner(&self) -> PrincipalId {
        self.owner
    }

    /// Whether `principal` is the designated owner
    pub fn is_owner(&self, principal: PrincipalId) -> bool {
        principal == self.owner
    }

    /// Whether the principal id is in the community's explicit trust set
    pub fn is_listed(&self, community: CommunityId, principal: PrincipalId) -> bool {
        self.trusted
            .read()
            .get(&community)
            .map(|set| set.contains(&principal))
            .unwrap_or(false)
    }

    /// Full trust decision for a live member record: explicitly listed, or
    /// holding administrative capability in the community
    pub fn is_trusted(&self, community: CommunityId, member: &Member) -> bool {
        self.is_listed(community, member.principal.id) || member.has_administrative_capability()
    }

    /// Add a principal to the community's trust set. Owner-only.
    pub fn grant(
        &self,
        actor: PrincipalId,
        community: CommunityId,
        principal: PrincipalId,
    ) -> Result<()> {
        self.require_owner(actor)?;
        self.trusted
            .write()
            .entry(community)
            .or_default()
            .insert(principal);
        self.persist();
        Ok(())
    }

    /// Remove a principal from the community's trust set. Owner-only.
    ///
    /// Removing an id that was never granted is not an error.
    pub fn revoke(
        &self,
        actor: PrincipalId,
        community: CommunityId,
        principal: PrincipalId,
    ) -> Result<()> {
        self.require_owner(actor)?;
        if let Some(set) = self.trusted.write().get_mut(&community) {
            set.remove(&principal);
        }
        self.persist();
        Ok(())
    }

    /// The community's explicit trust set, sorted for stable display
    pub fn trusted_ids(&self, community: CommunityId) -> Vec<PrincipalId> {
        let mut ids: Vec<_> = self
            .trusted
            .read()
            .get(&community)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    fn require_owner(&self, actor: PrincipalId) -> Result<()> {
        if actor != self.owner {
            return Err(GuardError::unauthorized(
                "only the owner may modify the trust list",
            ));
        }
        Ok(())
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.trusted.read()) {
                tracing::warn!(%err, "could not persist trust snapshot");
            }
        }
    }
}
