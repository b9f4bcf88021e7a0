//! File-backed trust snapshot
//!
//! One variant of the guard persists its trust lists across restarts. The
//! snapshot is a small JSON document rewritten in full on every mutation;
//! a missing file on load means an empty trust list, not an error.

use guildguard_types::{CommunityId, GuardError, PrincipalId, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct TrustSnapshot {
    communities: Vec<CommunityTrust>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CommunityTrust {
    community: CommunityId,
    trusted: Vec<PrincipalId>,
}

/// Snapshot file holding the explicit trust sets
pub struct TrustStore {
    path: PathBuf,
}

impl TrustStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot. A missing file yields an empty map.
    pub fn load(&self) -> Result<HashMap<CommunityId, HashSet<PrincipalId>>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| GuardError::TrustStore(e.to_string()))?;
        let snapshot: TrustSnapshot =
            serde_json::from_str(&raw).map_err(|e| GuardError::TrustStore(e.to_string()))?;
        Ok(snapshot
            .communities
            .into_iter()
            .map(|c| (c.community, c.trusted.into_iter().collect()))
            .collect())
    }

    /// Rewrite the snapshot with the full current state
    pub fn save(&self, map: &HashMap<CommunityId, HashSet<PrincipalId>>) -> Result<()> {
        let mut communities: Vec<CommunityTrust> = map
            .iter()
            .map(|(community, set)| {
                let mut trusted: Vec<_> = set.iter().copied().collect();
                trusted.sort();
                CommunityTrust {
                    community: *community,
                    trusted,
                }
            })
            .collect();
        communities.sort_by_key(|c| c.community);

        let snapshot = TrustSnapshot { communities };
        let raw = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| GuardError::TrustStore(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| GuardError::TrustStore(e.to_string()))
    }
}
