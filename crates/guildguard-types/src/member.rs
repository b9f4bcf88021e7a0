//! Principal and live membership records

use crate::identity::{PrincipalId, RoleId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Any account identifiable by a stable id within the platform.
///
/// The label is a display name used only for logging; decisions are made
/// on the id alone. A principal is immutable once observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable platform account id
    pub id: PrincipalId,
    /// Display label, logging only
    pub label: String,
    /// Whether the account is a bot/automation principal
    pub is_automated: bool,
}

impl Principal {
    /// Create a human principal
    pub fn named(id: PrincipalId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            is_automated: false,
        }
    }

    /// Create an automation principal
    pub fn automated(id: PrincipalId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            is_automated: true,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}

/// Live membership state of a principal within one community.
///
/// Queried from the platform at decision time, never cached: role grants
/// and administrative capability can change between events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The member's principal
    pub principal: Principal,
    /// Roles currently held in the community
    pub roles: HashSet<RoleId>,
    /// Whether the member holds administrative capability
    pub administrator: bool,
}

impl Member {
    /// Create a member with no roles and no administrative capability
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            roles: HashSet::new(),
            administrator: false,
        }
    }

    /// Grant administrative capability
    pub fn administrator(mut self) -> Self {
        self.administrator = true;
        self
    }

    /// Add a role
    pub fn with_role(mut self, role: RoleId) -> Self {
        self.roles.insert(role);
        self
    }

    /// Whether this member holds administrative capability in the community
    pub fn has_administrative_capability(&self) -> bool {
        self.administrator
    }

    /// Whether this member currently holds the given role
    pub fn holds_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }
}
