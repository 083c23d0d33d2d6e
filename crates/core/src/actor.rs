//! Actor identity, roles, and capabilities.
//!
//! Every policy, gate, and executor call takes an explicit [`Actor`]; there
//! is no ambient current-user state anywhere in the core.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Well-known role names. Roles gate the few transitions that are tied to a
/// position rather than a grantable capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Coordinator,
    Member,
}

impl Role {
    /// The wire/database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Coordinator => "coordinator",
            Self::Member => "member",
        }
    }

    /// Parse the wire/database representation. Unknown roles fall back to
    /// `Member`, the least-privileged role.
    pub fn parse_or_member(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            "coordinator" => Self::Coordinator,
            _ => Self::Member,
        }
    }

    /// Admins and coordinators hold management rights (e.g. closing a
    /// completed project, marking reimbursements paid).
    pub fn can_manage(self) -> bool {
        matches!(self, Self::Admin | Self::Coordinator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A grantable capability, independent of role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ApproveProjects,
    ApproveItemRequests,
    ManageInventory,
    ApproveReimbursements,
}

/// The authenticated actor a request runs as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub uid: EntityId,
    pub role: Role,
    pub capabilities: HashSet<Capability>,
}

impl Actor {
    pub fn new(uid: EntityId, role: Role) -> Self {
        Self {
            uid,
            role,
            capabilities: HashSet::new(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn unknown_role_falls_back_to_member() {
        assert_eq!(Role::parse_or_member("admin"), Role::Admin);
        assert_eq!(Role::parse_or_member("coordinator"), Role::Coordinator);
        assert_eq!(Role::parse_or_member("intern"), Role::Member);
    }

    #[test]
    fn management_rights_are_admin_and_coordinator_only() {
        assert!(Role::Admin.can_manage());
        assert!(Role::Coordinator.can_manage());
        assert!(!Role::Member.can_manage());
    }

    #[test]
    fn capabilities_are_explicit_grants() {
        let actor = Actor::new(Uuid::new_v4(), Role::Member)
            .with_capability(Capability::ApproveProjects);
        assert!(actor.has(Capability::ApproveProjects));
        assert!(!actor.has(Capability::ManageInventory));
    }
}
