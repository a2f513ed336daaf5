//! Static role-based access control. One table, no escalation paths.

use serde::{Deserialize, Serialize};

use crate::error::SightlineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Analyst,
    Viewer,
}

pub const ROLE_OPTIONS: [Role; 3] = [Role::Admin, Role::Analyst, Role::Viewer];

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Analyst => write!(f, "Analyst"),
            Role::Viewer => write!(f, "Viewer"),
        }
    }
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Admin" => Some(Role::Admin),
            "Analyst" => Some(Role::Analyst),
            "Viewer" => Some(Role::Viewer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    EventsRead,
    EventsCreate,
    EventsUpdate,
    EventsDelete,
    UsersRead,
    UsersUpdateRole,
}

pub const PERMISSION_OPTIONS: [Permission; 6] = [
    Permission::EventsRead,
    Permission::EventsCreate,
    Permission::EventsUpdate,
    Permission::EventsDelete,
    Permission::UsersRead,
    Permission::UsersUpdateRole,
];

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::EventsRead => write!(f, "events:read"),
            Permission::EventsCreate => write!(f, "events:create"),
            Permission::EventsUpdate => write!(f, "events:update"),
            Permission::EventsDelete => write!(f, "events:delete"),
            Permission::UsersRead => write!(f, "users:read"),
            Permission::UsersUpdateRole => write!(f, "users:updateRole"),
        }
    }
}

/// The full permission set for a role. Admin covers everything; Analyst can
/// read and write events; Viewer is read-only. Only Admin holds `users:*`.
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => &[
            Permission::EventsRead,
            Permission::EventsCreate,
            Permission::EventsUpdate,
            Permission::EventsDelete,
            Permission::UsersRead,
            Permission::UsersUpdateRole,
        ],
        Role::Analyst => &[
            Permission::EventsRead,
            Permission::EventsCreate,
            Permission::EventsUpdate,
        ],
        Role::Viewer => &[Permission::EventsRead],
    }
}

/// Pure, total over both finite domains.
pub fn is_allowed(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// A resolved caller: user id plus role. Credential verification happens
/// upstream; this is what every operation receives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

/// Gate an operation. No identity is `Unauthenticated`; an identity whose
/// role lacks the permission is `Forbidden`. Has no side effect on success.
pub fn assert_permission(
    identity: Option<&Identity>,
    permission: Permission,
) -> Result<(), SightlineError> {
    let Some(identity) = identity else {
        return Err(SightlineError::Unauthenticated);
    };
    if !is_allowed(identity.role, permission) {
        return Err(SightlineError::Forbidden(permission));
    }
    Ok(())
}
