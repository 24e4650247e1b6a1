//! Well-known role names and the closed [`Role`] enumeration.
//!
//! These must match the seed data in `20260301000002_create_roles.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_APPROVAL_LEADER: &str = "approval_leader";
pub const ROLE_NOM: &str = "nom";
pub const ROLE_SM: &str = "sm";

/// Every role a user can be assigned.
///
/// Each role gates exactly one stage of the purchase-request approval chain.
/// `Admin` additionally owns the administrative operations (edit, delete,
/// legacy status overwrite).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ApprovalLeader,
    Nom,
    Sm,
}

impl Role {
    /// All roles in approval-chain order.
    pub const ALL: [Role; 4] = [Role::Admin, Role::ApprovalLeader, Role::Nom, Role::Sm];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::ApprovalLeader => ROLE_APPROVAL_LEADER,
            Role::Nom => ROLE_NOM,
            Role::Sm => ROLE_SM,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_APPROVAL_LEADER => Ok(Role::ApprovalLeader),
            ROLE_NOM => Ok(Role::Nom),
            ROLE_SM => Ok(Role::Sm),
            other => Err(format!("Unknown role '{other}'")),
        }
    }
}

/// Parse a list of role names, silently skipping names outside the closed
/// enumeration.
///
/// Role rows are seeded, so an unknown name only appears if the table was
/// edited by hand; such a role grants nothing.
pub fn parse_roles<S: AsRef<str>>(names: &[S]) -> Vec<Role> {
    names
        .iter()
        .filter_map(|n| n.as_ref().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn legacy_capitalised_names_are_rejected() {
        assert!("Admin".parse::<Role>().is_err());
        assert!("Leader".parse::<Role>().is_err());
        assert!("Manager".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&Role::ApprovalLeader).unwrap();
        assert_eq!(json, "\"approval_leader\"");
    }

    #[test]
    fn parse_roles_skips_unknown_names() {
        let roles = parse_roles(&["nom", "employee", "sm"]);
        assert_eq!(roles, vec![Role::Nom, Role::Sm]);
    }
}
