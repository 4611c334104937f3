//! Static role to capability mapping.
//!
//! The table is an exhaustive `match`, so adding a role without deciding what
//! it may do is a compile error rather than a silent empty permission set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Dispatcher,
    Operator,
}

/// One discrete permission, serialized as its snake_case tag
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewDashboard,
    ViewOrders,
    ManageOrders,
    ManageDrivers,
    ViewReports,
    ManageUsers,
    ManageSettings,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Dispatcher, Role::Operator];

    pub fn capabilities(self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::Admin => &[
                ViewDashboard,
                ViewOrders,
                ManageOrders,
                ManageDrivers,
                ViewReports,
                ManageUsers,
                ManageSettings,
            ],
            Role::Dispatcher => &[
                ViewDashboard,
                ViewOrders,
                ManageOrders,
                ManageDrivers,
                ViewReports,
            ],
            Role::Operator => &[ViewDashboard, ViewOrders],
        }
    }

    pub fn grants(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Dispatcher => "dispatcher",
            Role::Operator => "operator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Capability {
    pub const ALL: [Capability; 7] = [
        Capability::ViewDashboard,
        Capability::ViewOrders,
        Capability::ManageOrders,
        Capability::ManageDrivers,
        Capability::ViewReports,
        Capability::ManageUsers,
        Capability::ManageSettings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::ViewDashboard => "view_dashboard",
            Capability::ViewOrders => "view_orders",
            Capability::ManageOrders => "manage_orders",
            Capability::ManageDrivers => "manage_drivers",
            Capability::ViewReports => "view_reports",
            Capability::ManageUsers => "manage_users",
            Capability::ManageSettings => "manage_settings",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown capability tag: {0}")]
pub struct UnknownCapability(pub String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|capability| capability.as_str() == tag)
            .ok_or_else(|| UnknownCapability(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_capabilities() {
        for role in Role::ALL {
            assert!(!role.capabilities().is_empty(), "{} has no capabilities", role);
        }
    }

    #[test]
    fn test_grants_match_table_exactly() {
        for role in Role::ALL {
            for capability in Capability::ALL {
                assert_eq!(
                    role.grants(capability),
                    role.capabilities().contains(&capability),
                    "{} / {}",
                    role,
                    capability
                );
            }
        }
    }

    #[test]
    fn test_role_boundaries() {
        assert!(Role::Admin.grants(Capability::ManageSettings));
        assert!(Role::Dispatcher.grants(Capability::ManageOrders));
        assert!(!Role::Dispatcher.grants(Capability::ManageUsers));
        assert!(Role::Operator.grants(Capability::ViewOrders));
        assert!(!Role::Operator.grants(Capability::ManageOrders));
    }

    #[test]
    fn test_capability_tags_parse() {
        for capability in Capability::ALL {
            assert_eq!(capability.as_str().parse::<Capability>(), Ok(capability));
        }
        assert!("launch_rockets".parse::<Capability>().is_err());
    }

    #[test]
    fn test_serde_tags_match_as_str() {
        for capability in Capability::ALL {
            let value = serde_json::to_value(capability).unwrap();
            assert_eq!(value, capability.as_str());
        }
        for role in Role::ALL {
            let value = serde_json::to_value(role).unwrap();
            assert_eq!(value, role.as_str());
        }
    }
}
