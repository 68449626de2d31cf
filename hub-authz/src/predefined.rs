//! # Predefined policies
//!
//! Platform-maintained authorization templates an organization can select by
//! name instead of authoring a custom policy. Names carry a version suffix so
//! a template can evolve without changing the behavior of organizations that
//! already selected an earlier version.

use serde::Serialize;

/// A built-in authorization policy template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredefinedPolicy {
    /// Versioned name organizations select, e.g. `rbac.v1`
    pub name: &'static str,

    /// Short description for listings
    pub description: &'static str,

    /// Policy source evaluated by the authorizer
    #[serde(skip)]
    pub policy: &'static str,

    /// Policy data new organizations start from
    #[serde(skip)]
    pub default_data: &'static str,
}

/// Role-based access control, version 1.
///
/// Owners may perform every action. Any other role is granted the actions
/// listed in its `permissions` entry in the policy data.
pub const RBAC_V1: PredefinedPolicy = PredefinedPolicy {
    name: "rbac.v1",
    description: "Role-based access control: owners can do anything, other roles get the actions listed in their permissions",
    policy: r#"package artifacthub.authz

# Owners can perform all actions
allowed_actions[action] {
    user_roles[_] == "owner"
    action := "all"
}

# Other roles get the actions listed in their permissions
allowed_actions[action] {
    some role
    user_roles[role]
    action := data.roles[role].permissions[_]
}

default allow = false

allow {
    allowed_actions[_] == "all"
}

allow {
    allowed_actions[_] == input.action
}

user_roles[role] {
    some role
    data.roles[role].users[_] == input.user
}
"#,
    default_data: r#"{
    "roles": {
        "owner": {
            "users": []
        },
        "member": {
            "users": [],
            "permissions": [
                "addOrganizationRepository",
                "updateOrganizationRepository"
            ]
        }
    }
}"#,
};

/// Every predefined policy that can be selected.
pub const PREDEFINED_POLICIES: &[PredefinedPolicy] = &[RBAC_V1];

/// Look up a predefined policy by name.
///
/// # Example
///
/// ```
/// use hub_authz::predefined;
///
/// assert!(predefined::get("rbac.v1").is_some());
/// assert!(predefined::get("rbac.v99").is_none());
/// ```
pub fn get(name: &str) -> Option<&'static PredefinedPolicy> {
    PREDEFINED_POLICIES.iter().find(|policy| policy.name == name)
}

/// Check if `name` refers to a predefined policy.
pub fn is_valid(name: &str) -> bool {
    get(name).is_some()
}
