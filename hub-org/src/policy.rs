//! Authorization policy
//!
//! Each organization has exactly one authorization policy. It either selects
//! a predefined template by name or carries a custom Rego module, plus the
//! JSON data the rules read roles and permissions from.
//!
//! Every write is checked here first. Custom modules are only checked
//! structurally (package, `allow` and `allowed_actions` rules); rule bodies
//! are the authorizer's concern.

use hub_authz::predefined;
use hub_authz::rego::{RegoModule, ALLOWED_ACTIONS_RULE, ALLOW_RULE, AUTHZ_PACKAGE};
use serde_json::{json, Value};

use crate::validation::{run, Check, Rule, ValidationError};

/// An organization's authorization policy.
///
/// Empty strings and empty data are treated as absent.
///
/// # Examples
///
/// ```
/// use hub_org::AuthorizationPolicy;
///
/// let policy = AuthorizationPolicy::predefined("rbac.v1").with_data(b"{}".to_vec());
/// assert!(policy.validate().is_ok());
///
/// let both = AuthorizationPolicy {
///     predefined_policy: Some("rbac.v1".into()),
///     custom_policy: Some("package artifacthub.authz".into()),
///     ..AuthorizationPolicy::default()
/// };
/// assert!(both.validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    /// Whether the policy is enforced
    pub authorization_enabled: bool,

    /// Name of a predefined policy, e.g. `rbac.v1`
    pub predefined_policy: Option<String>,

    /// Custom Rego module
    pub custom_policy: Option<String>,

    /// JSON document with roles and policy parameters
    pub policy_data: Option<Vec<u8>>,
}

impl AuthorizationPolicy {
    /// An enabled policy using a predefined template.
    pub fn predefined(name: impl Into<String>) -> Self {
        Self {
            authorization_enabled: true,
            predefined_policy: Some(name.into()),
            ..Self::default()
        }
    }

    /// An enabled policy using a custom module.
    pub fn custom(module: impl Into<String>) -> Self {
        Self {
            authorization_enabled: true,
            custom_policy: Some(module.into()),
            ..Self::default()
        }
    }

    /// Attach policy data.
    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.policy_data = Some(data.into());
        self
    }

    fn predefined_name(&self) -> Option<&str> {
        self.predefined_policy.as_deref().filter(|s| !s.is_empty())
    }

    fn custom_module(&self) -> Option<&str> {
        self.custom_policy.as_deref().filter(|s| !s.is_empty())
    }

    fn data(&self) -> Option<&[u8]> {
        self.policy_data.as_deref().filter(|d| !d.is_empty())
    }

    /// Check the policy, reporting the first violated rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        run(self, POLICY_CHECKS)
    }

    /// JSON document handed to the store.
    ///
    /// Policy data is embedded as a JSON value, so the policy must have
    /// passed [`validate`](Self::validate) for this to succeed.
    pub fn to_document(&self) -> Result<Value, ValidationError> {
        let data = self.data().map(parse_data).transpose()?;
        Ok(json!({
            "authorization_enabled": self.authorization_enabled,
            "predefined_policy": self.predefined_name(),
            "custom_policy": self.custom_module(),
            "policy_data": data,
        }))
    }
}

fn parse_data(data: &[u8]) -> Result<Value, ValidationError> {
    serde_json::from_slice(data).map_err(|e| ValidationError::with_detail(Rule::PolicyData, e))
}

fn exclusive(policy: &AuthorizationPolicy) -> Result<(), ValidationError> {
    if policy.predefined_name().is_some() && policy.custom_module().is_some() {
        return Err(ValidationError::new(Rule::PolicyExclusive));
    }
    Ok(())
}

fn present_when_enabled(policy: &AuthorizationPolicy) -> Result<(), ValidationError> {
    if policy.authorization_enabled
        && policy.predefined_name().is_none()
        && policy.custom_module().is_none()
    {
        return Err(ValidationError::new(Rule::PolicyMissing));
    }
    Ok(())
}

fn known_predefined(policy: &AuthorizationPolicy) -> Result<(), ValidationError> {
    match policy.predefined_name() {
        Some(name) if !predefined::is_valid(name) => {
            Err(ValidationError::new(Rule::PredefinedPolicy))
        }
        _ => Ok(()),
    }
}

fn custom_module_contract(policy: &AuthorizationPolicy) -> Result<(), ValidationError> {
    let Some(source) = policy.custom_module() else {
        return Ok(());
    };
    let module = RegoModule::parse(source)
        .map_err(|e| ValidationError::with_detail(Rule::CustomPolicySyntax, e))?;
    if !module.declares(AUTHZ_PACKAGE, ALLOW_RULE) {
        return Err(ValidationError::new(Rule::AllowRule));
    }
    if !module.declares(AUTHZ_PACKAGE, ALLOWED_ACTIONS_RULE) {
        return Err(ValidationError::new(Rule::AllowedActionsRule));
    }
    Ok(())
}

fn well_formed_data(policy: &AuthorizationPolicy) -> Result<(), ValidationError> {
    policy.data().map(parse_data).transpose().map(|_| ())
}

const POLICY_CHECKS: &[Check<AuthorizationPolicy>] = &[
    exclusive,
    present_when_enabled,
    known_predefined,
    custom_module_contract,
    well_formed_data,
];
