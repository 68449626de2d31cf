//! Input validation
//!
//! Every manager operation checks its input here before calling the
//! authorizer or the store. Checks are ordered lists of pure functions run
//! fail-fast, so the first violated rule is the one reported.

use std::fmt;
use std::sync::LazyLock;

use hub_email::Url;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::organization::Organization;

/// Organization names: lowercase alphanumerics and hyphens, not starting or
/// ending with a hyphen.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").expect("name pattern is valid")
});

/// A validation rule that input can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    NameRequired,
    NameFormat,
    LogoImageId,
    OrganizationNameRequired,
    UserAliasRequired,
    BaseUrlRequired,
    BaseUrlFormat,
    ResourceKind,
    AvailabilityValue,
    PolicyRequired,
    PolicyExclusive,
    PolicyMissing,
    PredefinedPolicy,
    CustomPolicySyntax,
    AllowRule,
    AllowedActionsRule,
    PolicyData,
}

impl Rule {
    /// Message fragment reported when the rule is violated.
    pub fn message(&self) -> &'static str {
        match self {
            Rule::NameRequired => "name not provided",
            Rule::NameFormat => "invalid name",
            Rule::LogoImageId => "invalid logo image id",
            Rule::OrganizationNameRequired => "organization name not provided",
            Rule::UserAliasRequired => "user alias not provided",
            Rule::BaseUrlRequired => "base url not provided",
            Rule::BaseUrlFormat => "invalid base url",
            Rule::ResourceKind => "invalid resource kind",
            Rule::AvailabilityValue => "invalid value",
            Rule::PolicyRequired => "authorization policy not provided",
            Rule::PolicyExclusive => "both predefined and custom policies were provided",
            Rule::PolicyMissing => "a predefined or custom policy must be provided",
            Rule::PredefinedPolicy => "invalid predefined policy",
            Rule::CustomPolicySyntax => "invalid custom policy",
            Rule::AllowRule => "allow rule not found in custom policy",
            Rule::AllowedActionsRule => "allowed actions rule not found in custom policy",
            Rule::PolicyData => "invalid policy data",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A violated validation rule.
///
/// `message` always starts with the rule's message fragment; some rules add
/// detail after it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Rule that failed
    pub rule: Rule,

    /// Human-readable description
    pub message: String,
}

impl ValidationError {
    /// Create an error carrying the rule's own message.
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            message: rule.message().to_string(),
        }
    }

    /// Create an error with extra detail after the rule's message.
    pub fn with_detail(rule: Rule, detail: impl fmt::Display) -> Self {
        Self {
            rule,
            message: format!("{}: {}", rule.message(), detail),
        }
    }
}

/// A single validation check.
pub(crate) type Check<T> = fn(&T) -> Result<(), ValidationError>;

/// Run checks in order, stopping at the first failure.
pub(crate) fn run<T>(input: &T, checks: &[Check<T>]) -> Result<(), ValidationError> {
    checks.iter().try_for_each(|check| check(input))
}

fn require(value: &str, rule: Rule) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(rule));
    }
    Ok(())
}

/// Check if `name` is a valid organization name.
///
/// # Examples
///
/// ```
/// use hub_org::validation::is_valid_name;
///
/// assert!(is_valid_name("acme-corp"));
/// assert!(!is_valid_name("_org1"));
/// assert!(!is_valid_name("UPPERCASE"));
/// assert!(!is_valid_name("trailing-"));
/// ```
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

// Organization

fn org_name_provided(org: &Organization) -> Result<(), ValidationError> {
    require(&org.name, Rule::NameRequired)
}

fn org_name_format(org: &Organization) -> Result<(), ValidationError> {
    if !is_valid_name(&org.name) {
        return Err(ValidationError::new(Rule::NameFormat));
    }
    Ok(())
}

fn org_logo_image_id(org: &Organization) -> Result<(), ValidationError> {
    match org.logo_image_id.as_deref() {
        Some(id) if !id.is_empty() && Uuid::parse_str(id).is_err() => {
            Err(ValidationError::new(Rule::LogoImageId))
        }
        _ => Ok(()),
    }
}

const ORGANIZATION_CHECKS: &[Check<Organization>] =
    &[org_name_provided, org_name_format, org_logo_image_id];

/// Validate an organization before it is created or updated.
pub fn validate_organization(org: &Organization) -> Result<(), ValidationError> {
    run(org, ORGANIZATION_CHECKS)
}

/// Validate an organization name passed to a member, read or policy operation.
pub fn validate_organization_name(name: &str) -> Result<(), ValidationError> {
    require(name, Rule::OrganizationNameRequired)
}

// Members

/// Arguments of a member operation.
#[derive(Debug, Clone, Copy)]
pub struct MemberRequest<'a> {
    /// Organization the member belongs to
    pub organization_name: &'a str,

    /// Member's user alias
    pub user_alias: &'a str,

    /// Base URL for invitation links, only used when inviting
    pub base_url: &'a str,
}

fn member_org_provided(req: &MemberRequest<'_>) -> Result<(), ValidationError> {
    validate_organization_name(req.organization_name)
}

fn member_alias_provided(req: &MemberRequest<'_>) -> Result<(), ValidationError> {
    require(req.user_alias, Rule::UserAliasRequired)
}

fn member_base_url_provided(req: &MemberRequest<'_>) -> Result<(), ValidationError> {
    require(req.base_url, Rule::BaseUrlRequired)
}

fn member_base_url_absolute(req: &MemberRequest<'_>) -> Result<(), ValidationError> {
    match Url::parse(req.base_url) {
        Ok(url) if url.has_host() => Ok(()),
        _ => Err(ValidationError::new(Rule::BaseUrlFormat)),
    }
}

/// Validate the arguments of a member invitation.
///
/// # Examples
///
/// ```
/// use hub_org::validation::{validate_invitation, Rule};
///
/// assert!(validate_invitation("org1", "user1", "https://hub.example.com").is_ok());
/// assert_eq!(
///     validate_invitation("org1", "user1", "/invalid").unwrap_err().rule,
///     Rule::BaseUrlFormat
/// );
/// ```
pub fn validate_invitation(
    organization_name: &str,
    user_alias: &str,
    base_url: &str,
) -> Result<(), ValidationError> {
    let req = MemberRequest {
        organization_name,
        user_alias,
        base_url,
    };
    let checks = [
        member_org_provided as Check<MemberRequest<'_>>,
        member_alias_provided as Check<MemberRequest<'_>>,
        member_base_url_provided as Check<MemberRequest<'_>>,
        member_base_url_absolute as Check<MemberRequest<'_>>,
    ];
    run(&req, &checks)
}

/// Validate the arguments of a member removal.
pub fn validate_member(organization_name: &str, user_alias: &str) -> Result<(), ValidationError> {
    let req = MemberRequest {
        organization_name,
        user_alias,
        base_url: "",
    };
    let checks = [
        member_org_provided as Check<MemberRequest<'_>>,
        member_alias_provided as Check<MemberRequest<'_>>,
    ];
    run(&req, &checks)
}

// Availability

/// Kind of resource whose name availability can be checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    OrganizationName,
}

impl ResourceKind {
    /// Parse a resource kind from its API name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "organizationName" => Some(ResourceKind::OrganizationName),
            _ => None,
        }
    }

    /// API name of the resource kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::OrganizationName => "organizationName",
        }
    }

    /// Query selecting the resource identified by `$1`.
    pub fn lookup_query(&self) -> &'static str {
        match self {
            ResourceKind::OrganizationName => {
                "select organization_id from organization where name = $1"
            }
        }
    }
}

/// Validate an availability check, returning the parsed resource kind.
pub fn validate_availability(kind: &str, value: &str) -> Result<ResourceKind, ValidationError> {
    let kind = ResourceKind::parse(kind).ok_or_else(|| ValidationError::new(Rule::ResourceKind))?;
    require(value, Rule::AvailabilityValue)?;
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(name: &str) -> Organization {
        Organization::new(name)
    }

    #[test]
    fn test_name_grammar() {
        for valid in ["org1", "a", "acme-corp", "9lives", "a-b-c"] {
            assert!(is_valid_name(valid), "{valid} should be valid");
        }
        for invalid in ["", "_org1", "UPPERCASE", "-org", "org-", "org.name", "org name"] {
            assert!(!is_valid_name(invalid), "{invalid} should be invalid");
        }
    }

    #[test]
    fn test_organization_rules_in_order() {
        let cases = [
            (org(""), Rule::NameRequired),
            (org("_org1"), Rule::NameFormat),
            (org("UPPERCASE"), Rule::NameFormat),
            (org("org1").with_logo_image_id("invalid"), Rule::LogoImageId),
        ];
        for (input, rule) in cases {
            let err = validate_organization(&input).unwrap_err();
            assert_eq!(err.rule, rule);
            assert_eq!(err.to_string(), rule.message());
        }
    }

    #[test]
    fn test_empty_name_reported_before_logo() {
        let input = org("").with_logo_image_id("invalid");
        assert_eq!(
            validate_organization(&input).unwrap_err().rule,
            Rule::NameRequired
        );
    }

    #[test]
    fn test_valid_organization() {
        let input = org("org1").with_logo_image_id(Uuid::now_v7().to_string());
        assert!(validate_organization(&input).is_ok());
        assert!(validate_organization(&org("org1")).is_ok());
    }

    #[test]
    fn test_invitation_rules() {
        let cases = [
            ("", "user1", "https://baseurl.com", Rule::OrganizationNameRequired),
            ("org1", "", "https://baseurl.com", Rule::UserAliasRequired),
            ("org1", "user1", "", Rule::BaseUrlRequired),
            ("org1", "user1", "/invalid", Rule::BaseUrlFormat),
            ("org1", "user1", "mailto:user@example.com", Rule::BaseUrlFormat),
        ];
        for (org_name, alias, base_url, rule) in cases {
            assert_eq!(
                validate_invitation(org_name, alias, base_url).unwrap_err().rule,
                rule
            );
        }
    }

    #[test]
    fn test_member_rules() {
        assert_eq!(
            validate_member("", "user1").unwrap_err().rule,
            Rule::OrganizationNameRequired
        );
        assert_eq!(
            validate_member("org1", "").unwrap_err().rule,
            Rule::UserAliasRequired
        );
        assert!(validate_member("org1", "user1").is_ok());
    }

    #[test]
    fn test_availability() {
        assert_eq!(
            validate_availability("invalid", "value").unwrap_err().rule,
            Rule::ResourceKind
        );
        assert_eq!(
            validate_availability("organizationName", "").unwrap_err().rule,
            Rule::AvailabilityValue
        );
        assert_eq!(
            validate_availability("organizationName", "value"),
            Ok(ResourceKind::OrganizationName)
        );
        assert_eq!(ResourceKind::OrganizationName.as_str(), "organizationName");
    }

    #[test]
    fn test_detail_keeps_rule_prefix() {
        let err = ValidationError::with_detail(Rule::CustomPolicySyntax, "missing package");
        assert_eq!(err.to_string(), "invalid custom policy: missing package");
    }
}
