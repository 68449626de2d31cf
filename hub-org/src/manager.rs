//! Organization manager
//!
//! Every operation follows the same shape: validate the input, ask the
//! authorizer when the operation is privileged, call the store, translate
//! the store's error, and notify when there is something to tell. Nothing
//! reaches the store before validation and authorization have passed.
//!
//! ```text
//! caller ── (actor, args) ──→ validate ──→ authorize? ──→ store ──→ notify?
//!                               │             │             │          │
//!                               └── 400 ──────┴── 403 ──────┴── 403/500┴── 500
//! ```
//!
//! Read operations return the JSON document the store composes, untouched.

use std::future::Future;
use std::sync::Arc;

use hub_authz::{Action, AuthorizeInput, Authorizer};
use hub_email::EmailSender;
use tracing::{debug, instrument, warn};

use crate::config::{ConfigError, ManagerConfig};
use crate::context::ActorId;
use crate::db::{Database, RawJson, SqlArg};
use crate::error::{OrgError, OrgResult};
use crate::invitation::invitation_email;
use crate::membership::MembershipEvent;
use crate::organization::Organization;
use crate::policy::AuthorizationPolicy;
use crate::validation::{
    validate_availability, validate_invitation, validate_member, validate_organization,
    validate_organization_name, Rule, ValidationError,
};

/// Stored procedures and queries the manager runs.
pub mod queries {
    pub const ADD_ORGANIZATION: &str = "select add_organization($1::uuid, $2::jsonb)";
    pub const UPDATE_ORGANIZATION: &str = "select update_organization($1::uuid, $2::jsonb)";
    pub const GET_ORGANIZATION: &str = "select get_organization($1::text)";
    pub const GET_USER_ORGANIZATIONS: &str = "select get_user_organizations($1::uuid)";
    pub const ADD_ORGANIZATION_MEMBER: &str =
        "select add_organization_member($1::uuid, $2::text, $3::text)";
    pub const GET_USER_EMAIL: &str = r#"select email from "user" where alias = $1"#;
    pub const CONFIRM_ORGANIZATION_MEMBERSHIP: &str =
        "select confirm_organization_membership($1::uuid, $2::text)";
    pub const GET_USER_ALIAS: &str = r#"select alias from "user" where user_id = $1"#;
    pub const DELETE_ORGANIZATION_MEMBER: &str =
        "select delete_organization_member($1::uuid, $2::text, $3::text)";
    pub const GET_ORGANIZATION_MEMBERS: &str =
        "select get_organization_members($1::uuid, $2::text)";
    pub const GET_AUTHORIZATION_POLICY: &str =
        "select get_authorization_policy($1::uuid, $2::text)";
    pub const UPDATE_AUTHORIZATION_POLICY: &str =
        "select update_authorization_policy($1::uuid, $2::text, $3::jsonb)";
}

use queries::*;

const STORAGE: &str = "storage call";
const AUTHORIZER: &str = "authorizer call";
const EMAIL: &str = "invitation email";

/// Manages organizations, their members and their authorization policy.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use hub_org::{ActorId, Database, Organization, OrganizationManager, OrgResult};
/// use hub_authz::Authorizer;
///
/// async fn create(
///     db: Arc<dyn Database>,
///     authorizer: Arc<dyn Authorizer>,
///     actor: ActorId,
/// ) -> OrgResult<()> {
///     let manager = OrganizationManager::new(db, None, authorizer);
///     manager.add(actor, &Organization::new("acme-corp")).await
/// }
/// ```
#[derive(Clone)]
pub struct OrganizationManager {
    db: Arc<dyn Database>,
    email_sender: Option<Arc<dyn EmailSender>>,
    authorizer: Arc<dyn Authorizer>,
    config: ManagerConfig,
}

impl OrganizationManager {
    /// Create a manager with the default configuration.
    ///
    /// Without an email sender, members are added without an invitation
    /// email.
    pub fn new(
        db: Arc<dyn Database>,
        email_sender: Option<Arc<dyn EmailSender>>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            db,
            email_sender,
            authorizer,
            config: ManagerConfig::default(),
        }
    }

    /// Replace the configuration, rejecting values the manager cannot run
    /// with.
    pub fn with_config(mut self, config: ManagerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Configuration in use.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Await an external call, bounded by the configured timeout.
    async fn within<T, E>(
        &self,
        stage: &'static str,
        call: impl Future<Output = Result<T, E>>,
    ) -> OrgResult<T>
    where
        OrgError: From<E>,
    {
        match tokio::time::timeout(self.config.call_timeout(), call).await {
            Ok(result) => result.map_err(OrgError::from),
            Err(_) => {
                warn!(stage, timeout_secs = self.config.call_timeout_secs, "Call timed out");
                Err(OrgError::Timeout(stage))
            }
        }
    }

    async fn exec(&self, query: &str, args: &[SqlArg]) -> OrgResult<()> {
        self.within(STORAGE, self.db.exec(query, args)).await
    }

    async fn query_json(&self, query: &str, args: &[SqlArg]) -> OrgResult<RawJson> {
        let value = self.within(STORAGE, self.db.query_row(query, args)).await?;
        Ok(value.into_raw_json()?)
    }

    async fn query_text(&self, query: &str, args: &[SqlArg]) -> OrgResult<String> {
        let value = self.within(STORAGE, self.db.query_row(query, args)).await?;
        Ok(value.into_text()?)
    }

    /// Ask the authorizer whether `actor` may perform `action`.
    async fn authorize(
        &self,
        actor: ActorId,
        organization_name: &str,
        action: Action,
    ) -> OrgResult<()> {
        let input = AuthorizeInput::new(organization_name, actor.as_uuid(), action);
        let result = self.within(AUTHORIZER, self.authorizer.authorize(&input)).await;
        if let Err(ref e) = result {
            warn!(%action, error = %e, "Authorization failed");
        }
        result
    }

    /// Create an organization owned by `actor`.
    #[instrument(skip(self, org), fields(org = %org.name))]
    pub async fn add(&self, actor: ActorId, org: &Organization) -> OrgResult<()> {
        validate_organization(org)?;

        self.exec(
            ADD_ORGANIZATION,
            &[actor.as_uuid().into(), org.to_document().into()],
        )
        .await?;

        debug!("Organization added");
        Ok(())
    }

    /// Update an organization's details.
    #[instrument(skip(self, org), fields(org = %org.name))]
    pub async fn update(&self, actor: ActorId, org: &Organization) -> OrgResult<()> {
        validate_organization(org)?;
        self.authorize(actor, &org.name, Action::UpdateOrganization)
            .await?;

        self.exec(
            UPDATE_ORGANIZATION,
            &[actor.as_uuid().into(), org.to_document().into()],
        )
        .await?;

        debug!("Organization updated");
        Ok(())
    }

    /// Get an organization as JSON.
    #[instrument(skip(self))]
    pub async fn get_json(&self, organization_name: &str) -> OrgResult<RawJson> {
        validate_organization_name(organization_name)?;
        self.query_json(GET_ORGANIZATION, &[organization_name.into()])
            .await
    }

    /// Get the organizations `actor` belongs to as JSON.
    #[instrument(skip(self))]
    pub async fn get_by_user_json(&self, actor: ActorId) -> OrgResult<RawJson> {
        self.query_json(GET_USER_ORGANIZATIONS, &[actor.as_uuid().into()])
            .await
    }

    /// Invite a user to an organization.
    ///
    /// The membership stays recorded if the invitation email fails; that
    /// failure is returned as [`OrgError::Notification`].
    #[instrument(skip(self))]
    pub async fn add_member(
        &self,
        actor: ActorId,
        organization_name: &str,
        user_alias: &str,
        base_url: &str,
    ) -> OrgResult<()> {
        validate_invitation(organization_name, user_alias, base_url)?;
        self.authorize(actor, organization_name, Action::AddOrganizationMember)
            .await?;

        self.exec(
            ADD_ORGANIZATION_MEMBER,
            &[
                actor.as_uuid().into(),
                organization_name.into(),
                user_alias.into(),
            ],
        )
        .await?;

        let event = MembershipEvent::Invite;
        debug!(%event, state = %event.target_state(), "Member added");

        if let Some(sender) = &self.email_sender {
            let to = self.query_text(GET_USER_EMAIL, &[user_alias.into()]).await?;
            let email = invitation_email(to, organization_name, base_url);
            if let Err(e) = self.within(EMAIL, sender.send_email(&email)).await {
                warn!(error = %e, "Invitation email not sent, membership kept");
                return Err(e);
            }
            debug!("Invitation email sent");
        }

        Ok(())
    }

    /// Accept a pending invitation on behalf of `actor`.
    #[instrument(skip(self))]
    pub async fn confirm_membership(
        &self,
        actor: ActorId,
        organization_name: &str,
    ) -> OrgResult<()> {
        validate_organization_name(organization_name)?;

        self.exec(
            CONFIRM_ORGANIZATION_MEMBERSHIP,
            &[actor.as_uuid().into(), organization_name.into()],
        )
        .await?;

        let event = MembershipEvent::Confirm;
        debug!(%event, state = %event.target_state(), "Membership confirmed");
        Ok(())
    }

    /// Remove a member from an organization.
    ///
    /// Leaving an organization (removing yourself) needs no authorization.
    #[instrument(skip(self))]
    pub async fn delete_member(
        &self,
        actor: ActorId,
        organization_name: &str,
        user_alias: &str,
    ) -> OrgResult<()> {
        validate_member(organization_name, user_alias)?;

        let actor_alias = self
            .query_text(GET_USER_ALIAS, &[actor.as_uuid().into()])
            .await?;
        let leaving = actor_alias == user_alias;
        if !leaving {
            self.authorize(actor, organization_name, Action::DeleteOrganizationMember)
                .await?;
        }

        self.exec(
            DELETE_ORGANIZATION_MEMBER,
            &[
                actor.as_uuid().into(),
                organization_name.into(),
                user_alias.into(),
            ],
        )
        .await?;

        let event = MembershipEvent::Remove;
        debug!(
            %event,
            state = %event.target_state(),
            leaving,
            "Member removed"
        );
        Ok(())
    }

    /// Get an organization's members as JSON.
    #[instrument(skip(self))]
    pub async fn get_members_json(
        &self,
        actor: ActorId,
        organization_name: &str,
    ) -> OrgResult<RawJson> {
        validate_organization_name(organization_name)?;
        self.query_json(
            GET_ORGANIZATION_MEMBERS,
            &[actor.as_uuid().into(), organization_name.into()],
        )
        .await
    }

    /// Check whether a resource name is still free.
    #[instrument(skip(self))]
    pub async fn check_availability(&self, resource_kind: &str, value: &str) -> OrgResult<bool> {
        let kind = validate_availability(resource_kind, value)?;
        let query = format!("select not exists ({})", kind.lookup_query());

        let value = self
            .within(STORAGE, self.db.query_row(&query, &[value.into()]))
            .await?;
        Ok(value.into_bool()?)
    }

    /// Get an organization's authorization policy as JSON.
    #[instrument(skip(self))]
    pub async fn get_authorization_policy_json(
        &self,
        actor: ActorId,
        organization_name: &str,
    ) -> OrgResult<RawJson> {
        validate_organization_name(organization_name)?;
        self.authorize(actor, organization_name, Action::GetAuthorizationPolicy)
            .await?;

        self.query_json(
            GET_AUTHORIZATION_POLICY,
            &[actor.as_uuid().into(), organization_name.into()],
        )
        .await
    }

    /// Replace an organization's authorization policy.
    #[instrument(skip(self, policy))]
    pub async fn update_authorization_policy(
        &self,
        actor: ActorId,
        organization_name: &str,
        policy: Option<&AuthorizationPolicy>,
    ) -> OrgResult<()> {
        validate_organization_name(organization_name)?;
        let policy = policy.ok_or_else(|| ValidationError::new(Rule::PolicyRequired))?;
        policy.validate()?;
        let document = policy.to_document()?;

        self.authorize(actor, organization_name, Action::UpdateAuthorizationPolicy)
            .await?;

        self.exec(
            UPDATE_AUTHORIZATION_POLICY,
            &[
                actor.as_uuid().into(),
                organization_name.into(),
                document.into(),
            ],
        )
        .await?;

        debug!(
            enabled = policy.authorization_enabled,
            "Authorization policy updated"
        );
        Ok(())
    }
}
