//! # Hub Organization Management
//!
//! This crate provides organization management for the hub: creating and
//! updating organizations, inviting and removing members, and maintaining
//! each organization's authorization policy.
//!
//! ## Overview
//!
//! The hub-org crate handles:
//! - **Organizations**: Tenants that own repositories and members
//! - **Members**: The invite, confirm, remove lifecycle
//! - **Authorization policies**: Predefined or custom policies, checked before
//!   they are stored
//! - **Validation**: Input checks run before any side effect
//! - **Manager**: The validate, authorize, persist, notify pipeline
//!
//! ## Architecture
//!
//! ```text
//! OrganizationManager
//!   ├─ Database      (stored procedures, JSON documents)
//!   ├─ Authorizer    (hub-authz: can actor do action in org?)
//!   └─ EmailSender   (hub-email: invitation emails, optional)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hub_org::{AuthorizationPolicy, OrganizationManager, OrgResult, RequestContext};
//! use hub_org::Database;
//! use hub_authz::Authorizer;
//!
//! async fn enable_rbac(
//!     db: Arc<dyn Database>,
//!     authorizer: Arc<dyn Authorizer>,
//!     ctx: &RequestContext,
//! ) -> OrgResult<()> {
//!     let manager = OrganizationManager::new(db, None, authorizer);
//!     let policy = AuthorizationPolicy::predefined("rbac.v1").with_data(b"{}".to_vec());
//!     manager
//!         .update_authorization_policy(ctx.actor(), "acme-corp", Some(&policy))
//!         .await
//! }
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate is designed to work with:
//! - `hub-authz`: Actions, the authorizer contract and policy templates
//! - `hub-email`: Invitation delivery

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod invitation;
pub mod manager;
pub mod membership;
pub mod organization;
pub mod policy;
pub mod validation;

// Re-export main types for convenience
pub use config::{ConfigError, ManagerConfig};
pub use context::{ActorId, RequestContext};
pub use db::{Database, DbError, DbResult, RawJson, SqlArg, SqlValue};
pub use error::{OrgError, OrgResult};
pub use manager::OrganizationManager;
pub use membership::{MembershipEvent, MembershipState};
pub use organization::Organization;
pub use policy::AuthorizationPolicy;
pub use validation::{ResourceKind, Rule, ValidationError};
