//! # Hub Authorization
//!
//! This crate provides the authorization vocabulary shared by the hub's
//! organization services: what can be asked, who answers, and which policy
//! documents the answering engine accepts.
//!
//! ## Overview
//!
//! The hub-authz crate handles:
//! - **Actions**: The fixed set of privileged organization actions
//! - **Authorizer**: The gateway trait and its input and error types
//! - **Predefined policies**: Versioned built-in policy templates
//! - **Policy modules**: Structural reading of custom Rego policies
//!
//! ## Architecture
//!
//! ```text
//! AuthorizeInput = Organization + User + Action
//!
//!   OrganizationManager ── AuthorizeInput ──→ Authorizer ──→ Ok(()) | AuthzError
//!                                                │
//!                                                └─ evaluates the org's policy:
//!                                                     predefined (rbac.v1) or custom module
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hub_authz::{Action, AuthorizeInput, Authorizer, AuthzResult};
//! use async_trait::async_trait;
//! use uuid::Uuid;
//!
//! struct AllowAll;
//!
//! #[async_trait]
//! impl Authorizer for AllowAll {
//!     async fn authorize(&self, _input: &AuthorizeInput) -> AuthzResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! async fn check(authorizer: &dyn Authorizer) -> AuthzResult<()> {
//!     let input = AuthorizeInput::new("org1", Uuid::now_v7(), Action::UpdateOrganization);
//!     authorizer.authorize(&input).await
//! }
//! ```
//!
//! ## Policy contract
//!
//! A policy the authorizer can evaluate must declare the package
//! `artifacthub.authz` and define both an `allow` rule and an
//! `allowed_actions` rule. See [`rego`] for how that is checked.

pub mod actions;
pub mod authorizer;
pub mod predefined;
pub mod rego;

// Re-export main types for convenience
pub use actions::Action;
pub use authorizer::{AuthorizeInput, Authorizer, AuthzError, AuthzResult};
pub use predefined::{PredefinedPolicy, PREDEFINED_POLICIES};
pub use rego::{ParseError, RegoModule};
