//! Acting user identity
//!
//! Manager operations take the acting user as an explicit [`ActorId`]. The
//! request boundary resolves it once from its [`RequestContext`]; a request
//! that reaches an actor-scoped operation without an authenticated user is a
//! wiring bug, not a client error.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the user performing an operation.
///
/// # Examples
///
/// ```
/// use hub_org::ActorId;
/// use uuid::Uuid;
///
/// let user_id = Uuid::now_v7();
/// let actor = ActorId::new(user_id);
/// assert_eq!(actor.as_uuid(), user_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(Uuid);

impl ActorId {
    /// Wrap an authenticated user's ID.
    pub fn new(user_id: Uuid) -> Self {
        Self(user_id)
    }

    /// The user's ID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for ActorId {
    fn from(user_id: Uuid) -> Self {
        Self(user_id)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-request data populated by the authentication layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Authenticated user, if any
    pub user_id: Option<Uuid>,

    /// Correlation ID for logs
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Creates an anonymous request context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authenticated user.
    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Set the request correlation ID.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// The acting user, if the request is authenticated.
    pub fn try_actor(&self) -> Option<ActorId> {
        self.user_id.map(ActorId)
    }

    /// The acting user.
    ///
    /// # Panics
    ///
    /// Panics if no user was set. Handlers for actor-scoped operations are
    /// only mounted behind authentication, so a missing user here means the
    /// request was routed wrongly.
    pub fn actor(&self) -> ActorId {
        match self.try_actor() {
            Some(actor) => actor,
            None => panic!("user id not found in request context"),
        }
    }
}
