//! Recording fakes for the manager's collaborators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hub_authz::{AuthorizeInput, Authorizer, AuthzError, AuthzResult};
use hub_email::{Email, EmailError, EmailResult, EmailSender};
use hub_org::{ActorId, Database, DbError, DbResult, OrganizationManager, SqlArg, SqlValue};
use uuid::Uuid;

/// A storage call as the fake received it.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Exec { query: String, args: Vec<SqlArg> },
    QueryRow { query: String, args: Vec<SqlArg> },
}

impl Call {
    pub fn query(&self) -> &str {
        match self {
            Call::Exec { query, .. } | Call::QueryRow { query, .. } => query,
        }
    }

    pub fn args(&self) -> &[SqlArg] {
        match self {
            Call::Exec { args, .. } | Call::QueryRow { args, .. } => args,
        }
    }
}

/// Database fake answering scripted queries and recording every call.
///
/// A query without a scripted response fails the test.
#[derive(Default)]
pub struct FakeDatabase {
    calls: Mutex<Vec<Call>>,
    exec_results: Mutex<HashMap<String, DbResult<()>>>,
    row_results: Mutex<HashMap<String, DbResult<SqlValue>>>,
    delay: Option<Duration>,
}

impl FakeDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A database that takes `delay` to answer anything.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn on_exec(&self, query: &str, result: DbResult<()>) -> &Self {
        self.exec_results
            .lock()
            .unwrap()
            .insert(query.to_string(), result);
        self
    }

    pub fn on_query(&self, query: &str, result: DbResult<SqlValue>) -> &Self {
        self.row_results
            .lock()
            .unwrap()
            .insert(query.to_string(), result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.query().to_string()).collect()
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Database for FakeDatabase {
    async fn exec(&self, query: &str, args: &[SqlArg]) -> DbResult<()> {
        self.calls.lock().unwrap().push(Call::Exec {
            query: query.to_string(),
            args: args.to_vec(),
        });
        self.wait().await;
        let result = self.exec_results.lock().unwrap().get(query).cloned();
        result.unwrap_or_else(|| panic!("unexpected exec: {query}"))
    }

    async fn query_row(&self, query: &str, args: &[SqlArg]) -> DbResult<SqlValue> {
        self.calls.lock().unwrap().push(Call::QueryRow {
            query: query.to_string(),
            args: args.to_vec(),
        });
        self.wait().await;
        let result = self.row_results.lock().unwrap().get(query).cloned();
        result.unwrap_or_else(|| panic!("unexpected query: {query}"))
    }
}

/// Authorizer fake returning a fixed decision and recording its inputs.
pub struct FakeAuthorizer {
    result: AuthzResult<()>,
    inputs: Mutex<Vec<AuthorizeInput>>,
}

impl FakeAuthorizer {
    pub fn allowing() -> Arc<Self> {
        Self::with_result(Ok(()))
    }

    pub fn denying() -> Arc<Self> {
        Self::with_result(Err(AuthzError::InsufficientPrivilege))
    }

    pub fn with_result(result: AuthzResult<()>) -> Arc<Self> {
        Arc::new(Self {
            result,
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn inputs(&self) -> Vec<AuthorizeInput> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Authorizer for FakeAuthorizer {
    async fn authorize(&self, input: &AuthorizeInput) -> AuthzResult<()> {
        self.inputs.lock().unwrap().push(input.clone());
        self.result.clone()
    }
}

/// Email sender fake recording every attempt.
pub struct FakeEmailSender {
    result: EmailResult<()>,
    sent: Mutex<Vec<Email>>,
}

impl FakeEmailSender {
    pub fn working() -> Arc<Self> {
        Self::with_result(Ok(()))
    }

    pub fn failing() -> Arc<Self> {
        Self::with_result(Err(EmailError::RequestFailed(
            "fake sender failure".to_string(),
        )))
    }

    pub fn with_result(result: EmailResult<()>) -> Arc<Self> {
        Arc::new(Self {
            result,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for FakeEmailSender {
    async fn send_email(&self, email: &Email) -> EmailResult<()> {
        self.sent.lock().unwrap().push(email.clone());
        self.result.clone()
    }
}

/// Generic storage failure returned by the fake.
pub fn fake_db_failure() -> DbError {
    DbError::Query("fake database failure".to_string())
}

pub fn actor() -> ActorId {
    ActorId::new(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001))
}

pub fn actor_arg() -> SqlArg {
    SqlArg::Uuid(actor().as_uuid())
}

pub fn manager(
    db: &Arc<FakeDatabase>,
    email_sender: Option<&Arc<FakeEmailSender>>,
    authorizer: &Arc<FakeAuthorizer>,
) -> OrganizationManager {
    OrganizationManager::new(
        db.clone(),
        email_sender.map(|sender| sender.clone() as Arc<dyn EmailSender>),
        authorizer.clone(),
    )
}
