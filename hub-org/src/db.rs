//! Storage interface
//!
//! The organization manager talks to the relational store through two calls:
//! `exec` for mutations and `query_row` for single-value reads. Both run
//! stored procedures or plain queries whose SQL the manager owns; row shapes
//! and transactional guarantees are the store's business.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// SQLSTATE the store raises when its own access control rejects a call.
pub const SQLSTATE_INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Storage error types.
///
/// Only [`DbError::InsufficientPrivilege`] carries meaning for the manager;
/// every other variant is relayed to the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    /// The store's own access control rejected the call
    #[error("insufficient privilege")]
    InsufficientPrivilege,

    /// The query failed
    #[error("database query failed: {0}")]
    Query(String),

    /// The store could not be reached
    #[error("database connection error: {0}")]
    Connection(String),

    /// A row was returned in a shape the caller did not expect
    #[error("unexpected value: expected {expected}, found {found}")]
    UnexpectedValue {
        /// Expected value kind
        expected: &'static str,
        /// Value kind actually returned
        found: &'static str,
    },
}

impl DbError {
    /// Build an error from a backend SQLSTATE code and message.
    ///
    /// # Examples
    ///
    /// ```
    /// use hub_org::db::DbError;
    ///
    /// assert_eq!(DbError::from_sqlstate("42501", "denied"), DbError::InsufficientPrivilege);
    /// assert_eq!(
    ///     DbError::from_sqlstate("23505", "duplicate key"),
    ///     DbError::Query("duplicate key".to_string())
    /// );
    /// ```
    pub fn from_sqlstate(code: &str, message: impl Into<String>) -> Self {
        match code {
            SQLSTATE_INSUFFICIENT_PRIVILEGE => DbError::InsufficientPrivilege,
            _ => DbError::Query(message.into()),
        }
    }
}

/// Result type for storage calls.
pub type DbResult<T> = Result<T, DbError>;

/// A bound query argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SqlArg {
    /// `uuid` parameter
    Uuid(Uuid),
    /// `text` parameter
    Text(String),
    /// `jsonb` parameter
    Json(serde_json::Value),
}

impl From<Uuid> for SqlArg {
    fn from(value: Uuid) -> Self {
        SqlArg::Uuid(value)
    }
}

impl From<&str> for SqlArg {
    fn from(value: &str) -> Self {
        SqlArg::Text(value.to_string())
    }
}

impl From<serde_json::Value> for SqlArg {
    fn from(value: serde_json::Value) -> Self {
        SqlArg::Json(value)
    }
}

/// A single value read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// SQL `NULL`
    Null,
    /// `boolean` column
    Bool(bool),
    /// `text` column
    Text(String),
    /// `json` column, as the raw bytes the store produced
    Json(Vec<u8>),
}

impl SqlValue {
    fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Text(_) => "text",
            SqlValue::Json(_) => "json",
        }
    }

    /// Read a boolean value.
    pub fn into_bool(self) -> DbResult<bool> {
        match self {
            SqlValue::Bool(value) => Ok(value),
            other => Err(DbError::UnexpectedValue {
                expected: "bool",
                found: other.kind(),
            }),
        }
    }

    /// Read a text value.
    pub fn into_text(self) -> DbResult<String> {
        match self {
            SqlValue::Text(value) => Ok(value),
            other => Err(DbError::UnexpectedValue {
                expected: "text",
                found: other.kind(),
            }),
        }
    }

    /// Read a JSON document without parsing it.
    pub fn into_raw_json(self) -> DbResult<RawJson> {
        match self {
            SqlValue::Json(bytes) => Ok(RawJson(bytes)),
            other => Err(DbError::UnexpectedValue {
                expected: "json",
                found: other.kind(),
            }),
        }
    }
}

/// A JSON document composed by the store and passed through untouched.
///
/// The manager never parses these bytes: the store is the single source of
/// truth for the response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawJson(Vec<u8>);

impl RawJson {
    /// Borrow the document bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take the document bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for RawJson {
    fn from(bytes: Vec<u8>) -> Self {
        RawJson(bytes)
    }
}

impl AsRef<[u8]> for RawJson {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Relational store used by the organization manager.
///
/// Implementations must return promptly when their future is dropped.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run a statement that returns no value.
    async fn exec(&self, query: &str, args: &[SqlArg]) -> DbResult<()>;

    /// Run a query that returns exactly one value.
    async fn query_row(&self, query: &str, args: &[SqlArg]) -> DbResult<SqlValue>;
}
