//! Error taxonomy shared by the repository, the aggregator and the ranking engine.

use crate::keyspace::EntityKind;
use crate::store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An operation tried to reach outside its event namespace, or the
    /// supplied identifiers cannot form a scoped key.
    #[error("scope violation: {0}")]
    ScopeViolation(String),

    /// The entity does not exist or has expired.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Scoring was attempted without a transcript or any usable analysis.
    #[error("incomplete scoring input: {0}")]
    IncompleteInput(String),

    /// A request value that can never be stored or scored, such as
    /// non-finite scoring weights.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A lifecycle change that the entity's state machine forbids.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// The key-value store could not be reached or timed out.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A stored payload did not match the shape of its entity kind.
    #[error("malformed {kind} record at {key}: {reason}")]
    MalformedRecord {
        kind: EntityKind,
        key: String,
        reason: String,
    },
}

impl Error {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Short machine readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ScopeViolation(_) => "scope_violation",
            Error::NotFound { .. } => "not_found",
            Error::IncompleteInput(_) => "incomplete_input",
            Error::InvalidInput(_) => "invalid_input",
            Error::InvalidTransition(_) => "invalid_transition",
            Error::StoreUnavailable(_) => "store_unavailable",
            Error::MalformedRecord { .. } => "malformed_record",
        }
    }
}

impl From<StoreError> for Error {
    fn from(value: StoreError) -> Self {
        Error::StoreUnavailable(value.to_string())
    }
}
