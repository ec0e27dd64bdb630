use std::borrow::Cow;

use loan_signing_domain::workflow::{DenialReason, WorkflowError};
use loan_signing_store::SigningStoreError;

/// Errors returned by [`SigningEngine`](crate::SigningEngine) operations.
#[derive(Debug, thiserror::Error)]
pub enum SigningEngineError {
    /// The user may not act on the contract right now.
    #[error("not authorized: {0}")]
    NotAuthorized(DenialReason),

    /// The operation conflicts with the stored workflow, e.g. a second initialization or a
    /// signature that was already recorded.
    #[error("conflict: {0}")]
    Conflict(Cow<'static, str>),

    /// The referenced contract does not exist.
    #[error("not found: {0}")]
    NotFound(Cow<'static, str>),

    /// The persistence layer failed. The operation is not retried.
    #[error("persistence error: {0}")]
    Persistence(SigningStoreError),
}

impl SigningEngineError {
    pub(crate) fn conflict<E>(err: E) -> Self
    where
        Cow<'static, str>: From<E>,
    {
        Self::Conflict(err.into())
    }

    pub(crate) fn not_found<E>(err: E) -> Self
    where
        Cow<'static, str>: From<E>,
    {
        Self::NotFound(err.into())
    }
}

impl From<SigningStoreError> for SigningEngineError {
    fn from(err: SigningStoreError) -> Self {
        match err {
            SigningStoreError::Conflict(msg) => Self::Conflict(msg),
            err => Self::Persistence(err),
        }
    }
}

impl From<WorkflowError> for SigningEngineError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::NoPendingSignature => Self::conflict(err.to_string()),
            WorkflowError::NotAuthorized(reason) => Self::NotAuthorized(reason),
        }
    }
}
