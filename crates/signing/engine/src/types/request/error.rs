use loan_signing_domain::signature::RosterError;

/// Top-level error for request validation.
///
/// This enum wraps all possible request validation errors.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Error creating a workflow initialization request.
    #[error("initialize workflow error: {0}")]
    InitializeWorkflow(#[from] RosterError),

    /// Error creating a record signature request.
    #[error("record signature error: {0}")]
    RecordSignature(#[from] RecordSignatureRequestError),
}

/// Errors that can occur when validating a record signature request.
#[derive(Debug, thiserror::Error)]
pub enum RecordSignatureRequestError {
    /// The inline signature image holds no bytes
    #[error("empty signature image error")]
    EmptySignature,
}
