//! Response types for signing engine operations.

use dissolve_derive::Dissolve;
use loan_signing_domain::{signature::SignatureRecord, workflow::ContractWorkflowState};

/// Response from initializing a signature workflow.
#[derive(Debug, Dissolve)]
pub struct InitializeWorkflowResponse {
    /// The created pending records, in signing priority order
    signatures: Vec<SignatureRecord>,
}

/// Response from recording or declining a signature.
#[derive(Debug, Dissolve)]
pub struct SignatureTransitionResponse {
    /// The record after the transition
    signature: SignatureRecord,

    /// The workflow state recomputed after the transition
    state: ContractWorkflowState,
}

#[bon::bon]
impl InitializeWorkflowResponse {
    #[builder]
    pub(crate) fn new(signatures: Vec<SignatureRecord>) -> Self {
        Self { signatures }
    }
}

#[bon::bon]
impl SignatureTransitionResponse {
    #[builder]
    pub(crate) fn new(signature: SignatureRecord, state: ContractWorkflowState) -> Self {
        Self { signature, state }
    }
}
