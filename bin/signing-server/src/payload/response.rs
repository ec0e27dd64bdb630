use bon::Builder;
use loan_signing_domain::{signature::SignerType, workflow::SignPermission};
use serde::Serialize;

use crate::payload::{SignatureRecordPayload, WorkflowStatePayload};

#[derive(Debug, Builder, Serialize)]
pub struct InitializeWorkflowResponsePayload {
    signatures: Vec<SignatureRecordPayload>,
}

#[derive(Debug, Builder, Serialize)]
pub struct GetWorkflowStateResponsePayload {
    workflow: WorkflowStatePayload,
}

#[derive(Debug, Builder, Serialize)]
pub struct CheckPermissionResponsePayload {
    can_sign: bool,
    signer_type: Option<SignerType>,
    reason: String,
}

#[derive(Debug, Builder, Serialize)]
pub struct SignatureTransitionResponsePayload {
    signature: SignatureRecordPayload,
    workflow: WorkflowStatePayload,
}

impl From<SignPermission> for CheckPermissionResponsePayload {
    fn from(permission: SignPermission) -> Self {
        Self::builder()
            .can_sign(permission.can_sign())
            .maybe_signer_type(permission.signer_type())
            .reason(permission.reason().map(|reason| reason.to_string()).unwrap_or_default())
            .build()
    }
}
