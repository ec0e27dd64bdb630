pub mod request;
pub mod response;

use bon::Builder;
use chrono::{DateTime, Utc};
use loan_signing_domain::{
    signature::{SignatureData, SignatureRecord, SignatureRecordDissolved, SignatureStatus, SignerType},
    workflow::{ContractWorkflowState, WorkflowStatus},
};
use serde::Serialize;
use serde_with::base64::Base64;
use url::Url;
use uuid::Uuid;

#[serde_with::serde_as]
#[derive(Debug, Builder, Serialize)]
pub struct SignatureRecordPayload {
    id: Uuid,
    contract_id: Uuid,
    signer_type: SignerType,
    signer_id: Uuid,
    signer_name: String,
    signer_email: String,
    status: SignatureStatus,

    #[serde_as(as = "Option<Base64>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    signature_image: Option<Vec<u8>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    signature_url: Option<Url>,

    #[serde(skip_serializing_if = "Option::is_none")]
    signed_at: Option<DateTime<Utc>>,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Builder, Serialize)]
pub struct WorkflowStatePayload {
    contract_id: Uuid,
    status: WorkflowStatus,
    completion_percentage: u8,
    is_complete: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    next_signer_type: Option<SignerType>,

    signatures: Vec<SignatureRecordPayload>,
}

impl From<SignatureRecord> for SignatureRecordPayload {
    fn from(record: SignatureRecord) -> Self {
        let SignatureRecordDissolved {
            id,
            contract_id,
            signer_type,
            signer_id,
            signer_name,
            signer_email,
            status,
            signature_data,
            signed_at,
            aux,
        } = record.dissolve();

        let (signature_image, signature_url) = match signature_data {
            Some(SignatureData::Inline(bz)) => (Some(bz), None),
            Some(SignatureData::Stored(url)) => (None, Some(url)),
            None => (None, None),
        };

        Self::builder()
            .id(id.into())
            .contract_id(contract_id.into())
            .signer_type(signer_type)
            .signer_id(signer_id.into())
            .signer_name(signer_name)
            .signer_email(signer_email)
            .status(status)
            .maybe_signature_image(signature_image)
            .maybe_signature_url(signature_url)
            .maybe_signed_at(signed_at)
            .created_at(aux.created_at())
            .updated_at(aux.updated_at())
            .build()
    }
}

impl From<ContractWorkflowState> for WorkflowStatePayload {
    fn from(state: ContractWorkflowState) -> Self {
        let next_signer_type = state.next_required_signature().map(|s| s.signer_type());

        Self::builder()
            .contract_id(state.contract_id().into())
            .status(state.status())
            .completion_percentage(state.completion_percentage())
            .is_complete(state.is_complete())
            .maybe_next_signer_type(next_signer_type)
            .signatures(state.into_signatures().into_iter().map(From::from).collect())
            .build()
    }
}
