use dissolve_derive::Dissolve;
use serde::Deserialize;
use serde_with::base64::Base64;
use uuid::Uuid;

#[derive(Debug, Dissolve, Deserialize)]
pub struct SignerPayload {
    id: Uuid,
    name: String,
    email: String,
}

#[derive(Debug, Dissolve, Deserialize)]
pub struct InitializeWorkflowRequestPayload {
    contract_id: Uuid,
    borrower: SignerPayload,
    guarantor: Option<SignerPayload>,
    witness: Option<SignerPayload>,
    lender: Option<SignerPayload>,
}

#[derive(Debug, Dissolve, Deserialize)]
pub struct GetWorkflowStateRequestPayload {
    contract_id: Uuid,
}

#[derive(Debug, Dissolve, Deserialize)]
pub struct CheckPermissionRequestPayload {
    contract_id: Uuid,
    user_id: Uuid,
}

/// Exactly one of `signature_image` and `signature_url` must be present.
#[serde_with::serde_as]
#[derive(Debug, Dissolve, Deserialize)]
pub struct RecordSignatureRequestPayload {
    contract_id: Uuid,
    user_id: Uuid,
    signer_type: String,

    #[serde_as(as = "Option<Base64>")]
    signature_image: Option<Vec<u8>>,

    signature_url: Option<String>,
}

#[derive(Debug, Dissolve, Deserialize)]
pub struct DeclineSignatureRequestPayload {
    contract_id: Uuid,
    user_id: Uuid,
    signer_type: String,
}
