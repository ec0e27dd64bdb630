use chrono::{DateTime, Utc};
use diesel::prelude::Queryable;
use dissolve_derive::Dissolve;
use uuid::Uuid;

use crate::persistence::record::{SignatureStatus, SignerType};

#[derive(Debug, Dissolve, Queryable)]
pub struct SignatureRow {
    id: Uuid,
    contract_id: Uuid,
    signer_type: SignerType,
    signer_id: Uuid,
    signer_name: String,
    signer_email: String,
    status: SignatureStatus,
    signature_image: Option<Vec<u8>>,
    signature_url: Option<String>,
    signed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
