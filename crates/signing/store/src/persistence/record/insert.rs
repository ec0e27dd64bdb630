use bon::Builder;
use diesel::prelude::Insertable;
use uuid::Uuid;

use crate::persistence::{
    record::{SignatureStatus, SignerType},
    schema,
};

#[derive(Debug, Builder, Insertable)]
#[diesel(table_name = schema::signatures)]
pub struct NewSignatureRow<'a> {
    contract_id: Uuid,
    signer_type: SignerType,
    signer_id: Uuid,
    signer_name: &'a str,
    signer_email: &'a str,
    status: SignatureStatus,
}
