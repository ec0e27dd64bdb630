mod error;

pub use self::error::StoreError;

use chrono::{DateTime, Utc};
use diesel::{ExpressionMethods, QueryDsl, dsl, result::OptionalExtension};
use diesel_async::RunQueryDsl;
use loan_signing_domain::signature::{
    SignatureStatus as DomainSignatureStatus, SignerType as DomainSignerType,
};
use uuid::Uuid;

use super::{
    pool::DbConn,
    record::{
        ContractStatus, SignatureStatus, SignerType, insert::NewSignatureRow, select::SignatureRow,
    },
    schema,
};

use self::error::Result;

/// The columns written when a pending signature leaves the pending state.
pub struct SignatureTransition<'a> {
    pub status: SignatureStatus,
    pub signature_image: Option<&'a [u8]>,
    pub signature_url: Option<&'a str>,
    pub signed_at: Option<DateTime<Utc>>,
    pub occurred_at: DateTime<Utc>,
}

pub async fn fetch_signatures_by_contract_id(
    conn: &mut DbConn,
    contract_id: Uuid,
) -> Result<Vec<SignatureRow>> {
    schema::signatures::table
        .filter(schema::signatures::contract_id.eq(contract_id))
        .order_by(schema::signatures::signer_type.asc())
        .select(schema::signatures::all_columns)
        .load(conn)
        .await
        .map_err(From::from)
}

pub async fn exists_signature_by_contract_id(conn: &mut DbConn, contract_id: Uuid) -> Result<bool> {
    diesel::select(dsl::exists(
        schema::signatures::table.filter(schema::signatures::contract_id.eq(contract_id)),
    ))
    .get_result(conn)
    .await
    .map_err(From::from)
}

pub async fn save_new_signatures(
    conn: &mut DbConn,
    new_signatures: Vec<NewSignatureRow<'_>>,
) -> Result<Vec<SignatureRow>> {
    diesel::insert_into(schema::signatures::table)
        .values(new_signatures)
        .returning(schema::signatures::all_columns)
        .get_results(conn)
        .await
        .map_err(From::from)
}

/// Moves the matching signature out of `pending`.
///
/// The update is guarded on the current status, so a record is only ever transitioned once:
/// a second attempt matches no row and returns `None`.
pub async fn update_pending_signature(
    conn: &mut DbConn,
    contract_id: Uuid,
    signer_id: Uuid,
    signer_type: DomainSignerType,
    transition: SignatureTransition<'_>,
) -> Result<Option<SignatureRow>> {
    let SignatureTransition { status, signature_image, signature_url, signed_at, occurred_at } =
        transition;

    diesel::update(
        schema::signatures::table
            .filter(schema::signatures::contract_id.eq(contract_id))
            .filter(schema::signatures::signer_id.eq(signer_id))
            .filter(schema::signatures::signer_type.eq(SignerType::from(signer_type)))
            .filter(
                schema::signatures::status
                    .eq(SignatureStatus::from(DomainSignatureStatus::Pending)),
            ),
    )
    .set((
        schema::signatures::status.eq(status),
        schema::signatures::signature_image.eq(signature_image),
        schema::signatures::signature_url.eq(signature_url),
        schema::signatures::signed_at.eq(signed_at),
        schema::signatures::updated_at.eq(occurred_at),
    ))
    .returning(schema::signatures::all_columns)
    .get_result(conn)
    .await
    .optional()
    .map_err(From::from)
}

pub async fn update_status_by_contract_id(
    conn: &mut DbConn,
    contract_id: Uuid,
    new_status: ContractStatus,
) -> Result<bool> {
    let affected =
        diesel::update(schema::contracts::table.filter(schema::contracts::id.eq(contract_id)))
            .set((
                schema::contracts::status.eq(new_status),
                schema::contracts::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
            .await?;

    match affected {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(StoreError::other("duplicate contract id")),
    }
}
