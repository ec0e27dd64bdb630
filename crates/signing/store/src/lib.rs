//! Persistence layer for the loan contract signing workflow.
//!
//! This crate defines the [`SigningRepository`] trait, the persistence collaborator the
//! signing engine talks to, and its PostgreSQL implementation [`SigningStore`].
//!
//! # Architecture
//!
//! The store is built on top of [diesel](diesel.rs) with async PostgreSQL support, providing:
//! - Connection pooling via [deadpool](docs.rs/deadpool) for efficient resource management
//! - Transaction support for multi-row initialization
//! - Conditional updates so a signature leaves `pending` at most once
//!
//! # Usage
//!
//! ```ignore
//! // Establish a connection pool
//! let pool = establish_pool(database_url, max_connections, DbTls::NativeRoots).await?;
//!
//! // Create the store
//! let store = SigningStore::new(pool);
//!
//! // Store operations
//! let signatures = store.get_signatures_by_contract_id(contract_id).await?;
//! ```

mod error;
mod persistence;
mod repository;

pub use self::{
    error::{Result, SigningStoreError},
    persistence::pool::{DbConn, DbPool, DbTls, PoolError, establish_pool},
    repository::SigningRepository,
};

use async_trait::async_trait;
use diesel_async::AsyncConnection;
use loan_signing_domain::{
    Timestamps,
    contract::{ContractId, ContractStatus},
    signature::{
        SignatureData, SignatureOutcome, SignatureRecord, SignatureRequirement,
        SignatureRequirementDissolved, SignatureStatus, SignerIdentityDissolved, SignerType,
        UserId,
    },
};
use url::Url;

use self::persistence::{
    record::{
        SignatureStatus as SignatureStatusRecord,
        insert::NewSignatureRow,
        select::{SignatureRow, SignatureRowDissolved},
    },
    store::{self, SignatureTransition, StoreError},
};

/// The PostgreSQL implementation of [`SigningRepository`].
pub struct SigningStore {
    pool: DbPool,
}

impl SigningStore {
    /// Creates a new `SigningStore` instance with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        SigningStore { pool }
    }

    async fn get_conn(&self) -> Result<DbConn> {
        self.pool.get().await.map_err(|_| SigningStoreError::Pool)
    }
}

#[async_trait]
impl SigningRepository for SigningStore {
    /// Creates the pending signature records of a contract in a single database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Records already exist for the contract, or a concurrent initialization inserted them
    ///   first
    /// - The database transaction fails
    #[tracing::instrument(skip_all, fields(%contract_id, required = requirements.len()))]
    async fn create_signatures(
        &self,
        contract_id: ContractId,
        requirements: Vec<SignatureRequirement>,
    ) -> Result<Vec<SignatureRecord>> {
        let signers = requirements
            .into_iter()
            .map(|requirement| {
                let SignatureRequirementDissolved { signer_type, signer } = requirement.dissolve();
                let SignerIdentityDissolved { id, name, email } = signer.dissolve();
                (signer_type, id, name, email)
            })
            .collect::<Vec<_>>();

        let rows = self
            .get_conn()
            .await?
            .transaction(|conn| {
                Box::pin(async move {
                    if store::exists_signature_by_contract_id(conn, contract_id.into()).await? {
                        return Ok(None);
                    }

                    let new_signatures = signers
                        .iter()
                        .map(|(signer_type, signer_id, name, email)| {
                            NewSignatureRow::builder()
                                .contract_id(contract_id.into())
                                .signer_type((*signer_type).into())
                                .signer_id(signer_id.into())
                                .signer_name(name)
                                .signer_email(email)
                                .status(SignatureStatus::Pending.into())
                                .build()
                        })
                        .collect();

                    store::save_new_signatures(conn, new_signatures).await.map(Some)
                })
            })
            .await
            .map_err(|err: StoreError| SigningStoreError::from(err))?
            .ok_or(SigningStoreError::Conflict("signature workflow already initialized".into()))?;

        let mut signatures =
            rows.into_iter().map(make_signature_record).collect::<Result<Vec<_>>>()?;
        signatures.sort_by_key(|s| s.signer_type());

        Ok(signatures)
    }

    #[tracing::instrument(skip_all, fields(%contract_id))]
    async fn get_signatures_by_contract_id(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<SignatureRecord>> {
        store::fetch_signatures_by_contract_id(&mut self.get_conn().await?, contract_id.into())
            .await?
            .into_iter()
            .map(make_signature_record)
            .collect()
    }

    /// Moves a pending signature into `signed` or `declined` with one conditional update.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` with the updated record
    /// - `Ok(None)` if no pending record matches; it was already signed or declined, or never
    ///   existed
    #[tracing::instrument(
        skip_all,
        fields(%contract_id, %signer_id, %signer_type, outcome = %outcome.status()),
    )]
    async fn complete_pending_signature(
        &self,
        contract_id: ContractId,
        signer_id: UserId,
        signer_type: SignerType,
        outcome: SignatureOutcome,
    ) -> Result<Option<SignatureRecord>> {
        let status = SignatureStatusRecord::from(outcome.status());
        let occurred_at = outcome.occurred_at();

        let transition = match &outcome {
            SignatureOutcome::Signed { signature_data: SignatureData::Inline(bz), signed_at } => {
                SignatureTransition {
                    status,
                    signature_image: Some(bz.as_slice()),
                    signature_url: None,
                    signed_at: Some(*signed_at),
                    occurred_at,
                }
            },
            SignatureOutcome::Signed { signature_data: SignatureData::Stored(url), signed_at } => {
                SignatureTransition {
                    status,
                    signature_image: None,
                    signature_url: Some(url.as_str()),
                    signed_at: Some(*signed_at),
                    occurred_at,
                }
            },
            SignatureOutcome::Declined { .. } => SignatureTransition {
                status,
                signature_image: None,
                signature_url: None,
                signed_at: None,
                occurred_at,
            },
        };

        store::update_pending_signature(
            &mut self.get_conn().await?,
            contract_id.into(),
            signer_id.into(),
            signer_type,
            transition,
        )
        .await?
        .map(make_signature_record)
        .transpose()
    }

    #[tracing::instrument(skip_all, fields(%contract_id, %status))]
    async fn update_contract_status(
        &self,
        contract_id: ContractId,
        status: ContractStatus,
    ) -> Result<bool> {
        store::update_status_by_contract_id(
            &mut self.get_conn().await?,
            contract_id.into(),
            status.into(),
        )
        .await
        .map_err(From::from)
    }
}

fn make_signature_record(signature_row: SignatureRow) -> Result<SignatureRecord> {
    let SignatureRowDissolved {
        id,
        contract_id,
        signer_type,
        signer_id,
        signer_name,
        signer_email,
        status,
        signature_image,
        signature_url,
        signed_at,
        created_at,
        updated_at,
    } = signature_row.dissolve();

    let signature_data = match (signature_image, signature_url) {
        (Some(bz), None) => Some(SignatureData::Inline(bz)),
        (None, Some(url)) => Url::parse(&url)
            .map(SignatureData::Stored)
            .map(Some)
            .map_err(|e| SigningStoreError::invalid_value(e.to_string()))?,
        (None, None) => None,
        (Some(_), Some(_)) => {
            return Err(SigningStoreError::invalid_value("both signature image and url stored"));
        },
    };

    let timestamps = Timestamps::builder().created_at(created_at).updated_at(updated_at).build();

    let record = SignatureRecord::builder()
        .id(id.into())
        .contract_id(contract_id.into())
        .signer_type(signer_type.into_inner())
        .signer_id(signer_id.into())
        .signer_name(signer_name)
        .signer_email(signer_email)
        .status(status.into_inner())
        .maybe_signature_data(signature_data)
        .maybe_signed_at(signed_at)
        .aux(timestamps)
        .build();

    Ok(record)
}
