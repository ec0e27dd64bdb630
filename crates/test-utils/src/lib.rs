//! Test utilities for the loan signing components.
//!
//! This crate provides an in-memory [`SigningRepository`] and identity fixtures for
//! integration tests across this workspace, so the engine and the HTTP server can be
//! exercised without a PostgreSQL instance.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use loan_signing_domain::{
    Timestamps,
    contract::{ContractId, ContractStatus},
    signature::{
        SignatureData, SignatureOutcome, SignatureRecord, SignatureRequirement, SignatureStatus,
        SignerIdentity, SignerType, UserId,
    },
};
use loan_signing_store::{Result, SigningRepository, SigningStoreError};
use uuid::Uuid;

/// An in-memory [`SigningRepository`].
///
/// A single mutex guards every table, which makes each call atomic the way a conditional
/// update is in PostgreSQL.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

#[derive(Default)]
struct Tables {
    contracts: HashMap<ContractId, ContractStatus>,
    signatures: HashMap<ContractId, Vec<SignatureRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a contract row in `pending_signature` status.
    pub fn insert_contract(&self, contract_id: ContractId) {
        self.tables.lock().unwrap().contracts.insert(contract_id, ContractStatus::PendingSignature);
    }

    /// Returns the status of a contract row, if it exists.
    pub fn contract_status(&self, contract_id: ContractId) -> Option<ContractStatus> {
        self.tables.lock().unwrap().contracts.get(&contract_id).copied()
    }

    /// Makes every following call fail with [`SigningStoreError::Pool`] while `unavailable`
    /// is `true`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        match self.unavailable.load(Ordering::SeqCst) {
            true => Err(SigningStoreError::Pool),
            false => Ok(()),
        }
    }
}

#[async_trait]
impl SigningRepository for MemoryStore {
    async fn create_signatures(
        &self,
        contract_id: ContractId,
        requirements: Vec<SignatureRequirement>,
    ) -> Result<Vec<SignatureRecord>> {
        self.check_available()?;

        let mut tables = self.tables.lock().unwrap();

        if tables.signatures.get(&contract_id).is_some_and(|records| !records.is_empty()) {
            return Err(SigningStoreError::Conflict("signature workflow already initialized".into()));
        }

        let now = Utc::now();

        let mut records = requirements
            .into_iter()
            .map(|requirement| {
                SignatureRecord::builder()
                    .id(Uuid::new_v4().into())
                    .contract_id(contract_id)
                    .signer_type(requirement.signer_type())
                    .signer_id(requirement.signer().id())
                    .signer_name(requirement.signer().name())
                    .signer_email(requirement.signer().email())
                    .status(SignatureStatus::Pending)
                    .aux(Timestamps::unmodified_since(now))
                    .build()
            })
            .collect::<Vec<_>>();

        records.sort_by_key(|record| record.signer_type());

        tables.signatures.insert(contract_id, records.clone());

        Ok(records)
    }

    async fn get_signatures_by_contract_id(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<SignatureRecord>> {
        self.check_available()?;

        let tables = self.tables.lock().unwrap();

        Ok(tables.signatures.get(&contract_id).cloned().unwrap_or_default())
    }

    async fn complete_pending_signature(
        &self,
        contract_id: ContractId,
        signer_id: UserId,
        signer_type: SignerType,
        outcome: SignatureOutcome,
    ) -> Result<Option<SignatureRecord>> {
        self.check_available()?;

        let mut tables = self.tables.lock().unwrap();

        let Some(record) = tables.signatures.get_mut(&contract_id).and_then(|records| {
            records.iter_mut().find(|record| {
                record.signer_id() == signer_id
                    && record.signer_type() == signer_type
                    && record.is_pending()
            })
        }) else {
            return Ok(None);
        };

        let (signature_data, signed_at): (Option<SignatureData>, _) = match &outcome {
            SignatureOutcome::Signed { signature_data, signed_at } => {
                (Some(signature_data.clone()), Some(*signed_at))
            },
            SignatureOutcome::Declined { .. } => (None, None),
        };

        let updated = SignatureRecord::builder()
            .id(record.id())
            .contract_id(contract_id)
            .signer_type(signer_type)
            .signer_id(signer_id)
            .signer_name(record.signer_name())
            .signer_email(record.signer_email())
            .status(outcome.status())
            .maybe_signature_data(signature_data)
            .maybe_signed_at(signed_at)
            .aux(
                Timestamps::builder()
                    .created_at(record.aux().created_at())
                    .updated_at(outcome.occurred_at())
                    .build(),
            )
            .build();

        *record = updated.clone();

        Ok(Some(updated))
    }

    async fn update_contract_status(
        &self,
        contract_id: ContractId,
        status: ContractStatus,
    ) -> Result<bool> {
        self.check_available()?;

        let mut tables = self.tables.lock().unwrap();

        Ok(tables.contracts.get_mut(&contract_id).map(|current| *current = status).is_some())
    }
}

/// Returns a fresh random contract id.
pub fn contract_id() -> ContractId {
    Uuid::new_v4().into()
}

/// Returns a fresh random user id.
pub fn user_id() -> UserId {
    Uuid::new_v4().into()
}

/// Returns a signer with a fresh id, the given display name and an email derived from it.
pub fn signer(name: &str) -> SignerIdentity {
    let local = name.split_whitespace().collect::<Vec<_>>().join(".").to_lowercase();

    SignerIdentity::builder()
        .id(user_id())
        .name(name)
        .email(format!("{local}@example.com"))
        .build()
}

/// Returns an inline signature image.
pub fn signature_image() -> SignatureData {
    SignatureData::Inline(b"\x89PNG\r\n\x1a\nsignature".to_vec())
}
