//! The persistence collaborator of the signature workflow.

use async_trait::async_trait;
use loan_signing_domain::{
    contract::{ContractId, ContractStatus},
    signature::{SignatureOutcome, SignatureRecord, SignatureRequirement, SignerType, UserId},
};

use crate::error::Result;

/// Row storage for signature records and contract status.
///
/// Every method is a single request against the backing store. Implementations must make
/// [`complete_pending_signature`](Self::complete_pending_signature) atomic with respect to the
/// record's status, so that a record leaves `pending` at most once.
#[async_trait]
pub trait SigningRepository: Send + Sync {
    /// Creates one pending signature record per requirement.
    ///
    /// # Errors
    ///
    /// Returns [`SigningStoreError::Conflict`](crate::SigningStoreError::Conflict) if records
    /// already exist for the contract.
    async fn create_signatures(
        &self,
        contract_id: ContractId,
        requirements: Vec<SignatureRequirement>,
    ) -> Result<Vec<SignatureRecord>>;

    /// Returns every signature record of a contract, in signing priority order.
    async fn get_signatures_by_contract_id(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<SignatureRecord>>;

    /// Applies `outcome` to the pending record of `signer_id` in the `signer_type` role.
    ///
    /// Returns `None` if no such pending record exists.
    async fn complete_pending_signature(
        &self,
        contract_id: ContractId,
        signer_id: UserId,
        signer_type: SignerType,
        outcome: SignatureOutcome,
    ) -> Result<Option<SignatureRecord>>;

    /// Updates the status of a contract row.
    ///
    /// Returns `false` if the contract does not exist.
    async fn update_contract_status(
        &self,
        contract_id: ContractId,
        status: ContractStatus,
    ) -> Result<bool>;
}
