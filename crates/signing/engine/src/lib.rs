//! The signature workflow tracker of loan contracts.
//!
//! [`SigningEngine`] collects the signatures every required party must put on a contract,
//! in signing priority order, on top of any [`SigningRepository`]. The workflow state is
//! never stored: every operation recomputes it from the current signature records.

#![allow(missing_docs)]

mod error;
mod types;

pub use self::{
    error::SigningEngineError,
    types::{request, response},
};

use chrono::Utc;
use loan_signing_domain::{
    contract::ContractId,
    signature::SignatureOutcome,
    workflow::{ContractWorkflowState, SignPermission, WorkflowError},
};
use loan_signing_store::SigningRepository;

use self::types::{
    request::{
        CheckPermissionRequest, CheckPermissionRequestDissolved, DeclineSignatureRequest,
        DeclineSignatureRequestDissolved, GetWorkflowStateRequest,
        GetWorkflowStateRequestDissolved, InitializeWorkflowRequest,
        InitializeWorkflowRequestDissolved, RecordSignatureRequest,
        RecordSignatureRequestDissolved, UpdateContractStatusRequest,
        UpdateContractStatusRequestDissolved,
    },
    response::{InitializeWorkflowResponse, SignatureTransitionResponse},
};

pub struct SigningEngine<R> {
    store: R,
}

impl<R> SigningEngine<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }

    /// Returns the underlying repository.
    pub fn store(&self) -> &R {
        &self.store
    }
}

impl<R> SigningEngine<R>
where
    R: SigningRepository,
{
    /// Creates one pending signature record per required party.
    ///
    /// Fails with [`SigningEngineError::Conflict`] if the contract already has records.
    #[tracing::instrument(skip_all)]
    pub async fn initialize_workflow(
        &self,
        request: InitializeWorkflowRequest,
    ) -> Result<InitializeWorkflowResponse, SigningEngineError> {
        let InitializeWorkflowRequestDissolved { contract_id, roster } = request.dissolve();

        let signatures =
            self.store.create_signatures(contract_id, roster.into_requirements()).await?;

        tracing::info!(%contract_id, required = signatures.len(), "signature workflow initialized");

        Ok(InitializeWorkflowResponse::builder().signatures(signatures).build())
    }

    #[tracing::instrument(skip_all)]
    pub async fn check_permission(
        &self,
        request: CheckPermissionRequest,
    ) -> Result<SignPermission, SigningEngineError> {
        let CheckPermissionRequestDissolved { contract_id, user_id } = request.dissolve();

        let permission = self.load_state(contract_id).await?.check_permission(user_id);

        tracing::debug!(%contract_id, %user_id, ?permission, "permission checked");

        Ok(permission)
    }

    /// Records the signature of a user in the given role.
    ///
    /// # Errors
    ///
    /// - [`SigningEngineError::Conflict`] if the user holds no pending record in that role,
    ///   including when a concurrent request signed it first
    /// - [`SigningEngineError::NotAuthorized`] if a higher priority party has not signed yet
    ///   or the workflow was declined
    #[tracing::instrument(skip_all)]
    pub async fn record_signature(
        &self,
        request: RecordSignatureRequest,
    ) -> Result<SignatureTransitionResponse, SigningEngineError> {
        let RecordSignatureRequestDissolved {
            contract_id,
            user_id,
            signer_type,
            signature_data,
        } = request.dissolve();

        self.load_state(contract_id).await?.authorize_signature(user_id, signer_type)?;

        let outcome = SignatureOutcome::Signed { signature_data, signed_at: Utc::now() };

        let signature = self
            .store
            .complete_pending_signature(contract_id, user_id, signer_type, outcome)
            .await?
            .ok_or_else(|| SigningEngineError::from(WorkflowError::NoPendingSignature))?;

        let state = self.load_state(contract_id).await?;

        tracing::info!(
            %contract_id,
            %signer_type,
            completion = state.completion_percentage(),
            "signature recorded",
        );

        if state.is_complete() {
            tracing::info!(%contract_id, "all required signatures collected");
        }

        Ok(SignatureTransitionResponse::builder().signature(signature).state(state).build())
    }

    /// Records that a user refuses to sign, which voids the workflow.
    ///
    /// Declining does not wait for higher priority parties.
    #[tracing::instrument(skip_all)]
    pub async fn decline_signature(
        &self,
        request: DeclineSignatureRequest,
    ) -> Result<SignatureTransitionResponse, SigningEngineError> {
        let DeclineSignatureRequestDissolved { contract_id, user_id, signer_type } =
            request.dissolve();

        self.load_state(contract_id).await?.authorize_decline(user_id, signer_type)?;

        let outcome = SignatureOutcome::Declined { declined_at: Utc::now() };

        let signature = self
            .store
            .complete_pending_signature(contract_id, user_id, signer_type, outcome)
            .await?
            .ok_or_else(|| SigningEngineError::from(WorkflowError::NoPendingSignature))?;

        let state = self.load_state(contract_id).await?;

        tracing::info!(%contract_id, %signer_type, "signature declined, workflow void");

        Ok(SignatureTransitionResponse::builder().signature(signature).state(state).build())
    }

    #[tracing::instrument(skip_all)]
    pub async fn get_workflow_state(
        &self,
        request: GetWorkflowStateRequest,
    ) -> Result<ContractWorkflowState, SigningEngineError> {
        let GetWorkflowStateRequestDissolved { contract_id } = request.dissolve();

        self.load_state(contract_id).await
    }

    /// Updates the caller-owned contract status.
    ///
    /// Fails with [`SigningEngineError::NotFound`] if the contract does not exist.
    #[tracing::instrument(skip_all)]
    pub async fn update_contract_status(
        &self,
        request: UpdateContractStatusRequest,
    ) -> Result<(), SigningEngineError> {
        let UpdateContractStatusRequestDissolved { contract_id, status } = request.dissolve();

        self.store
            .update_contract_status(contract_id, status)
            .await?
            .then(|| tracing::info!(%contract_id, %status, "contract status updated"))
            .ok_or(SigningEngineError::not_found("contract not found"))
    }

    async fn load_state(
        &self,
        contract_id: ContractId,
    ) -> Result<ContractWorkflowState, SigningEngineError> {
        self.store
            .get_signatures_by_contract_id(contract_id)
            .await
            .map(|signatures| ContractWorkflowState::from_records(contract_id, signatures))
            .map_err(From::from)
    }
}
