//! Request types for signing engine operations.

mod error;

pub use self::error::{RecordSignatureRequestError, RequestError};

use bon::Builder;
use dissolve_derive::Dissolve;
use loan_signing_domain::{
    contract::{ContractId, ContractStatus},
    signature::{RosterError, SignatureData, SignerIdentity, SignerRoster, SignerType, UserId},
};

/// Request to create the pending signature records of a contract.
///
/// # Validation
///
/// The request validates that:
/// - Every signer has a non-blank name and a well-formed email
/// - No user is listed for more than one role
#[derive(Debug, Dissolve)]
pub struct InitializeWorkflowRequest {
    /// The contract to collect signatures for
    contract_id: ContractId,

    /// The parties required to sign
    roster: SignerRoster,
}

/// Request to check whether a user may sign a contract now.
#[derive(Debug, Builder, Dissolve)]
pub struct CheckPermissionRequest {
    /// The contract to check
    contract_id: ContractId,

    /// The user asking to sign
    user_id: UserId,
}

/// Request to record a user's signature.
#[derive(Debug, Dissolve)]
pub struct RecordSignatureRequest {
    /// The contract being signed
    contract_id: ContractId,

    /// The user signing
    user_id: UserId,

    /// The role the user signs in
    signer_type: SignerType,

    /// The captured signature
    signature_data: SignatureData,
}

/// Request to record that a user refuses to sign.
#[derive(Debug, Builder, Dissolve)]
pub struct DeclineSignatureRequest {
    /// The contract being declined
    contract_id: ContractId,

    /// The user declining
    user_id: UserId,

    /// The role the user declines in
    signer_type: SignerType,
}

/// Request to read the workflow state of a contract.
#[derive(Debug, Builder, Dissolve)]
pub struct GetWorkflowStateRequest {
    /// The contract to look up
    contract_id: ContractId,
}

/// Request to update the caller-owned status of a contract.
#[derive(Debug, Builder, Dissolve)]
pub struct UpdateContractStatusRequest {
    /// The contract to update
    contract_id: ContractId,

    /// The new contract status
    status: ContractStatus,
}

#[bon::bon]
impl InitializeWorkflowRequest {
    /// Creates a new workflow initialization request with validation.
    ///
    /// # Parameters
    ///
    /// * `contract_id` - The contract to collect signatures for
    /// * `borrower` - The borrower, always required
    /// * `guarantor`, `witness`, `lender` - The optional parties
    ///
    /// Returns an error if validation fails.
    #[builder]
    pub fn new(
        contract_id: ContractId,
        borrower: SignerIdentity,
        guarantor: Option<SignerIdentity>,
        witness: Option<SignerIdentity>,
        lender: Option<SignerIdentity>,
    ) -> Result<Self, RosterError> {
        let roster = SignerRoster::builder()
            .borrower(borrower)
            .maybe_guarantor(guarantor)
            .maybe_witness(witness)
            .maybe_lender(lender)
            .build()?;

        Ok(Self { contract_id, roster })
    }
}

#[bon::bon]
impl RecordSignatureRequest {
    /// Creates a new record signature request.
    ///
    /// Returns an error if an inline signature image is empty.
    #[builder]
    pub fn new(
        contract_id: ContractId,
        user_id: UserId,
        signer_type: SignerType,
        signature_data: SignatureData,
    ) -> Result<Self, RecordSignatureRequestError> {
        if matches!(&signature_data, SignatureData::Inline(bz) if bz.is_empty()) {
            return Err(RecordSignatureRequestError::EmptySignature);
        }

        Ok(Self { contract_id, user_id, signer_type, signature_data })
    }
}
