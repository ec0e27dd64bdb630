//! Derived workflow state of a contract and the signing permission rules.
//!
//! The state is never persisted: it is recomputed from the current set of
//! [`SignatureRecord`]s every time it is needed.

use core::fmt;

use alloc::vec::Vec;

use strum::{Display, EnumString, IntoStaticStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Timestamps,
    contract::ContractId,
    signature::{SignatureRecord, SignatureStatus, SignerType, UserId},
};

/// The contract-level status derived from its signature records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum WorkflowStatus {
    /// No signature records exist for the contract.
    NotInitialized,
    /// At least one signature is still pending and none was declined.
    InProgress,
    /// Every required party has signed.
    Complete,
    /// A required party declined; the workflow is void.
    Declined,
}

/// Why a user may not sign a contract right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum DenialReason {
    /// The contract has no signature records.
    NotInitialized,
    /// A party declined and the workflow is void.
    WorkflowDeclined,
    /// Every required party has already signed.
    AlreadyComplete,
    /// The user has already signed their role.
    AlreadySigned,
    /// The user has already declined their role.
    AlreadyDeclined,
    /// The user holds no role on the contract.
    NotASigner,
    /// A higher priority party must sign first.
    AwaitingSignature(SignerType),
}

/// The outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum SignPermission {
    /// The user may sign now, in the given role.
    Granted(SignerType),
    /// The user may not sign now.
    Denied(DenialReason),
}

/// Errors raised when a signature or decline is not allowed by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// No pending record matches the user and role: already signed, wrong role, or the
    /// workflow was never initialized.
    #[error("no pending signature: not found or already signed")]
    NoPendingSignature,

    /// A pending record matches, but the workflow does not allow acting on it yet.
    #[error("not authorized: {0}")]
    NotAuthorized(DenialReason),
}

/// The derived signing state of one contract.
///
/// # Type Parameters
///
/// * `AUX` - Auxiliary data type of the contained records, defaults to [`Timestamps`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContractWorkflowState<AUX = Timestamps> {
    contract_id: ContractId,
    signatures: Vec<SignatureRecord<AUX>>,
    completion_percentage: u8,
    status: WorkflowStatus,
}

impl<AUX> ContractWorkflowState<AUX> {
    /// Computes the workflow state of a contract from all of its signature records.
    pub fn from_records(
        contract_id: ContractId,
        mut signatures: Vec<SignatureRecord<AUX>>,
    ) -> Self {
        debug_assert!(signatures.iter().all(|s| s.contract_id() == contract_id));

        signatures.sort_by_key(|s| s.signer_type());

        let total = signatures.len();
        let signed = signatures.iter().filter(|s| s.is_signed()).count();
        let declined = signatures.iter().any(|s| s.status() == SignatureStatus::Declined);

        // casting to u8 is safe as signed never exceeds total
        let completion_percentage = match total {
            0 => 0,
            total => (signed * 100 / total) as u8,
        };

        let status = if total == 0 {
            WorkflowStatus::NotInitialized
        } else if declined {
            WorkflowStatus::Declined
        } else if signed == total {
            WorkflowStatus::Complete
        } else {
            WorkflowStatus::InProgress
        };

        Self { contract_id, signatures, completion_percentage, status }
    }

    /// Returns the contract id.
    pub fn contract_id(&self) -> ContractId {
        self.contract_id
    }

    /// Returns the signature records in signing priority order.
    pub fn signatures(&self) -> &[SignatureRecord<AUX>] {
        &self.signatures
    }

    /// Consumes the state, returning the signature records in signing priority order.
    pub fn into_signatures(self) -> Vec<SignatureRecord<AUX>> {
        self.signatures
    }

    /// Returns `signed * 100 / required`, rounded down, or `0` without records.
    pub fn completion_percentage(&self) -> u8 {
        self.completion_percentage
    }

    /// Returns the derived contract-level status.
    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    /// Returns `true` when every required party has signed.
    pub fn is_complete(&self) -> bool {
        self.status == WorkflowStatus::Complete
    }

    /// Returns `true` when a party declined.
    pub fn is_declined(&self) -> bool {
        self.status == WorkflowStatus::Declined
    }

    /// Returns the number of required signatures.
    pub fn required_count(&self) -> usize {
        self.signatures.len()
    }

    /// Returns the number of collected signatures.
    pub fn signed_count(&self) -> usize {
        self.signatures.iter().filter(|s| s.is_signed()).count()
    }

    /// Returns the first pending signature in priority order while the workflow is in
    /// progress.
    pub fn next_required_signature(&self) -> Option<&SignatureRecord<AUX>> {
        match self.status {
            WorkflowStatus::InProgress => self.signatures.iter().find(|s| s.is_pending()),
            _ => None,
        }
    }

    /// Determines whether `user_id` may sign next and in which role.
    ///
    /// A user may only sign their own role, and only once every higher priority party has
    /// signed.
    pub fn check_permission(&self, user_id: UserId) -> SignPermission {
        let denied = SignPermission::Denied;

        match self.status {
            WorkflowStatus::NotInitialized => return denied(DenialReason::NotInitialized),
            WorkflowStatus::Declined => return denied(DenialReason::WorkflowDeclined),
            WorkflowStatus::Complete => return denied(DenialReason::AlreadyComplete),
            WorkflowStatus::InProgress => {},
        }

        let own = self.signatures.iter().filter(|s| s.signer_id() == user_id).collect::<Vec<_>>();

        if own.is_empty() {
            return denied(DenialReason::NotASigner);
        }

        let Some(pending) = own.iter().find(|s| s.is_pending()) else {
            return match own.iter().any(|s| s.is_signed()) {
                true => denied(DenialReason::AlreadySigned),
                false => denied(DenialReason::AlreadyDeclined),
            };
        };

        match self.next_required_signature() {
            Some(next) if next.id() == pending.id() => {
                SignPermission::Granted(pending.signer_type())
            },
            Some(next) => denied(DenialReason::AwaitingSignature(next.signer_type())),
            None => denied(DenialReason::AlreadyComplete),
        }
    }

    /// Returns the pending record `user_id` may sign as `signer_type`.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::NoPendingSignature`] if no pending record matches the user and role
    /// - [`WorkflowError::NotAuthorized`] if the workflow was declined or a higher priority
    ///   party has not signed yet
    pub fn authorize_signature(
        &self,
        user_id: UserId,
        signer_type: SignerType,
    ) -> Result<&SignatureRecord<AUX>, WorkflowError> {
        let record = self.find_pending(user_id, signer_type)?;

        if self.is_declined() {
            return Err(WorkflowError::NotAuthorized(DenialReason::WorkflowDeclined));
        }

        match self.next_required_signature() {
            Some(next) if next.id() == record.id() => Ok(record),
            Some(next) => {
                Err(WorkflowError::NotAuthorized(DenialReason::AwaitingSignature(next.signer_type())))
            },
            None => Err(WorkflowError::NoPendingSignature),
        }
    }

    /// Returns the pending record `user_id` may decline as `signer_type`.
    ///
    /// Declining is not subject to signing order, but a workflow can only be declined once.
    pub fn authorize_decline(
        &self,
        user_id: UserId,
        signer_type: SignerType,
    ) -> Result<&SignatureRecord<AUX>, WorkflowError> {
        let record = self.find_pending(user_id, signer_type)?;

        if self.is_declined() {
            return Err(WorkflowError::NotAuthorized(DenialReason::WorkflowDeclined));
        }

        Ok(record)
    }

    fn find_pending(
        &self,
        user_id: UserId,
        signer_type: SignerType,
    ) -> Result<&SignatureRecord<AUX>, WorkflowError> {
        self.signatures
            .iter()
            .find(|s| s.signer_id() == user_id && s.signer_type() == signer_type && s.is_pending())
            .ok_or(WorkflowError::NoPendingSignature)
    }
}

impl SignPermission {
    /// Returns `true` if the user may sign now.
    pub fn can_sign(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    /// Returns the role the user may sign in, if granted.
    pub fn signer_type(&self) -> Option<SignerType> {
        match self {
            Self::Granted(signer_type) => Some(*signer_type),
            Self::Denied(_) => None,
        }
    }

    /// Returns why signing was denied, if denied.
    pub fn reason(&self) -> Option<DenialReason> {
        match self {
            Self::Granted(_) => None,
            Self::Denied(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => f.write_str("workflow not initialized"),
            Self::WorkflowDeclined => f.write_str("workflow declined"),
            Self::AlreadyComplete => f.write_str("already complete"),
            Self::AlreadySigned => f.write_str("already signed"),
            Self::AlreadyDeclined => f.write_str("already declined"),
            Self::NotASigner => f.write_str("not a signer for this contract"),
            Self::AwaitingSignature(signer_type) => write!(f, "waiting for {signer_type} to sign"),
        }
    }
}
