//! Loan contract identifiers and the caller-owned contract status.

use core::fmt;

use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unique identifier for a loan contract.
///
/// Many signature records share one contract id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ContractId(Uuid);

/// The execution status of a loan contract.
///
/// The contract row is owned by the callers of the signing workflow: the tracker never
/// writes it, callers update it once the derived workflow state is complete or declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum ContractStatus {
    /// The contract is waiting for its required signatures.
    PendingSignature,
    /// Every required party has signed.
    Executed,
    /// A required party declined to sign; the contract is void.
    Declined,
}

impl From<Uuid> for ContractId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ContractId> for Uuid {
    fn from(ContractId(uuid): ContractId) -> Self {
        uuid
    }
}

impl From<&ContractId> for Uuid {
    fn from(ContractId(uuid): &ContractId) -> Self {
        *uuid
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
