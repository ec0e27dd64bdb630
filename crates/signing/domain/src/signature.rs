//! Signature records, signer roles and the roster of parties required to sign a contract.

use core::fmt;

use alloc::{string::String, vec::Vec};

use bon::Builder;
use chrono::{DateTime, Utc};
use dissolve_derive::Dissolve;
use strum::{Display, EnumString, IntoStaticStr};
use url::Url;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Timestamps, contract::ContractId};

/// A unique identifier for a signature record, assigned by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct SignatureId(Uuid);

/// The identity-provider id of a user taking part in a signature workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct UserId(Uuid);

/// The role a party plays in the execution of a contract.
///
/// Variants are declared in signing priority order, so the derived [`Ord`] is the order in
/// which the parties are expected to sign.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoStaticStr, EnumString, Display,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum SignerType {
    /// The party receiving the loan.
    Borrower,
    /// A party guaranteeing the borrower's obligations.
    Guarantor,
    /// A party witnessing the borrower's and guarantor's signatures.
    Witness,
    /// The lending institution countersigning the contract.
    Lender,
}

/// The state of an individual signature.
///
/// `Signed` and `Declined` are terminal: a record leaves `Pending` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum SignatureStatus {
    /// The signer has not acted yet.
    Pending,
    /// The signer has signed.
    Signed,
    /// The signer refused to sign.
    Declined,
}

/// The captured signature of a party.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum SignatureData {
    /// The signature image bytes.
    Inline(Vec<u8>),
    /// A pointer to the signature image in object storage.
    Stored(Url),
}

/// The one transition a pending signature record can make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureOutcome {
    /// The signer signed.
    Signed {
        /// The captured signature.
        signature_data: SignatureData,
        /// When the signature was captured.
        signed_at: DateTime<Utc>,
    },
    /// The signer declined.
    Declined {
        /// When the signer declined.
        declined_at: DateTime<Utc>,
    },
}

/// The identity of a party asked to sign a contract.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignerIdentity {
    /// The identity-provider id of the signer.
    id: UserId,

    /// The display name of the signer.
    #[builder(into)]
    name: String,

    /// The contact email of the signer.
    #[builder(into)]
    email: String,
}

/// A signature that must be collected before a contract is executed.
///
/// This is the shape of a signature record before the persistence layer assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq, Dissolve)]
pub struct SignatureRequirement {
    /// The role the signer holds.
    signer_type: SignerType,

    /// The party who must sign.
    signer: SignerIdentity,
}

/// The validated set of parties required to sign one contract.
///
/// A borrower is always required; the other roles are present only when the contract needs
/// them. No user may hold more than one role.
#[derive(Debug, Clone)]
pub struct SignerRoster {
    borrower: SignerIdentity,
    guarantor: Option<SignerIdentity>,
    witness: Option<SignerIdentity>,
    lender: Option<SignerIdentity>,
}

/// Errors raised while validating a [`SignerRoster`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// A signer's name is empty or whitespace.
    #[error("blank name for {0}")]
    BlankName(SignerType),

    /// A signer's email is not of the form `local@domain`.
    #[error("invalid email for {0}")]
    InvalidEmail(SignerType),

    /// The same user was listed for two roles.
    #[error("user {0} cannot sign as both {1} and {2}")]
    DuplicateSigner(UserId, SignerType, SignerType),
}

/// A signature on a loan contract together with its current status.
///
/// # Type Parameters
///
/// * `AUX` - Auxiliary data type, defaults to [`Timestamps`] for tracking metadata.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignatureRecord<AUX = Timestamps> {
    /// The unique identifier for this record.
    id: SignatureId,

    /// The contract this signature belongs to.
    contract_id: ContractId,

    /// The role the signer holds on the contract.
    signer_type: SignerType,

    /// The identity-provider id of the signer.
    signer_id: UserId,

    /// The display name of the signer.
    #[builder(into)]
    signer_name: String,

    /// The contact email of the signer.
    #[builder(into)]
    signer_email: String,

    /// The current status of the signature.
    status: SignatureStatus,

    /// The captured signature, present once signed.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    signature_data: Option<SignatureData>,

    /// When the signature was captured, present once signed.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    signed_at: Option<DateTime<Utc>>,

    /// Auxiliary metadata associated with this record.
    aux: AUX,
}

impl SignerIdentity {
    /// Returns the identity-provider id of the signer.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name of the signer.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contact email of the signer.
    pub fn email(&self) -> &str {
        &self.email
    }

    fn validate(&self, signer_type: SignerType) -> Result<(), RosterError> {
        if self.name.trim().is_empty() {
            return Err(RosterError::BlankName(signer_type));
        }

        let valid_email = match self.email.trim().split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            },
            None => false,
        };

        if !valid_email {
            return Err(RosterError::InvalidEmail(signer_type));
        }

        Ok(())
    }
}

impl SignatureOutcome {
    /// Returns the terminal status the record moves into.
    pub fn status(&self) -> SignatureStatus {
        match self {
            Self::Signed { .. } => SignatureStatus::Signed,
            Self::Declined { .. } => SignatureStatus::Declined,
        }
    }

    /// Returns when the transition happened.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Signed { signed_at, .. } => *signed_at,
            Self::Declined { declined_at } => *declined_at,
        }
    }
}

impl SignatureRequirement {
    /// Returns the role the signer holds.
    pub fn signer_type(&self) -> SignerType {
        self.signer_type
    }

    /// Returns the party who must sign.
    pub fn signer(&self) -> &SignerIdentity {
        &self.signer
    }
}

#[bon::bon]
impl SignerRoster {
    /// Creates a roster after validating every listed identity.
    ///
    /// Returns an error if a name is blank, an email is malformed, or one user is listed for
    /// more than one role.
    #[builder]
    pub fn new(
        borrower: SignerIdentity,
        guarantor: Option<SignerIdentity>,
        witness: Option<SignerIdentity>,
        lender: Option<SignerIdentity>,
    ) -> Result<Self, RosterError> {
        let roster = Self { borrower, guarantor, witness, lender };

        let entries = roster.entries().collect::<Vec<_>>();

        for (idx, &(signer_type, signer)) in entries.iter().enumerate() {
            signer.validate(signer_type)?;

            if let Some(&(other_type, _)) =
                entries[..idx].iter().find(|(_, other)| other.id == signer.id)
            {
                return Err(RosterError::DuplicateSigner(signer.id, other_type, signer_type));
            }
        }

        Ok(roster)
    }
}

impl SignerRoster {
    /// Returns the number of parties required to sign.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// Always `false`: a roster holds at least the borrower.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Converts the roster into signature requirements in signing priority order.
    pub fn into_requirements(self) -> Vec<SignatureRequirement> {
        let Self { borrower, guarantor, witness, lender } = self;

        [
            (SignerType::Borrower, Some(borrower)),
            (SignerType::Guarantor, guarantor),
            (SignerType::Witness, witness),
            (SignerType::Lender, lender),
        ]
        .into_iter()
        .filter_map(|(signer_type, signer)| {
            signer.map(|signer| SignatureRequirement { signer_type, signer })
        })
        .collect()
    }

    fn entries(&self) -> impl Iterator<Item = (SignerType, &SignerIdentity)> {
        [
            (SignerType::Borrower, Some(&self.borrower)),
            (SignerType::Guarantor, self.guarantor.as_ref()),
            (SignerType::Witness, self.witness.as_ref()),
            (SignerType::Lender, self.lender.as_ref()),
        ]
        .into_iter()
        .filter_map(|(signer_type, signer)| signer.map(|signer| (signer_type, signer)))
    }
}

impl<AUX> SignatureRecord<AUX> {
    /// Returns the record id.
    pub fn id(&self) -> SignatureId {
        self.id
    }

    /// Returns the contract this signature belongs to.
    pub fn contract_id(&self) -> ContractId {
        self.contract_id
    }

    /// Returns the role the signer holds.
    pub fn signer_type(&self) -> SignerType {
        self.signer_type
    }

    /// Returns the identity-provider id of the signer.
    pub fn signer_id(&self) -> UserId {
        self.signer_id
    }

    /// Returns the display name of the signer.
    pub fn signer_name(&self) -> &str {
        &self.signer_name
    }

    /// Returns the contact email of the signer.
    pub fn signer_email(&self) -> &str {
        &self.signer_email
    }

    /// Returns the current status of the signature.
    pub fn status(&self) -> SignatureStatus {
        self.status
    }

    /// Returns the captured signature, if signed.
    pub fn signature_data(&self) -> Option<&SignatureData> {
        self.signature_data.as_ref()
    }

    /// Returns when the signature was captured, if signed.
    pub fn signed_at(&self) -> Option<DateTime<Utc>> {
        self.signed_at
    }

    /// Returns the auxiliary metadata.
    pub fn aux(&self) -> &AUX {
        &self.aux
    }

    /// Returns `true` while the signer has not acted.
    pub fn is_pending(&self) -> bool {
        self.status == SignatureStatus::Pending
    }

    /// Returns `true` once the signer has signed.
    pub fn is_signed(&self) -> bool {
        self.status == SignatureStatus::Signed
    }

    /// Replaces the auxiliary data with a new value, returning both the updated record
    /// and the old auxiliary data.
    pub fn with_aux<AUX2>(self, aux: AUX2) -> (SignatureRecord<AUX2>, AUX) {
        let record = SignatureRecord {
            id: self.id,
            contract_id: self.contract_id,
            signer_type: self.signer_type,
            signer_id: self.signer_id,
            signer_name: self.signer_name,
            signer_email: self.signer_email,
            status: self.status,
            signature_data: self.signature_data,
            signed_at: self.signed_at,
            aux,
        };

        (record, self.aux)
    }
}

macro_rules! impl_uuid_newtype {
    ($($name:ident),+ $(,)?) => {$(
        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from($name(uuid): $name) -> Self {
                uuid
            }
        }

        impl From<&$name> for Uuid {
            fn from($name(uuid): &$name) -> Self {
                *uuid
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    )+};
}

impl_uuid_newtype!(SignatureId, UserId);
