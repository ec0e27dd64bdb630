use alloc::{string::ToString, vec, vec::Vec};

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::{
    contract::ContractId,
    signature::{
        RosterError, SignatureData, SignatureRecord, SignatureStatus, SignerIdentity, SignerRoster,
        SignerType, UserId,
    },
    workflow::{ContractWorkflowState, DenialReason, SignPermission, WorkflowError, WorkflowStatus},
};

fn identity(name: &str) -> SignerIdentity {
    SignerIdentity::builder()
        .id(Uuid::new_v4().into())
        .name(name)
        .email(alloc::format!("{}@example.com", name.to_lowercase()))
        .build()
}

fn record(
    contract_id: ContractId,
    signer_type: SignerType,
    signer_id: UserId,
    status: SignatureStatus,
) -> SignatureRecord<()> {
    let signed = status == SignatureStatus::Signed;

    SignatureRecord::builder()
        .id(Uuid::new_v4().into())
        .contract_id(contract_id)
        .signer_type(signer_type)
        .signer_id(signer_id)
        .signer_name("Signer")
        .signer_email("signer@example.com")
        .status(status)
        .maybe_signature_data(signed.then(|| SignatureData::Inline(vec![1, 2, 3])))
        .maybe_signed_at(signed.then(|| Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()))
        .aux(())
        .build()
}

fn state(contract_id: ContractId, records: Vec<SignatureRecord<()>>) -> ContractWorkflowState<()> {
    ContractWorkflowState::from_records(contract_id, records)
}

#[test]
fn roster_with_borrower_only_yields_one_requirement() {
    let roster = SignerRoster::builder().borrower(identity("Alice")).build().unwrap();

    let requirements = roster.into_requirements();

    assert_eq!(requirements.len(), 1);
    assert_eq!(requirements[0].signer_type(), SignerType::Borrower);
}

#[test]
fn roster_requirements_follow_signing_priority() {
    let roster = SignerRoster::builder()
        .borrower(identity("Alice"))
        .lender(identity("Bank"))
        .witness(identity("Wendy"))
        .guarantor(identity("Gary"))
        .build()
        .unwrap();

    assert_eq!(roster.len(), 4);

    let order: Vec<_> = roster.into_requirements().iter().map(|r| r.signer_type()).collect();

    assert_eq!(
        order,
        [SignerType::Borrower, SignerType::Guarantor, SignerType::Witness, SignerType::Lender]
    );
}

#[test]
fn roster_rejects_one_user_in_two_roles() {
    let borrower = identity("Alice");

    let err = SignerRoster::builder()
        .borrower(borrower.clone())
        .guarantor(borrower.clone())
        .build()
        .unwrap_err();

    assert_eq!(
        err,
        RosterError::DuplicateSigner(borrower.id(), SignerType::Borrower, SignerType::Guarantor)
    );
}

#[test]
fn roster_rejects_malformed_identities() {
    let blank = SignerIdentity::builder()
        .id(Uuid::new_v4().into())
        .name("  ")
        .email("blank@example.com")
        .build();

    let err = SignerRoster::builder().borrower(blank).build().unwrap_err();
    assert_eq!(err, RosterError::BlankName(SignerType::Borrower));

    for email in ["no-at-sign", "@example.com", "alice@", "a@b@c"] {
        let guarantor =
            SignerIdentity::builder().id(Uuid::new_v4().into()).name("Gary").email(email).build();

        let err = SignerRoster::builder()
            .borrower(identity("Alice"))
            .guarantor(guarantor)
            .build()
            .unwrap_err();

        assert_eq!(err, RosterError::InvalidEmail(SignerType::Guarantor), "email: {email}");
    }
}

#[test]
fn fresh_borrower_only_workflow_awaits_borrower() {
    let contract_id = ContractId::from(Uuid::new_v4());
    let borrower_id = UserId::from(Uuid::new_v4());

    let state = state(
        contract_id,
        vec![record(contract_id, SignerType::Borrower, borrower_id, SignatureStatus::Pending)],
    );

    assert_eq!(state.completion_percentage(), 0);
    assert!(!state.is_complete());
    assert_eq!(state.status(), WorkflowStatus::InProgress);
    assert_eq!(
        state.next_required_signature().map(|s| s.signer_type()),
        Some(SignerType::Borrower)
    );
    assert_eq!(state.check_permission(borrower_id), SignPermission::Granted(SignerType::Borrower));
}

#[test]
fn signed_borrower_only_workflow_is_complete() {
    let contract_id = ContractId::from(Uuid::new_v4());
    let borrower_id = UserId::from(Uuid::new_v4());

    let state = state(
        contract_id,
        vec![record(contract_id, SignerType::Borrower, borrower_id, SignatureStatus::Signed)],
    );

    assert_eq!(state.completion_percentage(), 100);
    assert!(state.is_complete());
    assert!(state.next_required_signature().is_none());
    assert_eq!(
        state.check_permission(borrower_id),
        SignPermission::Denied(DenialReason::AlreadyComplete)
    );
}

#[test]
fn records_are_ordered_by_priority_regardless_of_input_order() {
    let contract_id = ContractId::from(Uuid::new_v4());

    let state = state(
        contract_id,
        vec![
            record(contract_id, SignerType::Lender, Uuid::new_v4().into(), SignatureStatus::Pending),
            record(contract_id, SignerType::Witness, Uuid::new_v4().into(), SignatureStatus::Pending),
            record(contract_id, SignerType::Borrower, Uuid::new_v4().into(), SignatureStatus::Signed),
            record(
                contract_id,
                SignerType::Guarantor,
                Uuid::new_v4().into(),
                SignatureStatus::Pending,
            ),
        ],
    );

    let order: Vec<_> = state.signatures().iter().map(|s| s.signer_type()).collect();

    assert_eq!(
        order,
        [SignerType::Borrower, SignerType::Guarantor, SignerType::Witness, SignerType::Lender]
    );
    assert_eq!(state.completion_percentage(), 25);
    assert_eq!(state.signed_count(), 1);
    assert_eq!(state.required_count(), 4);
    assert_eq!(
        state.next_required_signature().map(|s| s.signer_type()),
        Some(SignerType::Guarantor)
    );
}

#[test]
fn completion_percentage_is_hundred_only_when_all_signed() {
    let contract_id = ContractId::from(Uuid::new_v4());
    let statuses = [SignatureStatus::Pending, SignatureStatus::Signed];

    for borrower in statuses {
        for guarantor in statuses {
            for witness in statuses {
                let state = state(
                    contract_id,
                    vec![
                        record(contract_id, SignerType::Borrower, Uuid::new_v4().into(), borrower),
                        record(contract_id, SignerType::Guarantor, Uuid::new_v4().into(), guarantor),
                        record(contract_id, SignerType::Witness, Uuid::new_v4().into(), witness),
                    ],
                );

                let all_signed = state.signatures().iter().all(|s| s.is_signed());

                assert_eq!(state.completion_percentage() == 100, all_signed);
                assert_eq!(state.is_complete(), all_signed);
            }
        }
    }
}

#[test]
fn empty_workflow_is_not_initialized() {
    let contract_id = ContractId::from(Uuid::new_v4());

    let state = state(contract_id, Vec::new());

    assert_eq!(state.status(), WorkflowStatus::NotInitialized);
    assert_eq!(state.completion_percentage(), 0);
    assert!(!state.is_complete());
    assert!(state.next_required_signature().is_none());
    assert_eq!(
        state.check_permission(Uuid::new_v4().into()),
        SignPermission::Denied(DenialReason::NotInitialized)
    );
}

#[test]
fn guarantor_must_wait_for_borrower() {
    let contract_id = ContractId::from(Uuid::new_v4());
    let borrower_id = UserId::from(Uuid::new_v4());
    let guarantor_id = UserId::from(Uuid::new_v4());

    let state = state(
        contract_id,
        vec![
            record(contract_id, SignerType::Borrower, borrower_id, SignatureStatus::Pending),
            record(contract_id, SignerType::Guarantor, guarantor_id, SignatureStatus::Pending),
        ],
    );

    let permission = state.check_permission(guarantor_id);

    assert!(!permission.can_sign());
    assert_eq!(permission.signer_type(), None);
    assert_eq!(permission.reason(), Some(DenialReason::AwaitingSignature(SignerType::Borrower)));
    assert_eq!(permission.reason().unwrap().to_string(), "waiting for borrower to sign");

    assert_eq!(
        state.authorize_signature(guarantor_id, SignerType::Guarantor),
        Err(WorkflowError::NotAuthorized(DenialReason::AwaitingSignature(SignerType::Borrower)))
    );
}

#[test]
fn guarantor_may_sign_after_borrower_and_borrower_is_told_already_signed() {
    let contract_id = ContractId::from(Uuid::new_v4());
    let borrower_id = UserId::from(Uuid::new_v4());
    let guarantor_id = UserId::from(Uuid::new_v4());

    let state = state(
        contract_id,
        vec![
            record(contract_id, SignerType::Borrower, borrower_id, SignatureStatus::Signed),
            record(contract_id, SignerType::Guarantor, guarantor_id, SignatureStatus::Pending),
        ],
    );

    let permission = state.check_permission(guarantor_id);
    assert!(permission.can_sign());
    assert_eq!(permission.signer_type(), Some(SignerType::Guarantor));
    assert_eq!(permission.reason(), None);

    let permission = state.check_permission(borrower_id);
    assert!(!permission.can_sign());
    assert_eq!(permission.reason().map(|r| r.to_string()).as_deref(), Some("already signed"));

    assert_eq!(
        state.authorize_signature(borrower_id, SignerType::Borrower),
        Err(WorkflowError::NoPendingSignature)
    );
    assert!(state.authorize_signature(guarantor_id, SignerType::Guarantor).is_ok());
}

#[test]
fn stranger_and_wrong_role_are_rejected() {
    let contract_id = ContractId::from(Uuid::new_v4());
    let borrower_id = UserId::from(Uuid::new_v4());

    let state = state(
        contract_id,
        vec![record(contract_id, SignerType::Borrower, borrower_id, SignatureStatus::Pending)],
    );

    assert_eq!(
        state.check_permission(Uuid::new_v4().into()),
        SignPermission::Denied(DenialReason::NotASigner)
    );
    assert_eq!(
        state.authorize_signature(borrower_id, SignerType::Guarantor),
        Err(WorkflowError::NoPendingSignature)
    );
}

#[test]
fn decline_voids_the_workflow() {
    let contract_id = ContractId::from(Uuid::new_v4());
    let borrower_id = UserId::from(Uuid::new_v4());
    let guarantor_id = UserId::from(Uuid::new_v4());

    let pending = state(
        contract_id,
        vec![
            record(contract_id, SignerType::Borrower, borrower_id, SignatureStatus::Pending),
            record(contract_id, SignerType::Guarantor, guarantor_id, SignatureStatus::Pending),
        ],
    );

    // declining is not bound to signing order
    assert!(pending.authorize_decline(guarantor_id, SignerType::Guarantor).is_ok());

    let declined = state(
        contract_id,
        vec![
            record(contract_id, SignerType::Borrower, borrower_id, SignatureStatus::Pending),
            record(contract_id, SignerType::Guarantor, guarantor_id, SignatureStatus::Declined),
        ],
    );

    assert_eq!(declined.status(), WorkflowStatus::Declined);
    assert!(declined.is_declined());
    assert!(!declined.is_complete());
    assert!(declined.next_required_signature().is_none());
    assert_eq!(
        declined.check_permission(borrower_id),
        SignPermission::Denied(DenialReason::WorkflowDeclined)
    );
    assert_eq!(
        declined.authorize_signature(borrower_id, SignerType::Borrower),
        Err(WorkflowError::NotAuthorized(DenialReason::WorkflowDeclined))
    );
    assert_eq!(
        declined.authorize_decline(borrower_id, SignerType::Borrower),
        Err(WorkflowError::NotAuthorized(DenialReason::WorkflowDeclined))
    );
    assert_eq!(
        declined.authorize_decline(guarantor_id, SignerType::Guarantor),
        Err(WorkflowError::NoPendingSignature)
    );
}

#[test]
fn signer_type_round_trips_through_its_name() {
    assert_eq!("guarantor".parse::<SignerType>().unwrap(), SignerType::Guarantor);
    assert_eq!(<&str>::from(SignerType::Lender), "lender");
    assert!("notary".parse::<SignerType>().is_err());
}
