use core::str::FromStr;

use axum::{Json, extract::State, http::StatusCode};
use loan_signing_domain::{
    contract::{ContractId, ContractStatus},
    signature::{SignatureData, SignerIdentity, SignerType},
};
use loan_signing_engine::{
    SigningEngine, SigningEngineError,
    request::{
        CheckPermissionRequest, DeclineSignatureRequest, GetWorkflowStateRequest,
        InitializeWorkflowRequest, RecordSignatureRequest, RequestError,
        UpdateContractStatusRequest,
    },
    response::{InitializeWorkflowResponseDissolved, SignatureTransitionResponseDissolved},
};
use loan_signing_store::SigningRepository;
use url::Url;

use crate::{
    App,
    error::AppError,
    payload::{
        request::{
            CheckPermissionRequestPayload, CheckPermissionRequestPayloadDissolved,
            DeclineSignatureRequestPayload, DeclineSignatureRequestPayloadDissolved,
            GetWorkflowStateRequestPayload, GetWorkflowStateRequestPayloadDissolved,
            InitializeWorkflowRequestPayload, InitializeWorkflowRequestPayloadDissolved,
            RecordSignatureRequestPayload, RecordSignatureRequestPayloadDissolved, SignerPayload,
            SignerPayloadDissolved,
        },
        response::{
            CheckPermissionResponsePayload, GetWorkflowStateResponsePayload,
            InitializeWorkflowResponsePayload, SignatureTransitionResponsePayload,
        },
    },
};

#[tracing::instrument]
pub async fn health() -> StatusCode {
    StatusCode::OK
}

#[tracing::instrument(skip_all)]
pub async fn initialize_workflow<R>(
    State(App { engine }): State<App<R>>,
    Json(payload): Json<InitializeWorkflowRequestPayload>,
) -> Result<Json<InitializeWorkflowResponsePayload>, AppError>
where
    R: SigningRepository + 'static,
{
    let InitializeWorkflowRequestPayloadDissolved {
        contract_id,
        borrower,
        guarantor,
        witness,
        lender,
    } = payload.dissolve();

    let request = InitializeWorkflowRequest::builder()
        .contract_id(contract_id.into())
        .borrower(make_signer_identity(borrower))
        .maybe_guarantor(guarantor.map(make_signer_identity))
        .maybe_witness(witness.map(make_signer_identity))
        .maybe_lender(lender.map(make_signer_identity))
        .build()
        .map_err(RequestError::from)
        .inspect_err(|e| tracing::error!("failed to create request: {e}"))?;

    let InitializeWorkflowResponseDissolved { signatures } =
        engine.initialize_workflow(request).await?.dissolve();

    let response = InitializeWorkflowResponsePayload::builder()
        .signatures(signatures.into_iter().map(From::from).collect())
        .build();

    Ok(Json(response))
}

#[tracing::instrument(skip_all)]
pub async fn get_workflow_state<R>(
    State(App { engine }): State<App<R>>,
    Json(payload): Json<GetWorkflowStateRequestPayload>,
) -> Result<Json<GetWorkflowStateResponsePayload>, AppError>
where
    R: SigningRepository + 'static,
{
    let GetWorkflowStateRequestPayloadDissolved { contract_id } = payload.dissolve();

    let request = GetWorkflowStateRequest::builder().contract_id(contract_id.into()).build();

    let state = engine.get_workflow_state(request).await?;

    let response = GetWorkflowStateResponsePayload::builder().workflow(state.into()).build();

    Ok(Json(response))
}

#[tracing::instrument(skip_all)]
pub async fn check_permission<R>(
    State(App { engine }): State<App<R>>,
    Json(payload): Json<CheckPermissionRequestPayload>,
) -> Result<Json<CheckPermissionResponsePayload>, AppError>
where
    R: SigningRepository + 'static,
{
    let CheckPermissionRequestPayloadDissolved { contract_id, user_id } = payload.dissolve();

    let request = CheckPermissionRequest::builder()
        .contract_id(contract_id.into())
        .user_id(user_id.into())
        .build();

    let permission = engine.check_permission(request).await?;

    Ok(Json(permission.into()))
}

/// Records a signature and marks the contract executed once every party has signed.
#[tracing::instrument(skip_all)]
pub async fn record_signature<R>(
    State(App { engine }): State<App<R>>,
    Json(payload): Json<RecordSignatureRequestPayload>,
) -> Result<Json<SignatureTransitionResponsePayload>, AppError>
where
    R: SigningRepository + 'static,
{
    let RecordSignatureRequestPayloadDissolved {
        contract_id,
        user_id,
        signer_type,
        signature_image,
        signature_url,
    } = payload.dissolve();

    let signature_data = match (signature_image, signature_url) {
        (Some(bz), None) => SignatureData::Inline(bz),
        (None, Some(url)) => Url::parse(&url)
            .map(SignatureData::Stored)
            .map_err(|e| AppError::invalid_signature_data(e.to_string()))?,
        _ => {
            return Err(AppError::invalid_signature_data(
                "exactly one of signature_image and signature_url is required",
            ));
        },
    };

    let request = RecordSignatureRequest::builder()
        .contract_id(contract_id.into())
        .user_id(user_id.into())
        .signer_type(parse_signer_type(&signer_type)?)
        .signature_data(signature_data)
        .build()
        .map_err(RequestError::from)?;

    let SignatureTransitionResponseDissolved { signature, state } =
        engine.record_signature(request).await?.dissolve();

    if state.is_complete() {
        mark_contract(&engine, state.contract_id(), ContractStatus::Executed).await;
    }

    let response = SignatureTransitionResponsePayload::builder()
        .signature(signature.into())
        .workflow(state.into())
        .build();

    Ok(Json(response))
}

/// Records a refusal to sign and marks the contract declined.
#[tracing::instrument(skip_all)]
pub async fn decline_signature<R>(
    State(App { engine }): State<App<R>>,
    Json(payload): Json<DeclineSignatureRequestPayload>,
) -> Result<Json<SignatureTransitionResponsePayload>, AppError>
where
    R: SigningRepository + 'static,
{
    let DeclineSignatureRequestPayloadDissolved { contract_id, user_id, signer_type } =
        payload.dissolve();

    let request = DeclineSignatureRequest::builder()
        .contract_id(contract_id.into())
        .user_id(user_id.into())
        .signer_type(parse_signer_type(&signer_type)?)
        .build();

    let SignatureTransitionResponseDissolved { signature, state } =
        engine.decline_signature(request).await?.dissolve();

    mark_contract(&engine, state.contract_id(), ContractStatus::Declined).await;

    let response = SignatureTransitionResponsePayload::builder()
        .signature(signature.into())
        .workflow(state.into())
        .build();

    Ok(Json(response))
}

// A failed contract status update is logged and does not fail the request.
async fn mark_contract<R>(engine: &SigningEngine<R>, contract_id: ContractId, status: ContractStatus)
where
    R: SigningRepository,
{
    let request =
        UpdateContractStatusRequest::builder().contract_id(contract_id).status(status).build();

    match engine.update_contract_status(request).await {
        Ok(()) => {},
        Err(SigningEngineError::NotFound(_)) => {
            tracing::warn!(%contract_id, %status, "contract not found, status not updated");
        },
        Err(e) => tracing::error!(%contract_id, %status, "failed to update contract status: {e}"),
    }
}

fn make_signer_identity(signer: SignerPayload) -> SignerIdentity {
    let SignerPayloadDissolved { id, name, email } = signer.dissolve();

    SignerIdentity::builder().id(id.into()).name(name).email(email).build()
}

fn parse_signer_type(signer_type: &str) -> Result<SignerType, AppError> {
    SignerType::from_str(signer_type)
        .map_err(|_| AppError::InvalidSignerType(signer_type.to_owned().into()))
}
