//! integration tests for the loan-signing-server router

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use loan_signing_domain::{
    contract::{ContractId, ContractStatus},
    signature::SignerIdentity,
};
use loan_signing_engine::SigningEngine;
use loan_signing_server::App;
use loan_signing_test_utils::{MemoryStore, contract_id, signer};
use serde_json::{Value, json};
use tower::ServiceExt;

fn setup() -> (Router, Arc<SigningEngine<MemoryStore>>) {
    let engine = Arc::new(SigningEngine::new(MemoryStore::new()));
    let router = loan_signing_server::create_router(App::builder().engine(engine.clone()).build());

    (router, engine)
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");

    let response = router.clone().oneshot(request).await.expect("router call");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");

    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn signer_json(signer: &SignerIdentity) -> Value {
    json!({ "id": signer.id().to_string(), "name": signer.name(), "email": signer.email() })
}

async fn initialize(
    router: &Router,
    contract_id: ContractId,
    borrower: &SignerIdentity,
    guarantor: &SignerIdentity,
) {
    let (status, _) = post(
        router,
        "/api/v1/signature-workflow/initialize",
        json!({
            "contract_id": contract_id.to_string(),
            "borrower": signer_json(borrower),
            "guarantor": signer_json(guarantor),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

fn sign_json(contract_id: ContractId, signer: &SignerIdentity, signer_type: &str) -> Value {
    json!({
        "contract_id": contract_id.to_string(),
        "user_id": signer.id().to_string(),
        "signer_type": signer_type,
        "signature_image": "iVBORw0KGgo=",
    })
}

#[tokio::test]
async fn health_returns_ok() {
    let (router, _) = setup();

    let request = Request::builder().method("GET").uri("/health").body(Body::empty()).expect("req");
    let response = router.oneshot(request).await.expect("health call");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn full_signing_flow_executes_contract() {
    // Arrange
    let (router, engine) = setup();
    let contract_id = contract_id();
    let borrower = signer("Ada Borrower");
    let guarantor = signer("Grace Guarantor");

    engine.store().insert_contract(contract_id);
    initialize(&router, contract_id, &borrower, &guarantor).await;

    // Act
    let (early_status, early_body) = post(
        &router,
        "/api/v1/signature-workflow/sign",
        sign_json(contract_id, &guarantor, "guarantor"),
    )
    .await;

    let (_, permission) = post(
        &router,
        "/api/v1/signature-workflow/check-permission",
        json!({ "contract_id": contract_id.to_string(), "user_id": borrower.id().to_string() }),
    )
    .await;

    let (borrower_status, half) = post(
        &router,
        "/api/v1/signature-workflow/sign",
        sign_json(contract_id, &borrower, "borrower"),
    )
    .await;

    let (guarantor_status, done) = post(
        &router,
        "/api/v1/signature-workflow/sign",
        sign_json(contract_id, &guarantor, "guarantor"),
    )
    .await;

    // Assert
    assert_eq!(early_status, StatusCode::FORBIDDEN);
    assert!(early_body["error"].as_str().is_some_and(|e| e.contains("waiting for borrower")));

    assert_eq!(permission["can_sign"], true);
    assert_eq!(permission["signer_type"], "borrower");
    assert_eq!(permission["reason"], "");

    assert_eq!(borrower_status, StatusCode::OK);
    assert_eq!(half["workflow"]["completion_percentage"], 50);
    assert_eq!(half["workflow"]["next_signer_type"], "guarantor");
    assert_eq!(half["signature"]["signature_image"], "iVBORw0KGgo=");

    assert_eq!(guarantor_status, StatusCode::OK);
    assert_eq!(done["workflow"]["status"], "complete");
    assert_eq!(done["workflow"]["is_complete"], true);
    assert_eq!(engine.store().contract_status(contract_id), Some(ContractStatus::Executed));
}

#[tokio::test]
async fn duplicate_initialization_and_signature_conflict() {
    // Arrange
    let (router, _) = setup();
    let contract_id = contract_id();
    let borrower = signer("Ada Borrower");
    let guarantor = signer("Grace Guarantor");

    initialize(&router, contract_id, &borrower, &guarantor).await;

    // Act
    let (init_status, _) = post(
        &router,
        "/api/v1/signature-workflow/initialize",
        json!({ "contract_id": contract_id.to_string(), "borrower": signer_json(&borrower) }),
    )
    .await;

    let sign = sign_json(contract_id, &borrower, "borrower");
    let (first, _) = post(&router, "/api/v1/signature-workflow/sign", sign.clone()).await;
    let (second, _) = post(&router, "/api/v1/signature-workflow/sign", sign).await;

    // Assert
    assert_eq!(init_status, StatusCode::CONFLICT);
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
}

#[tokio::test]
async fn decline_marks_contract_declined() {
    // Arrange
    let (router, engine) = setup();
    let contract_id = contract_id();
    let borrower = signer("Ada Borrower");
    let guarantor = signer("Grace Guarantor");

    engine.store().insert_contract(contract_id);
    initialize(&router, contract_id, &borrower, &guarantor).await;

    // Act
    let (status, body) = post(
        &router,
        "/api/v1/signature-workflow/decline",
        json!({
            "contract_id": contract_id.to_string(),
            "user_id": guarantor.id().to_string(),
            "signer_type": "guarantor",
        }),
    )
    .await;

    let (_, permission) = post(
        &router,
        "/api/v1/signature-workflow/check-permission",
        json!({ "contract_id": contract_id.to_string(), "user_id": borrower.id().to_string() }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["signature"]["status"], "declined");
    assert_eq!(body["workflow"]["status"], "declined");
    assert_eq!(engine.store().contract_status(contract_id), Some(ContractStatus::Declined));

    assert_eq!(permission["can_sign"], false);
    assert_eq!(permission["reason"], "workflow declined");
    assert!(permission.get("signer_type").is_some_and(|signer_type| signer_type.is_null()));
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    // Arrange
    let (router, _) = setup();
    let contract_id = contract_id();
    let borrower = signer("Ada Borrower");

    // Act
    let (duplicate_user, _) = post(
        &router,
        "/api/v1/signature-workflow/initialize",
        json!({
            "contract_id": contract_id.to_string(),
            "borrower": signer_json(&borrower),
            "guarantor": signer_json(&borrower),
        }),
    )
    .await;

    let (bad_role, _) = post(
        &router,
        "/api/v1/signature-workflow/sign",
        sign_json(contract_id, &borrower, "notary"),
    )
    .await;

    let (no_signature, _) = post(
        &router,
        "/api/v1/signature-workflow/sign",
        json!({
            "contract_id": contract_id.to_string(),
            "user_id": borrower.id().to_string(),
            "signer_type": "borrower",
        }),
    )
    .await;

    // Assert
    assert_eq!(duplicate_user, StatusCode::BAD_REQUEST);
    assert_eq!(bad_role, StatusCode::BAD_REQUEST);
    assert_eq!(no_signature, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn state_of_unknown_contract_is_not_initialized() {
    let (router, _) = setup();

    let (status, body) = post(
        &router,
        "/api/v1/signature-workflow/state",
        json!({ "contract_id": contract_id().to_string() }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["workflow"]["status"], "not_initialized");
    assert_eq!(body["workflow"]["completion_percentage"], 0);
    assert_eq!(body["workflow"]["signatures"], json!([]));
}

#[tokio::test]
async fn persistence_failure_returns_server_error() {
    let (router, engine) = setup();
    engine.store().set_unavailable(true);

    let (status, _) = post(
        &router,
        "/api/v1/signature-workflow/state",
        json!({ "contract_id": contract_id().to_string() }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
