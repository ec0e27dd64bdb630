#![allow(missing_docs)]

pub mod config;

mod error;
mod payload;
mod routes;

use std::sync::Arc;

use axum::{Router, routing};
use bon::Builder;
use loan_signing_engine::SigningEngine;
use loan_signing_store::SigningRepository;

pub fn create_router<R>(app: App<R>) -> Router
where
    R: SigningRepository + 'static,
{
    Router::new()
        .route("/health", routing::get(routes::health))
        .route(
            "/api/v1/signature-workflow/initialize",
            routing::post(routes::initialize_workflow::<R>),
        )
        .route("/api/v1/signature-workflow/state", routing::post(routes::get_workflow_state::<R>))
        .route(
            "/api/v1/signature-workflow/check-permission",
            routing::post(routes::check_permission::<R>),
        )
        .route("/api/v1/signature-workflow/sign", routing::post(routes::record_signature::<R>))
        .route("/api/v1/signature-workflow/decline", routing::post(routes::decline_signature::<R>))
        .with_state(app)
}

#[derive(Builder)]
pub struct App<R> {
    engine: Arc<SigningEngine<R>>,
}

impl<R> Clone for App<R> {
    fn clone(&self) -> Self {
        Self { engine: Arc::clone(&self.engine) }
    }
}
