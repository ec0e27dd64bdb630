use std::borrow::Cow;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use loan_signing_engine::{SigningEngineError, request::RequestError};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub(crate) enum AppError {
    #[error("signing engine error: {0}")]
    SigningEngine(Box<SigningEngineError>),

    #[error("invalid signer type: {0}")]
    InvalidSignerType(Cow<'static, str>),

    #[error("invalid signature data: {0}")]
    InvalidSignatureData(Cow<'static, str>),

    #[error("request error: {0}")]
    RequestError(#[from] RequestError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    pub fn invalid_signature_data<E>(err: E) -> Self
    where
        Cow<'static, str>: From<E>,
    {
        Self::InvalidSignatureData(err.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidSignerType(_)
            | AppError::InvalidSignatureData(_)
            | AppError::RequestError(_) => StatusCode::BAD_REQUEST,
            AppError::SigningEngine(err) => match err.as_ref() {
                SigningEngineError::NotAuthorized(_) => StatusCode::FORBIDDEN,
                SigningEngineError::NotFound(_) => StatusCode::NOT_FOUND,
                SigningEngineError::Conflict(_) => StatusCode::CONFLICT,
                SigningEngineError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<SigningEngineError> for AppError {
    fn from(err: SigningEngineError) -> Self {
        Self::SigningEngine(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.status_code();

        match code {
            StatusCode::INTERNAL_SERVER_ERROR => tracing::error!("server error: {self}"),
            StatusCode::NOT_FOUND => tracing::info!("not found: {self}"),
            _ => tracing::warn!("client error: {self}"),
        }

        (code, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
