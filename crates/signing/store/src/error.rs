use std::borrow::Cow;

use crate::persistence::store::StoreError;

pub type Result<T, E = SigningStoreError> = core::result::Result<T, E>;

/// Errors that can occur when interacting with the store
#[derive(Debug, thiserror::Error)]
pub enum SigningStoreError {
    /// A database-level error occurred.
    ///
    /// This wraps errors from the underlying persistence layer, including
    /// connection issues, query failures, and transaction errors.
    #[error("database error: {0}")]
    Store(StoreError),

    /// The write conflicts with data already stored.
    ///
    /// This is returned when a contract's signature workflow has already been
    /// initialized, including when a concurrent initialization won the race.
    #[error("conflict error: {0}")]
    Conflict(Cow<'static, str>),

    /// Failed to acquire a database connection from the pool.
    ///
    /// This typically indicates the connection pool is exhausted or
    /// the database is unavailable.
    #[error("pool error")]
    Pool,

    /// An invalid value was encountered during processing.
    ///
    /// This is returned when data retrieved from the database cannot be
    /// converted to the expected type or format.
    #[error("invalid value error: {0}")]
    InvalidValue(Cow<'static, str>),
}

impl SigningStoreError {
    /// Creates an `InvalidValue` error from any type that can be converted to a string.
    pub fn invalid_value<E>(err: E) -> Self
    where
        Cow<'static, str>: From<E>,
    {
        Self::InvalidValue(err.into())
    }
}

impl From<StoreError> for SigningStoreError {
    fn from(err: StoreError) -> Self {
        if err.is_unique_violation() {
            return Self::Conflict("signature workflow already initialized".into());
        }

        Self::Store(err)
    }
}
