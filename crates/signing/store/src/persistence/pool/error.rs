use diesel_async::pooled_connection::deadpool::BuildError;
use tokio::task::JoinError;

/// Errors that can occur while establishing the connection pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("join error: {0}")]
    Join(#[from] JoinError),

    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("rustls error: {0}")]
    Rustls(#[from] rustls::Error),
}
