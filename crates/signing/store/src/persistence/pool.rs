mod error;

pub use self::error::PoolError;

use core::num::NonZeroUsize;

use diesel::ConnectionError;
use diesel_async::{
    AsyncPgConnection,
    pooled_connection::{
        AsyncDieselConnectionManager, ManagerConfig,
        deadpool::{Object, Pool},
    },
};
use rustls::{ClientConfig, RootCertStore};
use rustls_native_certs::CertificateResult;
use tokio::task;
use tokio_postgres_rustls::MakeRustlsConnect;

/// A deadpool-managed pool of asynchronous PostgreSQL connections.
pub type DbPool = Pool<AsyncPgConnection>;

/// A connection checked out of [`DbPool`]; it returns to the pool on drop.
pub type DbConn = Object<AsyncPgConnection>;

/// Whether connections to the database are encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbTls {
    /// Plain TCP connections, for local development databases.
    Disabled,
    /// TLS connections verified against the platform's native root certificates.
    NativeRoots,
}

/// Establishes a connection pool to the PostgreSQL database.
///
/// # Errors
///
/// This function will return an error if:
/// - The native root certificates cannot be loaded into the TLS configuration
/// - The pool configuration is invalid
#[tracing::instrument(skip(url))]
pub async fn establish_pool<U>(
    url: U,
    max_size: NonZeroUsize,
    tls: DbTls,
) -> Result<DbPool, PoolError>
where
    String: From<U>,
{
    let manager = match tls {
        DbTls::Disabled => AsyncDieselConnectionManager::<AsyncPgConnection>::new(url),
        DbTls::NativeRoots => {
            let tls = task::spawn_blocking(make_rustls_config).await??;

            let mut manager_config = ManagerConfig::default();
            manager_config.custom_setup = Box::new(move |url: &str| {
                let tls = tls.clone();
                let url = url.to_string();
                Box::pin(async move {
                    let (client, conn) = tokio_postgres::connect(&url, tls)
                        .await
                        .map_err(|e| e.to_string())
                        .map_err(ConnectionError::BadConnection)?;

                    tokio::spawn(conn);

                    AsyncPgConnection::try_from(client).await
                })
            });

            AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(url, manager_config)
        },
    };

    Pool::builder(manager).max_size(max_size.get()).build().map_err(From::from)
}

fn make_rustls_config() -> Result<MakeRustlsConnect, rustls::Error> {
    let mut cert_store = RootCertStore::empty();
    let CertificateResult { certs, errors, .. } = rustls_native_certs::load_native_certs();

    if !errors.is_empty() {
        tracing::warn!(count = errors.len(), "some native root certificates failed to load");
    }

    for cert in certs {
        cert_store.add(cert)?;
    }

    let config = ClientConfig::builder().with_root_certificates(cert_store).with_no_client_auth();

    Ok(MakeRustlsConnect::new(config))
}
