use axum::{extract::ConnectInfo, middleware, routing::get, Router};
use dexadmin_core::ExchangeCore;
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_rustls::TlsAcceptor;
use tower::Service;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::auth::{self, AuthSecret};
use crate::error::ServerError;
use crate::handlers;
use crate::state::AppState;
use crate::tls::TlsConfig;

/// Clients that stall the TLS handshake longer than this are dropped.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the admin API router. Every route sits behind the auth layer.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/config", get(handlers::config))

        // Accounts
        .route("/accounts", get(handlers::accounts))
        .route("/account/:accountid", get(handlers::account_info))
        .route("/account/:accountid/ban", get(handlers::ban))
        .route("/account/:accountid/unban", get(handlers::unban))

        // Markets
        .route("/markets", get(handlers::markets))
        .route("/market/:marketid", get(handlers::market_info))
        .route("/market/:marketid/suspend", get(handlers::suspend))

        .layer(middleware::from_fn_with_state(state.clone(), auth::require_auth))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Everything needed to construct an [`AdminServer`].
pub struct SrvConfig {
    pub core: Arc<dyn ExchangeCore>,
    pub addr: SocketAddr,
    pub auth: AuthSecret,
    /// Serve HTTPS with this certificate. Plain HTTP when `None`.
    pub tls: Option<TlsConfig>,
}

/// The admin HTTP server, bound but not yet serving.
pub struct AdminServer {
    listener: TcpListener,
    app: Router,
    tls: Option<TlsAcceptor>,
}

impl AdminServer {
    /// Load the TLS material, if any, and bind the listening socket.
    pub async fn bind(config: SrvConfig) -> Result<Self, ServerError> {
        let tls = config.tls.as_ref().map(TlsConfig::acceptor).transpose()?;
        let listener = TcpListener::bind(config.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.addr,
                source,
            })?;
        let app = create_app(AppState::new(config.core, config.auth));
        Ok(AdminServer { listener, app, tls })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests until `shutdown` resolves. New connections are then
    /// refused and in-flight requests are allowed to finish before this
    /// returns.
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        tracing::info!(%addr, tls = self.tls.is_some(), "admin server listening");

        match self.tls {
            Some(acceptor) => serve_tls(self.listener, self.app, acceptor, shutdown).await,
            None => {
                axum::serve(
                    self.listener,
                    self.app.into_make_service_with_connect_info::<SocketAddr>(),
                )
                .with_graceful_shutdown(shutdown)
                .await?;
                Ok(())
            }
        }?;

        tracing::info!(%addr, "admin server stopped");
        Ok(())
    }
}

async fn serve_tls<F>(
    listener: TcpListener,
    app: Router,
    acceptor: TlsAcceptor,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    // Dropping the sender tells every connection to wind down.
    let (close_tx, close_rx) = watch::channel(());
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!("failed to accept admin connection: {}", e);
                    continue;
                }
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => continue,
            _ = &mut shutdown => break,
        };

        connections.spawn(serve_tls_connection(
            stream,
            peer,
            acceptor.clone(),
            app.clone(),
            close_rx.clone(),
        ));
    }

    drop(listener);
    drop(close_rx);
    drop(close_tx);
    tracing::debug!(in_flight = connections.len(), "draining admin connections");
    while connections.join_next().await.is_some() {}
    Ok(())
}

async fn serve_tls_connection(
    stream: TcpStream,
    peer: SocketAddr,
    acceptor: TlsAcceptor,
    app: Router,
    mut close_rx: watch::Receiver<()>,
) {
    let stream = match tokio::time::timeout(HANDSHAKE_TIMEOUT, acceptor.accept(stream)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            tracing::debug!(%peer, "TLS handshake failed: {}", e);
            return;
        }
        Err(_) => {
            tracing::debug!(%peer, "TLS handshake timed out");
            return;
        }
    };

    let service = hyper::service::service_fn(move |mut req: hyper::Request<Incoming>| {
        req.extensions_mut().insert(ConnectInfo(peer));
        app.clone().call(req)
    });

    let builder = auto::Builder::new(TokioExecutor::new());
    let conn = builder.serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    tokio::select! {
        res = conn.as_mut() => {
            if let Err(e) = res {
                tracing::debug!(%peer, "admin connection error: {}", e);
            }
            return;
        }
        _ = close_rx.changed() => conn.as_mut().graceful_shutdown(),
    }

    if let Err(e) = conn.await {
        tracing::debug!(%peer, "admin connection error: {}", e);
    }
}
