use std::{net::SocketAddr, sync::Arc};

use axum::{Extension, Router, routing::get};
use reqwest::Url;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

use crate::{
    Error, Result,
    api::{self, CallbackState},
    types::CallbackOutcome,
    utils, warning,
};

/// Running callback listener. Must be shut down with [`CallbackServer::shutdown`].
pub struct CallbackServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CallbackServer {
    /// Binds the host and port of `redirect_uri` and serves its path.
    ///
    /// Returns the server handle and the receiver that yields the first
    /// callback carrying the expected `state`.
    pub async fn start(
        redirect_uri: &Url,
        expected_state: String,
    ) -> Result<(Self, oneshot::Receiver<CallbackOutcome>)> {
        let (host, port) = utils::callback_addr(redirect_uri)?;
        let path = utils::callback_path(redirect_uri);

        let listener = TcpListener::bind((host.as_str(), port))
            .await
            .map_err(|e| Error::CallbackListener(format!("cannot bind {host}:{port}: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| Error::CallbackListener(e.to_string()))?;

        let (code_tx, code_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let state = Arc::new(CallbackState::new(expected_state, code_tx));

        let app = Router::new()
            .route(&path, get(api::callback))
            .layer(Extension(state));

        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                warning!("Callback listener stopped: {}", e);
            }
        });

        Ok((
            Self {
                addr,
                shutdown: shutdown_tx,
                task,
            },
            code_rx,
        ))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops accepting connections and waits for the listener task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            warning!("Callback listener task failed: {}", e);
        }
    }
}
