//! Transient localhost listener for the provider's OAuth redirect.

use std::{collections::HashMap, sync::Arc};

use axum::{extract::RawQuery, http::Uri, response::Html, Router};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
    task::JoinHandle,
};
use tracing::debug;

use crate::error::{Error, Result};

/// A single parsed inbound request: URL path plus decoded query parameters.
pub(crate) struct CallbackRequest {
    pub path: String,
    pub params: HashMap<String, String>,
}

/// One-shot callback server.
///
/// The first inbound request is handed to the waiting flow through a oneshot
/// channel; every request, first or stray, is answered with an empty
/// `text/html` body so the redirecting browser does not display an error.
/// Dropping the server aborts the serve task and releases the socket.
pub(crate) struct CallbackServer {
    rx: oneshot::Receiver<CallbackRequest>,
    handle: JoinHandle<()>,
}

impl CallbackServer {
    pub(crate) async fn bind(port: u16) -> Result<Self> {
        let (tx, rx) = oneshot::channel();
        let tx = Arc::new(Mutex::new(Some(tx)));

        // Fallback rather than a fixed route: a redirect to the wrong path
        // must reach the flow as data, not die as a 404.
        let handler = move |uri: Uri, RawQuery(query): RawQuery| {
            let tx = tx.clone();
            async move {
                let request = CallbackRequest {
                    path: uri.path().to_string(),
                    params: query.as_deref().map(parse_query).unwrap_or_default(),
                };
                if let Some(sender) = tx.lock().await.take() {
                    let _ = sender.send(request);
                }
                Html("")
            }
        };
        let app = Router::new().fallback(handler);

        let addr = format!("127.0.0.1:{port}");
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            Error::Transport(format!("failed to bind callback listener on {addr}: {e}"))
        })?;
        debug!(%addr, "callback listener bound");

        let server = axum::serve(listener, app);
        let handle = tokio::spawn(async move {
            let _ = server.await;
        });

        Ok(Self { rx, handle })
    }

    /// Wait for the first inbound request. The listener keeps answering
    /// stray requests until the server is dropped.
    pub(crate) async fn recv(&mut self) -> Result<CallbackRequest> {
        (&mut self.rx).await.map_err(|_| {
            Error::Transport("callback listener closed before a redirect arrived".to_string())
        })
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
