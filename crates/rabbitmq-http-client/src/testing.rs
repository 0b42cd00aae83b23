//! Test utilities for rabbitmq-http-client
//!
//! Provides helpers for running the client against an in-process stand-in for
//! the management API.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::{Client, ClientOptions, Result};

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve an axum Router on an ephemeral port
    ///
    /// The router must mount its routes under `/api`, where the client
    /// expects the management API.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use axum::{routing::get, Json, Router};
    /// use rabbitmq_http_client::testing::TestServer;
    ///
    /// let router = Router::new().route(
    ///     "/api/overview",
    ///     get(|| async { Json(serde_json::json!({"rabbitmq_version": "3.13.0"})) }),
    /// );
    /// let server = TestServer::start(router).await?;
    /// let overview = server.client.overview().await?;
    /// ```
    pub async fn start<S>(router: axum::Router<S>) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        let options = ClientOptions::new()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2));
        Self::start_with_options(router, options).await
    }

    /// Serve a Router and connect a client built with `options`
    pub async fn start_with_options<S>(
        router: axum::Router<S>,
        options: ClientOptions,
    ) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        Self::start_at(router, "", options).await
    }

    /// Serve a Router whose management API lives under `base_path`
    ///
    /// Mirrors a broker behind a reverse proxy, e.g. `base_path = "/rabbitmq/api"`.
    /// An empty `base_path` falls back to `/api`.
    pub async fn start_at<S>(
        router: axum::Router<S>,
        base_path: &str,
        options: ClientOptions,
    ) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let router: axum::Router = router.into();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let client = Client::with_options(&format!("http://{}{}", addr, base_path), options)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server, without the `/api` base path
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL requests are resolved against, including the base path
    pub fn management_url(&self) -> &url::Url {
        self.client.base_url()
    }

    /// Get a reference to the client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Wait for a condition with timeout
///
/// Statistics in the management API are updated asynchronously, so a listing
/// right after a write may not reflect it yet. Poll with this instead.
pub async fn wait_for<F, Fut>(condition: F, timeout: Duration) -> bool
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    false
}
