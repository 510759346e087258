//! HTTP calling boundary
//!
//! Thin axum router over [`crate::bridge::json`]. The kernel never sees HTTP:
//! handlers hand the raw body to the JSON bridge on tokio's blocking pool and
//! map the outcome to a status code.
//!
//! | Route | Method | Body |
//! |---|---|---|
//! | `/api/matrix/add` | POST | `{ "A", "B" }` |
//! | `/api/matrix/subtract` | POST | `{ "A", "B" }` |
//! | `/api/matrix/multiply` | POST | `{ "A", "B" }` |
//! | `/api/matrix/rref` | POST | `{ "A" }` |
//! | `/api/matrix/rref/steps` | POST | `{ "A" }` |
//! | `/health` | GET | none |
//!
//! Status mapping: 200 on success, 400 for malformed JSON and every kernel
//! error, 405 (with a JSON error body) for any other method on an API route.

use std::future::Future;
use std::io;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::bridge::json::{self, MatrixResponse};
use crate::error::BinaryOp;

/// Listener configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Set the host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `host:port` string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the router with every matrix route and `/health`
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/matrix/add", post(add).fallback(method_not_allowed))
        .route(
            "/api/matrix/subtract",
            post(subtract).fallback(method_not_allowed),
        )
        .route(
            "/api/matrix/multiply",
            post(multiply).fallback(method_not_allowed),
        )
        .route("/api/matrix/rref", post(rref).fallback(method_not_allowed))
        .route(
            "/api/matrix/rref/steps",
            post(rref_steps).fallback(method_not_allowed),
        )
}

/// Bind `config.bind_addr()` and serve until Ctrl+C
pub async fn serve(config: ServerConfig) -> io::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    serve_listener(listener, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_listener<F>(listener: TcpListener, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "matcalc server listening");
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("matcalc server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl+C handler; serving until killed");
        std::future::pending::<()>().await;
    }
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(MatrixResponse {
            result: None,
            error: Some("method not allowed: use POST".to_string()),
        }),
    )
        .into_response()
}

async fn add(body: Bytes) -> Response {
    binary(BinaryOp::Add, body).await
}

async fn subtract(body: Bytes) -> Response {
    binary(BinaryOp::Subtract, body).await
}

async fn multiply(body: Bytes) -> Response {
    binary(BinaryOp::Multiply, body).await
}

async fn binary(op: BinaryOp, body: Bytes) -> Response {
    let route = op.to_string();
    match tokio::task::spawn_blocking(move || json::respond_binary(op, &body)).await {
        Ok(resp) => matrix_reply(&route, resp),
        Err(e) => internal_error(&route, &e),
    }
}

async fn rref(body: Bytes) -> Response {
    match tokio::task::spawn_blocking(move || json::respond_rref(&body)).await {
        Ok(resp) => matrix_reply("rref", resp),
        Err(e) => internal_error("rref", &e),
    }
}

async fn rref_steps(body: Bytes) -> Response {
    match tokio::task::spawn_blocking(move || json::respond_rref_steps(&body)).await {
        Ok(resp) => {
            let status = status_for(resp.error.as_deref(), "rref/steps");
            (status, Json(resp)).into_response()
        }
        Err(e) => internal_error("rref/steps", &e),
    }
}

fn matrix_reply(route: &str, resp: MatrixResponse) -> Response {
    let status = status_for(resp.error.as_deref(), route);
    (status, Json(resp)).into_response()
}

/// 200 when there is no error, 400 otherwise
fn status_for(error: Option<&str>, route: &str) -> StatusCode {
    match error {
        None => {
            debug!(route, "request ok");
            StatusCode::OK
        }
        Some(msg) => {
            warn!(route, error = msg, "request rejected");
            StatusCode::BAD_REQUEST
        }
    }
}

fn internal_error(route: &str, e: &tokio::task::JoinError) -> Response {
    warn!(route, error = %e, "worker task failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MatrixResponse {
            result: None,
            error: Some(format!("internal error: {e}")),
        }),
    )
        .into_response()
}
