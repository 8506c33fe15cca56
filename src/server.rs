//! HTTP server for the visualization page
//!
//! Routes:
//! - `GET /` - the visualization page
//! - `GET /structure.json` - the structure file as written
//! - `GET /api/structure` - the structure file parsed and re-emitted as JSON

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use thiserror::Error;

use crate::error::MapError;
use crate::visualize::{self, VISUALIZE_HTML};

pub const DEFAULT_PORT: u16 = 5000;

/// Delay before opening the browser, giving the listener time to start.
const BROWSER_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub structure_path: PathBuf,
    pub port: u16,
    pub open_browser: bool,
}

#[derive(Debug)]
struct ServerState {
    structure_path: PathBuf,
}

#[derive(Debug, Error)]
enum StructureError {
    #[error("failed to read structure file: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse structure file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl IntoResponse for StructureError {
    fn into_response(self) -> Response {
        let status = match &self {
            StructureError::Read(e) if e.kind() == io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!("{}", self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the router serving `structure_path`.
pub fn router(structure_path: PathBuf) -> Router {
    let state = Arc::new(ServerState { structure_path });
    Router::new()
        .route("/", get(index))
        .route("/structure.json", get(structure_file))
        .route("/api/structure", get(api_structure))
        .with_state(state)
}

/// Bind to `127.0.0.1:<port>` and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<(), MapError> {
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(MapError::Server)?;

    let url = format!("http://localhost:{}", config.port);
    tracing::info!("Starting server at {}", url);

    if config.open_browser {
        tokio::spawn(async move {
            tokio::time::sleep(BROWSER_DELAY).await;
            let launch = tokio::task::spawn_blocking(move || visualize::open_in_browser(&url));
            if let Err(e) = launch.await {
                tracing::warn!("Browser launch task failed: {}", e);
            }
        });
    }

    axum::serve(listener, router(config.structure_path))
        .await
        .map_err(MapError::Server)
}

async fn index() -> Html<&'static str> {
    Html(VISUALIZE_HTML)
}

async fn structure_file(State(state): State<Arc<ServerState>>) -> Response {
    match tokio::fs::read(&state.structure_path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => StructureError::Read(e).into_response(),
    }
}

async fn api_structure(State(state): State<Arc<ServerState>>) -> Response {
    match load_structure(&state).await {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            // Always a server error here, even for a missing file.
            let message = e.to_string();
            tracing::warn!("{}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response()
        }
    }
}

async fn load_structure(state: &ServerState) -> Result<Value, StructureError> {
    let bytes = tokio::fs::read(&state.structure_path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
