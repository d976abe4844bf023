//! Dashboard Application
//! axum router over the immutable Shaped Table: page, dropdown options,
//! figure updates, CSV export and health.

use crate::charts::{ChartPlotter, Figures, Selection};
use crate::dashboard::control_panel::ControlPanel;
use crate::dashboard::page;
use crate::data::{ProcessorError, ShapedTable};
use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Everything the handlers read. Built once at startup, never mutated.
pub struct AppState {
    table: ShapedTable,
    panel: ControlPanel,
    /// Rendered page HTML
    page: String,
}

impl AppState {
    pub fn new(table: ShapedTable) -> Self {
        let panel = ControlPanel::from_table(&table);
        let page = page::render(&panel);
        Self { table, panel, page }
    }
}

/// Dropdown values of one interaction. Missing parameters mean "No Selection".
#[derive(Debug, Deserialize)]
struct FigureQuery {
    #[serde(default)]
    year: Selection,
    #[serde(default)]
    indicator: Selection,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    rows: usize,
    indicators: usize,
}

/// Handler error carrying the processor failure.
struct ApiError(ProcessorError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ProcessorError::UnknownIndicator(_) => StatusCode::BAD_REQUEST,
            ProcessorError::PolarsError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            warn!(error = %self.0, "rejected request");
        }
        (status, self.0.to_string()).into_response()
    }
}

impl From<ProcessorError> for ApiError {
    fn from(err: ProcessorError) -> Self {
        Self(err)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/options", get(options))
        .route("/api/figures", get(figures))
        .route("/api/table.csv", get(table_csv))
        .route("/health", get(health))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(state: AppState, addr: SocketAddr, open_browser: bool) -> Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    let local = listener.local_addr().context("Failed to read bound address")?;
    info!(addr = %local, "serving dashboard");

    if open_browser {
        let url = format!("http://127.0.0.1:{}", local.port());
        if let Err(e) = open::that(&url) {
            warn!(%url, error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn options(State(state): State<Arc<AppState>>) -> Json<ControlPanel> {
    Json(state.panel.clone())
}

async fn figures(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FigureQuery>,
) -> Result<Json<Figures>, ApiError> {
    let figures = ChartPlotter::update_output(&state.table, &query.year, &query.indicator)?;
    Ok(Json(figures))
}

async fn table_csv(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let mut body = Vec::new();
    state.table.write_csv(&mut body)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"cdi_shaped.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        rows: state.table.height(),
        indicators: state.table.indicators().len(),
    })
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
