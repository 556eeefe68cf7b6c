//! HTTP server implementation for the configuration API.
//!
//! This module provides the axum-based HTTP server that exposes the
//! dashboard registry and configuration documents as REST endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::{ConfigError, ErrorCode};
use crate::store::{ConfigStore, read_raw};
use crate::types::{ConfigKind, DEFAULT_DASHBOARD_ID};

/// API server state shared across handlers.
#[derive(Clone)]
pub struct ApiServer {
    store: ConfigStore,
    /// Allow cross-origin requests.
    cors: bool,
}

impl ApiServer {
    /// Create a new API server instance.
    pub fn new(store: ConfigStore) -> Self {
        Self { store, cors: false }
    }

    /// Enable permissive CORS.
    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    /// Get the configuration store.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }
}

impl ErrorCode {
    /// HTTP status for this error code.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidArgument | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::AlreadyExists => StatusCode::CONFLICT,
            ErrorCode::StorageError | ErrorCode::IoError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        if status.is_server_error() {
            error!(code = ?self.code, details = ?self.details, "{}", self.message);
        }

        let mut body = json!({
            "error": self.message,
            "code": self.code,
        });
        if let Some(field) = self.field {
            body["field"] = json!(field);
        }
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ConfigError>;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// List registered dashboards.
async fn list_dashboards(State(state): State<ApiServer>) -> impl IntoResponse {
    Json(json!({ "dashboards": state.store().list_dashboards() }))
}

#[derive(Debug, Deserialize)]
struct CreateDashboardRequest {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
}

/// Register a new dashboard.
async fn create_dashboard(
    State(state): State<ApiServer>,
    Json(request): Json<CreateDashboardRequest>,
) -> ApiResult<impl IntoResponse> {
    let dashboard = state.store().create_dashboard(
        request.id.as_deref().unwrap_or_default(),
        request.name.as_deref().unwrap_or_default(),
        request.description.as_deref(),
    )?;
    Ok((StatusCode::CREATED, Json(json!({ "dashboard": dashboard }))))
}

#[derive(Debug, Deserialize)]
struct DeleteDashboardRequest {
    id: Option<String>,
}

/// Delete a dashboard and its documents.
async fn delete_dashboard(
    State(state): State<ApiServer>,
    Json(request): Json<DeleteDashboardRequest>,
) -> ApiResult<impl IntoResponse> {
    let id = request
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ConfigError::new(ErrorCode::InvalidArgument, "Dashboard ID is required"))?;

    state.store().delete_dashboard(&id)?;
    Ok(Json(json!({ "message": "Dashboard deleted successfully" })))
}

/// Raw persisted text of a document, addressed by file name.
async fn raw_document(
    State(state): State<ApiServer>,
    Path((dashboard_id, file)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let store = state.store();
    store.require_dashboard(&dashboard_id)?;
    let kind = ConfigKind::from_file_name(&file)?;

    let content = read_raw(&store.document_path(&dashboard_id, kind))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content))
}

/// Document for display, falling back to the example template.
async fn get_document(
    State(state): State<ApiServer>,
    Path((dashboard_id, kind)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let kind: ConfigKind = kind.parse()?;
    let document = state.store().read_document(&dashboard_id, kind)?;
    Ok(Json(json!({
        "content": document.content,
        "persisted": document.is_persisted(),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest {
    dashboard_id: Option<String>,
    config_type: Option<String>,
    content: Option<String>,
}

/// Validate and save a document.
async fn save_document(
    State(state): State<ApiServer>,
    Json(request): Json<SaveRequest>,
) -> ApiResult<impl IntoResponse> {
    let (Some(dashboard_id), Some(config_type), Some(content)) = (
        request.dashboard_id.filter(|id| !id.is_empty()),
        request.config_type.filter(|t| !t.is_empty()),
        request.content,
    ) else {
        return Err(ConfigError::new(
            ErrorCode::InvalidArgument,
            "Missing required fields: dashboardId, configType, content",
        ));
    };

    let kind: ConfigKind = config_type.parse()?;
    let path = state.store().write_document(&dashboard_id, kind, &content)?;

    Ok(Json(json!({
        "message": "Configuration saved successfully",
        "dashboardId": dashboard_id,
        "configType": kind.as_str(),
        "path": path,
    })))
}

#[derive(Debug, Deserialize)]
struct SettingsQuery {
    dashboard: Option<String>,
}

/// Structured settings of a dashboard, substituted and normalized.
async fn get_settings(
    State(state): State<ApiServer>,
    Query(query): Query<SettingsQuery>,
) -> ApiResult<impl IntoResponse> {
    let dashboard_id = query
        .dashboard
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DEFAULT_DASHBOARD_ID.to_string());

    let settings = state.store().load_settings(&dashboard_id)?;
    Ok(Json(settings))
}

/// Build the router with all routes.
pub fn build_router(state: ApiServer) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/dashboards",
            get(list_dashboards)
                .post(create_dashboard)
                .delete(delete_dashboard),
        )
        .route(
            "/api/config/dashboards/{dashboard_id}/{file}",
            get(raw_document),
        )
        .route("/api/config/save", post(save_document))
        .route("/api/config/{dashboard_id}/{kind}", get(get_document))
        .route("/api/settings", get(get_settings));

    if state.cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Handle for managing the API server lifecycle.
pub struct ServerHandle {
    /// Channel to signal shutdown.
    shutdown_tx: oneshot::Sender<()>,
    /// Address the server is bound to.
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        let _ = self.shutdown_tx.send(());
        self.task.await?;
        Ok(())
    }
}

/// Start the HTTP server on the specified address.
///
/// Returns a handle holding the actual bound address, used to shut the
/// server down gracefully.
pub async fn start_server(state: ApiServer, addr: &str) -> anyhow::Result<ServerHandle> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Configuration API listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Configuration API shutting down");
            })
            .await
        {
            error!("Configuration API error: {}", e);
        }
    });

    Ok(ServerHandle {
        shutdown_tx,
        addr: bound_addr,
        task,
    })
}
