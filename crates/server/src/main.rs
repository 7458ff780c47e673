// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use staffdesk::{
    Clock, MemorySnapshot, RegistryConfig, RoleRegistry, RoleSnapshotStore, StoreError,
    SystemClock,
};
use staffdesk_api::{
    ApprovalError, ApproversResponse, AuthorizationService, BulkDecisionRequest,
    BulkDecisionResponse, CreateRoleRequest, CreateStaffRequest, CreateStaffResponse,
    DecisionRequest, DecisionResponse, ErrorResponse, GlobalCapabilities, ListRequestsResponse,
    ListRolesResponse, ReorderHierarchyRequest, RequestDetailResponse, UpdateRoleRequest,
    compute_global_capabilities, create_role, decide_bulk_by_keys, decide_by_key, delete_role,
    get_request, list_own_requests, list_roles, reorder_hierarchy, request_approvers,
    submit_request, translate_domain_error, translate_store_error, update_role, withdraw_request,
};
use staffdesk_audit::{AuditEvent, TracingAuditSink};
use staffdesk_domain::{
    Request, RequestKey, RequestKind, RequestPayload, RequestStatus, Role, RoleId, RoleSet,
};
use staffdesk_persistence::{AuditTrail, JsonFileRoleSnapshot, Persistence, PersistenceError};
use std::sync::Arc;
use time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

use session::RequestActor;

/// Staffdesk Server - HTTP server for the staff request portal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Seconds a fetched role set is served before refetching
    #[arg(long, default_value_t = 300)]
    role_cache_ttl_secs: u32,

    /// File holding the last good role set, served when the database is unreachable.
    /// If not provided, the fallback lives in memory only.
    #[arg(long)]
    role_snapshot: Option<String>,
}

/// Application state shared across handlers.
///
/// Lock order is persistence, then audit.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for roles, staff and requests.
    persistence: Arc<Mutex<Persistence>>,
    /// Cached role set with snapshot fallback.
    registry: Arc<RoleRegistry>,
    /// Durable audit trail on its own connection. Every event is also logged.
    audit: Arc<Mutex<AuditTrail>>,
    /// Source of decision timestamps.
    clock: Arc<dyn Clock>,
}

/// Query parameters for listing the actor's own requests.
#[derive(Debug, Deserialize)]
struct ListRequestsQuery {
    /// Only requests currently in this status.
    status: Option<RequestStatus>,
}

/// Query parameters for the audit endpoint.
#[derive(Debug, Deserialize)]
struct AuditQuery {
    /// Restrict to one request kind. Requires `id`.
    kind: Option<String>,
    /// Restrict to one request id. Requires `kind`.
    id: Option<i64>,
}

/// API response for the audit endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuditTimelineResponse {
    /// Events in the order they were recorded.
    events: Vec<AuditEvent>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error body.
    body: ErrorResponse,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ApprovalError> for HttpError {
    fn from(err: ApprovalError) -> Self {
        let status: StatusCode = match err {
            ApprovalError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApprovalError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApprovalError::InvalidTransition { .. } | ApprovalError::Conflict(_) => {
                StatusCode::CONFLICT
            }
            ApprovalError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApprovalError::Upstream(_) => {
                error!(error = %err, "Upstream failure");
                StatusCode::BAD_GATEWAY
            }
        };
        Self {
            status,
            body: ErrorResponse {
                kind: err.kind().to_string(),
                error: err.to_string(),
            },
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        translate_store_error(StoreError::from(err)).into()
    }
}

/// Parses the `{kind}/{id}` path segments into a request key.
fn parse_key(kind: &str, id: i64) -> Result<RequestKey, HttpError> {
    let kind: RequestKind = kind.parse().map_err(translate_domain_error)?;
    Ok(RequestKey::new(kind, id))
}

/// Handler for GET `/me/capabilities` endpoint.
async fn handle_get_capabilities(RequestActor(actor): RequestActor) -> Json<GlobalCapabilities> {
    Json(compute_global_capabilities(&actor))
}

/// Handler for GET `/roles` endpoint.
async fn handle_list_roles(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(_actor): RequestActor,
) -> Json<ListRolesResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Json(list_roles(&mut *persistence, &app_state.registry))
}

/// Handler for POST `/roles` endpoint.
async fn handle_create_role(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<Role>), HttpError> {
    info!(actor_id = actor.id.0, name = %req.name, "Handling create_role request");

    let mut persistence = app_state.persistence.lock().await;
    let role: Role = create_role(&mut *persistence, &app_state.registry, &actor, req)?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// Handler for PUT `/roles/{role_id}` endpoint.
async fn handle_update_role(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(role_id): Path<i64>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<Role>, HttpError> {
    info!(actor_id = actor.id.0, role_id, "Handling update_role request");

    let mut persistence = app_state.persistence.lock().await;
    let role: Role = update_role(
        &mut *persistence,
        &app_state.registry,
        &actor,
        RoleId(role_id),
        req,
    )?;
    Ok(Json(role))
}

/// Handler for DELETE `/roles/{role_id}` endpoint.
async fn handle_delete_role(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(role_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(actor_id = actor.id.0, role_id, "Handling delete_role request");

    let mut persistence = app_state.persistence.lock().await;
    delete_role(
        &mut *persistence,
        &app_state.registry,
        &actor,
        RoleId(role_id),
    )?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT `/roles/hierarchy` endpoint.
async fn handle_reorder_hierarchy(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<ReorderHierarchyRequest>,
) -> Result<Json<ListRolesResponse>, HttpError> {
    info!(
        actor_id = actor.id.0,
        roles = req.levels.len(),
        "Handling reorder_hierarchy request"
    );

    let mut persistence = app_state.persistence.lock().await;
    reorder_hierarchy(&mut *persistence, &app_state.registry, &actor, &req)?;
    Ok(Json(list_roles(&mut *persistence, &app_state.registry)))
}

/// Handler for POST `/staff` endpoint.
///
/// The new member's role must be within the actor's `manage-users` reach.
async fn handle_create_staff(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<CreateStaffResponse>), HttpError> {
    info!(
        actor_id = actor.id.0,
        role_id = req.role_id.0,
        "Handling create_staff request"
    );

    let display_name: &str = req.display_name.trim();
    if display_name.is_empty() {
        return Err(ApprovalError::Validation {
            field: String::from("display_name"),
            message: String::from("Display name cannot be empty"),
        }
        .into());
    }

    let mut persistence = app_state.persistence.lock().await;
    let roles: Arc<RoleSet> = app_state.registry.load(&mut *persistence, false);
    let role: &Role = roles.get(req.role_id).ok_or_else(|| ApprovalError::NotFound {
        resource: String::from("Role"),
        message: format!("role {} does not exist", req.role_id),
    })?;
    AuthorizationService::authorize_create_staff(&actor, role)?;

    let staff_id = persistence.insert_staff(display_name, req.role_id)?;
    info!(staff_id = staff_id.0, "Staff member created");

    Ok((
        StatusCode::CREATED,
        Json(CreateStaffResponse {
            staff_id,
            display_name: display_name.to_string(),
            role_id: req.role_id,
        }),
    ))
}

/// Handler for POST `/requests` endpoint.
///
/// Submits a request owned by the actor.
async fn handle_submit_request(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(payload): Json<RequestPayload>,
) -> Result<(StatusCode, Json<Request>), HttpError> {
    info!(
        actor_id = actor.id.0,
        kind = payload.kind().as_str(),
        "Handling submit_request request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let request: Request =
        submit_request(&mut *persistence, &actor, &payload, app_state.clock.now())?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Handler for GET `/requests` endpoint.
///
/// Lists the actor's own requests, newest first.
async fn handle_list_own_requests(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<ListRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let listed: ListRequestsResponse =
        list_own_requests(&mut *persistence, &actor, query.status)?;
    Ok(Json(listed))
}

/// Handler for GET `/requests/{kind}/{id}` endpoint.
async fn handle_get_request(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Json<RequestDetailResponse>, HttpError> {
    let key: RequestKey = parse_key(&kind, id)?;

    let mut persistence = app_state.persistence.lock().await;
    let roles: Arc<RoleSet> = app_state.registry.load(&mut *persistence, false);
    let detail: RequestDetailResponse = get_request(&mut *persistence, &roles, &actor, key)?;
    Ok(Json(detail))
}

/// Handler for DELETE `/requests/{kind}/{id}` endpoint.
///
/// Withdraws one of the actor's own pending requests.
async fn handle_withdraw_request(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<StatusCode, HttpError> {
    let key: RequestKey = parse_key(&kind, id)?;

    let mut persistence = app_state.persistence.lock().await;
    withdraw_request(&mut *persistence, &actor, key)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/requests/{kind}/{id}/approvers` endpoint.
async fn handle_get_approvers(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Json<ApproversResponse>, HttpError> {
    let key: RequestKey = parse_key(&kind, id)?;

    let mut persistence = app_state.persistence.lock().await;
    let roles: Arc<RoleSet> = app_state.registry.load(&mut *persistence, false);
    let approvers: ApproversResponse = request_approvers(&mut *persistence, &roles, &actor, key)?;
    Ok(Json(approvers))
}

/// Handler for POST `/requests/{kind}/{id}/decision` endpoint.
///
/// Applies one decision through the approval orchestrator.
async fn handle_decide(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((kind, id)): Path<(String, i64)>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>, HttpError> {
    let key: RequestKey = parse_key(&kind, id)?;
    info!(
        actor_id = actor.id.0,
        request = %key,
        action = ?req.action,
        "Handling decision request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let roles: Arc<RoleSet> = app_state.registry.load(&mut *persistence, false);
    let mut audit = app_state.audit.lock().await;
    let mut sink = (&mut *audit, TracingAuditSink);

    let outcome = decide_by_key(
        &mut *persistence,
        &mut sink,
        &roles,
        &actor,
        key,
        req.into_command(),
        app_state.clock.now(),
    )?;
    Ok(Json(outcome.into()))
}

/// Handler for POST `/requests/decisions` endpoint.
///
/// Applies one decision to many requests. Always answers 200; per-item
/// failures are reported in the body.
async fn handle_decide_bulk(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<BulkDecisionRequest>,
) -> Json<BulkDecisionResponse> {
    info!(
        actor_id = actor.id.0,
        items = req.items.len(),
        action = ?req.action,
        "Handling bulk decision request"
    );

    let (keys, command) = req.into_parts();
    let mut persistence = app_state.persistence.lock().await;
    let roles: Arc<RoleSet> = app_state.registry.load(&mut *persistence, false);
    let mut audit = app_state.audit.lock().await;
    let mut sink = (&mut *audit, TracingAuditSink);

    let report = decide_bulk_by_keys(
        &mut *persistence,
        &mut sink,
        &roles,
        &actor,
        &keys,
        &command,
        app_state.clock.now(),
    );
    Json(report.into())
}

/// Handler for GET `/audit` endpoint.
///
/// Returns the whole trail, or one request's events when `kind` and `id`
/// are both given.
async fn handle_get_audit(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    AuthorizationService::authorize_view_audit(&actor)?;

    let filter: Option<RequestKey> = match (query.kind.as_deref(), query.id) {
        (Some(kind), Some(id)) => Some(parse_key(kind, id)?),
        (None, None) => None,
        _ => {
            return Err(ApprovalError::Validation {
                field: String::from("query"),
                message: String::from("kind and id must be given together"),
            }
            .into());
        }
    };

    let mut audit = app_state.audit.lock().await;
    let events: Vec<AuditEvent> = match filter {
        Some(key) => audit.events_for(key)?,
        None => audit.events()?,
    };
    Ok(Json(AuditTimelineResponse { events }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/me/capabilities", get(handle_get_capabilities))
        .route("/roles", get(handle_list_roles).post(handle_create_role))
        .route("/roles/hierarchy", put(handle_reorder_hierarchy))
        .route(
            "/roles/{role_id}",
            put(handle_update_role).delete(handle_delete_role),
        )
        .route("/staff", post(handle_create_staff))
        .route(
            "/requests",
            get(handle_list_own_requests).post(handle_submit_request),
        )
        .route("/requests/decisions", post(handle_decide_bulk))
        .route(
            "/requests/{kind}/{id}",
            get(handle_get_request).delete(handle_withdraw_request),
        )
        .route("/requests/{kind}/{id}/approvers", get(handle_get_approvers))
        .route("/requests/{kind}/{id}/decision", post(handle_decide))
        .route("/audit", get(handle_get_audit))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Staffdesk Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let snapshot: Box<dyn RoleSnapshotStore + Send + Sync> =
        if let Some(snapshot_path) = &args.role_snapshot {
            info!("Using role snapshot file at: {}", snapshot_path);
            Box::new(JsonFileRoleSnapshot::new(snapshot_path))
        } else {
            Box::new(MemorySnapshot::new())
        };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let config: RegistryConfig = RegistryConfig {
        ttl: Duration::seconds(i64::from(args.role_cache_ttl_secs)),
    };
    info!(ttl_secs = args.role_cache_ttl_secs, "Role cache configured");

    let audit: AuditTrail = persistence.open_audit_trail()?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        registry: Arc::new(RoleRegistry::new(config, Arc::clone(&clock), snapshot)),
        audit: Arc::new(Mutex::new(audit)),
        clock,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
